//! Media element behaviour against the headless host bridge.

mod common;

use bridge_headless::{MemoryDocument, MemoryNode};
use bridge_traits::{listener, HostNode};
use common::{capture, RecordingFactory};
use core_media::{
    Access, CanPlay, EventStrategy, MediaElement, MediaElementOptions, MediaError, MediaProperty,
    MediaSource, MediaValue, RendererRegistry, ERROR_CREATING_RENDERER, NO_RENDERER_FOUND,
    PROPERTIES,
};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn registry_with(factories: &[Arc<RecordingFactory>]) -> Arc<RendererRegistry> {
    let registry = RendererRegistry::new();
    for factory in factories {
        registry.register(factory.clone()).unwrap();
    }
    Arc::new(registry)
}

fn detached(factories: &[Arc<RecordingFactory>]) -> MediaElement {
    MediaElement::detached(registry_with(factories), MediaElementOptions::default()).unwrap()
}

fn markup(node: &Arc<dyn HostNode>) -> String {
    node.as_any()
        .downcast_ref::<MemoryNode>()
        .map(MemoryNode::to_markup)
        .unwrap_or_default()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_wraps_host_and_discovers_sources() {
    let document = Arc::new(MemoryDocument::new(Some("http://localhost/page/index.html")));
    let video = document.append_to_body(
        MemoryNode::element("video")
            .with_id("player1")
            .with_child(MemoryNode::element("source").with_attribute("src", "a.webm"))
            .with_child(
                MemoryNode::element("source")
                    .with_attribute("src", "b.mp4")
                    .with_attribute("type", "video/mp4; codecs=avc1"),
            ),
    );
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();

    let seen = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&seen);
    let options = MediaElementOptions::new().with_success(move |element, original| {
        *slot.lock() = Some((
            element.renderer_name().map(str::to_string),
            original.and_then(|node| node.id()),
        ));
    });

    let element =
        MediaElement::new("player1", document.clone(), registry_with(&[html5.clone()]), options)
            .unwrap();

    assert_eq!(element.id(), "player1");
    assert_eq!(video.id().as_deref(), Some("player1_from_mejs"));
    assert_eq!(
        document.body().to_markup(),
        "<body><mediaelementwrapper id=\"player1\"><video id=\"player1_from_mejs\">\
         <source src=\"a.webm\"></source>\
         <source src=\"b.mp4\" type=\"video/mp4; codecs=avc1\"></source>\
         </video></mediaelementwrapper></body>"
    );

    assert_eq!(element.renderer_name(), Some("html5"));
    assert_eq!(
        html5.last_sources(),
        vec![MediaSource::new("http://localhost/page/b.mp4", "video/mp4")]
    );
    assert_eq!(element.src(), MediaValue::from("http://localhost/page/b.mp4"));
    assert_eq!(
        *seen.lock(),
        Some((Some("html5".to_string()), Some("player1_from_mejs".to_string())))
    );
}

#[test]
fn test_discovery_binds_first_playable_source() {
    let document = Arc::new(MemoryDocument::new(Some("http://localhost/")));
    document.append_to_body(
        MemoryNode::element("video")
            .with_id("v")
            .with_child(MemoryNode::element("source").with_attribute("src", "a.mp4"))
            .with_child(MemoryNode::element("source").with_attribute("src", "b.webm")),
    );
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();

    let element = MediaElement::new(
        "v",
        document,
        registry_with(&[html5.clone()]),
        MediaElementOptions::default(),
    )
    .unwrap();

    assert_eq!(element.renderer_name(), Some("html5"));
    assert_eq!(element.current_src(), MediaValue::from("http://localhost/a.mp4"));
    assert_eq!(
        html5.last_sources(),
        vec![
            MediaSource::new("http://localhost/a.mp4", "video/mp4"),
            MediaSource::new("http://localhost/b.webm", "video/webm"),
        ]
    );
}

#[test]
fn test_custom_wrapper_name() {
    let document = Arc::new(MemoryDocument::default());
    document.append_to_body(MemoryNode::element("audio").with_id("a1"));

    let element = MediaElement::new(
        "a1",
        document.clone(),
        registry_with(&[]),
        MediaElementOptions::new().with_fake_node_name("media-wrapper"),
    )
    .unwrap();

    assert_eq!(element.wrapper().map(|w| w.node_name()).as_deref(), Some("media-wrapper"));
    assert_eq!(
        document.body().to_markup(),
        "<body><media-wrapper id=\"a1\"><audio id=\"a1_from_mejs\"></audio></media-wrapper></body>"
    );
}

#[test]
fn test_missing_host_builds_unwrapped_element() {
    let document = Arc::new(MemoryDocument::default());

    let element = MediaElement::new(
        "nope",
        document.clone(),
        registry_with(&[]),
        MediaElementOptions::default(),
    )
    .unwrap();

    assert!(element.original_node().is_none());
    assert_eq!(element.id(), "nope");
    assert_eq!(element.wrapper().and_then(|w| w.id()).as_deref(), Some(element.id()));
    assert_eq!(document.body().to_markup(), "<body></body>");
}

#[test]
fn test_detached_host_node_is_moved_into_wrapper() {
    let document = Arc::new(MemoryDocument::default());
    let video: Arc<dyn HostNode> = Arc::new(MemoryNode::element("video"));

    let element = MediaElement::new(
        video,
        document.clone(),
        registry_with(&[]),
        MediaElementOptions::default(),
    )
    .unwrap();

    let id = element.id().to_string();
    assert!(id.starts_with("mejs_"));
    let wrapper = element.wrapper().unwrap();
    assert_eq!(
        markup(wrapper),
        format!(
            "<mediaelementwrapper id=\"{id}\"><video id=\"{id}_from_mejs\"></video></mediaelementwrapper>"
        )
    );
    assert_eq!(document.body().to_markup(), "<body></body>");
}

#[test]
fn test_iframe_discovery_uses_src_with_blank_type() {
    let document = Arc::new(MemoryDocument::new(Some("http://localhost/")));
    document.append_to_body(
        MemoryNode::element("iframe")
            .with_id("yt")
            .with_attribute("src", "https://www.youtube.com/embed/abc"),
    );
    let embed = RecordingFactory::new("embed", &[""]).shared();

    let element = MediaElement::new(
        "yt",
        document,
        registry_with(&[embed.clone()]),
        MediaElementOptions::default(),
    )
    .unwrap();

    assert_eq!(element.renderer_name(), Some("embed"));
    assert_eq!(
        embed.last_sources(),
        vec![MediaSource::new("https://www.youtube.com/embed/abc", "")]
    );
}

#[test]
fn test_media_src_attribute_fallback() {
    let document = Arc::new(MemoryDocument::new(Some("http://localhost/")));
    document.append_to_body(
        MemoryNode::element("audio")
            .with_id("a1")
            .with_attribute("src", "song.mp3"),
    );
    let html5 = RecordingFactory::new("html5", &["audio/mp3"]).shared();

    let element = MediaElement::new(
        "a1",
        document,
        registry_with(&[html5.clone()]),
        MediaElementOptions::default(),
    )
    .unwrap();

    assert_eq!(element.renderer_name(), Some("html5"));
    assert_eq!(
        html5.last_sources(),
        vec![MediaSource::new("http://localhost/song.mp3", "audio/mp3")]
    );
}

#[test]
fn test_success_callback_can_drive_the_element() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let options = MediaElementOptions::new().with_success(|element, original| {
        assert!(original.is_none());
        element.set_src("intro.mp4");
    });

    let element = MediaElement::detached(registry_with(&[html5.clone()]), options).unwrap();

    assert_eq!(element.renderer_name(), Some("html5"));
    assert_eq!(html5.created(), 1);
}

#[test]
fn test_invalid_options_are_rejected() {
    let result = MediaElement::detached(
        registry_with(&[]),
        MediaElementOptions::new().with_fake_node_name("not a tag"),
    );
    assert!(matches!(result, Err(MediaError::InvalidConfig(_))));
}

// ============================================================================
// Source Assignment
// ============================================================================

#[test]
fn test_no_renderer_found_raises_error_event() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let mut element = detached(&[html5.clone()]);
    let errors = capture(&element, &["error"]);

    element.set_src("file.xyz");

    let errors = errors.lock();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message.as_deref(), Some(NO_RENDERER_FOUND));
    assert_eq!(errors[0].target.as_deref(), Some(element.id()));
    assert!(element.renderer_name().is_none());
    assert_eq!(html5.created(), 0);
}

#[test]
fn test_no_match_keeps_previous_renderer() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let mut element = detached(&[html5.clone()]);

    element.set_src("a.mp4");
    element.set_src("file.xyz");

    assert_eq!(element.renderer_name(), Some("html5"));
    assert_eq!(element.src(), MediaValue::from("a.mp4"));
}

#[test]
fn test_creation_failure_raises_error_event() {
    let broken = RecordingFactory::new("html5", &["video/mp4"]).failing().shared();
    let mut element = detached(&[broken.clone()]);
    let errors = capture(&element, &["error"]);

    element.set_src("a.mp4");

    let messages: Vec<_> = errors.lock().iter().map(|e| e.message.clone()).collect();
    assert_eq!(messages, vec![Some(ERROR_CREATING_RENDERER.to_string())]);
    assert!(element.renderer_name().is_none());
    assert!(!element.has_renderer("html5"));
}

#[test]
fn test_same_renderer_is_reused_in_place() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let mut element = detached(&[html5.clone()]);

    element.set_src("a.mp4");
    html5.clear_calls();
    element.set_src("b.mp4");

    assert_eq!(html5.created(), 1);
    assert_eq!(html5.calls(), vec!["show", "set_src b.mp4"]);
    assert_eq!(element.src(), MediaValue::from("b.mp4"));
}

#[test]
fn test_switching_back_reuses_cached_renderer() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let youtube = RecordingFactory::new("youtube", &["video/youtube"]).shared();
    let mut element = detached(&[html5.clone(), youtube.clone()]);

    element.set_src("a.mp4");
    element.set_src(vec![MediaSource::new("https://youtu.be/x", "video/youtube")]);

    assert_eq!(element.renderer_name(), Some("youtube"));
    assert_eq!(html5.calls(), vec!["show", "pause", "stop", "hide"]);

    html5.clear_calls();
    youtube.clear_calls();
    element.set_src("c.mp4");

    assert_eq!(element.renderer_name(), Some("html5"));
    assert_eq!(html5.created(), 1);
    assert_eq!(youtube.created(), 1);
    assert_eq!(html5.calls(), vec!["show", "set_src c.mp4"]);
    assert_eq!(youtube.calls(), vec!["pause", "stop", "hide"]);
}

#[test]
fn test_src_property_routes_through_selection() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let mut element = detached(&[html5.clone()]);

    element.set(MediaProperty::Src, "a.mp4").unwrap();
    assert_eq!(element.renderer_name(), Some("html5"));

    let result = element.set(MediaProperty::Src, true);
    assert!(matches!(result, Err(MediaError::InvalidSource(_))));
}

#[test]
fn test_preference_list_orders_selection() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let native = RecordingFactory::new("native_mp4", &["video/mp4"]).shared();
    let registry = registry_with(&[html5.clone(), native.clone()]);

    let mut element = MediaElement::detached(
        Arc::clone(&registry),
        MediaElementOptions::new().with_renderers(["flash", "native_mp4", "html5"]),
    )
    .unwrap();
    element.set_src("a.mp4");
    assert_eq!(element.renderer_name(), Some("native_mp4"));

    let mut element = MediaElement::detached(registry, MediaElementOptions::default()).unwrap();
    element.set_src("a.mp4");
    assert_eq!(element.renderer_name(), Some("html5"));
}

#[test]
fn test_change_renderer_refuses_disabled_renderer() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let youtube = RecordingFactory::new("youtube", &["video/youtube"]).shared();
    let mut element = MediaElement::detached(
        registry_with(&[html5, youtube.clone()]),
        MediaElementOptions::new().with_renderers(["html5"]),
    )
    .unwrap();
    let errors = capture(&element, &["error"]);

    let changed =
        element.change_renderer("youtube", &[MediaSource::new("https://youtu.be/x", "video/youtube")]);

    assert!(!changed);
    assert!(errors.lock().is_empty());
    assert!(element.renderer_name().is_none());
    assert_eq!(youtube.created(), 0);
}

#[test]
fn test_refused_renderer_keeps_active_one_playing() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let youtube = RecordingFactory::new("youtube", &["video/youtube"]).shared();
    let mut element = MediaElement::detached(
        registry_with(&[html5.clone(), youtube.clone()]),
        MediaElementOptions::new().with_renderers(["html5", "flash"]),
    )
    .unwrap();
    let errors = capture(&element, &["error"]);
    element.set_src("a.mp4");
    html5.clear_calls();

    let youtube_source = [MediaSource::new("https://youtu.be/x", "video/youtube")];
    assert!(!element.change_renderer("youtube", &youtube_source));
    assert!(!element.change_renderer("flash", &[MediaSource::new("a.swf", "")]));

    assert_eq!(element.renderer_name(), Some("html5"));
    assert!(html5.calls().is_empty());
    assert_eq!(youtube.created(), 0);
    assert!(errors.lock().is_empty());
    assert_eq!(element.src(), MediaValue::from("a.mp4"));
}

#[test]
fn test_unresolved_empty_id_falls_back_to_generated_id() {
    let element = MediaElement::new(
        "",
        Arc::new(MemoryDocument::default()),
        registry_with(&[]),
        MediaElementOptions::default(),
    )
    .unwrap();

    assert!(element.id().starts_with("mejs_"));
}

#[test]
fn test_change_renderer_refuses_unregistered_renderer() {
    let mut element = MediaElement::detached(
        registry_with(&[]),
        MediaElementOptions::new().with_renderers(["flash"]),
    )
    .unwrap();

    assert!(!element.change_renderer("flash", &[MediaSource::new("a.swf", "")]));
    assert!(element.renderer_name().is_none());
}

#[test]
fn test_renderer_defaults_override_element_options() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"])
        .with_default("k", json!("renderer"))
        .shared();
    let mut element = MediaElement::detached(
        registry_with(&[html5.clone()]),
        MediaElementOptions::new()
            .with_option("k", json!("element"))
            .with_option("only_element", json!(true)),
    )
    .unwrap();

    element.set_src("a.mp4");

    let options = html5.last_options().unwrap();
    assert_eq!(options.get("k"), Some(&json!("renderer")));
    assert_eq!(options.get("only_element"), Some(&json!(true)));
    assert_eq!(options.get("pluginPath"), Some(&json!("build/")));
    assert_eq!(options.get("fakeNodeName"), Some(&json!("mediaelementwrapper")));
}

// ============================================================================
// Forwarding
// ============================================================================

#[test]
fn test_every_property_is_forwarded() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let mut element = detached(&[html5.clone()]);
    element.set_src("a.mp4");
    html5.clear_calls();

    for descriptor in PROPERTIES.iter().filter(|d| d.property != MediaProperty::Src) {
        element.get_by_name(descriptor.name).unwrap();
        if descriptor.access == Access::ReadWrite {
            element.set_by_name(descriptor.name, 1.0).unwrap();
            assert_eq!(element.get(descriptor.property), MediaValue::Number(1.0));
        }
    }

    let calls = html5.calls();
    for descriptor in PROPERTIES.iter().filter(|d| d.property != MediaProperty::Src) {
        assert!(
            calls.contains(&format!("get {}", descriptor.name)),
            "{} was not read through the renderer",
            descriptor.name
        );
        let written = calls.contains(&format!("set {}", descriptor.name));
        assert_eq!(written, descriptor.access == Access::ReadWrite, "{}", descriptor.name);
    }
}

#[test]
fn test_read_only_properties_reject_writes() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let mut element = detached(&[html5.clone()]);
    element.set_src("a.mp4");
    html5.clear_calls();

    let result = element.set(MediaProperty::Duration, 5.0);
    assert!(matches!(result, Err(MediaError::ReadOnlyProperty("duration"))));

    let result = element.set_by_name("readyState", 4.0);
    assert!(matches!(result, Err(MediaError::ReadOnlyProperty("readyState"))));

    let result = element.set_by_name("bogus", 1.0);
    assert!(matches!(result, Err(MediaError::UnknownProperty(name)) if name == "bogus"));

    assert!(html5.calls().is_empty());
}

#[test]
fn test_typed_accessors() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let mut element = detached(&[html5]);
    element.set_src("a.mp4");

    element.set_volume(0.25);
    element.set_looping(true);
    element.set_current_time(12.5);

    assert_eq!(element.volume(), MediaValue::Number(0.25));
    assert_eq!(element.looping(), MediaValue::Bool(true));
    assert_eq!(element.current_time().as_f64(), Some(12.5));
    assert_eq!(element.paused(), MediaValue::Bool(true));

    assert_eq!(element.play(), Some(()));
    assert_eq!(element.paused(), MediaValue::Bool(false));
    assert!(element.duration().is_null());
}

#[test]
fn test_no_renderer_returns_neutral_values() {
    let mut element = detached(&[]);

    assert!(element.get(MediaProperty::Volume).is_null());
    assert!(element.volume().is_null());
    assert!(element.src().is_null());
    assert_eq!(element.play(), None);
    assert_eq!(element.pause(), None);
    assert_eq!(element.load(), None);
    assert_eq!(element.can_play_type("video/mp4"), None);
    assert!(element.set(MediaProperty::Volume, 0.5).is_ok());
    element.set_muted(true);
    element.set_size(640, 360);
}

#[test]
fn test_methods_and_size_are_forwarded() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let mut element = detached(&[html5.clone()]);
    element.set_src("a.mp4");
    html5.clear_calls();

    element.load();
    element.play();
    element.pause();
    element.set_size(640, 360);

    assert_eq!(html5.calls(), vec!["load", "play", "pause", "set_size 640x360"]);
    assert_eq!(element.can_play_type("video/mp4"), Some(CanPlay::Maybe));
    assert_eq!(element.can_play_type("video/flv"), Some(CanPlay::No));
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn test_renderer_events_reach_element_listeners() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let mut element = detached(&[html5]);
    element.set_src("a.mp4");
    let events = capture(&element, &["play", "pause"]);

    element.play();
    element.pause();

    let events = events.lock();
    let types: Vec<_> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["play", "pause"]);
    assert!(events.iter().all(|e| e.target.as_deref() == Some(element.id())));
}

#[test]
fn test_remove_all_listeners_silences_element() {
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();
    let mut element = detached(&[html5]);
    element.set_src("a.mp4");
    let events = capture(&element, &["play", "error"]);

    assert!(element.remove_event_listener(None, None));
    element.play();
    element.set_src("file.xyz");

    assert!(events.lock().is_empty());
}

#[test]
fn test_native_event_target_is_used_when_available() {
    let document = Arc::new(MemoryDocument::default().with_native_events(true));
    document.append_to_body(MemoryNode::element("video").with_id("v"));
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();

    let mut element = MediaElement::new(
        "v",
        document,
        registry_with(&[html5]),
        MediaElementOptions::default(),
    )
    .unwrap();
    assert_eq!(element.event_strategy(), EventStrategy::Native);

    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let native = element.wrapper().and_then(|w| w.event_target()).unwrap();
    native.add_event_listener(
        "play",
        listener(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }),
    );

    element.set_src("a.mp4");
    element.play();

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_emulated_strategy_ignores_native_target() {
    let document = Arc::new(MemoryDocument::default().with_native_events(true));
    document.append_to_body(MemoryNode::element("video").with_id("v"));
    let html5 = RecordingFactory::new("html5", &["video/mp4"]).shared();

    let mut element = MediaElement::new(
        "v",
        document,
        registry_with(&[html5]),
        MediaElementOptions::new().with_event_strategy(EventStrategy::Emulated),
    )
    .unwrap();
    assert_eq!(element.event_strategy(), EventStrategy::Emulated);

    let native_count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&native_count);
    let native = element.wrapper().and_then(|w| w.event_target()).unwrap();
    native.add_event_listener(
        "play",
        listener(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }),
    );
    let events = capture(&element, &["play"]);

    element.set_src("a.mp4");
    element.play();

    assert_eq!(native_count.load(Ordering::SeqCst), 0);
    assert_eq!(events.lock().len(), 1);
}
