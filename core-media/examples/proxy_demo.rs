//! Wraps a headless `<video>` element, plays it through a simulated native
//! renderer, then switches to an embedded-player renderer and back.
//!
//! Run with: `cargo run -p core-media --example proxy_demo`

use bridge_headless::{MemoryDocument, MemoryNode};
use bridge_traits::{listener, MediaEvent};
use core_media::{
    CanPlay, MediaElement, MediaElementOptions, MediaHandle, MediaProperty, MediaSource,
    MediaValue, Renderer, RendererFactory, RendererOptions, RendererRegistry,
};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::collections::HashMap;
use std::sync::Arc;

/// Simulated playback backend. Advances `currentTime` by one second per
/// `play()` call and reports it with `timeupdate`.
struct SimulatedRenderer {
    label: &'static str,
    handle: MediaHandle,
    state: HashMap<MediaProperty, MediaValue>,
    accepts: &'static [&'static str],
}

impl SimulatedRenderer {
    fn position(&self) -> f64 {
        self.state
            .get(&MediaProperty::CurrentTime)
            .and_then(MediaValue::as_f64)
            .unwrap_or(0.0)
    }
}

impl Renderer for SimulatedRenderer {
    fn get(&self, property: MediaProperty) -> MediaValue {
        self.state.get(&property).cloned().unwrap_or_default()
    }

    fn set(&mut self, property: MediaProperty, value: MediaValue) {
        self.state.insert(property, value);
        if property == MediaProperty::Volume {
            self.handle.dispatch_event(MediaEvent::new("volumechange"));
        }
    }

    fn set_src(&mut self, url: &str) {
        self.state.insert(MediaProperty::Src, MediaValue::from(url));
        self.state.insert(MediaProperty::CurrentTime, MediaValue::Number(0.0));
    }

    fn load(&mut self) {
        self.handle.dispatch_event(MediaEvent::new("loadstart"));
    }

    fn play(&mut self) {
        let position = self.position() + 1.0;
        self.state.insert(MediaProperty::Paused, MediaValue::Bool(false));
        self.state.insert(MediaProperty::CurrentTime, MediaValue::Number(position));
        self.handle.dispatch_event(MediaEvent::new("play"));
        self.handle.dispatch_event(MediaEvent::new("timeupdate"));
    }

    fn pause(&mut self) {
        self.state.insert(MediaProperty::Paused, MediaValue::Bool(true));
        self.handle.dispatch_event(MediaEvent::new("pause"));
    }

    fn can_play_type(&self, mime_type: &str) -> CanPlay {
        if self.accepts.contains(&mime_type) {
            CanPlay::Probably
        } else {
            CanPlay::No
        }
    }

    fn show(&mut self) {
        println!("  [{}] visible", self.label);
    }

    fn hide(&mut self) {
        println!("  [{}] hidden", self.label);
    }

    fn set_size(&mut self, width: u32, height: u32) {
        println!("  [{}] resized to {}x{}", self.label, width, height);
    }
}

struct SimulatedFactory {
    name: &'static str,
    accepts: &'static [&'static str],
}

impl RendererFactory for SimulatedFactory {
    fn name(&self) -> &str {
        self.name
    }

    fn can_play_type(&self, mime_type: &str) -> CanPlay {
        if self.accepts.contains(&mime_type) {
            CanPlay::Probably
        } else {
            CanPlay::No
        }
    }

    fn options(&self) -> RendererOptions {
        let mut defaults = RendererOptions::new();
        defaults.insert("renderer".into(), serde_json::json!(self.name));
        defaults
    }

    fn create(
        &self,
        handle: MediaHandle,
        options: RendererOptions,
        sources: &[MediaSource],
    ) -> core_media::Result<Box<dyn Renderer>> {
        println!(
            "  [{}] created with pluginPath={:?}",
            self.name,
            options.get("pluginPath")
        );

        let mut state = HashMap::new();
        state.insert(MediaProperty::Paused, MediaValue::Bool(true));
        state.insert(MediaProperty::Volume, MediaValue::Number(1.0));
        if let Some(first) = sources.first() {
            state.insert(MediaProperty::Src, MediaValue::from(first.src.as_str()));
        }

        Ok(Box::new(SimulatedRenderer {
            label: self.name,
            handle,
            state,
            accepts: self.accepts,
        }))
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))?;

    let registry = Arc::new(RendererRegistry::new());
    registry.register(Arc::new(SimulatedFactory {
        name: "html5",
        accepts: &["video/mp4", "video/webm", "audio/mp3"],
    }))?;
    registry.register(Arc::new(SimulatedFactory {
        name: "youtube",
        accepts: &["video/youtube"],
    }))?;

    let document = Arc::new(MemoryDocument::new(Some("http://localhost/demo/index.html")));
    document.append_to_body(
        MemoryNode::element("video")
            .with_id("player1")
            .with_child(
                MemoryNode::element("source")
                    .with_attribute("src", "media/intro.webm")
                    .with_attribute("type", "video/webm"),
            ),
    );

    let options = MediaElementOptions::new()
        .with_plugin_path("/assets/")
        .with_success(|element, _original| {
            println!("ready: {} using {:?}", element.id(), element.renderer_name());
        });

    println!("== construct");
    let mut element = MediaElement::new("player1", document.clone(), registry, options)?;
    println!("{}", document.body().to_markup());

    for event_type in ["play", "pause", "timeupdate", "volumechange", "error"] {
        element.add_event_listener(
            event_type,
            listener(|event| println!("  event: {}", event)),
        );
    }

    println!("== play");
    element.play();
    element.play();
    element.set_volume(0.5);
    println!("  currentTime={:?} volume={:?}", element.current_time(), element.volume());

    println!("== switch to embedded player");
    element.set_src(vec![MediaSource::new("https://youtu.be/demo", "video/youtube")]);
    element.set_size(640, 360);
    element.play();

    println!("== back to native");
    element.set_src("media/outro.mp4");
    println!("  src={:?} paused={:?}", element.src(), element.paused());

    println!("== unsupported media");
    element.set_src("media/clip.flv");
    println!("  still using {:?}", element.renderer_name());

    Ok(())
}
