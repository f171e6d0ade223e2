//! Shared renderer fixtures.

#![allow(dead_code)]

use core_media::{
    CanPlay, MediaError, MediaHandle, MediaProperty, MediaSource, MediaValue, Renderer,
    RendererFactory, RendererOptions, Result,
};
use bridge_traits::MediaEvent;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Factory that records every construction and every call made on the
/// renderers it builds.
pub struct RecordingFactory {
    name: String,
    types: Vec<(String, CanPlay)>,
    defaults: RendererOptions,
    fail: bool,
    created: AtomicUsize,
    calls: CallLog,
    last_options: Mutex<Option<RendererOptions>>,
    last_sources: Mutex<Vec<MediaSource>>,
}

impl RecordingFactory {
    /// Answers `maybe` for every type in `types`.
    pub fn new(name: &str, types: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            types: types
                .iter()
                .map(|t| (t.to_string(), CanPlay::Maybe))
                .collect(),
            defaults: RendererOptions::new(),
            fail: false,
            created: AtomicUsize::new(0),
            calls: Arc::new(Mutex::new(Vec::new())),
            last_options: Mutex::new(None),
            last_sources: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn with_default(mut self, key: &str, value: serde_json::Value) -> Self {
        self.defaults.insert(key.to_string(), value);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn last_options(&self) -> Option<RendererOptions> {
        self.last_options.lock().clone()
    }

    pub fn last_sources(&self) -> Vec<MediaSource> {
        self.last_sources.lock().clone()
    }
}

impl RendererFactory for RecordingFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_play_type(&self, mime_type: &str) -> CanPlay {
        self.types
            .iter()
            .find(|(t, _)| t == mime_type)
            .map(|(_, answer)| *answer)
            .unwrap_or(CanPlay::No)
    }

    fn options(&self) -> RendererOptions {
        self.defaults.clone()
    }

    fn create(
        &self,
        handle: MediaHandle,
        options: RendererOptions,
        sources: &[MediaSource],
    ) -> Result<Box<dyn Renderer>> {
        *self.last_options.lock() = Some(options);
        *self.last_sources.lock() = sources.to_vec();

        if self.fail {
            return Err(MediaError::creation(&self.name, "backend unavailable"));
        }

        self.created.fetch_add(1, Ordering::SeqCst);
        let mut state = HashMap::new();
        if let Some(first) = sources.first() {
            state.insert(MediaProperty::Src, MediaValue::from(first.src.as_str()));
            state.insert(MediaProperty::CurrentSrc, MediaValue::from(first.src.as_str()));
        }
        state.insert(MediaProperty::Paused, MediaValue::Bool(true));

        Ok(Box::new(RecordingRenderer {
            types: self.types.clone(),
            calls: Arc::clone(&self.calls),
            state: Mutex::new(state),
            handle,
        }))
    }
}

/// Renderer that stores property writes and logs every call.
pub struct RecordingRenderer {
    types: Vec<(String, CanPlay)>,
    calls: CallLog,
    state: Mutex<HashMap<MediaProperty, MediaValue>>,
    handle: MediaHandle,
}

impl RecordingRenderer {
    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

impl Renderer for RecordingRenderer {
    fn get(&self, property: MediaProperty) -> MediaValue {
        self.record(format!("get {}", property));
        self.state
            .lock()
            .get(&property)
            .cloned()
            .unwrap_or_default()
    }

    fn set(&mut self, property: MediaProperty, value: MediaValue) {
        self.record(format!("set {}", property));
        self.state.lock().insert(property, value);
    }

    fn set_src(&mut self, url: &str) {
        self.record(format!("set_src {}", url));
        let mut state = self.state.lock();
        state.insert(MediaProperty::Src, MediaValue::from(url));
        state.insert(MediaProperty::CurrentSrc, MediaValue::from(url));
    }

    fn load(&mut self) {
        self.record("load".to_string());
        self.handle.dispatch_event(MediaEvent::new("loadstart"));
    }

    fn play(&mut self) {
        self.record("play".to_string());
        self.state
            .lock()
            .insert(MediaProperty::Paused, MediaValue::Bool(false));
        self.handle.dispatch_event(MediaEvent::new("play"));
    }

    fn pause(&mut self) {
        self.record("pause".to_string());
        self.state
            .lock()
            .insert(MediaProperty::Paused, MediaValue::Bool(true));
        self.handle.dispatch_event(MediaEvent::new("pause"));
    }

    fn stop(&mut self) {
        self.record("stop".to_string());
    }

    fn can_play_type(&self, mime_type: &str) -> CanPlay {
        self.types
            .iter()
            .find(|(t, _)| t == mime_type)
            .map(|(_, answer)| *answer)
            .unwrap_or(CanPlay::No)
    }

    fn show(&mut self) {
        self.record("show".to_string());
    }

    fn hide(&mut self) {
        self.record("hide".to_string());
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.record(format!("set_size {}x{}", width, height));
    }
}

/// Collect every event of the given types dispatched through `element`.
pub fn capture(
    element: &core_media::MediaElement,
    event_types: &[&str],
) -> Arc<Mutex<Vec<MediaEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    for event_type in event_types {
        let sink = Arc::clone(&seen);
        element.add_event_listener(
            event_type,
            bridge_traits::listener(move |event: &MediaEvent| sink.lock().push(event.clone())),
        );
    }
    seen
}
