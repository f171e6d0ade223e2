//! # Renderer Contract
//!
//! A renderer is a pluggable playback backend (native HTML5 media, an
//! embedded third-party player, a streaming library...). It is registered
//! once as a [`RendererFactory`] and instantiated lazily by each
//! [`MediaElement`](crate::MediaElement) that needs it.
//!
//! ## Lifecycle
//!
//! ```text
//!   factory.create(handle, options, sources)
//!        │
//!        ▼
//!   show() ──► get/set/play/pause ... ──► pause() ─► stop() ─► hide()
//!        ▲                                                        │
//!        └──────────────── show() + set_src() on reuse ───────────┘
//! ```
//!
//! A renderer instance is owned by a single element and never dropped while
//! the element lives: switching away hides it, switching back reuses it.
//!
//! ## Events
//!
//! Renderers report playback events through the [`MediaHandle`] they receive
//! at construction. Events go through the element's event target, so element
//! listeners observe them exactly like events raised by the element itself.

use bridge_traits::{EventTarget, HostNode, MediaEvent, PlatformSend, PlatformSendSync};
use std::fmt;
use std::sync::Arc;

use crate::capability::{CanPlay, MediaProperty, MediaValue};
use crate::error::Result;
use crate::source::MediaSource;

/// Free-form renderer options: the element's options merged with the
/// renderer's declared defaults.
pub type RendererOptions = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Renderer Instance
// ============================================================================

/// A live renderer bound to one media element.
///
/// Property reads of unsupported properties return [`MediaValue::Null`];
/// writes to them are ignored.
pub trait Renderer: PlatformSend {
    /// Read a property.
    fn get(&self, property: MediaProperty) -> MediaValue;

    /// Write a settable property. `src` is never routed here; see
    /// [`Renderer::set_src`].
    fn set(&mut self, property: MediaProperty, value: MediaValue);

    /// Point the renderer at a new media URL.
    fn set_src(&mut self, url: &str);

    fn load(&mut self);

    fn play(&mut self);

    fn pause(&mut self);

    /// Stop playback entirely. Optional; defaults to a no-op.
    fn stop(&mut self) {}

    fn can_play_type(&self, mime_type: &str) -> CanPlay;

    /// Make the renderer's presentation visible.
    fn show(&mut self);

    /// Hide the renderer's presentation.
    fn hide(&mut self);

    fn set_size(&mut self, width: u32, height: u32);
}

// ============================================================================
// Renderer Factory
// ============================================================================

/// A registered renderer type.
///
/// # Example
///
/// ```rust,ignore
/// struct Html5Factory;
///
/// impl RendererFactory for Html5Factory {
///     fn name(&self) -> &str {
///         "html5"
///     }
///
///     fn can_play_type(&self, mime_type: &str) -> CanPlay {
///         if mime_type.starts_with("video/") { CanPlay::Maybe } else { CanPlay::No }
///     }
///
///     fn create(
///         &self,
///         handle: MediaHandle,
///         options: RendererOptions,
///         sources: &[MediaSource],
///     ) -> Result<Box<dyn Renderer>> {
///         Ok(Box::new(Html5Renderer::new(handle, options, sources)))
///     }
/// }
/// ```
pub trait RendererFactory: PlatformSendSync {
    /// Unique registry name.
    fn name(&self) -> &str;

    /// Static capability probe used during renderer selection.
    fn can_play_type(&self, mime_type: &str) -> CanPlay;

    /// Declared default options. These take precedence over element options
    /// with the same key.
    fn options(&self) -> RendererOptions {
        RendererOptions::new()
    }

    /// Construct a renderer for the element behind `handle`.
    ///
    /// `sources` holds the selected source first, followed by the remaining
    /// candidates in order.
    fn create(
        &self,
        handle: MediaHandle,
        options: RendererOptions,
        sources: &[MediaSource],
    ) -> Result<Box<dyn Renderer>>;
}

// ============================================================================
// Media Handle
// ============================================================================

/// What a renderer knows about the element that owns it.
#[derive(Clone)]
pub struct MediaHandle {
    id: String,
    events: Arc<dyn EventTarget>,
    wrapper: Option<Arc<dyn HostNode>>,
    original: Option<Arc<dyn HostNode>>,
}

impl MediaHandle {
    pub fn new(id: impl Into<String>, events: Arc<dyn EventTarget>) -> Self {
        Self {
            id: id.into(),
            events,
            wrapper: None,
            original: None,
        }
    }

    pub fn with_nodes(
        mut self,
        wrapper: Option<Arc<dyn HostNode>>,
        original: Option<Arc<dyn HostNode>>,
    ) -> Self {
        self.wrapper = wrapper;
        self.original = original;
        self
    }

    /// Id of the owning element.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wrapper node the renderer may render into.
    pub fn wrapper(&self) -> Option<&Arc<dyn HostNode>> {
        self.wrapper.as_ref()
    }

    /// The host element the owning element was built around.
    pub fn original_node(&self) -> Option<&Arc<dyn HostNode>> {
        self.original.as_ref()
    }

    /// Dispatch `event` to the element's listeners, tagged with the element id.
    pub fn dispatch_event(&self, event: MediaEvent) {
        let event = match event.target {
            Some(_) => event,
            None => event.with_target(self.id.clone()),
        };
        self.events.dispatch_event(&event);
    }
}

impl fmt::Debug for MediaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaHandle")
            .field("id", &self.id)
            .field("has_wrapper", &self.wrapper.is_some())
            .field("has_original", &self.original.is_some())
            .finish()
    }
}
