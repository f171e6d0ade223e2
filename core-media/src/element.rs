//! # Media Element
//!
//! A media element stands in for a host `<video>`, `<audio>` or `<iframe>`
//! and forwards the media API to whichever renderer is currently active.
//!
//! ## Construction
//!
//! ```text
//!  before:                       after:
//!  <div>                         <div>
//!    <video id="player1">          <mediaelementwrapper id="player1">
//!      <source src="a.mp4">          <video id="player1_from_mejs">
//!    </video>                          <source src="a.mp4">
//!  </div>                            </video>
//!                                  </mediaelementwrapper>
//!                                </div>
//! ```
//!
//! The element then discovers sources from the host node, selects a
//! renderer for them, and finally runs the `success` callback.
//!
//! ## Renderer Switching
//!
//! - Same renderer: shown again and pointed at the new first source.
//! - Different renderer: the current one is paused, stopped and hidden; the
//!   target is reused if this element created it before, otherwise built
//!   from the registry.
//!
//! Renderer instances live as long as the element.
//!
//! ## Errors
//!
//! Selection and construction failures during `src` assignment do not fail
//! the call. They are reported as `error` events with the messages
//! [`NO_RENDERER_FOUND`] and [`ERROR_CREATING_RENDERER`].

use bridge_traits::{EventTarget, HostDocument, HostNode, Listener, MediaEvent};
use core_runtime::logging::redact_url;
use core_runtime::{select_event_target, EventStrategy};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::capability::{Access, CanPlay, MediaProperty, MediaValue};
use crate::config::MediaElementOptions;
use crate::error::{MediaError, Result};
use crate::registry::RendererRegistry;
use crate::renderer::{MediaHandle, Renderer};
use crate::source::{format_type, MediaSource, SourceInput, SourceResolver};

/// Message of the `error` event raised when no renderer accepts any source.
pub const NO_RENDERER_FOUND: &str = "No renderer found";

/// Message of the `error` event raised when the selected renderer could not
/// be activated.
pub const ERROR_CREATING_RENDERER: &str = "Error creating renderer";

/// Suffix appended to the host element's id once it has been wrapped.
pub const ORIGINAL_ID_SUFFIX: &str = "_from_mejs";

/// The host element an element is built around.
#[derive(Clone)]
pub enum HostTarget {
    /// Looked up with [`HostDocument::get_element_by_id`].
    Id(String),
    Node(Arc<dyn HostNode>),
}

impl From<&str> for HostTarget {
    fn from(id: &str) -> Self {
        HostTarget::Id(id.to_string())
    }
}

impl From<String> for HostTarget {
    fn from(id: String) -> Self {
        HostTarget::Id(id)
    }
}

impl From<Arc<dyn HostNode>> for HostTarget {
    fn from(node: Arc<dyn HostNode>) -> Self {
        HostTarget::Node(node)
    }
}

/// Renderer-agnostic media element.
pub struct MediaElement {
    id: String,
    options: MediaElementOptions,
    registry: Arc<RendererRegistry>,
    wrapper: Option<Arc<dyn HostNode>>,
    original_node: Option<Arc<dyn HostNode>>,
    events: Arc<dyn EventTarget>,
    event_strategy: EventStrategy,
    resolver: SourceResolver,
    renderers: HashMap<String, Box<dyn Renderer>>,
    active: Option<String>,
}

impl MediaElement {
    /// Build an element around `target` in `document`.
    ///
    /// A target id that does not resolve is logged and the element is built
    /// unwrapped under that id.
    ///
    /// # Errors
    ///
    /// - [`MediaError::InvalidConfig`] if `options` fail validation
    /// - [`MediaError::Bridge`] if the document rejects a node operation
    #[instrument(skip_all, name = "media_element_new")]
    pub fn new(
        target: impl Into<HostTarget>,
        document: Arc<dyn HostDocument>,
        registry: Arc<RendererRegistry>,
        options: MediaElementOptions,
    ) -> Result<Self> {
        options.validate()?;

        let (requested_id, original_node) = match target.into() {
            HostTarget::Node(node) => (None, Some(node)),
            HostTarget::Id(id) => {
                let node = document.get_element_by_id(&id);
                if node.is_none() {
                    warn!(id = %id, "Host element not found; building an unwrapped element");
                }
                (Some(id), node)
            }
        };

        let id = original_node
            .as_ref()
            .and_then(|node| node.id())
            .filter(|id| !id.is_empty())
            .or_else(|| requested_id.filter(|id| !id.is_empty()))
            .unwrap_or_else(generate_id);

        let wrapper = document.create_element(&options.fake_node_name)?;
        if let Some(original) = &original_node {
            original.set_id(&format!("{}{}", id, ORIGINAL_ID_SUFFIX));
            if original.parent().is_some() {
                document.insert_before(&wrapper, original)?;
            }
            document.append_child(&wrapper, original)?;
        }
        wrapper.set_id(&id);

        let resolver = SourceResolver::new(document.location().as_deref());
        let element = Self::assemble(id, options, registry, Some(wrapper), original_node, resolver);
        Ok(element.start())
    }

    /// Build an element with no host document.
    ///
    /// Events are always emulated and relative URLs are left as given.
    pub fn detached(registry: Arc<RendererRegistry>, options: MediaElementOptions) -> Result<Self> {
        options.validate()?;
        let element = Self::assemble(
            generate_id(),
            options,
            registry,
            None,
            None,
            SourceResolver::default(),
        );
        Ok(element.start())
    }

    fn assemble(
        id: String,
        options: MediaElementOptions,
        registry: Arc<RendererRegistry>,
        wrapper: Option<Arc<dyn HostNode>>,
        original_node: Option<Arc<dyn HostNode>>,
        resolver: SourceResolver,
    ) -> Self {
        let (event_strategy, events) = select_event_target(options.event_strategy, wrapper.as_ref());

        info!(
            element = %id,
            wrapped = original_node.is_some(),
            ?event_strategy,
            "Media element created"
        );

        Self {
            id,
            options,
            registry,
            wrapper,
            original_node,
            events,
            event_strategy,
            resolver,
            renderers: HashMap::new(),
            active: None,
        }
    }

    /// Initial source discovery, then the success callback.
    fn start(mut self) -> Self {
        let discovered = self.discover_sources();
        if !discovered.is_empty() {
            debug!(element = %self.id, count = discovered.len(), "Discovered host sources");
            self.set_src(SourceInput::List(discovered));
        }

        if let Some(callback) = self.options.success.clone() {
            let original = self.original_node.clone();
            callback(&mut self, original.as_ref());
        }

        self
    }

    fn discover_sources(&self) -> Vec<MediaSource> {
        let Some(node) = &self.original_node else {
            return Vec::new();
        };

        match node.node_name().to_ascii_lowercase().as_str() {
            "iframe" => node
                .attribute("src")
                .filter(|src| !src.is_empty())
                .map(|src| vec![MediaSource::new(src, "")])
                .unwrap_or_default(),
            "audio" | "video" => {
                let mut sources: Vec<MediaSource> = node
                    .children()
                    .iter()
                    .filter(|child| child.node_name().eq_ignore_ascii_case("source"))
                    .filter_map(|child| {
                        let src = child.attribute("src").filter(|src| !src.is_empty())?;
                        let mime_type = format_type(&src, child.attribute("type").as_deref());
                        Some(MediaSource::new(src, mime_type))
                    })
                    .collect();

                if sources.is_empty() {
                    if let Some(src) = node.attribute("src").filter(|src| !src.is_empty()) {
                        let mime_type = format_type(&src, node.attribute("type").as_deref());
                        sources.push(MediaSource::new(src, mime_type));
                    }
                }
                sources
            }
            _ => Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &MediaElementOptions {
        &self.options
    }

    /// Name of the active renderer.
    pub fn renderer_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Whether this element has ever instantiated renderer `name`.
    pub fn has_renderer(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// The host element this element was built around.
    pub fn original_node(&self) -> Option<&Arc<dyn HostNode>> {
        self.original_node.as_ref()
    }

    pub fn wrapper(&self) -> Option<&Arc<dyn HostNode>> {
        self.wrapper.as_ref()
    }

    /// The dispatch strategy in effect (never `Auto`).
    pub fn event_strategy(&self) -> EventStrategy {
        self.event_strategy
    }

    /// Handle given to renderers created by this element.
    pub fn handle(&self) -> MediaHandle {
        MediaHandle::new(self.id.clone(), Arc::clone(&self.events))
            .with_nodes(self.wrapper.clone(), self.original_node.clone())
    }

    fn active_renderer(&self) -> Option<&dyn Renderer> {
        let name = self.active.as_deref()?;
        self.renderers.get(name).map(|renderer| &**renderer)
    }

    fn active_renderer_mut(&mut self) -> Option<&mut Box<dyn Renderer>> {
        let name = self.active.as_deref()?;
        self.renderers.get_mut(name)
    }

    /// Renderer names this element may instantiate, in preference order.
    fn effective_renderers(&self) -> Vec<String> {
        if self.options.renderers.is_empty() {
            self.registry.order()
        } else {
            self.options.renderers.clone()
        }
    }

    // ========================================================================
    // Property Forwarding
    // ========================================================================

    /// Read `property` from the active renderer.
    ///
    /// Returns [`MediaValue::Null`] when no renderer is active.
    pub fn get(&self, property: MediaProperty) -> MediaValue {
        self.active_renderer()
            .map(|renderer| renderer.get(property))
            .unwrap_or_default()
    }

    /// Write `property` through the active renderer.
    ///
    /// `src` goes through [`set_src`](Self::set_src). Writes with no active
    /// renderer are dropped.
    ///
    /// # Errors
    ///
    /// - [`MediaError::ReadOnlyProperty`] for get-only properties
    /// - [`MediaError::InvalidSource`] for a `src` value that is neither text
    ///   nor a source list
    pub fn set(&mut self, property: MediaProperty, value: impl Into<MediaValue>) -> Result<()> {
        if property.access() == Access::ReadOnly {
            return Err(MediaError::ReadOnlyProperty(property.name()));
        }

        let value = value.into();
        if property == MediaProperty::Src {
            self.set_src(SourceInput::try_from(value)?);
            return Ok(());
        }

        match self.active_renderer_mut() {
            Some(renderer) => renderer.set(property, value),
            None => debug!(element = %self.id, %property, "No active renderer; dropping write"),
        }
        Ok(())
    }

    /// [`get`](Self::get) by DOM-style property name.
    pub fn get_by_name(&self, name: &str) -> Result<MediaValue> {
        let property =
            MediaProperty::from_name(name).ok_or_else(|| MediaError::UnknownProperty(name.to_string()))?;
        Ok(self.get(property))
    }

    /// [`set`](Self::set) by DOM-style property name.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<MediaValue>) -> Result<()> {
        let property =
            MediaProperty::from_name(name).ok_or_else(|| MediaError::UnknownProperty(name.to_string()))?;
        self.set(property, value)
    }

    // ========================================================================
    // Source Assignment
    // ========================================================================

    /// Current source as reported by the active renderer.
    pub fn src(&self) -> MediaValue {
        self.get(MediaProperty::Src)
    }

    /// Assign new media.
    ///
    /// Resolves `input`, selects a renderer and activates it with the chosen
    /// source followed by the remaining candidates. Failures are reported as
    /// `error` events.
    #[instrument(skip(self, input), fields(element = %self.id))]
    pub fn set_src(&mut self, input: impl Into<SourceInput>) {
        let sources = self.resolver.resolve(&input.into());

        let preference = self.effective_renderers();
        let Some(selection) = self.registry.select_for_sources(&sources, Some(preference.as_slice())) else {
            warn!(candidates = sources.len(), "No renderer can play the assigned sources");
            self.dispatch_error(NO_RENDERER_FOUND);
            return;
        };

        debug!(
            renderer = %selection.renderer_name,
            src = %redact_url(&selection.source.src),
            mime_type = %selection.source.mime_type,
            "Source selected"
        );

        self.change_renderer(&selection.renderer_name, &sources[selection.source_index..]);

        if self.active.is_none() {
            self.dispatch_error(ERROR_CREATING_RENDERER);
        }
    }

    // ========================================================================
    // Renderer Management
    // ========================================================================

    /// Make `name` the active renderer for `sources`.
    ///
    /// Returns `false` when `name` is not enabled for this element or could
    /// not be constructed. A renderer that is not enabled or not registered
    /// leaves the active one in place. No event is raised here;
    /// [`set_src`](Self::set_src) reports failures to listeners.
    #[instrument(skip(self, sources), fields(element = %self.id))]
    pub fn change_renderer(&mut self, name: &str, sources: &[MediaSource]) -> bool {
        let first_src = sources.first().map(|source| source.src.clone());

        if self.active.as_deref() == Some(name) {
            if let Some(renderer) = self.renderers.get_mut(name) {
                renderer.show();
                if let Some(src) = &first_src {
                    renderer.set_src(src);
                }
            }
            return true;
        }

        if self.renderers.contains_key(name) {
            self.deactivate();
            if let Some(renderer) = self.renderers.get_mut(name) {
                debug!(renderer = %name, "Reusing renderer");
                renderer.show();
                if let Some(src) = &first_src {
                    renderer.set_src(src);
                }
            }
            self.active = Some(name.to_string());
            return true;
        }

        // Misuse is rejected before the active renderer is touched.
        if !self.effective_renderers().iter().any(|enabled| enabled == name) {
            warn!(renderer = %name, "Renderer is not enabled for this element");
            return false;
        }

        let Some(factory) = self.registry.get(name) else {
            warn!(renderer = %name, "Renderer is not registered");
            return false;
        };

        let options = match self.options.merged_with(&factory.options()) {
            Ok(options) => options,
            Err(err) => {
                error!(renderer = %name, error = %err, "Failed to build renderer options");
                return false;
            }
        };

        self.deactivate();
        match factory.create(self.handle(), options, sources) {
            Ok(mut renderer) => {
                renderer.show();
                self.renderers.insert(name.to_string(), renderer);
                self.active = Some(name.to_string());
                info!(renderer = %name, "Renderer created");
                true
            }
            Err(err) => {
                error!(renderer = %name, error = %err, "Failed to create renderer");
                false
            }
        }
    }

    /// Pause, stop and hide the active renderer, leaving none active.
    fn deactivate(&mut self) {
        let Some(previous) = self.active.take() else {
            return;
        };
        if let Some(renderer) = self.renderers.get_mut(&previous) {
            debug!(renderer = %previous, "Deactivating renderer");
            renderer.pause();
            renderer.stop();
            renderer.hide();
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        if let Some(renderer) = self.active_renderer_mut() {
            renderer.set_size(width, height);
        }
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// Returns `None` when no renderer is active.
    pub fn load(&mut self) -> Option<()> {
        self.active_renderer_mut().map(|renderer| renderer.load())
    }

    /// Returns `None` when no renderer is active.
    pub fn play(&mut self) -> Option<()> {
        self.active_renderer_mut().map(|renderer| renderer.play())
    }

    /// Returns `None` when no renderer is active.
    pub fn pause(&mut self) -> Option<()> {
        self.active_renderer_mut().map(|renderer| renderer.pause())
    }

    /// Ask the active renderer about `mime_type`.
    pub fn can_play_type(&self, mime_type: &str) -> Option<CanPlay> {
        self.active_renderer()
            .map(|renderer| renderer.can_play_type(mime_type))
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn add_event_listener(&self, event_type: &str, listener: Listener) {
        self.events.add_event_listener(event_type, listener);
    }

    /// See [`EventTarget::remove_event_listener`].
    pub fn remove_event_listener(
        &self,
        event_type: Option<&str>,
        listener: Option<&Listener>,
    ) -> bool {
        self.events.remove_event_listener(event_type, listener)
    }

    /// Dispatch `event` to this element's listeners.
    pub fn dispatch_event(&self, event: MediaEvent) {
        let event = match event.target {
            Some(_) => event,
            None => event.with_target(self.id.clone()),
        };
        self.events.dispatch_event(&event);
    }

    fn dispatch_error(&self, message: &str) {
        self.dispatch_event(MediaEvent::error(message));
    }
}

// ============================================================================
// Typed Accessors
// ============================================================================

macro_rules! settable_properties {
    ($($getter:ident, $setter:ident => $property:ident;)*) => {
        impl MediaElement {
            $(
                pub fn $getter(&self) -> MediaValue {
                    self.get(MediaProperty::$property)
                }

                pub fn $setter(&mut self, value: impl Into<MediaValue>) {
                    if let Some(renderer) = self.active_renderer_mut() {
                        renderer.set(MediaProperty::$property, value.into());
                    }
                }
            )*
        }
    };
}

macro_rules! readonly_properties {
    ($($getter:ident => $property:ident;)*) => {
        impl MediaElement {
            $(
                pub fn $getter(&self) -> MediaValue {
                    self.get(MediaProperty::$property)
                }
            )*
        }
    };
}

settable_properties! {
    volume, set_volume => Volume;
    current_time, set_current_time => CurrentTime;
    muted, set_muted => Muted;
    preload, set_preload => Preload;
    default_playback_rate, set_default_playback_rate => DefaultPlaybackRate;
    playback_rate, set_playback_rate => PlaybackRate;
    autoplay, set_autoplay => Autoplay;
    looping, set_looping => Loop;
    controls, set_controls => Controls;
}

readonly_properties! {
    duration => Duration;
    paused => Paused;
    ended => Ended;
    error => Error;
    current_src => CurrentSrc;
    network_state => NetworkState;
    buffered => Buffered;
    buffered_bytes => BufferedBytes;
    buffered_time => BufferedTime;
    ready_state => ReadyState;
    seeking => Seeking;
    initial_time => InitialTime;
    start_offset_time => StartOffsetTime;
    played => Played;
    seekable => Seekable;
}

impl fmt::Debug for MediaElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut instantiated: Vec<_> = self.renderers.keys().collect();
        instantiated.sort();
        f.debug_struct("MediaElement")
            .field("id", &self.id)
            .field("active", &self.active)
            .field("renderers", &instantiated)
            .field("event_strategy", &self.event_strategy)
            .field("options", &self.options)
            .finish()
    }
}

fn generate_id() -> String {
    format!("mejs_{}", Uuid::new_v4().as_u128() % 10_000_000_000_000_000)
}
