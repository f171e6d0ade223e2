//! # Media Element Core
//!
//! A renderer-agnostic media element: one object exposing the HTML5 media
//! API whose behaviour is supplied by interchangeable playback backends.
//!
//! ## Overview
//!
//! This crate handles:
//! - The capability descriptor (properties, methods, events, media types)
//! - A registry of renderer types and source-based renderer selection
//! - Source normalization and MIME type inference
//! - The [`MediaElement`] proxy that wraps a host node, forwards the media
//!   API to the active renderer and switches renderers on `src` changes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_media::{MediaElement, MediaElementOptions, RendererRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(RendererRegistry::new());
//! registry.register(Arc::new(Html5Factory))?;
//!
//! let mut element = MediaElement::new("player1", document, registry, MediaElementOptions::default())?;
//! element.set_src("movie.mp4");
//! element.play();
//! ```

pub mod capability;
pub mod config;
pub mod element;
pub mod error;
pub mod registry;
pub mod renderer;
pub mod source;

pub use capability::{
    Access, CanPlay, MediaMethod, MediaProperty, MediaValue, PropertyDescriptor, TimeRange,
    EVENTS, MEDIA_TYPES, METHODS, PROPERTIES,
};
pub use config::{MediaElementOptions, SuccessCallback};
pub use element::{HostTarget, MediaElement, ERROR_CREATING_RENDERER, NO_RENDERER_FOUND};
pub use error::{MediaError, Result};
pub use registry::{RendererMatch, RendererRegistry};
pub use renderer::{MediaHandle, Renderer, RendererFactory, RendererOptions};
pub use core_runtime::EventStrategy;
pub use source::{format_type, infer_type, MediaSource, SourceInput, SourceResolver};
