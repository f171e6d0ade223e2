//! # Media Error Types
//!
//! Error types for renderer registration, element construction and property
//! forwarding.
//!
//! Most runtime failures of a media element are not returned as errors: they
//! are reported to listeners as `error` events, and the element stays usable.
//! [`MediaError`] covers the failures a caller can act on directly.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur in the media layer.
#[derive(Error, Debug)]
pub enum MediaError {
    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// A renderer with the same name is already registered.
    #[error("Renderer already registered: {0}")]
    DuplicateRenderer(String),

    /// The renderer descriptor is unusable (e.g., empty name).
    #[error("Invalid renderer: {0}")]
    InvalidRenderer(String),

    /// Renderer construction failed.
    #[error("Failed to create renderer {renderer}: {message}")]
    RendererCreation { renderer: String, message: String },

    // ========================================================================
    // Element Errors
    // ========================================================================
    /// Attempted to set a get-only property.
    #[error("Property is read-only: {0}")]
    ReadOnlyProperty(&'static str),

    /// No property with this name exists in the capability descriptor.
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// A value assigned to `src` was neither a URL nor a source list.
    #[error("Invalid source value: {0}")]
    InvalidSource(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Element options failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Options JSON could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ========================================================================
    // Host Errors
    // ========================================================================
    /// Host document operation failed.
    #[error("Host bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl MediaError {
    /// Create a [`MediaError::RendererCreation`] for `renderer`.
    pub fn creation(renderer: impl Into<String>, message: impl Into<String>) -> Self {
        MediaError::RendererCreation {
            renderer: renderer.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the error stems from invalid options or registration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            MediaError::InvalidConfig(_)
                | MediaError::Serialization(_)
                | MediaError::DuplicateRenderer(_)
                | MediaError::InvalidRenderer(_)
        )
    }

    /// Returns `true` if the error was raised by or about a renderer.
    pub fn is_renderer_error(&self) -> bool {
        matches!(
            self,
            MediaError::RendererCreation { .. }
                | MediaError::DuplicateRenderer(_)
                | MediaError::InvalidRenderer(_)
        )
    }
}

/// Result type for media operations.
pub type Result<T> = std::result::Result<T, MediaError>;
