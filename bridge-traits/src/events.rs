//! Media event types and the host event-target contract.
//!
//! Browsers expose `addEventListener`/`removeEventListener`/`dispatchEvent` on
//! every element. Hosts that provide such a contract surface it through
//! [`HostNode::event_target`](crate::host::HostNode::event_target); hosts that
//! do not are served by the emulated target in `core-runtime`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::platform::PlatformSendSync;

/// A media event delivered to listeners.
///
/// Mirrors the subset of the DOM `Event` interface the media layer relies on:
/// a type name, an optional human-readable message (set on `error` events),
/// the id of the element that dispatched it, and an optional structured detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEvent {
    /// Event type (e.g., `"timeupdate"`, `"error"`).
    #[serde(rename = "type")]
    pub event_type: String,
    /// Descriptive message, present on core-raised `error` events.
    pub message: Option<String>,
    /// Id of the element the event was dispatched through.
    pub target: Option<String>,
    /// Renderer-specific payload.
    pub detail: Option<serde_json::Value>,
}

impl MediaEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            message: None,
            target: None,
            detail: None,
        }
    }

    /// Build an `error` event carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error").with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn is_error(&self) -> bool {
        self.event_type == "error"
    }
}

impl fmt::Display for MediaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.event_type, message),
            None => f.write_str(&self.event_type),
        }
    }
}

/// Event callback. Listeners are compared by pointer identity on removal.
#[cfg(not(target_arch = "wasm32"))]
pub type Listener = Arc<dyn Fn(&MediaEvent) + Send + Sync>;

#[cfg(target_arch = "wasm32")]
pub type Listener = Arc<dyn Fn(&MediaEvent)>;

/// Wrap a closure as a [`Listener`].
#[cfg(not(target_arch = "wasm32"))]
pub fn listener<F>(callback: F) -> Listener
where
    F: Fn(&MediaEvent) + Send + Sync + 'static,
{
    Arc::new(callback)
}

#[cfg(target_arch = "wasm32")]
pub fn listener<F>(callback: F) -> Listener
where
    F: Fn(&MediaEvent) + 'static,
{
    Arc::new(callback)
}

/// Event-target contract (`addEventListener` and friends).
///
/// Delivery is synchronous: `dispatch_event` returns after every listener
/// registered for the event type has run, in registration order.
pub trait EventTarget: PlatformSendSync {
    /// Append `listener` to the callbacks for `event_type`.
    fn add_event_listener(&self, event_type: &str, listener: Listener);

    /// Remove listeners.
    ///
    /// - `(None, _)` removes every listener for every type.
    /// - `(Some(type), None)` removes every listener for `type`.
    /// - `(Some(type), Some(listener))` removes that listener only.
    ///
    /// Returns `false` only when a specific listener was requested and not found.
    fn remove_event_listener(&self, event_type: Option<&str>, listener: Option<&Listener>)
        -> bool;

    /// Deliver `event` to the listeners registered for `event.event_type`.
    fn dispatch_event(&self, event: &MediaEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_event_builder() {
        let event = MediaEvent::error("No renderer found").with_target("player1");

        assert!(event.is_error());
        assert_eq!(event.message.as_deref(), Some("No renderer found"));
        assert_eq!(event.target.as_deref(), Some("player1"));
        assert_eq!(event.to_string(), "error: No renderer found");
    }

    #[test]
    fn event_serializes_type_field() {
        let event = MediaEvent::new("timeupdate");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "timeupdate");
        assert!(json["message"].is_null());
    }

    #[test]
    fn listener_identity() {
        let a = listener(|_| {});
        let b = listener(|_| {});
        let a2 = Arc::clone(&a);

        assert!(Arc::ptr_eq(&a, &a2));
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
