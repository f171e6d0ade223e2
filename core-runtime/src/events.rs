//! # Event Dispatch
//!
//! Provides the in-memory event target used when the host element does not
//! expose a native `addEventListener`/`dispatchEvent` contract, and the
//! strategy that picks between the two once, at element construction.
//!
//! ## Overview
//!
//! The emulated target is a synchronous publish/subscribe table:
//!
//! ```text
//!  add_event_listener("play", cb1)      ┌──────────────────────────┐
//!  add_event_listener("play", cb2) ────>│ "play"  -> [cb1, cb2]    │
//!  add_event_listener("ended", cb3)     │ "ended" -> [cb3]         │
//!                                       └────────────┬─────────────┘
//!  dispatch_event({type: "play"}) ───────────────────┴──> cb1(event); cb2(event)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::{listener, EventTarget, MediaEvent};
//! use core_runtime::events::EmulatedEventTarget;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let target = EmulatedEventTarget::new();
//! let count = Arc::new(AtomicUsize::new(0));
//! let seen = Arc::clone(&count);
//!
//! target.add_event_listener("play", listener(move |_| {
//!     seen.fetch_add(1, Ordering::SeqCst);
//! }));
//! target.dispatch_event(&MediaEvent::new("play"));
//!
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//! ```
//!
//! ## Reentrancy
//!
//! Each dispatch round iterates over a snapshot of the listener list taken
//! before the first callback runs. Listeners may add or remove listeners;
//! the changes apply from the next dispatch onward.

use bridge_traits::{EventTarget, HostNode, Listener, MediaEvent};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

// ============================================================================
// Emulated Event Target
// ============================================================================

/// In-memory event target for hosts without a native event contract.
#[derive(Default)]
pub struct EmulatedEventTarget {
    listeners: Mutex<HashMap<String, Vec<Listener>>>,
}

impl EmulatedEventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listeners registered for `event_type`.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .lock()
            .get(event_type)
            .map_or(0, |callbacks| callbacks.len())
    }

    /// Total number of listeners across every event type.
    pub fn total_listeners(&self) -> usize {
        self.listeners.lock().values().map(Vec::len).sum()
    }
}

impl EventTarget for EmulatedEventTarget {
    fn add_event_listener(&self, event_type: &str, listener: Listener) {
        self.listeners
            .lock()
            .entry(event_type.to_string())
            .or_default()
            .push(listener);
    }

    fn remove_event_listener(
        &self,
        event_type: Option<&str>,
        listener: Option<&Listener>,
    ) -> bool {
        let mut listeners = self.listeners.lock();

        let Some(event_type) = event_type else {
            listeners.clear();
            return true;
        };

        let Some(callbacks) = listeners.get_mut(event_type) else {
            return true;
        };

        let Some(listener) = listener else {
            callbacks.clear();
            return true;
        };

        match callbacks.iter().position(|cb| Arc::ptr_eq(cb, listener)) {
            Some(index) => {
                callbacks.remove(index);
                true
            }
            None => false,
        }
    }

    fn dispatch_event(&self, event: &MediaEvent) {
        let snapshot = match self.listeners.lock().get(&event.event_type) {
            Some(callbacks) => callbacks.clone(),
            None => return,
        };

        trace!(
            event = %event.event_type,
            listeners = snapshot.len(),
            "Dispatching emulated event"
        );

        for callback in snapshot {
            callback(event);
        }
    }
}

impl fmt::Debug for EmulatedEventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.lock();
        let mut types: Vec<_> = listeners.keys().cloned().collect();
        types.sort();
        f.debug_struct("EmulatedEventTarget")
            .field("event_types", &types)
            .finish()
    }
}

// ============================================================================
// Dispatch Strategy
// ============================================================================

/// How an element delivers its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStrategy {
    /// Use the host's native contract when present, otherwise emulate.
    #[default]
    Auto,
    /// Require the host's native contract; falls back to emulation with a
    /// warning when the host has none.
    Native,
    /// Always use the in-memory target, even if the host has a native one.
    Emulated,
}

/// Pick the event target for an element wrapped around `host`.
///
/// Returns the strategy actually applied (never `Auto`) alongside the target.
pub fn select_event_target(
    strategy: EventStrategy,
    host: Option<&Arc<dyn HostNode>>,
) -> (EventStrategy, Arc<dyn EventTarget>) {
    let native = match strategy {
        EventStrategy::Emulated => None,
        EventStrategy::Auto | EventStrategy::Native => host.and_then(|node| node.event_target()),
    };

    match native {
        Some(target) => {
            debug!("Using native host event target");
            (EventStrategy::Native, target)
        }
        None => {
            if strategy == EventStrategy::Native {
                warn!("Native event dispatch requested but the host provides none; emulating");
            }
            (
                EventStrategy::Emulated,
                Arc::new(EmulatedEventTarget::new()),
            )
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
