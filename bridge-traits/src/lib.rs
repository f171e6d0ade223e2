//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host.
//!
//! ## Overview
//!
//! This crate defines the contract between the media layer and the page (or
//! page-like environment) it runs in. Each trait represents a capability the
//! core requires but that is implemented differently per host: a browser via
//! `web-sys`, a headless in-memory document for tests and tooling, or a
//! native UI toolkit embedding media views.
//!
//! ## Traits
//!
//! ### Document
//! - [`HostDocument`](host::HostDocument) - Element lookup, creation and re-parenting
//! - [`HostNode`](host::HostNode) - Attributes, children, optional native events
//!
//! ### Events
//! - [`EventTarget`](events::EventTarget) - `addEventListener`/`dispatchEvent` contract
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Fail-Fast Strategy
//!
//! Bridges report missing capabilities with [`BridgeError`](error::BridgeError)
//! instead of panicking:
//!
//! ```ignore
//! let node = document
//!     .get_element_by_id("player1")
//!     .ok_or_else(|| BridgeError::NodeNotFound("player1".to_string()))?;
//! ```
//!
//! ## Thread Safety
//!
//! Trait bounds go through [`PlatformSendSync`](platform::PlatformSendSync):
//! `Send + Sync` on native targets, no bound on `wasm32`.

pub mod error;
pub mod events;
pub mod host;
pub mod logging;
pub mod platform;

pub use error::BridgeError;

// Re-export commonly used types
pub use events::{listener, EventTarget, Listener, MediaEvent};
pub use host::{HostDocument, HostNode};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use platform::{PlatformSend, PlatformSendSync};
