//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the media layer:
//! - Logging and tracing infrastructure
//! - Event dispatch (native or emulated event targets)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other modules depend on.
//! It establishes the logging conventions and the synchronous event delivery
//! used by every media element.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
pub use events::{select_event_target, EmulatedEventTarget, EventStrategy};
