//! Workspace placeholder crate.
//!
//! This crate exposes shared feature flags that map to the individual
//! workspace crates (`core-media`, `bridge-headless`). Host applications can
//! depend on `mediaproxy-workspace` and enable the documented features without
//! wiring each crate individually.

#[cfg(feature = "headless")]
pub use bridge_headless as headless;

#[cfg(feature = "headless")]
pub use core_media as media;
