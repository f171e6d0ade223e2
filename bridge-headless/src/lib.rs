//! # Headless Bridge Implementations
//!
//! In-memory implementations of the host bridge traits, for tests, tooling
//! and non-browser hosts.
//!
//! ## Overview
//!
//! - `HostDocument` as [`MemoryDocument`]: a node tree rooted at `<body>`
//!   with a configurable document location
//! - `HostNode` as [`MemoryNode`]: cheap-to-clone element handles with
//!   attributes, children and an optional native event target
//! - `LoggerSink` as [`MemoryLoggerSink`]: captures forwarded log entries
//!
//! ## Usage
//!
//! ```rust
//! use bridge_headless::{MemoryDocument, MemoryNode};
//! use bridge_traits::HostDocument;
//!
//! let document = MemoryDocument::new(Some("http://localhost/index.html"));
//! document.append_to_body(
//!     MemoryNode::element("video")
//!         .with_id("player1")
//!         .with_child(MemoryNode::element("source").with_attribute("src", "movie.mp4")),
//! );
//!
//! assert!(document.get_element_by_id("player1").is_some());
//! ```

mod document;
mod logger;
mod node;

pub use document::MemoryDocument;
pub use logger::MemoryLoggerSink;
pub use node::MemoryNode;
