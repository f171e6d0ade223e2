//! Thread-safety markers for host-facing traits.
//!
//! Native hosts share documents, renderers and listeners behind `Arc`, so the
//! traits in this crate require `Send + Sync` there. A `wasm32` host wraps
//! browser objects that are neither, and the markers carry no bound.

#[cfg(not(target_arch = "wasm32"))]
mod bounds {
    /// `Send + Sync` outside `wasm32`.
    pub trait PlatformSendSync: Send + Sync {}
    impl<T: Send + Sync> PlatformSendSync for T {}

    /// `Send` outside `wasm32`. Renderers only need to move between threads.
    pub trait PlatformSend: Send {}
    impl<T: Send> PlatformSend for T {}
}

#[cfg(target_arch = "wasm32")]
mod bounds {
    pub trait PlatformSendSync {}
    impl<T> PlatformSendSync for T {}

    pub trait PlatformSend {}
    impl<T> PlatformSend for T {}
}

pub use bounds::{PlatformSend, PlatformSendSync};
