//! # cinder_engine - The Host Frame Loop
//!
//! Owns the per-iteration ordering contract between platform, hot-reload
//! controller, gameplay module and renderer:
//!
//! 1. hot-reload check
//! 2. platform event pump (non-blocking)
//! 3. gameplay `update` on the persistent-arena structs
//! 4. render submission (consumes and clears the draw list)
//! 5. buffer swap
//! 6. transient arena reset
//!
//! Window/GPU specifics stay behind the [`Platform`] and [`Renderer`]
//! traits; the host binary provides them.

pub mod config;
pub mod context;
pub mod error;
pub mod frame;

pub use config::RuntimeConfig;
pub use context::EngineContext;
pub use error::{EngineError, Result};
pub use frame::{FrameLoop, Platform, Renderer};
