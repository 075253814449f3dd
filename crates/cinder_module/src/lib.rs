//! # cinder_module - Gameplay Module Loading & Hot Reload
//!
//! Keeps the gameplay module's code current without tearing down host-owned
//! state. The controller polls the build artifact's modification time every
//! frame; on change it unloads the old module, copies the artifact to a
//! shadow path (so the build toolchain can keep rewriting the original),
//! loads the shadow copy and rebinds the `update` entry point.
//!
//! Dynamic loading itself sits behind the [`ModuleBackend`] capability
//! trait; the state machine in [`reload`] is OS-agnostic.

pub mod backend;
pub mod error;
pub mod fs;
pub mod reload;

pub use backend::{DynLibBackend, ModuleBackend};
pub use error::{ModuleError, Result};
pub use reload::{HotReload, ReloadState};
