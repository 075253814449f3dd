//! Engine error types

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Fatal engine failures. Everything here halts the process with a
/// diagnostic; transient conditions are absorbed lower down.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Module load/resolve failure out of the hot-reload controller
    #[error(transparent)]
    Module(#[from] cinder_module::ModuleError),

    /// Platform window/surface creation failure
    #[error("platform error: {0}")]
    Platform(String),
}
