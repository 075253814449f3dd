//! Error types for module loading and hot reload

use std::path::PathBuf;
use thiserror::Error;

/// Result type for module operations
pub type Result<T> = std::result::Result<T, ModuleError>;

/// Errors from loading, resolving or copying a gameplay module.
///
/// All of these are fatal to the host: a module that cannot be loaded or
/// lacks its entry point is a build defect, not a runtime condition. The
/// one retryable failure mode, a shadow copy racing an in-progress build,
/// is handled inside the controller and never surfaces here.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Failed to load the dynamic module
    #[error("failed to load module '{path}': {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Module does not export the required symbol
    #[error("symbol '{symbol}' not found in module '{path}': {message}")]
    SymbolNotFound {
        path: PathBuf,
        symbol: String,
        message: String,
    },
}

impl ModuleError {
    pub fn load_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ModuleError::LoadFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn symbol_not_found(
        path: impl Into<PathBuf>,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ModuleError::SymbolNotFound {
            path: path.into(),
            symbol: symbol.into(),
            message: message.into(),
        }
    }
}
