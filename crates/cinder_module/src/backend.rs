//! Dynamic-loading capability
//!
//! The hot-reload state machine never touches the OS loader directly; it
//! goes through [`ModuleBackend`], which has one real implementation
//! ([`DynLibBackend`]) and fake ones in tests.

use crate::error::{ModuleError, Result};
use cinder_abi::UpdateFn;
use libloading::{Library, Symbol};
use std::path::Path;

/// Load/resolve/unload over the host OS's dynamic-loading facility.
///
/// The contract is identical on every target OS and requires no shared
/// state between calls beyond the handle itself.
pub trait ModuleBackend {
    /// Opaque handle to a loaded module.
    type Handle;

    /// Load a module from disk. Fails if the file is missing or is not a
    /// valid loadable module.
    fn load(&mut self, path: &Path) -> Result<Self::Handle>;

    /// Resolve the entry point named by `symbol` (nul-terminated bytes).
    ///
    /// The returned callable is valid only while `handle` stays loaded;
    /// after [`unload`](ModuleBackend::unload) it must not be invoked.
    fn resolve(&mut self, handle: &Self::Handle, symbol: &[u8]) -> Result<UpdateFn>;

    /// Unload a module, releasing its file mapping.
    fn unload(&mut self, handle: Self::Handle);
}

/// `libloading`-backed implementation used by the host.
#[derive(Debug, Default)]
pub struct DynLibBackend;

impl DynLibBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ModuleBackend for DynLibBackend {
    type Handle = Library;

    fn load(&mut self, path: &Path) -> Result<Library> {
        // Safety: the module is a build artifact of this workspace; its
        // initialization routines are the ones rustc emits for a cdylib.
        unsafe { Library::new(path) }
            .map_err(|e| ModuleError::load_failed(path, e.to_string()))
    }

    fn resolve(&mut self, handle: &Library, symbol: &[u8]) -> Result<UpdateFn> {
        let name = symbol_name(symbol);
        // Safety: UpdateFn is the one signature gameplay modules export
        // under this name; cinder_abi pins it on both sides.
        let sym: Symbol<'_, UpdateFn> = unsafe {
            handle
                .get(symbol)
                .map_err(|e| ModuleError::symbol_not_found("<loaded module>", name, e.to_string()))?
        };
        // Fn pointers are plain addresses; lifting one out of the Symbol
        // is fine as long as it is never called after unload, which the
        // controller guarantees.
        Ok(*sym)
    }

    fn unload(&mut self, handle: Library) {
        if let Err(e) = handle.close() {
            // Nothing actionable; the handle is gone either way.
            log::warn!("error while unloading module: {}", e);
        }
    }
}

fn symbol_name(symbol: &[u8]) -> String {
    let trimmed = symbol.strip_suffix(&[0]).unwrap_or(symbol);
    String::from_utf8_lossy(trimmed).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_module_fails() {
        let mut backend = DynLibBackend::new();
        let err = backend.load(Path::new("/no/such/module.so")).unwrap_err();
        assert!(matches!(err, ModuleError::LoadFailed { .. }));
    }

    #[test]
    fn test_load_non_module_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_module.so");
        std::fs::write(&path, b"definitely not ELF").unwrap();

        let mut backend = DynLibBackend::new();
        assert!(backend.load(&path).is_err());
    }

    #[test]
    fn test_symbol_name_strips_nul() {
        assert_eq!(symbol_name(b"update\0"), "update");
        assert_eq!(symbol_name(b"update"), "update");
    }
}
