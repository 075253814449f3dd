//! Runtime configuration
//!
//! Paths and capacities with workable defaults, overridable by a
//! `cinder.toml` next to the working directory. Loaded once at startup;
//! nothing re-reads it afterwards.
//!
//! ```toml
//! [window]
//! title = "Cinder"
//! width = 1280
//! height = 640
//!
//! [memory]
//! persistent_mb = 50
//! transient_mb = 50
//!
//! [reload]
//! module_path = "target/debug/libcinder_game.so"
//! retry_ms = 10
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Platform-specific file name of the gameplay module artifact.
fn default_module_path() -> PathBuf {
    let name = if cfg!(target_os = "windows") {
        "cinder_game.dll"
    } else if cfg!(target_os = "macos") {
        "libcinder_game.dylib"
    } else {
        "libcinder_game.so"
    };
    Path::new("target/debug").join(name)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Cinder".into(),
            width: 1280,
            height: 640,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub persistent_mb: usize,
    pub transient_mb: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            persistent_mb: 50,
            transient_mb: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Build artifact the external toolchain rewrites.
    pub module_path: PathBuf,
    /// Shadow copy the loader actually maps. Defaults to the module path
    /// with a `_load` suffix.
    pub shadow_path: Option<PathBuf>,
    /// Backoff between shadow-copy retries.
    pub retry_ms: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            module_path: default_module_path(),
            shadow_path: None,
            retry_ms: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// WGSL source for the sprite pipeline, polled for hot reload.
    pub sprite_shader: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            sprite_shader: PathBuf::from("assets/shaders/sprite.wgsl"),
        }
    }
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub window: WindowConfig,
    pub memory: MemoryConfig,
    pub reload: ReloadConfig,
    pub assets: AssetConfig,
}

impl RuntimeConfig {
    /// Load from `path`, falling back to defaults if the file is absent.
    /// A present-but-broken file is a startup defect and fails loudly.
    pub fn load(path: &Path) -> Result<Self, toml::de::Error> {
        match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text),
            Err(_) => {
                log::debug!("no config at '{}', using defaults", path.display());
                Ok(Self::default())
            }
        }
    }

    /// Effective shadow path: configured, or `<module stem>_load.<ext>`.
    pub fn shadow_path(&self) -> PathBuf {
        if let Some(path) = &self.reload.shadow_path {
            return path.clone();
        }
        let module = &self.reload.module_path;
        let stem = module
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("module");
        let mut name = format!("{}_load", stem);
        if let Some(ext) = module.extension().and_then(|e| e.to_str()) {
            name.push('.');
            name.push_str(ext);
        }
        module.with_file_name(name)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.reload.retry_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.memory.persistent_mb, 50);
        assert_eq!(config.reload.retry_ms, 10);
    }

    #[test]
    fn test_shadow_path_derived() {
        let mut config = RuntimeConfig::default();
        config.reload.module_path = PathBuf::from("target/debug/libcinder_game.so");
        assert_eq!(
            config.shadow_path(),
            PathBuf::from("target/debug/libcinder_game_load.so")
        );
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [window]
            title = "Test"

            [reload]
            retry_ms = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.window.title, "Test");
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.retry_backoff(), Duration::from_millis(25));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let config = RuntimeConfig::load(Path::new("/no/such/cinder.toml")).unwrap();
        assert_eq!(config.window.title, "Cinder");
    }

    #[test]
    fn test_load_broken_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cinder.toml");
        std::fs::write(&path, "[window\nbroken").unwrap();
        assert!(RuntimeConfig::load(&path).is_err());
    }
}
