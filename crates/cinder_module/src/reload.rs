//! Hot-reload controller
//!
//! Polls the gameplay module's build artifact once per frame and swaps the
//! loaded code when its timestamp advances, without touching host-owned
//! memory. Sequencing invariants:
//!
//! - The previous module is unloaded (releasing the shadow file mapping)
//!   before the shadow copy is overwritten.
//! - The live callable changes only after copy, load and resolve have all
//!   succeeded; the frame loop always observes the fully-previous or
//!   fully-current callable, never a half-updated one.
//! - A copy failure (external build still writing) is retried with a short
//!   backoff, indefinitely: stalling on reload beats silently running code
//!   already known to be stale.

use crate::backend::ModuleBackend;
use crate::error::Result;
use crate::fs;
use cinder_abi::{UpdateFn, UPDATE_SYMBOL};
use cinder_memory::Arena;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Controller state, observable for diagnostics and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadState {
    /// No module has been loaded yet.
    Unloaded,
    /// A module is loaded and its callable is live.
    Loaded,
    /// Between unload of the old module and rebind of the new one.
    Reloading,
}

struct ActiveModule<H> {
    handle: H,
    update: UpdateFn,
}

/// Keeps the gameplay module current. One instance per process, polled at
/// the top of every frame.
pub struct HotReload<B: ModuleBackend> {
    backend: B,
    module_path: PathBuf,
    shadow_path: PathBuf,
    retry_backoff: Duration,
    last_timestamp: Option<SystemTime>,
    module: Option<ActiveModule<B::Handle>>,
    state: ReloadState,
    generation: u64,
}

impl<B: ModuleBackend> HotReload<B> {
    pub fn new(
        backend: B,
        module_path: impl Into<PathBuf>,
        shadow_path: impl Into<PathBuf>,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            backend,
            module_path: module_path.into(),
            shadow_path: shadow_path.into(),
            retry_backoff,
            last_timestamp: None,
            module: None,
            state: ReloadState::Unloaded,
            generation: 0,
        }
    }

    pub fn state(&self) -> ReloadState {
        self.state
    }

    /// How many times a module has been (re)loaded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current gameplay callable, if a module is loaded.
    pub fn update_fn(&self) -> Option<UpdateFn> {
        self.module.as_ref().map(|m| m.update)
    }

    /// Once-per-frame check. Returns without I/O beyond a single stat in
    /// the steady state; on a timestamp change it blocks until the new
    /// module is live. Load/resolve failure is fatal and surfaces as `Err`.
    pub fn poll(&mut self, scratch: &mut Arena) -> Result<()> {
        let observed = fs::modified_time(&self.module_path);

        let stale = match (&self.module, observed, self.last_timestamp) {
            // Nothing loaded yet: always attempt, even if the artifact is
            // not there yet; the copy loop below waits for it.
            (None, _, _) => true,
            (Some(_), Some(ts), Some(last)) => ts > last,
            // Loaded but never stamped (mtime-less filesystem): adopt the
            // first observation rather than reloading every frame.
            (Some(_), Some(ts), None) => {
                log::debug!("adopting module timestamp without reload");
                self.last_timestamp = Some(ts);
                false
            }
            // Stat failure while loaded is "unknown", not "changed".
            (Some(_), None, _) => false,
        };
        if !stale {
            return Ok(());
        }

        self.state = ReloadState::Reloading;

        // Unload before overwriting the shadow copy: the OS may keep the
        // file open for as long as the module is mapped.
        if let Some(active) = self.module.take() {
            self.backend.unload(active.handle);
            log::info!("unloaded gameplay module (generation {})", self.generation);
        }

        self.copy_shadow(scratch);

        // Stamp the observation from the top of this poll, not a re-stat:
        // a rebuild landing after the copy must re-trigger on the next
        // frame (a redundant reload, never a missed one). The re-stat only
        // covers an artifact that did not exist when the poll began.
        let stamped = observed.or_else(|| fs::modified_time(&self.module_path));

        let handle = self.backend.load(&self.shadow_path)?;
        let update = match self.backend.resolve(&handle, UPDATE_SYMBOL) {
            Ok(update) => update,
            Err(e) => {
                self.backend.unload(handle);
                return Err(e);
            }
        };

        self.module = Some(ActiveModule { handle, update });
        self.last_timestamp = stamped;
        self.state = ReloadState::Loaded;
        self.generation += 1;
        log::info!(
            "loaded gameplay module generation {} from '{}'",
            self.generation,
            self.shadow_path.display()
        );
        Ok(())
    }

    /// Copy the artifact to the shadow path, retrying with backoff while an
    /// external build is still writing it. Scratch allocations are rewound
    /// per attempt so retries do not accumulate in the transient arena.
    fn copy_shadow(&self, scratch: &mut Arena) {
        let mark = scratch.mark();
        let mut attempts: u64 = 0;
        loop {
            match fs::copy(&self.module_path, &self.shadow_path, scratch) {
                Ok(()) => {
                    scratch.rewind(mark);
                    if attempts > 0 {
                        log::info!(
                            "module artifact became readable after {} retries",
                            attempts
                        );
                    }
                    return;
                }
                Err(e) => {
                    scratch.rewind(mark);
                    if attempts == 0 {
                        log::warn!(
                            "waiting for module artifact '{}': {}",
                            self.module_path.display(),
                            e
                        );
                    } else {
                        log::debug!("shadow copy retry {}: {}", attempts, e);
                    }
                    attempts += 1;
                    std::thread::sleep(self.retry_backoff);
                }
            }
        }
    }
}
