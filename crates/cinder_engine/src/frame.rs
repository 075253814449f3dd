//! The frame loop and its collaborator boundaries

use crate::context::EngineContext;
use crate::error::Result;
use cinder_abi::{Input, RenderData};
use cinder_module::{HotReload, ModuleBackend};

/// Window and input collaborator. Implementations translate OS events into
/// the shared [`Input`] struct; they never block waiting for input.
pub trait Platform {
    /// Drain pending OS events into `input`. Returns `false` once the
    /// window has been closed; the loop observes that at the top of the
    /// next iteration.
    fn pump_events(&mut self, input: &mut Input) -> bool;
}

/// GPU collaborator consuming the per-frame draw list.
pub trait Renderer {
    /// Issue draw calls for the submitted transforms, then clear the list
    /// for the next frame.
    fn submit(&mut self, render_data: &mut RenderData);

    /// Swap buffers / present the frame.
    fn present(&mut self);
}

/// Drives one gameplay module through the per-frame ordering contract.
pub struct FrameLoop<B: ModuleBackend> {
    reload: HotReload<B>,
}

impl<B: ModuleBackend> FrameLoop<B> {
    pub fn new(reload: HotReload<B>) -> Self {
        Self { reload }
    }

    pub fn reload(&self) -> &HotReload<B> {
        &self.reload
    }

    /// Run one frame. Strict order: reload check, event pump, gameplay
    /// update, render submission, present, transient reset.
    pub fn step<P: Platform, R: Renderer>(
        &mut self,
        ctx: &mut EngineContext,
        platform: &mut P,
        renderer: &mut R,
    ) -> Result<()> {
        self.reload.poll(&mut ctx.transient)?;

        if !platform.pump_events(ctx.input_mut()) {
            log::info!("close requested, stopping after this frame");
            ctx.running = false;
        }

        if let Some(update) = self.reload.update_fn() {
            // Safety: the three pointers address the persistent arena and
            // outlive the call; the callable was resolved from the module
            // generation currently loaded and is replaced atomically by
            // the controller.
            unsafe { update(ctx.game_state_ptr(), ctx.render_data_ptr(), ctx.input_ptr()) };
        }

        renderer.submit(ctx.render_data_mut());
        renderer.present();

        ctx.transient.reset();
        Ok(())
    }

    /// Run frames until the platform clears the running flag. Exit performs
    /// no arena teardown; process exit reclaims the memory.
    pub fn run<P: Platform, R: Renderer>(
        &mut self,
        ctx: &mut EngineContext,
        platform: &mut P,
        renderer: &mut R,
    ) -> Result<()> {
        while ctx.running {
            self.step(ctx, platform, renderer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_abi::{GameState, SpriteId, UpdateFn};
    use cinder_math::Vec2;
    use cinder_module::{ModuleError, ReloadState};
    use std::cell::RefCell;
    use std::path::Path;
    use std::time::Duration;

    thread_local! {
        /// Event journal shared between the fakes and the marker update
        /// fn. Thread-local so parallel tests cannot interleave.
        static EVENTS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    }

    fn journal(event: &'static str) {
        EVENTS.with(|e| e.borrow_mut().push(event));
    }

    fn take_journal() -> Vec<&'static str> {
        EVENTS.with(|e| e.borrow_mut().split_off(0))
    }

    unsafe extern "C" fn marker_update(
        gs: *mut GameState,
        rd: *mut cinder_abi::RenderData,
        _input: *mut Input,
    ) {
        journal("update");
        (*gs).player_pos.y += 1;
        (*rd).draw_sprite(SpriteId::Dice, Vec2::ZERO);
    }

    struct JournalBackend;

    impl ModuleBackend for JournalBackend {
        type Handle = ();

        fn load(&mut self, path: &Path) -> cinder_module::Result<()> {
            if !path.exists() {
                return Err(ModuleError::load_failed(path, "missing"));
            }
            journal("load");
            Ok(())
        }

        fn resolve(&mut self, _h: &(), _symbol: &[u8]) -> cinder_module::Result<UpdateFn> {
            Ok(marker_update)
        }

        fn unload(&mut self, _h: ()) {
            journal("unload");
        }
    }

    struct JournalPlatform {
        frames_until_close: u32,
        pumps: u32,
    }

    impl Platform for JournalPlatform {
        fn pump_events(&mut self, input: &mut Input) -> bool {
            journal("pump");
            input.clear_frame_transitions();
            self.pumps += 1;
            self.pumps <= self.frames_until_close
        }
    }

    struct JournalRenderer {
        submits: u32,
        presented: u32,
        last_submitted: usize,
    }

    impl Renderer for JournalRenderer {
        fn submit(&mut self, render_data: &mut RenderData) {
            journal("submit");
            self.submits += 1;
            self.last_submitted = render_data.transforms.len();
            render_data.transforms.clear();
        }

        fn present(&mut self) {
            journal("present");
            self.presented += 1;
        }
    }

    fn fixture(dir: &Path) -> (EngineContext, FrameLoop<JournalBackend>) {
        std::fs::write(dir.join("game.so"), b"v1").unwrap();
        let ctx = EngineContext::new(4 * 1024 * 1024, 64 * 1024);
        let reload = HotReload::new(
            JournalBackend,
            dir.join("game.so"),
            dir.join("game_load.so"),
            Duration::from_millis(1),
        );
        (ctx, FrameLoop::new(reload))
    }

    #[test]
    fn test_frame_ordering_and_loop_contract() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, mut frame_loop) = fixture(dir.path());
        let mut platform = JournalPlatform { frames_until_close: 3, pumps: 0 };
        let mut renderer = JournalRenderer { submits: 0, presented: 0, last_submitted: 0 };

        take_journal();
        frame_loop.step(&mut ctx, &mut platform, &mut renderer).unwrap();

        // First frame includes the initial module load, before everything.
        assert_eq!(
            take_journal(),
            &["load", "pump", "update", "submit", "present"]
        );
        assert_eq!(renderer.last_submitted, 1);
        assert!(ctx.render_data_mut().transforms.is_empty());
        assert_eq!(ctx.transient.used(), 0);

        // Steady frames skip load/unload entirely.
        frame_loop.step(&mut ctx, &mut platform, &mut renderer).unwrap();
        assert_eq!(take_journal(), &["pump", "update", "submit", "present"]);
        assert_eq!(frame_loop.reload().state(), ReloadState::Loaded);
    }

    #[test]
    fn test_run_until_close() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, mut frame_loop) = fixture(dir.path());
        // Pump reports close during frame 3; the loop still finishes that
        // frame, then stops at the top of the next iteration.
        let mut platform = JournalPlatform { frames_until_close: 2, pumps: 0 };
        let mut renderer = JournalRenderer { submits: 0, presented: 0, last_submitted: 0 };

        frame_loop.run(&mut ctx, &mut platform, &mut renderer).unwrap();

        assert!(!ctx.running);
        assert_eq!(platform.pumps, 3);
        assert_eq!(renderer.submits, 3);
        assert_eq!(renderer.presented, 3);
        // The update ran once per frame, reload included.
        assert_eq!(ctx.game_state().player_pos.y, 3);
    }

    #[test]
    fn test_transient_reset_every_frame() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, mut frame_loop) = fixture(dir.path());
        let mut platform = JournalPlatform { frames_until_close: u32::MAX, pumps: 0 };
        let mut renderer = JournalRenderer { submits: 0, presented: 0, last_submitted: 0 };

        for _ in 0..5 {
            assert_eq!(ctx.transient.used(), 0);
            frame_loop.step(&mut ctx, &mut platform, &mut renderer).unwrap();
            assert_eq!(ctx.transient.used(), 0);
        }
    }

    #[test]
    fn test_missing_entry_point_is_fatal() {
        struct NoSymbolBackend;
        impl ModuleBackend for NoSymbolBackend {
            type Handle = ();
            fn load(&mut self, _path: &Path) -> cinder_module::Result<()> {
                Ok(())
            }
            fn resolve(&mut self, _h: &(), _s: &[u8]) -> cinder_module::Result<UpdateFn> {
                Err(ModuleError::symbol_not_found("fake", "update", "absent"))
            }
            fn unload(&mut self, _h: ()) {}
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("game.so"), b"v1").unwrap();
        let mut ctx = EngineContext::new(4 * 1024 * 1024, 64 * 1024);
        let reload = HotReload::new(
            NoSymbolBackend,
            dir.path().join("game.so"),
            dir.path().join("game_load.so"),
            Duration::from_millis(1),
        );
        let mut frame_loop = FrameLoop::new(reload);
        let mut platform = JournalPlatform { frames_until_close: u32::MAX, pumps: 0 };
        let mut renderer = JournalRenderer { submits: 0, presented: 0, last_submitted: 0 };

        let err = frame_loop.step(&mut ctx, &mut platform, &mut renderer);
        assert!(err.is_err());
    }
}
