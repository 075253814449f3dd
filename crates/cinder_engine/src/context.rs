//! Engine context
//!
//! The explicit host-state struct passed into every component entry point,
//! replacing file-scope globals. It owns the process's two arenas and the
//! addresses of the three structs shared with the gameplay module.

use cinder_abi::{GameState, Input, RenderData};
use cinder_memory::Arena;
use core::ptr::NonNull;

/// Host-owned state with process lifetime.
///
/// `GameState`, `RenderData` and `Input` are carved out of the persistent
/// arena exactly once, at startup, from its zeroed head. Their addresses
/// never change afterwards; that stability is what lets a freshly reloaded
/// module resume on them with no migration step.
pub struct EngineContext {
    pub persistent: Arena,
    pub transient: Arena,
    game_state: NonNull<GameState>,
    render_data: NonNull<RenderData>,
    input: NonNull<Input>,
    /// Cleared by the platform's close handling; observed at the top of
    /// the next frame.
    pub running: bool,
}

impl EngineContext {
    /// Create the two arenas and allocate the shared structs.
    pub fn new(persistent_capacity: usize, transient_capacity: usize) -> Self {
        let persistent = Arena::new(persistent_capacity);
        let transient = Arena::new(transient_capacity);

        // A fresh arena is zeroed, and all three ABI structs are defined
        // to be valid all-zero. They are never dropped; the process exit
        // reclaims the arena wholesale.
        let game_state = persistent.alloc_type::<GameState>();
        let input = persistent.alloc_type::<Input>();
        let render_data = persistent.alloc_type::<RenderData>();

        log::debug!(
            "engine context up: {} bytes persistent head in use",
            persistent.used()
        );

        Self {
            persistent,
            transient,
            game_state,
            render_data,
            input,
            running: true,
        }
    }

    /// Stable address of the game state, for the module call.
    pub fn game_state_ptr(&self) -> *mut GameState {
        self.game_state.as_ptr()
    }

    /// Stable address of the render data, for the module call.
    pub fn render_data_ptr(&self) -> *mut RenderData {
        self.render_data.as_ptr()
    }

    /// Stable address of the input state, for the module call.
    pub fn input_ptr(&self) -> *mut Input {
        self.input.as_ptr()
    }

    pub fn input_mut(&mut self) -> &mut Input {
        // Exclusive access to the context implies exclusive access to the
        // arena-backed struct; the module is not running concurrently.
        unsafe { self.input.as_mut() }
    }

    pub fn render_data_mut(&mut self) -> &mut RenderData {
        unsafe { self.render_data.as_mut() }
    }

    pub fn game_state(&self) -> &GameState {
        unsafe { self.game_state.as_ref() }
    }
}
