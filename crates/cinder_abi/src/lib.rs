//! # cinder_abi - The Gameplay Module Boundary
//!
//! Everything that crosses between the host and the hot-swapped gameplay
//! module lives here: input, render submission and game state, plus the
//! entry-point signature. All of it is `#[repr(C)]`, address-stable and
//! valid when zero-initialized, because the host carves these structs out
//! of the zeroed persistent arena once at startup and a freshly loaded
//! module version resumes on the same addresses with no migration step.

pub mod game;
pub mod input;
pub mod render;
pub mod sprite;

pub use game::{GameInput, GameState, KeyMapping, Tile, WORLD_GRID, WORLD_HEIGHT, WORLD_WIDTH, TILE_SIZE};
pub use input::{Input, Key, KeyCode, KEY_COUNT};
pub use render::{Camera2D, RenderData, Transform, MAX_TRANSFORMS};
pub use sprite::{sprite, Sprite, SpriteId};

/// Signature of the single entry point a gameplay module exports.
///
/// All three pointers address the persistent arena and stay valid for the
/// life of the process; the module operates on them in place.
pub type UpdateFn = unsafe extern "C" fn(*mut GameState, *mut RenderData, *mut Input);

/// Exported symbol name of the gameplay entry point, nul-terminated for
/// symbol resolution.
pub const UPDATE_SYMBOL: &[u8] = b"update\0";

/// Entry point name for diagnostics.
pub const UPDATE_SYMBOL_NAME: &str = "update";
