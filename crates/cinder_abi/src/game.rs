//! Game state shared with the gameplay module
//!
//! The host allocates one [`GameState`] in the persistent arena and never
//! looks inside it again; its layout belongs to the gameplay module. It is
//! defined here so both sides agree on size and alignment, and so tests can
//! poke at it without loading a module.

use crate::input::{Input, KeyCode};
use cinder_math::IVec2;
use cinder_structures::BoundedVec;

/// World size in pixels.
pub const WORLD_WIDTH: i32 = 320;
pub const WORLD_HEIGHT: i32 = 180;
/// Tile edge length in pixels.
pub const TILE_SIZE: i32 = 8;
/// World size in tiles.
pub const WORLD_GRID: IVec2 = IVec2::new(WORLD_WIDTH / TILE_SIZE, WORLD_HEIGHT / TILE_SIZE);

/// Logical game actions, each re-bindable to up to three keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum GameInput {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Jump,
    MouseLeft,
    MouseRight,
}

/// Number of logical game actions.
pub const GAME_INPUT_COUNT: usize = 7;

/// Keys bound to one logical action.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct KeyMapping {
    pub keys: BoundedVec<KeyCode, 3>,
}

/// One world tile.
#[derive(Clone, Copy, Debug, Default)]
#[repr(C)]
pub struct Tile {
    pub neighbour_mask: i32,
    pub visible: bool,
}

/// Simulation state. Lives in the persistent arena at a fixed address so a
/// freshly reloaded module resumes on it without serialization; all fields
/// are valid when zeroed (`initialized == false` drives one-time setup
/// inside the module).
#[repr(C)]
pub struct GameState {
    pub initialized: bool,
    pub player_pos: IVec2,
    pub world_grid: [[Tile; WORLD_GRID.y as usize]; WORLD_GRID.x as usize],
    pub key_mappings: [KeyMapping; GAME_INPUT_COUNT],
}

impl GameState {
    /// Bind `code` to `action`, keeping existing bindings. Silently ignores
    /// bindings past the per-action limit.
    pub fn map_key(&mut self, action: GameInput, code: KeyCode) {
        let _ = self.key_mappings[action as usize].keys.push(code);
    }

    /// Is any key bound to `action` currently held?
    pub fn is_down(&self, input: &Input, action: GameInput) -> bool {
        self.key_mappings[action as usize]
            .keys
            .iter()
            .any(|&code| input.key_is_down(code))
    }

    /// Did any key bound to `action` go down this frame?
    pub fn just_pressed(&self, input: &Input, action: GameInput) -> bool {
        self.key_mappings[action as usize]
            .keys
            .iter()
            .any(|&code| input.keys[code.index()].just_pressed)
    }

    /// Tile cell containing a world position, if inside the grid.
    pub fn tile_at(&self, world_pos: IVec2) -> Option<IVec2> {
        let cell = IVec2::new(world_pos.x / TILE_SIZE, world_pos.y / TILE_SIZE);
        if world_pos.x < 0
            || world_pos.y < 0
            || cell.x >= WORLD_GRID.x
            || cell.y >= WORLD_GRID.y
        {
            return None;
        }
        Some(cell)
    }
}
