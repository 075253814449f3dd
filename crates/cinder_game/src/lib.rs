//! # cinder_game - Demo Gameplay Module
//!
//! Built as a `cdylib` and hot-swapped by the host while it runs: edit
//! something below, `cargo build -p cinder_game`, and the running host
//! picks it up on the next frame.
//!
//! The exported `update` is the module's entire surface. All state lives
//! in the host's persistent arena behind the raw pointers; nothing here
//! may stash data in statics, or it would be lost on the next reload.

use cinder_abi::{
    GameInput, GameState, Input, KeyCode, RenderData, SpriteId, Tile, WORLD_HEIGHT, WORLD_WIDTH,
};
use cinder_math::Vec2;

/// Gameplay entry point, called once per frame by the host.
///
/// # Safety
/// The host passes pointers to its persistent-arena structs; they are
/// valid, exclusive for the duration of the call, and address-stable
/// across reloads.
#[no_mangle]
pub unsafe extern "C" fn update(
    game_state: *mut GameState,
    render_data: *mut RenderData,
    input: *mut Input,
) {
    let game_state = &mut *game_state;
    let render_data = &mut *render_data;
    let input = &*input;
    frame(game_state, render_data, input);
}

fn frame(state: &mut GameState, render: &mut RenderData, input: &Input) {
    if !state.initialized {
        init(state, render);
    }

    render.draw_sprite(SpriteId::Dice, Vec2::from(state.player_pos));
    draw_tiles(state, render);

    if state.is_down(input, GameInput::MoveLeft) {
        state.player_pos.x -= 1;
    }
    if state.is_down(input, GameInput::MoveRight) {
        state.player_pos.x += 1;
    }
    if state.is_down(input, GameInput::MoveUp) {
        state.player_pos.y -= 1;
    }
    if state.is_down(input, GameInput::MoveDown) {
        state.player_pos.y += 1;
    }

    paint_tiles(state, render, input);
}

/// One-time setup, guarded by the persistent `initialized` flag so it
/// survives reloads without re-running.
fn init(state: &mut GameState, render: &mut RenderData) {
    render.game_camera.dimensions = Vec2::new(WORLD_WIDTH as f32, WORLD_HEIGHT as f32);
    render.game_camera.zoom = 1.0;

    state.map_key(GameInput::MoveUp, KeyCode::W);
    state.map_key(GameInput::MoveLeft, KeyCode::A);
    state.map_key(GameInput::MoveDown, KeyCode::S);
    state.map_key(GameInput::MoveRight, KeyCode::D);
    state.map_key(GameInput::MoveUp, KeyCode::Up);
    state.map_key(GameInput::MoveLeft, KeyCode::Left);
    state.map_key(GameInput::MoveDown, KeyCode::Down);
    state.map_key(GameInput::MoveRight, KeyCode::Right);
    state.map_key(GameInput::Jump, KeyCode::Space);
    state.map_key(GameInput::MouseLeft, KeyCode::MouseLeft);
    state.map_key(GameInput::MouseRight, KeyCode::MouseRight);

    state.initialized = true;
}

/// Place or erase a tile under the mouse cursor.
fn paint_tiles(state: &mut GameState, render: &RenderData, input: &Input) {
    let placing = state.is_down(input, GameInput::MouseLeft);
    let erasing = state.is_down(input, GameInput::MouseRight);
    if !placing && !erasing {
        return;
    }

    let world = render.screen_to_world(input.screen_size, input.mouse_pos);
    if let Some(cell) = state.tile_at(world) {
        state.world_grid[cell.x as usize][cell.y as usize] = Tile {
            neighbour_mask: 0,
            visible: placing,
        };
    }
}

fn draw_tiles(state: &GameState, render: &mut RenderData) {
    for (x, column) in state.world_grid.iter().enumerate() {
        for (y, tile) in column.iter().enumerate() {
            if tile.visible {
                let center = Vec2::new(
                    (x as i32 * cinder_abi::TILE_SIZE + cinder_abi::TILE_SIZE / 2) as f32,
                    (y as i32 * cinder_abi::TILE_SIZE + cinder_abi::TILE_SIZE / 2) as f32,
                );
                render.draw_sprite(SpriteId::TileSolid, center);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_math::IVec2;

    fn fixtures() -> (Box<GameState>, Box<RenderData>, Box<Input>) {
        unsafe {
            (
                Box::new(core::mem::zeroed()),
                Box::new(core::mem::zeroed()),
                Box::new(core::mem::zeroed()),
            )
        }
    }

    #[test]
    fn test_init_runs_once() {
        let (mut state, mut render, mut input) = fixtures();
        input.screen_size = IVec2::new(1280, 640);

        frame(&mut state, &mut render, &input);
        assert!(state.initialized);
        assert_eq!(render.game_camera.dimensions, Vec2::new(320.0, 180.0));

        // Re-binding on a second frame would overflow the 3-key mappings.
        frame(&mut state, &mut render, &input);
        assert_eq!(state.key_mappings[GameInput::MoveUp as usize].keys.len(), 2);
    }

    #[test]
    fn test_player_moves_while_key_held() {
        let (mut state, mut render, mut input) = fixtures();
        frame(&mut state, &mut render, &input);

        input.clear_frame_transitions();
        input.apply_key_event(KeyCode::D, true);
        let before = state.player_pos;
        frame(&mut state, &mut render, &input);
        frame(&mut state, &mut render, &input);
        assert_eq!(state.player_pos, IVec2::new(before.x + 2, before.y));
    }

    #[test]
    fn test_draws_player_every_frame() {
        let (mut state, mut render, mut input) = fixtures();
        input.screen_size = IVec2::new(1280, 640);
        frame(&mut state, &mut render, &input);
        assert_eq!(render.transforms.len(), 1);
    }

    #[test]
    fn test_tile_painting() {
        let (mut state, mut render, mut input) = fixtures();
        input.screen_size = IVec2::new(1280, 640);
        frame(&mut state, &mut render, &input);

        // Put the cursor somewhere that maps into the grid and press the
        // left button.
        input.clear_frame_transitions();
        input.mouse_pos = IVec2::new(640, 100);
        input.apply_key_event(KeyCode::MouseLeft, true);
        frame(&mut state, &mut render, &input);

        let painted = state
            .world_grid
            .iter()
            .flatten()
            .filter(|t| t.visible)
            .count();
        assert_eq!(painted, 1);
    }
}
