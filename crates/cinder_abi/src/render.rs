//! Render submission shared with the gameplay module
//!
//! The gameplay module pushes [`Transform`]s into [`RenderData`] each
//! frame; the host renderer consumes the list and clears it. Nothing here
//! touches the GPU.

use crate::sprite::{sprite, SpriteId};
use cinder_math::{IVec2, Vec2};
use cinder_structures::BoundedVec;

/// Upper bound on sprites submitted per frame.
pub const MAX_TRANSFORMS: usize = 1000;

/// 2D orthographic camera.
#[derive(Clone, Copy, Debug, Default)]
#[repr(C)]
pub struct Camera2D {
    pub zoom: f32,
    pub dimensions: Vec2,
    pub position: Vec2,
}

/// One sprite draw: world placement plus atlas source rectangle.
#[derive(Clone, Copy, Debug, Default)]
#[repr(C)]
pub struct Transform {
    pub pos: Vec2,
    pub size: Vec2,
    pub atlas_offset: IVec2,
    pub sprite_size: IVec2,
}

/// Per-frame draw list and cameras, host-allocated once in the persistent
/// arena.
#[repr(C)]
pub struct RenderData {
    pub game_camera: Camera2D,
    pub ui_camera: Camera2D,
    pub transforms: BoundedVec<Transform, MAX_TRANSFORMS>,
}

impl RenderData {
    /// Submit one sprite draw, centered on `pos` in world units.
    ///
    /// Draws past [`MAX_TRANSFORMS`] are dropped; the frame still renders.
    pub fn draw_sprite(&mut self, id: SpriteId, pos: Vec2) {
        let sprite = sprite(id);
        let size = Vec2::from(sprite.size);
        let _ = self.transforms.push(Transform {
            pos: pos - size / 2.0,
            size,
            atlas_offset: sprite.atlas_offset,
            sprite_size: sprite.size,
        });
    }

    /// Convert a screen-space position into game-camera world space.
    pub fn screen_to_world(&self, screen_size: IVec2, screen_pos: IVec2) -> IVec2 {
        let camera = self.game_camera;
        let mut x = screen_pos.x as f32 / screen_size.x as f32 * camera.dimensions.x;
        x += -camera.dimensions.x / 2.0 + camera.position.x;
        let mut y = screen_pos.y as f32 / screen_size.y as f32 * camera.dimensions.y;
        y += camera.dimensions.y / 2.0 + camera.position.y;
        IVec2::new(x as i32, y as i32)
    }
}
