//! Sprite atlas table
//!
//! Sprites are rectangles in a shared texture atlas. The table is host
//! data the gameplay module reads through [`sprite`]; how the atlas gets
//! onto the GPU is the renderer's business.

use cinder_math::IVec2;

/// Identifiers for every sprite in the atlas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum SpriteId {
    #[default]
    WhitePixel,
    Dice,
    TileSolid,
}

/// Atlas placement of one sprite.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct Sprite {
    pub atlas_offset: IVec2,
    pub size: IVec2,
}

/// Look up the atlas placement for a sprite.
pub const fn sprite(id: SpriteId) -> Sprite {
    match id {
        SpriteId::WhitePixel => Sprite {
            atlas_offset: IVec2::new(0, 0),
            size: IVec2::new(1, 1),
        },
        SpriteId::Dice => Sprite {
            atlas_offset: IVec2::new(16, 0),
            size: IVec2::new(16, 16),
        },
        SpriteId::TileSolid => Sprite {
            atlas_offset: IVec2::new(32, 0),
            size: IVec2::new(8, 8),
        },
    }
}
