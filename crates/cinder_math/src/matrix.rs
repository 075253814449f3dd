//! Matrix types for transformations

use crate::vector::Vec4;
use core::ops::{Index, IndexMut, Mul};

/// 4x4 matrix (column-major)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };

    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self { cols: [c0, c1, c2, c3] }
    }

    /// Orthographic projection for a 2D camera. `top` may be smaller than
    /// `bottom` for a y-down world, the math holds either way.
    pub fn orthographic(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        let mut result = Self::default();
        result.cols[0].x = 2.0 / (right - left);
        result.cols[1].y = 2.0 / (top - bottom);
        result.cols[2].z = 1.0;
        result.cols[3] = Vec4::new(
            -(right + left) / (right - left),
            (top + bottom) / (top - bottom),
            0.0,
            1.0,
        );
        result
    }

    #[inline]
    pub fn to_cols_array(self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, col) in self.cols.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&col.to_array());
        }
        out
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn index(&self, idx: usize) -> &Vec4 {
        &self.cols[idx]
    }
}

impl IndexMut<usize> for Mat4 {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut Vec4 {
        &mut self.cols[idx]
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        let mut out = Vec4::ZERO;
        for i in 0..4 {
            out[i] = self.cols[0][i] * rhs.x
                + self.cols[1][i] * rhs.y
                + self.cols[2][i] * rhs.z
                + self.cols[3][i] * rhs.w;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mul() {
        let v = Vec4::new(1.0, -2.0, 3.0, 1.0);
        assert_eq!(Mat4::IDENTITY * v, v);
    }

    #[test]
    fn test_orthographic_maps_corners() {
        // A y-down 320x180 world centered on the origin.
        let proj = Mat4::orthographic(-160.0, 160.0, -90.0, 90.0);

        let top_left = proj * Vec4::new(-160.0, -90.0, 0.0, 1.0);
        assert!((top_left.x - -1.0).abs() < 1e-6);
        assert!((top_left.y - 1.0).abs() < 1e-6);

        let bottom_right = proj * Vec4::new(160.0, 90.0, 0.0, 1.0);
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y - -1.0).abs() < 1e-6);
    }
}
