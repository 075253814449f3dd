//! # cinder_math - Cinder Math Primitives
//!
//! Small 2D-oriented math layer shared by the host and the gameplay module.
//! Every type is `#[repr(C)]` with named fields so it can cross the dynamic
//! module boundary and live inside arena-backed structs. Component access by
//! index goes through explicit `Index` impls rather than overlapping layouts.

pub mod matrix;
pub mod vector;

pub use matrix::Mat4;
pub use vector::{IVec2, Vec2, Vec4};
