//! # cinder_structures - Fixed-Capacity Collections
//!
//! Inline, fixed-capacity containers for arena-backed data. No heap
//! allocation and no growth: capacity is part of the type, bounds are
//! enforced by the type rather than by callers.

pub mod bounded_vec;

pub use bounded_vec::BoundedVec;
