//! # cinder_memory - Linear Arena Allocation
//!
//! The runtime owns exactly two [`Arena`]s for the life of the process: a
//! persistent arena holding simulation state that must survive module
//! reloads, and a transient arena reset once per frame for scratch data.
//! Neither is ever resized or freed before process exit.

pub mod arena;

pub use arena::{Arena, Mark, ARENA_ALIGN};
