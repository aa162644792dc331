//! # Memory Management
//!
//! Fixed-size pools and generation-checked arenas backing the UI state that
//! outlives a single frame.
//!
//! ## Design Philosophy
//!
//! Immediate-mode widgets hold no references. Anything persistent is keyed:
//! - by [`Id`](crate::Id) through an [`LruPool`] (containers, tree nodes)
//! - by [`Handle`] through a [`SlotArena`] (split nodes, tab bars)

mod arena;
mod pool;

pub use arena::{Handle, SlotArena};
pub use pool::{LruPool, PoolSlot};
