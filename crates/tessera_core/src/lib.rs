//! # TESSERA Core
//!
//! Identity and storage primitives for the TESSERA immediate-mode UI:
//! - 32-bit FNV-1a widget ids with scoped id stacks
//! - Fixed-capacity LRU pools keyed by id
//! - Generation-checked slot arenas for cross-referencing records
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::{IdStack, LruPool};
//!
//! let mut ids = IdStack::new();
//! let mut pool = LruPool::new(16);
//!
//! let window = ids.push_data(b"Inspector");
//! let slot = pool.get(window).unwrap_or_else(|| pool.init(window, 1));
//! assert_eq!(pool.id_at(slot), Some(window));
//! ids.pop();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod id;
pub mod memory;

pub use id::{fnv1a, Id, IdStack, HASH_INITIAL};
pub use memory::{Handle, LruPool, PoolSlot, SlotArena};
