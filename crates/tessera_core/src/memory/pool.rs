//! # LRU Pool
//!
//! Fixed-size table mapping ids to slot indices, with least-recently-used
//! eviction driven by frame numbers.

use crate::id::Id;

/// One entry of an [`LruPool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolSlot {
    /// Id that currently owns the slot, `None` when free.
    pub id: Option<Id>,
    /// Frame number of the last touch.
    pub last_update: u64,
}

/// A fixed-capacity id pool with LRU retention.
///
/// The pool only tracks *which* id owns *which* index; the payload lives in
/// whatever parallel storage the owner keeps (containers, tree-node flags).
/// Every lookup the owner performs is followed by [`LruPool::update`], so
/// entries that stop being referenced age out and get recycled by
/// [`LruPool::init`].
///
/// # Example
///
/// ```rust
/// use tessera_core::{Id, LruPool};
///
/// let mut pool = LruPool::new(2);
/// let a = pool.init(Id(1), 1);
/// let b = pool.init(Id(2), 2);
/// pool.update(a, 3);
///
/// // Frame 4: `Id(2)` was touched least recently and is evicted.
/// let c = pool.init(Id(3), 4);
/// assert_eq!(c, b);
/// assert_eq!(pool.get(Id(2)), None);
/// ```
#[derive(Debug, Clone)]
pub struct LruPool {
    slots: Box<[PoolSlot]>,
}

impl LruPool {
    /// Creates a pool with `capacity` empty slots.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        Self {
            slots: vec![PoolSlot::default(); capacity].into_boxed_slice(),
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.id.is_some()).count()
    }

    /// Looks up the slot owned by `id`.
    #[must_use]
    pub fn get(&self, id: Id) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == Some(id))
    }

    /// Claims a slot for `id` and stamps it with `frame`.
    ///
    /// Free slots are used first. Otherwise the slot with the oldest
    /// `last_update` strictly before `frame` is evicted.
    ///
    /// # Panics
    ///
    /// Panics if every slot has already been touched during `frame`: the
    /// pool is too small for the number of live ids per frame.
    pub fn init(&mut self, id: Id, frame: u64) -> usize {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.id.is_none())
            .or_else(|| {
                self.slots
                    .iter()
                    .enumerate()
                    .filter(|(_, slot)| slot.last_update < frame)
                    .min_by_key(|(_, slot)| slot.last_update)
                    .map(|(index, _)| index)
            });

        let Some(index) = index else {
            panic!(
                "pool exhausted: all {} slots were touched in frame {frame}",
                self.slots.len()
            );
        };

        self.slots[index] = PoolSlot {
            id: Some(id),
            last_update: frame,
        };
        index
    }

    /// Refreshes the recency of `index`.
    #[inline]
    pub fn update(&mut self, index: usize, frame: u64) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.last_update = frame;
        }
    }

    /// Frees `index` so the next [`LruPool::init`] can reuse it.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = PoolSlot::default();
        }
    }

    /// Returns the id owning `index`.
    #[inline]
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<Id> {
        self.slots.get(index).and_then(|slot| slot.id)
    }

    /// Returns the slot record at `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&PoolSlot> {
        self.slots.get(index)
    }

    /// Iterates over occupied slots as `(index, id)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Id)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.id.map(|id| (index, id)))
    }

    /// Frees every slot.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = PoolSlot::default();
        }
    }
}
