//! # Slot Arena
//!
//! Generation-checked storage for records that reference each other by
//! handle (split nodes, tab bars).
//!
//! A [`Handle`] packs a slot index and the generation the slot had when the
//! value was inserted. Removing a value bumps the slot generation, so every
//! outstanding handle to it stops resolving instead of silently pointing at
//! whatever reuses the slot next.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Typed handle into a [`SlotArena<T>`].
///
/// Layout mirrors a generational entity id:
/// - Lower 32 bits: slot index
/// - Upper 32 bits: generation
#[repr(transparent)]
pub struct Handle<T> {
    bits: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Creates a handle from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            bits: ((generation as u64) << 32) | (index as u64),
            _marker: PhantomData,
        }
    }

    /// Slot index portion.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.bits as u32
    }

    /// Generation portion.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.bits >> 32) as u32
    }

    /// Packed representation, stable for hashing into ids.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.bits
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index(), self.generation())
    }
}

/// One arena slot.
#[derive(Debug, Clone)]
struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Growable arena with generation-checked handles.
#[derive(Debug, Clone)]
pub struct SlotArena<T> {
    entries: Vec<Entry<T>>,
    /// Free list of slot indices for reuse.
    free: Vec<u32>,
    len: usize,
}

impl<T> SlotArena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty arena with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live values.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no value is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value` and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if the arena would exceed `u32::MAX` slots.
    pub fn insert(&mut self, value: T) -> Handle<T> {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.value = Some(value);
            return Handle::new(index, entry.generation);
        }

        let index = u32::try_from(self.entries.len()).unwrap_or_else(|_| {
            panic!("slot arena cannot exceed u32::MAX entries");
        });
        self.entries.push(Entry {
            generation: 0,
            value: Some(value),
        });
        Handle::new(index, 0)
    }

    /// Removes the value behind `handle`, invalidating every copy of it.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let entry = self.entries.get_mut(handle.index() as usize)?;
        if entry.generation != handle.generation() {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(handle.index());
        self.len -= 1;
        Some(value)
    }

    /// Returns true if `handle` still resolves.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Resolves `handle`.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        let entry = self.entries.get(handle.index() as usize)?;
        if entry.generation == handle.generation() {
            entry.value.as_ref()
        } else {
            None
        }
    }

    /// Resolves `handle` mutably.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let entry = self.entries.get_mut(handle.index() as usize)?;
        if entry.generation == handle.generation() {
            entry.value.as_mut()
        } else {
            None
        }
    }

    /// Iterates over live values with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.entries.iter().enumerate().filter_map(|(index, entry)| {
            entry.value.as_ref().map(|value| {
                // Index fits: insert refuses to grow past u32::MAX.
                #[allow(clippy::cast_possible_truncation)]
                let handle = Handle::new(index as u32, entry.generation);
                (handle, value)
            })
        })
    }

    /// Collects the handles of every live value.
    #[must_use]
    pub fn handles(&self) -> Vec<Handle<T>> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    /// Removes every value; outstanding handles stop resolving.
    pub fn clear(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if entry.value.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
                #[allow(clippy::cast_possible_truncation)]
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_roundtrip() {
        let handle: Handle<u8> = Handle::new(12345, 67890);
        assert_eq!(handle.index(), 12345);
        assert_eq!(handle.generation(), 67890);
    }

    #[test]
    fn test_insert_get_remove() {
        let mut arena = SlotArena::new();
        let h = arena.insert("split");
        assert_eq!(arena.get(h), Some(&"split"));
        assert_eq!(arena.len(), 1);

        assert_eq!(arena.remove(h), Some("split"));
        assert!(arena.is_empty());
        assert_eq!(arena.get(h), None);
        assert_eq!(arena.remove(h), None);
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut arena = SlotArena::new();
        let old = arena.insert(1_u32);
        arena.remove(old);

        let new = arena.insert(2_u32);
        assert_eq!(old.index(), new.index()); // Same slot reused
        assert_ne!(old, new);
        assert_eq!(arena.get(old), None);
        assert_eq!(arena.get(new), Some(&2));
    }

    #[test]
    fn test_iter_skips_removed() {
        let mut arena = SlotArena::new();
        let a = arena.insert('a');
        let b = arena.insert('b');
        let c = arena.insert('c');
        arena.remove(b);

        let handles = arena.handles();
        assert_eq!(handles, vec![a, c]);
    }

    #[test]
    fn test_clear_invalidates() {
        let mut arena = SlotArena::new();
        let a = arena.insert(1);
        arena.clear();
        assert!(!arena.contains(a));
        assert!(arena.is_empty());
    }
}
