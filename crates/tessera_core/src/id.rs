//! # Widget Identity
//!
//! Immediate-mode calls carry no handles, so identity is derived from what
//! the caller passes in: the label bytes of a widget, hashed together with
//! the id of the scope it is declared in.
//!
//! ```text
//!   id-stack: [ window "Tools" ] [ panel "Filters" ]
//!                                         │
//!   "Apply" ──── FNV-1a(seed = top) ──────┴──▶ Id(0x5f1c_9a0e)
//! ```
//!
//! The same label under the same scope always produces the same id, which
//! is what lets containers and animations survive from frame to frame.

/// FNV-1a 32-bit offset basis, the seed for ids created outside any scope.
pub const HASH_INITIAL: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 16_777_619;

/// Identifier of a widget or container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Id(pub u32);

impl Id {
    /// Hashes `data` into an id at the root scope.
    #[inline]
    #[must_use]
    pub fn root(data: &[u8]) -> Self {
        Self(fnv1a(HASH_INITIAL, data))
    }

    /// Hashes a label into an id at the root scope.
    #[inline]
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::root(label.as_bytes())
    }

    /// Derives a child id of `self` from `data`.
    #[inline]
    #[must_use]
    pub fn child(self, data: &[u8]) -> Self {
        Self(fnv1a(self.0, data))
    }

    /// Returns the raw hash value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Continues an FNV-1a hash from `seed` over `data`.
#[inline]
#[must_use]
pub fn fnv1a(seed: u32, data: &[u8]) -> u32 {
    data.iter()
        .fold(seed, |hash, &byte| (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME))
}

/// Stack of nested id scopes.
///
/// Pushing a scope makes every id derived afterwards a child of it, so two
/// windows can each own a widget labelled "OK" without colliding.
#[derive(Debug, Clone, Default)]
pub struct IdStack {
    scopes: Vec<Id>,
}

impl IdStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: Vec::with_capacity(32),
        }
    }

    /// Derives an id for `data` under the current scope.
    #[inline]
    #[must_use]
    pub fn id(&self, data: &[u8]) -> Id {
        let seed = self.scopes.last().map_or(HASH_INITIAL, |top| top.0);
        Id(fnv1a(seed, data))
    }

    /// Pushes an already computed id as the new scope.
    pub fn push(&mut self, id: Id) {
        self.scopes.push(id);
    }

    /// Derives an id for `data` and pushes it as the new scope.
    pub fn push_data(&mut self, data: &[u8]) -> Id {
        let id = self.id(data);
        self.scopes.push(id);
        id
    }

    /// Pops the innermost scope.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty; an unmatched pop is a caller bug.
    pub fn pop(&mut self) -> Id {
        match self.scopes.pop() {
            Some(id) => id,
            None => panic!("id stack underflow: pop without matching push"),
        }
    }

    /// Returns the innermost scope, if any.
    #[must_use]
    pub fn top(&self) -> Option<Id> {
        self.scopes.last().copied()
    }

    /// Number of open scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns true if no scope is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Drops every scope.
    pub fn clear(&mut self) {
        self.scopes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_known_vector() {
        // Reference value for FNV-1a 32 of "a".
        assert_eq!(fnv1a(HASH_INITIAL, b"a"), 0xe40c_292c);
        assert_eq!(fnv1a(HASH_INITIAL, b""), HASH_INITIAL);
    }

    #[test]
    fn test_id_stable_across_calls() {
        let mut stack = IdStack::new();
        stack.push_data(b"window");
        let first = stack.id(b"button");
        let second = stack.id(b"button");
        assert_eq!(first, second);
        stack.pop();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_scopes_separate_labels() {
        let mut stack = IdStack::new();
        stack.push_data(b"left");
        let left = stack.id(b"ok");
        stack.pop();
        stack.push_data(b"right");
        let right = stack.id(b"ok");
        stack.pop();
        assert_ne!(left, right);
        assert_eq!(Id::from_label("left").child(b"ok"), left);
    }

    #[test]
    #[should_panic(expected = "id stack underflow")]
    fn test_pop_empty_panics() {
        let mut stack = IdStack::new();
        stack.pop();
    }
}
