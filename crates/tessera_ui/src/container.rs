//! Persistent container records.
//!
//! Windows, panels and popups are immediate-mode calls, but their position,
//! scroll and docking membership must survive between frames. Each lives in
//! a slot of an [`LruPool`]-indexed table and is addressed by
//! [`ContainerRef`], which stops resolving once the slot is recycled.

use crate::dock::{Split, TabBar};
use crate::layout::{Rect, Vec2};
use std::ops::{BitOr, BitOrAssign};
use tessera_core::{Handle, Id, LruPool};

/// Container and widget option flags (bitfield).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Options(pub u32);

impl Options {
    /// No options.
    pub const NONE: Self = Self(0);
    /// Center text horizontally.
    pub const ALIGN_CENTER: Self = Self(1 << 0);
    /// Right-align text.
    pub const ALIGN_RIGHT: Self = Self(1 << 1);
    /// Widget ignores the pointer.
    pub const NO_INTERACT: Self = Self(1 << 2);
    /// Skip background and border.
    pub const NO_FRAME: Self = Self(1 << 3);
    /// Window cannot be resized.
    pub const NO_RESIZE: Self = Self(1 << 4);
    /// Body does not scroll.
    pub const NO_SCROLL: Self = Self(1 << 5);
    /// No close button.
    pub const NO_CLOSE: Self = Self(1 << 6);
    /// No title bar.
    pub const NO_TITLE: Self = Self(1 << 7);
    /// Keep focus after the pointer is released outside.
    pub const HOLD_FOCUS: Self = Self(1 << 8);
    /// Size the window to its content.
    pub const AUTO_SIZE: Self = Self(1 << 9);
    /// Close when clicking elsewhere.
    pub const POPUP: Self = Self(1 << 10);
    /// Start closed.
    pub const CLOSED: Self = Self(1 << 11);
    /// Start expanded (tree nodes, headers).
    pub const EXPANDED: Self = Self(1 << 12);
    /// Neither docks nor accepts docked children.
    pub const NO_DOCK: Self = Self(1 << 13);
    /// Window is a dockspace.
    pub const DOCKSPACE: Self = Self(1 << 14);

    /// Returns true if every flag of `other` is set.
    #[inline]
    #[must_use]
    pub const fn has(self, other: Self) -> bool {
        (self.0 & other.0) == other.0 && other.0 != 0
    }

    /// Sets the flags of `other`.
    #[inline]
    pub fn set(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the flags of `other`.
    #[inline]
    pub fn clear(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for Options {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Validated reference to a pooled container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerRef {
    /// Pool slot.
    pub slot: usize,
    /// Id the slot held when the reference was taken.
    pub id: Id,
}

/// Retained state of a window, panel or popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    /// Id of the container.
    pub id: Id,
    /// Title shown in the title bar and tab strip.
    pub title: String,
    /// Outer rectangle, title bar included.
    pub rect: Rect,
    /// Content area.
    pub body: Rect,
    /// Extent of the content laid out last frame.
    pub content_size: Vec2,
    /// Scroll offset.
    pub scroll: Vec2,
    /// Draw order among roots; higher is on top.
    pub zindex: i32,
    /// False once closed.
    pub open: bool,
    /// False for tab members that are not the focused tab.
    pub visible: bool,
    /// Options the container was last begun with.
    pub options: Options,
    /// Split slot holding this container directly.
    pub split: Option<Handle<Split>>,
    /// Tab group this container belongs to.
    pub tab_bar: Option<Handle<TabBar>>,
    /// Root of the split tree, for dockspaces.
    pub dockspace_root: Option<Handle<Split>>,
    /// First command of the root region (its head jump).
    pub head: Option<usize>,
    /// Last command of the root region (its tail jump).
    pub tail: Option<usize>,
    /// Frame the container was last begun.
    pub last_frame: u64,
}

impl Container {
    /// Fresh record for `id`.
    #[must_use]
    pub fn new(id: Id) -> Self {
        Self {
            id,
            title: String::new(),
            rect: Rect::ZERO,
            body: Rect::ZERO,
            content_size: Vec2::ZERO,
            scroll: Vec2::ZERO,
            zindex: 0,
            open: true,
            visible: true,
            options: Options::NONE,
            split: None,
            tab_bar: None,
            dockspace_root: None,
            head: None,
            tail: None,
            last_frame: 0,
        }
    }

    /// Returns true if the container sits in a split or a tab group.
    #[must_use]
    pub fn is_docked(&self) -> bool {
        self.split.is_some() || self.tab_bar.is_some()
    }

    /// Returns true for dockspaces.
    #[must_use]
    pub fn is_dockspace(&self) -> bool {
        self.options.has(Options::DOCKSPACE)
    }
}

/// Pool-indexed container table.
#[derive(Debug, Clone)]
pub struct Containers {
    pool: LruPool,
    items: Vec<Container>,
}

impl Containers {
    /// Creates a table with `capacity` slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: LruPool::new(capacity),
            items: (0..capacity).map(|_| Container::new(Id(0))).collect(),
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Reference to the live container with `id`.
    #[must_use]
    pub fn find(&self, id: Id) -> Option<ContainerRef> {
        self.pool.get(id).map(|slot| ContainerRef { slot, id })
    }

    /// Returns true if `r` still resolves.
    #[must_use]
    pub fn is_valid(&self, r: ContainerRef) -> bool {
        self.pool.id_at(r.slot) == Some(r.id)
    }

    /// Resolves `r`.
    #[must_use]
    pub fn get(&self, r: ContainerRef) -> Option<&Container> {
        if self.is_valid(r) {
            self.items.get(r.slot)
        } else {
            None
        }
    }

    /// Resolves `r` mutably.
    pub fn get_mut(&mut self, r: ContainerRef) -> Option<&mut Container> {
        if self.is_valid(r) {
            self.items.get_mut(r.slot)
        } else {
            None
        }
    }

    /// Existing container with `id`, or a freshly initialized one.
    ///
    /// Either way the slot is stamped with `frame`.
    pub fn obtain(&mut self, id: Id, frame: u64) -> (ContainerRef, bool) {
        if let Some(slot) = self.pool.get(id) {
            self.pool.update(slot, frame);
            return (ContainerRef { slot, id }, false);
        }
        let slot = self.pool.init(id, frame);
        self.items[slot] = Container::new(id);
        (ContainerRef { slot, id }, true)
    }

    /// Refreshes the recency of `r`.
    pub fn touch(&mut self, r: ContainerRef, frame: u64) {
        if self.is_valid(r) {
            self.pool.update(r.slot, frame);
        }
    }

    /// Frees the slot of `r`.
    pub fn release(&mut self, r: ContainerRef) {
        if self.is_valid(r) {
            self.pool.release(r.slot);
        }
    }

    /// Iterates live containers.
    pub fn iter(&self) -> impl Iterator<Item = (ContainerRef, &Container)> + '_ {
        self.pool
            .iter()
            .map(move |(slot, id)| (ContainerRef { slot, id }, &self.items[slot]))
    }

    /// References of every live container.
    #[must_use]
    pub fn refs(&self) -> Vec<ContainerRef> {
        self.pool
            .iter()
            .map(|(slot, id)| ContainerRef { slot, id })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_flags() {
        let mut options = Options::NO_TITLE | Options::NO_RESIZE;
        assert!(options.has(Options::NO_TITLE));
        assert!(!options.has(Options::POPUP));
        assert!(!options.has(Options::NONE));
        options.clear(Options::NO_TITLE);
        assert!(!options.has(Options::NO_TITLE));
    }

    #[test]
    fn test_obtain_reuses_and_inits() {
        let mut containers = Containers::new(4);
        let (a, fresh) = containers.obtain(Id(1), 1);
        assert!(fresh);
        let (b, fresh) = containers.obtain(Id(1), 2);
        assert!(!fresh);
        assert_eq!(a, b);
    }

    #[test]
    fn test_stale_ref_after_eviction() {
        let mut containers = Containers::new(1);
        let (a, _) = containers.obtain(Id(1), 1);
        if let Some(c) = containers.get_mut(a) {
            c.scroll = Vec2::new(0.0, 10.0);
        }
        let (b, _) = containers.obtain(Id(2), 2);
        assert_eq!(a.slot, b.slot);
        assert!(containers.get(a).is_none());
        assert_eq!(containers.get(b).map(|c| c.scroll), Some(Vec2::ZERO));
    }
}
