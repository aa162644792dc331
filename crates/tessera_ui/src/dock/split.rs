//! Split tree nodes.

use super::TabBar;
use crate::container::ContainerRef;
use crate::layout::{Rect, Vec2};
use tessera_core::Handle;

/// Side of the split the docked child (`children[0]`) occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitKind {
    /// Child on the left.
    Left,
    /// Child on the right.
    Right,
    /// Child on top.
    Top,
    /// Child at the bottom.
    Bottom,
}

impl SplitKind {
    /// True for left/right splits.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// What a split slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitChild {
    /// Nested split.
    Split(Handle<Split>),
    /// Single docked container.
    Container(ContainerRef),
    /// Tab group.
    TabBar(Handle<TabBar>),
}

/// Binary split node.
///
/// `children[0]` is the docked side described by `kind` and receives
/// `ratio` of the extent; `children[1]` takes the rest. A node with a
/// single child gives it the whole rect.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// Side of `children[0]`.
    pub kind: SplitKind,
    /// Share of the extent given to `children[0]`.
    pub ratio: f32,
    /// Area covered by the node.
    pub rect: Rect,
    /// Child slots.
    pub children: [Option<SplitChild>; 2],
    /// Enclosing split; `None` for roots.
    pub parent: Option<Handle<Split>>,
    /// Owning dockspace, for dockspace roots only.
    pub dockspace: Option<ContainerRef>,
}

impl Split {
    /// Creates a node with both slots filled.
    #[must_use]
    pub fn new(kind: SplitKind, ratio: f32, rect: Rect, docked: SplitChild, rest: SplitChild) -> Self {
        Self {
            kind,
            ratio,
            rect,
            children: [Some(docked), Some(rest)],
            parent: None,
            dockspace: None,
        }
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.iter().flatten().count()
    }

    /// Slot index holding `child`.
    #[must_use]
    pub fn slot_of(&self, child: SplitChild) -> Option<usize> {
        self.children.iter().position(|slot| *slot == Some(child))
    }

    /// The only occupied child, if exactly one slot is occupied.
    #[must_use]
    pub fn single_child(&self) -> Option<SplitChild> {
        match self.children {
            [Some(child), None] | [None, Some(child)] => Some(child),
            _ => None,
        }
    }

    /// Rects of the two slots.
    #[must_use]
    pub fn child_rects(&self) -> [Rect; 2] {
        let r = self.rect;
        if self.child_count() < 2 {
            return [r, r];
        }
        let ratio = self.ratio.clamp(0.0, 1.0);
        match self.kind {
            SplitKind::Left => {
                let w = r.width * ratio;
                [
                    Rect::new(r.x, r.y, w, r.height),
                    Rect::new(r.x + w, r.y, r.width - w, r.height),
                ]
            }
            SplitKind::Right => {
                let w = r.width * ratio;
                [
                    Rect::new(r.right() - w, r.y, w, r.height),
                    Rect::new(r.x, r.y, r.width - w, r.height),
                ]
            }
            SplitKind::Top => {
                let h = r.height * ratio;
                [
                    Rect::new(r.x, r.y, r.width, h),
                    Rect::new(r.x, r.y + h, r.width, r.height - h),
                ]
            }
            SplitKind::Bottom => {
                let h = r.height * ratio;
                [
                    Rect::new(r.x, r.bottom() - h, r.width, h),
                    Rect::new(r.x, r.y, r.width, r.height - h),
                ]
            }
        }
    }

    /// Divider handle between the two children, `thickness` wide.
    #[must_use]
    pub fn divider(&self, thickness: f32) -> Option<Rect> {
        if self.child_count() < 2 {
            return None;
        }
        let [docked, _] = self.child_rects();
        let half = thickness * 0.5;
        let edge = match self.kind {
            SplitKind::Left => docked.right(),
            SplitKind::Right => docked.x,
            SplitKind::Top => docked.bottom(),
            SplitKind::Bottom => docked.y,
        };
        Some(if self.kind.is_horizontal() {
            Rect::new(edge - half, self.rect.y, thickness, self.rect.height)
        } else {
            Rect::new(self.rect.x, edge - half, self.rect.width, thickness)
        })
    }

    /// Ratio after dragging the divider by `delta`, clamped to
    /// `[min, 1 - min]`.
    #[must_use]
    pub fn dragged_ratio(&self, delta: Vec2, min: f32) -> f32 {
        let shift = match self.kind {
            SplitKind::Left if self.rect.width > 0.0 => delta.x / self.rect.width,
            SplitKind::Right if self.rect.width > 0.0 => -delta.x / self.rect.width,
            SplitKind::Top if self.rect.height > 0.0 => delta.y / self.rect.height,
            SplitKind::Bottom if self.rect.height > 0.0 => -delta.y / self.rect.height,
            _ => 0.0,
        };
        let min = min.clamp(0.0, 0.5);
        (self.ratio + shift).clamp(min, 1.0 - min)
    }
}
