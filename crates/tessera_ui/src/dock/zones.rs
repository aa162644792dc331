//! Drop zones shown while a container is dragged over a dock target.
//!
//! ```text
//!              ┌───┐
//!              │ T │
//!        ┌───┐ ├───┤ ┌───┐
//!        │ L │ │ C │ │ R │
//!        └───┘ ├───┤ └───┘
//!              │ B │
//!              └───┘
//! ```

use super::SplitKind;
use crate::layout::Rect;

/// Where a dragged container lands relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockPosition {
    /// Merge into the target's tab group.
    Tab,
    /// Split, child on the left.
    Left,
    /// Split, child on the right.
    Right,
    /// Split, child on top.
    Top,
    /// Split, child at the bottom.
    Bottom,
}

impl DockPosition {
    /// Every position, centre first.
    pub const ALL: [Self; 5] = [Self::Tab, Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Split kind for side positions.
    #[must_use]
    pub const fn split_kind(self) -> Option<SplitKind> {
        match self {
            Self::Tab => None,
            Self::Left => Some(SplitKind::Left),
            Self::Right => Some(SplitKind::Right),
            Self::Top => Some(SplitKind::Top),
            Self::Bottom => Some(SplitKind::Bottom),
        }
    }
}

/// The five zone rectangles centred on `target`.
#[must_use]
pub fn dock_zones(target: Rect, size: f32, gap: f32) -> [(DockPosition, Rect); 5] {
    let c = target.center();
    let half = size * 0.5;
    let step = size + gap;
    let at = |dx: f32, dy: f32| Rect::new(c.x - half + dx, c.y - half + dy, size, size);
    [
        (DockPosition::Tab, at(0.0, 0.0)),
        (DockPosition::Left, at(-step, 0.0)),
        (DockPosition::Right, at(step, 0.0)),
        (DockPosition::Top, at(0.0, -step)),
        (DockPosition::Bottom, at(0.0, step)),
    ]
}

/// Preview of the area a drop at `position` would give the child.
#[must_use]
pub fn preview_rect(target: Rect, position: DockPosition, ratio: f32) -> Rect {
    let w = target.width * ratio;
    let h = target.height * ratio;
    match position {
        DockPosition::Tab => target,
        DockPosition::Left => Rect::new(target.x, target.y, w, target.height),
        DockPosition::Right => Rect::new(target.right() - w, target.y, w, target.height),
        DockPosition::Top => Rect::new(target.x, target.y, target.width, h),
        DockPosition::Bottom => Rect::new(target.x, target.bottom() - h, target.width, h),
    }
}
