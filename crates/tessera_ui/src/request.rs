//! Deferred geometry and focus mutations.
//!
//! Widgets never move or resize containers directly. They queue a
//! [`Request`] and every request is applied, in the order it was queued,
//! when the frame ends. Until then every widget sees the same geometry.

use crate::container::{ContainerRef, Containers};
use crate::dock::{Dock, DockPosition, Split, TabBar};
use crate::layout::{Rect, Vec2};
use tessera_core::Handle;
use tracing::debug;

/// Edge of a root split handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Top edge.
    North,
    /// Bottom edge.
    South,
    /// Right edge.
    East,
    /// Left edge.
    West,
}

impl Edge {
    /// Every edge.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Handle strip of `rect` along this edge.
    #[must_use]
    pub fn handle(self, rect: Rect, thickness: f32) -> Rect {
        let half = thickness * 0.5;
        match self {
            Self::North => Rect::new(rect.x, rect.y - half, rect.width, thickness),
            Self::South => Rect::new(rect.x, rect.bottom() - half, rect.width, thickness),
            Self::East => Rect::new(rect.right() - half, rect.y, thickness, rect.height),
            Self::West => Rect::new(rect.x - half, rect.y, thickness, rect.height),
        }
    }

    /// `rect` with this edge moved by the matching component of `delta`.
    #[must_use]
    pub fn resize(self, rect: Rect, delta: Vec2, min: f32) -> Rect {
        let mut out = rect;
        match self {
            Self::North => {
                let d = delta.y.min(rect.height - min);
                out.y += d;
                out.height -= d;
            }
            Self::South => out.height = (rect.height + delta.y).max(min),
            Self::East => out.width = (rect.width + delta.x).max(min),
            Self::West => {
                let d = delta.x.min(rect.width - min);
                out.x += d;
                out.width -= d;
            }
        }
        out
    }
}

/// A mutation queued during the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    /// Move a floating container, floating tab group or floating tree.
    Move {
        /// Container dragged.
        container: ContainerRef,
        /// Offset.
        delta: Vec2,
    },
    /// Set the rect of a floating container or tab group.
    Resize {
        /// Container resized.
        container: ContainerRef,
        /// New outer rect.
        rect: Rect,
    },
    /// Set the ratio of a split.
    Ratio {
        /// Split node.
        split: Handle<Split>,
        /// New ratio.
        ratio: f32,
    },
    /// Drag one edge of a floating root split.
    ResizeSplit {
        /// Root split.
        split: Handle<Split>,
        /// Edge dragged.
        edge: Edge,
        /// Pointer offset.
        delta: Vec2,
    },
    /// Bring a container (and the tree it is docked in) to the front.
    Focus {
        /// Container.
        container: ContainerRef,
    },
    /// Show a tab.
    TabFocus {
        /// Tab group.
        bar: Handle<TabBar>,
        /// Strip index.
        index: usize,
    },
    /// Reorder two tabs.
    TabSwap {
        /// Tab group.
        bar: Handle<TabBar>,
        /// First index.
        a: usize,
        /// Second index.
        b: usize,
    },
    /// Take a container out of its split or tab group and float it.
    Undock {
        /// Container.
        container: ContainerRef,
        /// Floating rect afterwards.
        rect: Rect,
    },
    /// Dock a container onto another.
    Dock {
        /// Container dropped.
        child: ContainerRef,
        /// Drop target.
        parent: ContainerRef,
        /// Zone dropped on.
        position: DockPosition,
        /// Share given to `child`.
        ratio: f32,
    },
    /// Undock and close a container.
    Close {
        /// Container.
        container: ContainerRef,
    },
}

/// Z-order bookkeeping shared by requests and the frame loop.
#[derive(Debug, Clone, Default)]
pub struct ZOrder {
    last: i32,
}

impl ZOrder {
    /// Highest z-index handed out so far.
    #[must_use]
    pub fn last(&self) -> i32 {
        self.last
    }

    /// Raises `container` above every other root. A docked container
    /// raises its whole tree, dockspace first, so the tree stays together.
    pub fn raise(&mut self, containers: &mut Containers, dock: &Dock, container: ContainerRef) {
        let Some(c) = containers.get(container) else {
            return;
        };
        let tree = match dock.split_of(containers, container) {
            Some(split) => Some(dock.root_of(split)),
            None => c.dockspace_root,
        };

        let mut order = Vec::new();
        if let Some(root) = tree {
            if let Some(owner) = dock.split(root).and_then(|s| s.dockspace) {
                order.push(owner);
            }
            order.extend(dock.tree_containers(root));
        } else if let Some(bar) = c.tab_bar.and_then(|b| dock.tab_bar(b)) {
            order.extend(bar.items.iter().map(|item| item.container));
        } else {
            order.push(container);
        }

        for member in order {
            if let Some(c) = containers.get_mut(member) {
                self.last += 1;
                c.zindex = self.last;
            }
        }
    }
}

impl Request {
    /// Applies the request. `min_size` bounds resized rects.
    pub fn apply(self, containers: &mut Containers, dock: &mut Dock, z: &mut ZOrder, min_size: f32) {
        debug!(request = ?self, "applying request");
        match self {
            Self::Move { container, delta } => move_container(containers, dock, container, delta),
            Self::Resize { container, rect } => {
                let rect = Rect::new(rect.x, rect.y, rect.width.max(min_size), rect.height.max(min_size));
                let Some(c) = containers.get(container) else {
                    return;
                };
                match (c.tab_bar, c.split) {
                    (Some(bar), _) => dock.resize_tab_bar(containers, bar, rect),
                    (None, None) => {
                        if let Some(c) = containers.get_mut(container) {
                            c.rect = rect;
                        }
                    }
                    (None, Some(_)) => {}
                }
            }
            Self::Ratio { split, ratio } => dock.set_ratio(containers, split, ratio),
            Self::ResizeSplit { split, edge, delta } => {
                let Some(node) = dock.split(split) else {
                    return;
                };
                if node.parent.is_some() || node.dockspace.is_some() {
                    return;
                }
                let rect = edge.resize(node.rect, delta, min_size);
                dock.set_rect(containers, split, rect);
            }
            Self::Focus { container } => z.raise(containers, dock, container),
            Self::TabFocus { bar, index } => dock.focus_tab(containers, bar, index),
            Self::TabSwap { bar, a, b } => dock.swap_tabs(bar, a, b),
            Self::Undock { container, rect } => {
                if dock.undock(containers, container).is_ok() {
                    if let Some(c) = containers.get_mut(container) {
                        c.rect = rect;
                    }
                    z.raise(containers, dock, container);
                }
            }
            Self::Dock {
                child,
                parent,
                position,
                ratio,
            } => {
                if dock.dock(containers, child, parent, position, ratio).is_ok() {
                    z.raise(containers, dock, child);
                }
            }
            Self::Close { container } => {
                if dock.undock(containers, container).is_ok() {
                    if let Some(c) = containers.get_mut(container) {
                        c.open = false;
                    }
                }
            }
        }
    }
}

fn move_container(containers: &mut Containers, dock: &mut Dock, container: ContainerRef, delta: Vec2) {
    let Some(c) = containers.get(container) else {
        return;
    };
    if let Some(split) = dock.split_of(containers, container) {
        let root = dock.root_of(split);
        let floating = dock.split(root).filter(|s| s.dockspace.is_none()).map(|s| s.rect);
        if let Some(rect) = floating {
            dock.set_rect(containers, root, rect.offset(delta));
        }
    } else if let Some(bar) = c.tab_bar {
        dock.move_tab_bar(containers, bar, delta);
    } else if let Some(c) = containers.get_mut(container) {
        c.rect = c.rect.offset(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::Id;

    fn floating(containers: &mut Containers, n: u32) -> ContainerRef {
        let (r, _) = containers.obtain(Id(n), 1);
        if let Some(c) = containers.get_mut(r) {
            c.rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        }
        r
    }

    #[test]
    fn test_edge_resize_respects_minimum() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(Edge::West.resize(rect, Vec2::new(20.0, 0.0), 50.0), Rect::new(20.0, 0.0, 180.0, 100.0));
        assert_eq!(Edge::North.resize(rect, Vec2::new(0.0, 90.0), 50.0), Rect::new(0.0, 50.0, 200.0, 50.0));
        assert_eq!(Edge::South.resize(rect, Vec2::new(0.0, -90.0), 50.0).height, 50.0);
    }

    #[test]
    fn test_move_and_resize_floating() {
        let mut containers = Containers::new(4);
        let mut dock = Dock::new(8);
        let mut z = ZOrder::default();
        let a = floating(&mut containers, 1);

        Request::Move { container: a, delta: Vec2::new(5.0, 7.0) }.apply(&mut containers, &mut dock, &mut z, 10.0);
        assert_eq!(containers.get(a).map(|c| c.rect), Some(Rect::new(5.0, 7.0, 200.0, 100.0)));

        Request::Resize { container: a, rect: Rect::new(0.0, 0.0, 4.0, 400.0) }
            .apply(&mut containers, &mut dock, &mut z, 10.0);
        assert_eq!(containers.get(a).map(|c| c.rect), Some(Rect::new(0.0, 0.0, 10.0, 400.0)));
    }

    #[test]
    fn test_docked_container_ignores_resize() {
        let mut containers = Containers::new(4);
        let mut dock = Dock::new(8);
        let mut z = ZOrder::default();
        let a = floating(&mut containers, 1);
        let b = floating(&mut containers, 2);
        Request::Dock { child: a, parent: b, position: DockPosition::Left, ratio: 0.5 }
            .apply(&mut containers, &mut dock, &mut z, 10.0);

        let before = containers.get(a).map(|c| c.rect);
        Request::Resize { container: a, rect: Rect::new(0.0, 0.0, 50.0, 50.0) }
            .apply(&mut containers, &mut dock, &mut z, 10.0);
        assert_eq!(containers.get(a).map(|c| c.rect), before);

        Request::Move { container: a, delta: Vec2::new(10.0, 0.0) }.apply(&mut containers, &mut dock, &mut z, 10.0);
        assert_eq!(containers.get(b).map(|c| c.rect.x), Some(110.0));
    }

    #[test]
    fn test_raise_keeps_tree_together() {
        let mut containers = Containers::new(4);
        let mut dock = Dock::new(8);
        let mut z = ZOrder::default();
        let a = floating(&mut containers, 1);
        let b = floating(&mut containers, 2);
        let c = floating(&mut containers, 3);
        Request::Dock { child: a, parent: b, position: DockPosition::Top, ratio: 0.5 }
            .apply(&mut containers, &mut dock, &mut z, 10.0);
        Request::Focus { container: c }.apply(&mut containers, &mut dock, &mut z, 10.0);
        Request::Focus { container: b }.apply(&mut containers, &mut dock, &mut z, 10.0);

        let za = containers.get(a).map_or(0, |c| c.zindex);
        let zb = containers.get(b).map_or(0, |c| c.zindex);
        let zc = containers.get(c).map_or(0, |c| c.zindex);
        assert!(za > zc && zb > zc);
    }

    #[test]
    fn test_close_undocks() {
        let mut containers = Containers::new(4);
        let mut dock = Dock::new(8);
        let mut z = ZOrder::default();
        let a = floating(&mut containers, 1);
        let b = floating(&mut containers, 2);
        Request::Dock { child: a, parent: b, position: DockPosition::Tab, ratio: 0.5 }
            .apply(&mut containers, &mut dock, &mut z, 10.0);
        Request::Close { container: a }.apply(&mut containers, &mut dock, &mut z, 10.0);
        assert!(containers.get(a).is_some_and(|c| !c.open && !c.is_docked()));
        assert_eq!(dock.tab_bar_count(), 0);
    }
}
