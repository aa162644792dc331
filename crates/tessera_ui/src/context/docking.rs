//! Split handles and the drag-to-dock overlay.

use super::{Context, OVERLAY_Z};
use crate::container::{ContainerRef, Options};
use crate::dock::{dock_zones, preview_rect, DockError, DockPosition, Split};
use crate::input::MouseButton;
use crate::layout::Rect;
use crate::request::{Edge, Request};
use crate::style::{ElementType, StyleState};
use tessera_core::Handle;
use tracing::trace;

/// Draggable strip queued by [`Context::split_handles`].
#[derive(Debug, Clone, Copy)]
enum Grip {
    Divider(Handle<Split>),
    Edge(Handle<Split>, Edge),
}

/// Drop target under the pointer while a container is dragged.
#[derive(Debug, Clone, Copy)]
struct DropTarget {
    container: ContainerRef,
    rect: Rect,
    empty_dockspace: bool,
}

impl Context {
    /// Dividers between docked siblings and the outer edges of floating
    /// trees. Runs at the start of the frame, after layout of the trees.
    pub(super) fn split_handles(&mut self) {
        let thickness = self.config.handle_size;
        let mut grips: Vec<(Grip, Rect)> = Vec::new();
        for (handle, split) in self.dock.splits() {
            if let Some(divider) = split.divider(thickness) {
                grips.push((Grip::Divider(handle), divider));
            }
            if split.parent.is_none() && split.dockspace.is_none() {
                for edge in Edge::ALL {
                    grips.push((Grip::Edge(handle, edge), edge.handle(split.rect, thickness)));
                }
            }
        }
        if grips.is_empty() {
            return;
        }

        let mouse = self.input.mouse;
        let over_any = grips.iter().any(|(_, rect)| rect.contains(mouse));
        if self.begin_overlay("#dock_handles", over_any).is_none() {
            return;
        }
        for (grip, rect) in grips {
            self.split_grip(grip, rect);
        }
        self.end_overlay();
    }

    fn split_grip(&mut self, grip: Grip, rect: Rect) {
        let id = match grip {
            Grip::Divider(handle) => self.id_of_value(&handle.to_bits()),
            Grip::Edge(handle, edge) => {
                let bits = [handle.to_bits(), edge as u64];
                self.id_of_value(&bits)
            }
        };
        let state = self.update_control(id, rect, Options::NONE, ElementType::DockHandle);
        let style = self.control_style(id, ElementType::DockHandle);
        if style.background.a > 0.0 {
            self.draw_rect(rect, style.background);
        }
        if state != StyleState::Focus || !self.input.mouse_down(MouseButton::Left) {
            return;
        }
        self.lock_hover(id);
        let delta = self.input.mouse_delta();
        match grip {
            Grip::Divider(handle) => {
                let min = self.config.min_split_ratio;
                if let Some(split) = self.dock.split(handle) {
                    let ratio = split.dragged_ratio(delta, min);
                    if (ratio - split.ratio).abs() > f32::EPSILON {
                        self.request(Request::Ratio { split: handle, ratio });
                    }
                }
            }
            Grip::Edge(split, edge) => {
                if delta.x != 0.0 || delta.y != 0.0 {
                    self.request(Request::ResizeSplit { split, edge, delta });
                }
            }
        }
    }

    /// While a container is dragged, shows the dock zones of the window
    /// under the pointer and queues the dock when the button is released.
    pub(super) fn docking(&mut self) {
        let Some(child) = self.dragging else {
            return;
        };
        if !self.containers.is_valid(child) {
            self.dragging = None;
            return;
        }
        let released = self.input.mouse_released(MouseButton::Left);
        if !released && !self.input.mouse_down(MouseButton::Left) {
            self.dragging = None;
            return;
        }

        let travelled = (self.input.mouse - self.input.press_pos).length();
        let target = if travelled > self.config.drag_threshold {
            self.drop_target(child)
        } else {
            None
        };
        let Some(target) = target else {
            if released {
                self.dragging = None;
            }
            return;
        };

        let zones = dock_zones(target.rect, self.config.dock_zone_size, self.config.dock_zone_gap);
        let mouse = self.input.mouse;
        let hit = zones.iter().find(|(_, rect)| rect.contains(mouse)).map(|(pos, _)| *pos);
        let ratio = if target.empty_dockspace { 1.0 } else { 0.5 };

        self.dock_preview(&zones, hit, target, ratio);

        if released {
            if let Some(position) = hit {
                trace!(?position, "dock drop");
                self.request(Request::Dock {
                    child,
                    parent: target.container,
                    position,
                    ratio,
                });
            }
            self.dragging = None;
        }
    }

    /// Topmost open, dockable root under the pointer other than `child`
    /// and the tabs it shares a group with.
    fn drop_target(&self, child: ContainerRef) -> Option<DropTarget> {
        let mouse = self.input.mouse;
        let child_bar = self.containers.get(child).and_then(|c| c.tab_bar);
        self.root_list
            .iter()
            .filter(|r| **r != child)
            .filter_map(|r| self.containers.get(*r).map(|c| (*r, c)))
            .filter(|(_, c)| {
                c.open
                    && c.visible
                    && c.zindex < OVERLAY_Z
                    && !c.options.has(Options::NO_DOCK)
                    && !c.options.has(Options::POPUP)
                    && (child_bar.is_none() || c.tab_bar != child_bar)
                    && c.rect.contains(mouse)
            })
            .max_by_key(|(_, c)| c.zindex)
            .map(|(r, c)| {
                DropTarget {
                    container: r,
                    rect: if c.is_dockspace() { c.body } else { c.rect },
                    empty_dockspace: c.is_dockspace() && c.dockspace_root.is_none(),
                }
            })
    }

    fn dock_preview(&mut self, zones: &[(DockPosition, Rect); 5], hit: Option<DockPosition>, target: DropTarget, ratio: f32) {
        let Some(overlay) = self.begin_overlay("#dock_preview", false) else {
            return;
        };
        if let Some(c) = self.containers.get_mut(overlay) {
            c.zindex = OVERLAY_Z + 1;
        }

        if let Some(position) = hit {
            let area = preview_rect(target.rect, position, ratio);
            let style = self.resolve_style(ElementType::DockZone, StyleState::Focus);
            self.draw_frame(area, &style);
        }
        for (position, rect) in zones {
            let state = if hit == Some(*position) {
                StyleState::Hover
            } else {
                StyleState::Default
            };
            let style = self.resolve_style(ElementType::DockZone, state);
            self.draw_frame(*rect, &style);
        }
        self.end_overlay();
    }

    /// Container currently dragged for docking, if any.
    #[must_use]
    pub fn dragged_container(&self) -> Option<ContainerRef> {
        self.dragging
    }

    /// Checks the dock trees against the container table.
    ///
    /// # Errors
    ///
    /// Returns [`DockError::Corrupt`] describing the first broken link.
    pub fn validate_dock(&self) -> Result<(), DockError> {
        self.dock.validate(&self.containers)
    }
}
