//! # Docking
//!
//! Window arrangement as a forest of binary split trees plus flat tab
//! groups.
//!
//! ```text
//!            Split(Left, 0.3)
//!           /               \
//!     Container A       Split(Top, 0.5)
//!                       /            \
//!                 TabBar[B, C]     Container D
//! ```
//!
//! A *unit* is what occupies a split slot: a container on its own, the tab
//! group it belongs to, or a nested split. Members of a tab group never
//! point at a split themselves; the group carries the membership.
//!
//! Roots are splits without a parent. A dockspace owns at most one root,
//! which survives with a single child so the dockspace keeps its layout.

mod split;
mod tabbar;
mod zones;

pub use split::{Split, SplitChild, SplitKind};
pub use tabbar::{TabBar, TabItem};
pub use zones::{dock_zones, preview_rect, DockPosition};

use crate::container::{ContainerRef, Containers, Options};
use crate::layout::{Rect, Vec2};
use std::collections::HashMap;
use tessera_core::{Handle, SlotArena};
use thiserror::Error;
use tracing::{debug, warn};

/// Rejected dock operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DockError {
    /// A container reference no longer resolves.
    #[error("container reference is stale")]
    Stale,
    /// Child and parent are the same container.
    #[error("cannot dock a container onto itself")]
    SelfDock,
    /// Child and parent already share a tab group.
    #[error("containers already share a tab group")]
    SameTabGroup,
    /// Dockspaces are drop targets only.
    #[error("a dockspace cannot be docked")]
    DockspaceChild,
    /// One side carries `Options::NO_DOCK`.
    #[error("container does not take part in docking")]
    NotDockable,
    /// Centre drop onto a dockspace that already holds a layout.
    #[error("dockspace already holds a layout")]
    DockspaceOccupied,
    /// Tab group would exceed its capacity.
    #[error("tab bar is full ({0} items)")]
    TabBarFull(usize),
    /// Structural invariant broken.
    #[error("dock tree is corrupt: {0}")]
    Corrupt(String),
}

/// Split and tab-bar storage plus the operations that keep them
/// consistent with container membership.
#[derive(Debug, Clone)]
pub struct Dock {
    splits: SlotArena<Split>,
    tab_bars: SlotArena<TabBar>,
    max_tab_items: usize,
    focus_counter: u64,
}

impl Dock {
    /// Creates an empty dock whose tab groups hold at most `max_tab_items`.
    #[must_use]
    pub fn new(max_tab_items: usize) -> Self {
        Self {
            splits: SlotArena::new(),
            tab_bars: SlotArena::new(),
            max_tab_items: max_tab_items.max(2),
            focus_counter: 0,
        }
    }

    /// Split node behind `handle`.
    #[inline]
    #[must_use]
    pub fn split(&self, handle: Handle<Split>) -> Option<&Split> {
        self.splits.get(handle)
    }

    /// Tab group behind `handle`.
    #[inline]
    #[must_use]
    pub fn tab_bar(&self, handle: Handle<TabBar>) -> Option<&TabBar> {
        self.tab_bars.get(handle)
    }

    /// Iterates every split node.
    pub fn splits(&self) -> impl Iterator<Item = (Handle<Split>, &Split)> {
        self.splits.iter()
    }

    /// Iterates every tab group.
    pub fn tab_bars(&self) -> impl Iterator<Item = (Handle<TabBar>, &TabBar)> {
        self.tab_bars.iter()
    }

    /// Number of split nodes.
    #[must_use]
    pub fn split_count(&self) -> usize {
        self.splits.len()
    }

    /// Number of tab groups.
    #[must_use]
    pub fn tab_bar_count(&self) -> usize {
        self.tab_bars.len()
    }

    /// Splits without a parent.
    #[must_use]
    pub fn roots(&self) -> Vec<Handle<Split>> {
        self.splits
            .iter()
            .filter(|(_, split)| split.parent.is_none())
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Root of the tree holding `handle`.
    #[must_use]
    pub fn root_of(&self, handle: Handle<Split>) -> Handle<Split> {
        let mut current = handle;
        for _ in 0..=self.splits.len() {
            match self.splits.get(current).and_then(|split| split.parent) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Containers of the tree under `handle`, in depth-first order.
    #[must_use]
    pub fn tree_containers(&self, handle: Handle<Split>) -> Vec<ContainerRef> {
        let mut out = Vec::new();
        self.collect_containers(handle, &mut out, self.splits.len());
        out
    }

    fn collect_containers(&self, handle: Handle<Split>, out: &mut Vec<ContainerRef>, depth: usize) {
        let Some(split) = self.splits.get(handle) else {
            return;
        };
        for child in split.children.iter().flatten() {
            match *child {
                SplitChild::Split(nested) if depth > 0 => self.collect_containers(nested, out, depth - 1),
                SplitChild::Split(_) => {}
                SplitChild::Container(r) => out.push(r),
                SplitChild::TabBar(bar) => {
                    if let Some(tab_bar) = self.tab_bars.get(bar) {
                        out.extend(tab_bar.items.iter().map(|item| item.container));
                    }
                }
            }
        }
    }

    /// Unit that represents `container` in a split slot.
    #[must_use]
    pub fn unit_of(&self, containers: &Containers, container: ContainerRef) -> Option<SplitChild> {
        let c = containers.get(container)?;
        Some(match c.tab_bar {
            Some(bar) => SplitChild::TabBar(bar),
            None => SplitChild::Container(container),
        })
    }

    /// Split slot the unit sits in.
    #[must_use]
    pub fn parent_of(&self, containers: &Containers, unit: SplitChild) -> Option<Handle<Split>> {
        match unit {
            SplitChild::Split(h) => self.splits.get(h).and_then(|s| s.parent),
            SplitChild::TabBar(h) => self.tab_bars.get(h).and_then(|b| b.split),
            SplitChild::Container(r) => containers.get(r).and_then(|c| c.split),
        }
    }

    /// Split holding `container`, directly or through its tab group.
    #[must_use]
    pub fn split_of(&self, containers: &Containers, container: ContainerRef) -> Option<Handle<Split>> {
        let unit = self.unit_of(containers, container)?;
        self.parent_of(containers, unit)
    }

    /// Sets the ratio of `handle` and lays its subtree out again.
    pub fn set_ratio(&mut self, containers: &mut Containers, handle: Handle<Split>, ratio: f32) {
        if let Some(split) = self.splits.get_mut(handle) {
            split.ratio = ratio.clamp(0.0, 1.0);
        }
        self.update_split(containers, handle);
    }

    /// Sets the rect of `handle` and lays its subtree out again.
    pub fn set_rect(&mut self, containers: &mut Containers, handle: Handle<Split>, rect: Rect) {
        if let Some(split) = self.splits.get_mut(handle) {
            split.rect = rect;
        }
        self.update_split(containers, handle);
    }

    /// Recomputes every descendant rect of `handle` from its rect and ratio.
    pub fn update_split(&mut self, containers: &mut Containers, handle: Handle<Split>) {
        let Some(split) = self.splits.get(handle) else {
            return;
        };
        let rects = split.child_rects();
        let children = split.children;
        for (child, rect) in children.into_iter().zip(rects) {
            if let Some(child) = child {
                self.set_unit_rect(containers, child, rect);
            }
        }
    }

    /// Lays out every tree from its root.
    pub fn update_all(&mut self, containers: &mut Containers) {
        for root in self.roots() {
            self.update_split(containers, root);
        }
    }

    /// Docks `child` next to, or as a tab of, `parent`.
    ///
    /// Dropping onto a dockspace fills its root slot; `ratio` is the share
    /// `child` receives.
    ///
    /// # Errors
    ///
    /// Returns a [`DockError`] and leaves the tree untouched when the drop
    /// is not allowed.
    pub fn dock(
        &mut self,
        containers: &mut Containers,
        child: ContainerRef,
        parent: ContainerRef,
        position: DockPosition,
        ratio: f32,
    ) -> Result<(), DockError> {
        if let Err(err) = self.check_dock(containers, child, parent, position) {
            warn!(?child, ?parent, ?position, %err, "dock rejected");
            return Err(err);
        }
        let ratio = ratio.clamp(0.0, 1.0);
        let parent_is_dockspace = containers.get(parent).is_some_and(|c| c.is_dockspace());

        let child_unit = self.unit_of(containers, child).ok_or(DockError::Stale)?;
        self.detach(containers, child_unit);

        if parent_is_dockspace {
            self.dock_into_dockspace(containers, child_unit, parent, position, ratio);
        } else if position == DockPosition::Tab {
            self.dock_tab(containers, child, child_unit, parent);
        } else {
            self.dock_side(containers, child_unit, parent, position, ratio);
        }
        debug!(?child, ?parent, ?position, ratio, "docked");
        Ok(())
    }

    /// Removes `container` from its tab group or split.
    ///
    /// A tab group left with one member dissolves; a split left with one
    /// child is replaced by that child. Undocking a floating container is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DockError::Stale`] if `container` no longer resolves.
    pub fn undock(&mut self, containers: &mut Containers, container: ContainerRef) -> Result<(), DockError> {
        let c = containers.get(container).ok_or(DockError::Stale)?;
        let (tab_bar, split) = (c.tab_bar, c.split);

        if let Some(bar_handle) = tab_bar {
            if let Some(bar) = self.tab_bars.get_mut(bar_handle) {
                bar.remove(container);
            }
            if let Some(c) = containers.get_mut(container) {
                c.tab_bar = None;
                c.visible = true;
            }
            let remaining = self.tab_bars.get(bar_handle).map_or(0, TabBar::len);
            if remaining < 2 {
                self.dissolve(containers, bar_handle);
            } else {
                self.refresh_tabs(containers, bar_handle);
            }
            debug!(?container, "undocked from tab bar");
        } else if split.is_some() {
            self.detach(containers, SplitChild::Container(container));
            debug!(?container, "undocked from split");
        }
        Ok(())
    }

    /// Makes the tab at `index` the visible member of `bar`.
    pub fn focus_tab(&mut self, containers: &mut Containers, bar: Handle<TabBar>, index: usize) {
        self.focus_counter += 1;
        let order = self.focus_counter;
        if let Some(tab_bar) = self.tab_bars.get_mut(bar) {
            let index = index.min(tab_bar.len().saturating_sub(1));
            tab_bar.set_focus(index, order);
        }
        self.refresh_tabs(containers, bar);
    }

    /// Swaps two tabs of `bar`.
    pub fn swap_tabs(&mut self, bar: Handle<TabBar>, a: usize, b: usize) {
        if let Some(tab_bar) = self.tab_bars.get_mut(bar) {
            tab_bar.swap(a, b);
        }
    }

    /// Moves a floating tab group and its members by `delta`.
    pub fn move_tab_bar(&mut self, containers: &mut Containers, bar: Handle<TabBar>, delta: Vec2) {
        let Some(tab_bar) = self.tab_bars.get(bar) else {
            return;
        };
        if tab_bar.split.is_some() {
            return;
        }
        let rect = tab_bar.rect.offset(delta);
        self.set_unit_rect(containers, SplitChild::TabBar(bar), rect);
    }

    /// Sets the rect of a floating tab group and its members.
    pub fn resize_tab_bar(&mut self, containers: &mut Containers, bar: Handle<TabBar>, rect: Rect) {
        if self.tab_bars.get(bar).is_some_and(|b| b.split.is_none()) {
            self.set_unit_rect(containers, SplitChild::TabBar(bar), rect);
        }
    }

    /// Drops references to containers whose pool slot was recycled.
    pub fn prune(&mut self, containers: &mut Containers) {
        let stale_bars: Vec<(Handle<TabBar>, Vec<ContainerRef>)> = self
            .tab_bars
            .iter()
            .map(|(h, bar)| {
                let stale = bar
                    .items
                    .iter()
                    .map(|item| item.container)
                    .filter(|r| !containers.is_valid(*r))
                    .collect::<Vec<_>>();
                (h, stale)
            })
            .filter(|(_, stale)| !stale.is_empty())
            .collect();
        for (bar_handle, stale) in stale_bars {
            if let Some(bar) = self.tab_bars.get_mut(bar_handle) {
                for r in &stale {
                    bar.remove(*r);
                }
            }
            debug!(bar = ?bar_handle, count = stale.len(), "pruned stale tab members");
            if self.tab_bars.get(bar_handle).map_or(0, TabBar::len) < 2 {
                self.dissolve(containers, bar_handle);
            } else {
                self.refresh_tabs(containers, bar_handle);
            }
        }

        let stale_leaves: Vec<(Handle<Split>, ContainerRef)> = self
            .splits
            .iter()
            .flat_map(|(h, split)| {
                split.children.iter().filter_map(move |child| match child {
                    Some(SplitChild::Container(r)) => Some((h, *r)),
                    _ => None,
                })
            })
            .filter(|(_, r)| !containers.is_valid(*r))
            .collect();
        for (handle, r) in stale_leaves {
            if let Some(split) = self.splits.get_mut(handle) {
                if let Some(slot) = split.slot_of(SplitChild::Container(r)) {
                    split.children[slot] = None;
                }
            }
            debug!(split = ?handle, container = ?r, "pruned stale split leaf");
            self.collapse(containers, handle);
        }

        let orphaned_roots: Vec<Handle<Split>> = self
            .splits
            .iter()
            .filter(|(_, split)| split.dockspace.is_some_and(|d| !containers.is_valid(d)))
            .map(|(h, _)| h)
            .collect();
        for handle in orphaned_roots {
            if let Some(split) = self.splits.get_mut(handle) {
                split.dockspace = None;
            }
            self.collapse(containers, handle);
        }
    }

    /// Checks the structural invariants of every tree and tab group.
    ///
    /// # Errors
    ///
    /// Returns [`DockError::Corrupt`] describing the first violation.
    pub fn validate(&self, containers: &Containers) -> Result<(), DockError> {
        let corrupt = |msg: String| Err(DockError::Corrupt(msg));
        let mut seen: HashMap<SplitChild, Handle<Split>> = HashMap::new();

        for (h, split) in self.splits.iter() {
            if split.child_count() == 0 {
                return corrupt(format!("{h:?} has no children"));
            }
            if split.children[0].is_some() && split.children[0] == split.children[1] {
                return corrupt(format!("{h:?} holds the same child twice"));
            }
            if split.child_count() == 1 && split.dockspace.is_none() {
                return corrupt(format!("{h:?} has a single child outside a dockspace"));
            }
            for child in split.children.iter().flatten() {
                if let Some(other) = seen.insert(*child, h) {
                    return corrupt(format!("{child:?} is held by {other:?} and {h:?}"));
                }
                let back = match *child {
                    SplitChild::Split(s) => self.splits.get(s).and_then(|s| s.parent),
                    SplitChild::TabBar(b) => match self.tab_bars.get(b) {
                        Some(bar) => bar.split,
                        None => return corrupt(format!("{h:?} holds a freed tab bar")),
                    },
                    SplitChild::Container(r) => match containers.get(r) {
                        Some(c) if c.tab_bar.is_some() => {
                            return corrupt(format!("{r:?} is a tab member held directly"))
                        }
                        Some(c) => c.split,
                        None => return corrupt(format!("{h:?} holds stale {r:?}")),
                    },
                };
                if back != Some(h) {
                    return corrupt(format!("{child:?} does not link back to {h:?}"));
                }
            }
            if let Some(parent) = split.parent {
                let holds = self
                    .splits
                    .get(parent)
                    .is_some_and(|p| p.slot_of(SplitChild::Split(h)).is_some());
                if !holds {
                    return corrupt(format!("{parent:?} does not hold {h:?}"));
                }
                if split.dockspace.is_some() {
                    return corrupt(format!("{h:?} is a nested dockspace root"));
                }
            }
            let root = self.root_of(h);
            if self.splits.get(root).is_some_and(|r| r.parent.is_some()) {
                return corrupt(format!("{h:?} is not reachable from a root"));
            }
            if let Some(d) = split.dockspace {
                if containers.get(d).and_then(|c| c.dockspace_root) != Some(h) {
                    return corrupt(format!("{h:?} is not the root of its dockspace"));
                }
            }
        }

        for (h, bar) in self.tab_bars.iter() {
            if bar.len() < 2 {
                return corrupt(format!("{h:?} has fewer than two members"));
            }
            if bar.focus >= bar.len() {
                return corrupt(format!("{h:?} focus out of range"));
            }
            for (i, item) in bar.items.iter().enumerate() {
                if bar.items[..i].iter().any(|other| other.container == item.container) {
                    return corrupt(format!("{h:?} holds {:?} twice", item.container));
                }
                let c = match containers.get(item.container) {
                    Some(c) => c,
                    None => return corrupt(format!("{h:?} holds stale {:?}", item.container)),
                };
                if c.tab_bar != Some(h) || c.split.is_some() {
                    return corrupt(format!("{:?} does not link back to {h:?}", item.container));
                }
            }
            if let Some(s) = bar.split {
                if !seen.contains_key(&SplitChild::TabBar(h)) || seen[&SplitChild::TabBar(h)] != s {
                    return corrupt(format!("{h:?} claims {s:?} which does not hold it"));
                }
            }
        }

        for (r, c) in containers.iter() {
            if let Some(s) = c.split {
                if seen.get(&SplitChild::Container(r)) != Some(&s) {
                    return corrupt(format!("{r:?} claims {s:?} which does not hold it"));
                }
            }
            if let Some(b) = c.tab_bar {
                if self.tab_bars.get(b).and_then(|bar| bar.index_of(r)).is_none() {
                    return corrupt(format!("{r:?} claims {b:?} which does not hold it"));
                }
            }
            if let Some(root) = c.dockspace_root {
                if self.splits.get(root).and_then(|s| s.dockspace) != Some(r) {
                    return corrupt(format!("{r:?} points at a root it does not own"));
                }
            }
        }
        Ok(())
    }

    fn check_dock(
        &self,
        containers: &Containers,
        child: ContainerRef,
        parent: ContainerRef,
        position: DockPosition,
    ) -> Result<(), DockError> {
        let child_c = containers.get(child).ok_or(DockError::Stale)?;
        let parent_c = containers.get(parent).ok_or(DockError::Stale)?;
        if child == parent {
            return Err(DockError::SelfDock);
        }
        if child_c.is_dockspace() {
            return Err(DockError::DockspaceChild);
        }
        if child_c.options.has(Options::NO_DOCK) || parent_c.options.has(Options::NO_DOCK) {
            return Err(DockError::NotDockable);
        }
        if child_c.tab_bar.is_some() && child_c.tab_bar == parent_c.tab_bar {
            return Err(DockError::SameTabGroup);
        }
        if parent_c.is_dockspace() {
            if position == DockPosition::Tab && parent_c.dockspace_root.is_some() {
                return Err(DockError::DockspaceOccupied);
            }
            return Ok(());
        }
        if position == DockPosition::Tab {
            let incoming = child_c
                .tab_bar
                .and_then(|b| self.tab_bars.get(b))
                .map_or(1, TabBar::len);
            let present = parent_c
                .tab_bar
                .and_then(|b| self.tab_bars.get(b))
                .map_or(1, TabBar::len);
            if incoming + present > self.max_tab_items {
                return Err(DockError::TabBarFull(self.max_tab_items));
            }
        }
        Ok(())
    }

    fn dock_tab(
        &mut self,
        containers: &mut Containers,
        child: ContainerRef,
        child_unit: SplitChild,
        parent: ContainerRef,
    ) {
        let existing = containers.get(parent).and_then(|c| c.tab_bar);
        let bar_handle = match existing {
            Some(bar) => bar,
            None => {
                let rect = containers.get(parent).map_or(Rect::ZERO, |c| c.rect);
                let bar = self.tab_bars.insert(TabBar::new(rect));
                self.substitute(containers, SplitChild::Container(parent), SplitChild::TabBar(bar));
                self.join_tab_bar(containers, bar, parent);
                debug!(?bar, ?parent, "created tab bar");
                bar
            }
        };

        let members = match child_unit {
            SplitChild::TabBar(absorbed) => {
                let items = self.tab_bars.remove(absorbed).map(|b| b.items).unwrap_or_default();
                debug!(?absorbed, into = ?bar_handle, count = items.len(), "merged tab bars");
                items.into_iter().map(|item| item.container).collect()
            }
            _ => vec![child],
        };
        for member in members {
            self.join_tab_bar(containers, bar_handle, member);
        }

        let index = self.tab_bars.get(bar_handle).and_then(|b| b.index_of(child));
        if let Some(index) = index {
            self.focus_tab(containers, bar_handle, index);
        }
        let rect = self.tab_bars.get(bar_handle).map_or(Rect::ZERO, |b| b.rect);
        self.set_unit_rect(containers, SplitChild::TabBar(bar_handle), rect);
    }

    fn dock_side(
        &mut self,
        containers: &mut Containers,
        child_unit: SplitChild,
        parent: ContainerRef,
        position: DockPosition,
        ratio: f32,
    ) {
        let Some(kind) = position.split_kind() else {
            return;
        };
        let Some(parent_unit) = self.unit_of(containers, parent) else {
            return;
        };
        let rect = self.unit_rect(containers, parent_unit);
        let handle = self
            .splits
            .insert(Split::new(kind, ratio, rect, child_unit, parent_unit));
        self.substitute(containers, parent_unit, SplitChild::Split(handle));
        self.set_parent(containers, child_unit, Some(handle));
        self.set_parent(containers, parent_unit, Some(handle));
        debug!(split = ?handle, ?kind, "created split");
        self.update_split(containers, handle);
    }

    fn dock_into_dockspace(
        &mut self,
        containers: &mut Containers,
        child_unit: SplitChild,
        dockspace: ContainerRef,
        position: DockPosition,
        ratio: f32,
    ) {
        let (body, root) = match containers.get(dockspace) {
            Some(c) => (c.body, c.dockspace_root),
            None => return,
        };
        let kind = position.split_kind();

        let handle = match root.and_then(|r| self.splits.get(r).map(|s| (r, s.single_child()))) {
            None => {
                let mut split = Split::new(kind.unwrap_or(SplitKind::Left), 1.0, body, child_unit, child_unit);
                split.children[1] = None;
                split.dockspace = Some(dockspace);
                let handle = self.splits.insert(split);
                if let Some(c) = containers.get_mut(dockspace) {
                    c.dockspace_root = Some(handle);
                }
                debug!(root = ?handle, ?dockspace, "created dockspace root");
                handle
            }
            Some((root, Some(existing))) => {
                if let Some(split) = self.splits.get_mut(root) {
                    split.kind = kind.unwrap_or(split.kind);
                    split.ratio = ratio;
                    split.children = [Some(child_unit), Some(existing)];
                }
                root
            }
            Some((root, None)) => {
                let rect = self.splits.get(root).map_or(body, |s| s.rect);
                let mut wrapper = Split::new(
                    kind.unwrap_or(SplitKind::Left),
                    ratio,
                    rect,
                    child_unit,
                    SplitChild::Split(root),
                );
                wrapper.dockspace = Some(dockspace);
                let handle = self.splits.insert(wrapper);
                if let Some(old) = self.splits.get_mut(root) {
                    old.dockspace = None;
                    old.parent = Some(handle);
                }
                if let Some(c) = containers.get_mut(dockspace) {
                    c.dockspace_root = Some(handle);
                }
                debug!(root = ?handle, ?dockspace, "wrapped dockspace root");
                handle
            }
        };
        self.set_parent(containers, child_unit, Some(handle));
        self.update_split(containers, handle);
    }

    /// Takes `unit` out of its split slot and collapses what is left.
    fn detach(&mut self, containers: &mut Containers, unit: SplitChild) {
        let Some(parent) = self.parent_of(containers, unit) else {
            return;
        };
        if let Some(split) = self.splits.get_mut(parent) {
            if let Some(slot) = split.slot_of(unit) {
                split.children[slot] = None;
            }
        }
        self.set_parent(containers, unit, None);
        self.collapse(containers, parent);
    }

    /// Restores the shape rules after `handle` lost a child.
    fn collapse(&mut self, containers: &mut Containers, handle: Handle<Split>) {
        let Some(split) = self.splits.get(handle) else {
            return;
        };
        if split.child_count() >= 2 {
            return;
        }
        let (parent, dockspace, rect, remaining) =
            (split.parent, split.dockspace, split.rect, split.single_child());

        if let (None, Some(owner)) = (parent, dockspace) {
            if remaining.is_none() {
                self.splits.remove(handle);
                if let Some(c) = containers.get_mut(owner) {
                    c.dockspace_root = None;
                }
                debug!(root = ?handle, "emptied dockspace root");
            } else {
                self.update_split(containers, handle);
            }
            return;
        }

        self.splits.remove(handle);
        debug!(split = ?handle, "collapsed split");
        match (parent, remaining) {
            (Some(grand), Some(child)) => {
                if let Some(g) = self.splits.get_mut(grand) {
                    if let Some(slot) = g.slot_of(SplitChild::Split(handle)) {
                        g.children[slot] = Some(child);
                    }
                }
                self.set_parent(containers, child, Some(grand));
                self.update_split(containers, grand);
            }
            (Some(grand), None) => {
                if let Some(g) = self.splits.get_mut(grand) {
                    if let Some(slot) = g.slot_of(SplitChild::Split(handle)) {
                        g.children[slot] = None;
                    }
                }
                self.collapse(containers, grand);
            }
            (None, Some(child)) => {
                self.set_parent(containers, child, None);
                self.set_unit_rect(containers, child, rect);
            }
            (None, None) => {}
        }
    }

    /// Breaks up a tab group with fewer than two members.
    fn dissolve(&mut self, containers: &mut Containers, bar_handle: Handle<TabBar>) {
        let last = self
            .tab_bars
            .get(bar_handle)
            .and_then(|b| b.items.first().map(|item| item.container));
        match last {
            Some(member) => {
                self.substitute(containers, SplitChild::TabBar(bar_handle), SplitChild::Container(member));
                if let Some(c) = containers.get_mut(member) {
                    c.tab_bar = None;
                    c.visible = true;
                }
            }
            None => self.detach(containers, SplitChild::TabBar(bar_handle)),
        }
        self.tab_bars.remove(bar_handle);
        debug!(bar = ?bar_handle, "dissolved tab bar");
    }

    /// Puts `new` into the split slot of `old`. Returns the split, if any.
    fn substitute(&mut self, containers: &mut Containers, old: SplitChild, new: SplitChild) -> Option<Handle<Split>> {
        let parent = self.parent_of(containers, old);
        if let Some(p) = parent {
            if let Some(split) = self.splits.get_mut(p) {
                if let Some(slot) = split.slot_of(old) {
                    split.children[slot] = Some(new);
                }
            }
        }
        self.set_parent(containers, old, None);
        self.set_parent(containers, new, parent);
        parent
    }

    fn join_tab_bar(&mut self, containers: &mut Containers, bar: Handle<TabBar>, member: ContainerRef) {
        self.focus_counter += 1;
        let order = self.focus_counter;
        if let Some(tab_bar) = self.tab_bars.get_mut(bar) {
            if tab_bar.index_of(member).is_none() {
                tab_bar.push(member, order);
            }
        }
        if let Some(c) = containers.get_mut(member) {
            c.tab_bar = Some(bar);
            c.split = None;
        }
    }

    fn refresh_tabs(&self, containers: &mut Containers, bar: Handle<TabBar>) {
        let Some(tab_bar) = self.tab_bars.get(bar) else {
            return;
        };
        for item in &tab_bar.items {
            let visible = tab_bar.is_visible(item.container);
            if let Some(c) = containers.get_mut(item.container) {
                c.visible = visible;
            }
        }
    }

    fn set_parent(&mut self, containers: &mut Containers, unit: SplitChild, parent: Option<Handle<Split>>) {
        match unit {
            SplitChild::Split(h) => {
                if let Some(split) = self.splits.get_mut(h) {
                    split.parent = parent;
                }
            }
            SplitChild::TabBar(h) => {
                if let Some(bar) = self.tab_bars.get_mut(h) {
                    bar.split = parent;
                }
            }
            SplitChild::Container(r) => {
                if let Some(c) = containers.get_mut(r) {
                    c.split = parent;
                }
            }
        }
    }

    fn unit_rect(&self, containers: &Containers, unit: SplitChild) -> Rect {
        match unit {
            SplitChild::Split(h) => self.splits.get(h).map_or(Rect::ZERO, |s| s.rect),
            SplitChild::TabBar(h) => self.tab_bars.get(h).map_or(Rect::ZERO, |b| b.rect),
            SplitChild::Container(r) => containers.get(r).map_or(Rect::ZERO, |c| c.rect),
        }
    }

    fn set_unit_rect(&mut self, containers: &mut Containers, unit: SplitChild, rect: Rect) {
        match unit {
            SplitChild::Split(h) => {
                if let Some(split) = self.splits.get_mut(h) {
                    split.rect = rect;
                }
                self.update_split(containers, h);
            }
            SplitChild::TabBar(h) => {
                let Some(bar) = self.tab_bars.get_mut(h) else {
                    return;
                };
                bar.rect = rect;
                for item in &bar.items {
                    if let Some(c) = containers.get_mut(item.container) {
                        c.rect = rect;
                    }
                }
            }
            SplitChild::Container(r) => {
                if let Some(c) = containers.get_mut(r) {
                    c.rect = rect;
                }
            }
        }
    }
}
