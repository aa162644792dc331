//! Tab groups.

use super::Split;
use crate::container::ContainerRef;
use crate::layout::Rect;
use tessera_core::Handle;

/// One member of a tab group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabItem {
    /// Member container.
    pub container: ContainerRef,
    /// Focus stamp; the highest stamp is the most recently focused tab.
    pub order: u64,
}

/// Containers sharing one slot, one of them visible at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct TabBar {
    /// Members in strip order.
    pub items: Vec<TabItem>,
    /// Index of the visible member.
    pub focus: usize,
    /// Area covered by the group.
    pub rect: Rect,
    /// Split slot the group occupies; `None` when floating.
    pub split: Option<Handle<Split>>,
}

impl TabBar {
    /// Creates an empty, floating group.
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self {
            items: Vec::new(),
            focus: 0,
            rect,
            split: None,
        }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Strip index of `container`.
    #[must_use]
    pub fn index_of(&self, container: ContainerRef) -> Option<usize> {
        self.items.iter().position(|item| item.container == container)
    }

    /// The visible member.
    #[must_use]
    pub fn focused(&self) -> Option<ContainerRef> {
        self.items.get(self.focus).map(|item| item.container)
    }

    /// Returns true if `container` is the visible member.
    #[must_use]
    pub fn is_visible(&self, container: ContainerRef) -> bool {
        self.focused() == Some(container)
    }

    /// Appends `container` and makes it visible.
    pub fn push(&mut self, container: ContainerRef, order: u64) {
        self.items.push(TabItem { container, order });
        self.focus = self.items.len() - 1;
    }

    /// Makes the member at `index` visible.
    pub fn set_focus(&mut self, index: usize, order: u64) {
        if let Some(item) = self.items.get_mut(index) {
            item.order = order;
            self.focus = index;
        }
    }

    /// Swaps two members, keeping the visible member visible.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a >= self.items.len() || b >= self.items.len() {
            return;
        }
        self.items.swap(a, b);
        if self.focus == a {
            self.focus = b;
        } else if self.focus == b {
            self.focus = a;
        }
    }

    /// Removes `container`; focus falls back to the most recently
    /// focused remaining member.
    pub fn remove(&mut self, container: ContainerRef) -> bool {
        let Some(index) = self.index_of(container) else {
            return false;
        };
        let was_focused = index == self.focus;
        self.items.remove(index);

        if was_focused {
            self.focus = self
                .items
                .iter()
                .enumerate()
                .max_by_key(|(_, item)| item.order)
                .map_or(0, |(i, _)| i);
        } else if index < self.focus {
            self.focus -= 1;
        }
        true
    }

    /// Rect of the tab at `index` when `count` tabs share `strip`.
    #[must_use]
    pub fn tab_rect(strip: Rect, tab_width: f32, index: usize, count: usize) -> Rect {
        #[allow(clippy::cast_precision_loss)]
        let width = if count > 0 {
            tab_width.min(strip.width / count as f32)
        } else {
            tab_width
        };
        #[allow(clippy::cast_precision_loss)]
        Rect::new(strip.x + width * index as f32, strip.y, width, strip.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::Id;

    fn member(n: u32) -> ContainerRef {
        ContainerRef { slot: n as usize, id: Id(n) }
    }

    #[test]
    fn test_push_focuses_newest() {
        let mut bar = TabBar::new(Rect::ZERO);
        bar.push(member(1), 1);
        bar.push(member(2), 2);
        assert_eq!(bar.focused(), Some(member(2)));
    }

    #[test]
    fn test_remove_focus_falls_back_to_recent() {
        let mut bar = TabBar::new(Rect::ZERO);
        bar.push(member(1), 1);
        bar.push(member(2), 2);
        bar.push(member(3), 3);
        bar.set_focus(0, 4);
        bar.set_focus(2, 5);

        assert!(bar.remove(member(3)));
        assert_eq!(bar.focused(), Some(member(1)));
        assert!(!bar.remove(member(3)));
    }

    #[test]
    fn test_remove_before_focus_shifts_index() {
        let mut bar = TabBar::new(Rect::ZERO);
        bar.push(member(1), 1);
        bar.push(member(2), 2);
        bar.remove(member(1));
        assert_eq!(bar.focused(), Some(member(2)));
    }

    #[test]
    fn test_swap_keeps_visible_member() {
        let mut bar = TabBar::new(Rect::ZERO);
        bar.push(member(1), 1);
        bar.push(member(2), 2);
        bar.swap(0, 1);
        assert_eq!(bar.items[0].container, member(2));
        assert_eq!(bar.focused(), Some(member(2)));
    }

    #[test]
    fn test_tab_rects_shrink_to_fit() {
        let strip = Rect::new(10.0, 0.0, 100.0, 20.0);
        assert_eq!(TabBar::tab_rect(strip, 120.0, 1, 2), Rect::new(60.0, 0.0, 50.0, 20.0));
        assert_eq!(TabBar::tab_rect(strip, 30.0, 2, 3), Rect::new(70.0, 0.0, 30.0, 20.0));
    }
}
