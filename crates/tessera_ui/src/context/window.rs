//! Windows, panels, popups, scrollbars and tab strips.

use super::{Context, OVERLAY_Z};
use crate::container::{ContainerRef, Options};
use crate::dock::TabBar;
use crate::input::MouseButton;
use crate::layout::{Rect, Vec2};
use crate::request::Request;
use crate::style::{ElementType, StyleState};
use tessera_core::Handle;

impl Context {
    /// Opens a root container: its commands form one z-ordered region.
    fn begin_root_container(&mut self, r: ContainerRef, hoverable: bool) {
        self.container_stack.push(r);
        self.root_stack.push(r);
        self.root_list.push(r);

        let head = self.commands.push_jump(None);
        let mouse = self.input.mouse;
        let candidate = self.containers.get(r).map(|c| (c.rect, c.zindex));
        if let Some((rect, zindex)) = candidate {
            let above = self
                .next_hover_root
                .and_then(|h| self.containers.get(h))
                .map_or(true, |h| zindex >= h.zindex);
            if hoverable && rect.contains(mouse) && above {
                self.next_hover_root = Some(r);
            }
        }
        if let Some(c) = self.containers.get_mut(r) {
            c.head = Some(head);
        }
        self.clips.push_unclipped(Rect::UNCLIPPED);
    }

    fn end_root_container(&mut self) {
        let tail = self.commands.push_jump(None);
        if let Some(r) = self.root_stack.pop() {
            if let Some(c) = self.containers.get_mut(r) {
                c.tail = Some(tail);
            }
        }
        self.clips.pop();
        self.end_container();
    }

    fn end_container(&mut self) {
        let layout = self.layouts.pop();
        let r = self.container_stack.pop();
        if let (Some(layout), Some(r)) = (layout, r) {
            if let Some(c) = self.containers.get_mut(r) {
                c.content_size = layout.content_size();
            }
        }
        self.pop_id();
    }

    /// Opens an overlay root drawn above every window.
    pub(super) fn begin_overlay(&mut self, name: &str, hoverable: bool) -> Option<ContainerRef> {
        let id = self.get_id(name.as_bytes());
        let (r, _) = self.containers.obtain(id, self.frame);
        let viewport = self.hints.viewport;
        if let Some(c) = self.containers.get_mut(r) {
            c.rect = viewport;
            c.body = viewport;
            c.zindex = OVERLAY_Z;
            c.options = Options::NO_DOCK | Options::NO_SCROLL;
            c.last_frame = self.frame;
        }
        self.ids.push(id);
        self.begin_root_container(r, hoverable);
        self.push_layout(viewport, Vec2::ZERO, ElementType::Panel);
        Some(r)
    }

    /// Closes an overlay root.
    pub(super) fn end_overlay(&mut self) {
        self.end_root_container();
    }

    /// Begins a window. Returns false when it is closed or hidden behind
    /// another tab; [`end_window`](Self::end_window) must be called only
    /// when this returns true.
    pub fn begin_window(&mut self, title: &str, rect: Rect, options: Options) -> bool {
        let id = self.get_id(title.as_bytes());
        let (r, fresh) = self.containers.obtain(id, self.frame);
        if fresh {
            self.bring_to_front(r);
        }
        let Some(c) = self.containers.get_mut(r) else {
            return false;
        };
        if fresh {
            c.rect = rect;
            c.open = !options.has(Options::CLOSED);
        }
        c.title.clear();
        c.title.push_str(title);
        c.options = options;
        c.last_frame = self.frame;
        if !c.open || !c.visible {
            return false;
        }
        let docked = c.is_docked();
        let in_tabs = c.tab_bar.is_some();
        let dockspace_root = c.dockspace_root;

        self.ids.push(id);
        self.begin_root_container(r, true);

        let mut rect = self.containers.get(r).map_or(rect, |c| c.rect);
        if options.has(Options::AUTO_SIZE) && !docked {
            rect = self.auto_size(r, rect, options);
        }
        let mut body = rect;

        let frame_element = if options.has(Options::DOCKSPACE) {
            ElementType::Dockspace
        } else {
            ElementType::Window
        };
        if !options.has(Options::NO_FRAME) {
            let style = self.resolve_for(frame_element, StyleState::Default, id);
            self.draw_frame(rect, &style);
        }

        if !options.has(Options::NO_TITLE) {
            let title_rect = Rect::new(rect.x, rect.y, rect.width, self.config.title_height);
            if in_tabs {
                self.tab_strip(r, title_rect);
            } else {
                self.title_bar(r, title, title_rect, options, docked);
            }
            body.y += title_rect.height;
            body.height -= title_rect.height;
        }

        if let Some(root) = dockspace_root {
            self.dock.set_rect(&mut self.containers, root, body);
        }

        if !options.has(Options::NO_RESIZE) && !docked && !options.has(Options::DOCKSPACE) {
            self.resize_handle(r, rect);
        }

        self.push_container_body(r, body, options);

        if options.has(Options::POPUP) && self.input.any_pressed() && self.hover_root != Some(r) {
            if let Some(c) = self.containers.get_mut(r) {
                c.open = false;
            }
        }

        let body = self.containers.get(r).map_or(body, |c| c.body);
        self.push_clip(body);
        true
    }

    /// Ends a window begun with [`begin_window`](Self::begin_window).
    pub fn end_window(&mut self) {
        self.pop_clip();
        self.end_root_container();
    }

    /// Begins a nested panel occupying the next layout rect.
    pub fn begin_panel(&mut self, name: &str, options: Options) {
        let id = self.get_id(name.as_bytes());
        self.ids.push(id);
        let (r, _) = self.containers.obtain(id, self.frame);
        let rect = self.layout_next();
        if let Some(c) = self.containers.get_mut(r) {
            c.rect = rect;
            c.options = options;
            c.last_frame = self.frame;
        }
        if !options.has(Options::NO_FRAME) {
            let style = self.resolve_for(ElementType::Panel, StyleState::Default, id);
            self.draw_frame(rect, &style);
        }
        self.container_stack.push(r);
        self.push_container_body(r, rect, options);
        let body = self.containers.get(r).map_or(rect, |c| c.body);
        self.push_clip(body);
    }

    /// Ends a panel.
    pub fn end_panel(&mut self) {
        self.pop_clip();
        self.end_container();
    }

    /// Opens popup `name` at the pointer.
    pub fn open_popup(&mut self, name: &str) {
        let id = self.ids.id(name.as_bytes());
        let (r, _) = self.containers.obtain(id, self.frame);
        self.hover_root = Some(r);
        self.next_hover_root = Some(r);
        let mouse = self.input.mouse;
        if let Some(c) = self.containers.get_mut(r) {
            c.rect = Rect::new(mouse.x, mouse.y, 1.0, 1.0);
            c.open = true;
        }
        self.bring_to_front(r);
    }

    /// Begins popup `name`; closes when clicking elsewhere.
    pub fn begin_popup(&mut self, name: &str) -> bool {
        let options = Options::POPUP
            | Options::AUTO_SIZE
            | Options::NO_RESIZE
            | Options::NO_SCROLL
            | Options::NO_TITLE
            | Options::CLOSED
            | Options::NO_DOCK;
        self.begin_window(name, Rect::ZERO, options)
    }

    /// Ends a popup.
    pub fn end_popup(&mut self) {
        self.end_window();
    }

    fn auto_size(&mut self, r: ContainerRef, rect: Rect, options: Options) -> Rect {
        let style = self.resolve_style(ElementType::Window, StyleState::Default);
        let content = self.containers.get(r).map_or(Vec2::ZERO, |c| c.content_size);
        let title = if options.has(Options::NO_TITLE) {
            0.0
        } else {
            self.config.title_height
        };
        let fitted = Rect::new(
            rect.x,
            rect.y,
            content.x + style.padding.horizontal(),
            content.y + style.padding.vertical() + title,
        );
        if let Some(c) = self.containers.get_mut(r) {
            c.rect = fitted;
        }
        fitted
    }

    fn title_bar(&mut self, r: ContainerRef, title: &str, rect: Rect, options: Options, docked: bool) {
        let id = self.get_id(b"!title");
        let state = self.update_control(id, rect, options, ElementType::Title);
        let style = self.control_style(id, ElementType::Title);
        self.draw_frame(rect, &style);
        self.draw_control_text(title, rect, &style, options);

        if state == StyleState::Focus && self.input.mouse_down(MouseButton::Left) {
            self.lock_hover(id);
            self.drag_title(r, rect, docked);
        }

        if !options.has(Options::NO_CLOSE) {
            let close_id = self.get_id(b"!close");
            let size = rect.height;
            let close_rect = Rect::new(rect.right() - size, rect.y, size, size);
            self.update_control(close_id, close_rect, options, ElementType::Button);
            let close_style = self.control_style(close_id, ElementType::Button);
            let c = close_rect.center();
            let half = size * 0.2;
            self.draw_line(
                Vec2::new(c.x - half, c.y - half),
                Vec2::new(c.x + half, c.y + half),
                1.5,
                close_style.text,
            );
            self.draw_line(
                Vec2::new(c.x - half, c.y + half),
                Vec2::new(c.x + half, c.y - half),
                1.5,
                close_style.text,
            );
            if self.clicked(close_id) {
                self.request(Request::Close { container: r });
            }
        }
    }

    /// Title drag: floating windows move; docked windows tear off once
    /// the pointer travelled past the drag threshold.
    fn drag_title(&mut self, r: ContainerRef, title_rect: Rect, docked: bool) {
        let dockable = self
            .containers
            .get(r)
            .is_some_and(|c| !c.options.has(Options::NO_DOCK) && !c.is_dockspace());
        if docked {
            let travelled = (self.input.mouse - self.input.press_pos).length();
            if travelled > self.config.drag_threshold && dockable {
                let rect = self.torn_off_rect(r, title_rect);
                self.request(Request::Undock { container: r, rect });
                self.dragging = Some(r);
            }
            return;
        }
        let delta = self.input.mouse_delta();
        if delta != Vec2::ZERO {
            self.request(Request::Move { container: r, delta });
        }
        if dockable {
            self.dragging = Some(r);
        }
    }

    /// Floating rect for a container torn off its dock, with the title bar
    /// under the pointer.
    fn torn_off_rect(&self, r: ContainerRef, title_rect: Rect) -> Rect {
        let size = self.containers.get(r).map_or(Vec2::ZERO, |c| c.rect.size());
        let width = size.x.max(self.config.min_size);
        let height = size.y.max(self.config.min_size);
        let mouse = self.input.mouse;
        let grab_x = (self.input.press_pos.x - title_rect.x).clamp(0.0, width);
        Rect::new(mouse.x - grab_x, mouse.y - title_rect.height * 0.5, width, height)
    }

    fn resize_handle(&mut self, r: ContainerRef, rect: Rect) {
        let id = self.get_id(b"!resize");
        let size = self.config.title_height * 0.5;
        let handle = Rect::new(rect.right() - size, rect.bottom() - size, size, size);
        let state = self.update_control(id, handle, Options::NONE, ElementType::DockHandle);
        let style = self.control_style(id, ElementType::DockHandle);
        self.draw_triangle(
            [
                Vec2::new(handle.right(), handle.y),
                Vec2::new(handle.right(), handle.bottom()),
                Vec2::new(handle.x, handle.bottom()),
            ],
            style.background,
        );
        if state == StyleState::Focus && self.input.mouse_down(MouseButton::Left) {
            self.lock_hover(id);
            let delta = self.input.mouse_delta();
            if delta != Vec2::ZERO {
                let resized = Rect::new(rect.x, rect.y, rect.width + delta.x, rect.height + delta.y);
                self.request(Request::Resize { container: r, rect: resized });
            }
        }
    }

    fn push_container_body(&mut self, r: ContainerRef, body: Rect, options: Options) {
        let mut body = body;
        if !options.has(Options::NO_SCROLL) {
            self.scrollbars(r, &mut body);
        }
        let scroll = self.containers.get(r).map_or(Vec2::ZERO, |c| c.scroll);
        if let Some(c) = self.containers.get_mut(r) {
            c.body = body;
        }
        self.push_layout(body, scroll, ElementType::Window);
    }

    fn scrollbars(&mut self, r: ContainerRef, body: &mut Rect) {
        let style = self.resolve_style(ElementType::Window, StyleState::Default);
        let (content, mut scroll) = match self.containers.get(r) {
            Some(c) => (c.content_size, c.scroll),
            None => return,
        };
        let sz = self.config.scrollbar_size;
        let cs = Vec2::new(
            content.x + style.padding.horizontal(),
            content.y + style.padding.vertical(),
        );

        self.push_clip(*body);
        if cs.y > body.height {
            body.width -= sz;
        }
        if cs.x > body.width {
            body.height -= sz;
        }

        let vertical = Rect::new(body.right(), body.y, sz, body.height);
        scroll.y = self.scrollbar(b"!scrollbary", vertical, cs.y, body.height, scroll.y, true);
        let horizontal = Rect::new(body.x, body.bottom(), body.width, sz);
        scroll.x = self.scrollbar(b"!scrollbarx", horizontal, cs.x, body.width, scroll.x, false);
        self.pop_clip();

        if let Some(c) = self.containers.get_mut(r) {
            c.scroll = scroll;
        }
        if self.mouse_over(*body) {
            self.scroll_target = Some(r);
        }
    }

    /// One scrollbar; returns the clamped scroll offset.
    fn scrollbar(&mut self, key: &[u8], base: Rect, content: f32, view: f32, scroll: f32, vertical: bool) -> f32 {
        let max_scroll = content - view;
        if max_scroll <= 0.0 || view <= 0.0 {
            return 0.0;
        }
        let id = self.get_id(key);
        let track = if vertical { base.height } else { base.width };
        let state = self.update_control(id, base, Options::NONE, ElementType::ScrollThumb);
        let mut scroll = scroll;
        if state == StyleState::Focus && self.input.mouse_down(MouseButton::Left) {
            self.lock_hover(id);
            let delta = self.input.mouse_delta();
            let along = if vertical { delta.y } else { delta.x };
            scroll += along * content / track;
        }
        let scroll = scroll.clamp(0.0, max_scroll);

        let base_style = self.resolve_style(ElementType::ScrollBase, StyleState::Default);
        self.draw_frame(base, &base_style);

        let thumb_len = (track * view / content).max(self.config.thumb_size);
        let offset = scroll * (track - thumb_len) / max_scroll;
        let thumb = if vertical {
            Rect::new(base.x, base.y + offset, base.width, thumb_len)
        } else {
            Rect::new(base.x + offset, base.y, thumb_len, base.height)
        };
        let thumb_style = self.control_style(id, ElementType::ScrollThumb);
        self.draw_frame(thumb, &thumb_style);
        scroll
    }

    /// Tab strip drawn in place of the title bar for tab-group members.
    fn tab_strip(&mut self, r: ContainerRef, strip: Rect) {
        let Some(bar_handle) = self.containers.get(r).and_then(|c| c.tab_bar) else {
            return;
        };
        let Some(bar) = self.dock.tab_bar(bar_handle) else {
            return;
        };
        let floating = bar.split.is_none();
        let focus_index = bar.focus;
        let members: Vec<(ContainerRef, String)> = bar
            .items
            .iter()
            .map(|item| {
                let title = self
                    .containers
                    .get(item.container)
                    .map(|c| c.title.clone())
                    .unwrap_or_default();
                (item.container, title)
            })
            .collect();
        let count = members.len();

        let strip_style = self.resolve_style(ElementType::TabBar, StyleState::Default);
        self.draw_frame(strip, &strip_style);

        let strip_id = self.get_id(b"!tabstrip");
        let strip_state = self.update_control(strip_id, strip, Options::NONE, ElementType::TabBar);
        if strip_state == StyleState::Focus && self.input.mouse_down(MouseButton::Left) && floating {
            self.lock_hover(strip_id);
            let delta = self.input.mouse_delta();
            if delta != Vec2::ZERO {
                self.request(Request::Move { container: r, delta });
            }
            self.dragging = Some(r);
        }

        for (index, (member, title)) in members.iter().enumerate() {
            let tab_rect = TabBar::tab_rect(strip, self.config.tab_width, index, count);
            let id = self.ids.id(&member.id.0.to_le_bytes());
            self.last_id = Some(id);
            let state = self.update_control(id, tab_rect, Options::NONE, ElementType::Tab);
            let mut style = self.control_style(id, ElementType::Tab);
            if index == focus_index && state == StyleState::Default {
                style = self.resolve_for(ElementType::Tab, StyleState::Focus, id);
            }
            self.draw_frame(tab_rect, &style);
            self.draw_control_text(title, tab_rect, &style, Options::ALIGN_CENTER);

            if self.clicked(id) {
                self.request(Request::TabFocus { bar: bar_handle, index });
            }
            if state == StyleState::Focus && self.input.mouse_down(MouseButton::Left) {
                self.lock_hover(id);
                self.drag_tab(bar_handle, *member, index, strip, count);
            }
        }
    }

    fn drag_tab(&mut self, bar: Handle<TabBar>, member: ContainerRef, index: usize, strip: Rect, count: usize) {
        let mouse = self.input.mouse;
        let pulled = (mouse.y - self.input.press_pos.y).abs();
        if pulled > strip.height {
            let rect = self.torn_off_rect(member, strip);
            self.request(Request::Undock { container: member, rect });
            let title_id = member.id.child(b"!title");
            self.set_focus(Some(title_id));
            self.hover_lock = Some(title_id);
            self.dragging = Some(member);
            return;
        }
        let over = (0..count)
            .find(|i| TabBar::tab_rect(strip, self.config.tab_width, *i, count).contains(mouse));
        if let Some(other) = over.filter(|other| *other != index) {
            self.request(Request::TabSwap { bar, a: index, b: other });
        }
    }
}
