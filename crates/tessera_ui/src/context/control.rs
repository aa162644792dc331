//! Per-widget interaction: hover, focus and the styles they select.

use super::Context;
use crate::container::Options;
use crate::input::MouseButton;
use crate::layout::{Alignment, Rect, Vec2};
use crate::style::{ElementType, Style, StyleState};
use tessera_core::Id;

impl Context {
    /// Returns true if the pointer is over `rect`, inside the clip and
    /// inside the root container that owns the hover this frame.
    #[must_use]
    pub fn mouse_over(&self, rect: Rect) -> bool {
        self.hover_lock.is_none() && self.pointer_in(rect)
    }

    fn mouse_over_control(&self, id: Id, rect: Rect) -> bool {
        self.hover_lock.map_or(true, |lock| lock == id) && self.pointer_in(rect)
    }

    fn pointer_in(&self, rect: Rect) -> bool {
        let mouse = self.input.mouse;
        rect.contains(mouse) && self.clips.top().contains(mouse) && self.in_hover_root()
    }

    fn in_hover_root(&self) -> bool {
        match (self.root_stack.last(), self.hover_root) {
            (Some(current), Some(hover)) => *current == hover,
            _ => false,
        }
    }

    /// Widget that has focus, if any.
    #[must_use]
    pub fn focus(&self) -> Option<Id> {
        self.focus
    }

    /// Widget under the pointer, if any.
    #[must_use]
    pub fn hover(&self) -> Option<Id> {
        self.hover
    }

    /// Gives focus to `id`, or clears it.
    pub fn set_focus(&mut self, id: Option<Id>) {
        self.focus = id;
        self.updated_focus = true;
    }

    /// Keeps every other widget from hovering until the buttons are
    /// released.
    pub fn lock_hover(&mut self, id: Id) {
        self.hover_lock = Some(id);
    }

    /// Runs the hover/focus state machine for one widget and returns its
    /// state this frame. A change of state starts the widget's animation.
    pub fn update_control(&mut self, id: Id, rect: Rect, options: Options, element: ElementType) -> StyleState {
        let over = self.mouse_over_control(id, rect);

        if self.focus == Some(id) {
            self.updated_focus = true;
        }
        if options.has(Options::NO_INTERACT) {
            return self.record_state(id, element, StyleState::Default);
        }

        if over && !self.input.any_down() {
            self.hover = Some(id);
        }

        if self.focus == Some(id) {
            let pressed_outside = self.input.any_pressed() && !over;
            let released_outside =
                self.input.any_released() && !over && !options.has(Options::HOLD_FOCUS);
            if pressed_outside || released_outside {
                self.set_focus(None);
            }
        }

        if self.hover == Some(id) {
            self.updated_hover = true;
            if self.input.any_pressed() {
                self.set_focus(Some(id));
            } else if !over {
                self.hover = None;
            }
        }

        let state = if self.focus == Some(id) {
            StyleState::Focus
        } else if self.hover == Some(id) {
            StyleState::Hover
        } else {
            StyleState::Default
        };
        self.record_state(id, element, state)
    }

    fn record_state(&mut self, id: Id, element: ElementType, state: StyleState) -> StyleState {
        self.animator.record(id, element, state, self.frame, &self.sheet);
        state
    }

    /// Returns true if `id` has focus and the left button was pressed this
    /// frame.
    #[must_use]
    pub fn clicked(&self, id: Id) -> bool {
        self.focus == Some(id) && self.input.mouse_pressed(MouseButton::Left)
    }

    /// Returns true if `id` has focus and the left button is held.
    #[must_use]
    pub fn dragging_control(&self, id: Id) -> bool {
        self.focus == Some(id) && self.input.mouse_down(MouseButton::Left)
    }

    /// Style of widget `id`: blended while its animation runs, otherwise
    /// resolved for its current state.
    #[must_use]
    pub fn control_style(&self, id: Id, element: ElementType) -> Style {
        if let Some(animation) = self.animator.get(id) {
            let start = self.resolve_for(animation.element, animation.start, id);
            let end = self.resolve_for(animation.element, animation.end, id);
            return animation.blend(&start, &end);
        }
        self.resolve_for(element, self.animator.state(id), id)
    }

    /// Draws the frame of widget `id` in its current style.
    pub fn draw_control_frame(&mut self, id: Id, rect: Rect, element: ElementType, options: Options) {
        if options.has(Options::NO_FRAME) {
            return;
        }
        let style = self.control_style(id, element);
        self.draw_frame(rect, &style);
    }

    /// Draws `text` inside `rect`, aligned by `options` or the style.
    pub fn draw_control_text(&mut self, text: &str, rect: Rect, style: &Style, options: Options) {
        let size = self.measure_text(style.font, text);
        let align = if options.has(Options::ALIGN_CENTER) {
            Alignment::Center
        } else if options.has(Options::ALIGN_RIGHT) {
            Alignment::End
        } else {
            style.align
        };
        let x = match align {
            Alignment::Center => rect.x + (rect.width - size.x) * 0.5,
            Alignment::End => rect.right() - size.x - style.padding.right,
            Alignment::Start | Alignment::Stretch => rect.x + style.padding.left,
        };
        let y = rect.y + (rect.height - size.y) * 0.5;

        self.push_clip(rect);
        self.draw_text(style.font, text, Vec2::new(x, y), style.text);
        self.pop_clip();
    }

    /// Collapsible header row. Returns true while expanded.
    pub fn header(&mut self, label: &str, options: Options) -> bool {
        self.expandable(label, options, ElementType::Header)
    }

    /// Collapsible tree node. When it returns true the caller builds the
    /// children and calls [`end_treenode`](Self::end_treenode).
    pub fn begin_treenode(&mut self, label: &str, options: Options) -> bool {
        let expanded = self.expandable(label, options, ElementType::TreeNode);
        if expanded {
            let indent = self.resolve_style(ElementType::TreeNode, StyleState::Default).padding.left * 2.0;
            self.layout_indent(indent);
            if let Some(id) = self.last_id {
                self.ids.push(id);
            }
        }
        expanded
    }

    /// Closes a tree node opened by [`begin_treenode`](Self::begin_treenode).
    pub fn end_treenode(&mut self) {
        let indent = self.resolve_style(ElementType::TreeNode, StyleState::Default).padding.left * 2.0;
        self.layout_indent(-indent);
        self.pop_id();
    }

    fn expandable(&mut self, label: &str, options: Options, element: ElementType) -> bool {
        let id = self.get_id(label.as_bytes());
        let active = self.treenode_open(id);
        let expanded = if options.has(Options::EXPANDED) { !active } else { active };

        self.layout_row(&[-1.0], 0.0);
        let rect = self.layout_next();
        self.update_control(id, rect, Options::NONE, element);

        if self.clicked(id) {
            self.set_treenode_open(id, !active);
        } else if active {
            self.set_treenode_open(id, true);
        }

        let style = self.control_style(id, element);
        self.draw_frame(rect, &style);
        let marker = if expanded { "-" } else { "+" };
        let text = format!("{marker} {label}");
        self.draw_control_text(&text, rect, &style, options);
        self.last_id = Some(id);
        expanded
    }
}
