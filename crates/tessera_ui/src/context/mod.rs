//! # Context
//!
//! Owns everything a frame touches and drives the frame loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          FRAME                                │
//! ├──────────────────────────────────────────────────────────────┤
//! │ begin(hints)                                                  │
//! │   drain input ─▶ advance animations ─▶ lay docked trees out   │
//! │   ─▶ split/edge handles (queue requests)                      │
//! │ widget calls                                                  │
//! │   ids ─▶ layout ─▶ update_control ─▶ style ─▶ commands        │
//! │ end(update)                                                   │
//! │   docking drag ─▶ apply requests ─▶ scroll ─▶ z-sort ─▶ jumps │
//! │ render(renderer)                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All mutation of pooled state happens through `&mut Context` in call
//! order. Geometry changes produced by widgets are queued as
//! [`Request`]s and applied together at `end`.

mod control;
mod docking;
mod window;

use crate::animation::Animator;
use crate::command::{ClipStack, Clipping, Command, CommandBuffer, Shape};
use crate::config::ContextConfig;
use crate::container::{Container, ContainerRef, Containers};
use crate::dock::Dock;
use crate::font::{resolve_font, FontId, FontMetrics, MonospaceMetrics};
use crate::input::{FrameHints, InputEvent, InputState};
use crate::layout::{LayoutFrame, Rect, Vec2};
use crate::render::{dispatch, Renderer};
use crate::request::{Request, ZOrder};
use crate::style::{ClassId, Color, Corners, ElementType, InlineStyle, Style, StyleSheet, StyleState};
use bytemuck::Pod;
use tessera_core::{Id, IdStack, LruPool};
use tracing::trace;

/// Z-index of overlay roots drawn above every window.
const OVERLAY_Z: i32 = i32::MAX - 16;

/// Immediate-mode UI state.
pub struct Context {
    config: ContextConfig,
    sheet: StyleSheet,
    metrics: Box<dyn FontMetrics>,

    frame: u64,
    time: f32,
    hints: FrameHints,
    in_frame: bool,
    events: Vec<InputEvent>,
    input: InputState,

    ids: IdStack,
    last_id: Option<Id>,
    hover: Option<Id>,
    focus: Option<Id>,
    updated_hover: bool,
    updated_focus: bool,
    hover_lock: Option<Id>,

    containers: Containers,
    container_stack: Vec<ContainerRef>,
    root_stack: Vec<ContainerRef>,
    root_list: Vec<ContainerRef>,
    hover_root: Option<ContainerRef>,
    next_hover_root: Option<ContainerRef>,
    scroll_target: Option<ContainerRef>,
    z: ZOrder,
    treenodes: LruPool,

    layouts: Vec<LayoutFrame>,
    clips: ClipStack,
    commands: CommandBuffer,
    last_rect: Rect,

    classes: Vec<ClassId>,
    inline: Vec<InlineStyle>,
    animator: Animator,

    dock: Dock,
    dragging: Option<ContainerRef>,
    requests: Vec<Request>,
}

impl Context {
    /// Creates a context with the default stylesheet and monospace metrics.
    #[must_use]
    pub fn new(config: ContextConfig) -> Self {
        Self {
            sheet: StyleSheet::default(),
            metrics: Box::new(MonospaceMetrics::default()),
            frame: 0,
            time: 0.0,
            hints: FrameHints::default(),
            in_frame: false,
            events: Vec::new(),
            input: InputState::new(),
            ids: IdStack::new(),
            last_id: None,
            hover: None,
            focus: None,
            updated_hover: false,
            updated_focus: false,
            hover_lock: None,
            containers: Containers::new(config.container_pool_size),
            container_stack: Vec::new(),
            root_stack: Vec::new(),
            root_list: Vec::new(),
            hover_root: None,
            next_hover_root: None,
            scroll_target: None,
            z: ZOrder::default(),
            treenodes: LruPool::new(config.treenode_pool_size),
            layouts: Vec::new(),
            clips: ClipStack::new(),
            commands: CommandBuffer::new(config.command_capacity),
            last_rect: Rect::ZERO,
            classes: Vec::new(),
            inline: Vec::new(),
            animator: Animator::new(),
            dock: Dock::new(config.max_tab_items),
            dragging: None,
            requests: Vec::new(),
            config,
        }
    }

    /// Replaces the stylesheet.
    pub fn set_style_sheet(&mut self, sheet: StyleSheet) {
        self.sheet = sheet;
    }

    /// Active stylesheet.
    #[must_use]
    pub fn style_sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    /// Replaces the text metrics.
    pub fn set_font_metrics(&mut self, metrics: Box<dyn FontMetrics>) {
        self.metrics = metrics;
    }

    /// Configuration the context was built with.
    #[must_use]
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Number of the current (or last) frame.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Input state of the current frame.
    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Queues a host input event; consumed by the next `begin`.
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    // ---------------------------------------------------------------------
    // Frame loop
    // ---------------------------------------------------------------------

    /// Starts a frame.
    ///
    /// # Panics
    ///
    /// Panics if the previous frame was not ended.
    pub fn begin(&mut self, hints: FrameHints) {
        assert!(!self.in_frame, "begin called twice without end");
        self.in_frame = true;
        self.frame += 1;
        self.time += hints.delta_time.max(0.0);
        self.hints = hints;

        for event in std::mem::take(&mut self.events) {
            self.input.apply(&event, &hints, self.time);
        }

        self.commands.clear();
        self.commands.push_jump(None);
        self.root_list.clear();
        self.scroll_target = None;
        self.hover_root = self.next_hover_root.take();
        self.updated_hover = false;
        self.updated_focus = false;
        self.last_id = None;

        self.animator.advance(hints.delta_time, self.frame);
        self.dock.prune(&mut self.containers);
        self.dock.update_all(&mut self.containers);
        self.split_handles();

        trace!(frame = self.frame, "frame begin");
    }

    /// Ends the frame. With `update` set, queued requests are applied;
    /// otherwise they are discarded.
    ///
    /// # Panics
    ///
    /// Panics if `begin` was not called or any stack is unbalanced.
    pub fn end(&mut self, update: bool) {
        assert!(self.in_frame, "end called without begin");
        assert!(self.container_stack.is_empty(), "unbalanced container stack at end of frame");
        assert!(self.root_stack.is_empty(), "unbalanced root container stack at end of frame");
        assert!(self.clips.is_empty(), "unbalanced clip stack at end of frame");
        assert!(self.ids.is_empty(), "unbalanced id stack at end of frame");
        assert!(self.layouts.is_empty(), "unbalanced layout stack at end of frame");
        assert!(self.classes.is_empty(), "unbalanced class stack at end of frame");
        assert!(self.inline.is_empty(), "unbalanced style stack at end of frame");

        self.docking();

        let requests = std::mem::take(&mut self.requests);
        let request_count = requests.len();
        if update {
            for request in requests {
                request.apply(&mut self.containers, &mut self.dock, &mut self.z, self.config.min_size);
            }
        }

        if let Some(target) = self.scroll_target {
            let delta = self.input.scroll_delta;
            if let Some(c) = self.containers.get_mut(target) {
                c.scroll += delta;
            }
        }

        if !self.updated_focus {
            self.focus = None;
        }
        if !self.updated_hover {
            self.hover = None;
        }

        if self.input.any_pressed() {
            if let Some(root) = self.next_hover_root {
                let raise = self
                    .containers
                    .get(root)
                    .is_some_and(|c| c.zindex < self.z.last() && c.zindex < OVERLAY_Z);
                if raise {
                    self.z.raise(&mut self.containers, &self.dock, root);
                }
            }
        }
        if !self.input.any_down() {
            self.hover_lock = None;
        }
        self.input.end_frame();

        self.sort_roots();
        self.in_frame = false;

        trace!(
            frame = self.frame,
            commands = self.commands.len(),
            requests = request_count,
            "frame end"
        );
    }

    /// Replays the finished frame into `renderer`. Returns the number of
    /// commands delivered.
    pub fn render(&self, renderer: &mut dyn Renderer) -> usize {
        dispatch(&self.commands, renderer)
    }

    /// Command buffer of the current (or last) frame.
    #[must_use]
    pub fn commands(&self) -> &CommandBuffer {
        &self.commands
    }

    fn sort_roots(&mut self) {
        let containers = &self.containers;
        self.root_list
            .sort_by_key(|r| containers.get(*r).map_or(i32::MIN, |c| c.zindex));

        let regions: Vec<(usize, usize)> = self
            .root_list
            .iter()
            .filter_map(|r| {
                let c = self.containers.get(*r)?;
                Some((c.head?, c.tail?))
            })
            .collect();

        for (head, tail) in &regions {
            self.commands.patch_jump(*head, tail + 1);
        }
        if let Some((first_head, _)) = regions.first() {
            self.commands.patch_jump(0, first_head + 1);
        }
        for pair in regions.windows(2) {
            let ((_, tail), (next_head, _)) = (pair[0], pair[1]);
            self.commands.patch_jump(tail, next_head + 1);
        }
        if let Some((_, last_tail)) = regions.last() {
            let end = self.commands.len();
            self.commands.patch_jump(*last_tail, end);
        }
    }

    // ---------------------------------------------------------------------
    // Identity
    // ---------------------------------------------------------------------

    /// Id of `data` under the current scope.
    pub fn get_id(&mut self, data: &[u8]) -> Id {
        let id = self.ids.id(data);
        self.last_id = Some(id);
        id
    }

    /// Id of a plain-old-data value under the current scope.
    pub fn id_of_value<T: Pod>(&mut self, value: &T) -> Id {
        self.get_id(bytemuck::bytes_of(value))
    }

    /// Opens an id scope derived from `data`.
    pub fn push_id(&mut self, data: &[u8]) {
        let id = self.get_id(data);
        self.ids.push(id);
    }

    /// Closes the innermost id scope.
    pub fn pop_id(&mut self) {
        self.ids.pop();
    }

    /// Id produced by the most recent `get_id`.
    #[must_use]
    pub fn last_id(&self) -> Option<Id> {
        self.last_id
    }

    // ---------------------------------------------------------------------
    // Containers
    // ---------------------------------------------------------------------

    /// Reference to the live container named `name` in the current scope.
    #[must_use]
    pub fn container_by_name(&self, name: &str) -> Option<ContainerRef> {
        self.containers.find(self.ids.id(name.as_bytes()))
    }

    /// Container behind `r`.
    #[must_use]
    pub fn container(&self, r: ContainerRef) -> Option<&Container> {
        self.containers.get(r)
    }

    /// Mutable container behind `r`.
    pub fn container_mut(&mut self, r: ContainerRef) -> Option<&mut Container> {
        self.containers.get_mut(r)
    }

    /// Container currently being built.
    #[must_use]
    pub fn current_container(&self) -> Option<ContainerRef> {
        self.container_stack.last().copied()
    }

    /// Reopens a closed container and brings it to the front.
    pub fn open_container(&mut self, name: &str) -> Option<ContainerRef> {
        let id = self.ids.id(name.as_bytes());
        let (r, _) = self.containers.obtain(id, self.frame);
        if let Some(c) = self.containers.get_mut(r) {
            c.open = true;
        }
        self.bring_to_front(r);
        Some(r)
    }

    /// Raises `r` above every other root.
    pub fn bring_to_front(&mut self, r: ContainerRef) {
        self.z.raise(&mut self.containers, &self.dock, r);
    }

    /// Root containers begun this frame, in draw order once the frame ended.
    #[must_use]
    pub fn roots(&self) -> &[ContainerRef] {
        &self.root_list
    }

    /// Docking state.
    #[must_use]
    pub fn dock(&self) -> &Dock {
        &self.dock
    }

    /// Queues a request for the end of the frame.
    pub fn request(&mut self, request: Request) {
        self.requests.push(request);
    }

    /// Requests queued so far this frame.
    #[must_use]
    pub fn pending_requests(&self) -> &[Request] {
        &self.requests
    }

    /// Tree-node expansion state of `id`.
    #[must_use]
    pub fn treenode_open(&self, id: Id) -> bool {
        self.treenodes.get(id).is_some()
    }

    /// Sets the expansion state of tree node `id`.
    pub fn set_treenode_open(&mut self, id: Id, open: bool) {
        match (self.treenodes.get(id), open) {
            (Some(slot), true) => self.treenodes.update(slot, self.frame),
            (Some(slot), false) => self.treenodes.release(slot),
            (None, true) => {
                self.treenodes.init(id, self.frame);
            }
            (None, false) => {}
        }
    }

    // ---------------------------------------------------------------------
    // Layout
    // ---------------------------------------------------------------------

    fn layout(&mut self) -> &mut LayoutFrame {
        match self.layouts.last_mut() {
            Some(layout) => layout,
            None => panic!("layout call outside of a container"),
        }
    }

    /// Declares the next row: item widths and height.
    pub fn layout_row(&mut self, widths: &[f32], height: f32) {
        self.layout().row(widths, height);
    }

    /// Sets the default item width.
    pub fn layout_width(&mut self, width: f32) {
        self.layout().set_width(width);
    }

    /// Sets the row height.
    pub fn layout_height(&mut self, height: f32) {
        self.layout().set_height(height);
    }

    /// Overrides the next rect, absolute or relative to the body origin.
    pub fn layout_set_next(&mut self, rect: Rect, relative: bool) {
        self.layout().set_next(rect, relative);
    }

    /// Shifts following rows right by `delta`.
    pub fn layout_indent(&mut self, delta: f32) {
        self.layout().indent(delta);
    }

    /// Next widget rect.
    pub fn layout_next(&mut self) -> Rect {
        let rect = self.layout().next();
        self.last_rect = rect;
        rect
    }

    /// Rect returned by the last `layout_next`.
    #[must_use]
    pub fn last_rect(&self) -> Rect {
        self.last_rect
    }

    /// Starts a nested column occupying the next rect.
    pub fn layout_begin_column(&mut self) {
        let rect = self.layout_next();
        let style = self.resolve_style(ElementType::Panel, StyleState::Default);
        self.layouts.push(LayoutFrame::new(
            rect,
            Vec2::ZERO,
            style.spacing(),
            style.item_size(),
            style.direction,
            style.justify,
        ));
    }

    /// Ends a column and merges its extent into the parent.
    ///
    /// # Panics
    ///
    /// Panics without a matching `layout_begin_column`.
    pub fn layout_end_column(&mut self) {
        let column = match self.layouts.pop() {
            Some(column) => column,
            None => panic!("layout_end_column without layout_begin_column"),
        };
        self.layout().absorb_column(&column);
    }

    fn push_layout(&mut self, body: Rect, scroll: Vec2, element: ElementType) {
        let style = self.resolve_style(element, StyleState::Default);
        let inner = Rect::new(
            body.x + style.padding.left,
            body.y + style.padding.top,
            body.width - style.padding.horizontal(),
            body.height - style.padding.vertical(),
        );
        self.layouts.push(LayoutFrame::new(
            inner,
            scroll,
            style.spacing(),
            style.item_size(),
            style.direction,
            style.justify,
        ));
    }

    // ---------------------------------------------------------------------
    // Style
    // ---------------------------------------------------------------------

    /// Applies class `name` to elements resolved until the matching pop.
    pub fn push_class(&mut self, name: &str) {
        self.classes.push(ClassId::new(name));
    }

    /// Removes the innermost class.
    pub fn pop_class(&mut self) {
        assert!(self.classes.pop().is_some(), "pop_class without push_class");
    }

    /// Pushes an inline property override.
    pub fn push_style(&mut self, style: InlineStyle) {
        self.inline.push(style);
    }

    /// Removes the innermost inline override.
    pub fn pop_style(&mut self) {
        assert!(self.inline.pop().is_some(), "pop_style without push_style");
    }

    /// Style of `element` in `state` with the active classes and inline
    /// overrides.
    #[must_use]
    pub fn resolve_style(&self, element: ElementType, state: StyleState) -> Style {
        self.sheet.resolve(element, state, &self.classes, None, &self.inline)
    }

    fn resolve_for(&self, element: ElementType, state: StyleState, id: Id) -> Style {
        self.sheet.resolve(element, state, &self.classes, Some(id), &self.inline)
    }

    // ---------------------------------------------------------------------
    // Clipping and drawing
    // ---------------------------------------------------------------------

    /// Narrows the clip rect to its intersection with `rect`.
    pub fn push_clip(&mut self, rect: Rect) {
        self.clips.push(rect);
    }

    /// Restores the previous clip rect.
    pub fn pop_clip(&mut self) {
        self.clips.pop();
    }

    /// Current clip rect.
    #[must_use]
    pub fn clip_rect(&self) -> Rect {
        self.clips.top()
    }

    /// Visibility of `rect` under the current clip.
    #[must_use]
    pub fn check_clip(&self, rect: Rect) -> Clipping {
        self.clips.check(&rect)
    }

    /// Filled rectangle.
    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.commands.draw_rect(&self.clips, rect, Corners::default(), color);
    }

    /// Filled rectangle with rounded corners.
    pub fn draw_rounded_rect(&mut self, rect: Rect, radius: Corners, color: Color) {
        self.commands.draw_rect(&self.clips, rect, radius, color);
    }

    /// Rectangle outline.
    pub fn draw_box(&mut self, rect: Rect, width: f32, color: Color) {
        self.commands.draw_shape(&self.clips, Shape::Box { rect, width }, color);
    }

    /// Filled circle.
    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands
            .draw_shape(&self.clips, Shape::Circle { center, radius }, color);
    }

    /// Filled triangle.
    pub fn draw_triangle(&mut self, points: [Vec2; 3], color: Color) {
        self.commands
            .draw_shape(&self.clips, Shape::Triangle { points }, color);
    }

    /// Line segment.
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands
            .draw_shape(&self.clips, Shape::Line { from, to, width }, color);
    }

    /// Text with its first glyph's top-left at `pos`.
    pub fn draw_text(&mut self, font: FontId, text: &str, pos: Vec2, color: Color) {
        let font = resolve_font(self.metrics.as_ref(), font);
        let bounds = Rect::new(
            pos.x,
            pos.y,
            self.metrics.text_width(font, text),
            self.metrics.text_height(font, text),
        );
        self.commands.draw_text(&self.clips, bounds, font, text, color);
    }

    /// Textured quad.
    pub fn draw_image(&mut self, rect: Rect, texture: u32, uv: [f32; 4], color: Color) {
        self.commands.draw_image(&self.clips, rect, texture, uv, color);
    }

    /// Host callback over `rect` with an opaque payload.
    pub fn draw_custom(&mut self, rect: Rect, callback: u32, data: &[u8]) {
        self.commands.draw_custom(&self.clips, rect, callback, data);
    }

    /// Switches render pipeline; `None` restores the default one.
    pub fn set_pipeline(&mut self, pipeline: Option<u32>) {
        self.commands.push(Command::Pipeline { pipeline });
    }

    /// Binds a plain-old-data value to uniform `slot`.
    pub fn bind_uniform<T: Pod>(&mut self, slot: u32, value: &T) {
        let data = self.commands.push_bytes(bytemuck::bytes_of(value));
        self.commands.push(Command::Uniform { slot, data });
    }

    /// Width and height of `text` in `font`.
    #[must_use]
    pub fn measure_text(&self, font: FontId, text: &str) -> Vec2 {
        let font = resolve_font(self.metrics.as_ref(), font);
        Vec2::new(
            self.metrics.text_width(font, text),
            self.metrics.text_height(font, text),
        )
    }

    /// Draws the background, border and shadow described by `style`.
    pub fn draw_frame(&mut self, rect: Rect, style: &Style) {
        if style.shadow != Vec2::ZERO && style.shadow_color.a > 0.0 {
            self.draw_rounded_rect(rect.offset(style.shadow), style.radius, style.shadow_color);
        }
        if style.background.a > 0.0 {
            self.draw_rounded_rect(rect, style.radius, style.background);
        }
        let b = style.border;
        if style.border_color.a > 0.0 {
            let edges = [
                Rect::new(rect.x, rect.y, rect.width, b.top),
                Rect::new(rect.x, rect.bottom() - b.bottom, rect.width, b.bottom),
                Rect::new(rect.x, rect.y, b.left, rect.height),
                Rect::new(rect.right() - b.right, rect.y, b.right, rect.height),
            ];
            for edge in edges {
                if !edge.is_empty() {
                    self.draw_rect(edge, style.border_color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;

    fn context() -> Context {
        Context::new(ContextConfig::default())
    }

    #[test]
    fn test_ids_stable_across_frames() {
        let mut ctx = context();
        ctx.begin(FrameHints::default());
        ctx.push_id(b"window");
        let first = ctx.get_id(b"button");
        ctx.pop_id();
        ctx.end(true);

        ctx.begin(FrameHints::default());
        ctx.push_id(b"window");
        let second = ctx.get_id(b"button");
        ctx.pop_id();
        let outside = ctx.get_id(b"button");
        ctx.end(true);

        assert_eq!(first, second);
        assert_ne!(first, outside);
    }

    #[test]
    #[should_panic(expected = "unbalanced id stack")]
    fn test_unbalanced_id_stack_panics() {
        let mut ctx = context();
        ctx.begin(FrameHints::default());
        ctx.push_id(b"leak");
        ctx.end(true);
    }

    #[test]
    #[should_panic(expected = "begin called twice")]
    fn test_double_begin_panics() {
        let mut ctx = context();
        ctx.begin(FrameHints::default());
        ctx.begin(FrameHints::default());
    }

    #[test]
    fn test_uniform_payload_round_trip() {
        let mut ctx = context();
        ctx.begin(FrameHints::default());
        ctx.begin_window("W", Rect::new(0.0, 0.0, 200.0, 200.0), crate::Options::NONE);
        ctx.bind_uniform(2, &[1.0_f32, 2.0]);
        ctx.end_window();
        ctx.end(true);

        let mut renderer = RecordingRenderer::new();
        ctx.render(&mut renderer);
        let expected = bytemuck::bytes_of(&[1.0_f32, 2.0]).to_vec();
        assert!(renderer.commands.iter().any(|c| matches!(
            c,
            crate::render::Recorded::Uniform { slot: 2, data } if *data == expected
        )));
    }

    #[test]
    fn test_treenode_state() {
        let mut ctx = context();
        let id = Id(99);
        assert!(!ctx.treenode_open(id));
        ctx.set_treenode_open(id, true);
        assert!(ctx.treenode_open(id));
        ctx.set_treenode_open(id, false);
        assert!(!ctx.treenode_open(id));
    }

    #[test]
    fn test_requests_discarded_without_update() {
        let mut ctx = context();
        ctx.begin(FrameHints::default());
        ctx.begin_window("W", Rect::new(0.0, 0.0, 200.0, 200.0), crate::Options::NONE);
        ctx.end_window();
        ctx.end(true);

        let r = ctx.container_by_name("W");
        ctx.begin(FrameHints::default());
        if let Some(r) = r {
            ctx.request(Request::Move { container: r, delta: Vec2::new(10.0, 0.0) });
        }
        ctx.end(false);
        assert_eq!(r.and_then(|r| ctx.container(r)).map(|c| c.rect.x), Some(0.0));
        assert!(ctx.pending_requests().is_empty());
    }

    #[test]
    fn test_wheel_scrolls_hovered_body() {
        let mut ctx = context();
        let rect = Rect::new(0.0, 0.0, 200.0, 120.0);
        ctx.push_event(InputEvent::MouseMove { x: 50.0, y: 60.0 });
        for _ in 0..3 {
            ctx.begin(FrameHints::default());
            ctx.begin_window("Log", rect, crate::Options::NONE);
            for _ in 0..20 {
                ctx.layout_row(&[-1.0], 20.0);
                ctx.layout_next();
            }
            ctx.end_window();
            ctx.end(true);
            ctx.push_event(InputEvent::Scroll { dx: 0.0, dy: 30.0 });
        }
        let scroll = ctx.container_by_name("Log").and_then(|r| ctx.container(r)).map(|c| c.scroll.y);
        assert!(scroll.is_some_and(|y| y > 0.0));
    }
}
