//! # Command Buffer
//!
//! Widget calls never draw; they append [`Command`]s to a per-frame buffer
//! that the host replays through a [`Renderer`](crate::render::Renderer)
//! once the frame has ended.
//!
//! Every root container brackets its commands with two jumps. At the end
//! of the frame the roots are sorted by z-index and the jumps are patched
//! so a linear walk visits the regions back to front:
//!
//! ```text
//!  index:  0        1..      k     k+1  ..      m
//!        [JMP→B+1][ A cmds ][JMP→C+1][JMP→A+1][ B cmds ][JMP→end] ...
//!          │                   ▲       ▲           │
//!          └───────────────────┼───────┘           │   z(A) > z(B)
//!                              └───────────────────┘
//! ```
//!
//! Text and uniform payloads live in side arenas and are referenced by
//! [`Span`]s, so the command enum stays `Copy`.

use crate::font::FontId;
use crate::layout::{Rect, Vec2};
use crate::style::{Color, Corners};

/// Byte range into one of the buffer's side arenas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    /// First byte.
    pub start: usize,
    /// Length in bytes.
    pub len: usize,
}

impl Span {
    fn range(self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Geometry of a filled or stroked primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Filled rectangle.
    Rect {
        /// Bounds.
        rect: Rect,
        /// Corner radii.
        radius: Corners,
    },
    /// Rectangle outline.
    Box {
        /// Bounds.
        rect: Rect,
        /// Stroke width.
        width: f32,
    },
    /// Filled circle.
    Circle {
        /// Center.
        center: Vec2,
        /// Radius.
        radius: f32,
    },
    /// Filled triangle.
    Triangle {
        /// Vertices.
        points: [Vec2; 3],
    },
    /// Line segment.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke width.
        width: f32,
    },
}

impl Shape {
    /// Axis-aligned bounds of the shape.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match *self {
            Self::Rect { rect, .. } | Self::Box { rect, .. } => rect,
            Self::Circle { center, radius } => Rect::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            ),
            Self::Triangle { points: [a, b, c] } => {
                Rect::from_min_max(a.min(b).min(c), a.max(b).max(c))
            }
            Self::Line { from, to, width } => {
                Rect::from_min_max(from.min(to), from.max(to)).expand(width * 0.5)
            }
        }
    }
}

/// One entry of the command buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Continue at `dst`; `None` falls through.
    Jump {
        /// Target index.
        dst: Option<usize>,
    },
    /// Set the scissor rectangle.
    Clip {
        /// Scissor rectangle.
        rect: Rect,
    },
    /// Draw a primitive.
    Shape {
        /// Geometry.
        shape: Shape,
        /// Fill or stroke color.
        color: Color,
    },
    /// Draw a run of text.
    Text {
        /// Font.
        font: FontId,
        /// Top-left of the first glyph.
        pos: Vec2,
        /// Text color.
        color: Color,
        /// UTF-8 bytes in the text arena.
        text: Span,
    },
    /// Draw a textured quad.
    Image {
        /// Destination.
        rect: Rect,
        /// Backend texture handle.
        texture: u32,
        /// Source UVs `(u0, v0, u1, v1)`.
        uv: [f32; 4],
        /// Tint.
        color: Color,
    },
    /// Switch render pipeline; `None` restores the default.
    Pipeline {
        /// Backend pipeline handle.
        pipeline: Option<u32>,
    },
    /// Bind uniform bytes to a slot of the current pipeline.
    Uniform {
        /// Binding slot.
        slot: u32,
        /// Bytes in the byte arena.
        data: Span,
    },
    /// Host-defined draw callback.
    Custom {
        /// Callback id understood by the renderer.
        callback: u32,
        /// Area the callback draws into.
        rect: Rect,
        /// Bytes in the byte arena.
        data: Span,
    },
}

/// A command with its payload resolved, as seen by renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand<'a> {
    /// Set the scissor rectangle.
    Clip(Rect),
    /// Draw a primitive.
    Shape(Shape, Color),
    /// Draw text.
    Text {
        /// Font.
        font: FontId,
        /// Top-left of the first glyph.
        pos: Vec2,
        /// Text color.
        color: Color,
        /// The text.
        text: &'a str,
    },
    /// Draw a textured quad.
    Image {
        /// Destination.
        rect: Rect,
        /// Texture handle.
        texture: u32,
        /// Source UVs.
        uv: [f32; 4],
        /// Tint.
        color: Color,
    },
    /// Switch pipeline.
    Pipeline(Option<u32>),
    /// Bind uniform bytes.
    Uniform {
        /// Binding slot.
        slot: u32,
        /// Payload.
        data: &'a [u8],
    },
    /// Host callback.
    Custom {
        /// Callback id.
        callback: u32,
        /// Target area.
        rect: Rect,
        /// Payload.
        data: &'a [u8],
    },
}

/// Result of testing a rectangle against the current clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clipping {
    /// Entirely visible.
    None,
    /// Partly visible.
    Part,
    /// Entirely hidden.
    All,
}

/// Stack of nested scissor rectangles.
#[derive(Debug, Clone, Default)]
pub struct ClipStack {
    stack: Vec<Rect>,
}

impl ClipStack {
    /// Creates an empty stack (everything visible).
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(32),
        }
    }

    /// Pushes `rect` intersected with the current clip.
    pub fn push(&mut self, rect: Rect) {
        let clipped = self.top().intersect(&rect);
        self.stack.push(clipped);
    }

    /// Pushes `rect` as-is, ignoring the enclosing clip.
    pub fn push_unclipped(&mut self, rect: Rect) {
        self.stack.push(rect);
    }

    /// Restores the previous clip.
    ///
    /// # Panics
    ///
    /// Panics on underflow.
    pub fn pop(&mut self) -> Rect {
        match self.stack.pop() {
            Some(rect) => rect,
            None => panic!("clip stack underflow: pop without matching push"),
        }
    }

    /// Current clip rectangle.
    #[must_use]
    pub fn top(&self) -> Rect {
        self.stack.last().copied().unwrap_or(Rect::UNCLIPPED)
    }

    /// Classifies `rect` against the current clip.
    #[must_use]
    pub fn check(&self, rect: &Rect) -> Clipping {
        let clip = self.top();
        if clip.is_empty() {
            Clipping::All
        } else if clip.encloses(rect) {
            Clipping::None
        } else if clip.intersects(rect) {
            Clipping::Part
        } else {
            Clipping::All
        }
    }

    /// Depth of the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns true when nothing is pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

/// Fixed-capacity per-frame command list with text and byte arenas.
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    commands: Vec<Command>,
    capacity: usize,
    text: String,
    bytes: Vec<u8>,
}

impl CommandBuffer {
    /// Creates a buffer holding up to `capacity` commands per frame.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
            capacity,
            text: String::with_capacity(capacity * 4),
            bytes: Vec::new(),
        }
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Maximum commands per frame.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every command and payload.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.text.clear();
        self.bytes.clear();
    }

    /// Appends `command` and returns its index.
    ///
    /// # Panics
    ///
    /// Panics when the buffer is full.
    pub fn push(&mut self, command: Command) -> usize {
        assert!(
            self.commands.len() < self.capacity,
            "command buffer overflow: capacity {} exceeded",
            self.capacity
        );
        self.commands.push(command);
        self.commands.len() - 1
    }

    /// Copies `text` into the text arena.
    pub fn push_text(&mut self, text: &str) -> Span {
        let start = self.text.len();
        self.text.push_str(text);
        Span {
            start,
            len: text.len(),
        }
    }

    /// Copies `data` into the byte arena.
    pub fn push_bytes(&mut self, data: &[u8]) -> Span {
        let start = self.bytes.len();
        self.bytes.extend_from_slice(data);
        Span {
            start,
            len: data.len(),
        }
    }

    /// Appends a jump and returns its index.
    pub fn push_jump(&mut self, dst: Option<usize>) -> usize {
        self.push(Command::Jump { dst })
    }

    /// Retargets the jump at `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not a jump.
    pub fn patch_jump(&mut self, at: usize, target: usize) {
        match self.commands.get_mut(at) {
            Some(Command::Jump { dst }) => *dst = Some(target),
            other => panic!("patch_jump: command {at} is not a jump: {other:?}"),
        }
    }

    /// Command at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    /// Raw command slice, jumps included.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Text behind `span`.
    #[must_use]
    pub fn text(&self, span: Span) -> &str {
        self.text.get(span.range()).unwrap_or_default()
    }

    /// Bytes behind `span`.
    #[must_use]
    pub fn bytes(&self, span: Span) -> &[u8] {
        self.bytes.get(span.range()).unwrap_or_default()
    }

    /// Returns the next non-jump command at or after `cursor`, following
    /// jumps, and advances `cursor` past it.
    pub fn next_command(&self, cursor: &mut usize) -> Option<&Command> {
        let mut hops = 0;
        loop {
            let command = self.commands.get(*cursor)?;
            *cursor += 1;
            match command {
                Command::Jump { dst } => {
                    hops += 1;
                    if hops > self.commands.len() {
                        debug_assert!(false, "jump cycle in command buffer");
                        return None;
                    }
                    if let Some(dst) = dst {
                        *cursor = *dst;
                    }
                }
                other => return Some(other),
            }
        }
    }

    /// Resolves the payload of `command`; `None` for jumps.
    #[must_use]
    pub fn resolve(&self, command: &Command) -> Option<DrawCommand<'_>> {
        Some(match *command {
            Command::Jump { .. } => return None,
            Command::Clip { rect } => DrawCommand::Clip(rect),
            Command::Shape { shape, color } => DrawCommand::Shape(shape, color),
            Command::Text {
                font,
                pos,
                color,
                text,
            } => DrawCommand::Text {
                font,
                pos,
                color,
                text: self.text(text),
            },
            Command::Image {
                rect,
                texture,
                uv,
                color,
            } => DrawCommand::Image {
                rect,
                texture,
                uv,
                color,
            },
            Command::Pipeline { pipeline } => DrawCommand::Pipeline(pipeline),
            Command::Uniform { slot, data } => DrawCommand::Uniform {
                slot,
                data: self.bytes(data),
            },
            Command::Custom {
                callback,
                rect,
                data,
            } => DrawCommand::Custom {
                callback,
                rect,
                data: self.bytes(data),
            },
        })
    }

    /// Iterates draw commands in final order.
    #[must_use]
    pub fn iter(&self) -> CommandIter<'_> {
        CommandIter {
            buffer: self,
            cursor: 0,
        }
    }

    /// Pushes a filled rectangle. Square rects are clipped geometrically
    /// against `clip`; rounded ones keep their shape and are bracketed by a
    /// clip/unclip pair when partly visible.
    pub fn draw_rect(&mut self, clip: &ClipStack, rect: Rect, radius: Corners, color: Color) {
        if radius.to_array().iter().any(|r| *r > 0.0) {
            let shape = Shape::Rect { rect, radius };
            self.clipped(clip, &rect, Command::Shape { shape, color });
            return;
        }
        let visible = rect.intersect(&clip.top());
        if !visible.is_empty() {
            self.push(Command::Shape {
                shape: Shape::Rect {
                    rect: visible,
                    radius,
                },
                color,
            });
        }
    }

    /// Pushes a non-rect shape; partial clipping is delegated to the
    /// renderer through a clip/unclip pair.
    pub fn draw_shape(&mut self, clip: &ClipStack, shape: Shape, color: Color) {
        self.clipped(clip, &shape.bounds(), Command::Shape { shape, color });
    }

    /// Pushes a run of text whose laid-out bounds are `bounds`.
    pub fn draw_text(
        &mut self,
        clip: &ClipStack,
        bounds: Rect,
        font: FontId,
        text: &str,
        color: Color,
    ) {
        if clip.check(&bounds) == Clipping::All {
            return;
        }
        let span = self.push_text(text);
        self.clipped(
            clip,
            &bounds,
            Command::Text {
                font,
                pos: bounds.min(),
                color,
                text: span,
            },
        );
    }

    /// Pushes a textured quad.
    pub fn draw_image(
        &mut self,
        clip: &ClipStack,
        rect: Rect,
        texture: u32,
        uv: [f32; 4],
        color: Color,
    ) {
        self.clipped(
            clip,
            &rect,
            Command::Image {
                rect,
                texture,
                uv,
                color,
            },
        );
    }

    /// Pushes a host callback over `rect`.
    pub fn draw_custom(&mut self, clip: &ClipStack, rect: Rect, callback: u32, data: &[u8]) {
        if clip.check(&rect) == Clipping::All {
            return;
        }
        let data = self.push_bytes(data);
        self.clipped(
            clip,
            &rect,
            Command::Custom {
                callback,
                rect,
                data,
            },
        );
    }

    fn clipped(&mut self, clip: &ClipStack, bounds: &Rect, command: Command) {
        match clip.check(bounds) {
            Clipping::All => {}
            Clipping::None => {
                self.push(command);
            }
            Clipping::Part => {
                self.push(Command::Clip { rect: clip.top() });
                self.push(command);
                self.push(Command::Clip {
                    rect: Rect::UNCLIPPED,
                });
            }
        }
    }
}

/// Iterator over a [`CommandBuffer`] that follows jumps.
#[derive(Debug, Clone)]
pub struct CommandIter<'a> {
    buffer: &'a CommandBuffer,
    cursor: usize,
}

impl<'a> Iterator for CommandIter<'a> {
    type Item = DrawCommand<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let buffer = self.buffer;
        let command = buffer.next_command(&mut self.cursor)?;
        buffer.resolve(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(rect: Rect) -> Command {
        Command::Shape {
            shape: Shape::Rect {
                rect,
                radius: Corners::default(),
            },
            color: Color::WHITE,
        }
    }

    #[test]
    fn test_next_command_follows_jumps() {
        let mut buffer = CommandBuffer::new(16);
        let jump = buffer.push_jump(None);
        buffer.push(fill(Rect::new(0.0, 0.0, 1.0, 1.0)));
        buffer.push(fill(Rect::new(2.0, 0.0, 1.0, 1.0)));
        buffer.patch_jump(jump, 2);

        let mut cursor = 0;
        let first = buffer.next_command(&mut cursor).copied();
        assert_eq!(first, Some(fill(Rect::new(2.0, 0.0, 1.0, 1.0))));
        assert!(buffer.next_command(&mut cursor).is_none());
    }

    #[test]
    fn test_unpatched_jump_falls_through() {
        let mut buffer = CommandBuffer::new(4);
        buffer.push_jump(None);
        buffer.push(fill(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert_eq!(buffer.iter().count(), 1);
    }

    #[test]
    #[should_panic(expected = "command buffer overflow")]
    fn test_overflow_panics() {
        let mut buffer = CommandBuffer::new(1);
        buffer.push_jump(None);
        buffer.push_jump(None);
    }

    #[test]
    fn test_clip_push_pop_idempotent() {
        let mut clips = ClipStack::new();
        clips.push(Rect::new(0.0, 0.0, 100.0, 100.0));
        let before = clips.top();
        clips.push(Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(clips.top(), Rect::new(50.0, 50.0, 50.0, 50.0));
        clips.pop();
        assert_eq!(clips.top(), before);
        clips.pop();
        assert_eq!(clips.top(), Rect::UNCLIPPED);
    }

    #[test]
    fn test_clip_check() {
        let mut clips = ClipStack::new();
        clips.push(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(clips.check(&Rect::new(1.0, 1.0, 2.0, 2.0)), Clipping::None);
        assert_eq!(clips.check(&Rect::new(5.0, 5.0, 10.0, 10.0)), Clipping::Part);
        assert_eq!(clips.check(&Rect::new(20.0, 20.0, 1.0, 1.0)), Clipping::All);
    }

    #[test]
    fn test_fully_clipped_draws_dropped() {
        let mut clips = ClipStack::new();
        clips.push(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut buffer = CommandBuffer::new(16);
        buffer.draw_rect(&clips, Rect::new(50.0, 50.0, 5.0, 5.0), Corners::default(), Color::WHITE);
        buffer.draw_text(&clips, Rect::new(50.0, 50.0, 5.0, 5.0), FontId::DEFAULT, "x", Color::WHITE);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_partial_rect_is_intersected() {
        let mut clips = ClipStack::new();
        clips.push(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut buffer = CommandBuffer::new(16);
        buffer.draw_rect(&clips, Rect::new(5.0, 5.0, 10.0, 10.0), Corners::default(), Color::WHITE);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.get(0), Some(&fill(Rect::new(5.0, 5.0, 5.0, 5.0))));
    }

    #[test]
    fn test_partial_rounded_rect_keeps_corners() {
        let mut clips = ClipStack::new();
        clips.push(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut buffer = CommandBuffer::new(16);
        let rect = Rect::new(5.0, 5.0, 10.0, 10.0);
        buffer.draw_rect(&clips, rect, Corners::all(3.0), Color::WHITE);

        let drawn: Vec<_> = buffer.iter().collect();
        assert_eq!(drawn.len(), 3);
        assert_eq!(drawn[0], DrawCommand::Clip(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(matches!(
            drawn[1],
            DrawCommand::Shape(Shape::Rect { rect: r, .. }, _) if r == rect
        ));
        assert_eq!(drawn[2], DrawCommand::Clip(Rect::UNCLIPPED));

        buffer.clear();
        buffer.draw_rect(&clips, Rect::new(1.0, 1.0, 4.0, 4.0), Corners::all(3.0), Color::WHITE);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_partial_text_bracketed_by_clip() {
        let mut clips = ClipStack::new();
        clips.push(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut buffer = CommandBuffer::new(16);
        buffer.draw_text(&clips, Rect::new(5.0, 0.0, 40.0, 8.0), FontId::DEFAULT, "hello", Color::WHITE);

        let drawn: Vec<_> = buffer.iter().collect();
        assert_eq!(drawn.len(), 3);
        assert_eq!(drawn[0], DrawCommand::Clip(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(matches!(drawn[1], DrawCommand::Text { text: "hello", .. }));
        assert_eq!(drawn[2], DrawCommand::Clip(Rect::UNCLIPPED));
    }

    #[test]
    fn test_payload_spans() {
        let mut buffer = CommandBuffer::new(4);
        let a = buffer.push_text("ab");
        let b = buffer.push_text("cde");
        assert_eq!(buffer.text(a), "ab");
        assert_eq!(buffer.text(b), "cde");
        let bytes = buffer.push_bytes(&[1, 2, 3]);
        assert_eq!(buffer.bytes(bytes), &[1, 2, 3]);
    }

    #[test]
    fn test_shape_bounds() {
        let circle = Shape::Circle {
            center: Vec2::new(10.0, 10.0),
            radius: 5.0,
        };
        assert_eq!(circle.bounds(), Rect::new(5.0, 5.0, 10.0, 10.0));
        let tri = Shape::Triangle {
            points: [Vec2::new(0.0, 5.0), Vec2::new(4.0, 0.0), Vec2::new(8.0, 5.0)],
        };
        assert_eq!(tri.bounds(), Rect::new(0.0, 0.0, 8.0, 5.0));
    }
}
