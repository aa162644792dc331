//! Rendering dispatch.
//!
//! The engine only produces commands. A host implements [`Renderer`] for its
//! GPU backend and [`dispatch`] replays a finished buffer into it, in final
//! z-order, with top-left origin and y growing downwards.

use crate::command::{CommandBuffer, DrawCommand, Shape};
use crate::font::FontId;
use crate::layout::{Rect, Vec2};
use crate::style::Color;

/// Backend receiving draw commands.
pub trait Renderer {
    /// Sets the scissor rectangle.
    fn set_clip(&mut self, rect: Rect);

    /// Draws a primitive.
    fn draw_shape(&mut self, shape: &Shape, color: Color);

    /// Draws text with its first glyph's top-left at `pos`.
    fn draw_text(&mut self, font: FontId, text: &str, pos: Vec2, color: Color);

    /// Draws a textured quad.
    fn draw_image(&mut self, rect: Rect, texture: u32, uv: [f32; 4], color: Color);

    /// Switches pipeline; `None` restores the default one.
    fn set_pipeline(&mut self, _pipeline: Option<u32>) {}

    /// Binds uniform bytes to `slot` of the current pipeline.
    fn bind_uniform(&mut self, _slot: u32, _data: &[u8]) {}

    /// Runs a host callback over `rect`.
    fn custom(&mut self, _callback: u32, _rect: Rect, _data: &[u8]) {}
}

/// Replays `buffer` into `renderer`, following jumps. Returns the number of
/// commands delivered.
pub fn dispatch(buffer: &CommandBuffer, renderer: &mut dyn Renderer) -> usize {
    let mut count = 0;
    for command in buffer.iter() {
        match command {
            DrawCommand::Clip(rect) => renderer.set_clip(rect),
            DrawCommand::Shape(shape, color) => renderer.draw_shape(&shape, color),
            DrawCommand::Text {
                font,
                pos,
                color,
                text,
            } => renderer.draw_text(font, text, pos, color),
            DrawCommand::Image {
                rect,
                texture,
                uv,
                color,
            } => renderer.draw_image(rect, texture, uv, color),
            DrawCommand::Pipeline(pipeline) => renderer.set_pipeline(pipeline),
            DrawCommand::Uniform { slot, data } => renderer.bind_uniform(slot, data),
            DrawCommand::Custom {
                callback,
                rect,
                data,
            } => renderer.custom(callback, rect, data),
        }
        count += 1;
    }
    count
}

/// Owned copy of a delivered command.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Recorded {
    Clip(Rect),
    Shape(Shape, Color),
    Text {
        font: FontId,
        text: String,
        pos: Vec2,
        color: Color,
    },
    Image {
        rect: Rect,
        texture: u32,
    },
    Pipeline(Option<u32>),
    Uniform {
        slot: u32,
        data: Vec<u8>,
    },
    Custom {
        callback: u32,
        rect: Rect,
        data: Vec<u8>,
    },
}

/// Renderer that records everything it receives. Useful headless and in
/// tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    /// Commands in delivery order.
    pub commands: Vec<Recorded>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filled rectangles in delivery order.
    pub fn rects(&self) -> impl Iterator<Item = (Rect, Color)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            Recorded::Shape(Shape::Rect { rect, .. }, color) => Some((*rect, *color)),
            _ => None,
        })
    }

    /// Text runs in delivery order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|command| match command {
            Recorded::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Drops everything recorded so far.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn set_clip(&mut self, rect: Rect) {
        self.commands.push(Recorded::Clip(rect));
    }

    fn draw_shape(&mut self, shape: &Shape, color: Color) {
        self.commands.push(Recorded::Shape(*shape, color));
    }

    fn draw_text(&mut self, font: FontId, text: &str, pos: Vec2, color: Color) {
        self.commands.push(Recorded::Text {
            font,
            text: text.to_owned(),
            pos,
            color,
        });
    }

    fn draw_image(&mut self, rect: Rect, texture: u32, _uv: [f32; 4], _color: Color) {
        self.commands.push(Recorded::Image { rect, texture });
    }

    fn set_pipeline(&mut self, pipeline: Option<u32>) {
        self.commands.push(Recorded::Pipeline(pipeline));
    }

    fn bind_uniform(&mut self, slot: u32, data: &[u8]) {
        self.commands.push(Recorded::Uniform {
            slot,
            data: data.to_vec(),
        });
    }

    fn custom(&mut self, callback: u32, rect: Rect, data: &[u8]) {
        self.commands.push(Recorded::Custom {
            callback,
            rect,
            data: data.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ClipStack, Command};
    use crate::style::Corners;

    #[test]
    fn test_dispatch_delivers_in_order() {
        let clips = ClipStack::new();
        let mut buffer = CommandBuffer::new(32);
        buffer.draw_rect(&clips, Rect::new(0.0, 0.0, 100.0, 50.0), Corners::default(), Color::WHITE);
        buffer.draw_text(&clips, Rect::new(0.0, 0.0, 16.0, 16.0), FontId::DEFAULT, "hi", Color::BLACK);
        buffer.push(Command::Pipeline { pipeline: Some(3) });
        let data = buffer.push_bytes(&[9, 9]);
        buffer.push(Command::Uniform { slot: 1, data });

        let mut renderer = RecordingRenderer::new();
        let count = dispatch(&buffer, &mut renderer);
        assert_eq!(count, 4);
        assert_eq!(renderer.rects().count(), 1);
        assert_eq!(renderer.texts().collect::<Vec<_>>(), vec!["hi"]);
        assert_eq!(renderer.commands[2], Recorded::Pipeline(Some(3)));
        assert_eq!(
            renderer.commands[3],
            Recorded::Uniform {
                slot: 1,
                data: vec![9, 9]
            }
        );
    }

    #[test]
    fn test_default_hooks_are_optional() {
        struct Minimal(usize);
        impl Renderer for Minimal {
            fn set_clip(&mut self, _rect: Rect) {}
            fn draw_shape(&mut self, _shape: &Shape, _color: Color) {
                self.0 += 1;
            }
            fn draw_text(&mut self, _font: FontId, _text: &str, _pos: Vec2, _color: Color) {}
            fn draw_image(&mut self, _rect: Rect, _texture: u32, _uv: [f32; 4], _color: Color) {}
        }

        let mut buffer = CommandBuffer::new(8);
        buffer.push(Command::Pipeline { pipeline: None });
        buffer.push(Command::Shape {
            shape: Shape::Circle {
                center: Vec2::ZERO,
                radius: 1.0,
            },
            color: Color::WHITE,
        });
        let mut renderer = Minimal(0);
        dispatch(&buffer, &mut renderer);
        assert_eq!(renderer.0, 1);
    }
}
