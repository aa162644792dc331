//! Layout system for UI positioning.
//!
//! Immediate-mode layout is a cursor walk: each container body owns a
//! [`LayoutFrame`], widgets ask it for the next rectangle, and the frame
//! records how far content reached so scrollbars can be sized next frame.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// A 2D vector / point in screen coordinates (top-left origin, y down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// A rect large enough to never clip anything on screen.
    pub const UNCLIPPED: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 16_777_216.0,
        height: 16_777_216.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle from its top-left and bottom-right corners.
    #[must_use]
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, (max.x - min.x).max(0.0), (max.y - min.y).max(0.0))
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    /// Size as a vector.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Returns true if the rect covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns true if two rectangles intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(self.intersect(other))
    }

    /// Intersects two rectangles, clamping a disjoint result to zero area.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right()).max(x);
        let bottom = self.bottom().min(other.bottom()).max(y);
        Self::new(x, y, right - x, bottom - y)
    }

    /// Returns true if `other` lies entirely inside `self`.
    #[must_use]
    pub fn encloses(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Moves the rectangle by `delta`.
    #[must_use]
    pub fn offset(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Expands the rectangle by the given amount on all sides.
    #[must_use]
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            (self.width + amount * 2.0).max(0.0),
            (self.height + amount * 2.0).max(0.0),
        )
    }

    /// Shrinks the rectangle by the given amount on all sides.
    #[must_use]
    pub fn shrink(&self, amount: f32) -> Self {
        self.expand(-amount)
    }
}

/// Layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Horizontal (left to right), wrapping when the body is full.
    Horizontal,
    /// Vertical (top to bottom), one item per row.
    #[default]
    Vertical,
}

/// Layout alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Align to start (left/top).
    #[default]
    Start,
    /// Align to center.
    Center,
    /// Align to end (right/bottom).
    End,
    /// Stretch to fill available space.
    Stretch,
}

/// Override for the next rectangle handed out by a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextRect {
    /// Screen-space rectangle, bypassing the flow entirely.
    Absolute(Rect),
    /// Rectangle relative to the body origin; still advances the cursor.
    Relative(Rect),
}

/// Initial extent marker; any real item raises it.
const EXTENT_FLOOR: f32 = -16_777_216.0;

/// Per-body layout state.
///
/// Lives on the context's layout stack while a container body (or a
/// column inside it) is being built.
#[derive(Debug, Clone)]
pub struct LayoutFrame {
    /// Body rectangle, already shifted by the container scroll.
    pub body: Rect,
    /// Cursor relative to the body origin.
    pub position: Vec2,
    /// Row item size; `0` falls back to the default item size.
    pub size: Vec2,
    /// Furthest screen-space extent reached by any item.
    pub max: Vec2,
    widths: Vec<f32>,
    item_index: usize,
    next_row: f32,
    indent: f32,
    next: Option<NextRect>,
    margin: Vec2,
    default_size: Vec2,
    justify: Alignment,
    /// Extra width given to each item of a stretched row.
    stretch: f32,
    /// Items flow horizontally and wrap on overflow instead of per count.
    flow: bool,
}

impl LayoutFrame {
    /// Creates a frame over `body` scrolled by `scroll`.
    ///
    /// `margin` is the gap between items, `default_size` the size used for
    /// zero-width/height entries.
    #[must_use]
    pub fn new(
        body: Rect,
        scroll: Vec2,
        margin: Vec2,
        default_size: Vec2,
        direction: Direction,
        justify: Alignment,
    ) -> Self {
        let mut frame = Self {
            body: Rect::new(body.x - scroll.x, body.y - scroll.y, body.width, body.height),
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            max: Vec2::new(EXTENT_FLOOR, EXTENT_FLOOR),
            widths: Vec::with_capacity(16),
            item_index: 0,
            next_row: 0.0,
            indent: 0.0,
            next: None,
            margin,
            default_size,
            justify,
            stretch: 0.0,
            flow: false,
        };
        frame.row(&[], 0.0);
        frame.flow = direction == Direction::Horizontal;
        frame
    }

    /// Declares the shape of the upcoming row.
    ///
    /// Each entry is a pixel width; `0` means the default width and a
    /// negative value fills the remaining body width (`-1` exactly, `-n`
    /// leaving `n - 1` pixels). An empty slice puts one item per row.
    pub fn row(&mut self, widths: &[f32], height: f32) {
        self.widths.clear();
        self.widths.extend_from_slice(widths);
        self.size.y = height;
        self.start_row();
        self.flow = false;
    }

    /// Sets the default item width for rows without explicit widths.
    pub fn set_width(&mut self, width: f32) {
        self.size.x = width;
    }

    /// Sets the row height.
    pub fn set_height(&mut self, height: f32) {
        self.size.y = height;
    }

    /// Overrides the next rectangle.
    pub fn set_next(&mut self, rect: Rect, relative: bool) {
        self.next = Some(if relative {
            NextRect::Relative(rect)
        } else {
            NextRect::Absolute(rect)
        });
    }

    /// Shifts the left edge of subsequent rows.
    pub fn indent(&mut self, delta: f32) {
        self.indent += delta;
    }

    /// Produces the next widget rectangle in screen space.
    pub fn next(&mut self) -> Rect {
        let mut res = match self.next.take() {
            Some(NextRect::Absolute(rect)) => return rect,
            Some(NextRect::Relative(rect)) => rect,
            None => self.flow_next(),
        };

        self.position.x += res.width + self.margin.x;
        self.next_row = self.next_row.max(res.y + res.height + self.margin.y);

        res.x += self.body.x;
        res.y += self.body.y;
        self.max = self.max.max(res.max());
        res
    }

    /// Merges a finished column frame back into this one.
    pub fn absorb_column(&mut self, column: &Self) {
        self.position.x = self
            .position
            .x
            .max(column.position.x + column.body.x - self.body.x);
        self.next_row = self
            .next_row
            .max(column.next_row + column.body.y - self.body.y);
        self.max = self.max.max(column.max);
    }

    /// Size of the content laid out so far, relative to the body origin.
    #[must_use]
    pub fn content_size(&self) -> Vec2 {
        (self.max - self.body.min()).max(Vec2::ZERO)
    }

    /// Flow step for a rect not overridden by `set_next`.
    fn flow_next(&mut self) -> Rect {
        if self.flow {
            return self.flow_wrapping();
        }
        if self.item_index >= self.widths.len().max(1) {
            self.start_row();
        }

        let width = self
            .widths
            .get(self.item_index)
            .map_or(self.size.x, |w| w + self.stretch);
        let mut res = Rect::new(self.position.x, self.position.y, width, self.size.y);
        self.resolve_size(&mut res);
        self.item_index += 1;
        res
    }

    /// Horizontal flow: items sit side by side until the body is full.
    fn flow_wrapping(&mut self) -> Rect {
        let mut res = Rect::new(self.position.x, self.position.y, self.size.x, self.size.y);
        self.resolve_size(&mut res);
        if self.item_index > 0 && res.right() > self.body.width {
            self.start_row();
            res.x = self.position.x;
            res.y = self.position.y;
            self.resolve_size(&mut res);
        }
        self.item_index += 1;
        res
    }

    fn resolve_size(&self, res: &mut Rect) {
        if res.width == 0.0 {
            res.width = self.default_size.x;
        }
        if res.height == 0.0 {
            res.height = self.default_size.y;
        }
        if res.width < 0.0 {
            res.width = (res.width + self.body.width - res.x + 1.0).max(0.0);
        }
        if res.height < 0.0 {
            res.height = (res.height + self.body.height - res.y + 1.0).max(0.0);
        }
    }

    /// Moves the cursor to the start of a new row, applying justification.
    fn start_row(&mut self) {
        self.position = Vec2::new(self.indent, self.next_row);
        self.item_index = 0;

        self.stretch = 0.0;

        let fixed = !self.widths.is_empty() && self.widths.iter().all(|w| *w > 0.0);
        if !fixed || self.justify == Alignment::Start {
            return;
        }
        let gaps = self.widths.len() - 1;
        #[allow(clippy::cast_precision_loss)]
        let total: f32 = self.widths.iter().sum::<f32>() + self.margin.x * gaps as f32;
        let free = (self.body.width - self.indent - total).max(0.0);
        match self.justify {
            Alignment::Center => self.position.x += free * 0.5,
            Alignment::End => self.position.x += free,
            #[allow(clippy::cast_precision_loss)]
            Alignment::Stretch => self.stretch = free / self.widths.len() as f32,
            Alignment::Start => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: f32) -> LayoutFrame {
        LayoutFrame::new(
            Rect::new(0.0, 0.0, width, 400.0),
            Vec2::ZERO,
            Vec2::new(4.0, 4.0),
            Vec2::new(78.0, 20.0),
            Direction::Vertical,
            Alignment::Start,
        )
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert!(rect.contains(Vec2::new(50.0, 30.0)));
        assert!(!rect.contains(Vec2::new(5.0, 30.0)));
        assert!(!rect.contains(Vec2::new(50.0, 80.0)));
    }

    #[test]
    fn test_intersect_clamps_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 5.0, 5.0);
        let clipped = a.intersect(&b);
        assert!(clipped.is_empty());
        assert_eq!(clipped.width, 0.0);
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_row_with_fill_wraps() {
        let mut layout = frame(200.0);
        layout.row(&[50.0, -1.0], 20.0);

        let first = layout.next();
        assert_eq!(first, Rect::new(0.0, 0.0, 50.0, 20.0));

        let second = layout.next();
        assert_eq!(second.x, 54.0);
        assert_eq!(second.width, 200.0 - 50.0 - 4.0);
        assert_eq!(second.height, 20.0);

        let third = layout.next();
        assert_eq!(third.x, 0.0);
        assert_eq!(third.y, 24.0);
    }

    #[test]
    fn test_zero_width_uses_default() {
        let mut layout = frame(200.0);
        layout.row(&[0.0], 0.0);
        let rect = layout.next();
        assert_eq!(rect.width, 78.0);
        assert_eq!(rect.height, 20.0);
    }

    #[test]
    fn test_trailing_space_unused() {
        let mut layout = frame(200.0);
        layout.row(&[30.0, 30.0], 10.0);
        layout.next();
        let second = layout.next();
        assert_eq!(second.right(), 64.0);
    }

    #[test]
    fn test_justify_center_offsets_row() {
        let mut layout = LayoutFrame::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Direction::Vertical,
            Alignment::Center,
        );
        layout.row(&[20.0, 20.0], 10.0);
        // 20 + 10 + 20 = 50, free 50, offset 25.
        assert_eq!(layout.next().x, 25.0);
    }

    #[test]
    fn test_justify_stretch_shares_free_width() {
        let mut layout = LayoutFrame::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Direction::Vertical,
            Alignment::Stretch,
        );
        layout.row(&[20.0, 20.0], 10.0);
        let first = layout.next();
        let second = layout.next();
        assert_eq!(first, Rect::new(0.0, 0.0, 45.0, 10.0));
        assert_eq!(second.x, 55.0);
        assert_eq!(second.right(), 100.0);

        let wrapped = layout.next();
        assert_eq!(wrapped.width, 45.0);
    }

    #[test]
    fn test_set_next_absolute_bypasses_flow() {
        let mut layout = frame(200.0);
        let target = Rect::new(500.0, 500.0, 10.0, 10.0);
        layout.set_next(target, false);
        assert_eq!(layout.next(), target);
        // Cursor untouched.
        assert_eq!(layout.next().y, 0.0);
    }

    #[test]
    fn test_set_next_relative_offsets_body() {
        let mut layout = LayoutFrame::new(
            Rect::new(100.0, 50.0, 200.0, 200.0),
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::new(10.0, 10.0),
            Direction::Vertical,
            Alignment::Start,
        );
        layout.set_next(Rect::new(5.0, 5.0, 10.0, 10.0), true);
        assert_eq!(layout.next(), Rect::new(105.0, 55.0, 10.0, 10.0));
    }

    #[test]
    fn test_content_size_tracks_extent() {
        let mut layout = frame(200.0);
        layout.row(&[120.0], 30.0);
        layout.next();
        layout.next();
        let size = layout.content_size();
        assert_eq!(size, Vec2::new(120.0, 64.0));
    }

    #[test]
    fn test_scroll_shifts_body() {
        let layout = LayoutFrame::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Vec2::new(0.0, 40.0),
            Vec2::ZERO,
            Vec2::new(10.0, 10.0),
            Direction::Vertical,
            Alignment::Start,
        );
        assert_eq!(layout.body.y, -40.0);
    }

    #[test]
    fn test_horizontal_flow_wraps_on_overflow() {
        let mut layout = LayoutFrame::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Vec2::ZERO,
            Vec2::new(5.0, 5.0),
            Vec2::new(40.0, 10.0),
            Direction::Horizontal,
            Alignment::Start,
        );
        let a = layout.next();
        let b = layout.next();
        let c = layout.next();
        assert_eq!(a.y, 0.0);
        assert_eq!(b.x, 45.0);
        assert_eq!(c.x, 0.0);
        assert_eq!(c.y, 15.0);
    }

    #[test]
    fn test_column_absorbs_extent() {
        let mut parent = frame(200.0);
        parent.row(&[100.0, 50.0], 0.0);
        let body = parent.next();
        let mut column = LayoutFrame::new(
            body,
            Vec2::ZERO,
            Vec2::new(4.0, 4.0),
            Vec2::new(78.0, 20.0),
            Direction::Vertical,
            Alignment::Start,
        );
        column.row(&[-1.0], 20.0);
        column.next();
        column.next();
        parent.absorb_column(&column);
        assert!(parent.max.y >= 44.0);
    }
}
