//! Styling system.
//!
//! A [`Style`] is the fully resolved set of visual attributes for one
//! element in one interaction state. Styles come out of a [`StyleSheet`]
//! (element defaults, class and id selectors, inline overrides) and, while
//! a transition is running, out of an animation blend of two of them.
//!
//! Every attribute is addressable as a [`StyleProperty`]; the resolver, the
//! blender and the stylesheet parser all go through that one table.

mod property;
mod sheet;

pub use property::{PropertyKind, PropertyMask, PropertyValue, StyleProperty, StyleRule};
pub use sheet::{AnimationRule, ClassId, InlineStyle, StyleSheet};

use crate::font::FontId;
use crate::layout::{Alignment, Direction, Vec2};
use bytemuck::{Pod, Zeroable};
use std::fmt;

/// RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Neon green.
    pub const NEON_GREEN: Self = Self::rgba(0.2, 1.0, 0.3, 1.0);
    /// Neon cyan.
    pub const NEON_CYAN: Self = Self::rgba(0.2, 0.9, 1.0, 1.0);
    /// Neon pink.
    pub const NEON_PINK: Self = Self::rgba(1.0, 0.2, 0.6, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from a hex value (0xRRGGBBAA).
    #[must_use]
    pub fn hex(hex: u32) -> Self {
        let channel = |shift: u32| f32::from(((hex >> shift) & 0xFF) as u8) / 255.0;
        Self::rgba(channel(24), channel(16), channel(8), channel(0))
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    #[must_use]
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            6 => Some(Self::hex((value << 8) | 0xFF)),
            8 => Some(Self::hex(value)),
            _ => None,
        }
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Linearly interpolates between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Per-side lengths (padding, margin, border width).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    /// Top side.
    pub top: f32,
    /// Right side.
    pub right: f32,
    /// Bottom side.
    pub bottom: f32,
    /// Left side.
    pub left: f32,
}

impl Edges {
    /// No length on any side.
    pub const ZERO: Self = Self::all(0.0);

    /// Same length on every side.
    #[must_use]
    pub const fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Left + right.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Top + bottom.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Per-corner radii.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Corners {
    /// Top-left radius.
    pub top_left: f32,
    /// Top-right radius.
    pub top_right: f32,
    /// Bottom-right radius.
    pub bottom_right: f32,
    /// Bottom-left radius.
    pub bottom_left: f32,
}

impl Corners {
    /// Same radius on every corner.
    #[must_use]
    pub const fn all(value: f32) -> Self {
        Self {
            top_left: value,
            top_right: value,
            bottom_right: value,
            bottom_left: value,
        }
    }

    /// Radii as `[top_left, top_right, bottom_right, bottom_left]`.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }
}

/// Fully resolved visual attributes of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Preferred item size; `0` lets layout decide.
    pub size: Vec2,
    /// Inner spacing between border and content.
    pub padding: Edges,
    /// Spacing between laid-out items.
    pub margin: Edges,
    /// Border width per side.
    pub border: Edges,
    /// Corner radii.
    pub radius: Corners,
    /// Drop shadow offset.
    pub shadow: Vec2,
    /// Text font.
    pub font: FontId,
    /// Default flow of content inside the element.
    pub direction: Direction,
    /// Row alignment along the flow.
    pub justify: Alignment,
    /// Text alignment inside the element.
    pub align: Alignment,
    /// Text color.
    pub text: Color,
    /// Fill color.
    pub background: Color,
    /// Border color.
    pub border_color: Color,
    /// Shadow color.
    pub shadow_color: Color,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            size: Vec2::new(68.0, 10.0),
            padding: Edges::all(5.0),
            margin: Edges::all(4.0),
            border: Edges::ZERO,
            radius: Corners::default(),
            shadow: Vec2::ZERO,
            font: FontId::DEFAULT,
            direction: Direction::Vertical,
            justify: Alignment::Start,
            align: Alignment::Start,
            text: Color::rgba(0.9, 0.9, 0.9, 1.0),
            background: Color::TRANSPARENT,
            border_color: Color::rgba(0.15, 0.2, 0.15, 0.8),
            shadow_color: Color::rgba(0.0, 0.0, 0.0, 0.5),
        }
    }
}

impl Style {
    /// Default item size: preferred size grown by padding.
    #[must_use]
    pub fn item_size(&self) -> Vec2 {
        Vec2::new(
            self.size.x + self.padding.horizontal(),
            self.size.y + self.padding.vertical(),
        )
    }

    /// Spacing between items as a vector.
    #[must_use]
    pub fn spacing(&self) -> Vec2 {
        Vec2::new(self.margin.right, self.margin.bottom)
    }
}

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Name used in stylesheets.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Looks a variant up by its stylesheet name.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.name() == name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_enum! {
    /// Kind of element a style applies to.
    ElementType {
        /// Window frame and body.
        Window => "window",
        /// Window title bar.
        Title => "title",
        /// Nested panel.
        Panel => "panel",
        /// Clickable button.
        Button => "button",
        /// Static text.
        Label => "label",
        /// Text input field.
        Input => "input",
        /// Collapsible header.
        Header => "header",
        /// Tree node row.
        TreeNode => "treenode",
        /// Scrollbar track.
        ScrollBase => "scrollbase",
        /// Scrollbar thumb.
        ScrollThumb => "scrollthumb",
        /// Tab in a tab strip.
        Tab => "tab",
        /// Tab strip background.
        TabBar => "tabbar",
        /// Dockspace background.
        Dockspace => "dockspace",
        /// Split divider and edge handles.
        DockHandle => "dockhandle",
        /// Drop-zone preview.
        DockZone => "dockzone",
    }
}

named_enum! {
    /// Interaction state of a widget.
    StyleState {
        /// Idle.
        Default => "default",
        /// Pointer over the widget.
        Hover => "hover",
        /// Pressed / keyboard focus.
        Focus => "focus",
    }
}

/// Palette used to build the default stylesheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Window background.
    pub background: Color,
    /// Panels and tracks.
    pub surface: Color,
    /// Buttons, titles and headers.
    pub surface_raised: Color,
    /// Active highlight.
    pub accent: Color,
    /// Hover highlight.
    pub accent_muted: Color,
    /// Text color.
    pub text: Color,
    /// Muted text color.
    pub text_muted: Color,
    /// Border color.
    pub border: Color,
    /// Drop shadow color.
    pub shadow: Color,
}

impl Theme {
    /// Dense dark terminal palette.
    pub const DARK: Self = Self {
        background: Color::rgba(0.02, 0.02, 0.03, 1.0),
        surface: Color::rgba(0.05, 0.05, 0.08, 0.95),
        surface_raised: Color::rgba(0.1, 0.11, 0.14, 1.0),
        accent: Color::NEON_GREEN,
        accent_muted: Color::rgba(0.15, 0.45, 0.2, 1.0),
        text: Color::rgba(0.9, 0.9, 0.9, 1.0),
        text_muted: Color::rgba(0.5, 0.5, 0.5, 1.0),
        border: Color::rgba(0.15, 0.2, 0.15, 0.8),
        shadow: Color::rgba(0.0, 0.0, 0.0, 0.5),
    };

    /// Cyan-on-black palette.
    pub const NEON: Self = Self {
        background: Color::rgba(0.01, 0.01, 0.02, 1.0),
        surface: Color::rgba(0.03, 0.03, 0.05, 0.9),
        surface_raised: Color::rgba(0.07, 0.08, 0.12, 1.0),
        accent: Color::NEON_CYAN,
        accent_muted: Color::rgba(0.6, 0.2, 1.0, 1.0),
        text: Color::rgba(0.85, 0.9, 0.95, 1.0),
        text_muted: Color::rgba(0.4, 0.45, 0.5, 1.0),
        border: Color::rgba(0.1, 0.2, 0.2, 0.6),
        shadow: Color::rgba(0.0, 0.0, 0.0, 0.6),
    };

    /// Built-in style for `element` in `state`.
    #[must_use]
    pub fn style_for(&self, element: ElementType, state: StyleState) -> Style {
        let mut style = Style {
            text: self.text,
            border_color: self.border,
            shadow_color: self.shadow,
            ..Style::default()
        };

        // (default, hover, focus) fills
        let interactive = (self.surface_raised, self.accent_muted, self.accent);
        let passive = (self.surface, self.surface, self.surface);
        let (default, hover, focus) = match element {
            ElementType::Window => {
                style.border = Edges::all(1.0);
                style.radius = Corners::all(4.0);
                style.shadow = Vec2::new(2.0, 2.0);
                (self.background, self.background, self.background)
            }
            ElementType::Title => {
                style.padding = Edges {
                    top: 0.0,
                    right: 6.0,
                    bottom: 0.0,
                    left: 6.0,
                };
                (self.surface_raised, self.surface_raised, self.accent_muted)
            }
            ElementType::Panel | ElementType::ScrollBase | ElementType::TabBar => passive,
            ElementType::Label => {
                (Color::TRANSPARENT, Color::TRANSPARENT, Color::TRANSPARENT)
            }
            ElementType::Input => {
                style.border = Edges::all(1.0);
                (self.background, self.background, self.background)
            }
            ElementType::Button | ElementType::Header | ElementType::TreeNode => {
                style.radius = Corners::all(3.0);
                style.align = Alignment::Center;
                interactive
            }
            ElementType::ScrollThumb => (self.border, self.accent_muted, self.accent),
            ElementType::Tab => {
                style.align = Alignment::Center;
                (self.surface, self.surface_raised, self.accent_muted)
            }
            ElementType::Dockspace => (
                self.background.with_alpha(0.5),
                self.background.with_alpha(0.5),
                self.background.with_alpha(0.5),
            ),
            ElementType::DockHandle => (Color::TRANSPARENT, self.accent_muted, self.accent),
            ElementType::DockZone => {
                style.border = Edges::all(1.0);
                style.border_color = self.accent;
                let base = self.accent.with_alpha(0.25);
                (base, self.accent.with_alpha(0.5), self.accent.with_alpha(0.5))
            }
        };

        style.background = match state {
            StyleState::Default => default,
            StyleState::Hover => hover,
            StyleState::Focus => focus,
        };
        if element == ElementType::Input && state == StyleState::Focus {
            style.border_color = self.accent;
        }
        style
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DARK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lerp() {
        let black = Color::BLACK;
        let white = Color::WHITE;
        let mid = black.lerp(white, 0.5);

        assert!((mid.r - 0.5).abs() < 0.01);
        assert!((mid.g - 0.5).abs() < 0.01);
        assert!((mid.b - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_color_hex() {
        let color = Color::hex(0xFF00_00FF);
        assert!((color.r - 1.0).abs() < 0.01);
        assert!((color.g - 0.0).abs() < 0.01);
        assert!((color.b - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_hex_strings() {
        assert_eq!(Color::parse_hex("#ffffff"), Some(Color::WHITE));
        let translucent = Color::parse_hex("#00000080").map(|c| c.a);
        assert!(translucent.is_some_and(|a| (a - 0.5).abs() < 0.01));
        assert_eq!(Color::parse_hex("ffffff"), None);
        assert_eq!(Color::parse_hex("#fff"), None);
    }

    #[test]
    fn test_color_is_pod() {
        let bytes = bytemuck::bytes_of(&Color::WHITE);
        assert_eq!(bytes.len(), 16);
    }

    #[test]
    fn test_element_names_round_trip() {
        for element in ElementType::ALL {
            assert_eq!(ElementType::from_name(element.name()), Some(*element));
        }
        assert_eq!(StyleState::from_name("hover"), Some(StyleState::Hover));
        assert_eq!(StyleState::from_name("pressed"), None);
    }

    #[test]
    fn test_theme_states_differ_for_buttons() {
        let theme = Theme::DARK;
        let idle = theme.style_for(ElementType::Button, StyleState::Default);
        let hover = theme.style_for(ElementType::Button, StyleState::Hover);
        assert_ne!(idle.background, hover.background);
        assert_eq!(idle.padding, hover.padding);
    }
}
