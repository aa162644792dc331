//! Style property table.
//!
//! Each [`StyleProperty`] owns one row of a static table holding its
//! stylesheet name and a getter/setter pair over [`Style`]. Resolution,
//! blending, animation masks and parsing all index this table instead of
//! switching over fields.

use super::{Color, Style};
use crate::font::FontId;
use crate::layout::{Alignment, Direction};

/// Addressable style attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum StyleProperty {
    Width,
    Height,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    BorderTop,
    BorderRight,
    BorderBottom,
    BorderLeft,
    RadiusTopLeft,
    RadiusTopRight,
    RadiusBottomRight,
    RadiusBottomLeft,
    ShadowX,
    ShadowY,
    Font,
    Direction,
    Justify,
    Align,
    TextColor,
    BackgroundColor,
    BorderColor,
    ShadowColor,
}

/// Value type carried by a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Pixel length.
    Number,
    /// RGBA color.
    Color,
    /// Font handle.
    Font,
    /// Flow direction.
    Direction,
    /// Alignment.
    Alignment,
}

/// A single property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    /// Pixel length.
    Number(f32),
    /// RGBA color.
    Color(Color),
    /// Font handle.
    Font(FontId),
    /// Flow direction.
    Direction(Direction),
    /// Alignment.
    Alignment(Alignment),
}

impl PropertyValue {
    /// Kind of this value.
    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        match self {
            Self::Number(_) => PropertyKind::Number,
            Self::Color(_) => PropertyKind::Color,
            Self::Font(_) => PropertyKind::Font,
            Self::Direction(_) => PropertyKind::Direction,
            Self::Alignment(_) => PropertyKind::Alignment,
        }
    }

    /// Interpolates towards `end` at `t` in `[0, 1]`.
    ///
    /// Numbers and colors blend linearly; discrete values switch at the
    /// midpoint. The endpoints are returned exactly.
    #[must_use]
    pub fn lerp(self, end: Self, t: f32) -> Self {
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return end;
        }
        match (self, end) {
            (Self::Number(a), Self::Number(b)) => Self::Number(a + (b - a) * t),
            (Self::Color(a), Self::Color(b)) => Self::Color(a.lerp(b, t)),
            _ if t < 0.5 => self,
            _ => end,
        }
    }
}

struct PropertyDesc {
    name: &'static str,
    kind: PropertyKind,
    get: fn(&Style) -> PropertyValue,
    set: fn(&mut Style, PropertyValue),
}

macro_rules! number {
    ($name:literal, $($field:ident).+) => {
        PropertyDesc {
            name: $name,
            kind: PropertyKind::Number,
            get: |s| PropertyValue::Number(s.$($field).+),
            set: |s, v| {
                if let PropertyValue::Number(n) = v {
                    s.$($field).+ = n;
                }
            },
        }
    };
}

macro_rules! color {
    ($name:literal, $field:ident) => {
        PropertyDesc {
            name: $name,
            kind: PropertyKind::Color,
            get: |s| PropertyValue::Color(s.$field),
            set: |s, v| {
                if let PropertyValue::Color(c) = v {
                    s.$field = c;
                }
            },
        }
    };
}

macro_rules! alignment {
    ($name:literal, $field:ident) => {
        PropertyDesc {
            name: $name,
            kind: PropertyKind::Alignment,
            get: |s| PropertyValue::Alignment(s.$field),
            set: |s, v| {
                if let PropertyValue::Alignment(a) = v {
                    s.$field = a;
                }
            },
        }
    };
}

/// Indexed by `StyleProperty as usize`.
static PROPERTIES: [PropertyDesc; StyleProperty::COUNT] = [
    number!("width", size.x),
    number!("height", size.y),
    number!("padding-top", padding.top),
    number!("padding-right", padding.right),
    number!("padding-bottom", padding.bottom),
    number!("padding-left", padding.left),
    number!("margin-top", margin.top),
    number!("margin-right", margin.right),
    number!("margin-bottom", margin.bottom),
    number!("margin-left", margin.left),
    number!("border-top", border.top),
    number!("border-right", border.right),
    number!("border-bottom", border.bottom),
    number!("border-left", border.left),
    number!("radius-top-left", radius.top_left),
    number!("radius-top-right", radius.top_right),
    number!("radius-bottom-right", radius.bottom_right),
    number!("radius-bottom-left", radius.bottom_left),
    number!("shadow-x", shadow.x),
    number!("shadow-y", shadow.y),
    PropertyDesc {
        name: "font",
        kind: PropertyKind::Font,
        get: |s| PropertyValue::Font(s.font),
        set: |s, v| {
            if let PropertyValue::Font(f) = v {
                s.font = f;
            }
        },
    },
    PropertyDesc {
        name: "direction",
        kind: PropertyKind::Direction,
        get: |s| PropertyValue::Direction(s.direction),
        set: |s, v| {
            if let PropertyValue::Direction(d) = v {
                s.direction = d;
            }
        },
    },
    alignment!("justify", justify),
    alignment!("align", align),
    color!("text-color", text),
    color!("background-color", background),
    color!("border-color", border_color),
    color!("shadow-color", shadow_color),
];

/// Multi-property names accepted by stylesheets.
static SHORTHANDS: &[(&str, &[StyleProperty])] = &[
    ("size", &[StyleProperty::Width, StyleProperty::Height]),
    (
        "padding",
        &[
            StyleProperty::PaddingTop,
            StyleProperty::PaddingRight,
            StyleProperty::PaddingBottom,
            StyleProperty::PaddingLeft,
        ],
    ),
    (
        "margin",
        &[
            StyleProperty::MarginTop,
            StyleProperty::MarginRight,
            StyleProperty::MarginBottom,
            StyleProperty::MarginLeft,
        ],
    ),
    (
        "border",
        &[
            StyleProperty::BorderTop,
            StyleProperty::BorderRight,
            StyleProperty::BorderBottom,
            StyleProperty::BorderLeft,
        ],
    ),
    (
        "radius",
        &[
            StyleProperty::RadiusTopLeft,
            StyleProperty::RadiusTopRight,
            StyleProperty::RadiusBottomRight,
            StyleProperty::RadiusBottomLeft,
        ],
    ),
    ("shadow", &[StyleProperty::ShadowX, StyleProperty::ShadowY]),
];

impl StyleProperty {
    /// Number of properties.
    pub const COUNT: usize = 28;

    /// Every property, in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Width,
        Self::Height,
        Self::PaddingTop,
        Self::PaddingRight,
        Self::PaddingBottom,
        Self::PaddingLeft,
        Self::MarginTop,
        Self::MarginRight,
        Self::MarginBottom,
        Self::MarginLeft,
        Self::BorderTop,
        Self::BorderRight,
        Self::BorderBottom,
        Self::BorderLeft,
        Self::RadiusTopLeft,
        Self::RadiusTopRight,
        Self::RadiusBottomRight,
        Self::RadiusBottomLeft,
        Self::ShadowX,
        Self::ShadowY,
        Self::Font,
        Self::Direction,
        Self::Justify,
        Self::Align,
        Self::TextColor,
        Self::BackgroundColor,
        Self::BorderColor,
        Self::ShadowColor,
    ];

    #[inline]
    fn desc(self) -> &'static PropertyDesc {
        &PROPERTIES[self as usize]
    }

    /// Stylesheet name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.desc().name
    }

    /// Value kind.
    #[must_use]
    pub fn kind(self) -> PropertyKind {
        self.desc().kind
    }

    /// Looks a property up by stylesheet name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Expands a shorthand name (`padding`, `size`, ...).
    #[must_use]
    pub fn shorthand(name: &str) -> Option<&'static [Self]> {
        SHORTHANDS
            .iter()
            .find(|(short, _)| *short == name)
            .map(|(_, props)| *props)
    }

    /// Reads the property from `style`.
    #[inline]
    #[must_use]
    pub fn get(self, style: &Style) -> PropertyValue {
        (self.desc().get)(style)
    }

    /// Writes `value` into `style`; a value of the wrong kind is ignored.
    #[inline]
    pub fn set(self, style: &mut Style, value: PropertyValue) {
        (self.desc().set)(style, value);
    }

    /// Mask bit of this property.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u64 {
        1 << (self as u8)
    }
}

/// Set of properties, one bit per [`StyleProperty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PropertyMask(pub u64);

impl PropertyMask {
    /// No property.
    pub const NONE: Self = Self(0);
    /// Every property.
    pub const ALL: Self = Self((1 << StyleProperty::COUNT) - 1);

    /// Returns true if `property` is in the mask.
    #[inline]
    #[must_use]
    pub const fn contains(self, property: StyleProperty) -> bool {
        self.0 & property.bit() != 0
    }

    /// Adds `property`.
    #[inline]
    pub fn insert(&mut self, property: StyleProperty) {
        self.0 |= property.bit();
    }

    /// Union of two masks.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns true if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the properties in the mask.
    pub fn iter(self) -> impl Iterator<Item = StyleProperty> {
        StyleProperty::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<StyleProperty> for PropertyMask {
    fn from_iter<I: IntoIterator<Item = StyleProperty>>(iter: I) -> Self {
        let mut mask = Self::NONE;
        for property in iter {
            mask.insert(property);
        }
        mask
    }
}

/// Sparse set of property overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleRule {
    entries: Vec<(StyleProperty, PropertyValue)>,
}

impl StyleRule {
    /// Creates an empty rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `property`, replacing an earlier value for it.
    pub fn set(&mut self, property: StyleProperty, value: PropertyValue) {
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Builder form of [`StyleRule::set`].
    #[must_use]
    pub fn with(mut self, property: StyleProperty, value: PropertyValue) -> Self {
        self.set(property, value);
        self
    }

    /// Value set for `property`, if any.
    #[must_use]
    pub fn get(&self, property: StyleProperty) -> Option<PropertyValue> {
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }

    /// Number of overridden properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes every override into `style`.
    pub fn apply(&self, style: &mut Style) {
        for (property, value) in &self.entries {
            property.set(style, *value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_enum_order() {
        for (index, property) in StyleProperty::ALL.iter().enumerate() {
            assert_eq!(*property as usize, index);
        }
        assert_eq!(PROPERTIES.len(), StyleProperty::COUNT);
    }

    #[test]
    fn test_names_unique_and_resolvable() {
        for property in StyleProperty::ALL {
            assert_eq!(StyleProperty::from_name(property.name()), Some(property));
        }
    }

    #[test]
    fn test_get_set_roundtrip_through_table() {
        let mut style = Style::default();
        StyleProperty::PaddingLeft.set(&mut style, PropertyValue::Number(11.0));
        assert_eq!(style.padding.left, 11.0);
        assert_eq!(
            StyleProperty::PaddingLeft.get(&style),
            PropertyValue::Number(11.0)
        );

        StyleProperty::BackgroundColor.set(&mut style, PropertyValue::Color(Color::BLACK));
        assert_eq!(style.background, Color::BLACK);
    }

    #[test]
    fn test_set_ignores_wrong_kind() {
        let mut style = Style::default();
        let before = style;
        StyleProperty::Width.set(&mut style, PropertyValue::Color(Color::BLACK));
        assert_eq!(style, before);
    }

    #[test]
    fn test_lerp_endpoints_exact() {
        let a = PropertyValue::Number(0.1);
        let b = PropertyValue::Number(0.7);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_lerp_discrete_switches_at_midpoint() {
        let a = PropertyValue::Alignment(Alignment::Start);
        let b = PropertyValue::Alignment(Alignment::End);
        assert_eq!(a.lerp(b, 0.49), a);
        assert_eq!(a.lerp(b, 0.5), b);
    }

    #[test]
    fn test_mask_iter() {
        let mask: PropertyMask = [StyleProperty::Width, StyleProperty::TextColor]
            .into_iter()
            .collect();
        assert!(mask.contains(StyleProperty::Width));
        assert!(!mask.contains(StyleProperty::Height));
        assert_eq!(mask.iter().count(), 2);
        assert_eq!(PropertyMask::ALL.iter().count(), StyleProperty::COUNT);
    }

    #[test]
    fn test_shorthand_expansion() {
        let padding = StyleProperty::shorthand("padding").unwrap_or_default();
        assert_eq!(padding.len(), 4);
        assert!(StyleProperty::shorthand("nope").is_none());
    }

    #[test]
    fn test_rule_apply_is_sparse() {
        let rule = StyleRule::new()
            .with(StyleProperty::Width, PropertyValue::Number(5.0))
            .with(StyleProperty::Width, PropertyValue::Number(9.0));
        assert_eq!(rule.len(), 1);

        let mut style = Style::default();
        let height = style.size.y;
        rule.apply(&mut style);
        assert_eq!(style.size.x, 9.0);
        assert_eq!(style.size.y, height);
    }
}
