//! Stylesheets.
//!
//! Resolution order for an element in a state, later layers winning:
//!
//! 1. element base style for the state (falls back to the element's
//!    default state, then to [`Style::default`])
//! 2. class rules, in the order the classes were pushed
//! 3. the id rule of the widget
//! 4. inline overrides, in push order
//!
//! Class and id layers apply their `default` state rule first and the
//! state-specific rule on top, so a class that only sets a padding keeps
//! that padding while hovered.
//!
//! ```toml
//! [element.button.hover]
//! background-color = "#2a3a2aff"
//! padding = [4, 8]
//!
//! [class.danger.default]
//! text-color = [1.0, 0.3, 0.3]
//!
//! [[animation]]
//! element = "button"
//! properties = ["background-color", "padding"]
//! duration = 0.15
//! ```

use super::property::{PropertyKind, PropertyMask, PropertyValue, StyleProperty, StyleRule};
use super::{Color, ElementType, Style, StyleState, Theme};
use crate::animation::Easing;
use crate::error::{UiError, UiResult};
use crate::font::FontId;
use crate::layout::{Alignment, Direction};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tessera_core::Id;
use tracing::{debug, trace, warn};

/// Interned class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub Id);

impl ClassId {
    /// Hashes a class name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Id::from_label(name))
    }
}

/// Timing of style transitions for one element type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRule {
    /// Element the rule applies to.
    pub element: ElementType,
    /// Properties that blend.
    pub properties: PropertyMask,
    /// Duration in seconds.
    pub duration: f32,
    /// Delay before the blend starts, in seconds.
    pub delay: f32,
    /// Easing curve.
    pub easing: Easing,
}

/// One inline override pushed on the context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineStyle {
    /// Element type it applies to.
    pub element: ElementType,
    /// State it applies to; `None` for every state.
    pub state: Option<StyleState>,
    /// Property overridden.
    pub property: StyleProperty,
    /// New value.
    pub value: PropertyValue,
}

/// Style definitions for every element, plus selectors and animation rules.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    base: HashMap<(ElementType, StyleState), Style>,
    classes: HashMap<(ClassId, StyleState), StyleRule>,
    ids: HashMap<(Id, StyleState), StyleRule>,
    animations: Vec<AnimationRule>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}

impl StyleSheet {
    /// Sheet with no definitions; everything resolves to [`Style::default`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            base: HashMap::new(),
            classes: HashMap::new(),
            ids: HashMap::new(),
            animations: Vec::new(),
        }
    }

    /// Sheet with a base style for every element and state from `theme`.
    #[must_use]
    pub fn from_theme(theme: &Theme) -> Self {
        let mut sheet = Self::empty();
        for element in ElementType::ALL {
            for state in StyleState::ALL {
                sheet
                    .base
                    .insert((*element, *state), theme.style_for(*element, *state));
            }
        }
        sheet
    }

    /// Parses a stylesheet document on top of the default theme.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or unknown names and values.
    pub fn from_toml_str(text: &str) -> UiResult<Self> {
        let mut sheet = Self::default();
        sheet.merge_toml_str(text)?;
        Ok(sheet)
    }

    /// Reads and parses a stylesheet file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> UiResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loading stylesheet");
        Self::from_toml_str(&text)
    }

    /// Applies a stylesheet document on top of this sheet.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML, unknown element or property
    /// names and bad values. The sheet is left unchanged on error. Rules
    /// under an unknown state apply to the default state.
    pub fn merge_toml_str(&mut self, text: &str) -> UiResult<()> {
        let document: SheetDocument = toml::from_str(text)?;
        let mut next = self.clone();

        for (element_name, states) in &document.element {
            let element = ElementType::from_name(element_name)
                .ok_or_else(|| UiError::UnknownElement(element_name.clone()))?;
            for (state_name, table) in states {
                let state = parse_state(state_name);
                let rule = parse_rule(table)?;
                rule.apply(next.base_mut(element, state));
            }
        }

        for (class_name, states) in &document.class {
            let class = ClassId::new(class_name);
            for (state_name, table) in states {
                let state = parse_state(state_name);
                next.classes.insert((class, state), parse_rule(table)?);
            }
        }

        for (label, states) in &document.id {
            let id = Id::from_label(label);
            for (state_name, table) in states {
                let state = parse_state(state_name);
                next.ids.insert((id, state), parse_rule(table)?);
            }
        }

        for animation in &document.animation {
            next.animations.push(animation.to_rule()?);
        }

        *self = next;
        Ok(())
    }

    /// Base style of `element` in `state`, with fallbacks.
    #[must_use]
    pub fn base(&self, element: ElementType, state: StyleState) -> Style {
        if let Some(style) = self.base.get(&(element, state)) {
            return *style;
        }
        trace!(%element, %state, "no base style, falling back");
        self.base
            .get(&(element, StyleState::Default))
            .copied()
            .unwrap_or_default()
    }

    /// Mutable base style, created from the fallback chain if missing.
    pub fn base_mut(&mut self, element: ElementType, state: StyleState) -> &mut Style {
        let fallback = self.base(element, state);
        self.base.entry((element, state)).or_insert(fallback)
    }

    /// Replaces the base style of `element` in `state`.
    pub fn set_base(&mut self, element: ElementType, state: StyleState, style: Style) {
        self.base.insert((element, state), style);
    }

    /// Sets the rule of `class` for `state`.
    pub fn set_class_rule(&mut self, class: ClassId, state: StyleState, rule: StyleRule) {
        self.classes.insert((class, state), rule);
    }

    /// Sets the rule of widget `id` for `state`.
    pub fn set_id_rule(&mut self, id: Id, state: StyleState, rule: StyleRule) {
        self.ids.insert((id, state), rule);
    }

    /// Adds an animation rule.
    pub fn add_animation(&mut self, rule: AnimationRule) {
        self.animations.push(rule);
    }

    /// Combined animation timing for `element`.
    ///
    /// Several rules for one element merge: masks union, the longest
    /// duration and delay win, the last easing wins. Returns `None` when no
    /// rule exists or the merged duration is zero.
    #[must_use]
    pub fn animation(&self, element: ElementType) -> Option<AnimationRule> {
        let merged = self
            .animations
            .iter()
            .filter(|rule| rule.element == element)
            .fold(None::<AnimationRule>, |acc, rule| {
                Some(match acc {
                    None => *rule,
                    Some(acc) => AnimationRule {
                        element,
                        properties: acc.properties.union(rule.properties),
                        duration: acc.duration.max(rule.duration),
                        delay: acc.delay.max(rule.delay),
                        easing: rule.easing,
                    },
                })
            })?;
        (merged.duration > 0.0 && !merged.properties.is_empty()).then_some(merged)
    }

    /// Resolves the style of one element.
    #[must_use]
    pub fn resolve(
        &self,
        element: ElementType,
        state: StyleState,
        classes: &[ClassId],
        id: Option<Id>,
        inline: &[InlineStyle],
    ) -> Style {
        let mut style = self.base(element, state);

        for class in classes {
            apply_layer(&self.classes, *class, state, &mut style);
        }
        if let Some(id) = id {
            apply_layer(&self.ids, id, state, &mut style);
        }
        for entry in inline {
            if entry.element == element && entry.state.map_or(true, |s| s == state) {
                entry.property.set(&mut style, entry.value);
            }
        }
        style
    }
}

fn apply_layer<K: Copy + Eq + std::hash::Hash>(
    layer: &HashMap<(K, StyleState), StyleRule>,
    key: K,
    state: StyleState,
    style: &mut Style,
) {
    if let Some(rule) = layer.get(&(key, StyleState::Default)) {
        rule.apply(style);
    }
    if state != StyleState::Default {
        if let Some(rule) = layer.get(&(key, state)) {
            rule.apply(style);
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SheetDocument {
    element: BTreeMap<String, BTreeMap<String, toml::Table>>,
    class: BTreeMap<String, BTreeMap<String, toml::Table>>,
    id: BTreeMap<String, BTreeMap<String, toml::Table>>,
    animation: Vec<AnimationDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnimationDocument {
    element: String,
    #[serde(default)]
    properties: Vec<String>,
    duration: f32,
    #[serde(default)]
    delay: f32,
    #[serde(default)]
    easing: Option<String>,
}

impl AnimationDocument {
    fn to_rule(&self) -> UiResult<AnimationRule> {
        let element = ElementType::from_name(&self.element)
            .ok_or_else(|| UiError::UnknownElement(self.element.clone()))?;

        let properties = if self.properties.is_empty() {
            PropertyMask::ALL
        } else {
            let mut mask = PropertyMask::NONE;
            for name in &self.properties {
                if let Some(property) = StyleProperty::from_name(name) {
                    mask.insert(property);
                } else if let Some(group) = StyleProperty::shorthand(name) {
                    for property in group {
                        mask.insert(*property);
                    }
                } else {
                    return Err(UiError::UnknownProperty(name.clone()));
                }
            }
            mask
        };

        let easing = match &self.easing {
            None => Easing::default(),
            Some(name) => Easing::from_name(name)
                .ok_or_else(|| UiError::invalid("easing", format!("unknown easing {name}")))?,
        };

        if self.duration < 0.0 || self.delay < 0.0 {
            return Err(UiError::invalid("duration", "must not be negative"));
        }

        Ok(AnimationRule {
            element,
            properties,
            duration: self.duration,
            delay: self.delay,
            easing,
        })
    }
}

fn parse_state(name: &str) -> StyleState {
    StyleState::from_name(name).unwrap_or_else(|| {
        warn!(state = name, "unknown style state, using default");
        StyleState::Default
    })
}

fn parse_rule(table: &toml::Table) -> UiResult<StyleRule> {
    let mut rule = StyleRule::new();
    for (key, value) in table {
        if let Some(property) = StyleProperty::from_name(key) {
            rule.set(property, parse_value(property.kind(), key, value)?);
        } else if let Some(group) = StyleProperty::shorthand(key) {
            for (property, number) in group.iter().zip(expand_shorthand(key, group.len(), value)?) {
                rule.set(*property, PropertyValue::Number(number));
            }
        } else {
            return Err(UiError::UnknownProperty(key.clone()));
        }
    }
    Ok(rule)
}

/// Expands `n`, `[v, h]` or `[t, r, b, l]` (or `[x, y]` for pairs).
fn expand_shorthand(key: &str, arity: usize, value: &toml::Value) -> UiResult<Vec<f32>> {
    let numbers = match value {
        toml::Value::Array(items) => items
            .iter()
            .map(|item| parse_number(key, item))
            .collect::<UiResult<Vec<f32>>>()?,
        single => vec![parse_number(key, single)?],
    };

    match (arity, numbers.as_slice()) {
        (_, [all]) => Ok(vec![*all; arity]),
        (2, [x, y]) => Ok(vec![*x, *y]),
        (4, [vertical, horizontal]) => Ok(vec![*vertical, *horizontal, *vertical, *horizontal]),
        (4, [top, right, bottom, left]) => Ok(vec![*top, *right, *bottom, *left]),
        _ => Err(UiError::invalid(
            key,
            format!("expected 1 or {arity} numbers, got {}", numbers.len()),
        )),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn parse_number(key: &str, value: &toml::Value) -> UiResult<f32> {
    match value {
        toml::Value::Integer(i) => Ok(*i as f32),
        toml::Value::Float(f) => Ok(*f as f32),
        other => Err(UiError::invalid(key, format!("expected number, got {}", other.type_str()))),
    }
}

fn parse_value(kind: PropertyKind, key: &str, value: &toml::Value) -> UiResult<PropertyValue> {
    match kind {
        PropertyKind::Number => parse_number(key, value).map(PropertyValue::Number),
        PropertyKind::Color => parse_color(key, value).map(PropertyValue::Color),
        PropertyKind::Font => match value {
            toml::Value::Integer(i) => u32::try_from(*i)
                .map(|raw| PropertyValue::Font(FontId(raw)))
                .map_err(|_| UiError::invalid(key, "font id out of range")),
            other => Err(UiError::invalid(key, format!("expected font id, got {}", other.type_str()))),
        },
        PropertyKind::Direction => match value.as_str() {
            Some("horizontal") => Ok(PropertyValue::Direction(Direction::Horizontal)),
            Some("vertical") => Ok(PropertyValue::Direction(Direction::Vertical)),
            _ => Err(UiError::invalid(key, "expected \"horizontal\" or \"vertical\"")),
        },
        PropertyKind::Alignment => match value.as_str() {
            Some("start") => Ok(PropertyValue::Alignment(Alignment::Start)),
            Some("center") => Ok(PropertyValue::Alignment(Alignment::Center)),
            Some("end") => Ok(PropertyValue::Alignment(Alignment::End)),
            Some("stretch") => Ok(PropertyValue::Alignment(Alignment::Stretch)),
            _ => Err(UiError::invalid(key, "expected start, center, end or stretch")),
        },
    }
}

fn parse_color(key: &str, value: &toml::Value) -> UiResult<Color> {
    match value {
        toml::Value::String(text) => {
            Color::parse_hex(text).ok_or_else(|| UiError::invalid(key, format!("bad color {text}")))
        }
        toml::Value::Array(items) => {
            let channels = items
                .iter()
                .map(|item| parse_number(key, item))
                .collect::<UiResult<Vec<f32>>>()?;
            match channels.as_slice() {
                [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Color::rgba(*r, *g, *b, *a)),
                _ => Err(UiError::invalid(key, "expected 3 or 4 channels")),
            }
        }
        other => Err(UiError::invalid(key, format!("expected color, got {}", other.type_str()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sheet_has_no_animations() {
        let sheet = StyleSheet::default();
        assert!(sheet.animation(ElementType::Button).is_none());
    }

    #[test]
    fn test_resolution_order() {
        let mut sheet = StyleSheet::default();
        let class = ClassId::new("wide");
        let id = Id::from_label("ok");
        sheet.set_class_rule(
            class,
            StyleState::Default,
            StyleRule::new()
                .with(StyleProperty::Width, PropertyValue::Number(200.0))
                .with(StyleProperty::Height, PropertyValue::Number(40.0)),
        );
        sheet.set_id_rule(
            id,
            StyleState::Default,
            StyleRule::new().with(StyleProperty::Height, PropertyValue::Number(50.0)),
        );
        let inline = [InlineStyle {
            element: ElementType::Button,
            state: None,
            property: StyleProperty::Height,
            value: PropertyValue::Number(60.0),
        }];

        let classed = sheet.resolve(ElementType::Button, StyleState::Default, &[class], None, &[]);
        assert_eq!(classed.size.x, 200.0);
        assert_eq!(classed.size.y, 40.0);

        let with_id = sheet.resolve(ElementType::Button, StyleState::Default, &[class], Some(id), &[]);
        assert_eq!(with_id.size.y, 50.0);

        let inlined = sheet.resolve(ElementType::Button, StyleState::Hover, &[class], Some(id), &inline);
        assert_eq!(inlined.size.x, 200.0);
        assert_eq!(inlined.size.y, 60.0);
    }

    #[test]
    fn test_inline_scoped_to_element() {
        let sheet = StyleSheet::default();
        let inline = [InlineStyle {
            element: ElementType::Label,
            state: Some(StyleState::Hover),
            property: StyleProperty::Width,
            value: PropertyValue::Number(1.0),
        }];
        let button = sheet.resolve(ElementType::Button, StyleState::Hover, &[], None, &inline);
        assert_ne!(button.size.x, 1.0);
        let idle = sheet.resolve(ElementType::Label, StyleState::Default, &[], None, &inline);
        assert_ne!(idle.size.x, 1.0);
    }

    #[test]
    fn test_fallback_to_default_state_then_builtin() {
        let mut sheet = StyleSheet::empty();
        let mut custom = Style::default();
        custom.size.x = 123.0;
        sheet.set_base(ElementType::Panel, StyleState::Default, custom);

        assert_eq!(sheet.base(ElementType::Panel, StyleState::Focus).size.x, 123.0);
        assert_eq!(sheet.base(ElementType::Tab, StyleState::Hover), Style::default());
    }

    #[test]
    fn test_parse_document() {
        let sheet = StyleSheet::from_toml_str(
            r##"
            [element.button.hover]
            background-color = "#ff0000ff"
            padding = [2, 6]

            [class.danger.default]
            text-color = [1.0, 0.0, 0.0]

            [id.Inspector.focus]
            radius = 8

            [[animation]]
            element = "button"
            properties = ["background-color", "padding"]
            duration = 0.25
            delay = 0.05
            easing = "linear"
            "##,
        );
        let sheet = match sheet {
            Ok(sheet) => sheet,
            Err(err) => panic!("stylesheet should parse: {err}"),
        };

        let hover = sheet.base(ElementType::Button, StyleState::Hover);
        assert_eq!(hover.background, Color::rgba(1.0, 0.0, 0.0, 1.0));
        assert_eq!(hover.padding.top, 2.0);
        assert_eq!(hover.padding.left, 6.0);

        let danger = sheet.resolve(
            ElementType::Label,
            StyleState::Hover,
            &[ClassId::new("danger")],
            None,
            &[],
        );
        assert_eq!(danger.text, Color::rgb(1.0, 0.0, 0.0));

        let focused = sheet.resolve(
            ElementType::Window,
            StyleState::Focus,
            &[],
            Some(Id::from_label("Inspector")),
            &[],
        );
        assert_eq!(focused.radius.top_left, 8.0);

        let rule = sheet.animation(ElementType::Button);
        assert!(rule.is_some_and(|r| {
            r.properties.contains(StyleProperty::PaddingLeft)
                && !r.properties.contains(StyleProperty::Width)
                && r.easing == Easing::Linear
                && (r.duration - 0.25).abs() < 1e-6
        }));
    }

    #[test]
    fn test_unknown_state_falls_back_to_default() {
        let sheet = StyleSheet::from_toml_str(
            "[element.button.pressed]\nwidth = 42\n\n[class.wide.pressed]\nheight = 7",
        );
        let sheet = match sheet {
            Ok(sheet) => sheet,
            Err(err) => panic!("unknown state should not fail the sheet: {err}"),
        };
        assert_eq!(sheet.base(ElementType::Button, StyleState::Default).size.x, 42.0);
        let class = sheet.resolve(ElementType::Button, StyleState::Default, &[ClassId::new("wide")], None, &[]);
        assert_eq!(class.size.y, 7.0);
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!(matches!(
            StyleSheet::from_toml_str("[element.slider.default]\nwidth = 1"),
            Err(UiError::UnknownElement(_))
        ));
        assert!(matches!(
            StyleSheet::from_toml_str("[element.button.default]\nwobble = 1"),
            Err(UiError::UnknownProperty(_))
        ));
        assert!(matches!(
            StyleSheet::from_toml_str("[element.button.default]\nwidth = \"wide\""),
            Err(UiError::InvalidValue { .. })
        ));
        assert!(matches!(
            StyleSheet::from_toml_str("[element.button.default\n"),
            Err(UiError::Parse(_))
        ));
    }

    #[test]
    fn test_failed_merge_leaves_sheet_untouched() {
        let mut sheet = StyleSheet::default();
        let before = sheet.base(ElementType::Button, StyleState::Default);
        let result = sheet.merge_toml_str(
            "[element.button.default]\nwidth = 999\n[element.nope.default]\nwidth = 1",
        );
        assert!(result.is_err());
        assert_eq!(sheet.base(ElementType::Button, StyleState::Default), before);
    }

    #[test]
    fn test_zero_duration_animation_ignored() {
        let mut sheet = StyleSheet::default();
        sheet.add_animation(AnimationRule {
            element: ElementType::Tab,
            properties: PropertyMask::ALL,
            duration: 0.0,
            delay: 0.0,
            easing: Easing::Linear,
        });
        assert!(sheet.animation(ElementType::Tab).is_none());
    }
}
