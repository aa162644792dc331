//! Font identification and text measurement.
//!
//! The engine never rasterizes glyphs; it only needs widths and heights to
//! lay text out. Backends plug their own metrics in through [`FontMetrics`].

use serde::{Deserialize, Serialize};

/// Opaque font handle understood by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontId(pub u32);

impl FontId {
    /// The font every backend must provide.
    pub const DEFAULT: Self = Self(0);
}

/// Text measurement provided by the host.
pub trait FontMetrics {
    /// Returns true if `font` is known to the backend.
    fn has_font(&self, font: FontId) -> bool;

    /// Advance width of `text` in pixels.
    fn text_width(&self, font: FontId, text: &str) -> f32;

    /// Height of a single line of `text`.
    fn text_height(&self, font: FontId, text: &str) -> f32;

    /// Distance between consecutive baselines.
    fn line_height(&self, font: FontId) -> f32 {
        self.text_height(font, "")
    }
}

/// Resolves `font` against `metrics`, falling back to [`FontId::DEFAULT`].
#[must_use]
pub fn resolve_font(metrics: &dyn FontMetrics, font: FontId) -> FontId {
    if metrics.has_font(font) {
        font
    } else {
        FontId::DEFAULT
    }
}

/// Fixed-advance metrics: every character is the same width.
///
/// Good enough for terminals, tests, and headless layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Advance per character.
    pub char_width: f32,
    /// Line height.
    pub line_height: f32,
    /// Number of fonts considered present (`FontId(0)..FontId(fonts)`).
    pub fonts: u32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
            fonts: 1,
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn has_font(&self, font: FontId) -> bool {
        font.0 < self.fonts
    }

    fn text_width(&self, _font: FontId, text: &str) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let chars = text.chars().count() as f32;
        chars * self.char_width
    }

    fn text_height(&self, _font: FontId, _text: &str) -> f32 {
        self.line_height
    }

    fn line_height(&self, _font: FontId) -> f32 {
        self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_width() {
        let metrics = MonospaceMetrics::default();
        assert_eq!(metrics.text_width(FontId::DEFAULT, "abcd"), 32.0);
        assert_eq!(metrics.text_height(FontId::DEFAULT, "abcd"), 16.0);
    }

    #[test]
    fn test_unknown_font_falls_back() {
        let metrics = MonospaceMetrics::default();
        assert_eq!(resolve_font(&metrics, FontId(7)), FontId::DEFAULT);
        assert_eq!(resolve_font(&metrics, FontId(0)), FontId(0));
    }
}
