use serde::{Deserialize, Serialize};

/// Font family and size used to measure and draw a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f64,
}

impl FontSpec {
    #[must_use]
    pub fn new(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
        }
    }
}

/// Single-line text extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

/// Text measurement capability supplied by the host's rendering substrate.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> TextMetrics;
}

/// Line height relative to font size used by [`EstimatedTextMeasurer`].
pub const ESTIMATED_LINE_HEIGHT_RATIO: f64 = 1.3;

/// Deterministic, backend-independent width estimate from per-glyph advance
/// classes. Used headless and whenever the host has no measurement service.
#[derive(Debug, Default, Clone, Copy)]
pub struct EstimatedTextMeasurer;

impl EstimatedTextMeasurer {
    #[must_use]
    pub fn estimate_width_px(text: &str, font_size_px: f64) -> f64 {
        let units = text.chars().fold(0.0, |acc, ch| {
            acc + match ch {
                '0'..='9' => 0.62,
                '.' | ',' | 'i' | 'l' | 'j' | '\'' | '|' => 0.34,
                '-' | '+' | '%' | '(' | ')' => 0.42,
                ' ' => 0.33,
                'A'..='Z' | 'm' | 'w' => 0.72,
                _ => 0.58,
            }
        });
        units * font_size_px
    }
}

impl TextMeasurer for EstimatedTextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> TextMetrics {
        TextMetrics {
            width: Self::estimate_width_px(text, font.size_px),
            height: font.size_px * ESTIMATED_LINE_HEIGHT_RATIO,
        }
    }
}
