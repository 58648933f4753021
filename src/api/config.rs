use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::LayoutConfig;
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_LABEL_FONT_FAMILY: &str = "sans-serif";
pub const DEFAULT_TITLE_FONT_FAMILY: &str = "Segoe UI,wf_segoe-ui_normal,helvetica,arial,sans-serif";

/// Engine tuning that is not user-facing style.
///
/// Serializable so hosts can ship overrides alongside their own settings;
/// every field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotatingChartConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Interval of the flip animation frame timer.
    #[serde(default = "default_flip_frame_interval_ms")]
    pub flip_frame_interval_ms: u64,
    /// Value labels are only drawn when the chart is wider than this.
    #[serde(default = "default_value_label_min_chart_width_px")]
    pub value_label_min_chart_width_px: f64,
    /// Category and value labels may use `chart_width / label_width_divisor`.
    #[serde(default = "default_label_width_divisor")]
    pub label_width_divisor: f64,
    #[serde(default = "default_value_label_gap_px")]
    pub value_label_gap_px: f64,
    #[serde(default = "default_title_offset_x_px")]
    pub title_offset_x_px: f64,
    /// Width kept free to the right of the title.
    #[serde(default = "default_title_width_reserve_px")]
    pub title_width_reserve_px: f64,
    #[serde(default = "default_axis_tick_size_px")]
    pub axis_tick_size_px: f64,
    /// Gap between the axis and the right edge of category labels.
    #[serde(default = "default_axis_label_offset_px")]
    pub axis_label_offset_px: f64,
    #[serde(default = "default_label_font_family")]
    pub label_font_family: String,
    #[serde(default = "default_title_font_family")]
    pub title_font_family: String,
}

impl Default for RotatingChartConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            flip_frame_interval_ms: default_flip_frame_interval_ms(),
            value_label_min_chart_width_px: default_value_label_min_chart_width_px(),
            label_width_divisor: default_label_width_divisor(),
            value_label_gap_px: default_value_label_gap_px(),
            title_offset_x_px: default_title_offset_x_px(),
            title_width_reserve_px: default_title_width_reserve_px(),
            axis_tick_size_px: default_axis_tick_size_px(),
            axis_label_offset_px: default_axis_label_offset_px(),
            label_font_family: default_label_font_family(),
            title_font_family: default_title_font_family(),
        }
    }
}

impl RotatingChartConfig {
    #[must_use]
    pub fn flip_frame_interval(&self) -> Duration {
        Duration::from_millis(self.flip_frame_interval_ms)
    }

    pub fn validate(&self) -> ChartResult<()> {
        let layout = &self.layout;
        if !layout.margin_ratio.is_finite() || !(0.0..0.5).contains(&layout.margin_ratio) {
            return Err(ChartError::InvalidData(
                "margin ratio must be finite and in [0, 0.5)".to_owned(),
            ));
        }
        if !(0.0..1.0).contains(&layout.band_padding_inner)
            || !layout.band_padding_outer.is_finite()
            || layout.band_padding_outer < 0.0
        {
            return Err(ChartError::InvalidData(
                "band padding must be inner in [0, 1) and outer >= 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("min band thickness", layout.min_band_thickness_px),
            ("label width divisor", self.label_width_divisor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("overflow width reduction", layout.overflow_width_reduction_px),
            ("value label min chart width", self.value_label_min_chart_width_px),
            ("value label gap", self.value_label_gap_px),
            ("title offset", self.title_offset_x_px),
            ("title width reserve", self.title_width_reserve_px),
            ("axis tick size", self.axis_tick_size_px),
            ("axis label offset", self.axis_label_offset_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if self.flip_frame_interval_ms == 0 {
            return Err(ChartError::InvalidData(
                "flip frame interval must be > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_flip_frame_interval_ms() -> u64 {
    5
}

fn default_value_label_min_chart_width_px() -> f64 {
    90.0
}

fn default_label_width_divisor() -> f64 {
    9.0
}

fn default_value_label_gap_px() -> f64 {
    10.0
}

fn default_title_offset_x_px() -> f64 {
    20.0
}

fn default_title_width_reserve_px() -> f64 {
    30.0
}

fn default_axis_tick_size_px() -> f64 {
    6.0
}

fn default_axis_label_offset_px() -> f64 {
    9.0
}

fn default_label_font_family() -> String {
    DEFAULT_LABEL_FONT_FAMILY.to_owned()
}

fn default_title_font_family() -> String {
    DEFAULT_TITLE_FONT_FAMILY.to_owned()
}
