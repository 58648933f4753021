use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{BandScale, LinearScale, ViewModel, Viewport};

/// Geometry tuning for the horizontal bar layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Left margin (and value-scale inset) as a fraction of chart width.
    #[serde(default = "default_margin_ratio")]
    pub margin_ratio: f64,
    /// Bands thinner than this trigger the overflow correction.
    #[serde(default = "default_min_band_thickness_px")]
    pub min_band_thickness_px: f64,
    #[serde(default = "default_band_padding_inner")]
    pub band_padding_inner: f64,
    #[serde(default = "default_band_padding_outer")]
    pub band_padding_outer: f64,
    /// Width given up to the host's scrollbar when the chart overflows.
    #[serde(default = "default_overflow_width_reduction_px")]
    pub overflow_width_reduction_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_ratio: default_margin_ratio(),
            min_band_thickness_px: default_min_band_thickness_px(),
            band_padding_inner: default_band_padding_inner(),
            band_padding_outer: default_band_padding_outer(),
            overflow_width_reduction_px: default_overflow_width_reduction_px(),
        }
    }
}

fn default_margin_ratio() -> f64 {
    0.15
}

fn default_min_band_thickness_px() -> f64 {
    20.0
}

fn default_band_padding_inner() -> f64 {
    0.2
}

fn default_band_padding_outer() -> f64 {
    0.3
}

fn default_overflow_width_reduction_px() -> f64 {
    20.0
}

/// Pixel rectangle of one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scales and bar geometry for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub chart_width: f64,
    pub chart_height: f64,
    /// `true` when the chart grew taller than the viewport to keep bands readable.
    pub overflowed: bool,
    /// Left margin in pixels; the category axis sits here.
    pub margin_px: f64,
    pub band_scale: BandScale,
    pub value_scale: LinearScale,
    /// Distance from the axis to the zero crossing when data goes negative.
    pub axis_offset: f64,
    pub bars: Vec<BarGeometry>,
}

impl ChartLayout {
    #[must_use]
    pub fn axis_x(&self) -> f64 {
        self.margin_px
    }

    #[must_use]
    pub fn band_thickness(&self) -> f64 {
        self.band_scale.band_width()
    }

    /// Whether bands reached the configured minimum thickness. The overflow
    /// correction runs once and can stay below the floor.
    #[must_use]
    pub fn band_floor_reached(&self, config: &LayoutConfig) -> bool {
        self.bars.is_empty() || self.band_thickness() >= config.min_band_thickness_px
    }
}

/// Computes the categorical and value scales plus every bar rectangle.
///
/// Bands start below the title (`title_height`). When they come out thinner
/// than `min_band_thickness_px` the chart height grows by the missing
/// thickness per category and the width shrinks by
/// `overflow_width_reduction_px`; the band scale is then recomputed once.
#[must_use]
pub fn compute_layout(
    view_model: &ViewModel,
    viewport: Viewport,
    title_height: f64,
    config: &LayoutConfig,
) -> ChartLayout {
    let count = view_model.data_points.len();
    let mut chart_width = viewport.width_px();
    let mut chart_height = viewport.height_px();

    let mut band_scale = BandScale::new((title_height, chart_height), count)
        .with_padding(config.band_padding_inner, config.band_padding_outer);
    let initial_band = band_scale.band_width();
    let overflowed = count > 0 && initial_band < config.min_band_thickness_px;
    if overflowed {
        chart_height = viewport.height_px()
            + count as f64 * (config.min_band_thickness_px - initial_band);
        chart_width = viewport.width_px() - config.overflow_width_reduction_px;
        band_scale = band_scale.with_range((title_height, chart_height));
        debug!(
            count,
            initial_band,
            corrected_band = band_scale.band_width(),
            chart_height,
            "band thickness below floor, chart height extended"
        );
    }

    let margin_px = config.margin_ratio * chart_width;
    let domain_end = if view_model.data_min < 0.0 {
        view_model.data_max.abs() + view_model.data_min.abs()
    } else {
        view_model.data_max.abs()
    };
    let value_scale = LinearScale::new((0.0, domain_end), (chart_width, margin_px * 2.0));

    let spans_negative = view_model.data_min < 0.0
        && (view_model.data_max > 0.0 || view_model.data_max < 0.0);
    let axis_offset = if spans_negative {
        chart_width - value_scale.map(view_model.data_min.abs())
    } else {
        0.0
    };

    let band_height = band_scale.band_width();
    let bars = view_model
        .data_points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let value = point.value.unwrap_or(0.0);
            let width = chart_width - value_scale.map(value.abs());
            let is_negative = chart_width - value_scale.map(value) < 0.0;
            let x = if !is_negative {
                margin_px + axis_offset.abs()
            } else if value == view_model.data_min {
                margin_px
            } else {
                margin_px + axis_offset.abs() - width
            };
            BarGeometry {
                x,
                y: band_scale.position(index).unwrap_or(title_height),
                width,
                height: band_height,
            }
        })
        .collect();

    ChartLayout {
        chart_width,
        chart_height,
        overflowed,
        margin_px,
        band_scale,
        value_scale,
        axis_offset,
        bars,
    }
}
