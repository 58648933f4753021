use tracing::trace;

use crate::api::{MissingField, RotatingChartConfig};
use crate::core::{ChartLayout, ViewModel, Viewport, compute_layout};
use crate::error::ChartResult;
use crate::render::{Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};
use crate::style::StyleConfig;
use crate::text::{FontSpec, TextMeasurer, ValueFormatter, fit_text};

/// Baseline shift that vertically centres category labels on their tick.
const AXIS_LABEL_DY_EM: f64 = 0.32;
/// Baseline shift of value labels relative to the band centre.
const VALUE_LABEL_DY_EM: f64 = 0.40;
const AXIS_STROKE_WIDTH_PX: f64 = 1.0;
const BAR_OPACITY: f64 = 1.0;

/// Everything one chart draw pass depends on.
pub struct ChartFrameInputs<'a> {
    pub view_model: &'a ViewModel,
    pub style: &'a StyleConfig,
    pub viewport: Viewport,
    pub rotate_x_degrees: f64,
    pub config: &'a RotatingChartConfig,
    pub measurer: &'a dyn TextMeasurer,
}

/// Lays out the view model and materializes bars, axis, labels and title.
pub fn build_chart_frame(inputs: &ChartFrameInputs<'_>) -> ChartResult<(RenderFrame, ChartLayout)> {
    let ChartFrameInputs {
        view_model,
        style,
        viewport,
        rotate_x_degrees,
        config,
        measurer,
    } = *inputs;

    let title_font = FontSpec::new(config.title_font_family.as_str(), style.title.font_size_px);
    let title_height = if view_model.measure_name.is_empty() {
        0.0
    } else {
        measurer.measure(&view_model.measure_name, &title_font).height
    };

    let layout = compute_layout(view_model, viewport, title_height, &config.layout);
    let mut frame = RenderFrame::new(viewport);
    frame.surface_width = layout.chart_width;
    frame.surface_height = layout.chart_height;
    frame.rotate_x_degrees = rotate_x_degrees;
    frame.bar_opacity = BAR_OPACITY;

    if !view_model.measure_name.is_empty() {
        let fitted = fit_text(
            &view_model.measure_name,
            &title_font,
            layout.chart_width - config.title_width_reserve_px,
            measurer,
        );
        frame.title = Some(
            TextPrimitive::new(
                fitted.text,
                config.title_offset_x_px,
                style.title.font_size_px,
                style.title.font_size_px,
                Color::parse(&style.title.color)?,
                TextHAlign::Left,
            )
            .with_hover_text(fitted.full_text)
            .with_font_family(config.title_font_family.as_str()),
        );
    }

    frame.bars = view_model
        .data_points
        .iter()
        .zip(&layout.bars)
        .map(|(point, bar)| {
            Ok(RectPrimitive::new(
                bar.x,
                bar.y,
                bar.width.max(0.0),
                bar.height,
                Color::parse(&point.color)?,
            ))
        })
        .collect::<ChartResult<Vec<_>>>()?;

    let label_color = Color::parse(&style.label.color)?;
    let label_font = FontSpec::new(config.label_font_family.as_str(), style.label.font_size_px);
    let label_budget = layout.chart_width / config.label_width_divisor;
    frame.axis_lines = axis_lines(&layout, config, label_color);

    let axis_x = layout.axis_x();
    let band_half = layout.band_thickness() / 2.0;
    frame.axis_labels = view_model
        .data_points
        .iter()
        .zip(&layout.bars)
        .map(|(point, bar)| {
            let fitted = fit_text(&point.category, &label_font, label_budget, measurer);
            TextPrimitive::new(
                fitted.text,
                axis_x - config.axis_label_offset_px,
                bar.y + band_half + AXIS_LABEL_DY_EM * label_font.size_px,
                label_font.size_px,
                label_color,
                TextHAlign::Right,
            )
            .with_hover_text(fitted.full_text)
            .with_font_family(label_font.family.as_str())
        })
        .collect();

    if layout.chart_width > config.value_label_min_chart_width_px {
        let formatter = ValueFormatter::new(view_model.format(), &style.label, view_model.data_max);
        let x = layout.chart_width - layout.margin_px + config.value_label_gap_px;
        frame.value_labels = view_model
            .data_points
            .iter()
            .zip(&layout.bars)
            .filter_map(|(point, bar)| point.value.map(|value| (value, bar)))
            .map(|(value, bar)| {
                let formatted = formatter.format(value);
                let fitted = fit_text(&formatted, &label_font, label_budget, measurer);
                TextPrimitive::new(
                    fitted.text,
                    x,
                    bar.y + band_half + VALUE_LABEL_DY_EM * label_font.size_px,
                    label_font.size_px,
                    label_color,
                    TextHAlign::Left,
                )
                .with_hover_text(fitted.full_text)
                .with_font_family(label_font.family.as_str())
            })
            .collect();
    }

    trace!(
        bars = frame.bars.len(),
        value_labels = frame.value_labels.len(),
        surface_width = frame.surface_width,
        surface_height = frame.surface_height,
        "chart frame built"
    );
    Ok((frame, layout))
}

/// Axis spine over the band range plus one tick per band centre.
fn axis_lines(layout: &ChartLayout, config: &RotatingChartConfig, color: Color) -> Vec<LinePrimitive> {
    if layout.bars.is_empty() {
        return Vec::new();
    }
    let axis_x = layout.axis_x();
    let (top, bottom) = layout.band_scale.range();
    let spine = LinePrimitive::new(axis_x, top, axis_x, bottom, AXIS_STROKE_WIDTH_PX, color);
    let ticks = (0..layout.band_scale.count())
        .filter_map(|index| layout.band_scale.center(index))
        .map(|y| {
            LinePrimitive::new(
                axis_x - config.axis_tick_size_px,
                y,
                axis_x,
                y,
                AXIS_STROKE_WIDTH_PX,
                color,
            )
        });
    std::iter::once(spine).chain(ticks).collect()
}

/// Placeholder frame asking the user to bind the missing field.
pub fn build_missing_data_frame(
    viewport: Viewport,
    field: MissingField,
    style: &StyleConfig,
    config: &RotatingChartConfig,
) -> ChartResult<RenderFrame> {
    let message = field.message();
    let text = TextPrimitive::new(
        message.as_str(),
        viewport.width_px() / 4.0,
        viewport.height_px() / 2.0,
        style.label.font_size_px,
        Color::parse(&style.label.color)?,
        TextHAlign::Left,
    )
    .with_hover_text(message.as_str())
    .with_font_family(config.label_font_family.as_str());
    Ok(RenderFrame::new(viewport).with_message(text))
}
