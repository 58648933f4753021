use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::animation::{IntervalTimers, RotationEvent, RotationOutput, RotationStateMachine};
use crate::api::frame_builder::{ChartFrameInputs, build_chart_frame, build_missing_data_frame};
use crate::api::RotatingChartConfig;
use crate::core::{ChartLayout, DataView, ViewModel, Viewport, build_view_model};
use crate::error::{ChartError, ChartResult};
use crate::host::{PointerPosition, TooltipItem, VisualHost};
use crate::render::{RenderFrame, Renderer};
use crate::style::{StyleConfig, VisualObjectInstance, enumerate_object_instances};
use crate::text::plain_number_text;

/// Input of one host update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualUpdateOptions {
    pub viewport: Viewport,
    pub data_view: DataView,
}

impl VisualUpdateOptions {
    #[must_use]
    pub fn new(viewport: Viewport, data_view: DataView) -> Self {
        Self {
            viewport,
            data_view,
        }
    }
}

/// Data role the user has not bound yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingField {
    CategoryData,
    MeasureData,
}

impl MissingField {
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Self::CategoryData => "Category Data",
            Self::MeasureData => "Measure Data",
        }
    }

    #[must_use]
    pub fn message(self) -> String {
        format!("Please insert data in {} field", self.field_name())
    }

    fn detect(data_view: &DataView) -> Option<Self> {
        match (&data_view.category, &data_view.values) {
            (None, _) => Some(Self::CategoryData),
            (Some(category), _) if category.source.is_none() => Some(Self::CategoryData),
            (_, None) => Some(Self::MeasureData),
            (_, Some(values)) if values.is_empty() => Some(Self::MeasureData),
            _ => None,
        }
    }
}

/// Successful outcome of [`RotatingChart::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateStatus {
    Rendered,
    MissingData(MissingField),
}

/// Host-facing chart: owns the rotation state, the virtual timers and the
/// last rendered frame, and drives a [`Renderer`] on behalf of a [`VisualHost`].
pub struct RotatingChart<R: Renderer, H: VisualHost> {
    renderer: R,
    host: H,
    config: RotatingChartConfig,
    rotation: RotationStateMachine,
    timers: IntervalTimers,
    options: Option<VisualUpdateOptions>,
    style: StyleConfig,
    view_model: ViewModel,
    layout: Option<ChartLayout>,
    frame: Option<RenderFrame>,
    hovered_bar: Option<usize>,
}

impl<R: Renderer, H: VisualHost> RotatingChart<R, H> {
    pub fn new(renderer: R, host: H, config: RotatingChartConfig) -> ChartResult<Self> {
        config.validate()?;
        let rotation = RotationStateMachine::new(config.flip_frame_interval());
        Ok(Self {
            renderer,
            host,
            config,
            rotation,
            timers: IntervalTimers::new(),
            options: None,
            style: StyleConfig::default(),
            view_model: ViewModel::empty(),
            layout: None,
            frame: None,
            hovered_bar: None,
        })
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn config(&self) -> &RotatingChartConfig {
        &self.config
    }

    #[must_use]
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    #[must_use]
    pub fn view_model(&self) -> &ViewModel {
        &self.view_model
    }

    #[must_use]
    pub fn layout(&self) -> Option<&ChartLayout> {
        self.layout.as_ref()
    }

    #[must_use]
    pub fn frame(&self) -> Option<&RenderFrame> {
        self.frame.as_ref()
    }

    #[must_use]
    pub fn rotation(&self) -> &RotationStateMachine {
        &self.rotation
    }

    #[must_use]
    pub fn timers(&self) -> &IntervalTimers {
        &self.timers
    }

    /// Full update: stops any rotation in flight, resolves style, rebuilds
    /// and renders, then restarts rotation for the new data.
    ///
    /// The host hears `rendering_started` first and then exactly one of
    /// `rendering_finished` or `rendering_failed`.
    pub fn update(&mut self, options: VisualUpdateOptions) -> ChartResult<UpdateStatus> {
        self.host.rendering_started();
        match self.apply_update(options) {
            Ok(status) => {
                self.host.rendering_finished();
                Ok(status)
            }
            Err(error) => {
                self.fail(&error);
                Err(error)
            }
        }
    }

    fn apply_update(&mut self, options: VisualUpdateOptions) -> ChartResult<UpdateStatus> {
        self.step_rotation(RotationEvent::Cancel);
        self.hovered_bar = None;

        let viewport = options.viewport;
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        self.style = StyleConfig::resolve(options.data_view.objects.as_ref());
        let missing = MissingField::detect(&options.data_view);
        let measure_count = options.data_view.measure_count();
        self.options = Some(options);

        if let Some(field) = missing {
            warn!(?field, "required data field is not bound");
            self.step_rotation(RotationEvent::Reset {
                measure_count: 0,
                animation: self.style.animation,
            });
            let frame = build_missing_data_frame(viewport, field, &self.style, &self.config)?;
            self.renderer.render(&frame)?;
            self.view_model = ViewModel::empty();
            self.layout = None;
            self.frame = Some(frame);
            return Ok(UpdateStatus::MissingData(field));
        }

        self.step_rotation(RotationEvent::Reset {
            measure_count,
            animation: self.style.animation,
        });
        self.rebuild()?;
        Ok(UpdateStatus::Rendered)
    }

    /// Forces an immediate flip to the next measure, as a click on the chart does.
    pub fn click(&mut self) -> ChartResult<()> {
        self.dispatch(RotationEvent::ManualAdvance)
    }

    /// Moves virtual time forward, delivering every due timer firing in order.
    pub fn advance_time(&mut self, elapsed: Duration) -> ChartResult<()> {
        let deadline = self.timers.now() + elapsed;
        while let Some(fired) = self.timers.next_due(deadline) {
            self.dispatch(RotationEvent::Timer(fired))?;
        }
        self.timers.advance_to(deadline);
        Ok(())
    }

    /// Shows the tooltip of the bar under the pointer, hiding it when the
    /// pointer leaves every bar. Returns the hovered data point index.
    pub fn pointer_move(&mut self, position: PointerPosition) -> Option<usize> {
        let hit = self.bar_at(position);
        match hit {
            Some(index) => {
                if let (Some(items), Some(point)) =
                    (self.tooltip_items(index), self.view_model.data_points.get(index))
                {
                    self.host.show_tooltip(&items, &point.selection_id, position);
                }
            }
            None if self.hovered_bar.is_some() => self.host.hide_tooltip(),
            None => {}
        }
        self.hovered_bar = hit;
        hit
    }

    /// Opens the host context menu for the bar under the pointer. Returns
    /// `false` when the pointer is not over a bar.
    pub fn context_menu(&mut self, position: PointerPosition) -> bool {
        let Some(point) = self
            .bar_at(position)
            .and_then(|index| self.view_model.data_points.get(index))
        else {
            return false;
        };
        self.host.show_context_menu(&point.selection_id, position);
        true
    }

    #[must_use]
    pub fn tooltip_items(&self, index: usize) -> Option<Vec<TooltipItem>> {
        self.view_model.data_points.get(index).map(|point| {
            vec![TooltipItem {
                display_name: point.category.clone(),
                color: point.color.clone(),
                value: point.value.map(plain_number_text).unwrap_or_default(),
            }]
        })
    }

    /// Current resolved settings for one property-pane object.
    #[must_use]
    pub fn enumerate_object_instances(&self, object_name: &str) -> Vec<VisualObjectInstance> {
        enumerate_object_instances(object_name, &self.style, &self.view_model.data_points)
    }

    fn bar_at(&self, position: PointerPosition) -> Option<usize> {
        self.frame
            .as_ref()
            .and_then(|frame| frame.bar_at(position.x, position.y))
    }

    fn dispatch(&mut self, event: RotationEvent) -> ChartResult<()> {
        let rendered_index = self.view_model.measure_index;
        let output = self.step_rotation(event);
        let result = if output.measure_changed {
            self.rebuild()
        } else if output.transform_changed {
            self.redraw_transform()
        } else {
            Ok(())
        };
        if let Err(error) = &result {
            if output.measure_changed {
                self.rotation.restore_measure_index(rendered_index);
            }
            self.fail(error);
        }
        result
    }

    fn step_rotation(&mut self, event: RotationEvent) -> RotationOutput {
        let output = self.rotation.handle(event);
        for command in &output.commands {
            self.timers.apply(*command);
        }
        output
    }

    fn fail(&mut self, error: &ChartError) {
        warn!(%error, "chart rendering failed, rotation stopped");
        self.step_rotation(RotationEvent::Cancel);
        self.host.rendering_failed(error);
    }

    fn rebuild(&mut self) -> ChartResult<()> {
        let Some(options) = &self.options else {
            return Ok(());
        };
        let view_model = build_view_model(
            &options.data_view,
            self.rotation.measure_index(),
            self.host.color_palette(),
            self.host.selection_id_builder(),
        )?;
        let (frame, layout) = build_chart_frame(&ChartFrameInputs {
            view_model: &view_model,
            style: &self.style,
            viewport: options.viewport,
            rotate_x_degrees: self.rotation.rotate_x_degrees(),
            config: &self.config,
            measurer: self.host.text_measurer(),
        })?;
        self.renderer.render(&frame)?;

        debug!(
            rows = view_model.data_points.len(),
            measure_index = view_model.measure_index,
            chart_width = layout.chart_width,
            chart_height = layout.chart_height,
            overflowed = layout.overflowed,
            "chart rebuilt"
        );
        if layout.overflowed && !layout.band_floor_reached(&self.config.layout) {
            warn!(
                band_thickness = layout.band_thickness(),
                floor = self.config.layout.min_band_thickness_px,
                "band thickness still below floor after overflow correction"
            );
        }

        self.view_model = view_model;
        self.layout = Some(layout);
        self.frame = Some(frame);
        Ok(())
    }

    fn redraw_transform(&mut self) -> ChartResult<()> {
        let Some(frame) = self.frame.as_mut() else {
            return Ok(());
        };
        frame.rotate_x_degrees = self.rotation.rotate_x_degrees();
        self.renderer.render(frame)
    }
}
