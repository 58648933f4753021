use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one chart draw pass.
///
/// `bars[i]` belongs to the view model's `data_points[i]`. A frame that only
/// carries `message` is the missing-data placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    /// Drawing surface size; taller than the viewport when bands overflowed.
    pub surface_width: f64,
    pub surface_height: f64,
    /// Flip transform around the horizontal axis, in degrees.
    pub rotate_x_degrees: f64,
    pub bar_opacity: f64,
    pub bars: Vec<RectPrimitive>,
    pub axis_lines: Vec<LinePrimitive>,
    pub title: Option<TextPrimitive>,
    pub axis_labels: Vec<TextPrimitive>,
    pub value_labels: Vec<TextPrimitive>,
    pub message: Option<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            surface_width: viewport.width_px(),
            surface_height: viewport.height_px(),
            rotate_x_degrees: 0.0,
            bar_opacity: 1.0,
            bars: Vec::new(),
            axis_lines: Vec::new(),
            title: None,
            axis_labels: Vec::new(),
            value_labels: Vec::new(),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: TextPrimitive) -> Self {
        self.message = Some(message);
        self
    }

    /// Index of the topmost bar under `(x, y)` in surface coordinates.
    #[must_use]
    pub fn bar_at(&self, x: f64, y: f64) -> Option<usize> {
        self.bars.iter().rposition(|bar| bar.contains(x, y))
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.rotate_x_degrees.is_finite() {
            return Err(ChartError::InvalidData(
                "frame rotation must be finite".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.bar_opacity) {
            return Err(ChartError::InvalidData(
                "bar opacity must be in [0, 1]".to_owned(),
            ));
        }

        for bar in &self.bars {
            bar.validate()?;
        }
        for line in &self.axis_lines {
            line.validate()?;
        }
        for text in self
            .title
            .iter()
            .chain(&self.axis_labels)
            .chain(&self.value_labels)
            .chain(&self.message)
        {
            text.validate()?;
        }

        Ok(())
    }
}
