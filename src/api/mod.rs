//! Host-facing orchestration: engine config, frame building and the
//! [`RotatingChart`] that ties update events, rotation and rendering together.

mod chart;
mod config;
mod frame_builder;

pub use chart::{MissingField, RotatingChart, UpdateStatus, VisualUpdateOptions};
pub use config::{DEFAULT_LABEL_FONT_FAMILY, DEFAULT_TITLE_FONT_FAMILY, RotatingChartConfig};
pub use frame_builder::{ChartFrameInputs, build_chart_frame, build_missing_data_frame};
