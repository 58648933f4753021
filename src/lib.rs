//! rotating-chart: a horizontal bar chart that rotates through its measures.
//!
//! The crate turns host tabular data into a backend-agnostic `RenderFrame`,
//! flipping to the next measure on a timer or on click. Hosts plug in through
//! the `VisualHost` and `Renderer` traits; time is driven explicitly with
//! `RotatingChart::advance_time`, so the whole cycle runs headless.

pub mod animation;
pub mod api;
pub mod core;
pub mod error;
pub mod host;
pub mod render;
pub mod style;
pub mod telemetry;
pub mod text;

pub use api::{RotatingChart, RotatingChartConfig, UpdateStatus, VisualUpdateOptions};
pub use error::{ChartError, ChartResult};
