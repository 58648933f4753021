//! Label text: measurement, ellipsis fitting and numeric formatting.

mod fit;
mod measure;
mod value_format;

pub use fit::{ELLIPSIS, FittedText, fit_text};
pub use measure::{
    ESTIMATED_LINE_HEIGHT_RATIO, EstimatedTextMeasurer, FontSpec, TextMeasurer, TextMetrics,
};
pub use value_format::{DisplayUnit, ValueFormatter, auto_display_units, plain_number_text};
