use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("column length mismatch: {categories} categories vs {values} values")]
    ColumnLengthMismatch { categories: usize, values: usize },

    #[error("render failed: {0}")]
    Render(String),
}
