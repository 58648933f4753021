pub mod band_scale;
pub mod bar_layout;
pub mod data_view;
pub mod scale;
pub mod types;
pub mod view_model;

pub use band_scale::BandScale;
pub use bar_layout::{BarGeometry, ChartLayout, LayoutConfig, compute_layout};
pub use data_view::{
    CategoryColumn, ColumnSource, DataView, DataViewObject, DataViewObjects, Fill, MeasureColumn,
    SolidColor,
};
pub use scale::LinearScale;
pub use types::Viewport;
pub use view_model::{BLANK_CATEGORY_LABEL, DataPoint, ViewModel, build_view_model};
