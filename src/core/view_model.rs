use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::DataView;
use crate::core::data_view::finite_values;
use crate::error::{ChartError, ChartResult};
use crate::host::{ColorPalette, SelectionId, SelectionIdBuilder};

/// Label used for rows whose category is an empty string.
pub const BLANK_CATEGORY_LABEL: &str = "(Blank)";

/// Per-row override location for bar colours.
pub const COLOR_SELECTOR_OBJECT: &str = "colorSelector";
pub const COLOR_SELECTOR_FILL_PROPERTY: &str = "fill";

/// One bar: a category row paired with the selected measure's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub category: String,
    /// `None` for a blank cell: drawn as a zero-width bar without a value label.
    pub value: Option<f64>,
    pub format: Option<String>,
    pub color: String,
    pub selection_id: SelectionId,
}

/// Normalized input for one render of one measure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewModel {
    pub data_points: Vec<DataPoint>,
    pub data_max: f64,
    pub data_min: f64,
    pub measure_name: String,
    /// Measure actually used, after out-of-range fallback.
    pub measure_index: usize,
}

impl ViewModel {
    /// The "no data" model: no points, zero extrema, empty name.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_points.is_empty()
    }

    /// Format code shared by every point of the current measure.
    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.data_points.first().and_then(|point| point.format.as_deref())
    }
}

/// Builds the view model for `measure_index`.
///
/// Missing category column, category metadata or value columns yield
/// [`ViewModel::empty`]. An out-of-range measure index falls back to the first
/// measure. Category and value columns must have the same row count; blank
/// or non-finite cells become points without a value.
pub fn build_view_model(
    data_view: &DataView,
    measure_index: usize,
    palette: &dyn ColorPalette,
    selection_ids: &dyn SelectionIdBuilder,
) -> ChartResult<ViewModel> {
    let (Some(category), Some(measures)) = (&data_view.category, &data_view.values) else {
        return Ok(ViewModel::empty());
    };
    if category.source.is_none() || measures.is_empty() {
        return Ok(ViewModel::empty());
    }

    let measure_index = if measure_index >= measures.len() {
        warn!(
            requested = measure_index,
            measure_count = measures.len(),
            "measure index out of range, falling back to first measure"
        );
        0
    } else {
        measure_index
    };
    let measure = &measures[measure_index];

    if category.values.len() != measure.values.len() {
        return Err(ChartError::ColumnLengthMismatch {
            categories: category.values.len(),
            values: measure.values.len(),
        });
    }
    let blank_cells = measure.values.iter().filter(|value| !value.is_finite()).count();
    if blank_cells > 0 {
        debug!(
            measure = %measure.source.display_name,
            blank_cells,
            "measure has blank cells"
        );
    }

    let mut data_points = Vec::with_capacity(category.values.len());
    for (row, (raw_category, value)) in category.values.iter().zip(&measure.values).enumerate() {
        let color = category
            .row_objects(row)
            .and_then(|objects| {
                objects.drawable_fill_color(COLOR_SELECTOR_OBJECT, COLOR_SELECTOR_FILL_PROPERTY)
            })
            .unwrap_or_else(|| palette.color_for(raw_category));
        let category_label = if raw_category.is_empty() {
            BLANK_CATEGORY_LABEL.to_owned()
        } else {
            raw_category.clone()
        };

        data_points.push(DataPoint {
            category: category_label,
            value: value.is_finite().then_some(*value),
            format: measure.source.format.clone(),
            color,
            selection_id: selection_ids.category_selection_id(category, row),
        });
    }

    let data_max = measure
        .max_local
        .filter(|max| max.is_finite())
        .or_else(|| finite_values(&measure.values).reduce(f64::max))
        .unwrap_or(0.0);
    let data_min = measure
        .min_local
        .filter(|min| min.is_finite())
        .or_else(|| finite_values(&measure.values).reduce(f64::min))
        .unwrap_or(0.0);

    debug!(
        measure_index,
        rows = data_points.len(),
        data_min,
        data_max,
        "built view model"
    );

    Ok(ViewModel {
        data_points,
        data_max,
        data_min,
        measure_name: measure.source.display_name.clone(),
        measure_index,
    })
}
