//! Host-facing tabular input and the generic style property bag.
//!
//! These types mirror the shape a host delivers on every update: one
//! categorical column, zero or more parallel measure columns and a nested
//! `object -> property -> value` bag holding user style choices. They are
//! deserializable from the host's JSON payload.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::render::Color;

/// One settings object inside the property bag (`property name -> value`).
pub type DataViewObject = IndexMap<String, Value>;

/// Nested property bag (`object name -> property name -> value`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataViewObjects(IndexMap<String, DataViewObject>);

impl DataViewObjects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used by hosts and tests.
    #[must_use]
    pub fn with_property(
        mut self,
        object_name: impl Into<String>,
        property_name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.set_property(object_name, property_name, value);
        self
    }

    pub fn set_property(
        &mut self,
        object_name: impl Into<String>,
        property_name: impl Into<String>,
        value: impl Into<Value>,
    ) {
        self.0
            .entry(object_name.into())
            .or_default()
            .insert(property_name.into(), value.into());
    }

    #[must_use]
    pub fn object(&self, object_name: &str) -> Option<&DataViewObject> {
        self.0.get(object_name)
    }

    #[must_use]
    pub fn property(&self, object_name: &str, property_name: &str) -> Option<&Value> {
        self.object(object_name)?.get(property_name)
    }

    /// Reads a typed property. Absent or mistyped values yield `None`.
    #[must_use]
    pub fn value<T: DeserializeOwned>(&self, object_name: &str, property_name: &str) -> Option<T> {
        let raw = self.property(object_name, property_name)?;
        serde_json::from_value(raw.clone()).ok()
    }

    /// Reads a `{ "solid": { "color": .. } }` fill property.
    #[must_use]
    pub fn fill_color(&self, object_name: &str, property_name: &str) -> Option<String> {
        self.value::<Fill>(object_name, property_name)
            .map(|fill| fill.solid.color)
    }

    /// Like [`Self::fill_color`], but drops literals no renderer could draw.
    #[must_use]
    pub fn drawable_fill_color(&self, object_name: &str, property_name: &str) -> Option<String> {
        self.fill_color(object_name, property_name)
            .filter(|literal| match Color::parse(literal) {
                Ok(_) => true,
                Err(error) => {
                    warn!(object_name, property_name, %error, "ignoring unparseable fill colour");
                    false
                }
            })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Solid fill as stored by the host for colour properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub solid: SolidColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidColor {
    pub color: String,
}

impl Fill {
    #[must_use]
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            solid: SolidColor {
                color: color.into(),
            },
        }
    }
}

/// Column metadata supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSource {
    pub display_name: String,
    #[serde(default)]
    pub format: Option<String>,
}

impl ColumnSource {
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            format: None,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// The single categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryColumn {
    #[serde(default)]
    pub source: Option<ColumnSource>,
    pub values: Vec<String>,
    /// Per-row style overrides, parallel to `values`.
    #[serde(default)]
    pub objects: Vec<Option<DataViewObjects>>,
}

impl CategoryColumn {
    #[must_use]
    pub fn new(source: ColumnSource, values: Vec<String>) -> Self {
        Self {
            source: Some(source),
            values,
            objects: Vec::new(),
        }
    }

    /// Per-row override lookup; rows without objects yield `None`.
    #[must_use]
    pub fn row_objects(&self, row: usize) -> Option<&DataViewObjects> {
        self.objects.get(row).and_then(Option::as_ref)
    }
}

/// One measure column with its precomputed extrema.
///
/// Blank cells arrive as JSON `null` and are held as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureColumn {
    pub source: ColumnSource,
    #[serde(deserialize_with = "blank_cells_as_nan")]
    pub values: Vec<f64>,
    #[serde(default)]
    pub min_local: Option<f64>,
    #[serde(default)]
    pub max_local: Option<f64>,
}

impl MeasureColumn {
    /// Creates a measure column whose extrema are taken from the finite
    /// `values`.
    #[must_use]
    pub fn new(source: ColumnSource, values: Vec<f64>) -> Self {
        let min_local = finite_values(&values).reduce(f64::min);
        let max_local = finite_values(&values).reduce(f64::max);
        Self {
            source,
            values,
            min_local,
            max_local,
        }
    }

    #[must_use]
    pub fn with_extrema(mut self, min_local: f64, max_local: f64) -> Self {
        self.min_local = Some(min_local);
        self.max_local = Some(max_local);
        self
    }
}

/// Cells that hold a number; blank and non-finite cells are skipped.
pub(crate) fn finite_values(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|value| value.is_finite())
}

fn blank_cells_as_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    let cells = Vec::<Option<f64>>::deserialize(deserializer)?;
    Ok(cells
        .into_iter()
        .map(|cell| cell.unwrap_or(f64::NAN))
        .collect())
}

/// Everything the host delivers for one update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataView {
    #[serde(default)]
    pub category: Option<CategoryColumn>,
    #[serde(default)]
    pub values: Option<Vec<MeasureColumn>>,
    #[serde(default)]
    pub objects: Option<DataViewObjects>,
}

impl DataView {
    #[must_use]
    pub fn new(category: CategoryColumn, values: Vec<MeasureColumn>) -> Self {
        Self {
            category: Some(category),
            values: Some(values),
            objects: None,
        }
    }

    #[must_use]
    pub fn with_objects(mut self, objects: DataViewObjects) -> Self {
        self.objects = Some(objects);
        self
    }

    #[must_use]
    pub fn measure_count(&self) -> usize {
        self.values.as_ref().map_or(0, Vec::len)
    }
}
