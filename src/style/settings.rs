use serde::{Deserialize, Serialize};

use crate::core::DataViewObjects;

pub const ANIMATION_SETTINGS_OBJECT: &str = "animationSettings";
pub const LABEL_SETTINGS_OBJECT: &str = "labelSettings";
pub const MEASURE_TITLE_OBJECT: &str = "measureTitle";

pub const MIN_ANIMATION_DURATION_SECONDS: f64 = 2.0;
pub const MAX_ANIMATION_DURATION_SECONDS: f64 = 20.0;
pub const MAX_LABEL_FONT_SIZE_PX: f64 = 25.0;
pub const MIN_FONT_SIZE_PX: f64 = 1.0;
pub const MAX_LABEL_PRECISION: u8 = 4;

/// Auto-rotation toggle and delay between measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSettings {
    pub show: bool,
    pub duration_seconds: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            show: false,
            duration_seconds: 6.0,
        }
    }
}

/// Category and value label styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSettings {
    pub color: String,
    pub font_size_px: f64,
    /// `0` selects units from the data magnitude.
    pub display_units: f64,
    /// Decimal places; persisted by the host as `strokeWidth`.
    pub precision: u8,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            color: "#000".to_owned(),
            font_size_px: 12.0,
            display_units: 0.0,
            precision: 0,
        }
    }
}

/// Measure title styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSettings {
    pub color: String,
    pub font_size_px: f64,
}

impl Default for TitleSettings {
    fn default() -> Self {
        Self {
            color: "#666666".to_owned(),
            font_size_px: 20.0,
        }
    }
}

/// All user style settings for one update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleConfig {
    pub animation: AnimationSettings,
    pub label: LabelSettings,
    pub title: TitleSettings,
}

impl StyleConfig {
    /// Resolves every settings group from the host property bag.
    #[must_use]
    pub fn resolve(objects: Option<&DataViewObjects>) -> Self {
        Self {
            animation: resolve_animation_settings(objects),
            label: resolve_label_settings(objects),
            title: resolve_title_settings(objects),
        }
    }
}

fn present_group<'a>(
    objects: Option<&'a DataViewObjects>,
    object_name: &str,
) -> Option<&'a DataViewObjects> {
    objects.filter(|objects| objects.object(object_name).is_some())
}

fn finite_number(objects: &DataViewObjects, object_name: &str, property: &str) -> Option<f64> {
    objects
        .value::<f64>(object_name, property)
        .filter(|value| value.is_finite())
}

#[must_use]
pub fn resolve_animation_settings(objects: Option<&DataViewObjects>) -> AnimationSettings {
    let defaults = AnimationSettings::default();
    let Some(objects) = present_group(objects, ANIMATION_SETTINGS_OBJECT) else {
        return defaults;
    };

    let show = objects
        .value::<bool>(ANIMATION_SETTINGS_OBJECT, "show")
        .unwrap_or(defaults.show);
    let duration_seconds = finite_number(objects, ANIMATION_SETTINGS_OBJECT, "duration")
        .unwrap_or(defaults.duration_seconds)
        .clamp(
            MIN_ANIMATION_DURATION_SECONDS,
            MAX_ANIMATION_DURATION_SECONDS,
        );

    AnimationSettings {
        show,
        duration_seconds,
    }
}

#[must_use]
pub fn resolve_label_settings(objects: Option<&DataViewObjects>) -> LabelSettings {
    let defaults = LabelSettings::default();
    let Some(objects) = present_group(objects, LABEL_SETTINGS_OBJECT) else {
        return defaults;
    };

    let color = objects
        .drawable_fill_color(LABEL_SETTINGS_OBJECT, "color")
        .unwrap_or(defaults.color);
    let font_size_px = finite_number(objects, LABEL_SETTINGS_OBJECT, "fontSize")
        .unwrap_or(defaults.font_size_px)
        .clamp(MIN_FONT_SIZE_PX, MAX_LABEL_FONT_SIZE_PX);
    let display_units = finite_number(objects, LABEL_SETTINGS_OBJECT, "displayUnits")
        .filter(|units| *units >= 0.0)
        .unwrap_or(defaults.display_units);
    let precision = finite_number(objects, LABEL_SETTINGS_OBJECT, "strokeWidth")
        .map_or(defaults.precision, |raw| {
            raw.round().clamp(0.0, f64::from(MAX_LABEL_PRECISION)) as u8
        });

    LabelSettings {
        color,
        font_size_px,
        display_units,
        precision,
    }
}

#[must_use]
pub fn resolve_title_settings(objects: Option<&DataViewObjects>) -> TitleSettings {
    let defaults = TitleSettings::default();
    let Some(objects) = present_group(objects, MEASURE_TITLE_OBJECT) else {
        return defaults;
    };

    let color = objects
        .drawable_fill_color(MEASURE_TITLE_OBJECT, "color")
        .unwrap_or(defaults.color);
    let font_size_px = finite_number(objects, MEASURE_TITLE_OBJECT, "fontSize")
        .unwrap_or(defaults.font_size_px)
        .max(MIN_FONT_SIZE_PX);

    TitleSettings {
        color,
        font_size_px,
    }
}
