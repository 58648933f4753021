use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::core::DataPoint;
use crate::core::view_model::{COLOR_SELECTOR_FILL_PROPERTY, COLOR_SELECTOR_OBJECT};
use crate::host::SelectionId;

use super::{
    ANIMATION_SETTINGS_OBJECT, LABEL_SETTINGS_OBJECT, MEASURE_TITLE_OBJECT, StyleConfig,
};

/// Settings groups the host's property pane can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingsObject {
    AnimationSettings,
    LabelSettings,
    MeasureTitle,
    ColorSelector,
}

impl SettingsObject {
    #[must_use]
    pub fn from_name(object_name: &str) -> Option<Self> {
        match object_name {
            ANIMATION_SETTINGS_OBJECT => Some(Self::AnimationSettings),
            LABEL_SETTINGS_OBJECT => Some(Self::LabelSettings),
            MEASURE_TITLE_OBJECT => Some(Self::MeasureTitle),
            COLOR_SELECTOR_OBJECT => Some(Self::ColorSelector),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AnimationSettings => ANIMATION_SETTINGS_OBJECT,
            Self::LabelSettings => LABEL_SETTINGS_OBJECT,
            Self::MeasureTitle => MEASURE_TITLE_OBJECT,
            Self::ColorSelector => COLOR_SELECTOR_OBJECT,
        }
    }
}

/// One entry of the property pane, in the shape the host's configuration UI
/// expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualObjectInstance {
    pub object_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub selector: Option<SelectionId>,
    pub properties: IndexMap<String, Value>,
}

impl VisualObjectInstance {
    fn new(object: SettingsObject) -> Self {
        Self {
            object_name: object.name().to_owned(),
            display_name: None,
            selector: None,
            properties: IndexMap::new(),
        }
    }

    fn with_property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_owned(), value);
        self
    }
}

/// Lists the current resolved values for `object_name`.
///
/// Unknown object names yield an empty list.
#[must_use]
pub fn enumerate_object_instances(
    object_name: &str,
    style: &StyleConfig,
    data_points: &[DataPoint],
) -> Vec<VisualObjectInstance> {
    let Some(object) = SettingsObject::from_name(object_name) else {
        return Vec::new();
    };

    match object {
        SettingsObject::AnimationSettings => {
            let mut instance = VisualObjectInstance::new(object)
                .with_property("show", json!(style.animation.show))
                .with_property("duration", json!(style.animation.duration_seconds.round()));
            instance.display_name = Some("Delay (seconds)".to_owned());
            vec![instance]
        }
        SettingsObject::LabelSettings => vec![
            VisualObjectInstance::new(object)
                .with_property("color", json!(style.label.color))
                .with_property("displayUnits", json!(style.label.display_units))
                .with_property("fontSize", json!(style.label.font_size_px))
                .with_property("strokeWidth", json!(style.label.precision)),
        ],
        SettingsObject::MeasureTitle => vec![
            VisualObjectInstance::new(object)
                .with_property("color", json!(style.title.color))
                .with_property("fontSize", json!(style.title.font_size_px)),
        ],
        SettingsObject::ColorSelector => data_points
            .iter()
            .map(|point| {
                let mut instance = VisualObjectInstance::new(object).with_property(
                    COLOR_SELECTOR_FILL_PROPERTY,
                    json!({ "solid": { "color": point.color } }),
                );
                instance.display_name = Some(point.category.clone());
                instance.selector = Some(point.selection_id.clone());
                instance
            })
            .collect(),
    }
}
