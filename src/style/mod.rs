//! User style settings: resolution from the host property bag and the
//! property-pane enumeration that reports them back.

mod enumeration;
mod settings;

pub use enumeration::{SettingsObject, VisualObjectInstance, enumerate_object_instances};
pub use settings::{
    ANIMATION_SETTINGS_OBJECT, AnimationSettings, LABEL_SETTINGS_OBJECT, LabelSettings,
    MAX_ANIMATION_DURATION_SECONDS, MAX_LABEL_FONT_SIZE_PX, MAX_LABEL_PRECISION,
    MEASURE_TITLE_OBJECT, MIN_ANIMATION_DURATION_SECONDS, MIN_FONT_SIZE_PX, StyleConfig,
    TitleSettings, resolve_animation_settings, resolve_label_settings, resolve_title_settings,
};
