//! Capabilities the hosting platform lends to the chart.
//!
//! The chart never talks to the host's object model directly; everything it
//! needs (colour assignment, selection identities, context menus, tooltips,
//! text measurement and render-lifecycle reporting) goes through
//! [`VisualHost`]. [`HeadlessHost`] records every call and is what tests and
//! offscreen consumers use.

mod palette;

pub use palette::{ColorPalette, DEFAULT_THEME_COLORS, DefaultColorPalette};

use serde::{Deserialize, Serialize};

use crate::core::CategoryColumn;
use crate::error::ChartError;
use crate::text::{EstimatedTextMeasurer, TextMeasurer};

/// Opaque per-row identity used to correlate chart elements with host
/// selection services.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionId(String);

impl SelectionId {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.0
    }
}

/// Builds one [`SelectionId`] per category row.
pub trait SelectionIdBuilder {
    fn category_selection_id(&self, column: &CategoryColumn, row: usize) -> SelectionId;
}

/// Keys rows as `<column>#<row>:<value>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSelectionIdBuilder;

impl SelectionIdBuilder for DefaultSelectionIdBuilder {
    fn category_selection_id(&self, column: &CategoryColumn, row: usize) -> SelectionId {
        let column_name = column
            .source
            .as_ref()
            .map_or("", |source| source.display_name.as_str());
        let value = column.values.get(row).map_or("", String::as_str);
        SelectionId::new(format!("{column_name}#{row}:{value}"))
    }
}

/// Pointer position in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One line of tooltip content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipItem {
    pub display_name: String,
    pub color: String,
    pub value: String,
}

/// Everything the chart consumes from its host.
///
/// Interaction and lifecycle hooks default to no-ops so hosts only implement
/// what they support.
pub trait VisualHost {
    fn color_palette(&self) -> &dyn ColorPalette;

    fn selection_id_builder(&self) -> &dyn SelectionIdBuilder;

    fn text_measurer(&self) -> &dyn TextMeasurer;

    fn show_context_menu(&mut self, _selection_id: &SelectionId, _position: PointerPosition) {}

    fn show_tooltip(
        &mut self,
        _items: &[TooltipItem],
        _selection_id: &SelectionId,
        _position: PointerPosition,
    ) {
    }

    fn hide_tooltip(&mut self) {}

    fn rendering_started(&mut self) {}

    fn rendering_finished(&mut self) {}

    fn rendering_failed(&mut self, _error: &ChartError) {}
}

/// Lifecycle or interaction call observed by [`HeadlessHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    RenderingStarted,
    RenderingFinished,
    RenderingFailed(String),
    ContextMenu {
        selection_id: SelectionId,
        position: PointerPosition,
    },
    TooltipShown {
        items: Vec<TooltipItem>,
        selection_id: SelectionId,
    },
    TooltipHidden,
}

/// In-process host with default capabilities that records every callback.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    palette: DefaultColorPalette,
    selection_ids: DefaultSelectionIdBuilder,
    measurer: EstimatedTextMeasurer,
    events: Vec<HostEvent>,
}

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_palette(mut self, palette: DefaultColorPalette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }
}

impl VisualHost for HeadlessHost {
    fn color_palette(&self) -> &dyn ColorPalette {
        &self.palette
    }

    fn selection_id_builder(&self) -> &dyn SelectionIdBuilder {
        &self.selection_ids
    }

    fn text_measurer(&self) -> &dyn TextMeasurer {
        &self.measurer
    }

    fn show_context_menu(&mut self, selection_id: &SelectionId, position: PointerPosition) {
        self.events.push(HostEvent::ContextMenu {
            selection_id: selection_id.clone(),
            position,
        });
    }

    fn show_tooltip(
        &mut self,
        items: &[TooltipItem],
        selection_id: &SelectionId,
        _position: PointerPosition,
    ) {
        self.events.push(HostEvent::TooltipShown {
            items: items.to_vec(),
            selection_id: selection_id.clone(),
        });
    }

    fn hide_tooltip(&mut self) {
        self.events.push(HostEvent::TooltipHidden);
    }

    fn rendering_started(&mut self) {
        self.events.push(HostEvent::RenderingStarted);
    }

    fn rendering_finished(&mut self) {
        self.events.push(HostEvent::RenderingFinished);
    }

    fn rendering_failed(&mut self, error: &ChartError) {
        self.events.push(HostEvent::RenderingFailed(error.to_string()));
    }
}
