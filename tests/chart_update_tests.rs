use std::time::Duration;

use rotating_chart::animation::{RotationPhase, TimerKind};
use rotating_chart::api::{
    MissingField, RotatingChart, RotatingChartConfig, UpdateStatus, VisualUpdateOptions,
};
use rotating_chart::core::{
    CategoryColumn, ColumnSource, DataView, DataViewObjects, MeasureColumn, Viewport,
};
use rotating_chart::host::{HeadlessHost, HostEvent, PointerPosition, TooltipItem};
use rotating_chart::render::{NullRenderer, RenderFrame, Renderer};
use rotating_chart::{ChartError, ChartResult};
use serde_json::json;

type TestChart = RotatingChart<NullRenderer, HeadlessHost>;

fn chart() -> TestChart {
    RotatingChart::new(
        NullRenderer::default(),
        HeadlessHost::new(),
        RotatingChartConfig::default(),
    )
    .expect("chart init")
}

fn sales_and_profit() -> DataView {
    DataView::new(
        CategoryColumn::new(
            ColumnSource::new("Region"),
            vec!["North".to_owned(), "South".to_owned(), "East".to_owned()],
        ),
        vec![
            MeasureColumn::new(ColumnSource::new("Sales"), vec![120.0, 80.0, 45.0]),
            MeasureColumn::new(ColumnSource::new("Profit"), vec![12.0, -4.0, 9.0]),
        ],
    )
}

fn options(data_view: DataView) -> VisualUpdateOptions {
    VisualUpdateOptions::new(Viewport::new(400, 300), data_view)
}

fn animated(duration: f64) -> DataViewObjects {
    DataViewObjects::new()
        .with_property("animationSettings", "show", true)
        .with_property("animationSettings", "duration", duration)
}

fn bar_center(chart: &TestChart, index: usize) -> PointerPosition {
    let bar = chart.frame().expect("frame").bars[index];
    PointerPosition::new(bar.x + bar.width / 2.0, bar.y + bar.height / 2.0)
}

#[test]
fn update_renders_full_chart_and_reports_lifecycle() {
    let mut chart = chart();
    let status = chart.update(options(sales_and_profit())).expect("update");

    assert_eq!(status, UpdateStatus::Rendered);
    assert_eq!(chart.host().events(), [
        HostEvent::RenderingStarted,
        HostEvent::RenderingFinished
    ]);
    assert_eq!(chart.renderer().frames_rendered, 1);

    let frame = chart.renderer().last_frame.as_ref().expect("rendered frame");
    assert_eq!(frame.bars.len(), 3);
    assert_eq!(frame.axis_labels.len(), 3);
    assert_eq!(frame.value_labels.len(), 3);
    assert_eq!(frame.title.as_ref().map(|title| title.text.as_str()), Some("Sales"));
    assert_eq!(frame.rotate_x_degrees, 0.0);
    assert_eq!(frame.bar_opacity, 1.0);
    assert!(frame.message.is_none());

    assert_eq!(chart.view_model().measure_name, "Sales");
    assert_eq!(chart.rotation().measure_count(), 2);
    assert_eq!(chart.rotation().phase(), RotationPhase::Idle);
}

#[test]
fn missing_category_shows_placeholder_message() {
    let mut chart = chart();
    let status = chart.update(options(DataView::default())).expect("update");

    assert_eq!(status, UpdateStatus::MissingData(MissingField::CategoryData));
    let frame = chart.frame().expect("frame");
    let message = frame.message.as_ref().expect("message");
    assert_eq!(message.text, "Please insert data in Category Data field");
    assert_eq!(message.hover_text.as_deref(), Some(message.text.as_str()));
    assert_eq!(message.x, 100.0);
    assert_eq!(message.y, 150.0);
    assert!(frame.bars.is_empty());
    assert_eq!(chart.host().events().last(), Some(&HostEvent::RenderingFinished));
    assert!(!chart.timers().is_armed(TimerKind::Advance));
}

#[test]
fn missing_measures_show_measure_message_and_never_rotate() {
    let mut chart = chart();
    let data_view = DataView {
        values: None,
        objects: Some(animated(2.0)),
        ..sales_and_profit()
    };
    let status = chart.update(options(data_view)).expect("update");

    assert_eq!(status, UpdateStatus::MissingData(MissingField::MeasureData));
    let message = chart.frame().and_then(|frame| frame.message.as_ref()).expect("message");
    assert_eq!(message.text, "Please insert data in Measure Data field");

    chart.click().expect("click");
    chart.advance_time(Duration::from_secs(10)).expect("advance");
    assert_eq!(chart.renderer().frames_rendered, 1);
}

#[test]
fn auto_rotation_flips_to_next_measure() {
    let mut chart = chart();
    let data_view = sales_and_profit().with_objects(animated(2.0));
    chart.update(options(data_view)).expect("update");
    assert_eq!(chart.rotation().phase(), RotationPhase::Waiting);

    chart.advance_time(Duration::from_secs(2)).expect("advance");
    assert_eq!(chart.rotation().phase(), RotationPhase::Flipping);
    assert_eq!(chart.frame().expect("frame").rotate_x_degrees, -1.0);

    chart.advance_time(Duration::from_millis(450)).expect("advance");
    assert_eq!(chart.view_model().measure_name, "Profit");
    assert_eq!(chart.view_model().measure_index, 1);
    let frame = chart.frame().expect("frame");
    assert_eq!(frame.rotate_x_degrees, 90.0);
    assert_eq!(frame.title.as_ref().map(|title| title.text.as_str()), Some("Profit"));

    chart.advance_time(Duration::from_millis(455)).expect("advance");
    assert_eq!(chart.frame().expect("frame").rotate_x_degrees, 0.0);
    assert_eq!(chart.rotation().phase(), RotationPhase::Waiting);
    assert_eq!(chart.renderer().frames_rendered, 182);
}

#[test]
fn update_mid_flip_cancels_animation() {
    let mut chart = chart();
    chart.update(options(sales_and_profit())).expect("update");
    chart.click().expect("click");
    chart.advance_time(Duration::from_millis(100)).expect("advance");
    assert_eq!(chart.rotation().phase(), RotationPhase::Flipping);

    chart.update(options(sales_and_profit())).expect("second update");
    assert_eq!(chart.rotation().phase(), RotationPhase::Idle);
    assert_eq!(chart.rotation().angle(), 0);
    assert!(!chart.timers().is_armed(TimerKind::Frame));
    assert_eq!(chart.frame().expect("frame").rotate_x_degrees, 0.0);

    let rendered = chart.renderer().frames_rendered;
    chart.advance_time(Duration::from_secs(5)).expect("advance");
    assert_eq!(chart.renderer().frames_rendered, rendered);
}

#[test]
fn measure_index_survives_updates() {
    let mut chart = chart();
    chart.update(options(sales_and_profit())).expect("update");
    chart.click().expect("click");
    chart.advance_time(Duration::from_secs(1)).expect("advance");
    assert_eq!(chart.view_model().measure_index, 1);

    chart.update(options(sales_and_profit())).expect("second update");
    assert_eq!(chart.view_model().measure_name, "Profit");
}

#[test]
fn click_with_single_measure_is_a_no_op() {
    let mut chart = chart();
    let mut data_view = sales_and_profit();
    if let Some(values) = data_view.values.as_mut() {
        values.truncate(1);
    }
    chart.update(options(data_view.with_objects(animated(2.0)))).expect("update");

    chart.click().expect("click");
    chart.advance_time(Duration::from_secs(30)).expect("advance");
    assert_eq!(chart.renderer().frames_rendered, 1);
    assert_eq!(chart.rotation().phase(), RotationPhase::Idle);
}

#[test]
fn pointer_over_bar_shows_tooltip_and_leaving_hides_it() {
    let mut chart = chart();
    chart.update(options(sales_and_profit())).expect("update");
    chart.host_mut().take_events();

    let position = bar_center(&chart, 0);
    assert_eq!(chart.pointer_move(position), Some(0));
    assert_eq!(chart.pointer_move(PointerPosition::new(2.0, 2.0)), None);
    assert_eq!(chart.pointer_move(PointerPosition::new(3.0, 3.0)), None);

    let expected_items = vec![TooltipItem {
        display_name: "North".to_owned(),
        color: "#01B8AA".to_owned(),
        value: "120".to_owned(),
    }];
    let selection_id = chart.view_model().data_points[0].selection_id.clone();
    assert_eq!(chart.host().events(), [
        HostEvent::TooltipShown {
            items: expected_items,
            selection_id,
        },
        HostEvent::TooltipHidden,
    ]);
}

#[test]
fn context_menu_targets_bar_under_pointer() {
    let mut chart = chart();
    chart.update(options(sales_and_profit())).expect("update");
    chart.host_mut().take_events();

    let position = bar_center(&chart, 1);
    assert!(chart.context_menu(position));
    assert!(!chart.context_menu(PointerPosition::new(2.0, 2.0)));

    let events = chart.host().events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        HostEvent::ContextMenu {
            selection_id,
            position: shown_at,
        } => {
            assert_eq!(selection_id.key(), "Region#1:South");
            assert_eq!(*shown_at, position);
        }
        other => panic!("unexpected host event {other:?}"),
    }
}

#[test]
fn enumeration_reports_resolved_settings() {
    let mut chart = chart();
    let data_view = sales_and_profit().with_objects(animated(7.4));
    chart.update(options(data_view)).expect("update");

    let animation = chart.enumerate_object_instances("animationSettings");
    assert_eq!(animation.len(), 1);
    assert_eq!(animation[0].display_name.as_deref(), Some("Delay (seconds)"));
    assert_eq!(animation[0].properties["show"], serde_json::json!(true));
    assert_eq!(animation[0].properties["duration"], serde_json::json!(7.0));

    let colors = chart.enumerate_object_instances("colorSelector");
    let names: Vec<_> = colors
        .iter()
        .filter_map(|instance| instance.display_name.as_deref())
        .collect();
    assert_eq!(names, ["North", "South", "East"]);
    assert!(colors.iter().all(|instance| instance.selector.is_some()));

    assert_eq!(chart.enumerate_object_instances("labelSettings")[0].properties.len(), 4);
    assert!(chart.enumerate_object_instances("legend").is_empty());
}

#[test]
fn mismatched_columns_report_render_failure() {
    let mut chart = chart();
    let mut data_view = sales_and_profit().with_objects(animated(2.0));
    if let Some(values) = data_view.values.as_mut() {
        values[0].values.pop();
    }

    let error = chart.update(options(data_view)).expect_err("mismatch");
    assert!(matches!(error, ChartError::ColumnLengthMismatch { .. }));
    let events = chart.host().events();
    assert_eq!(events.first(), Some(&HostEvent::RenderingStarted));
    assert!(matches!(events.last(), Some(HostEvent::RenderingFailed(_))));
    assert!(!events.contains(&HostEvent::RenderingFinished));
    assert!(!chart.timers().is_armed(TimerKind::Advance));
    assert_eq!(chart.renderer().frames_rendered, 0);
}

#[test]
fn zero_viewport_is_rejected() {
    let mut chart = chart();
    let result = chart.update(VisualUpdateOptions::new(Viewport::new(0, 300), sales_and_profit()));
    assert!(matches!(
        result,
        Err(ChartError::InvalidViewport {
            width: 0,
            height: 300
        })
    ));
    assert!(matches!(
        chart.host().events().last(),
        Some(HostEvent::RenderingFailed(_))
    ));
}

#[test]
fn crowded_chart_grows_taller_than_viewport() {
    let mut chart = chart();
    let categories: Vec<String> = (0..40).map(|index| format!("Row {index}")).collect();
    let data_view = DataView::new(
        CategoryColumn::new(ColumnSource::new("Row"), categories),
        vec![MeasureColumn::new(ColumnSource::new("Value"), (1..=40).map(f64::from).collect())],
    );
    chart.update(options(data_view)).expect("update");

    let frame = chart.frame().expect("frame");
    assert_eq!(frame.surface_width, 380.0);
    assert!(frame.surface_height > 300.0);
    assert!(chart.layout().expect("layout").overflowed);
}

#[test]
fn invalid_config_is_rejected() {
    let config = RotatingChartConfig {
        label_width_divisor: 0.0,
        ..RotatingChartConfig::default()
    };
    let result = RotatingChart::new(NullRenderer::default(), HeadlessHost::new(), config);
    assert!(result.is_err());
}

#[test]
fn config_deserializes_with_defaults() {
    let config: RotatingChartConfig =
        serde_json::from_str(r#"{ "flip_frame_interval_ms": 10 }"#).expect("config");
    assert_eq!(config.flip_frame_interval(), Duration::from_millis(10));
    assert_eq!(config.layout.min_band_thickness_px, 20.0);
    assert_eq!(config.label_width_divisor, 9.0);
    config.validate().expect("valid config");
}

#[test]
fn style_colours_outside_the_parser_fall_back_to_defaults() {
    for (literal, expected) in [
        ("red", "red"),
        ("#112233ff", "#112233ff"),
        ("rgba(1, 2, 3, 0.5)", "rgba(1, 2, 3, 0.5)"),
        ("not-a-colour", "#000"),
    ] {
        let mut chart = chart();
        let objects = DataViewObjects::new()
            .with_property("labelSettings", "color", json!({ "solid": { "color": literal } }))
            .with_property("measureTitle", "color", json!({ "solid": { "color": "bogus" } }));
        let status = chart
            .update(options(sales_and_profit().with_objects(objects)))
            .expect("style colours never fail an update");

        assert_eq!(status, UpdateStatus::Rendered);
        assert_eq!(chart.style().label.color, expected);
        assert_eq!(chart.style().title.color, "#666666");
    }
}

#[test]
fn failed_flip_returns_to_last_rendered_measure() {
    let mut chart = chart();
    let mut data_view = sales_and_profit();
    if let Some(values) = data_view.values.as_mut() {
        values[1].values.pop();
    }
    chart.update(options(data_view.clone())).expect("first measure renders");

    chart.click().expect("click");
    let error = chart
        .advance_time(Duration::from_secs(1))
        .expect_err("second measure is malformed");
    assert!(matches!(error, ChartError::ColumnLengthMismatch { .. }));
    assert_eq!(chart.rotation().measure_index(), 0);
    assert_eq!(chart.rotation().phase(), RotationPhase::Idle);

    for _ in 0..3 {
        let status = chart.update(options(data_view.clone())).expect("re-update");
        assert_eq!(status, UpdateStatus::Rendered);
        assert_eq!(chart.view_model().measure_name, "Sales");
    }
}

#[test]
fn blank_cells_render_as_empty_bars() {
    let data_view: DataView = serde_json::from_value(json!({
        "category": {
            "source": { "displayName": "Region" },
            "values": ["North", "South", "East"]
        },
        "values": [
            { "source": { "displayName": "Sales" }, "values": [120.0, 80.0, 45.0] },
            { "source": { "displayName": "Profit" }, "values": [12.0, null, 9.0] }
        ]
    }))
    .expect("host payload");

    let mut chart = chart();
    chart.update(options(data_view)).expect("update");
    chart.click().expect("click");
    chart.advance_time(Duration::from_secs(1)).expect("flip over blank cell");

    assert_eq!(chart.view_model().measure_name, "Profit");
    assert_eq!(chart.view_model().data_points[1].value, None);
    assert_eq!(chart.view_model().data_max, 12.0);
    let frame = chart.frame().expect("frame");
    assert_eq!(frame.bars.len(), 3);
    assert_eq!(frame.bars[1].width, 0.0);
    assert_eq!(frame.value_labels.len(), 2);
    let items = chart.tooltip_items(1).expect("tooltip items");
    assert_eq!(items[0].value, "");
}

#[test]
fn tooltip_prints_huge_values_in_exponent_form() {
    let data_view = DataView::new(
        CategoryColumn::new(ColumnSource::new("Region"), vec!["North".to_owned()]),
        vec![MeasureColumn::new(ColumnSource::new("Sales"), vec![1e21])],
    );
    let mut chart = chart();
    chart.update(options(data_view)).expect("update");
    let items = chart.tooltip_items(0).expect("tooltip items");
    assert_eq!(items[0].value, "1e+21");
}

struct DisconnectedRenderer;

impl Renderer for DisconnectedRenderer {
    fn render(&mut self, _frame: &RenderFrame) -> ChartResult<()> {
        Err(ChartError::Render("surface disconnected".to_owned()))
    }
}

#[test]
fn backend_failure_is_reported_to_host() {
    let mut chart = RotatingChart::new(
        DisconnectedRenderer,
        HeadlessHost::new(),
        RotatingChartConfig::default(),
    )
    .expect("chart init");
    let data_view = sales_and_profit().with_objects(animated(2.0));

    let error = chart.update(options(data_view)).expect_err("backend failure");
    assert!(matches!(error, ChartError::Render(_)));
    assert!(matches!(
        chart.host().events().last(),
        Some(HostEvent::RenderingFailed(_))
    ));
    assert!(!chart.timers().is_armed(TimerKind::Advance));
}
