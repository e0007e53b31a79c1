//! Chart Integration Tests
//!
//! Loading data, previewing chart specs and storing rendered charts.

use base64::Engine;
use rand::rngs::StdRng;
use rand::SeedableRng;

use scratchpad_chat::commands::{create_chart, list_scratchpad, load_chart_csv, preview_chart};
use scratchpad_chat::services::chart::{ChartData, ChartKind, ChartRenderer, ChartSpec, DataTable};
use scratchpad_chat::{AppError, AppResult, SessionState};
use scratchpad_chat_core::ItemContent;

const PNG: [u8; 4] = [0x89, b'P', b'N', b'G'];

struct FixedRenderer;

impl ChartRenderer for FixedRenderer {
    fn render_png(&self, _spec: &ChartSpec) -> AppResult<Vec<u8>> {
        Ok(PNG.to_vec())
    }
}

struct FailingRenderer;

impl ChartRenderer for FailingRenderer {
    fn render_png(&self, _spec: &ChartSpec) -> AppResult<Vec<u8>> {
        Err(AppError::chart("backend unavailable"))
    }
}

const SCORES: &str = "date,score,time,team\n\
2024-01-01,10,5,red\n\
2024-01-02,20,4,blue\n\
2024-01-03,30,,red\n";

#[test]
fn test_every_kind_previews_on_sample_data() {
    let mut session = SessionState::new();
    session.chart_data = Some(DataTable::sample(&mut StdRng::seed_from_u64(7)));

    for kind in ChartKind::ALL {
        let spec = preview_chart(&session, kind).data.unwrap();
        assert_eq!(spec.kind, kind);
    }
}

#[test]
fn test_csv_preview_shapes() {
    let mut session = SessionState::new();
    let summary = load_chart_csv(&mut session, SCORES).data.unwrap();
    assert_eq!(
        summary.columns,
        vec![
            ("date".to_string(), "temporal".to_string()),
            ("score".to_string(), "numeric".to_string()),
            ("time".to_string(), "numeric".to_string()),
            ("team".to_string(), "categorical".to_string()),
        ]
    );

    let line = preview_chart(&session, ChartKind::Line).data.unwrap();
    assert_eq!(line.x_label, "Date");
    match line.data {
        ChartData::Line { x, series } => {
            assert_eq!(x[0], "2024-01-01");
            assert_eq!(series.len(), 2);
            assert_eq!(series[1].values, vec![Some(5.0), Some(4.0), None]);
        }
        other => panic!("unexpected data: {:?}", other),
    }

    let bar = preview_chart(&session, ChartKind::Bar).data.unwrap();
    assert_eq!(
        bar.data,
        ChartData::Bar {
            categories: vec!["blue".to_string(), "red".to_string()],
            values: vec![20.0, 20.0],
        }
    );

    let pie = preview_chart(&session, ChartKind::Pie).data.unwrap();
    assert_eq!(pie.title, "Distribution of team");
    assert_eq!(
        pie.data,
        ChartData::Pie {
            slices: vec![("red".to_string(), 2), ("blue".to_string(), 1)],
        }
    );

    let scatter = preview_chart(&session, ChartKind::Scatter).data.unwrap();
    assert_eq!(scatter.title, "Scatter Plot: time vs score");
}

#[test]
fn test_numeric_only_data_cannot_make_pie() {
    let mut session = SessionState::new();
    load_chart_csv(&mut session, "a,b\n1,2\n3,4\n");
    let response = preview_chart(&session, ChartKind::Pie);
    assert_eq!(
        response.error.as_deref(),
        Some("Validation error: Pie Chart needs a categorical column")
    );
}

#[test]
fn test_created_chart_lands_in_scratchpad() {
    let mut session = SessionState::new();
    load_chart_csv(&mut session, SCORES);

    let name = create_chart(&mut session, ChartKind::Line, &FixedRenderer)
        .data
        .unwrap();
    let sections = list_scratchpad(&session).data.unwrap();
    assert_eq!(sections.charts.len(), 1);
    assert_eq!(sections.charts[0].name, name);

    match &sections.charts[0].content {
        ItemContent::Chart {
            chart_type,
            image_data,
            description,
        } => {
            assert_eq!(chart_type, "Line Chart");
            assert_eq!(
                base64::engine::general_purpose::STANDARD
                    .decode(image_data)
                    .unwrap(),
                PNG.to_vec()
            );
            assert!(description.starts_with("Line Chart created on "));
        }
        other => panic!("unexpected content: {:?}", other),
    }
}

#[test]
fn test_render_failure_stores_nothing() {
    let mut session = SessionState::new();
    load_chart_csv(&mut session, SCORES);

    let response = create_chart(&mut session, ChartKind::Heatmap, &FailingRenderer);
    assert!(response.error.unwrap().contains("backend unavailable"));
    assert!(session.scratchpad.is_empty());
}
