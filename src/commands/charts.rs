//! Chart Commands
//!
//! Loading chart data and turning it into scratchpad charts.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::models::response::CommandResponse;
use crate::services::chart::{
    self, ChartKind, ChartRenderer, ChartSpec, ColumnData, DataTable,
};
use crate::state::SessionState;
use crate::utils::error::{AppError, AppResult};

/// Column overview of the loaded chart data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataSummary {
    pub rows: usize,
    /// `(name, kind)` with kind one of `numeric`, `temporal`, `categorical`
    pub columns: Vec<(String, String)>,
}

impl From<&DataTable> for ChartDataSummary {
    fn from(table: &DataTable) -> Self {
        Self {
            rows: table.row_count(),
            columns: table
                .columns()
                .iter()
                .map(|c| {
                    let kind = match c.data {
                        ColumnData::Numeric(_) => "numeric",
                        ColumnData::Temporal(_) => "temporal",
                        ColumnData::Categorical(_) => "categorical",
                    };
                    (c.name.clone(), kind.to_string())
                })
                .collect(),
        }
    }
}

fn loaded_data(session: &SessionState) -> AppResult<&DataTable> {
    session
        .chart_data
        .as_ref()
        .ok_or_else(|| AppError::validation("No chart data loaded"))
}

/// Parse CSV text and keep it as the session's chart data
pub fn load_chart_csv(session: &mut SessionState, csv_text: &str) -> CommandResponse<ChartDataSummary> {
    match DataTable::from_csv(csv_text.as_bytes()) {
        Ok(table) => {
            let summary = ChartDataSummary::from(&table);
            session.chart_data = Some(table);
            CommandResponse::ok(summary)
        }
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

/// Replace the session's chart data with freshly generated sample data
pub fn load_sample_chart_data(session: &mut SessionState) -> CommandResponse<ChartDataSummary> {
    let table = DataTable::sample(&mut rand::thread_rng());
    let summary = ChartDataSummary::from(&table);
    session.chart_data = Some(table);
    CommandResponse::ok(summary)
}

/// Column selection and aggregation for `kind`, without rendering
pub fn preview_chart(session: &SessionState, kind: ChartKind) -> CommandResponse<ChartSpec> {
    loaded_data(session)
        .and_then(|table| chart::prepare_chart(table, kind))
        .into()
}

/// Render a chart of the loaded data into the scratchpad; returns its name
pub fn create_chart(
    session: &mut SessionState,
    kind: ChartKind,
    renderer: &dyn ChartRenderer,
) -> CommandResponse<String> {
    let result = match session.chart_data.as_ref() {
        Some(table) => {
            chart::create_chart(&mut session.scratchpad, table, kind, renderer, Local::now())
        }
        None => Err(AppError::validation("No chart data loaded")),
    };
    result.into()
}
