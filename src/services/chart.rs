//! Chart Service
//!
//! Turns tabular data into a chart description, hands it to a renderer for
//! rasterization, and files the resulting PNG into the scratchpad.
//!
//! ## Column selection
//!
//! Selection is automatic and follows the column kinds inferred at import:
//!
//! | Kind    | Uses                                                           |
//! |---------|----------------------------------------------------------------|
//! | Line    | every numeric column except `date`; x is `date` or row index    |
//! | Bar     | mean of first numeric grouped by first categorical, else index |
//! | Scatter | first two numeric columns, split by first categorical          |
//! | Pie     | value counts of the first categorical column                   |
//! | Heatmap | Pearson correlation of all numeric columns                     |

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use base64::Engine;
use chrono::{DateTime, Duration, Local, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use scratchpad_chat_core::{compact_timestamp, ItemContent, ScratchpadStore, DISPLAY_TIMESTAMP_FORMAT};

use crate::utils::error::{AppError, AppResult};

/// Name of the column used as the line chart's x axis when present.
pub const DATE_COLUMN: &str = "date";

const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// DataTable
// ============================================================================

/// Cell values of one column. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Temporal(Vec<Option<NaiveDate>>),
    Categorical(Vec<Option<String>>),
}

/// A named column of a [`DataTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    pub fn temporal(name: impl Into<String>, values: Vec<Option<NaiveDate>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Temporal(values),
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Temporal(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(v) => Some(v),
            _ => None,
        }
    }

    /// Cell values as display strings; missing cells become empty strings.
    pub fn labels(&self) -> Vec<String> {
        match &self.data {
            ColumnData::Numeric(v) => v
                .iter()
                .map(|x| x.map(|n| n.to_string()).unwrap_or_default())
                .collect(),
            ColumnData::Temporal(v) => v
                .iter()
                .map(|d| d.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default())
                .collect(),
            ColumnData::Categorical(v) => v.iter().map(|s| s.clone().unwrap_or_default()).collect(),
        }
    }
}

/// Column-oriented table used as chart input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<Column>,
    rows: usize,
}

impl DataTable {
    /// Build a table; every column must have the same length.
    pub fn new(columns: Vec<Column>) -> AppResult<Self> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(AppError::validation(format!(
                "Column '{}' has {} rows, expected {}",
                bad.name,
                bad.len(),
                rows
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Parse CSV with a header row.
    ///
    /// A column is numeric when every non-empty cell parses as a number,
    /// temporal when every non-empty cell is a `YYYY-mm-dd` date, and
    /// categorical otherwise. An all-empty column is numeric.
    pub fn from_csv<R: Read>(reader: R) -> AppResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(AppError::validation("CSV has no columns"));
        }

        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for record in csv_reader.records() {
            let record = record?;
            for (i, cells) in raw.iter_mut().enumerate() {
                let cell = record.get(i).unwrap_or("");
                cells.push(if cell.is_empty() {
                    None
                } else {
                    Some(cell.to_string())
                });
            }
        }

        let columns = headers
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| infer_column(name, cells))
            .collect();
        let table = Self::new(columns)?;
        debug!(columns = table.columns.len(), rows = table.rows, "Parsed chart data");
        Ok(table)
    }

    /// Thirty daily rows from 2023-01-01 with `value1` in [10, 100),
    /// `value2` in [20, 80) and `category` drawn from A, B, C.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        const ROWS: usize = 30;
        const CATEGORIES: [&str; 3] = ["A", "B", "C"];

        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
        let dates = (0..ROWS)
            .map(|i| Some(start + Duration::days(i as i64)))
            .collect();
        let value1 = (0..ROWS)
            .map(|_| Some(f64::from(rng.gen_range(10u32..100))))
            .collect();
        let value2 = (0..ROWS)
            .map(|_| Some(f64::from(rng.gen_range(20u32..80))))
            .collect();
        let category = (0..ROWS)
            .map(|_| CATEGORIES.choose(rng).map(|c| c.to_string()))
            .collect();

        Self {
            columns: vec![
                Column::temporal(DATE_COLUMN, dates),
                Column::numeric("value1", value1),
                Column::numeric("value2", value2),
                Column::categorical("category", category),
            ],
            rows: ROWS,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| matches!(c.data, ColumnData::Numeric(_)))
            .collect()
    }

    pub fn categorical_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| matches!(c.data, ColumnData::Categorical(_)))
            .collect()
    }
}

fn infer_column(name: String, cells: Vec<Option<String>>) -> Column {
    let present = || cells.iter().flatten();

    if present().all(|c| c.parse::<f64>().is_ok()) {
        let values = cells
            .iter()
            .map(|c| c.as_deref().and_then(|s| s.parse::<f64>().ok()))
            .collect();
        return Column::numeric(name, values);
    }

    if present().all(|c| NaiveDate::parse_from_str(c, DATE_FORMAT).is_ok()) {
        let values = cells
            .iter()
            .map(|c| {
                c.as_deref()
                    .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
            })
            .collect();
        return Column::temporal(name, values);
    }

    Column::categorical(name, cells)
}

// ============================================================================
// Chart kinds and specs
// ============================================================================

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Pie,
    Heatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Pie,
        ChartKind::Heatmap,
    ];

    /// Human-readable label, also stored as the chart item's type.
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Heatmap => "Heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" | "line chart" => Ok(ChartKind::Line),
            "bar" | "bar chart" => Ok(ChartKind::Bar),
            "scatter" | "scatter plot" => Ok(ChartKind::Scatter),
            "pie" | "pie chart" => Ok(ChartKind::Pie),
            "heatmap" => Ok(ChartKind::Heatmap),
            _ => Err(AppError::validation(format!("Unknown chart type: {}", s))),
        }
    }
}

/// One line of a line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Points of one scatter group; `label` is `None` when ungrouped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterGroup {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
}

/// Kind-specific chart data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartData {
    Line {
        x: Vec<String>,
        series: Vec<Series>,
    },
    Bar {
        categories: Vec<String>,
        values: Vec<f64>,
    },
    Scatter {
        groups: Vec<ScatterGroup>,
    },
    Pie {
        slices: Vec<(String, usize)>,
    },
    Heatmap {
        columns: Vec<String>,
        /// Row-major correlation matrix; `None` where undefined
        matrix: Vec<Vec<Option<f64>>>,
    },
}

/// Everything a renderer needs to draw a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

/// Rasterizes a [`ChartSpec`] into PNG bytes.
pub trait ChartRenderer: Send + Sync {
    fn render_png(&self, spec: &ChartSpec) -> AppResult<Vec<u8>>;
}

// ============================================================================
// Preparation
// ============================================================================

/// Select columns and aggregate values for `kind`.
pub fn prepare_chart(table: &DataTable, kind: ChartKind) -> AppResult<ChartSpec> {
    match kind {
        ChartKind::Line => prepare_line(table),
        ChartKind::Bar => prepare_bar(table),
        ChartKind::Scatter => prepare_scatter(table),
        ChartKind::Pie => prepare_pie(table),
        ChartKind::Heatmap => prepare_heatmap(table),
    }
}

fn missing(kind: ChartKind, what: &str) -> AppError {
    AppError::validation(format!("{} needs {}", kind.label(), what))
}

fn prepare_line(table: &DataTable) -> AppResult<ChartSpec> {
    let series: Vec<Series> = table
        .numeric_columns()
        .into_iter()
        .filter(|c| c.name != DATE_COLUMN)
        .filter_map(|c| {
            c.as_numeric().map(|v| Series {
                name: c.name.clone(),
                values: v.to_vec(),
            })
        })
        .collect();
    if series.is_empty() {
        return Err(missing(ChartKind::Line, "at least one numeric column"));
    }

    let (x, x_label) = match table.column(DATE_COLUMN) {
        Some(date) => (date.labels(), "Date"),
        None => ((0..table.row_count()).map(|i| i.to_string()).collect(), "Index"),
    };

    Ok(ChartSpec {
        kind: ChartKind::Line,
        title: ChartKind::Line.label().to_string(),
        x_label: x_label.to_string(),
        y_label: "Value".to_string(),
        data: ChartData::Line { x, series },
    })
}

fn prepare_bar(table: &DataTable) -> AppResult<ChartSpec> {
    let numeric = table.numeric_columns();
    let value_col = *numeric
        .first()
        .ok_or_else(|| missing(ChartKind::Bar, "a numeric column"))?;
    let values = value_col.as_numeric().unwrap_or_default();

    if let Some(category_col) = table.categorical_columns().first() {
        let keys = category_col.as_categorical().unwrap_or_default();
        let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for (key, value) in keys.iter().zip(values) {
            if let (Some(key), Some(value)) = (key, value) {
                let entry = groups.entry(key.as_str()).or_insert((0.0, 0));
                entry.0 += value;
                entry.1 += 1;
            }
        }

        let (categories, means): (Vec<String>, Vec<f64>) = groups
            .into_iter()
            .map(|(key, (sum, count))| (key.to_string(), sum / count as f64))
            .unzip();

        return Ok(ChartSpec {
            kind: ChartKind::Bar,
            title: format!("Average {} by {}", value_col.name, category_col.name),
            x_label: category_col.name.clone(),
            y_label: format!("Average {}", value_col.name),
            data: ChartData::Bar {
                categories,
                values: means,
            },
        });
    }

    Ok(ChartSpec {
        kind: ChartKind::Bar,
        title: format!("Bar Chart of {}", value_col.name),
        x_label: "Index".to_string(),
        y_label: value_col.name.clone(),
        data: ChartData::Bar {
            categories: (0..values.len()).map(|i| i.to_string()).collect(),
            values: values.iter().map(|v| v.unwrap_or(0.0)).collect(),
        },
    })
}

fn prepare_scatter(table: &DataTable) -> AppResult<ChartSpec> {
    let numeric = table.numeric_columns();
    let [x_col, y_col] = match numeric.as_slice() {
        [x, y, ..] => [*x, *y],
        _ => return Err(missing(ChartKind::Scatter, "two numeric columns")),
    };
    let xs = x_col.as_numeric().unwrap_or_default();
    let ys = y_col.as_numeric().unwrap_or_default();

    let groups = match table.categorical_columns().first() {
        Some(category_col) => {
            let keys = category_col.as_categorical().unwrap_or_default();
            let mut groups: Vec<ScatterGroup> = Vec::new();
            for ((key, x), y) in keys.iter().zip(xs).zip(ys) {
                let (Some(key), Some(x), Some(y)) = (key, x, y) else {
                    continue;
                };
                match groups.iter_mut().find(|g| g.label.as_deref() == Some(key.as_str())) {
                    Some(group) => group.points.push((*x, *y)),
                    None => groups.push(ScatterGroup {
                        label: Some(key.clone()),
                        points: vec![(*x, *y)],
                    }),
                }
            }
            groups
        }
        None => vec![ScatterGroup {
            label: None,
            points: xs
                .iter()
                .zip(ys)
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .collect(),
        }],
    };

    Ok(ChartSpec {
        kind: ChartKind::Scatter,
        title: format!("Scatter Plot: {} vs {}", y_col.name, x_col.name),
        x_label: x_col.name.clone(),
        y_label: y_col.name.clone(),
        data: ChartData::Scatter { groups },
    })
}

fn prepare_pie(table: &DataTable) -> AppResult<ChartSpec> {
    let categorical = table.categorical_columns();
    let category_col = *categorical
        .first()
        .ok_or_else(|| missing(ChartKind::Pie, "a categorical column"))?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for key in category_col.as_categorical().unwrap_or_default().iter().flatten() {
        *counts.entry(key.as_str()).or_insert(0) += 1;
    }
    let mut slices: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect();
    // Largest first; ties keep label order
    slices.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(ChartSpec {
        kind: ChartKind::Pie,
        title: format!("Distribution of {}", category_col.name),
        x_label: String::new(),
        y_label: String::new(),
        data: ChartData::Pie { slices },
    })
}

fn prepare_heatmap(table: &DataTable) -> AppResult<ChartSpec> {
    let numeric = table.numeric_columns();
    if numeric.is_empty() {
        return Err(missing(ChartKind::Heatmap, "at least one numeric column"));
    }

    let values: Vec<&[Option<f64>]> = numeric
        .iter()
        .map(|c| c.as_numeric().unwrap_or_default())
        .collect();
    let matrix: Vec<Vec<Option<f64>>> = values
        .iter()
        .map(|a| values.iter().map(|b| pearson(a, b)).collect())
        .collect();

    Ok(ChartSpec {
        kind: ChartKind::Heatmap,
        title: "Correlation Heatmap".to_string(),
        x_label: String::new(),
        y_label: String::new(),
        data: ChartData::Heatmap {
            columns: numeric.iter().map(|c| c.name.clone()).collect(),
            matrix,
        },
    })
}

/// Pearson correlation over rows where both values are present.
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

// ============================================================================
// Creation
// ============================================================================

/// Prepare, render and store a chart; returns the accepted scratchpad name.
pub fn create_chart(
    store: &mut ScratchpadStore,
    table: &DataTable,
    kind: ChartKind,
    renderer: &dyn ChartRenderer,
    now: DateTime<Local>,
) -> AppResult<String> {
    let spec = prepare_chart(table, kind)?;
    let png = renderer.render_png(&spec)?;
    if png.is_empty() {
        return Err(AppError::chart(format!("{} rendered no image data", kind.label())));
    }

    let content = ItemContent::chart(
        kind.label(),
        base64::engine::general_purpose::STANDARD.encode(&png),
        format!(
            "{} created on {}",
            kind.label(),
            now.format(DISPLAY_TIMESTAMP_FORMAT)
        ),
    );
    let name = store
        .insert_at(&format!("chart_{}", compact_timestamp(&now)), content, now)
        .ok_or_else(|| AppError::internal("chart content was empty"))?;

    info!(name = %name, kind = %kind, "Chart created");
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FixedRenderer(Vec<u8>);

    impl ChartRenderer for FixedRenderer {
        fn render_png(&self, _spec: &ChartSpec) -> AppResult<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn small_table() -> DataTable {
        DataTable::from_csv(
            "date,value1,value2,category\n\
             2023-01-01,10,20,B\n\
             2023-01-02,20,40,A\n\
             2023-01-03,30,60,B\n\
             2023-01-04,40,80,C\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_from_csv_infers_column_kinds() {
        let table = small_table();
        assert_eq!(table.row_count(), 4);
        assert!(matches!(table.column("date").unwrap().data, ColumnData::Temporal(_)));
        assert_eq!(table.numeric_columns().len(), 2);
        assert_eq!(table.categorical_columns()[0].name, "category");
    }

    #[test]
    fn test_from_csv_missing_cells() {
        let table = DataTable::from_csv("a,b\n1,x\n,y\n3,\n".as_bytes()).unwrap();
        assert_eq!(
            table.column("a").unwrap().as_numeric().unwrap(),
            &[Some(1.0), None, Some(3.0)]
        );
        assert_eq!(
            table.column("b").unwrap().as_categorical().unwrap(),
            &[Some("x".to_string()), Some("y".to_string()), None]
        );
    }

    #[test]
    fn test_from_csv_ragged_rows_fail() {
        let err = DataTable::from_csv("a,b\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::Csv(_)));
    }

    #[test]
    fn test_sample_data_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = DataTable::sample(&mut rng);
        assert_eq!(table.row_count(), 30);
        assert_eq!(table.column("date").unwrap().labels()[0], "2023-01-01");
        assert_eq!(table.column("date").unwrap().labels()[29], "2023-01-30");

        let value1 = table.column("value1").unwrap().as_numeric().unwrap();
        assert!(value1.iter().flatten().all(|v| (10.0..100.0).contains(v)));
        let value2 = table.column("value2").unwrap().as_numeric().unwrap();
        assert!(value2.iter().flatten().all(|v| (20.0..80.0).contains(v)));
        let category = table.column("category").unwrap().as_categorical().unwrap();
        assert!(category
            .iter()
            .flatten()
            .all(|c| ["A", "B", "C"].contains(&c.as_str())));
    }

    #[test]
    fn test_line_uses_date_axis_and_numeric_series() {
        let spec = prepare_chart(&small_table(), ChartKind::Line).unwrap();
        assert_eq!(spec.x_label, "Date");
        let ChartData::Line { x, series } = spec.data else {
            panic!("expected line data");
        };
        assert_eq!(x[0], "2023-01-01");
        let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["value1", "value2"]);
    }

    #[test]
    fn test_line_without_date_uses_index() {
        let table = DataTable::from_csv("v\n5\n6\n".as_bytes()).unwrap();
        let spec = prepare_chart(&table, ChartKind::Line).unwrap();
        assert_eq!(spec.x_label, "Index");
        let ChartData::Line { x, .. } = spec.data else {
            panic!("expected line data");
        };
        assert_eq!(x, vec!["0", "1"]);
    }

    #[test]
    fn test_bar_groups_mean_by_first_categorical() {
        let spec = prepare_chart(&small_table(), ChartKind::Bar).unwrap();
        assert_eq!(spec.title, "Average value1 by category");
        assert_eq!(
            spec.data,
            ChartData::Bar {
                categories: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                values: vec![20.0, 20.0, 40.0],
            }
        );
    }

    #[test]
    fn test_bar_without_categorical_uses_index() {
        let table = DataTable::from_csv("v\n5\n6\n".as_bytes()).unwrap();
        let spec = prepare_chart(&table, ChartKind::Bar).unwrap();
        assert_eq!(spec.title, "Bar Chart of v");
        assert_eq!(
            spec.data,
            ChartData::Bar {
                categories: vec!["0".to_string(), "1".to_string()],
                values: vec![5.0, 6.0],
            }
        );
    }

    #[test]
    fn test_scatter_groups_in_order_of_appearance() {
        let spec = prepare_chart(&small_table(), ChartKind::Scatter).unwrap();
        assert_eq!(spec.title, "Scatter Plot: value2 vs value1");
        let ChartData::Scatter { groups } = spec.data else {
            panic!("expected scatter data");
        };
        let labels: Vec<Option<&str>> = groups.iter().map(|g| g.label.as_deref()).collect();
        assert_eq!(labels, vec![Some("B"), Some("A"), Some("C")]);
        assert_eq!(groups[0].points, vec![(10.0, 20.0), (30.0, 60.0)]);
    }

    #[test]
    fn test_scatter_needs_two_numeric_columns() {
        let table = DataTable::from_csv("v,c\n1,a\n".as_bytes()).unwrap();
        let err = prepare_chart(&table, ChartKind::Scatter).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_pie_counts_values() {
        let spec = prepare_chart(&small_table(), ChartKind::Pie).unwrap();
        assert_eq!(spec.title, "Distribution of category");
        assert_eq!(
            spec.data,
            ChartData::Pie {
                slices: vec![
                    ("B".to_string(), 2),
                    ("A".to_string(), 1),
                    ("C".to_string(), 1)
                ],
            }
        );
    }

    #[test]
    fn test_pie_needs_categorical_column() {
        let table = DataTable::from_csv("v\n1\n".as_bytes()).unwrap();
        assert!(prepare_chart(&table, ChartKind::Pie).is_err());
    }

    #[test]
    fn test_heatmap_correlation() {
        let spec = prepare_chart(&small_table(), ChartKind::Heatmap).unwrap();
        let ChartData::Heatmap { columns, matrix } = spec.data else {
            panic!("expected heatmap data");
        };
        assert_eq!(columns, vec!["value1", "value2"]);
        for row in &matrix {
            for cell in row {
                assert!((cell.unwrap() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_pearson_undefined_for_constant_column() {
        let a = [Some(1.0), Some(1.0), Some(1.0)];
        let b = [Some(1.0), Some(2.0), Some(3.0)];
        assert!(pearson(&a, &b).is_none());
        let c = [Some(3.0), Some(2.0), Some(1.0)];
        assert!((pearson(&b, &c).unwrap() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_chart_kind_from_str() {
        assert_eq!("Scatter Plot".parse::<ChartKind>().unwrap(), ChartKind::Scatter);
        assert_eq!("heatmap".parse::<ChartKind>().unwrap(), ChartKind::Heatmap);
        assert_eq!("bar".parse::<ChartKind>().unwrap(), ChartKind::Bar);
        assert!("radar".parse::<ChartKind>().is_err());
    }

    #[test]
    fn test_create_chart_stores_item() {
        let mut store = ScratchpadStore::new();
        let renderer = FixedRenderer(vec![1, 2, 3]);
        let name = create_chart(
            &mut store,
            &small_table(),
            ChartKind::Pie,
            &renderer,
            fixed_time(),
        )
        .unwrap();
        assert_eq!(name, "chart_20240102030405");
        assert_eq!(
            store.get(&name).unwrap().content,
            ItemContent::chart(
                "Pie Chart",
                "AQID",
                "Pie Chart created on 2024-01-02 03:04:05"
            )
        );
    }

    #[test]
    fn test_create_chart_with_missing_columns_stores_nothing() {
        let mut store = ScratchpadStore::new();
        let table = DataTable::from_csv("v\n1\n".as_bytes()).unwrap();
        let renderer = FixedRenderer(vec![1]);
        assert!(create_chart(&mut store, &table, ChartKind::Pie, &renderer, fixed_time()).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_chart_empty_render_is_error() {
        let mut store = ScratchpadStore::new();
        let renderer = FixedRenderer(Vec::new());
        let err = create_chart(
            &mut store,
            &small_table(),
            ChartKind::Line,
            &renderer,
            fixed_time(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Chart(_)));
        assert!(store.is_empty());
    }
}
