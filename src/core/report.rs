//! Presentation of run results and chart-ready documents.
//!
//! Nothing here computes; values are rendered with `BigInt`'s `Display`
//! so arbitrarily large results are printed in full.

use crate::domain::model::{
    EvaluationResult, Operation, SequenceParams, SingleRunReport, Strategy, TimingSeries,
};
use crate::utils::error::{GeoError, Result};
use serde::Serialize;

pub const TIME_AXIS_LABEL: &str = "Time (ms)";

/// Milliseconds with six decimals.
pub fn format_elapsed(elapsed_ms: f64) -> String {
    format!("{:.6} ms", elapsed_ms)
}

/// `Iterative: S(3) = 26 | time = 0.001234 ms`
pub fn format_result_line(
    operation: Operation,
    strategy: Strategy,
    n: u64,
    result: &EvaluationResult,
) -> String {
    format!(
        "{}: {}({}) = {} | time = {}",
        strategy.label(),
        operation.symbol(),
        n,
        result.value,
        format_elapsed(result.elapsed_ms)
    )
}

pub fn format_single_run(report: &SingleRunReport) -> Vec<String> {
    report
        .results
        .iter()
        .map(|r| format_result_line(r.operation, r.strategy, report.params.n, &r.result))
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub value_label: String,
}

/// Iterative vs recursive comparison for one operation of a single run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

pub fn bar_chart(report: &SingleRunReport, operation: Operation) -> Option<BarChart> {
    let mut bars = Vec::with_capacity(2);
    for strategy in Strategy::ALL {
        let result = report.get(operation, strategy)?;
        bars.push(Bar {
            label: strategy.label().to_string(),
            value: result.elapsed_ms,
            value_label: format_elapsed(result.elapsed_ms),
        });
    }

    let title = match operation {
        Operation::Sum => format!("Runtime for the sum of the first {} terms", report.params.n),
        Operation::Term => format!("Runtime for term {}", report.params.n),
    };

    Some(BarChart {
        title,
        y_label: TIME_AXIS_LABEL.to_string(),
        bars,
    })
}

/// Plain-text rendering of a bar chart for terminals.
pub fn render_bar_chart(chart: &BarChart, width: usize) -> String {
    let max = chart.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    let label_width = chart.bars.iter().map(|b| b.label.len()).max().unwrap_or(0);

    let mut out = format!("{}\n", chart.title);
    for bar in &chart.bars {
        let filled = if max > 0.0 {
            ((bar.value / max) * width as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "  {:<lw$} |{:<w$}| {}\n",
            bar.label,
            "#".repeat(filled),
            bar.value_label,
            lw = label_width,
            w = width
        ));
    }
    out
}

#[derive(Debug, Serialize)]
struct ParamsDocument {
    a: String,
    r: String,
    n: u64,
}

impl From<&SequenceParams> for ParamsDocument {
    fn from(params: &SequenceParams) -> Self {
        Self {
            a: params.a.to_string(),
            r: params.r.to_string(),
            n: params.n,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResultDocument {
    operation: Operation,
    strategy: Strategy,
    value: String,
    elapsed_ms: f64,
}

#[derive(Debug, Serialize)]
struct SingleRunDocument {
    generated_at: String,
    params: ParamsDocument,
    results: Vec<ResultDocument>,
    charts: Vec<BarChart>,
}

/// JSON export of a single run. Values are decimal strings.
pub fn single_run_json(report: &SingleRunReport) -> Result<Vec<u8>> {
    let doc = SingleRunDocument {
        generated_at: chrono::Utc::now().to_rfc3339(),
        params: ParamsDocument::from(&report.params),
        results: report
            .results
            .iter()
            .map(|r| ResultDocument {
                operation: r.operation,
                strategy: r.strategy,
                value: r.result.value.to_string(),
                elapsed_ms: r.result.elapsed_ms,
            })
            .collect(),
        charts: report
            .operations()
            .into_iter()
            .filter_map(|op| bar_chart(report, op))
            .collect(),
    };
    Ok(serde_json::to_vec_pretty(&doc)?)
}

#[derive(Debug, Serialize)]
struct LineSeries<'a> {
    label: &'static str,
    values: &'a [f64],
}

#[derive(Debug, Serialize)]
struct SeriesDocument<'a> {
    generated_at: String,
    operation: Operation,
    params: ParamsDocument,
    title: String,
    x_label: &'static str,
    y_label: &'static str,
    inputs: &'a [u64],
    series: Vec<LineSeries<'a>>,
}

/// JSON export of a timing series, laid out as two line series over `n`.
pub fn series_json(series: &TimingSeries, params: &SequenceParams) -> Result<Vec<u8>> {
    let doc = SeriesDocument {
        generated_at: chrono::Utc::now().to_rfc3339(),
        operation: series.operation,
        params: ParamsDocument::from(params),
        title: format!("Runtime vs input size ({})", series.operation),
        x_label: "n",
        y_label: TIME_AXIS_LABEL,
        inputs: &series.inputs,
        series: vec![
            LineSeries {
                label: Strategy::Iterative.label(),
                values: &series.iterative_times,
            },
            LineSeries {
                label: Strategy::Recursive.label(),
                values: &series.recursive_times,
            },
        ],
    };
    Ok(serde_json::to_vec_pretty(&doc)?)
}

#[derive(Debug, Serialize)]
struct SeriesRow {
    n: u64,
    iterative_ms: f64,
    recursive_ms: f64,
}

/// CSV export with header `n,iterative_ms,recursive_ms`.
pub fn series_csv(series: &TimingSeries) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (n, iterative_ms, recursive_ms) in series.rows() {
        writer.serialize(SeriesRow {
            n,
            iterative_ms,
            recursive_ms,
        })?;
    }
    writer
        .into_inner()
        .map_err(|e| GeoError::IoError(e.into_error()))
}
