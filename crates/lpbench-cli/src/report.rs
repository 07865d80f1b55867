use lpbench_solver::Method;
use serde::Serialize;
use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::compare::MethodRun;

pub const TITLE: &str = "Method Comparison Results";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Table,
    Json,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ComparisonRow {
    #[tabled(rename = "Method")]
    pub method: String,
    #[tabled(rename = "Objective Value")]
    pub objective_value: f64,
    #[tabled(rename = "Computation Time (s)", display_with = "display_seconds")]
    pub seconds: f64,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    title: &'a str,
    rows: &'a [ComparisonRow],
}

fn display_seconds(seconds: &f64) -> String {
    format!("{seconds:.6}")
}

pub fn label(method: Method) -> &'static str {
    match method {
        Method::Simplex => "Simplex",
        Method::RevisedSimplex => "Revised Simplex",
    }
}

/// Rows for the runs that reached an optimum, in run order.
pub fn rows(runs: &[MethodRun]) -> Vec<ComparisonRow> {
    runs.iter()
        .filter_map(|run| {
            let value = run.objective.as_ref().ok()?;
            Some(ComparisonRow {
                method: label(run.method).to_string(),
                objective_value: *value,
                seconds: run.elapsed.as_secs_f64(),
            })
        })
        .collect()
}

pub fn render(rows: &[ComparisonRow], format: Format) -> Result<String, serde_json::Error> {
    match format {
        Format::Table => {
            let mut table = Table::new(rows);
            table.with(Style::modern()).with(Panel::header(TITLE));
            Ok(table.to_string())
        }
        Format::Json => serde_json::to_string_pretty(&Report { title: TITLE, rows }),
    }
}
