use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use aqalign::ingest::{read_rows, ColumnSpec, RawRow};

/// Per-file summary printed by `aqalign info`.
#[derive(Serialize)]
struct FileSummary {
    file: String,
    rows: usize,
    first_time: Option<String>,
    last_time: Option<String>,
    value_min: Option<f64>,
    value_max: Option<f64>,
    value_mean: Option<f64>,
}

impl FileSummary {
    fn compute(file: &PathBuf, rows: &[RawRow]) -> Self {
        let values = rows.iter().map(|r| r.value);
        let sum: f64 = values.clone().sum();
        Self {
            file: file.display().to_string(),
            rows: rows.len(),
            first_time: rows.first().map(|r| r.time.clone()),
            last_time: rows.last().map(|r| r.time.clone()),
            value_min: values.clone().reduce(f64::min),
            value_max: values.reduce(f64::max),
            value_mean: (!rows.is_empty()).then(|| sum / rows.len() as f64),
        }
    }
}

/// Summarize a sensor CSV
pub fn run(
    file: PathBuf,
    time_column: String,
    value_column: String,
    skip_rows: Vec<usize>,
    json: bool,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let spec = ColumnSpec::new(time_column, value_column).with_skip_rows(skip_rows);
    let rows = read_rows(&file, &spec).context("Failed to read sensor CSV")?;
    let summary = FileSummary::compute(&file, &rows);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_header("Sensor File Summary");
    println!("File: {}", summary.file);
    println!();
    println!("Rows with values: {}", summary.rows);
    if let (Some(first), Some(last)) = (&summary.first_time, &summary.last_time) {
        println!("Time span: {first} .. {last}");
    }
    if let (Some(min), Some(max), Some(mean)) =
        (summary.value_min, summary.value_max, summary.value_mean)
    {
        println!("Values: min {min:.2}, max {max:.2}, mean {mean:.2}");
    }

    Ok(())
}

#[cfg(feature = "colorized_output")]
fn print_header(title: &str) {
    use console::style;
    println!("{}", style(title).bold().cyan());
    println!("{}", style("=".repeat(title.len())).cyan());
}

#[cfg(not(feature = "colorized_output"))]
fn print_header(title: &str) {
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
}
