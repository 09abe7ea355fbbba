//! CSV ingestion for sensor exports.
//!
//! Each sensor vendor ships a slightly different CSV: Aeroqual AQY exports
//! open with a six-line preamble (except some that don't), PurpleAir time
//! cells carry a trailing `Z` and a full date we only want the clock part of,
//! and PurpleAir "primary" downloads split one parameter across A and B
//! channel columns. [`ColumnSpec`] captures those quirks per sensor;
//! [`read_rows`] applies them and hands back plain `(time string, value)`
//! rows for the normalizer.
//!
//! Rows whose value cell is missing or non-numeric are dropped here, so
//! NaN-free series are guaranteed before the core stages run.

use std::path::Path;

use log::debug;
use serde::Deserialize;

/// Errors raised while reading sensor CSVs.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending file path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The CSV structure could not be parsed.
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        /// Offending file path.
        path: String,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
    /// A required column was absent under every candidate preamble length.
    #[error("column {column:?} not found in {path} (preamble lengths tried: {tried:?})")]
    MissingColumn {
        /// The column that could not be located.
        column: String,
        /// Offending file path.
        path: String,
        /// Preamble lengths that were attempted.
        tried: Vec<usize>,
    },
}

/// Character trimming applied to each raw time cell before parsing.
///
/// `drop_last` characters are removed from the end, then at most `take_last`
/// characters are kept from the (new) end. A PurpleAir cell like
/// `2020/01/31T16:28:54z` becomes `16:28:54` with
/// `{ drop_last: 1, take_last: 8 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimeTrim {
    /// Characters removed from the end of the cell.
    #[serde(default)]
    pub drop_last: usize,
    /// Characters kept from the end after dropping.
    pub take_last: usize,
}

impl TimeTrim {
    fn apply(&self, cell: &str) -> String {
        let chars: Vec<char> = cell.chars().collect();
        let end = chars.len().saturating_sub(self.drop_last);
        let start = end.saturating_sub(self.take_last);
        chars[start..end].iter().collect()
    }
}

/// Per-sensor CSV layout description.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    /// Header name of the time column.
    pub time_column: String,
    /// Header name of the measured-parameter column.
    pub value_column: String,
    /// Optional B-channel column averaged with the value column when both
    /// cells are numeric.
    #[serde(default)]
    pub channel_b_column: Option<String>,
    /// Candidate preamble lengths, tried in order until the header row is
    /// found. AQY exports usually need `[6, 0]`.
    #[serde(default = "default_skip_rows")]
    pub skip_rows: Vec<usize>,
    /// Trimming applied to each time cell before parsing.
    #[serde(default)]
    pub time_trim: Option<TimeTrim>,
}

fn default_skip_rows() -> Vec<usize> {
    vec![0]
}

impl ColumnSpec {
    /// A spec with just a time and a value column, no preamble, no trimming.
    pub fn new(time_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            time_column: time_column.into(),
            value_column: value_column.into(),
            channel_b_column: None,
            skip_rows: default_skip_rows(),
            time_trim: None,
        }
    }

    /// Set the candidate preamble lengths.
    pub fn with_skip_rows(mut self, skip_rows: Vec<usize>) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    /// Set the time-cell trimming rule.
    pub fn with_time_trim(mut self, trim: TimeTrim) -> Self {
        self.time_trim = Some(trim);
        self
    }

    /// Set the B-channel column to average with the value column.
    pub fn with_channel_b(mut self, column: impl Into<String>) -> Self {
        self.channel_b_column = Some(column.into());
        self
    }
}

/// One ingested row: the (trimmed) raw time cell and its numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Raw time cell, post-trim, still unparsed.
    pub time: String,
    /// Numeric value, finite.
    pub value: f64,
}

/// Read `(time, value)` rows from a sensor CSV according to `spec`.
///
/// Preamble lengths from `spec.skip_rows` are tried in order; the first one
/// under which both required columns appear in the header row is used. Rows
/// with a missing or non-numeric value cell are silently dropped (counted at
/// debug level), matching the NaN-free series contract.
pub fn read_rows(path: impl AsRef<Path>, spec: &ColumnSpec) -> Result<Vec<RawRow>, IngestError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: display.clone(),
        source,
    })?;

    for &skip in &spec.skip_rows {
        match parse_body(skip_lines(&content, skip), spec, &display)? {
            Some(rows) => {
                debug!(
                    "read {} rows from {display} (preamble length {skip})",
                    rows.len()
                );
                return Ok(rows);
            }
            None => continue,
        }
    }

    Err(IngestError::MissingColumn {
        column: spec.value_column.clone(),
        path: display,
        tried: spec.skip_rows.clone(),
    })
}

/// Parse one candidate body; `Ok(None)` means the header row lacked a
/// required column and the next preamble length should be tried.
fn parse_body(
    body: &str,
    spec: &ColumnSpec,
    display: &str,
) -> Result<Option<Vec<RawRow>>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        // An unreadable header just means this preamble guess was wrong.
        Err(_) => return Ok(None),
    };

    let find = |name: &str| headers.iter().position(|h| h.trim() == name);
    let (time_idx, value_idx) = match (find(&spec.time_column), find(&spec.value_column)) {
        (Some(t), Some(v)) => (t, v),
        _ => return Ok(None),
    };
    let channel_b_idx = spec.channel_b_column.as_deref().and_then(find);

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: display.to_string(),
            source,
        })?;

        let time_cell = record.get(time_idx).unwrap_or("");
        let value = match parse_value(record.get(value_idx)) {
            Some(v) => v,
            None => {
                dropped += 1;
                continue;
            }
        };
        // B channel present and numeric: report the channel mean instead.
        let value = match channel_b_idx.and_then(|idx| parse_value(record.get(idx))) {
            Some(b) => (value + b) / 2.0,
            None => value,
        };

        let time = match &spec.time_trim {
            Some(trim) => trim.apply(time_cell),
            None => time_cell.to_string(),
        };
        rows.push(RawRow { time, value });
    }

    if dropped > 0 {
        debug!("dropped {dropped} rows with missing values from {display}");
    }
    Ok(Some(rows))
}

fn parse_value(cell: Option<&str>) -> Option<f64> {
    cell?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Skip the first `n` lines of `content`.
fn skip_lines(content: &str, n: usize) -> &str {
    let mut rest = content;
    for _ in 0..n {
        match rest.find('\n') {
            Some(idx) => rest = &rest[idx + 1..],
            None => return "",
        }
    }
    rest
}
