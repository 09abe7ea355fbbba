//! CSV export of processed series.
//!
//! The crate ends where plotting begins: derived series are written back out
//! as plain `time,value` CSVs (or `label,time,value` for bucketed output)
//! that any external plotting tool can consume.

use std::path::Path;

use serde::Serialize;

use crate::series::{BucketedSeries, Series};

/// Error raised when a series could not be written.
#[derive(Debug, thiserror::Error)]
#[error("failed to write {path}: {source}")]
pub struct ExportError {
    /// Destination path.
    path: String,
    #[source]
    source: csv::Error,
}

impl ExportError {
    fn new(path: &Path, source: csv::Error) -> Self {
        Self {
            path: path.display().to_string(),
            source,
        }
    }
}

#[derive(Serialize)]
struct LabeledRow {
    label: i64,
    time: f64,
    value: f64,
}

/// Write a series as a `time,value` CSV.
pub fn write_series(path: impl AsRef<Path>, series: &Series) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path).map_err(|e| ExportError::new(path, e))?;
    for sample in series {
        writer
            .serialize(sample)
            .map_err(|e| ExportError::new(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| ExportError::new(path, csv::Error::from(e)))?;
    Ok(())
}

/// Write bucketed series as a `label,time,value` CSV, label-major.
pub fn write_buckets(path: impl AsRef<Path>, buckets: &BucketedSeries) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path).map_err(|e| ExportError::new(path, e))?;
    for (label, series) in buckets {
        for sample in series {
            writer
                .serialize(LabeledRow {
                    label: *label,
                    time: sample.time,
                    value: sample.value,
                })
                .map_err(|e| ExportError::new(path, e))?;
        }
    }
    writer
        .flush()
        .map_err(|e| ExportError::new(path, csv::Error::from(e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_round_trips_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let series = Series::from_pairs([(0.0, 1.5), (2.5, 3.0)]);
        write_series(&path, &series).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "time,value\n0.0,1.5\n2.5,3.0\n");
    }

    #[test]
    fn buckets_are_written_label_major() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rounds.csv");
        let mut buckets = BucketedSeries::new();
        buckets.insert(2, Series::from_pairs([(0.0, 5.0)]));
        buckets.insert(1, Series::from_pairs([(0.0, 4.0)]));
        write_buckets(&path, &buckets).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "label,time,value\n1,0.0,4.0\n2,0.0,5.0\n"
        );
    }
}
