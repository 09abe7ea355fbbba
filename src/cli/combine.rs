use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use aqalign::align::align;
use aqalign::bucket::bucket;
use aqalign::combine::{add, average, divide, median, subtract};
use aqalign::experiment::ExperimentConfig;
use aqalign::export::write_series;
use aqalign::ingest::read_rows;
use aqalign::normalize::TimeNormalizer;
use aqalign::series::{Sample, Series};

use super::OpArg;

/// Align sensors onto a common grid and combine them elementwise
pub fn run(
    config_path: PathBuf,
    op: OpArg,
    sensor_names: Vec<String>,
    round: Option<i64>,
    output: Option<PathBuf>,
) -> Result<()> {
    if op.is_binary() && sensor_names.len() != 2 {
        anyhow::bail!(
            "--op {:?} takes exactly two sensors, got {}",
            op,
            sensor_names.len()
        );
    }
    if sensor_names.is_empty() {
        anyhow::bail!("at least one sensor is required");
    }

    let config = ExperimentConfig::from_file(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let mut series_list = Vec::with_capacity(sensor_names.len());
    for name in &sensor_names {
        series_list.push(load_series(&config, name, round)?);
    }

    let result = match op {
        // Binary operations interpolate the second sensor onto the first
        // sensor's time grid before combining.
        OpArg::Subtract | OpArg::Add | OpArg::Divide => {
            let target = align(&series_list[0], &series_list[1]).with_context(|| {
                format!("Cannot interpolate {} onto {}", sensor_names[1], sensor_names[0])
            })?;
            match op {
                OpArg::Subtract => subtract(&series_list[0], &target),
                OpArg::Add => add(&series_list[0], &target),
                OpArg::Divide => divide(&series_list[0], &target),
                _ => unreachable!(),
            }
        }
        // Same-rate multi-sensor combination truncates to a common length.
        OpArg::Average => average(&series_list)?,
        OpArg::Median => median(&series_list)?,
    };

    info!(
        "combined {} sensors with {:?} into {} samples",
        sensor_names.len(),
        op,
        result.len()
    );

    match output {
        Some(path) => {
            write_series(&path, &result)?;
            println!("Wrote {} samples to {}", result.len(), path.display());
        }
        None => {
            let (start, end) = result.time_span().unwrap_or((0.0, 0.0));
            println!(
                "{:?} of [{}]: {} samples over {start:.2} .. {end:.2} [{:?}]",
                op,
                sensor_names.join(", "),
                result.len(),
                config.experiment.unit
            );
        }
    }

    Ok(())
}

/// Load one sensor as a relative-time series: either a single round's bucket
/// or the whole run measured from the reference instant.
fn load_series(config: &ExperimentConfig, name: &str, round: Option<i64>) -> Result<Series> {
    let sensor = config.sensor(name)?;
    let rows = read_rows(&sensor.path, &sensor.columns)
        .with_context(|| format!("Failed to read sensor {name}"))?;
    let normalizer = config.normalizer_for(sensor)?;
    let timed = normalizer.parse_rows(rows.iter().map(|r| (r.time.as_str(), r.value)))?;
    let unit = config.experiment.unit;

    match round {
        Some(label) => {
            let buckets = bucket(&timed, &config.intervals()?, unit);
            buckets
                .get(&label)
                .cloned()
                .with_context(|| format!("Round {label} contains no samples for sensor {name}"))
        }
        None => {
            let reference = config.reference()?;
            Ok(timed
                .into_iter()
                .map(|s| Sample::new(TimeNormalizer::to_relative(s.at, reference, unit), s.value))
                .collect())
        }
    }
}
