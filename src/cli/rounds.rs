use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use aqalign::bucket::bucket;
use aqalign::experiment::ExperimentConfig;
use aqalign::export::write_buckets;
use aqalign::ingest::read_rows;

/// Bucket a sensor's readings into the experiment's rounds
pub fn run(config_path: PathBuf, sensor_name: String, output: Option<PathBuf>) -> Result<()> {
    let config = ExperimentConfig::from_file(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let sensor = config.sensor(&sensor_name)?;

    let rows = read_rows(&sensor.path, &sensor.columns)
        .with_context(|| format!("Failed to read sensor {sensor_name}"))?;
    let normalizer = config.normalizer_for(sensor)?;
    let timed = normalizer.parse_rows(rows.iter().map(|r| (r.time.as_str(), r.value)))?;

    let intervals = config.intervals()?;
    let buckets = bucket(&timed, &intervals, config.experiment.unit);
    info!(
        "bucketed {} of {} samples into {} rounds",
        buckets.values().map(|s| s.len()).sum::<usize>(),
        timed.len(),
        buckets.len()
    );

    match output {
        Some(path) => {
            write_buckets(&path, &buckets)?;
            println!("Wrote {} rounds to {}", buckets.len(), path.display());
        }
        None => {
            println!("Round  Samples  Span [{:?}]        Mean", config.experiment.unit);
            for (label, series) in &buckets {
                let (start, end) = series.time_span().unwrap_or((0.0, 0.0));
                let mean = series.values().iter().sum::<f64>() / series.len() as f64;
                println!(
                    "{label:>5}  {:>7}  {start:>7.2} .. {end:>7.2}  {mean:>8.2}",
                    series.len()
                );
            }
        }
    }

    Ok(())
}
