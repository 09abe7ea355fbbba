//! Integration tests for aqalign
//!
//! These tests drive the full pipeline from sensor CSVs and an experiment
//! config through normalization, bucketing, alignment and combination.

use std::fs;
use std::path::Path;

use aqalign::align::align;
use aqalign::bucket::bucket;
use aqalign::combine::{divide, subtract};
use aqalign::experiment::ExperimentConfig;
use aqalign::ingest::read_rows;
use aqalign::normalize::TimeNormalizer;
use aqalign::series::{Sample, Series};
use tempfile::tempdir;

/// Write the exp5-style fixture: a PurpleAir sensor logging in UTC with a
/// clock running 7 minutes fast, and a local-time Aeroqual background unit
/// with a six-line preamble.
fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let pa1 = dir.join("PA1.csv");
    fs::write(
        &pa1,
        // 23:17 UTC minus 8 h minus 7 min of drift = 15:10 local, etc.
        "UTCDateTime,pm2_5_atm\n\
         2020/01/31T23:17:00z,100.0\n\
         2020/01/31T23:22:00z,80.0\n\
         2020/01/31T23:27:00z,60.0\n",
    )
    .unwrap();

    let aqy = dir.join("AQY.csv");
    fs::write(
        &aqy,
        "AQY BD-1161\nSerial,BD-1161\nSite,parking lot\n,\n,\n,\n\
         Time,PM2.5 (ug/m3)\n\
         2020/01/31 15:10:00,10.0\n\
         2020/01/31 15:20:00,20.0\n",
    )
    .unwrap();

    let config = dir.join("exp.toml");
    fs::write(
        &config,
        format!(
            r#"
            [experiment]
            name = "exp5"
            base_date = "2020-01-31"
            local_offset_minutes = -480
            reference = "15:00:00"
            unit = "minutes"

            [[round]]
            label = 1
            start = "15:10:00"
            end = "15:20:00"

            [[sensor]]
            name = "PA1"
            path = "{pa1}"
            time_column = "UTCDateTime"
            value_column = "pm2_5_atm"
            time_trim = {{ drop_last = 1, take_last = 8 }}
            input_offset_minutes = 0
            clock_correction_minutes = -7

            [[sensor]]
            name = "AQY"
            path = "{aqy}"
            time_column = "Time"
            value_column = "PM2.5 (ug/m3)"
            skip_rows = [6, 0]
            "#,
            pa1 = pa1.display(),
            aqy = aqy.display(),
        ),
    )
    .unwrap();
    config
}

fn load_run_series(config: &ExperimentConfig, name: &str) -> Series {
    let sensor = config.sensor(name).unwrap();
    let rows = read_rows(&sensor.path, &sensor.columns).unwrap();
    let normalizer = config.normalizer_for(sensor).unwrap();
    let reference = config.reference().unwrap();
    normalizer
        .normalize_rows(
            rows.iter().map(|r| (r.time.as_str(), r.value)),
            reference,
            config.experiment.unit,
        )
        .unwrap()
}

#[test]
fn utc_and_local_sensors_land_on_one_clock() {
    let dir = tempdir().unwrap();
    let config = ExperimentConfig::from_file(write_fixture(dir.path())).unwrap();

    let pa1 = load_run_series(&config, "PA1");
    let aqy = load_run_series(&config, "AQY");

    // Both sensors are now minutes past 15:00 local.
    assert_eq!(pa1.times(), vec![10.0, 15.0, 20.0]);
    assert_eq!(aqy.times(), vec![10.0, 20.0]);
}

#[test]
fn round_bucketing_excludes_the_open_end() {
    let dir = tempdir().unwrap();
    let config = ExperimentConfig::from_file(write_fixture(dir.path())).unwrap();

    let sensor = config.sensor("PA1").unwrap();
    let rows = read_rows(&sensor.path, &sensor.columns).unwrap();
    let timed = config
        .normalizer_for(sensor)
        .unwrap()
        .parse_rows(rows.iter().map(|r| (r.time.as_str(), r.value)))
        .unwrap();

    let buckets = bucket(&timed, &config.intervals().unwrap(), config.experiment.unit);
    // 15:20 sits on the round's exclusive end.
    assert_eq!(buckets[&1].times(), vec![0.0, 5.0]);
    assert_eq!(buckets[&1].values(), vec![100.0, 80.0]);
}

#[test]
fn background_correction_across_sample_rates() {
    let dir = tempdir().unwrap();
    let config = ExperimentConfig::from_file(write_fixture(dir.path())).unwrap();

    let near = load_run_series(&config, "PA1");
    let background = load_run_series(&config, "AQY");

    // The sparse background interpolates to 10/15/20 on the near grid.
    let background = align(&near, &background).unwrap();
    assert_eq!(background.values(), vec![10.0, 15.0, 20.0]);

    let corrected = subtract(&near, &background);
    assert_eq!(corrected.times(), near.times());
    assert_eq!(corrected.values(), vec![90.0, 65.0, 40.0]);

    let ratio = divide(&near, &background);
    assert_eq!(ratio.values(), vec![10.0, 80.0 / 15.0, 3.0]);
}

#[test]
fn zero_background_produces_infinite_ratio() {
    let near = Series::from_pairs([(0.0, 10.0), (1.0, 20.0)]);
    let background = Series::new(vec![Sample::new(0.0, 2.0), Sample::new(1.0, 0.0)]);
    let ratio = divide(&near, &background);
    assert_eq!(ratio.values()[0], 5.0);
    assert!(ratio.values()[1].is_infinite());
}

#[test]
fn parse_and_to_relative_against_self_is_zero() {
    let dir = tempdir().unwrap();
    let config = ExperimentConfig::from_file(write_fixture(dir.path())).unwrap();
    let sensor = config.sensor("AQY").unwrap();
    let normalizer = config.normalizer_for(sensor).unwrap();

    let t = normalizer.parse("2020/01/31 15:10:00").unwrap();
    assert_eq!(
        TimeNormalizer::to_relative(t, t, config.experiment.unit),
        0.0
    );
}
