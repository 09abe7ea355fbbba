//! TOML experiment configuration.
//!
//! Everything the analysis scripts used to hardcode — reference instant,
//! round boundaries, zone offsets, per-sensor clock corrections and CSV
//! layouts — lives in one TOML file per experiment:
//!
//! ```toml
//! [experiment]
//! name = "exp5"
//! base_date = "2020-01-31"
//! local_offset_minutes = -480
//! reference = "15:00:00"
//! unit = "minutes"
//!
//! [[round]]
//! label = 1
//! start = "16:28:54"
//! end = "16:55:00"
//!
//! [[sensor]]
//! name = "PA1"
//! path = "exp5_data/PA1.csv"
//! time_column = "UTCDateTime"
//! value_column = "pm2_5_atm"
//! time_trim = { drop_last = 1, take_last = 8 }
//! input_offset_minutes = 0
//! clock_correction_minutes = -7
//! rollover_day = 31
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::Deserialize;

use crate::bucket::Interval;
use crate::ingest::ColumnSpec;
use crate::normalize::{TimeError, TimeNormalizer, TimeUnit};

/// Errors raised while loading or applying an experiment config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Offending file path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The TOML could not be deserialized.
    #[error("invalid experiment config: {0}")]
    Toml(#[from] toml::de::Error),
    /// A configured time string did not parse.
    #[error(transparent)]
    Time(#[from] TimeError),
    /// A UTC offset was outside ±24 h.
    #[error("invalid UTC offset: {minutes} minutes")]
    InvalidOffset {
        /// Offending offset in minutes.
        minutes: i32,
    },
    /// A sensor name was not defined in the config.
    #[error("sensor {name:?} is not defined in the experiment config")]
    UnknownSensor {
        /// Requested sensor name.
        name: String,
    },
}

/// Root of an experiment TOML file.
#[derive(Debug, Deserialize)]
pub struct ExperimentConfig {
    /// Run-wide settings.
    pub experiment: ExperimentSection,
    /// Labeled round intervals, in definition order.
    #[serde(default, rename = "round")]
    pub rounds: Vec<RoundSection>,
    /// Sensor definitions.
    #[serde(default, rename = "sensor")]
    pub sensors: Vec<SensorSection>,
}

/// Run-wide settings: date context, local zone, reference instant, unit.
#[derive(Debug, Deserialize)]
pub struct ExperimentSection {
    /// Free-form experiment name.
    #[serde(default)]
    pub name: Option<String>,
    /// Calendar date supplying context for time-of-day-only strings.
    pub base_date: NaiveDate,
    /// Local zone as a fixed UTC offset in minutes (Pacific standard: -480).
    pub local_offset_minutes: i32,
    /// The zero-point all relative times are measured against, in any
    /// supported time format.
    pub reference: String,
    /// Unit for relative times.
    #[serde(default = "default_unit")]
    pub unit: TimeUnit,
}

fn default_unit() -> TimeUnit {
    TimeUnit::Minutes
}

/// One labeled round with start/end time strings.
#[derive(Debug, Deserialize)]
pub struct RoundSection {
    /// Bucket label.
    pub label: i64,
    /// Inclusive start, in any supported time format.
    pub start: String,
    /// Exclusive end.
    pub end: String,
}

/// One sensor: where its CSV lives, how to read it, and how its clock
/// relates to the experiment's local zone.
#[derive(Debug, Deserialize)]
pub struct SensorSection {
    /// Sensor name referenced from the CLI.
    pub name: String,
    /// CSV file path.
    pub path: PathBuf,
    /// CSV layout (column names, preamble, time trimming).
    #[serde(flatten)]
    pub columns: ColumnSpec,
    /// Zone the raw time strings are recorded in, as a UTC offset in
    /// minutes; defaults to the experiment's local zone.
    #[serde(default)]
    pub input_offset_minutes: Option<i32>,
    /// Signed clock correction in minutes (drifting sensor clocks).
    #[serde(default)]
    pub clock_correction_minutes: i64,
    /// Day-of-month triggering the one-day rollover correction.
    #[serde(default)]
    pub rollover_day: Option<u32>,
}

impl ExperimentConfig {
    /// Load an experiment config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse an experiment config from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The experiment's local zone.
    pub fn local_offset(&self) -> Result<FixedOffset, ConfigError> {
        offset_from_minutes(self.experiment.local_offset_minutes)
    }

    /// The reference instant all relative times are measured from.
    pub fn reference(&self) -> Result<DateTime<FixedOffset>, ConfigError> {
        Ok(self.local_normalizer()?.parse(&self.experiment.reference)?)
    }

    /// Round boundaries as labeled absolute-time intervals, in definition
    /// order.
    pub fn intervals(&self) -> Result<Vec<Interval>, ConfigError> {
        let normalizer = self.local_normalizer()?;
        self.rounds
            .iter()
            .map(|round| {
                Ok(Interval::new(
                    round.label,
                    normalizer.parse(&round.start)?,
                    normalizer.parse(&round.end)?,
                ))
            })
            .collect()
    }

    /// Look up a sensor definition by name.
    pub fn sensor(&self, name: &str) -> Result<&SensorSection, ConfigError> {
        self.sensors
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ConfigError::UnknownSensor {
                name: name.to_string(),
            })
    }

    /// Build the timestamp normalizer for one sensor.
    pub fn normalizer_for(&self, sensor: &SensorSection) -> Result<TimeNormalizer, ConfigError> {
        let local = self.local_offset()?;
        let input = match sensor.input_offset_minutes {
            Some(minutes) => offset_from_minutes(minutes)?,
            None => local,
        };
        let mut normalizer = TimeNormalizer::new(self.experiment.base_date, local)
            .with_input_offset(input)
            .with_clock_correction(Duration::minutes(sensor.clock_correction_minutes));
        if let Some(day) = sensor.rollover_day {
            normalizer = normalizer.with_rollover_day(day);
        }
        Ok(normalizer)
    }

    /// Normalizer for config-internal time strings (reference, rounds),
    /// which are always written in local time.
    fn local_normalizer(&self) -> Result<TimeNormalizer, ConfigError> {
        Ok(TimeNormalizer::new(
            self.experiment.base_date,
            self.local_offset()?,
        ))
    }
}

fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, ConfigError> {
    FixedOffset::east_opt(minutes * 60).ok_or(ConfigError::InvalidOffset { minutes })
}
