//! Timestamp normalization for heterogeneous sensor exports.
//!
//! Every supported sensor reports time differently: PurpleAir rows carry UTC
//! time-of-day strings from a drifting clock, Aeroqual exports mix
//! `%Y/%m/%d %H:%M:%S` and `%m/%d/%Y %H:%M` layouts, and the particle counter
//! logs bare `%H:%M:%S`. [`TimeNormalizer`] turns all of them into
//! [`DateTime<FixedOffset>`] values in the experiment's local zone, then into
//! relative offsets (minutes, hours or days) from a single reference instant.
//!
//! Parsing tries an ordered list of [`TimeFormat`]s; the first pattern that
//! matches wins, so format precedence is explicit and deterministic rather
//! than driven by fallback error handling.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::series::Series;

/// Unit for relative time offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Minutes since the reference instant.
    Minutes,
    /// Hours since the reference instant.
    Hours,
    /// Days since the reference instant.
    Days,
}

impl TimeUnit {
    /// Seconds per unit.
    pub fn seconds(self) -> f64 {
        match self {
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3_600.0,
            TimeUnit::Days => 86_400.0,
        }
    }
}

/// One candidate layout for a raw time cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeFormat {
    /// Full date-and-time pattern, e.g. `%Y/%m/%d %H:%M:%S`.
    DateTime(String),
    /// Time-of-day pattern, e.g. `%H:%M:%S`; the calendar date comes from the
    /// normalizer's base date.
    TimeOfDay(String),
}

impl TimeFormat {
    /// A full date-and-time format.
    pub fn date_time(pattern: impl Into<String>) -> Self {
        TimeFormat::DateTime(pattern.into())
    }

    /// A time-of-day-only format.
    pub fn time_of_day(pattern: impl Into<String>) -> Self {
        TimeFormat::TimeOfDay(pattern.into())
    }

    fn try_parse(&self, raw: &str, base_date: NaiveDate) -> Option<NaiveDateTime> {
        match self {
            TimeFormat::DateTime(pattern) => NaiveDateTime::parse_from_str(raw, pattern).ok(),
            TimeFormat::TimeOfDay(pattern) => NaiveTime::parse_from_str(raw, pattern)
                .ok()
                .map(|t| base_date.and_time(t)),
        }
    }
}

/// Errors raised while normalizing timestamps.
#[derive(Debug, thiserror::Error)]
pub enum TimeError {
    /// The raw time string matched none of the configured formats.
    #[error("time string {raw:?} matches none of the {tried} configured formats")]
    Unparseable {
        /// The offending raw cell.
        raw: String,
        /// How many formats were attempted.
        tried: usize,
    },
}

/// A reading whose time is still absolute, prior to bucketing or
/// relative-offset conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedSample {
    /// Absolute timestamp in the experiment's local zone.
    pub at: DateTime<FixedOffset>,
    /// Measured parameter value.
    pub value: f64,
}

/// Converts raw sensor time strings into local-zone absolute timestamps and
/// relative offsets.
///
/// All policy lives in explicit configuration: the zone the source records
/// in, the experiment's local zone, a per-sensor clock correction, and an
/// optional day-rollover trigger for time-of-day-only sources whose localized
/// date lands on a known experiment boundary day.
#[derive(Debug, Clone)]
pub struct TimeNormalizer {
    formats: Vec<TimeFormat>,
    base_date: NaiveDate,
    input_offset: FixedOffset,
    local_offset: FixedOffset,
    clock_correction: Duration,
    rollover_day: Option<u32>,
}

impl TimeNormalizer {
    /// Create a normalizer for sources already reporting in the local zone.
    ///
    /// The default format list covers the layouts observed across supported
    /// sensors, tried in order: `%Y/%m/%d %H:%M:%S`, `%m/%d/%Y %H:%M`,
    /// `%H:%M:%S`, `%H:%M`.
    pub fn new(base_date: NaiveDate, local_offset: FixedOffset) -> Self {
        Self {
            formats: vec![
                TimeFormat::date_time("%Y/%m/%d %H:%M:%S"),
                TimeFormat::date_time("%m/%d/%Y %H:%M"),
                TimeFormat::time_of_day("%H:%M:%S"),
                TimeFormat::time_of_day("%H:%M"),
            ],
            base_date,
            input_offset: local_offset,
            local_offset,
            clock_correction: Duration::zero(),
            rollover_day: None,
        }
    }

    /// Replace the ordered format list.
    pub fn with_formats(mut self, formats: Vec<TimeFormat>) -> Self {
        self.formats = formats;
        self
    }

    /// Set the zone the raw strings are recorded in (e.g. UTC for PurpleAir).
    pub fn with_input_offset(mut self, offset: FixedOffset) -> Self {
        self.input_offset = offset;
        self
    }

    /// Set a signed clock correction applied after zone conversion.
    ///
    /// PurpleAir units in the source experiments ran 7 minutes fast, so the
    /// correction there is `Duration::minutes(-7)`.
    pub fn with_clock_correction(mut self, correction: Duration) -> Self {
        self.clock_correction = correction;
        self
    }

    /// Set the day-of-month that triggers a one-day rollover.
    ///
    /// When a localized timestamp's day-of-month equals `day`, one calendar
    /// day is added. This compensates for time-of-day-only sources whose
    /// zone shift walks them backwards across a month boundary.
    pub fn with_rollover_day(mut self, day: u32) -> Self {
        self.rollover_day = Some(day);
        self
    }

    /// Parse one raw time cell into a local-zone absolute timestamp.
    ///
    /// Formats are tried in configured order; the first match wins.
    pub fn parse(&self, raw: &str) -> Result<DateTime<FixedOffset>, TimeError> {
        for format in &self.formats {
            if let Some(naive) = format.try_parse(raw, self.base_date) {
                return Ok(self.localize(naive));
            }
        }
        Err(TimeError::Unparseable {
            raw: raw.to_string(),
            tried: self.formats.len(),
        })
    }

    /// Shift a naive timestamp from the input zone to the local zone, apply
    /// the clock correction, then the rollover policy.
    fn localize(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        let naive_utc = naive - Duration::seconds(i64::from(self.input_offset.local_minus_utc()));
        let mut local = DateTime::<FixedOffset>::from_naive_utc_and_offset(
            naive_utc,
            self.local_offset,
        ) + self.clock_correction;
        if let Some(day) = self.rollover_day {
            if local.day() == day {
                local = local + Duration::days(1);
            }
        }
        local
    }

    /// Convert an absolute timestamp into an offset from `reference`.
    pub fn to_relative(
        t: DateTime<FixedOffset>,
        reference: DateTime<FixedOffset>,
        unit: TimeUnit,
    ) -> f64 {
        (t - reference).num_milliseconds() as f64 / 1_000.0 / unit.seconds()
    }

    /// Parse `(raw_time, value)` rows into absolutely-timed samples.
    ///
    /// Row order is preserved; any unparseable time cell fails the whole
    /// batch.
    pub fn parse_rows<'a, I>(&self, rows: I) -> Result<Vec<TimedSample>, TimeError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        rows.into_iter()
            .map(|(raw, value)| {
                Ok(TimedSample {
                    at: self.parse(raw)?,
                    value,
                })
            })
            .collect()
    }

    /// Parse rows and express them as a [`Series`] of offsets from
    /// `reference` in `unit`.
    pub fn normalize_rows<'a, I>(
        &self,
        rows: I,
        reference: DateTime<FixedOffset>,
        unit: TimeUnit,
    ) -> Result<Series, TimeError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let timed = self.parse_rows(rows)?;
        Ok(timed
            .into_iter()
            .map(|sample| {
                crate::series::Sample::new(
                    Self::to_relative(sample.at, reference, unit),
                    sample.value,
                )
            })
            .collect())
    }
}
