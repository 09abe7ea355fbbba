//! Partitioning timed samples into labeled day or round buckets.
//!
//! Field experiments run in discrete rounds, and background comparisons group
//! readings by calendar day. Both cases reduce to the same operation: assign
//! each absolutely-timed sample to the first labeled interval containing it,
//! and express its time relative to that interval's start. Samples outside
//! every interval are dropped without error — sensor logging routinely starts
//! before the first round and ends after the last.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use log::debug;

use crate::normalize::{TimeNormalizer, TimeUnit, TimedSample};
use crate::series::{BucketedSeries, Sample, Series};

/// A labeled half-open time interval `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    /// Discrete bucket label (round number, day number, ...).
    pub label: i64,
    /// Inclusive start.
    pub start: DateTime<FixedOffset>,
    /// Exclusive end.
    pub end: DateTime<FixedOffset>,
}

impl Interval {
    /// Create a labeled interval.
    pub fn new(label: i64, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { label, start, end }
    }

    fn contains(&self, t: DateTime<FixedOffset>) -> bool {
        self.start <= t && t < self.end
    }
}

/// Assign samples to labeled intervals, expressing each sample's time
/// relative to its interval's start in `unit`.
///
/// The first interval (in the given order) containing a sample wins, so
/// overlapping interval definitions resolve deterministically. Within a
/// bucket, samples keep their arrival order.
pub fn bucket(samples: &[TimedSample], intervals: &[Interval], unit: TimeUnit) -> BucketedSeries {
    let mut grouped: std::collections::BTreeMap<i64, Vec<Sample>> = Default::default();
    let mut dropped = 0usize;

    for sample in samples {
        match intervals.iter().find(|iv| iv.contains(sample.at)) {
            Some(interval) => {
                grouped.entry(interval.label).or_default().push(Sample::new(
                    TimeNormalizer::to_relative(sample.at, interval.start, unit),
                    sample.value,
                ));
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(
            "dropped {} of {} samples outside all {} intervals",
            dropped,
            samples.len(),
            intervals.len()
        );
    }

    grouped
        .into_iter()
        .map(|(label, samples)| (label, Series::new(samples)))
        .collect()
}

/// Group samples by local calendar day-of-month, with times relative to that
/// day's midnight.
///
/// Used for multi-day background comparisons where the same clock-time window
/// is overlaid across days.
pub fn bucket_by_day(samples: &[TimedSample], unit: TimeUnit) -> BucketedSeries {
    let mut grouped: std::collections::BTreeMap<i64, Vec<Sample>> = Default::default();

    for sample in samples {
        let since_midnight = f64::from(sample.at.time().num_seconds_from_midnight());
        grouped
            .entry(i64::from(sample.at.day()))
            .or_default()
            .push(Sample::new(since_midnight / unit.seconds(), sample.value));
    }

    grouped
        .into_iter()
        .map(|(label, samples)| (label, Series::new(samples)))
        .collect()
}
