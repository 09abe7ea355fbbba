//! Core sample and series types shared by the alignment pipeline.
//!
//! A [`Series`] is the unit of exchange between every pipeline stage:
//! ingestion produces one per sensor file, the normalizer stamps relative
//! times onto it, and the align/combine stages consume and return new ones.
//! Series are conceptually immutable — every transformation returns a fresh
//! `Series` rather than mutating its input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single reading: a measured value and its time offset from the run's
/// reference instant, in whatever [`TimeUnit`](crate::normalize::TimeUnit)
/// the producing stage declared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Time offset from the reference instant.
    pub time: f64,
    /// Measured parameter value (µg/m³, ppb, particles/cm³, ...).
    pub value: f64,
}

impl Sample {
    /// Create a sample from a time offset and a value.
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// An ordered sequence of samples for one sensor/parameter.
///
/// Invariant: samples are sorted by ascending time. Construction enforces
/// this with a stable sort, so equal-time samples keep their arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    /// Create a series, sorting the samples by ascending time.
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { samples }
    }

    /// Create a series from `(time, value)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(time, value)| Sample::new(time, value))
                .collect(),
        )
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrow the underlying samples, time-ascending.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Iterate over the samples in time order.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// The time coordinates, in order.
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    /// The values, in time order.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// First sample, if any.
    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    /// Last sample, if any.
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Earliest and latest time coordinates, if the series is non-empty.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        }
    }

    /// A copy holding only the first `len` samples.
    ///
    /// Used by the combination stage to cut same-rate signals to a common
    /// length; `len` past the end is clamped.
    pub fn truncated(&self, len: usize) -> Series {
        let len = len.min(self.samples.len());
        Series {
            samples: self.samples[..len].to_vec(),
        }
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Series::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Series grouped by a discrete label (calendar day or experimental round).
///
/// `BTreeMap` keeps label iteration deterministic for export and display.
pub type BucketedSeries = BTreeMap<i64, Series>;
