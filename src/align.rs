//! Resampling one series onto another's time grid.
//!
//! Sensors sample at different rates (PurpleAir every ~80 s, Aeroqual once a
//! minute), so pointwise arithmetic between them first requires a common time
//! grid. [`align`] evaluates a target series at every time coordinate of a
//! source series by linear interpolation, extrapolating past the target's
//! range along its first/last segment — out-of-range times never fail.

use crate::series::{Sample, Series};

/// Errors raised while aligning series.
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// The interpolation target cannot define a line.
    #[error("interpolation target needs at least two distinct time values, got {distinct}")]
    InsufficientData {
        /// Number of distinct time values in the target.
        distinct: usize,
    },
}

/// Produce a series with `source`'s time values and `target`'s values
/// linearly interpolated at those times.
///
/// Times before `target`'s first sample extrapolate along its leading
/// segment; times after the last sample along its trailing segment. The
/// result is a pure function of the two inputs.
///
/// # Errors
///
/// [`AlignError::InsufficientData`] when `target` has fewer than two distinct
/// time values.
pub fn align(source: &Series, target: &Series) -> Result<Series, AlignError> {
    let samples = target.samples();
    let distinct = distinct_times(samples);
    if distinct < 2 {
        return Err(AlignError::InsufficientData { distinct });
    }

    Ok(source
        .iter()
        .map(|s| Sample::new(s.time, interpolate(samples, s.time)))
        .collect())
}

/// Cut every series to the minimum shared length.
///
/// Same-rate signals from co-located sensors drift apart in sample count over
/// multi-day runs; truncation makes them elementwise-combinable without
/// interpolation.
pub fn truncate_to_common(series: &[Series]) -> Vec<Series> {
    let min_len = series.iter().map(Series::len).min().unwrap_or(0);
    series.iter().map(|s| s.truncated(min_len)).collect()
}

/// Evenly subdivide each segment of a series into `points_per_segment`
/// interpolated samples, keeping the final sample.
///
/// Used to generate smooth per-frame positions when a downstream renderer
/// animates a sparse series. Series with fewer than two samples, or a zero
/// subdivision count, are returned unchanged.
pub fn densify(series: &Series, points_per_segment: usize) -> Series {
    let samples = series.samples();
    if samples.len() < 2 || points_per_segment == 0 {
        return series.clone();
    }

    let mut dense = Vec::with_capacity((samples.len() - 1) * points_per_segment + 1);
    for pair in samples.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        for i in 0..points_per_segment {
            let t = a.time + i as f64 * (b.time - a.time) / points_per_segment as f64;
            dense.push(Sample::new(t, lerp(a, b, t)));
        }
    }
    if let Some(last) = samples.last() {
        dense.push(*last);
    }
    Series::new(dense)
}

/// Number of distinct time values in a sorted sample slice.
fn distinct_times(samples: &[Sample]) -> usize {
    let mut distinct = usize::from(!samples.is_empty());
    distinct += samples
        .windows(2)
        .filter(|pair| pair[0].time != pair[1].time)
        .count();
    distinct
}

/// Evaluate the piecewise-linear function through `samples` at `t`,
/// extrapolating along the nearest non-degenerate segment.
fn interpolate(samples: &[Sample], t: f64) -> f64 {
    let idx = samples.partition_point(|s| s.time <= t);

    if idx > 0 && samples[idx - 1].time == t {
        // Exact grid hit; also sidesteps zero-width segments at duplicated times.
        return samples[idx - 1].value;
    }

    let (lo, hi) = if idx == 0 {
        leading_segment(samples)
    } else if idx == samples.len() {
        trailing_segment(samples)
    } else {
        (samples[idx - 1], samples[idx])
    };
    lerp(lo, hi, t)
}

/// First segment with nonzero width, for left extrapolation.
fn leading_segment(samples: &[Sample]) -> (Sample, Sample) {
    let first = samples[0];
    let next = samples
        .iter()
        .copied()
        .find(|s| s.time != first.time)
        .unwrap_or(samples[samples.len() - 1]);
    (first, next)
}

/// Last segment with nonzero width, for right extrapolation.
fn trailing_segment(samples: &[Sample]) -> (Sample, Sample) {
    let last = samples[samples.len() - 1];
    let prev = samples
        .iter()
        .rev()
        .copied()
        .find(|s| s.time != last.time)
        .unwrap_or(samples[0]);
    (prev, last)
}

fn lerp(a: Sample, b: Sample, t: f64) -> f64 {
    a.value + (b.value - a.value) / (b.time - a.time) * (t - a.time)
}
