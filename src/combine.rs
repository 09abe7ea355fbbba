//! Elementwise combination of aligned series.
//!
//! All operations assume their inputs already share a time grid (via
//! [`align`](crate::align::align)) or are same-rate signals safe to cut to a
//! common length. Inputs of unequal length are truncated to the shortest
//! before combining; output time coordinates always come from the first
//! input.
//!
//! Division follows IEEE-754 semantics on zero denominators (`inf`/`NaN`
//! values, never an error): downstream consumers filter or let plot axes clip
//! them.

use crate::align::truncate_to_common;
use crate::series::{Sample, Series};

/// Errors raised by combination operations.
#[derive(Debug, thiserror::Error)]
pub enum CombineError {
    /// A multi-series operation received no input series.
    #[error("combination requires at least one input series")]
    Empty,
}

/// Elementwise `a - b`, with `a`'s time values.
pub fn subtract(a: &Series, b: &Series) -> Series {
    zip_with(a, b, |x, y| x - y)
}

/// Elementwise `a + b`, with `a`'s time values.
pub fn add(a: &Series, b: &Series) -> Series {
    zip_with(a, b, |x, y| x + y)
}

/// Elementwise `a / b`, with `a`'s time values.
///
/// Zero denominators produce `inf`/`NaN` per floating-point semantics.
pub fn divide(a: &Series, b: &Series) -> Series {
    zip_with(a, b, |x, y| x / y)
}

/// Elementwise mean across all series, truncated to the minimum shared
/// length; time values come from the first series.
///
/// # Errors
///
/// [`CombineError::Empty`] when `series` is empty.
pub fn average(series: &[Series]) -> Result<Series, CombineError> {
    combine_indexwise(series, |values| {
        values.iter().sum::<f64>() / values.len() as f64
    })
}

/// Elementwise median across all series, truncated to the minimum shared
/// length; time values come from the first series.
///
/// The median of an even count is the mean of the two middle values.
///
/// # Errors
///
/// [`CombineError::Empty`] when `series` is empty.
pub fn median(series: &[Series]) -> Result<Series, CombineError> {
    combine_indexwise(series, |values| {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        }
    })
}

/// Mean of the values whose time lies in `[start, end]`, or `None` when the
/// window contains no samples.
pub fn mean_in_window(series: &Series, start: f64, end: f64) -> Option<f64> {
    let window: Vec<f64> = series
        .iter()
        .filter(|s| start <= s.time && s.time <= end)
        .map(|s| s.value)
        .collect();
    if window.is_empty() {
        None
    } else {
        Some(window.iter().sum::<f64>() / window.len() as f64)
    }
}

fn zip_with(a: &Series, b: &Series, f: impl Fn(f64, f64) -> f64) -> Series {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| Sample::new(x.time, f(x.value, y.value)))
        .collect()
}

fn combine_indexwise(
    series: &[Series],
    f: impl Fn(&[f64]) -> f64,
) -> Result<Series, CombineError> {
    if series.is_empty() {
        return Err(CombineError::Empty);
    }
    let truncated = truncate_to_common(series);
    let len = truncated[0].len();

    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let at_index: Vec<f64> = truncated.iter().map(|s| s.samples()[i].value).collect();
        out.push(Sample::new(truncated[0].samples()[i].time, f(&at_index)));
    }
    Ok(Series::new(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;

    fn close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{x} != {y}");
        }
    }

    #[test]
    fn subtract_then_add_round_trips() {
        let a = Series::from_pairs([(0.0, 10.0), (1.0, 22.0), (2.0, 35.0)]);
        let b = Series::from_pairs([(0.0, 1.0), (0.8, 4.0), (2.5, 6.5)]);
        let b_aligned = align(&a, &b).unwrap();
        let reconstructed = add(&subtract(&a, &b_aligned), &b_aligned);
        close(&reconstructed.values(), &a.values());
        assert_eq!(reconstructed.times(), a.times());
    }

    #[test]
    fn binary_operations_truncate_to_the_shorter_input() {
        let a = Series::from_pairs([(0.0, 10.0), (1.0, 20.0), (2.0, 30.0)]);
        let b = Series::from_pairs([(0.0, 1.0), (1.0, 2.0)]);
        let diff = subtract(&a, &b);
        assert_eq!(diff.times(), vec![0.0, 1.0]);
        assert_eq!(diff.values(), vec![9.0, 18.0]);
    }

    #[test]
    fn divide_by_zero_yields_infinity_not_an_error() {
        let a = Series::from_pairs([(0.0, 10.0), (1.0, 20.0)]);
        let b = Series::from_pairs([(0.0, 2.0), (1.0, 0.0)]);
        let ratio = divide(&a, &b);
        assert_eq!(ratio.values()[0], 5.0);
        assert_eq!(ratio.values()[1], f64::INFINITY);
    }

    #[test]
    fn zero_over_zero_is_nan() {
        let a = Series::from_pairs([(0.0, 0.0)]);
        let b = Series::from_pairs([(0.0, 0.0)]);
        assert!(divide(&a, &b).values()[0].is_nan());
    }

    #[test]
    fn average_of_single_series_is_identity() {
        let s = Series::from_pairs([(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        assert_eq!(average(std::slice::from_ref(&s)).unwrap(), s);
    }

    #[test]
    fn median_of_identical_series_is_that_series() {
        let s = Series::from_pairs([(0.0, 4.0), (1.0, 9.0)]);
        let med = median(&[s.clone(), s.clone(), s.clone()]).unwrap();
        assert_eq!(med, s);
    }

    #[test]
    fn median_of_two_series_equals_their_average() {
        let a = Series::from_pairs([(0.0, 1.0), (1.0, 8.0)]);
        let b = Series::from_pairs([(0.0, 3.0), (1.0, 2.0)]);
        let med = median(&[a.clone(), b.clone()]).unwrap();
        let avg = average(&[a, b]).unwrap();
        assert_eq!(med, avg);
    }

    #[test]
    fn multi_series_combination_truncates_and_keeps_first_grid() {
        let a = Series::from_pairs([(0.0, 2.0), (1.0, 4.0), (2.0, 6.0)]);
        let b = Series::from_pairs([(0.1, 4.0), (1.1, 8.0)]);
        let avg = average(&[a, b]).unwrap();
        assert_eq!(avg.times(), vec![0.0, 1.0]);
        assert_eq!(avg.values(), vec![3.0, 6.0]);
    }

    #[test]
    fn empty_input_list_is_rejected() {
        assert!(matches!(average(&[]), Err(CombineError::Empty)));
        assert!(matches!(median(&[]), Err(CombineError::Empty)));
    }

    #[test]
    fn mean_in_window_ignores_outside_samples() {
        let s = Series::from_pairs([(0.0, 10.0), (1.0, 20.0), (2.0, 90.0)]);
        assert_eq!(mean_in_window(&s, 0.0, 1.0), Some(15.0));
        assert_eq!(mean_in_window(&s, 5.0, 6.0), None);
    }
}
