//! Property tests for the align/combine stages.

use aqalign::align::align;
use aqalign::combine::{add, average, subtract};
use aqalign::series::Series;
use proptest::prelude::*;

fn series_strategy(max_len: usize) -> impl Strategy<Value = Series> {
    proptest::collection::vec((0.0..1_000.0f64, -500.0..500.0f64), 1..max_len)
        .prop_map(Series::from_pairs)
}

/// Targets need two distinct time values to define a line.
fn has_distinct_times(series: &Series) -> bool {
    series
        .time_span()
        .map(|(start, end)| start != end)
        .unwrap_or(false)
}

proptest! {
    #[test]
    fn aligned_series_always_keeps_source_grid(
        source in series_strategy(50),
        target in series_strategy(50),
    ) {
        prop_assume!(has_distinct_times(&target));
        let aligned = align(&source, &target).unwrap();
        prop_assert_eq!(aligned.times(), source.times());
    }

    #[test]
    fn subtract_then_add_reconstructs_the_original(
        a in series_strategy(50),
        b in series_strategy(50),
    ) {
        prop_assume!(has_distinct_times(&b));
        let b = align(&a, &b).unwrap();
        let reconstructed = add(&subtract(&a, &b), &b);
        prop_assert_eq!(reconstructed.len(), a.len());
        // Tolerance scales with the aligned values too: extrapolation over a
        // near-vertical segment can dwarf the original magnitudes.
        for ((x, y), z) in reconstructed.iter().zip(a.iter()).zip(b.iter()) {
            let scale = y.value.abs().max(z.value.abs()).max(1.0);
            prop_assert!((x.value - y.value).abs() <= 1e-9 * scale);
        }
    }

    #[test]
    fn average_of_one_series_is_identity(s in series_strategy(50)) {
        let avg = average(std::slice::from_ref(&s)).unwrap();
        prop_assert_eq!(avg, s);
    }

    #[test]
    fn alignment_is_pure(
        source in series_strategy(30),
        target in series_strategy(30),
    ) {
        prop_assume!(has_distinct_times(&target));
        prop_assert_eq!(
            align(&source, &target).unwrap(),
            align(&source, &target).unwrap()
        );
    }
}
