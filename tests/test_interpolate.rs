use polar_calendar::error::FillError;
use polar_calendar::interpolate::*;

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

fn circular_distance(a: f64, b: f64, period: f64) -> f64 {
    let d = (a - b).rem_euclid(period);
    d.min(period - d)
}

// ── Scalar interpolation ──

#[test]
fn test_interpolate_linear_endpoints_and_mid() {
    assert_approx!(interpolate_linear(2.0, 4.0, 0.0), 2.0, 1e-12);
    assert_approx!(interpolate_linear(2.0, 4.0, 1.0), 4.0, 1e-12);
    assert_approx!(interpolate_linear(2.0, 4.0, 0.5), 3.0, 1e-12);
}

#[test]
fn test_interpolate_circular_takes_short_way() {
    assert_approx!(interpolate_circular(27.0, 1.0, 0.5, 28.0), 0.0, 1e-9);
    assert_approx!(interpolate_circular(1.0, 27.0, 0.5, 28.0), 0.0, 1e-9);
    assert_approx!(interpolate_circular(10.0, 14.0, 0.25, 28.0), 11.0, 1e-9);
}

#[test]
fn test_interpolate_circular_stays_in_range() {
    for i in 0..=20 {
        let v = interpolate_circular(26.5, 2.5, i as f64 / 20.0, 28.0);
        assert!((0.0..28.0).contains(&v), "v={}", v);
    }
}

// ── Linear fill ──

#[test]
fn test_fill_linear_identity_without_gaps() {
    let series = [Some(1.0), Some(5.0), Some(-2.0), Some(7.5)];
    let filled = fill_linear("x", &series).unwrap();
    assert_eq!(filled, vec![1.0, 5.0, -2.0, 7.5]);
}

#[test]
fn test_fill_linear_single_gap_is_neighbour_mean() {
    let series = [Some(6.0), None, Some(8.0)];
    let filled = fill_linear("x", &series).unwrap();
    assert_approx!(filled[1], 7.0, 1e-12);
}

#[test]
fn test_fill_linear_run_of_gaps() {
    let series = [Some(0.0), None, None, None, Some(4.0)];
    let filled = fill_linear("x", &series).unwrap();
    for (i, v) in filled.iter().enumerate() {
        assert_approx!(*v, i as f64, 1e-12);
    }
}

#[test]
fn test_fill_linear_non_finite_counts_as_missing() {
    let series = [Some(1.0), Some(f64::NAN), Some(3.0)];
    let filled = fill_linear("x", &series).unwrap();
    assert_approx!(filled[1], 2.0, 1e-12);
    assert_eq!(gap_count(&series), 1);
}

#[test]
fn test_fill_linear_extrapolates_edges() {
    let series = [None, None, Some(5.0), Some(6.0), None];
    let filled = fill_linear("x", &series).unwrap();
    assert_approx!(filled[0], 3.0, 1e-12);
    assert_approx!(filled[1], 4.0, 1e-12);
    assert_approx!(filled[4], 7.0, 1e-12);
}

#[test]
fn test_fill_linear_single_anchor_is_constant() {
    let series = [None, Some(6.5), None, None];
    let filled = fill_linear("x", &series).unwrap();
    assert_eq!(filled, vec![6.5; 4]);
}

#[test]
fn test_fill_linear_all_missing_fails() {
    let err = fill_linear("sunrise", &[None, None]).unwrap_err();
    assert_eq!(
        err,
        FillError::NoAnchors {
            series: "sunrise".to_string()
        }
    );
}

#[test]
fn test_fill_linear_empty_series() {
    assert!(fill_linear("x", &[]).unwrap().is_empty());
}

#[test]
fn test_fill_linear_never_leaves_gaps() {
    let series: Vec<Option<f64>> = (0..365)
        .map(|i| if i % 7 == 3 || i > 360 { None } else { Some(6.0 + i as f64 * 0.01) })
        .collect();
    let filled = fill_linear("x", &series).unwrap();
    assert_eq!(filled.len(), series.len());
    assert!(filled.iter().all(|v| v.is_finite()));
    for (i, v) in filled.iter().enumerate() {
        assert_approx!(*v, 6.0 + i as f64 * 0.01, 1e-9);
    }
}

// ── Circular fill ──

#[test]
fn test_fill_circular_identity_without_gaps() {
    let values = [0.1, 27.9, 0.3, 13.7, 0.05, 27.95, 14.2];
    let series: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    let filled = fill_circular("moon", &series, 28.0).unwrap();
    assert_eq!(filled, values.to_vec());
}

#[test]
fn test_fill_circular_keeps_known_values_around_gaps() {
    let series = [Some(0.3), Some(27.9), None, Some(0.05), Some(13.7)];
    let filled = fill_circular("moon", &series, 28.0).unwrap();
    assert_eq!(filled[0], 0.3);
    assert_eq!(filled[1], 27.9);
    assert_eq!(filled[3], 0.05);
    assert_eq!(filled[4], 13.7);
    assert!((0.0..28.0).contains(&filled[2]));
}

#[test]
fn test_fill_circular_across_wrap() {
    let series = [Some(26.0), Some(27.0), None, Some(1.0), Some(2.0)];
    let filled = fill_circular("moon", &series, 28.0).unwrap();
    assert_approx!(circular_distance(filled[2], 0.0, 28.0), 0.0, 1e-9);
    assert!(filled.iter().all(|v| (0.0..28.0).contains(v)));
}

#[test]
fn test_fill_circular_long_gap_across_wrap() {
    let series = [Some(25.0), None, None, None, Some(1.0)];
    let filled = fill_circular("moon", &series, 28.0).unwrap();
    let expected = [25.0, 26.0, 27.0, 0.0, 1.0];
    for (v, e) in filled.iter().zip(expected) {
        assert_approx!(circular_distance(*v, e, 28.0), 0.0, 1e-9);
    }
}

#[test]
fn test_fill_circular_extrapolation_wraps() {
    let series = [Some(26.0), Some(27.0), None, None];
    let filled = fill_circular("moon", &series, 28.0).unwrap();
    assert_approx!(filled[2], 0.0, 1e-9);
    assert_approx!(filled[3], 1.0, 1e-9);
}

#[test]
fn test_fill_circular_degrees() {
    let series = [Some(350.0), None, Some(10.0)];
    let filled = fill_circular("heading", &series, 360.0).unwrap();
    assert_approx!(circular_distance(filled[1], 0.0, 360.0), 0.0, 1e-9);
}

#[test]
fn test_fill_circular_rejects_bad_period() {
    let series = [Some(1.0), None];
    assert!(matches!(
        fill_circular("moon", &series, 0.0),
        Err(FillError::InvalidPeriod(_))
    ));
    assert!(matches!(
        fill_circular("moon", &series, f64::NAN),
        Err(FillError::InvalidPeriod(_))
    ));
}

#[test]
fn test_fill_circular_all_missing_fails() {
    assert!(matches!(
        fill_circular("moon", &[None, None, None], 28.0),
        Err(FillError::NoAnchors { .. })
    ));
}

// ── Pair fill ──

#[test]
fn test_fill_pairs_components_independent() {
    let series = [
        (Some(5.0), Some(19.0)),
        (None, Some(19.5)),
        (Some(6.0), None),
        (Some(6.5), Some(20.5)),
    ];
    let filled = fill_pairs("civil", &series).unwrap();
    assert_approx!(filled[1].0, 5.5, 1e-12);
    assert_approx!(filled[1].1, 19.5, 1e-12);
    assert_approx!(filled[2].0, 6.0, 1e-12);
    assert_approx!(filled[2].1, 20.0, 1e-12);
}

#[test]
fn test_fill_pairs_names_failing_component() {
    let series = [(Some(5.0), None), (Some(6.0), None)];
    let err = fill_pairs("astro", &series).unwrap_err();
    assert_eq!(
        err,
        FillError::NoAnchors {
            series: "astro.1".to_string()
        }
    );
}
