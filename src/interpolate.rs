//! Gap filling over the day axis. Missing entries are rebuilt from the
//! nearest valid neighbours by linear interpolation, or by linear
//! extrapolation from the two outermost anchors at either end.

use crate::error::FillError;

pub fn interpolate_linear(v1: f64, v2: f64, fraction: f64) -> f64 {
    v1 + fraction * (v2 - v1)
}

/// Shortest-way interpolation on a circle of circumference `period`.
/// Result lies in `[0, period)`.
pub fn interpolate_circular(a1: f64, a2: f64, fraction: f64, period: f64) -> f64 {
    wrap(a1 + shortest_diff(a1, a2, period) * fraction, period)
}

fn shortest_diff(from: f64, to: f64, period: f64) -> f64 {
    let half = period / 2.0;
    let diff = (to - from).rem_euclid(period);
    if diff > half {
        diff - period
    } else {
        diff
    }
}

fn wrap(value: f64, period: f64) -> f64 {
    let w = value.rem_euclid(period);
    // rem_euclid can round up to `period` for tiny negative inputs
    if w >= period {
        0.0
    } else {
        w
    }
}

fn anchors(series: &[Option<f64>]) -> Vec<(usize, f64)> {
    series
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|x| x.is_finite()).map(|x| (i, x)))
        .collect()
}

/// Evaluates the piecewise-linear curve through `anchors` at `index`.
/// `anchors` must be sorted by index and hold at least two points.
fn eval_piecewise(anchors: &[(usize, f64)], index: usize) -> f64 {
    let k = anchors.partition_point(|&(i, _)| i < index);
    let (lo, hi) = if k == 0 {
        (anchors[0], anchors[1])
    } else if k == anchors.len() {
        (anchors[k - 2], anchors[k - 1])
    } else {
        (anchors[k - 1], anchors[k])
    };
    let fraction = (index as f64 - lo.0 as f64) / (hi.0 as f64 - lo.0 as f64);
    interpolate_linear(lo.1, hi.1, fraction)
}

fn fill_with(
    name: &str,
    series: &[Option<f64>],
    anchors: &[(usize, f64)],
    finish: impl Fn(f64) -> f64,
) -> Result<Vec<f64>, FillError> {
    match anchors.len() {
        0 if series.is_empty() => Ok(Vec::new()),
        0 => Err(FillError::NoAnchors {
            series: name.to_string(),
        }),
        1 => Ok(vec![finish(anchors[0].1); series.len()]),
        _ => {
            let mut out = Vec::with_capacity(series.len());
            let mut next = 0;
            for i in 0..series.len() {
                if next < anchors.len() && anchors[next].0 == i {
                    out.push(finish(anchors[next].1));
                    next += 1;
                } else {
                    out.push(finish(eval_piecewise(anchors, i)));
                }
            }
            Ok(out)
        }
    }
}

/// Replaces every `None` (or non-finite value) by linear interpolation
/// between its valid neighbours. Fails if nothing in the series is valid.
pub fn fill_linear(name: &str, series: &[Option<f64>]) -> Result<Vec<f64>, FillError> {
    let anchors = anchors(series);
    fill_with(name, series, &anchors, |v| v)
}

/// Gap filling for phase-like values on `[0, period)`. Anchors are
/// unwrapped so that consecutive anchors never differ by more than half a
/// period, interpolated linearly, then wrapped back into range.
pub fn fill_circular(
    name: &str,
    series: &[Option<f64>],
    period: f64,
) -> Result<Vec<f64>, FillError> {
    if !(period.is_finite() && period > 0.0) {
        return Err(FillError::InvalidPeriod(period.to_string()));
    }
    let originals = anchors(series);
    let mut unwrapped = originals.clone();
    for k in 1..unwrapped.len() {
        let prev = unwrapped[k - 1].1;
        unwrapped[k].1 = prev + shortest_diff(prev, unwrapped[k].1, period);
    }
    let mut filled = fill_with(name, series, &unwrapped, |v| wrap(v, period))?;
    // unwrapping is lossy; known values go back untouched
    for (i, v) in originals {
        filled[i] = wrap(v, period);
    }
    Ok(filled)
}

/// Fills both components of a `(dawn, dusk)` series independently.
pub fn fill_pairs(
    name: &str,
    series: &[(Option<f64>, Option<f64>)],
) -> Result<Vec<(f64, f64)>, FillError> {
    let first: Vec<Option<f64>> = series.iter().map(|p| p.0).collect();
    let second: Vec<Option<f64>> = series.iter().map(|p| p.1).collect();
    let first = fill_linear(&format!("{name}.0"), &first)?;
    let second = fill_linear(&format!("{name}.1"), &second)?;
    Ok(first.into_iter().zip(second).collect())
}

/// Number of entries a fill would have to reconstruct.
pub fn gap_count(series: &[Option<f64>]) -> usize {
    series.iter().filter(|v| !v.is_some_and(f64::is_finite)).count()
}
