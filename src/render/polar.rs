//! Polar chart geometry. Angles run clockwise from 12 o'clock, one full
//! turn per year; radii are fractions of a day, mapped linearly from a
//! radial window onto pixels.

use std::f64::consts::TAU;

/// Angle of day `day` (zero-based, may be fractional) in a year of
/// `num_days` days.
pub fn day_angle(day: f64, num_days: usize) -> f64 {
    day / num_days as f64 * TAU
}

/// `n` evenly spaced angles from 0 to 2π inclusive.
pub fn thetas(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n).map(|i| i as f64 / (n - 1) as f64 * TAU).collect(),
    }
}

/// Clock hours to day fractions, closed by repeating the first value so a
/// band drawn over [`thetas`] meets itself at 12 o'clock.
pub fn closed_radii(hours: &[f64]) -> Vec<f64> {
    hours
        .iter()
        .chain(hours.first())
        .map(|h| h / 24.0)
        .collect()
}

pub fn constant(value: f64, n: usize) -> Vec<f64> {
    vec![value; n]
}

pub fn offset(radii: &[f64], delta: f64) -> Vec<f64> {
    radii.iter().map(|r| r + delta).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarFrame {
    pub cx: f64,
    pub cy: f64,
    /// Pixel radius of `r_max`.
    pub radius_px: f64,
    pub r_min: f64,
    pub r_max: f64,
}

impl PolarFrame {
    pub fn new(center: (f64, f64), radius_px: f64, r_min: f64, r_max: f64) -> Self {
        Self {
            cx: center.0,
            cy: center.1,
            radius_px,
            r_min,
            r_max,
        }
    }

    fn scale(&self, r: f64) -> f64 {
        (r - self.r_min) / (self.r_max - self.r_min) * self.radius_px
    }

    /// Pixel position of `(theta, r)` with `r` clamped to the window.
    pub fn project(&self, theta: f64, r: f64) -> (i32, i32) {
        self.project_unclamped(theta, r.clamp(self.r_min, self.r_max))
    }

    /// Pixel position without clamping, for labels outside the window.
    pub fn project_unclamped(&self, theta: f64, r: f64) -> (i32, i32) {
        let rho = self.scale(r).max(0.0);
        let x = self.cx + rho * theta.sin();
        let y = self.cy - rho * theta.cos();
        (x.round() as i32, y.round() as i32)
    }

    /// Closed outline of the region between `inner` and `outer`: forward
    /// along `inner`, back along `outer`.
    pub fn band(&self, thetas: &[f64], inner: &[f64], outer: &[f64]) -> Vec<(i32, i32)> {
        let forward = thetas
            .iter()
            .zip(inner)
            .map(|(&t, &r)| self.project(t, r));
        let backward = thetas
            .iter()
            .zip(outer)
            .rev()
            .map(|(&t, &r)| self.project(t, r));
        forward.chain(backward).collect()
    }

    /// Radial segment at `theta` from `r0` to `r1`.
    pub fn spoke(&self, theta: f64, r0: f64, r1: f64) -> Vec<(i32, i32)> {
        vec![self.project(theta, r0), self.project(theta, r1)]
    }
}
