//! Moon age from the mean elongation of the moon plus its four largest
//! periodic terms (Meeus, ch. 47/49). Accurate to well under a day, which
//! is all a one-sample-per-day calendar needs.

use chrono::{Datelike, NaiveDate};

use crate::angles::{deg_to_rad, normalize_angle};

/// Length of the phase scale: new moon at 0, full moon at half of it.
pub const PHASE_PERIOD: f64 = 28.0;
pub const FULL_MOON: f64 = PHASE_PERIOD / 2.0;
/// Half-width of the window around [`FULL_MOON`] that counts as full.
pub const FULL_MOON_TOLERANCE: f64 = 0.5;

const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// `num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;
const J2000_JD: f64 = 2_451_545.0;

/// Julian day at 00:00 UT of `date`.
pub fn julian_day(date: NaiveDate) -> f64 {
    UNIX_EPOCH_JD + (date.num_days_from_ce() - UNIX_EPOCH_CE_DAYS) as f64
}

/// Moon age on `date` in `[0, 28)`.
pub fn moon_phase(date: NaiveDate) -> f64 {
    let jd = julian_day(date);
    // rough TT-UT correction, seconds converted to days
    let dt = (jd - 2_382_148.0).powi(2) / (41_048_480.0 * 86_400.0);
    let t = (jd + dt - J2000_JD) / 36_525.0;
    let t2 = t * t;
    let t3 = t2 * t;

    let d = normalize_angle(297.85 + 445_267.1115 * t - 0.001_630_0 * t2 + t3 / 545_868.0);
    let m = normalize_angle(357.53 + 35_999.0503 * t);
    let m1 = normalize_angle(134.96 + 477_198.8676 * t + 0.008_997_0 * t2 + t3 / 69_699.0);

    let (d_rad, m_rad, m1_rad) = (deg_to_rad(d), deg_to_rad(m), deg_to_rad(m1));
    let elongation = d + 6.29 * m1_rad.sin() - 2.10 * m_rad.sin()
        + 1.27 * (2.0 * d_rad - m1_rad).sin()
        + 0.66 * (2.0 * d_rad).sin();
    let elongation = normalize_angle(elongation).trunc();

    let age = ((elongation + 6.43) / 360.0 * PHASE_PERIOD).rem_euclid(PHASE_PERIOD);
    if age >= PHASE_PERIOD {
        0.0
    } else {
        age
    }
}

/// One index per maximal run of days whose phase lies within
/// [`FULL_MOON_TOLERANCE`] of [`FULL_MOON`]: the day closest to full.
pub fn full_moon_days(phases: &[f64]) -> Vec<usize> {
    let near_full = |p: f64| (p - FULL_MOON).abs() <= FULL_MOON_TOLERANCE;
    let mut days = Vec::new();
    let mut i = 0;
    while i < phases.len() {
        if !near_full(phases[i]) {
            i += 1;
            continue;
        }
        let mut closest = i;
        let mut j = i + 1;
        while j < phases.len() && near_full(phases[j]) {
            if (phases[j] - FULL_MOON).abs() < (phases[closest] - FULL_MOON).abs() {
                closest = j;
            }
            j += 1;
        }
        days.push(closest);
        i = j;
    }
    days
}
