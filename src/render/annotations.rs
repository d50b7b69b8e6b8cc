//! Annotation data: hour rings, week markers and meteor-shower strokes.
//! Pure functions; drawing happens in the parent module.

use chrono::Weekday;
use rand::Rng;
use rand_distr::{Beta, Distribution};

use crate::calendar::{month_day_for_index, weekday_indices};
use crate::config::MeteorShower;
use crate::error::{CalendarError, Result};
use crate::render::polar::day_angle;

/// Radial band of the random meteor strokes.
pub const METEOR_RADIUS: (f64, f64) = (0.91, 0.928);
/// Random stroke length range.
pub const METEOR_LENGTH: (f64, f64) = (0.001, 0.008);

/// `1AM`, `4:15AM`, `12PM`. Minutes are shown only when non-zero.
pub fn hour_label(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round() as i64;
    let (h24, minute) = (total_minutes.div_euclid(60) % 24, total_minutes.rem_euclid(60));
    let suffix = if h24 < 12 { "AM" } else { "PM" };
    let h12 = match h24 % 12 {
        0 => 12,
        h => h,
    };
    if minute == 0 {
        format!("{h12}{suffix}")
    } else {
        format!("{h12}:{minute:02}{suffix}")
    }
}

/// Hours at which tick rings are drawn, from `first` up to and including
/// `last`, `step` apart.
pub fn hour_ticks(first: f64, last: f64, step: f64) -> Vec<f64> {
    let count = ((last - first) / step + 1e-9).floor() as usize + 1;
    (0..count).map(|i| first + i as f64 * step).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekMarker {
    pub day_index: usize,
    pub theta: f64,
    pub label: String,
    /// Radial nudge for the full chart, see [`week_label_offset`].
    pub radius_offset: f64,
}

/// Radial shift of a week label at `theta` so that labels next to the
/// month lines do not run into them. Pulled inward on the first and third
/// quadrant, pushed outward on the second and fourth; zero at 12 and 6
/// o'clock, at most 0.015.
pub fn week_label_offset(theta: f64) -> f64 {
    let scaled = |v: f64| (v.powi(3) * (1.0 - v) * 0.7 + v) * 0.015;
    let deg = theta.to_degrees().rem_euclid(360.0);
    if deg <= 90.0 {
        -scaled(deg / 90.0)
    } else if deg <= 180.0 {
        scaled(1.0 - (deg - 90.0) / 90.0)
    } else if deg <= 270.0 {
        -scaled((deg - 180.0) / 90.0)
    } else {
        scaled(1.0 - (deg - 270.0) / 90.0)
    }
}

/// One marker per Sunday, labelled with its day of month.
pub fn week_markers(year: i32, days_in_month: &[u32], num_days: usize) -> Vec<WeekMarker> {
    weekday_indices(year, Weekday::Sun)
        .into_iter()
        .filter(|&i| i < num_days)
        .map(|i| {
            let theta = day_angle(i as f64, num_days);
            WeekMarker {
                day_index: i,
                theta,
                label: month_day_for_index(days_in_month, i).1.to_string(),
                radius_offset: week_label_offset(theta),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub theta: f64,
    pub r0: f64,
    pub r1: f64,
    pub alpha: f64,
    /// Pixel width.
    pub width: u32,
}

/// Strokes for one shower: beta-distributed angles between start and end
/// with the sample nearest the peak snapped onto it, one stroke at each
/// end, and three fixed strokes marking the peak.
pub fn meteor_strokes<R: Rng>(
    shower: &MeteorShower,
    num_days: usize,
    rng: &mut R,
) -> Result<Vec<Stroke>> {
    let start = day_angle(shower.start as f64, num_days);
    let end = day_angle(shower.end as f64, num_days);
    let peak = day_angle(shower.peak as f64, num_days);

    let beta = Beta::new(2.0, 2.0 * shower.skew).map_err(|e| {
        CalendarError::Config(format!("meteor shower {}: {e}", shower.name))
    })?;
    let mut angles: Vec<f64> = (0..shower.stroke_count())
        .map(|_| start + beta.sample(rng) * (end - start))
        .collect();
    let nearest = angles
        .iter()
        .enumerate()
        .min_by(|a, b| (a.1 - peak).abs().total_cmp(&(b.1 - peak).abs()))
        .map(|(i, _)| i);
    if let Some(i) = nearest {
        angles[i] = peak;
    }
    angles.extend([start, end]);

    let mut strokes: Vec<Stroke> = angles
        .into_iter()
        .map(|theta| {
            let r0 = rng.gen_range(METEOR_RADIUS.0..METEOR_RADIUS.1);
            let length = rng.gen_range(METEOR_LENGTH.0..METEOR_LENGTH.1);
            Stroke {
                theta,
                r0,
                r1: r0 + length,
                alpha: 0.65 + length * 20.0,
                width: 1,
            }
        })
        .collect();

    strokes.extend([
        Stroke { theta: peak, r0: 0.95, r1: 0.97, alpha: 1.0, width: 1 },
        Stroke { theta: peak - 0.002, r0: 0.9, r1: 0.94, alpha: 1.0, width: 1 },
        Stroke { theta: peak + 0.003, r0: 0.92, r1: 0.95, alpha: 0.9, width: 1 },
    ]);
    Ok(strokes)
}
