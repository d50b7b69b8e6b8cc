use chrono::{Datelike, NaiveDate, Weekday};

pub const MONTH_LABELS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

pub fn leap_year(year: i32) -> bool {
    (year % 400 == 0) || (year % 4 == 0 && year % 100 != 0)
}

pub fn days_in_months(year: i32) -> [u32; 12] {
    [
        31,
        if leap_year(year) { 29 } else { 28 },
        31, 30, 31, 30, 31, 31, 30, 31, 30, 31,
    ]
}

pub fn days_in_year(year: i32) -> usize {
    if leap_year(year) {
        366
    } else {
        365
    }
}

/// 1-based ordinal day. `month` is clamped to 1..=12.
pub fn day_of_year(year: i32, month: u32, day: u32) -> i32 {
    let dim = days_in_months(year);
    let month = month.clamp(1, 12);
    let sum: u32 = dim[..(month - 1) as usize].iter().sum();
    (sum + day) as i32
}

/// Inverse of [`day_of_year`]. Out-of-range ordinals clamp to Dec 31.
pub fn doy_to_month_day(year: i32, doy: i32) -> (i32, i32) {
    let mut remaining = doy;
    for (month_idx, &dim) in days_in_months(year).iter().enumerate() {
        let dim = dim as i32;
        if remaining <= dim {
            return (month_idx as i32 + 1, remaining);
        }
        remaining -= dim;
    }
    (12, 31)
}

/// Every date of `year` in order.
pub fn dates_of_year(year: i32) -> impl Iterator<Item = NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .into_iter()
        .flat_map(|first| first.iter_days())
        .take_while(move |d| d.year() == year)
}

/// Cumulative day count at the end of each month.
pub fn month_boundaries(days_in_month: &[u32]) -> Vec<u32> {
    days_in_month
        .iter()
        .scan(0, |acc, &d| {
            *acc += d;
            Some(*acc)
        })
        .collect()
}

/// Day position of each month's midpoint, measured from Jan 1 00:00.
pub fn month_midpoints(days_in_month: &[u32]) -> Vec<f64> {
    let mut start = 0u32;
    days_in_month
        .iter()
        .map(|&d| {
            let mid = start as f64 + d as f64 / 2.0;
            start += d;
            mid
        })
        .collect()
}

/// Zero-based day indices of every `weekday` in `year`.
pub fn weekday_indices(year: i32, weekday: Weekday) -> Vec<usize> {
    dates_of_year(year)
        .enumerate()
        .filter(|(_, d)| d.weekday() == weekday)
        .map(|(i, _)| i)
        .collect()
}

/// 1-based day of month for a zero-based day index. Indices past the end
/// of the table are counted into December.
pub fn month_day_for_index(days_in_month: &[u32], index: usize) -> (usize, u32) {
    let mut remaining = index as u32;
    for (month, &dim) in days_in_month.iter().enumerate() {
        if remaining < dim {
            return (month, remaining + 1);
        }
        remaining -= dim;
    }
    let last = days_in_month.len().saturating_sub(1);
    let before_last: u32 = days_in_month[..last].iter().sum();
    (last, index as u32 - before_last + 1)
}
