use chrono::{Datelike, NaiveDate};
use polar_calendar::ephemeris::{ApproximateEphemeris, Ephemeris, Observer};
use polar_calendar::error::{CalendarError, EphemerisError};
use polar_calendar::series::*;
use polar_calendar::types::{Horizon, Location, SunEvents, YearData};

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

/// Values linear in the day index, with chosen days failing per horizon.
struct FlakyEphemeris {
    sun_failures: Vec<(Horizon, u32)>,
    moon_failures: Vec<u32>,
}

fn base_rise(horizon: Horizon) -> f64 {
    match horizon {
        Horizon::Sunrise => 6.0,
        Horizon::Civil => 5.5,
        Horizon::Nautical => 5.0,
        Horizon::Astronomical => 4.5,
    }
}

fn expected(horizon: Horizon, day: usize) -> SunEvents {
    let d = day as f64;
    SunEvents {
        rise: base_rise(horizon) - d * 0.001,
        transit: 12.0 + d * 0.0001,
        set: 24.0 - base_rise(horizon) + d * 0.002,
    }
}

fn expected_phase(day: usize) -> f64 {
    (day % 28) as f64
}

impl Ephemeris for FlakyEphemeris {
    fn sun_events(
        &self,
        _observer: &Observer,
        date: NaiveDate,
        horizon: Horizon,
    ) -> Result<SunEvents, EphemerisError> {
        let day = date.ordinal0();
        if self.sun_failures.contains(&(horizon, day)) {
            return Err(EphemerisError::NoCrossing { date, horizon });
        }
        Ok(expected(horizon, day as usize))
    }

    fn moon_phase(&self, date: NaiveDate) -> Result<f64, EphemerisError> {
        let day = date.ordinal0();
        if self.moon_failures.contains(&day) {
            return Err(EphemerisError::Solver {
                date,
                message: "no convergence".into(),
            });
        }
        Ok(expected_phase(day as usize))
    }
}

fn flaky() -> FlakyEphemeris {
    FlakyEphemeris {
        sun_failures: vec![
            (Horizon::Sunrise, 10),
            (Horizon::Sunrise, 11),
            (Horizon::Sunrise, 12),
            (Horizon::Civil, 0),
            (Horizon::Astronomical, 364),
        ],
        moon_failures: vec![28],
    }
}

fn test_city() -> Location {
    Location::new("Test City", 10.0, 20.0, "UTC")
}

// ── Generation ──

#[test]
fn test_generate_year_records_failures_as_missing() {
    let series = generate_year(&test_city(), 2025, &flaky()).unwrap();
    assert_eq!(series.days.len(), 365);
    assert!(series.days[10].sunrise.is_none());
    assert!(series.days[10].noon.is_none());
    assert!(series.days[10].civil_dawn.is_some());
    assert!(series.days[0].civil_dawn.is_none());
    assert!(series.days[0].sunrise.is_some());
    assert!(series.days[28].moon_phase.is_none());
    // 3 days x (sunrise, sunset, noon) + civil pair + astro pair + moon
    assert_eq!(series.missing_count(), 14);
}

#[test]
fn test_generate_year_leap() {
    let series = generate_year(&test_city(), 2024, &flaky()).unwrap();
    assert_eq!(series.days.len(), 366);
    assert_eq!(series.days_in_month[1], 29);
    assert_eq!(series.days[365].day_index, 365);
}

#[test]
fn test_generate_year_bad_timezone() {
    let city = Location::new("Nowhere", 10.0, 20.0, "Not/AZone");
    let result = generate_year(&city, 2025, &flaky());
    assert!(matches!(result, Err(CalendarError::Config(_))));
}

// ── Fill ──

#[test]
fn test_fill_year_reconstructs_linear_values() {
    let series = generate_year(&test_city(), 2025, &flaky()).unwrap();
    let data = fill_year(&series).unwrap();
    assert_eq!(data.num_days(), 365);

    for day in [10, 11, 12] {
        let e = expected(Horizon::Sunrise, day);
        assert_approx!(data.sunrise[day], e.rise, 1e-9);
        assert_approx!(data.sunset[day], e.set, 1e-9);
        assert_approx!(data.noon[day], e.transit, 1e-9);
    }
    let civil = expected(Horizon::Civil, 0);
    assert_approx!(data.civil[0].0, civil.rise, 1e-9);
    assert_approx!(data.civil[0].1, civil.set, 1e-9);
    let astro = expected(Horizon::Astronomical, 364);
    assert_approx!(data.astro[364].0, astro.rise, 1e-9);
    assert_approx!(data.astro[364].1, astro.set, 1e-9);
}

#[test]
fn test_fill_year_moon_wraps() {
    let series = generate_year(&test_city(), 2025, &flaky()).unwrap();
    let data = fill_year(&series).unwrap();
    assert_approx!(data.moon_phases[28], 0.0, 1e-9);
    assert!(data.moon_phases.iter().all(|p| (0.0..28.0).contains(p)));
}

#[test]
fn test_fill_year_no_valid_values_fails() {
    let all_fail = FlakyEphemeris {
        sun_failures: (0..365).map(|d| (Horizon::Nautical, d)).collect(),
        moon_failures: Vec::new(),
    };
    let series = generate_year(&test_city(), 2025, &all_fail).unwrap();
    assert!(matches!(fill_year(&series), Err(CalendarError::Fill(_))));
}

#[test]
fn test_fill_year_approximate_vizag() {
    let vizag = Location::new("Vizag", 17.7219, 83.3057, "Asia/Kolkata");
    let series = generate_year(&vizag, 2025, &ApproximateEphemeris).unwrap();
    assert_eq!(series.missing_count(), 0);
    let data = fill_year(&series).unwrap();
    data.validate().unwrap();
    for i in 0..data.num_days() {
        assert!(data.astro[i].0 < data.nautical[i].0);
        assert!(data.nautical[i].0 < data.civil[i].0);
        assert!(data.civil[i].0 < data.sunrise[i]);
        assert!(data.sunrise[i] < data.noon[i] && data.noon[i] < data.sunset[i]);
        assert!(data.sunset[i] < data.civil[i].1);
    }
}

// ── Output ──

#[test]
fn test_round_to() {
    assert_eq!(round_to(1.23456, 3), 1.235);
    assert_eq!(round_to(-2.0004, 3), -2.0);
}

#[test]
fn test_rounded_moon_never_reaches_period() {
    let series = generate_year(&test_city(), 2025, &flaky()).unwrap();
    let mut data = fill_year(&series).unwrap();
    data.moon_phases[5] = 27.9998;
    let rounded = data.rounded(OUTPUT_DECIMALS);
    assert_eq!(rounded.moon_phases[5], 0.0);
}

#[test]
fn test_json_keys() {
    let series = generate_year(&test_city(), 2025, &flaky()).unwrap();
    let data = fill_year(&series).unwrap();
    let value: serde_json::Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
    let object = value.as_object().unwrap();
    for key in [
        "sunrise",
        "sunset",
        "days_in_month",
        "moon_phases",
        "noon",
        "civil",
        "nautical",
        "astro",
    ] {
        assert!(object.contains_key(key), "missing {}", key);
    }
    assert_eq!(object["civil"][0].as_array().unwrap().len(), 2);
}

#[test]
fn test_json_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("test_city_data.json");
    let series = generate_year(&test_city(), 2025, &flaky()).unwrap();
    let data = fill_year(&series).unwrap();
    data.write_json(&path).unwrap();
    let read = YearData::read_json(&path).unwrap();
    assert_eq!(read, data.rounded(OUTPUT_DECIMALS));
}

#[test]
fn test_from_json_rejects_short_series() {
    let series = generate_year(&test_city(), 2025, &flaky()).unwrap();
    let mut data = fill_year(&series).unwrap();
    data.sunrise.pop();
    let json = serde_json::to_string(&data).unwrap();
    assert!(matches!(
        YearData::from_json(&json),
        Err(CalendarError::YearData(_))
    ));
}

#[test]
fn test_read_json_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = YearData::read_json(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(CalendarError::Io { .. })));
}
