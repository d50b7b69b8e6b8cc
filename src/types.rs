use std::fmt;

use serde::{Deserialize, Serialize};

/// Sun elevation threshold that defines a rise/set event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizon {
    /// Upper limb at the horizon, refraction included.
    Sunrise,
    Civil,
    Nautical,
    Astronomical,
}

impl Horizon {
    /// Degrees of the sun's centre below the geometric horizon.
    pub fn depression_deg(self) -> f64 {
        match self {
            Horizon::Sunrise => 50.0 / 60.0,
            Horizon::Civil => 6.0,
            Horizon::Nautical => 12.0,
            Horizon::Astronomical => 18.0,
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Horizon::Sunrise => "sunrise",
            Horizon::Civil => "civil",
            Horizon::Nautical => "nautical",
            Horizon::Astronomical => "astronomical",
        };
        f.write_str(name)
    }
}

/// Local clock hours (`hour + minute / 60`) of one horizon crossing pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunEvents {
    pub rise: f64,
    pub transit: f64,
    pub set: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    /// Degrees, north positive.
    pub latitude: f64,
    /// Degrees, east positive.
    pub longitude: f64,
    /// IANA zone name, e.g. `Asia/Kolkata`.
    pub timezone: String,
}

impl Location {
    pub fn new(name: &str, latitude: f64, longitude: f64, timezone: &str) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            timezone: timezone.to_string(),
        }
    }

    /// `28.5909°N, 77.2183°E`
    pub fn coordinates_label(&self) -> String {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        format!(
            "{}°{}, {}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }

    /// Lowercase, whitespace-free name used for output files.
    pub fn file_stem(&self) -> String {
        self.name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase()
    }
}

/// One calendar day of raw ephemeris output. `None` marks a value the
/// provider could not compute; gap filling resolves it later.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DayRecord {
    pub day_index: usize,
    pub sunrise: Option<f64>,
    pub sunset: Option<f64>,
    pub noon: Option<f64>,
    pub civil_dawn: Option<f64>,
    pub civil_dusk: Option<f64>,
    pub nautical_dawn: Option<f64>,
    pub nautical_dusk: Option<f64>,
    pub astro_dawn: Option<f64>,
    pub astro_dusk: Option<f64>,
    /// Moon age in days, 0 (new) to 28.
    pub moon_phase: Option<f64>,
}

impl DayRecord {
    pub fn missing_count(&self) -> usize {
        [
            self.sunrise,
            self.sunset,
            self.noon,
            self.civil_dawn,
            self.civil_dusk,
            self.nautical_dawn,
            self.nautical_dusk,
            self.astro_dawn,
            self.astro_dusk,
            self.moon_phase,
        ]
        .iter()
        .filter(|v| v.is_none())
        .count()
    }
}

/// Raw per-day records for one location and year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSeries {
    pub location: Location,
    pub year: i32,
    pub days_in_month: [u32; 12],
    pub days: Vec<DayRecord>,
}

impl YearSeries {
    pub fn missing_count(&self) -> usize {
        self.days.iter().map(DayRecord::missing_count).sum()
    }

    pub fn column<F>(&self, f: F) -> Vec<Option<f64>>
    where
        F: Fn(&DayRecord) -> Option<f64>,
    {
        self.days.iter().map(f).collect()
    }
}

/// Gap-filled series in the on-disk layout. Twilight entries are
/// `(dawn, dusk)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearData {
    pub sunrise: Vec<f64>,
    pub sunset: Vec<f64>,
    pub days_in_month: Vec<u32>,
    pub moon_phases: Vec<f64>,
    pub noon: Vec<f64>,
    pub civil: Vec<(f64, f64)>,
    pub nautical: Vec<(f64, f64)>,
    pub astro: Vec<(f64, f64)>,
}
