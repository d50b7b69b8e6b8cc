//! Run configuration, loaded from TOML. Every section has a default, so a
//! partial file only overrides what it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ephemeris::Observer;
use crate::error::{CalendarError, Result};
use crate::types::Location;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Whole clock face: dawn and dusk twilight, night, noon, moon markers.
    #[default]
    Full,
    /// Zoom on the 4:00 to 7:15 window, dawn side only.
    Dawn,
}

/// Densest allowed stroke spacing, ten strokes per day.
pub const MIN_DAYS_PER_STROKE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeteorShower {
    pub name: String,
    /// Zero-based day indices.
    pub peak: usize,
    pub start: usize,
    pub end: usize,
    /// Days per drawn stroke; smaller is denser.
    pub days_per_stroke: f64,
    /// Beta(2, 2 * skew) shape: larger values pull strokes toward `start`.
    pub skew: f64,
}

impl MeteorShower {
    pub fn new(
        name: &str,
        peak: usize,
        start: usize,
        end: usize,
        days_per_stroke: f64,
        skew: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            peak,
            start,
            end,
            days_per_stroke,
            skew,
        }
    }

    pub fn stroke_count(&self) -> usize {
        (self.end.saturating_sub(self.start) as f64 / self.days_per_stroke) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Zero-based day indices of total lunar eclipses.
    pub lunar_eclipse_days: Vec<usize>,
    pub meteor_showers: Vec<MeteorShower>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            // 2025-09-07
            lunar_eclipse_days: vec![250],
            meteor_showers: vec![
                MeteorShower::new("Quadrantids", 3, 1, 12, 1.2, 1.8),
                MeteorShower::new("Perseids", 224, 198, 236, 2.5, 1.2),
                MeteorShower::new("Geminids", 348, 338, 354, 2.0, 1.3),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub kind: ChartKind,
    /// Font family for the title block.
    pub title_font: String,
    /// `#rrggbb` override for the page background.
    pub background: Option<String>,
    /// Draw text labels. Off for hosts without any system font.
    pub show_text: bool,
    /// Seed for meteor-shower stroke placement.
    pub seed: u64,
    pub png: bool,
    pub svg: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 2400,
            height: 2600,
            kind: ChartKind::Full,
            title_font: "serif".to_string(),
            background: None,
            show_text: true,
            seed: 2025,
            png: true,
            svg: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub year: i32,
    pub output_dir: PathBuf,
    pub cities: Vec<Location>,
    pub render: RenderConfig,
    pub annotations: AnnotationConfig,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            year: 2025,
            output_dir: PathBuf::from("results"),
            cities: default_cities(),
            render: RenderConfig::default(),
            annotations: AnnotationConfig::default(),
        }
    }
}

pub fn default_cities() -> Vec<Location> {
    const IST: &str = "Asia/Kolkata";
    [
        ("Delhi", 28.5909, 77.2183),
        ("Mumbai", 19.2066, 72.9081),
        ("Bangalore", 12.9774, 77.5950),
        ("Kolkata", 22.5684, 88.3413),
        ("Pune", 18.4914, 73.8371),
        ("Hyderabad", 17.4399, 78.4302),
        ("Chennai", 13.0507, 80.2512),
        ("Lucknow", 26.8520, 80.97136),
        ("Chandigarh", 30.7469, 76.7828),
        ("Jaipur", 26.9047, 75.8094),
        ("Ahmedabad", 23.0169, 72.5736),
        ("Nagpur", 21.1542, 79.0821),
        ("Vizag", 17.7219, 83.3057),
    ]
    .iter()
    .map(|&(name, lat, lon)| Location::new(name, lat, lon, IST))
    .collect()
}

impl CalendarConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CalendarConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CalendarError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn city(&self, name: &str) -> Option<&Location> {
        self.cities.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=9999).contains(&self.year) {
            return Err(CalendarError::Config(format!(
                "year {} out of range 1..=9999",
                self.year
            )));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(CalendarError::Config(
                "render.width and render.height must be greater than 0".into(),
            ));
        }
        if let Some(hex) = &self.render.background {
            crate::render::style::parse_hex_color(hex)?;
        }
        for city in &self.cities {
            validate_location(city)?;
        }
        let days = crate::calendar::days_in_year(self.year);
        for &day in &self.annotations.lunar_eclipse_days {
            if day >= days {
                return Err(CalendarError::Config(format!(
                    "lunar eclipse day {day} outside year of {days} days"
                )));
            }
        }
        for shower in &self.annotations.meteor_showers {
            if !(shower.start <= shower.peak && shower.peak <= shower.end) {
                return Err(CalendarError::Config(format!(
                    "meteor shower {} must satisfy start <= peak <= end",
                    shower.name
                )));
            }
            if shower.end >= days {
                return Err(CalendarError::Config(format!(
                    "meteor shower {} ends after the last day of the year",
                    shower.name
                )));
            }
            if !(shower.days_per_stroke >= MIN_DAYS_PER_STROKE && shower.skew > 0.0) {
                return Err(CalendarError::Config(format!(
                    "meteor shower {} needs days_per_stroke >= {MIN_DAYS_PER_STROKE} and positive skew",
                    shower.name
                )));
            }
        }
        Ok(())
    }
}

pub fn validate_location(location: &Location) -> Result<()> {
    if !(-90.0..=90.0).contains(&location.latitude) {
        return Err(CalendarError::Config(format!(
            "{}: latitude {} outside [-90, 90]",
            location.name, location.latitude
        )));
    }
    if !(-180.0..=180.0).contains(&location.longitude) {
        return Err(CalendarError::Config(format!(
            "{}: longitude {} outside [-180, 180]",
            location.name, location.longitude
        )));
    }
    Observer::from_location(location).map(|_| ())
}
