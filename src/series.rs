use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::calendar::{dates_of_year, days_in_months};
use crate::ephemeris::{Ephemeris, Observer};
use crate::error::{CalendarError, Result};
use crate::interpolate::{fill_circular, fill_linear, fill_pairs, gap_count};
use crate::moon::PHASE_PERIOD;
use crate::types::{DayRecord, Horizon, Location, SunEvents, YearData, YearSeries};

/// Decimal places kept in the JSON output.
pub const OUTPUT_DECIMALS: i32 = 3;

fn query_sun<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    observer: &Observer,
    date: NaiveDate,
    horizon: Horizon,
) -> Option<SunEvents> {
    match ephemeris.sun_events(observer, date, horizon) {
        Ok(events) => Some(events),
        Err(err) => {
            warn!(%date, %horizon, error = %err, "ephemeris failed, interpolating later");
            None
        }
    }
}

fn day_record<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    observer: &Observer,
    day_index: usize,
    date: NaiveDate,
) -> DayRecord {
    let sun = query_sun(ephemeris, observer, date, Horizon::Sunrise);
    let civil = query_sun(ephemeris, observer, date, Horizon::Civil);
    let nautical = query_sun(ephemeris, observer, date, Horizon::Nautical);
    let astro = query_sun(ephemeris, observer, date, Horizon::Astronomical);
    let moon_phase = match ephemeris.moon_phase(date) {
        Ok(phase) => Some(phase),
        Err(err) => {
            warn!(%date, error = %err, "moon phase failed, interpolating later");
            None
        }
    };

    DayRecord {
        day_index,
        sunrise: sun.map(|e| e.rise),
        sunset: sun.map(|e| e.set),
        noon: sun.map(|e| e.transit),
        civil_dawn: civil.map(|e| e.rise),
        civil_dusk: civil.map(|e| e.set),
        nautical_dawn: nautical.map(|e| e.rise),
        nautical_dusk: nautical.map(|e| e.set),
        astro_dawn: astro.map(|e| e.rise),
        astro_dusk: astro.map(|e| e.set),
        moon_phase,
    }
}

/// Queries `ephemeris` for every day of `year`. Never fails on a bad day:
/// the affected values are left missing for [`fill_year`].
pub fn generate_year<E: Ephemeris + ?Sized>(
    location: &Location,
    year: i32,
    ephemeris: &E,
) -> Result<YearSeries> {
    let observer = Observer::from_location(location)?;
    info!(city = %location.name, year, "generating");

    let days: Vec<DayRecord> = dates_of_year(year)
        .enumerate()
        .map(|(i, date)| day_record(ephemeris, &observer, i, date))
        .collect();

    let series = YearSeries {
        location: location.clone(),
        year,
        days_in_month: days_in_months(year),
        days,
    };
    let missing = series.missing_count();
    if missing > 0 {
        info!(city = %location.name, missing, "values left for interpolation");
    }
    Ok(series)
}

fn pairs<D, K>(series: &YearSeries, dawn: D, dusk: K) -> Vec<(Option<f64>, Option<f64>)>
where
    D: Fn(&DayRecord) -> Option<f64>,
    K: Fn(&DayRecord) -> Option<f64>,
{
    series.days.iter().map(|d| (dawn(d), dusk(d))).collect()
}

/// Gap-fills every column. Moon phase wraps at 28; everything else is
/// filled linearly.
pub fn fill_year(series: &YearSeries) -> Result<YearData> {
    let linear = |name: &str, column: Vec<Option<f64>>| {
        debug!(series = name, gaps = gap_count(&column), "filling");
        fill_linear(name, &column)
    };

    let moon = series.column(|d| d.moon_phase);
    debug!(series = "moon_phases", gaps = gap_count(&moon), "filling");

    let civil = pairs(series, |d| d.civil_dawn, |d| d.civil_dusk);
    let nautical = pairs(series, |d| d.nautical_dawn, |d| d.nautical_dusk);
    let astro = pairs(series, |d| d.astro_dawn, |d| d.astro_dusk);

    Ok(YearData {
        sunrise: linear("sunrise", series.column(|d| d.sunrise))?,
        sunset: linear("sunset", series.column(|d| d.sunset))?,
        days_in_month: series.days_in_month.to_vec(),
        moon_phases: fill_circular("moon_phases", &moon, PHASE_PERIOD)?,
        noon: linear("noon", series.column(|d| d.noon))?,
        civil: fill_pairs("civil", &civil)?,
        nautical: fill_pairs("nautical", &nautical)?,
        astro: fill_pairs("astro", &astro)?,
    })
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

impl YearData {
    pub fn num_days(&self) -> usize {
        self.sunrise.len()
    }

    pub fn rounded(&self, decimals: i32) -> YearData {
        let flat = |v: &[f64]| v.iter().map(|x| round_to(*x, decimals)).collect();
        let pair = |v: &[(f64, f64)]| {
            v.iter()
                .map(|&(a, b)| (round_to(a, decimals), round_to(b, decimals)))
                .collect()
        };
        YearData {
            sunrise: flat(&self.sunrise),
            sunset: flat(&self.sunset),
            days_in_month: self.days_in_month.clone(),
            moon_phases: self
                .moon_phases
                .iter()
                .map(|&p| round_to(p, decimals) % PHASE_PERIOD)
                .collect(),
            noon: flat(&self.noon),
            civil: pair(&self.civil),
            nautical: pair(&self.nautical),
            astro: pair(&self.astro),
        }
    }

    /// Every series must hold one finite value per day of the month table.
    pub fn validate(&self) -> Result<()> {
        if self.days_in_month.len() != 12 {
            return Err(CalendarError::YearData(format!(
                "days_in_month has {} entries, expected 12",
                self.days_in_month.len()
            )));
        }
        let expected: usize = self.days_in_month.iter().map(|&d| d as usize).sum();
        let lengths = [
            ("sunrise", self.sunrise.len()),
            ("sunset", self.sunset.len()),
            ("moon_phases", self.moon_phases.len()),
            ("noon", self.noon.len()),
            ("civil", self.civil.len()),
            ("nautical", self.nautical.len()),
            ("astro", self.astro.len()),
        ];
        for (name, len) in lengths {
            if len != expected {
                return Err(CalendarError::YearData(format!(
                    "{name} has {len} entries, expected {expected}"
                )));
            }
        }

        let flat = self
            .sunrise
            .iter()
            .chain(&self.sunset)
            .chain(&self.moon_phases)
            .chain(&self.noon);
        let paired = self
            .civil
            .iter()
            .chain(&self.nautical)
            .chain(&self.astro)
            .flat_map(|(a, b)| [a, b]);
        if flat.chain(paired).any(|v| !v.is_finite()) {
            return Err(CalendarError::YearData("non-finite value".into()));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.rounded(OUTPUT_DECIMALS))?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: YearData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CalendarError::io(parent, e))?;
        }
        fs::write(path, self.to_json()?).map_err(|e| CalendarError::io(path, e))?;
        info!(path = %path.display(), "wrote year data");
        Ok(())
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CalendarError::io(path, e))?;
        Self::from_json(&content)
    }
}
