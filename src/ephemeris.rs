//! Ephemeris providers. A provider answers one question per call: when
//! does the sun cross a given horizon on a given local date, and how old
//! is the moon. Failures are per call and never abort a year.

use chrono::{DateTime, Datelike, NaiveDate, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use solar_positioning::time::DeltaT;
use solar_positioning::{spa, Horizon as SpaHorizon, SunriseResult};

use crate::angles::{
    hour_angle_for_depression, solar_declination, transit_utc_hours, DEGREES_PER_HOUR,
};
use crate::error::{CalendarError, EphemerisError};
use crate::moon;
use crate::types::{Horizon, Location, SunEvents};

/// Resolved location: coordinates plus a parsed timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
    pub tz: Tz,
}

impl Observer {
    pub fn from_location(location: &Location) -> Result<Self, CalendarError> {
        let tz: Tz = location.timezone.parse().map_err(|e| {
            CalendarError::Config(format!(
                "unknown timezone '{}' for {}: {e}",
                location.timezone, location.name
            ))
        })?;
        Ok(Self {
            latitude: location.latitude,
            longitude: location.longitude,
            tz,
        })
    }

    /// Local noon of `date`, as UTC.
    pub fn local_noon_utc(&self, date: NaiveDate) -> Result<DateTime<Utc>, EphemerisError> {
        date.and_hms_opt(12, 0, 0)
            .and_then(|naive| self.tz.from_local_datetime(&naive).earliest())
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| EphemerisError::LocalTime {
                date,
                tz: self.tz.name().to_string(),
            })
    }

    /// Offset of local clock time from UTC on `date`, in hours.
    pub fn utc_offset_hours(&self, date: NaiveDate) -> Result<f64, EphemerisError> {
        let noon = self.local_noon_utc(date)?;
        let offset = self.tz.offset_from_utc_datetime(&noon.naive_utc()).fix();
        Ok(offset.local_minus_utc() as f64 / 3600.0)
    }
}

pub trait Ephemeris {
    fn sun_events(
        &self,
        observer: &Observer,
        date: NaiveDate,
        horizon: Horizon,
    ) -> Result<SunEvents, EphemerisError>;

    /// Moon age in days, `[0, 28)`.
    fn moon_phase(&self, date: NaiveDate) -> Result<f64, EphemerisError> {
        Ok(moon::moon_phase(date))
    }
}

/// `hour + minute / 60` of a local timestamp; seconds are dropped.
pub fn local_hours<Tz2: TimeZone>(dt: &DateTime<Tz2>) -> f64 {
    dt.hour() as f64 + dt.minute() as f64 / 60.0
}

/// Same truncation for fractional hours, wrapped onto the clock face.
pub fn clock_hours(hours: f64) -> f64 {
    let wrapped = hours.rem_euclid(24.0);
    (wrapped * 60.0).floor() / 60.0
}

/// NREL SPA via the `solar-positioning` crate, ΔT estimated per month.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaEphemeris;

impl SpaEphemeris {
    fn spa_horizon(horizon: Horizon) -> SpaHorizon {
        match horizon {
            Horizon::Sunrise => SpaHorizon::SunriseSunset,
            Horizon::Civil => SpaHorizon::CivilTwilight,
            Horizon::Nautical => SpaHorizon::NauticalTwilight,
            Horizon::Astronomical => SpaHorizon::AstronomicalTwilight,
        }
    }
}

impl Ephemeris for SpaEphemeris {
    fn sun_events(
        &self,
        observer: &Observer,
        date: NaiveDate,
        horizon: Horizon,
    ) -> Result<SunEvents, EphemerisError> {
        let solver = |e: &dyn std::fmt::Display| EphemerisError::Solver {
            date,
            message: e.to_string(),
        };
        let anchor = observer.local_noon_utc(date)?;
        let delta_t = DeltaT::estimate_from_date(date.year(), date.month())
            .map_err(|e| solver(&e))?;
        let result = spa::sunrise_sunset_for_horizon(
            anchor,
            observer.latitude,
            observer.longitude,
            delta_t,
            Self::spa_horizon(horizon),
        )
        .map_err(|e| solver(&e))?;

        match result {
            SunriseResult::RegularDay {
                sunrise,
                transit,
                sunset,
            } => Ok(SunEvents {
                rise: local_hours(&sunrise.with_timezone(&observer.tz)),
                transit: local_hours(&transit.with_timezone(&observer.tz)),
                set: local_hours(&sunset.with_timezone(&observer.tz)),
            }),
            _ => Err(EphemerisError::NoCrossing { date, horizon }),
        }
    }
}

/// Closed-form provider built on [`crate::angles`]. Good to a few minutes
/// at low latitudes; needs no ΔT table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateEphemeris;

impl Ephemeris for ApproximateEphemeris {
    fn sun_events(
        &self,
        observer: &Observer,
        date: NaiveDate,
        horizon: Horizon,
    ) -> Result<SunEvents, EphemerisError> {
        let n = date.ordinal() as i32;
        let declination = solar_declination(n);
        let hour_angle =
            hour_angle_for_depression(observer.latitude, declination, horizon.depression_deg())
                .ok_or(EphemerisError::NoCrossing { date, horizon })?;
        let half_span = hour_angle / DEGREES_PER_HOUR;
        let transit = transit_utc_hours(observer.longitude, n) + observer.utc_offset_hours(date)?;
        Ok(SunEvents {
            rise: clock_hours(transit - half_span),
            transit: clock_hours(transit),
            set: clock_hours(transit + half_span),
        })
    }
}
