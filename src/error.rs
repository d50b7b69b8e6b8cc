use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::Horizon;

/// Failures of a single ephemeris query. These never abort a run: the
/// generator logs them and records the affected values as missing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EphemerisError {
    #[error("solver failed for {date}: {message}")]
    Solver { date: NaiveDate, message: String },

    #[error("sun never reaches the {horizon} horizon on {date}")]
    NoCrossing { date: NaiveDate, horizon: Horizon },

    #[error("local time is not representable in {tz} on {date}")]
    LocalTime { date: NaiveDate, tz: String },
}

/// Gap filling cannot proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FillError {
    #[error("series '{series}' has no valid values to interpolate from")]
    NoAnchors { series: String },

    #[error("period must be positive and finite, got {0}")]
    InvalidPeriod(String),
}

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed year data: {0}")]
    YearData(String),

    #[error(transparent)]
    Fill(#[from] FillError),

    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),

    #[error("drawing failed: {0}")]
    Draw(String),
}

impl CalendarError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CalendarError> = std::result::Result<T, E>;
