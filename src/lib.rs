pub mod angles;
pub mod calendar;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod interpolate;
pub mod moon;
pub mod render;
pub mod series;
pub mod types;

pub use angles::{
    deg_to_rad, equation_of_time, hour_angle_for_depression, normalize_angle, rad_to_deg,
    solar_declination, transit_utc_hours, DEGREES_PER_HOUR, EARTH_AXIAL_TILT,
};

pub use calendar::{
    day_of_year, days_in_months, days_in_year, doy_to_month_day, leap_year, month_boundaries,
    month_day_for_index, month_midpoints, weekday_indices,
};

pub use config::{AnnotationConfig, CalendarConfig, ChartKind, MeteorShower, RenderConfig};

pub use ephemeris::{ApproximateEphemeris, Ephemeris, Observer, SpaEphemeris};

pub use error::{CalendarError, EphemerisError, FillError, Result};

pub use interpolate::{fill_circular, fill_linear, fill_pairs};

pub use moon::{full_moon_days, moon_phase, PHASE_PERIOD};

pub use render::{render_files, Chart};

pub use series::{fill_year, generate_year};

pub use types::{DayRecord, Horizon, Location, SunEvents, YearData, YearSeries};
