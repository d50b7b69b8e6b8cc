//! Closed-form solar geometry: Cooper declination, Spencer equation of
//! time, and hour angles for a given sun depression.

pub const EARTH_AXIAL_TILT: f64 = 23.45;
pub const DEGREES_PER_HOUR: f64 = 15.0;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

pub fn intermediate_angle_b(n: i32) -> f64 {
    deg_to_rad((n - 1) as f64 * (360.0 / 365.0))
}

/// Minutes.
pub fn equation_of_time(n: i32) -> f64 {
    let b = intermediate_angle_b(n);
    229.18
        * (0.000075
            + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.040849 * (2.0 * b).sin())
}

/// Hours to add to UTC to get local solar time.
pub fn utc_lst_correction(longitude: f64, eot: f64) -> f64 {
    (4.0 * longitude + eot) / 60.0
}

pub fn solar_declination(n: i32) -> f64 {
    EARTH_AXIAL_TILT * deg_to_rad(360.0 * ((284 + n) as f64 / 365.0)).sin()
}

/// Hour angle (degrees, positive) at which the sun's centre sits
/// `depression` degrees below the horizon. `None` when the sun stays above
/// (polar day) or below (polar night) that elevation all day.
pub fn hour_angle_for_depression(latitude: f64, declination: f64, depression: f64) -> Option<f64> {
    let lat_rad = deg_to_rad(latitude);
    let dec_rad = deg_to_rad(declination);
    let alt_rad = deg_to_rad(-depression);
    let cos_h =
        (alt_rad.sin() - lat_rad.sin() * dec_rad.sin()) / (lat_rad.cos() * dec_rad.cos());
    if !cos_h.is_finite() || cos_h.abs() > 1.0 {
        return None;
    }
    Some(rad_to_deg(cos_h.acos()))
}

/// Solar transit in UTC hours for day `n`.
pub fn transit_utc_hours(longitude: f64, n: i32) -> f64 {
    12.0 - utc_lst_correction(longitude, equation_of_time(n))
}
