use std::path::Path;

use polar_calendar::config::*;
use polar_calendar::error::CalendarError;

// ── Defaults ──

#[test]
fn test_default_config() {
    let config = CalendarConfig::default();
    assert_eq!(config.year, 2025);
    assert_eq!(config.cities.len(), 13);
    assert_eq!(config.render.kind, ChartKind::Full);
    assert_eq!(config.render.width, 2400);
    assert_eq!(config.annotations.lunar_eclipse_days, vec![250]);
    assert_eq!(config.annotations.meteor_showers.len(), 3);
    config.validate().unwrap();
}

#[test]
fn test_city_lookup_case_insensitive() {
    let config = CalendarConfig::default();
    let vizag = config.city("vizag").unwrap();
    assert_eq!(vizag.name, "Vizag");
    assert_eq!(vizag.timezone, "Asia/Kolkata");
    assert!(config.city("Atlantis").is_none());
}

#[test]
fn test_stroke_count() {
    let perseids = MeteorShower::new("Perseids", 224, 198, 236, 2.5, 1.2);
    assert_eq!(perseids.stroke_count(), 15);
}

// ── TOML ──

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = CalendarConfig::from_toml_str(
        r#"
year = 2024

[render]
kind = "dawn"
show_text = false
"#,
    )
    .unwrap();
    assert_eq!(config.year, 2024);
    assert_eq!(config.render.kind, ChartKind::Dawn);
    assert!(!config.render.show_text);
    assert_eq!(config.render.height, 2600);
    assert_eq!(config.cities.len(), 13);
}

#[test]
fn test_toml_replaces_cities() {
    let config = CalendarConfig::from_toml_str(
        r#"
[[cities]]
name = "Tromso"
latitude = 69.6492
longitude = 18.9553
timezone = "Europe/Oslo"
"#,
    )
    .unwrap();
    assert_eq!(config.cities.len(), 1);
    assert_eq!(config.cities[0].name, "Tromso");
}

#[test]
fn test_sample_config_file_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/calendar.toml");
    let config = CalendarConfig::from_file(&path).unwrap();
    assert_eq!(config.year, 2025);
    assert!(config.city("Nagpur").is_some());
    assert_eq!(config.annotations.meteor_showers[1].name, "Perseids");
}

#[test]
fn test_missing_file_is_io_error() {
    let result = CalendarConfig::from_file(Path::new("/nonexistent/calendar.toml"));
    assert!(matches!(result, Err(CalendarError::Io { .. })));
}

#[test]
fn test_malformed_toml() {
    let result = CalendarConfig::from_toml_str("year = \"soon\"");
    assert!(matches!(result, Err(CalendarError::Toml(_))));
}

// ── Validation ──

fn assert_config_error(toml: &str) {
    let result = CalendarConfig::from_toml_str(toml);
    assert!(
        matches!(result, Err(CalendarError::Config(_))),
        "expected config error for {:?}, got {:?}",
        toml,
        result.map(|c| c.year)
    );
}

#[test]
fn test_rejects_out_of_range_year() {
    assert_config_error("year = 0");
}

#[test]
fn test_rejects_zero_canvas() {
    assert_config_error("[render]\nwidth = 0");
}

#[test]
fn test_rejects_bad_background() {
    assert_config_error("[render]\nbackground = \"#zzzzzz\"");
}

#[test]
fn test_rejects_bad_city() {
    assert_config_error(
        "[[cities]]\nname = \"X\"\nlatitude = 95.0\nlongitude = 0.0\ntimezone = \"UTC\"",
    );
    assert_config_error(
        "[[cities]]\nname = \"X\"\nlatitude = 10.0\nlongitude = 0.0\ntimezone = \"Nope/Nope\"",
    );
}

#[test]
fn test_rejects_eclipse_outside_year() {
    assert_config_error("[annotations]\nlunar_eclipse_days = [365]");
}

#[test]
fn test_rejects_misordered_shower() {
    assert_config_error(
        r#"
[[annotations.meteor_showers]]
name = "Backwards"
peak = 10
start = 20
end = 30
days_per_stroke = 1.0
skew = 1.0
"#,
    );
}

#[test]
fn test_rejects_non_positive_shower_params() {
    assert_config_error(
        r#"
[[annotations.meteor_showers]]
name = "Flat"
peak = 10
start = 5
end = 15
days_per_stroke = 0.0
skew = 1.0
"#,
    );
}

#[test]
fn test_rejects_vanishing_stroke_spacing() {
    assert_config_error(
        r#"
[[annotations.meteor_showers]]
name = "Storm"
peak = 10
start = 5
end = 15
days_per_stroke = 1e-12
skew = 1.0
"#,
    );
}

#[test]
fn test_accepts_minimum_stroke_spacing() {
    let config = CalendarConfig::from_toml_str(&format!(
        r#"
[[annotations.meteor_showers]]
name = "Storm"
peak = 10
start = 5
end = 15
days_per_stroke = {MIN_DAYS_PER_STROKE}
skew = 1.0
"#
    ))
    .unwrap();
    assert_eq!(config.annotations.meteor_showers[0].stroke_count(), 100);
}
