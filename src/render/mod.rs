//! Polar calendar rendering with `plotters`. One chart per city and year:
//! the day is a ring, the year goes once around clockwise from January at
//! 12 o'clock.

pub mod annotations;
pub mod polar;
pub mod style;

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::calendar::{month_boundaries, month_midpoints, MONTH_LABELS};
use crate::config::{AnnotationConfig, ChartKind, RenderConfig};
use crate::error::{CalendarError, Result};
use crate::moon::full_moon_days;
use crate::types::{Location, YearData};

use annotations::{hour_label, hour_ticks, meteor_strokes, week_markers};
use polar::{closed_radii, constant, day_angle, offset, thetas, PolarFrame};
use style::{parse_hex_color, Layer, Palette};

fn draw_err<E: std::fmt::Display>(e: E) -> CalendarError {
    CalendarError::Draw(e.to_string())
}

/// Radial window and tick layout of a chart kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub r_min: f64,
    pub r_max: f64,
    /// First tick, last tick and spacing, in hours.
    pub ticks: (f64, f64, f64),
    /// Last tick that gets a text label.
    pub last_labelled_tick: f64,
    /// Half thickness of an hour ring, in day fractions.
    pub tick_half_width: f64,
    /// Angle of the hour label column.
    pub hour_label_theta: f64,
    pub month_label_r: f64,
    pub week_label_r: f64,
}

impl ChartLayout {
    pub fn for_kind(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Full => Self {
                r_min: 0.0,
                r_max: 1.05,
                ticks: (1.0, 22.0, 3.0),
                last_labelled_tick: 22.0,
                tick_half_width: 0.0005,
                hour_label_theta: 75f64.to_radians(),
                month_label_r: 1.1,
                week_label_r: 1.02,
            },
            ChartKind::Dawn => Self {
                r_min: 4.0 / 24.0,
                r_max: 7.25 / 24.0,
                ticks: (4.0, 7.0, 0.25),
                last_labelled_tick: 6.75,
                tick_half_width: 0.0001,
                hour_label_theta: std::f64::consts::FRAC_PI_2,
                month_label_r: 7.25 / 24.0 + 0.006,
                week_label_r: 7.25 / 24.0 - 0.008,
            },
        }
    }
}

/// Everything a chart needs besides the backend.
pub struct Chart<'a> {
    pub data: &'a YearData,
    pub location: &'a Location,
    pub year: i32,
    pub config: &'a RenderConfig,
    pub annotations: &'a AnnotationConfig,
    pub palette: Palette,
}

impl<'a> Chart<'a> {
    pub fn new(
        data: &'a YearData,
        location: &'a Location,
        year: i32,
        config: &'a RenderConfig,
        annotations: &'a AnnotationConfig,
    ) -> Result<Self> {
        data.validate()?;
        let mut palette = Palette::default();
        if let Some(hex) = &config.background {
            palette.background = parse_hex_color(hex)?;
        }
        Ok(Self {
            data,
            location,
            year,
            config,
            annotations,
            palette,
        })
    }

    fn layout(&self) -> ChartLayout {
        ChartLayout::for_kind(self.config.kind)
    }

    /// Font size in pixels for a size given in points on a 24 inch wide
    /// sheet, scaled to the canvas width.
    fn pt(&self, points: f64) -> f64 {
        points * self.config.width as f64 / (24.0 * 72.0)
    }

    fn frame(&self) -> PolarFrame {
        let (w, h) = (self.config.width as f64, self.config.height as f64);
        let title_band = h * 0.14;
        let available = (w / 2.0).min((h - title_band) / 2.0);
        let layout = self.layout();
        PolarFrame::new(
            (w / 2.0, title_band + (h - title_band) / 2.0),
            available * 0.86,
            layout.r_min,
            layout.r_max,
        )
    }

    pub fn write_png(&self, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (self.config.width, self.config.height))
            .into_drawing_area();
        self.draw(&root)?;
        info!(path = %path.display(), "wrote chart");
        Ok(())
    }

    pub fn write_svg(&self, path: &Path) -> Result<()> {
        let root =
            SVGBackend::new(path, (self.config.width, self.config.height)).into_drawing_area();
        self.draw(&root)?;
        info!(path = %path.display(), "wrote chart");
        Ok(())
    }

    pub fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&self.palette.background).map_err(draw_err)?;
        let frame = self.frame();

        match self.config.kind {
            ChartKind::Full => self.draw_full_bands(root, &frame)?,
            ChartKind::Dawn => self.draw_dawn_bands(root, &frame)?,
        }
        self.draw_hour_rings(root, &frame)?;
        self.draw_month_lines(root, &frame)?;
        if self.config.kind == ChartKind::Full {
            self.draw_moon_markers(root, &frame)?;
            self.draw_meteor_showers(root, &frame)?;
        }
        if self.config.show_text {
            self.draw_labels(root, &frame)?;
            self.draw_title(root)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn fill_band<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &PolarFrame,
        inner: &[f64],
        outer: &[f64],
        layer: Layer,
    ) -> Result<()> {
        let angles = thetas(inner.len());
        let outline = frame.band(&angles, inner, outer);
        root.draw(&Polygon::new(outline, layer.color.mix(layer.alpha).filled()))
            .map_err(draw_err)
    }

    fn draw_full_bands<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &PolarFrame,
    ) -> Result<()> {
        let d = self.data;
        let p = &self.palette;
        let sunrise = closed_radii(&d.sunrise);
        let sunset = closed_radii(&d.sunset);
        let noon = closed_radii(&d.noon);
        let (civil_dawn, civil_dusk) = split(&d.civil);
        let (nautical_dawn, nautical_dusk) = split(&d.nautical);
        let (astro_dawn, astro_dusk) = split(&d.astro);
        let n = sunrise.len();

        self.fill_band(root, frame, &sunset, &constant(1.0, n), p.night)?;
        self.fill_band(root, frame, &constant(0.0, n), &sunrise, p.night)?;
        self.fill_band(root, frame, &sunrise, &sunset, p.day)?;

        self.fill_band(root, frame, &civil_dawn, &sunrise, p.civil)?;
        self.fill_band(root, frame, &sunset, &civil_dusk, p.civil)?;
        self.fill_band(root, frame, &nautical_dawn, &civil_dawn, p.nautical)?;
        self.fill_band(root, frame, &civil_dusk, &nautical_dusk, p.nautical)?;
        self.fill_band(root, frame, &astro_dawn, &nautical_dawn, p.astronomical)?;
        self.fill_band(root, frame, &nautical_dusk, &astro_dusk, p.astronomical)?;

        self.fill_band(root, frame, &offset(&noon, -0.002), &offset(&noon, 0.002), p.noon)
    }

    fn draw_dawn_bands<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &PolarFrame,
    ) -> Result<()> {
        let d = self.data;
        let p = &self.palette;
        let sunrise = closed_radii(&d.sunrise);
        let (civil_dawn, _) = split(&d.civil);
        let (nautical_dawn, _) = split(&d.nautical);
        let (astro_dawn, _) = split(&d.astro);
        let n = sunrise.len();

        self.fill_band(root, frame, &constant(0.0, n), &sunrise, p.night)?;
        self.fill_band(root, frame, &sunrise, &constant(frame.r_max - 0.005, n), p.day)?;
        self.fill_band(root, frame, &astro_dawn, &nautical_dawn, p.astronomical)?;
        self.fill_band(root, frame, &nautical_dawn, &civil_dawn, p.nautical)?;
        self.fill_band(root, frame, &civil_dawn, &sunrise, p.civil)
    }

    fn draw_hour_rings<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &PolarFrame,
    ) -> Result<()> {
        let layout = self.layout();
        let (first, last, step) = layout.ticks;
        let n = self.data.num_days() + 1;
        for tick in hour_ticks(first, last, step) {
            let r = tick / 24.0;
            self.fill_band(
                root,
                frame,
                &constant(r - layout.tick_half_width, n),
                &constant(r + layout.tick_half_width, n),
                self.palette.hour_tick,
            )?;
        }
        Ok(())
    }

    fn draw_month_lines<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &PolarFrame,
    ) -> Result<()> {
        let num_days = self.data.num_days();
        let style = ShapeStyle {
            color: self.palette.month_line.to_rgba(),
            filled: false,
            stroke_width: 1,
        };
        for boundary in month_boundaries(&self.data.days_in_month) {
            let theta = day_angle(boundary as f64, num_days);
            root.draw(&PathElement::new(
                frame.spoke(theta, frame.r_min, frame.r_max),
                style,
            ))
            .map_err(draw_err)?;
        }
        Ok(())
    }

    fn marker_radius_px(&self) -> u32 {
        (self.config.width as f64 * 0.003).round().max(2.0) as u32
    }

    fn draw_moon_markers<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &PolarFrame,
    ) -> Result<()> {
        let num_days = self.data.num_days();
        let radius = self.marker_radius_px();
        let full_moons = full_moon_days(&self.data.moon_phases);
        debug!(count = full_moons.len(), "full moon markers");
        for day in full_moons {
            let center = frame.project(day_angle(day as f64, num_days), 0.97);
            root.draw(&Circle::new(center, radius, self.palette.full_moon.filled()))
                .map_err(draw_err)?;
        }

        let halo = self.palette.eclipse_halo;
        for &day in &self.annotations.lunar_eclipse_days {
            let center = frame.project(day_angle(day as f64, num_days), 0.97);
            let halo_radius = radius + radius * 3 / 5;
            root.draw(&Circle::new(
                center,
                halo_radius,
                halo.color.mix(halo.alpha).filled(),
            ))
            .map_err(draw_err)?;
            root.draw(&Circle::new(center, radius, self.palette.eclipse.filled()))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_meteor_showers<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &PolarFrame,
    ) -> Result<()> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let num_days = self.data.num_days();
        for shower in &self.annotations.meteor_showers {
            let strokes = meteor_strokes(shower, num_days, &mut rng)?;
            debug!(shower = %shower.name, strokes = strokes.len(), "meteor shower");
            for stroke in strokes {
                let style = ShapeStyle {
                    color: self.palette.meteor.mix(stroke.alpha.min(1.0)),
                    filled: false,
                    stroke_width: stroke.width,
                };
                root.draw(&PathElement::new(
                    frame.spoke(stroke.theta, stroke.r0, stroke.r1),
                    style,
                ))
                .map_err(draw_err)?;
            }
        }
        Ok(())
    }

    fn draw_labels<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        frame: &PolarFrame,
    ) -> Result<()> {
        let layout = self.layout();
        let num_days = self.data.num_days();
        let centered = Pos::new(HPos::Center, VPos::Center);

        let month_font = FontDesc::new(FontFamily::SansSerif, self.pt(22.0), FontStyle::Bold)
            .color(&self.palette.month_label)
            .pos(centered);
        for (mid, label) in month_midpoints(&self.data.days_in_month)
            .into_iter()
            .zip(MONTH_LABELS)
        {
            let at = frame.project_unclamped(day_angle(mid, num_days), layout.month_label_r);
            root.draw(&Text::new(label.to_string(), at, month_font.clone()))
                .map_err(draw_err)?;
        }

        let week_size = match self.config.kind {
            ChartKind::Full => self.pt(16.0),
            ChartKind::Dawn => self.pt(14.0),
        };
        for marker in week_markers(self.year, &self.data.days_in_month, num_days) {
            let side = if marker.theta.sin() > 0.2 {
                HPos::Left
            } else if marker.theta.sin() < -0.2 {
                HPos::Right
            } else {
                HPos::Center
            };
            let font = FontDesc::new(FontFamily::SansSerif, week_size, FontStyle::Bold)
                .color(&self.palette.week_label)
                .pos(Pos::new(side, VPos::Center));
            let r = match self.config.kind {
                ChartKind::Full => layout.week_label_r + marker.radius_offset,
                ChartKind::Dawn => layout.week_label_r,
            };
            let at = frame.project_unclamped(marker.theta, r);
            root.draw(&Text::new(marker.label, at, font)).map_err(draw_err)?;
        }

        let hour_font = FontDesc::new(FontFamily::SansSerif, self.pt(9.0), FontStyle::Normal)
            .color(&self.palette.hour_label)
            .pos(Pos::new(HPos::Left, VPos::Center));
        let (first, last, step) = layout.ticks;
        for tick in hour_ticks(first, last, step)
            .into_iter()
            .filter(|&t| t <= layout.last_labelled_tick + 1e-9)
        {
            let at = frame.project(layout.hour_label_theta, tick / 24.0);
            root.draw(&Text::new(hour_label(tick), at, hour_font.clone()))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_title<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let centered = Pos::new(HPos::Center, VPos::Center);
        let (w, h) = (self.config.width as f64, self.config.height as f64);
        let x = (w / 2.0).round() as i32;
        let lines = [
            (self.year.to_string(), 48.0, FontStyle::Normal, 0.035),
            (self.location.name.clone(), 64.0, FontStyle::Bold, 0.080),
            (self.location.coordinates_label(), 20.0, FontStyle::Normal, 0.118),
        ];
        for (text, size, font_style, y_frac) in lines {
            let family = FontFamily::Name(&self.config.title_font);
            let font = FontDesc::new(family, self.pt(size), font_style)
                .color(&self.palette.title)
                .pos(centered);
            root.draw(&Text::new(text, (x, (h * y_frac).round() as i32), font))
                .map_err(draw_err)?;
        }
        Ok(())
    }
}

/// Splits `(dawn, dusk)` pairs into two closed radius series.
fn split(pairs: &[(f64, f64)]) -> (Vec<f64>, Vec<f64>) {
    let (dawn, dusk): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
    (closed_radii(&dawn), closed_radii(&dusk))
}

/// Renders the configured outputs into `dir` as `<stem>.png` / `<stem>.svg`
/// (`<stem>_dawn.*` for the dawn chart). Returns the files written.
pub fn render_files(chart: &Chart<'_>, dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| CalendarError::io(dir, e))?;
    let stem = match chart.config.kind {
        ChartKind::Full => chart.location.file_stem(),
        ChartKind::Dawn => format!("{}_dawn", chart.location.file_stem()),
    };
    let mut written = Vec::new();
    if chart.config.png {
        let path = dir.join(format!("{stem}.png"));
        chart.write_png(&path)?;
        written.push(path);
    }
    if chart.config.svg {
        let path = dir.join(format!("{stem}.svg"));
        chart.write_svg(&path)?;
        written.push(path);
    }
    Ok(written)
}
