use plotters::style::RGBColor;

use crate::error::{CalendarError, Result};

/// `#rrggbb` or `rrggbb`.
pub fn parse_hex_color(hex: &str) -> Result<RGBColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(CalendarError::Config(format!("bad color '{hex}'")));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| CalendarError::Config(format!("bad color '{hex}'")))
    };
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Fill color plus opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub color: RGBColor,
    pub alpha: f64,
}

impl Layer {
    const fn new(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self {
            color: RGBColor(r, g, b),
            alpha,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: RGBColor,
    pub night: Layer,
    pub day: Layer,
    pub civil: Layer,
    pub nautical: Layer,
    pub astronomical: Layer,
    pub noon: Layer,
    pub hour_tick: Layer,
    pub month_line: RGBColor,
    pub month_label: RGBColor,
    pub week_label: RGBColor,
    pub hour_label: RGBColor,
    pub title: RGBColor,
    pub full_moon: RGBColor,
    pub eclipse: RGBColor,
    pub eclipse_halo: Layer,
    pub meteor: RGBColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: RGBColor(0xfa, 0xf0, 0xe6),
            night: Layer::new(0x01, 0x1f, 0x26, 1.0),
            day: Layer::new(0xfb, 0xba, 0x43, 1.0),
            civil: Layer::new(0x1c, 0x5c, 0x7c, 0.85),
            nautical: Layer::new(0x0a, 0x3f, 0x4d, 0.7),
            astronomical: Layer::new(0x09, 0x2a, 0x38, 0.8),
            noon: Layer::new(0xff, 0xfa, 0xcd, 0.05),
            hour_tick: Layer::new(0x80, 0x80, 0x80, 0.4),
            month_line: RGBColor(0x02, 0x73, 0x5e),
            month_label: RGBColor(0x2f, 0x4f, 0x4f),
            week_label: RGBColor(0x69, 0x69, 0x69),
            hour_label: RGBColor(0xe7, 0xfd, 0xeb),
            title: RGBColor(0, 0, 0),
            full_moon: RGBColor(0xa1, 0xa2, 0xa6),
            eclipse: RGBColor(0, 0, 0),
            eclipse_halo: Layer::new(0xff, 0xff, 0xff, 0.7),
            meteor: RGBColor(0xff, 0xff, 0xff),
        }
    }
}
