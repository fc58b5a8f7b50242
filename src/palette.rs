// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::error::RainError;
use crate::runtime::{ColorMode, ColorScheme};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba {
            rgb: self,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// `self` composited at opacity `a` over `under`.
    pub fn over(self, under: Rgb, a: f64) -> Rgb {
        let a = a.clamp(0.0, 1.0);
        Rgb::new(
            lerp_u8(under.r, self.r, a),
            lerp_u8(under.g, self.g, a),
            lerp_u8(under.b, self.b, a),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f64,
}

/// Brightness tiers a glyph can be drawn in, brightest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Head,
    Glint,
    Mid,
    Dim,
    Base,
}

pub const GLINT_ALPHA_SCALE: f64 = 0.8;

impl Tier {
    /// The lead glyph is always `Head`; everything else is graded by the
    /// brightness draw `b`.
    pub fn pick(j: u32, b: f64) -> Tier {
        if j == 0 {
            Tier::Head
        } else if b > 0.98 {
            Tier::Glint
        } else if b > 0.95 {
            Tier::Mid
        } else if b > 0.80 {
            Tier::Dim
        } else {
            Tier::Base
        }
    }

    pub fn alpha_scale(self) -> f64 {
        match self {
            Tier::Glint => GLINT_ALPHA_SCALE,
            _ => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierPalette {
    pub head: Rgb,
    pub glint: Rgb,
    pub mid: Rgb,
    pub dim: Rgb,
    pub base: Rgb,
    pub background: Rgb,
}

impl TierPalette {
    pub fn color(&self, tier: Tier) -> Rgb {
        match tier {
            Tier::Head => self.head,
            Tier::Glint => self.glint,
            Tier::Mid => self.mid,
            Tier::Dim => self.dim,
            Tier::Base => self.base,
        }
    }

    pub fn for_scheme(scheme: ColorScheme) -> Self {
        let (head, glint, mid, dim, base) = match scheme {
            ColorScheme::Ice => (
                Rgb::new(0, 255, 255),
                Rgb::new(0, 255, 255),
                Rgb::new(0, 153, 204),
                Rgb::new(0, 102, 153),
                Rgb::new(0, 51, 102),
            ),
            ColorScheme::Green => (
                Rgb::new(200, 255, 200),
                Rgb::new(120, 255, 120),
                Rgb::new(0, 204, 68),
                Rgb::new(0, 140, 40),
                Rgb::new(0, 70, 20),
            ),
            ColorScheme::Amber => (
                Rgb::new(255, 230, 150),
                Rgb::new(255, 200, 60),
                Rgb::new(230, 150, 0),
                Rgb::new(160, 100, 0),
                Rgb::new(90, 50, 0),
            ),
            ColorScheme::Red => (
                Rgb::new(255, 200, 200),
                Rgb::new(255, 80, 80),
                Rgb::new(204, 0, 0),
                Rgb::new(140, 0, 0),
                Rgb::new(80, 0, 0),
            ),
            ColorScheme::Purple => (
                Rgb::new(240, 200, 255),
                Rgb::new(200, 120, 255),
                Rgb::new(150, 60, 220),
                Rgb::new(100, 30, 160),
                Rgb::new(50, 10, 90),
            ),
            ColorScheme::Mono => (
                Rgb::new(255, 255, 255),
                Rgb::new(230, 230, 230),
                Rgb::new(180, 180, 180),
                Rgb::new(120, 120, 120),
                Rgb::new(70, 70, 70),
            ),
        };
        Self {
            head,
            glint,
            mid,
            dim,
            base,
            background: Rgb::BLACK,
        }
    }
}

pub fn parse_color_scheme(s: &str) -> Result<ColorScheme, RainError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "ice" | "cyan" | "blue" => Ok(ColorScheme::Ice),
        "green" | "matrix" => Ok(ColorScheme::Green),
        "amber" | "gold" => Ok(ColorScheme::Amber),
        "red" => Ok(ColorScheme::Red),
        "purple" | "violet" => Ok(ColorScheme::Purple),
        "mono" | "gray" | "grey" => Ok(ColorScheme::Mono),
        _ => Err(RainError::ColorScheme(s.to_string())),
    }
}

fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let a = a as f64;
    let b = b as f64;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

fn dist2(a: Rgb, b: Rgb) -> i32 {
    let dr = (a.r as i32) - (b.r as i32);
    let dg = (a.g as i32) - (b.g as i32);
    let db = (a.b as i32) - (b.b as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(c: Rgb) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let r6 = ((c.r as u16 * 5) + 127) / 255;
    let g6 = ((c.g as u16 * 5) + 127) / 255;
    let b6 = ((c.b as u16 * 5) + 127) / 255;

    let cube = Rgb::new(
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);

    let avg = ((c.r as u16 + c.g as u16 + c.b as u16) / 3) as u8;
    let (gray_idx, gray) = if avg < 8 {
        (16, Rgb::BLACK)
    } else if avg > 238 {
        (231, Rgb::new(255, 255, 255))
    } else {
        let idx = 232 + ((avg - 8) / 10);
        let v = 8 + 10 * (idx - 232);
        (idx, Rgb::new(v, v, v))
    };

    if dist2(c, gray) < dist2(c, cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(c: Rgb) -> Color {
    const TABLE: [(Color, Rgb); 16] = [
        (Color::Black, Rgb::new(0, 0, 0)),
        (Color::DarkGrey, Rgb::new(128, 128, 128)),
        (Color::Grey, Rgb::new(192, 192, 192)),
        (Color::White, Rgb::new(255, 255, 255)),
        (Color::DarkRed, Rgb::new(128, 0, 0)),
        (Color::Red, Rgb::new(255, 0, 0)),
        (Color::DarkGreen, Rgb::new(0, 128, 0)),
        (Color::Green, Rgb::new(0, 255, 0)),
        (Color::DarkBlue, Rgb::new(0, 0, 128)),
        (Color::Blue, Rgb::new(0, 0, 255)),
        (Color::DarkCyan, Rgb::new(0, 128, 128)),
        (Color::Cyan, Rgb::new(0, 255, 255)),
        (Color::DarkMagenta, Rgb::new(128, 0, 128)),
        (Color::Magenta, Rgb::new(255, 0, 255)),
        (Color::DarkYellow, Rgb::new(128, 128, 0)),
        (Color::Yellow, Rgb::new(255, 255, 0)),
    ];

    let mut best = Color::White;
    let mut best_d = i32::MAX;
    for (color, rgb) in TABLE {
        let d = dist2(c, rgb);
        if d < best_d {
            best_d = d;
            best = color;
        }
    }
    best
}

/// Maps a composited colour onto what the terminal can show.
/// `None` means "terminal default".
pub fn terminal_color(mode: ColorMode, c: Rgb) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::TrueColor => Some(Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(c))),
        ColorMode::Color16 => Some(rgb_to_color16(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_tier_ignores_brightness_draw() {
        for b in [0.0, 0.5, 0.81, 0.96, 0.99] {
            assert_eq!(Tier::pick(0, b), Tier::Head);
        }
    }

    #[test]
    fn trail_tiers_follow_thresholds() {
        assert_eq!(Tier::pick(1, 0.99), Tier::Glint);
        assert_eq!(Tier::pick(1, 0.98), Tier::Mid);
        assert_eq!(Tier::pick(1, 0.96), Tier::Mid);
        assert_eq!(Tier::pick(1, 0.95), Tier::Dim);
        assert_eq!(Tier::pick(1, 0.81), Tier::Dim);
        assert_eq!(Tier::pick(1, 0.80), Tier::Base);
        assert_eq!(Tier::pick(3, 0.0), Tier::Base);
    }

    #[test]
    fn only_glint_is_scaled() {
        assert_eq!(Tier::Glint.alpha_scale(), 0.8);
        assert_eq!(Tier::Head.alpha_scale(), 1.0);
        assert_eq!(Tier::Base.alpha_scale(), 1.0);
    }

    #[test]
    fn ice_runs_from_cyan_to_dark_blue() {
        let p = TierPalette::for_scheme(ColorScheme::Ice);
        assert_eq!(p.color(Tier::Head), Rgb::new(0, 255, 255));
        assert_eq!(p.color(Tier::Mid), Rgb::new(0, 153, 204));
        assert_eq!(p.color(Tier::Dim), Rgb::new(0, 102, 153));
        assert_eq!(p.color(Tier::Base), Rgb::new(0, 51, 102));
        assert_eq!(p.background, Rgb::BLACK);
    }

    #[test]
    fn over_blends_toward_background() {
        let c = Rgb::new(0, 200, 100);
        assert_eq!(c.over(Rgb::BLACK, 1.0), c);
        assert_eq!(c.over(Rgb::BLACK, 0.0), Rgb::BLACK);
        assert_eq!(c.over(Rgb::BLACK, 0.5), Rgb::new(0, 100, 50));
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(parse_color_scheme("ICE").unwrap(), ColorScheme::Ice);
        assert_eq!(parse_color_scheme(" grey ").unwrap(), ColorScheme::Mono);
        assert!(parse_color_scheme("plaid").is_err());
    }

    #[test]
    fn ansi256_maps_primaries_into_cube() {
        assert_eq!(rgb_to_ansi256(Rgb::new(0, 255, 255)), 51);
        assert_eq!(rgb_to_ansi256(Rgb::BLACK), 16);
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 255, 255)), 231);
    }

    #[test]
    fn terminal_color_respects_mode() {
        let c = Rgb::new(0, 255, 255);
        assert_eq!(terminal_color(ColorMode::Mono, c), None);
        assert_eq!(
            terminal_color(ColorMode::TrueColor, c),
            Some(Color::Rgb { r: 0, g: 255, b: 255 })
        );
        assert_eq!(terminal_color(ColorMode::Color16, c), Some(Color::Cyan));
    }
}
