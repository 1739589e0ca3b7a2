//! Colors, colormaps and value normalization.
//!
//! Colormaps are piecewise-linear ramps over `[0, 1]`. `plasma` and
//! `viridis` are sampled at eleven stops; `gist_ncar` is built from its
//! per-channel segment tables so that the sharp transitions survive.

use crate::error::{RenderError, RenderResult};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse "#rrggbb" or "#rrggbbaa".
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// A named, piecewise-linear color ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    /// (position in [0, 1], color), sorted by position
    stops: Vec<(f32, Color)>,
    under: Option<Color>,
    over: Option<Color>,
}

/// Per-channel segment table: (x, value) pairs with x ascending in [0, 1].
type Segments<'a> = &'a [(f32, f32)];

impl Colormap {
    pub fn from_stops(name: &str, stops: Vec<(f32, Color)>) -> Self {
        Self {
            name: name.to_string(),
            stops,
            under: None,
            over: None,
        }
    }

    /// Build from matplotlib-style segment data, one table per channel.
    pub fn from_segments(name: &str, red: Segments, green: Segments, blue: Segments) -> Self {
        let mut xs: Vec<f32> = red
            .iter()
            .chain(green)
            .chain(blue)
            .map(|&(x, _)| x)
            .collect();
        xs.sort_by(f32::total_cmp);
        xs.dedup();

        let channel = |table: Segments, x: f32| -> u8 {
            let v = piecewise(table, x);
            (v * 255.0).round().clamp(0.0, 255.0) as u8
        };

        let stops = xs
            .into_iter()
            .map(|x| (x, Color::rgb(channel(red, x), channel(green, x), channel(blue, x))))
            .collect();

        Self::from_stops(name, stops)
    }

    /// Look a colormap up by its matplotlib name.
    pub fn by_name(name: &str) -> RenderResult<Self> {
        match name {
            "plasma" => Ok(Self::plasma()),
            "viridis" => Ok(Self::viridis()),
            "gist_ncar" => Ok(Self::gist_ncar()),
            other => Err(RenderError::UnknownColormap(other.to_string())),
        }
    }

    pub fn plasma() -> Self {
        Self::from_hex_stops(
            "plasma",
            &[
                "#0d0887", "#41049d", "#6a00a8", "#8f0da4", "#b12a90", "#cc4778", "#e16462",
                "#f2844b", "#fca636", "#fcce25", "#f0f921",
            ],
        )
    }

    pub fn viridis() -> Self {
        Self::from_hex_stops(
            "viridis",
            &[
                "#440154", "#482475", "#414487", "#355f8d", "#2a788e", "#21918c", "#22a884",
                "#44bf70", "#7ad151", "#bddf26", "#fde725",
            ],
        )
    }

    pub fn gist_ncar() -> Self {
        const RED: &[(f32, f32)] = &[
            (0.0, 0.0),
            (0.3098, 0.0),
            (0.3725, 0.3993),
            (0.4235, 0.5003),
            (0.5333, 1.0),
            (0.7922, 1.0),
            (0.8471, 0.6218),
            (0.8980, 0.9235),
            (1.0, 0.9961),
        ];
        const GREEN: &[(f32, f32)] = &[
            (0.0, 0.0),
            (0.0510, 0.3722),
            (0.1059, 0.0),
            (0.1569, 0.7202),
            (0.1608, 0.7537),
            (0.1647, 0.7752),
            (0.2157, 1.0),
            (0.2588, 0.9804),
            (0.2706, 0.9804),
            (0.3176, 1.0),
            (0.3686, 0.8081),
            (0.4275, 1.0),
            (0.5216, 1.0),
            (0.6314, 0.7292),
            (0.6863, 0.2796),
            (0.7451, 0.0),
            (0.7922, 0.0),
            (0.8431, 0.1753),
            (0.8980, 0.5),
            (1.0, 0.9725),
        ];
        const BLUE: &[(f32, f32)] = &[
            (0.0, 0.5020),
            (0.0510, 0.0222),
            (0.1098, 1.0),
            (0.2039, 1.0),
            (0.2627, 0.6145),
            (0.3216, 0.0),
            (0.4157, 0.0),
            (0.4745, 0.2342),
            (0.5333, 0.0),
            (0.5804, 0.0),
            (0.6314, 0.0549),
            (0.6902, 0.0),
            (0.7373, 0.0),
            (0.7922, 0.9738),
            (0.8000, 1.0),
            (0.8431, 1.0),
            (0.8980, 0.9341),
            (1.0, 0.9961),
        ];
        Self::from_segments("gist_ncar", RED, GREEN, BLUE)
    }

    fn from_hex_stops(name: &str, hexes: &[&str]) -> Self {
        let n = hexes.len().max(2) - 1;
        let stops = hexes
            .iter()
            .enumerate()
            .filter_map(|(i, hex)| Some((i as f32 / n as f32, Color::from_hex(hex)?)))
            .collect();
        Self::from_stops(name, stops)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color for a normalized value. Values are clamped to `[0, 1]`;
    /// NaN maps to transparent.
    pub fn sample(&self, t: f32) -> Color {
        if t.is_nan() || self.stops.is_empty() {
            return Color::transparent();
        }
        let t = t.clamp(0.0, 1.0);

        let upper = self.stops.partition_point(|&(x, _)| x < t);
        if upper == 0 {
            return self.stops[0].1;
        }
        if upper >= self.stops.len() {
            return self.stops[self.stops.len() - 1].1;
        }

        let (x0, c0) = self.stops[upper - 1];
        let (x1, c1) = self.stops[upper];
        let span = x1 - x0;
        if span <= f32::EPSILON {
            return c1;
        }
        interpolate_color(c0, c1, (t - x0) / span)
    }

    /// Color used below the normalized range (defaults to the low end).
    pub fn under_color(&self) -> Color {
        self.under.unwrap_or_else(|| self.sample(0.0))
    }

    /// Color used above the normalized range (defaults to the high end).
    pub fn over_color(&self) -> Color {
        self.over.unwrap_or_else(|| self.sample(1.0))
    }

    pub fn with_extremes(mut self, under: Option<Color>, over: Option<Color>) -> Self {
        self.under = under;
        self.over = over;
        self
    }
}

/// Evaluate a segment table at `x`.
fn piecewise(table: Segments, x: f32) -> f32 {
    match table {
        [] => 0.0,
        [(_, v)] => *v,
        _ => {
            let upper = table.partition_point(|&(tx, _)| tx < x);
            if upper == 0 {
                return table[0].1;
            }
            if upper >= table.len() {
                return table[table.len() - 1].1;
            }
            let (x0, v0) = table[upper - 1];
            let (x1, v1) = table[upper];
            if x1 - x0 <= f32::EPSILON {
                v1
            } else {
                v0 + (v1 - v0) * (x - x0) / (x1 - x0)
            }
        }
    }
}

/// Linear mapping of data values onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    /// Scale to the finite min/max of `values`. None when nothing is finite.
    pub fn autoscale(values: &[f32]) -> Option<Self> {
        plot_common::grid::min_max(values).map(|(lo, hi)| Self::new(lo as f64, hi as f64))
    }

    /// Normalized value, not clamped. A collapsed range maps to 0.
    pub fn apply(&self, value: f64) -> f32 {
        let range = self.vmax - self.vmin;
        if range == 0.0 {
            return 0.0;
        }
        ((value - self.vmin) / range) as f32
    }

    /// Data value at normalized position `t`.
    pub fn inverse(&self, t: f64) -> f64 {
        self.vmin + t * (self.vmax - self.vmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#0d0887"), Some(Color::rgb(13, 8, 135)));
        assert_eq!(Color::from_hex("ff000080"), Some(Color::new(255, 0, 0, 128)));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_interpolate_color_midpoint() {
        let c = interpolate_color(Color::BLACK, Color::WHITE, 0.5);
        assert_eq!(c, Color::rgb(128, 128, 128));
        assert_eq!(interpolate_color(Color::BLACK, Color::WHITE, 2.0), Color::WHITE);
    }

    #[test]
    fn test_piecewise_table() {
        let table = [(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)];
        assert_eq!(piecewise(&table, 0.25), 0.5);
        assert_eq!(piecewise(&table, 0.5), 1.0);
        assert_eq!(piecewise(&table, 1.0), 0.0);
    }

    #[test]
    fn test_normalize() {
        let norm = Normalize::new(70.0, 100.0);
        assert_eq!(norm.apply(70.0), 0.0);
        assert_eq!(norm.apply(85.0), 0.5);
        assert!(norm.apply(110.0) > 1.0);
        assert_eq!(norm.inverse(1.0), 100.0);
        assert_eq!(Normalize::new(5.0, 5.0).apply(7.0), 0.0);
    }
}
