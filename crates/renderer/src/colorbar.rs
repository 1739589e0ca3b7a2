//! Vertical colorbar drawn to the right of the map.
//!
//! Discrete bars mirror a filled contour plot (one block per band, with
//! triangles for extended sides); continuous bars show a colormap ramp
//! over a normalized range.

use image::RgbaImage;
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_polygon_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use projection::PlotRect;

use crate::colormap::{Color, Colormap, Normalize};
use crate::filled::FilledContourConfig;
use crate::text::{Anchor, HAlign, TextRenderer, VAlign};

/// Extension triangle height as a fraction of the bar length.
const EXTEND_FRAC: f64 = 0.05;
const TICK_LENGTH: f32 = 4.0;

#[derive(Debug, Clone)]
pub enum ColorbarFill {
    Bands {
        levels: Vec<f64>,
        colors: Vec<Color>,
        under: Option<Color>,
        over: Option<Color>,
    },
    Continuous {
        colormap: Colormap,
        norm: Normalize,
    },
}

#[derive(Debug, Clone)]
pub struct Colorbar {
    pub fill: ColorbarFill,
    pub ticks: Vec<f64>,
    pub label: String,
    pub font_size: f32,
}

impl Colorbar {
    /// A discrete bar matching a filled contour plot.
    pub fn from_filled(config: &FilledContourConfig) -> Self {
        let levels = config.levels().to_vec();
        let ticks = nice_ticks(levels[0], levels[levels.len() - 1], 8);
        Self {
            fill: ColorbarFill::Bands {
                levels,
                colors: config.band_colors().to_vec(),
                under: config.under_color(),
                over: config.over_color(),
            },
            ticks,
            label: String::new(),
            font_size: 11.0,
        }
    }

    /// A continuous ramp over `norm`.
    pub fn continuous(colormap: Colormap, norm: Normalize) -> Self {
        Self {
            ticks: nice_ticks(norm.vmin, norm.vmax, 8),
            fill: ColorbarFill::Continuous { colormap, norm },
            label: String::new(),
            font_size: 11.0,
        }
    }

    pub fn with_ticks(mut self, ticks: Vec<f64>) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Data range covered by the bar.
    pub fn range(&self) -> (f64, f64) {
        match &self.fill {
            ColorbarFill::Bands { levels, .. } => (levels[0], levels[levels.len() - 1]),
            ColorbarFill::Continuous { norm, .. } => (norm.vmin, norm.vmax),
        }
    }

    /// Pixel row of a data value inside `rect`.
    fn value_to_y(&self, value: f64, rect: &PlotRect) -> f64 {
        let (lo, hi) = self.range();
        let t = Normalize::new(lo, hi).apply(value) as f64;
        rect.bottom() - t * rect.height
    }

    /// Ticks inside the bar's range.
    pub fn visible_ticks(&self) -> Vec<f64> {
        let (lo, hi) = self.range();
        let eps = (hi - lo).abs() * 1e-9;
        self.ticks
            .iter()
            .copied()
            .filter(|&t| t >= lo - eps && t <= hi + eps)
            .collect()
    }

    pub fn render(&self, canvas: &mut RgbaImage, rect: &PlotRect, text: &TextRenderer) {
        let x0 = rect.x.round() as i32;
        let w = rect.width.round().max(1.0) as u32;

        match &self.fill {
            ColorbarFill::Bands {
                levels,
                colors,
                under,
                over,
            } => {
                for (band, color) in levels.windows(2).zip(colors) {
                    let top = self.value_to_y(band[1], rect).round() as i32;
                    let bottom = self.value_to_y(band[0], rect).round() as i32;
                    if bottom > top {
                        draw_filled_rect_mut(
                            canvas,
                            Rect::at(x0, top).of_size(w, (bottom - top) as u32),
                            color.to_rgba(),
                        );
                    }
                }
                let tri = (rect.height * EXTEND_FRAC) as f32;
                if let Some(color) = over {
                    draw_triangle(canvas, rect, rect.y as f32, -tri, *color);
                }
                if let Some(color) = under {
                    draw_triangle(canvas, rect, rect.bottom() as f32, tri, *color);
                }
            }
            ColorbarFill::Continuous { colormap, .. } => {
                let top = rect.y.round() as i32;
                let rows = rect.height.round().max(1.0) as i32;
                for i in 0..rows {
                    let t = 1.0 - (i as f32 + 0.5) / rows as f32;
                    draw_filled_rect_mut(
                        canvas,
                        Rect::at(x0, top + i).of_size(w, 1),
                        colormap.sample(t).to_rgba(),
                    );
                }
            }
        }

        draw_hollow_rect_mut(
            canvas,
            Rect::at(x0, rect.y.round() as i32).of_size(w, rect.height.round().max(1.0) as u32),
            Color::BLACK.to_rgba(),
        );

        let right = rect.right() as f32;
        let mut label_x = right + TICK_LENGTH;
        for tick in self.visible_ticks() {
            let y = self.value_to_y(tick, rect) as f32;
            draw_line_segment_mut(
                canvas,
                (right, y),
                (right + TICK_LENGTH, y),
                Color::BLACK.to_rgba(),
            );
            let label = format_tick(tick);
            let (tw, _) = text.measure(&label, self.font_size);
            label_x = label_x.max(right + TICK_LENGTH + 3.0 + tw as f32);
            text.draw(
                canvas,
                &label,
                right + TICK_LENGTH + 3.0,
                y,
                self.font_size,
                Color::BLACK,
                Anchor::new(HAlign::Left, VAlign::Middle),
            );
        }

        if !self.label.is_empty() {
            let (_, th) = text.measure(&self.label, self.font_size);
            text.draw_rotated(
                canvas,
                &self.label,
                label_x + 4.0 + th as f32 / 2.0,
                (rect.y + rect.height / 2.0) as f32,
                self.font_size,
                Color::BLACK,
                90.0,
            );
        }
    }
}

/// Triangle on the short edge at `base_y`, pointing away by `height`
/// (negative height points up).
fn draw_triangle(canvas: &mut RgbaImage, rect: &PlotRect, base_y: f32, height: f32, color: Color) {
    let left = rect.x.round() as i32;
    let right = rect.right().round() as i32;
    let base = base_y.round() as i32;
    let apex = Point::new((left + right) / 2, (base_y + height).round() as i32);
    if apex.y == base {
        return;
    }
    let points = [Point::new(left, base), Point::new(right, base), apex];
    draw_polygon_mut(canvas, &points, color.to_rgba());
}

/// Tick label text: integers without a fraction, others trimmed.
pub fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.3}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Round tick values spanning `[lo, hi]`, at most `max_ticks` of them.
///
/// Steps are 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() || hi <= lo || max_ticks < 2 {
        return if lo.is_finite() { vec![lo] } else { vec![] };
    }

    let raw = (hi - lo) / (max_ticks - 1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filled::Extend;

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 10.0, 6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(70.0, 100.0, 8), vec![70.0, 75.0, 80.0, 85.0, 90.0, 95.0, 100.0]);
        assert_eq!(nice_ticks(3.0, 3.0, 5), vec![3.0]);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(70.0), "70");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.125), "0.125");
        assert_eq!(format_tick(-4.0), "-4");
    }

    #[test]
    fn test_from_filled_keeps_extensions() {
        let config = FilledContourConfig::new(
            vec![0.0, 1.0, 2.0],
            Extend::Max,
            Colormap::plasma(),
        )
        .unwrap();
        let bar = Colorbar::from_filled(&config).with_ticks(vec![-1.0, 0.0, 1.0, 2.0]);
        let ColorbarFill::Bands { under, over, colors, .. } = &bar.fill else {
            panic!("expected bands");
        };
        assert!(under.is_none());
        assert!(over.is_some());
        assert_eq!(colors.len(), 2);
        assert_eq!(bar.visible_ticks(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_value_to_y() {
        let bar = Colorbar::continuous(Colormap::viridis(), Normalize::new(0.0, 10.0));
        let rect = PlotRect::new(0.0, 100.0, 20.0, 200.0);
        assert_eq!(bar.value_to_y(0.0, &rect), 300.0);
        assert_eq!(bar.value_to_y(10.0, &rect), 100.0);
        assert_eq!(bar.value_to_y(5.0, &rect), 200.0);
    }
}
