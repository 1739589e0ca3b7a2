//! Text drawing with the embedded DejaVu Sans Mono font.

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use rusttype::{point, Font, Scale};

use crate::colormap::Color;
use crate::error::{RenderError, RenderResult};

/// Embedded font data - DejaVu Sans Mono (a clean, readable monospace font)
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Which point of the text box sits on the drawing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    pub h: HAlign,
    pub v: VAlign,
}

impl Anchor {
    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }

    pub const CENTER: Anchor = Anchor::new(HAlign::Center, VAlign::Middle);
}

pub struct TextRenderer {
    font: Font<'static>,
}

impl TextRenderer {
    pub fn new() -> RenderResult<Self> {
        let font = Font::try_from_bytes(FONT_DATA).ok_or(RenderError::Font)?;
        Ok(Self { font })
    }

    /// Width and height of `text` in pixels at `size`.
    pub fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        let scale = Scale::uniform(size);
        let v_metrics = self.font.v_metrics(scale);
        let width = self
            .font
            .layout(text, scale, point(0.0, v_metrics.ascent))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        let height = v_metrics.ascent - v_metrics.descent;
        (width.ceil() as u32, height.ceil() as u32)
    }

    /// Draw horizontal text with its `anchor` point at (x, y).
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        anchor: Anchor,
    ) {
        if text.is_empty() {
            return;
        }
        let (w, h) = self.measure(text, size);
        let left = match anchor.h {
            HAlign::Left => x,
            HAlign::Center => x - w as f32 / 2.0,
            HAlign::Right => x - w as f32,
        };
        let top = match anchor.v {
            VAlign::Top => y,
            VAlign::Middle => y - h as f32 / 2.0,
            VAlign::Bottom => y - h as f32,
        };
        draw_text_mut(
            canvas,
            color.to_rgba(),
            left.round() as i32,
            top.round() as i32,
            Scale::uniform(size),
            &self.font,
            text,
        );
    }

    /// Draw text centred on (x, y), rotated counter-clockwise by `degrees`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rotated(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        degrees: f32,
    ) {
        if text.is_empty() {
            return;
        }
        if degrees == 0.0 {
            self.draw(canvas, text, x, y, size, color, Anchor::CENTER);
            return;
        }

        let (w, h) = self.measure(text, size);
        let side = ((w * w + h * h) as f32).sqrt().ceil() as u32 + 4;

        // Glyph edges blend toward the text color, not black
        let mut buf = RgbaImage::from_pixel(side, side, Rgba([color.r, color.g, color.b, 0]));
        let c = side as f32 / 2.0;
        self.draw(&mut buf, text, c, c, size, color, Anchor::CENTER);

        // Image y points down, so a clockwise image rotation is negative here
        let rotated = rotate_about_center(
            &buf,
            -degrees.to_radians(),
            Interpolation::Bilinear,
            Rgba([color.r, color.g, color.b, 0]),
        );
        imageops::overlay(
            canvas,
            &rotated,
            (x - c).round() as i64,
            (y - c).round() as i64,
        );
    }
}
