//! Figure composition.
//!
//! A `Figure` owns the canvas layout and a map projection. Each draw call
//! renders into its own transparent layer tagged with a z order; `render`
//! composites the layers over a white background (ties keep draw order)
//! and adds the frame, graticule labels, title and colorbar on top.

use std::path::Path;

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use plot_common::{BoundingBox, Field2D, GeoPolygon, LatLonGrid};
use projection::{
    default_meridians, default_parallels, meridian_lines, parallel_lines, CylindricalEquidistant,
    PlotRect,
};
use tiny_skia::{FillRule, LineCap, Mask, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::barbs::{render_barbs, BarbConfig, WindBarb};
use crate::colorbar::Colorbar;
use crate::colormap::{Color, Colormap, Normalize};
use crate::contour::{render_contour_lines, ContourConfig};
use crate::error::{RenderError, RenderResult};
use crate::filled::{render_filled_contours, FilledContourConfig};
use crate::patches::render_patches;
use crate::png::create_png_auto;
use crate::text::{Anchor, HAlign, TextRenderer, VAlign};

pub const ZORDER_FILL: i32 = 1;
pub const ZORDER_LINES: i32 = 2;

/// Canvas size and the rectangles reserved for the map and colorbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureLayout {
    pub width: u32,
    pub height: u32,
    pub map: PlotRect,
    pub colorbar: PlotRect,
    pub title_size: f32,
    pub label_size: f32,
}

impl Default for FigureLayout {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 560,
            map: PlotRect::new(80.0, 70.0, 720.0, 360.0),
            colorbar: PlotRect::new(850.0, 70.0, 20.0, 360.0),
            title_size: 16.0,
            label_size: 11.0,
        }
    }
}

/// Parallels and meridians and how they are labelled.
#[derive(Debug, Clone, PartialEq)]
pub struct GraticuleStyle {
    pub parallels: Vec<f64>,
    pub meridians: Vec<f64>,
    pub color: Color,
    pub line_width: f32,
    /// Label parallels on the left edge
    pub label_parallels: bool,
    /// Label meridians along the bottom edge
    pub label_meridians: bool,
    /// Counter-clockwise rotation of meridian labels in degrees
    pub meridian_label_rotation: f32,
}

impl Default for GraticuleStyle {
    fn default() -> Self {
        Self {
            parallels: default_parallels(),
            meridians: default_meridians(),
            color: Color::BLUE,
            line_width: 1.0,
            label_parallels: true,
            label_meridians: true,
            meridian_label_rotation: 45.0,
        }
    }
}

#[derive(Debug, Clone)]
enum TextItem {
    Plain {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        anchor: Anchor,
    },
    Rotated {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        degrees: f32,
    },
}

pub struct Figure {
    layout: FigureLayout,
    proj: CylindricalEquidistant,
    layers: Vec<(i32, RgbaImage)>,
    texts: Vec<TextItem>,
    title: Option<String>,
    colorbar: Option<Colorbar>,
    text: TextRenderer,
}

impl Figure {
    pub fn new(layout: FigureLayout, extent: BoundingBox) -> RenderResult<Self> {
        if layout.width == 0 || layout.height == 0 {
            return Err(RenderError::InvalidSize {
                width: layout.width,
                height: layout.height,
            });
        }
        let proj = CylindricalEquidistant::new(extent, layout.map)?;
        Ok(Self {
            layout,
            proj,
            layers: Vec::new(),
            texts: Vec::new(),
            title: None,
            colorbar: None,
            text: TextRenderer::new()?,
        })
    }

    pub fn layout(&self) -> &FigureLayout {
        &self.layout
    }

    pub fn projection(&self) -> &CylindricalEquidistant {
        &self.proj
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_colorbar(&mut self, colorbar: Colorbar) {
        self.colorbar = Some(colorbar);
    }

    fn new_pixmap(&self) -> RenderResult<Pixmap> {
        Pixmap::new(self.layout.width, self.layout.height).ok_or(RenderError::InvalidSize {
            width: self.layout.width,
            height: self.layout.height,
        })
    }

    /// Mask that keeps vector drawing inside the map rectangle.
    fn map_clip(&self) -> Option<Mask> {
        let rect = self.layout.map;
        let mut mask = Mask::new(self.layout.width, self.layout.height)?;
        let clip = tiny_skia::Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        )?;
        mask.fill_path(
            &PathBuilder::from_rect(clip),
            FillRule::Winding,
            false,
            Transform::identity(),
        );
        Some(mask)
    }

    fn push_layer(&mut self, zorder: i32, layer: RgbaImage) {
        self.layers.push((zorder, layer));
    }

    /// Filled contours of a lat/lon field. Returns pixels painted.
    pub fn draw_filled_contours(
        &mut self,
        grid: &LatLonGrid,
        field: &Field2D,
        config: &FilledContourConfig,
    ) -> RenderResult<usize> {
        let mut layer = RgbaImage::new(self.layout.width, self.layout.height);
        let painted = render_filled_contours(&mut layer, grid, field, &self.proj, config)?;
        self.push_layer(ZORDER_FILL, layer);
        Ok(painted)
    }

    /// Contour lines of a lat/lon field with optional rotated labels.
    /// Returns the number of labels placed.
    pub fn draw_contour_lines(
        &mut self,
        grid: &LatLonGrid,
        field: &Field2D,
        config: &ContourConfig,
    ) -> RenderResult<usize> {
        let mut pixmap = self.new_pixmap()?;
        let clip = self.map_clip();
        let labels = render_contour_lines(&mut pixmap, grid, field, &self.proj, config, clip.as_ref());
        self.push_layer(ZORDER_LINES, pixmap_to_image(&pixmap));

        let placed = labels.len();
        self.texts.extend(labels.into_iter().map(|l| TextItem::Rotated {
            text: l.text,
            x: l.x,
            y: l.y,
            size: config.label_font_size,
            color: l.color,
            degrees: l.angle,
        }));
        Ok(placed)
    }

    /// Wind barbs at canvas positions. Returns the number drawn.
    pub fn draw_barbs(&mut self, barbs: &[WindBarb], config: &BarbConfig) -> RenderResult<usize> {
        let mut pixmap = self.new_pixmap()?;
        let clip = self.map_clip();
        let drawn = render_barbs(&mut pixmap, barbs, config, clip.as_ref());
        self.push_layer(ZORDER_LINES, pixmap_to_image(&pixmap));
        Ok(drawn)
    }

    /// Mesh cell polygons colored by `values`. Returns the number filled.
    pub fn draw_patches(
        &mut self,
        patches: &[GeoPolygon],
        values: &[f32],
        colormap: &Colormap,
        norm: &Normalize,
    ) -> RenderResult<usize> {
        let mut pixmap = self.new_pixmap()?;
        let clip = self.map_clip();
        let filled = render_patches(
            &mut pixmap,
            patches,
            values,
            &self.proj,
            colormap,
            norm,
            clip.as_ref(),
        );
        self.push_layer(ZORDER_FILL, pixmap_to_image(&pixmap));
        Ok(filled)
    }

    /// Parallels and meridians with edge labels.
    pub fn draw_graticule(&mut self, style: &GraticuleStyle) -> RenderResult<()> {
        let mut pixmap = self.new_pixmap()?;
        let clip = self.map_clip();
        let extent = self.proj.extent;

        let mut paint = Paint::default();
        paint.set_color(style.color.to_skia());
        paint.anti_alias = true;
        let stroke = Stroke {
            width: style.line_width,
            line_cap: LineCap::Butt,
            ..Stroke::default()
        };

        let parallels = parallel_lines(&style.parallels, &extent, 2);
        let meridians = meridian_lines(&style.meridians, &extent, 2);
        for line in parallels.iter().chain(meridians.iter()) {
            let mut pb = PathBuilder::new();
            for (i, &(lon, lat)) in line.points.iter().enumerate() {
                let (x, y) = self.proj.to_pixel(lon, lat);
                if i == 0 {
                    pb.move_to(x as f32, y as f32);
                } else {
                    pb.line_to(x as f32, y as f32);
                }
            }
            if let Some(path) = pb.finish() {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), clip.as_ref());
            }
        }
        self.push_layer(ZORDER_LINES, pixmap_to_image(&pixmap));

        let size = self.layout.label_size;
        let map = self.layout.map;
        if style.label_parallels {
            for line in &parallels {
                let (_, y) = self.proj.to_pixel(extent.min_x, line.value);
                self.texts.push(TextItem::Plain {
                    text: line.label(),
                    x: (map.x - 4.0) as f32,
                    y: y as f32,
                    size,
                    color: Color::BLACK,
                    anchor: Anchor::new(HAlign::Right, VAlign::Middle),
                });
            }
        }
        if style.label_meridians {
            let (sin, cos) = style.meridian_label_rotation.to_radians().sin_cos();
            for line in &meridians {
                let (x, _) = self.proj.to_pixel(line.value, extent.min_y);
                let label = line.label();
                let (w, h) = self.text.measure(&label, size);
                // Half the rotated box height keeps the label clear of the frame
                let drop = (w as f32 * sin.abs() + h as f32 * cos.abs()) / 2.0;
                self.texts.push(TextItem::Rotated {
                    text: label,
                    x: x as f32,
                    y: map.bottom() as f32 + 4.0 + drop,
                    size,
                    color: Color::BLACK,
                    degrees: style.meridian_label_rotation,
                });
            }
        }
        Ok(())
    }

    /// Composite everything into a single image.
    pub fn render(&self) -> RgbaImage {
        let mut canvas =
            RgbaImage::from_pixel(self.layout.width, self.layout.height, Rgba([255, 255, 255, 255]));

        let mut order: Vec<usize> = (0..self.layers.len()).collect();
        order.sort_by_key(|&i| self.layers[i].0);
        for i in order {
            imageops::overlay(&mut canvas, &self.layers[i].1, 0, 0);
        }

        let map = self.layout.map;
        if map.width >= 1.0 && map.height >= 1.0 {
            draw_hollow_rect_mut(
                &mut canvas,
                Rect::at(map.x.round() as i32, map.y.round() as i32)
                    .of_size(map.width.round() as u32, map.height.round() as u32),
                Color::BLACK.to_rgba(),
            );
        }

        for item in &self.texts {
            match item {
                TextItem::Plain {
                    text,
                    x,
                    y,
                    size,
                    color,
                    anchor,
                } => self.text.draw(&mut canvas, text, *x, *y, *size, *color, *anchor),
                TextItem::Rotated {
                    text,
                    x,
                    y,
                    size,
                    color,
                    degrees,
                } => self
                    .text
                    .draw_rotated(&mut canvas, text, *x, *y, *size, *color, *degrees),
            }
        }

        if let Some(title) = &self.title {
            self.text.draw(
                &mut canvas,
                title,
                (map.x + map.width / 2.0) as f32,
                (map.y - 10.0) as f32,
                self.layout.title_size,
                Color::BLACK,
                Anchor::new(HAlign::Center, VAlign::Bottom),
            );
        }

        if let Some(colorbar) = &self.colorbar {
            colorbar.render(&mut canvas, &self.layout.colorbar, &self.text);
        }

        canvas
    }

    /// Render and encode as PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let image = self.render();
        create_png_auto(image.as_raw(), image.width() as usize, image.height() as usize)
    }

    /// Render, encode and write a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let png = self.encode_png()?;
        std::fs::write(path, &png)?;
        tracing::info!(path = %path.display(), bytes = png.len(), layers = self.layers.len(), "Saved figure");
        Ok(())
    }
}

/// Convert a premultiplied tiny-skia pixmap into a straight-alpha image.
pub fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        if src.alpha() == 0 {
            continue;
        }
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_canvas() {
        let layout = FigureLayout {
            width: 0,
            ..FigureLayout::default()
        };
        assert!(matches!(
            Figure::new(layout, BoundingBox::global()),
            Err(RenderError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_blank_render_is_white_with_frame() {
        let fig = Figure::new(FigureLayout::default(), BoundingBox::global()).unwrap();
        let img = fig.render();
        assert_eq!(img.dimensions(), (1000, 560));
        assert_eq!(img.get_pixel(5, 5), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(80, 200), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_pixmap_to_image_demultiplies() {
        let mut pixmap = Pixmap::new(2, 1).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(200, 100, 50, 128));
        let image = pixmap_to_image(&pixmap);
        let px = image.get_pixel(0, 0);
        assert_eq!(px[3], 128);
        assert!(px[0].abs_diff(200) <= 2);
        assert!(px[1].abs_diff(100) <= 2);
    }

    #[test]
    fn test_higher_zorder_wins() {
        let mut fig = Figure::new(FigureLayout::default(), BoundingBox::global()).unwrap();
        let red = RgbaImage::from_pixel(1000, 560, Rgba([255, 0, 0, 255]));
        let green = RgbaImage::from_pixel(1000, 560, Rgba([0, 255, 0, 255]));
        fig.push_layer(5, red);
        fig.push_layer(1, green);
        assert_eq!(fig.render().get_pixel(5, 5), &Rgba([255, 0, 0, 255]));
    }
}
