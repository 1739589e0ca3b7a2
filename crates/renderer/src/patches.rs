//! Per-cell polygon fills for unstructured meshes.

use plot_common::GeoPolygon;
use projection::CylindricalEquidistant;
use tiny_skia::{FillRule, Mask, Paint, PathBuilder, Pixmap, Transform};

use crate::colormap::{Colormap, Normalize};

/// Fill every patch with the color of its cell's value.
///
/// `values` is indexed by `GeoPolygon::cell`. Patches with a NaN value,
/// a cell index past the end of `values`, or fewer than three vertices
/// are skipped. No edges are drawn and antialiasing is off so that
/// neighbouring cells meet without seams. Returns the number filled.
pub fn render_patches(
    pixmap: &mut Pixmap,
    patches: &[GeoPolygon],
    values: &[f32],
    proj: &CylindricalEquidistant,
    colormap: &Colormap,
    norm: &Normalize,
    clip: Option<&Mask>,
) -> usize {
    let mut paint = Paint::default();
    paint.anti_alias = false;

    let mut filled = 0;
    for patch in patches {
        let Some(&value) = values.get(patch.cell) else {
            continue;
        };
        if value.is_nan() || patch.vertices.len() < 3 {
            continue;
        }

        let mut pb = PathBuilder::new();
        for (i, &(lon, lat)) in patch.vertices.iter().enumerate() {
            let (x, y) = proj.to_pixel(lon, lat);
            if i == 0 {
                pb.move_to(x as f32, y as f32);
            } else {
                pb.line_to(x as f32, y as f32);
            }
        }
        pb.close();
        let Some(path) = pb.finish() else {
            continue;
        };

        let color = colormap.sample(norm.apply(value as f64));
        paint.set_color(color.to_skia());
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), clip);
        filled += 1;
    }

    tracing::debug!(
        patches = patches.len(),
        filled,
        vmin = norm.vmin,
        vmax = norm.vmax,
        "Rendered mesh patches"
    );
    filled
}
