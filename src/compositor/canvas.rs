//! Private drawing surface for one render call.
//!
//! Shapes are painted with tiny_skia into a transparent overlay the size of
//! the source image. Label text is blended into the overlay as coverage, and
//! the overlay is finally composited source-over onto a copy of the source.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::bitmap::RectF;
use crate::color::Color;
use crate::source::pixmap_to_rgba_image;

/// A transparent layer the badge is painted into before compositing.
pub(crate) struct BadgeCanvas {
    pixmap: Pixmap,
}

impl BadgeCanvas {
    /// Creates a transparent canvas. Returns `None` for a zero-sized image.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    /// Fills the oval inscribed in `rect`.
    pub fn fill_oval(&mut self, rect: RectF, color: Color) {
        let Some(path) = oval_path(rect) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// Strokes the outline of the oval inscribed in `rect`, centered on the
    /// boundary so half the stroke falls outside the filled area.
    pub fn stroke_oval(&mut self, rect: RectF, color: Color, width: f32) {
        if width <= 0.0 {
            return;
        }
        let Some(path) = oval_path(rect) else {
            return;
        };
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
    }

    /// Converts the painted shapes into a straight-alpha image for text and
    /// compositing.
    pub fn into_layer(self) -> RgbaImage {
        pixmap_to_rgba_image(&self.pixmap)
    }
}

fn oval_path(rect: RectF) -> Option<resvg::tiny_skia::Path> {
    let rect = Rect::from_ltrb(rect.left, rect.top, rect.right, rect.bottom)?;
    PathBuilder::from_oval(rect)
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.red(), color.green(), color.blue(), color.alpha());
    paint.anti_alias = true;
    paint
}

// ============================================================================
// Text Coverage
// ============================================================================

/// Accumulated label coverage for one render, clipped to the image.
pub(crate) struct CoverageMask {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl CoverageMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize],
        }
    }

    /// Adds coverage at `(x, y)`, saturating at 1.0. Out of bounds is ignored.
    pub fn add(&mut self, x: i32, y: i32, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = (self.data[idx] + coverage).min(1.0);
    }

    /// Paints `color` over `layer` wherever coverage is non-zero.
    pub fn paint_onto(&self, layer: &mut RgbaImage, color: Color) {
        let [r, g, b, a] = color.to_rgba();
        for (pixel, &coverage) in layer.pixels_mut().zip(&self.data) {
            if coverage <= 0.0 {
                continue;
            }
            let alpha = (a as f32 * coverage).round() as u8;
            *pixel = alpha_blend(Rgba([r, g, b, alpha]), *pixel);
        }
    }
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites a source image onto a destination image at the specified position.
///
/// Uses standard alpha blending (source over destination). Fully transparent
/// source pixels leave the destination untouched.
pub(crate) fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        if src_pixel[3] == 0 {
            continue;
        }

        let dx = x + sx as i32;
        let dy = y + sy as i32;

        // Skip if outside destination bounds
        if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
            continue;
        }

        let dst_pixel = dest.get_pixel(dx as u32, dy as u32);
        let blended = alpha_blend(*src_pixel, *dst_pixel);
        dest.put_pixel(dx as u32, dy as u32, blended);
    }
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::from_rgb(255, 0, 0);
    const BLUE: Color = Color::from_rgb(0, 0, 255);

    #[test]
    fn fill_oval_paints_inside_only() {
        let mut canvas = BadgeCanvas::new(20, 20).unwrap();
        canvas.fill_oval(RectF::new(0.0, 0.0, 20.0, 20.0), RED);
        let layer = canvas.into_layer();

        assert_eq!(layer.get_pixel(10, 10).0, [255, 0, 0, 255]);
        // Corners of the bounding box lie outside the circle.
        assert_eq!(layer.get_pixel(0, 0).0[3], 0);
        assert_eq!(layer.get_pixel(19, 19).0[3], 0);
    }

    #[test]
    fn stroke_oval_leaves_center_empty() {
        let mut canvas = BadgeCanvas::new(40, 40).unwrap();
        canvas.stroke_oval(RectF::new(10.0, 10.0, 30.0, 30.0), BLUE, 4.0);
        let layer = canvas.into_layer();

        assert_eq!(layer.get_pixel(20, 20).0[3], 0);
        // The stroke straddles the boundary at x = 10.
        assert_eq!(layer.get_pixel(10, 20).0, [0, 0, 255, 255]);
    }

    #[test]
    fn degenerate_oval_is_skipped() {
        let mut canvas = BadgeCanvas::new(10, 10).unwrap();
        canvas.fill_oval(RectF::new(5.0, 5.0, 5.0, 9.0), RED);
        assert!(canvas.into_layer().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn zero_sized_canvas_is_none() {
        assert!(BadgeCanvas::new(0, 10).is_none());
    }

    #[test]
    fn composite_simple() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));

        composite_over(&mut dest, &src, 3, 3);

        assert_eq!(dest.get_pixel(5, 5).0, [0, 0, 255, 255]);
        assert_eq!(dest.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn composite_skips_transparent_pixels() {
        let mut dest = RgbaImage::from_pixel(4, 4, Rgba([12, 34, 56, 78]));
        let before = dest.clone();
        composite_over(&mut dest, &RgbaImage::new(4, 4), 0, 0);
        assert_eq!(dest, before);
    }

    #[test]
    fn composite_with_transparency() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 128]));

        composite_over(&mut dest, &src, 0, 0);

        let pixel = dest.get_pixel(0, 0);
        assert!(pixel[0] > 0, "Should have some red");
        assert!(pixel[2] > 0, "Should have some blue");
    }

    #[test]
    fn coverage_mask_saturates_and_clips() {
        let mut mask = CoverageMask::new(2, 2);
        mask.add(0, 0, 0.75);
        mask.add(0, 0, 0.75);
        mask.add(-1, 0, 1.0);
        mask.add(2, 2, 1.0);

        let mut layer = RgbaImage::new(2, 2);
        mask.paint_onto(&mut layer, Color::WHITE);
        assert_eq!(layer.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(layer.get_pixel(1, 1).0, [0, 0, 0, 0]);
    }
}
