//! Badge label text: font faces, metrics and coverage rasterization.
//!
//! Text is rasterized to per-pixel coverage values in `0.0..=1.0`; the
//! compositor turns coverage into the text color's alpha.

use ab_glyph::{Font, FontArc, OutlineCurve, PxScale, ScaleFont};
use resvg::tiny_skia::{FillRule, Mask, PathBuilder, Transform};
use spleen_font::{PSF2Font, FONT_12X24};

use crate::bitmap::SizePx;
use crate::error::{BadgeError, Result};

/// Builtin font cell dimensions (Spleen 12x24).
const CELL_WIDTH: usize = 12;
const CELL_HEIGHT: usize = 24;
/// Rows above the baseline in a builtin cell.
const CELL_ASCENT: usize = 19;

/// Subsamples per axis when area-sampling builtin glyphs.
const SUPERSAMPLE: usize = 4;

// ============================================================================
// FontFace
// ============================================================================

/// The typeface used for the counter label.
#[derive(Debug, Clone, Default)]
pub enum FontFace {
    /// Builtin bitmap face, smoothed when scaled.
    #[default]
    Builtin,

    /// A TrueType/OpenType face supplied by the caller.
    Ttf(FontArc),
}

impl FontFace {
    /// Loads a TrueType/OpenType face from font file bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        FontArc::try_from_vec(bytes)
            .map(Self::Ttf)
            .map_err(|e| BadgeError::Font(e.to_string()))
    }

    /// Measures `text` at a font size of `px` pixels per em.
    pub fn metrics(&self, text: &str, px: f32) -> TextMetrics {
        match self {
            Self::Builtin => {
                let scale = px / CELL_HEIGHT as f32;
                TextMetrics {
                    width: text.chars().count() as f32 * CELL_WIDTH as f32 * scale,
                    ascent: CELL_ASCENT as f32 * scale,
                    descent: (CELL_HEIGHT - CELL_ASCENT) as f32 * scale,
                }
            }
            Self::Ttf(font) => {
                let scaled = font.as_scaled(em_scale(font, px));
                TextMetrics {
                    width: layout_ttf(font, text, px).1,
                    ascent: scaled.ascent(),
                    descent: -scaled.descent(),
                }
            }
        }
    }

    /// Rasterizes `text` with its left edge at `origin_x` and its baseline at
    /// `baseline_y`, calling `plot(x, y, coverage)` for every covered pixel
    /// inside `clip`. Work outside `clip` is skipped, so oversized labels cost
    /// no more than the clip area.
    ///
    /// A pixel may be reported more than once; callers accumulate.
    pub fn rasterize(
        &self,
        text: &str,
        px: f32,
        origin_x: f32,
        baseline_y: f32,
        clip: SizePx,
        mut plot: impl FnMut(i32, i32, f32),
    ) {
        match self {
            Self::Builtin => rasterize_builtin(text, px, origin_x, baseline_y, clip, &mut plot),
            Self::Ttf(font) => rasterize_ttf(font, text, px, origin_x, baseline_y, clip, &mut plot),
        }
    }
}

/// Horizontal and vertical extents of a run of text.
///
/// `ascent` and `descent` are both positive distances from the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl TextMetrics {
    /// Baseline that puts the middle of the ascent/descent span on `center_y`.
    pub fn centered_baseline(&self, center_y: f32) -> f32 {
        center_y + (self.ascent - self.descent) / 2.0
    }
}

// ============================================================================
// TrueType
// ============================================================================

/// Converts a pixels-per-em size to ab_glyph's height-based scale.
fn em_scale(font: &FontArc, px: f32) -> PxScale {
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(px * font.height_unscaled() / units_per_em)
}

/// Lays out glyphs left to right with kerning. Returns the glyph positions
/// and the total advance.
fn layout_ttf(font: &FontArc, text: &str, px: f32) -> (Vec<(ab_glyph::GlyphId, f32)>, f32) {
    let scaled = font.as_scaled(em_scale(font, px));
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret = 0.0f32;
    let mut previous = None;

    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        glyphs.push((id, caret));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    (glyphs, caret)
}

/// Fills the outlines of every glyph that touches `clip` into one coverage
/// mask the size of `clip`.
fn rasterize_ttf(
    font: &FontArc,
    text: &str,
    px: f32,
    origin_x: f32,
    baseline_y: f32,
    clip: SizePx,
    plot: &mut impl FnMut(i32, i32, f32),
) {
    let scaled = font.as_scaled(em_scale(font, px));
    let (h_scale, v_scale) = (scaled.h_scale_factor(), scaled.v_scale_factor());
    let (glyphs, _) = layout_ttf(font, text, px);
    let mut builder = PathBuilder::new();

    for (glyph_id, x) in glyphs {
        let Some(outline) = font.outline(glyph_id) else {
            continue;
        };
        let left = origin_x + x;
        // Font units are y-up.
        let to_px = |p: ab_glyph::Point| (left + p.x * h_scale, baseline_y - p.y * v_scale);

        let (ax, ay) = to_px(outline.bounds.min);
        let (bx, by) = to_px(outline.bounds.max);
        if ax.max(bx) < 0.0
            || ay.max(by) < 0.0
            || ax.min(bx) > clip.width as f32
            || ay.min(by) > clip.height as f32
        {
            continue;
        }
        append_outline(&mut builder, &outline.curves, to_px);
    }

    let Some(path) = builder.finish() else {
        return;
    };
    let Some(mut mask) = Mask::new(clip.width, clip.height) else {
        return;
    };
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());

    let width = clip.width as usize;
    for (index, &alpha) in mask.data().iter().enumerate() {
        if alpha > 0 {
            plot(
                (index % width) as i32,
                (index / width) as i32,
                alpha as f32 / 255.0,
            );
        }
    }
}

/// Appends one glyph's curves to `builder`, starting a new contour whenever a
/// curve does not continue from the previous one.
fn append_outline(
    builder: &mut PathBuilder,
    curves: &[OutlineCurve],
    to_px: impl Fn(ab_glyph::Point) -> (f32, f32),
) {
    let mut pen: Option<ab_glyph::Point> = None;

    for curve in curves {
        let (OutlineCurve::Line(start, _)
        | OutlineCurve::Quad(start, _, _)
        | OutlineCurve::Cubic(start, _, _, _)) = *curve;
        if pen != Some(start) {
            if pen.is_some() {
                builder.close();
            }
            let (x, y) = to_px(start);
            builder.move_to(x, y);
        }

        let end = match *curve {
            OutlineCurve::Line(_, end) => {
                let (x, y) = to_px(end);
                builder.line_to(x, y);
                end
            }
            OutlineCurve::Quad(_, control, end) => {
                let (cx, cy) = to_px(control);
                let (x, y) = to_px(end);
                builder.quad_to(cx, cy, x, y);
                end
            }
            OutlineCurve::Cubic(_, c1, c2, end) => {
                let (c1x, c1y) = to_px(c1);
                let (c2x, c2y) = to_px(c2);
                let (x, y) = to_px(end);
                builder.cubic_to(c1x, c1y, c2x, c2y, x, y);
                end
            }
        };
        pen = Some(end);
    }

    if pen.is_some() {
        builder.close();
    }
}

// ============================================================================
// Builtin
// ============================================================================

/// A decoded builtin glyph, row-major, `true` where ink is set.
type CellBitmap = [[bool; CELL_WIDTH]; CELL_HEIGHT];

/// Decodes one builtin glyph. Characters missing from the font come back blank.
fn builtin_glyph(ch: char) -> CellBitmap {
    let mut cell = [[false; CELL_WIDTH]; CELL_HEIGHT];
    let Ok(mut font) = PSF2Font::new(FONT_12X24) else {
        log::warn!("builtin font failed to load");
        return cell;
    };
    let mut utf8 = [0u8; 4];

    if let Some(glyph) = font.glyph_for_utf8(ch.encode_utf8(&mut utf8).as_bytes()) {
        for (row_y, row) in glyph.enumerate().take(CELL_HEIGHT) {
            for (col_x, on) in row.enumerate().take(CELL_WIDTH) {
                cell[row_y][col_x] = on;
            }
        }
    }

    cell
}

fn rasterize_builtin(
    text: &str,
    px: f32,
    origin_x: f32,
    baseline_y: f32,
    clip: SizePx,
    plot: &mut impl FnMut(i32, i32, f32),
) {
    let scale = px / CELL_HEIGHT as f32;
    if scale <= 0.0 {
        return;
    }
    let top = baseline_y - CELL_ASCENT as f32 * scale;
    let advance = CELL_WIDTH as f32 * scale;
    let step = 1.0 / SUPERSAMPLE as f32;
    let weight = step * step;

    let y0 = (top.floor() as i32).max(0);
    let y1 = ((top + CELL_HEIGHT as f32 * scale).ceil() as i32).min(clip.height as i32);

    for (index, ch) in text.chars().enumerate() {
        let left = origin_x + index as f32 * advance;
        let x0 = (left.floor() as i32).max(0);
        let x1 = ((left + advance).ceil() as i32).min(clip.width as i32);
        if x0 >= x1 || y0 >= y1 {
            continue;
        }
        let cell = builtin_glyph(ch);

        for y in y0..y1 {
            for x in x0..x1 {
                let mut coverage = 0.0;
                for sy in 0..SUPERSAMPLE {
                    let gy = ((y as f32 + (sy as f32 + 0.5) * step - top) / scale).floor();
                    if gy < 0.0 || gy >= CELL_HEIGHT as f32 {
                        continue;
                    }
                    for sx in 0..SUPERSAMPLE {
                        let gx = ((x as f32 + (sx as f32 + 0.5) * step - left) / scale).floor();
                        if gx >= 0.0 && gx < CELL_WIDTH as f32 && cell[gy as usize][gx as usize] {
                            coverage += weight;
                        }
                    }
                }
                if coverage > 0.0 {
                    plot(x, y, coverage);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage_grid(face: &FontFace, text: &str, px: f32) -> (Vec<f32>, usize, usize) {
        let metrics = face.metrics(text, px);
        let width = metrics.width.ceil() as usize + 2;
        let height = (metrics.ascent + metrics.descent).ceil() as usize + 2;
        let mut grid = vec![0.0f32; width * height];

        let clip = SizePx::new(width as u32, height as u32);
        face.rasterize(text, px, 1.0, 1.0 + metrics.ascent, clip, |x, y, c| {
            let idx = y as usize * width + x as usize;
            grid[idx] = (grid[idx] + c).min(1.0);
        });

        (grid, width, height)
    }

    #[test]
    fn builtin_metrics_scale_with_size() {
        let metrics = FontFace::Builtin.metrics("99+", 24.0);
        assert_eq!(metrics.width, 36.0);
        assert_eq!(metrics.ascent, 19.0);
        assert_eq!(metrics.descent, 5.0);

        let half = FontFace::Builtin.metrics("99+", 12.0);
        assert_eq!(half.width, 18.0);
    }

    #[test]
    fn centered_baseline_splits_ascent_and_descent() {
        let metrics = TextMetrics {
            width: 10.0,
            ascent: 19.0,
            descent: 5.0,
        };
        // Cell spans baseline-19 .. baseline+5, centered on 50.
        let baseline = metrics.centered_baseline(50.0);
        assert_eq!(baseline, 57.0);
        assert_eq!((baseline - 19.0 + baseline + 5.0) / 2.0, 50.0);
    }

    #[test]
    fn builtin_digits_produce_ink() {
        let (grid, _, _) = coverage_grid(&FontFace::Builtin, "8", 24.0);
        assert!(grid.iter().any(|&c| c >= 1.0), "native size should have solid pixels");
    }

    #[test]
    fn builtin_downscale_is_antialiased() {
        let (grid, _, _) = coverage_grid(&FontFace::Builtin, "42", 11.0);
        assert!(grid.iter().any(|&c| c > 0.0 && c < 1.0));
    }

    #[test]
    fn blank_text_draws_nothing() {
        let (grid, _, _) = coverage_grid(&FontFace::Builtin, " ", 24.0);
        assert!(grid.iter().all(|&c| c == 0.0));
    }

    fn tuffy() -> FontFace {
        FontFace::from_bytes(include_bytes!("../../tests/fonts/Tuffy.ttf").to_vec()).unwrap()
    }

    /// Collects every plotted pixel, failing on anything outside `clip`.
    fn plotted(
        face: &FontFace,
        text: &str,
        px: f32,
        origin: (f32, f32),
        clip: SizePx,
    ) -> Vec<(i32, i32)> {
        let mut pixels = Vec::new();
        face.rasterize(text, px, origin.0, origin.1, clip, |x, y, _| {
            assert!(
                (0..clip.width as i32).contains(&x) && (0..clip.height as i32).contains(&y),
                "plotted ({x}, {y}) outside {clip:?}"
            );
            pixels.push((x, y));
        });
        pixels
    }

    #[test]
    fn builtin_oversized_label_is_clipped() {
        let clip = SizePx::new(64, 64);
        // 20px per cell; the clip sees the middle of the "+" cross.
        let pixels = plotted(&FontFace::Builtin, "+", 480.0, (-88.0, 172.0), clip);

        assert!(!pixels.is_empty());
        assert!(pixels.len() <= 64 * 64);
    }

    #[test]
    fn ttf_oversized_label_is_clipped() {
        let clip = SizePx::new(64, 64);
        // Font unit (456, 640), the middle of Tuffy's "+", lands on (32, 32).
        let scale = 4400.0 / 2048.0;
        let origin = (32.0 - 456.0 * scale, 32.0 + 640.0 * scale);
        let pixels = plotted(&tuffy(), "+", 4400.0, origin, clip);

        assert!(!pixels.is_empty());
        assert!(pixels.len() <= 64 * 64);
    }

    #[test]
    fn ttf_metrics_are_positive_distances() {
        let metrics = tuffy().metrics("1", 32.0);
        assert!(metrics.ascent > 0.0, "ascent {}", metrics.ascent);
        assert!(metrics.descent > 0.0, "descent {}", metrics.descent);
        assert!(metrics.ascent > metrics.descent);
        assert!(metrics.ascent + metrics.descent <= 32.0 * 1.25);
        // Tuffy's "1" advances 1136 of 2048 units.
        assert!((metrics.width - 32.0 * 1136.0 / 2048.0).abs() < 0.01);
    }

    #[test]
    fn ttf_glyph_sits_on_baseline() {
        // At 32px one pixel is 64 font units. Tuffy's "1" spans x 424..739
        // and y 0..1456, so with origin (2, 30) its ink covers columns 8..=13
        // and rows 7..=29.
        let pixels = plotted(&tuffy(), "1", 32.0, (2.0, 30.0), SizePx::new(40, 40));

        let min_x = pixels.iter().map(|p| p.0).min().unwrap();
        let max_x = pixels.iter().map(|p| p.0).max().unwrap();
        let min_y = pixels.iter().map(|p| p.1).min().unwrap();
        let max_y = pixels.iter().map(|p| p.1).max().unwrap();

        assert!((min_x - 8).abs() <= 1, "left {min_x}");
        assert!((max_x - 13).abs() <= 1, "right {max_x}");
        assert!((min_y - 7).abs() <= 1, "top {min_y}");
        assert!((max_y - 29).abs() <= 1, "bottom {max_y}");
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        assert!(matches!(
            FontFace::from_bytes(vec![0, 1, 2, 3]),
            Err(BadgeError::Font(_))
        ));
    }
}
