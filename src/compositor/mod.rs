//! Badge compositing.
//!
//! A [`Badge`] pairs a resolved [`BadgeConfig`] with the [`SourceImage`] it is
//! drawn onto. [`Badge::render`] is a pure function of the badge and a counter:
//! every call paints onto a private canvas and returns a new image, so one
//! badge can be rendered from many threads at once.
//!
//! # Render steps
//!
//! 1. A counter of zero returns an untouched copy of the source.
//! 2. The badge rectangle comes from the configured [`Placement`], inset by
//!    the border width (when shown) plus the margin.
//! 3. The oval inscribed in that rectangle is filled, then optionally stroked.
//! 4. Unless the counter is hidden, the [`BadgeLabel`] is drawn centered, with
//!    the glyph box (not the baseline) on the rectangle's vertical midpoint.

pub mod canvas;
pub mod text;

pub use text::{FontFace, TextMetrics};

use crate::bitmap::{RectF, RenderedBadge, SourceImage};
use crate::color::Color;
use crate::placement::Placement;
use crate::resolver::BadgeBuilder;
use canvas::{composite_over, BadgeCanvas, CoverageMask};

/// Largest counter a badge ever displays; larger caps are clamped to this.
pub const MAXIMUM_COUNT: u32 = 99;

/// Font size relative to badge height for a plain count.
const COUNT_TEXT_SCALE: f32 = 0.55;
/// Font size relative to badge height for an overflow label, which is wider.
const OVERFLOW_TEXT_SCALE: f32 = 0.45;

// ============================================================================
// BadgeConfig
// ============================================================================

/// Fully resolved badge style. Every field holds a concrete value.
///
/// Built by the resolver (see [`Badge::builder`]) and read-only afterwards.
#[derive(Debug, Clone)]
pub struct BadgeConfig {
    pub text_color: Color,
    pub badge_color: Color,
    pub border_color: Color,
    /// Diameter of the badge circle in pixels. Always > 0.
    pub badge_size: f32,
    /// Stroke width of the border in pixels. Ignored when `show_border` is false.
    pub border_size: f32,
    /// Extra inset from the image edge in pixels.
    pub margin: f32,
    pub placement: Placement,
    pub show_border: bool,
    /// Counter cap before the label switches to "{cap}+". At most [`MAXIMUM_COUNT`].
    pub maximum_counter: u32,
    pub show_counter: bool,
    pub font_face: FontFace,
}

impl BadgeConfig {
    /// Border width plus margin: the distance the badge keeps from the edges
    /// it is anchored to.
    pub fn inset(&self) -> f32 {
        let border = if self.show_border {
            self.border_size
        } else {
            0.0
        };
        border + self.margin
    }

    /// The effective overflow cap, clamped to [`MAXIMUM_COUNT`].
    pub fn counter_cap(&self) -> u32 {
        self.maximum_counter.min(MAXIMUM_COUNT)
    }
}

// ============================================================================
// BadgeLabel
// ============================================================================

/// What a badge displays for a given counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeLabel {
    /// Zero: nothing is drawn at all.
    Hidden,
    /// The literal counter.
    Count(u32),
    /// The counter exceeded the cap; shown as "{cap}+".
    Overflow(u32),
}

impl BadgeLabel {
    /// Chooses the label for `counter` under a cap of `maximum` (clamped to
    /// [`MAXIMUM_COUNT`]).
    pub fn for_counter(counter: u32, maximum: u32) -> Self {
        let cap = maximum.min(MAXIMUM_COUNT);
        match counter {
            0 => Self::Hidden,
            n if n > cap => Self::Overflow(cap),
            n => Self::Count(n),
        }
    }

    /// The label text, or `None` when hidden.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Hidden => None,
            Self::Count(n) => Some(n.to_string()),
            Self::Overflow(cap) => Some(format!("{cap}+")),
        }
    }

    /// Font size in pixels for a badge rectangle of the given height.
    pub fn font_size(&self, badge_height: f32) -> f32 {
        match self {
            Self::Overflow(_) => badge_height * OVERFLOW_TEXT_SCALE,
            _ => badge_height * COUNT_TEXT_SCALE,
        }
    }
}

// ============================================================================
// Badge
// ============================================================================

/// A renderable badge: resolved style plus base image.
///
/// # Example
///
/// ```
/// use drawable_badge::{Badge, BadgePosition};
/// use image::RgbaImage;
///
/// let badge = Badge::builder()
///     .image(RgbaImage::new(128, 128))
///     .badge_size(20.0)
///     .badge_position(BadgePosition::TopRight)
///     .build()
///     .unwrap();
///
/// let rendered = badge.render(7);
/// assert_eq!(rendered.dimensions(), badge.source().dimensions());
/// ```
#[derive(Debug, Clone)]
pub struct Badge {
    config: BadgeConfig,
    source: SourceImage,
}

impl Badge {
    /// Starts a fluent builder. Only the image is required.
    pub fn builder() -> BadgeBuilder {
        BadgeBuilder::new()
    }

    /// Pairs an already resolved config with its base image.
    pub fn new(config: BadgeConfig, source: SourceImage) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &BadgeConfig {
        &self.config
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// The rectangle the badge circle is inscribed in.
    pub fn badge_rect(&self) -> RectF {
        self.config.placement.compute_badge_rect(
            self.source.bounds(),
            self.config.badge_size,
            self.config.inset(),
        )
    }

    /// Renders the badge for `counter` onto a fresh copy of the source image.
    pub fn render(&self, counter: u32) -> RenderedBadge {
        let mut output = self.source.pixels().clone();

        let label = BadgeLabel::for_counter(counter, self.config.maximum_counter);
        if label == BadgeLabel::Hidden {
            return RenderedBadge::new(output);
        }

        let size = self.source.dimensions();
        let Some(mut canvas) = BadgeCanvas::new(size.width, size.height) else {
            return RenderedBadge::new(output);
        };

        let rect = self.badge_rect();
        if rect.is_empty() {
            log::warn!(
                "badge rect {:?} is empty for a {}x{} image, nothing drawn",
                rect,
                size.width,
                size.height
            );
            return RenderedBadge::new(output);
        }
        log::debug!("rendering {:?} in {:?}", label, rect);

        canvas.fill_oval(rect, self.config.badge_color);
        if self.config.show_border {
            canvas.stroke_oval(rect, self.config.border_color, self.config.border_size);
        }
        let mut layer = canvas.into_layer();

        if self.config.show_counter {
            if let Some(text) = label.text() {
                let mask = self.label_mask(&text, label.font_size(rect.height()), rect);
                mask.paint_onto(&mut layer, self.config.text_color);
            }
        }

        composite_over(&mut output, &layer, 0, 0);
        RenderedBadge::new(output)
    }

    /// Rasterizes `text` centered in `rect`.
    fn label_mask(&self, text: &str, font_size: f32, rect: RectF) -> CoverageMask {
        let size = self.source.dimensions();
        let mut mask = CoverageMask::new(size.width, size.height);

        let face = &self.config.font_face;
        let metrics = face.metrics(text, font_size);
        let x = rect.center_x() - metrics.width / 2.0;
        let baseline = metrics.centered_baseline(rect.center_y());
        log::trace!("label {:?} at {}px, origin ({}, {})", text, font_size, x, baseline);

        face.rasterize(text, font_size, x, baseline, size, |px, py, coverage| {
            mask.add(px, py, coverage)
        });
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{BadgePosition, Gravity};
    use image::{Rgba, RgbaImage};

    fn config() -> BadgeConfig {
        BadgeConfig {
            text_color: Color::WHITE,
            badge_color: Color::from_rgb(255, 0, 0),
            border_color: Color::from_rgb(0, 0, 255),
            badge_size: 40.0,
            border_size: 2.0,
            margin: 0.0,
            placement: Placement::Gravity(Gravity::TOP_END),
            show_border: true,
            maximum_counter: MAXIMUM_COUNT,
            show_counter: true,
            font_face: FontFace::Builtin,
        }
    }

    fn badge(config: BadgeConfig) -> Badge {
        let source = RgbaImage::from_pixel(128, 128, Rgba([0, 200, 0, 255]));
        Badge::new(config, SourceImage::new(source))
    }

    fn count_color(img: &RgbaImage, rect: RectF, color: [u8; 4]) -> usize {
        let mut count = 0;
        for y in rect.top as u32..rect.bottom as u32 {
            for x in rect.left as u32..rect.right as u32 {
                if img.get_pixel(x, y).0 == color {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn label_policy() {
        assert_eq!(BadgeLabel::for_counter(0, 99), BadgeLabel::Hidden);
        assert_eq!(BadgeLabel::for_counter(1, 99), BadgeLabel::Count(1));
        assert_eq!(BadgeLabel::for_counter(99, 99), BadgeLabel::Count(99));
        assert_eq!(BadgeLabel::for_counter(100, 99), BadgeLabel::Overflow(99));
        assert_eq!(BadgeLabel::for_counter(11, 10), BadgeLabel::Overflow(10));
        assert_eq!(BadgeLabel::for_counter(150, 500), BadgeLabel::Overflow(99));
    }

    #[test]
    fn label_text_and_font_size() {
        assert_eq!(BadgeLabel::Count(42).text().as_deref(), Some("42"));
        assert_eq!(BadgeLabel::Overflow(99).text().as_deref(), Some("99+"));
        assert_eq!(BadgeLabel::Hidden.text(), None);

        assert_eq!(BadgeLabel::Count(5).font_size(20.0), 20.0 * 0.55);
        assert_eq!(BadgeLabel::Overflow(99).font_size(20.0), 20.0 * 0.45);
    }

    #[test]
    fn zero_maximum_always_overflows() {
        assert_eq!(BadgeLabel::for_counter(1, 0), BadgeLabel::Overflow(0));
        assert_eq!(BadgeLabel::Overflow(0).text().as_deref(), Some("0+"));
    }

    #[test]
    fn inset_ignores_border_when_hidden() {
        let mut config = config();
        config.margin = 3.0;
        assert_eq!(config.inset(), 5.0);
        config.show_border = false;
        assert_eq!(config.inset(), 3.0);
    }

    #[test]
    fn render_zero_is_identity() {
        let badge = badge(config());
        assert_eq!(&badge.render(0).data, badge.source().pixels());
    }

    #[test]
    fn render_paints_badge_and_keeps_rest() {
        let badge = badge(config());
        let rendered = badge.render(3).data;
        let rect = badge.badge_rect();

        assert!(count_color(&rendered, rect, [255, 0, 0, 255]) > 0);
        // Far corner untouched.
        assert_eq!(rendered.get_pixel(0, 127).0, [0, 200, 0, 255]);
    }

    #[test]
    fn render_draws_text_in_badge() {
        let badge = badge(config());
        let rect = badge.badge_rect();
        let with_text = badge.render(8).data;
        assert!(count_color(&with_text, rect, [255, 255, 255, 255]) > 0);
    }

    #[test]
    fn hidden_counter_draws_bare_circle() {
        let mut config = config();
        config.show_counter = false;
        let badge = badge(config);
        let rect = badge.badge_rect();

        let rendered = badge.render(8).data;
        assert_eq!(count_color(&rendered, rect, [255, 255, 255, 255]), 0);
        assert!(count_color(&rendered, rect, [255, 0, 0, 255]) > 0);
        // Any non-zero counter gives the same bare circle.
        assert_eq!(rendered, badge.render(500).data);
    }

    #[test]
    fn border_only_when_shown() {
        let mut config = config();
        config.border_size = 4.0;
        let bordered = badge(config.clone());
        let rect = bordered.badge_rect();
        assert!(count_color(&bordered.render(1).data, rect, [0, 0, 255, 255]) > 0);

        config.show_border = false;
        let plain = badge(config);
        let rect = plain.badge_rect();
        assert_eq!(count_color(&plain.render(1).data, rect, [0, 0, 255, 255]), 0);
    }

    #[test]
    fn corner_placement_uses_legacy_rect() {
        let mut config = config();
        config.badge_size = 20.0;
        config.border_size = 4.0;
        config.placement = Placement::Corner(BadgePosition::TopRight);
        let badge = badge(config);
        assert_eq!(badge.badge_rect(), RectF::new(108.0, 4.0, 124.0, 20.0));
    }

    #[test]
    fn empty_rect_draws_nothing() {
        let mut config = config();
        config.badge_size = 4.0;
        config.border_size = 8.0;
        config.placement = Placement::Corner(BadgePosition::TopLeft);
        let badge = badge(config);
        assert!(badge.badge_rect().is_empty());
        assert_eq!(&badge.render(5).data, badge.source().pixels());
    }

    #[test]
    fn overflow_differs_from_count() {
        let badge = badge(config());
        assert_ne!(badge.render(99).data, badge.render(100).data);
        assert_eq!(badge.render(100).data, badge.render(1000).data);
    }
}
