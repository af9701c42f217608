//! Raster types shared by the resolver and the compositor.
//!
//! The core never decodes anything itself: a [`SourceImage`] is an already
//! decoded RGBA buffer, and a [`RenderedBadge`] is a fresh buffer of the same
//! dimensions returned from every render call.

use std::sync::Arc;

use image::RgbaImage;

/// A rectangle in floating point pixel coordinates, origin top-left.
///
/// Badge geometry is fractional (sizes come from density-scaled resources),
/// so edges are kept as `f32` until rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    /// Creates a rectangle from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle starting at origin (0, 0) with the given dimensions.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }

    /// Returns true if the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        !(self.left < self.right && self.top < self.bottom)
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The immutable base image a badge is drawn onto.
///
/// The pixel buffer is reference counted so a [`Badge`](crate::Badge) can be
/// cloned and shared across threads without copying pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    data: Arc<RgbaImage>,
}

impl SourceImage {
    /// Wraps a decoded RGBA buffer.
    pub fn new(data: RgbaImage) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    /// Returns the underlying pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.data
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns the full image bounds as a rectangle.
    pub fn bounds(&self) -> RectF {
        RectF::from_size(self.data.width() as f32, self.data.height() as f32)
    }
}

impl From<RgbaImage> for SourceImage {
    fn from(data: RgbaImage) -> Self {
        Self::new(data)
    }
}

/// A rendered badge image. Ownership of the pixels passes to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBadge {
    /// The composited image in RGBA format.
    pub data: RgbaImage,
}

impl RenderedBadge {
    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Consumes the badge and returns the pixel buffer.
    pub fn into_image(self) -> RgbaImage {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_f_edges() {
        let rect = RectF::new(108.0, 4.0, 124.0, 20.0);
        assert_eq!(rect.width(), 16.0);
        assert_eq!(rect.height(), 16.0);
        assert_eq!(rect.center_x(), 116.0);
        assert_eq!(rect.center_y(), 12.0);
        assert!(!rect.is_empty());
    }

    #[test]
    fn rect_f_empty_when_inverted() {
        assert!(RectF::new(10.0, 0.0, 5.0, 10.0).is_empty());
        assert!(RectF::new(0.0, 0.0, 10.0, 0.0).is_empty());
    }

    #[test]
    fn source_image_shares_pixels() {
        let source = SourceImage::new(RgbaImage::new(64, 32));
        let clone = source.clone();
        assert!(std::ptr::eq(source.pixels(), clone.pixels()));
        assert_eq!(source.dimensions(), SizePx::new(64, 32));
        assert_eq!(source.bounds(), RectF::from_size(64.0, 32.0));
    }
}
