//! Base image sources and their resolution to raw pixels.
//!
//! A badge can be built from several kinds of image input. They are all
//! resolved once, up front, into a [`SourceImage`]; the compositor never
//! branches on where the pixels came from.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::bitmap::SourceImage;
use crate::error::{BadgeError, Result};

// ============================================================================
// ImageSource
// ============================================================================

/// Any input the base image can be supplied as.
///
/// # Example
///
/// ```
/// use drawable_badge::ImageSource;
///
/// let svg = ImageSource::from_svg(r#"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48"/>"#);
/// let by_name = ImageSource::reference("ic_mail");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// An already decoded RGBA buffer.
    Raw(RgbaImage),

    /// Encoded image bytes (PNG, JPEG, ...), decoded with the `image` crate.
    Encoded(Vec<u8>),

    /// An opaque reference looked up through an [`ImageResolver`].
    Reference(String),

    /// SVG markup, rasterized at the document's intrinsic size.
    Svg(String),
}

impl ImageSource {
    /// Creates a source from SVG markup.
    pub fn from_svg(svg: impl Into<String>) -> Self {
        Self::Svg(svg.into())
    }

    /// Creates a source that names an image known to the host.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// Resolves this source to raw pixels.
    ///
    /// `Reference` sources go through `images`; the resolver may hand back
    /// any other variant, which is resolved in turn.
    pub fn resolve(&self, images: &dyn ImageResolver) -> Result<SourceImage> {
        match self {
            Self::Raw(data) => Ok(SourceImage::new(data.clone())),
            Self::Encoded(bytes) => Ok(SourceImage::new(image::load_from_memory(bytes)?.to_rgba8())),
            Self::Svg(svg) => rasterize_svg(svg).map(SourceImage::new),
            Self::Reference(name) => {
                let resolved = images.image(name)?;
                if let Self::Reference(again) = &resolved {
                    // A reference resolving to another reference would never terminate.
                    return Err(BadgeError::UnresolvedResource {
                        kind: "image",
                        name: again.clone(),
                    });
                }
                resolved.resolve(images)
            }
        }
    }
}

impl From<RgbaImage> for ImageSource {
    fn from(data: RgbaImage) -> Self {
        Self::Raw(data)
    }
}

// ============================================================================
// ImageResolver
// ============================================================================

/// Host collaborator that turns an image reference into image data.
pub trait ImageResolver {
    /// Looks up the image named `name`.
    fn image(&self, name: &str) -> Result<ImageSource>;
}

// ============================================================================
// SVG Rendering
// ============================================================================

/// Rasterizes SVG markup at its intrinsic size.
pub fn rasterize_svg(svg_data: &str) -> Result<RgbaImage> {
    let opts = Options::default();
    let tree = Tree::from_str(svg_data, &opts).map_err(|e| BadgeError::Svg(e.to_string()))?;

    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or_else(|| BadgeError::Svg("svg has zero intrinsic size".to_string()))?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    log::trace!("rasterized svg at {}x{}", size.width(), size.height());
    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
pub(crate) fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut img = RgbaImage::new(width, height);

    for (target, pixel) in img.pixels_mut().zip(pixmap.pixels()) {
        // tiny_skia uses premultiplied alpha
        let (r, g, b, a) = unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        *target = Rgba([r, g, b, a]);
    }

    img
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CIRCLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="30"><circle cx="20" cy="15" r="10" fill="#ff0000"/></svg>"##;

    struct Images(HashMap<&'static str, ImageSource>);

    impl ImageResolver for Images {
        fn image(&self, name: &str) -> Result<ImageSource> {
            self.0.get(name).cloned().ok_or_else(|| BadgeError::UnresolvedResource {
                kind: "image",
                name: name.to_string(),
            })
        }
    }

    #[test]
    fn svg_rasterizes_at_intrinsic_size() {
        let img = rasterize_svg(CIRCLE_SVG).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
        assert_eq!(img.get_pixel(20, 15).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn invalid_svg_is_an_error() {
        assert!(matches!(rasterize_svg("not svg"), Err(BadgeError::Svg(_))));
    }

    #[test]
    fn raw_source_keeps_pixels() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let resolved = ImageSource::Raw(img.clone()).resolve(&Images(HashMap::new())).unwrap();
        assert_eq!(resolved.pixels(), &img);
    }

    #[test]
    fn encoded_source_decodes_png() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let resolved = ImageSource::Encoded(bytes).resolve(&Images(HashMap::new())).unwrap();
        assert_eq!(resolved.pixels(), &img);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = ImageSource::Encoded(vec![0, 1, 2, 3]).resolve(&Images(HashMap::new()));
        assert!(matches!(result, Err(BadgeError::Decode(_))));
    }

    #[test]
    fn reference_goes_through_resolver() {
        let images = Images(HashMap::from([("ic_mail", ImageSource::from_svg(CIRCLE_SVG))]));
        let resolved = ImageSource::reference("ic_mail").resolve(&images).unwrap();
        assert_eq!(resolved.dimensions().width, 40);

        let missing = ImageSource::reference("ic_nope").resolve(&images);
        assert!(matches!(
            missing,
            Err(BadgeError::UnresolvedResource { kind: "image", .. })
        ));
    }

    #[test]
    fn reference_to_reference_is_rejected() {
        let images = Images(HashMap::from([("a", ImageSource::reference("a"))]));
        assert!(ImageSource::reference("a").resolve(&images).is_err());
    }
}
