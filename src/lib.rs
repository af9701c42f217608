//! drawable-badge: numeric notification badges composited onto images
//!
//! This crate draws a colored circular badge with a counter (or a capped
//! "99+" style overflow label) onto a copy of a base image, the way app icons
//! show unread counts.
//!
//! # Example
//!
//! ```
//! use drawable_badge::{Badge, Color, Gravity};
//! use image::RgbaImage;
//!
//! let badge = Badge::builder()
//!     .image(RgbaImage::new(128, 128))
//!     .badge_size(32.0)
//!     .badge_color(Color::from_rgb(0xff, 0x3b, 0x30))
//!     .badge_gravity(Gravity::TOP_END)
//!     .maximum_counter(9)
//!     .build()
//!     .unwrap();
//!
//! // Build once, render many times.
//! let three = badge.render(3);
//! let overflow = badge.render(12); // draws "9+"
//! let untouched = badge.render(0); // no badge at all
//! assert_eq!(&untouched.data, badge.source().pixels());
//! ```
//!
//! # Serializable Styles
//!
//! Style settings can also come from JSON via [`BadgeStyle`] and the
//! [`Configurable`] trait:
//!
//! ```
//! use drawable_badge::{Badge, BadgeStyle, Configurable};
//! use image::RgbaImage;
//!
//! let style = BadgeStyle::from_json(r#"{ "position": "bottom-left", "showBorder": false }"#).unwrap();
//!
//! let mut builder = Badge::builder().image(RgbaImage::new(48, 48));
//! builder.apply_style(&style).unwrap();
//!
//! // Export current settings
//! let json = builder.export_style().to_json().unwrap();
//! assert!(json.contains("bottom-left"));
//!
//! let badge = builder.build().unwrap();
//! ```

mod bitmap;
mod color;
mod compositor;
mod error;
mod placement;
mod resolver;
mod source;
mod style;

pub use bitmap::{RectF, RenderedBadge, SizePx, SourceImage};
pub use color::Color;
pub use compositor::{Badge, BadgeConfig, BadgeLabel, FontFace, MAXIMUM_COUNT, TextMetrics};
pub use error::{BadgeError, Result};
pub use placement::{BadgePosition, Gravity, HorizontalGravity, Placement, VerticalGravity};
pub use resolver::{
    resolve, BadgeBuilder, BadgeDefaults, BadgeOptions, ColorSpec, Dimension, NoResources,
    ResourceResolver, ResourceTable,
};
pub use source::{rasterize_svg, ImageResolver, ImageSource};
pub use style::{
    BadgeStyle, Configurable, GravitySettings, SerializableDimension, SerializableImageSource,
    SerializablePosition,
};
