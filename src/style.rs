//! Serializable badge style for configuration files and IPC.
//!
//! A [`BadgeStyle`] mirrors [`BadgeOptions`] in a JSON-friendly shape: every
//! field is optional and missing fields fall back to the resolver defaults.
//!
//! # Example
//!
//! ```
//! use drawable_badge::{Badge, BadgeStyle, Configurable};
//! use image::RgbaImage;
//!
//! let style = BadgeStyle::from_json(r##"{
//!     "badgeSize": 20,
//!     "badgeColor": "#ff3b30",
//!     "gravity": { "horizontal": "end", "vertical": "center" },
//!     "maximumCounter": 9
//! }"##).unwrap();
//!
//! let mut builder = Badge::builder().image(RgbaImage::new(64, 64));
//! builder.apply_style(&style).unwrap();
//! let badge = builder.build().unwrap();
//! assert_eq!(badge.config().maximum_counter, 9);
//! ```
//!
//! Sizes are numbers (pixels) or strings (resource names). Colors are
//! `#rrggbb` / `#aarrggbb` values, or resource names without the `#`.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;
use crate::placement::{BadgePosition, Gravity, HorizontalGravity, VerticalGravity};
use crate::resolver::{BadgeBuilder, BadgeOptions, ColorSpec, Dimension};
use crate::source::ImageSource;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`BadgeStyle`].
pub trait Configurable {
    /// Applies a style's settings. Fields absent from the style are left as is.
    fn apply_style(&mut self, style: &BadgeStyle) -> Result<()>;

    /// Exports the current settings as a style.
    fn export_style(&self) -> BadgeStyle;
}

// ============================================================================
// Serializable Values
// ============================================================================

/// A size in pixels or a resource name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum SerializableDimension {
    Px(f32),
    Resource(String),
}

impl From<&Dimension> for SerializableDimension {
    fn from(dimension: &Dimension) -> Self {
        match dimension {
            Dimension::Px(px) => Self::Px(*px),
            Dimension::Resource(name) => Self::Resource(name.clone()),
        }
    }
}

impl From<SerializableDimension> for Dimension {
    fn from(dimension: SerializableDimension) -> Self {
        match dimension {
            SerializableDimension::Px(px) => Self::Px(px),
            SerializableDimension::Resource(name) => Self::Resource(name),
        }
    }
}

fn color_to_string(spec: &ColorSpec) -> String {
    match spec {
        ColorSpec::Value(color) => color.to_string(),
        ColorSpec::Resource(name) => name.clone(),
    }
}

fn color_from_string(value: &str) -> Result<ColorSpec> {
    if value.starts_with('#') {
        Ok(ColorSpec::Value(value.parse::<Color>()?))
    } else {
        Ok(ColorSpec::Resource(value.to_string()))
    }
}

/// Serializable version of [`BadgePosition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum SerializablePosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl From<BadgePosition> for SerializablePosition {
    fn from(pos: BadgePosition) -> Self {
        match pos {
            BadgePosition::TopLeft => Self::TopLeft,
            BadgePosition::TopRight => Self::TopRight,
            BadgePosition::BottomLeft => Self::BottomLeft,
            BadgePosition::BottomRight => Self::BottomRight,
        }
    }
}

impl From<SerializablePosition> for BadgePosition {
    fn from(pos: SerializablePosition) -> Self {
        match pos {
            SerializablePosition::TopLeft => Self::TopLeft,
            SerializablePosition::TopRight => Self::TopRight,
            SerializablePosition::BottomLeft => Self::BottomLeft,
            SerializablePosition::BottomRight => Self::BottomRight,
        }
    }
}

/// Serializable version of [`Gravity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GravitySettings {
    pub horizontal: HorizontalGravity,
    pub vertical: VerticalGravity,
}

impl From<Gravity> for GravitySettings {
    fn from(gravity: Gravity) -> Self {
        Self {
            horizontal: gravity.horizontal,
            vertical: gravity.vertical,
        }
    }
}

impl From<GravitySettings> for Gravity {
    fn from(settings: GravitySettings) -> Self {
        Gravity::new(settings.horizontal, settings.vertical)
    }
}

/// Serializable image source: inline SVG markup or a resource reference.
///
/// ```json
/// { "svgData": "<svg>...</svg>" }
/// // or
/// { "reference": "ic_mail" }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct SerializableImageSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_data: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl SerializableImageSource {
    fn to_source(&self) -> Option<ImageSource> {
        if let Some(svg) = &self.svg_data {
            Some(ImageSource::Svg(svg.clone()))
        } else {
            self.reference.clone().map(ImageSource::Reference)
        }
    }

    fn from_source(source: &ImageSource) -> Option<Self> {
        match source {
            ImageSource::Svg(svg) => Some(Self {
                svg_data: Some(svg.clone()),
                reference: None,
            }),
            ImageSource::Reference(name) => Some(Self {
                svg_data: None,
                reference: Some(name.clone()),
            }),
            // Raster pixels are not carried in styles.
            ImageSource::Raw(_) | ImageSource::Encoded(_) => None,
        }
    }
}

// ============================================================================
// BadgeStyle
// ============================================================================

/// A serializable set of badge settings.
///
/// # JSON Format
///
/// ```json
/// {
///   "badgeSize": 24,
///   "borderSize": "badge_border",
///   "badgeColor": "#ff3b30",
///   "position": "top-right",
///   "showBorder": true,
///   "maximumCounter": 99
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct BadgeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<SerializableImageSource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_size: Option<SerializableDimension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_size: Option<SerializableDimension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<SerializableDimension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,

    /// Legacy corner placement. Wins over `gravity` when both are set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<SerializablePosition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<GravitySettings>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_border: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_counter: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_counter: Option<bool>,
}

impl BadgeStyle {
    /// Creates an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the style to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the style to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a style from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Merges this style over `options`. Parses colors, so it can fail.
    ///
    /// Colors are validated before anything is written, so a bad color leaves
    /// `options` unchanged.
    pub fn apply_to(&self, options: &mut BadgeOptions) -> Result<()> {
        let parse = |color: &Option<String>| color.as_deref().map(color_from_string).transpose();
        let text_color = parse(&self.text_color)?;
        let badge_color = parse(&self.badge_color)?;
        let border_color = parse(&self.border_color)?;

        if let Some(image) = self.image.as_ref().and_then(|i| i.to_source()) {
            options.image = Some(image);
        }
        if let Some(size) = &self.badge_size {
            options.badge_size = Some(size.clone().into());
        }
        if let Some(size) = &self.border_size {
            options.border_size = Some(size.clone().into());
        }
        if let Some(margin) = &self.margin {
            options.margin = Some(margin.clone().into());
        }
        if text_color.is_some() {
            options.text_color = text_color;
        }
        if badge_color.is_some() {
            options.badge_color = badge_color;
        }
        if border_color.is_some() {
            options.border_color = border_color;
        }
        if let Some(position) = self.position {
            options.position = Some(position.into());
        }
        if let Some(gravity) = self.gravity {
            options.gravity = Some(gravity.into());
        }
        if let Some(show) = self.show_border {
            options.show_border = Some(show);
        }
        if let Some(maximum) = self.maximum_counter {
            options.maximum_counter = Some(maximum);
        }
        if let Some(show) = self.show_counter {
            options.show_counter = Some(show);
        }
        Ok(())
    }

    /// Captures the serializable parts of `options`.
    pub fn from_options(options: &BadgeOptions) -> Self {
        Self {
            image: options
                .image
                .as_ref()
                .and_then(SerializableImageSource::from_source),
            badge_size: options.badge_size.as_ref().map(Into::into),
            border_size: options.border_size.as_ref().map(Into::into),
            margin: options.margin.as_ref().map(Into::into),
            text_color: options.text_color.as_ref().map(color_to_string),
            badge_color: options.badge_color.as_ref().map(color_to_string),
            border_color: options.border_color.as_ref().map(color_to_string),
            position: options.position.map(Into::into),
            gravity: options.gravity.map(Into::into),
            show_border: options.show_border,
            maximum_counter: options.maximum_counter,
            show_counter: options.show_counter,
        }
    }
}

impl Configurable for BadgeBuilder {
    fn apply_style(&mut self, style: &BadgeStyle) -> Result<()> {
        style.apply_to(self.options_mut())
    }

    fn export_style(&self) -> BadgeStyle {
        BadgeStyle::from_options(self.options())
    }
}

// ============================================================================
// Tests
// ============================================================================
