//! Configuration resolution: partial badge options plus environment defaults
//! in, a complete [`Badge`] out.
//!
//! [`BadgeOptions`] is a plain struct of optional fields. [`resolve`] is a
//! pure function that fills every unset field from [`BadgeDefaults`], looks
//! up symbolic values through a [`ResourceResolver`], and fails only when no
//! base image was given. [`BadgeBuilder`] is a fluent wrapper over the same
//! struct.

use std::collections::HashMap;

use crate::color::Color;
use crate::compositor::{Badge, BadgeConfig, FontFace, MAXIMUM_COUNT};
use crate::error::{BadgeError, Result};
use crate::placement::{BadgePosition, Gravity, Placement};
use crate::source::{ImageResolver, ImageSource};

// ============================================================================
// Symbolic Values
// ============================================================================

/// A size given either in pixels or as a named resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    Px(f32),
    Resource(String),
}

impl Dimension {
    pub fn resource(name: impl Into<String>) -> Self {
        Self::Resource(name.into())
    }

    fn resolve(&self, resources: &impl ResourceResolver) -> Result<f32> {
        match self {
            Self::Px(px) => Ok(*px),
            Self::Resource(name) => resources.dimension(name),
        }
    }
}

impl From<f32> for Dimension {
    fn from(px: f32) -> Self {
        Self::Px(px)
    }
}

/// A color given either as a value or as a named resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpec {
    Value(Color),
    Resource(String),
}

impl ColorSpec {
    pub fn resource(name: impl Into<String>) -> Self {
        Self::Resource(name.into())
    }

    fn resolve(&self, resources: &impl ResourceResolver) -> Result<Color> {
        match self {
            Self::Value(color) => Ok(*color),
            Self::Resource(name) => resources.color(name),
        }
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        Self::Value(color)
    }
}

// ============================================================================
// Resource Collaborators
// ============================================================================

/// Host collaborator resolving symbolic sizes, colors and images.
pub trait ResourceResolver: ImageResolver {
    /// Resolves a named size to pixels.
    fn dimension(&self, name: &str) -> Result<f32>;

    /// Resolves a named color.
    fn color(&self, name: &str) -> Result<Color>;
}

/// Resolves nothing. Every symbolic lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

impl ImageResolver for NoResources {
    fn image(&self, name: &str) -> Result<ImageSource> {
        Err(unresolved("image", name))
    }
}

impl ResourceResolver for NoResources {
    fn dimension(&self, name: &str) -> Result<f32> {
        Err(unresolved("dimension", name))
    }

    fn color(&self, name: &str) -> Result<Color> {
        Err(unresolved("color", name))
    }
}

/// In-memory resource table.
///
/// ```
/// use drawable_badge::{Color, ResourceTable};
///
/// let resources = ResourceTable::new()
///     .with_dimension("badge_size", 24.0)
///     .with_color("badge_red", Color::from_rgb(0xff, 0x3b, 0x30));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    dimensions: HashMap<String, f32>,
    colors: HashMap<String, Color>,
    images: HashMap<String, ImageSource>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimension(mut self, name: impl Into<String>, px: f32) -> Self {
        self.dimensions.insert(name.into(), px);
        self
    }

    pub fn with_color(mut self, name: impl Into<String>, color: Color) -> Self {
        self.colors.insert(name.into(), color);
        self
    }

    pub fn with_image(mut self, name: impl Into<String>, image: ImageSource) -> Self {
        self.images.insert(name.into(), image);
        self
    }
}

impl ImageResolver for ResourceTable {
    fn image(&self, name: &str) -> Result<ImageSource> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| unresolved("image", name))
    }
}

impl ResourceResolver for ResourceTable {
    fn dimension(&self, name: &str) -> Result<f32> {
        self.dimensions
            .get(name)
            .copied()
            .ok_or_else(|| unresolved("dimension", name))
    }

    fn color(&self, name: &str) -> Result<Color> {
        self.colors
            .get(name)
            .copied()
            .ok_or_else(|| unresolved("color", name))
    }
}

fn unresolved(kind: &'static str, name: &str) -> BadgeError {
    BadgeError::UnresolvedResource {
        kind,
        name: name.to_string(),
    }
}

// ============================================================================
// Defaults
// ============================================================================

/// Environment defaults for every optional badge field.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeDefaults {
    pub badge_size: f32,
    pub border_size: f32,
    pub margin: f32,
    pub text_color: Color,
    pub badge_color: Color,
    pub border_color: Color,
    pub gravity: Gravity,
}

impl Default for BadgeDefaults {
    fn default() -> Self {
        Self {
            badge_size: 24.0,
            border_size: 2.0,
            margin: 0.0,
            text_color: Color::WHITE,
            badge_color: Color(0xFFFF_3B30),
            border_color: Color::WHITE,
            gravity: Gravity::TOP_END,
        }
    }
}

impl BadgeDefaults {
    /// Defaults for a display with `scale` physical pixels per logical pixel.
    pub fn for_scale(scale: f32) -> Self {
        let base = Self::default();
        Self {
            badge_size: base.badge_size * scale,
            border_size: base.border_size * scale,
            margin: base.margin * scale,
            ..base
        }
    }
}

// ============================================================================
// BadgeOptions
// ============================================================================

/// Partially specified badge settings. `None` means "use the default".
///
/// When both `position` and `gravity` are set, `position` wins.
#[derive(Debug, Clone, Default)]
pub struct BadgeOptions {
    pub image: Option<ImageSource>,
    pub text_color: Option<ColorSpec>,
    pub badge_color: Option<ColorSpec>,
    pub border_color: Option<ColorSpec>,
    pub border_size: Option<Dimension>,
    pub badge_size: Option<Dimension>,
    pub margin: Option<Dimension>,
    pub position: Option<BadgePosition>,
    pub gravity: Option<Gravity>,
    pub show_border: Option<bool>,
    pub maximum_counter: Option<u32>,
    pub show_counter: Option<bool>,
    pub font_face: Option<FontFace>,
}

/// Resolves `options` against `defaults` into a renderable badge.
///
/// Fails with [`BadgeError::MissingImage`] when no image was supplied, and
/// with the collaborator's error when a symbolic value cannot be resolved.
pub fn resolve<R: ResourceResolver>(
    options: &BadgeOptions,
    defaults: &BadgeDefaults,
    resources: &R,
) -> Result<Badge> {
    let source = options
        .image
        .as_ref()
        .ok_or(BadgeError::MissingImage)?
        .resolve(resources)?;

    let mut defaulted = Vec::new();
    let mut size = |field: &'static str, value: &Option<Dimension>, fallback: f32| {
        match value {
            Some(dimension) => dimension.resolve(resources),
            None => {
                defaulted.push(field);
                Ok(fallback)
            }
        }
    };

    let badge_size = size("badge_size", &options.badge_size, defaults.badge_size)?;
    let border_size = size("border_size", &options.border_size, defaults.border_size)?;
    let margin = size("margin", &options.margin, defaults.margin)?;

    let color = |value: &Option<ColorSpec>, fallback: Color| match value {
        Some(spec) => spec.resolve(resources),
        None => Ok(fallback),
    };

    let config = BadgeConfig {
        text_color: color(&options.text_color, defaults.text_color)?,
        badge_color: color(&options.badge_color, defaults.badge_color)?,
        border_color: color(&options.border_color, defaults.border_color)?,
        badge_size: if badge_size > 0.0 {
            badge_size
        } else {
            log::debug!("badge size {badge_size} is not positive, using default");
            defaults.badge_size
        },
        border_size: border_size.max(0.0),
        margin: margin.max(0.0),
        placement: resolve_placement(options, defaults),
        show_border: options.show_border.unwrap_or(true),
        maximum_counter: options
            .maximum_counter
            .unwrap_or(MAXIMUM_COUNT)
            .min(MAXIMUM_COUNT),
        show_counter: options.show_counter.unwrap_or(true),
        font_face: options.font_face.clone().unwrap_or_default(),
    };

    log::debug!(
        "resolved badge: {:?}, size {}, inset {}, defaulted sizes {:?}",
        config.placement,
        config.badge_size,
        config.inset(),
        defaulted
    );

    Ok(Badge::new(config, source))
}

fn resolve_placement(options: &BadgeOptions, defaults: &BadgeDefaults) -> Placement {
    match (options.position, options.gravity) {
        (Some(position), _) => Placement::Corner(position),
        (None, Some(gravity)) => Placement::Gravity(gravity),
        (None, None) => Placement::Gravity(defaults.gravity),
    }
}

// ============================================================================
// BadgeBuilder
// ============================================================================

/// Fluent construction of a [`Badge`].
///
/// Every setter is optional except [`image`](Self::image).
#[derive(Debug, Clone, Default)]
pub struct BadgeBuilder {
    options: BadgeOptions,
}

impl BadgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing options.
    pub fn from_options(options: BadgeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BadgeOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut BadgeOptions {
        &mut self.options
    }

    /// Sets the base image.
    pub fn image(mut self, image: impl Into<ImageSource>) -> Self {
        self.options.image = Some(image.into());
        self
    }

    pub fn text_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.options.text_color = Some(color.into());
        self
    }

    pub fn badge_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.options.badge_color = Some(color.into());
        self
    }

    pub fn border_color(mut self, color: impl Into<ColorSpec>) -> Self {
        self.options.border_color = Some(color.into());
        self
    }

    pub fn border_size(mut self, size: impl Into<Dimension>) -> Self {
        self.options.border_size = Some(size.into());
        self
    }

    pub fn badge_size(mut self, size: impl Into<Dimension>) -> Self {
        self.options.badge_size = Some(size.into());
        self
    }

    pub fn margin(mut self, margin: impl Into<Dimension>) -> Self {
        self.options.margin = Some(margin.into());
        self
    }

    /// Legacy four-corner placement. Takes precedence over any gravity.
    pub fn badge_position(mut self, position: BadgePosition) -> Self {
        self.options.position = Some(position);
        self
    }

    pub fn badge_gravity(mut self, gravity: Gravity) -> Self {
        self.options.gravity = Some(gravity);
        self
    }

    /// Gravity given as an Android-style bit mask.
    pub fn badge_gravity_mask(self, mask: u32) -> Self {
        self.badge_gravity(Gravity::from_mask(mask))
    }

    pub fn show_border(mut self, show: bool) -> Self {
        self.options.show_border = Some(show);
        self
    }

    /// Counter cap before the label becomes "{cap}+". Values above 99 act as 99.
    pub fn maximum_counter(mut self, maximum: u32) -> Self {
        self.options.maximum_counter = Some(maximum);
        self
    }

    pub fn show_counter(mut self, show: bool) -> Self {
        self.options.show_counter = Some(show);
        self
    }

    pub fn font_face(mut self, face: FontFace) -> Self {
        self.options.font_face = Some(face);
        self
    }

    /// Resolves with library defaults and no symbolic resources.
    pub fn build(self) -> Result<Badge> {
        self.build_with(&BadgeDefaults::default(), &NoResources)
    }

    /// Resolves with explicit defaults and a resource collaborator.
    pub fn build_with<R: ResourceResolver>(
        self,
        defaults: &BadgeDefaults,
        resources: &R,
    ) -> Result<Badge> {
        resolve(&self.options, defaults, resources)
    }
}
