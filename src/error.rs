//! Error types for badge configuration.

use thiserror::Error;

/// Errors raised while turning badge options into a renderable [`Badge`](crate::Badge).
///
/// Rendering itself never fails; every error surfaces during resolution.
#[derive(Debug, Error)]
pub enum BadgeError {
    /// No base image was supplied. There is no default for the base image.
    #[error("missing base image")]
    MissingImage,

    /// A symbolic resource could not be resolved by the resource collaborator.
    #[error("unresolved {kind} resource `{name}`")]
    UnresolvedResource {
        /// The kind of resource ("dimension", "color" or "image").
        kind: &'static str,
        /// The symbolic name that failed to resolve.
        name: String,
    },

    /// Encoded image bytes could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// An SVG document could not be parsed or rasterized.
    #[error("failed to rasterize svg: {0}")]
    Svg(String),

    /// Font bytes were not a usable font.
    #[error("invalid font: {0}")]
    Font(String),

    /// A serialized style could not be parsed.
    #[error("invalid badge style: {0}")]
    Style(#[from] serde_json::Error),

    /// A color string was not a valid hex color.
    #[error("invalid color `{0}`")]
    InvalidColor(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BadgeError>;
