//! Badge placement: where the badge circle sits inside the image.
//!
//! Two placement schemes coexist:
//!
//! - [`BadgePosition`], the legacy four-corner enum. Its rectangle is computed
//!   with closed-form corner arithmetic that insets only the two edges facing
//!   the nearest image border and measures the opposite edges from the image
//!   edge without inset, so the rectangle shrinks by the inset instead of
//!   moving.
//! - [`Gravity`], a horizontal plus vertical anchor. A `size x size` box is
//!   anchored in the image bounds and moved inward by the inset on each axis
//!   that faces an image edge.
//!
//! The two disagree for any non-zero inset. Both are kept as distinct
//! [`Placement`] variants so existing callers see unchanged geometry.

use serde::{Deserialize, Serialize};

use crate::bitmap::RectF;

// ============================================================================
// BadgePosition
// ============================================================================

/// Legacy four-corner badge position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgePosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

// ============================================================================
// Gravity
// ============================================================================

/// Horizontal anchor of a [`Gravity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum HorizontalGravity {
    Start,
    Center,
    End,
}

/// Vertical anchor of a [`Gravity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum VerticalGravity {
    Top,
    Center,
    Bottom,
}

/// A generalized placement combining a horizontal and a vertical anchor.
///
/// Start and end resolve left-to-right: start is the left edge, end the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gravity {
    pub horizontal: HorizontalGravity,
    pub vertical: VerticalGravity,
}

impl Gravity {
    pub const TOP_START: Self = Self::new(HorizontalGravity::Start, VerticalGravity::Top);
    pub const TOP_END: Self = Self::new(HorizontalGravity::End, VerticalGravity::Top);
    pub const BOTTOM_START: Self = Self::new(HorizontalGravity::Start, VerticalGravity::Bottom);
    pub const BOTTOM_END: Self = Self::new(HorizontalGravity::End, VerticalGravity::Bottom);
    pub const CENTER: Self = Self::new(HorizontalGravity::Center, VerticalGravity::Center);

    pub const fn new(horizontal: HorizontalGravity, vertical: VerticalGravity) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    // Android `Gravity` bit values, accepted for hosts that pass raw masks.
    const AXIS_SPECIFIED: u32 = 0x01;
    const AXIS_PULL_BEFORE: u32 = 0x02;
    const AXIS_PULL_AFTER: u32 = 0x04;
    const AXIS_X_SHIFT: u32 = 0;
    const AXIS_Y_SHIFT: u32 = 4;
    const RELATIVE_LAYOUT_DIRECTION: u32 = 0x0080_0000;

    /// Decodes an Android-style gravity bit mask (e.g. `TOP | END` = `0x800035`).
    ///
    /// Axes the mask leaves unspecified fall back to top and end. A badge has a
    /// fixed size, so a FILL axis (pulled both ways) centers instead.
    pub fn from_mask(mask: u32) -> Self {
        let axis = |shift: u32| (mask >> shift) & 0x0F;
        const FILL: u32 = Gravity::AXIS_PULL_BEFORE | Gravity::AXIS_PULL_AFTER;

        let horizontal = match axis(Self::AXIS_X_SHIFT) {
            a if a & Self::AXIS_SPECIFIED == 0 => HorizontalGravity::End,
            a if a & FILL == FILL => HorizontalGravity::Center,
            a if a & Self::AXIS_PULL_BEFORE != 0 => HorizontalGravity::Start,
            a if a & Self::AXIS_PULL_AFTER != 0 => HorizontalGravity::End,
            _ => HorizontalGravity::Center,
        };
        let vertical = match axis(Self::AXIS_Y_SHIFT) {
            a if a & Self::AXIS_SPECIFIED == 0 => VerticalGravity::Top,
            a if a & FILL == FILL => VerticalGravity::Center,
            a if a & Self::AXIS_PULL_BEFORE != 0 => VerticalGravity::Top,
            a if a & Self::AXIS_PULL_AFTER != 0 => VerticalGravity::Bottom,
            _ => VerticalGravity::Center,
        };

        Self::new(horizontal, vertical)
    }

    /// Encodes this gravity as an Android-style bit mask.
    pub fn mask(&self) -> u32 {
        let horizontal = match self.horizontal {
            HorizontalGravity::Start => {
                Self::RELATIVE_LAYOUT_DIRECTION | Self::AXIS_SPECIFIED | Self::AXIS_PULL_BEFORE
            }
            HorizontalGravity::Center => Self::AXIS_SPECIFIED,
            HorizontalGravity::End => {
                Self::RELATIVE_LAYOUT_DIRECTION | Self::AXIS_SPECIFIED | Self::AXIS_PULL_AFTER
            }
        };
        let vertical = match self.vertical {
            VerticalGravity::Top => Self::AXIS_SPECIFIED | Self::AXIS_PULL_BEFORE,
            VerticalGravity::Center => Self::AXIS_SPECIFIED,
            VerticalGravity::Bottom => Self::AXIS_SPECIFIED | Self::AXIS_PULL_AFTER,
        };
        (horizontal << Self::AXIS_X_SHIFT) | (vertical << Self::AXIS_Y_SHIFT)
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::TOP_END
    }
}

// ============================================================================
// Placement
// ============================================================================

/// The single placement strategy a resolved badge uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Legacy four-corner arithmetic.
    Corner(BadgePosition),
    /// Gravity-anchored box.
    Gravity(Gravity),
}

impl Default for Placement {
    fn default() -> Self {
        Self::Gravity(Gravity::default())
    }
}

impl From<BadgePosition> for Placement {
    fn from(position: BadgePosition) -> Self {
        Self::Corner(position)
    }
}

impl From<Gravity> for Placement {
    fn from(gravity: Gravity) -> Self {
        Self::Gravity(gravity)
    }
}

impl Placement {
    /// Computes the badge rectangle inside `bounds`.
    ///
    /// `inset` is the border width (when shown) plus the margin.
    pub fn compute_badge_rect(&self, bounds: RectF, badge_size: f32, inset: f32) -> RectF {
        match *self {
            Placement::Corner(position) => corner_rect(position, bounds, badge_size, inset),
            Placement::Gravity(gravity) => gravity_rect(gravity, bounds, badge_size, inset),
        }
    }
}

/// Closed-form corner rectangle. The far edges sit `badge_size` from the image
/// edge and are not inset.
fn corner_rect(position: BadgePosition, bounds: RectF, size: f32, inset: f32) -> RectF {
    let RectF {
        left,
        top,
        right,
        bottom,
    } = bounds;

    match position {
        BadgePosition::TopLeft => {
            RectF::new(left + inset, top + inset, left + size, top + size)
        }
        BadgePosition::TopRight => {
            RectF::new(right - size, top + inset, right - inset, top + size)
        }
        BadgePosition::BottomLeft => {
            RectF::new(left + inset, bottom - size, left + size, bottom - inset)
        }
        BadgePosition::BottomRight => {
            RectF::new(right - size, bottom - size, right - inset, bottom - inset)
        }
    }
}

/// Gravity rectangle: a full `size x size` box shifted inward by `inset` on
/// the axes anchored to an edge. Centered axes are not shifted.
fn gravity_rect(gravity: Gravity, bounds: RectF, size: f32, inset: f32) -> RectF {
    let left = match gravity.horizontal {
        HorizontalGravity::Start => bounds.left + inset,
        HorizontalGravity::Center => bounds.left + (bounds.width() - size) / 2.0,
        HorizontalGravity::End => bounds.right - inset - size,
    };
    let top = match gravity.vertical {
        VerticalGravity::Top => bounds.top + inset,
        VerticalGravity::Center => bounds.top + (bounds.height() - size) / 2.0,
        VerticalGravity::Bottom => bounds.bottom - inset - size,
    };

    RectF::new(left, top, left + size, top + size)
}
