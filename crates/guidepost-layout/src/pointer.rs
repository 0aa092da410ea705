#![forbid(unsafe_code)]

//! Pointer geometry: where along its edge a tip's pointer sits, and how the
//! pointer's protrusion changes the size hints given to the host.

use crate::alignment::PointerMode;
use crate::error::{LayoutError, Result};
use crate::geometry::{Size, SizeConstraints};

/// Smallest pointer fraction; keeps the pointer clear of the rounded corner.
pub const MIN_POINTER_FRACTION: f32 = 0.1;
/// Largest pointer fraction.
pub const MAX_POINTER_FRACTION: f32 = 0.9;
/// Fraction at which a pointer animation starts.
pub const POINTER_ANIMATION_START: f32 = 0.5;

/// Pointer configuration of one tip.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerSpec {
    /// Fraction along the facing edge, `0.0..=1.0` before clamping.
    pub position: f32,
    /// Pixel offset from the edge's midpoint. Non-zero overrides `position`.
    pub offset: i32,
    /// Whether the host should animate the pointer into place.
    pub animated: bool,
}

impl Default for PointerSpec {
    fn default() -> Self {
        Self {
            position: 0.5,
            offset: 0,
            animated: true,
        }
    }
}

impl PointerSpec {
    /// A pointer at a fraction of the facing edge.
    pub fn at(position: f32) -> Result<Self> {
        if !position.is_finite() {
            return Err(LayoutError::InvalidPointerPosition(position));
        }
        Ok(Self {
            position,
            ..Self::default()
        })
    }

    /// A pointer at a pixel offset from the facing edge's midpoint.
    pub fn offset_by(offset: i32) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    /// Clamped pointer fraction for a tip of `size` drawn in `mode`.
    pub fn fraction(&self, size: Size, mode: PointerMode) -> f32 {
        if self.offset == 0 {
            return clamp_fraction(self.position);
        }
        let edge = if mode.is_vertical() {
            size.width
        } else {
            size.height
        };
        if edge <= 0 {
            return clamp_fraction(0.5);
        }
        let edge = edge as f32;
        clamp_fraction((edge / 2.0 + self.offset as f32) / edge)
    }
}

#[inline]
fn clamp_fraction(value: f32) -> f32 {
    value.clamp(MIN_POINTER_FRACTION, MAX_POINTER_FRACTION)
}

/// Pointer animation the host is asked to run once a tip is in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerAnimation {
    pub from_fraction: f32,
    pub to_fraction: f32,
    pub from_protrusion: f32,
    pub to_protrusion: f32,
}

impl PointerAnimation {
    /// Slide from the edge midpoint to `fraction` while the pointer grows out.
    pub fn settle_at(fraction: f32) -> Self {
        Self {
            from_fraction: POINTER_ANIMATION_START,
            to_fraction: fraction,
            from_protrusion: 0.0,
            to_protrusion: 1.0,
        }
    }
}

/// Size hints for a tip drawn in `mode`: the axis the pointer protrudes along
/// gets `pointer_size` extra room.
pub fn constraints_for_mode(
    base: SizeConstraints,
    mode: PointerMode,
    pointer_size: i32,
) -> SizeConstraints {
    if mode.is_horizontal() {
        SizeConstraints {
            min_width: base.min_width + pointer_size,
            max_width: base.max_width + pointer_size,
            min_height: base.min_height,
        }
    } else {
        SizeConstraints {
            min_height: base.min_height + pointer_size,
            ..base
        }
    }
}
