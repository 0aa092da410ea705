#![forbid(unsafe_code)]

//! Alignment vocabulary.
//!
//! [`Alignment`] is what a tip is configured with; it may be [`Alignment::Auto`].
//! [`Placement`] is the concrete subset the position calculator accepts, so an
//! unresolved `Auto` can never reach the geometry.

use crate::error::{LayoutError, Result};

/// Where a tip sits relative to its target. Concrete values only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    /// Above the target, left edges aligned.
    LeftAbove,
    /// Below the target, left edges aligned.
    LeftBelow,
    /// Above the target, right edges aligned.
    RightAbove,
    /// Below the target, right edges aligned.
    RightBelow,
    /// Above the target, horizontally centered.
    CenterAbove,
    /// Below the target, horizontally centered.
    CenterBelow,
    /// Left of the target, vertically centered.
    Left,
    /// Right of the target, vertically centered.
    Right,
    /// Left of the target, top edges aligned.
    LeftTop,
    /// Left of the target, bottom edges aligned.
    LeftBottom,
    /// Right of the target, top edges aligned.
    RightTop,
    /// Right of the target, bottom edges aligned.
    RightBottom,
    /// Centered over the target.
    CenterInside,
}

impl Placement {
    /// Every concrete placement, in code order.
    pub const ALL: [Placement; 13] = [
        Self::LeftAbove,
        Self::LeftBelow,
        Self::RightAbove,
        Self::RightBelow,
        Self::CenterAbove,
        Self::CenterBelow,
        Self::Left,
        Self::Right,
        Self::LeftTop,
        Self::LeftBottom,
        Self::RightTop,
        Self::RightBottom,
        Self::CenterInside,
    ];

    /// Which side of the target the tip's pointer faces.
    pub const fn pointer_mode(self) -> PointerMode {
        match self {
            Self::LeftBelow | Self::RightBelow | Self::CenterBelow => PointerMode::BelowTarget,
            Self::LeftAbove | Self::RightAbove | Self::CenterAbove | Self::CenterInside => {
                PointerMode::AboveTarget
            }
            Self::Left | Self::LeftTop | Self::LeftBottom => PointerMode::LeftOfTarget,
            Self::Right | Self::RightTop | Self::RightBottom => PointerMode::RightOfTarget,
        }
    }

    /// Stable integer code, shared with [`Alignment::code`].
    pub const fn code(self) -> i32 {
        match self {
            Self::LeftAbove => 1,
            Self::LeftBelow => 2,
            Self::RightAbove => 3,
            Self::RightBelow => 4,
            Self::CenterAbove => 5,
            Self::CenterBelow => 6,
            Self::Left => 7,
            Self::Right => 8,
            Self::LeftTop => 9,
            Self::LeftBottom => 10,
            Self::RightTop => 11,
            Self::RightBottom => 12,
            Self::CenterInside => 13,
        }
    }
}

/// Configured alignment of a tip: a concrete placement or a request for
/// automatic selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    LeftAbove,
    #[default]
    LeftBelow,
    RightAbove,
    RightBelow,
    CenterAbove,
    CenterBelow,
    Left,
    Right,
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
    CenterInside,
    /// Let the selector pick a placement once the tip has been measured.
    Auto,
}

impl Alignment {
    /// Integer code of [`Alignment::Auto`].
    pub const AUTO_CODE: i32 = 0;

    /// The concrete placement, or `None` for [`Alignment::Auto`].
    pub const fn placement(self) -> Option<Placement> {
        Some(match self {
            Self::LeftAbove => Placement::LeftAbove,
            Self::LeftBelow => Placement::LeftBelow,
            Self::RightAbove => Placement::RightAbove,
            Self::RightBelow => Placement::RightBelow,
            Self::CenterAbove => Placement::CenterAbove,
            Self::CenterBelow => Placement::CenterBelow,
            Self::Left => Placement::Left,
            Self::Right => Placement::Right,
            Self::LeftTop => Placement::LeftTop,
            Self::LeftBottom => Placement::LeftBottom,
            Self::RightTop => Placement::RightTop,
            Self::RightBottom => Placement::RightBottom,
            Self::CenterInside => Placement::CenterInside,
            Self::Auto => return None,
        })
    }

    #[inline]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Stable integer code. `Auto` is `0`, concrete values are `1..=13`.
    pub const fn code(self) -> i32 {
        match self.placement() {
            Some(placement) => placement.code(),
            None => Self::AUTO_CODE,
        }
    }

    /// Decode an integer alignment code.
    pub fn from_code(code: i32) -> Result<Self> {
        if code == Self::AUTO_CODE {
            return Ok(Self::Auto);
        }
        Placement::ALL
            .iter()
            .find(|placement| placement.code() == code)
            .map(|&placement| placement.into())
            .ok_or(LayoutError::InvalidAlignment(code))
    }
}

impl From<Placement> for Alignment {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::LeftAbove => Self::LeftAbove,
            Placement::LeftBelow => Self::LeftBelow,
            Placement::RightAbove => Self::RightAbove,
            Placement::RightBelow => Self::RightBelow,
            Placement::CenterAbove => Self::CenterAbove,
            Placement::CenterBelow => Self::CenterBelow,
            Placement::Left => Self::Left,
            Placement::Right => Self::Right,
            Placement::LeftTop => Self::LeftTop,
            Placement::LeftBottom => Self::LeftBottom,
            Placement::RightTop => Self::RightTop,
            Placement::RightBottom => Self::RightBottom,
            Placement::CenterInside => Self::CenterInside,
        }
    }
}

impl TryFrom<i32> for Alignment {
    type Error = LayoutError;

    fn try_from(code: i32) -> Result<Self> {
        Self::from_code(code)
    }
}

/// The side of the target a tip is drawn on, which decides the edge its
/// pointer protrudes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerMode {
    /// Tip below the target; pointer on the tip's top edge.
    #[default]
    BelowTarget,
    /// Tip above the target; pointer on the tip's bottom edge.
    AboveTarget,
    /// Tip left of the target; pointer on the tip's right edge.
    LeftOfTarget,
    /// Tip right of the target; pointer on the tip's left edge.
    RightOfTarget,
}

impl PointerMode {
    /// Whether the pointer sits on a horizontal edge (above/below modes).
    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::BelowTarget | Self::AboveTarget)
    }

    #[inline]
    pub const fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_for_every_member() {
        for placement in Placement::ALL {
            let alignment = Alignment::from(placement);
            assert_eq!(Alignment::from_code(alignment.code()), Ok(alignment));
            assert_eq!(alignment.placement(), Some(placement));
        }
        assert_eq!(Alignment::from_code(0), Ok(Alignment::Auto));
    }

    #[test]
    fn out_of_range_codes_are_rejected() {
        for code in [-1, 14, 99, i32::MIN, i32::MAX] {
            assert_eq!(
                Alignment::try_from(code),
                Err(LayoutError::InvalidAlignment(code))
            );
        }
    }

    #[test]
    fn auto_has_no_placement() {
        assert!(Alignment::Auto.is_auto());
        assert_eq!(Alignment::Auto.placement(), None);
        assert_eq!(Alignment::default(), Alignment::LeftBelow);
    }

    #[test]
    fn pointer_modes_follow_the_target_side() {
        assert_eq!(Placement::CenterBelow.pointer_mode(), PointerMode::BelowTarget);
        assert_eq!(Placement::RightAbove.pointer_mode(), PointerMode::AboveTarget);
        assert_eq!(Placement::CenterInside.pointer_mode(), PointerMode::AboveTarget);
        assert_eq!(Placement::LeftBottom.pointer_mode(), PointerMode::LeftOfTarget);
        assert_eq!(Placement::RightTop.pointer_mode(), PointerMode::RightOfTarget);
        assert!(PointerMode::AboveTarget.is_vertical());
        assert!(PointerMode::LeftOfTarget.is_horizontal());
    }
}
