#![forbid(unsafe_code)]

//! Automatic placement selection.
//!
//! [`select_placement`] passes a concrete alignment through untouched and
//! turns [`Alignment::Auto`] into a [`Placement`] by comparing the room around
//! the target against the measured tip size.
//!
//! # Decision order
//!
//! 1. A side (right, then left) wider than the tip: `Right`/`Left` when the tip
//!    is no taller than the target, otherwise the corner variant that grows
//!    into whichever of above/below has more room (`*Top` grows down,
//!    `*Bottom` grows up, plain `Right`/`Left` on a tie).
//! 2. Room below (then above) taller than the tip: `CenterBelow`/`CenterAbove`
//!    when the tip is no wider than the target, otherwise the edge-aligned
//!    variant named after whichever of left/right has more room (`Left*` for
//!    more room on the left, `Right*` for more on the right, `Center*` on a
//!    tie).
//! 3. Nowhere fits: `CenterInside`.
//!
//! The function is pure; identical inputs always give the same placement.

use crate::alignment::{Alignment, Placement};
use crate::geometry::{Margins, Rect, Size};

/// Room around a target inside the visible surface, margins already deducted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Availability {
    pub left: i32,
    pub right: i32,
    pub above: i32,
    pub below: i32,
}

impl Availability {
    /// Measure the space around `target` within `bounds`.
    ///
    /// `bounds` is the visible part of the surface. Its origin is the leading
    /// inset (a status bar, for instance), so the target is first translated
    /// into bounds-relative coordinates.
    pub fn measure(target: Rect, bounds: Rect, margins: Margins) -> Self {
        let x = target.x - bounds.x;
        let y = target.y - bounds.y;
        Self {
            left: x - margins.horizontal,
            right: bounds.width - (x + target.width + margins.horizontal),
            above: y - margins.vertical,
            below: bounds.height - (y + target.height + margins.vertical),
        }
    }
}

/// Resolve `align` to a concrete placement.
///
/// Concrete alignments are returned unchanged; `Auto` is decided by
/// [`auto_placement`].
pub fn select_placement(
    align: Alignment,
    target: Rect,
    tip: Size,
    bounds: Rect,
    margins: Margins,
) -> Placement {
    match align.placement() {
        Some(placement) => placement,
        None => auto_placement(Availability::measure(target, bounds, margins), target, tip),
    }
}

/// The automatic decision tree, on pre-measured availability.
pub fn auto_placement(room: Availability, target: Rect, tip: Size) -> Placement {
    let fits_right = room.right > tip.width;
    let fits_left = room.left > tip.width;
    if fits_right || fits_left {
        if tip.height <= target.height {
            return if fits_right {
                Placement::Right
            } else {
                Placement::Left
            };
        }
        let (grow_down, grow_up, level) = if fits_right {
            (Placement::RightTop, Placement::RightBottom, Placement::Right)
        } else {
            (Placement::LeftTop, Placement::LeftBottom, Placement::Left)
        };
        return pick_larger(room.below, room.above, grow_down, grow_up, level);
    }

    let fits_below = room.below > tip.height;
    let fits_above = room.above > tip.height;
    if fits_below || fits_above {
        let (more_left, more_right, centered) = if fits_below {
            (Placement::LeftBelow, Placement::RightBelow, Placement::CenterBelow)
        } else {
            (Placement::LeftAbove, Placement::RightAbove, Placement::CenterAbove)
        };
        if tip.width <= target.width {
            return centered;
        }
        return pick_larger(room.left, room.right, more_left, more_right, centered);
    }

    Placement::CenterInside
}

#[inline]
fn pick_larger(
    first: i32,
    second: i32,
    if_first: Placement,
    if_second: Placement,
    if_tie: Placement,
) -> Placement {
    match first.cmp(&second) {
        std::cmp::Ordering::Greater => if_first,
        std::cmp::Ordering::Less => if_second,
        std::cmp::Ordering::Equal => if_tie,
    }
}
