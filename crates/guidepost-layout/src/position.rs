#![forbid(unsafe_code)]

//! Tip position calculation.
//!
//! [`compute_position`] maps a target rectangle, the measured tip size and a
//! concrete [`Placement`] to the absolute top-left corner of the tip's bounding
//! box. Integer arithmetic throughout; halving truncates toward zero.
//!
//! Margins are added on the "outward" axis for most placements. The three
//! exceptions subtract: the vertical margin of `*Above` placements pushes the
//! tip further up, the horizontal margin of `Left*` placements pushes it
//! further left, and the vertical margin of `LeftBottom`/`RightBottom` lifts
//! the tip's bottom edge above the target's.

use crate::alignment::Placement;
use crate::geometry::{Margins, Point, Rect, Size};

/// Absolute top-left corner for a tip of `tip` size placed at `placement`.
///
/// `pointer_size` is how far the pointer protrudes from the tip body; it only
/// matters for [`Placement::CenterInside`], which centers the body (not the
/// pointer) over the target.
pub fn compute_position(
    target: Rect,
    tip: Size,
    placement: Placement,
    margins: Margins,
    pointer_size: i32,
) -> Point {
    let Margins {
        horizontal: mx,
        vertical: my,
    } = margins;

    let x = match placement {
        Placement::LeftBelow | Placement::LeftAbove => target.x + mx,
        Placement::RightBelow | Placement::RightAbove => target.x + (target.width - tip.width) + mx,
        Placement::CenterBelow | Placement::CenterAbove | Placement::CenterInside => {
            target.x + (target.width - tip.width) / 2 + mx
        }
        Placement::Left | Placement::LeftTop | Placement::LeftBottom => {
            target.x - tip.width - mx
        }
        Placement::Right | Placement::RightTop | Placement::RightBottom => {
            target.x + target.width + mx
        }
    };

    let y = match placement {
        Placement::LeftBelow | Placement::RightBelow | Placement::CenterBelow => {
            target.y + target.height + my
        }
        Placement::LeftAbove | Placement::RightAbove | Placement::CenterAbove => {
            target.y - tip.height - my
        }
        Placement::Left | Placement::Right => target.y + (target.height - tip.height) / 2 + my,
        Placement::LeftTop | Placement::RightTop => target.y + my,
        Placement::LeftBottom | Placement::RightBottom => {
            target.y + (target.height - tip.height) - my
        }
        Placement::CenterInside => {
            let body_height = tip.height - pointer_size;
            target.y + (target.height - body_height) / 2 + my
        }
    };

    Point::new(x, y)
}
