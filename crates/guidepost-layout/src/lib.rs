#![forbid(unsafe_code)]

//! Anchor geometry for Guidepost.
//!
//! # Role in Guidepost
//! `guidepost-layout` is the pure half of the tip engine. Given a target
//! rectangle and a measured tip size it answers two questions:
//! - **Which placement?** [`select_placement`] validates an explicit
//!   [`Alignment`] or picks one for [`Alignment::Auto`].
//! - **Where exactly?** [`compute_position`] maps a concrete [`Placement`] to
//!   the tip's top-left corner.
//!
//! Pointer math ([`PointerSpec`], [`constraints_for_mode`]) lives here too.
//! Nothing in this crate talks to a host; the runtime in `guidepost` feeds it
//! measured rectangles and applies the results.

pub mod alignment;
pub mod error;
pub mod geometry;
pub mod pointer;
pub mod position;
pub mod select;

pub use alignment::{Alignment, Placement, PointerMode};
pub use error::{LayoutError, Result};
pub use geometry::{Margins, Point, Rect, Size, SizeConstraints};
pub use pointer::{
    MAX_POINTER_FRACTION, MIN_POINTER_FRACTION, PointerAnimation, PointerSpec,
    constraints_for_mode,
};
pub use position::compute_position;
pub use select::{Availability, auto_placement, select_placement};
