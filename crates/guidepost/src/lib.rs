#![forbid(unsafe_code)]

//! Sequenced, anchored tip overlays.
//!
//! # Role in Guidepost
//! `guidepost` is the runtime. It owns the tip sequencer ([`Tour`]), resolves
//! anchors against a host's view tree and drives the host through the
//! [`Host`] trait. Geometry comes from `guidepost-layout`, re-exported here.
//!
//! # Driving a tour
//!
//! ```rust,ignore
//! let mut tour = Tour::new(TourConfig::default());
//! tour.add_tip(Tip::new(Anchor::ById(ViewId(7)), "Start here"))?;
//! tour.add_group(true, [
//!     Tip::new(Anchor::ById(ViewId(8)), "Search").align(Alignment::Auto),
//!     Tip::new(Anchor::ById(ViewId(9)), "Filters"),
//! ])?;
//! tour.show(&mut host)?;
//!
//! // From the host's event loop:
//! tour.handle_event(&mut host, TourEvent::Layout(token))?;
//! tour.handle_event(&mut host, TourEvent::OutsideTouch)?;
//! ```
//!
//! Everything runs on the host's UI thread. Nothing blocks: [`Tour::show`]
//! returns as soon as the overlays are requested, and placement happens when
//! the host reports the next layout pass.

pub mod anchor;
pub mod config;
pub mod error;
pub mod gate;
pub mod host;
pub mod tip;
pub mod touch;
pub mod tour;

pub use anchor::{Anchor, AnchorResolver, AnchorTarget};
pub use config::{ConfigError, TipDefaults, TourConfig};
pub use error::{Result, TourError};
pub use gate::{LayoutGate, observation_target};
pub use host::{
    Host, LayoutToken, OverlayFlags, OverlaySpec, Surface, TipUpdate, TipViewSpec, ViewId,
    ViewRef,
};
pub use tip::{TextGravity, Tip, TipGroup};
pub use touch::{PressTracker, Touch, TouchKind};
pub use tour::{EventOutcome, SequencerState, Tour, TourEvent};

pub use guidepost_layout::{
    Alignment, LayoutError, Margins, Placement, Point, PointerAnimation, PointerMode, PointerSpec,
    Rect, Size, SizeConstraints,
};
