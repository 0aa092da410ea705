#![forbid(unsafe_code)]

//! The host protocol.
//!
//! The tour never owns a view. It asks a [`Host`] to create, move and remove
//! overlays and to report when a layout pass has happened, and it refers to
//! every view through an opaque [`ViewRef`] the host hands out.
//!
//! # Event flow
//!
//! Host callbacks are not invoked from inside the tour. Instead the host
//! records the [`LayoutToken`] it was given in
//! [`Host::observe_next_layout`] and, after its next layout pass, feeds it back
//! through [`Tour::handle_event`](crate::Tour::handle_event). Touches travel the
//! same way. All of this happens on the UI thread.

use std::fmt;

use guidepost_layout::{Point, PointerAnimation, PointerMode, PointerSpec, Rect, SizeConstraints};

use crate::tip::TextGravity;

/// Identifier the host uses to look views up in its own tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to a live host view.
///
/// Handles are issued by the host and compared by identity only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewRef(u64);

impl ViewRef {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ticket for one pending "next layout pass" observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutToken(u64);

impl LayoutToken {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

bitflags::bitflags! {
    /// Window-level flags for an overlay.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OverlayFlags: u32 {
        /// The overlay never takes input focus.
        const NOT_FOCUSABLE       = 0b0000_0001;
        /// Coordinates are absolute surface coordinates, insets included.
        const LAYOUT_IN_SCREEN    = 0b0000_0010;
        /// Touches outside the overlay are reported as outside touches.
        const WATCH_OUTSIDE_TOUCH = 0b0000_0100;
        /// Dim everything behind the overlay.
        const DIM_BEHIND          = 0b0000_1000;
        /// Play the host's entry animation when the overlay appears.
        const ANIMATE_ENTRY       = 0b0001_0000;
    }
}

impl OverlayFlags {
    /// Flags of a tip added straight to the surface.
    pub const fn standalone_tip() -> Self {
        Self::NOT_FOCUSABLE
            .union(Self::LAYOUT_IN_SCREEN)
            .union(Self::ANIMATE_ENTRY)
    }

    /// Flags of the dimmed container a highlighted group lives in.
    pub const fn container() -> Self {
        Self::NOT_FOCUSABLE
            .union(Self::LAYOUT_IN_SCREEN)
            .union(Self::WATCH_OUTSIDE_TOUCH)
            .union(Self::DIM_BEHIND)
    }
}

/// Everything the host needs to build a tip view.
#[derive(Debug, Clone, PartialEq)]
pub struct TipViewSpec {
    pub text: String,
    /// Pointer mode known up front; `None` while the alignment is automatic.
    pub mode: Option<PointerMode>,
    /// Measurement hints, already adjusted for the pointer.
    pub constraints: SizeConstraints,
    pub padding: i32,
    pub gravity: TextGravity,
    pub pointer: PointerSpec,
    pub pointer_size: i32,
}

/// What kind of overlay to create.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlaySpec {
    /// Dimmed full-surface container for a highlighted group.
    Container { dim_amount: f32 },
    /// A cut-out that shows the target through the dim, inside `parent`.
    Highlight { parent: ViewRef },
    /// A tip view, either top-level or inside a container.
    Tip {
        parent: Option<ViewRef>,
        view: TipViewSpec,
    },
}

/// Final pointer geometry for a measured tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TipUpdate {
    pub mode: PointerMode,
    pub constraints: SizeConstraints,
    pub pointer_fraction: f32,
}

/// Read access to the host's view tree.
pub trait Surface {
    /// Look a view up by id.
    fn find_by_id(&self, id: ViewId) -> Option<ViewRef>;

    /// Absolute rectangle of a view, or `None` if the view is not in the tree.
    fn view_rect(&self, view: ViewRef) -> Option<Rect>;

    /// Whether the view has been through at least one layout pass.
    fn is_measured(&self, view: ViewRef) -> bool;

    /// Visible part of the surface. The origin is the leading inset.
    fn visible_bounds(&self) -> Rect;
}

/// Overlay management and layout observation.
pub trait Host: Surface {
    fn add_overlay(&mut self, spec: &OverlaySpec, rect: Rect, flags: OverlayFlags) -> ViewRef;

    fn update_overlay_position(&mut self, view: ViewRef, at: Point);

    fn update_overlay_bounds(&mut self, view: ViewRef, bounds: Rect);

    fn update_overlay_flags(&mut self, view: ViewRef, flags: OverlayFlags);

    fn update_tip(&mut self, view: ViewRef, update: &TipUpdate);

    fn start_pointer_animation(&mut self, view: ViewRef, animation: PointerAnimation);

    /// Remove an overlay. Removing a container removes its children.
    fn remove_overlay(&mut self, view: ViewRef);

    /// Deliver `token` back to the tour after the next layout pass that
    /// includes `view`. Fires at most once.
    fn observe_next_layout(&mut self, view: ViewRef, token: LayoutToken);

    /// Revoke a pending observation.
    fn cancel_layout(&mut self, token: LayoutToken);

    /// Paint a snapshot of `target` into the highlight view `into`.
    fn capture_highlight(&mut self, target: ViewRef, into: ViewRef);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_flags() {
        let tip = OverlayFlags::standalone_tip();
        assert!(tip.contains(OverlayFlags::NOT_FOCUSABLE));
        assert!(!tip.contains(OverlayFlags::WATCH_OUTSIDE_TOUCH));
        let container = OverlayFlags::container();
        assert!(container.contains(OverlayFlags::DIM_BEHIND | OverlayFlags::WATCH_OUTSIDE_TOUCH));
        assert!(!container.contains(OverlayFlags::ANIMATE_ENTRY));
    }

    #[test]
    fn handles_display_compactly() {
        assert_eq!(ViewRef::new(12).to_string(), "#12");
        assert_eq!(ViewId(7).to_string(), "7");
        assert_eq!(LayoutToken::new(5).raw(), 5);
    }
}
