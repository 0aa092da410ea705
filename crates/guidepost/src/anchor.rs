#![forbid(unsafe_code)]

//! Anchor resolution.
//!
//! An [`Anchor`] says what a tip points at. An [`AnchorResolver`] turns it into
//! a rectangle on the host surface in two steps:
//!
//! 1. [`locate`](AnchorResolver::locate) finds the target view (or accepts the
//!    point) and fails with [`TourError::TargetNotFound`] if the host doesn't
//!    know it. The tour does this for a whole group before touching the host,
//!    which is what makes `show` transactional.
//! 2. [`resolve`](AnchorResolver::resolve) reads the target's rectangle once
//!    it has been laid out.
//!
//! Both steps cache. The resolver lives as long as the group is on screen and
//! is dropped with it on teardown, so a group shown again queries afresh.

use std::fmt;

use guidepost_layout::{Point, Rect};

use crate::error::{Result, TourError};
use crate::host::{Surface, ViewId, ViewRef};

/// What a tip points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// A view looked up by id when the tip is shown.
    ById(ViewId),
    /// A view the caller already holds.
    ByRef(ViewRef),
    /// A bare point in absolute surface coordinates.
    AtPoint(Point),
}

impl Anchor {
    /// Point anchors have no view, so there is nothing to highlight.
    #[inline]
    pub const fn is_point(&self) -> bool {
        matches!(self, Self::AtPoint(_))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "view id {id}"),
            Self::ByRef(view) => write!(f, "view {view}"),
            Self::AtPoint(p) => write!(f, "point ({}, {})", p.x, p.y),
        }
    }
}

/// Where an anchor landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorTarget {
    View(ViewRef),
    Point(Point),
}

impl AnchorTarget {
    #[inline]
    pub const fn view(&self) -> Option<ViewRef> {
        match self {
            Self::View(view) => Some(*view),
            Self::Point(_) => None,
        }
    }
}

/// Find the target of `anchor` without caching.
pub fn locate<S: Surface + ?Sized>(anchor: Anchor, surface: &S) -> Result<AnchorTarget> {
    let found = match anchor {
        Anchor::ById(id) => surface.find_by_id(id),
        Anchor::ByRef(view) => surface.view_rect(view).map(|_| view),
        Anchor::AtPoint(point) => return Ok(AnchorTarget::Point(point)),
    };
    found
        .map(AnchorTarget::View)
        .ok_or(TourError::TargetNotFound { anchor })
}

/// Per-tip resolution cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorResolver {
    target: Option<AnchorTarget>,
    rect: Option<Rect>,
}

impl AnchorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find (or recall) the anchor's target.
    pub fn locate<S: Surface + ?Sized>(
        &mut self,
        anchor: Anchor,
        surface: &S,
    ) -> Result<AnchorTarget> {
        if let Some(target) = self.target {
            return Ok(target);
        }
        let target = locate(anchor, surface)?;
        self.target = Some(target);
        Ok(target)
    }

    /// Seed the cache with an already located target.
    pub fn prime(&mut self, target: AnchorTarget) {
        self.target = Some(target);
        self.rect = None;
    }

    /// Absolute rectangle of the anchor's target.
    ///
    /// Point anchors resolve to a zero-sized rectangle. The first successful
    /// call is cached; later calls don't query the host again.
    pub fn resolve<S: Surface + ?Sized>(&mut self, anchor: Anchor, surface: &S) -> Result<Rect> {
        if let Some(rect) = self.rect {
            return Ok(rect);
        }
        let rect = match self.locate(anchor, surface)? {
            AnchorTarget::Point(point) => Rect::at_point(point),
            AnchorTarget::View(view) => surface
                .view_rect(view)
                .ok_or(TourError::TargetNotFound { anchor })?,
        };
        self.rect = Some(rect);
        Ok(rect)
    }

    #[inline]
    pub fn target(&self) -> Option<AnchorTarget> {
        self.target
    }

}
