use guidepost_layout::LayoutError;
use thiserror::Error;

use crate::anchor::Anchor;
use crate::host::ViewRef;

pub type Result<T> = std::result::Result<T, TourError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TourError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("invalid state: {message}")]
    InvalidState { message: String },

    #[error("target not found for anchor {anchor}")]
    TargetNotFound { anchor: Anchor },

    #[error("host reports no geometry for view {view}")]
    MissingGeometry { view: ViewRef },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl TourError {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Whether the failed call left the tour exactly as it was.
    ///
    /// Every error is rejected before any host mutation except
    /// [`TourError::MissingGeometry`], which is raised from a layout pass after
    /// the group is already on screen. The tour closes that group before
    /// returning it.
    #[must_use]
    pub fn is_transactional(&self) -> bool {
        !matches!(self, Self::MissingGeometry { .. })
    }
}
