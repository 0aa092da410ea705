#![forbid(unsafe_code)]

//! Tip and group configuration.
//!
//! A [`Tip`] is plain configuration: what it points at, what it says and how it
//! should be placed. Anything left unset falls back to the tour's
//! [`TipDefaults`](crate::config::TipDefaults) when the tip is added.

use guidepost_layout::{Alignment, Margins, PointerSpec, SizeConstraints};

use crate::anchor::Anchor;
use crate::config::TipDefaults;
use crate::error::{Result, TourError};

/// Horizontal alignment of the tip's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum TextGravity {
    #[default]
    Center,
    Start,
}

/// One anchored tip.
#[derive(Debug, Clone, PartialEq)]
pub struct Tip {
    pub(crate) anchor: Anchor,
    pub(crate) text: String,
    pub(crate) align: Option<Alignment>,
    pub(crate) margins: Margins,
    pub(crate) constraints: Option<SizeConstraints>,
    pub(crate) padding: Option<i32>,
    pub(crate) gravity: TextGravity,
    pub(crate) pointer: Option<PointerSpec>,
    pub(crate) highlighting: Option<bool>,
}

impl Tip {
    pub fn new(anchor: Anchor, text: impl Into<String>) -> Self {
        Self {
            anchor,
            text: text.into(),
            align: None,
            margins: Margins::default(),
            constraints: None,
            padding: None,
            gravity: TextGravity::default(),
            pointer: None,
            highlighting: None,
        }
    }

    #[must_use]
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }

    /// Alignment from its integer code; rejects codes outside the enum.
    pub fn align_code(self, code: i32) -> Result<Self> {
        let align = Alignment::from_code(code).map_err(|err| TourError::invalid(err.to_string()))?;
        Ok(self.align(align))
    }

    #[must_use]
    pub fn margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = margins.into();
        self
    }

    #[must_use]
    pub fn constraints(mut self, constraints: SizeConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: i32) -> Self {
        self.padding = Some(padding);
        self
    }

    #[must_use]
    pub fn gravity(mut self, gravity: TextGravity) -> Self {
        self.gravity = gravity;
        self
    }

    #[must_use]
    pub fn pointer(mut self, pointer: PointerSpec) -> Self {
        self.pointer = Some(pointer);
        self
    }

    /// Highlighting for a tip added on its own. Ignored inside a group, which
    /// carries its own flag.
    #[must_use]
    pub fn highlighting(mut self, enabled: bool) -> Self {
        self.highlighting = Some(enabled);
        self
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fill every unset field from `defaults`.
    pub(crate) fn with_defaults(mut self, defaults: &TipDefaults) -> Self {
        self.align = self.align.or(Some(defaults.align));
        self.constraints = self.constraints.or(Some(defaults.constraints()));
        self.padding = self.padding.or(Some(defaults.padding));
        self.pointer = self.pointer.or(Some(PointerSpec {
            position: defaults.pointer_position,
            ..PointerSpec::default()
        }));
        self
    }

    pub(crate) fn resolved_align(&self) -> Alignment {
        self.align.unwrap_or_default()
    }

    pub(crate) fn resolved_constraints(&self) -> SizeConstraints {
        self.constraints.unwrap_or_default()
    }

    pub(crate) fn resolved_pointer(&self) -> PointerSpec {
        self.pointer.unwrap_or_default()
    }
}

/// Tips shown and dismissed together.
#[derive(Debug, Clone, PartialEq)]
pub struct TipGroup {
    pub(crate) tips: Vec<Tip>,
    pub(crate) highlighting: bool,
}

impl TipGroup {
    /// Point anchors have nothing to highlight, so any point-anchored member
    /// switches highlighting off for the whole group.
    pub(crate) fn new(highlighting: bool, tips: Vec<Tip>) -> Result<Self> {
        if tips.is_empty() {
            return Err(TourError::invalid("a tip group needs at least one tip"));
        }
        let highlighting = highlighting && !tips.iter().any(|tip| tip.anchor.is_point());
        Ok(Self { tips, highlighting })
    }

    pub fn len(&self) -> usize {
        self.tips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }

    pub fn highlighting(&self) -> bool {
        self.highlighting
    }

    pub fn tips(&self) -> &[Tip] {
        &self.tips
    }
}
