#![forbid(unsafe_code)]

//! Tour configuration.
//!
//! [`TourConfig`] collects every tunable the runtime reads. It can be built in
//! code with the setters or, with the `config` feature, loaded from TOML or
//! JSON:
//!
//! ```toml
//! pointer_size = 12
//! dim_amount = 0.4
//!
//! [tip_defaults]
//! align = "Auto"
//! max_width = 320
//! ```
//!
//! Every field has a default, so a partial file is fine.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use guidepost_layout::{Alignment, SizeConstraints};

/// Defaults applied to tips that leave a field unset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TipDefaults {
    pub align: Alignment,
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub padding: i32,
    pub pointer_position: f32,
    pub highlighting: bool,
}

impl Default for TipDefaults {
    fn default() -> Self {
        Self {
            align: Alignment::LeftBelow,
            min_width: 48,
            max_width: 480,
            min_height: 32,
            padding: 12,
            pointer_position: 0.5,
            highlighting: true,
        }
    }
}

impl TipDefaults {
    pub fn constraints(&self) -> SizeConstraints {
        SizeConstraints::new(self.min_width, self.max_width, self.min_height)
    }
}

/// Runtime configuration of a [`Tour`](crate::Tour).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TourConfig {
    /// How far a pointer protrudes from the tip body, in pixels.
    pub pointer_size: i32,
    /// Backdrop dim of highlighted groups, `0.0..=1.0`.
    pub dim_amount: f32,
    /// Global switch for pointer animations.
    pub pointer_animation: bool,
    pub tip_defaults: TipDefaults,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            pointer_size: 10,
            dim_amount: 0.3,
            pointer_animation: true,
            tip_defaults: TipDefaults::default(),
        }
    }
}

impl TourConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pointer_size(mut self, pointer_size: i32) -> Self {
        self.pointer_size = pointer_size;
        self
    }

    #[must_use]
    pub fn dim_amount(mut self, dim_amount: f32) -> Self {
        self.dim_amount = dim_amount;
        self
    }

    #[must_use]
    pub fn pointer_animation(mut self, enabled: bool) -> Self {
        self.pointer_animation = enabled;
        self
    }

    #[must_use]
    pub fn tip_defaults(mut self, defaults: TipDefaults) -> Self {
        self.tip_defaults = defaults;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Every out-of-range field, as readable messages. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.pointer_size < 0 {
            errors.push(format!("pointer_size must be >= 0, got {}", self.pointer_size));
        }
        if !(0.0..=1.0).contains(&self.dim_amount) {
            errors.push(format!(
                "dim_amount must be in [0, 1], got {}",
                self.dim_amount
            ));
        }
        let d = &self.tip_defaults;
        for (name, value) in [
            ("min_width", d.min_width),
            ("max_width", d.max_width),
            ("min_height", d.min_height),
            ("padding", d.padding),
        ] {
            if value < 0 {
                errors.push(format!("tip_defaults.{name} must be >= 0, got {value}"));
            }
        }
        if d.max_width < d.min_width {
            errors.push(format!(
                "tip_defaults.max_width ({}) is below min_width ({})",
                d.max_width, d.min_width
            ));
        }
        if !d.pointer_position.is_finite() {
            errors.push("tip_defaults.pointer_position must be finite".into());
        }
        errors
    }

    /// `self` if it passes [`validate`](Self::validate).
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
