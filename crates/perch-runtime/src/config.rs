#![forbid(unsafe_code)]

//! Overlay configuration as data.
//!
//! [`OverlayConfig`] collects every tunable of the tooltip overlay: layout
//! margins, the placeholder size used before the bubble is measured, pointer
//! geometry, the hide debounce, motion parameters and the bubble style. With
//! the `config` feature it loads from TOML or JSON; missing keys keep their
//! defaults.
//!
//! ```toml
//! # perch.toml
//! gap = 6.0
//! hide_debounce_ms = 150
//!
//! [margins]
//! right = 24.0
//!
//! [motion]
//! response = 0.3
//!
//! [style]
//! corner_radius = 12.0
//! background = "#202024"
//! ```
//!
//! ```rust,ignore
//! let config = OverlayConfig::from_toml_file("perch.toml")?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use perch_core::animation::{Spring, spring};
use perch_core::{Insets, Size};
use perch_layout::{ArrowBounds, DEFAULT_GAP, DEFAULT_MARGIN};
use perch_style::TooltipStyle;
use web_time::Duration;

use crate::debounce::DEFAULT_HIDE_DEBOUNCE;

/// Size used to solve a placement before the bubble reports its real size.
pub const PLACEHOLDER_SIZE: Size = Size::new(180.0, 44.0);

/// Default pointer base width and height.
pub const DEFAULT_ARROW_SIZE: Size = Size::new(16.0, 10.0);

/// Default padding between the bubble edge and its label.
pub const DEFAULT_CONTENT_PADDING: f64 = 10.0;

/// Upper bound accepted for the hide debounce.
const MAX_HIDE_DEBOUNCE_MS: u64 = 10_000;

// ---------------------------------------------------------------------------
// OverlayConfig
// ---------------------------------------------------------------------------

/// Every tunable of a tooltip overlay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct OverlayConfig {
    /// Distance kept from each container edge. The trailing edge keeps more
    /// room by default.
    pub margins: Insets,
    /// Gap between target and bubble for targets that do not set their own.
    pub gap: f64,
    pub placeholder_size: Size,
    /// Where along the facing edge the pointer may attach.
    pub arrow_bounds: ArrowBounds,
    /// Pointer base width (along the edge) and height (away from it).
    pub arrow_size: Size,
    pub content_padding: f64,
    /// Delay between a hide and forgetting the active target.
    pub hide_debounce_ms: u64,
    pub motion: MotionConfig,
    pub style: TooltipStyle,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            margins: Insets::new(DEFAULT_MARGIN, DEFAULT_MARGIN, DEFAULT_MARGIN, 2.0 * DEFAULT_MARGIN),
            gap: DEFAULT_GAP,
            placeholder_size: PLACEHOLDER_SIZE,
            arrow_bounds: ArrowBounds::default(),
            arrow_size: DEFAULT_ARROW_SIZE,
            content_padding: DEFAULT_CONTENT_PADDING,
            hide_debounce_ms: DEFAULT_HIDE_DEBOUNCE.as_millis() as u64,
            motion: MotionConfig::default(),
            style: TooltipStyle::default(),
        }
    }
}

/// Appear/dismiss animation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct MotionConfig {
    /// Spring response in seconds.
    pub response: f64,
    /// 1.0 is critically damped.
    pub damping_fraction: f64,
    /// Scale the bubble starts from when appearing.
    pub initial_scale: f64,
    /// Keeps the scale anchor this far inside the bubble's unit square.
    pub scale_anchor_inset: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            response: spring::DEFAULT_RESPONSE,
            damping_fraction: spring::DEFAULT_DAMPING_FRACTION,
            initial_scale: 0.5,
            scale_anchor_inset: 0.02,
        }
    }
}

impl MotionConfig {
    /// A normalized spring (0 → 1) with these parameters.
    pub fn spring(&self) -> Spring {
        Spring::from_response(self.response, self.damping_fraction)
    }
}

impl OverlayConfig {
    #[inline]
    pub fn hide_debounce(&self) -> Duration {
        Duration::from_millis(self.hide_debounce_ms)
    }

    /// Load from a TOML string and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.into_validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.into_validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSerialize)
    }

    /// Check every parameter against its accepted range.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !finite_insets(&self.margins) || !self.margins.is_non_negative() {
            errors.push(format!(
                "margins must be finite and >= 0, got {:?}",
                self.margins
            ));
        }

        if !(self.gap.is_finite() && self.gap >= 0.0) {
            errors.push(format!("gap must be finite and >= 0, got {}", self.gap));
        }

        if !(self.placeholder_size.width > 0.0 && self.placeholder_size.height > 0.0)
            || !self.placeholder_size.width.is_finite()
            || !self.placeholder_size.height.is_finite()
        {
            errors.push(format!(
                "placeholder_size must be finite and > 0, got {}x{}",
                self.placeholder_size.width, self.placeholder_size.height
            ));
        }

        if !(self.arrow_size.width.is_finite() && self.arrow_size.width >= 0.0)
            || !(self.arrow_size.height.is_finite() && self.arrow_size.height >= 0.0)
        {
            errors.push(format!(
                "arrow_size must be finite and >= 0, got {}x{}",
                self.arrow_size.width, self.arrow_size.height
            ));
        }

        if !(self.content_padding.is_finite() && self.content_padding >= 0.0) {
            errors.push(format!(
                "content_padding must be finite and >= 0, got {}",
                self.content_padding
            ));
        }

        if self.hide_debounce_ms > MAX_HIDE_DEBOUNCE_MS {
            errors.push(format!(
                "hide_debounce_ms must be <= {MAX_HIDE_DEBOUNCE_MS}, got {}",
                self.hide_debounce_ms
            ));
        }

        let motion = &self.motion;
        if !(motion.response.is_finite() && motion.response > 0.0) {
            errors.push(format!(
                "motion.response must be finite and > 0, got {}",
                motion.response
            ));
        }
        if !(motion.damping_fraction.is_finite() && motion.damping_fraction >= 0.0) {
            errors.push(format!(
                "motion.damping_fraction must be finite and >= 0, got {}",
                motion.damping_fraction
            ));
        }
        if !(motion.initial_scale > 0.0 && motion.initial_scale <= 1.0) {
            errors.push(format!(
                "motion.initial_scale must be in (0, 1], got {}",
                motion.initial_scale
            ));
        }
        if !(motion.scale_anchor_inset >= 0.0 && motion.scale_anchor_inset < 0.5) {
            errors.push(format!(
                "motion.scale_anchor_inset must be in [0, 0.5), got {}",
                motion.scale_anchor_inset
            ));
        }

        if !(self.style.corner_radius.is_finite() && self.style.corner_radius >= 0.0) {
            errors.push(format!(
                "style.corner_radius must be finite and >= 0, got {}",
                self.style.corner_radius
            ));
        }
        if !(self.style.border_width.is_finite() && self.style.border_width >= 0.0) {
            errors.push(format!(
                "style.border_width must be finite and >= 0, got {}",
                self.style.border_width
            ));
        }

        errors
    }

    #[cfg(feature = "config")]
    fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn finite_insets(insets: &Insets) -> bool {
    [insets.top, insets.left, insets.bottom, insets.right]
        .iter()
        .all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading an [`OverlayConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "config")]
    TomlSerialize(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Out-of-range values.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::TomlSerialize(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::TomlSerialize(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let errors = OverlayConfig::default().validate();
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn defaults_match_builtin_constants() {
        let config = OverlayConfig::default();
        assert_eq!(config.margins, Insets::new(8.0, 8.0, 8.0, 16.0));
        assert_eq!(config.gap, 8.0);
        assert_eq!(config.placeholder_size, Size::new(180.0, 44.0));
        assert_eq!(config.arrow_size, Size::new(16.0, 10.0));
        assert_eq!(config.content_padding, 10.0);
        assert_eq!(config.hide_debounce(), Duration::from_millis(200));
        assert_eq!(config.arrow_bounds, ArrowBounds::default());
        assert_eq!(config.motion.initial_scale, 0.5);
    }

    #[test]
    fn validate_catches_negative_margin() {
        let mut config = OverlayConfig::default();
        config.margins.left = -1.0;
        assert!(config.validate().iter().any(|e| e.contains("margins")));
    }

    #[test]
    fn validate_catches_empty_placeholder() {
        let mut config = OverlayConfig::default();
        config.placeholder_size = Size::ZERO;
        assert!(config.validate().iter().any(|e| e.contains("placeholder_size")));
    }

    #[test]
    fn validate_catches_nan_gap() {
        let mut config = OverlayConfig::default();
        config.gap = f64::NAN;
        assert!(config.validate().iter().any(|e| e.contains("gap")));
    }

    #[test]
    fn validate_catches_bad_motion() {
        let mut config = OverlayConfig::default();
        config.motion.response = 0.0;
        config.motion.initial_scale = 1.5;
        config.motion.scale_anchor_inset = 0.5;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("motion.response")));
        assert!(errors.iter().any(|e| e.contains("motion.initial_scale")));
        assert!(errors.iter().any(|e| e.contains("motion.scale_anchor_inset")));
    }

    #[test]
    fn validate_catches_long_debounce() {
        let mut config = OverlayConfig::default();
        config.hide_debounce_ms = 60_000;
        assert!(config.validate().iter().any(|e| e.contains("hide_debounce_ms")));
    }

    #[test]
    fn validate_catches_negative_radius() {
        let mut config = OverlayConfig::default();
        config.style.corner_radius = -2.0;
        assert!(config.validate().iter().any(|e| e.contains("style.corner_radius")));
    }

    #[test]
    fn motion_spring_is_normalized() {
        let spring = MotionConfig::default().spring();
        assert_eq!(spring.position(), 0.0);
        assert_eq!(spring.target(), 1.0);
    }

    #[test]
    fn error_display() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
        let io = ConfigError::from(std::io::Error::other("boom"));
        assert!(io.to_string().starts_with("I/O error"));
        assert!(std::error::Error::source(&io).is_some());
    }

    #[cfg(feature = "config")]
    #[test]
    fn partial_toml_keeps_defaults() {
        let config = OverlayConfig::from_toml_str(
            r##"
            gap = 4.0

            [margins]
            right = 24.0

            [style]
            corner_radius = 12.0
            background = "#202024"
            "##,
        )
        .unwrap();
        assert_eq!(config.gap, 4.0);
        assert_eq!(config.margins.right, 24.0);
        // A table replaces the whole value; its missing keys are zero.
        assert_eq!(config.margins.left, 0.0);
        assert_eq!(config.style.corner_radius, 12.0);
        assert_eq!(config.style.background, perch_style::Rgba::rgb(0x20, 0x20, 0x24));
        assert_eq!(config.hide_debounce_ms, 200);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_arrow_bounds_as_pair() {
        let config = OverlayConfig::from_json_str(r#"{"arrow_bounds": [0.1, 0.9]}"#).unwrap();
        assert_eq!(config.arrow_bounds, ArrowBounds::new(0.1, 0.9));
    }

    #[cfg(feature = "config")]
    #[test]
    fn invalid_values_are_rejected_on_load() {
        let err = OverlayConfig::from_json_str(r#"{"gap": -3.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.iter().any(|m| m.contains("gap"))));
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_round_trip() {
        let config = OverlayConfig::default();
        let text = config.to_toml_string().unwrap();
        let back = OverlayConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
