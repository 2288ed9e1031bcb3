#![forbid(unsafe_code)]

//! Perch error model and graceful degradation.
//!
//! Placement and activation cannot fail: degenerate geometry is clamped and
//! every tap has a defined transition. What can fail is getting a
//! configuration into the process. Every error maps to a
//! [`DegradationAction`] so the host can keep its tooltips working on
//! defaults instead of aborting.

use std::fmt;

use perch_runtime::{ConfigError, OverlayConfig};

/// Top-level error type for Perch.
#[derive(Debug)]
pub enum Error {
    /// Overlay configuration could not be loaded or is out of range.
    Config(ConfigError),
    /// Raw I/O error (convenience variant for `?` on io::Result).
    Io(std::io::Error),
}

/// Standard result type for Perch APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// What the host should do when an error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// Keep going with [`OverlayConfig::default`].
    UseDefaults,
    /// Stop showing tooltips until the host recovers.
    DisableOverlay,
}

impl Error {
    /// Recovery action for this error.
    pub fn degradation(&self) -> DegradationAction {
        match self {
            Self::Config(_) => DegradationAction::UseDefaults,
            Self::Io(_) => DegradationAction::DisableOverlay,
        }
    }

    /// Error type label for tracing.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Config(ConfigError::Io(_)) => "config_io",
            Self::Config(ConfigError::Validation(_)) => "config_validation",
            #[allow(unreachable_patterns)]
            Self::Config(_) => "config_parse",
            Self::Io(_) => "io",
        }
    }

    /// Whether the overlay can keep running.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.degradation(), DegradationAction::DisableOverlay)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Io(err) => write!(f, "I/O: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Unwrap a loaded config, falling back to defaults on a recoverable error.
///
/// Unrecoverable errors are returned unchanged.
pub fn config_or_default<E>(loaded: std::result::Result<OverlayConfig, E>) -> Result<OverlayConfig>
where
    E: Into<Error>,
{
    match loaded {
        Ok(config) => Ok(config),
        Err(err) => {
            let err = err.into();
            if !err.is_recoverable() {
                return Err(err);
            }
            tracing::warn!(
                target: "perch.config",
                error_type = err.error_type(),
                error = %err,
                "using default overlay config"
            );
            Ok(OverlayConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_degrade_to_defaults() {
        let err = Error::from(ConfigError::Validation(vec!["gap must be >= 0".into()]));
        assert_eq!(err.degradation(), DegradationAction::UseDefaults);
        assert!(err.is_recoverable());
        assert_eq!(err.error_type(), "config_validation");
        assert_eq!(err.to_string(), "config: validation errors: gap must be >= 0");
    }

    #[test]
    fn io_errors_disable_overlay() {
        let err = Error::from(std::io::Error::other("gone"));
        assert_eq!(err.degradation(), DegradationAction::DisableOverlay);
        assert!(!err.is_recoverable());
        assert_eq!(err.error_type(), "io");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn config_io_is_labelled() {
        let err = Error::from(ConfigError::Io(std::io::Error::other("missing")));
        assert_eq!(err.error_type(), "config_io");
        assert!(err.is_recoverable());
    }

    #[test]
    fn fallback_keeps_valid_config() {
        let mut config = OverlayConfig::default();
        config.gap = 4.0;
        let loaded: std::result::Result<_, ConfigError> = Ok(config.clone());
        assert_eq!(config_or_default(loaded).unwrap(), config);
    }

    #[test]
    fn fallback_replaces_invalid_config() {
        let loaded: std::result::Result<OverlayConfig, ConfigError> =
            Err(ConfigError::Validation(vec!["bad".into()]));
        assert_eq!(config_or_default(loaded).unwrap(), OverlayConfig::default());
    }

    #[test]
    fn fallback_passes_unrecoverable_errors_through() {
        let loaded: std::result::Result<OverlayConfig, std::io::Error> =
            Err(std::io::Error::other("fd closed"));
        assert!(matches!(config_or_default(loaded), Err(Error::Io(_))));
    }

    #[cfg(feature = "config")]
    #[test]
    fn fallback_on_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = OverlayConfig::from_toml_file(dir.path().join("perch.toml"));
        assert_eq!(config_or_default(loaded).unwrap(), OverlayConfig::default());
    }
}
