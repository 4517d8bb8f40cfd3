//! Configuration and round-setup errors
//!
//! The simulation itself has no failure modes; everything that can go wrong
//! is caught up front so bad input never turns into NaN positions mid-round.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A length/size parameter that must be strictly positive
    #[error("{name} must be a positive finite number (got {value})")]
    NonPositive { name: &'static str, value: f32 },

    /// A parameter that must be finite and >= 0
    #[error("{name} must be a finite number >= 0 (got {value})")]
    Negative { name: &'static str, value: f32 },

    /// A parameter whose valid interval is bounded on both sides
    #[error("{name} must be within [{min}, {max}] (got {value})")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    /// Entities do not fit inside the arena
    #[error("entity size {size} does not fit inside an arena of radius {radius}")]
    EntityTooLarge { size: f32, radius: f32 },

    /// Requested zero entities for a round
    #[error("entity count must be at least 1")]
    ZeroEntities,

    /// No candidates were supplied to pick entities from
    #[error("candidate list is empty")]
    NoCandidates,

    /// Two candidates share an identity (tallies and elimination order key on it)
    #[error("duplicate candidate id '{0}'")]
    DuplicateCandidate(String),

    /// JSON configuration could not be parsed
    #[error("invalid configuration JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}

/// Positive and finite
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Finite and non-negative
pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

pub(crate) fn ensure_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
