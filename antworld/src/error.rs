//! Error types for world construction.

use shared::Pos;
use thiserror::Error;

/// A configuration that cannot produce a valid world.
///
/// Raised by [`crate::WorldConfig::validate`] and by world construction;
/// values are reported, never clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    EmptyGrid { width: usize, height: usize },

    #[error("{name} must be between 0.0 and 1.0 (got {value})")]
    RateOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be a finite, non-negative number (got {value})")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be greater than zero")]
    NotPositive { name: &'static str },

    #[error("{what} at {pos} lies outside the {width}x{height} grid")]
    OutOfBounds {
        what: &'static str,
        pos: Pos,
        width: usize,
        height: usize,
    },
}
