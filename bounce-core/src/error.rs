//! Error types for the simulation core.
//!
//! Only geometry and configuration supplied from outside can fail;
//! everything inside a step has a defined fallback.

use glam::Vec2;
use thiserror::Error;

/// Errors raised when building or resizing a simulation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A region with negative or non-finite geometry.
    #[error("invalid region: center {center}, half extents {half_extents}")]
    InvalidRegion { center: Vec2, half_extents: Vec2 },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;
