//! Core 2-D bouncing-body simulation with quadtree collision culling.
//!
//! Main components:
//! - [`body`] — movable discs and random spawning.
//! - [`region`] — axis-aligned regions used as index jurisdictions.
//! - [`quadtree`] — the spatial index rebuilt every step.
//! - [`collision`] — overlap test and pairwise collision response.
//! - [`phases`] — rebuild, collision and integration phases of one step.
//! - [`simulation`] — the step driver owning bodies, index and config.
//! - [`config`] — explicit configuration for the index and spawning.
//! - [`error`] — error type for rejected geometry and configuration.
//! - [`types`] — shared type aliases and IDs.

pub mod body;
pub mod collision;
pub mod config;
pub mod error;
pub mod phases;
pub mod quadtree;
pub mod region;
pub mod simulation;
pub mod types;
