//! Construction-time configuration errors.
//!
//! Per-tick updates are total functions and never fail; everything that
//! can go wrong is caught when a population, pool or pattern is built.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population must contain at least one agent")]
    EmptyPopulation,
    #[error("grid must have at least one column and one row (got {cols}x{rows})")]
    EmptyGrid { cols: usize, rows: usize },
    #[error("ring layout needs at least one ring")]
    NoRings,
    #[error("ring layout needs at least one agent per ring")]
    EmptyRing,
    #[error("invalid range for {name}: [{min}, {max}]")]
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("springiness must lie in (0, 1] (got [{min}, {max}])")]
    SpringinessOutOfBounds { min: f32, max: f32 },
    #[error("jitter must be finite and non-negative (got {0})")]
    NegativeJitter(f32),
    #[error("aspect ratio must be finite and positive (got {0})")]
    InvalidAspect(f32),
    #[error("agent cap {cap} is below the minimum grid of {min} agents")]
    CapBelowMinimum { cap: usize, min: usize },
    #[error("recycle threshold {0} must lie above the projection pole at -0.1")]
    RecycleBehindPole(f32),
    #[error("recycle threshold {threshold} must lie below the spawn plane {spawn}")]
    PlanesInverted { threshold: f32, spawn: f32 },
    #[error("unknown attractor pattern `{0}`")]
    UnknownPattern(String),
    #[error("malformed hex colour `{0}`")]
    BadHexColor(String),
    #[error("palette must contain at least one colour")]
    EmptyPalette,
}
