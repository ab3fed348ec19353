//! Attractor-tracking particle simulation core.
//!
//! Main components:
//! - [`geometry`] — angle/distance helpers, angle wrapping, hex colours.
//! - [`agent`] — the generic tracking agent record.
//! - [`layout`] — grid and ring generators that seed populations.
//! - [`attractor`] — the moving target and its named trajectories.
//! - [`spring`] — spring convergence and pendulum integrators.
//! - [`scene`] — the per-tick pipeline tying the above together.
//! - [`tunnel`] — the depth-based tunnel flythrough pool and projection.
//! - [`config`] — configuration structs and shared constants.
//! - [`error`] — construction-time errors.
//! - [`types`] — shared type aliases and IDs.

pub mod agent;
pub mod attractor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod scene;
pub mod spring;
pub mod tunnel;
pub mod types;

pub use agent::{TrackingAgent, with_extension};
pub use attractor::{AttractorState, Pattern, advance_attractor};
pub use error::ConfigError;
pub use geometry::{angle_to_target, distance_to_target};
pub use layout::init_population;
pub use spring::spring_converge;
pub use tunnel::{advance_orbs, init_orbs, project_orb};
