//! The moving target every agent in a scene turns towards.
//!
//! The attractor follows one of seven closed-form trajectories
//! ([`Pattern`]) parameterised by an explicit pattern time that is
//! threaded through [`AttractorState`]. Speed changes therefore take
//! effect immediately without a phase jump.

use crate::config::{CLAMP_MAX, CLAMP_MIN};
use crate::error::ConfigError;
use glam::Vec2;
use std::fmt;
use std::str::FromStr;

/// Named attractor trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Pattern {
    Figure8,
    #[default]
    Wandering,
    SkyArc,
    GroundSweep,
    Orbital,
    RandomWalk,
    Bounce,
}

impl Pattern {
    pub const ALL: [Pattern; 7] = [
        Pattern::Figure8,
        Pattern::Wandering,
        Pattern::SkyArc,
        Pattern::GroundSweep,
        Pattern::Orbital,
        Pattern::RandomWalk,
        Pattern::Bounce,
    ];

    /// Canonical camel-case name, as used by scene configuration.
    pub fn name(self) -> &'static str {
        match self {
            Pattern::Figure8 => "figure8",
            Pattern::Wandering => "wandering",
            Pattern::SkyArc => "skyArc",
            Pattern::GroundSweep => "groundSweep",
            Pattern::Orbital => "orbital",
            Pattern::RandomWalk => "randomWalk",
            Pattern::Bounce => "bounce",
        }
    }

    /// Evaluates the raw (unclamped) trajectory at pattern time `t`.
    pub fn evaluate(self, t: f32) -> Vec2 {
        match self {
            Pattern::Figure8 => Vec2::new(
                0.5 + 0.35 * (0.5 * t).sin(),
                0.5 + t.sin() * (0.5 * t).cos() * 0.25,
            ),
            Pattern::Wandering => Vec2::new(
                0.5 + 0.35 * (0.7 * t).sin()
                    + 0.12 * (1.3 * t + 1.5).sin()
                    + 0.08 * (0.4 * t + 0.8).cos(),
                0.5 + 0.35 * (0.5 * t).cos()
                    + 0.12 * (0.9 * t + 2.1).sin()
                    + 0.08 * (1.1 * t + 0.5).cos(),
            ),
            Pattern::SkyArc => Vec2::new(0.5 + 0.45 * (0.3 * t).sin(), 0.15 + 0.1 * (0.6 * t).sin()),
            Pattern::GroundSweep => {
                Vec2::new(0.5 + 0.4 * (0.4 * t).sin(), 0.7 + 0.15 * (0.2 * t).sin())
            }
            Pattern::Orbital => Vec2::new(0.5 + 0.35 * (0.4 * t).cos(), 0.5 + 0.35 * (0.4 * t).sin()),
            Pattern::RandomWalk => Vec2::new(
                0.5 + 0.25 * (0.31 * t).sin() + 0.15 * (0.71 * t).sin(),
                0.5 + 0.25 * (0.43 * t).cos() + 0.15 * (0.67 * t).cos(),
            ),
            Pattern::Bounce => Vec2::new(
                0.5 + 0.4 * (0.5 * t).sin(),
                0.5 + (0.8 * t).sin().abs() * 0.35 - 0.175,
            ),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ConfigError::UnknownPattern(s.to_owned()))
    }
}

/// Clamps a position into the attractor's safe interior region.
#[inline]
pub fn clamp_to_frame(p: Vec2) -> Vec2 {
    p.clamp(Vec2::splat(CLAMP_MIN), Vec2::splat(CLAMP_MAX))
}

/// The single shared target of a scene.
///
/// ### Fields
/// - `pos` - Normalized position, always inside `[0.05, 0.95]²` after an update.
/// - `time` - Accumulated pattern time; never decreases.
/// - `pattern` - Trajectory followed by this attractor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttractorState {
    pub pos: Vec2,
    pub time: f32,
    pub pattern: Pattern,
}

impl AttractorState {
    /// Creates an attractor at the frame centre with `time = 0`.
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pos: Vec2::splat(0.5),
            time: 0.0,
            pattern,
        }
    }

    /// Advances the attractor by one tick.
    ///
    /// The trajectory is sampled at the current pattern time, clamped to
    /// the frame, and then the pattern time moves forward by
    /// `tick * speed`. Negative or non-finite increments are ignored so
    /// that `time` never decreases.
    pub fn advance(&mut self, tick: f32, speed: f32) {
        self.pos = clamp_to_frame(self.pattern.evaluate(self.time));

        let step = tick * speed;
        if step.is_finite() && step > 0.0 {
            self.time += step;
        }
    }
}

impl Default for AttractorState {
    fn default() -> Self {
        Self::new(Pattern::default())
    }
}

/// Pure form of [`AttractorState::advance`] that also switches pattern.
///
/// The pattern time carries over unchanged when `pattern` differs from
/// the state's current one.
pub fn advance_attractor(
    state: AttractorState,
    tick: f32,
    speed: f32,
    pattern: Pattern,
) -> AttractorState {
    let mut next = AttractorState { pattern, ..state };
    next.advance(tick, speed);
    next
}
