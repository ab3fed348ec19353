//! Angular integrators that turn agents towards their targets.
//!
//! Two independent strategies live here and are intentionally not
//! expressed in terms of each other:
//! - [`converge_angle`] / [`spring_converge`] — first-order exponential
//!   approach, no velocity state, never overshoots.
//! - [`PendulumState::step`] — explicit-Euler swing with gravity,
//!   damping and a magnetic pull towards the target, clamped to a swing
//!   range. This one does overshoot.

use crate::{agent::TrackingAgent, config::PendulumConfig, geometry::wrap_angle};

/// Moves `current` a `springiness` fraction of the way to `target`
/// along the shortest arc.
#[inline]
pub fn converge_angle(current: f32, target: f32, springiness: f32) -> f32 {
    current + wrap_angle(target - current) * springiness
}

/// Applies [`converge_angle`] to an agent using its own springiness.
///
/// Records `target` as the agent's `target_angle`. The stored `angle` is
/// not wrapped and may drift outside `(-π, π]` over time.
#[inline]
pub fn spring_converge<E>(agent: &mut TrackingAgent<E>, target: f32) {
    agent.target_angle = target;
    agent.angle = converge_angle(agent.angle, target, agent.springiness);
}

/// Angle and angular velocity of a swinging weight.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PendulumState {
    pub angle: f32,
    pub velocity: f32,
}

impl PendulumState {
    pub fn new(angle: f32) -> Self {
        Self {
            angle,
            velocity: 0.0,
        }
    }

    /// Advances the pendulum by one tick towards `target`.
    ///
    /// `accel = -gravity * sin(angle) + magnetic_pull * wrap(target - angle)`,
    /// then velocity is integrated and damped, the angle integrated, and
    /// finally the angle is clamped to `±swing_range`. Hitting the clamp
    /// kills the velocity.
    pub fn step(&mut self, target: f32, cfg: &PendulumConfig) {
        let accel =
            -cfg.gravity * self.angle.sin() + cfg.magnetic_pull * wrap_angle(target - self.angle);
        self.velocity = (self.velocity + accel) * cfg.damping;
        self.angle += self.velocity;

        if self.angle.abs() > cfg.swing_range {
            self.angle = self.angle.clamp(-cfg.swing_range, cfg.swing_range);
            self.velocity = 0.0;
        }
    }
}

impl AsMut<PendulumState> for PendulumState {
    fn as_mut(&mut self) -> &mut PendulumState {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::f32::consts::PI;

    fn agent(angle: f32, springiness: f32) -> TrackingAgent {
        TrackingAgent::new(0, Vec2::splat(0.5), angle, springiness, 1.0, 0.0)
    }

    #[test]
    fn fixed_point_is_stable() {
        for angle in [-3.0, 0.0, 0.7, 12.5] {
            let mut a = agent(angle, 0.15);
            spring_converge(&mut a, angle);
            assert_eq!(a.angle, angle);
        }
    }

    #[test]
    fn moves_a_fraction_of_the_way() {
        let mut a = agent(0.0, 0.25);
        spring_converge(&mut a, 1.0);
        assert!((a.angle - 0.25).abs() < 1e-6);
        assert_eq!(a.target_angle, 1.0);
    }

    #[test]
    fn takes_the_short_way_round() {
        // From just below +π to just above -π is a small positive step.
        let mut a = agent(PI - 0.1, 0.5);
        spring_converge(&mut a, -PI + 0.1);
        assert!((a.angle - PI).abs() < 1e-5, "angle = {}", a.angle);
    }

    #[test]
    fn never_overshoots() {
        let angles = [-7.0, -3.0, -1.0, 0.0, 0.5, 2.0, 3.1, 6.0, 40.0];
        let springs = [0.01, 0.1, 0.5, 0.99, 1.0];
        for &from in &angles {
            for &to in &angles {
                for &k in &springs {
                    let before = wrap_angle(to - from).abs();
                    let after = wrap_angle(to - converge_angle(from, to, k)).abs();
                    assert!(after <= before + 1e-5, "{from} -> {to} @ {k}: {before} -> {after}");
                }
            }
        }
    }

    #[test]
    fn converges_over_many_ticks() {
        let mut a = agent(0.0, 0.1);
        for _ in 0..200 {
            spring_converge(&mut a, 2.0);
        }
        assert!((a.angle - 2.0).abs() < 1e-4);
    }

    #[test]
    fn pendulum_overshoots_then_settles_near_target() {
        let cfg = PendulumConfig {
            gravity: 0.0,
            magnetic_pull: 0.01,
            damping: 0.95,
            swing_range: 2.0,
        };
        let mut p = PendulumState::new(0.0);
        let mut max_angle: f32 = 0.0;
        for _ in 0..2000 {
            p.step(0.5, &cfg);
            max_angle = max_angle.max(p.angle);
        }
        assert!(max_angle > 0.5, "expected an overshoot, peak {max_angle}");
        assert!((p.angle - 0.5).abs() < 1e-3);
        assert!(p.velocity.abs() < 1e-4);
    }

    #[test]
    fn pendulum_rests_at_bottom_without_pull() {
        let cfg = PendulumConfig {
            magnetic_pull: 0.0,
            ..PendulumConfig::default()
        };
        let mut p = PendulumState::new(0.0);
        p.step(1.0, &cfg);
        assert_eq!(p, PendulumState::new(0.0));
    }

    #[test]
    fn pendulum_is_clamped_to_swing_range() {
        let cfg = PendulumConfig {
            gravity: 0.0,
            magnetic_pull: 0.5,
            damping: 1.0,
            swing_range: 0.3,
        };
        let mut p = PendulumState::new(0.0);
        for _ in 0..10 {
            p.step(3.0, &cfg);
            assert!(p.angle.abs() <= 0.3);
        }
        assert_eq!(p.angle, 0.3);
        assert_eq!(p.velocity, 0.0);
    }
}
