//! Per-tick pipeline shared by every attractor-tracking scene.
//!
//! One tick runs, in order:
//! 1. [`AttractorState::advance`] — move the attractor.
//! 2. Target computation — each agent asks its [`Targeting`] rule for a
//!    desired angle, given the *freshly advanced* attractor position.
//! 3. [`spring_converge`] (or [`PendulumState::step`]) — turn the agent.
//!
//! Reading the attractor before step 1 would make every agent chase a
//! position one tick stale; [`Scene::step`] enforces the order.

use crate::{
    agent::TrackingAgent,
    attractor::{AttractorState, Pattern},
    config::{NOMINAL_TICK, PendulumConfig},
    geometry::angle_to_target,
    spring::{PendulumState, spring_converge},
};
use glam::Vec2;

/// Computes an agent's desired angle from the attractor position.
pub trait Targeting<E> {
    fn target_angle(&mut self, agent: &TrackingAgent<E>, attractor: Vec2) -> f32;
}

impl<E, F> Targeting<E> for F
where
    F: FnMut(&TrackingAgent<E>, Vec2) -> f32,
{
    fn target_angle(&mut self, agent: &TrackingAgent<E>, attractor: Vec2) -> f32 {
        self(agent, attractor)
    }
}

/// Points each agent straight at the attractor.
#[derive(Clone, Copy, Debug, Default)]
pub struct FaceAttractor;

impl<E> Targeting<E> for FaceAttractor {
    fn target_angle(&mut self, agent: &TrackingAgent<E>, attractor: Vec2) -> f32 {
        angle_to_target(agent.pos, attractor)
    }
}

/// A population and the attractor it tracks.
///
/// ### Fields
/// - `agents` - The scene's population, owned exclusively by this scene.
/// - `attractor` - The shared moving target.
/// - `speed` - Scene speed multiplier applied to pattern time.
/// - `tick` - Fixed tick duration (defaults to [`NOMINAL_TICK`]).
#[derive(Clone, Debug)]
pub struct Scene<E = ()> {
    pub agents: Vec<TrackingAgent<E>>,
    pub attractor: AttractorState,
    pub speed: f32,
    pub tick: f32,
}

impl<E> Scene<E> {
    pub fn new(agents: Vec<TrackingAgent<E>>, pattern: Pattern, speed: f32) -> Self {
        Self {
            agents,
            attractor: AttractorState::new(pattern),
            speed,
            tick: NOMINAL_TICK,
        }
    }

    /// Runs one tick with the simple spring update.
    ///
    /// ### Returns
    /// The attractor position every agent targeted this tick.
    pub fn step(&mut self, targeting: &mut impl Targeting<E>) -> Vec2 {
        self.attractor.advance(self.tick, self.speed);
        let at = self.attractor.pos;

        for agent in self.agents.iter_mut() {
            let target = targeting.target_angle(agent, at);
            spring_converge(agent, target);
        }
        at
    }

    /// Switches the attractor's trajectory, keeping its pattern time.
    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.attractor.pattern = pattern;
    }
}

impl<E: AsMut<PendulumState>> Scene<E> {
    /// Runs one tick with the pendulum strategy.
    ///
    /// The pendulum angle lives in each agent's extension; the agent's own
    /// `angle` mirrors it after the step so drawing code can read either.
    pub fn step_pendulums(&mut self, targeting: &mut impl Targeting<E>, cfg: &PendulumConfig) -> Vec2 {
        self.attractor.advance(self.tick, self.speed);
        let at = self.attractor.pos;

        for agent in self.agents.iter_mut() {
            let target = targeting.target_angle(agent, at);
            agent.target_angle = target;
            let pendulum = agent.ext.as_mut();
            pendulum.step(target, cfg);
            agent.angle = pendulum.angle;
        }
        at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::with_extension;

    fn line_of_agents(n: usize) -> Vec<TrackingAgent> {
        (0..n)
            .map(|i| {
                let x = (i as f32 + 0.5) / n as f32;
                TrackingAgent::new(i, Vec2::new(x, 0.5), 0.0, 0.1, 1.0, 0.0)
            })
            .collect()
    }

    #[test]
    fn step_advances_attractor_before_targeting() {
        let mut scene = Scene::new(line_of_agents(4), Pattern::Orbital, 1.0);
        scene.tick = 1.0;

        // First tick samples t = 0, second samples t = 1.
        let mut seen = Vec::new();
        let mut spy = |_: &TrackingAgent, at: Vec2| {
            seen.push(at);
            0.0
        };
        scene.step(&mut spy);
        scene.step(&mut spy);

        let first = Pattern::Orbital.evaluate(0.0);
        let second = Pattern::Orbital.evaluate(1.0);
        assert_eq!(seen.len(), 8);
        assert!(seen[..4].iter().all(|p| *p == first));
        assert!(seen[4..].iter().all(|p| *p == second));
        assert_eq!(scene.attractor.pos, second);
    }

    #[test]
    fn face_attractor_turns_agents_towards_target() {
        let mut scene = Scene::new(line_of_agents(3), Pattern::Orbital, 0.0);
        for a in scene.agents.iter_mut() {
            a.angle = 2.0;
        }
        for _ in 0..300 {
            scene.step(&mut FaceAttractor);
        }
        // Speed 0 pins the attractor at (0.85, 0.5), right of every agent.
        for a in &scene.agents {
            assert!(a.angle.abs() < 1e-3, "agent {} angle {}", a.id, a.angle);
            assert_eq!(a.target_angle, 0.0);
        }
    }

    #[test]
    fn pendulum_scene_mirrors_extension_angle() {
        let agents = with_extension(line_of_agents(2), |_| PendulumState::new(0.0));
        let mut scene = Scene::new(agents, Pattern::Bounce, 1.0);
        let cfg = PendulumConfig::default();
        let mut rule = |_: &TrackingAgent<PendulumState>, _: Vec2| 0.8;
        for _ in 0..50 {
            scene.step_pendulums(&mut rule, &cfg);
        }
        for a in &scene.agents {
            assert_eq!(a.angle, a.ext.angle);
            assert!(a.angle > 0.0 && a.angle <= cfg.swing_range);
            assert_eq!(a.target_angle, 0.8);
        }
    }

    #[test]
    fn set_pattern_keeps_time() {
        let mut scene: Scene = Scene::new(line_of_agents(1), Pattern::Figure8, 2.0);
        scene.step(&mut FaceAttractor);
        let t = scene.attractor.time;
        scene.set_pattern(Pattern::SkyArc);
        assert_eq!(scene.attractor.time, t);
        assert_eq!(scene.attractor.pattern, Pattern::SkyArc);
    }
}
