use crate::types::AgentId;
use glam::Vec2;

/// One simulated entity that turns towards the attractor.
///
/// The record is deliberately small: scene-specific state (pendulum
/// velocity, sway offsets, blink timers, ...) lives in the opaque `ext`
/// payload, which the core never touches.
///
/// ### Fields
/// - `id` - Index of the agent within its population.
/// - `pos` - Normalized position in `[0, 1]²`, fixed at creation.
/// - `angle` - Current facing angle in radians; never wrapped in storage.
/// - `target_angle` - Last desired angle passed to the spring update.
/// - `springiness` - Fraction of the remaining angular error closed per tick.
/// - `scale` - Static size multiplier.
/// - `phase` - Static oscillation offset (radians) for flicker/sway/blink.
/// - `ext` - Consumer-owned payload.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackingAgent<E = ()> {
    pub id: AgentId,
    pub pos: Vec2,
    pub angle: f32,
    pub target_angle: f32,
    pub springiness: f32,
    pub scale: f32,
    pub phase: f32,
    pub ext: E,
}

impl TrackingAgent<()> {
    /// Creates an agent facing `angle` with no extension payload.
    pub fn new(id: AgentId, pos: Vec2, angle: f32, springiness: f32, scale: f32, phase: f32) -> Self {
        Self {
            id,
            pos,
            angle,
            target_angle: angle,
            springiness,
            scale,
            phase,
            ext: (),
        }
    }
}

impl<E> TrackingAgent<E> {
    /// Replaces the extension payload, keeping the core fields.
    pub fn map_ext<F>(self, f: impl FnOnce(&TrackingAgent<E>) -> F) -> TrackingAgent<F> {
        let ext = f(&self);
        TrackingAgent {
            id: self.id,
            pos: self.pos,
            angle: self.angle,
            target_angle: self.target_angle,
            springiness: self.springiness,
            scale: self.scale,
            phase: self.phase,
            ext,
        }
    }
}

/// Attaches a scene payload to every agent of a freshly laid-out population.
pub fn with_extension<E, F>(
    agents: Vec<TrackingAgent<E>>,
    mut f: impl FnMut(&TrackingAgent<E>) -> F,
) -> Vec<TrackingAgent<F>> {
    agents.into_iter().map(|a| a.map_ext(&mut f)).collect()
}
