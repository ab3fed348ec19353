//! Scene adapters driving the simulation core.
//!
//! Each scene seeds a population through [`init_population`], tags its
//! own payload onto the agents, and per tick hands the core a targeting
//! rule. Drawing lives in the viewer.

use glam::Vec2;
use rand::{Rng, rngs::StdRng};
use std::f32::consts::TAU;
use tracker_core::{
    AttractorState, ConfigError, Pattern, TrackingAgent, advance_attractor, angle_to_target,
    config::{
        DEFAULT_MAX_AGENTS, DEFAULT_TUNNEL_PALETTE, GridConfig, LayoutOptions, PendulumConfig,
        RingConfig, TunnelConfig, ValueRange,
    },
    geometry::{Rgb, parse_hex_color},
    init_population,
    scene::{FaceAttractor, Scene},
    spring::PendulumState,
    tunnel::TunnelSystem,
    with_extension,
};

/// Which skin is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneKind {
    Cameras,
    Flowers,
    Pendulums,
    Tunnel,
}

impl SceneKind {
    pub const ALL: [SceneKind; 4] = [
        SceneKind::Cameras,
        SceneKind::Flowers,
        SceneKind::Pendulums,
        SceneKind::Tunnel,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SceneKind::Cameras => "Cameras",
            SceneKind::Flowers => "Flowers",
            SceneKind::Pendulums => "Pendulums",
            SceneKind::Tunnel => "Tunnel",
        }
    }
}

/// User-tunable knobs shared by all scenes.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSettings {
    pub kind: SceneKind,
    pub pattern: Pattern,
    pub speed: f32,
    pub instance_count: usize,
    pub jitter: f32,
    pub aspect: f32,
    pub seed: u64,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            kind: SceneKind::Cameras,
            pattern: Pattern::Wandering,
            speed: 1.0,
            instance_count: 60,
            jitter: 0.02,
            aspect: 16.0 / 9.0,
            seed: 7,
        }
    }
}

/// Blink timing for the camera skin.
#[derive(Clone, Copy, Debug)]
pub struct CameraLook {
    pub blink_rate: f32,
}

/// Sway on top of the tracked angle for the flower skin.
#[derive(Clone, Copy, Debug)]
pub struct FlowerSway {
    pub sway_speed: f32,
    pub sway_amount: f32,
}

/// Pendulum state for the swinging-weight skin.
#[derive(Clone, Copy, Debug)]
pub struct Swing {
    pub pendulum: PendulumState,
}

impl AsMut<PendulumState> for Swing {
    fn as_mut(&mut self) -> &mut PendulumState {
        &mut self.pendulum
    }
}

/// Tunnel pool plus its decoded palette.
pub struct TunnelScene {
    pub system: TunnelSystem<StdRng>,
    pub palette: Vec<Rgb>,
    pub speed: f32,
}

/// The running scene with its own population and attractor.
pub enum ActiveScene {
    Cameras(Scene<CameraLook>),
    Flowers(Scene<FlowerSway>),
    Pendulums {
        scene: Scene<Swing>,
        cfg: PendulumConfig,
    },
    Tunnel(TunnelScene),
}

/// Pattern-time scale the flower sway runs at.
const SWAY_CLOCK: f32 = 1.5;

/// Pendulum scenes drive their attractor faster than the others.
const PENDULUM_CLOCK: f32 = 1.5;

impl ActiveScene {
    /// Builds the scene selected in `settings`.
    pub fn build(settings: &SceneSettings, mut rng: StdRng) -> Result<Self, ConfigError> {
        let scene = match settings.kind {
            SceneKind::Cameras => {
                let options = LayoutOptions::Grid {
                    config: GridConfig {
                        springiness: ValueRange::new(0.04, 0.18),
                        scale: ValueRange::new(0.8, 1.2),
                        jitter: settings.jitter,
                    },
                    aspect: settings.aspect,
                    max_agents: DEFAULT_MAX_AGENTS,
                };
                let agents = init_population(settings.instance_count, &options, &mut rng)?;
                let agents = with_extension(agents, |_| CameraLook {
                    blink_rate: rng.random_range(0.2..1.0),
                });
                ActiveScene::Cameras(Scene::new(agents, settings.pattern, settings.speed))
            }
            SceneKind::Flowers => {
                let options = LayoutOptions::Rings(RingConfig::default());
                let agents = init_population(settings.instance_count, &options, &mut rng)?;
                let agents = with_extension(agents, |_| FlowerSway {
                    sway_speed: rng.random_range(0.6..1.4),
                    sway_amount: rng.random_range(0.05..0.2),
                });
                ActiveScene::Flowers(Scene::new(agents, settings.pattern, settings.speed))
            }
            SceneKind::Pendulums => {
                let options = LayoutOptions::Grid {
                    config: GridConfig {
                        jitter: 0.0,
                        ..GridConfig::default()
                    },
                    aspect: settings.aspect,
                    max_agents: 60,
                };
                let agents = init_population(settings.instance_count, &options, &mut rng)?;
                let agents = with_extension(agents, |_| Swing {
                    pendulum: PendulumState::new(0.0),
                });
                let cfg = PendulumConfig::default();
                cfg.validate()?;
                ActiveScene::Pendulums {
                    scene: Scene::new(agents, settings.pattern, settings.speed * PENDULUM_CLOCK),
                    cfg,
                }
            }
            SceneKind::Tunnel => {
                let palette = DEFAULT_TUNNEL_PALETTE
                    .iter()
                    .map(|hex| parse_hex_color(hex))
                    .collect::<Result<Vec<_>, _>>()?;
                let cfg = TunnelConfig {
                    orb_count: settings.instance_count.max(1) * 2,
                    palette_len: palette.len(),
                    ..TunnelConfig::default()
                };
                ActiveScene::Tunnel(TunnelScene {
                    system: TunnelSystem::new(cfg, rng)?,
                    palette,
                    speed: settings.speed,
                })
            }
        };
        log::info!(
            "built {} scene with {} entities",
            settings.kind.label(),
            scene.entity_count()
        );
        Ok(scene)
    }

    /// Advances the scene by one fixed tick.
    pub fn step(&mut self) {
        match self {
            ActiveScene::Cameras(scene) => {
                scene.step(&mut FaceAttractor);
            }
            ActiveScene::Flowers(scene) => {
                let clock = sway_clock(scene);
                let mut rule = |agent: &TrackingAgent<FlowerSway>, at: Vec2| {
                    let sway = (clock * agent.ext.sway_speed + agent.phase).sin();
                    angle_to_target(agent.pos, at) + sway * agent.ext.sway_amount
                };
                scene.step(&mut rule);
            }
            ActiveScene::Pendulums { scene, cfg } => {
                // Angle 0 hangs straight down; the weight leans towards the attractor.
                let mut rule = |agent: &TrackingAgent<Swing>, at: Vec2| {
                    let d = at - agent.pos;
                    d.x.atan2(d.y.abs().max(0.05))
                };
                scene.step_pendulums(&mut rule, cfg);
            }
            ActiveScene::Tunnel(tunnel) => {
                tunnel.system.tick(tracker_core::config::NOMINAL_TICK, tunnel.speed);
            }
        }
    }

    pub fn entity_count(&self) -> usize {
        match self {
            ActiveScene::Cameras(s) => s.agents.len(),
            ActiveScene::Flowers(s) => s.agents.len(),
            ActiveScene::Pendulums { scene, .. } => scene.agents.len(),
            ActiveScene::Tunnel(t) => t.system.orbs.len(),
        }
    }

    /// The scene's attractor; the tunnel has none.
    pub fn attractor(&self) -> Option<&AttractorState> {
        match self {
            ActiveScene::Cameras(s) => Some(&s.attractor),
            ActiveScene::Flowers(s) => Some(&s.attractor),
            ActiveScene::Pendulums { scene, .. } => Some(&scene.attractor),
            ActiveScene::Tunnel(_) => None,
        }
    }

    /// Applies a new trajectory without restarting the scene.
    pub fn set_pattern(&mut self, pattern: Pattern) {
        match self {
            ActiveScene::Cameras(s) => s.set_pattern(pattern),
            ActiveScene::Flowers(s) => s.set_pattern(pattern),
            ActiveScene::Pendulums { scene, .. } => scene.set_pattern(pattern),
            ActiveScene::Tunnel(_) => {}
        }
    }

    /// Applies a new speed multiplier without restarting the scene.
    pub fn set_speed(&mut self, speed: f32) {
        match self {
            ActiveScene::Cameras(s) => s.speed = speed,
            ActiveScene::Flowers(s) => s.speed = speed,
            ActiveScene::Pendulums { scene, .. } => scene.speed = speed * PENDULUM_CLOCK,
            ActiveScene::Tunnel(t) => t.speed = speed,
        }
    }
}

/// Sway clock for the tick `scene` is about to run, read from the
/// attractor time after its advance.
fn sway_clock(scene: &Scene<FlowerSway>) -> f32 {
    let next = advance_attractor(
        scene.attractor,
        scene.tick,
        scene.speed,
        scene.attractor.pattern,
    );
    next.time * SWAY_CLOCK
}

/// Blink openness in `[0, 1]` for a camera at scene time `t`.
pub fn blink(look: &CameraLook, phase: f32, t: f32) -> f32 {
    let cycle = (t * look.blink_rate + phase / TAU).fract();
    if cycle > 0.97 { 0.0 } else { 1.0 }
}
