//! Configuration for layouts, integrators and the tunnel pool.

use crate::error::ConfigError;
use rand::Rng;

/// Fixed nominal tick duration fed to the attractor generator.
pub const NOMINAL_TICK: f32 = 0.016;

/// Safe interior region the attractor is clamped to.
pub const CLAMP_MIN: f32 = 0.05;
pub const CLAMP_MAX: f32 = 0.95;

/// Floors applied when deriving a grid from an instance count.
pub const MIN_GRID_COLS: usize = 4;
pub const MIN_GRID_ROWS: usize = 3;

/// Default hard cap on grid populations.
pub const DEFAULT_MAX_AGENTS: usize = 200;

/// Glow colours cycled through by recycled tunnel orbs.
pub const DEFAULT_TUNNEL_PALETTE: [&str; 5] = ["#7df9ff", "#ff6ec7", "#fff44f", "#9d7bff", "#66ffb2"];

/// Inclusive range a per-instance parameter is sampled from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range that always samples `v`.
    pub const fn fixed(v: f32) -> Self {
        Self { min: v, max: v }
    }

    /// Uniform sample in `[min, max)`; returns `min` for a degenerate range.
    #[inline]
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        self.min + (self.max - self.min) * rng.random::<f32>()
    }

    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    /// Checks that both bounds are finite and ordered.
    pub fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

fn validate_springiness(r: &ValueRange) -> Result<(), ConfigError> {
    r.validate("springiness")?;
    if r.min <= 0.0 || r.max > 1.0 {
        return Err(ConfigError::SpringinessOutOfBounds {
            min: r.min,
            max: r.max,
        });
    }
    Ok(())
}

/// Parameters for [`crate::layout::grid_layout`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    pub springiness: ValueRange,
    pub scale: ValueRange,
    /// Full width of the per-axis perturbation, in normalized units.
    pub jitter: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            springiness: ValueRange::new(0.02, 0.18),
            scale: ValueRange::new(0.8, 1.2),
            jitter: 0.0,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_springiness(&self.springiness)?;
        self.scale.validate("scale")?;
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(ConfigError::NegativeJitter(self.jitter));
        }
        Ok(())
    }
}

/// Largest ring radius that keeps every ring inside the unit frame.
pub const MAX_RING_RADIUS: f32 = 0.5;

/// Parameters for [`crate::layout::ring_layout`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingConfig {
    pub rings: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub springiness: ValueRange,
    pub scale: ValueRange,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            rings: 4,
            min_radius: 0.12,
            max_radius: 0.42,
            springiness: ValueRange::new(0.04, 0.12),
            scale: ValueRange::new(0.8, 1.2),
        }
    }
}

impl RingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rings == 0 {
            return Err(ConfigError::NoRings);
        }
        let radii = ValueRange::new(self.min_radius, self.max_radius);
        radii.validate("ring radius")?;
        // Strictly growing radii need a non-degenerate band once there are two rings.
        if self.min_radius < 0.0
            || self.max_radius > MAX_RING_RADIUS
            || (self.rings > 1 && self.min_radius == self.max_radius)
        {
            return Err(ConfigError::InvalidRange {
                name: "ring radius",
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        validate_springiness(&self.springiness)?;
        self.scale.validate("scale")
    }
}

/// How [`crate::layout::init_population`] seeds a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutOptions {
    /// Aspect-aware grid derived from the instance count, capped at `max_agents`.
    Grid {
        config: GridConfig,
        aspect: f32,
        max_agents: usize,
    },
    /// Concentric rings; the nominal per-ring count is `instance_count / rings`.
    Rings(RingConfig),
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions::Grid {
            config: GridConfig::default(),
            aspect: 16.0 / 9.0,
            max_agents: DEFAULT_MAX_AGENTS,
        }
    }
}

/// Explicit-Euler pendulum with a magnetic pull towards a target angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendulumConfig {
    /// Restoring torque coefficient (applied to `sin(angle)`).
    pub gravity: f32,
    /// Pull towards the target angle, per radian of wrapped difference.
    pub magnetic_pull: f32,
    /// Velocity retained per tick, in `[0, 1]`.
    pub damping: f32,
    /// Hard limit on `|angle|`.
    pub swing_range: f32,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            gravity: 0.004,
            magnetic_pull: 0.0025,
            damping: 0.985,
            swing_range: 1.0,
        }
    }
}

impl PendulumConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(ConfigError::InvalidRange {
                name: "damping",
                min: self.damping,
                max: self.damping,
            });
        }
        if !self.swing_range.is_finite() || self.swing_range <= 0.0 {
            return Err(ConfigError::InvalidRange {
                name: "swing range",
                min: -self.swing_range,
                max: self.swing_range,
            });
        }
        if !self.gravity.is_finite() || !self.magnetic_pull.is_finite() {
            return Err(ConfigError::InvalidRange {
                name: "pendulum coefficients",
                min: self.gravity,
                max: self.magnetic_pull,
            });
        }
        Ok(())
    }
}

/// Parameters for the tunnel flythrough pool.
#[derive(Clone, Debug, PartialEq)]
pub struct TunnelConfig {
    pub orb_count: usize,
    /// Nominal depth travelled per tick before multipliers.
    pub base_speed: f32,
    /// Distance band from the tunnel axis, normalized.
    pub radius_band: ValueRange,
    pub spawn_plane: f32,
    pub recycle_threshold: f32,
    /// Recycled orbs reappear at `spawn_plane + [0, spawn_jitter)`.
    pub spawn_jitter: f32,
    pub size: ValueRange,
    pub brightness: ValueRange,
    pub speed: ValueRange,
    pub trail: ValueRange,
    pub palette_len: usize,
    /// Depth over which orbs fade in after leaving the spawn plane.
    pub far_fade: f32,
    /// Depth over which orbs fade out before reaching `z = 0`.
    pub near_fade: f32,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            orb_count: 160,
            base_speed: 0.006,
            radius_band: ValueRange::new(0.35, 1.0),
            spawn_plane: 1.0,
            recycle_threshold: -0.05,
            spawn_jitter: 0.1,
            size: ValueRange::new(0.004, 0.012),
            brightness: ValueRange::new(0.6, 1.0),
            speed: ValueRange::new(0.7, 1.3),
            trail: ValueRange::new(0.5, 1.5),
            palette_len: DEFAULT_TUNNEL_PALETTE.len(),
            far_fade: 0.2,
            near_fade: 0.15,
        }
    }
}

/// Depth at which `1 / (z + 0.1)` blows up.
pub const PROJECTION_POLE: f32 = -0.1;

impl TunnelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.orb_count == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.palette_len == 0 {
            return Err(ConfigError::EmptyPalette);
        }
        if !self.recycle_threshold.is_finite() || self.recycle_threshold <= PROJECTION_POLE {
            return Err(ConfigError::RecycleBehindPole(self.recycle_threshold));
        }
        if !self.spawn_plane.is_finite() || self.spawn_plane <= self.recycle_threshold {
            return Err(ConfigError::PlanesInverted {
                threshold: self.recycle_threshold,
                spawn: self.spawn_plane,
            });
        }
        let positive = |name: &'static str, v: f32| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidRange { name, min: v, max: v })
            }
        };
        positive("base speed", self.base_speed)?;
        positive("spawn jitter", self.spawn_jitter)?;
        positive("far fade", self.far_fade)?;
        positive("near fade", self.near_fade)?;

        self.radius_band.validate("radius band")?;
        if self.radius_band.min < 0.0 {
            return Err(ConfigError::InvalidRange {
                name: "radius band",
                min: self.radius_band.min,
                max: self.radius_band.max,
            });
        }
        for (name, range) in [
            ("orb size", &self.size),
            ("brightness", &self.brightness),
            ("trail", &self.trail),
        ] {
            range.validate(name)?;
            if range.min < 0.0 {
                return Err(ConfigError::InvalidRange {
                    name,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        // Orbs must always approach the viewer or they never recycle.
        self.speed.validate("orb speed")?;
        if self.speed.min <= 0.0 {
            return Err(ConfigError::InvalidRange {
                name: "orb speed",
                min: self.speed.min,
                max: self.speed.max,
            });
        }
        Ok(())
    }
}
