//! First-person tunnel flythrough.
//!
//! A fixed pool of [`TunnelOrb`]s is laid out in cylindrical coordinates
//! (angle around the axis, radius from the axis, depth). Every tick the
//! orbs move towards the viewer; orbs that pass behind the recycle
//! threshold are reset in place at the far plane, so a bounded pool
//! produces an endless stream without allocating.
//!
//! [`project_orb`] maps an orb to screen space with a simple `1 / (z + 0.1)`
//! perspective and derives its alpha from depth.

use crate::{config::TunnelConfig, error::ConfigError, geometry::ramp, types::ColorIndex};
use rand::Rng;
use std::f32::consts::TAU;

/// Angular drift per tick, scaled by the orb's own speed.
const ANGULAR_DRIFT: f32 = 0.001;

/// Amplitude and rate of the slow breathing pulse on the global speed.
const PULSE_AMPLITUDE: f32 = 0.2;
const PULSE_RATE: f32 = 0.5;

/// Offset added to depth before dividing; keeps the projection finite at `z = 0`.
const PERSPECTIVE_OFFSET: f32 = 0.1;

/// One glowing orb in the tunnel.
///
/// ### Fields
/// - `angle` - Position around the tunnel circumference (radians).
/// - `radius` - Normalized distance from the tunnel axis.
/// - `z` - Depth; the spawn plane is far, `0` is the viewer.
/// - `size` - Base size before perspective.
/// - `color_index` - Palette slot.
/// - `brightness` - Peak alpha.
/// - `speed` - Multiplier on the global advance rate.
/// - `trail` - Visual trail length multiplier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TunnelOrb {
    pub angle: f32,
    pub radius: f32,
    pub z: f32,
    pub size: f32,
    pub color_index: ColorIndex,
    pub brightness: f32,
    pub speed: f32,
    pub trail: f32,
}

impl TunnelOrb {
    /// Fresh orb at depth `z` with randomized placement and look.
    fn spawn(z: f32, cfg: &TunnelConfig, rng: &mut impl Rng) -> Self {
        Self {
            angle: rng.random::<f32>() * TAU,
            radius: cfg.radius_band.sample(rng),
            z,
            size: cfg.size.sample(rng),
            color_index: rng.random_range(0..cfg.palette_len),
            brightness: cfg.brightness.sample(rng),
            speed: cfg.speed.sample(rng),
            trail: cfg.trail.sample(rng),
        }
    }

    /// Resets a passed orb at the far plane with new angle, radius and colour.
    ///
    /// Size, brightness, speed and trail are kept; they belong to the
    /// pool slot rather than to one pass through the tunnel.
    fn recycle(&mut self, cfg: &TunnelConfig, rng: &mut impl Rng) {
        self.z = cfg.spawn_plane + rng.random::<f32>() * cfg.spawn_jitter;
        self.angle = rng.random::<f32>() * TAU;
        self.radius = cfg.radius_band.sample(rng);
        self.color_index = rng.random_range(0..cfg.palette_len);
    }
}

/// Creates `cfg.orb_count` orbs spread over the whole depth range.
///
/// Initial depths are uniform between the recycle threshold and the
/// spawn plane so the tunnel is already full on the first frame.
pub fn init_orbs(cfg: &TunnelConfig, rng: &mut impl Rng) -> Result<Vec<TunnelOrb>, ConfigError> {
    cfg.validate()?;
    let depth = cfg.spawn_plane - cfg.recycle_threshold;
    let orbs = (0..cfg.orb_count)
        .map(|_| {
            let z = cfg.recycle_threshold + rng.random::<f32>() * depth;
            TunnelOrb::spawn(z, cfg, rng)
        })
        .collect();
    log::debug!("tunnel: {} orbs initialised", cfg.orb_count);
    Ok(orbs)
}

/// Speed actually applied this tick, including the breathing pulse.
#[inline]
pub fn pulsed_speed(base_speed: f32, speed_multiplier: f32, global_time: f32) -> f32 {
    base_speed * speed_multiplier * (1.0 + PULSE_AMPLITUDE * (PULSE_RATE * global_time).sin())
}

/// Moves every orb towards the viewer and recycles those that passed it.
///
/// ### Parameters
/// - `orbs` - The pool; mutated in place.
/// - `speed_multiplier` - Scene-level speed scalar.
/// - `global_time` - Scene time driving the breathing pulse.
/// - `cfg` - Tunnel configuration (must be the one the pool was built with).
/// - `rng` - Randomness for recycled orbs.
///
/// ### Returns
/// How many orbs were recycled this tick.
pub fn advance_orbs(
    orbs: &mut [TunnelOrb],
    speed_multiplier: f32,
    global_time: f32,
    cfg: &TunnelConfig,
    rng: &mut impl Rng,
) -> usize {
    let actual = pulsed_speed(cfg.base_speed, speed_multiplier, global_time);
    let mut recycled = 0;
    for orb in orbs.iter_mut() {
        orb.z -= actual * orb.speed;
        orb.angle += ANGULAR_DRIFT * orb.speed;
        // `!(z >= t)` also catches a NaN depth.
        if !(orb.z >= cfg.recycle_threshold) {
            orb.recycle(cfg, rng);
            recycled += 1;
        }
    }
    recycled
}

/// Screen-space placement of one orb.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbProjection {
    pub screen_x: f32,
    pub screen_y: f32,
    pub apparent_size: f32,
    pub alpha: f32,
}

/// `1 / (z + 0.1)`.
#[inline]
pub fn perspective(z: f32) -> f32 {
    1.0 / (z + PERSPECTIVE_OFFSET)
}

/// Depth-based visibility in `[0, 1]`.
///
/// Product of a ramp that fades in over `far_fade` after the spawn plane
/// and a ramp that fades out over `near_fade` before `z = 0`.
#[inline]
pub fn depth_fade(z: f32, cfg: &TunnelConfig) -> f32 {
    let fade_in = ramp(z, cfg.spawn_plane, cfg.spawn_plane - cfg.far_fade);
    let fade_out = ramp(z, 0.0, cfg.near_fade);
    fade_in * fade_out
}

/// Projects an orb onto a `width` x `height` viewport centred on the tunnel axis.
pub fn project_orb(orb: &TunnelOrb, width: f32, height: f32, cfg: &TunnelConfig) -> OrbProjection {
    let min_dim = width.min(height);
    let p = perspective(orb.z);
    let screen_radius = orb.radius * p * min_dim * 0.5;
    let (sin, cos) = orb.angle.sin_cos();

    OrbProjection {
        screen_x: width * 0.5 + cos * screen_radius,
        screen_y: height * 0.5 + sin * screen_radius,
        apparent_size: orb.size * p * min_dim * 2.0,
        alpha: orb.brightness * depth_fade(orb.z, cfg),
    }
}

/// Owns a tunnel pool together with its configuration, RNG and clock.
pub struct TunnelSystem<R: Rng> {
    pub orbs: Vec<TunnelOrb>,
    pub cfg: TunnelConfig,
    pub time: f32,
    rng: R,
    recycled_total: u64,
}

impl<R: Rng> TunnelSystem<R> {
    pub fn new(cfg: TunnelConfig, mut rng: R) -> Result<Self, ConfigError> {
        let orbs = init_orbs(&cfg, &mut rng)?;
        Ok(Self {
            orbs,
            cfg,
            time: 0.0,
            rng,
            recycled_total: 0,
        })
    }

    /// Advances the clock by `tick` and the pool by one step.
    pub fn tick(&mut self, tick: f32, speed_multiplier: f32) -> usize {
        if tick.is_finite() && tick > 0.0 {
            self.time += tick;
        }
        let n = advance_orbs(
            &mut self.orbs,
            speed_multiplier,
            self.time,
            &self.cfg,
            &mut self.rng,
        );
        self.recycled_total += n as u64;
        if n > 0 {
            log::debug!(
                "tunnel: recycled {n} orbs at t = {:.3} ({} total)",
                self.time,
                self.recycled_total
            );
        }
        n
    }

    /// Total number of recycles since creation.
    pub fn recycled_total(&self) -> u64 {
        self.recycled_total
    }

    /// Projections of every orb, in pool order.
    pub fn projections(&self, width: f32, height: f32) -> impl Iterator<Item = OrbProjection> + '_ {
        self.orbs
            .iter()
            .map(move |o| project_orb(o, width, height, &self.cfg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn orb(z: f32) -> TunnelOrb {
        TunnelOrb {
            angle: 0.0,
            radius: 0.5,
            z,
            size: 0.01,
            color_index: 0,
            brightness: 1.0,
            speed: 1.0,
            trail: 1.0,
        }
    }

    #[test]
    fn init_respects_config() {
        let cfg = TunnelConfig::default();
        let orbs = init_orbs(&cfg, &mut rng()).unwrap();
        assert_eq!(orbs.len(), cfg.orb_count);
        for o in &orbs {
            assert!(o.z >= cfg.recycle_threshold && o.z <= cfg.spawn_plane);
            assert!(cfg.radius_band.contains(o.radius));
            assert!(o.color_index < cfg.palette_len);
            assert!(cfg.speed.contains(o.speed));
        }
    }

    #[test]
    fn init_rejects_empty_pool() {
        let cfg = TunnelConfig {
            orb_count: 0,
            ..TunnelConfig::default()
        };
        assert_eq!(init_orbs(&cfg, &mut rng()), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn orbs_move_towards_viewer_and_drift() {
        let cfg = TunnelConfig::default();
        let mut orbs = [orb(0.5)];
        let n = advance_orbs(&mut orbs, 1.0, 0.0, &cfg, &mut rng());
        assert_eq!(n, 0);
        assert!((orbs[0].z - (0.5 - cfg.base_speed)).abs() < 1e-6);
        assert!((orbs[0].angle - ANGULAR_DRIFT).abs() < 1e-7);
    }

    #[test]
    fn speed_pulses_around_nominal() {
        // 0.5 * t = π/2
        let quarter = std::f32::consts::FRAC_PI_2 / PULSE_RATE;
        assert!((pulsed_speed(1.0, 2.0, 0.0) - 2.0).abs() < 1e-6);
        assert!((pulsed_speed(1.0, 2.0, quarter) - 2.4).abs() < 1e-5);
        assert!((pulsed_speed(1.0, 2.0, 3.0 * quarter) - 1.6).abs() < 1e-5);
    }

    #[test]
    fn orb_below_threshold_is_recycled_to_far_plane() {
        let cfg = TunnelConfig::default();
        let mut r = rng();
        for speed in [0.0, 0.5, 1.0, 10.0] {
            let mut orbs = [orb(cfg.recycle_threshold - 1e-4)];
            let n = advance_orbs(&mut orbs, speed, 1.0, &cfg, &mut r);
            assert_eq!(n, 1);
            assert!(orbs[0].z >= cfg.spawn_plane);
            assert!(orbs[0].z < cfg.spawn_plane + cfg.spawn_jitter);
            assert!(cfg.radius_band.contains(orbs[0].radius));
        }
    }

    #[test]
    fn recycling_keeps_slot_properties() {
        let cfg = TunnelConfig::default();
        let mut orbs = [TunnelOrb {
            speed: 1.25,
            trail: 0.7,
            size: 0.009,
            ..orb(0.3)
        }];
        advance_orbs(&mut orbs, 100.0, 0.0, &cfg, &mut rng());
        assert_eq!(orbs[0].speed, 1.25);
        assert_eq!(orbs[0].trail, 0.7);
        assert_eq!(orbs[0].size, 0.009);
    }

    #[test]
    fn long_run_never_leaves_depth_range() {
        let mut sys = TunnelSystem::new(TunnelConfig::default(), rng()).unwrap();
        for _ in 0..5000 {
            sys.tick(0.016, 3.0);
            for o in &sys.orbs {
                assert!(o.z >= sys.cfg.recycle_threshold);
                assert!(o.z < sys.cfg.spawn_plane + sys.cfg.spawn_jitter);
            }
        }
        assert!(sys.recycled_total() > 0);
        assert_eq!(sys.orbs.len(), TunnelConfig::default().orb_count);
    }

    #[test]
    fn projection_matches_formula() {
        let cfg = TunnelConfig::default();
        let o = TunnelOrb {
            angle: std::f32::consts::FRAC_PI_2,
            ..orb(0.4)
        };
        let p = project_orb(&o, 800.0, 600.0, &cfg);
        // perspective = 2, screen radius = 0.5 * 2 * 600 * 0.5 = 300
        assert!((p.screen_x - 400.0).abs() < 1e-3);
        assert!((p.screen_y - 600.0).abs() < 1e-3);
        assert!((p.apparent_size - 0.01 * 2.0 * 600.0 * 2.0).abs() < 1e-4);
    }

    #[test]
    fn nearer_orbs_look_bigger() {
        let cfg = TunnelConfig::default();
        let depths = [0.95, 0.8, 0.5, 0.2, 0.05, 0.0, -0.04];
        for w in depths.windows(2) {
            let far = project_orb(&orb(w[0]), 1024.0, 768.0, &cfg);
            let near = project_orb(&orb(w[1]), 1024.0, 768.0, &cfg);
            assert!(near.apparent_size > far.apparent_size);
        }
    }

    #[test]
    fn alpha_fades_at_both_planes() {
        let cfg = TunnelConfig::default();
        assert_eq!(depth_fade(cfg.spawn_plane, &cfg), 0.0);
        assert_eq!(depth_fade(cfg.spawn_plane + 0.05, &cfg), 0.0);
        assert_eq!(depth_fade(0.0, &cfg), 0.0);
        assert_eq!(depth_fade(-0.03, &cfg), 0.0);
        assert_eq!(depth_fade(0.5, &cfg), 1.0);

        let mid_far = depth_fade(cfg.spawn_plane - cfg.far_fade / 2.0, &cfg);
        assert!((mid_far - 0.5).abs() < 1e-4);
        let mid_near = depth_fade(cfg.near_fade / 2.0, &cfg);
        assert!((mid_near - 0.5).abs() < 1e-4);

        let p = project_orb(&TunnelOrb { brightness: 0.6, ..orb(0.5) }, 100.0, 100.0, &cfg);
        assert!((p.alpha - 0.6).abs() < 1e-6);
    }

    #[test]
    fn system_projections_follow_pool_order() {
        let cfg = TunnelConfig {
            orb_count: 8,
            ..TunnelConfig::default()
        };
        let system = TunnelSystem::new(cfg, rng()).unwrap();
        let projected: Vec<_> = system.projections(640.0, 480.0).collect();
        assert_eq!(projected.len(), system.orbs.len());
        for (orb, p) in system.orbs.iter().zip(&projected) {
            assert_eq!(*p, project_orb(orb, 640.0, 480.0, &system.cfg));
        }
    }

    #[test]
    fn system_tick_accumulates_recycles() {
        let mut system = TunnelSystem::new(TunnelConfig::default(), rng()).unwrap();
        let threshold = system.cfg.recycle_threshold;
        system.orbs[0].z = threshold - 1e-3;
        system.orbs[1].z = threshold - 1e-3;

        let first = system.tick(0.016, 1.0);
        assert!(first >= 2);
        assert_eq!(system.recycled_total(), first as u64);

        let mut sum = first as u64;
        for _ in 0..500 {
            sum += system.tick(0.016, 1.0) as u64;
        }
        assert_eq!(system.recycled_total(), sum);
        assert!((system.time - 0.016 * 501.0).abs() < 1e-3);
    }
}
