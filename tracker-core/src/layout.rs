//! Layout generators that seed a scene's population.
//!
//! Two shapes are supported:
//! - [`grid_layout`] — a jittered rectangular grid, usually sized by
//!   [`grid_dimensions`] from a requested instance count.
//! - [`ring_layout`] — concentric rings around the frame centre, outer
//!   rings larger and denser (see [`ring_plan`]).
//!
//! [`init_population`] picks one of the two from [`LayoutOptions`].

use crate::{
    agent::TrackingAgent,
    config::{GridConfig, LayoutOptions, MIN_GRID_COLS, MIN_GRID_ROWS, RingConfig},
    error::ConfigError,
    geometry::lerp,
};
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Seeds a population according to `options`.
///
/// ### Parameters
/// - `instance_count` - Requested number of agents. For grids this is
///   the target total (subject to floors and the cap); for rings the
///   nominal per-ring count is `instance_count / rings`.
/// - `options` - Which layout to use and its configuration.
/// - `rng` - Source of jitter and per-agent parameters.
///
/// ### Returns
/// The new population, or a [`ConfigError`] for degenerate input.
pub fn init_population(
    instance_count: usize,
    options: &LayoutOptions,
    rng: &mut impl Rng,
) -> Result<Vec<TrackingAgent>, ConfigError> {
    if instance_count == 0 {
        return Err(ConfigError::EmptyPopulation);
    }
    match options {
        LayoutOptions::Grid {
            config,
            aspect,
            max_agents,
        } => {
            let (cols, rows) = grid_dimensions(instance_count, *aspect, *max_agents)?;
            grid_layout(cols, rows, config, rng)
        }
        LayoutOptions::Rings(config) => {
            if config.rings == 0 {
                return Err(ConfigError::NoRings);
            }
            let per_ring = (instance_count / config.rings).max(1);
            ring_layout(per_ring, config, rng)
        }
    }
}

/// Derives grid columns and rows for a target instance count.
///
/// `rows = round(sqrt(total / aspect))` and `cols = round(rows * aspect)`
/// with `total = min(instance_count, max_agents)`, floored at
/// [`MIN_GRID_COLS`] x [`MIN_GRID_ROWS`]. Neither side may exceed what
/// `total` fills with the other side at its floor. If rounding or the floors push
/// the product over `max_agents`, the dimension furthest above its
/// aspect share is shrunk until the grid fits.
pub fn grid_dimensions(
    instance_count: usize,
    aspect: f32,
    max_agents: usize,
) -> Result<(usize, usize), ConfigError> {
    if instance_count == 0 {
        return Err(ConfigError::EmptyPopulation);
    }
    if !aspect.is_finite() || aspect <= 0.0 {
        return Err(ConfigError::InvalidAspect(aspect));
    }
    let min = MIN_GRID_COLS * MIN_GRID_ROWS;
    if max_agents < min {
        return Err(ConfigError::CapBelowMinimum {
            cap: max_agents,
            min,
        });
    }

    let total = instance_count.min(max_agents);
    if total < instance_count {
        log::warn!("grid capped at {max_agents} agents ({instance_count} requested)");
    }

    // Bounded in f32 before the cast: an extreme aspect would otherwise
    // saturate one side and overflow the product.
    let max_rows = (total / MIN_GRID_COLS).max(MIN_GRID_ROWS) as f32;
    let max_cols = (total / MIN_GRID_ROWS).max(MIN_GRID_COLS) as f32;
    let mut rows = (total as f32 / aspect)
        .sqrt()
        .round()
        .clamp(MIN_GRID_ROWS as f32, max_rows) as usize;
    let mut cols = (rows as f32 * aspect)
        .round()
        .clamp(MIN_GRID_COLS as f32, max_cols) as usize;

    while cols.saturating_mul(rows) > max_agents {
        let shrink_cols = match (cols > MIN_GRID_COLS, rows > MIN_GRID_ROWS) {
            (true, true) => cols as f32 / rows as f32 >= aspect,
            (true, false) => true,
            (false, true) => false,
            (false, false) => break,
        };
        if shrink_cols {
            cols -= 1;
        } else {
            rows -= 1;
        }
    }

    Ok((cols, rows))
}

/// Centre of grid cell `(col, row)` in normalized coordinates.
#[inline]
pub fn grid_cell_center(col: usize, row: usize, cols: usize, rows: usize) -> Vec2 {
    Vec2::new(
        (col as f32 + 0.5) / cols as f32,
        (row as f32 + 0.5) / rows as f32,
    )
}

/// Lays out `cols * rows` agents on a jittered grid.
///
/// Agents are emitted row-major with ids `0..cols * rows`. Each cell
/// centre is perturbed independently per axis by up to `jitter / 2` and
/// clamped to `[0, 1]`. Springiness and scale are drawn uniformly from
/// their configured ranges; phase is uniform in `[0, 2π)`. Agents start
/// facing angle `0`.
pub fn grid_layout(
    cols: usize,
    rows: usize,
    cfg: &GridConfig,
    rng: &mut impl Rng,
) -> Result<Vec<TrackingAgent>, ConfigError> {
    if cols == 0 || rows == 0 {
        return Err(ConfigError::EmptyGrid { cols, rows });
    }
    cfg.validate()?;

    let mut agents = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let center = grid_cell_center(col, row, cols, rows);
            let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * cfg.jitter;
            let pos = (center + offset).clamp(Vec2::ZERO, Vec2::ONE);

            let springiness = cfg.springiness.sample(rng);
            let scale = cfg.scale.sample(rng);
            let phase = rng.random::<f32>() * TAU;

            agents.push(TrackingAgent::new(agents.len(), pos, 0.0, springiness, scale, phase));
        }
    }

    log::debug!("grid layout: {cols}x{rows} agents, jitter {}", cfg.jitter);
    Ok(agents)
}

/// Radius and agent count of one ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingSpec {
    pub index: usize,
    pub radius: f32,
    pub count: usize,
}

/// Computes radius and count for every ring.
///
/// Ring `i` sits at `lerp(min_radius, max_radius, i / (rings - 1))` and
/// holds `round(per_ring * (0.5 + 0.5 * i / (rings - 1)))` agents (at
/// least one). A single ring sits at `min_radius` with half the nominal
/// count.
pub fn ring_plan(
    rings: usize,
    per_ring: usize,
    min_radius: f32,
    max_radius: f32,
) -> Result<Vec<RingSpec>, ConfigError> {
    if rings == 0 {
        return Err(ConfigError::NoRings);
    }
    if per_ring == 0 {
        return Err(ConfigError::EmptyRing);
    }
    let degenerate = rings > 1 && min_radius >= max_radius;
    if !min_radius.is_finite() || !max_radius.is_finite() || min_radius > max_radius || degenerate {
        return Err(ConfigError::InvalidRange {
            name: "ring radius",
            min: min_radius,
            max: max_radius,
        });
    }

    let plan = (0..rings)
        .map(|index| {
            let t = if rings > 1 {
                index as f32 / (rings - 1) as f32
            } else {
                0.0
            };
            let count = ((per_ring as f32 * (0.5 + 0.5 * t)).round() as usize).max(1);
            RingSpec {
                index,
                radius: lerp(min_radius, max_radius, t),
                count,
            }
        })
        .collect();
    Ok(plan)
}

/// Lays out agents on concentric rings around `(0.5, 0.5)`.
///
/// Agents on a ring are evenly spaced in angle starting at `0`. Both the
/// initial facing angle and the `phase` equal the agent's angular
/// position, so ring agents animate coherently around the ring.
pub fn ring_layout(
    per_ring: usize,
    cfg: &RingConfig,
    rng: &mut impl Rng,
) -> Result<Vec<TrackingAgent>, ConfigError> {
    cfg.validate()?;
    let plan = ring_plan(cfg.rings, per_ring, cfg.min_radius, cfg.max_radius)?;

    let total: usize = plan.iter().map(|r| r.count).sum();
    let center = Vec2::splat(0.5);
    let mut agents = Vec::with_capacity(total);

    for ring in &plan {
        for k in 0..ring.count {
            let theta = TAU * k as f32 / ring.count as f32;
            let pos = (center + Vec2::from_angle(theta) * ring.radius).clamp(Vec2::ZERO, Vec2::ONE);
            let springiness = cfg.springiness.sample(rng);
            let scale = cfg.scale.sample(rng);
            agents.push(TrackingAgent::new(agents.len(), pos, theta, springiness, scale, theta));
        }
    }

    log::debug!("ring layout: {} rings, {total} agents", plan.len());
    Ok(agents)
}
