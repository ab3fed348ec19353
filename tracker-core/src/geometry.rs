//! Stateless geometry helpers shared by every module.

use crate::error::ConfigError;
use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Angle (radians) of the direction from `from` towards `to`.
///
/// Follows the `atan2` convention: `0` points along `+x`, positive angles
/// rotate towards `+y`.
#[inline]
pub fn angle_to_target(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Euclidean distance between two normalized positions.
#[inline]
pub fn distance_to_target(from: Vec2, to: Vec2) -> f32 {
    from.distance(to)
}

/// Linear interpolation between `a` and `b`; `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamps `v` to `[0, 1]`.
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Clamped linear ramp: `0` at `lo`, `1` at `hi`.
///
/// `lo` may be greater than `hi` for a falling ramp. A degenerate ramp
/// (`lo == hi`) acts as a step at `lo`.
#[inline]
pub fn ramp(v: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if span == 0.0 {
        return if v >= lo { 1.0 } else { 0.0 };
    }
    clamp_unit((v - lo) / span)
}

/// Wraps an angular difference into `(-π, π]`.
///
/// Inputs are expected to be differences of two single angles, so the
/// add/subtract loop runs at most a couple of times. Larger magnitudes
/// are first reduced with `rem_euclid`, and non-finite input yields `0`.
pub fn wrap_angle(delta: f32) -> f32 {
    if !delta.is_finite() {
        return 0.0;
    }
    let mut d = delta;
    if d.abs() > 4.0 * TAU {
        d = d.rem_euclid(TAU);
    }
    while d > PI {
        d -= TAU;
    }
    while d <= -PI {
        d += TAU;
    }
    d
}

/// 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Parses `#rgb` / `#rrggbb` colours (leading `#` optional, any case).
pub fn parse_hex_color(s: &str) -> Result<Rgb, ConfigError> {
    let bad = || ConfigError::BadHexColor(s.to_owned());
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad());
    }

    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| bad());
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, slot) in out.iter_mut().enumerate() {
                let v = channel(&hex[i..=i])?;
                *slot = v * 17;
            }
            Ok(Rgb::new(out[0], out[1], out[2]))
        }
        6 => Ok(Rgb::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => Err(bad()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_to_target_follows_atan2_axes() {
        let o = Vec2::new(0.5, 0.5);
        assert!((angle_to_target(o, Vec2::new(0.9, 0.5)) - 0.0).abs() < 1e-6);
        assert!((angle_to_target(o, Vec2::new(0.5, 0.9)) - PI / 2.0).abs() < 1e-6);
        assert!((angle_to_target(o, Vec2::new(0.1, 0.5)) - PI).abs() < 1e-6);
        assert!((angle_to_target(o, Vec2::new(0.5, 0.1)) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn distance_is_euclidean() {
        let d = distance_to_target(Vec2::new(0.0, 0.0), Vec2::new(0.3, 0.4));
        assert!((d - 0.5).abs() < 1e-6);
    }

    #[test]
    fn lerp_and_ramp_endpoints() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);

        assert_eq!(ramp(-1.0, 0.0, 0.5), 0.0);
        assert_eq!(ramp(0.25, 0.0, 0.5), 0.5);
        assert_eq!(ramp(3.0, 0.0, 0.5), 1.0);
        // Falling ramp.
        assert_eq!(ramp(1.0, 1.0, 0.8), 0.0);
        assert_eq!(ramp(0.5, 1.0, 0.8), 1.0);
    }

    #[test]
    fn wrap_angle_lands_in_half_open_interval() {
        assert_eq!(wrap_angle(PI), PI);
        assert_eq!(wrap_angle(-PI), PI);

        let samples = [
            0.0, 1.0, -1.0, 3.5, -3.5, TAU, -TAU, 3.0 * PI, -3.0 * PI, 7.0, -7.0, 100.0, -250.0,
        ];
        for d in samples {
            let w = wrap_angle(d);
            assert!(w > -PI && w <= PI, "wrap_angle({d}) = {w}");
            // Same direction on the circle.
            assert!((w.sin() - d.sin()).abs() < 1e-3 && (w.cos() - d.cos()).abs() < 1e-3);
        }
    }

    #[test]
    fn wrap_angle_handles_non_finite() {
        assert_eq!(wrap_angle(f32::NAN), 0.0);
        assert_eq!(wrap_angle(f32::INFINITY), 0.0);
        assert_eq!(wrap_angle(f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn parse_hex_color_accepts_short_and_long_forms() {
        assert_eq!(parse_hex_color("#ff8800").unwrap(), Rgb::new(255, 136, 0));
        assert_eq!(parse_hex_color("00FFaa").unwrap(), Rgb::new(0, 255, 170));
        assert_eq!(parse_hex_color("#f80").unwrap(), Rgb::new(255, 136, 0));
    }

    #[test]
    fn parse_hex_color_rejects_garbage() {
        for s in ["", "#", "#12", "#12345", "#gg0000", "#1234567", "#ééé"] {
            assert!(
                matches!(parse_hex_color(s), Err(ConfigError::BadHexColor(_))),
                "accepted {s:?}"
            );
        }
    }
}
