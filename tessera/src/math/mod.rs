//! Small numeric helpers shared by the blend and similarity code.

mod bbox;

pub use bbox::Aabb;

use glam::DVec3;

/// Axis used when a normal sample decodes to a zero-length vector.
pub const CANONICAL_NORMAL: DVec3 = DVec3::Z;

/// Decodes a normal-map sample (R=X, G=Y, B=Z, each `c/255*2-1`) into a unit vector.
#[inline]
pub fn decode_normal(sample: [u8; 3]) -> DVec3 {
    let v = DVec3::new(
        sample[0] as f64 / 255.0 * 2.0 - 1.0,
        sample[1] as f64 / 255.0 * 2.0 - 1.0,
        sample[2] as f64 / 255.0 * 2.0 - 1.0,
    );
    v.try_normalize().unwrap_or(CANONICAL_NORMAL)
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`, clamped to [0, 1].
#[inline]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Logistic response in (0, 1), 0.5 at `x == 0`.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Wraps an angle in degrees into [0, 360).
#[inline]
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed shortest angular difference `to - from`, in (-180, 180].
#[inline]
pub fn hue_delta(from: f64, to: f64) -> f64 {
    let delta = wrap_degrees(to - from);
    if delta > 180.0 { delta - 360.0 } else { delta }
}
