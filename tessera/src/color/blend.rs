//! Paint application that keeps the photographed shading.
//!
//! The result takes hue and chroma from the paint but lightness from the base
//! pixel, so shadows and highlights of the original surface survive the
//! repaint. An optional normal sample adds a soft directional light term.

use crate::config::BlendConfig;
use crate::math::{decode_normal, hue_delta, sigmoid, smoothstep, wrap_degrees};

use super::{Hsl, Rgb};

/// Repaints `base` with `paint`, preserving the base's luminance texture.
///
/// Pure function of its inputs; every output channel is in [0, 255].
pub fn apply_paint_color(
    base: Rgb,
    paint: Rgb,
    normal: Option<[u8; 3]>,
    config: &BlendConfig,
) -> Rgb {
    let base_hsl = base.to_hsl();
    let paint_hsl = paint.to_hsl();

    let mut lightness = base_hsl.l;
    if config.smooth_lightness {
        lightness = ease_toward_mid_gray(lightness, config.lightness_preservation);
    }
    lightness = soft_clamp(lightness, config.lightness_floor, config.lightness_ceiling);

    let mut saturation = paint_hsl.s * config.paint_saturation_weight
        + base_hsl.s * config.base_saturation_weight;
    saturation = (saturation * config.saturation_boost).min(1.0);

    let mut hue = paint_hsl.h;
    if config.hue_nudge > 0.0 && base_hsl.s > config.hue_nudge_min_saturation {
        // Stronger base color, stronger pull; achromatic surfaces get none.
        let gate = ((base_hsl.s - config.hue_nudge_min_saturation)
            / (1.0 - config.hue_nudge_min_saturation))
            .clamp(0.0, 1.0);
        hue = wrap_degrees(hue + hue_delta(paint_hsl.h, base_hsl.h) * config.hue_nudge * gate);
    }

    if let Some(normal) = normal {
        let lighting = lighting_factor(normal, config);
        lightness = (lightness * lighting).clamp(config.lightness_floor, config.lightness_ceiling);
        let desaturation = config.lighting_desaturation * (lighting - 1.0).abs();
        saturation *= (1.0 - desaturation).max(0.0);
    }

    Rgb::from_hsl(Hsl::new(hue, saturation.clamp(0.0, 1.0), lightness))
}

/// Blends the painted result back toward `base` near region boundaries.
///
/// `edge_distance` is the normalized distance to the nearest unpainted pixel
/// (0 at the boundary, 1 far inside). Alpha is `smoothstep(0, feather_width, d)`.
pub fn apply_paint_with_edge_fade(
    base: Rgb,
    paint: Rgb,
    edge_distance: f64,
    normal: Option<[u8; 3]>,
    config: &BlendConfig,
) -> Rgb {
    let painted = apply_paint_color(base, paint, normal, config);
    let alpha = smoothstep(0.0, config.feather_width, edge_distance);
    base.lerp(painted, alpha)
}

/// Lightness multiplier in `[lighting_min, lighting_max]` for a normal-map sample.
pub fn lighting_factor(normal: [u8; 3], config: &BlendConfig) -> f64 {
    let light = config
        .light_direction
        .try_normalize()
        .unwrap_or(glam::DVec3::Z);
    let dot = decode_normal(normal).dot(light);
    let response = sigmoid(config.lighting_steepness * (dot - config.lighting_pivot));
    config.lighting_min + (config.lighting_max - config.lighting_min) * response
}

/// Pulls lightness toward 0.5, more strongly near black and white.
///
/// The pull follows a Hermite curve of the distance from mid-gray, scaled by
/// `1 - preservation`. Monotonic for any preservation in [0, 1].
fn ease_toward_mid_gray(lightness: f64, preservation: f64) -> f64 {
    let distance = ((lightness - 0.5).abs() * 2.0).min(1.0);
    let eased = distance * distance * (3.0 - 2.0 * distance);
    let pull = (1.0 - preservation) * eased;
    0.5 + (lightness - 0.5) * (1.0 - pull)
}

/// Maps [0, 1] linearly into [floor, ceiling] so no input clips to pure black or white.
#[inline]
fn soft_clamp(value: f64, floor: f64, ceiling: f64) -> f64 {
    floor + (ceiling - floor) * value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::FloatExt;

    #[test]
    fn ease_keeps_mid_gray_fixed() {
        assert!(ease_toward_mid_gray(0.5, 0.0).approximately_eq(0.5));
        assert!(ease_toward_mid_gray(0.5, 0.85).approximately_eq(0.5));
    }

    #[test]
    fn ease_full_preservation_is_identity() {
        for l in [0.0, 0.1, 0.37, 0.8, 1.0] {
            assert!(ease_toward_mid_gray(l, 1.0).approximately_eq(l));
        }
    }

    #[test]
    fn ease_is_monotonic() {
        for preservation in [0.0, 0.5, 0.85] {
            let mut previous = ease_toward_mid_gray(0.0, preservation);
            for step in 1..=100 {
                let current = ease_toward_mid_gray(step as f64 / 100.0, preservation);
                assert!(current >= previous, "preservation {preservation} step {step}");
                previous = current;
            }
        }
    }

    #[test]
    fn soft_clamp_avoids_extremes() {
        assert!(soft_clamp(0.0, 0.02, 0.98).approximately_eq(0.02));
        assert!(soft_clamp(1.0, 0.02, 0.98).approximately_eq(0.98));
        assert!(soft_clamp(0.5, 0.02, 0.98).approximately_eq(0.5));
    }

    #[test]
    fn lighting_factor_stays_in_range() {
        let config = BlendConfig::default();
        for normal in [[128, 128, 255], [0, 128, 128], [255, 255, 0], [128, 0, 0], [64, 200, 180]] {
            let factor = lighting_factor(normal, &config);
            assert!(
                factor >= config.lighting_min && factor <= config.lighting_max,
                "{normal:?} -> {factor}"
            );
        }
    }

    #[test]
    fn lighting_factor_is_near_neutral_facing_camera() {
        let config = BlendConfig::default();
        let factor = lighting_factor([128, 128, 255], &config);
        assert!((factor - 1.0).abs() < 0.05, "facing camera: {factor}");
    }

    #[test]
    fn lighting_factor_darkens_surfaces_facing_away() {
        let config = BlendConfig::default();
        let facing = lighting_factor([128, 128, 255], &config);
        let grazing = lighting_factor([255, 128, 128], &config);
        assert!(grazing < facing);
    }
}
