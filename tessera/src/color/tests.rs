use common::FloatExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::config::BlendConfig;
use crate::math::{hue_delta, Aabb};
use crate::ownership::OwnershipIndex;
use crate::raster::Raster;
use crate::region::RegionSet;
use crate::testing::{rect_region, solid_rgb, FACING_CAMERA};

// ============================================================================
// Conversions
// ============================================================================

#[test]
fn hsl_of_primaries() {
    let red = Rgb::new(255, 0, 0).to_hsl();
    assert!(red.h.approximately_eq(0.0));
    assert!(red.s.approximately_eq(1.0));
    assert!(red.l.approximately_eq(0.5));

    let green = Rgb::new(0, 255, 0).to_hsl();
    assert!(green.h.approximately_eq(120.0));

    let blue = Rgb::new(0, 0, 255).to_hsl();
    assert!(blue.h.approximately_eq(240.0));

    let gray = Rgb::new(128, 128, 128).to_hsl();
    assert_eq!(gray.s, 0.0);
    assert_eq!(gray.h, 0.0);
}

#[test]
fn hsl_roundtrip_in_unit_space() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..2000 {
        let h = rng.random_range(0.0..360.0);
        let s = rng.random_range(0.0..=1.0);
        let l = rng.random_range(0.0..=1.0);

        let back = Hsl::from_unit_rgb(Hsl::new(h, s, l).to_unit_rgb());

        assert!(back.l.approximately_eq(l), "l: {l} -> {}", back.l);
        // saturation is undefined at pure black and white
        if l > 1e-6 && l < 1.0 - 1e-6 {
            assert!(back.s.approximately_eq(s), "s: {s} -> {}", back.s);
        }
        // hue is don't-care without chroma
        if s > 1e-3 && l > 1e-3 && l < 1.0 - 1e-3 {
            assert!(hue_delta(h, back.h).abs() < 1e-6, "h: {h} -> {}", back.h);
        }
    }
}

#[test]
fn rgb_roundtrip_through_hsl_is_exact() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..2000 {
        let rgb = Rgb::new(rng.random(), rng.random(), rng.random());
        assert_eq!(hsl_to_rgb(rgb_to_hsl(rgb)), rgb);
    }
}

#[test]
fn hex_parse_and_format() {
    let color = Rgb::from_hex("#e05040").unwrap();
    assert_eq!(color, Rgb::new(224, 80, 64));
    assert_eq!(color.to_hex(), "#e05040");
    assert_eq!(Rgb::from_hex("E05040").unwrap(), color);
    assert_eq!(color.to_string(), "#e05040");

    for bad in ["", "#12345", "#1234567", "#gg0000", "#ééé"] {
        assert!(Rgb::from_hex(bad).is_err(), "{bad}");
    }
}

#[test]
fn rgb_serializes_as_hex_string() {
    let json = serde_json::to_string(&Rgb::new(1, 2, 255)).unwrap();
    assert_eq!(json, "\"#0102ff\"");

    let back: Rgb = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Rgb::new(1, 2, 255));
    assert!(serde_json::from_str::<Rgb>("\"red\"").is_err());
}

#[test]
fn lerp_endpoints() {
    let a = Rgb::new(0, 100, 200);
    let b = Rgb::new(200, 100, 0);

    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 100, 100));
    assert_eq!(a.lerp(b, 7.0), b);
}

// ============================================================================
// Paint application
// ============================================================================

#[test]
fn paint_keeps_paint_hue_and_base_lightness() {
    let base = Rgb::new(180, 180, 180);
    let paint = Rgb::new(224, 80, 64);

    let result = apply_paint_color(base, paint, None, &BlendConfig::default());
    let result_hsl = result.to_hsl();
    let base_hsl = base.to_hsl();
    let paint_hsl = paint.to_hsl();

    assert_ne!(result, paint);
    assert!(
        hue_delta(paint_hsl.h, result_hsl.h).abs() < 3.0,
        "hue {} vs paint {}",
        result_hsl.h,
        paint_hsl.h
    );
    assert!(
        (result_hsl.l - base_hsl.l).abs() < 0.05,
        "lightness {} vs base {}",
        result_hsl.l,
        base_hsl.l
    );
    // paint lightness is far from the base, so the result must not follow it
    assert!((result_hsl.l - paint_hsl.l).abs() > 0.1);
}

#[test]
fn dark_and_light_bases_stay_ordered() {
    let paint = Rgb::new(40, 90, 200);
    let config = BlendConfig::default();

    let shadow = apply_paint_color(Rgb::new(30, 30, 30), paint, None, &config).to_hsl();
    let mid = apply_paint_color(Rgb::new(128, 128, 128), paint, None, &config).to_hsl();
    let highlight = apply_paint_color(Rgb::new(240, 240, 240), paint, None, &config).to_hsl();

    assert!(shadow.l < mid.l && mid.l < highlight.l);
}

#[test]
fn extremes_never_clip_to_black_or_white() {
    let config = BlendConfig::default();
    let paint = Rgb::new(200, 30, 30);

    let black = apply_paint_color(Rgb::BLACK, paint, None, &config);
    let white = apply_paint_color(Rgb::WHITE, paint, None, &config);

    assert_ne!(black, Rgb::BLACK);
    assert_ne!(white, Rgb::WHITE);
}

#[test]
fn blend_is_pure_and_in_range() {
    let mut rng = StdRng::seed_from_u64(99);
    let presets = [BlendConfig::default(), BlendConfig::refined(), BlendConfig::flat()];

    for _ in 0..1000 {
        let base = Rgb::new(rng.random(), rng.random(), rng.random());
        let paint = Rgb::new(rng.random(), rng.random(), rng.random());
        let normal = rng
            .random_bool(0.5)
            .then(|| [rng.random(), rng.random(), rng.random()]);
        let config = &presets[rng.random_range(0..presets.len())];

        let first = apply_paint_color(base, paint, normal, config);
        let second = apply_paint_color(base, paint, normal, config);
        assert_eq!(first, second);

        let hsl = first.to_hsl();
        assert!(hsl.l >= config.lightness_floor - 0.01 && hsl.l <= config.lightness_ceiling + 0.01);
    }
}

#[test]
fn achromatic_base_gets_no_hue_nudge() {
    let paint = Rgb::new(224, 80, 64);
    let nudged = BlendConfig::default();
    let plain = BlendConfig {
        hue_nudge: 0.0,
        ..BlendConfig::default()
    };

    let gray = Rgb::new(150, 150, 150);
    assert_eq!(
        apply_paint_color(gray, paint, None, &nudged),
        apply_paint_color(gray, paint, None, &plain)
    );
}

#[test]
fn colored_base_nudges_hue_toward_itself() {
    let paint = Rgb::new(200, 40, 40); // hue 0
    let base = Rgb::new(60, 200, 60); // hue 120, saturated
    let config = BlendConfig::default();

    let nudged = apply_paint_color(base, paint, None, &config).to_hsl();
    let plain = apply_paint_color(
        base,
        paint,
        None,
        &BlendConfig {
            hue_nudge: 0.0,
            ..config.clone()
        },
    )
    .to_hsl();

    let shift = hue_delta(plain.h, nudged.h);
    assert!(shift > 0.0 && shift <= 0.03 * 120.0 + 1.0, "shift {shift}");
}

#[test]
fn refined_preset_is_more_saturated() {
    let base = Rgb::new(120, 120, 120);
    let paint = Rgb::new(90, 140, 110);

    let plain = apply_paint_color(base, paint, None, &BlendConfig::default()).to_hsl();
    let refined = apply_paint_color(base, paint, None, &BlendConfig::refined()).to_hsl();

    assert!(refined.s > plain.s);
}

#[test]
fn normal_lighting_brightens_lit_and_darkens_grazing() {
    let base = Rgb::new(128, 128, 128);
    let paint = Rgb::new(60, 120, 200);
    let config = BlendConfig::default();

    let flat = apply_paint_color(base, paint, None, &config).to_hsl();
    let toward_light = apply_paint_color(base, paint, Some([96, 172, 242]), &config).to_hsl();
    let grazing = apply_paint_color(base, paint, Some([255, 128, 128]), &config).to_hsl();

    assert!(toward_light.l > flat.l, "{} vs {}", toward_light.l, flat.l);
    assert!(grazing.l < flat.l, "{} vs {}", grazing.l, flat.l);
    // departure from neutral lighting also costs saturation
    assert!(grazing.s < flat.s);
}

// ============================================================================
// Feathering
// ============================================================================

#[test]
fn edge_fade_blends_from_base_to_paint() {
    let base = Rgb::new(180, 180, 180);
    let paint = Rgb::new(224, 80, 64);
    let config = BlendConfig::default();
    let full = apply_paint_color(base, paint, None, &config);

    assert_eq!(apply_paint_with_edge_fade(base, paint, 0.0, None, &config), base);
    assert_eq!(apply_paint_with_edge_fade(base, paint, 0.4, None, &config), full);
    assert_eq!(apply_paint_with_edge_fade(base, paint, 1.0, None, &config), full);

    let half = apply_paint_with_edge_fade(base, paint, 0.2, None, &config);
    assert_ne!(half, base);
    assert_ne!(half, full);
}

/// 12x12 image: region 0 is the left 6 columns, region 1 the right 6.
fn two_halves() -> RegionSet {
    let regions = vec![
        rect_region(0, 12, Aabb::new(0, 5, 0, 11), FACING_CAMERA),
        rect_region(1, 12, Aabb::new(6, 11, 0, 11), FACING_CAMERA),
    ];
    RegionSet::from_regions("halves", 12, 12, regions).unwrap()
}

#[test]
fn edge_distances_measure_to_nearest_unpainted_pixel() {
    let set = two_halves();
    let index = OwnershipIndex::build(&set);
    let region = set.region(0).unwrap();
    let nothing_painted = painted_mask(&index, []);

    let distances = compute_edge_distances(region, &index, &nothing_painted, 8);
    assert_eq!(distances.len(), region.pixel_count);

    let at = |x: usize, y: usize| {
        let pos = region
            .pixel_indices
            .iter()
            .position(|&p| p as usize == y * 12 + x)
            .unwrap();
        distances[pos]
    };
    // next to the image border and next to the unpainted right half
    assert!(at(0, 5).approximately_eq(1.0 / 8.0));
    assert!(at(5, 5).approximately_eq(1.0 / 8.0));
    // the right half starts 3 columns away, the left border 4
    assert!(at(3, 5).approximately_eq(3.0 / 8.0));
}

#[test]
fn painted_neighbors_do_not_count_as_edges() {
    let set = two_halves();
    let index = OwnershipIndex::build(&set);
    let region = set.region(0).unwrap();

    let unpainted_neighbor = compute_edge_distances(region, &index, &painted_mask(&index, []), 8);
    let painted_neighbor = compute_edge_distances(region, &index, &painted_mask(&index, [1]), 8);

    let pos = region
        .pixel_indices
        .iter()
        .position(|&p| p as usize == 5 * 12 + 5)
        .unwrap();
    assert!(unpainted_neighbor[pos].approximately_eq(1.0 / 8.0));
    // with the right half painted the nearest unpainted pixels are past the
    // left and top borders, 6 away
    assert!(painted_neighbor[pos].approximately_eq(6.0 / 8.0));
}

#[test]
fn interior_far_from_edges_saturates_at_one() {
    // 40x40 single region: center is more than 8 pixels from every border
    let regions = vec![rect_region(0, 40, Aabb::new(0, 39, 0, 39), FACING_CAMERA)];
    let set = RegionSet::from_regions("big", 40, 40, regions).unwrap();
    let index = OwnershipIndex::build(&set);
    let region = set.region(0).unwrap();

    let distances = compute_edge_distances(region, &index, &painted_mask(&index, []), 8);
    let center = region
        .pixel_indices
        .iter()
        .position(|&p| p as usize == 20 * 40 + 20)
        .unwrap();

    assert_eq!(distances[center], 1.0);
    assert!(distances.iter().all(|&d| d > 0.0 && d <= 1.0));
}

#[test]
fn painted_mask_marks_only_selected_regions() {
    let set = two_halves();
    let index = OwnershipIndex::build(&set);

    let mask = painted_mask(&index, [1]);

    assert_eq!(mask.count_ones(), 72);
    assert!(mask.get_xy(6, 0));
    assert!(!mask.get_xy(5, 0));
}

#[test]
fn paint_region_repaints_every_member() {
    let set = two_halves();
    let index = OwnershipIndex::build(&set);
    let region = set.region(1).unwrap();
    let base_data = solid_rgb(12, 12, [180, 180, 180]);
    let base = Raster::rgb(&base_data, 12, 12).unwrap();
    let paint = Rgb::new(224, 80, 64);
    let config = BlendConfig::default();

    let flat = paint_region(&set, region, &base, paint, None, None, &config).unwrap();
    assert_eq!(flat.len(), region.pixel_count);
    let expected = apply_paint_color(Rgb::new(180, 180, 180), paint, None, &config);
    assert!(flat.iter().all(|&(_, color)| color == expected));
    assert!(flat
        .iter()
        .zip(&region.pixel_indices)
        .all(|((pixel, _), member)| pixel == member));

    let distances = compute_edge_distances(region, &index, &painted_mask(&index, []), 8);
    let feathered =
        paint_region(&set, region, &base, paint, None, Some(distances.as_slice()), &config)
            .unwrap();
    assert!(feathered
        .iter()
        .any(|&(_, color)| color != expected && color != Rgb::new(180, 180, 180)));
}

#[test]
fn paint_region_checks_inputs() {
    let set = two_halves();
    let region = set.region(0).unwrap();
    let base_data = solid_rgb(12, 12, [100, 100, 100]);
    let base = Raster::rgb(&base_data, 12, 12).unwrap();
    let small_data = solid_rgb(4, 4, [100, 100, 100]);
    let small = Raster::rgb(&small_data, 4, 4).unwrap();
    let config = BlendConfig::default();
    let paint = Rgb::new(1, 2, 3);

    assert!(matches!(
        paint_region(&set, region, &base, paint, Some(&small), None, &config),
        Err(crate::Error::DimensionMismatch { .. })
    ));
    assert!(matches!(
        paint_region(&set, region, &base, paint, None, Some(&[0.5][..]), &config),
        Err(crate::Error::BufferSize { .. })
    ));
    assert!(matches!(
        paint_region(&set, region, &small, paint, None, None, &config),
        Err(crate::Error::ImageSizeMismatch {
            expected: (12, 12),
            actual: (4, 4)
        })
    ));

    // laid out for a 20 pixel wide image, outside the 12x12 set
    let foreign = rect_region(0, 20, Aabb::new(14, 15, 0, 1), FACING_CAMERA);
    assert!(matches!(
        paint_region(&set, &foreign, &base, paint, None, None, &config),
        Err(crate::Error::InvalidRegionSet(_))
    ));
}

#[test]
fn paint_region_rejects_base_of_other_width() {
    let region = rect_region(0, 10, Aabb::new(0, 1, 8, 9), FACING_CAMERA);
    let set = RegionSet::from_regions("narrow", 10, 10, vec![region]).unwrap();
    let region = set.region(0).unwrap();
    // bounds fit inside 2x10, but member addresses reach 91
    let base_data = solid_rgb(2, 10, [100, 100, 100]);
    let base = Raster::rgb(&base_data, 2, 10).unwrap();

    let result = paint_region(
        &set,
        region,
        &base,
        Rgb::new(224, 80, 64),
        None,
        None,
        &BlendConfig::default(),
    );

    assert!(matches!(
        result,
        Err(crate::Error::ImageSizeMismatch {
            expected: (10, 10),
            actual: (2, 10)
        })
    ));
}

#[test]
fn painted_mask_ignores_unknown_ids() {
    let set = two_halves();
    let index = OwnershipIndex::build(&set);

    let mask = painted_mask(&index, [OwnershipIndex::NONE, 7, 144, 1]);

    assert_eq!(mask.count_ones(), 72);
    assert!(mask.get_xy(6, 0));
    assert!(!mask.get_xy(5, 0));
    assert_eq!(painted_mask(&index, [OwnershipIndex::NONE]).count_ones(), 0);
}
