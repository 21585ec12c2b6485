//! Synthetic rasters and region fixtures for tests.

#![allow(dead_code)]

use crate::color::Rgb;
use crate::math::Aabb;
use crate::region::{bounding_box, display_color, Region, RegionId, RegionSet};

/// Normal-map sample facing the camera.
pub const FACING_CAMERA: [u8; 3] = [128, 128, 255];

const EDGE: [u8; 3] = [0, 0, 0];
const OPEN: [u8; 3] = [255, 255, 255];

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// RGB edge map from ASCII art: `#` is an edge, anything else is open.
///
/// Returns `(data, width, height)`.
pub fn edge_map(rows: &[&str]) -> (Vec<u8>, usize, usize) {
    let height = rows.len();
    let width = rows.first().map_or(0, |row| row.len());
    let mut data = Vec::with_capacity(width * height * 3);
    for row in rows {
        assert_eq!(row.len(), width, "ragged edge map row {row:?}");
        for c in row.chars() {
            data.extend_from_slice(if c == '#' { &EDGE } else { &OPEN });
        }
    }
    (data, width, height)
}

/// Tightly packed RGB raster filled with one color.
pub fn solid_rgb(width: usize, height: usize, color: [u8; 3]) -> Vec<u8> {
    color.repeat(width * height)
}

/// Normal map where every pixel faces the camera.
pub fn flat_normals(width: usize, height: usize) -> Vec<u8> {
    solid_rgb(width, height, FACING_CAMERA)
}

/// Region covering the inclusive rectangle, with features filled in.
pub fn rect_region(id: RegionId, image_width: usize, bounds: Aabb, avg_normal: [u8; 3]) -> Region {
    let mut pixels = Vec::new();
    for y in bounds.y_min..=bounds.y_max {
        for x in bounds.x_min..=bounds.x_max {
            pixels.push((y * image_width + x) as u32);
        }
    }
    region_from_pixels(id, image_width, pixels, avg_normal)
}

pub fn region_from_pixels(
    id: RegionId,
    image_width: usize,
    pixels: Vec<u32>,
    avg_normal: [u8; 3],
) -> Region {
    Region {
        id,
        bounds: bounding_box(&pixels, image_width),
        pixel_count: pixels.len(),
        pixel_indices: pixels,
        avg_normal,
        display_color: display_color(id),
    }
}

/// Valid set of `count` 2x2 regions laid out on a row with one-pixel gaps.
pub fn tiled_set(count: usize, normals: &[[u8; 3]]) -> RegionSet {
    let width = count * 3;
    let regions = (0..count)
        .map(|i| {
            let x = i * 3;
            let normal = normals.get(i).copied().unwrap_or(FACING_CAMERA);
            rect_region(i as RegionId, width, Aabb::new(x, x + 1, 0, 1), normal)
        })
        .collect();
    RegionSet::from_regions("tiles", width, 2, regions).unwrap()
}

/// Gray color at a given color similarity to black.
///
/// Moves along the gray diagonal, where Euclidean RGB distance is
/// `sqrt(3) * channel`.
pub fn gray_at_similarity(similarity: f64) -> Rgb {
    let max_distance = (3.0f64 * 255.0 * 255.0).sqrt();
    let channel = (1.0 - similarity) * max_distance / 3.0f64.sqrt();
    Rgb::from_f64_clamped(channel, channel, channel)
}
