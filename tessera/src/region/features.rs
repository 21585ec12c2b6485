//! Per-region feature extraction: bounds, average normal, sampled color and
//! the id-keyed display color.

use glam::DVec3;

use crate::color::{Hsl, Rgb};
use crate::error::{Error, Result};
use crate::math::Aabb;
use crate::raster::Raster;

use super::{Region, RegionId, RegionSet};

const GOLDEN_RATIO_CONJUGATE: f64 = 0.6180339887;

/// Builds a region from flood-fill output, computing its features.
///
/// `normals` must have the dimensions the pixel addresses were computed for.
pub(crate) fn build_region(id: RegionId, pixels: Vec<u32>, normals: &Raster) -> Result<Region> {
    if pixels.is_empty() {
        return Err(Error::EmptyRegion { id });
    }

    let bounds = bounding_box(&pixels, normals.width());
    let avg_normal = average_normal(&pixels, normals);

    Ok(Region {
        id,
        pixel_count: pixels.len(),
        pixel_indices: pixels,
        bounds,
        avg_normal,
        display_color: display_color(id),
    })
}

/// Tight inclusive bounds over pixel addresses in an image of `width` columns.
pub fn bounding_box(pixels: &[u32], width: usize) -> Aabb {
    let mut bounds = Aabb::empty();
    for &pixel in pixels {
        let pixel = pixel as usize;
        bounds.include(pixel % width, pixel / width);
    }
    bounds
}

/// Per-channel mean of the normal map, rounded to the nearest integer.
fn average_normal(pixels: &[u32], normals: &Raster) -> [u8; 3] {
    debug_assert!(!pixels.is_empty());

    let mut sum = [0u64; 3];
    for &pixel in pixels {
        let sample = normals.sample(pixel as usize);
        for (acc, channel) in sum.iter_mut().zip(sample) {
            *acc += channel as u64;
        }
    }

    let count = pixels.len() as f64;
    sum.map(|acc| (acc as f64 / count).round() as u8)
}

/// Mean RGB over at most `limit` evenly strided members, channels in [0, 255].
///
/// Regions above the limit are sampled, not fully averaged. Good enough for
/// similarity scoring, not for reconstruction. `None` for an empty slice.
pub fn average_color(pixels: &[u32], image: &Raster, limit: usize) -> Option<DVec3> {
    if pixels.is_empty() {
        return None;
    }

    let step = pixels.len().div_ceil(limit.max(1));
    let mut sum = DVec3::ZERO;
    let mut count = 0usize;
    for &pixel in pixels.iter().step_by(step) {
        sum += image.rgb_at(pixel as usize).to_dvec3();
        count += 1;
    }

    Some(sum / count as f64)
}

/// Deterministic, visually distinct color for a region id.
///
/// Hue steps by the golden ratio; saturation and lightness alternate between
/// two tiers so neighbors with similar hues still differ.
pub fn display_color(id: RegionId) -> Rgb {
    let hue = (id as f64 * GOLDEN_RATIO_CONJUGATE).fract() * 360.0;
    let saturation = if id % 3 == 0 { 0.85 } else { 0.65 };
    let lightness = if id % 2 == 0 { 0.55 } else { 0.45 };
    Rgb::from_hsl(Hsl::new(hue, saturation, lightness))
}

/// Average color per region, indexed by region id, channels in [0, 255].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionColors {
    colors: Vec<DVec3>,
}

impl RegionColors {
    /// Samples each region's average color from a photographed base image.
    pub fn sample(set: &RegionSet, image: &Raster, limit: usize) -> Result<Self> {
        if image.dimensions() != set.dimensions() {
            return Err(Error::ImageSizeMismatch {
                expected: set.dimensions(),
                actual: image.dimensions(),
            });
        }

        let colors = set
            .regions()
            .iter()
            .map(|region| {
                average_color(&region.pixel_indices, image, limit)
                    .ok_or(Error::EmptyRegion { id: region.id })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { colors })
    }

    /// Wraps caller-provided colors; position `i` belongs to region `i`.
    ///
    /// Exactly one color per region of `set` is required, so a query never
    /// compares a sampled color against a normal-triplet fallback.
    pub fn from_colors(set: &RegionSet, colors: impl IntoIterator<Item = Rgb>) -> Result<Self> {
        let colors: Vec<DVec3> = colors.into_iter().map(Rgb::to_dvec3).collect();
        if colors.len() != set.len() {
            return Err(Error::ColorCountMismatch {
                expected: set.len(),
                actual: colors.len(),
            });
        }
        Ok(Self { colors })
    }

    #[inline]
    pub fn get(&self, id: RegionId) -> Option<DVec3> {
        self.colors.get(id as usize).copied()
    }

    /// Sampled color of `region`, or its raw average normal triplet when the
    /// caller has no colors. Colors and regions must come from the same set.
    pub fn color_of(colors: Option<&RegionColors>, region: &Region) -> DVec3 {
        colors
            .and_then(|colors| colors.get(region.id))
            .unwrap_or_else(|| Rgb::from(region.avg_normal).to_dvec3())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
