//! Edge distances for feathered painting and whole-region paint application.

use common::BitBuffer2;
use rayon::prelude::*;

use crate::config::BlendConfig;
use crate::error::{Error, Result};
use crate::ownership::OwnershipIndex;
use crate::raster::Raster;
use crate::region::{Region, RegionId, RegionSet};

use super::{apply_paint_color, apply_paint_with_edge_fade, Rgb};

/// Mask of pixels owned by any of `painted` regions.
///
/// Ids no region of the index can have, including [`OwnershipIndex::NONE`],
/// are ignored.
pub fn painted_mask(
    index: &OwnershipIndex,
    painted: impl IntoIterator<Item = RegionId>,
) -> BitBuffer2 {
    // Every region owns at least one pixel, so real ids are below the pixel count.
    let pixel_count = index.as_slice().len();
    let mut flags = Vec::new();
    for id in painted {
        if id == OwnershipIndex::NONE || id as usize >= pixel_count {
            continue;
        }
        let id = id as usize;
        if id >= flags.len() {
            flags.resize(id + 1, false);
        }
        flags[id] = true;
    }

    let bits: Vec<bool> = index
        .as_slice()
        .par_iter()
        .map(|&owner| flags.get(owner as usize).copied().unwrap_or(false))
        .collect();
    BitBuffer2::from_slice(index.width(), index.height(), &bits)
}

/// Normalized distance from each member of `region` to the nearest unpainted
/// pixel, in `pixel_indices` order.
///
/// Searches a disc of `radius` pixels. Pixels outside the image count as
/// unpainted; pixels of `region` itself and of any region set in `painted`
/// do not. Distances are divided by `radius` and capped at 1.0; a pixel with
/// no unpainted neighbor in range gets 1.0.
pub fn compute_edge_distances(
    region: &Region,
    index: &OwnershipIndex,
    painted: &BitBuffer2,
    radius: usize,
) -> Vec<f64> {
    let radius = radius.max(1);
    let offsets = disc_offsets(radius);
    let width = index.width() as i64;
    let height = index.height() as i64;

    let is_unpainted = |x: i64, y: i64| -> bool {
        if x < 0 || y < 0 || x >= width || y >= height {
            return true;
        }
        let pixel = (y * width + x) as usize;
        !painted.get(pixel) && index.owner_at(pixel) != Some(region.id)
    };

    region
        .pixel_indices
        .par_iter()
        .map(|&pixel| {
            let x = pixel as i64 % width;
            let y = pixel as i64 / width;
            offsets
                .iter()
                .find(|(dx, dy, _)| is_unpainted(x + dx, y + dy))
                .map_or(1.0, |&(_, _, distance)| (distance / radius as f64).min(1.0))
        })
        .collect()
}

/// Offsets within `radius`, nearest first, excluding the center.
fn disc_offsets(radius: usize) -> Vec<(i64, i64, f64)> {
    let r = radius as i64;
    let mut offsets = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
    for dy in -r..=r {
        for dx in -r..=r {
            if dx == 0 && dy == 0 {
                continue;
            }
            let distance = ((dx * dx + dy * dy) as f64).sqrt();
            if distance <= radius as f64 {
                offsets.push((dx, dy, distance));
            }
        }
    }
    offsets.sort_by(|a, b| a.2.total_cmp(&b.2));
    offsets
}

/// Repaints every member of `region`, a region of `set`.
///
/// `base` is the photographed image and must have the set's dimensions, since
/// member addresses are `y * set.width() + x`. `normals` is an optional normal
/// map of the same size. With `edge_distances` (from [`compute_edge_distances`], one
/// entry per member) the paint is feathered toward the region boundary.
/// Returns `(pixel address, color)` pairs in member order.
pub fn paint_region(
    set: &RegionSet,
    region: &Region,
    base: &Raster,
    paint: Rgb,
    normals: Option<&Raster>,
    edge_distances: Option<&[f64]>,
    config: &BlendConfig,
) -> Result<Vec<(u32, Rgb)>> {
    if base.dimensions() != set.dimensions() {
        return Err(Error::ImageSizeMismatch {
            expected: set.dimensions(),
            actual: base.dimensions(),
        });
    }
    if let Some(normals) = normals {
        if normals.dimensions() != base.dimensions() {
            return Err(Error::DimensionMismatch {
                edge: base.dimensions(),
                normal: normals.dimensions(),
            });
        }
    }
    if let Some(distances) = edge_distances {
        if distances.len() != region.pixel_indices.len() {
            return Err(Error::BufferSize {
                expected: region.pixel_indices.len(),
                actual: distances.len(),
            });
        }
    }
    let pixel_total = base.pixel_count();
    if region.bounds.x_max >= set.width()
        || region.bounds.y_max >= set.height()
        || region
            .pixel_indices
            .iter()
            .any(|&pixel| pixel as usize >= pixel_total)
    {
        return Err(Error::InvalidRegionSet(format!(
            "region {} extends past the {}x{} region set",
            region.id,
            set.width(),
            set.height()
        )));
    }

    let painted = region
        .pixel_indices
        .iter()
        .enumerate()
        .map(|(i, &pixel)| {
            let base_color = base.rgb_at(pixel as usize);
            let normal = normals.map(|normals| normals.sample(pixel as usize));
            let color = match edge_distances {
                Some(distances) => {
                    apply_paint_with_edge_fade(base_color, paint, distances[i], normal, config)
                }
                None => apply_paint_color(base_color, paint, normal, config),
            };
            (pixel, color)
        })
        .collect();

    Ok(painted)
}
