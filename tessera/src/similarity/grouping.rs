//! Single-factor groupings: surface orientation and color.

use crate::config::GroupingConfig;
use crate::region::{Region, RegionColors, RegionId, RegionSet};

use super::color_similarity;

/// Greedy leader grouping of regions by normal direction.
///
/// Regions are visited in slice order. Each unassigned region becomes a
/// leader and claims every later unassigned region whose normal is within
/// `tolerance_deg` of its own. The result depends on input order and is not
/// globally optimal; callers wanting reproducible groups pass regions in id
/// order, as [`RegionSet::regions`] does.
pub fn group_by_orientation(regions: &[Region], tolerance_deg: f64) -> Vec<Vec<RegionId>> {
    let min_cos = tolerance_deg.to_radians().cos();
    let normals: Vec<_> = regions.iter().map(Region::unit_normal).collect();
    let mut assigned = vec![false; regions.len()];
    let mut groups = Vec::new();

    for leader in 0..regions.len() {
        if assigned[leader] {
            continue;
        }
        assigned[leader] = true;
        let mut group = vec![regions[leader].id];

        for member in leader + 1..regions.len() {
            if !assigned[member] && normals[leader].dot(normals[member]) >= min_cos {
                assigned[member] = true;
                group.push(regions[member].id);
            }
        }
        groups.push(group);
    }

    tracing::debug!(
        "Grouped {} regions into {} orientation groups at {:.1} degrees",
        regions.len(),
        groups.len(),
        tolerance_deg
    );

    groups
}

/// The orientation group containing `seed`, or an empty list for an unknown id.
pub fn orientation_group_of(
    set: &RegionSet,
    seed: RegionId,
    config: &GroupingConfig,
) -> Vec<RegionId> {
    group_by_orientation(set.regions(), config.orientation_tolerance_deg)
        .into_iter()
        .find(|group| group.contains(&seed))
        .unwrap_or_default()
}

/// Every region whose color similarity to `seed` exceeds
/// `config.color_threshold`, in id order. The seed itself is included.
pub fn select_by_color(
    set: &RegionSet,
    seed: RegionId,
    colors: Option<&RegionColors>,
    config: &GroupingConfig,
) -> Vec<RegionId> {
    let Some(seed_region) = set.region(seed) else {
        return Vec::new();
    };
    let seed_color = RegionColors::color_of(colors, seed_region);

    set.regions()
        .iter()
        .filter(|region| {
            region.id == seed
                || color_similarity(seed_color, RegionColors::color_of(colors, region))
                    > config.color_threshold
        })
        .map(|region| region.id)
        .collect()
}
