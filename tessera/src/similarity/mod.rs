//! Region similarity and "same material" selection.
//!
//! Four factors, each in [0, 1]:
//!
//! | factor    | formula                                          |
//! |-----------|--------------------------------------------------|
//! | color     | `1 - |rgb_a - rgb_b| / sqrt(3 * 255²)`           |
//! | normal    | `(n_a · n_b + 1) / 2`                            |
//! | size      | `1 / (1 + log10(max_area / min_area))`           |
//! | proximity | `1 - min(1, |c_a - c_b| / (0.3 * diagonal))`     |
//!
//! A score is their weighted sum under a [`SimilarityWeights`] tuple.
//! Every query here is a pure function of its inputs and never fails; an
//! unknown seed id yields an empty result.

mod grouping;
mod smart_group;


use glam::{DVec2, DVec3};

use crate::config::SimilarityWeights;
use crate::region::{Region, RegionColors, RegionId, RegionSet};

pub use grouping::{group_by_orientation, orientation_group_of, select_by_color};
pub use smart_group::smart_group;

/// Largest possible Euclidean distance between two 8-bit RGB colors.
const MAX_COLOR_DISTANCE: f64 = 441.672_955_930_063_7;

/// Fraction of the image diagonal at which proximity reaches zero.
const PROXIMITY_RANGE: f64 = 0.3;

/// Ephemeral per-region descriptor for similarity scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub region_id: RegionId,
    /// Bounding box midpoint, in pixels.
    pub center: DVec2,
    /// Average color, channels in [0, 255].
    pub color: DVec3,
    pub normal: DVec3,
    pub area: f64,
    pub aspect_ratio: f64,
}

impl FeatureVector {
    /// Without `colors` the region's raw average normal triplet stands in
    /// for its color.
    pub fn new(region: &Region, colors: Option<&RegionColors>) -> Self {
        Self {
            region_id: region.id,
            center: region.bounds.center(),
            color: RegionColors::color_of(colors, region),
            normal: region.unit_normal(),
            area: region.pixel_count as f64,
            aspect_ratio: region.bounds.aspect_ratio(),
        }
    }
}

/// Feature vectors for every region, indexed by id.
pub fn feature_vectors(set: &RegionSet, colors: Option<&RegionColors>) -> Vec<FeatureVector> {
    set.regions()
        .iter()
        .map(|region| FeatureVector::new(region, colors))
        .collect()
}

/// The four similarity factors between two regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityFactors {
    pub color: f64,
    pub normal: f64,
    pub size: f64,
    pub proximity: f64,
}

impl SimilarityFactors {
    /// Factors between `a` and `b` in an image with the given diagonal.
    pub fn between(a: &FeatureVector, b: &FeatureVector, diagonal: f64) -> Self {
        Self {
            color: color_similarity(a.color, b.color),
            normal: ((a.normal.dot(b.normal) + 1.0) / 2.0).clamp(0.0, 1.0),
            size: size_similarity(a.area, b.area),
            proximity: proximity_similarity(a.center, b.center, diagonal),
        }
    }

    #[inline]
    pub fn score(&self, weights: &SimilarityWeights) -> f64 {
        weights.color * self.color
            + weights.normal * self.normal
            + weights.size * self.size
            + weights.proximity * self.proximity
    }
}

/// A region and its score against some seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScore {
    pub region_id: RegionId,
    pub score: f64,
}

/// `1 - distance / max_distance` for colors with channels in [0, 255].
#[inline]
pub fn color_similarity(a: DVec3, b: DVec3) -> f64 {
    (1.0 - a.distance(b) / MAX_COLOR_DISTANCE).clamp(0.0, 1.0)
}

#[inline]
fn size_similarity(a: f64, b: f64) -> f64 {
    let (small, large) = if a < b { (a, b) } else { (b, a) };
    if small <= 0.0 {
        return 0.0;
    }
    1.0 / (1.0 + (large / small).log10())
}

#[inline]
fn proximity_similarity(a: DVec2, b: DVec2, diagonal: f64) -> f64 {
    let range = PROXIMITY_RANGE * diagonal;
    if range <= 0.0 {
        return 1.0;
    }
    1.0 - (a.distance(b) / range).min(1.0)
}

/// Weighted four-factor score in [0, 1]; symmetric in `a` and `b`.
pub fn similarity(
    a: &FeatureVector,
    b: &FeatureVector,
    diagonal: f64,
    weights: &SimilarityWeights,
) -> f64 {
    SimilarityFactors::between(a, b, diagonal).score(weights)
}

/// Every other region scored against `seed` with the loose ranking weights,
/// best first. Scores below `min_score` are dropped; at most `limit` are kept.
pub fn rank_similar(
    set: &RegionSet,
    seed: RegionId,
    colors: Option<&RegionColors>,
    min_score: f64,
    limit: usize,
) -> Vec<SimilarityScore> {
    let Some(seed_region) = set.region(seed) else {
        return Vec::new();
    };
    let seed_features = FeatureVector::new(seed_region, colors);
    let diagonal = set.diagonal();
    let weights = SimilarityWeights::RANKING;

    let mut scores: Vec<SimilarityScore> = set
        .regions()
        .iter()
        .filter(|region| region.id != seed)
        .map(|region| SimilarityScore {
            region_id: region.id,
            score: similarity(
                &seed_features,
                &FeatureVector::new(region, colors),
                diagonal,
                &weights,
            ),
        })
        .filter(|candidate| candidate.score >= min_score)
        .collect();

    sort_best_first(&mut scores);
    scores.truncate(limit);
    scores
}

/// Descending by score, ties broken by ascending id for determinism.
fn sort_best_first(scores: &mut [SimilarityScore]) {
    scores.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.region_id.cmp(&b.region_id))
    });
}
