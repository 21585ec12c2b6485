//! Adaptive-threshold selection of regions that look like the seed's material.

use crate::config::SmartGroupConfig;
use crate::region::{RegionColors, RegionId, RegionSet};

use super::{sort_best_first, FeatureVector, SimilarityFactors, SimilarityScore};

/// Regions of the same material as `seed`, seed first.
///
/// 1. Candidates whose color similarity is below `color_gate` are dropped
/// 2. Survivors are scored with the strict weights and sorted best first
/// 3. The leading `elbow_window` scores are scanned for the largest relative
///    drop; a drop qualifies if it exceeds the relative or absolute minimum
///    and the score before it is above `min_threshold`
/// 4. Cutoff is `elbow_cutoff_factor` × the pre-drop score, or
///    `fallback_cutoff_factor` × the top score without an elbow
/// 5. Survivors scoring at least `max(cutoff, min_threshold)` are returned,
///    at most `max_results` including the seed
///
/// The seed itself is never scored: its self-score of 1.0 would become the top
/// score, raising the fallback cutoff and planting a spurious first drop for
/// the elbow scan. It is prepended to the result instead.
///
/// With no surviving candidate the result is just the seed. An unknown seed
/// id gives an empty result.
pub fn smart_group(
    set: &RegionSet,
    seed: RegionId,
    colors: Option<&RegionColors>,
    config: &SmartGroupConfig,
) -> Vec<RegionId> {
    let Some(seed_region) = set.region(seed) else {
        return Vec::new();
    };
    let seed_features = FeatureVector::new(seed_region, colors);
    let diagonal = set.diagonal();

    let mut candidates: Vec<SimilarityScore> = set
        .regions()
        .iter()
        .filter(|region| region.id != seed)
        .filter_map(|region| {
            let features = FeatureVector::new(region, colors);
            let factors = SimilarityFactors::between(&seed_features, &features, diagonal);
            (factors.color >= config.color_gate).then(|| SimilarityScore {
                region_id: region.id,
                score: factors.score(&config.weights),
            })
        })
        .collect();

    let mut group = vec![seed];
    if candidates.is_empty() {
        return group;
    }

    sort_best_first(&mut candidates);
    let scores: Vec<f64> = candidates.iter().map(|c| c.score).collect();
    let cutoff = match find_elbow(&scores, config) {
        Some(elbow) => config.elbow_cutoff_factor * scores[elbow],
        None => config.fallback_cutoff_factor * scores[0],
    };
    let threshold = cutoff.max(config.min_threshold);

    group.extend(
        candidates
            .iter()
            .take_while(|candidate| candidate.score >= threshold)
            .take(config.max_results.saturating_sub(1))
            .map(|candidate| candidate.region_id),
    );

    tracing::debug!(
        "Smart group for region {}: {} gated candidates, top {:.3}, threshold {:.3}, {} selected",
        seed,
        candidates.len(),
        scores[0],
        threshold,
        group.len()
    );

    group
}

/// Index of the score just before the largest qualifying relative drop
/// among the first `elbow_window` sorted scores.
fn find_elbow(scores: &[f64], config: &SmartGroupConfig) -> Option<usize> {
    let window = scores.len().min(config.elbow_window);
    let mut best: Option<(usize, f64)> = None;

    for i in 0..window.saturating_sub(1) {
        let before = scores[i];
        let after = scores[i + 1];
        if before <= config.min_threshold {
            continue;
        }

        let absolute = before - after;
        let relative = absolute / before;
        let qualifies =
            relative > config.elbow_relative_drop || absolute > config.elbow_absolute_drop;
        if qualifies && best.is_none_or(|(_, best_relative)| relative > best_relative) {
            best = Some((i, relative));
        }
    }

    best.map(|(i, _)| i)
}
