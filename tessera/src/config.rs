//! Configuration types for segmentation, blending and clustering.
//!
//! Every struct has a `Default` carrying the tuned constants and a
//! `validate()` that panics on values the algorithms cannot work with.
//! The similarity constants are part of the behavioral contract: changing
//! them changes which regions a click selects.

use common::SerdeFormat;
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// Segmentation
// ============================================================================

/// What to do when a single flood fill reaches `max_region_pixels`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
pub enum OversizePolicy {
    /// Abort segmentation with [`Error::RegionTooLarge`](crate::Error::RegionTooLarge).
    #[default]
    Fail,
    /// Keep the pixels explored so far as one region and release the
    /// unexplored frontier back to the row-major scan.
    Truncate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// A pixel is an edge iff mean(R, G, B) is below this value.
    pub edge_threshold: u8,
    /// Connected runs smaller than this are discarded as noise and become void pixels.
    pub min_region_size: usize,
    /// Safety ceiling on pixels explored by one flood fill.
    pub max_region_pixels: usize,
    pub oversize_policy: OversizePolicy,
    /// Upper bound on pixels sampled per region when averaging colors.
    pub color_sample_limit: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 200,
            min_region_size: 5,
            max_region_pixels: 5_000_000,
            oversize_policy: OversizePolicy::Fail,
            color_sample_limit: 100,
        }
    }
}

impl SegmentationConfig {
    pub fn validate(&self) {
        assert!(
            self.min_region_size >= 1,
            "min_region_size must be at least 1, got {}",
            self.min_region_size
        );
        assert!(
            self.max_region_pixels >= self.min_region_size,
            "max_region_pixels ({}) must be >= min_region_size ({})",
            self.max_region_pixels,
            self.min_region_size
        );
        assert!(
            self.color_sample_limit >= 1,
            "color_sample_limit must be at least 1"
        );
    }
}

// ============================================================================
// Blending
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    // -- Lightness --
    /// Ease the base lightness toward mid-gray with a Hermite curve.
    pub smooth_lightness: bool,
    /// 1.0 keeps the base lightness untouched, lower values pull extremes toward 0.5.
    pub lightness_preservation: f64,
    pub lightness_floor: f64,
    pub lightness_ceiling: f64,

    // -- Saturation --
    pub paint_saturation_weight: f64,
    pub base_saturation_weight: f64,
    /// Multiplier applied after weighting, capped at 1.0.
    pub saturation_boost: f64,

    // -- Hue --
    /// Fraction of the paint-to-base hue delta added to the paint hue.
    pub hue_nudge: f64,
    /// Base saturation below which a surface counts as achromatic and gets no nudge.
    pub hue_nudge_min_saturation: f64,

    // -- Normal-based lighting --
    /// Soft light direction, biased toward the camera (+Z).
    pub light_direction: DVec3,
    /// Logistic steepness of the lighting response.
    pub lighting_steepness: f64,
    /// Dot product around which the logistic response is centered.
    pub lighting_pivot: f64,
    pub lighting_min: f64,
    pub lighting_max: f64,
    /// Saturation loss per unit of lighting deviation from 1.0.
    pub lighting_desaturation: f64,

    // -- Edge feathering --
    /// Normalized edge distance over which paint fades in.
    pub feather_width: f64,
    /// Neighborhood radius, in pixels, searched for unpainted pixels.
    pub edge_fade_radius: usize,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            smooth_lightness: true,
            lightness_preservation: 0.85,
            lightness_floor: 0.02,
            lightness_ceiling: 0.98,
            paint_saturation_weight: 0.85,
            base_saturation_weight: 0.15,
            saturation_boost: 1.0,
            hue_nudge: 0.03,
            hue_nudge_min_saturation: 0.08,
            light_direction: DVec3::new(-0.25, 0.35, 0.9),
            lighting_steepness: 6.0,
            lighting_pivot: 0.85,
            lighting_min: 0.8,
            lighting_max: 1.15,
            lighting_desaturation: 0.5,
            feather_width: 0.4,
            edge_fade_radius: 8,
        }
    }
}

impl BlendConfig {
    /// Slightly richer color: boosts saturation by 8% before the cap.
    pub fn refined() -> Self {
        Self {
            saturation_boost: 1.08,
            ..Self::default()
        }
    }

    /// Flat variant without lightness easing or hue nudging.
    pub fn flat() -> Self {
        Self {
            smooth_lightness: false,
            hue_nudge: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) {
        assert!(
            (0.0..=1.0).contains(&self.lightness_preservation),
            "lightness_preservation must be in [0, 1], got {}",
            self.lightness_preservation
        );
        assert!(
            0.0 <= self.lightness_floor
                && self.lightness_floor < self.lightness_ceiling
                && self.lightness_ceiling <= 1.0,
            "lightness bounds must satisfy 0 <= floor < ceiling <= 1, got [{}, {}]",
            self.lightness_floor,
            self.lightness_ceiling
        );
        assert!(
            self.saturation_boost > 0.0,
            "saturation_boost must be positive, got {}",
            self.saturation_boost
        );
        assert!(
            (0.0..=0.03).contains(&self.hue_nudge),
            "hue_nudge must be in [0, 0.03], got {}",
            self.hue_nudge
        );
        assert!(
            self.light_direction.length_squared() > 0.0,
            "light_direction must be non-zero"
        );
        assert!(
            self.lighting_min > 0.0 && self.lighting_min <= 1.0 && self.lighting_max >= 1.0,
            "lighting range must contain 1.0, got [{}, {}]",
            self.lighting_min,
            self.lighting_max
        );
        assert!(
            self.feather_width > 0.0,
            "feather_width must be positive, got {}",
            self.feather_width
        );
        assert!(self.edge_fade_radius >= 1, "edge_fade_radius must be >= 1");
    }
}

// ============================================================================
// Similarity
// ============================================================================

/// Weights of the four similarity factors. They sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    pub color: f64,
    pub normal: f64,
    pub size: f64,
    pub proximity: f64,
}

impl SimilarityWeights {
    /// Loose weights used to rank regions for "show me similar" lists.
    pub const RANKING: Self = Self {
        color: 0.35,
        normal: 0.30,
        size: 0.15,
        proximity: 0.20,
    };

    /// Strict weights used by smart-group selection.
    pub const SMART_GROUP: Self = Self {
        color: 0.45,
        normal: 0.25,
        size: 0.15,
        proximity: 0.15,
    };

    pub fn validate(&self) {
        let sum = self.color + self.normal + self.size + self.proximity;
        assert!(
            (sum - 1.0).abs() < 1e-9,
            "similarity weights must sum to 1, got {}",
            sum
        );
        assert!(
            [self.color, self.normal, self.size, self.proximity]
                .iter()
                .all(|w| *w >= 0.0),
            "similarity weights must be non-negative"
        );
    }
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self::RANKING
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartGroupConfig {
    /// Candidates with a lower color similarity are excluded outright.
    pub color_gate: f64,
    /// Scores below this never join a group.
    pub min_threshold: f64,
    /// How many leading sorted scores are scanned for an elbow.
    pub elbow_window: usize,
    pub elbow_relative_drop: f64,
    pub elbow_absolute_drop: f64,
    /// Cutoff = factor × score before the elbow.
    pub elbow_cutoff_factor: f64,
    /// Cutoff = factor × top score when no elbow qualifies.
    pub fallback_cutoff_factor: f64,
    /// Upper bound on returned regions, seed included.
    pub max_results: usize,
    pub weights: SimilarityWeights,
}

impl Default for SmartGroupConfig {
    fn default() -> Self {
        Self {
            color_gate: 0.88,
            min_threshold: 0.75,
            elbow_window: 12,
            elbow_relative_drop: 0.08,
            elbow_absolute_drop: 0.05,
            elbow_cutoff_factor: 0.98,
            fallback_cutoff_factor: 0.92,
            max_results: 15,
            weights: SimilarityWeights::SMART_GROUP,
        }
    }
}

impl SmartGroupConfig {
    pub fn validate(&self) {
        assert!(
            (0.0..=1.0).contains(&self.color_gate),
            "color_gate must be in [0, 1], got {}",
            self.color_gate
        );
        assert!(
            (0.0..=1.0).contains(&self.min_threshold),
            "min_threshold must be in [0, 1], got {}",
            self.min_threshold
        );
        assert!(self.elbow_window >= 2, "elbow_window must be >= 2");
        assert!(self.max_results >= 1, "max_results must be >= 1");
        self.weights.validate();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Maximum angle between normals of one orientation group, in degrees.
    pub orientation_tolerance_deg: f64,
    /// Color similarity a region must exceed to join a color-only selection.
    pub color_threshold: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            orientation_tolerance_deg: 25.0,
            color_threshold: 0.85,
        }
    }
}

impl GroupingConfig {
    pub fn validate(&self) {
        assert!(
            (0.0..=180.0).contains(&self.orientation_tolerance_deg),
            "orientation_tolerance_deg must be in [0, 180], got {}",
            self.orientation_tolerance_deg
        );
        assert!(
            (0.0..=1.0).contains(&self.color_threshold),
            "color_threshold must be in [0, 1], got {}",
            self.color_threshold
        );
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// All engine settings in one document-friendly struct.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub segmentation: SegmentationConfig,
    pub blend: BlendConfig,
    pub smart_group: SmartGroupConfig,
    pub grouping: GroupingConfig,
}

impl EngineConfig {
    pub fn validate(&self) {
        self.segmentation.validate();
        self.blend.validate();
        self.smart_group.validate();
        self.grouping.validate();
    }

    pub fn to_document(&self, format: SerdeFormat) -> Result<Vec<u8>> {
        Ok(common::serde::serialize(self, format)?)
    }

    /// Parses and validates a config document. Missing fields take defaults.
    pub fn from_document(bytes: &[u8], format: SerdeFormat) -> Result<Self> {
        let config: Self = common::serde::deserialize(bytes, format)?;
        config.validate();
        Ok(config)
    }
}
