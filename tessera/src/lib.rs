//! Tessera - edge-map segmentation and material-aware region painting.
//!
//! The library turns a line-art edge map and a matching normal map into a
//! set of regions, and provides:
//! - Constant-time pixel to region lookups
//! - Shading-preserving recoloring with optional normal lighting and feathering
//! - Similarity scoring and "same material" grouping of regions
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tessera::{Raster, RegionCache, Segmenter, SmartGroupConfig};
//!
//! let edges = Raster::rgb(&edge_bytes, width, height)?;
//! let normals = Raster::rgb(&normal_bytes, width, height)?;
//!
//! let set = Segmenter::default().segment("scene_01", &edges, &normals)?;
//! let cache = RegionCache::new();
//! let set = cache.insert("scene_01", set);
//!
//! if let Some(id) = cache.hit_test("scene_01", 120, 80) {
//!     let group = tessera::smart_group(&set, id, None, &SmartGroupConfig::default());
//!     println!("{} regions share the material of region {}", group.len(), id);
//! }
//! ```

mod color;
mod config;
mod error;
pub(crate) mod math;
mod ownership;
mod raster;
mod region;
mod segmentation;
mod similarity;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude;

// ============================================================================
// Core types
// ============================================================================

pub use error::{Error, Result};
pub use math::Aabb;
pub use raster::Raster;
pub use region::{Region, RegionColors, RegionId, RegionSet};

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    BlendConfig, EngineConfig, GroupingConfig, OversizePolicy, SegmentationConfig,
    SimilarityWeights, SmartGroupConfig,
};

// ============================================================================
// Segmentation
// ============================================================================

pub use segmentation::{
    edge_mask, EdgeClassifier, GrayscaleThreshold, SegmentationStats, Segmenter,
};

// ============================================================================
// Features and ownership
// ============================================================================

pub use ownership::{OwnershipIndex, RegionCache};
pub use region::{average_color, bounding_box, display_color};

// ============================================================================
// Color and painting
// ============================================================================

pub use color::{
    apply_paint_color, apply_paint_with_edge_fade, compute_edge_distances, hsl_to_rgb,
    lighting_factor, paint_region, painted_mask, rgb_to_hsl, Hsl, ParseHexError, Rgb,
};

// ============================================================================
// Similarity
// ============================================================================

pub use similarity::{
    color_similarity, feature_vectors, group_by_orientation, orientation_group_of,
    rank_similar, select_by_color, similarity, smart_group, FeatureVector, SimilarityFactors,
    SimilarityScore,
};
