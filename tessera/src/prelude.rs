//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use tessera::prelude::*;
//! ```

// Core types
pub use crate::{Error, Raster, Region, RegionId, RegionSet, Result, Rgb};

// Segmentation and lookup
pub use crate::{OwnershipIndex, RegionCache, SegmentationConfig, Segmenter};

// Painting
pub use crate::{paint_region, BlendConfig};

// Similarity
pub use crate::{rank_similar, smart_group, RegionColors, SmartGroupConfig};
