use thiserror::Error;

use crate::region::RegionId;

/// Errors reported by segmentation, feature extraction and document loading.
///
/// Blending and clustering never fail; they clamp or degenerate instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed input: edge map is {}x{} but normal map is {}x{}", edge.0, edge.1, normal.0, normal.1)]
    DimensionMismatch {
        edge: (usize, usize),
        normal: (usize, usize),
    },

    #[error("Image is {}x{} but the region set was built for {}x{}", actual.0, actual.1, expected.0, expected.1)]
    ImageSizeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Malformed input: image has zero area ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("Image {width}x{height} has more pixels than a u32 pixel address can hold")]
    ImageTooLarge { width: usize, height: usize },

    #[error("Got {actual} region colors for a set of {expected} regions")]
    ColorCountMismatch { expected: usize, actual: usize },

    #[error("Raster buffer holds {actual} bytes but its dimensions require {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Raster must have at least 3 channels, got {channels}")]
    InsufficientChannels { channels: usize },

    #[error("Region seeded at ({seed_x}, {seed_y}) exceeds the flood fill limit of {limit} pixels")]
    RegionTooLarge {
        seed_x: usize,
        seed_y: usize,
        limit: usize,
    },

    #[error("Internal invariant violated: region {id} has no pixels")]
    EmptyRegion { id: RegionId },

    #[error("Invalid region set: {0}")]
    InvalidRegionSet(String),

    #[error("Segmentation cancelled")]
    Cancelled,

    #[error("Document serialization failed: {0}")]
    Serialization(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
