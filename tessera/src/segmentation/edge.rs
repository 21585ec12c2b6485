use common::BitBuffer2;
use rayon::prelude::*;

use crate::raster::Raster;

/// Decides whether an edge-map sample separates regions.
///
/// Implementations must be pure: the same sample and position always give
/// the same answer. Classification runs in parallel, hence `Sync`.
pub trait EdgeClassifier: Sync {
    fn is_edge(&self, rgb: [u8; 3], x: usize, y: usize) -> bool;
}

/// Edge iff the grayscale mean of R, G and B is below `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayscaleThreshold {
    pub threshold: u8,
}

impl GrayscaleThreshold {
    pub const fn new(threshold: u8) -> Self {
        Self { threshold }
    }
}

impl Default for GrayscaleThreshold {
    fn default() -> Self {
        Self::new(200)
    }
}

impl EdgeClassifier for GrayscaleThreshold {
    #[inline]
    fn is_edge(&self, [r, g, b]: [u8; 3], _x: usize, _y: usize) -> bool {
        // mean < t  <=>  sum < 3t, exact in integers
        (r as u32 + g as u32 + b as u32) < 3 * self.threshold as u32
    }
}

/// Classifies every pixel of `edges`; set bits are edges.
pub fn edge_mask<C: EdgeClassifier>(edges: &Raster, classifier: &C) -> BitBuffer2 {
    let width = edges.width();
    let flags: Vec<bool> = (0..edges.pixel_count())
        .into_par_iter()
        .map(|idx| classifier.is_edge(edges.sample(idx), idx % width, idx / width))
        .collect();
    BitBuffer2::from_slice(width, edges.height(), &flags)
}
