//! Edge-map segmentation into disjoint 4-connected regions.
//!
//! Pipeline:
//! 1. Classify every edge-map pixel (parallel) into a bit mask
//! 2. Seed the visited bitmap with the edge mask so edges never join a region
//! 3. Scan row-major for the next unvisited pixel and flood fill from it
//! 4. Drop runs below `min_region_size` (their pixels become void)
//! 5. Extract features for each kept run and assign dense ids
//!
//! The flood fills themselves are strictly sequential: they share one
//! visited bitmap.

mod edge;
mod flood_fill;


use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::{OversizePolicy, SegmentationConfig};
use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::region::{build_region, RegionId, RegionSet};

use flood_fill::FloodFill;

pub use edge::{edge_mask, EdgeClassifier, GrayscaleThreshold};

/// Counters describing one segmentation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentationStats {
    pub regions: usize,
    pub edge_pixels: usize,
    /// Pixels of runs discarded as noise; owned by no region.
    pub void_pixels: usize,
    pub discarded_runs: usize,
    /// Regions cut at the pixel ceiling under [`OversizePolicy::Truncate`].
    pub truncated_regions: usize,
}

/// Segments an edge map / normal map pair into a [`RegionSet`].
#[derive(Debug)]
pub struct Segmenter<C: EdgeClassifier = GrayscaleThreshold> {
    config: SegmentationConfig,
    classifier: C,
    cancel: Option<Arc<AtomicBool>>,
}

impl Segmenter {
    /// Segmenter using the grayscale threshold from `config`.
    ///
    /// # Panics
    /// Panics if `config` fails validation.
    pub fn new(config: SegmentationConfig) -> Self {
        let classifier = GrayscaleThreshold::new(config.edge_threshold);
        Self::with_classifier(config, classifier)
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmentationConfig::default())
    }
}

impl<C: EdgeClassifier> Segmenter<C> {
    /// Segmenter with a custom edge predicate; `config.edge_threshold` is unused.
    pub fn with_classifier(config: SegmentationConfig, classifier: C) -> Self {
        config.validate();
        Self {
            config,
            classifier,
            cancel: None,
        }
    }

    /// Segmentation polls `flag` and returns [`Error::Cancelled`] once it is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    pub fn segment(&self, source_id: &str, edges: &Raster, normals: &Raster) -> Result<RegionSet> {
        self.segment_with_stats(source_id, edges, normals)
            .map(|(set, _)| set)
    }

    /// Segments and also reports how pixels were classified.
    pub fn segment_with_stats(
        &self,
        source_id: &str,
        edges: &Raster,
        normals: &Raster,
    ) -> Result<(RegionSet, SegmentationStats)> {
        let (width, height) = check_inputs(edges, normals)?;
        let start = Instant::now();

        let mut visited = edge_mask(edges, &self.classifier);
        let mut stats = SegmentationStats {
            edge_pixels: visited.count_ones(),
            ..Default::default()
        };

        let cancel = self.cancel.as_deref();
        let mut fill = FloodFill::new(width, height, self.config.max_region_pixels, cancel);
        let mut regions = Vec::new();
        let mut cursor = 0;

        while let Some(seed) = visited.next_zero(cursor) {
            if self.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let run = fill.run(&mut visited, seed)?;
            if run.truncated {
                match self.config.oversize_policy {
                    OversizePolicy::Fail => {
                        return Err(Error::RegionTooLarge {
                            seed_x: seed % width,
                            seed_y: seed / width,
                            limit: self.config.max_region_pixels,
                        });
                    }
                    OversizePolicy::Truncate => {
                        tracing::warn!(
                            "Region seeded at ({}, {}) truncated at {} pixels",
                            seed % width,
                            seed / width,
                            self.config.max_region_pixels
                        );
                        stats.truncated_regions += 1;
                    }
                }
            }

            if run.pixels.len() < self.config.min_region_size {
                stats.discarded_runs += 1;
                stats.void_pixels += run.pixels.len();
            } else {
                let id = regions.len() as RegionId;
                regions.push(build_region(id, run.pixels, normals)?);
            }

            cursor = seed + 1;
        }

        stats.regions = regions.len();
        tracing::info!(
            "Segmented '{}' ({}x{}): {} regions, {} edge pixels, {} void pixels in {} discarded runs, {:.1?}",
            source_id,
            width,
            height,
            stats.regions,
            stats.edge_pixels,
            stats.void_pixels,
            stats.discarded_runs,
            start.elapsed()
        );

        let set = RegionSet::new_unchecked(source_id.to_string(), width, height, regions);
        Ok((set, stats))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Fails fast on mismatched, empty or unaddressable inputs.
fn check_inputs(edges: &Raster, normals: &Raster) -> Result<(usize, usize)> {
    if edges.dimensions() != normals.dimensions() {
        return Err(Error::DimensionMismatch {
            edge: edges.dimensions(),
            normal: normals.dimensions(),
        });
    }

    let (width, height) = edges.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }
    if width * height > u32::MAX as usize {
        return Err(Error::ImageTooLarge { width, height });
    }

    Ok((width, height))
}
