//! Regions and the immutable per-image region set.
//!
//! A [`RegionSet`] is an arena of [`Region`]s addressed by dense integer ids:
//! `regions[i].id == i`. It is produced once by segmentation and never
//! mutated; paint and selection state live with the caller, keyed by id.

mod features;


use std::time::{SystemTime, UNIX_EPOCH};

use common::{BitBuffer2, SerdeFormat};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::math::{decode_normal, Aabb};

pub use features::{average_color, bounding_box, display_color, RegionColors};
pub(crate) use features::build_region;

/// Dense region identifier, contiguous from 0 within one [`RegionSet`].
pub type RegionId = u32;

/// A maximal 4-connected group of non-edge pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: RegionId,
    /// Member pixel addresses (`y * width + x`) in flood-fill discovery order.
    pub pixel_indices: Vec<u32>,
    /// Tight inclusive bounds over the members.
    pub bounds: Aabb,
    /// Per-channel mean of the normal map over the members, not yet unit-normalized.
    pub avg_normal: [u8; 3],
    pub pixel_count: usize,
    pub display_color: Rgb,
}

impl Region {
    /// The average normal decoded to a unit vector.
    #[inline]
    pub fn unit_normal(&self) -> DVec3 {
        decode_normal(self.avg_normal)
    }

    /// Member pixels as `(x, y)` in an image of the given width.
    pub fn pixel_coords(&self, width: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pixel_indices.iter().map(move |&idx| {
            let idx = idx as usize;
            (idx % width, idx / width)
        })
    }
}

/// All regions of one image plus the metadata needed to persist and reuse them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSet {
    /// Runtime identity; caches key derived data on it. Not persisted.
    #[serde(skip, default = "Uuid::new_v4")]
    id: Uuid,
    source_id: String,
    width: usize,
    height: usize,
    /// Milliseconds since the Unix epoch.
    generated_at: u64,
    regions: Vec<Region>,
}

impl PartialEq for RegionSet {
    /// Content equality; the runtime identity is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.source_id == other.source_id
            && self.width == other.width
            && self.height == other.height
            && self.generated_at == other.generated_at
            && self.regions == other.regions
    }
}

impl RegionSet {
    /// Assembles a set from segmenter output. Ids are already dense.
    pub(crate) fn new_unchecked(
        source_id: String,
        width: usize,
        height: usize,
        regions: Vec<Region>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id,
            width,
            height,
            generated_at: now_millis(),
            regions,
        }
    }

    /// Builds a set from caller-provided regions, checking every invariant.
    pub fn from_regions(
        source_id: impl Into<String>,
        width: usize,
        height: usize,
        regions: Vec<Region>,
    ) -> Result<Self> {
        let set = Self::new_unchecked(source_id.into(), width, height, regions);
        set.validate()?;
        Ok(set)
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn generated_at(&self) -> u64 {
        self.generated_at
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// O(1) lookup by dense id.
    #[inline]
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id as usize)
    }

    /// Image diagonal in pixels.
    pub fn diagonal(&self) -> f64 {
        (self.width as f64).hypot(self.height as f64)
    }

    /// Checks dense ids, non-empty disjoint in-image members, consistent
    /// pixel counts and tight bounds.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }

        let pixel_total = self.width * self.height;
        let mut seen = BitBuffer2::new_default(self.width, self.height);

        for (position, region) in self.regions.iter().enumerate() {
            if region.id as usize != position {
                return Err(Error::InvalidRegionSet(format!(
                    "region at position {position} has id {}",
                    region.id
                )));
            }
            if region.pixel_indices.is_empty() {
                return Err(Error::EmptyRegion { id: region.id });
            }
            if region.pixel_count != region.pixel_indices.len() {
                return Err(Error::InvalidRegionSet(format!(
                    "region {} declares {} pixels but lists {}",
                    region.id,
                    region.pixel_count,
                    region.pixel_indices.len()
                )));
            }

            for &pixel in &region.pixel_indices {
                let pixel = pixel as usize;
                if pixel >= pixel_total {
                    return Err(Error::InvalidRegionSet(format!(
                        "region {} pixel {pixel} is outside the {}x{} image",
                        region.id, self.width, self.height
                    )));
                }
                if seen.test_and_set(pixel) {
                    return Err(Error::InvalidRegionSet(format!(
                        "pixel {pixel} belongs to more than one region (second owner {})",
                        region.id
                    )));
                }
            }

            let tight = bounding_box(&region.pixel_indices, self.width);
            if tight != region.bounds {
                return Err(Error::InvalidRegionSet(format!(
                    "region {} bounds {:?} are not tight, expected {:?}",
                    region.id, region.bounds, tight
                )));
            }
        }

        Ok(())
    }

    pub fn to_document(&self, format: SerdeFormat) -> Result<Vec<u8>> {
        Ok(common::serde::serialize(self, format)?)
    }

    /// Loads a persisted set and re-checks its invariants. The loaded set
    /// gets a fresh runtime identity.
    pub fn from_document(bytes: &[u8], format: SerdeFormat) -> Result<Self> {
        let set: Self = common::serde::deserialize(bytes, format)?;
        set.validate()?;
        tracing::debug!(
            "Loaded region set '{}': {} regions, {}x{}",
            set.source_id,
            set.regions.len(),
            set.width,
            set.height
        );
        Ok(set)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
