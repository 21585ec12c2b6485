//! Pixel → region lookup derived from a [`RegionSet`].

mod cache;


use common::Buffer2;
use uuid::Uuid;

use crate::region::{Region, RegionId, RegionSet};

pub use cache::RegionCache;

/// Dense owner table, one entry per pixel.
///
/// Tied to the identity of the set it was built from; lookups into a
/// different set return nothing.
#[derive(Debug, Clone)]
pub struct OwnershipIndex {
    owners: Buffer2<u32>,
    set_id: Uuid,
}

impl OwnershipIndex {
    /// Sentinel for pixels owned by no region (edges and noise).
    pub const NONE: u32 = u32::MAX;

    /// O(total member pixels) after the table allocation.
    pub fn build(set: &RegionSet) -> Self {
        let mut owners = Buffer2::new_filled(set.width(), set.height(), Self::NONE);
        for region in set.regions() {
            for &pixel in &region.pixel_indices {
                owners[pixel as usize] = region.id;
            }
        }

        tracing::debug!(
            "Built ownership index for '{}': {}x{}, {} regions",
            set.source_id(),
            set.width(),
            set.height(),
            set.len()
        );

        Self {
            owners,
            set_id: set.id(),
        }
    }

    /// Identity of the region set this index was built from.
    #[inline]
    pub fn set_id(&self) -> Uuid {
        self.set_id
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.owners.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.owners.height()
    }

    /// Owner of the pixel at linear address `pixel`.
    #[inline]
    pub fn owner_at(&self, pixel: usize) -> Option<RegionId> {
        self.owners
            .pixels()
            .get(pixel)
            .copied()
            .filter(|&id| id != Self::NONE)
    }

    /// Owner of `(x, y)`; coordinates outside the image have no owner.
    #[inline]
    pub fn owner(&self, x: i64, y: i64) -> Option<RegionId> {
        self.owners
            .get_checked(x, y)
            .copied()
            .filter(|&id| id != Self::NONE)
    }

    /// Region under `(x, y)`, resolved through the dense id table.
    ///
    /// Returns `None` outside the image, on unowned pixels, or when `set` is
    /// not the set this index was built from.
    pub fn hit_test<'a>(&self, set: &'a RegionSet, x: i64, y: i64) -> Option<&'a Region> {
        if set.id() != self.set_id {
            return None;
        }
        self.owner(x, y).and_then(|id| set.region(id))
    }

    /// Raw owner table, [`Self::NONE`] for unowned pixels.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        self.owners.pixels()
    }
}
