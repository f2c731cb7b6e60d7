//! Bounding-box index over point features.
//!
//! The index is bulk-constructed once per dataset load and read-only between
//! rebuilds. Box queries return a superset of any exact-radius query over
//! the same region; callers apply an exact distance filter afterward.

use crate::feature::Feature;
use geo::Rect;
use parking_lot::RwLock;
use rstar::{AABB, Point as RstarPoint, RTree};
use std::sync::Arc;

/// A point feature entry in the R-tree.
///
/// The feature itself is shared, never copied; the entry only materializes
/// the coordinates the tree organizes on.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedFeature {
    pub x: f64,
    pub y: f64,
    pub feature: Arc<Feature>,
}

impl RstarPoint for IndexedFeature {
    type Scalar = f64;
    const DIMENSIONS: usize = 2;

    fn generate(mut generator: impl FnMut(usize) -> Self::Scalar) -> Self {
        Self {
            x: generator(0),
            y: generator(1),
            feature: Arc::new(Feature::placeholder()),
        }
    }

    fn nth(&self, index: usize) -> Self::Scalar {
        match index {
            0 => self.x,
            1 => self.y,
            _ => unreachable!(),
        }
    }

    fn nth_mut(&mut self, index: usize) -> &mut Self::Scalar {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => unreachable!(),
        }
    }
}

/// Read-only bounding-box tree over point features.
///
/// Built in one `O(n log n)` bulk pass; `query_box` answers in
/// `O(log n + k)` where `k` is the result size. Building with zero features
/// yields a valid empty index.
pub struct PointIndex {
    tree: RTree<IndexedFeature>,
}

impl PointIndex {
    /// Bulk-construct the tree from a point-feature collection.
    ///
    /// Features without point geometry cannot be indexed and are skipped.
    pub fn bulk_load(features: impl IntoIterator<Item = Arc<Feature>>) -> Self {
        let mut skipped = 0usize;
        let entries: Vec<IndexedFeature> = features
            .into_iter()
            .filter_map(|feature| match feature.point() {
                Some(point) => Some(IndexedFeature {
                    x: point.x(),
                    y: point.y(),
                    feature,
                }),
                None => {
                    skipped += 1;
                    None
                }
            })
            .collect();

        if skipped > 0 {
            log::debug!("skipped {} non-point features during index build", skipped);
        }

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Every indexed feature whose position intersects `rect`, in
    /// unspecified order.
    ///
    /// Relative to an exact-radius query this is a superset: no false
    /// negatives, but box-shaped false positives the caller must filter
    /// with an exact distance test. Non-finite boxes yield no results.
    pub fn query_box(&self, rect: &Rect) -> Vec<Arc<Feature>> {
        let (min, max) = (rect.min(), rect.max());
        if ![min.x, min.y, max.x, max.y].iter().all(|v| v.is_finite()) {
            log::warn!("Rejecting bounding box query with non-finite coordinates");
            return Vec::new();
        }

        let min_corner = IndexedFeature::generate(|i| if i == 0 { min.x } else { min.y });
        let max_corner = IndexedFeature::generate(|i| if i == 0 { max.x } else { max.y });
        let envelope = AABB::from_corners(min_corner, max_corner);

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| Arc::clone(&entry.feature))
            .collect()
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Atomically replaceable handle to a [`PointIndex`].
///
/// `rebuild` constructs the new tree outside the lock and swaps the `Arc`
/// under a brief write lock, so concurrent readers observe either the old
/// complete index or the new complete index, never a partially loaded one.
/// A reader that took a snapshot keeps a complete tree for as long as it
/// holds the `Arc`. "No index" is an explicit `None`.
#[derive(Clone, Default)]
pub struct SharedPointIndex {
    inner: Arc<RwLock<Option<Arc<PointIndex>>>>,
}

impl SharedPointIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current index with one bulk-built from `features`.
    ///
    /// Returns the number of indexed points.
    pub fn rebuild(&self, features: impl IntoIterator<Item = Arc<Feature>>) -> usize {
        let index = Arc::new(PointIndex::bulk_load(features));
        let len = index.len();
        *self.inner.write() = Some(index);
        log::debug!("rebuilt point index with {} entries", len);
        len
    }

    /// The current index, if one has been built.
    pub fn snapshot(&self) -> Option<Arc<PointIndex>> {
        self.inner.read().clone()
    }

    /// Drop the current index.
    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    pub fn is_built(&self) -> bool {
        self.inner.read().is_some()
    }
}
