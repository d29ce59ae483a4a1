//! R-tree point index used as the coarse prefilter for nearby queries.
//!
//! The index only answers "which report ids fall inside this bounding
//! box"; callers apply the precise haversine filter to the candidates it
//! returns.

use rstar::{AABB, RTree, RTreeObject};

use crate::{Position, radius_padding};

/// A report position stored in the R-tree with its store id.
struct PositionEntry {
    id: i64,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for PositionEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// An R-tree over report positions, keyed by store id.
#[derive(Default)]
pub struct PositionIndex {
    tree: RTree<PositionEntry>,
}

impl PositionIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
        }
    }

    /// Inserts a report position. Ids are expected to be unique; the
    /// index never removes entries because the store is append-only.
    pub fn insert(&mut self, id: i64, position: Position) {
        self.tree.insert(PositionEntry {
            id,
            envelope: AABB::from_point([position.longitude, position.latitude]),
        });
    }

    /// Number of indexed positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Ids of reports whose position falls inside the bounding box that
    /// circumscribes a `radius_m` search around `center`.
    ///
    /// This overshoots the circle at the box corners; callers filter the
    /// candidates with [`crate::distance_m`].
    #[must_use]
    pub fn candidates_within(&self, center: Position, radius_m: f64) -> Vec<i64> {
        let (lat_pad, lng_pad) = radius_padding(center.latitude, radius_m);
        let envelope = AABB::from_corners(
            [center.longitude - lng_pad, center.latitude - lat_pad],
            [center.longitude + lng_pad, center.latitude + lat_pad],
        );

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.id)
            .collect()
    }
}
