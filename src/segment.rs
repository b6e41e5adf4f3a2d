//! Segment: a group of parallel lanes

use crate::{Lane, SegmentId};
use smallvec::SmallVec;

/// A group of parallel [`Lane`]s, owned by a [`Junction`](crate::Junction)
///
/// Lanes are ordered by index, increasing to the left of the direction of
/// travel. Adjacency between parallel lanes is navigated through the owning
/// segment: the neighbors of `lane(i)` are `lane(i - 1)` and `lane(i + 1)`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    id: SegmentId,
    lanes: SmallVec<[Lane; 4]>,
}

impl Segment {
    pub(crate) fn new(id: SegmentId, lanes: SmallVec<[Lane; 4]>) -> Self {
        Self { id, lanes }
    }

    /// The segment's identifier
    #[inline]
    pub fn id(&self) -> &SegmentId {
        &self.id
    }

    /// Number of lanes in this segment
    #[inline]
    pub fn num_lanes(&self) -> usize {
        self.lanes.len()
    }

    /// The lane at `index`
    ///
    /// # Panics
    /// Panics unless `index` is in `[0, num_lanes)`.
    #[inline]
    pub fn lane(&self, index: usize) -> &Lane {
        &self.lanes[index]
    }

    /// All lanes, ordered by index
    #[inline]
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }
}
