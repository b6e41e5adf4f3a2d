//! Junction: a group of segments

use crate::{JunctionId, Segment};
use smallvec::SmallVec;

/// A group of [`Segment`]s, owned by a [`RoadGeometry`](crate::RoadGeometry)
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Junction {
    id: JunctionId,
    segments: SmallVec<[Segment; 2]>,
}

impl Junction {
    pub(crate) fn new(id: JunctionId, segments: SmallVec<[Segment; 2]>) -> Self {
        Self { id, segments }
    }

    /// The junction's identifier
    #[inline]
    pub fn id(&self) -> &JunctionId {
        &self.id
    }

    /// Number of segments in this junction
    #[inline]
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// The segment at `index`
    ///
    /// # Panics
    /// Panics unless `index` is in `[0, num_segments)`.
    #[inline]
    pub fn segment(&self, index: usize) -> &Segment {
        &self.segments[index]
    }

    /// All segments, in insertion order
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
