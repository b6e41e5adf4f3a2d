//! RoadGeometry: root of a road network
//!
//! Owns the junction/segment/lane tree and provides network-wide queries:
//! indexed and by-id topology access, nearest-lane projection and structural
//! invariant checks. Every reference handed out borrows from the
//! `RoadGeometry`, so no child can outlive the network that owns it.

use crate::lane_data::{GeoPosition, RoadPosition};
use crate::{Junction, JunctionId, Lane, LaneId, RoadGeometryId, Segment, SegmentId, utils};
use rayon::prelude::*;
use std::collections::HashSet;

/// Result of a network-wide nearest-lane query
#[derive(Clone, Copy, Debug)]
pub struct RoadPositionResult<'a> {
    /// The nearest lane and the projected position within it
    pub road_position: RoadPosition<'a>,
    /// The world-frame point in the drivable volume closest to the query
    pub nearest_position: GeoPosition,
    /// Distance from the query to `nearest_position`, in meters
    pub distance: f64,
}

/// The root of a road network; owns its [`Junction`]s
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadGeometry {
    id: RoadGeometryId,
    junctions: Vec<Junction>,
    /// Allowed positional error for geometric queries, in meters
    linear_tolerance: f64,
    /// Allowed angular error for geometric queries, in radians
    angular_tolerance: f64,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl RoadGeometry {
    pub(crate) fn new(
        id: RoadGeometryId,
        junctions: Vec<Junction>,
        linear_tolerance: f64,
        angular_tolerance: f64,
    ) -> Self {
        Self {
            id,
            junctions,
            linear_tolerance,
            angular_tolerance,
        }
    }

    /// The network's identifier
    #[inline]
    pub fn id(&self) -> &RoadGeometryId {
        &self.id
    }

    /// Number of junctions in the network
    #[inline]
    pub fn num_junctions(&self) -> usize {
        self.junctions.len()
    }

    /// The junction at `index`
    ///
    /// # Panics
    /// Panics unless `index` is in `[0, num_junctions)`.
    #[inline]
    pub fn junction(&self, index: usize) -> &Junction {
        &self.junctions[index]
    }

    /// All junctions, in insertion order
    #[inline]
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    /// Allowed positional error for geometric queries, in meters
    #[inline]
    pub fn linear_tolerance(&self) -> f64 {
        self.linear_tolerance
    }

    /// Allowed angular error for geometric queries, in radians
    #[inline]
    pub fn angular_tolerance(&self) -> f64 {
        self.angular_tolerance
    }

    /// Total number of lanes across all junctions and segments
    pub fn num_lanes_total(&self) -> usize {
        self.lanes().count()
    }

    /// Iterate over every lane in the network
    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.junctions
            .iter()
            .flat_map(|junction| junction.segments())
            .flat_map(|segment| segment.lanes())
    }

    /// Find a junction by id
    pub fn junction_by_id(&self, id: &JunctionId) -> Option<&Junction> {
        self.junctions.iter().find(|junction| junction.id() == id)
    }

    /// Find a segment by id
    pub fn segment_by_id(&self, id: &SegmentId) -> Option<&Segment> {
        self.junctions
            .iter()
            .flat_map(|junction| junction.segments())
            .find(|segment| segment.id() == id)
    }

    /// Find a lane by id
    pub fn lane_by_id(&self, id: &LaneId) -> Option<&Lane> {
        self.lanes().find(|lane| lane.id() == id)
    }

    /// Project a world-frame position onto the nearest lane in the network
    ///
    /// Candidate lanes are prefiltered by the distance from the query to
    /// each lane's bounding rectangle (inflated by its lateral bounds), then
    /// the surviving candidates are projected in parallel. Returns `None`
    /// only for a network with no lanes.
    pub fn to_road_position(&self, geo_pos: &GeoPosition) -> Option<RoadPositionResult<'_>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("road_geometry::to_road_position");

        let lanes: Vec<&Lane> = self.lanes().collect();
        if lanes.is_empty() {
            return None;
        }

        // Horizontal lower bound on the distance from the query to each
        // lane's drivable volume
        let lower_bounds: Vec<f64> = lanes
            .iter()
            .map(|lane| {
                let rect_distance =
                    utils::rect_distance(geo_pos.x(), geo_pos.y(), lane.bounding_rect());
                (rect_distance - lane.segment_bounds(0.0).max_extent()).max(0.0)
            })
            .collect();

        // Seed the search with the most promising lane, then drop every
        // lane whose lower bound already exceeds the seed distance
        let seed_index = lower_bounds
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(index, _)| index)?;
        let seed = Self::project_to_lane(lanes[seed_index], geo_pos);
        let cutoff = seed.distance + self.linear_tolerance;

        lanes
            .into_par_iter()
            .zip(lower_bounds)
            .filter(|(_, lower_bound)| *lower_bound <= cutoff)
            .map(|(lane, _)| Self::project_to_lane(lane, geo_pos))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn project_to_lane<'a>(lane: &'a Lane, geo_pos: &GeoPosition) -> RoadPositionResult<'a> {
        let pos = lane.to_lane_position(geo_pos);
        let nearest_position = lane.to_geo_position(&pos);
        RoadPositionResult {
            road_position: RoadPosition::new(lane, pos),
            nearest_position,
            distance: geo_pos.distance(&nearest_position),
        }
    }

    /// Check structural invariants of the network
    ///
    /// Returns a human-readable description of every violation found and
    /// logs each one at `warn` level. An empty result means the network is
    /// structurally sound.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.id.string().is_empty() {
            violations.push("road geometry has an empty id".to_string());
        }
        if self.junctions.is_empty() {
            violations.push(format!("road geometry {} has no junctions", self.id));
        }

        let mut junction_ids = HashSet::new();
        let mut segment_ids = HashSet::new();
        let mut lane_ids = HashSet::new();

        for junction in &self.junctions {
            if junction.id().string().is_empty() {
                violations.push("junction has an empty id".to_string());
            }
            if !junction_ids.insert(junction.id()) {
                violations.push(format!("duplicate junction id {}", junction.id()));
            }
            if junction.num_segments() == 0 {
                violations.push(format!("junction {} has no segments", junction.id()));
            }

            for segment in junction.segments() {
                if segment.id().string().is_empty() {
                    violations.push("segment has an empty id".to_string());
                }
                if !segment_ids.insert(segment.id()) {
                    violations.push(format!("duplicate segment id {}", segment.id()));
                }
                if segment.num_lanes() == 0 {
                    violations.push(format!("segment {} has no lanes", segment.id()));
                }

                for (index, lane) in segment.lanes().iter().enumerate() {
                    if lane.id().string().is_empty() {
                        violations.push("lane has an empty id".to_string());
                    }
                    if !lane_ids.insert(lane.id()) {
                        violations.push(format!("duplicate lane id {}", lane.id()));
                    }
                    if lane.index() != index {
                        violations.push(format!(
                            "lane {} has index {} but sits at position {} in segment {}",
                            lane.id(),
                            lane.index(),
                            index,
                            segment.id()
                        ));
                    }
                    if lane.length() < self.linear_tolerance {
                        violations.push(format!(
                            "lane {} is shorter than the linear tolerance",
                            lane.id()
                        ));
                    }
                }
            }
        }

        for violation in &violations {
            tracing::warn!(road_geometry = %self.id, "invariant violation: {violation}");
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Config, RoadGeometryBuilder};
    use crate::lane_data::{HBounds, LanePosition, RBounds};
    use glam::DVec3;
    use smallvec::smallvec;

    fn two_road_network() -> RoadGeometry {
        // Two straight two-lane roads 100 m apart
        let mut builder = RoadGeometryBuilder::new("rg", Config::default());
        builder.add_junction("j0").add_segment(
            "south",
            vec![DVec3::ZERO, DVec3::new(200.0, 0.0, 0.0)],
            2,
            None,
        );
        builder.add_junction("j1").add_segment(
            "north",
            vec![DVec3::new(0.0, 100.0, 0.0), DVec3::new(200.0, 100.0, 0.0)],
            2,
            None,
        );
        builder.build().unwrap()
    }

    #[test]
    fn test_topology_counts() {
        let rg = two_road_network();
        assert_eq!(rg.num_junctions(), 2);
        assert_eq!(rg.junction(0).num_segments(), 1);
        assert_eq!(rg.junction(0).segment(0).num_lanes(), 2);
        assert_eq!(rg.num_lanes_total(), 4);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_junction_panics() {
        let rg = two_road_network();
        let _ = rg.junction(2);
    }

    #[test]
    fn test_by_id_lookups() {
        let rg = two_road_network();
        assert!(rg.junction_by_id(&JunctionId::new("j1")).is_some());
        assert!(rg.segment_by_id(&SegmentId::new("north")).is_some());
        assert!(rg.lane_by_id(&LaneId::new("south_lane_0")).is_some());
        assert!(rg.lane_by_id(&LaneId::new("missing")).is_none());
    }

    #[test]
    fn test_to_road_position_picks_nearest_road() {
        let rg = two_road_network();

        // Close to the south road
        let result = rg.to_road_position(&GeoPosition::new(50.0, 3.0, 0.0)).unwrap();
        assert!(result.road_position.lane.id().string().starts_with("south"));

        // Close to the north road
        let result = rg.to_road_position(&GeoPosition::new(50.0, 97.0, 0.0)).unwrap();
        assert!(result.road_position.lane.id().string().starts_with("north"));
    }

    #[test]
    fn test_to_road_position_on_lane_centerline() {
        let rg = two_road_network();
        let lane = rg.lane_by_id(&LaneId::new("south_lane_1")).unwrap();
        let on_lane = lane.to_geo_position(&LanePosition::new(42.0, 0.0, 0.0));

        let result = rg.to_road_position(&on_lane).unwrap();
        assert_eq!(result.road_position.lane.id(), lane.id());
        assert!((result.road_position.pos.s() - 42.0).abs() < 1e-9);
        assert!(result.distance < 1e-9);
        assert!(on_lane.distance(&result.nearest_position) < 1e-9);
    }

    #[test]
    fn test_road_position_keeps_lane_reference() {
        let rg = two_road_network();
        let lane = rg.junction(0).segment(0).lane(0);
        let road_position = RoadPosition::new(lane, LanePosition::new(1.0, 0.0, 0.0));
        assert_eq!(road_position.lane.id(), lane.id());
        assert_eq!(road_position.pos, LanePosition::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_check_invariants_valid_network() {
        let rg = two_road_network();
        assert!(rg.check_invariants().is_empty());
    }

    #[test]
    fn test_check_invariants_detects_duplicates() {
        let make_lane = |id: &str, index: usize| {
            Lane::new(
                LaneId::new(id),
                index,
                vec![DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)],
                RBounds::new(-1.85, 1.85),
                RBounds::new(-4.0, 4.0),
                HBounds::new(0.0, 5.0),
            )
            .unwrap()
        };

        let segment_a = Segment::new(
            SegmentId::new("s"),
            smallvec![make_lane("dup", 0), make_lane("dup", 0)],
        );
        let junction = Junction::new(JunctionId::new("j"), smallvec![segment_a]);
        let rg = RoadGeometry::new(RoadGeometryId::new("rg"), vec![junction], 1e-3, 1e-3);

        let violations = rg.check_invariants();
        assert!(violations.iter().any(|v| v.contains("duplicate lane id")));
        // The second "dup" lane sits at position 1 but claims index 0
        assert!(violations.iter().any(|v| v.contains("position 1")));
    }

    #[test]
    fn test_check_invariants_detects_empty_junction() {
        let junction = Junction::new(JunctionId::new("j"), smallvec![]);
        let rg = RoadGeometry::new(RoadGeometryId::new("rg"), vec![junction], 1e-3, 1e-3);
        let violations = rg.check_invariants();
        assert!(violations.iter().any(|v| v.contains("has no segments")));
    }
}
