//! Construction of road networks
//!
//! [`RoadGeometryBuilder`] collects junction and segment descriptions, then
//! validates them and lays out the parallel lanes of each segment in a
//! single [`build`](RoadGeometryBuilder::build) pass. Lane centerlines are
//! derived from each segment's reference centerline by lateral offsetting;
//! lane index increases to the left of the direction of travel.

use crate::lane_data::{HBounds, RBounds};
use crate::{
    Junction, JunctionId, Lane, LaneId, Result, RoadGeometry, RoadGeometryId, RoadNetworkError,
    Segment, SegmentId, utils,
};
use glam::DVec3;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Configuration for road-network construction
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Allowed positional error for geometric queries, in meters
    pub linear_tolerance: f64,
    /// Allowed angular error for geometric queries, in radians
    pub angular_tolerance: f64,
    /// Lane width used when a segment does not specify one, in meters
    pub default_lane_width: f64,
    /// Drivable shoulder beyond the outermost lanes, in meters
    pub shoulder_width: f64,
    /// Elevation bounds above the road surface, in meters
    pub elevation_bounds: HBounds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            linear_tolerance: 1e-3,
            angular_tolerance: 1e-3,
            default_lane_width: 3.7,
            shoulder_width: 0.5,
            elevation_bounds: HBounds::new(0.0, 5.0),
        }
    }
}

/// Description of a segment to be built
#[derive(Debug, Clone)]
struct SegmentSpec {
    id: SegmentId,
    centerline: Vec<DVec3>,
    num_lanes: usize,
    lane_width: f64,
}

/// Collects the segments of one junction
#[derive(Debug, Clone)]
pub struct JunctionBuilder {
    id: JunctionId,
    default_lane_width: f64,
    segments: Vec<SegmentSpec>,
}

impl JunctionBuilder {
    /// Add a segment of `num_lanes` parallel lanes laid out around the
    /// given reference centerline
    ///
    /// `lane_width` falls back to the configured default when `None`.
    pub fn add_segment(
        &mut self,
        id: impl Into<SegmentId>,
        centerline: Vec<DVec3>,
        num_lanes: usize,
        lane_width: Option<f64>,
    ) -> &mut Self {
        self.segments.push(SegmentSpec {
            id: id.into(),
            centerline,
            num_lanes,
            lane_width: lane_width.unwrap_or(self.default_lane_width),
        });
        self
    }
}

/// Builder for [`RoadGeometry`] networks
#[derive(Debug, Clone)]
pub struct RoadGeometryBuilder {
    id: RoadGeometryId,
    config: Config,
    junctions: Vec<JunctionBuilder>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl RoadGeometryBuilder {
    /// Create a builder for a network with the given id and configuration
    pub fn new(id: impl Into<RoadGeometryId>, config: Config) -> Self {
        Self {
            id: id.into(),
            config,
            junctions: Vec::new(),
        }
    }

    /// Add a junction and return its builder
    pub fn add_junction(&mut self, id: impl Into<JunctionId>) -> &mut JunctionBuilder {
        let index = self.junctions.len();
        self.junctions.push(JunctionBuilder {
            id: id.into(),
            default_lane_width: self.config.default_lane_width,
            segments: Vec::new(),
        });
        &mut self.junctions[index]
    }

    /// Validate the collected descriptions and build the network
    pub fn build(self) -> Result<RoadGeometry> {
        #[cfg(feature = "profiling")]
        profiling::scope!("builder::build");

        if self.junctions.is_empty() {
            return Err(RoadNetworkError::EmptyRoadGeometry);
        }

        let mut junction_ids = HashSet::new();
        let mut segment_ids = HashSet::new();
        let mut junctions = Vec::with_capacity(self.junctions.len());

        for junction_spec in self.junctions {
            if !junction_ids.insert(junction_spec.id.clone()) {
                return Err(RoadNetworkError::DuplicateId(
                    junction_spec.id.string().to_string(),
                ));
            }
            if junction_spec.segments.is_empty() {
                return Err(RoadNetworkError::EmptyJunction(
                    junction_spec.id.string().to_string(),
                ));
            }

            let mut segments: SmallVec<[Segment; 2]> =
                SmallVec::with_capacity(junction_spec.segments.len());
            for segment_spec in junction_spec.segments {
                if !segment_ids.insert(segment_spec.id.clone()) {
                    return Err(RoadNetworkError::DuplicateId(
                        segment_spec.id.string().to_string(),
                    ));
                }
                segments.push(Self::build_segment(segment_spec, &self.config)?);
            }
            junctions.push(Junction::new(junction_spec.id, segments));
        }

        let road_geometry = RoadGeometry::new(
            self.id,
            junctions,
            self.config.linear_tolerance,
            self.config.angular_tolerance,
        );
        tracing::debug!(
            road_geometry = %road_geometry.id(),
            junctions = road_geometry.num_junctions(),
            lanes = road_geometry.num_lanes_total(),
            "built road geometry"
        );
        Ok(road_geometry)
    }

    /// Build one segment: validate its description and lay out its lanes
    fn build_segment(spec: SegmentSpec, config: &Config) -> Result<Segment> {
        if spec.num_lanes == 0 {
            return Err(RoadNetworkError::EmptySegment(
                spec.id.string().to_string(),
            ));
        }
        if spec.lane_width <= 0.0 {
            return Err(RoadNetworkError::InvalidGeometry(format!(
                "segment {} has non-positive lane width {}",
                spec.id, spec.lane_width
            )));
        }

        let num_lanes = spec.num_lanes as f64;
        let half_width = spec.lane_width / 2.0;
        // Full drivable half-extent of the segment around its reference line
        let half_surface = num_lanes * half_width + config.shoulder_width;

        let mut lanes: SmallVec<[Lane; 4]> = SmallVec::with_capacity(spec.num_lanes);
        for index in 0..spec.num_lanes {
            // Lateral offset of this lane's centerline from the reference line
            let offset = (index as f64 - (num_lanes - 1.0) / 2.0) * spec.lane_width;
            let centerline = utils::offset_polyline(&spec.centerline, offset);

            lanes.push(Lane::new(
                LaneId::new(format!("{}_lane_{index}", spec.id)),
                index,
                centerline,
                RBounds::new(-half_width, half_width),
                RBounds::new(-half_surface - offset, half_surface - offset),
                config.elevation_bounds,
            )?);
        }

        tracing::debug!(
            segment = %spec.id,
            lanes = spec.num_lanes,
            length = lanes[0].length(),
            "built segment"
        );
        Ok(Segment::new(spec.id, lanes))
    }

    /// Build the simplest useful network: one junction, one straight
    /// segment of `num_lanes` parallel lanes between `start` and `end`
    pub fn linear_road(
        id: impl Into<RoadGeometryId>,
        config: Config,
        start: DVec3,
        end: DVec3,
        num_lanes: usize,
    ) -> Result<RoadGeometry> {
        let id = id.into();
        let junction_id = format!("{id}_j0");
        let segment_id = format!("{id}_s0");

        let mut builder = Self::new(id, config);
        builder
            .add_junction(junction_id)
            .add_segment(segment_id, vec![start, end], num_lanes, None);
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane_data::{GeoPosition, LanePosition};

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!((config.default_lane_width - 3.7).abs() < 1e-12);
        assert!((config.shoulder_width - 0.5).abs() < 1e-12);
        assert!(config.linear_tolerance > 0.0);
    }

    #[test]
    fn test_linear_road_layout() {
        let rg = RoadGeometryBuilder::linear_road(
            "dragway",
            Config {
                default_lane_width: 4.0,
                shoulder_width: 0.5,
                ..Config::default()
            },
            DVec3::ZERO,
            DVec3::new(100.0, 0.0, 0.0),
            2,
        )
        .unwrap();

        assert_eq!(rg.num_junctions(), 1);
        let segment = rg.junction(0).segment(0);
        assert_eq!(segment.num_lanes(), 2);

        // Lane centerlines sit at r = -2 and r = +2 of the reference line
        let right = segment.lane(0).to_geo_position(&LanePosition::new(0.0, 0.0, 0.0));
        assert!((right.y() - -2.0).abs() < 1e-12);
        let left = segment.lane(1).to_geo_position(&LanePosition::new(0.0, 0.0, 0.0));
        assert!((left.y() - 2.0).abs() < 1e-12);

        assert_eq!(segment.lane(0).id().string(), "dragway_s0_lane_0");
    }

    #[test]
    fn test_segment_bounds_cover_shared_surface() {
        let rg = RoadGeometryBuilder::linear_road(
            "rg",
            Config {
                default_lane_width: 4.0,
                shoulder_width: 0.5,
                ..Config::default()
            },
            DVec3::ZERO,
            DVec3::new(100.0, 0.0, 0.0),
            2,
        )
        .unwrap();

        let lane0 = rg.junction(0).segment(0).lane(0);
        // Lane 0 centerline is at y = -2; the drivable surface spans
        // y in [-4.5, 4.5], so r in [-2.5, 6.5] relative to lane 0
        let bounds = lane0.segment_bounds(0.0);
        assert!((bounds.min() - -2.5).abs() < 1e-12);
        assert!((bounds.max() - 6.5).abs() < 1e-12);

        // A point over the neighboring lane projects without clamping
        let p = lane0.to_lane_position(&GeoPosition::new(50.0, 2.0, 0.0));
        assert!((p.r() - 4.0).abs() < 1e-12);

        // Nominal lane bounds stay a single lane wide
        let lane_bounds = lane0.lane_bounds(0.0);
        assert!((lane_bounds.min() - -2.0).abs() < 1e-12);
        assert!((lane_bounds.max() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_segment_id_rejected() {
        let mut builder = RoadGeometryBuilder::new("rg", Config::default());
        builder
            .add_junction("j0")
            .add_segment("s", vec![DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)], 1, None)
            .add_segment(
                "s",
                vec![DVec3::new(0.0, 10.0, 0.0), DVec3::new(10.0, 10.0, 0.0)],
                1,
                None,
            );
        assert!(matches!(
            builder.build(),
            Err(RoadNetworkError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_duplicate_junction_id_rejected() {
        let mut builder = RoadGeometryBuilder::new("rg", Config::default());
        builder.add_junction("j").add_segment(
            "s0",
            vec![DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)],
            1,
            None,
        );
        builder.add_junction("j").add_segment(
            "s1",
            vec![DVec3::new(0.0, 10.0, 0.0), DVec3::new(10.0, 10.0, 0.0)],
            1,
            None,
        );
        assert!(matches!(
            builder.build(),
            Err(RoadNetworkError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_empty_network_rejected() {
        let builder = RoadGeometryBuilder::new("rg", Config::default());
        assert!(matches!(
            builder.build(),
            Err(RoadNetworkError::EmptyRoadGeometry)
        ));
    }

    #[test]
    fn test_empty_junction_rejected() {
        let mut builder = RoadGeometryBuilder::new("rg", Config::default());
        builder.add_junction("j0");
        assert!(matches!(
            builder.build(),
            Err(RoadNetworkError::EmptyJunction(_))
        ));
    }

    #[test]
    fn test_zero_lanes_rejected() {
        let mut builder = RoadGeometryBuilder::new("rg", Config::default());
        builder.add_junction("j0").add_segment(
            "s0",
            vec![DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)],
            0,
            None,
        );
        assert!(matches!(
            builder.build(),
            Err(RoadNetworkError::EmptySegment(_))
        ));
    }

    #[test]
    fn test_negative_lane_width_rejected() {
        let mut builder = RoadGeometryBuilder::new("rg", Config::default());
        builder.add_junction("j0").add_segment(
            "s0",
            vec![DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)],
            1,
            Some(-1.0),
        );
        assert!(matches!(
            builder.build(),
            Err(RoadNetworkError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_degenerate_centerline_rejected() {
        let mut builder = RoadGeometryBuilder::new("rg", Config::default());
        builder
            .add_junction("j0")
            .add_segment("s0", vec![DVec3::ZERO, DVec3::ZERO], 1, None);
        assert!(matches!(
            builder.build(),
            Err(RoadNetworkError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_curved_segment_lane_lengths_differ() {
        // On a left turn the inner (left) lane is shorter than the outer one
        let mut builder = RoadGeometryBuilder::new("rg", Config::default());
        builder.add_junction("j0").add_segment(
            "curve",
            vec![
                DVec3::ZERO,
                DVec3::new(50.0, 0.0, 0.0),
                DVec3::new(50.0, 50.0, 0.0),
            ],
            2,
            None,
        );
        let rg = builder.build().unwrap();

        let segment = rg.junction(0).segment(0);
        let outer = segment.lane(0).length();
        let inner = segment.lane(1).length();
        assert!(inner < outer);
    }
}
