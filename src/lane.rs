//! Lane geometry: centerline storage and lane-frame conversions
//!
//! A [`Lane`] stores a 3-D centerline polyline with a precomputed arc-length
//! table and drivable bounds. All queries are read-only; lanes are built once
//! by the [`builder`](crate::builder) and never mutated afterwards.

use crate::lane_data::{GeoPosition, HBounds, LanePosition, RBounds, Rotation};
use crate::{LaneId, Result, RoadNetworkError, utils};
use geo::Rect;
use glam::DVec3;

/// Edges shorter than this are dropped as degenerate during construction
const MIN_EDGE_LENGTH: f64 = 1e-9;

/// A drivable path with lane-frame geometry, owned by a [`Segment`](crate::Segment)
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    /// Identifier, unique within the owning road geometry
    id: LaneId,
    /// Index of this lane within its segment
    index: usize,
    /// Centerline polyline in world coordinates (at least two points)
    centerline: Vec<DVec3>,
    /// Cumulative arc lengths, same length as `centerline`
    arc_lengths: Vec<f64>,
    /// Total centerline arc length (cached from the arc-length table)
    length: f64,
    /// Lateral bounds of the nominal lane surface
    lane_bounds: RBounds,
    /// Lateral bounds of the full drivable segment surface, relative to
    /// this lane's centerline
    segment_bounds: RBounds,
    /// Elevation bounds above the road surface
    elevation_bounds: HBounds,
    /// Bounding rectangle of the centerline in the world x-y plane
    bounding_rect: Rect<f64>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Lane {
    /// Create a lane from a centerline polyline
    ///
    /// Degenerate (near-zero-length) edges are dropped with a warning. The
    /// surviving centerline must keep at least two points.
    pub(crate) fn new(
        id: LaneId,
        index: usize,
        centerline: Vec<DVec3>,
        lane_bounds: RBounds,
        segment_bounds: RBounds,
        elevation_bounds: HBounds,
    ) -> Result<Self> {
        let mut points: Vec<DVec3> = Vec::with_capacity(centerline.len());
        for point in centerline {
            let degenerate = points
                .last()
                .is_some_and(|last| last.distance(point) < MIN_EDGE_LENGTH);
            if degenerate {
                tracing::warn!(
                    lane = %id,
                    "Dropping degenerate centerline edge at ({}, {}, {})",
                    point.x,
                    point.y,
                    point.z
                );
            } else {
                points.push(point);
            }
        }

        if points.len() < 2 {
            return Err(RoadNetworkError::InvalidGeometry(format!(
                "lane {id} needs at least two distinct centerline points"
            )));
        }

        let arc_lengths = utils::arc_lengths(&points);
        let length = *arc_lengths.last().unwrap_or(&0.0);
        // Non-empty by the check above
        let bounding_rect = utils::bounding_rect(&points).ok_or_else(|| {
            RoadNetworkError::InvalidGeometry(format!("lane {id} has an empty centerline"))
        })?;

        Ok(Self {
            id,
            index,
            centerline: points,
            arc_lengths,
            length,
            lane_bounds,
            segment_bounds,
            elevation_bounds,
            bounding_rect,
        })
    }

    /// The lane's identifier
    #[inline]
    pub fn id(&self) -> &LaneId {
        &self.id
    }

    /// Index of this lane within its owning segment
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Total arc length of the centerline, in meters
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The centerline polyline in world coordinates
    #[inline]
    pub fn centerline(&self) -> &[DVec3] {
        &self.centerline
    }

    /// Bounding rectangle of the centerline in the world x-y plane
    #[inline]
    pub fn bounding_rect(&self) -> &Rect<f64> {
        &self.bounding_rect
    }

    /// Nominal lateral bounds of the lane surface at longitudinal position `s`
    #[inline]
    pub fn lane_bounds(&self, _s: f64) -> RBounds {
        self.lane_bounds
    }

    /// Lateral bounds of the full drivable surface at longitudinal position
    /// `s`, relative to this lane's centerline
    #[inline]
    pub fn segment_bounds(&self, _s: f64) -> RBounds {
        self.segment_bounds
    }

    /// Elevation bounds at position `(s, r)`
    #[inline]
    pub fn elevation_bounds(&self, _s: f64, _r: f64) -> HBounds {
        self.elevation_bounds
    }

    /// Centerline point and travel direction at arc length `s`
    ///
    /// `s` is clamped to `[0, length]`; the direction is the unit vector of
    /// the polyline edge containing `s`.
    fn sample(&self, s: f64) -> (DVec3, DVec3) {
        let s = s.clamp(0.0, self.length);
        let edge = self
            .arc_lengths
            .partition_point(|&l| l <= s)
            .saturating_sub(1)
            .min(self.centerline.len() - 2);

        let a = self.centerline[edge];
        let b = self.centerline[edge + 1];
        let edge_length = self.arc_lengths[edge + 1] - self.arc_lengths[edge];
        // Positive after degenerate-edge filtering
        let t = (s - self.arc_lengths[edge]) / edge_length;
        (a.lerp(b, t), (b - a) / edge_length)
    }

    /// Map a lane-frame position to the world frame
    ///
    /// The centerline point at `s` (clamped to `[0, length]`) is offset by
    /// `r` along the left-pointing horizontal normal of the local travel
    /// direction and by `h` vertically.
    pub fn to_geo_position(&self, lane_pos: &LanePosition) -> GeoPosition {
        let (point, dir) = self.sample(lane_pos.s());
        let world = point + utils::left_normal(dir) * lane_pos.r() + DVec3::Z * lane_pos.h();
        GeoPosition::from_xyz(world)
    }

    /// Project a world-frame position to this lane's `(s, r, h)` frame
    ///
    /// Nearest-point projection onto the centerline polyline. The result is
    /// clamped into the drivable volume: `s` to `[0, length]`, `r` to the
    /// segment bounds, `h` to the elevation bounds.
    pub fn to_lane_position(&self, geo_pos: &GeoPosition) -> LanePosition {
        let p = geo_pos.xyz();

        let mut best_distance = f64::INFINITY;
        let mut best_edge = 0;
        let mut best_t = 0.0;
        let mut best_foot = self.centerline[0];

        for edge in 0..self.centerline.len() - 1 {
            let (t, foot) = utils::project_to_segment(p, self.centerline[edge], self.centerline[edge + 1]);
            let distance = p.distance(foot);
            if distance < best_distance {
                best_distance = distance;
                best_edge = edge;
                best_t = t;
                best_foot = foot;
            }
        }

        let edge_length = self.arc_lengths[best_edge + 1] - self.arc_lengths[best_edge];
        let s = (self.arc_lengths[best_edge] + best_t * edge_length).clamp(0.0, self.length);

        let dir = (self.centerline[best_edge + 1] - self.centerline[best_edge]) / edge_length;
        let delta = p - best_foot;
        let r = delta.dot(utils::left_normal(dir));
        let h = delta.z;

        LanePosition::new(
            s,
            self.segment_bounds.clamp(r),
            self.elevation_bounds.clamp(h),
        )
    }

    /// Orientation of the lane frame at a lane-frame position
    ///
    /// Yaw follows the local heading of the centerline, pitch its slope;
    /// roll is always zero in this implementation.
    pub fn get_orientation(&self, lane_pos: &LanePosition) -> Rotation {
        let (_, dir) = self.sample(lane_pos.s());
        Rotation::from_rpy(0.0, utils::pitch(dir), utils::heading(dir))
    }
}
