//! Value types for world-frame and lane-frame positions and orientations
//!
//! These types are plain data: construction and accessors only. All geometric
//! interpretation (projections, orientation queries) lives on [`Lane`].

use crate::Lane;
use glam::{DQuat, DVec3, EulerRot};

/// An absolute position in the 3-D world frame, in meters
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPosition {
    xyz: DVec3,
}

impl GeoPosition {
    /// Create a position from world-frame coordinates
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            xyz: DVec3::new(x, y, z),
        }
    }

    /// Create a position from a packed vector
    #[inline]
    pub fn from_xyz(xyz: DVec3) -> Self {
        Self { xyz }
    }

    /// The packed `(x, y, z)` vector
    #[inline]
    pub fn xyz(&self) -> DVec3 {
        self.xyz
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.xyz.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.xyz.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.xyz.z
    }

    #[inline]
    pub fn set_x(&mut self, x: f64) {
        self.xyz.x = x;
    }

    #[inline]
    pub fn set_y(&mut self, y: f64) {
        self.xyz.y = y;
    }

    #[inline]
    pub fn set_z(&mut self, z: f64) {
        self.xyz.z = z;
    }

    /// Euclidean distance to another position, in meters
    #[inline]
    pub fn distance(&self, other: &GeoPosition) -> f64 {
        self.xyz.distance(other.xyz)
    }
}

impl std::fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(x = {}, y = {}, z = {})", self.x(), self.y(), self.z())
    }
}

/// A position in a lane's `(s, r, h)` frame, in meters
///
/// `s` is longitudinal distance along the lane centerline, `r` is lateral
/// offset (positive to the left of the direction of travel), `h` is offset
/// above the road surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanePosition {
    srh: DVec3,
}

impl LanePosition {
    /// Create a lane-frame position from `(s, r, h)` coordinates
    #[inline]
    pub fn new(s: f64, r: f64, h: f64) -> Self {
        Self {
            srh: DVec3::new(s, r, h),
        }
    }

    /// Create a lane-frame position from a packed vector
    #[inline]
    pub fn from_srh(srh: DVec3) -> Self {
        Self { srh }
    }

    /// The packed `(s, r, h)` vector
    #[inline]
    pub fn srh(&self) -> DVec3 {
        self.srh
    }

    #[inline]
    pub fn s(&self) -> f64 {
        self.srh.x
    }

    #[inline]
    pub fn r(&self) -> f64 {
        self.srh.y
    }

    #[inline]
    pub fn h(&self) -> f64 {
        self.srh.z
    }

    #[inline]
    pub fn set_s(&mut self, s: f64) {
        self.srh.x = s;
    }

    #[inline]
    pub fn set_r(&mut self, r: f64) {
        self.srh.y = r;
    }

    #[inline]
    pub fn set_h(&mut self, h: f64) {
        self.srh.z = h;
    }
}

impl std::fmt::Display for LanePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(s = {}, r = {}, h = {})", self.s(), self.r(), self.h())
    }
}

/// Roll, pitch and yaw angles in radians
///
/// Follows the intrinsic z-y'-x'' convention: the equivalent rotation is
/// `Rz(yaw) * Ry(pitch) * Rx(roll)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollPitchYaw {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// An orientation in the world frame
///
/// Stored as a unit quaternion; roll-pitch-yaw is a derived view.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotation {
    quat: DQuat,
}

impl Rotation {
    /// The identity orientation
    #[inline]
    pub fn identity() -> Self {
        Self {
            quat: DQuat::IDENTITY,
        }
    }

    /// Create an orientation from a quaternion (normalized on entry)
    #[inline]
    pub fn from_quat(quat: DQuat) -> Self {
        Self {
            quat: quat.normalize(),
        }
    }

    /// Create an orientation from roll-pitch-yaw angles in radians
    #[inline]
    pub fn from_rpy(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            quat: DQuat::from_euler(EulerRot::ZYX, yaw, pitch, roll),
        }
    }

    /// The orientation as a unit quaternion
    #[inline]
    pub fn quat(&self) -> DQuat {
        self.quat
    }

    /// The orientation as roll-pitch-yaw angles
    #[inline]
    pub fn rpy(&self) -> RollPitchYaw {
        let (yaw, pitch, roll) = self.quat.to_euler(EulerRot::ZYX);
        RollPitchYaw { roll, pitch, yaw }
    }

    /// Angular separation from another orientation, in radians
    #[inline]
    pub fn distance(&self, other: &Rotation) -> f64 {
        self.quat.angle_between(other.quat)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

/// Lateral drivable bounds in a lane's `r` direction, in meters
///
/// The bounds always straddle the centerline: `min <= 0 <= max`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RBounds {
    min: f64,
    max: f64,
}

impl RBounds {
    /// Create lateral bounds
    ///
    /// # Panics
    /// Panics unless `min <= 0 <= max`.
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min <= 0.0 && max >= 0.0,
            "RBounds must straddle the centerline: got [{min}, {max}]"
        );
        Self { min, max }
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Largest absolute lateral extent
    #[inline]
    pub fn max_extent(&self) -> f64 {
        self.min.abs().max(self.max)
    }

    /// Clamp a lateral offset into these bounds
    #[inline]
    pub fn clamp(&self, r: f64) -> f64 {
        r.clamp(self.min, self.max)
    }
}

/// Elevation bounds in a lane's `h` direction, in meters
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HBounds {
    min: f64,
    max: f64,
}

impl HBounds {
    /// Create elevation bounds
    ///
    /// # Panics
    /// Panics unless `min <= max`.
    pub fn new(min: f64, max: f64) -> Self {
        assert!(min <= max, "HBounds must be ordered: got [{min}, {max}]");
        Self { min, max }
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp an elevation offset into these bounds
    #[inline]
    pub fn clamp(&self, h: f64) -> f64 {
        h.clamp(self.min, self.max)
    }
}

/// A position on the road network: a lane plus a position within it
///
/// The lane is borrowed from its owning [`RoadGeometry`](crate::RoadGeometry),
/// so a `RoadPosition` can never outlive the network that defines it.
#[derive(Clone, Copy, Debug)]
pub struct RoadPosition<'a> {
    /// The lane this position refers to
    pub lane: &'a Lane,
    /// The position within the lane's `(s, r, h)` frame
    pub pos: LanePosition,
}

impl<'a> RoadPosition<'a> {
    /// Create a road position from a lane and a lane-frame position
    pub fn new(lane: &'a Lane, pos: LanePosition) -> Self {
        Self { lane, pos }
    }

    /// Resolve this position into the world frame
    pub fn to_geo_position(&self) -> GeoPosition {
        self.lane.to_geo_position(&self.pos)
    }
}
