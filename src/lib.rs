//! Road Network Library - Typed Road-Network Geometry API
//!
//! This library models a road network as a tree of typed, read-only entities
//! with lane-frame geometry: a [`RoadGeometry`] owns [`Junction`]s, which own
//! [`Segment`]s of parallel [`Lane`]s. Lanes convert between the world frame
//! and their local `(s, r, h)` frame and answer orientation queries.
//!
//! # Architecture
//!
//! - **[`RoadGeometry`]**: network root with topology access, nearest-lane
//!   queries and invariant checks
//! - **[`Junction`] / [`Segment`] / [`Lane`]**: the ownership tree; every
//!   accessor returns a reference borrowed from the parent, so children can
//!   never outlive the network
//! - **[`GeoPosition`] / [`LanePosition`] / [`Rotation`]**: coordinate and
//!   orientation value types
//! - **[`RoadGeometryBuilder`]**: validated construction of networks from
//!   reference centerlines
//!
//! # Coordinate frames
//!
//! World positions are Cartesian `(x, y, z)` in meters. Lane positions are
//! `(s, r, h)`: arc length along the centerline, lateral offset (positive to
//! the left of travel) and height above the road surface.

mod builder;
mod id;
mod junction;
mod lane;
mod lane_data;
mod road_geometry;
mod segment;
pub mod utils;

// Public API exports
pub use builder::{Config, JunctionBuilder, RoadGeometryBuilder};
pub use id::{JunctionId, LaneId, RoadGeometryId, SegmentId};
pub use junction::Junction;
pub use lane::Lane;
pub use lane_data::{
    GeoPosition, HBounds, LanePosition, RBounds, RoadPosition, RollPitchYaw, Rotation,
};
pub use road_geometry::{RoadGeometry, RoadPositionResult};
pub use segment::Segment;

/// Error types for road-network construction
#[derive(Debug, thiserror::Error)]
pub enum RoadNetworkError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("road geometry has no junctions")]
    EmptyRoadGeometry,

    #[error("junction {0} has no segments")]
    EmptyJunction(String),

    #[error("segment {0} has no lanes")]
    EmptySegment(String),
}

pub type Result<T> = std::result::Result<T, RoadNetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that the main entry points are accessible
        let _: fn() -> Config = Config::default;
        let _: fn(&RoadGeometry) -> usize = RoadGeometry::num_junctions;
    }
}
