//! Typed string identifiers for road-network entities
//!
//! Each entity kind gets its own newtype so a `LaneId` can never be passed
//! where a `JunctionId` is expected. Identifiers carry no validation of
//! their own; uniqueness across a network is checked by
//! [`RoadGeometry::check_invariants`](crate::RoadGeometry::check_invariants).

macro_rules! declare_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier's string form
            #[inline]
            pub fn string(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

declare_id!(
    /// Identifier of a [`RoadGeometry`](crate::RoadGeometry)
    RoadGeometryId
);
declare_id!(
    /// Identifier of a [`Junction`](crate::Junction)
    JunctionId
);
declare_id!(
    /// Identifier of a [`Segment`](crate::Segment)
    SegmentId
);
declare_id!(
    /// Identifier of a [`Lane`](crate::Lane)
    LaneId
);
