//! Error types.

use crate::{BodyId, ShapeId};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// A fixed-capacity buffer of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capacity {
    Shapes,
    Vertices,
    Bodies,
    ShapesPerBody,
    Collisions,
}
impl Display for Capacity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Capacity::Shapes => "shape",
            Capacity::Vertices => "vertex",
            Capacity::Bodies => "body",
            Capacity::ShapesPerBody => "shapes-per-body",
            Capacity::Collisions => "collision",
        })
    }
}

/// Errors returned by the physics world.
///
/// Capacity and geometry errors indicate misconfigured content rather than
/// recoverable runtime faults.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A fixed-capacity buffer is full.
    #[error("{what} capacity of {limit} exceeded")]
    CapacityExceeded { what: Capacity, limit: usize },

    /// Fewer than three vertices, or all vertices colinear.
    #[error("degenerate polygon with {0} vertices")]
    DegeneratePolygon(usize),

    /// More vertices than a polygon can hold.
    #[error(
        "polygon has {0} vertices, at most {max} are supported",
        max = crate::narrow::MAX_POLY_VERTS
    )]
    TooManyVertices(usize),

    #[error("polygon is not convex")]
    NonConvex,

    #[error("circle radius must be finite and positive")]
    InvalidRadius,

    #[error("non-finite coordinate in shape or body definition")]
    NonFinite,

    /// The body was removed, or the handle belongs to another world.
    #[error("stale body handle {0:?}")]
    StaleBody(BodyId),

    /// The shape was removed, or the handle belongs to another world.
    #[error("stale shape handle {0:?}")]
    StaleShape(ShapeId),

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

/// Logs and returns a capacity error.
pub(crate) fn exceeded<T>(what: Capacity, limit: usize) -> Result<T, PhysicsError> {
    tracing::warn!(%what, limit, "capacity exceeded");
    Err(PhysicsError::CapacityExceeded { what, limit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_names_the_limit() {
        let e = PhysicsError::CapacityExceeded { what: Capacity::ShapesPerBody, limit: 8 };
        assert_eq!(e.to_string(), "shapes-per-body capacity of 8 exceeded");
        assert_eq!(
            PhysicsError::TooManyVertices(9).to_string(),
            "polygon has 9 vertices, at most 8 are supported"
        );
    }
}
