//! A 2D rigid-body core: convex shapes, swept separating-axis collision detection,
//! impulse-based resolution and a fixed-timestep driver.
//!
//! Everything is owned by a [`PhysicsWorld`]. Shapes and bodies are referenced through
//! generation-checked handles ([`ShapeId`], [`BodyId`]); stale handles fail instead of aliasing.

pub mod body;
pub mod broad;
pub mod config;
pub mod error;
pub mod narrow;
pub mod registry;
pub mod response;
pub mod step;
pub mod world;

pub use body::{Body, BodyDef, Mass, Material, Movement, Transform};
pub use config::PhysicsConfig;
pub use error::{Capacity, PhysicsError};
pub use narrow::{swept::{Collision, Contact}, Aabb, Circle, Poly, Shape};
pub use registry::{BodyId, ShapeId};
pub use world::{PhysicsWorld, StepReport};

#[cfg(not(feature = "f64"))]
pub type Fp = f32;
#[cfg(not(feature = "f64"))]
pub type Vec2 = glam::Vec2;

#[cfg(feature = "f64")]
pub type Fp = f64;
#[cfg(feature = "f64")]
pub type Vec2 = glam::DVec2;

/// Default tolerance for separation tests and near-zero vectors.
pub const EPSILON: Fp = 1e-3;

pub type Result<T> = std::result::Result<T, PhysicsError>;

#[inline]
pub fn norm_or_zero(v: Vec2) -> Vec2 {
    //! Returns `v` normalized, or the zero vector if `v` is shorter than `EPSILON`.
    let len = v.length();
    if len < EPSILON {
        Vec2::ZERO
    } else {
        v / len
    }
}

#[inline]
pub fn rotate(v: Vec2, angle: Fp) -> Vec2 {
    //! Rotates `v` counter-clockwise about the origin by `angle` radians.
    if angle.abs() < Fp::EPSILON {
        v
    } else {
        Vec2::from_angle(angle).rotate(v)
    }
}
