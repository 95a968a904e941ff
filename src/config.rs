//! World configuration.

use crate::{Fp, PhysicsError, Result, Vec2, EPSILON};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Simulation parameters and the fixed capacities of a `PhysicsWorld`.
///
/// All buffers are allocated once, at world creation, from these capacities.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhysicsConfig {
    /// Fixed simulation steps per second.
    /// A frame is subdivided into steps of at most `1 / sim_rate`.
    pub sim_rate: Fp,
    /// Acceleration applied to every body with a finite mass.
    pub gravity: Vec2,
    /// Tolerance of separation tests, in world units.
    pub epsilon: Fp,
    /// Upper bound on sub-steps per `step` call. Remaining frame time is dropped.
    pub max_substeps: usize,

    pub shape_capacity: usize,
    /// Vertex budget shared by all polygons.
    pub vertex_capacity: usize,
    pub body_capacity: usize,
    pub shapes_per_body: usize,
    /// Collisions recorded per sub-step.
    pub collision_capacity: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            sim_rate: 120.0,
            gravity: Vec2::new(0.0, -9.81),
            epsilon: EPSILON,
            max_substeps: 64,
            shape_capacity: 64,
            vertex_capacity: 512,
            body_capacity: 64,
            shapes_per_body: 8,
            collision_capacity: 64,
        }
    }
}

impl PhysicsConfig {
    #[inline]
    pub fn fixed_dt(&self) -> Fp {
        1.0 / self.sim_rate
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sim_rate.is_finite() && self.sim_rate > 0.0) {
            return Err(PhysicsError::InvalidConfig("sim_rate must be finite and positive"));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(PhysicsError::InvalidConfig("epsilon must be finite and positive"));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite"));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig("max_substeps must be non-zero"));
        }
        if self.shape_capacity == 0
            || self.vertex_capacity == 0
            || self.body_capacity == 0
            || self.shapes_per_body == 0
            || self.collision_capacity == 0
        {
            return Err(PhysicsError::InvalidConfig("capacities must be non-zero"));
        }
        Ok(())
    }
}
