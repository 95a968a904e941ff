use crate::{rotate, Fp, ShapeId, Vec2};
use approx::AbsDiffEq;
use smallvec::SmallVec;

/// Position and rotation of a body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub pos: Vec2,
    /// Counter-clockwise, in radians.
    pub rot: Fp,
}
impl Transform {
    #[inline]
    pub fn new(pos: Vec2, rot: Fp) -> Transform {
        Transform { pos, rot }
    }

    #[inline]
    pub fn apply(&self, local: Vec2) -> Vec2 {
        //! Maps a body-local point into world space.
        rotate(local, self.rot) + self.pos
    }
}
impl AbsDiffEq for Transform {
    type Epsilon = Fp;

    fn default_epsilon() -> Fp {
        Fp::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Fp) -> bool {
        self.pos.abs_diff_eq(other.pos, epsilon) && self.rot.abs_diff_eq(&other.rot, epsilon)
    }
}

/// Per-step kinematic accumulator. Accelerations are cleared once integrated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Movement {
    pub vel: Vec2,
    pub acc: Vec2,
    pub ang_vel: Fp,
    pub ang_acc: Fp,
}

/// Scalar mass and its inverse. An inverse of `0.0` marks an immovable body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mass {
    pub value: Fp,
    pub inv: Fp,
}
impl Mass {
    pub fn new(value: Fp) -> Mass {
        //! Non-positive or non-finite mass is treated as infinite.
        if value > 0.0 && value.is_finite() {
            Mass { value, inv: 1.0 / value }
        } else {
            Mass::INFINITE
        }
    }

    pub const INFINITE: Mass = Mass { value: Fp::INFINITY, inv: 0.0 };

    #[inline]
    pub fn is_static(&self) -> bool {
        self.inv == 0.0
    }
}

/// Surface response coefficients. Never mutated by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Material {
    pub friction_dynamic: Fp,
    pub friction_static: Fp,
    /// `0.0`: normal velocity is absorbed, `1.0`: perfectly elastic.
    pub restitution: Fp,
}
impl Material {
    pub fn new(friction_dynamic: Fp, friction_static: Fp, restitution: Fp) -> Material {
        Material {
            friction_dynamic: friction_dynamic.max(0.0),
            friction_static: friction_static.max(0.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    #[inline]
    pub fn mix_restitution(&self, other: &Material) -> Fp {
        self.restitution.min(other.restitution)
    }
    #[inline]
    pub fn mix_friction(&self, other: &Material) -> (Fp, Fp) {
        //! Returns the pair's (dynamic, static) friction.
        (
            (self.friction_dynamic * other.friction_dynamic).sqrt(),
            (self.friction_static * other.friction_static).sqrt(),
        )
    }
}

/// Initial state of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDef {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rot: Fp,
    pub ang_vel: Fp,
    /// `<= 0.0` makes the body immovable.
    pub mass: Fp,
    pub material: Material,
    /// Velocity damping per second, linear and angular.
    pub damping: Fp,
    /// Bodies only collide when their masks share a bit.
    pub collision_mask: u32,
}
impl Default for BodyDef {
    fn default() -> Self {
        BodyDef {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rot: 0.0,
            ang_vel: 0.0,
            mass: 1.0,
            material: Material::default(),
            damping: 0.0,
            collision_mask: u32::MAX,
        }
    }
}
impl BodyDef {
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite()
            && self.vel.is_finite()
            && self.rot.is_finite()
            && self.ang_vel.is_finite()
            && !self.damping.is_nan()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub transform: Transform,
    pub movement: Movement,
    pub mass: Mass,
    pub material: Material,
    pub damping: Fp,
    pub collision_mask: u32,
    /// Linked shapes. The geometry is owned by the world's shape set.
    pub(crate) shapes: SmallVec<[ShapeId; 4]>,
}
impl Body {
    pub fn new(def: &BodyDef) -> Body {
        Body {
            transform: Transform::new(def.pos, def.rot),
            movement: Movement {
                vel: def.vel,
                acc: Vec2::ZERO,
                ang_vel: def.ang_vel,
                ang_acc: 0.0,
            },
            mass: Mass::new(def.mass),
            material: def.material,
            damping: def.damping.max(0.0),
            collision_mask: def.collision_mask,
            shapes: SmallVec::new(),
        }
    }

    #[inline]
    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }
    #[inline]
    pub fn is_static(&self) -> bool {
        self.mass.is_static()
    }
    #[inline]
    pub fn collides_with(&self, other: &Body) -> bool {
        self.collision_mask & other.collision_mask != 0
    }

    pub fn integrate_velocity(&mut self, dt: Fp) {
        //! Folds the accumulated acceleration into velocity and resets the acceleration.
        //!
        //! Damping applies to movable bodies only, so kinematic bodies keep their velocity.
        let m = &mut self.movement;
        m.vel += m.acc * dt;
        m.ang_vel += m.ang_acc * dt;
        m.acc = Vec2::ZERO;
        m.ang_acc = 0.0;
        if self.mass.is_static() {
            return;
        }

        // clamped so damping never reverses the velocity
        let keep = (1.0 - self.damping * dt).max(0.0);
        m.vel *= keep;
        m.ang_vel *= keep;
    }
    pub fn integrate_transform(&mut self, dt: Fp) {
        self.transform.pos += self.movement.vel * dt;
        self.transform.rot += self.movement.ang_vel * dt;
    }
}
