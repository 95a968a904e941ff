//! The physics world: owns every shape and body and drives the simulation.

use crate::{
    broad::{bounds_test, collidable, Pairs},
    error::exceeded,
    narrow::swept::{body_sweep, Collision},
    norm_or_zero,
    registry::{BodySet, ShapeSet},
    response,
    step::Stepper,
    Aabb, Body, BodyDef, BodyId, Capacity, Fp, PhysicsConfig, PhysicsError, Result, Shape, ShapeId,
    Transform, Vec2,
};
use fnv::FnvBuildHasher;
use indexmap::IndexSet;

type PairSet = IndexSet<(BodyId, BodyId), FnvBuildHasher>;

/// Summary of one `PhysicsWorld::step` call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    pub substeps: usize,
    /// Time advanced by the sub-steps.
    pub simulated: Fp,
    /// Frame time discarded by the sub-step cap.
    pub dropped: Fp,
    /// Collisions resolved, summed over all sub-steps.
    pub collisions: usize,
}

#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    shapes: ShapeSet,
    bodies: BodySet,
    /// Live bodies in creation order, which is the pair test order.
    order: Vec<BodyId>,
    /// Collisions of the last sub-step.
    collisions: Vec<Collision>,
    touching: PairSet,
    time: Fp,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        PhysicsWorld::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> PhysicsWorld {
        PhysicsWorld::build(PhysicsConfig::default())
    }
    pub fn with_config(config: PhysicsConfig) -> Result<PhysicsWorld> {
        config.validate()?;
        Ok(PhysicsWorld::build(config))
    }
    fn build(config: PhysicsConfig) -> PhysicsWorld {
        tracing::debug!(
            sim_rate = config.sim_rate,
            shapes = config.shape_capacity,
            vertices = config.vertex_capacity,
            bodies = config.body_capacity,
            "creating physics world"
        );
        PhysicsWorld {
            shapes: ShapeSet::with_capacity(config.shape_capacity, config.vertex_capacity),
            bodies: BodySet::with_capacity(config.body_capacity, config.shapes_per_body),
            order: Vec::with_capacity(config.body_capacity),
            collisions: Vec::with_capacity(config.collision_capacity),
            touching: PairSet::with_capacity_and_hasher(
                config.collision_capacity,
                Default::default(),
            ),
            time: 0.0,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    // ---------- Shapes ---------- //

    pub fn create_polygon(&mut self, verts: &[Vec2]) -> Result<ShapeId> {
        //! Creates a convex polygon from at most `MAX_POLY_VERTS` vertices, in either winding.
        let id = self.shapes.create_polygon(verts)?;
        tracing::trace!(?id, verts = verts.len(), "created polygon");
        Ok(id)
    }
    pub fn create_circle(&mut self, center: Vec2, radius: Fp) -> Result<ShapeId> {
        let id = self.shapes.create_circle(center, radius)?;
        tracing::trace!(?id, radius, "created circle");
        Ok(id)
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        //! Removes the shape, unlinking it from every body. Its vertices return to the budget.
        let shape = self.shapes.remove(id)?;
        for (_, body) in self.bodies.iter_mut() {
            body.shapes.retain(|s| *s != id);
        }
        Some(shape)
    }

    #[inline]
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }
    pub fn bounding_box(&self, id: ShapeId, rotation: Fp) -> Result<Aabb> {
        //! Bounds of the shape rotated about its local origin.
        self.shapes.get(id).map(|s| s.bounding_box(rotation)).ok_or(PhysicsError::StaleShape(id))
    }

    // ---------- Bodies ---------- //

    pub fn create_body(&mut self, def: &BodyDef) -> Result<BodyId> {
        let id = self.bodies.create(def)?;
        self.order.push(id);
        tracing::trace!(?id, pos = ?def.pos, mass = def.mass, "created body");
        Ok(id)
    }

    pub fn link_shape_to_body(&mut self, body: BodyId, shape: ShapeId) -> Result<()> {
        if !self.shapes.contains(shape) {
            return Err(PhysicsError::StaleShape(shape));
        }
        self.bodies.link_shape(body, shape)?;
        tracing::trace!(?body, ?shape, "linked shape");
        Ok(())
    }

    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let body = self.bodies.remove(id)?;
        self.order.retain(|b| *b != id);
        self.collisions.retain(|c| c.a != id && c.b != id);
        self.touching.retain(|&(a, b)| a != id && b != id);
        Some(body)
    }

    #[inline]
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }
    #[inline]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        //! Live bodies, in creation order.
        self.order.iter().filter_map(move |&id| self.bodies.get(id).map(|b| (id, b)))
    }

    fn get(&self, id: BodyId) -> Result<&Body> {
        self.bodies.get(id).ok_or(PhysicsError::StaleBody(id))
    }
    fn get_mut(&mut self, id: BodyId) -> Result<&mut Body> {
        self.bodies.get_mut(id).ok_or(PhysicsError::StaleBody(id))
    }

    pub fn transform(&self, id: BodyId) -> Result<Transform> {
        Ok(self.get(id)?.transform)
    }
    pub fn velocity(&self, id: BodyId) -> Result<Vec2> {
        Ok(self.get(id)?.movement.vel)
    }
    pub fn set_velocity(&mut self, id: BodyId, vel: Vec2) -> Result<()> {
        if !vel.is_finite() {
            return Err(PhysicsError::NonFinite);
        }
        self.get_mut(id)?.movement.vel = vel;
        Ok(())
    }

    // ---------- Input ---------- //

    pub fn apply_force(&mut self, id: BodyId, force: Vec2) -> Result<()> {
        //! Accumulates `force` for the next sub-step. Immovable bodies ignore it.
        let body = self.get_mut(id)?;
        body.movement.acc += force * body.mass.inv;
        Ok(())
    }
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2) -> Result<()> {
        let body = self.get_mut(id)?;
        body.movement.vel += impulse * body.mass.inv;
        Ok(())
    }
    pub fn apply_impulse_at(&mut self, id: BodyId, impulse: Vec2, point: Vec2) -> Result<()> {
        //! Applies `impulse` at the world-space `point`, linear only.
        //!
        //! The impulse is scaled by `0.5 + 0.5 * cos θ`, θ being the angle between the impulse
        //! and the direction from `point` to the body's centroid: full strength when pushing
        //! through the centroid, none when pulling away from it.
        let centroid = self.centroid(id)?;
        let (dir, to_centroid) = (norm_or_zero(impulse), norm_or_zero(centroid - point));
        let scale = if dir == Vec2::ZERO || to_centroid == Vec2::ZERO {
            1.0
        } else {
            0.5 + 0.5 * dir.dot(to_centroid)
        };
        self.apply_impulse(id, impulse * scale)
    }

    pub fn centroid(&self, id: BodyId) -> Result<Vec2> {
        //! Area-weighted centroid of the body's shapes in world space.
        //!
        //! A body without shapes reports its position.
        let body = self.get(id)?;
        let (mut sum, mut area) = (Vec2::ZERO, 0.0);
        for shape in body.shapes().iter().filter_map(|&s| self.shapes.get(s)) {
            let a = shape.area();
            sum += body.transform.apply(shape.centroid()) * a;
            area += a;
        }
        Ok(if area > 0.0 { sum / area } else { body.transform.pos })
    }

    // ---------- Collision ---------- //

    pub fn detect(&self, a: BodyId, b: BodyId, dt: Fp) -> Result<Option<Collision>> {
        //! Sweeps `a` against `b` over `dt`. The normal points in the direction `a` separates.
        //!
        //! Collision masks are not consulted.
        let (ba, bb) = (self.get(a)?, self.get(b)?);
        if a == b {
            return Ok(None);
        }
        let data = body_sweep(&self.shapes, ba, bb, dt, self.config.epsilon);
        Ok(data.map(|d| d.into_collision(a, b)))
    }

    pub fn resolve(&mut self, collision: &Collision) -> Result<()> {
        self.get(collision.a)?;
        self.get(collision.b)?;
        if let Some([a, b]) = self.bodies.get_pair_mut(collision.a, collision.b) {
            response::resolve(collision, a, b);
        }
        Ok(())
    }

    /// Collisions resolved during the last sub-step.
    #[inline]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }
    /// Body pairs that collided during the last sub-step, in test order.
    pub fn touching(&self) -> impl Iterator<Item = (BodyId, BodyId)> + '_ {
        self.touching.iter().copied()
    }
    pub fn is_touching(&self, id: BodyId) -> bool {
        self.touching.iter().any(|&(a, b)| a == id || b == id)
    }

    // ---------- Stepping ---------- //

    #[inline]
    pub fn simulated_time(&self) -> Fp {
        self.time
    }

    pub fn step(&mut self, frame_time: Fp) -> Result<StepReport> {
        //! Advances the world by `frame_time` in fixed sub-steps of at most `1 / sim_rate`.
        //!
        //! At most `max_substeps` are taken; the rest of the frame is dropped and reported.
        //!
        //! Running out of collision capacity ends the call with an error once the current
        //! sub-step has finished. Pairs past the limit go unresolved for that sub-step, but
        //! the world stays consistent and can keep stepping.
        let mut report = StepReport::default();
        let mut stepper = Stepper::begin(frame_time);
        let (fixed_dt, max_substeps) = (self.config.fixed_dt(), self.config.max_substeps);

        while let Some(dt) = stepper.next_dt(fixed_dt, max_substeps) {
            let resolved = self.substep(dt);
            self.time += dt;
            report.collisions += resolved?;
            report.substeps += 1;
            report.simulated += dt;
        }

        report.dropped = stepper.finish();
        if report.dropped > 0.0 {
            tracing::warn!(
                dropped = report.dropped,
                max_substeps,
                "frame truncated by the sub-step cap"
            );
        }
        Ok(report)
    }

    fn substep(&mut self, dt: Fp) -> Result<usize> {
        let PhysicsWorld { config, shapes, bodies, order, collisions, touching, .. } = self;

        for (_, body) in bodies.iter_mut() {
            if !body.is_static() {
                body.movement.acc += config.gravity;
            }
            body.integrate_velocity(dt);
        }

        collisions.clear();
        touching.clear();
        let mut overflow = false;
        for (i, j) in Pairs::new(order.len()) {
            let (a, b) = (order[i], order[j]);
            let Some([ba, bb]) = bodies.get_pair_mut(a, b) else { continue };
            if !collidable(ba, bb) || !bounds_test(shapes, ba, bb, dt) {
                continue;
            }

            // the dynamic body is the mover
            let (a, b, ba, bb) = if ba.is_static() { (b, a, bb, ba) } else { (a, b, ba, bb) };
            let Some(data) = body_sweep(shapes, ba, bb, dt, config.epsilon) else { continue };
            if collisions.len() >= config.collision_capacity {
                overflow = true;
                break;
            }

            let collision = data.into_collision(a, b);
            response::resolve(&collision, ba, bb);
            collisions.push(collision);
            touching.insert((order[i], order[j]));
        }

        for (_, body) in bodies.iter_mut() {
            body.integrate_transform(dt);
        }
        tracing::trace!(dt, collisions = collisions.len(), "sub-step");
        if overflow {
            return exceeded(Capacity::Collisions, config.collision_capacity);
        }
        Ok(collisions.len())
    }
}
