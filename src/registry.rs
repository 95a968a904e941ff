//! Fixed-capacity arenas for shapes and bodies, addressed by generation-checked handles.

use crate::{
    error::exceeded,
    narrow::{Circle, Poly, Shape},
    Body, BodyDef, Capacity, Fp, PhysicsError, Result, Vec2,
};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a shape in a `PhysicsWorld`.
    pub struct ShapeId;
    /// Handle to a body in a `PhysicsWorld`.
    pub struct BodyId;
}

// ---------- Shapes ---------- //

#[derive(Debug, Clone)]
pub struct ShapeSet {
    shapes: SlotMap<ShapeId, Shape>,
    capacity: usize,
    vertex_capacity: usize,
    vertices: usize,
}
impl ShapeSet {
    pub fn with_capacity(capacity: usize, vertex_capacity: usize) -> ShapeSet {
        ShapeSet {
            shapes: SlotMap::with_capacity_and_key(capacity),
            capacity,
            vertex_capacity,
            vertices: 0,
        }
    }

    pub fn insert(&mut self, shape: Shape) -> Result<ShapeId> {
        if self.shapes.len() >= self.capacity {
            return exceeded(Capacity::Shapes, self.capacity);
        }
        let count = shape.vertex_count();
        if self.vertices + count > self.vertex_capacity {
            return exceeded(Capacity::Vertices, self.vertex_capacity);
        }
        self.vertices += count;
        Ok(self.shapes.insert(shape))
    }
    pub fn create_polygon(&mut self, verts: &[Vec2]) -> Result<ShapeId> {
        self.insert(Shape::Poly(Poly::new(verts)?))
    }
    pub fn create_circle(&mut self, center: Vec2, radius: Fp) -> Result<ShapeId> {
        self.insert(Shape::Circle(Circle::new(center, radius)?))
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let shape = self.shapes.remove(id)?;
        self.vertices -= shape.vertex_count();
        Some(shape)
    }

    #[inline]
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }
    #[inline]
    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(id)
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
    /// Vertices in use out of the shared budget.
    #[inline]
    pub fn vertices(&self) -> usize {
        self.vertices
    }
}

// ---------- Bodies ---------- //

#[derive(Debug, Clone)]
pub struct BodySet {
    bodies: SlotMap<BodyId, Body>,
    capacity: usize,
    shapes_per_body: usize,
}
impl BodySet {
    pub fn with_capacity(capacity: usize, shapes_per_body: usize) -> BodySet {
        BodySet {
            bodies: SlotMap::with_capacity_and_key(capacity),
            capacity,
            shapes_per_body,
        }
    }

    pub fn create(&mut self, def: &BodyDef) -> Result<BodyId> {
        if !def.is_finite() {
            return Err(PhysicsError::NonFinite);
        }
        if self.bodies.len() >= self.capacity {
            return exceeded(Capacity::Bodies, self.capacity);
        }
        Ok(self.bodies.insert(Body::new(def)))
    }

    pub fn link_shape(&mut self, id: BodyId, shape: ShapeId) -> Result<()> {
        //! Appends `shape` to the body's shape list. Shape validity is checked by the caller.
        let body = self.bodies.get_mut(id).ok_or(PhysicsError::StaleBody(id))?;
        if body.shapes.len() >= self.shapes_per_body {
            return exceeded(Capacity::ShapesPerBody, self.shapes_per_body);
        }
        body.shapes.push(shape);
        Ok(())
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        self.bodies.remove(id)
    }

    #[inline]
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }
    #[inline]
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }
    #[inline]
    pub fn get_pair_mut(&mut self, a: BodyId, b: BodyId) -> Option<[&mut Body; 2]> {
        //! `None` if either handle is stale, or both name the same body.
        self.bodies.get_disjoint_mut([a, b])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut Body)> {
        self.bodies.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> [Vec2; 3] {
        [Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0)]
    }

    #[test]
    fn shape_capacity() {
        let mut set = ShapeSet::with_capacity(2, 64);
        set.create_circle(Vec2::ZERO, 1.0).unwrap();
        set.create_polygon(&tri()).unwrap();
        assert_eq!(
            set.create_circle(Vec2::ZERO, 1.0),
            Err(PhysicsError::CapacityExceeded { what: Capacity::Shapes, limit: 2 })
        );
    }

    #[test]
    fn vertex_budget_is_shared_and_returned() {
        let mut set = ShapeSet::with_capacity(8, 7);
        let a = set.create_polygon(&tri()).unwrap();
        set.create_polygon(&tri()).unwrap();
        assert_eq!(set.vertices(), 6);
        assert_eq!(
            set.create_polygon(&tri()),
            Err(PhysicsError::CapacityExceeded { what: Capacity::Vertices, limit: 7 })
        );
        // circles carry no vertices
        set.create_circle(Vec2::ZERO, 0.5).unwrap();

        assert!(set.remove(a).is_some());
        assert_eq!(set.vertices(), 3);
        assert!(set.create_polygon(&tri()).is_ok());
    }

    #[test]
    fn stale_handles_fail() {
        let mut shapes = ShapeSet::with_capacity(4, 16);
        let s = shapes.create_circle(Vec2::ZERO, 1.0).unwrap();
        shapes.remove(s);
        let s2 = shapes.create_circle(Vec2::ZERO, 2.0).unwrap();
        assert_eq!(shapes.get(s), None);
        assert!(shapes.get(s2).is_some());

        let mut bodies = BodySet::with_capacity(4, 2);
        let b = bodies.create(&BodyDef::default()).unwrap();
        bodies.remove(b);
        assert_eq!(bodies.link_shape(b, s2), Err(PhysicsError::StaleBody(b)));
    }

    #[test]
    fn shapes_per_body_limit() {
        let mut bodies = BodySet::with_capacity(1, 2);
        let mut shapes = ShapeSet::with_capacity(4, 16);
        let s = shapes.create_circle(Vec2::ZERO, 1.0).unwrap();
        let b = bodies.create(&BodyDef::default()).unwrap();
        bodies.link_shape(b, s).unwrap();
        bodies.link_shape(b, s).unwrap();
        assert_eq!(
            bodies.link_shape(b, s),
            Err(PhysicsError::CapacityExceeded { what: Capacity::ShapesPerBody, limit: 2 })
        );
        assert_eq!(bodies.get(b).unwrap().shapes().len(), 2);
        assert_eq!(
            bodies.create(&BodyDef::default()),
            Err(PhysicsError::CapacityExceeded { what: Capacity::Bodies, limit: 1 })
        );
    }

    #[test]
    fn pair_access() {
        let mut bodies = BodySet::with_capacity(4, 2);
        let a = bodies.create(&BodyDef::default()).unwrap();
        let b = bodies.create(&BodyDef { mass: 0.0, ..Default::default() }).unwrap();
        assert!(bodies.get_pair_mut(a, a).is_none());
        let [ba, bb] = bodies.get_pair_mut(a, b).unwrap();
        assert_eq!(ba.is_static(), false);
        assert_eq!(bb.is_static(), true);
    }
}
