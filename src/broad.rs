//! Broadphase: pair enumeration and bounding box rejection.

use crate::{registry::ShapeSet, Aabb, Body, Fp};

/// Unordered index pairs `(i, j)`, `i < j`, in lexicographic order.
#[derive(Debug, Clone)]
pub struct Pairs {
    len: usize,
    i: usize,
    j: usize,
}
impl Pairs {
    pub fn new(len: usize) -> Pairs {
        Pairs { len, i: 0, j: 1 }
    }
}
impl Iterator for Pairs {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.j >= self.len {
            self.i += 1;
            self.j = self.i + 1;
            if self.j >= self.len {
                return None;
            }
        }
        let pair = (self.i, self.j);
        self.j += 1;
        Some(pair)
    }
}

#[inline]
pub fn collidable(a: &Body, b: &Body) -> bool {
    //! Static-static pairs and pairs without a shared mask bit are never tested.
    !(a.is_static() && b.is_static()) && a.collides_with(b)
}

pub fn body_bounds(shapes: &ShapeSet, body: &Body, dt: Fp) -> Option<Aabb> {
    //! Bounds of the body's live shapes, broadened by its travel over `dt`.
    //!
    //! `None` without live shapes.
    let t = &body.transform;
    body.shapes()
        .iter()
        .filter_map(|&id| shapes.get(id))
        .map(|s| s.bounding_box(t.rot).translate(t.pos))
        .reduce(|acc, bb| acc.union(&bb))
        .map(|bb| bb.broaden(body.movement.vel * dt))
}

pub fn bounds_test(shapes: &ShapeSet, a: &Body, b: &Body, dt: Fp) -> bool {
    //! Whether the swept bounds of both bodies intersect.
    match (body_bounds(shapes, a, dt), body_bounds(shapes, b, dt)) {
        (Some(ba), Some(bb)) => ba.aabb_test(&bb),
        _ => false,
    }
}
