//! Narrowphase data and logic module.

pub mod swept;

use crate::{rotate, Fp, PhysicsError, Result, Vec2};

/// Most vertices a `Poly` can hold.
pub const MAX_POLY_VERTS: usize = 8;

// ---------- Aabb ---------- //

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}
impl Aabb {
    #[inline]
    pub fn new(minx: Fp, miny: Fp, maxx: Fp, maxy: Fp) -> Aabb {
        debug_assert!(minx <= maxx);
        debug_assert!(miny <= maxy);

        Aabb {
            min: Vec2::new(minx, miny),
            max: Vec2::new(maxx, maxy),
        }
    }

    #[inline]
    pub fn translate(self, offset: Vec2) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
    #[inline]
    pub fn broaden(&self, dir: Vec2) -> Aabb {
        //! Extends the box to cover its translation along `dir`.
        Aabb {
            min: self.min.min(self.min + dir),
            max: self.max.max(self.max + dir),
        }
    }
    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
    #[inline]
    pub fn aabb_test(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

// ---------- Circle ---------- //

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub rad: Fp,
    /// Centre, relative to the owning body's origin.
    pub pos: Vec2,
}
impl Circle {
    pub fn new(pos: Vec2, rad: Fp) -> Result<Circle> {
        if !pos.is_finite() {
            return Err(PhysicsError::NonFinite);
        }
        if !(rad.is_finite() && rad > 0.0) {
            return Err(PhysicsError::InvalidRadius);
        }
        Ok(Circle { rad, pos })
    }

    #[inline]
    pub fn bounding_box(&self, ang: Fp) -> Aabb {
        let c = rotate(self.pos, ang);
        let splat = Vec2::splat(self.rad);
        Aabb { min: c - splat, max: c + splat }
    }
}

// ---------- Poly ---------- //

/// A 2D convex polygon, wound clockwise, with one unit-length outward normal per edge.
///
/// Normal `i` belongs to the edge from vertex `i` to vertex `i + 1` (wrapping).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poly {
    count: usize,
    verts: [Vec2; MAX_POLY_VERTS],
    norms: [Vec2; MAX_POLY_VERTS],
}
impl Poly {
    /// `verts` must form a convex polygon without duplicate vertices.
    /// Counter-clockwise input is rewound.
    pub fn new(verts: &[Vec2]) -> Result<Poly> {
        let count = verts.len();
        if count < 3 {
            return Err(PhysicsError::DegeneratePolygon(count));
        }
        if count > MAX_POLY_VERTS {
            return Err(PhysicsError::TooManyVertices(count));
        }
        if verts.iter().any(|v| !v.is_finite()) {
            return Err(PhysicsError::NonFinite);
        }

        // twice the signed area, negative when wound clockwise
        let area2 = signed_area2(verts);
        if area2.abs() <= Fp::EPSILON {
            return Err(PhysicsError::DegeneratePolygon(count));
        }

        let mut wound = [Vec2::ZERO; MAX_POLY_VERTS];
        wound[..count].copy_from_slice(verts);
        if area2 > 0.0 {
            wound[..count].reverse();
        }

        let mut norms = [Vec2::ZERO; MAX_POLY_VERTS];
        for i in 0..count {
            let edge = wound[(i + 1) % count] - wound[i];
            let next = wound[(i + 2) % count] - wound[(i + 1) % count];
            let len = edge.length();
            if len <= Fp::EPSILON {
                return Err(PhysicsError::DegeneratePolygon(count));
            }
            // clockwise winding turns right at every vertex
            if edge.perp_dot(next) > Fp::EPSILON * len * next.length() {
                return Err(PhysicsError::NonConvex);
            }
            norms[i] = edge.perp() / len;
        }

        Ok(Poly { count, verts: wound, norms })
    }

    #[inline]
    pub fn verts(&self) -> &[Vec2] {
        &self.verts[..self.count]
    }
    #[inline]
    pub fn norms(&self) -> &[Vec2] {
        &self.norms[..self.count]
    }

    pub fn area(&self) -> Fp {
        signed_area2(self.verts()).abs() * 0.5
    }
    pub fn centroid(&self) -> Vec2 {
        let verts = self.verts();
        let mut c = Vec2::ZERO;
        let mut area2 = 0.0;
        for i in 0..self.count {
            let (a, b) = (verts[i], verts[(i + 1) % self.count]);
            let cross = a.perp_dot(b);
            area2 += cross;
            c += (a + b) * cross;
        }
        c / (3.0 * area2)
    }

    pub fn bounding_box(&self, ang: Fp) -> Aabb {
        let (mut min, mut max) = (Vec2::splat(Fp::MAX), Vec2::splat(Fp::MIN));
        for &v in self.verts() {
            let r = rotate(v, ang);
            min = min.min(r);
            max = max.max(r);
        }
        Aabb { min, max }
    }
}

#[inline]
fn signed_area2(verts: &[Vec2]) -> Fp {
    let len = verts.len();
    (0..len).map(|i| verts[i].perp_dot(verts[(i + 1) % len])).sum()
}

// ---------- Shape ---------- //

/// Immutable collision geometry, in the local space of the bodies it is linked to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Poly(Poly),
}
impl Shape {
    /// Axis-aligned bounds after rotating the shape by `ang` about the body origin.
    pub fn bounding_box(&self, ang: Fp) -> Aabb {
        match self {
            Shape::Circle(c) => c.bounding_box(ang),
            Shape::Poly(p) => p.bounding_box(ang),
        }
    }

    /// Vertices counted against the world's vertex budget.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        match self {
            Shape::Circle(_) => 0,
            Shape::Poly(p) => p.count,
        }
    }

    pub fn area(&self) -> Fp {
        match self {
            Shape::Circle(c) => std::f64::consts::PI as Fp * c.rad * c.rad,
            Shape::Poly(p) => p.area(),
        }
    }
    pub fn centroid(&self) -> Vec2 {
        match self {
            Shape::Circle(c) => c.pos,
            Shape::Poly(p) => p.centroid(),
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}
impl From<Poly> for Shape {
    fn from(poly: Poly) -> Self {
        Shape::Poly(poly)
    }
}
