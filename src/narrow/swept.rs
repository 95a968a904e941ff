//! Swept separating axis tests.
//!
//! Shapes are projected onto every candidate axis at their start-of-step transform, and the
//! first shape's extent is widened by its travel relative to the second over the step. A fast,
//! thin body therefore still overlaps anything it would pass through during the step.

use crate::{
    narrow::{Shape, MAX_POLY_VERTS},
    norm_or_zero,
    registry::ShapeSet,
    Body, BodyId, Fp, ShapeId, Transform, Vec2,
};

/// Most candidate axes a single shape pair can produce.
pub const AXIS_CAPACITY: usize = 64;

// two polygons' normals plus one dynamic circle axis
const _: () = assert!(2 * MAX_POLY_VERTS + 1 <= AXIS_CAPACITY);

/// Sine of the angle below which two unit axes count as the same axis.
const PARALLEL: Fp = 1e-6;

// ---------- Contact ---------- //

/// One or two advisory contact points, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    points: [Vec2; 2],
    count: usize,
}
impl Contact {
    #[inline]
    fn one(p: Vec2) -> Contact {
        Contact { points: [p, p], count: 1 }
    }
    #[inline]
    fn two(a: Vec2, b: Vec2) -> Contact {
        Contact { points: [a, b], count: 2 }
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points[..self.count]
    }
    /// The contact point, averaged over both points of a face-face contact.
    #[inline]
    pub fn point(&self) -> Vec2 {
        if self.count == 2 {
            (self.points[0] + self.points[1]) * 0.5
        } else {
            self.points[0]
        }
    }
    /// Whether the contact spans two faces.
    #[inline]
    pub fn is_face(&self) -> bool {
        self.count == 2
    }
}

// ---------- Collision ---------- //

/// A shape pair's collision data, from the perspective of the first shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    /// Unit direction in which the first shape separates from the second.
    pub normal: Vec2,
    /// Overlap of the swept extents along `normal`.
    pub depth: Fp,
    /// Overlap along `normal` at the start-of-step transforms.
    /// Zero if the shapes only meet mid-step.
    pub penetration: Fp,
    pub contact: Contact,
}

/// A detected collision between two bodies. Produced fresh each sub-step, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub a: BodyId,
    pub b: BodyId,
    pub shape_a: ShapeId,
    pub shape_b: ShapeId,
    /// Unit direction in which `a` separates from `b`.
    pub normal: Vec2,
    /// Overlap of the swept extents along `normal`.
    pub depth: Fp,
    /// Translation along `normal` that separates the start-of-step transforms.
    pub penetration: Fp,
    pub contact: Contact,
}
impl Collision {
    pub fn invert(self) -> Collision {
        //! Reverses the perspective of the collision from `a` to `b`.
        Collision {
            a: self.b,
            b: self.a,
            shape_a: self.shape_b,
            shape_b: self.shape_a,
            normal: -self.normal,
            depth: self.depth,
            penetration: self.penetration,
            contact: self.contact,
        }
    }

    #[inline]
    pub fn mtv(&self) -> Vec2 {
        //! Minimum translation of `a` that separates the start-of-step transforms.
        self.normal * self.penetration
    }
}

// ---------- World-space shapes ---------- //

/// A shape moved into world space by a body transform.
#[derive(Debug, Clone, Copy)]
pub enum Placed {
    Circle { pos: Vec2, rad: Fp },
    Poly { count: usize, verts: [Vec2; MAX_POLY_VERTS], norms: [Vec2; MAX_POLY_VERTS] },
}
impl Placed {
    pub fn new(shape: &Shape, t: &Transform) -> Placed {
        match shape {
            Shape::Circle(c) => Placed::Circle { pos: t.apply(c.pos), rad: c.rad },
            Shape::Poly(p) => {
                let count = p.verts().len();
                let mut verts = [Vec2::ZERO; MAX_POLY_VERTS];
                let mut norms = [Vec2::ZERO; MAX_POLY_VERTS];
                for i in 0..count {
                    verts[i] = t.apply(p.verts()[i]);
                    norms[i] = crate::rotate(p.norms()[i], t.rot);
                }
                Placed::Poly { count, verts, norms }
            }
        }
    }

    #[inline]
    fn project(&self, axis: Vec2) -> Extent {
        match self {
            Placed::Circle { pos, rad } => {
                let d = pos.dot(axis);
                Extent { min: d - rad, max: d + rad }
            }
            Placed::Poly { count, verts, .. } => {
                let mut e = Extent { min: Fp::MAX, max: Fp::MIN };
                for v in &verts[..*count] {
                    let d = v.dot(axis);
                    e.min = e.min.min(d);
                    e.max = e.max.max(d);
                }
                e
            }
        }
    }

    fn support(&self, dir: Vec2, eps: Fp) -> Contact {
        //! Returns the point(s) furthest along `dir`, keeping the extremes of a face.
        match self {
            Placed::Circle { pos, rad } => Contact::one(*pos + dir * *rad),
            Placed::Poly { count, verts, .. } => {
                let verts = &verts[..*count];
                let best = verts.iter().map(|v| v.dot(dir)).fold(Fp::MIN, Fp::max);
                let tangent = dir.perp();
                let (mut lo, mut hi) = (None::<Vec2>, None::<Vec2>);
                for &v in verts.iter().filter(|v| v.dot(dir) >= best - eps) {
                    if lo.map_or(true, |l| v.dot(tangent) < l.dot(tangent)) {
                        lo = Some(v);
                    }
                    if hi.map_or(true, |h| v.dot(tangent) > h.dot(tangent)) {
                        hi = Some(v);
                    }
                }
                match (lo, hi) {
                    (Some(l), Some(h)) if (h - l).dot(tangent) > eps => Contact::two(l, h),
                    (Some(l), _) => Contact::one(l),
                    _ => Contact::one(Vec2::ZERO),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    min: Fp,
    max: Fp,
}
impl Extent {
    #[inline]
    fn sweep(self, d: Fp) -> Extent {
        Extent { min: self.min.min(self.min + d), max: self.max.max(self.max + d) }
    }
}

// ---------- Axes ---------- //

struct Axes {
    axes: [Vec2; AXIS_CAPACITY],
    len: usize,
}
impl Axes {
    fn new() -> Axes {
        Axes { axes: [Vec2::ZERO; AXIS_CAPACITY], len: 0 }
    }

    fn push(&mut self, axis: Vec2) {
        //! Normalizes and adds `axis`. Zero and parallel duplicates are dropped.
        //!
        //! Axes merge only when parallel to within `PARALLEL`, whatever the distance tolerance.
        let axis = norm_or_zero(axis);
        if axis == Vec2::ZERO {
            return;
        }
        if self.axes[..self.len].iter().any(|a| a.perp_dot(axis).abs() < PARALLEL) {
            return;
        }
        // bounded by the compile-time axis assertion
        self.axes[self.len] = axis;
        self.len += 1;
    }
    fn push_normals(&mut self, placed: &Placed) {
        if let Placed::Poly { count, norms, .. } = placed {
            for &n in &norms[..*count] {
                self.push(n);
            }
        }
    }

    #[inline]
    fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.axes[..self.len].iter().copied()
    }
}

#[inline]
fn nearest_vertex_axis(center: Vec2, poly: &Placed) -> Vec2 {
    match poly {
        Placed::Poly { count, verts, .. } => {
            let mut best = verts[0];
            for &v in &verts[1..*count] {
                if (v - center).length_squared() < (best - center).length_squared() {
                    best = v;
                }
            }
            best - center
        }
        Placed::Circle { pos, .. } => *pos - center,
    }
}

// ---------- Sweep ---------- //

/// Best axis found so far.
#[derive(Clone, Copy)]
struct Candidate {
    normal: Vec2,
    depth: Fp,
    pen: Fp,
    /// Fraction of the step at which a separated axis stops separating.
    entry: Option<Fp>,
}
impl Candidate {
    fn beats(&self, other: &Candidate) -> bool {
        match (self.entry, other.entry) {
            // the last axis to close is the one that was hit
            (Some(a), Some(b)) => a > b,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => self.pen < other.pen,
        }
    }
}

pub fn shape_sweep(a: &Placed, b: &Placed, travel: Vec2, eps: Fp) -> Option<ShapeHit> {
    //! Tests `a`, travelling by `travel` relative to `b`, against `b` over one step.
    //!
    //! Returns `None` as soon as any axis separates the swept extents by more than `-eps`.
    let mut axes = Axes::new();
    axes.push_normals(a);
    axes.push_normals(b);
    match (a, b) {
        (Placed::Circle { pos: ca, .. }, Placed::Circle { pos: cb, .. }) => {
            axes.push(*cb - *ca);
            if axes.len == 0 {
                // concentric
                axes.push(travel);
                axes.push(Vec2::X);
            }
        }
        (Placed::Circle { pos, .. }, poly) | (poly, Placed::Circle { pos, .. }) => {
            axes.push(nearest_vertex_axis(*pos, poly));
        }
        _ => (),
    }

    let mut best: Option<Candidate> = None;
    for axis in axes.iter() {
        let ea = a.project(axis);
        let eb = b.project(axis);
        let d = travel.dot(axis);
        let swept = ea.sweep(d);

        // one-sided overlaps: a's high side into b, b's high side into a
        let o1 = swept.max - eb.min;
        let o2 = eb.max - swept.min;
        if o1 <= eps || o2 <= eps {
            return None; // separating axis found
        }

        // orientation is decided by the start-of-step positions
        let s1 = ea.max - eb.min;
        let s2 = eb.max - ea.min;
        let (normal, depth, pen, closing) =
            if s1 < s2 { (-axis, o1, s1, d) } else { (axis, o2, s2, -d) };
        let entry = if pen < 0.0 { Some(-pen / closing.max(Fp::EPSILON)) } else { None };

        let cand = Candidate { normal, depth, pen, entry };
        if best.map_or(true, |prev| cand.beats(&prev)) {
            best = Some(cand);
        }
    }
    let best = best?;

    let mut depth = best.depth;
    if depth < 0.0 {
        debug_assert!(depth >= 0.0, "negative overlap {} at the winning axis", depth);
        tracing::warn!(depth, "negative overlap clamped");
        depth = 0.0;
    }

    Some(ShapeHit {
        normal: best.normal,
        depth,
        penetration: best.pen.max(0.0),
        contact: contact(a, b, best.normal, eps),
    })
}

fn contact(a: &Placed, b: &Placed, normal: Vec2, eps: Fp) -> Contact {
    //! Picks the incident feature: a lone vertex wins, otherwise the overlap of two faces.
    let sa = a.support(-normal, eps);
    let sb = b.support(normal, eps);
    if !sa.is_face() {
        return sa;
    }
    if !sb.is_face() {
        return sb;
    }

    // face-face: keep the face endpoints lying within both faces' tangential span
    let t = normal.perp();
    let span = |c: &Contact| {
        let (x, y) = (c.points[0].dot(t), c.points[1].dot(t));
        (x.min(y), x.max(y))
    };
    let (a_lo, a_hi) = span(&sa);
    let (b_lo, b_hi) = span(&sb);
    let (lo, hi) = (a_lo.max(b_lo) - eps, a_hi.min(b_hi) + eps);

    let mut found = [Vec2::ZERO; 2];
    let mut n = 0;
    for &p in sa.points().iter().chain(sb.points()) {
        let d = p.dot(t);
        if n < 2 && d >= lo && d <= hi && found[..n].iter().all(|f| (*f - p).length() > eps) {
            found[n] = p;
            n += 1;
        }
    }
    match n {
        2 => Contact::two(found[0], found[1]),
        1 => Contact::one(found[0]),
        _ => Contact::one((sa.point() + sb.point()) * 0.5),
    }
}

/// The deepest colliding shape pair between two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySweepData {
    pub b1_shape: ShapeId,
    pub b2_shape: ShapeId,
    pub hit: ShapeHit,
}
impl BodySweepData {
    #[inline]
    pub fn into_collision(self, a: BodyId, b: BodyId) -> Collision {
        Collision {
            a,
            b,
            shape_a: self.b1_shape,
            shape_b: self.b2_shape,
            normal: self.hit.normal,
            depth: self.hit.depth,
            penetration: self.hit.penetration,
            contact: self.hit.contact,
        }
    }
}

pub fn body_sweep(
    shapes: &ShapeSet,
    b1: &Body,
    b2: &Body,
    dt: Fp,
    eps: Fp,
) -> Option<BodySweepData> {
    //! Sweeps every shape of `b1` against every shape of `b2` over `dt`.
    //!
    //! Returns the deepest collision. Shapes whose handles are stale are skipped.
    // swept in b2's frame: b1 is widened by the relative travel instead of each body by its own
    let travel = (b1.movement.vel - b2.movement.vel) * dt;
    let (t1, t2) = (&b1.transform, &b2.transform);

    let mut result: Option<BodySweepData> = None;
    for &s1 in b1.shapes() {
        let Some(shape1) = shapes.get(s1) else { continue };
        let broad1 = shape1.bounding_box(t1.rot).translate(t1.pos).broaden(travel);
        let placed1 = Placed::new(shape1, t1);

        for &s2 in b2.shapes() {
            let Some(shape2) = shapes.get(s2) else { continue };
            // cheap rejection before the axis tests
            if !broad1.aabb_test(&shape2.bounding_box(t2.rot).translate(t2.pos)) {
                continue;
            }

            if let Some(hit) = shape_sweep(&placed1, &Placed::new(shape2, t2), travel, eps) {
                if result.map_or(true, |r| hit.depth > r.hit.depth) {
                    result = Some(BodySweepData { b1_shape: s1, b2_shape: s2, hit });
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{narrow::{Circle, Poly}, BodyDef, EPSILON};
    use approx::assert_abs_diff_eq;

    fn rect(hw: Fp, hh: Fp) -> Shape {
        let verts =
            [Vec2::new(-hw, hh), Vec2::new(hw, hh), Vec2::new(hw, -hh), Vec2::new(-hw, -hh)];
        Shape::Poly(Poly::new(&verts).unwrap())
    }
    fn placed(shape: &Shape, x: Fp, y: Fp, rot: Fp) -> Placed {
        Placed::new(shape, &Transform::new(Vec2::new(x, y), rot))
    }

    #[test]
    fn unit_squares_moving_into_static_square() {
        let sq = rect(0.5, 0.5);
        let a = placed(&sq, 0.0, 0.0, 0.0);
        let b = placed(&sq, 2.0, 0.0, 0.0);

        // (10, 0) * 0.2
        let hit = shape_sweep(&a, &b, Vec2::new(2.0, 0.0), EPSILON).unwrap();
        assert_abs_diff_eq!(hit.normal, Vec2::new(-1.0, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(hit.depth, 1.0, epsilon = 1e-5);
        assert_eq!(hit.penetration, 0.0);

        assert_eq!(shape_sweep(&a, &b, Vec2::new(0.5, 0.0), EPSILON).is_some(), false);
        assert_eq!(shape_sweep(&a, &b, Vec2::new(-2.0, 0.0), EPSILON).is_some(), false);
    }

    #[test]
    fn touching_is_not_colliding() {
        let sq = rect(0.5, 0.5);
        let a = placed(&sq, 0.0, 0.0, 0.0);
        let b = placed(&sq, 1.0, 0.0, 0.0);
        assert_eq!(shape_sweep(&a, &b, Vec2::ZERO, EPSILON).is_some(), false);
        let b = placed(&sq, 0.9, 0.0, 0.0);
        let hit = shape_sweep(&a, &b, Vec2::ZERO, EPSILON).unwrap();
        assert_abs_diff_eq!(hit.penetration, 0.1, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.depth, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn symmetric_normals() {
        let sq = rect(0.5, 0.5);
        let tri = [Vec2::new(0.0, 0.8), Vec2::new(0.7, -0.4), Vec2::new(-0.7, -0.4)];
        let tri = Shape::Poly(Poly::new(&tri).unwrap());
        let cases = [
            (placed(&sq, 0.0, 0.0, 0.3), placed(&tri, 0.9, 0.2, -0.1), Vec2::new(0.4, 0.1)),
            (placed(&tri, 0.0, 0.0, 1.0), placed(&sq, 0.3, 0.7, 0.0), Vec2::ZERO),
            (placed(&sq, 0.0, 0.0, 0.0), placed(&tri, 3.0, 0.1, 0.5), Vec2::new(3.0, 0.0)),
            (placed(&sq, 0.0, 0.0, 0.0), placed(&tri, 3.0, 3.0, 0.0), Vec2::new(0.5, 0.0)),
        ];
        for (a, b, travel) in cases.iter() {
            let ab = shape_sweep(a, b, *travel, EPSILON);
            let ba = shape_sweep(b, a, -*travel, EPSILON);
            assert_eq!(ab.is_some(), ba.is_some());
            if let (Some(ab), Some(ba)) = (ab, ba) {
                assert_abs_diff_eq!(ab.normal, -ba.normal, epsilon = 1e-4);
                assert_abs_diff_eq!(ab.depth, ba.depth, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn disjoint_bounding_boxes_never_collide() {
        let tri = [Vec2::new(0.0, 1.0), Vec2::new(1.0, -1.0), Vec2::new(-1.0, -1.0)];
        let tri = Shape::Poly(Poly::new(&tri).unwrap());
        let sq = rect(0.7, 0.3);
        for i in 0..32 {
            let ra = i as Fp * 0.4;
            let rb = i as Fp * -0.7;
            let ta = Transform::new(Vec2::ZERO, ra);
            let tb = Transform::new(Vec2::new(1.2, 0.9), rb);
            let bba = tri.bounding_box(ra).translate(ta.pos);
            let bbb = sq.bounding_box(rb).translate(tb.pos);
            if !bba.aabb_test(&bbb) {
                let (a, b) = (Placed::new(&tri, &ta), Placed::new(&sq, &tb));
                assert!(shape_sweep(&a, &b, Vec2::ZERO, EPSILON).is_none());
            }
        }
    }

    #[test]
    fn near_parallel_faces_keep_their_own_axes() {
        let ground = Shape::Poly(
            Poly::new(&[
                Vec2::new(-50.0, 0.0),
                Vec2::new(50.0, 0.0),
                Vec2::new(50.0, -1.0),
                Vec2::new(-50.0, -1.0),
            ])
            .unwrap(),
        );
        let plank = rect(100.0, 0.05);
        let g = placed(&ground, 0.0, 0.0, 0.0);

        // the tilted underside clears both top corners of the ground by about 0.01,
        // while the world-y extents still overlap
        let p = placed(&plank, 0.0, 0.1, 0.0008);
        assert!(shape_sweep(&g, &p, Vec2::ZERO, EPSILON).is_none());
        assert!(shape_sweep(&p, &g, Vec2::ZERO, EPSILON).is_none());

        let p = placed(&plank, 0.0, 0.03, 0.0008);
        let gp = shape_sweep(&g, &p, Vec2::ZERO, EPSILON).unwrap();
        let pg = shape_sweep(&p, &g, Vec2::ZERO, EPSILON).unwrap();
        assert_abs_diff_eq!(gp.normal, -pg.normal, epsilon = 1e-4);
        assert_abs_diff_eq!(gp.penetration, pg.penetration, epsilon = 1e-4);
        assert_abs_diff_eq!(gp.normal, Vec2::new(0.0, -1.0), epsilon = 1e-3);
    }

    #[test]
    fn fast_body_does_not_tunnel() {
        let bullet = rect(0.1, 0.1);
        let wall = rect(0.05, 2.0);
        let a = placed(&bullet, 0.0, 0.0, 0.0);
        let b = placed(&wall, 2.0, 0.0, 0.0);

        // ends the step at x = 5, well past the wall
        let travel = Vec2::new(50.0, 0.0) * 0.1;
        assert!(shape_sweep(&placed(&bullet, 5.0, 0.0, 0.0), &b, Vec2::ZERO, EPSILON).is_none());
        let hit = shape_sweep(&a, &b, travel, EPSILON).unwrap();
        assert_abs_diff_eq!(hit.normal, Vec2::new(-1.0, 0.0), epsilon = 1e-5);
        assert_eq!(hit.penetration, 0.0);
    }

    #[test]
    fn circles() {
        let c = Shape::Circle(Circle::new(Vec2::ZERO, 0.5).unwrap());
        let a = placed(&c, 0.0, 0.0, 0.0);
        let b = placed(&c, 0.8, 0.0, 0.0);
        let hit = shape_sweep(&a, &b, Vec2::ZERO, EPSILON).unwrap();
        assert_abs_diff_eq!(hit.normal, Vec2::new(-1.0, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(hit.penetration, 0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.contact.point(), Vec2::new(0.5, 0.0), epsilon = 1e-5);

        // diagonal misses that a box test would accept
        let b = placed(&c, 0.8, 0.8, 0.0);
        assert!(shape_sweep(&a, &b, Vec2::ZERO, EPSILON).is_none());

        // concentric circles still produce a normal
        let hit = shape_sweep(&a, &a, Vec2::ZERO, EPSILON).unwrap();
        assert_abs_diff_eq!(hit.normal.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn circle_against_poly_corner() {
        let c = Shape::Circle(Circle::new(Vec2::ZERO, 0.5).unwrap());
        let sq = rect(0.5, 0.5);
        let b = placed(&sq, 0.0, 0.0, 0.0);

        // near the corner, outside the circle's reach
        let a = placed(&c, 0.9, 0.9, 0.0);
        assert!(shape_sweep(&a, &b, Vec2::ZERO, EPSILON).is_none());
        assert!(shape_sweep(&b, &a, Vec2::ZERO, EPSILON).is_none());

        let a = placed(&c, 0.8, 0.8, 0.0);
        let hit = shape_sweep(&a, &b, Vec2::ZERO, EPSILON).unwrap();
        let diag = (0.5 as Fp).sqrt();
        assert_abs_diff_eq!(hit.normal, Vec2::new(diag, diag), epsilon = 1e-4);

        // falling onto the top face
        let a = placed(&c, 0.0, 1.2, 0.0);
        let hit = shape_sweep(&a, &b, Vec2::new(0.0, -0.5), EPSILON).unwrap();
        assert_abs_diff_eq!(hit.normal, Vec2::new(0.0, 1.0), epsilon = 1e-5);
        assert_abs_diff_eq!(hit.contact.point(), Vec2::new(0.0, 0.7), epsilon = 1e-5);
    }

    #[test]
    fn face_face_contact_spans_the_overlap() {
        let small = rect(0.5, 0.5);
        let ground = rect(5.0, 0.5);
        let a = placed(&small, 1.0, 0.95, 0.0);
        let b = placed(&ground, 0.0, 0.0, 0.0);
        let hit = shape_sweep(&a, &b, Vec2::ZERO, EPSILON).unwrap();
        assert_abs_diff_eq!(hit.normal, Vec2::new(0.0, 1.0), epsilon = 1e-5);
        assert_eq!(hit.contact.is_face(), true);
        let mut xs: Vec<Fp> = hit.contact.points().iter().map(|p| p.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_abs_diff_eq!(xs[0], 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(xs[1], 1.5, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.contact.point(), Vec2::new(1.0, 0.45), epsilon = 1e-5);

        // a tilted box lands on a corner
        let a = placed(&small, 0.0, 1.1, 0.5);
        let hit = shape_sweep(&a, &b, Vec2::new(0.0, -0.3), EPSILON).unwrap();
        assert_eq!(hit.contact.is_face(), false);
    }

    #[test]
    fn body_sweep_picks_deepest_pair_and_skips_stale_shapes() {
        let mut shapes = ShapeSet::with_capacity(8, 64);
        let left = shapes.insert(rect(0.5, 0.5)).unwrap();
        let right = shapes.insert(Shape::Poly(Poly::new(&[
            Vec2::new(1.5, 0.5), Vec2::new(2.5, 0.5), Vec2::new(2.5, -0.5), Vec2::new(1.5, -0.5),
        ]).unwrap())).unwrap();
        let wall = shapes.insert(rect(0.5, 2.0)).unwrap();

        let mut b1 = Body::new(&BodyDef::default());
        b1.shapes.push(left);
        b1.shapes.push(right);
        let mut b2 =
            Body::new(&BodyDef { pos: Vec2::new(2.8, 0.0), mass: 0.0, ..Default::default() });
        b2.shapes.push(wall);

        let data = body_sweep(&shapes, &b1, &b2, 1.0, EPSILON).unwrap();
        assert_eq!(data.b1_shape, right);
        assert_eq!(data.b2_shape, wall);
        assert_abs_diff_eq!(data.hit.penetration, 0.2, epsilon = 1e-5);

        shapes.remove(right);
        assert!(body_sweep(&shapes, &b1, &b2, 1.0, EPSILON).is_none());
        b1.movement.vel = Vec2::new(2.0, 0.0);
        let data = body_sweep(&shapes, &b1, &b2, 1.0, EPSILON).unwrap();
        assert_eq!(data.b1_shape, left);
        assert_abs_diff_eq!(data.hit.normal, Vec2::new(-1.0, 0.0), epsilon = 1e-5);
    }
}
