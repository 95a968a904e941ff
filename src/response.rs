//! Impulse-based collision response.

use crate::{narrow::swept::Collision, Body, Fp, Vec2, EPSILON};

/// Velocity and position changes applied to one body of a resolved pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Response {
    pub impulse: Vec2,
    pub offset: Vec2,
}

pub fn resolve(c: &Collision, a: &mut Body, b: &mut Body) {
    //! Resolves `c`, where `a` and `b` are the bodies named by `c.a` and `c.b`.
    //!
    //! Static pairs are ignored. A static `a` is resolved from `b`'s perspective,
    //! so immovable bodies are never written to.
    match (a.is_static(), b.is_static()) {
        (true, true) => (),
        (true, false) => apply(&c.invert(), b, a),
        _ => apply(c, a, b),
    }
}

fn apply(c: &Collision, a: &mut Body, b: &mut Body) {
    let (ra, rb) = respond(c, a, b);
    a.movement.vel += ra.impulse;
    a.transform.pos += ra.offset;
    if !b.is_static() {
        b.movement.vel += rb.impulse;
        b.transform.pos += rb.offset;
    }
}

pub fn respond(c: &Collision, a: &Body, b: &Body) -> (Response, Response) {
    //! Computes the response of both bodies without applying it.
    let (ia, ib) = (a.mass.inv, b.mass.inv);
    let inv_sum = ia + ib;
    if inv_sum <= 0.0 {
        return (Response::default(), Response::default());
    }
    let n = c.normal;

    // positional correction, split by inverse mass
    let offset = c.mtv() / inv_sum;
    let mut ra = Response { impulse: Vec2::ZERO, offset: offset * ia };
    let mut rb = Response { impulse: Vec2::ZERO, offset: -offset * ib };

    let rv = a.movement.vel - b.movement.vel;
    let vn = rv.dot(n);
    if vn >= 0.0 {
        return (ra, rb); // already separating
    }

    let e = a.material.mix_restitution(&b.material);
    let j = -(1.0 + e) * vn / inv_sum;
    let mut impulse = n * j;

    // coulomb friction against the tangential relative velocity
    let tangent = rv - n * vn;
    let slide = tangent.length();
    if slide > EPSILON {
        let (mu_dynamic, mu_static) = a.material.mix_friction(&b.material);
        let stop = slide / inv_sum;
        let jt: Fp = if stop <= mu_static * j { stop } else { mu_dynamic * j };
        impulse -= tangent / slide * jt;
    }

    ra.impulse = impulse * ia;
    rb.impulse = -impulse * ib;
    (ra, rb)
}
