//! Circle geometry helpers
//!
//! Everything in the simulation is a circle, so collision, homing and overlap
//! resolution reduce to a handful of centre-distance computations. None of these
//! may produce NaN: coincident centres yield a zero direction.

use glam::Vec2;

/// Squared distances below this are treated as coincident centres
pub const COINCIDENT_EPSILON_SQ: f32 = 1e-8;

/// Distance between two centres
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// True if two circles strictly overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    distance(a, b) < ra + rb
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn unit_toward(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    if delta.length_squared() < COINCIDENT_EPSILON_SQ {
        Vec2::ZERO
    } else {
        delta.normalize_or_zero()
    }
}

/// Symmetric separation for two overlapping circles
///
/// Returns the displacement to add to `a`; `b` receives the negation. Each
/// circle moves half the overlap along the centre line, so afterwards the
/// centres sit exactly `ra + rb` apart. Returns `None` if the circles do not
/// overlap or their centres coincide (no separating axis exists).
pub fn separation(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<Vec2> {
    let delta = a - b;
    let dist_sq = delta.length_squared();
    if dist_sq < COINCIDENT_EPSILON_SQ {
        return None;
    }
    let dist = dist_sq.sqrt();
    let overlap = ra + rb - dist;
    if overlap <= 0.0 {
        return None;
    }
    Some(delta / dist * (overlap * 0.5))
}

/// Clamp a circle centre so the circle stays inside `[0, size]` on both axes
#[inline]
pub fn clamp_to_bounds(pos: Vec2, radius: f32, size: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(radius, size.x - radius),
        pos.y.clamp(radius, size.y - radius),
    )
}
