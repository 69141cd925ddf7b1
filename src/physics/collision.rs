//! Discrete collision detection and resolution for rectangles and circles.
//!
//! Every function here is pure apart from the shapes it is handed to move.
//! These are not continuous tests: a large `dt` can carry shapes through
//! each other between ticks.
//!
//! Resolvers assume the pair is already known to collide. Calling them on a
//! separated pair is harmless but the returned distance is meaningless.

use glam::Vec2;
use tracing::error;

use crate::error::{CollisionOp, EntityError, Result};
use crate::shapes::{Bounds, Circle, Rect, Shape};

/// Extra separation added during resolution so resolved shapes do not sit in
/// exact contact and register again on the next pass.
pub const COLLISION_OFFSET: f32 = 0.001;

/// Displacement share of each side: even split, or all on the movable one.
/// `None` when both are fixed.
#[inline]
fn split(fixed_a: bool, fixed_b: bool) -> Option<(f32, f32)> {
    match (fixed_a, fixed_b) {
        (true, true) => None,
        (true, false) => Some((0.0, 1.0)),
        (false, true) => Some((1.0, 0.0)),
        (false, false) => Some((0.5, 0.5)),
    }
}

fn unsupported(op: CollisionOp, a: &Shape, b: &Shape) -> EntityError {
    error!(%op, first = %a.kind(), second = %b.kind(), "no collision handler for shape pair");
    EntityError::UnsupportedShapePair {
        op,
        first: a.kind(),
        second: b.kind(),
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Whether `a` and `b` overlap. Touching counts as overlapping.
pub fn collide(a: &Shape, b: &Shape) -> Result<bool> {
    match (a, b) {
        (Shape::Rect(r1), Shape::Rect(r2)) => Ok(rect_collides_with_rect(r1, r2)),
        (Shape::Rect(r), Shape::Circle(c)) | (Shape::Circle(c), Shape::Rect(r)) => {
            Ok(circle_collides_with_rect(c, r))
        }
        (Shape::Circle(c1), Shape::Circle(c2)) => Ok(circle_collides_with_circle(c1, c2)),
        _ => Err(unsupported(CollisionOp::Collide, a, b)),
    }
}

/// Push `a` and `b` apart. Fixed shapes are never moved. Returns the total
/// distance moved.
pub fn resolve_collision(
    a: &mut Shape,
    fixed_a: bool,
    b: &mut Shape,
    fixed_b: bool,
) -> Result<f32> {
    match (&mut *a, &mut *b) {
        (Shape::Rect(r1), Shape::Rect(r2)) => {
            Ok(resolve_colliding_rects(r1, fixed_a, r2, fixed_b))
        }
        (Shape::Circle(c), Shape::Rect(r)) => {
            Ok(resolve_colliding_circle_rect(c, fixed_a, r, fixed_b))
        }
        (Shape::Rect(r), Shape::Circle(c)) => {
            Ok(resolve_colliding_circle_rect(c, fixed_b, r, fixed_a))
        }
        (Shape::Circle(c1), Shape::Circle(c2)) => {
            Ok(resolve_colliding_circles(c1, fixed_a, c2, fixed_b))
        }
        _ => Err(unsupported(CollisionOp::Resolve, a, b)),
    }
}

/// Whether `a` lies entirely within `b`.
pub fn is_inside(a: &Shape, b: &Shape) -> Result<bool> {
    match (a, b) {
        (Shape::Rect(r1), Shape::Rect(r2)) => Ok(rect_inside_rect(r1, r2)),
        (Shape::Rect(r), Shape::Circle(c)) => Ok(rect_inside_circle(r, c)),
        (Shape::Circle(c), Shape::Rect(r)) => Ok(circle_inside_rect(c, r)),
        (Shape::Circle(c1), Shape::Circle(c2)) => Ok(circle_inside_circle(c1, c2)),
        _ => Err(unsupported(CollisionOp::Inside, a, b)),
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

#[inline]
pub fn circle_collides_with_circle(c1: &Circle, c2: &Circle) -> bool {
    let dx = c2.x - c1.x;
    let dy = c2.y - c1.y;
    let dist_coll = c1.radius + c2.radius;
    dx * dx + dy * dy <= dist_coll * dist_coll
}

pub fn circle_collides_with_rect(circle: &Circle, rect: &Rect) -> bool {
    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;
    let dx = (circle.x - (rect.x + half_w)).abs();
    let dy = (circle.y - (rect.y + half_h)).abs();

    if dx > half_w + circle.radius || dy > half_h + circle.radius {
        // Centre too far from the rect on some axis
        false
    } else if dx <= half_w || dy <= half_h {
        // Centre inside the rect's band on some axis
        true
    } else {
        // Nearest rect corner within the radius
        let dcx = dx - half_w;
        let dcy = dy - half_h;
        dcx * dcx + dcy * dcy <= circle.radius * circle.radius
    }
}

#[inline]
pub fn rect_collides_with_rect(r1: &Rect, r2: &Rect) -> bool {
    r1.x <= r2.x + r2.width
        && r1.x + r1.width >= r2.x
        && r1.y <= r2.y + r2.height
        && r1.y + r1.height >= r2.y
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Separate two circles along the line joining their centres.
pub fn resolve_colliding_circles(
    c1: &mut Circle,
    fixed1: bool,
    c2: &mut Circle,
    fixed2: bool,
) -> f32 {
    let Some((mult1, mult2)) = split(fixed1, fixed2) else {
        return 0.0;
    };

    let mut delta = Vec2::new(c2.x - c1.x, c2.y - c1.y);
    let mut dist = delta.length();
    if dist == 0.0 {
        // Concentric: pick +x so the normal is defined
        delta = Vec2::new(COLLISION_OFFSET, 0.0);
        dist = COLLISION_OFFSET;
    }

    let dd = c1.radius + c2.radius + COLLISION_OFFSET - dist;
    let normal = delta / dist;

    c1.x -= mult1 * dd * normal.x;
    c1.y -= mult1 * dd * normal.y;
    c2.x += mult2 * dd * normal.x;
    c2.y += mult2 * dd * normal.y;
    dd
}

/// Separate a circle from a rectangle.
///
/// When the circle's centre lies in one of the rectangle's axis bands the
/// circle is treated as its bounding square and resolved like two rects;
/// otherwise the pair is pushed apart along the line to the nearest corner.
pub fn resolve_colliding_circle_rect(
    circle: &mut Circle,
    circle_fixed: bool,
    rect: &mut Rect,
    rect_fixed: bool,
) -> f32 {
    let radius = circle.radius;
    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;
    let rx = rect.x + half_w;
    let ry = rect.y + half_h;
    let dx = (circle.x - rx).abs();
    let dy = (circle.y - ry).abs();

    let Some((mult_circle, mult_rect)) = split(circle_fixed, rect_fixed) else {
        return 0.0;
    };
    if dx > half_w + radius || dy > half_h + radius {
        return 0.0;
    }

    if dx <= half_w || dy <= half_h {
        let before = circle.bounding_rect();
        let mut square = before;
        let dd = resolve_colliding_rects(rect, rect_fixed, &mut square, circle_fixed);
        circle.x += square.x - before.x;
        circle.y += square.y - before.y;
        return dd;
    }

    let corner = Vec2::new(
        if circle.x < rx { rx - half_w } else { rx + half_w },
        if circle.y < ry { ry - half_h } else { ry + half_h },
    );
    let delta = corner - Vec2::new(circle.x, circle.y);
    let dist = delta.length();
    let dd = radius + COLLISION_OFFSET - dist;
    if dd <= 0.0 {
        return 0.0;
    }
    let normal = delta / dist;

    circle.x -= mult_circle * dd * normal.x;
    circle.y -= mult_circle * dd * normal.y;
    rect.x += mult_rect * dd * normal.x;
    rect.y += mult_rect * dd * normal.y;
    dd
}

/// Shallowest penetration along one axis, as a non-positive step, or `None`
/// when the spans do not overlap.
#[inline]
fn axis_overlap(min1: f32, max1: f32, min2: f32, max2: f32) -> Option<f32> {
    let d1 = min1 - max2;
    let d2 = min2 - max1;
    if d1 > 0.0 || d2 > 0.0 {
        return None;
    }
    Some(d1.max(d2) - COLLISION_OFFSET)
}

/// Separate two rectangles along the axis of least penetration only.
///
/// Resolving one axis at a time lets a falling box land on a platform instead
/// of being pushed out diagonally.
pub fn resolve_colliding_rects(r1: &mut Rect, fixed1: bool, r2: &mut Rect, fixed2: bool) -> f32 {
    let Some((mult1, mult2)) = split(fixed1, fixed2) else {
        return 0.0;
    };

    let b1 = r1.bounds();
    let b2 = r2.bounds();
    let (Some(ox), Some(oy)) = (
        axis_overlap(b1.min_x, b1.max_x, b2.min_x, b2.max_x),
        axis_overlap(b1.min_y, b1.max_y, b2.min_y, b2.max_y),
    ) else {
        return 0.0;
    };

    // Both are <= 0; the larger one is the shallower overlap
    let (dx, dy) = if ox > oy { (ox, 0.0) } else { (0.0, oy) };

    let c1 = r1.center();
    let c2 = r2.center();
    let sign = if (dx != 0.0 && c1.x > c2.x) || (dy != 0.0 && c1.y > c2.y) {
        -1.0
    } else {
        1.0
    };

    r1.x += mult1 * sign * dx;
    r1.y += mult1 * sign * dy;
    r2.x -= mult2 * sign * dx;
    r2.y -= mult2 * sign * dy;

    // One term is always zero
    dx.abs() + dy.abs()
}

// ---------------------------------------------------------------------------
// Containment
// ---------------------------------------------------------------------------

/// All four corners of `bounds` satisfy `contains`.
#[inline]
fn corners_inside(bounds: Bounds, contains: impl Fn(f32, f32) -> bool) -> bool {
    bounds.corners().iter().all(|p| contains(p.x, p.y))
}

pub fn rect_inside_rect(inner: &Rect, outer: &Rect) -> bool {
    corners_inside(inner.bounds(), |x, y| outer.contains(x, y))
}

pub fn rect_inside_circle(inner: &Rect, outer: &Circle) -> bool {
    corners_inside(inner.bounds(), |x, y| outer.contains(x, y))
}

/// Uses the circle's bounding square, so a circle can be reported outside a
/// rect it technically fits in only at the corners; never the reverse.
pub fn circle_inside_rect(inner: &Circle, outer: &Rect) -> bool {
    corners_inside(inner.bounds(), |x, y| outer.contains(x, y))
}

/// Bounding-square approximation, stricter than the exact disc test.
pub fn circle_inside_circle(inner: &Circle, outer: &Circle) -> bool {
    corners_inside(inner.bounds(), |x, y| outer.contains(x, y))
}
