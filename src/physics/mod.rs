//! Kinematics and collision handling for entity models.
//!
//! # Architecture
//!
//! Each tick an active model:
//!
//! 1. Records its previous position
//! 2. Integrates position and velocity ([`kinematics::integrate`])
//! 3. Re-anchors its hit shape
//!
//! Collision queries are issued by the caller afterwards, pair by pair, and go
//! through [`Physics`] to the shape-level functions in [`collision`].

pub mod collision;
pub mod kinematics;

pub use collision::COLLISION_OFFSET;
pub use kinematics::Kinematics;

use crate::error::Result;
use crate::shapes::Shape;

/// Strategy used by entity models for integration and collision handling.
///
/// [`DefaultPhysics`] covers rectangles and circles. Implementations can be
/// swapped per pool through [`PoolConfig`](crate::PoolConfig) or per entity
/// through [`EntityModel::set_physics`](crate::EntityModel::set_physics).
pub trait Physics: Send + Sync {
    /// Advance kinematic state by `dt` seconds.
    fn step(&self, kinematics: &mut Kinematics, dt: f32);

    fn collide(&self, a: &Shape, b: &Shape) -> Result<bool>;

    /// Separate two colliding shapes, moving only the non-fixed ones.
    /// Returns the total distance moved.
    fn resolve_collision(
        &self,
        a: &mut Shape,
        fixed_a: bool,
        b: &mut Shape,
        fixed_b: bool,
    ) -> Result<f32>;

    /// Whether `a` lies entirely within `b`.
    fn is_inside(&self, a: &Shape, b: &Shape) -> Result<bool>;
}

/// Half-step integration with the rect/circle collision engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPhysics;

impl Physics for DefaultPhysics {
    #[inline]
    fn step(&self, kinematics: &mut Kinematics, dt: f32) {
        kinematics::integrate(kinematics, dt);
    }

    #[inline]
    fn collide(&self, a: &Shape, b: &Shape) -> Result<bool> {
        collision::collide(a, b)
    }

    #[inline]
    fn resolve_collision(
        &self,
        a: &mut Shape,
        fixed_a: bool,
        b: &mut Shape,
        fixed_b: bool,
    ) -> Result<f32> {
        collision::resolve_collision(a, fixed_a, b, fixed_b)
    }

    #[inline]
    fn is_inside(&self, a: &Shape, b: &Shape) -> Result<bool> {
        collision::is_inside(a, b)
    }
}
