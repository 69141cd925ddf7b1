//! Physical state of an entity: kinematics plus a hit shape.

use std::sync::Arc;

use glam::Vec2;
use tracing::warn;

use super::id::EntityId;
use crate::config::EntityConfig;
use crate::error::Result;
use crate::physics::{Kinematics, Physics};
use crate::shapes::{Shape, ShapeFactory};

/// The model half of an entity.
///
/// The hit shape's anchor always sits at `position + offset` after `reset`,
/// `update`, collision resolution and the position setters.
pub struct EntityModel {
    uid: EntityId,
    kinematics: Kinematics,
    previous: Vec2,
    offset: Vec2,
    shape: Shape,
    fixed: bool,
    physics: Arc<dyn Physics>,
    shape_factory: Arc<dyn ShapeFactory>,
}

impl EntityModel {
    /// A zeroed model. Call [`reset`](Self::reset) before use.
    pub fn new(
        uid: EntityId,
        physics: Arc<dyn Physics>,
        shape_factory: Arc<dyn ShapeFactory>,
    ) -> Self {
        Self {
            uid,
            kinematics: Kinematics::default(),
            previous: Vec2::ZERO,
            offset: Vec2::ZERO,
            shape: Shape::default(),
            fixed: false,
            physics,
            shape_factory,
        }
    }

    /// Reinitialize every field from `config`.
    ///
    /// Returns the result of [`validate`](Self::validate); a degenerate shape
    /// still leaves the model usable.
    pub fn reset(&mut self, config: &EntityConfig) -> bool {
        self.kinematics = Kinematics::new(
            Vec2::new(config.x, config.y),
            Vec2::new(config.vx, config.vy),
            Vec2::new(config.ax, config.ay),
        );
        self.previous = self.kinematics.position;
        self.offset = Vec2::new(config.offset_x, config.offset_y);
        self.fixed = config.fixed;
        self.shape = self.shape_factory.shape(config);
        self.sync_shape();
        self.validate()
    }

    /// Advance one tick.
    pub fn update(&mut self, dt: f32) {
        self.previous = self.kinematics.position;
        self.physics.step(&mut self.kinematics, dt);
        self.sync_shape();
    }

    /// False when the hit shape has no usable extent.
    pub fn validate(&self) -> bool {
        if self.shape.is_degenerate() {
            warn!(entity = %self.uid, shape = ?self.shape, "degenerate hit shape");
            return false;
        }
        true
    }

    pub fn collides_with(&self, other: &EntityModel) -> Result<bool> {
        self.physics.collide(&self.shape, &other.shape)
    }

    /// Push `self` and `other` apart. Only meaningful for a pair that
    /// [`collides_with`](Self::collides_with) reported as colliding.
    pub fn resolve_collision_with(&mut self, other: &mut EntityModel) -> Result<f32> {
        let moved = self.physics.resolve_collision(
            &mut self.shape,
            self.fixed,
            &mut other.shape,
            other.fixed,
        )?;
        self.follow_shape();
        other.follow_shape();
        Ok(moved)
    }

    /// Whether this model's hit shape lies within `other`'s.
    pub fn is_inside(&self, other: &EntityModel) -> Result<bool> {
        self.physics.is_inside(&self.shape, &other.shape)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn uid(&self) -> EntityId {
        self.uid
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.kinematics.position.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.kinematics.position.y
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.kinematics.position
    }

    /// Position before the most recent [`update`](Self::update).
    #[inline]
    pub fn previous(&self) -> Vec2 {
        self.previous
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.kinematics.velocity
    }

    #[inline]
    pub fn acceleration(&self) -> Vec2 {
        self.kinematics.acceleration
    }

    #[inline]
    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    #[inline]
    pub fn is_circle(&self) -> bool {
        matches!(self.shape, Shape::Circle(_))
    }

    pub fn width(&self) -> f32 {
        match &self.shape {
            Shape::Rect(r) => r.width,
            Shape::Circle(c) => c.radius * 2.0,
            Shape::Line(l) => l.bounds().width(),
        }
    }

    pub fn height(&self) -> f32 {
        match &self.shape {
            Shape::Rect(r) => r.height,
            Shape::Circle(c) => c.radius * 2.0,
            Shape::Line(l) => l.bounds().height(),
        }
    }

    /// Hit radius; zero for non-circular shapes.
    pub fn radius(&self) -> f32 {
        match &self.shape {
            Shape::Circle(c) => c.radius,
            _ => 0.0,
        }
    }

    pub fn min_x(&self) -> f32 {
        self.shape.bounds().min_x
    }

    pub fn max_x(&self) -> f32 {
        self.shape.bounds().max_x
    }

    pub fn min_y(&self) -> f32 {
        self.shape.bounds().min_y
    }

    pub fn max_y(&self) -> f32 {
        self.shape.bounds().max_y
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.kinematics.position = position;
        self.sync_shape();
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.kinematics.velocity = velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: Vec2) {
        self.kinematics.acceleration = acceleration;
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.sync_shape();
    }

    /// Replace the hit shape. It is re-anchored at `position + offset`.
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.sync_shape();
    }

    /// Override the pool-wide physics strategy for this model.
    pub fn set_physics(&mut self, physics: Arc<dyn Physics>) {
        self.physics = physics;
    }

    #[inline]
    fn sync_shape(&mut self) {
        self.shape.set_anchor(self.kinematics.position + self.offset);
    }

    #[inline]
    fn follow_shape(&mut self) {
        self.kinematics.position = self.shape.anchor() - self.offset;
    }
}

impl std::fmt::Debug for EntityModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityModel")
            .field("uid", &self.uid)
            .field("kinematics", &self.kinematics)
            .field("previous", &self.previous)
            .field("offset", &self.offset)
            .field("shape", &self.shape)
            .field("fixed", &self.fixed)
            .finish_non_exhaustive()
    }
}

impl AsRef<EntityModel> for EntityModel {
    fn as_ref(&self) -> &EntityModel {
        self
    }
}

impl AsMut<EntityModel> for EntityModel {
    fn as_mut(&mut self) -> &mut EntityModel {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityError;
    use crate::physics::{DefaultPhysics, COLLISION_OFFSET};
    use crate::shapes::{Circle, DefaultShapeFactory, Rect};

    fn model(uid: u64, config: &EntityConfig) -> EntityModel {
        let mut model = EntityModel::new(
            EntityId(uid),
            Arc::new(DefaultPhysics),
            Arc::new(DefaultShapeFactory::default()),
        );
        model.reset(config);
        model
    }

    /// Physics that only moves along x, used to check strategy injection.
    struct SlideX;

    impl Physics for SlideX {
        fn step(&self, kinematics: &mut Kinematics, dt: f32) {
            kinematics.position.x += kinematics.velocity.x * dt;
        }

        fn collide(&self, _a: &Shape, _b: &Shape) -> Result<bool> {
            Ok(false)
        }

        fn resolve_collision(
            &self,
            _a: &mut Shape,
            _fixed_a: bool,
            _b: &mut Shape,
            _fixed_b: bool,
        ) -> Result<f32> {
            Ok(0.0)
        }

        fn is_inside(&self, _a: &Shape, _b: &Shape) -> Result<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_reset_builds_rect() {
        let config = EntityConfig::at(3.0, 4.0)
            .with_size(10.0, 20.0)
            .with_velocity(1.0, 2.0);
        let mut m = EntityModel::new(
            EntityId(1),
            Arc::new(DefaultPhysics),
            Arc::new(DefaultShapeFactory::default()),
        );
        assert!(m.reset(&config));
        assert_eq!(m.position(), Vec2::new(3.0, 4.0));
        assert_eq!(m.previous(), m.position());
        assert_eq!(m.velocity(), Vec2::new(1.0, 2.0));
        assert_eq!(*m.shape(), Shape::Rect(Rect::new(3.0, 4.0, 10.0, 20.0)));
        assert_eq!(m.width(), 10.0);
        assert_eq!(m.height(), 20.0);
        assert_eq!(m.max_x(), 13.0);
        assert_eq!(m.max_y(), 24.0);
        assert!(!m.is_circle());
    }

    #[test]
    fn test_zero_radius_fails_validation() {
        let mut m = model(1, &EntityConfig::at(0.0, 0.0).with_radius(5.0));
        assert!(m.validate());

        assert!(!m.reset(&EntityConfig::at(0.0, 0.0).with_radius(0.0)));
        assert!(m.is_circle());
        let other = model(2, &EntityConfig::at(1.0, 1.0).with_radius(0.0));
        // Degenerate but still usable.
        assert!(m.collides_with(&other).is_ok());
    }

    #[test]
    fn test_missing_dimensions_fail_validation() {
        let m = model(1, &EntityConfig::at(0.0, 0.0));
        assert!(!m.validate());
        assert_eq!(m.width(), 0.0);
    }

    #[test]
    fn test_update_tracks_previous_and_shape() {
        let config = EntityConfig::at(0.0, 0.0)
            .with_radius(2.0)
            .with_velocity(4.0, 0.0)
            .with_offset(1.0, 1.0);
        let mut m = model(1, &config);
        assert_eq!(m.shape().anchor(), Vec2::new(1.0, 1.0));

        m.update(0.5);
        assert_eq!(m.previous(), Vec2::ZERO);
        assert_eq!(m.position(), Vec2::new(2.0, 0.0));
        assert_eq!(m.shape().anchor(), Vec2::new(3.0, 1.0));

        m.update(0.5);
        assert_eq!(m.previous(), Vec2::new(2.0, 0.0));
        assert_eq!(m.x(), 4.0);
    }

    #[test]
    fn test_resolve_moves_positions_with_shapes() {
        let mut a = model(1, &EntityConfig::at(0.0, 0.0).with_radius(5.0));
        let mut b = model(2, &EntityConfig::at(6.0, 0.0).with_radius(5.0));
        assert!(a.collides_with(&b).unwrap());

        let moved = a.resolve_collision_with(&mut b).unwrap();
        let eps = 1e-4;
        assert!((moved - (4.0 + COLLISION_OFFSET)).abs() < eps);
        assert!((a.x() - -2.0005).abs() < eps);
        assert!((b.x() - 8.0005).abs() < eps);
        assert!(!a.collides_with(&b).unwrap());
    }

    #[test]
    fn test_resolve_respects_offset() {
        let mut a = model(
            1,
            &EntityConfig::at(0.0, 0.0)
                .with_size(10.0, 10.0)
                .with_offset(2.0, 0.0),
        );
        let mut b = model(2, &EntityConfig::at(10.0, 0.0).with_size(10.0, 10.0).fixed());

        a.resolve_collision_with(&mut b).unwrap();
        assert_eq!(b.position(), Vec2::new(10.0, 0.0));
        let anchor = a.shape().anchor();
        assert!((anchor.x - (-COLLISION_OFFSET)).abs() < 1e-4);
        assert!((a.x() - (anchor.x - 2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_is_inside() {
        let inner = model(1, &EntityConfig::at(2.0, 2.0).with_size(2.0, 2.0));
        let outer = model(2, &EntityConfig::at(0.0, 0.0).with_size(10.0, 10.0));
        assert!(inner.is_inside(&outer).unwrap());
        assert!(!outer.is_inside(&inner).unwrap());
    }

    #[test]
    fn test_line_models_reject_collision() {
        let line = model(1, &EntityConfig::at(0.0, 0.0).with_line_to(10.0, 0.0));
        let rect = model(2, &EntityConfig::at(0.0, 0.0).with_size(5.0, 5.0));
        assert!(line.validate());
        assert!(matches!(
            line.collides_with(&rect),
            Err(EntityError::UnsupportedShapePair { .. })
        ));
    }

    #[test]
    fn test_set_shape_reanchors() {
        let mut m = model(1, &EntityConfig::at(5.0, 5.0).with_size(1.0, 1.0));
        m.set_shape(Shape::Circle(Circle::new(100.0, 100.0, 3.0)));
        assert_eq!(m.shape().anchor(), Vec2::new(5.0, 5.0));
        assert_eq!(m.radius(), 3.0);

        m.set_position(Vec2::new(7.0, 8.0));
        assert_eq!(m.shape().anchor(), Vec2::new(7.0, 8.0));
    }

    #[test]
    fn test_set_physics_overrides_strategy() {
        let config = EntityConfig::at(0.0, 0.0)
            .with_size(1.0, 1.0)
            .with_velocity(2.0, 2.0);
        let mut m = model(1, &config);
        m.set_physics(Arc::new(SlideX));
        m.update(1.0);
        assert_eq!(m.position(), Vec2::new(2.0, 0.0));
    }
}
