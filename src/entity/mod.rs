//! Pooled game entities.
//!
//! An [`Entity`] pairs an [`EntityModel`] (kinematics and hit shape) with an
//! optional [`View`]. Entities are created and recycled by
//! [`EntityPool`](crate::EntityPool) and addressed through [`EntityRef`]
//! handles.

mod id;
pub mod model;
pub mod view;

pub use id::{EntityId, EntityIdAllocator, PoolId};
pub use model::EntityModel;
pub use view::{NoView, View};

use crate::config::EntityConfig;
use crate::error::Result;

/// Handle to an entity inside a specific pool.
///
/// Handles stay valid for the lifetime of the pool. A handle to a released
/// entity still resolves, but [`EntityPool::is_active`](crate::EntityPool::is_active)
/// reports it inactive until the entity is obtained again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub(crate) pool: PoolId,
    pub(crate) slot: u32,
    pub(crate) uid: EntityId,
}

impl EntityRef {
    #[inline]
    pub fn pool(&self) -> PoolId {
        self.pool
    }

    #[inline]
    pub fn uid(&self) -> EntityId {
        self.uid
    }
}

/// A model plus its view, living in one slot of a pool.
pub struct Entity<V: View = NoView> {
    handle: EntityRef,
    pool_index: usize,
    active: bool,
    model: EntityModel,
    view: Option<V>,
}

impl<V: View> Entity<V> {
    pub(crate) fn new(
        handle: EntityRef,
        pool_index: usize,
        model: EntityModel,
        view: Option<V>,
    ) -> Self {
        Self {
            handle,
            pool_index,
            active: false,
            model,
            view,
        }
    }

    pub(crate) fn set_pool_index(&mut self, pool_index: usize) {
        self.pool_index = pool_index;
    }

    pub(crate) fn activate(&mut self) {
        self.active = true;
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
        if let Some(view) = self.view.as_mut() {
            view.hide();
        }
    }

    /// Reset model and view from `config`. Returns whether the model is valid.
    pub fn reset(&mut self, config: &EntityConfig) -> bool {
        let valid = self.model.reset(config);
        if let Some(view) = self.view.as_mut() {
            view.reset(&self.model, config);
        }
        valid
    }

    pub fn update(&mut self, dt: f32) {
        self.model.update(dt);
        if let Some(view) = self.view.as_mut() {
            view.update(&self.model, dt);
        }
    }

    pub fn collides_with(&self, other: &impl AsRef<EntityModel>) -> Result<bool> {
        self.model.collides_with(other.as_ref())
    }

    pub fn resolve_collision_with(&mut self, other: &mut impl AsMut<EntityModel>) -> Result<f32> {
        self.model.resolve_collision_with(other.as_mut())
    }

    pub fn is_inside(&self, other: &impl AsRef<EntityModel>) -> Result<bool> {
        self.model.is_inside(other.as_ref())
    }

    pub fn show_hit_bounds(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.show_hit_bounds(&self.model);
        }
    }

    pub fn hide_hit_bounds(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.hide_hit_bounds();
        }
    }

    #[inline]
    pub fn uid(&self) -> EntityId {
        self.handle.uid
    }

    #[inline]
    pub fn handle(&self) -> EntityRef {
        self.handle
    }

    /// Current slot in the owning pool's backing array.
    #[inline]
    pub fn pool_index(&self) -> usize {
        self.pool_index
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn model(&self) -> &EntityModel {
        &self.model
    }

    #[inline]
    pub fn model_mut(&mut self) -> &mut EntityModel {
        &mut self.model
    }

    #[inline]
    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    #[inline]
    pub fn view_mut(&mut self) -> Option<&mut V> {
        self.view.as_mut()
    }
}

impl<V: View> AsRef<EntityModel> for Entity<V> {
    fn as_ref(&self) -> &EntityModel {
        &self.model
    }
}

impl<V: View> AsMut<EntityModel> for Entity<V> {
    fn as_mut(&mut self) -> &mut EntityModel {
        &mut self.model
    }
}

impl<V: View> std::fmt::Debug for Entity<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("handle", &self.handle)
            .field("pool_index", &self.pool_index)
            .field("active", &self.active)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::physics::DefaultPhysics;
    use crate::shapes::DefaultShapeFactory;

    #[derive(Default)]
    struct RecordingView {
        resets: usize,
        updates: usize,
        hidden: bool,
        last_x: f32,
        hit_bounds: bool,
    }

    impl View for RecordingView {
        fn reset(&mut self, model: &EntityModel, _config: &EntityConfig) {
            self.resets += 1;
            self.hidden = false;
            self.last_x = model.x();
        }

        fn update(&mut self, model: &EntityModel, _dt: f32) {
            self.updates += 1;
            self.last_x = model.x();
        }

        fn hide(&mut self) {
            self.hidden = true;
        }

        fn show_hit_bounds(&mut self, _model: &EntityModel) {
            self.hit_bounds = true;
        }

        fn hide_hit_bounds(&mut self) {
            self.hit_bounds = false;
        }
    }

    fn entity(uid: u64) -> Entity<RecordingView> {
        let handle = EntityRef {
            pool: PoolId(0),
            slot: 0,
            uid: EntityId(uid),
        };
        let model = EntityModel::new(
            EntityId(uid),
            Arc::new(DefaultPhysics),
            Arc::new(DefaultShapeFactory::default()),
        );
        Entity::new(handle, 0, model, Some(RecordingView::default()))
    }

    #[test]
    fn test_view_follows_model() {
        let mut e = entity(1);
        let config = EntityConfig::at(1.0, 0.0)
            .with_size(2.0, 2.0)
            .with_velocity(2.0, 0.0);
        assert!(e.reset(&config));
        e.activate();

        e.update(1.0);
        let view = e.view().unwrap();
        assert_eq!(view.resets, 1);
        assert_eq!(view.updates, 1);
        assert_eq!(view.last_x, 3.0);

        e.show_hit_bounds();
        assert!(e.view().unwrap().hit_bounds);
        e.hide_hit_bounds();
        assert!(!e.view().unwrap().hit_bounds);

        e.deactivate();
        assert!(!e.is_active());
        assert!(e.view().unwrap().hidden);
    }

    #[test]
    fn test_entities_collide_with_models_and_entities() {
        let mut a = entity(1);
        let mut b = entity(2);
        a.reset(&EntityConfig::at(0.0, 0.0).with_size(10.0, 10.0));
        b.reset(&EntityConfig::at(8.0, 0.0).with_size(10.0, 10.0));

        assert!(a.collides_with(&b).unwrap());
        assert!(a.collides_with(b.model()).unwrap());

        let moved = a.resolve_collision_with(&mut b).unwrap();
        assert!(moved > 2.0);
        assert!(!a.collides_with(&b).unwrap());
        assert_eq!(a.model().y(), 0.0);
    }
}
