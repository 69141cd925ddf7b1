//! Recycling storage for entities.
//!
//! The backing array is split in two: `entities[..free_index]` are active,
//! `entities[free_index..]` are free for reuse. Obtaining takes the first free
//! slot, releasing swaps the entity with the last active one. Both are O(1)
//! and never shrink the array.
//!
//! Every pass over the active entities walks from the highest index down. A
//! release only disturbs the released slot and `free_index - 1`, both of
//! which are at or above the cursor, so callbacks may release entities (or
//! obtain new ones) while a pass is running.

use std::sync::Arc;

use tracing::{debug, error, trace, warn};

use crate::config::{EntityConfig, PoolConfig};
use crate::entity::{
    Entity, EntityId, EntityIdAllocator, EntityModel, EntityRef, NoView, PoolId, View,
};
use crate::error::{EntityError, Result};
use crate::physics::Physics;
use crate::shapes::ShapeFactory;

type ViewFactory<V> = Box<dyn FnMut(EntityId) -> V + Send>;

/// Step a reverse cursor, clamped to the current active count.
///
/// Returns the next index to visit, or `None` once the cursor reaches zero.
#[inline]
fn step_back(cursor: &mut usize, free_index: usize) -> Option<usize> {
    *cursor = (*cursor).min(free_index);
    if *cursor == 0 {
        return None;
    }
    *cursor -= 1;
    Some(*cursor)
}

/// A group of recycled entities sharing physics and shape strategies.
pub struct EntityPool<V: View = NoView> {
    id: PoolId,
    name: String,
    entities: Vec<Entity<V>>,
    /// Creation slot to current index in `entities`.
    locations: Vec<usize>,
    free_index: usize,
    log_creation: bool,
    ids: EntityIdAllocator,
    physics: Arc<dyn Physics>,
    shape_factory: Arc<dyn ShapeFactory>,
    view_factory: Option<ViewFactory<V>>,
}

impl EntityPool<NoView> {
    /// A pool of view-less entities.
    pub fn new(config: PoolConfig) -> Self {
        Self::build(config, None)
    }
}

impl<V: View> EntityPool<V> {
    /// A pool whose entities each get a view from `view_factory`.
    pub fn with_views(
        config: PoolConfig,
        view_factory: impl FnMut(EntityId) -> V + Send + 'static,
    ) -> Self {
        Self::build(config, Some(Box::new(view_factory)))
    }

    fn build(config: PoolConfig, view_factory: Option<ViewFactory<V>>) -> Self {
        let mut pool = Self {
            id: PoolId::next(),
            name: config.name,
            entities: Vec::with_capacity(config.init_count),
            locations: Vec::with_capacity(config.init_count),
            free_index: 0,
            log_creation: false,
            ids: config.ids,
            physics: config.physics,
            shape_factory: config.shape_factory,
            view_factory,
        };

        for _ in 0..config.init_count {
            pool.create();
        }
        pool.log_creation = config.init_count > 0;

        debug!(
            "Created entity pool '{}' ({}) with {} entities",
            pool.name, pool.id, config.init_count
        );
        pool
    }

    fn create(&mut self) -> usize {
        let index = self.entities.len();
        let uid = self.ids.next_id();
        if self.log_creation {
            warn!(
                "Entity pool '{}' grew past its initial size: created entity {} (total {})",
                self.name,
                uid,
                index + 1
            );
        }

        let handle = EntityRef {
            pool: self.id,
            slot: index as u32,
            uid,
        };
        let model = EntityModel::new(
            uid,
            Arc::clone(&self.physics),
            Arc::clone(&self.shape_factory),
        );
        let view = self.view_factory.as_mut().map(|factory| factory(uid));

        self.entities.push(Entity::new(handle, index, model, view));
        self.locations.push(index);
        index
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Activate a recycled entity (or a new one if none is free) and reset it
    /// from `config`.
    pub fn obtain(&mut self, config: &EntityConfig) -> &mut Entity<V> {
        if self.free_index == self.entities.len() {
            self.create();
        }
        let index = self.free_index;
        self.free_index += 1;

        let entity = &mut self.entities[index];
        entity.activate();
        entity.reset(config);
        trace!(pool = %self.name, entity = %entity.uid(), index, "obtain");
        entity
    }

    /// Return an entity to the free region.
    ///
    /// `Ok(false)` when it was already free. Handles from another pool are
    /// rejected.
    pub fn release(&mut self, handle: EntityRef) -> Result<bool> {
        let index = self.locate(handle)?;
        if index >= self.free_index {
            return Ok(false);
        }

        let last = self.free_index - 1;
        self.swap(index, last);
        self.free_index = last;
        self.entities[last].deactivate();
        trace!(pool = %self.name, entity = %handle.uid, index, "release");
        Ok(true)
    }

    /// Release every active entity.
    pub fn release_all(&mut self) {
        let released = self.free_index;
        while self.free_index > 0 {
            self.free_index -= 1;
            self.entities[self.free_index].deactivate();
        }
        debug!("Released {} entities from pool '{}'", released, self.name);
    }

    /// Same as [`release_all`](Self::release_all).
    pub fn reset(&mut self) {
        self.release_all();
    }

    /// Update every active entity, highest index first.
    pub fn update(&mut self, dt: f32) {
        for entity in self.entities[..self.free_index].iter_mut().rev() {
            entity.update(dt);
        }
    }

    /// Call `f` for each active entity, highest index first.
    ///
    /// `f` gets the pool back and may release or obtain entities.
    pub fn for_each_active_entity(&mut self, mut f: impl FnMut(&mut Self, EntityRef)) {
        let mut cursor = self.free_index;
        while let Some(index) = step_back(&mut cursor, self.free_index) {
            let handle = self.entities[index].handle();
            f(self, handle);
        }
    }

    // ------------------------------------------------------------------
    // Collision queries
    // ------------------------------------------------------------------

    /// First active entity (highest index first) colliding with `model`.
    pub fn get_first_colliding_entity(&self, model: &EntityModel) -> Result<Option<EntityRef>> {
        for entity in self.active_entities().iter().rev() {
            if entity.model().collides_with(model)? {
                return Ok(Some(entity.handle()));
            }
        }
        Ok(None)
    }

    /// All active entities colliding with `model`, highest index first.
    pub fn get_all_colliding_entities(&self, model: &EntityModel) -> Result<Vec<EntityRef>> {
        let mut hits = Vec::new();
        for entity in self.active_entities().iter().rev() {
            if entity.model().collides_with(model)? {
                hits.push(entity.handle());
            }
        }
        Ok(hits)
    }

    /// Call `f` on the first entity colliding with `model`. Returns whether
    /// one was found.
    pub fn on_first_collision(
        &mut self,
        model: &EntityModel,
        f: impl FnOnce(&mut Self, EntityRef),
    ) -> Result<bool> {
        match self.get_first_colliding_entity(model)? {
            Some(hit) => {
                f(self, hit);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Call `f` on every entity colliding with `model`. Returns the number of
    /// calls made.
    pub fn on_all_collisions(
        &mut self,
        model: &EntityModel,
        mut f: impl FnMut(&mut Self, EntityRef),
    ) -> Result<usize> {
        let mut hits = 0;
        let mut cursor = self.free_index;
        while let Some(index) = step_back(&mut cursor, self.free_index) {
            let entity = &self.entities[index];
            if entity.model().collides_with(model)? {
                let handle = entity.handle();
                hits += 1;
                f(self, handle);
            }
        }
        Ok(hits)
    }

    /// For each active entity here, call `f` with its first collision in
    /// `other`. Returns the number of calls made.
    pub fn on_first_pool_collisions<W: View>(
        &mut self,
        other: &mut EntityPool<W>,
        mut f: impl FnMut(&mut Self, EntityRef, &mut EntityPool<W>, EntityRef),
    ) -> Result<usize> {
        let mut hits = 0;
        let mut cursor = self.free_index;
        while let Some(index) = step_back(&mut cursor, self.free_index) {
            let entity = &self.entities[index];
            let handle = entity.handle();
            if let Some(hit) = other.get_first_colliding_entity(entity.model())? {
                hits += 1;
                f(self, handle, other, hit);
            }
        }
        Ok(hits)
    }

    /// Call `f` for every colliding pair between this pool and `other`.
    ///
    /// If `f` releases the entity from this pool, the remaining pairs for
    /// that entity are skipped. Returns the number of calls made.
    pub fn on_all_pool_collisions<W: View>(
        &mut self,
        other: &mut EntityPool<W>,
        mut f: impl FnMut(&mut Self, EntityRef, &mut EntityPool<W>, EntityRef),
    ) -> Result<usize> {
        let mut hits = 0;
        let mut cursor = self.free_index;
        while let Some(index) = step_back(&mut cursor, self.free_index) {
            let handle = self.entities[index].handle();
            let mut inner = other.free_index;
            while let Some(j) = step_back(&mut inner, other.free_index) {
                let Some(current) = self.active_index(handle) else {
                    break;
                };
                let test = &other.entities[j];
                if self.entities[current].model().collides_with(test.model())? {
                    let hit = test.handle();
                    hits += 1;
                    f(self, handle, other, hit);
                }
            }
        }
        Ok(hits)
    }

    /// Resolve a collision between two entities of this pool.
    ///
    /// Returns 0 without moving anything when both handles name the same
    /// entity.
    pub fn resolve_collision(&mut self, a: EntityRef, b: EntityRef) -> Result<f32> {
        match self.pair_mut(a, b)? {
            Some((first, second)) => first.resolve_collision_with(second),
            None => Ok(0.0),
        }
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    pub fn get(&self, handle: EntityRef) -> Option<&Entity<V>> {
        let index = self.index_of(handle)?;
        self.entities.get(index)
    }

    pub fn get_mut(&mut self, handle: EntityRef) -> Option<&mut Entity<V>> {
        let index = self.index_of(handle)?;
        self.entities.get_mut(index)
    }

    /// Two distinct entities of this pool, mutably. `Ok(None)` if `a == b`.
    pub fn pair_mut(
        &mut self,
        a: EntityRef,
        b: EntityRef,
    ) -> Result<Option<(&mut Entity<V>, &mut Entity<V>)>> {
        let ia = self.locate(a)?;
        let ib = self.locate(b)?;
        if ia == ib {
            return Ok(None);
        }

        let (lo, hi) = (ia.min(ib), ia.max(ib));
        let (head, tail) = self.entities.split_at_mut(hi);
        let (low, high) = (&mut head[lo], &mut tail[0]);
        Ok(Some(if ia < ib { (low, high) } else { (high, low) }))
    }

    /// Whether `handle` names an active entity of this pool.
    pub fn is_active(&self, handle: EntityRef) -> bool {
        self.active_index(handle).is_some()
    }

    /// Number of active entities.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.free_index
    }

    /// Number of entities ever constructed by this pool.
    #[inline]
    pub fn total_count(&self) -> usize {
        self.entities.len()
    }

    /// Every entity, active ones first.
    #[inline]
    pub fn entities(&self) -> &[Entity<V>] {
        &self.entities
    }

    #[inline]
    pub fn active_entities(&self) -> &[Entity<V>] {
        &self.entities[..self.free_index]
    }

    #[inline]
    pub fn id(&self) -> PoolId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    // ------------------------------------------------------------------
    // Internal
    // ------------------------------------------------------------------

    #[inline]
    fn index_of(&self, handle: EntityRef) -> Option<usize> {
        if handle.pool != self.id {
            return None;
        }
        self.locations.get(handle.slot as usize).copied()
    }

    #[inline]
    fn active_index(&self, handle: EntityRef) -> Option<usize> {
        self.index_of(handle).filter(|&index| index < self.free_index)
    }

    fn locate(&self, handle: EntityRef) -> Result<usize> {
        self.index_of(handle).ok_or_else(|| {
            error!(
                "Entity {} from pool {} was passed to pool '{}' ({})",
                handle.uid, handle.pool, self.name, self.id
            );
            EntityError::ForeignEntity {
                entity: handle.uid,
                owner: handle.pool,
                pool: self.id,
            }
        })
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entities.swap(a, b);
        for index in [a, b] {
            let entity = &mut self.entities[index];
            entity.set_pool_index(index);
            self.locations[entity.handle().slot as usize] = index;
        }
    }
}

impl<V: View> std::fmt::Debug for EntityPool<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityPool")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("active", &self.free_index)
            .field("total", &self.entities.len())
            .finish_non_exhaustive()
    }
}
