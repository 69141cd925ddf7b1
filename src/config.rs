//! Configuration for entities and pools.

use std::sync::Arc;

use crate::entity::EntityIdAllocator;
use crate::physics::{DefaultPhysics, Physics};
use crate::shapes::{DefaultShapeFactory, ShapeFactory};

/// Options applied by [`EntityModel::reset`](crate::EntityModel::reset) and
/// [`EntityPool::obtain`](crate::EntityPool::obtain).
///
/// The hit shape is a circle when `radius` is set (or `circle` is requested),
/// a line when `x2`/`y2` are set, and a rectangle otherwise. Missing
/// dimensions are filled in from the asset size lookup keyed by `image` or
/// `url`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntityConfig {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub ax: f32,
    pub ay: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub radius: Option<f32>,
    /// Derive a circle from the image size when `radius` is absent.
    pub circle: bool,
    pub x2: Option<f32>,
    pub y2: Option<f32>,
    /// Hit-shape anchor relative to the entity position.
    pub offset_x: f32,
    pub offset_y: f32,
    pub fixed: bool,
    pub image: Option<String>,
    pub url: Option<String>,
}

impl EntityConfig {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    pub fn with_acceleration(mut self, ax: f32, ay: f32) -> Self {
        self.ax = ax;
        self.ay = ay;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_offset(mut self, offset_x: f32, offset_y: f32) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    /// Line hit shape from the entity position to `(x2, y2)`.
    pub fn with_line_to(mut self, x2: f32, y2: f32) -> Self {
        self.x2 = Some(x2);
        self.y2 = Some(y2);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn circular(mut self) -> Self {
        self.circle = true;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Whether the hit shape will be a circle.
    pub fn is_circle(&self) -> bool {
        self.circle || self.radius.is_some()
    }
}

/// Construction options for an [`EntityPool`](crate::EntityPool).
#[derive(Clone)]
pub struct PoolConfig {
    /// Label used in log output.
    pub name: String,
    /// Entities to construct up front. When non-zero, every later
    /// construction is logged as a sign the pool was undersized.
    pub init_count: usize,
    pub ids: EntityIdAllocator,
    pub physics: Arc<dyn Physics>,
    pub shape_factory: Arc<dyn ShapeFactory>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: "Entity".to_string(),
            init_count: 0,
            ids: EntityIdAllocator::default(),
            physics: Arc::new(DefaultPhysics),
            shape_factory: Arc::new(DefaultShapeFactory::default()),
        }
    }
}

impl PoolConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_init_count(mut self, init_count: usize) -> Self {
        self.init_count = init_count;
        self
    }

    /// Share an id allocator so uids stay unique across pools.
    pub fn with_ids(mut self, ids: EntityIdAllocator) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_physics(mut self, physics: Arc<dyn Physics>) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_shape_factory(mut self, shape_factory: Arc<dyn ShapeFactory>) -> Self {
        self.shape_factory = shape_factory;
        self
    }
}

impl std::fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolConfig")
            .field("name", &self.name)
            .field("init_count", &self.init_count)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}
