//! entities2d
//!
//! Pooled 2D game entities with half-step kinematics and rect/circle
//! collision handling.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **shapes** - Hit-bounds primitives (rect, circle, line) and the shape factory
//! 2. **physics** - Kinematic integration and the collision engine
//! 3. **entity** - Entity model, view role, ids and handles
//! 4. **pool** - O(1) obtain/release storage with batch collision queries
//! 5. **config** - Entity and pool configuration
//!
//! A typical tick calls [`EntityPool::update`] on each pool, then runs the
//! collision queries it needs and resolves or releases the hits.
//!
//! ```
//! use entities2d::{EntityConfig, EntityPool, PoolConfig};
//!
//! let mut balls = EntityPool::new(PoolConfig::named("balls"));
//! let ball = balls
//!     .obtain(&EntityConfig::at(0.0, 0.0).with_radius(4.0).with_velocity(10.0, 0.0))
//!     .handle();
//!
//! balls.update(1.0 / 60.0);
//! assert!(balls.get(ball).unwrap().model().x() > 0.0);
//! assert_eq!(balls.release(ball), Ok(true));
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod physics;
pub mod pool;
pub mod shapes;

// Re-export commonly used types
pub use config::{EntityConfig, PoolConfig};

pub use entity::{
    Entity, EntityId, EntityIdAllocator, EntityModel, EntityRef, NoView, PoolId, View,
};

pub use error::{CollisionOp, EntityError, Result};

pub use physics::{DefaultPhysics, Kinematics, Physics, COLLISION_OFFSET};

pub use pool::EntityPool;

pub use shapes::{
    AssetSizeLookup, Bounds, Circle, DefaultShapeFactory, ImageMap, ImageSize, Line, Rect, Shape,
    ShapeFactory, ShapeKind,
};

// Re-export glam for convenience
pub use glam;
