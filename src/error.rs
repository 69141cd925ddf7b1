//! Error types shared by the collision engine and entity pools.

use thiserror::Error;

use crate::entity::{EntityId, PoolId};
use crate::shapes::ShapeKind;

/// Collision operation that failed to find a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOp {
    Collide,
    Resolve,
    Inside,
}

impl std::fmt::Display for CollisionOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CollisionOp::Collide => "collide",
            CollisionOp::Resolve => "resolve",
            CollisionOp::Inside => "inside",
        };
        f.write_str(name)
    }
}

/// Errors raised by collision dispatch and pool bookkeeping.
///
/// Degenerate shapes are not errors; see [`EntityModel::validate`](crate::EntityModel::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityError {
    /// Only rectangles and circles take part in collision handling.
    #[error("no {op} handler for {first} and {second}")]
    UnsupportedShapePair {
        op: CollisionOp,
        first: ShapeKind,
        second: ShapeKind,
    },

    /// A handle minted by another pool was passed to this one.
    #[error("entity {entity} belongs to pool {owner}, not pool {pool}")]
    ForeignEntity {
        entity: EntityId,
        owner: PoolId,
        pool: PoolId,
    },
}

pub type Result<T> = std::result::Result<T, EntityError>;
