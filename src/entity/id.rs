//! Entity and pool identifiers.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

/// Unique entity id, assigned at construction and kept across recycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared, monotonically increasing source of [`EntityId`]s.
///
/// Clones share one counter. Pools built from the same allocator hand out
/// ids that are unique across all of them.
#[derive(Debug, Clone)]
pub struct EntityIdAllocator {
    next: Arc<AtomicU64>,
}

impl Default for EntityIdAllocator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl EntityIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    pub fn next_id(&self) -> EntityId {
        EntityId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity of an [`EntityPool`](crate::EntityPool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(pub u32);

impl PoolId {
    pub(crate) fn next() -> Self {
        static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(1);
        PoolId(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let ids = EntityIdAllocator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_eq!(a, EntityId(1));
        assert!(b > a);
    }

    #[test]
    fn test_clones_share_counter() {
        let ids = EntityIdAllocator::starting_at(10);
        let shared = ids.clone();
        assert_eq!(ids.next_id(), EntityId(10));
        assert_eq!(shared.next_id(), EntityId(11));
        assert_eq!(ids.next_id(), EntityId(12));
    }

    #[test]
    fn test_pool_ids_differ() {
        assert_ne!(PoolId::next(), PoolId::next());
    }
}
