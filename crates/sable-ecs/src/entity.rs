//! Entity handles and allocation.
//!
//! An [`Entity`] is a 32-bit handle that packs a 24-bit raw id in the high
//! bits and an 8-bit *generation* in the low bits. The generation is bumped
//! every time an id is recycled, which lets holders of an old handle detect
//! that the entity they reference was destroyed.
//!
//! Layout:
//!
//! ```text
//! [raw id                ][gen   ]
//! ########################GGGGGGGG
//! ```

use sable_collections::RingBuffer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

/// Number of distinct raw ids (2^24). Raw ids are `1..MAX_ENTITY_IDS`; id 0
/// belongs to the null entity.
pub const MAX_ENTITY_IDS: u32 = 1 << 24;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A generational entity handle.
///
/// The raw id is assigned once per slot and never changes; only the
/// generation moves when the id is recycled. Value 0 is the null entity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity(u32);

impl Entity {
    /// The null (invalid) entity. Returned by fallible allocation.
    pub const NULL: Entity = Entity(0);

    /// Pack a raw id and generation into a handle.
    ///
    /// `id` must fit in 24 bits.
    #[inline]
    pub fn new(id: u32, generation: u8) -> Self {
        debug_assert!(id < MAX_ENTITY_IDS, "raw id {id} exceeds 24 bits");
        Self(id << 8 | generation as u32)
    }

    /// The raw id portion (high 24 bits). Immutable for the handle's slot.
    #[inline]
    pub fn id(self) -> u32 {
        self.0 >> 8
    }

    /// The generation portion (low 8 bits).
    #[inline]
    pub fn generation(self) -> u8 {
        self.0 as u8
    }

    /// Whether this is the null entity.
    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The same raw id with the generation advanced by one, wrapping
    /// 255 -> 0. Applied exactly once each time an id is recycled.
    #[inline]
    #[must_use]
    pub fn bump(self) -> Entity {
        Entity::new(self.id(), self.generation().wrapping_add(1))
    }

    /// Raw `u32` representation.
    #[inline]
    pub fn to_raw(self) -> u32 {
        self.0
    }

    /// Reconstruct from a raw `u32`.
    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.id(), self.generation())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.id(), self.generation())
    }
}

// ---------------------------------------------------------------------------
// EntityAllocator
// ---------------------------------------------------------------------------

/// Issues and recycles [`Entity`] handles.
///
/// Destroyed handles go into a bounded FIFO pool with their generation
/// already bumped; creation drains the pool before minting new ids so
/// generations spread out over time instead of piling onto a hot id.
///
/// When the pool is full the oldest queued handle is evicted to make room,
/// so that raw id is never handed out again by this allocator. Size the
/// recycle limit to at least the expected burst of destroys if full id
/// reuse matters.
#[derive(Debug)]
pub struct EntityAllocator {
    /// Next raw id to mint. Starts at 1; id 0 is the null entity.
    next_id: u32,
    /// Currently live entities.
    live: u32,
    /// Maximum permitted live entities.
    limit: u32,
    /// Recyclable handles, oldest first.
    pool: RingBuffer<Entity>,
}

impl EntityAllocator {
    /// Create an allocator permitting `limit` live entities and keeping at
    /// most `recycle_limit` destroyed handles for reuse.
    pub fn new(limit: u32, recycle_limit: u32) -> Self {
        Self {
            next_id: 1,
            live: 0,
            limit,
            pool: RingBuffer::with_capacity(recycle_limit as usize),
        }
    }

    /// Allocate a handle, or [`Entity::NULL`] if the live limit (or the
    /// 24-bit id space) is exhausted.
    pub fn create(&mut self) -> Entity {
        if self.live == self.limit {
            tracing::warn!(limit = self.limit, "entity limit reached");
            return Entity::NULL;
        }
        let entity = match self.pool.pop() {
            // Generation was already bumped on destroy.
            Some(recycled) => recycled,
            None => {
                if self.next_id == MAX_ENTITY_IDS {
                    tracing::warn!("entity id space exhausted");
                    return Entity::NULL;
                }
                let fresh = Entity::new(self.next_id, 0);
                self.next_id += 1;
                fresh
            }
        };
        self.live += 1;
        entity
    }

    /// Recycle a handle, bumping its generation so outstanding copies go
    /// stale.
    ///
    /// Returns `false` if no entities are live; that is a caller logic
    /// error, reported but not fatal.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if self.live == 0 {
            tracing::warn!(%entity, "destroy called with no live entities");
            return false;
        }
        // Push always succeeds; a full pool evicts its oldest handle.
        self.pool.push(entity.bump());
        self.live -= 1;
        true
    }

    /// Number of currently live entities.
    pub fn live_count(&self) -> u32 {
        self.live
    }

    /// Maximum permitted live entities.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Capacity of the recycle pool.
    pub fn recycle_limit(&self) -> u32 {
        self.pool.capacity() as u32
    }

    /// Bytes owned by the allocator, including the recycle pool.
    pub fn mem_usage(&self) -> usize {
        mem::size_of::<Self>() + self.pool.mem_usage()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_roundtrip() {
        for &(id, generation) in &[(0u32, 0u8), (1, 0), (42, 7), (MAX_ENTITY_IDS - 1, 255)] {
            let e = Entity::new(id, generation);
            assert_eq!(e.id(), id);
            assert_eq!(e.generation(), generation);
        }
        let e = Entity::new(99, 3);
        assert_eq!(Entity::from_raw(e.to_raw()), e);
    }

    #[test]
    fn bump_wraps_at_255() {
        let e = Entity::new(12, 255);
        let bumped = e.bump();
        assert_eq!(bumped.id(), 12);
        assert_eq!(bumped.generation(), 0);
    }

    #[test]
    fn bump_256_times_is_identity() {
        let mut e = Entity::new(7, 13);
        for _ in 0..256 {
            e = e.bump();
        }
        assert_eq!(e, Entity::new(7, 13));
    }

    #[test]
    fn first_entity_is_not_null() {
        let mut alloc = EntityAllocator::new(16, 4);
        let e = alloc.create();
        assert!(!e.is_null());
        assert_eq!(e.id(), 1);
        assert_eq!(e.generation(), 0);
    }

    #[test]
    fn create_unique_ids() {
        let mut alloc = EntityAllocator::new(128, 16);
        let mut ids: Vec<u32> = (0..100).map(|_| alloc.create().id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn limit_yields_null() {
        let mut alloc = EntityAllocator::new(2, 2);
        assert!(!alloc.create().is_null());
        assert!(!alloc.create().is_null());
        assert!(alloc.create().is_null());
        assert_eq!(alloc.live_count(), 2);
    }

    #[test]
    fn recycle_bumps_generation() {
        let mut alloc = EntityAllocator::new(8, 8);
        let e0 = alloc.create();
        assert!(alloc.destroy(e0));
        let e1 = alloc.create();
        assert_eq!(e1.id(), e0.id());
        assert_eq!(e1.generation(), 1);
    }

    #[test]
    fn destroy_on_empty_reports_failure() {
        let mut alloc = EntityAllocator::new(4, 4);
        assert!(!alloc.destroy(Entity::new(1, 0)));
        let e = alloc.create();
        assert!(alloc.destroy(e));
        assert!(!alloc.destroy(e));
    }

    #[test]
    fn full_pool_evicts_oldest_recyclable() {
        let mut alloc = EntityAllocator::new(8, 1);
        let a = alloc.create();
        let b = alloc.create();
        alloc.destroy(a);
        alloc.destroy(b); // pool capacity 1: a's id is evicted
        let reused = alloc.create();
        assert_eq!(reused.id(), b.id());
        // a's id is gone for good; the next create mints a fresh id.
        let fresh = alloc.create();
        assert_ne!(fresh.id(), a.id());
        assert_ne!(fresh.id(), b.id());
    }
}
