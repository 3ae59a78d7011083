//! Per-type component storage.
//!
//! A [`ComponentStore`] is a sparse set: a [`PageArray`] maps raw entity
//! ids to slots in a pair of aligned dense arrays (entities and component
//! data). Membership tests, insertion, and removal are all O(1); removal
//! swaps the last element into the vacated slot, so dense order is not
//! stable across removals.
//!
//! Lookups key on the raw id only — the generation is **not** checked. If
//! an id is recycled before every store holding data for the old handle is
//! cleared, the new entity inherits that stale data. Removing an entity's
//! components before destroying it is the caller's job (see
//! [`World::destroy_entity`](crate::world::World::destroy_entity)).

use std::any::Any;
use std::mem;

use crate::component::Component;
use crate::entity::Entity;
use crate::page_array::{PageArray, UNSET};

// ---------------------------------------------------------------------------
// ComponentStore
// ---------------------------------------------------------------------------

/// Sparse set mapping entities to components of a single type.
#[derive(Debug)]
pub struct ComponentStore<T: Component> {
    /// Raw entity id -> dense slot, [`UNSET`] when absent.
    index: PageArray,
    /// Dense, packed entity handles. `entities[i]` owns `data[i]`.
    entities: Vec<Entity>,
    /// Dense component data, aligned with `entities`.
    data: Vec<T>,
}

impl<T: Component> ComponentStore<T> {
    /// Create an empty store with the page size from [`Component::PAGE_BITS`].
    pub fn new() -> Self {
        Self {
            index: PageArray::new(T::PAGE_BITS),
            entities: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Whether `entity`'s raw id holds a component in this store.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.index.at(entity.id() as usize) >= 0
    }

    /// Attach `value` to `entity`. Returns `false` if already present.
    pub fn add(&mut self, entity: Entity, value: T) -> bool {
        if self.contains(entity) {
            return false;
        }
        self.index.set(entity.id() as usize, self.entities.len() as i32);
        self.entities.push(entity);
        self.data.push(value);
        true
    }

    /// Detach `entity`'s component, returning the removed handle.
    ///
    /// The vacated dense slot is filled by the last element (swap-remove)
    /// and the sparse page stays materialized. Use
    /// [`remove_and_reclaim`](Self::remove_and_reclaim) to also release the
    /// page when it empties.
    pub fn remove(&mut self, entity: Entity) -> Option<Entity> {
        self.remove_inner(entity, false)
    }

    /// Like [`remove`](Self::remove), but scans the removed id's sparse
    /// page and releases it if it is now empty. O(page size).
    pub fn remove_and_reclaim(&mut self, entity: Entity) -> Option<Entity> {
        self.remove_inner(entity, true)
    }

    fn remove_inner(&mut self, entity: Entity, reclaim: bool) -> Option<Entity> {
        let slot = self.index.at(entity.id() as usize);
        if slot == UNSET {
            return None;
        }
        let slot = slot as usize;
        let removed = self.entities[slot];
        self.entities.swap_remove(slot);
        self.data.swap_remove(slot);
        // If an element moved into the vacated slot, re-point its id.
        if slot < self.entities.len() {
            self.index.set(self.entities[slot].id() as usize, slot as i32);
        }
        if reclaim {
            self.index.clear_and_reclaim(removed.id() as usize);
        } else {
            self.index.clear(removed.id() as usize);
        }
        Some(removed)
    }

    /// The component attached to `entity`, if any.
    #[inline]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let slot = self.index.at(entity.id() as usize);
        if slot == UNSET {
            return None;
        }
        Some(&self.data[slot as usize])
    }

    /// Mutable access to the component attached to `entity`, if any.
    ///
    /// Exclusivity is the `&mut self` borrow; the store performs no runtime
    /// checks of its own.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = self.index.at(entity.id() as usize);
        if slot == UNSET {
            return None;
        }
        Some(&mut self.data[slot as usize])
    }

    /// All entities holding this component, densely packed. Aligned with
    /// [`data`](Self::data).
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// All component data, densely packed. Aligned with
    /// [`entities`](Self::entities).
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable view of all component data, aligned with
    /// [`entities`](Self::entities).
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Split borrow of both dense arrays: shared entities, mutable data.
    pub fn entities_and_data_mut(&mut self) -> (&[Entity], &mut [T]) {
        (&self.entities, &mut self.data)
    }

    /// Number of stored components.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store holds no components.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Reclaim every empty sparse page. O(page count x page size).
    pub fn sweep(&mut self) {
        self.index.sweep();
    }

    /// Hard reset: discard all backing storage and start empty.
    pub fn reset(&mut self) {
        self.index.reset();
        self.entities = Vec::new();
        self.data = Vec::new();
    }

    /// Bytes of heap memory owned by the store's index and dense arrays.
    pub fn mem_usage(&self) -> usize {
        self.index.mem_usage()
            + self.entities.capacity() * mem::size_of::<Entity>()
            + self.data.capacity() * mem::size_of::<T>()
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// AnyStore -- type-erased store surface
// ---------------------------------------------------------------------------

/// The type-erased face of a [`ComponentStore`].
///
/// The world keeps one `Box<dyn AnyStore>` per initialized tag; the typed
/// API downcasts through [`as_any`](Self::as_any) once per call, while
/// queries and lifecycle maintenance go through this surface directly.
pub trait AnyStore {
    /// Downcast seam for typed reads.
    fn as_any(&self) -> &dyn Any;

    /// Downcast seam for typed writes.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Dense entity membership, for query driving.
    fn entities(&self) -> &[Entity];

    /// O(1) membership probe.
    fn contains(&self, entity: Entity) -> bool;

    /// Number of stored components.
    fn len(&self) -> usize;

    /// Reclaim empty sparse pages.
    fn sweep(&mut self);

    /// Discard all backing storage.
    fn reset(&mut self);

    /// Bytes owned, including the store struct itself (it lives in a box).
    fn mem_usage(&self) -> usize;
}

impl<T: Component> AnyStore for ComponentStore<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn entities(&self) -> &[Entity] {
        self.entities()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn sweep(&mut self) {
        self.sweep();
    }

    fn reset(&mut self) {
        self.reset();
    }

    fn mem_usage(&self) -> usize {
        mem::size_of::<Self>() + self.mem_usage()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
