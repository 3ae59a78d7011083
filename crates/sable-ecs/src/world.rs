//! The [`World`] owns the entity allocator and one type-erased component
//! store per initialized tag.
//!
//! Stores live behind `Box<dyn AnyStore>` in a fixed-length table indexed by
//! [`ComponentId`]; the typed methods downcast once per call. A tag must be
//! initialized with [`World::initialize`] before any add/remove/get/query
//! that references it — uninitialized tags answer `false`, `None`, or empty
//! slices, never panic.

use std::mem;

use crate::component::{Component, MAX_COMPONENTS};
use crate::entity::{Entity, EntityAllocator, MAX_ENTITY_IDS};
use crate::store::{AnyStore, ComponentStore};
use crate::EcsError;

// ---------------------------------------------------------------------------
// WorldOptions
// ---------------------------------------------------------------------------

/// Construction limits for a [`World`]. Validated once by [`World::new`].
#[derive(Debug, Clone, Copy)]
pub struct WorldOptions {
    /// Maximum number of living entities. Bounded by the 24-bit id space.
    pub entity_limit: u32,
    /// Maximum number of destroyed handles kept for recycling. Bounded by
    /// `entity_limit`. When a destroy overflows this bound the oldest
    /// recyclable id is silently dropped.
    pub recycle_limit: u32,
    /// Number of component tags this world accepts (valid tags are
    /// `0..component_limit`). Bounded by [`MAX_COMPONENTS`].
    pub component_limit: usize,
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            entity_limit: 1 << 16,
            recycle_limit: 1024,
            component_limit: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Top-level container for entities and their components.
pub struct World {
    /// Entity handle allocator.
    allocator: EntityAllocator,
    /// Store table indexed by [`ComponentId`]; `None` until initialized.
    stores: Vec<Option<Box<dyn AnyStore>>>,
    /// Number of initialized stores.
    store_count: usize,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entity_count", &self.allocator.live_count())
            .field("component_count", &self.store_count)
            .finish()
    }
}

impl World {
    /// Create a world with the given limits.
    ///
    /// # Errors
    ///
    /// Returns an [`EcsError`] if any limit exceeds its bound.
    pub fn new(options: WorldOptions) -> Result<Self, EcsError> {
        if options.entity_limit >= MAX_ENTITY_IDS {
            return Err(EcsError::EntityLimitTooLarge {
                limit: options.entity_limit,
                max: MAX_ENTITY_IDS - 1,
            });
        }
        if options.recycle_limit > options.entity_limit {
            return Err(EcsError::RecycleLimitTooLarge {
                limit: options.recycle_limit,
                entity_limit: options.entity_limit,
            });
        }
        if options.component_limit > MAX_COMPONENTS {
            return Err(EcsError::ComponentLimitTooLarge {
                limit: options.component_limit,
                max: MAX_COMPONENTS,
            });
        }
        let mut stores = Vec::with_capacity(options.component_limit);
        stores.resize_with(options.component_limit, || None);
        Ok(Self {
            allocator: EntityAllocator::new(options.entity_limit, options.recycle_limit),
            stores,
            store_count: 0,
        })
    }

    // -- type lifecycle -----------------------------------------------------

    /// Install an empty store for `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T::ID` is outside this world's configured tag
    /// range or already initialized.
    pub fn initialize<T: Component>(&mut self) -> Result<(), EcsError> {
        let id = T::ID as usize;
        if id >= self.stores.len() {
            return Err(EcsError::ComponentIdOutOfRange {
                id: T::ID,
                limit: self.stores.len(),
            });
        }
        if self.stores[id].is_some() {
            return Err(EcsError::AlreadyInitialized { id: T::ID });
        }
        self.stores[id] = Some(Box::new(ComponentStore::<T>::new()));
        self.store_count += 1;
        tracing::debug!(id = T::ID, "component store initialized");
        Ok(())
    }

    /// The typed store for `T`, if initialized.
    fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        self.stores
            .get(T::ID as usize)?
            .as_deref()?
            .as_any()
            .downcast_ref()
    }

    fn store_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        self.stores
            .get_mut(T::ID as usize)?
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut()
    }

    /// The type-erased store at `id`, if initialized. Used by the query
    /// functions.
    pub(crate) fn erased_store(&self, id: usize) -> Option<&dyn AnyStore> {
        self.stores.get(id)?.as_deref()
    }

    // -- entity lifecycle ---------------------------------------------------

    /// Create an entity, or [`Entity::NULL`] if the entity limit is reached.
    pub fn create_entity(&mut self) -> Entity {
        self.allocator.create()
    }

    /// Destroy an entity, recycling its id with a bumped generation.
    ///
    /// This does **not** remove the entity from any component store. Remove
    /// its components first (or a later entity recycling this raw id will
    /// inherit the stale data and the store will leak until then).
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        self.allocator.destroy(entity)
    }

    // -- record lifecycle ---------------------------------------------------

    /// Attach `value` to `entity`. Returns `false` if the store for `T` was
    /// never initialized or the entity already holds a `T`.
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> bool {
        match self.store_mut::<T>() {
            Some(store) => store.add(entity, value),
            None => false,
        }
    }

    /// Detach `entity`'s `T`. Returns `false` if uninitialized or absent.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        match self.store_mut::<T>() {
            Some(store) => store.remove(entity).is_some(),
            None => false,
        }
    }

    /// Like [`remove`](Self::remove), but also releases the sparse page if
    /// the removal emptied it. O(page size).
    pub fn remove_and_reclaim<T: Component>(&mut self, entity: Entity) -> bool {
        match self.store_mut::<T>() {
            Some(store) => store.remove_and_reclaim(entity).is_some(),
            None => false,
        }
    }

    /// Reclaim every empty sparse page in `T`'s store.
    pub fn sweep<T: Component>(&mut self) {
        if let Some(store) = self.store_mut::<T>() {
            store.sweep();
        }
    }

    // -- access -------------------------------------------------------------

    /// The `T` attached to `entity`, if any.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.store::<T>()?.get(entity)
    }

    /// Mutable access to the `T` attached to `entity`, if any.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.store_mut::<T>()?.get_mut(entity)
    }

    /// The aligned dense `(entities, data)` arrays for `T`.
    ///
    /// These alias the store's live storage; any add or remove invalidates
    /// the borrow. Empty slices when `T` is uninitialized. Alignment
    /// between *different* component types' arrays is never guaranteed.
    pub fn query<T: Component>(&self) -> (&[Entity], &[T]) {
        match self.store::<T>() {
            Some(store) => (store.entities(), store.data()),
            None => (&[], &[]),
        }
    }

    /// Like [`query`](Self::query) with mutable component data.
    pub fn query_mut<T: Component>(&mut self) -> (&[Entity], &mut [T]) {
        match self.store_mut::<T>() {
            Some(store) => {
                let (entities, data) = store.entities_and_data_mut();
                (entities, data)
            }
            None => (&[], &mut []),
        }
    }

    // -- observers ----------------------------------------------------------

    /// Number of living entities.
    pub fn entity_count(&self) -> u32 {
        self.allocator.live_count()
    }

    /// Configured maximum of living entities.
    pub fn entity_limit(&self) -> u32 {
        self.allocator.limit()
    }

    /// Configured recycle-pool capacity.
    pub fn recycle_limit(&self) -> u32 {
        self.allocator.recycle_limit()
    }

    /// Configured number of component tags.
    pub fn component_limit(&self) -> usize {
        self.stores.len()
    }

    /// Number of initialized component stores.
    pub fn component_count(&self) -> usize {
        self.store_count
    }

    // -- diagnostics --------------------------------------------------------

    /// Bytes owned by the world, all component stores included.
    pub fn mem_usage(&self) -> usize {
        let stores: usize = self
            .stores
            .iter()
            .flatten()
            .map(|store| store.mem_usage())
            .sum();
        mem::size_of::<Self>()
            + self.allocator.mem_usage()
            + self.stores.capacity() * mem::size_of::<Option<Box<dyn AnyStore>>>()
            + stores
    }

    /// Bytes owned by `T`'s store, or 0 if uninitialized.
    pub fn component_mem_usage<T: Component>(&self) -> usize {
        self.erased_store(T::ID as usize)
            .map_or(0, |store| store.mem_usage())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
