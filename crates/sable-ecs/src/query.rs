//! Multi-store entity queries.
//!
//! [`intersect`] finds the entities present in every store of a component
//! tuple; [`exclude`] filters one store's entities against another's
//! membership. Both return freshly allocated entity lists (never aliases
//! into store internals) with no ordering guarantee beyond the driving
//! store's current dense order, which is itself unstable across removals.
//!
//! `intersect` drives from the smallest participating store and probes the
//! others' sparse indices, costing O(smallest x (k-1)). The driver choice
//! is purely a performance heuristic: any driver yields the same set.
//!
//! Single-type iteration does not need a query function — use
//! [`World::query`](crate::world::World::query), which exposes the aligned
//! dense arrays directly.

use crate::component::Component;
use crate::entity::Entity;
use crate::store::AnyStore;
use crate::world::World;

// ---------------------------------------------------------------------------
// ComponentSet -- tuples of component types
// ---------------------------------------------------------------------------

/// A tuple of component types participating in an [`intersect`] query.
///
/// Implemented for tuples of one through five component types.
pub trait ComponentSet {
    /// Resolve every participating store, or `None` if any is
    /// uninitialized.
    #[doc(hidden)]
    fn stores(world: &World) -> Option<Vec<&dyn AnyStore>>;
}

macro_rules! impl_component_set {
    ($($ty:ident),+) => {
        impl<$($ty: Component),+> ComponentSet for ($($ty,)+) {
            fn stores(world: &World) -> Option<Vec<&dyn AnyStore>> {
                Some(vec![$(world.erased_store($ty::ID as usize)?),+])
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);

// ---------------------------------------------------------------------------
// intersect / exclude
// ---------------------------------------------------------------------------

/// Entities present in every store of the component tuple `S`.
///
/// Returns an empty list when any participating store is uninitialized.
///
/// ```
/// # use sable_ecs::prelude::*;
/// # #[derive(Clone, Copy)] struct Position;
/// # #[derive(Clone, Copy)] struct Health;
/// # impl Component for Position { const ID: ComponentId = 0; }
/// # impl Component for Health { const ID: ComponentId = 1; }
/// # let mut world = World::new(WorldOptions::default()).unwrap();
/// # world.initialize::<Position>().unwrap();
/// # world.initialize::<Health>().unwrap();
/// let fighters = intersect::<(Position, Health)>(&world);
/// ```
pub fn intersect<S: ComponentSet>(world: &World) -> Vec<Entity> {
    let Some(stores) = S::stores(world) else {
        return Vec::new();
    };
    // Drive from the smallest store; probe the rest.
    let driver = stores
        .iter()
        .enumerate()
        .min_by_key(|(_, store)| store.len())
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mut out = Vec::new();
    'candidates: for &entity in stores[driver].entities() {
        for (i, store) in stores.iter().enumerate() {
            if i != driver && !store.contains(entity) {
                continue 'candidates;
            }
        }
        out.push(entity);
    }
    out
}

/// Entities holding `T` but not `V`.
///
/// Empty when `T` is uninitialized. An uninitialized `V` excludes nothing,
/// so the result is then every entity of `T`. O(size of `T`'s store).
pub fn exclude<T: Component, V: Component>(world: &World) -> Vec<Entity> {
    let Some(keep) = world.erased_store(T::ID as usize) else {
        return Vec::new();
    };
    let without = world.erased_store(V::ID as usize);
    keep.entities()
        .iter()
        .copied()
        .filter(|&entity| without.map_or(true, |store| !store.contains(entity)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
