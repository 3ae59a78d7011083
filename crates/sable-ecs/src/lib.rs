//! Sable ECS -- sparse-set entity-component storage.
//!
//! Entities are 32-bit generational handles; each component type lives in
//! its own sparse set (a paginated id index over packed dense arrays), so
//! attaching and detaching components is O(1) with no archetype migration.
//! Multi-component queries intersect the participating sets, driving from
//! the smallest one.
//!
//! The crate stores and queries data; scheduling, events, serialization,
//! and networking are out of scope.
//!
//! # Quick Start
//!
//! ```
//! use sable_ecs::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct Velocity { dx: f32, dy: f32 }
//!
//! impl Component for Position { const ID: ComponentId = 0; }
//! impl Component for Velocity { const ID: ComponentId = 1; }
//!
//! let mut world = World::new(WorldOptions::default()).unwrap();
//! world.initialize::<Position>().unwrap();
//! world.initialize::<Velocity>().unwrap();
//!
//! let e = world.create_entity();
//! world.add(e, Position { x: 0.0, y: 0.0 });
//! world.add(e, Velocity { dx: 1.0, dy: 0.0 });
//!
//! for entity in intersect::<(Position, Velocity)>(&world) {
//!     let vel = *world.get::<Velocity>(entity).unwrap();
//!     let pos = world.get_mut::<Position>(entity).unwrap();
//!     pos.x += vel.dx;
//!     pos.y += vel.dy;
//! }
//!
//! assert_eq!(world.get::<Position>(e), Some(&Position { x: 1.0, y: 0.0 }));
//! ```

#![deny(unsafe_code)]

pub mod component;
pub mod entity;
pub mod page_array;
pub mod query;
pub mod store;
pub mod world;

use component::ComponentId;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Configuration and registration errors.
///
/// Ordinary data-absence conditions (entity not in a store, store not
/// initialized at access time) are reported through `bool`/`Option`
/// results, not through this type.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// World construction with an entity limit beyond the 24-bit id space.
    #[error("entity limit {limit} exceeds the maximum of {max}")]
    EntityLimitTooLarge { limit: u32, max: u32 },

    /// World construction with a recycle limit beyond the entity limit.
    #[error("recycle limit {limit} exceeds the entity limit {entity_limit}")]
    RecycleLimitTooLarge { limit: u32, entity_limit: u32 },

    /// World construction with too many component tags.
    #[error("component limit {limit} exceeds the maximum of {max} component types")]
    ComponentLimitTooLarge { limit: usize, max: usize },

    /// A component's tag does not fit the world's configured tag range.
    #[error("component id {id} is out of range for a world with {limit} component types")]
    ComponentIdOutOfRange { id: ComponentId, limit: usize },

    /// The tag already has a store installed.
    #[error("component id {id} is already initialized")]
    AlreadyInitialized { id: ComponentId },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::component::{Component, ComponentId, DEFAULT_PAGE_BITS, MAX_COMPONENTS};
    pub use crate::entity::{Entity, EntityAllocator, MAX_ENTITY_IDS};
    pub use crate::page_array::{PageArray, UNSET};
    pub use crate::query::{exclude, intersect, ComponentSet};
    pub use crate::store::{AnyStore, ComponentStore};
    pub use crate::world::{World, WorldOptions};
    pub use crate::EcsError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    // -- test component types -----------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(u32);

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct CombatTag;

    impl Component for Position {
        const ID: ComponentId = 0;
    }
    impl Component for Velocity {
        const ID: ComponentId = 1;
    }
    impl Component for Health {
        const ID: ComponentId = 2;
    }
    impl Component for CombatTag {
        const ID: ComponentId = 3;
        const PAGE_BITS: u32 = 7;
    }

    fn setup_world() -> World {
        let mut world = World::new(WorldOptions {
            entity_limit: 4096,
            recycle_limit: 256,
            component_limit: 16,
        })
        .unwrap();
        world.initialize::<Position>().unwrap();
        world.initialize::<Velocity>().unwrap();
        world.initialize::<Health>().unwrap();
        world.initialize::<CombatTag>().unwrap();
        world
    }

    // -- simulation-loop style usage ----------------------------------------

    #[test]
    fn movement_tick_over_intersection() {
        let mut world = setup_world();
        let mover = world.create_entity();
        let scenery = world.create_entity();
        world.add(mover, Position { x: 0.0, y: 0.0 });
        world.add(mover, Velocity { dx: 1.0, dy: 2.0 });
        world.add(scenery, Position { x: 5.0, y: 5.0 });

        for _tick in 0..3 {
            for e in intersect::<(Position, Velocity)>(&world) {
                let vel = *world.get::<Velocity>(e).unwrap();
                let pos = world.get_mut::<Position>(e).unwrap();
                pos.x += vel.dx;
                pos.y += vel.dy;
            }
        }

        assert_eq!(world.get::<Position>(mover), Some(&Position { x: 3.0, y: 6.0 }));
        assert_eq!(world.get::<Position>(scenery), Some(&Position { x: 5.0, y: 5.0 }));
    }

    #[test]
    fn spawn_fight_despawn_cycle() {
        let mut world = setup_world();

        let player = world.create_entity();
        let npc1 = world.create_entity();
        let npc2 = world.create_entity();
        world.add(player, Position { x: 0.0, y: 0.0 });
        world.add(player, CombatTag);
        world.add(npc1, Position { x: 1.0, y: 0.0 });
        world.add(npc2, Position { x: 2.0, y: 0.0 });
        world.add(npc2, CombatTag);

        let mut fighters = intersect::<(Position, CombatTag)>(&world);
        fighters.sort_by_key(|e| e.id());
        assert_eq!(fighters, vec![player, npc2]);

        // npc2 leaves combat and is fully despawned.
        world.remove::<CombatTag>(npc2);
        world.remove_and_reclaim::<Position>(npc2);
        world.destroy_entity(npc2);

        assert_eq!(intersect::<(Position, CombatTag)>(&world), vec![player]);
        assert_eq!(world.entity_count(), 2);
    }

    #[test]
    fn exclusion_scenario() {
        let mut world = setup_world();
        let wall = world.create_entity();
        let player = world.create_entity();
        world.add(wall, Position { x: 3.0, y: 3.0 });
        world.add(wall, Health(100));
        world.add(player, Position { x: 0.0, y: 0.0 });

        assert_eq!(exclude::<Position, Health>(&world), vec![player]);
    }

    // -- recycling ----------------------------------------------------------

    #[test]
    fn recycled_id_has_bumped_generation() {
        let mut world = setup_world();
        let e = world.create_entity();
        world.add(e, Health(5));
        world.remove::<Health>(e);
        world.destroy_entity(e);

        let recycled = world.create_entity();
        assert_eq!(recycled.id(), e.id());
        assert_eq!(recycled.generation(), e.generation().wrapping_add(1));
        // Components were removed before destruction, so nothing leaks in.
        assert_eq!(world.get::<Health>(recycled), None);
    }

    #[test]
    fn recycle_limit_drops_oldest() {
        let mut world = World::new(WorldOptions {
            entity_limit: 8,
            recycle_limit: 1,
            component_limit: 4,
        })
        .unwrap();
        let a = world.create_entity();
        let b = world.create_entity();
        world.destroy_entity(a);
        world.destroy_entity(b);
        // Only b's id survived in the size-1 recycle pool.
        let reused = world.create_entity();
        assert_eq!(reused.id(), b.id());
    }

    #[test]
    fn entity_limit_bound() {
        let mut world = World::new(WorldOptions {
            entity_limit: 2,
            recycle_limit: 2,
            component_limit: 4,
        })
        .unwrap();
        assert!(!world.create_entity().is_null());
        assert!(!world.create_entity().is_null());
        assert!(world.create_entity().is_null());
    }

    // -- maintenance --------------------------------------------------------

    #[test]
    fn sweep_reclaims_store_pages() {
        let mut world = setup_world();
        let mut spawned = Vec::new();
        for _ in 0..512 {
            let e = world.create_entity();
            world.add(e, Health(1));
            spawned.push(e);
        }
        for &e in &spawned {
            world.remove::<Health>(e);
        }
        let before = world.component_mem_usage::<Health>();
        world.sweep::<Health>();
        assert!(world.component_mem_usage::<Health>() < before);
    }

    #[test]
    fn world_mem_usage_accounts_for_stores() {
        let world = setup_world();
        let total = world.mem_usage();
        let stores = world.component_mem_usage::<Position>()
            + world.component_mem_usage::<Velocity>()
            + world.component_mem_usage::<Health>()
            + world.component_mem_usage::<CombatTag>();
        assert!(total >= stores);
    }

    // -- scale --------------------------------------------------------------

    #[test]
    fn churn_10k_entities() {
        let mut world = World::new(WorldOptions {
            entity_limit: 20_000,
            recycle_limit: 20_000,
            component_limit: 8,
        })
        .unwrap();
        world.initialize::<Position>().unwrap();
        world.initialize::<Health>().unwrap();

        let mut entities = Vec::with_capacity(10_000);
        for i in 0..10_000u32 {
            let e = world.create_entity();
            world.add(e, Position { x: i as f32, y: 0.0 });
            if i % 2 == 0 {
                world.add(e, Health(i));
            }
            entities.push(e);
        }

        assert_eq!(intersect::<(Position, Health)>(&world).len(), 5_000);
        assert_eq!(exclude::<Position, Health>(&world).len(), 5_000);

        // Remove every Health, verify intersection drains.
        for &e in &entities {
            world.remove::<Health>(e);
        }
        assert!(intersect::<(Position, Health)>(&world).is_empty());
        assert_eq!(world.query::<Position>().0.len(), 10_000);

        // Full teardown.
        for &e in &entities {
            world.remove::<Position>(e);
            world.destroy_entity(e);
        }
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.query::<Position>().0.len(), 0);
    }
}
