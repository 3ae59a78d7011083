//! Walkthrough of the storage API: spawn, attach, query, intersect,
//! tear down, and recycle.
//!
//! Run with:
//!   cargo run --example basic -p sable-ecs

use sable_ecs::prelude::*;

// One unique tag per component type. A const block keeps the assignment
// enum-like and collision-free.
const POSITION_ID: ComponentId = 0;
const VELOCITY_ID: ComponentId = 1;
const TAG_ID: ComponentId = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}

/// A component with no data. Useful for filtering queries.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tag;

impl Component for Position {
    const ID: ComponentId = POSITION_ID;
}
impl Component for Velocity {
    const ID: ComponentId = VELOCITY_ID;
}
impl Component for Tag {
    const ID: ComponentId = TAG_ID;
    const PAGE_BITS: u32 = 7;
}

fn main() -> Result<(), EcsError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // The world tracks entities and their components. Pass it by reference
    // for any system to have access.
    let mut world = World::new(WorldOptions {
        entity_limit: 10_000,
        recycle_limit: 1_000,
        component_limit: 16,
    })?;

    // Each component type needs its store installed before use.
    world.initialize::<Position>()?;
    world.initialize::<Velocity>()?;
    world.initialize::<Tag>()?;

    let entity1 = world.create_entity();
    let entity2 = world.create_entity();

    world.add(entity1, Position { x: 0.0, y: 0.0 });
    world.add(entity1, Velocity { x: 0.0, y: 0.0 });
    world.add(entity1, Tag);

    world.add(entity2, Position { x: 0.0, y: 0.0 });
    world.add(entity2, Velocity { x: 0.0, y: 0.0 });

    // Single-type queries expose the dense entity and component arrays in
    // alignment. Alignment between *different* queries is not guaranteed,
    // though it holds here because additions were synchronized.
    {
        let entities: Vec<Entity> = world.query::<Position>().0.to_vec();
        let (_, positions) = world.query_mut::<Position>();
        for pos in positions.iter_mut() {
            pos.y += 1.0;
        }
        let (_, velocities) = world.query_mut::<Velocity>();
        for vel in velocities.iter_mut() {
            vel.x -= 0.5;
        }
        for e in entities {
            println!(
                "{e}: {:?} {:?}",
                world.get::<Position>(e).unwrap(),
                world.get::<Velocity>(e).unwrap()
            );
        }
    }

    // Multi-type queries return only the entities sharing every type;
    // components are then fetched per entity.
    for e in intersect::<(Position, Velocity, Tag)>(&world) {
        world.get_mut::<Position>(e).unwrap().x += 1.0;
        world.get_mut::<Velocity>(e).unwrap().y -= 0.5;
        println!(
            "{e}: {:?} {:?}",
            world.get::<Position>(e).unwrap(),
            world.get::<Velocity>(e).unwrap()
        );
    }

    // Removal is manual, one component at a time.
    world.remove::<Position>(entity2);
    world.remove::<Velocity>(entity2);

    // The reclaiming variant also releases emptied index pages. One per
    // store at teardown is enough.
    world.remove_and_reclaim::<Position>(entity1);
    world.remove_and_reclaim::<Velocity>(entity1);
    world.remove_and_reclaim::<Tag>(entity1);

    // With components gone, the entities are safe to destroy.
    world.destroy_entity(entity1);
    world.destroy_entity(entity2);

    // Ids are recycled with a bumped generation: the old handle and the new
    // one share a raw id but compare unequal. Holding a handle across
    // destruction is a dangling reference; compare generations to detect it
    // (the counter wraps after 255 recycles, so a stale match is unlikely
    // but not impossible).
    let entity1v2 = world.create_entity();
    println!("old handle: {entity1}");
    println!("new handle: {entity1v2}");

    Ok(())
}
