//! Component identification.
//!
//! Every component type carries a caller-assigned [`ComponentId`] tag that
//! indexes the world's store table. Tags must be unique within a world;
//! an enum-like block of consts is the usual way to assign them:
//!
//! ```
//! use sable_ecs::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct Position { x: f32, y: f32 }
//!
//! impl Component for Position {
//!     const ID: ComponentId = 0;
//! }
//! ```

/// Small stable integer tag identifying a component type within a world.
pub type ComponentId = u8;

/// Maximum number of distinct component types a world can be configured
/// for. Valid tags are `0..MAX_COMPONENTS`.
pub const MAX_COMPONENTS: usize = 255;

/// Default log2 page size for a component store's sparse index
/// (1024 entries per page).
pub const DEFAULT_PAGE_BITS: u32 = 10;

/// A typed record attachable to entities.
///
/// `ID` is the stable tag used to locate this type's store; the caller owns
/// tag assignment and must keep tags unique per world. `PAGE_BITS` tunes the
/// sparse-index page size for this type's store — tag-like components that
/// appear on few entities benefit from smaller pages (7 or 8), ubiquitous
/// components from larger ones.
pub trait Component: 'static {
    /// Stable store tag, unique within a world.
    const ID: ComponentId;

    /// log2 of the sparse-index page size for this component's store.
    const PAGE_BITS: u32 = DEFAULT_PAGE_BITS;
}
