//! Small containers shared by the Sable crates.
//!
//! Currently this is just [`RingBuffer`], the bounded FIFO the ECS uses as
//! its entity recycle queue.

pub mod ring;

pub use ring::RingBuffer;
