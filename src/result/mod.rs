//! Typed results
//!
//! A caller picks one of a closed set of [`ResultShape`]s; the reply is
//! decoded into the matching [`Reply`] variant and published through a
//! [`ResultHandle`], or read back as a concrete Rust type through
//! [`TypedHandle`].

pub mod handle;
pub mod reply;
pub mod shape;

pub use handle::{ReplySlot, ResultHandle, TypedHandle};
pub use reply::{KeyValue, Reply, ShapeOutput, ZSliceWithKey, ZWithKey, Z};
pub use shape::ResultShape;
