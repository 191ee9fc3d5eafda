//! Standard transformer implementations.
//!
//! Typical uses: aggregating the `Vec<bool>` produced by an `AllToEach` joint
//! into one verdict, negating a verdict before it reaches a handler, or
//! adapting value types between stages.

pub mod boolean;
pub mod collection;
pub mod convert;

pub use boolean::{AndBooleanAggregator, NegateBoolean, OrBooleanAggregator};
pub use collection::CollectionElementTransformer;
pub use convert::{IntoTransformer, ToStringTransformer};
