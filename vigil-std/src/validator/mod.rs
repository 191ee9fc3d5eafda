//! Validation engines.
//!
//! Two engines wire triggers to data providers to rules to result handlers:
//!
//! - [`GeneralValidator`]: every rule sees every data provider output, with
//!   transformer chains and a [`MappingStrategy`](vigil_core::MappingStrategy)
//!   at each joint.
//! - [`MappableValidator`]: explicit point-to-point tables, with the rule
//!   result used as the dispatch key for result handlers.
//!
//! Both hook one adapter per distinct trigger, run firings synchronously on
//! the caller's thread, and dispose their components once each.

mod config;
mod disposal;
mod general;
mod hooks;
mod mappable;

pub use config::MappingConfig;
pub use general::{GeneralValidator, TransformStage};
pub use mappable::MappableValidator;

use std::sync::Arc;
use vigil_core::ComponentId;

/// Number of entries of `items` that are `id`.
pub(crate) fn occurrences<T: ?Sized>(items: &[Arc<T>], id: ComponentId) -> usize {
    items
        .iter()
        .filter(|&item| ComponentId::of_arc(item) == id)
        .count()
}

/// Remove and return the first entry of `items` that is `id`.
pub(crate) fn remove_first<T: ?Sized>(items: &mut Vec<Arc<T>>, id: ComponentId) -> Option<Arc<T>> {
    let index = items
        .iter()
        .position(|item| ComponentId::of_arc(item) == id)?;
    Some(items.remove(index))
}
