//! Component identity.

use std::{fmt, sync::Arc};

/// Identity of a shared component.
///
/// Components are registered as `Arc<dyn ...>` trait objects. Two registrations
/// refer to the same component when they point at the same allocation, no
/// matter which trait they were registered through. This is how a
/// `ResultCollector` registered both as a trigger and as a data provider is
/// recognised as a single component.
///
/// The id is only meaningful while the component is alive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl ComponentId {
    /// Identity of the component behind `component`.
    pub fn of<T: ?Sized>(component: &T) -> Self {
        Self((component as *const T).cast::<()>() as usize)
    }

    /// Identity of the component owned by `arc`.
    pub fn of_arc<T: ?Sized>(arc: &Arc<T>) -> Self {
        Self(Arc::as_ptr(arc).cast::<()>() as usize)
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({:#x})", self.0)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
