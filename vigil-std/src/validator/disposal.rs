//! Identity-deduplicated disposal.

use std::collections::HashSet;
use vigil_core::{ComponentId, Disposable};

/// Tracks which components were already disposed during one teardown.
///
/// A component reachable from several tiers (a result collector registered
/// as both trigger and data provider) is disposed once.
#[derive(Default)]
pub(crate) struct DisposalSet {
    disposed: HashSet<ComponentId>,
}

impl DisposalSet {
    /// Dispose `component` unless it was already disposed.
    ///
    /// Components without the capability are skipped silently.
    pub(crate) fn dispose(&mut self, component: Option<&dyn Disposable>) {
        let Some(component) = component else {
            return;
        };
        if self.disposed.insert(ComponentId::of(component)) {
            component.dispose();
        }
    }

    /// Number of components disposed so far.
    pub(crate) fn len(&self) -> usize {
        self.disposed.len()
    }
}
