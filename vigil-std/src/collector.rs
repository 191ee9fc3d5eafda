//! Result collection for chaining validators.
//!
//! A [`ResultCollector`] sits at the end of one validator (as a result
//! handler) and at the start of another (as a trigger and a data provider).
//! Every result it receives is stored and re-announced, so the downstream
//! validator runs with the upstream verdict as its input.

use crate::triggers::TriggerListeners;
use parking_lot::Mutex;
use std::sync::Arc;
use vigil_core::{
    DataProvider, Disposable, ResultHandler, Trigger, TriggerEvent, TriggerListener,
};

/// Stores the last result it handled and fires its listeners.
///
/// Registering one collector both as a trigger and as a data provider of the
/// same validator is the intended use; disposal still happens once.
///
/// Errors raised by downstream listeners cannot be returned through
/// [`ResultHandler::handle_result`]; they are logged.
pub struct ResultCollector<T> {
    last: Mutex<Option<T>>,
    listeners: TriggerListeners,
}

impl<T> Default for ResultCollector<T> {
    fn default() -> Self {
        Self {
            last: Mutex::new(None),
            listeners: TriggerListeners::new(),
        }
    }
}

impl<T: Clone> ResultCollector<T> {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last result collected, if any.
    pub fn last(&self) -> Option<T> {
        self.last.lock().clone()
    }

    /// Number of listeners (downstream validators) hooked onto this collector.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> ResultHandler<T> for ResultCollector<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn handle_result(&self, result: &T) {
        *self.last.lock() = Some(result.clone());
        if let Err(error) = self.listeners.fire(&TriggerEvent::from_component(self)) {
            tracing::error!(%error, "downstream validation failed");
        }
    }

    fn disposer(&self) -> Option<&dyn Disposable> {
        Some(self)
    }
}

impl<T> DataProvider<Option<T>> for ResultCollector<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn get_data(&self) -> Option<T> {
        self.last.lock().clone()
    }

    fn disposer(&self) -> Option<&dyn Disposable> {
        Some(self)
    }
}

impl<T> Trigger for ResultCollector<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn add_trigger_listener(&self, listener: Arc<dyn TriggerListener>) {
        self.listeners.add(listener);
    }

    fn remove_trigger_listener(&self, listener: &Arc<dyn TriggerListener>) {
        self.listeners.remove(listener);
    }

    fn disposer(&self) -> Option<&dyn Disposable> {
        Some(self)
    }
}

impl<T: Send> Disposable for ResultCollector<T> {
    fn dispose(&self) {
        self.listeners.clear();
        *self.last.lock() = None;
    }
}
