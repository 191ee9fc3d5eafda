//! Standard trigger implementations.
//!
//! [`TriggerListeners`] is the listener bookkeeping every trigger needs;
//! custom triggers embed it and forward the [`Trigger`] methods to it.

use parking_lot::Mutex;
use std::sync::Arc;
use vigil_core::{ComponentId, Trigger, TriggerEvent, TriggerListener, VigilError};

/// An ordered list of trigger listeners.
///
/// Duplicates are allowed; removal drops the first occurrence.
#[derive(Default)]
pub struct TriggerListeners {
    listeners: Mutex<Vec<Arc<dyn TriggerListener>>>,
}

impl TriggerListeners {
    /// Create an empty listener list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener.
    pub fn add(&self, listener: Arc<dyn TriggerListener>) {
        self.listeners.lock().push(listener);
    }

    /// Remove the first occurrence of `listener`.
    pub fn remove(&self, listener: &Arc<dyn TriggerListener>) -> bool {
        let id = ComponentId::of_arc(listener);
        let mut listeners = self.listeners.lock();
        match listeners
            .iter()
            .position(|candidate| ComponentId::of_arc(candidate) == id)
        {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.listeners.lock().clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Check if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    /// Notify every listener, in registration order.
    ///
    /// The list is snapshotted first, so listeners may add or remove
    /// listeners (or fire again) while being notified. Stops at the first
    /// listener error and returns it, as [`VigilError::Pipeline`] when a
    /// validator aborted its firing.
    pub fn fire(&self, event: &TriggerEvent) -> Result<(), VigilError> {
        let snapshot = self.listeners.lock().clone();
        for listener in snapshot {
            listener
                .trigger_validation(event)
                .map_err(VigilError::from_listener)?;
        }
        Ok(())
    }
}

/// A trigger fired explicitly by application code.
///
/// Stands in for a widget event in headless code: call [`fire`](Self::fire)
/// where the widget would have signalled.
///
/// # Example
///
/// ```rust,ignore
/// let submit = Arc::new(ManualTrigger::new());
/// validator.add_trigger(submit.clone());
/// submit.fire()?;
/// ```
#[derive(Default)]
pub struct ManualTrigger {
    listeners: TriggerListeners,
}

impl ManualTrigger {
    /// Create a trigger with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notify all listeners.
    pub fn fire(&self) -> Result<(), VigilError> {
        self.listeners.fire(&TriggerEvent::from_component(self))
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Trigger for ManualTrigger {
    fn add_trigger_listener(&self, listener: Arc<dyn TriggerListener>) {
        self.listeners.add(listener);
    }

    fn remove_trigger_listener(&self, listener: &Arc<dyn TriggerListener>) {
        self.listeners.remove(listener);
    }
}
