//! Testing utilities for Vigil.
//!
//! This module provides components that record what the engines do to them,
//! so wiring can be checked without a widget toolkit.
//!
//! # Features
//!
//! - [`RecordingResultHandler`]: A result handler that records every result
//! - [`CountingTrigger`]: A trigger that counts listener registrations
//! - [`Probe`]: One object usable in every role, counting its disposals

use crate::triggers::TriggerListeners;
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use vigil_core::{
    DataProvider, Disposable, ResultHandler, Rule, Trigger, TriggerEvent, TriggerListener,
    VigilError,
};

// ============================================================================
// Recording Result Handler
// ============================================================================

/// A result handler that records all results it receives.
///
/// Clones share the same record, so a clone can be registered while the
/// original is kept for assertions.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingResultHandler::<bool>::new();
/// validator.add_result_handler(Arc::new(recorder.clone()));
///
/// trigger.fire()?;
/// assert_eq!(recorder.values(), vec![true]);
/// ```
pub struct RecordingResultHandler<T> {
    values: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> RecordingResultHandler<T> {
    /// Create a new recording handler.
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded results.
    pub fn values(&self) -> Vec<T> {
        self.values.lock().clone()
    }

    /// Get the number of recorded results.
    pub fn count(&self) -> usize {
        self.values.lock().len()
    }

    /// Clear all recorded results.
    pub fn clear(&self) {
        self.values.lock().clear();
    }
}

impl<T: Clone> Default for RecordingResultHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordingResultHandler<T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

impl<T> ResultHandler<T> for RecordingResultHandler<T>
where
    T: Clone + Send + 'static,
{
    fn handle_result(&self, result: &T) {
        self.values.lock().push(result.clone());
    }
}

// ============================================================================
// Counting Trigger
// ============================================================================

/// A trigger that counts how often listeners were added and removed.
///
/// # Example
///
/// ```rust,ignore
/// let trigger = Arc::new(CountingTrigger::new());
/// validator.add_trigger(trigger.clone());
/// validator.add_trigger(trigger.clone());
///
/// assert_eq!(trigger.added(), 1);
/// ```
#[derive(Default)]
pub struct CountingTrigger {
    listeners: TriggerListeners,
    added: AtomicUsize,
    removed: AtomicUsize,
}

impl CountingTrigger {
    /// Create a new counting trigger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `add_trigger_listener` calls.
    pub fn added(&self) -> usize {
        self.added.load(Ordering::SeqCst)
    }

    /// Number of `remove_trigger_listener` calls.
    pub fn removed(&self) -> usize {
        self.removed.load(Ordering::SeqCst)
    }

    /// Number of listeners currently registered.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Notify all listeners.
    pub fn fire(&self) -> Result<(), VigilError> {
        self.listeners.fire(&TriggerEvent::from_component(self))
    }
}

impl Trigger for CountingTrigger {
    fn add_trigger_listener(&self, listener: Arc<dyn TriggerListener>) {
        self.added.fetch_add(1, Ordering::SeqCst);
        self.listeners.add(listener);
    }

    fn remove_trigger_listener(&self, listener: &Arc<dyn TriggerListener>) {
        self.removed.fetch_add(1, Ordering::SeqCst);
        self.listeners.remove(listener);
    }
}

// ============================================================================
// Probe
// ============================================================================

/// A disposable component playing every role at once.
///
/// As a data provider it returns its value; as a rule it returns its input
/// unchanged; as a result handler it records results; as a trigger it can be
/// fired. Every role reports the probe itself as its disposer, which makes
/// the probe suited to checking that disposal happens once per component.
pub struct Probe<T> {
    value: Mutex<T>,
    handled: Mutex<Vec<T>>,
    listeners: TriggerListeners,
    disposals: AtomicUsize,
}

impl<T: Clone> Probe<T> {
    /// Create a probe providing `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            handled: Mutex::new(Vec::new()),
            listeners: TriggerListeners::new(),
            disposals: AtomicUsize::new(0),
        }
    }

    /// Change the provided value.
    pub fn set(&self, value: T) {
        *self.value.lock() = value;
    }

    /// Results handled so far.
    pub fn handled(&self) -> Vec<T> {
        self.handled.lock().clone()
    }

    /// Number of times the probe was disposed.
    pub fn disposals(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }

    /// Number of listeners currently registered.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Notify all listeners.
    pub fn fire(&self) -> Result<(), VigilError> {
        self.listeners.fire(&TriggerEvent::from_component(self))
    }
}

impl<T: Send> Disposable for Probe<T> {
    fn dispose(&self) {
        self.disposals.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T> DataProvider<T> for Probe<T>
where
    T: Clone + Send + 'static,
{
    fn get_data(&self) -> T {
        self.value.lock().clone()
    }

    fn disposer(&self) -> Option<&dyn Disposable> {
        Some(self)
    }
}

impl<T> Rule<T, T> for Probe<T>
where
    T: Clone + Send + 'static,
{
    fn validate(&self, input: &T) -> T {
        input.clone()
    }

    fn disposer(&self) -> Option<&dyn Disposable> {
        Some(self)
    }
}

impl<T> ResultHandler<T> for Probe<T>
where
    T: Clone + Send + 'static,
{
    fn handle_result(&self, result: &T) {
        self.handled.lock().push(result.clone());
    }

    fn disposer(&self) -> Option<&dyn Disposable> {
        Some(self)
    }
}

impl<T> Trigger for Probe<T>
where
    T: Clone + Send + 'static,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_handler_shares_record() {
        let recorder = RecordingResultHandler::<u8>::new();
        let registered = recorder.clone();
        registered.handle_result(&1);
        registered.handle_result(&2);
        assert_eq!(recorder.values(), vec![1, 2]);

        recorder.clear();
        assert_eq!(registered.count(), 0);
    }

    #[test]
    fn test_probe_roles() {
        let probe = Probe::new("x".to_string());
        assert_eq!(probe.get_data(), "x");
        assert_eq!(probe.validate(&"y".to_string()), "y");
        probe.handle_result(&"z".to_string());
        assert_eq!(probe.handled(), vec!["z".to_string()]);

        let disposer = DataProvider::disposer(&probe);
        assert!(disposer.is_some());
        probe.dispose();
        assert_eq!(probe.disposals(), 1);
    }
}
