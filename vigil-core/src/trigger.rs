//! # Triggers
//!
//! A trigger is an event source announcing that a validation should run
//! (a field lost focus, a key was typed, a cell was edited). Triggers know
//! nothing about validation: they only notify their [`TriggerListener`]s.
//!
//! Validators register one listener adapter per distinct trigger. The adapter
//! turns the notification into a call to [`TriggerProcessor::process_trigger`],
//! which runs the whole pipeline synchronously before returning.

use crate::{dispose::Disposable, error::BoxError, error::PipelineError, id::ComponentId};
use std::sync::Arc;

/// Event passed from a trigger to its listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    source: ComponentId,
}

impl TriggerEvent {
    /// Create an event originating from `source`.
    pub fn new(source: ComponentId) -> Self {
        Self { source }
    }

    /// Create an event originating from the component `source`.
    pub fn from_component<T: ?Sized>(source: &T) -> Self {
        Self::new(ComponentId::of(source))
    }

    /// Opaque identity of the component that fired.
    pub fn source(&self) -> ComponentId {
        self.source
    }
}

/// Receives notifications from a [`Trigger`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `TriggerListener`",
    label = "missing `TriggerListener` implementation",
    note = "Trigger listeners must implement `trigger_validation`."
)]
pub trait TriggerListener: Send + Sync + 'static {
    /// Called when the trigger fires.
    ///
    /// Errors are propagated back to whatever fired the trigger.
    fn trigger_validation(&self, event: &TriggerEvent) -> Result<(), BoxError>;
}

/// An event source that notifies listeners when a validation should run.
///
/// Triggers are identity-significant: registering the same `Arc` twice on a
/// validator is two occurrences of *one* trigger.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Trigger`",
    label = "missing `Trigger` implementation",
    note = "Triggers must manage a list of `TriggerListener`s."
)]
pub trait Trigger: Send + Sync + 'static {
    /// Start notifying `listener`.
    fn add_trigger_listener(&self, listener: Arc<dyn TriggerListener>);

    /// Stop notifying `listener` (matched by identity).
    fn remove_trigger_listener(&self, listener: &Arc<dyn TriggerListener>);

    /// Teardown capability, if this trigger holds resources.
    fn disposer(&self) -> Option<&dyn Disposable> {
        None
    }
}

/// Something that runs a validation when one of its triggers fires.
///
/// Implemented by validators. Trigger adapters hold a weak reference to a
/// `TriggerProcessor` so that triggers never keep a validator alive.
pub trait TriggerProcessor: Send + Sync + 'static {
    /// Run one firing on behalf of the trigger identified by `trigger`.
    fn process_trigger(&self, trigger: ComponentId) -> Result<(), PipelineError>;
}
