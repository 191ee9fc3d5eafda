//! Trigger-hook registry.
//!
//! A validator hooks exactly one listener adapter onto each distinct trigger,
//! however many times that trigger is registered. The registry only does the
//! bookkeeping; attaching and detaching the adapter on the trigger is left to
//! the validator, which does it outside its state lock.
//!
//! Whether a trigger is still registered is decided from the validator's live
//! occurrence count, never from the registry keys.

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};
use vigil_core::{BoxError, ComponentId, TriggerEvent, TriggerListener, TriggerProcessor};

/// Listener hooked onto a trigger on behalf of a validator.
///
/// Holds the validator weakly: a dropped validator leaves inert adapters
/// behind rather than being kept alive by its triggers.
pub(crate) struct TriggerAdapter {
    trigger: ComponentId,
    processor: Weak<dyn TriggerProcessor>,
}

impl TriggerListener for TriggerAdapter {
    fn trigger_validation(&self, event: &TriggerEvent) -> Result<(), BoxError> {
        let Some(processor) = self.processor.upgrade() else {
            tracing::trace!(trigger = %self.trigger, source = %event.source(), "validator dropped, ignoring trigger");
            return Ok(());
        };
        processor.process_trigger(self.trigger)?;
        Ok(())
    }
}

/// Identity-keyed map from trigger to its shared adapter.
#[derive(Default)]
pub(crate) struct TriggerHookRegistry {
    adapters: HashMap<ComponentId, Arc<dyn TriggerListener>>,
}

impl TriggerHookRegistry {
    /// Record a registration of `trigger`.
    ///
    /// Returns the adapter the caller must attach to the trigger when this is
    /// the first registration, `None` when the trigger is already hooked.
    pub(crate) fn hook(
        &mut self,
        trigger: ComponentId,
        processor: &Weak<dyn TriggerProcessor>,
    ) -> Option<Arc<dyn TriggerListener>> {
        if self.adapters.contains_key(&trigger) {
            return None;
        }
        let adapter: Arc<dyn TriggerListener> = Arc::new(TriggerAdapter {
            trigger,
            processor: processor.clone(),
        });
        self.adapters.insert(trigger, adapter.clone());
        tracing::trace!(%trigger, "hooked trigger");
        Some(adapter)
    }

    /// Record the removal of one occurrence of `trigger`.
    ///
    /// `remaining` is the number of occurrences still registered after the
    /// removal. Returns the adapter the caller must detach from the trigger
    /// once the last occurrence is gone. Unknown triggers are a no-op.
    pub(crate) fn unhook(
        &mut self,
        trigger: ComponentId,
        remaining: usize,
    ) -> Option<Arc<dyn TriggerListener>> {
        if remaining > 0 {
            return None;
        }
        let adapter = self.adapters.remove(&trigger)?;
        tracing::trace!(%trigger, "unhooked trigger");
        Some(adapter)
    }

    /// Adapter currently hooked onto `trigger`.
    pub(crate) fn adapter(&self, trigger: ComponentId) -> Option<Arc<dyn TriggerListener>> {
        self.adapters.get(&trigger).cloned()
    }

    /// Number of hooked triggers.
    pub(crate) fn len(&self) -> usize {
        self.adapters.len()
    }

    pub(crate) fn clear(&mut self) {
        self.adapters.clear();
    }
}
