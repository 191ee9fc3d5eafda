//! Point-to-point validation.
//!
//! Instead of "every rule sees every data provider", the mappable validator
//! routes through three explicit tables:
//!
//! - trigger → data providers
//! - data provider → rules
//! - rule result → result handlers
//!
//! A firing only reads the providers mapped to the firing trigger, runs only
//! the rules mapped to each provider, and calls only the handlers mapped to
//! the result value each rule returned. Missing entries are logged and end
//! that branch of the firing.

use super::{disposal::DisposalSet, hooks::TriggerHookRegistry, remove_first};
use parking_lot::Mutex;
use std::{
    collections::{HashMap, HashSet},
    fmt,
    hash::Hash,
    sync::{Arc, Weak},
};
use vigil_core::{
    ComponentId, DataProvider, Disposable, PipelineError, ResultHandler, Rule, Trigger,
    TriggerListener, TriggerProcessor,
};

/// Ordered table keyed by component identity.
///
/// Each key maps to an ordered list of values that may contain duplicates.
/// An entry disappears with its last value.
struct IdentityTable<K: ?Sized, V: ?Sized> {
    entries: Vec<(Arc<K>, Vec<Arc<V>>)>,
}

impl<K: ?Sized, V: ?Sized> Default for IdentityTable<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: ?Sized, V: ?Sized> IdentityTable<K, V> {
    fn position(&self, key: ComponentId) -> Option<usize> {
        self.entries
            .iter()
            .position(|(candidate, _)| ComponentId::of_arc(candidate) == key)
    }

    fn get(&self, key: ComponentId) -> Option<&[Arc<V>]> {
        self.position(key)
            .map(|index| self.entries[index].1.as_slice())
    }

    /// Append `value` to the list of `key`; returns the new list length.
    fn insert(&mut self, key: Arc<K>, value: Arc<V>) -> usize {
        let id = ComponentId::of_arc(&key);
        match self.position(id) {
            Some(index) => {
                let values = &mut self.entries[index].1;
                values.push(value);
                values.len()
            }
            None => {
                self.entries.push((key, vec![value]));
                1
            }
        }
    }

    /// Remove the first occurrence of `value` under `key`.
    ///
    /// Returns the number of values left under `key`, or `None` when nothing
    /// was removed.
    fn remove(&mut self, key: ComponentId, value: ComponentId) -> Option<usize> {
        let index = self.position(key)?;
        let values = &mut self.entries[index].1;
        remove_first(values, value)?;
        let remaining = values.len();
        if remaining == 0 {
            self.entries.remove(index);
        }
        Some(remaining)
    }

    fn iter(&self) -> impl Iterator<Item = &(Arc<K>, Vec<Arc<V>>)> {
        self.entries.iter()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: ?Sized, V: ?Sized> Clone for IdentityTable<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

struct State<D, R> {
    trigger_to_providers: IdentityTable<dyn Trigger, dyn DataProvider<D>>,
    provider_to_rules: IdentityTable<dyn DataProvider<D>, dyn Rule<D, R>>,
    result_to_handlers: HashMap<R, Vec<Arc<dyn ResultHandler<R>>>>,
    hooks: TriggerHookRegistry,
}

struct Inner<D, R> {
    state: Mutex<State<D, R>>,
}

impl<D, R> Inner<D, R>
where
    D: 'static,
    R: Eq + Hash + Send + 'static,
{
    fn providers_for(&self, trigger: ComponentId) -> Option<Vec<Arc<dyn DataProvider<D>>>> {
        let state = self.state.lock();
        state.trigger_to_providers.get(trigger).map(<[_]>::to_vec)
    }

    fn rules_for(&self, provider: ComponentId) -> Option<Vec<Arc<dyn Rule<D, R>>>> {
        let state = self.state.lock();
        state.provider_to_rules.get(provider).map(<[_]>::to_vec)
    }

    fn handlers_for(&self, result: &R) -> Option<Vec<Arc<dyn ResultHandler<R>>>> {
        self.state.lock().result_to_handlers.get(result).cloned()
    }
}

impl<D, R> TriggerProcessor for Inner<D, R>
where
    D: 'static,
    R: Eq + Hash + Send + 'static,
{
    fn process_trigger(&self, trigger: ComponentId) -> Result<(), PipelineError> {
        let Some(providers) = self.providers_for(trigger) else {
            tracing::warn!(%trigger, "no data provider mapped to trigger");
            return Ok(());
        };
        tracing::debug!(%trigger, data_providers = providers.len(), "processing trigger");

        for provider in providers {
            let provider_id = ComponentId::of_arc(&provider);
            let Some(rules) = self.rules_for(provider_id) else {
                tracing::warn!(%trigger, data_provider = %provider_id, "no rule mapped to data provider");
                continue;
            };
            let data = provider.get_data();
            for rule in rules {
                let result = rule.validate(&data);
                let Some(handlers) = self.handlers_for(&result) else {
                    tracing::warn!(
                        %trigger,
                        rule = %ComponentId::of_arc(&rule),
                        "no result handler mapped to rule result"
                    );
                    continue;
                };
                for handler in handlers {
                    handler.handle_result(&result);
                }
            }
        }
        Ok(())
    }
}

/// Validator routing through explicit many-to-many tables.
///
/// `D` is the data type read from providers and fed to rules; `R` is the
/// rule result, which doubles as the key selecting result handlers.
///
/// A trigger is hooked while at least one (trigger, data provider) entry
/// refers to it; mapping the same pair twice counts as two occurrences.
///
/// Clones share the same tables. Hooking and unhooking a trigger happen
/// after the table lock is released, so clones mapping and unmapping the same
/// trigger from several threads must be synchronized by the caller.
///
/// Without [`Disposable::dispose`], each hooked trigger keeps one inert
/// listener after the last handle is dropped.
///
/// # Example
///
/// ```rust,ignore
/// let validator = MappableValidator::<String, bool>::new();
/// validator.map_trigger_to_data_provider(name_changed.clone(), name.clone());
/// validator.map_data_provider_to_rule(name.clone(), Arc::new(NotEmptyString));
/// validator.map_result_to_result_handler(false, error_icon.clone());
/// ```
pub struct MappableValidator<D, R> {
    inner: Arc<Inner<D, R>>,
}

impl<D, R> Clone for MappableValidator<D, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D, R> Default for MappableValidator<D, R>
where
    D: 'static,
    R: Eq + Hash + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> MappableValidator<D, R>
where
    D: 'static,
    R: Eq + Hash + Send + 'static,
{
    /// Create a validator with empty tables.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    trigger_to_providers: IdentityTable::default(),
                    provider_to_rules: IdentityTable::default(),
                    result_to_handlers: HashMap::new(),
                    hooks: TriggerHookRegistry::default(),
                }),
            }),
        }
    }

    fn processor(&self) -> Weak<dyn TriggerProcessor> {
        let weak: Weak<Inner<D, R>> = Arc::downgrade(&self.inner);
        weak
    }

    /// Read `provider` whenever `trigger` fires.
    pub fn map_trigger_to_data_provider(
        &self,
        trigger: Arc<dyn Trigger>,
        provider: Arc<dyn DataProvider<D>>,
    ) {
        let id = ComponentId::of_arc(&trigger);
        let processor = self.processor();
        let adapter = {
            let mut state = self.inner.state.lock();
            state
                .trigger_to_providers
                .insert(Arc::clone(&trigger), provider);
            state.hooks.hook(id, &processor)
        };
        if let Some(adapter) = adapter {
            trigger.add_trigger_listener(adapter);
        }
    }

    /// Remove one (trigger, provider) entry.
    ///
    /// The trigger is unhooked once no entry refers to it.
    pub fn unmap_trigger_from_data_provider<T, P>(&self, trigger: &Arc<T>, provider: &Arc<P>) -> bool
    where
        T: Trigger + ?Sized,
        P: ?Sized,
    {
        let id = ComponentId::of_arc(trigger);
        let adapter = {
            let mut state = self.inner.state.lock();
            let Some(remaining) = state
                .trigger_to_providers
                .remove(id, ComponentId::of_arc(provider))
            else {
                return false;
            };
            state.hooks.unhook(id, remaining)
        };
        if let Some(adapter) = adapter {
            trigger.remove_trigger_listener(&adapter);
        }
        true
    }

    /// Run `rule` on the data of `provider`.
    pub fn map_data_provider_to_rule(
        &self,
        provider: Arc<dyn DataProvider<D>>,
        rule: Arc<dyn Rule<D, R>>,
    ) {
        self.inner
            .state
            .lock()
            .provider_to_rules
            .insert(provider, rule);
    }

    /// Remove one (provider, rule) entry.
    pub fn unmap_data_provider_from_rule<P: ?Sized, Q: ?Sized>(
        &self,
        provider: &Arc<P>,
        rule: &Arc<Q>,
    ) -> bool {
        self.inner
            .state
            .lock()
            .provider_to_rules
            .remove(ComponentId::of_arc(provider), ComponentId::of_arc(rule))
            .is_some()
    }

    /// Call `handler` whenever a rule returns `result`.
    pub fn map_result_to_result_handler(&self, result: R, handler: Arc<dyn ResultHandler<R>>) {
        self.inner
            .state
            .lock()
            .result_to_handlers
            .entry(result)
            .or_default()
            .push(handler);
    }

    /// Remove one (result, handler) entry.
    pub fn unmap_result_from_result_handler<H: ?Sized>(&self, result: &R, handler: &Arc<H>) -> bool {
        let mut state = self.inner.state.lock();
        let Some(handlers) = state.result_to_handlers.get_mut(result) else {
            return false;
        };
        if remove_first(handlers, ComponentId::of_arc(handler)).is_none() {
            return false;
        }
        if handlers.is_empty() {
            state.result_to_handlers.remove(result);
        }
        true
    }

    /// Providers read when `trigger` fires, in mapping order.
    pub fn data_providers_for<T: ?Sized>(&self, trigger: &Arc<T>) -> Vec<Arc<dyn DataProvider<D>>> {
        self.inner
            .providers_for(ComponentId::of_arc(trigger))
            .unwrap_or_default()
    }

    /// Rules run on the data of `provider`, in mapping order.
    pub fn rules_for<P: ?Sized>(&self, provider: &Arc<P>) -> Vec<Arc<dyn Rule<D, R>>> {
        self.inner
            .rules_for(ComponentId::of_arc(provider))
            .unwrap_or_default()
    }

    /// Handlers called for `result`, in mapping order.
    pub fn result_handlers_for(&self, result: &R) -> Vec<Arc<dyn ResultHandler<R>>> {
        self.inner.handlers_for(result).unwrap_or_default()
    }

    /// Number of distinct triggers currently hooked.
    pub fn hooked_trigger_count(&self) -> usize {
        self.inner.state.lock().hooks.len()
    }

    /// Number of occurrences of `trigger` in the trigger table.
    pub fn trigger_occurrences<T: ?Sized>(&self, trigger: &Arc<T>) -> usize {
        self.inner
            .state
            .lock()
            .trigger_to_providers
            .get(ComponentId::of_arc(trigger))
            .map_or(0, <[_]>::len)
    }

    /// Run one firing as if `trigger` had fired.
    pub fn process_trigger<T: Trigger + ?Sized>(
        &self,
        trigger: &Arc<T>,
    ) -> Result<(), PipelineError> {
        self.inner.process_trigger(ComponentId::of_arc(trigger))
    }
}

impl<D, R> Disposable for MappableValidator<D, R>
where
    D: 'static,
    R: Eq + Hash + Send + 'static,
{
    /// Unhook and dispose triggers, then the tables tier by tier, then clear.
    ///
    /// Components reachable from several tiers are disposed once. Calling
    /// `dispose` again is a no-op.
    fn dispose(&self) {
        let (triggers, provider_to_rules, handlers) = {
            let state = self.inner.state.lock();
            let triggers: Vec<_> = state
                .trigger_to_providers
                .iter()
                .map(|(trigger, providers)| {
                    let adapter: Option<Arc<dyn TriggerListener>> =
                        state.hooks.adapter(ComponentId::of_arc(trigger));
                    (Arc::clone(trigger), adapter, providers.clone())
                })
                .collect();
            let handlers: Vec<Arc<dyn ResultHandler<R>>> =
                state.result_to_handlers.values().flatten().cloned().collect();
            (triggers, state.provider_to_rules.clone(), handlers)
        };

        let mut disposed = DisposalSet::default();
        let mut unhooked = HashSet::new();
        for (trigger, adapter, _) in &triggers {
            if let Some(adapter) = adapter {
                if unhooked.insert(ComponentId::of_arc(trigger)) {
                    trigger.remove_trigger_listener(adapter);
                }
            }
            disposed.dispose(trigger.disposer());
        }
        for (_, _, providers) in &triggers {
            for provider in providers {
                disposed.dispose(provider.disposer());
            }
        }
        for (provider, rules) in provider_to_rules.iter() {
            disposed.dispose(provider.disposer());
            for rule in rules {
                disposed.dispose(rule.disposer());
            }
        }
        for handler in &handlers {
            disposed.dispose(handler.disposer());
        }

        let mut state = self.inner.state.lock();
        state.trigger_to_providers.clear();
        state.provider_to_rules.clear();
        state.result_to_handlers.clear();
        state.hooks.clear();
        tracing::debug!(
            unhooked = unhooked.len(),
            disposed = disposed.len(),
            "mappable validator disposed"
        );
    }
}

impl<D, R> fmt::Debug for MappableValidator<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("MappableValidator")
            .field("triggers", &state.trigger_to_providers.len())
            .field("hooked_triggers", &state.hooks.len())
            .field("data_providers", &state.provider_to_rules.len())
            .field("results", &state.result_to_handlers.len())
            .finish()
    }
}
