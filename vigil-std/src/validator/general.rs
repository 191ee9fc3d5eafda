//! The general validation pipeline.
//!
//! A firing runs eight stages, synchronously, on the thread that fired the
//! trigger:
//!
//! 1. read every data provider, in registration order
//! 2. apply the data-provider-output chain to each output
//! 3. map outputs to rule inputs (`EachToEach`: one input per output,
//!    `AllToEach`: one `Vec` of all outputs)
//! 4. apply the rule-input chain
//! 5. run every rule on each rule input
//! 6. apply the rule-output chain to each result
//! 7. map results to handler inputs, per rule input, like stage 3
//! 8. apply the result-handler-input chain and call every handler
//!
//! Configuration gaps are logged and skip the firing. Type mismatches abort
//! it with a [`PipelineError`]; handlers already called stay called.

use super::{
    config::MappingConfig, disposal::DisposalSet, hooks::TriggerHookRegistry, occurrences,
    remove_first,
};
use parking_lot::Mutex;
use std::{
    any::Any,
    collections::HashSet,
    fmt,
    marker::PhantomData,
    sync::{Arc, Weak},
};
use vigil_core::{
    AnyValue, ComponentId, DataProvider, Disposable, MappingStrategy, PipelineError,
    ResultHandler, Rule, Stage, Transformer, TransformerChain, TransformerHandle, Trigger,
    TriggerListener, TriggerProcessor, TypeMismatch, downcast_value,
};

/// Selects one of the four transformer chains of a [`GeneralValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformStage {
    /// Applied to each data provider output (stage 2).
    DataProviderOutput,
    /// Applied to each rule input (stage 4).
    RuleInput,
    /// Applied to each rule output (stage 6).
    RuleOutput,
    /// Applied to each result handler input (stage 8).
    ResultHandlerInput,
}

#[derive(Clone, Default)]
struct Chains {
    data_provider_output: TransformerChain,
    rule_input: TransformerChain,
    rule_output: TransformerChain,
    result_handler_input: TransformerChain,
}

impl Chains {
    fn get(&self, stage: TransformStage) -> &TransformerChain {
        match stage {
            TransformStage::DataProviderOutput => &self.data_provider_output,
            TransformStage::RuleInput => &self.rule_input,
            TransformStage::RuleOutput => &self.rule_output,
            TransformStage::ResultHandlerInput => &self.result_handler_input,
        }
    }

    fn get_mut(&mut self, stage: TransformStage) -> &mut TransformerChain {
        match stage {
            TransformStage::DataProviderOutput => &mut self.data_provider_output,
            TransformStage::RuleInput => &mut self.rule_input,
            TransformStage::RuleOutput => &mut self.rule_output,
            TransformStage::ResultHandlerInput => &mut self.result_handler_input,
        }
    }
}

struct State<DPO, RI, RO, RHI> {
    triggers: Vec<Arc<dyn Trigger>>,
    data_providers: Vec<Arc<dyn DataProvider<DPO>>>,
    rules: Vec<Arc<dyn Rule<RI, RO>>>,
    result_handlers: Vec<Arc<dyn ResultHandler<RHI>>>,
    hooks: TriggerHookRegistry,
    chains: Chains,
    mapping: MappingConfig,
}

impl<DPO, RI, RO, RHI> State<DPO, RI, RO, RHI> {
    fn new(mapping: MappingConfig) -> Self {
        Self {
            triggers: Vec::new(),
            data_providers: Vec::new(),
            rules: Vec::new(),
            result_handlers: Vec::new(),
            hooks: TriggerHookRegistry::default(),
            chains: Chains::default(),
            mapping,
        }
    }

    fn snapshot(&self) -> Firing<DPO, RI, RO, RHI> {
        Firing {
            data_providers: self.data_providers.clone(),
            rules: self.rules.clone(),
            result_handlers: self.result_handlers.clone(),
            chains: self.chains.clone(),
            mapping: self.mapping,
        }
    }
}

/// Everything one firing needs, copied out of the state lock so that
/// components may re-enter the validator.
struct Firing<DPO, RI, RO, RHI> {
    data_providers: Vec<Arc<dyn DataProvider<DPO>>>,
    rules: Vec<Arc<dyn Rule<RI, RO>>>,
    result_handlers: Vec<Arc<dyn ResultHandler<RHI>>>,
    chains: Chains,
    mapping: MappingConfig,
}

impl<DPO, RI, RO, RHI> Firing<DPO, RI, RO, RHI>
where
    DPO: Send + 'static,
    RI: 'static,
    RO: Send + 'static,
    RHI: 'static,
{
    fn run<TDPO, TRO>(&self, trigger: ComponentId) -> Result<(), PipelineError>
    where
        TDPO: Send + 'static,
        TRO: Send + 'static,
    {
        if self.data_providers.is_empty() {
            tracing::warn!(%trigger, "no data provider registered, nothing to validate");
            return Ok(());
        }
        tracing::debug!(
            %trigger,
            data_providers = self.data_providers.len(),
            rules = self.rules.len(),
            result_handlers = self.result_handlers.len(),
            "processing trigger"
        );

        let mut outputs = Vec::with_capacity(self.data_providers.len());
        for provider in &self.data_providers {
            let data: AnyValue = Box::new(provider.get_data());
            let data = self
                .chains
                .data_provider_output
                .apply(data)
                .map_err(PipelineError::at(Stage::DataProviderOutput))?;
            outputs.push(data);
        }

        let Some(data_provider_to_rule) = self.mapping.data_provider_to_rule else {
            tracing::warn!(%trigger, "data provider to rule mapping is not set, skipping validation");
            return Ok(());
        };
        let Some(rule_to_result_handler) = self.mapping.rule_to_result_handler else {
            tracing::warn!(%trigger, "rule to result handler mapping is not set, skipping validation");
            return Ok(());
        };

        let rule_inputs = map_values::<TDPO>(outputs, data_provider_to_rule)
            .map_err(PipelineError::at(Stage::DataProviderToRule))?;
        for rule_input in rule_inputs {
            self.validate::<TRO>(rule_input, rule_to_result_handler)?;
        }
        Ok(())
    }

    /// Stages 4 to 8 for one rule input.
    fn validate<TRO>(&self, rule_input: AnyValue, mapping: MappingStrategy) -> Result<(), PipelineError>
    where
        TRO: Send + 'static,
    {
        let rule_input = self
            .chains
            .rule_input
            .apply(rule_input)
            .and_then(downcast_value::<RI>)
            .map_err(PipelineError::at(Stage::RuleInput))?;

        let mut results = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let result: AnyValue = Box::new(rule.validate(&rule_input));
            let result = self
                .chains
                .rule_output
                .apply(result)
                .map_err(PipelineError::at(Stage::RuleOutput))?;
            results.push(result);
        }

        let handler_inputs = map_values::<TRO>(results, mapping)
            .map_err(PipelineError::at(Stage::RuleToResultHandler))?;
        for handler_input in handler_inputs {
            let handler_input = self
                .chains
                .result_handler_input
                .apply(handler_input)
                .and_then(downcast_value::<RHI>)
                .map_err(PipelineError::at(Stage::ResultHandlerInput))?;
            for handler in &self.result_handlers {
                handler.handle_result(&handler_input);
            }
        }
        Ok(())
    }
}

/// Cross a joint.
///
/// `AllToEach` builds a new `Vec<T>` on every call, so downstream identity
/// checks always see a fresh collection.
fn map_values<T: Any + Send>(
    values: Vec<AnyValue>,
    mapping: MappingStrategy,
) -> Result<Vec<AnyValue>, TypeMismatch> {
    match mapping {
        MappingStrategy::EachToEach => Ok(values),
        MappingStrategy::AllToEach => {
            let collected = values
                .into_iter()
                .map(downcast_value::<T>)
                .collect::<Result<Vec<T>, _>>()?;
            Ok(vec![Box::new(collected) as AnyValue])
        }
    }
}

struct Inner<DPO, TDPO, RI, RO, TRO, RHI> {
    state: Mutex<State<DPO, RI, RO, RHI>>,
    _types: PhantomData<fn() -> (TDPO, TRO)>,
}

impl<DPO, TDPO, RI, RO, TRO, RHI> TriggerProcessor for Inner<DPO, TDPO, RI, RO, TRO, RHI>
where
    DPO: Send + 'static,
    TDPO: Send + 'static,
    RI: 'static,
    RO: Send + 'static,
    TRO: Send + 'static,
    RHI: 'static,
{
    fn process_trigger(&self, trigger: ComponentId) -> Result<(), PipelineError> {
        let firing = self.state.lock().snapshot();
        firing.run::<TDPO, TRO>(trigger)
    }
}

/// The configurable many-to-many validation engine.
///
/// Type parameters follow the value through the pipeline:
///
/// | param | value |
/// |-------|-------|
/// | `DPO` | data provider output |
/// | `TDPO` | data-provider-output chain output, element of the `AllToEach` collection |
/// | `RI` | rule input |
/// | `RO` | rule output |
/// | `TRO` | rule-output chain output, element of the `AllToEach` collection |
/// | `RHI` | result handler input |
///
/// With empty chains, `EachToEach` needs `DPO = TDPO = RI` and
/// `RO = TRO = RHI`; `AllToEach` needs `RI = Vec<TDPO>` (resp.
/// `RHI = Vec<TRO>`). Chains may change types in between; mismatches are
/// reported as [`PipelineError::TypeMismatch`] when a trigger fires.
///
/// The validator is a cheap handle: clones share the same registrations.
/// Collections preserve insertion order and allow duplicates; removal drops
/// the first occurrence.
///
/// Triggers are attached and detached after the registration lock is
/// released. Clones used from several threads must serialize their
/// `add_trigger`/`remove_trigger` calls on the same trigger themselves, or a
/// trigger may keep a listener the validator no longer counts.
///
/// Dropping every handle without calling [`Disposable::dispose`] leaves one
/// inert listener on each hooked trigger for as long as that trigger lives.
///
/// # Example
///
/// ```rust,ignore
/// let validator = GeneralValidator::<String, String, String, bool, bool, bool>::new();
/// validator.add_trigger(submit.clone());
/// validator.add_data_provider(name_field.clone());
/// validator.add_rule(Arc::new(NotEmptyString));
/// validator.add_result_handler(Arc::new(|valid: &bool| icon.set_visible(!*valid)));
///
/// submit.fire()?;
/// ```
pub struct GeneralValidator<DPO, TDPO, RI, RO, TRO, RHI> {
    inner: Arc<Inner<DPO, TDPO, RI, RO, TRO, RHI>>,
}

impl<DPO, TDPO, RI, RO, TRO, RHI> Clone for GeneralValidator<DPO, TDPO, RI, RO, TRO, RHI> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<DPO, TDPO, RI, RO, TRO, RHI> Default for GeneralValidator<DPO, TDPO, RI, RO, TRO, RHI>
where
    DPO: Send + 'static,
    TDPO: Send + 'static,
    RI: 'static,
    RO: Send + 'static,
    TRO: Send + 'static,
    RHI: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<DPO, TDPO, RI, RO, TRO, RHI> GeneralValidator<DPO, TDPO, RI, RO, TRO, RHI>
where
    DPO: Send + 'static,
    TDPO: Send + 'static,
    RI: 'static,
    RO: Send + 'static,
    TRO: Send + 'static,
    RHI: 'static,
{
    /// Create a validator with `EachToEach` at both joints.
    pub fn new() -> Self {
        Self::with_config(MappingConfig::default())
    }

    /// Create a validator with the given mapping strategies.
    pub fn with_config(mapping: MappingConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::new(mapping)),
                _types: PhantomData,
            }),
        }
    }

    fn processor(&self) -> Weak<dyn TriggerProcessor> {
        let weak: Weak<Inner<DPO, TDPO, RI, RO, TRO, RHI>> = Arc::downgrade(&self.inner);
        weak
    }

    // ------------------------------------------------------------------
    // Triggers
    // ------------------------------------------------------------------

    /// Register `trigger`.
    ///
    /// The first registration of a trigger hooks an adapter onto it; further
    /// registrations of the same trigger only add occurrences.
    pub fn add_trigger(&self, trigger: Arc<dyn Trigger>) {
        let id = ComponentId::of_arc(&trigger);
        let processor = self.processor();
        let adapter = {
            let mut state = self.inner.state.lock();
            state.triggers.push(Arc::clone(&trigger));
            state.hooks.hook(id, &processor)
        };
        if let Some(adapter) = adapter {
            trigger.add_trigger_listener(adapter);
        }
    }

    /// Remove one occurrence of `trigger`.
    ///
    /// The adapter is unhooked when the last occurrence goes. Returns `false`
    /// when the trigger is not registered.
    pub fn remove_trigger<T: ?Sized>(&self, trigger: &Arc<T>) -> bool {
        let id = ComponentId::of_arc(trigger);
        let (removed, adapter) = {
            let mut state = self.inner.state.lock();
            let Some(removed) = remove_first(&mut state.triggers, id) else {
                return false;
            };
            let remaining = occurrences(&state.triggers, id);
            let adapter = state.hooks.unhook(id, remaining);
            (removed, adapter)
        };
        if let Some(adapter) = adapter {
            removed.remove_trigger_listener(&adapter);
        }
        true
    }

    /// Registered triggers, one entry per occurrence.
    pub fn triggers(&self) -> Vec<Arc<dyn Trigger>> {
        self.inner.state.lock().triggers.clone()
    }

    /// Number of distinct triggers currently hooked.
    pub fn hooked_trigger_count(&self) -> usize {
        self.inner.state.lock().hooks.len()
    }

    // ------------------------------------------------------------------
    // Data providers, rules, result handlers
    // ------------------------------------------------------------------

    /// Register a data provider.
    pub fn add_data_provider(&self, provider: Arc<dyn DataProvider<DPO>>) {
        self.inner.state.lock().data_providers.push(provider);
    }

    /// Remove one occurrence of `provider`.
    pub fn remove_data_provider<P: ?Sized>(&self, provider: &Arc<P>) -> bool {
        let id = ComponentId::of_arc(provider);
        remove_first(&mut self.inner.state.lock().data_providers, id).is_some()
    }

    /// Registered data providers, in registration order.
    pub fn data_providers(&self) -> Vec<Arc<dyn DataProvider<DPO>>> {
        self.inner.state.lock().data_providers.clone()
    }

    /// Register a rule.
    pub fn add_rule(&self, rule: Arc<dyn Rule<RI, RO>>) {
        self.inner.state.lock().rules.push(rule);
    }

    /// Remove one occurrence of `rule`.
    pub fn remove_rule<P: ?Sized>(&self, rule: &Arc<P>) -> bool {
        let id = ComponentId::of_arc(rule);
        remove_first(&mut self.inner.state.lock().rules, id).is_some()
    }

    /// Registered rules, in registration order.
    pub fn rules(&self) -> Vec<Arc<dyn Rule<RI, RO>>> {
        self.inner.state.lock().rules.clone()
    }

    /// Register a result handler.
    pub fn add_result_handler(&self, handler: Arc<dyn ResultHandler<RHI>>) {
        self.inner.state.lock().result_handlers.push(handler);
    }

    /// Remove one occurrence of `handler`.
    pub fn remove_result_handler<P: ?Sized>(&self, handler: &Arc<P>) -> bool {
        let id = ComponentId::of_arc(handler);
        remove_first(&mut self.inner.state.lock().result_handlers, id).is_some()
    }

    /// Registered result handlers, in registration order.
    pub fn result_handlers(&self) -> Vec<Arc<dyn ResultHandler<RHI>>> {
        self.inner.state.lock().result_handlers.clone()
    }

    // ------------------------------------------------------------------
    // Transformers
    // ------------------------------------------------------------------

    /// Append a transformer to the chain at `stage`.
    ///
    /// Keep the returned handle to remove this transformer later.
    pub fn add_transformer<T, I, O>(&self, stage: TransformStage, transformer: T) -> TransformerHandle
    where
        T: Transformer<I, O>,
        I: Any,
        O: Any + Send,
    {
        self.inner
            .state
            .lock()
            .chains
            .get_mut(stage)
            .push(transformer)
    }

    /// Remove the first occurrence of `handle` from the chain at `stage`.
    pub fn remove_transformer(&self, stage: TransformStage, handle: &TransformerHandle) -> bool {
        self.inner.state.lock().chains.get_mut(stage).remove(handle)
    }

    /// Replace the chain at `stage`.
    pub fn set_transformers(&self, stage: TransformStage, chain: TransformerChain) {
        *self.inner.state.lock().chains.get_mut(stage) = chain;
    }

    /// Empty the chain at `stage`, making it the identity.
    pub fn clear_transformers(&self, stage: TransformStage) {
        self.inner.state.lock().chains.get_mut(stage).clear();
    }

    /// Copy of the chain at `stage`.
    pub fn transformers(&self, stage: TransformStage) -> TransformerChain {
        self.inner.state.lock().chains.get(stage).clone()
    }

    // ------------------------------------------------------------------
    // Mapping
    // ------------------------------------------------------------------

    /// Set the data provider → rule strategy. `None` unsets it.
    pub fn set_data_provider_to_rule_mapping(&self, mapping: impl Into<Option<MappingStrategy>>) {
        self.inner.state.lock().mapping.data_provider_to_rule = mapping.into();
    }

    /// Current data provider → rule strategy.
    pub fn data_provider_to_rule_mapping(&self) -> Option<MappingStrategy> {
        self.inner.state.lock().mapping.data_provider_to_rule
    }

    /// Set the rule → result handler strategy. `None` unsets it.
    pub fn set_rule_to_result_handler_mapping(&self, mapping: impl Into<Option<MappingStrategy>>) {
        self.inner.state.lock().mapping.rule_to_result_handler = mapping.into();
    }

    /// Current rule → result handler strategy.
    pub fn rule_to_result_handler_mapping(&self) -> Option<MappingStrategy> {
        self.inner.state.lock().mapping.rule_to_result_handler
    }

    /// Current mapping configuration.
    pub fn config(&self) -> MappingConfig {
        self.inner.state.lock().mapping
    }

    /// Replace both mapping strategies.
    pub fn set_config(&self, mapping: MappingConfig) {
        self.inner.state.lock().mapping = mapping;
    }

    // ------------------------------------------------------------------
    // Firing
    // ------------------------------------------------------------------

    /// Run one firing as if `trigger` had fired.
    ///
    /// Every registered data provider is read; the trigger's identity is only
    /// used for diagnostics.
    pub fn process_trigger<T: Trigger + ?Sized>(
        &self,
        trigger: &Arc<T>,
    ) -> Result<(), PipelineError> {
        self.inner.process_trigger(ComponentId::of_arc(trigger))
    }
}

impl<DPO, TDPO, RI, RO, TRO, RHI> Disposable for GeneralValidator<DPO, TDPO, RI, RO, TRO, RHI>
where
    DPO: Send + 'static,
    TDPO: Send + 'static,
    RI: 'static,
    RO: Send + 'static,
    TRO: Send + 'static,
    RHI: 'static,
{
    /// Unhook and dispose every trigger, then dispose data providers, rules
    /// and result handlers, then clear all collections.
    ///
    /// Components are disposed once each, even when registered in several
    /// roles. Calling `dispose` again is a no-op.
    fn dispose(&self) {
        let (triggers, providers, rules, handlers) = {
            let state = self.inner.state.lock();
            let triggers: Vec<(Arc<dyn Trigger>, Option<Arc<dyn TriggerListener>>)> = state
                .triggers
                .iter()
                .map(|trigger| {
                    let adapter = state.hooks.adapter(ComponentId::of_arc(trigger));
                    (Arc::clone(trigger), adapter)
                })
                .collect();
            (
                triggers,
                state.data_providers.clone(),
                state.rules.clone(),
                state.result_handlers.clone(),
            )
        };

        let mut disposed = DisposalSet::default();
        let mut unhooked = HashSet::new();
        for (trigger, adapter) in &triggers {
            if let Some(adapter) = adapter {
                if unhooked.insert(ComponentId::of_arc(trigger)) {
                    trigger.remove_trigger_listener(adapter);
                }
            }
            disposed.dispose(trigger.disposer());
        }
        for provider in &providers {
            disposed.dispose(provider.disposer());
        }
        for rule in &rules {
            disposed.dispose(rule.disposer());
        }
        for handler in &handlers {
            disposed.dispose(handler.disposer());
        }

        let mut state = self.inner.state.lock();
        state.triggers.clear();
        state.data_providers.clear();
        state.rules.clear();
        state.result_handlers.clear();
        state.hooks.clear();
        state.chains = Chains::default();
        tracing::debug!(
            unhooked = unhooked.len(),
            disposed = disposed.len(),
            "general validator disposed"
        );
    }
}

impl<DPO, TDPO, RI, RO, TRO, RHI> fmt::Debug for GeneralValidator<DPO, TDPO, RI, RO, TRO, RHI> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("GeneralValidator")
            .field("triggers", &state.triggers.len())
            .field("hooked_triggers", &state.hooks.len())
            .field("data_providers", &state.data_providers.len())
            .field("rules", &state.rules.len())
            .field("result_handlers", &state.result_handlers.len())
            .field("data_provider_output", &state.chains.data_provider_output.len())
            .field("rule_input", &state.chains.rule_input.len())
            .field("rule_output", &state.chains.rule_output.len())
            .field("result_handler_input", &state.chains.result_handler_input.len())
            .field("mapping", &state.mapping)
            .finish()
    }
}
