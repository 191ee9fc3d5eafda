use std::sync::Arc;
use vigil::{
    AnyValue, DynTransformer, GeneralValidator, MappingConfig, MappingStrategy, PipelineError,
    ResultHandler, Stage, TransformStage, TransformerChain, TransformerHandle, TypeMismatch,
    VigilError, downcast_value,
    testing::RecordingResultHandler,
    transformers::{AndBooleanAggregator, NegateBoolean},
    triggers::ManualTrigger,
};

mod common;
use common::{
    CollectingValidator, FieldValidator, StringValidator, ab_fixture, all_to_each, constant,
    identity_collection_rule, identity_rule, unhooked,
};

#[test]
fn test_each_to_each_fans_out_in_provider_order() {
    let fixture = ab_fixture();

    fixture.trigger.fire().unwrap();

    assert_eq!(fixture.recorder.values(), vec!["a", "b"]);
}

#[test]
fn test_all_to_each_fans_in() {
    let validator = CollectingValidator::with_config(all_to_each());
    let trigger = Arc::new(ManualTrigger::new());
    let recorder = RecordingResultHandler::<Vec<Vec<String>>>::new();

    validator.add_trigger(trigger.clone());
    validator.add_data_provider(constant("a"));
    validator.add_data_provider(constant("b"));
    validator.add_rule(identity_collection_rule());
    validator.add_result_handler(Arc::new(recorder.clone()));

    trigger.fire().unwrap();

    // One rule input holding both outputs; its single result is collected
    // again at the second joint
    assert_eq!(recorder.count(), 1);
    assert_eq!(recorder.values(), vec![vec![vec!["a", "b"]]]);
}

/// Wraps a string into a one-element list; lists pass through unchanged.
struct Listify;

impl DynTransformer for Listify {
    fn transform_dyn(&self, input: AnyValue) -> Result<AnyValue, TypeMismatch> {
        match input.downcast::<String>() {
            Ok(single) => Ok(Box::new(vec![*single])),
            Err(input) => Ok(Box::new(downcast_value::<Vec<String>>(input)?)),
        }
    }

    fn input_type(&self) -> &'static str {
        "alloc::string::String"
    }

    fn output_type(&self) -> &'static str {
        "alloc::vec::Vec<alloc::string::String>"
    }
}

#[test]
fn test_strategy_round_trip_reproduces_fan_out() {
    let validator = GeneralValidator::<
        String,
        String,
        Vec<String>,
        Vec<String>,
        Vec<String>,
        Vec<String>,
    >::new();
    let trigger = Arc::new(ManualTrigger::new());
    let recorder = RecordingResultHandler::<Vec<String>>::new();
    let mut chain = TransformerChain::new();
    chain.push_handle(TransformerHandle::from_dyn(Arc::new(Listify)));

    validator.add_trigger(trigger.clone());
    validator.add_data_provider(constant("a"));
    validator.add_data_provider(constant("b"));
    validator.set_transformers(TransformStage::RuleInput, chain);
    validator.add_rule(identity_collection_rule());
    validator.add_result_handler(Arc::new(recorder.clone()));

    trigger.fire().unwrap();
    let fanned_out = recorder.values();
    assert_eq!(fanned_out, vec![vec!["a"], vec!["b"]]);

    validator.set_data_provider_to_rule_mapping(MappingStrategy::AllToEach);
    assert_eq!(
        validator.data_provider_to_rule_mapping(),
        Some(MappingStrategy::AllToEach)
    );
    recorder.clear();
    trigger.fire().unwrap();
    assert_eq!(recorder.values(), vec![vec!["a", "b"]]);

    validator.set_data_provider_to_rule_mapping(MappingStrategy::EachToEach);
    recorder.clear();
    trigger.fire().unwrap();
    assert_eq!(recorder.values(), fanned_out);
}

#[test]
fn test_rule_input_chain_composes_in_order() {
    let validator = StringValidator::new();
    let recorder = RecordingResultHandler::<String>::new();
    validator.add_data_provider(constant("ab"));
    validator.add_rule(identity_rule());
    validator.add_result_handler(Arc::new(recorder.clone()));

    let upper = validator.add_transformer(TransformStage::RuleInput, |s: String| s.to_uppercase());
    validator.add_transformer(TransformStage::RuleInput, |s: String| {
        s.chars().rev().collect::<String>()
    });

    validator.process_trigger(&unhooked()).unwrap();
    assert_eq!(recorder.values(), vec!["BA"]);

    assert!(validator.remove_transformer(TransformStage::RuleInput, &upper));
    assert!(!validator.remove_transformer(TransformStage::RuleInput, &upper));
    assert_eq!(validator.transformers(TransformStage::RuleInput).len(), 1);

    recorder.clear();
    validator.process_trigger(&unhooked()).unwrap();
    assert_eq!(recorder.values(), vec!["ba"]);

    validator.clear_transformers(TransformStage::RuleInput);
    recorder.clear();
    validator.process_trigger(&unhooked()).unwrap();
    assert_eq!(recorder.values(), vec!["ab"]);
}

#[test]
fn test_every_chain_is_applied() {
    let validator = GeneralValidator::<u32, String, String, usize, bool, String>::new();
    let recorder = RecordingResultHandler::<String>::new();
    validator.add_data_provider(Arc::new(|| 1234u32));
    validator.add_rule(Arc::new(|s: &String| s.len()));
    validator.add_result_handler(Arc::new(recorder.clone()));

    validator.add_transformer(TransformStage::DataProviderOutput, |n: u32| n.to_string());
    validator.add_transformer(TransformStage::RuleInput, |s: String| format!("{s}!"));
    validator.add_transformer(TransformStage::RuleOutput, |len: usize| len > 4);
    validator.set_transformers(
        TransformStage::ResultHandlerInput,
        TransformerChain::new()
            .then(NegateBoolean)
            .then(|valid: bool| String::from(if valid { "ok" } else { "too long" })),
    );

    validator.process_trigger(&unhooked()).unwrap();

    assert_eq!(recorder.values(), vec!["too long"]);
}

#[test]
fn test_verdicts_aggregated_per_input() {
    let validator = FieldValidator::new();
    validator.set_rule_to_result_handler_mapping(MappingStrategy::AllToEach);
    let trigger = Arc::new(ManualTrigger::new());
    let recorder = RecordingResultHandler::<bool>::new();

    validator.add_trigger(trigger.clone());
    validator.add_data_provider(constant("short"));
    validator.add_data_provider(constant("much too long"));
    validator.add_rule(Arc::new(|s: &String| !s.is_empty()));
    validator.add_rule(Arc::new(|s: &String| s.len() < 8));
    validator.add_transformer(
        TransformStage::ResultHandlerInput,
        AndBooleanAggregator::new(),
    );
    validator.add_result_handler(Arc::new(recorder.clone()));

    trigger.fire().unwrap();

    assert_eq!(recorder.values(), vec![true, false]);
}

#[test]
fn test_type_mismatch_reports_stage() {
    // AllToEach at the first joint needs `Vec` rule inputs
    let validator = FieldValidator::new();
    validator.set_data_provider_to_rule_mapping(MappingStrategy::AllToEach);
    validator.add_data_provider(constant("a"));
    validator.add_rule(Arc::new(|s: &String| s.is_empty()));

    let err = validator.process_trigger(&unhooked()).unwrap_err();
    assert_eq!(err.stage(), Stage::RuleInput);
    assert!(matches!(err, PipelineError::TypeMismatch { .. }));
    assert!(err.to_string().contains("rule input"));

    // A chain whose input type does not match what reaches it
    let validator = FieldValidator::new();
    validator.add_data_provider(constant("a"));
    validator.add_transformer(TransformStage::DataProviderOutput, |n: u32| n + 1);

    let err = validator.process_trigger(&unhooked()).unwrap_err();
    assert_eq!(err.stage(), Stage::DataProviderOutput);
}

#[test]
fn test_mismatch_propagates_to_firing_trigger() {
    let validator = GeneralValidator::<String, u8, Vec<u8>, bool, bool, bool>::new();
    validator.set_data_provider_to_rule_mapping(MappingStrategy::AllToEach);
    let trigger = Arc::new(ManualTrigger::new());
    validator.add_trigger(trigger.clone());
    validator.add_data_provider(constant("not a number"));

    match trigger.fire().unwrap_err() {
        VigilError::Pipeline(err) => assert_eq!(err.stage(), Stage::DataProviderToRule),
        other => panic!("expected a pipeline error, got {other:?}"),
    }
}

/// Turns empty strings into a `u8`, which no rule accepts.
struct PoisonEmpty;

impl DynTransformer for PoisonEmpty {
    fn transform_dyn(&self, input: AnyValue) -> Result<AnyValue, TypeMismatch> {
        let input = downcast_value::<String>(input)?;
        if input.is_empty() {
            Ok(Box::new(0u8))
        } else {
            Ok(Box::new(input))
        }
    }

    fn input_type(&self) -> &'static str {
        "alloc::string::String"
    }

    fn output_type(&self) -> &'static str {
        "alloc::string::String"
    }
}

#[test]
fn test_handlers_called_before_mismatch_stay_called() {
    let validator = FieldValidator::new();
    let recorder = RecordingResultHandler::<bool>::new();
    validator.add_data_provider(constant("fine"));
    validator.add_data_provider(constant(""));
    validator.add_data_provider(constant("never read by rules"));
    let mut chain = TransformerChain::new();
    chain.push_handle(TransformerHandle::from_dyn(Arc::new(PoisonEmpty)));
    validator.set_transformers(TransformStage::RuleInput, chain);
    validator.add_rule(Arc::new(|s: &String| !s.is_empty()));
    validator.add_result_handler(Arc::new(recorder.clone()));

    let err = validator.process_trigger(&unhooked()).unwrap_err();

    assert_eq!(err.stage(), Stage::RuleInput);
    assert_eq!(recorder.values(), vec![true]);
}

#[test]
fn test_empty_pipeline_pieces() {
    // No rules: providers are read, nothing reaches handlers
    let validator = FieldValidator::new();
    let recorder = RecordingResultHandler::<bool>::new();
    validator.add_data_provider(constant("a"));
    validator.add_result_handler(Arc::new(recorder.clone()));
    validator.process_trigger(&unhooked()).unwrap();
    assert_eq!(recorder.count(), 0);

    // AllToEach over no rules still hands one empty collection onward
    let validator = FieldValidator::new();
    let recorder = RecordingResultHandler::<bool>::new();
    validator.set_rule_to_result_handler_mapping(MappingStrategy::AllToEach);
    validator.add_data_provider(constant("a"));
    validator.add_transformer(
        TransformStage::ResultHandlerInput,
        AndBooleanAggregator::new(),
    );
    validator.add_result_handler(Arc::new(recorder.clone()));
    validator.process_trigger(&unhooked()).unwrap();
    assert_eq!(recorder.values(), vec![true]);
}

#[test]
fn test_unset_mapping_skips_firing() {
    let fixture = ab_fixture();
    fixture.validator.set_rule_to_result_handler_mapping(None);
    assert_eq!(fixture.validator.rule_to_result_handler_mapping(), None);

    fixture.trigger.fire().unwrap();
    assert_eq!(fixture.recorder.count(), 0);

    fixture.validator.set_config(MappingConfig::default());
    fixture.trigger.fire().unwrap();
    assert_eq!(fixture.recorder.count(), 2);
}

#[test]
fn test_registration_order_and_first_occurrence_removal() {
    let validator = StringValidator::new();
    let rule = identity_rule();
    let recorder = RecordingResultHandler::<String>::new();
    let registered: Arc<dyn ResultHandler<String>> = Arc::new(recorder.clone());

    validator.add_data_provider(constant("x"));
    validator.add_rule(rule.clone());
    validator.add_rule(rule.clone());
    validator.add_result_handler(registered.clone());

    validator.process_trigger(&unhooked()).unwrap();
    assert_eq!(recorder.values(), vec!["x", "x"]);

    assert!(validator.remove_rule(&rule));
    assert_eq!(validator.rules().len(), 1);

    recorder.clear();
    validator.process_trigger(&unhooked()).unwrap();
    assert_eq!(recorder.count(), 1);

    assert!(validator.remove_result_handler(&registered));
    assert!(!validator.remove_result_handler(&registered));
    assert!(validator.result_handlers().is_empty());
}

#[test]
fn test_clones_share_registrations() {
    let fixture = ab_fixture();
    let clone = fixture.validator.clone();
    clone.add_data_provider(constant("c"));

    fixture.trigger.fire().unwrap();
    assert_eq!(fixture.recorder.values(), vec!["a", "b", "c"]);

    let debug = format!("{:?}", fixture.validator);
    assert!(debug.contains("data_providers: 3"));
}
