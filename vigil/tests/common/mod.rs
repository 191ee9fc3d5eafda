#![allow(dead_code)]

use std::sync::Arc;
use vigil::{
    DataProvider, GeneralValidator, MappingConfig, Rule,
    testing::RecordingResultHandler,
    triggers::ManualTrigger,
};

// ============================================================================
// Validator Types
// ============================================================================

/// Strings in, strings out, no type changes anywhere.
pub type StringValidator = GeneralValidator<String, String, String, String, String, String>;

/// `AllToEach` at both joints over an identity rule on collections.
pub type CollectingValidator =
    GeneralValidator<String, String, Vec<String>, Vec<String>, Vec<String>, Vec<Vec<String>>>;

/// Text field validated into a verdict.
pub type FieldValidator = GeneralValidator<String, String, String, bool, bool, bool>;

// ============================================================================
// Components
// ============================================================================

pub fn constant(value: &str) -> Arc<dyn DataProvider<String>> {
    let value = value.to_string();
    Arc::new(move || value.clone())
}

/// A trigger nothing listens to, for firing a validator directly.
pub fn unhooked() -> Arc<ManualTrigger> {
    Arc::new(ManualTrigger::new())
}

pub fn identity_rule() -> Arc<dyn Rule<String, String>> {
    Arc::new(|input: &String| input.clone())
}

pub fn identity_collection_rule() -> Arc<dyn Rule<Vec<String>, Vec<String>>> {
    Arc::new(|input: &Vec<String>| input.clone())
}

// ============================================================================
// Fixtures
// ============================================================================

/// Two providers `"a"` and `"b"`, one identity rule, one recording handler.
pub struct AbFixture {
    pub validator: StringValidator,
    pub trigger: Arc<ManualTrigger>,
    pub recorder: RecordingResultHandler<String>,
}

pub fn ab_fixture() -> AbFixture {
    let validator = StringValidator::new();
    let trigger = Arc::new(ManualTrigger::new());
    let recorder = RecordingResultHandler::<String>::new();

    validator.add_trigger(trigger.clone());
    validator.add_data_provider(constant("a"));
    validator.add_data_provider(constant("b"));
    validator.add_rule(identity_rule());
    validator.add_result_handler(Arc::new(recorder.clone()));

    AbFixture {
        validator,
        trigger,
        recorder,
    }
}

pub fn all_to_each() -> MappingConfig {
    MappingConfig::new()
        .with_data_provider_to_rule(vigil::MappingStrategy::AllToEach)
        .with_rule_to_result_handler(vigil::MappingStrategy::AllToEach)
}
