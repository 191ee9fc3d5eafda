use std::sync::Arc;
use vigil::{
    DataProvider, Disposable, MappableValidator, ResultHandler, Rule,
    providers::SharedValue,
    rules::{NotEmptyString, StringLength},
    testing::{CountingTrigger, Probe, RecordingResultHandler},
    triggers::ManualTrigger,
};

struct Form {
    validator: MappableValidator<String, bool>,
    changed: Arc<ManualTrigger>,
    name: Arc<SharedValue<String>>,
    valid: RecordingResultHandler<bool>,
    invalid: RecordingResultHandler<bool>,
}

fn form() -> Form {
    let validator = MappableValidator::<String, bool>::new();
    let changed = Arc::new(ManualTrigger::new());
    let name = Arc::new(SharedValue::new(String::new()));
    let valid = RecordingResultHandler::<bool>::new();
    let invalid = RecordingResultHandler::<bool>::new();

    validator.map_trigger_to_data_provider(changed.clone(), name.clone());
    validator.map_data_provider_to_rule(name.clone(), Arc::new(NotEmptyString));
    validator.map_result_to_result_handler(true, Arc::new(valid.clone()));
    validator.map_result_to_result_handler(false, Arc::new(invalid.clone()));

    Form {
        validator,
        changed,
        name,
        valid,
        invalid,
    }
}

#[test]
fn test_results_routed_by_value() {
    let form = form();

    form.changed.fire().unwrap();
    assert_eq!(form.invalid.values(), vec![false]);
    assert_eq!(form.valid.count(), 0);

    form.name.set(String::from("Ada"));
    form.changed.fire().unwrap();
    assert_eq!(form.valid.values(), vec![true]);
    assert_eq!(form.invalid.count(), 1);
}

#[test]
fn test_rules_run_in_mapping_order() {
    let form = form();
    let length: Arc<dyn Rule<String, bool>> = Arc::new(StringLength::new(2, 4));
    form.validator
        .map_data_provider_to_rule(form.name.clone(), length.clone());
    form.name.set(String::from("x"));

    form.changed.fire().unwrap();
    // NotEmptyString passes, StringLength fails
    assert_eq!(form.valid.values(), vec![true]);
    assert_eq!(form.invalid.values(), vec![false]);
    assert_eq!(form.validator.rules_for(&form.name).len(), 2);

    assert!(form.validator.unmap_data_provider_from_rule(&form.name, &length));
    assert!(!form.validator.unmap_data_provider_from_rule(&form.name, &length));
    assert_eq!(form.validator.rules_for(&form.name).len(), 1);
}

#[test]
fn test_direct_firing_uses_mapped_trigger() {
    let form = form();
    form.name.set(String::from("Ada"));

    form.validator.process_trigger(&form.changed).unwrap();
    assert_eq!(form.valid.values(), vec![true]);

    let unmapped = Arc::new(ManualTrigger::new());
    form.validator.process_trigger(&unmapped).unwrap();
    assert_eq!(form.valid.count(), 1);
    assert_eq!(form.invalid.count(), 0);
}

#[test]
fn test_missing_mappings_are_not_errors() {
    let validator = MappableValidator::<String, bool>::new();
    let orphan = Arc::new(ManualTrigger::new());
    validator.process_trigger(&orphan).unwrap();

    // Provider without rules, then a result without handlers
    let form = form();
    let other = Arc::new(SharedValue::new(String::from("x")));
    form.validator
        .map_trigger_to_data_provider(form.changed.clone(), other.clone());
    form.validator.unmap_result_from_result_handler(
        &false,
        &form.validator.result_handlers_for(&false)[0],
    );

    form.changed.fire().unwrap();
    assert_eq!(form.valid.count(), 0);
    assert_eq!(form.invalid.count(), 0);
    assert!(form.validator.result_handlers_for(&false).is_empty());
}

#[test]
fn test_trigger_hooked_while_mapped() {
    let validator = MappableValidator::<String, bool>::new();
    let trigger = Arc::new(CountingTrigger::new());
    let first: Arc<dyn DataProvider<String>> = Arc::new(SharedValue::new(String::new()));
    let second: Arc<dyn DataProvider<String>> = Arc::new(SharedValue::new(String::new()));

    validator.map_trigger_to_data_provider(trigger.clone(), first.clone());
    validator.map_trigger_to_data_provider(trigger.clone(), second.clone());
    validator.map_trigger_to_data_provider(trigger.clone(), second.clone());
    assert_eq!(trigger.added(), 1);
    assert_eq!(validator.trigger_occurrences(&trigger), 3);
    assert_eq!(validator.data_providers_for(&trigger).len(), 3);

    assert!(validator.unmap_trigger_from_data_provider(&trigger, &second));
    assert!(validator.unmap_trigger_from_data_provider(&trigger, &first));
    assert_eq!(trigger.removed(), 0);
    assert_eq!(validator.hooked_trigger_count(), 1);

    assert!(validator.unmap_trigger_from_data_provider(&trigger, &second));
    assert_eq!(trigger.removed(), 1);
    assert_eq!(trigger.listener_count(), 0);
    assert_eq!(validator.hooked_trigger_count(), 0);
    assert_eq!(validator.trigger_occurrences(&trigger), 0);

    // Unmapping an absent pair leaves the trigger untouched
    assert!(!validator.unmap_trigger_from_data_provider(&trigger, &first));
    assert_eq!(trigger.removed(), 1);
}

#[test]
fn test_dispose_tiers_once_each() {
    let validator = MappableValidator::<String, String>::new();
    let probe = Arc::new(Probe::new(String::from("v")));
    let trigger = Arc::new(Probe::new(String::new()));

    validator.map_trigger_to_data_provider(trigger.clone(), probe.clone());
    validator.map_trigger_to_data_provider(probe.clone(), probe.clone());
    validator.map_data_provider_to_rule(probe.clone(), probe.clone());
    validator.map_result_to_result_handler(String::from("v"), probe.clone());

    trigger.fire().unwrap();
    probe.fire().unwrap();
    assert_eq!(probe.handled(), vec!["v", "v"]);

    validator.dispose();

    assert_eq!(probe.disposals(), 1);
    assert_eq!(trigger.disposals(), 1);
    assert_eq!(trigger.listener_count(), 0);
    assert_eq!(probe.listener_count(), 0);
    assert_eq!(validator.hooked_trigger_count(), 0);
    assert!(validator.rules_for(&probe).is_empty());

    validator.dispose();
    assert_eq!(probe.disposals(), 1);
}

#[test]
fn test_mapped_handlers_are_called_in_order() {
    let validator = MappableValidator::<u8, u8>::new();
    let trigger = Arc::new(ManualTrigger::new());
    let provider: Arc<dyn DataProvider<u8>> = Arc::new(|| 3u8);
    let order = RecordingResultHandler::<u8>::new();
    let first = order.clone();
    let second = order.clone();

    validator.map_trigger_to_data_provider(trigger.clone(), provider.clone());
    validator.map_data_provider_to_rule(provider, Arc::new(|n: &u8| n % 2));
    validator.map_result_to_result_handler(1, Arc::new(move |n: &u8| first.handle_result(&(n * 10))));
    validator.map_result_to_result_handler(1, Arc::new(move |n: &u8| second.handle_result(&(n * 20))));

    trigger.fire().unwrap();
    assert_eq!(order.values(), vec![10, 20]);
    assert_eq!(validator.result_handlers_for(&1).len(), 2);

    let handler: Arc<dyn ResultHandler<u8>> = validator.result_handlers_for(&1)[0].clone();
    assert!(validator.unmap_result_from_result_handler(&1, &handler));
    let remaining: Vec<Arc<dyn ResultHandler<u8>>> = validator.result_handlers_for(&1);
    assert_eq!(remaining.len(), 1);
}
