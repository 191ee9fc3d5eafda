//! Validator configuration.

use vigil_core::MappingStrategy;

/// Mapping strategies of a [`GeneralValidator`](super::GeneralValidator).
///
/// `None` at a joint means the strategy is unset: firings are skipped with a
/// diagnostic until one is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingConfig {
    /// Strategy at the data provider → rule joint.
    pub data_provider_to_rule: Option<MappingStrategy>,
    /// Strategy at the rule → result handler joint.
    pub rule_to_result_handler: Option<MappingStrategy>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingConfig {
    /// `EachToEach` at both joints.
    pub const fn new() -> Self {
        Self {
            data_provider_to_rule: Some(MappingStrategy::EachToEach),
            rule_to_result_handler: Some(MappingStrategy::EachToEach),
        }
    }

    /// Set the data provider → rule strategy.
    pub fn with_data_provider_to_rule(mut self, mapping: impl Into<Option<MappingStrategy>>) -> Self {
        self.data_provider_to_rule = mapping.into();
        self
    }

    /// Set the rule → result handler strategy.
    pub fn with_rule_to_result_handler(
        mut self,
        mapping: impl Into<Option<MappingStrategy>>,
    ) -> Self {
        self.rule_to_result_handler = mapping.into();
        self
    }
}
