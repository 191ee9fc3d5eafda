//! Boolean verdict transformers.

use vigil_core::Transformer;

/// Negates a verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegateBoolean;

impl Transformer<bool, bool> for NegateBoolean {
    fn transform(&self, input: bool) -> bool {
        !input
    }
}

/// Folds a collection of verdicts with logical AND.
///
/// An empty collection yields `empty_value` (`true` by default).
#[derive(Debug, Clone, Copy)]
pub struct AndBooleanAggregator {
    empty_value: bool,
}

impl Default for AndBooleanAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl AndBooleanAggregator {
    /// Aggregator yielding `true` for an empty collection.
    pub const fn new() -> Self {
        Self { empty_value: true }
    }

    /// Set the result for an empty collection.
    pub const fn with_empty_value(mut self, empty_value: bool) -> Self {
        self.empty_value = empty_value;
        self
    }
}

impl Transformer<Vec<bool>, bool> for AndBooleanAggregator {
    fn transform(&self, input: Vec<bool>) -> bool {
        if input.is_empty() {
            return self.empty_value;
        }
        input.into_iter().all(|verdict| verdict)
    }
}

/// Folds a collection of verdicts with logical OR.
///
/// An empty collection yields `empty_value` (`false` by default).
#[derive(Debug, Clone, Copy, Default)]
pub struct OrBooleanAggregator {
    empty_value: bool,
}

impl OrBooleanAggregator {
    /// Aggregator yielding `false` for an empty collection.
    pub const fn new() -> Self {
        Self { empty_value: false }
    }

    /// Set the result for an empty collection.
    pub const fn with_empty_value(mut self, empty_value: bool) -> Self {
        self.empty_value = empty_value;
        self
    }
}

impl Transformer<Vec<bool>, bool> for OrBooleanAggregator {
    fn transform(&self, input: Vec<bool>) -> bool {
        if input.is_empty() {
            return self.empty_value;
        }
        input.into_iter().any(|verdict| verdict)
    }
}
