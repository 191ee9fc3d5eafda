//! Error types for Vigil.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`VigilError`] - What firing a trigger reports
//! - [`PipelineError`] - Errors that abort a firing
//! - [`TypeMismatch`] - A type-erased value was not of the expected type
//!
//! Configuration gaps (no data providers, unset mapping strategy, missing
//! mapping entries) are not errors: engines log them and skip
//! the affected branch.

use std::fmt;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned when firing a trigger.
#[derive(Error, Debug)]
pub enum VigilError {
    /// A validator listening on the trigger aborted its firing.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other trigger listener failed.
    #[error("trigger listener failed: {0}")]
    Listener(#[source] BoxError),
}

impl VigilError {
    /// Classify an error returned by [`TriggerListener::trigger_validation`].
    ///
    /// [`TriggerListener::trigger_validation`]: crate::TriggerListener::trigger_validation
    pub fn from_listener(error: BoxError) -> Self {
        match error.downcast::<PipelineError>() {
            Ok(pipeline) => VigilError::Pipeline(*pipeline),
            Err(other) => VigilError::Listener(other),
        }
    }
}

/// A type-erased value was not of the type a consumer expected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("expected a value of type `{expected}`")]
pub struct TypeMismatch {
    /// Name of the type the consumer expected.
    pub expected: &'static str,
}

impl TypeMismatch {
    /// Mismatch against the type `T`.
    pub fn expected<T: ?Sized>() -> Self {
        Self {
            expected: std::any::type_name::<T>(),
        }
    }
}

/// Position in the validation pipeline, used to locate failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The data-provider-output transformer chain.
    DataProviderOutput,
    /// The data provider to rule joint.
    DataProviderToRule,
    /// The rule-input transformer chain and the rules' input.
    RuleInput,
    /// The rule-output transformer chain.
    RuleOutput,
    /// The rule to result handler joint.
    RuleToResultHandler,
    /// The result-handler-input transformer chain and the handlers' input.
    ResultHandlerInput,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::DataProviderOutput => "data provider output",
            Stage::DataProviderToRule => "data provider to rule mapping",
            Stage::RuleInput => "rule input",
            Stage::RuleOutput => "rule output",
            Stage::RuleToResultHandler => "rule to result handler mapping",
            Stage::ResultHandlerInput => "result handler input",
        };
        f.write_str(name)
    }
}

/// Errors that abort a firing.
///
/// These are programmer errors: the engine never catches them, and any
/// result handler invoked earlier in the same firing has already run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A value reaching `stage` was not of the type the stage consumes.
    #[error("type mismatch at {stage}")]
    TypeMismatch {
        /// Where the mismatch was detected.
        stage: Stage,
        /// The mismatch itself.
        #[source]
        source: TypeMismatch,
    },
}

impl PipelineError {
    /// Build a closure that tags a [`TypeMismatch`] with `stage`.
    ///
    /// Intended for `map_err`.
    pub fn at(stage: Stage) -> impl Fn(TypeMismatch) -> PipelineError {
        move |source| PipelineError::TypeMismatch { stage, source }
    }

    /// The stage the firing was aborted in.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::TypeMismatch { stage, .. } => *stage,
        }
    }
}
