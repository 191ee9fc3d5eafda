//! # vigil - Input Validation Wiring
//!
//! `vigil` connects the events that should cause a validation (triggers) to
//! the values being validated (data providers), the checks run on them
//! (rules) and the feedback shown to the user (result handlers).
//!
//! Every firing runs synchronously on the thread that fired the trigger.
//! Validators never touch a widget toolkit themselves; adapters for a
//! concrete toolkit implement [`Trigger`], [`DataProvider`] and
//! [`ResultHandler`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use vigil::prelude::*;
//! use vigil::rules::NotEmptyString;
//! use vigil::testing::RecordingResultHandler;
//! use vigil::triggers::ManualTrigger;
//! use vigil::providers::SharedValue;
//!
//! let name = Arc::new(SharedValue::new(String::new()));
//! let submit = Arc::new(ManualTrigger::new());
//! let feedback = RecordingResultHandler::<bool>::new();
//!
//! let validator = GeneralValidator::<String, String, String, bool, bool, bool>::new();
//! validator.add_trigger(submit.clone());
//! validator.add_data_provider(name.clone());
//! validator.add_rule(Arc::new(NotEmptyString));
//! validator.add_result_handler(Arc::new(feedback.clone()));
//!
//! submit.fire().unwrap();
//! name.set("Ada".to_string());
//! submit.fire().unwrap();
//! assert_eq!(feedback.values(), vec![false, true]);
//!
//! validator.dispose();
//! assert_eq!(submit.listener_count(), 0);
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use vigil_core::{
    // Values
    AnyValue,
    // Error types
    BoxError,
    // Identity
    ComponentId,
    // Components
    DataProvider,
    Disposable,
    // Transformers
    DynTransformer,
    MappingStrategy,
    PipelineError,
    ResultHandler,
    Rule,
    Stage,
    Transformer,
    TransformerChain,
    TransformerHandle,
    Trigger,
    TriggerEvent,
    TriggerListener,
    TriggerProcessor,
    TypeMismatch,
    VigilError,
    downcast_value,
};

// Engines
pub use vigil_std::{
    collector::ResultCollector,
    validator::{GeneralValidator, MappableValidator, MappingConfig, TransformStage},
};

/// Validation engines.
pub mod validator {
    pub use vigil_std::validator::{
        GeneralValidator, MappableValidator, MappingConfig, TransformStage,
    };
}

/// Standard trigger implementations.
pub mod triggers {
    pub use vigil_std::triggers::{ManualTrigger, TriggerListeners};
}

/// Standard data providers.
pub mod providers {
    pub use vigil_std::providers::SharedValue;
}

/// Standard rule implementations.
pub mod rules {
    #![allow(clippy::wildcard_imports)]
    pub use vigil_std::rules::*;
}

/// Standard transformer implementations.
pub mod transformers {
    #![allow(clippy::wildcard_imports)]
    pub use vigil_std::transformers::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use vigil_std::testing::*;
}

/// Prelude module - common imports for Vigil.
///
/// # Usage
///
/// ```rust,ignore
/// use vigil::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        // Core traits
        DataProvider,
        Disposable,
        // Engines
        GeneralValidator,
        MappableValidator,
        MappingConfig,
        MappingStrategy,
        PipelineError,
        ResultCollector,
        ResultHandler,
        Rule,
        TransformStage,
        Transformer,
        Trigger,
        TriggerListener,
    };
}
