//! # vigil-core
//!
//! Core traits for the Vigil validation wiring framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! component authors (custom triggers, rules, result handlers) that don't need
//! the engines shipped in `vigil-std`.
//!
//! # Pipeline Architecture
//!
//! A validation is wired from four kinds of components. Data flows strictly
//! forward through them; nothing downstream calls back upward.
//!
//! ## Trigger ([`Trigger`])
//!
//! An event source announcing "please validate now". A validator hooks a
//! single [`TriggerListener`] adapter onto every distinct trigger it owns.
//!
//! ## Data Provider ([`DataProvider`])
//!
//! A pull-based accessor of the value to validate. Read synchronously on
//! every firing.
//!
//! ## Rule ([`Rule`])
//!
//! A pure classifier from an input to a result value.
//!
//! ## Result Handler ([`ResultHandler`])
//!
//! The effectful sink: error icons, enabled buttons, tooltips. The only
//! place a firing produces externally observable effects.
//!
//! # Glue
//!
//! - [`Transformer`] / [`TransformerChain`]: value adaptation between stages.
//!   Chains are type-erased over [`AnyValue`] so the engine can switch
//!   between one value and a collection of values at runtime.
//! - [`MappingStrategy`]: fan-out (`EachToEach`) or fan-in (`AllToEach`) at
//!   a joint.
//! - [`Disposable`]: optional teardown capability, queried once per
//!   component through `disposer()`.
//!
//! # Error Types
//!
//! - [`VigilError`] - Error returned when firing a trigger
//! - [`PipelineError`] - Failures surfaced by a firing
//! - [`TypeMismatch`] - A value did not have the type a stage expected

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dispose;
mod error;
mod handler;
mod id;
mod mapping;
mod provider;
mod rule;
mod transformer;
mod trigger;
mod value;

// Re-exports
pub use dispose::Disposable;
pub use error::{BoxError, PipelineError, Stage, TypeMismatch, VigilError};
pub use handler::ResultHandler;
pub use id::ComponentId;
pub use mapping::MappingStrategy;
pub use provider::DataProvider;
pub use rule::Rule;
pub use transformer::{DynTransformer, Transformer, TransformerChain, TransformerHandle};
pub use trigger::{Trigger, TriggerEvent, TriggerListener, TriggerProcessor};
pub use value::{AnyValue, downcast_value};
