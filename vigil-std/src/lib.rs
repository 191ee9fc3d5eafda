//! # vigil-std
//!
//! Validation engines and standard components for the Vigil framework.
//!
//! This crate provides:
//! - **Engines**: [`GeneralValidator`](validator::GeneralValidator),
//!   [`MappableValidator`](validator::MappableValidator)
//! - **Triggers**: [`ManualTrigger`](triggers::ManualTrigger),
//!   [`TriggerListeners`](triggers::TriggerListeners)
//! - **Chaining**: [`ResultCollector`](collector::ResultCollector)
//! - **Standard rules and transformers**
//! - **Testing helpers**

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use vigil_core;

// Modules
pub mod collector;
pub mod providers;
pub mod rules;
pub mod testing;
pub mod transformers;
pub mod triggers;
pub mod validator;
