//! Standard rule implementations.

pub mod string;

#[cfg(feature = "regex")]
pub use string::StringRegex;
pub use string::{NotEmptyString, StringLength};
