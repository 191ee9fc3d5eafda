//! Type conversion transformers.

use std::{fmt::Display, marker::PhantomData};
use vigil_core::Transformer;

/// Formats any `Display` value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToStringTransformer;

impl<I: Display> Transformer<I, String> for ToStringTransformer {
    fn transform(&self, input: I) -> String {
        input.to_string()
    }
}

/// Converts through `Into`.
pub struct IntoTransformer<I, O>(PhantomData<fn(I) -> O>);

impl<I, O> IntoTransformer<I, O> {
    /// Create the conversion.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<I, O> Default for IntoTransformer<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> Transformer<I, O> for IntoTransformer<I, O>
where
    I: Into<O> + 'static,
    O: 'static,
{
    fn transform(&self, input: I) -> O {
        input.into()
    }
}
