//! Rules.

use crate::dispose::Disposable;

/// A pure classifier from an input to a result.
///
/// The engine assumes a rule has no side effects visible to it. In the
/// mappable validator the result is also used as a dispatch key, so it should
/// have a stable `Eq`/`Hash`.
///
/// Any `Fn(&I) -> R` closure is a rule.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot validate `{I}` into `{R}`",
    label = "missing `Rule<{I}, {R}>` implementation",
    note = "Rules must implement `validate` for the input type `{I}`."
)]
pub trait Rule<I, R>: Send + Sync + 'static {
    /// Classify `input`.
    fn validate(&self, input: &I) -> R;

    /// Teardown capability, if this rule holds resources.
    fn disposer(&self) -> Option<&dyn Disposable> {
        None
    }
}

// Blanket impl for closures
impl<F, I, R> Rule<I, R> for F
where
    F: Fn(&I) -> R + Send + Sync + 'static,
{
    fn validate(&self, input: &I) -> R {
        (self)(input)
    }
}
