//! # Result Handlers
//!
//! The terminal point of the pipeline, where validation results turn into
//! feedback: an error icon, a disabled button, a tooltip.
//!
//! Handlers are called in registration order and share the same result value.
//! No handler may assume it is the only one.

use crate::dispose::Disposable;

/// An effectful consumer of validation results.
///
/// Any `Fn(&H)` closure is a result handler.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle results of type `{H}`",
    label = "missing `ResultHandler<{H}>` implementation",
    note = "Result handlers must implement `handle_result` for `{H}`."
)]
pub trait ResultHandler<H>: Send + Sync + 'static {
    /// React to `result`.
    fn handle_result(&self, result: &H);

    /// Teardown capability, if this handler holds resources.
    fn disposer(&self) -> Option<&dyn Disposable> {
        None
    }
}

// Blanket impl for closures
impl<F, H> ResultHandler<H> for F
where
    F: Fn(&H) + Send + Sync + 'static,
{
    fn handle_result(&self, result: &H) {
        (self)(result)
    }
}
