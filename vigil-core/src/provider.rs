//! Data providers.

use crate::dispose::Disposable;

/// A pull-based accessor of the value to validate.
///
/// Providers are read synchronously once per firing per registration. They
/// should be cheap and must not fail in normal operation.
///
/// Any `Fn() -> O` closure is a data provider.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot provide data of type `{O}`",
    label = "missing `DataProvider<{O}>` implementation",
    note = "Data providers must implement `get_data` returning `{O}`."
)]
pub trait DataProvider<O>: Send + Sync + 'static {
    /// Current value.
    fn get_data(&self) -> O;

    /// Teardown capability, if this provider holds resources.
    fn disposer(&self) -> Option<&dyn Disposable> {
        None
    }
}

// Blanket impl for closures
impl<F, O> DataProvider<O> for F
where
    F: Fn() -> O + Send + Sync + 'static,
{
    fn get_data(&self) -> O {
        (self)()
    }
}
