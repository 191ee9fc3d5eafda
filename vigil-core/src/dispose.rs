//! Teardown capability.

/// A component that holds resources and must be released when its validator
/// is disposed.
///
/// Components advertise this capability through the `disposer()` method of
/// the component trait they are registered with ([`Trigger::disposer`],
/// [`DataProvider::disposer`], ...). Components that return `None` are
/// skipped silently during disposal.
///
/// Validators dispose each component at most once, even when the same
/// component is reachable from several tiers.
///
/// [`Trigger::disposer`]: crate::Trigger::disposer
/// [`DataProvider::disposer`]: crate::DataProvider::disposer
pub trait Disposable: Send + Sync {
    /// Release the resources held by this component.
    fn dispose(&self);
}
