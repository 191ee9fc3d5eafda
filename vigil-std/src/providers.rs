//! Standard data providers.

use parking_lot::RwLock;
use vigil_core::DataProvider;

/// A settable value exposed as a data provider.
///
/// Stands in for a form field model: the application writes the value, the
/// validator reads it on every firing. Setting the value does not fire
/// anything; pair it with a trigger.
#[derive(Debug, Default)]
pub struct SharedValue<T> {
    value: RwLock<T>,
}

impl<T: Clone> SharedValue<T> {
    /// Create a provider holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        *self.value.write() = value;
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

impl<T> DataProvider<T> for SharedValue<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn get_data(&self) -> T {
        self.value.read().clone()
    }
}
