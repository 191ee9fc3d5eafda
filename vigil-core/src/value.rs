//! Type-erased pipeline values.

use crate::error::TypeMismatch;
use std::any::Any;

/// A value travelling through a transformer chain or a mapping joint.
pub type AnyValue = Box<dyn Any + Send>;

/// Recover the concrete value behind `value`.
pub fn downcast_value<T: Any>(value: AnyValue) -> Result<T, TypeMismatch> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| TypeMismatch::expected::<T>())
}
