//! Element-wise transformation.

use std::marker::PhantomData;
use vigil_core::Transformer;

/// Applies an inner transformer to every element of a collection.
///
/// Useful after an `AllToEach` joint, where the chain sees a `Vec` of the
/// upstream values rather than each value.
pub struct CollectionElementTransformer<T, I, O> {
    element: T,
    _phantom: PhantomData<fn(I) -> O>,
}

impl<T, I, O> CollectionElementTransformer<T, I, O>
where
    T: Transformer<I, O>,
{
    /// Wrap `element`.
    pub const fn new(element: T) -> Self {
        Self {
            element,
            _phantom: PhantomData,
        }
    }
}

impl<T, I, O> Transformer<Vec<I>, Vec<O>> for CollectionElementTransformer<T, I, O>
where
    T: Transformer<I, O>,
    I: 'static,
    O: 'static,
{
    fn transform(&self, input: Vec<I>) -> Vec<O> {
        input
            .into_iter()
            .map(|element| self.element.transform(element))
            .collect()
    }
}
