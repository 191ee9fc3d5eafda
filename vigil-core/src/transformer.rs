//! # Transformers
//!
//! Pure unary functions adapting values between pipeline stages.
//!
//! A validator owns four transformer chains (data provider output, rule input,
//! rule output, result handler input). Because a mapping joint can turn N
//! values into one collection at runtime, the chains are type-erased: each
//! stage is a [`DynTransformer`] over [`AnyValue`], and checks its input
//! type when it runs. An empty chain is the identity.

use crate::{
    error::TypeMismatch,
    value::{AnyValue, downcast_value},
};
use std::{any::Any, fmt, marker::PhantomData, sync::Arc};

/// A pure unary value-mapping function.
///
/// Any `Fn(I) -> O` closure is a transformer.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot transform `{I}` into `{O}`",
    label = "missing `Transformer<{I}, {O}>` implementation",
    note = "Transformers must implement `transform` for the input type `{I}`."
)]
pub trait Transformer<I, O>: Send + Sync + 'static {
    /// Map `input` to the output value.
    fn transform(&self, input: I) -> O;
}

// Blanket impl for closures
impl<F, I, O> Transformer<I, O> for F
where
    F: Fn(I) -> O + Send + Sync + 'static,
{
    fn transform(&self, input: I) -> O {
        (self)(input)
    }
}

/// Object-safe, type-erased version of [`Transformer`].
pub trait DynTransformer: Send + Sync + 'static {
    /// Transform a type-erased value.
    ///
    /// Fails when `input` is not of [`input_type`](Self::input_type).
    fn transform_dyn(&self, input: AnyValue) -> Result<AnyValue, TypeMismatch>;

    /// Name of the input type this stage consumes.
    fn input_type(&self) -> &'static str;

    /// Name of the output type this stage produces.
    fn output_type(&self) -> &'static str;
}

/// Bridges a typed [`Transformer`] to [`DynTransformer`].
struct Erased<T, I, O> {
    inner: T,
    _phantom: PhantomData<fn(I) -> O>,
}

impl<T, I, O> DynTransformer for Erased<T, I, O>
where
    T: Transformer<I, O>,
    I: Any,
    O: Any + Send,
{
    fn transform_dyn(&self, input: AnyValue) -> Result<AnyValue, TypeMismatch> {
        let input = downcast_value::<I>(input)?;
        Ok(Box::new(self.inner.transform(input)))
    }

    fn input_type(&self) -> &'static str {
        std::any::type_name::<I>()
    }

    fn output_type(&self) -> &'static str {
        std::any::type_name::<O>()
    }
}

/// A handle to one stage of a [`TransformerChain`].
///
/// Returned when a transformer is added; used to remove that exact stage
/// later. Cloning the handle does not clone the transformer.
#[derive(Clone)]
pub struct TransformerHandle(Arc<dyn DynTransformer>);

impl TransformerHandle {
    /// Erase a typed transformer.
    pub fn new<T, I, O>(transformer: T) -> Self
    where
        T: Transformer<I, O>,
        I: Any,
        O: Any + Send,
    {
        Self(Arc::new(Erased {
            inner: transformer,
            _phantom: PhantomData,
        }))
    }

    /// Wrap a transformer that does its own type checking.
    pub fn from_dyn(transformer: Arc<dyn DynTransformer>) -> Self {
        Self(transformer)
    }

    /// Whether both handles refer to the same stage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The erased transformer.
    pub fn transformer(&self) -> &dyn DynTransformer {
        &*self.0
    }
}

impl fmt::Debug for TransformerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerHandle")
            .field("input", &self.0.input_type())
            .field("output", &self.0.output_type())
            .finish()
    }
}

/// An ordered sequence of type-erased transformers.
///
/// Each stage's output must be the next stage's input; this is checked when
/// the chain runs, not when it is built.
///
/// # Example
///
/// ```rust
/// use vigil_core::{TransformerChain, downcast_value};
///
/// let chain = TransformerChain::new()
///     .then(|s: String| s.to_uppercase())
///     .then(|s: String| s.chars().rev().collect::<String>());
///
/// let out = chain.apply(Box::new(String::from("ab"))).unwrap();
/// assert_eq!(downcast_value::<String>(out).unwrap(), "BA");
/// ```
#[derive(Clone, Default)]
pub struct TransformerChain {
    stages: Vec<TransformerHandle>,
}

impl TransformerChain {
    /// Create an empty (identity) chain.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage, builder style.
    pub fn then<T, I, O>(mut self, transformer: T) -> Self
    where
        T: Transformer<I, O>,
        I: Any,
        O: Any + Send,
    {
        self.push(transformer);
        self
    }

    /// Append a stage and return its handle.
    pub fn push<T, I, O>(&mut self, transformer: T) -> TransformerHandle
    where
        T: Transformer<I, O>,
        I: Any,
        O: Any + Send,
    {
        let handle = TransformerHandle::new(transformer);
        self.stages.push(handle.clone());
        handle
    }

    /// Append an already erased stage.
    pub fn push_handle(&mut self, handle: TransformerHandle) {
        self.stages.push(handle);
    }

    /// Remove the first occurrence of `handle`.
    ///
    /// Returns `false` when the stage is not part of this chain.
    pub fn remove(&mut self, handle: &TransformerHandle) -> bool {
        match self.stages.iter().position(|stage| stage.ptr_eq(handle)) {
            Some(index) => {
                self.stages.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every stage.
    pub fn clear(&mut self) {
        self.stages.clear();
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain is the identity.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Iterate over the stages in application order.
    pub fn iter(&self) -> impl Iterator<Item = &TransformerHandle> {
        self.stages.iter()
    }

    /// Run `value` through every stage in order.
    pub fn apply(&self, value: AnyValue) -> Result<AnyValue, TypeMismatch> {
        self.stages
            .iter()
            .try_fold(value, |value, stage| stage.0.transform_dyn(value))
    }
}

impl fmt::Debug for TransformerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.stages.iter()).finish()
    }
}
