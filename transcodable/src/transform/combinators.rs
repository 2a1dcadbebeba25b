use {
    super::{BidirectionalTransformer, Transformer},
    crate::error::{value_not_found, Result},
    core::marker::PhantomData,
};

/// Runs `first`, then feeds its result into `second`.
///
/// The reverse direction runs the parts in the opposite order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> Transformer for Chain<A, B>
where
    A: Transformer,
    B: Transformer<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn transform(&self, input: Result<A::Input>) -> Result<B::Output> {
        self.second.transform(self.first.transform(input))
    }
}

impl<A, B> BidirectionalTransformer for Chain<A, B>
where
    A: BidirectionalTransformer,
    B: BidirectionalTransformer<Input = A::Output>,
{
    fn reverse_transform(&self, output: Result<B::Output>) -> Result<A::Input> {
        self.first
            .reverse_transform(self.second.reverse_transform(output))
    }
}

/// Swaps the directions of a bidirectional transformer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reversed<T>(T);

impl<T> Reversed<T> {
    pub fn new(inner: T) -> Self {
        Self(inner)
    }
}

impl<T> Transformer for Reversed<T>
where
    T: BidirectionalTransformer,
{
    type Input = T::Output;
    type Output = T::Input;

    fn transform(&self, input: Result<T::Output>) -> Result<T::Input> {
        self.0.reverse_transform(input)
    }
}

impl<T> BidirectionalTransformer for Reversed<T>
where
    T: BidirectionalTransformer,
{
    fn reverse_transform(&self, output: Result<T::Input>) -> Result<T::Output> {
        self.0.transform(output)
    }
}

/// Couples two one-way transformers with mirrored types into a
/// bidirectional one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paired<F, B> {
    forward: F,
    backward: B,
}

impl<F, B> Paired<F, B> {
    pub fn new(forward: F, backward: B) -> Self {
        Self { forward, backward }
    }
}

impl<F, B> Transformer for Paired<F, B>
where
    F: Transformer,
    B: Transformer<Input = F::Output, Output = F::Input>,
{
    type Input = F::Input;
    type Output = F::Output;

    fn transform(&self, input: Result<F::Input>) -> Result<F::Output> {
        self.forward.transform(input)
    }
}

impl<F, B> BidirectionalTransformer for Paired<F, B>
where
    F: Transformer,
    B: Transformer<Input = F::Output, Output = F::Input>,
{
    fn reverse_transform(&self, output: Result<F::Output>) -> Result<F::Input> {
        self.backward.transform(output)
    }
}

/// Applies a same-type transformer only when enabled, otherwise passes the
/// input through.
#[derive(Debug, Clone, Copy)]
pub struct Conditionally<T> {
    inner: Option<T>,
}

impl<T> Conditionally<T> {
    /// `factory` is only called when `enabled` is set.
    pub fn new<F>(enabled: bool, factory: F) -> Self
    where
        F: FnOnce() -> T,
    {
        Self {
            inner: if enabled { Some(factory()) } else { None },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }
}

impl<T, V> Transformer for Conditionally<T>
where
    T: Transformer<Input = V, Output = V>,
{
    type Input = V;
    type Output = V;

    fn transform(&self, input: Result<V>) -> Result<V> {
        match &self.inner {
            Some(inner) => inner.transform(input),
            None => input,
        }
    }
}

impl<T, V> BidirectionalTransformer for Conditionally<T>
where
    T: BidirectionalTransformer<Input = V, Output = V>,
{
    fn reverse_transform(&self, output: Result<V>) -> Result<V> {
        match &self.inner {
            Some(inner) => inner.reverse_transform(output),
            None => output,
        }
    }
}

/// Lifts an optional value into a required one, substituting `default` when
/// it is absent.
#[derive(Debug, Clone, Copy)]
pub struct Wrapped<T> {
    default: Option<T>,
}

impl<T> Wrapped<T> {
    pub fn new(default: Option<T>) -> Self {
        Self { default }
    }
}

impl<T> Default for Wrapped<T> {
    fn default() -> Self {
        Self { default: None }
    }
}

impl<T> Transformer for Wrapped<T>
where
    T: Clone,
{
    type Input = Option<T>;
    type Output = T;

    fn transform(&self, input: Result<Option<T>>) -> Result<T> {
        match input? {
            Some(value) => Ok(value),
            None => self.default.clone().ok_or_else(value_not_found),
        }
    }
}

impl<T> BidirectionalTransformer for Wrapped<T>
where
    T: Clone,
{
    fn reverse_transform(&self, output: Result<T>) -> Result<Option<T>> {
        output.map(Some)
    }
}

/// Lifts a required value into an optional one.
pub struct Optional<T>(PhantomData<fn(T) -> T>);

impl<T> Transformer for Optional<T> {
    type Input = T;
    type Output = Option<T>;

    fn transform(&self, input: Result<T>) -> Result<Option<T>> {
        input.map(Some)
    }
}

impl<T> BidirectionalTransformer for Optional<T> {
    fn reverse_transform(&self, output: Result<Option<T>>) -> Result<T> {
        output?.ok_or_else(value_not_found)
    }
}

marker_impls!(Optional);
