//! Fallible value transformers and the combinators that compose them.
//!
//! A [`Transformer`] maps a `Result<Input>` to a `Result<Output>`. Taking the
//! input as a `Result` lets a pipeline carry a failure from an earlier stage
//! through later ones, and lets recovery stages such as
//! [`DefaultOnFailure`] observe it. Every transformer in this crate passes an
//! incoming `Err` through untouched unless recovering from it is its whole
//! purpose.
//!
//! ```
//! use transcodable::{IntegerToBoolean, Transformer, TransformerExt, Wrapped};
//!
//! let flag = Wrapped::new(Some(0_i64)).chain(IntegerToBoolean);
//! assert_eq!(flag.apply(Some(1)).unwrap(), true);
//! assert_eq!(flag.apply(None).unwrap(), false);
//! ```
use {crate::error::Result, core::marker::PhantomData};

mod builtin;
mod combinators;

pub use {builtin::*, combinators::*};

/// A one-way, fallible mapping from `Input` to `Output`.
pub trait Transformer {
    type Input;
    type Output;

    fn transform(&self, input: Result<Self::Input>) -> Result<Self::Output>;

    /// Transform a plain value.
    fn apply(&self, value: Self::Input) -> Result<Self::Output> {
        self.transform(Ok(value))
    }
}

/// A transformer that also maps back from `Output` to `Input`.
///
/// The reverse direction is the encode-path counterpart of the forward
/// direction. It is not required to be a mathematical inverse.
pub trait BidirectionalTransformer: Transformer {
    fn reverse_transform(&self, output: Result<Self::Output>) -> Result<Self::Input>;

    fn reverse_apply(&self, value: Self::Output) -> Result<Self::Input> {
        self.reverse_transform(Ok(value))
    }
}

impl<T> Transformer for &T
where
    T: Transformer + ?Sized,
{
    type Input = T::Input;
    type Output = T::Output;

    fn transform(&self, input: Result<Self::Input>) -> Result<Self::Output> {
        (**self).transform(input)
    }
}

impl<T> BidirectionalTransformer for &T
where
    T: BidirectionalTransformer + ?Sized,
{
    fn reverse_transform(&self, output: Result<Self::Output>) -> Result<Self::Input> {
        (**self).reverse_transform(output)
    }
}

/// Fluent constructors for the combinators, available on every transformer.
pub trait TransformerExt: Transformer + Sized {
    /// Feed the output of `self` into `next`.
    fn chain<N>(self, next: N) -> Chain<Self, N>
    where
        N: Transformer<Input = Self::Output>,
    {
        Chain::new(self, next)
    }

    /// Swap the forward and reverse directions.
    fn reversed(self) -> Reversed<Self>
    where
        Self: BidirectionalTransformer,
    {
        Reversed::new(self)
    }

    /// Use `backward` as the reverse direction of `self`.
    fn paired_with<B>(self, backward: B) -> Paired<Self, B>
    where
        B: Transformer<Input = Self::Output, Output = Self::Input>,
    {
        Paired::new(self, backward)
    }

    /// Wrap every successful output in `Some`.
    fn optional(self) -> Chain<Self, Optional<Self::Output>> {
        Chain::new(self, Optional::new())
    }
}

impl<T> TransformerExt for T where T: Transformer {}

/// A one-way transformer backed by a closure. See [`from_fn`].
pub struct FromFn<I, O, F> {
    f: F,
    marker: PhantomData<fn(I) -> O>,
}

/// Build a one-way transformer from a closure over `Result`s.
///
/// The closure sees failures too, so it decides itself whether to propagate
/// them.
pub fn from_fn<I, O, F>(f: F) -> FromFn<I, O, F>
where
    F: Fn(Result<I>) -> Result<O>,
{
    FromFn {
        f,
        marker: PhantomData,
    }
}

impl<I, O, F> Transformer for FromFn<I, O, F>
where
    F: Fn(Result<I>) -> Result<O>,
{
    type Input = I;
    type Output = O;

    fn transform(&self, input: Result<I>) -> Result<O> {
        (self.f)(input)
    }
}

impl<I, O, F: Clone> Clone for FromFn<I, O, F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            marker: PhantomData,
        }
    }
}

impl<I, O, F> core::fmt::Debug for FromFn<I, O, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FromFn").finish()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::error::{value_not_found, Error},
    };

    fn parse() -> impl Transformer<Input = String, Output = i64> {
        from_fn(|input: Result<String>| input?.trim().parse::<i64>().map_err(Error::transform))
    }

    #[test]
    fn from_fn_sees_failures() {
        let t = parse();
        assert_eq!(t.apply(" 42 ".into()).unwrap(), 42);
        assert!(matches!(t.apply("nope".into()), Err(Error::Transform(_))));
        assert!(matches!(
            t.transform(Err(value_not_found())),
            Err(Error::ValueNotFound)
        ));
    }

    #[test]
    fn references_are_transformers() {
        let t = IntegerToBoolean;
        let by_ref = &t;
        assert!(by_ref.apply(1).unwrap());
        assert_eq!(by_ref.reverse_apply(false).unwrap(), 0);
    }

    #[test]
    fn optional_wraps_successes() {
        let t = parse().optional();
        assert_eq!(t.apply("7".into()).unwrap(), Some(7));
        assert!(t.apply("x".into()).is_err());
    }
}
