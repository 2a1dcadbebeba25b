use {
    super::{BidirectionalTransformer, Paired, Transformer},
    crate::error::Result,
    core::marker::PhantomData,
    serde::{de::DeserializeOwned, Serialize},
};

/// Passes values through unchanged in both directions.
pub struct Identity<T>(PhantomData<fn(T) -> T>);

marker_impls!(Identity);

impl<T> Transformer for Identity<T> {
    type Input = T;
    type Output = T;

    fn transform(&self, input: Result<T>) -> Result<T> {
        input
    }
}

impl<T> BidirectionalTransformer for Identity<T> {
    fn reverse_transform(&self, output: Result<T>) -> Result<T> {
        self.transform(output)
    }
}

/// Replaces a failure with a default value, if one was given.
#[derive(Debug, Clone, Copy)]
pub struct DefaultOnFailure<T> {
    default: Option<T>,
}

impl<T> DefaultOnFailure<T> {
    pub fn new(default: Option<T>) -> Self {
        Self { default }
    }
}

impl<T> Transformer for DefaultOnFailure<T>
where
    T: Clone,
{
    type Input = T;
    type Output = T;

    fn transform(&self, input: Result<T>) -> Result<T> {
        match (input, &self.default) {
            (Ok(value), _) => Ok(value),
            (Err(_), Some(default)) => Ok(default.clone()),
            (Err(err), None) => Err(err),
        }
    }
}

impl<T> BidirectionalTransformer for DefaultOnFailure<T>
where
    T: Clone,
{
    fn reverse_transform(&self, output: Result<T>) -> Result<T> {
        self.transform(output)
    }
}

/// Decodes a value from a string holding its JSON form.
pub struct RawStringDecode<V>(PhantomData<fn() -> V>);

marker_impls!(RawStringDecode);

impl<V> Transformer for RawStringDecode<V>
where
    V: DeserializeOwned,
{
    type Input = String;
    type Output = V;

    fn transform(&self, input: Result<String>) -> Result<V> {
        let raw = input?;
        Ok(serde_json::from_slice(raw.as_bytes())?)
    }
}

/// Encodes a value into a string holding its JSON form.
pub struct RawStringEncode<V>(PhantomData<fn(V)>);

marker_impls!(RawStringEncode);

impl<V> Transformer for RawStringEncode<V>
where
    V: Serialize,
{
    type Input = V;
    type Output = String;

    fn transform(&self, input: Result<V>) -> Result<String> {
        let bytes = serde_json::to_vec(&input?)?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Transcodes a value through a string containing its JSON form.
///
/// Decoding parses the string, encoding serializes the value back into one.
pub struct RawString<V> {
    inner: Paired<RawStringDecode<V>, RawStringEncode<V>>,
}

impl<V> RawString<V> {
    pub fn new() -> Self {
        Self {
            inner: Paired::new(RawStringDecode::new(), RawStringEncode::new()),
        }
    }
}

impl<V> Default for RawString<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for RawString<V> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<V> core::fmt::Debug for RawString<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("RawString")
    }
}

impl<V> Transformer for RawString<V>
where
    V: Serialize + DeserializeOwned,
{
    type Input = String;
    type Output = V;

    fn transform(&self, input: Result<String>) -> Result<V> {
        self.inner.transform(input)
    }
}

impl<V> BidirectionalTransformer for RawString<V>
where
    V: Serialize + DeserializeOwned,
{
    fn reverse_transform(&self, output: Result<V>) -> Result<String> {
        self.inner.reverse_transform(output)
    }
}

/// Reads `1` as `true` and every other integer as `false`.
///
/// The reverse direction writes `1` and `0`, so integers other than those two
/// do not survive a round trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerToBoolean;

impl Transformer for IntegerToBoolean {
    type Input = i64;
    type Output = bool;

    fn transform(&self, input: Result<i64>) -> Result<bool> {
        input.map(|value| value == 1)
    }
}

impl BidirectionalTransformer for IntegerToBoolean {
    fn reverse_transform(&self, output: Result<bool>) -> Result<i64> {
        output.map(i64::from)
    }
}

/// Projects a field out of an already decoded value.
///
/// ```
/// use transcodable::{KeyPath, Transformer};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let y = KeyPath::new(|point: &Point| point.y);
/// assert_eq!(y.apply(Point { x: 1, y: 2 }).unwrap(), 2);
/// ```
pub struct KeyPath<I, O, F> {
    project: F,
    marker: PhantomData<fn(I) -> O>,
}

impl<I, O, F> KeyPath<I, O, F>
where
    F: Fn(&I) -> O,
{
    pub fn new(project: F) -> Self {
        Self {
            project,
            marker: PhantomData,
        }
    }
}

impl<I, O, F> Transformer for KeyPath<I, O, F>
where
    F: Fn(&I) -> O,
{
    type Input = I;
    type Output = O;

    fn transform(&self, input: Result<I>) -> Result<O> {
        input.map(|value| (self.project)(&value))
    }
}

impl<I, O, F: Clone> Clone for KeyPath<I, O, F> {
    fn clone(&self) -> Self {
        Self {
            project: self.project.clone(),
            marker: PhantomData,
        }
    }
}

impl<I, O, F> core::fmt::Debug for KeyPath<I, O, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyPath").finish()
    }
}
