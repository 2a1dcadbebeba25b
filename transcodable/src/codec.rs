//! Glue between transformers and serde.
//!
//! The functions here are what `#[codable]` expands to for fields that carry
//! a transformer, a default or lossy decoding. They are public so they can
//! also be used from hand written `deserialize_with`/`serialize_with`
//! functions.
use {
    crate::{
        error::Error,
        lossy::LossyDecode,
        transform::{
            BidirectionalTransformer, Conditionally, DefaultOnFailure, Transformer, TransformerExt,
        },
    },
    serde::{de, de::DeserializeOwned, ser, Deserialize, Deserializer, Serialize, Serializer},
    serde_json::Value,
};

fn recover_with<T>(default: Option<T>) -> Conditionally<DefaultOnFailure<T>> {
    Conditionally::new(default.is_some(), || DefaultOnFailure::new(default))
}

/// Decode a field through `transformer`.
///
/// The field is buffered first, so a malformed value becomes a transform
/// failure rather than a hard deserializer error. With a `default` that
/// failure, and any failure of the transformer itself, is replaced by the
/// default; without one it is reported through `D::Error`.
pub fn decode_field<'de, D, T>(
    deserializer: D,
    transformer: T,
    default: Option<T::Output>,
) -> Result<T::Output, D::Error>
where
    D: Deserializer<'de>,
    T: Transformer,
    T::Input: DeserializeOwned,
    T::Output: Clone,
{
    let raw = Value::deserialize(deserializer)?;
    let input = serde_json::from_value::<T::Input>(raw).map_err(Error::from);
    transformer
        .chain(recover_with(default))
        .transform(input)
        .map_err(de::Error::custom)
}

/// Decode a collection lossily, falling back to `default` if the source is
/// not a collection at all.
pub fn decode_lossy_field<'de, D, C>(deserializer: D, default: Option<C>) -> Result<C, D::Error>
where
    D: Deserializer<'de>,
    C: LossyDecode + Clone,
{
    let raw = Value::deserialize(deserializer)?;
    let collection = C::decode_lossy(raw).map_err(Error::from);
    recover_with(default)
        .transform(collection)
        .map_err(de::Error::custom)
}

/// Encode a field through the reverse direction of `transformer`.
pub fn encode_field<S, T>(
    value: &T::Output,
    transformer: T,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: BidirectionalTransformer,
    T::Input: Serialize,
    T::Output: Clone,
{
    transformer
        .reverse_apply(value.clone())
        .map_err(ser::Error::custom)?
        .serialize(serializer)
}

/// Transcode a field through a JSON string, for `#[serde(with = "...")]`.
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Envelope {
///     #[serde(with = "transcodable::codec::raw_string")]
///     payload: Vec<u8>,
/// }
///
/// let envelope: Envelope = serde_json::from_str(r#"{"payload": "[1, 2]"}"#).unwrap();
/// assert_eq!(envelope.payload, vec![1, 2]);
/// assert_eq!(
///     serde_json::to_string(&envelope).unwrap(),
///     r#"{"payload":"[1,2]"}"#
/// );
/// ```
pub mod raw_string {
    use {
        crate::transform::{RawStringDecode, RawStringEncode, Transformer},
        serde::{de, de::DeserializeOwned, ser, Deserialize, Deserializer, Serialize, Serializer},
    };

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<V, D::Error>
    where
        D: Deserializer<'de>,
        V: DeserializeOwned,
    {
        let raw = String::deserialize(deserializer)?;
        RawStringDecode::new().apply(raw).map_err(de::Error::custom)
    }

    pub fn serialize<S, V>(value: &V, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        RawStringEncode::new()
            .apply(value)
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::transform::{from_fn, IntegerToBoolean, RawString},
        serde_json::{json, value},
        std::collections::HashMap,
    };

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Limits {
        cpu: u32,
        memory: u32,
    }

    #[test]
    fn decode_field_applies_transformer() {
        let on: bool = decode_field(json!(1), IntegerToBoolean, None).unwrap();
        assert!(on);
        let off: bool = decode_field(json!(7), IntegerToBoolean, None).unwrap();
        assert!(!off);
    }

    #[test]
    fn decode_field_without_default_fails() {
        let err = decode_field(json!("yes"), IntegerToBoolean, None).unwrap_err();
        assert!(err.to_string().contains("invalid type"));
    }

    #[test]
    fn decode_field_recovers_with_default() {
        let fallback = decode_field(json!("yes"), IntegerToBoolean, Some(true)).unwrap();
        assert!(fallback);

        let failing = from_fn(|input: crate::Result<i64>| -> crate::Result<i64> {
            input?;
            Err(Error::custom("rejected"))
        });
        assert_eq!(decode_field(json!(5), &failing, Some(-1)).unwrap(), -1);
        assert!(decode_field(json!(5), &failing, None).is_err());
    }

    #[test]
    fn raw_string_field_round_trip() {
        let limits = Limits { cpu: 2, memory: 512 };
        let encoded =
            encode_field(&limits, RawString::<Limits>::new(), value::Serializer).unwrap();
        assert_eq!(encoded, json!(r#"{"cpu":2,"memory":512}"#));
        let decoded: Limits = decode_field(encoded, RawString::new(), None).unwrap();
        assert_eq!(decoded, limits);
    }

    #[test]
    fn encode_field_uses_reverse_direction() {
        let encoded = encode_field(&true, IntegerToBoolean, value::Serializer).unwrap();
        assert_eq!(encoded, json!(1));
    }

    #[test]
    fn lossy_field_defaults_only_on_hard_errors() {
        let skipped: Vec<u8> = decode_lossy_field(json!([1, "x"]), Some(vec![9])).unwrap();
        assert_eq!(skipped, vec![1]);
        let replaced: Vec<u8> = decode_lossy_field(json!("not a list"), Some(vec![9])).unwrap();
        assert_eq!(replaced, vec![9]);
        assert!(decode_lossy_field::<_, HashMap<String, u8>>(json!(3), None).is_err());
    }
}
