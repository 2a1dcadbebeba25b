//! Collection decoding that drops invalid elements instead of failing.
//!
//! Each element (or map value) is first buffered as one opaque
//! [`serde_json::Value`], which consumes exactly one element of the source
//! whether or not the typed decode that follows succeeds. Because of that
//! buffering the source format has to be self-describing.
//!
//! ```
//! use std::collections::HashMap;
//! use transcodable::lossy::{LossyArray, LossyDictionary};
//!
//! let ids: LossyArray<i64> = serde_json::from_str(r#"[1, "x", 3]"#).unwrap();
//! assert_eq!(ids.into_inner(), vec![1, 3]);
//!
//! let scores: LossyDictionary<String, i64> =
//!     serde_json::from_str(r#"{"a": 1, "b": "bad"}"#).unwrap();
//! let mut expected = HashMap::new();
//! expected.insert("a".to_string(), 1);
//! assert_eq!(scores.into_inner(), expected);
//! ```
use {
    core::{
        fmt,
        hash::{BuildHasher, Hash},
        marker::PhantomData,
        ops::{Deref, DerefMut},
        str::FromStr,
    },
    serde::{
        de::{DeserializeOwned, MapAccess, SeqAccess, Visitor},
        Deserialize, Deserializer, Serialize, Serializer,
    },
    serde_json::Value,
    std::collections::{BTreeMap, HashMap},
};

// Upper bound on pre-allocation from an untrusted size hint.
const MAX_PREALLOCATION: usize = 4096;

/// A collection that can be decoded while skipping invalid entries.
pub trait LossyDecode: Sized {
    fn decode_lossy<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>;
}

/// Lossy decode for use with `#[serde(deserialize_with = "...")]`.
pub fn deserialize<'de, D, C>(deserializer: D) -> Result<C, D::Error>
where
    D: Deserializer<'de>,
    C: LossyDecode,
{
    C::decode_lossy(deserializer)
}

struct ArrayVisitor<T>(PhantomData<fn() -> T>);

impl<'de, T> Visitor<'de> for ArrayVisitor<T>
where
    T: DeserializeOwned,
{
    type Value = Vec<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATION);
        let mut out = Vec::with_capacity(capacity);
        let mut index = 0usize;
        while let Some(element) = seq.next_element::<Value>()? {
            match T::deserialize(element) {
                Ok(value) => out.push(value),
                Err(err) => {
                    tracing::trace!(index, error = %err, "skipping undecodable element");
                }
            }
            index += 1;
        }
        Ok(out)
    }
}

struct DictionaryVisitor<M, K, V> {
    marker: PhantomData<fn() -> (M, K, V)>,
}

impl<'de, M, K, V> Visitor<'de> for DictionaryVisitor<M, K, V>
where
    M: Default + Extend<(K, V)>,
    K: FromStr,
    K::Err: fmt::Display,
    V: DeserializeOwned,
{
    type Value = M;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut out = M::default();
        while let Some(raw_key) = map.next_key::<String>()? {
            // Read the value before looking at the key so a skipped entry is
            // still consumed in full.
            let raw_value = map.next_value::<Value>()?;
            let key = match raw_key.parse::<K>() {
                Ok(key) => key,
                Err(err) => {
                    tracing::trace!(key = %raw_key, error = %err, "skipping unconvertible key");
                    continue;
                }
            };
            match V::deserialize(raw_value) {
                Ok(value) => out.extend(Some((key, value))),
                Err(err) => {
                    tracing::trace!(key = %raw_key, error = %err, "skipping undecodable value");
                }
            }
        }
        Ok(out)
    }
}

fn decode_dictionary<'de, D, M, K, V>(deserializer: D) -> Result<M, D::Error>
where
    D: Deserializer<'de>,
    M: Default + Extend<(K, V)>,
    K: FromStr,
    K::Err: fmt::Display,
    V: DeserializeOwned,
{
    deserializer.deserialize_map(DictionaryVisitor {
        marker: PhantomData,
    })
}

impl<T> LossyDecode for Vec<T>
where
    T: DeserializeOwned,
{
    fn decode_lossy<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(ArrayVisitor(PhantomData))
    }
}

impl<K, V, S> LossyDecode for HashMap<K, V, S>
where
    K: FromStr + Eq + Hash,
    K::Err: fmt::Display,
    V: DeserializeOwned,
    S: BuildHasher + Default,
{
    fn decode_lossy<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        decode_dictionary(deserializer)
    }
}

impl<K, V> LossyDecode for BTreeMap<K, V>
where
    K: FromStr + Ord,
    K::Err: fmt::Display,
    V: DeserializeOwned,
{
    fn decode_lossy<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        decode_dictionary(deserializer)
    }
}

impl<T> LossyDecode for Option<T>
where
    T: LossyDecode,
{
    fn decode_lossy<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            Some(value) => T::decode_lossy(value)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

macro_rules! lossy_wrapper {
    ($(#[$meta:meta])* $name:ident<$($param:ident),*> => $inner:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<$($param),*>(pub $inner);

        impl<$($param),*> Default for $name<$($param),*>
        where
            $inner: Default,
        {
            fn default() -> Self {
                Self(<$inner>::default())
            }
        }

        impl<$($param),*> PartialEq for $name<$($param),*>
        where
            $inner: PartialEq,
        {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        impl<$($param),*> Eq for $name<$($param),*> where $inner: Eq {}

        impl<$($param),*> $name<$($param),*> {
            pub fn into_inner(self) -> $inner {
                self.0
            }
        }

        impl<$($param),*> Deref for $name<$($param),*> {
            type Target = $inner;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<$($param),*> DerefMut for $name<$($param),*> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl<$($param),*> From<$inner> for $name<$($param),*> {
            fn from(inner: $inner) -> Self {
                Self(inner)
            }
        }

        impl<'de, $($param),*> Deserialize<'de> for $name<$($param),*>
        where
            $inner: LossyDecode,
        {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                <$inner>::decode_lossy(deserializer).map(Self)
            }
        }

        impl<$($param),*> Serialize for $name<$($param),*>
        where
            $inner: Serialize,
        {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.serialize(serializer)
            }
        }
    };
}

lossy_wrapper! {
    /// A `Vec` that keeps only the elements that decoded successfully,
    /// in source order.
    LossyArray<T> => Vec<T>
}

lossy_wrapper! {
    /// A `HashMap` that keeps only the entries whose key converted and whose
    /// value decoded successfully.
    LossyDictionary<K, V> => HashMap<K, V>
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        id: u32,
        label: String,
    }

    fn lossy<C: LossyDecode>(value: Value) -> C {
        C::decode_lossy(value).unwrap()
    }

    #[test]
    fn array_drops_failures_in_order() {
        let ids: Vec<i64> = lossy(json!([1, "x", 3]));
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn array_length_is_total_minus_failures() {
        let source = json!([
            {"id": 1, "label": "a"},
            {"id": "two", "label": "b"},
            {"id": 3},
            [1, 2, 3],
            {"id": 5, "label": "e"},
            null,
            {"id": 7, "label": "g"},
        ]);
        let items: Vec<Item> = lossy(source);
        let ids: Vec<u32> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 5, 7]);
    }

    #[test]
    fn nested_failures_consume_one_element() {
        // a failing element that is itself a deep structure must not leak
        // into the elements after it
        let source = r#"[[1, [2, [3, "x"]]], [4], [5, {"a": [6]}], [7]]"#;
        let parsed: LossyArray<Vec<i64>> = serde_json::from_str(source).unwrap();
        assert_eq!(parsed.into_inner(), vec![vec![4], vec![7]]);
    }

    #[test]
    fn array_of_only_failures_is_empty() {
        let all_bad: Vec<bool> = lossy(json!(["a", 1, {}]));
        assert!(all_bad.is_empty());
        let empty: Vec<bool> = lossy(json!([]));
        assert!(empty.is_empty());
    }

    #[test]
    fn non_sequence_is_a_hard_error() {
        assert!(Vec::<i64>::decode_lossy(json!({"a": 1})).is_err());
        assert!(HashMap::<String, i64>::decode_lossy(json!([1, 2])).is_err());
    }

    #[test]
    fn dictionary_drops_bad_values() {
        let scores: HashMap<String, i64> = lossy(json!({"a": 1, "b": "bad"}));
        assert_eq!(scores.len(), 1);
        assert_eq!(scores["a"], 1);
    }

    #[test]
    fn dictionary_drops_bad_keys() {
        let source = json!({"1": "one", "two": "two", "3": 3, "4": "four"});
        let parsed: BTreeMap<u8, String> = lossy(source);
        let entries: Vec<(u8, &str)> = parsed.iter().map(|(k, v)| (*k, v.as_str())).collect();
        assert_eq!(entries, vec![(1, "one"), (4, "four")]);
    }

    #[test]
    fn dictionary_collisions_keep_one_entry() {
        // "01" and "1" both convert to 1
        let parsed: HashMap<u32, bool> = lossy(json!({"01": true, "1": false, "2": true}));
        assert_eq!(parsed.len(), 2);
        assert!(parsed.contains_key(&1));
    }

    #[test]
    fn optional_collections() {
        let absent: Option<Vec<u8>> = lossy(Value::Null);
        assert_eq!(absent, None);
        let present: Option<Vec<u8>> = lossy(json!([1, 300, 2]));
        assert_eq!(present, Some(vec![1, 2]));
    }

    #[test]
    fn wrappers_serialize_transparently() {
        let ids = LossyArray::from(vec![1, 2]);
        assert_eq!(serde_json::to_value(&ids).unwrap(), json!([1, 2]));
        let mut scores = LossyDictionary::<String, i64>::default();
        scores.insert("a".into(), 1);
        assert_eq!(serde_json::to_value(&scores).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn deserialize_with_attribute() {
        #[derive(Deserialize)]
        struct Inventory {
            #[serde(deserialize_with = "deserialize")]
            items: Vec<Item>,
        }

        let inventory: Inventory = serde_json::from_value(json!({
            "items": [{"id": 1, "label": "a"}, {"id": -1, "label": "b"}]
        }))
        .unwrap();
        assert_eq!(inventory.items, vec![Item { id: 1, label: "a".into() }]);
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn skips_are_traced() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let (ids, scores) = tracing::subscriber::with_default(subscriber, || {
            let ids: Vec<i64> = lossy(json!([1, "x", 3]));
            let scores: BTreeMap<u8, i64> = lossy(json!({"1": 1, "300": 2, "3": "bad"}));
            (ids, scores)
        });
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(scores.len(), 1);

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("skipping undecodable element"), "{}", logs);
        assert!(logs.contains("index=1"), "{}", logs);
        assert!(logs.contains("skipping unconvertible key"), "{}", logs);
        assert!(logs.contains("key=300"), "{}", logs);
        assert!(logs.contains("skipping undecodable value"), "{}", logs);
        assert!(logs.contains("key=3"), "{}", logs);
    }
}
