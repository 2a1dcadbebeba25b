use transcodable::{codable, CodingHooks, Error, IntegerToBoolean, KeyPath, TransformerExt};

// Keywords as field names

#[codable]
#[derive(Debug)]
struct Token {
    r#type: String,
    #[coding_key("match")]
    r#match: String,
}

// Raw identifiers as struct names

#[codable]
#[derive(Debug, PartialEq)]
struct r#Match {
    home: u8,
    away: u8,
}

// Hooks

#[codable(hooks)]
#[derive(Debug, Default)]
struct Temperature {
    celsius: f64,
    #[coding_ignored]
    fahrenheit: f64,
}

impl CodingHooks for Temperature {
    fn did_decode(&mut self) -> transcodable::Result<()> {
        if self.celsius < -273.15 {
            return Err(Error::custom("below absolute zero"));
        }
        self.fahrenheit = self.celsius * 9.0 / 5.0 + 32.0;
        Ok(())
    }
}

// One direction only

#[derive(Debug, Clone, serde::Deserialize)]
struct Wrapper {
    inner: u32,
}

#[codable(decode_only)]
struct Unwrapped {
    #[transform(KeyPath::new(|wrapper: &Wrapper| wrapper.inner))]
    inner: u32,
}

#[codable(encode_only)]
struct Flag {
    #[transform(IntegerToBoolean.reversed())]
    set: i64,
}

fn main() {
    let token: Token = serde_json::from_str(r#"{"type": "ident", "match": "foo"}"#).unwrap();
    assert_eq!(token.r#type, "ident");
    assert_eq!(serde_json::to_string(&token).unwrap(), r#"{"type":"ident","match":"foo"}"#);

    let score: r#Match = serde_json::from_str(r#"{"home": 2, "away": 1}"#).unwrap();
    assert_eq!(score, r#Match { home: 2, away: 1 });
    assert_eq!(serde_json::to_string(&score).unwrap(), r#"{"home":2,"away":1}"#);

    let warm: Temperature = serde_json::from_str(r#"{"celsius": 100.0}"#).unwrap();
    assert_eq!(warm.fahrenheit, 212.0);
    assert!(serde_json::from_str::<Temperature>(r#"{"celsius": -300.0}"#).is_err());

    let unwrapped: Unwrapped = serde_json::from_str(r#"{"inner": {"inner": 7}}"#).unwrap();
    assert_eq!(unwrapped.inner, 7);

    assert_eq!(serde_json::to_string(&Flag { set: 1 }).unwrap(), r#"{"set":true}"#);
    assert_eq!(serde_json::to_string(&Flag { set: 5 }).unwrap(), r#"{"set":false}"#);
}
