use serde::{Deserialize, Serialize};
use transcodable::{
    codable, from_fn, BidirectionalTransformer, Error, Transformer, TransformerExt, Wrapped,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Level {
    Low,
    High,
}

// Some clients send `"on"`/`"off"`, older ones send `null`
fn switch() -> impl BidirectionalTransformer<Input = Option<String>, Output = bool> {
    let parse = from_fn(|input: transcodable::Result<String>| match input?.as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(Error::custom(format!("unknown switch state {:?}", other))),
    });
    let print = from_fn(|input: transcodable::Result<bool>| {
        input.map(|on| (if on { "on" } else { "off" }).to_string())
    });

    Wrapped::new(Some("off".to_string())).chain(parse.paired_with(print))
}

#[codable]
#[derive(Debug)]
struct Settings {
    #[transform(switch())]
    notifications: bool,
    #[raw_string]
    #[coding_key("level_json")]
    level: Level,
    #[lossy]
    #[default_on_failure]
    blocked: Vec<u64>,
}

fn main() {
    let settings: Settings = serde_json::from_str(
        r#"{"notifications": "on", "level_json": "\"High\"", "blocked": [1, "spam", 3]}"#,
    )
    .unwrap();
    dbg!(&settings);

    let defaults: Settings =
        serde_json::from_str(r#"{"notifications": null, "level_json": "\"Low\"", "blocked": 5}"#)
            .unwrap();
    assert!(!defaults.notifications);
    assert!(defaults.blocked.is_empty());
    dbg!(&defaults);

    println!("{}", serde_json::to_string(&settings).unwrap());

    // the transformer on its own
    assert!(!switch().apply(None).unwrap());
    assert_eq!(switch().reverse_apply(true).unwrap(), Some("on".to_string()));
}
