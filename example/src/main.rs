use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use transcodable::{codable, CodingHooks, IntegerToBoolean};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Location {
    city: String,
    country: String,
}

#[codable(hooks)]
#[derive(Debug)]
struct Member {
    #[coding_key("display_name", "displayName", "name")]
    name: String,
    #[transform(IntegerToBoolean)]
    admin: bool,
    #[lossy]
    languages: Vec<String>,
    #[lossy]
    karma: HashMap<String, u32>,
    // The upstream API ships this as a string of JSON
    #[raw_string]
    #[default_on_failure(Location { city: "unknown".into(), country: "unknown".into() })]
    location: Location,
    #[default_on_failure]
    age: u8,
    #[coding_ignored]
    initials: String,
}

impl CodingHooks for Member {
    fn did_decode(&mut self) -> transcodable::Result<()> {
        self.initials = self
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect();
        Ok(())
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}{} from {}, {} speaks {} and has {} karma",
            self.initials,
            self.name,
            if self.admin { " (admin)" } else { "" },
            self.location.city,
            self.location.country,
            self.languages.join(", "),
            self.karma.values().sum::<u32>(),
        )
    }
}

const FEED: &str = r#"[
    {
        "displayName": "Ada Lovelace",
        "admin": 1,
        "languages": ["en", "fr", 42],
        "karma": {"rust": 12, "swift": "lots"},
        "location": "{\"city\": \"London\", \"country\": \"UK\"}",
        "age": 36
    },
    {
        "name": "Grace Hopper",
        "admin": 0,
        "languages": ["en", null],
        "karma": {"cobol": 99},
        "location": "not json at all",
        "age": "old"
    }
]"#;

fn main() -> Result<(), transcodable::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let members: Vec<Member> = serde_json::from_str(FEED)?;
    tracing::info!(count = members.len(), "decoded members");

    for member in &members {
        println!("{}", member);
    }

    println!();

    println!("{}", serde_json::to_string_pretty(&members)?);

    Ok(())
}
