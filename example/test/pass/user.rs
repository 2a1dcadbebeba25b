use transcodable::{codable, IntegerToBoolean};

#[codable]
#[derive(Debug, PartialEq)]
struct User {
    #[coding_key("user_name", "userName")]
    pub name: String,
    pub email: Option<String>,
    #[transform(IntegerToBoolean)]
    pub verified: bool,
    #[coding_ignored]
    pub session_token: Option<String>,
}

fn main() {
    let user: User = serde_json::from_str(
        r#"{"userName": "max_1123", "verified": 1, "session_token": "secret"}"#,
    )
    .unwrap();

    assert_eq!(
        user,
        User {
            name: "max_1123".into(),
            email: None,
            verified: true,
            session_token: None,
        }
    );

    let json = serde_json::to_string(&user).unwrap();
    assert_eq!(json, r#"{"user_name":"max_1123","verified":1}"#);
}
