//! Request messages sent to the remote services.
//!
//! Field names follow the remote wire format (snake_case). Fields the
//! gateway never inspects are carried through in a flattened `extra` map.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::{Map, Value};

pub mod callbacks;
pub mod catalog;
pub mod dashboard;
pub mod key_products;
pub mod onboarding;
pub mod orders;
pub mod paylinks;
pub mod payment_costs;
pub mod payment_methods;
pub mod products;
pub mod projects;
pub mod reports;
pub mod settings;
pub mod taxes;
pub mod user_profiles;
pub mod users;

/// Unvalidated fields forwarded verbatim.
pub type Extra = Map<String, Value>;

/// Accept `a,b,c` from query strings as well as JSON arrays.
pub fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect(),
        OneOrMany::Many(values) => values,
    })
}

/// Accept numbers sent as strings (form bodies) as well as JSON numbers.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(value) if value.is_empty() => Ok(0),
        NumberOrString::String(value) => value.parse().map_err(serde::de::Error::custom),
    }
}

/// Bytes travel base64-encoded, as protobuf JSON expects.
pub fn as_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}
