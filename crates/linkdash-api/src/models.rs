// Links API response types
//
// Wire-level models for the backend links endpoint. Backends disagree about
// field presence and types, so every field is optional or captured as a raw
// `Value`; `linkdash-core` normalizes them into the domain `ShortLink`.

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

// ── Link record ──────────────────────────────────────────────────────

/// One link object as returned by `GET {base}/links`.
///
/// `clicks`, `isActive` and `tags` are kept as raw JSON so the domain layer
/// can apply its own coercion rules (non-numeric clicks count as zero, only a
/// literal `true` marks a link active).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub original_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub short_code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub short_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub clicks: Value,
    #[serde(default)]
    pub is_active: Value,
    #[serde(default)]
    pub tags: Value,
}

/// Accept strings, numbers and booleans for identifier-ish fields; `null`
/// becomes the empty string. Objects and arrays are rejected.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string, found {}",
            json_type_name(&other)
        ))),
    }
}

/// Free text: only a JSON string counts, anything else is treated as absent.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Timestamps arrive as strings or as epoch milliseconds. Numbers are kept
/// in their decimal form for the domain layer to parse; other types are
/// treated as absent.
fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

// ── Click record ─────────────────────────────────────────────────────

/// A single click event. No endpoint serves these yet; the type exists so a
/// future click-analytics endpoint has a wire model to land in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub link_id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub referrer: Option<String>,
}

// ── Response Envelope ────────────────────────────────────────────────

/// Accepted shapes of the links endpoint response.
///
/// ```json
/// [ {...}, {...} ]
/// { "links": [...] }
/// { "data": [...] }
/// { "results": [...] }
/// ```
///
/// Wrapper keys are checked in that order and the first one holding an
/// array wins. Anything else is rejected with [`Error::UnexpectedShape`].
#[derive(Debug, Clone, PartialEq)]
pub enum LinksEnvelope {
    Bare(Vec<LinkRecord>),
    Links(Vec<LinkRecord>),
    Data(Vec<LinkRecord>),
    Results(Vec<LinkRecord>),
}

impl LinksEnvelope {
    /// Validate a decoded JSON body and normalize it into an envelope.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Array(items) => parse_records(items).map(Self::Bare),
            Value::Object(mut map) => {
                let key = ["links", "data", "results"]
                    .into_iter()
                    .find(|k| map.get(*k).is_some_and(Value::is_array));

                let Some(key) = key else {
                    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    keys.sort_unstable();
                    return Err(Error::UnexpectedShape {
                        found: format!("object with keys: {}", keys.join(", ")),
                    });
                };

                let items = match map.remove(key) {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                let records = parse_records(items)?;
                Ok(match key {
                    "links" => Self::Links(records),
                    "data" => Self::Data(records),
                    _ => Self::Results(records),
                })
            }
            other => Err(Error::UnexpectedShape {
                found: json_type_name(&other).to_owned(),
            }),
        }
    }

    /// Short label of the accepted shape (for logging).
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Bare(_) => "array",
            Self::Links(_) => "links",
            Self::Data(_) => "data",
            Self::Results(_) => "results",
        }
    }

    /// Strip the envelope, yielding the canonical record sequence.
    pub fn into_links(self) -> Vec<LinkRecord> {
        match self {
            Self::Bare(links) | Self::Links(links) | Self::Data(links) | Self::Results(links) => {
                links
            }
        }
    }
}

fn parse_records(items: Vec<Value>) -> Result<Vec<LinkRecord>, Error> {
    let raw = Value::Array(items);
    serde_json::from_value(raw.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: raw.to_string(),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": "1",
            "originalUrl": "https://www.rust-lang.org",
            "shortCode": "rust",
            "shortUrl": "https://sho.rt/rust",
            "title": "Rust",
            "createdAt": "2024-01-15T10:30:00Z",
            "clicks": 12,
            "isActive": true,
            "tags": ["lang"]
        })
    }

    #[test]
    fn bare_array_is_accepted() {
        let env = LinksEnvelope::from_value(json!([sample()])).unwrap();
        assert_eq!(env.shape(), "array");
        let links = env.into_links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].short_code, "rust");
        assert_eq!(links[0].clicks, json!(12));
    }

    #[test]
    fn wrapper_keys_are_accepted() {
        for key in ["links", "data", "results"] {
            let mut body = serde_json::Map::new();
            body.insert(key.to_owned(), json!([sample()]));
            let env = LinksEnvelope::from_value(Value::Object(body)).unwrap();
            assert_eq!(env.shape(), key);
            assert_eq!(env.into_links().len(), 1);
        }
    }

    #[test]
    fn first_array_key_wins() {
        let env = LinksEnvelope::from_value(json!({
            "links": "not-an-array",
            "data": [sample()],
            "results": []
        }))
        .unwrap();
        assert_eq!(env.shape(), "data");
    }

    #[test]
    fn unknown_wrapper_names_the_keys() {
        let err = LinksEnvelope::from_value(json!({ "foo": [], "bar": 1 })).unwrap_err();
        match err {
            Error::UnexpectedShape { found } => {
                assert_eq!(found, "object with keys: bar, foo");
            }
            other => panic!("expected UnexpectedShape, got {other:?}"),
        }
    }

    #[test]
    fn scalar_body_names_the_type() {
        let err = LinksEnvelope::from_value(json!("nope")).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"Expected array of links, but received string");
    }

    #[test]
    fn numeric_ids_and_null_strings_are_tolerated() {
        let record: LinkRecord = serde_json::from_value(json!({
            "id": 42,
            "title": null,
            "clicks": "many"
        }))
        .unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.title, "");
        assert_eq!(record.clicks, json!("many"));
        assert_eq!(record.is_active, Value::Null);
    }

    #[test]
    fn odd_description_and_created_at_do_not_sink_the_batch() {
        let mut odd = sample();
        odd["description"] = json!(42);
        odd["createdAt"] = json!(1_704_067_200_000_u64);
        let mut nested = sample();
        nested["createdAt"] = json!({ "seconds": 1 });

        let links = LinksEnvelope::from_value(json!({ "links": [sample(), odd, nested] }))
            .unwrap()
            .into_links();
        assert_eq!(links.len(), 3);
        assert_eq!(links[1].description, None);
        assert_eq!(links[1].created_at.as_deref(), Some("1704067200000"));
        assert_eq!(links[2].created_at, None);
        assert_eq!(links[0].created_at.as_deref(), Some("2024-01-15T10:30:00Z"));
    }

    #[test]
    fn non_object_items_fail_deserialization() {
        let err = LinksEnvelope::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }
}
