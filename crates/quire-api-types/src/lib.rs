//! Wire shapes returned by the headless CMS.
//!
//! The CMS answers in two dialects: a bare record (or list of records), or a
//! `{ "data": … }` envelope whose items look like `{ "id": …, "attributes":
//! { … } }`. [`Payload`] and [`flatten_item`] fold either dialect into one
//! explicit representation at the client boundary, so everything downstream
//! only ever sees flat records.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// Numeric identifier assigned by the CMS.
pub type CmsId = i64;

/// Response body after the optional `data` envelope has been removed.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    One(Value),
    Many(Vec<Value>),
}

impl Payload {
    /// Strip an optional `data` envelope and classify what is left.
    ///
    /// `{ "data": null }` and scalar bodies classify as [`Payload::Empty`].
    pub fn from_body(body: Value) -> Self {
        let inner = match body {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };

        match inner {
            Value::Array(items) => {
                Self::Many(items.into_iter().filter(|item| !item.is_null()).collect())
            }
            Value::Object(_) => Self::One(inner),
            _ => Self::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::One(_) => false,
            Self::Many(items) => items.is_empty(),
        }
    }

    /// Every item in the payload, in server order.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Empty => Vec::new(),
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }

    /// The single item of a keyed lookup. A list answer yields its first entry.
    pub fn into_single(self) -> Option<Value> {
        match self {
            Self::Empty => None,
            Self::One(item) => Some(item),
            Self::Many(items) => items.into_iter().next(),
        }
    }
}

/// Fold an `{ id, attributes }` item into a flat record.
///
/// The top-level `id` (and `documentId`, when the attributes lack one) is
/// hoisted into the attribute map. Flat records pass through unchanged.
pub fn flatten_item(value: Value) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };

    match map.remove("attributes") {
        Some(Value::Object(mut attributes)) => {
            if let Some(id) = map.remove("id") {
                attributes.insert("id".to_string(), id);
            }
            if let Some(document_id) = map.remove("documentId") {
                attributes
                    .entry("documentId".to_string())
                    .or_insert(document_id);
            }
            Value::Object(attributes)
        }
        Some(other) => {
            map.insert("attributes".to_string(), other);
            Value::Object(map)
        }
        None => Value::Object(map),
    }
}

/// Decode one item of either dialect into `T`.
pub fn parse_item<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(flatten_item(value))
}

/// Decode a to-one relation, which may itself be enveloped. Undecodable
/// relations resolve to `None`.
pub fn relation_one<T: DeserializeOwned>(value: Option<Value>) -> Option<T> {
    let item = Payload::from_body(value?).into_single()?;
    parse_item(item).ok()
}

/// Decode a to-many relation, skipping entries that do not decode.
pub fn relation_many<T: DeserializeOwned>(value: Option<Value>) -> Vec<T> {
    let Some(value) = value else {
        return Vec::new();
    };
    Payload::from_body(value)
        .into_items()
        .into_iter()
        .filter_map(|item| parse_item(item).ok())
        .collect()
}

/// Extract a human-readable message from an error body.
///
/// Understands `{ "error": { "message": … } }` and `{ "message": … }`.
pub fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|error| error.get("message"))
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawPost {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<CmsId>,
    #[serde(rename = "documentId")]
    pub document_id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
    pub content: Option<String>,
    pub blog_author: Option<Value>,
    pub categories: Option<Value>,
    pub cover_image: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawAuthor {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<CmsId>,
    #[serde(rename = "documentId")]
    pub document_id: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub avatar: Option<Value>,
    pub linkedin_url: Option<String>,
    pub medium_url: Option<String>,
    pub dev_to_url: Option<String>,
    pub author_intro: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawCategory {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<CmsId>,
    #[serde(rename = "documentId")]
    pub document_id: Option<String>,
    pub title: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawMedia {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<CmsId>,
    pub url: Option<String>,
    #[serde(rename = "alternativeText")]
    pub alternative_text: Option<String>,
}

/// Accept numeric ids, numeric strings and `null`; anything else is `None`.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<CmsId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_strips_data_envelope() {
        let payload = Payload::from_body(json!({ "data": [{ "id": 1 }, null, { "id": 2 }] }));
        assert_eq!(payload.into_items().len(), 2);
    }

    #[test]
    fn payload_accepts_bare_bodies() {
        assert!(matches!(
            Payload::from_body(json!({ "id": 1, "title": "x" })),
            Payload::One(_)
        ));
        assert!(matches!(Payload::from_body(json!([])), Payload::Many(_)));
        assert!(Payload::from_body(json!({ "data": null })).is_empty());
        assert!(Payload::from_body(json!("nope")).is_empty());
    }

    #[test]
    fn flatten_hoists_top_level_id() {
        let flat = flatten_item(json!({
            "id": 7,
            "attributes": { "id": 99, "title": "Hello" }
        }));
        assert_eq!(flat, json!({ "id": 7, "title": "Hello" }));
    }

    #[test]
    fn flat_and_wrapped_items_decode_identically() {
        let flat: RawCategory =
            parse_item(json!({ "id": 3, "title": "rust", "order": 2 })).expect("flat");
        let wrapped: RawCategory =
            parse_item(json!({ "id": 3, "attributes": { "title": "rust", "order": 2 } }))
                .expect("wrapped");
        assert_eq!(flat, wrapped);
    }

    #[test]
    fn relations_unwrap_nested_envelopes() {
        let author: Option<RawAuthor> = relation_one(Some(json!({
            "data": { "id": 4, "attributes": { "name": "Ada" } }
        })));
        assert_eq!(author.and_then(|a| a.name).as_deref(), Some("Ada"));

        let categories: Vec<RawCategory> = relation_many(Some(json!({
            "data": [
                { "id": 1, "attributes": { "title": "a" } },
                "garbage",
                { "id": 2, "title": "b" }
            ]
        })));
        assert_eq!(categories.len(), 2);
    }

    #[test]
    fn lenient_ids_tolerate_strings() {
        let media: RawMedia = parse_item(json!({ "id": "12", "url": "/a.png" })).expect("media");
        assert_eq!(media.id, Some(12));
        let media: RawMedia = parse_item(json!({ "id": {}, "url": "/a.png" })).expect("media");
        assert_eq!(media.id, None);
    }

    #[test]
    fn error_message_prefers_nested_error() {
        let body = json!({ "error": { "status": 404, "message": "Not Found" } });
        assert_eq!(error_message(&body).as_deref(), Some("Not Found"));
        assert_eq!(
            error_message(&json!({ "message": "boom" })).as_deref(),
            Some("boom")
        );
        assert_eq!(error_message(&json!({ "message": "  " })), None);
    }
}
