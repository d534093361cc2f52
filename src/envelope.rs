//! Envelope Normalizer
//!
//! The proxy answers either `{ "success": bool, "data": T, ... }` or a bare
//! `T`, and which one depends on the endpoint. [`Envelope`] makes that a typed
//! union decided by a single check: a JSON object carrying a `data` field is
//! wrapped, anything else is the payload itself. Callers never branch on the
//! shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::FetchError;

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Wrapped {
        success: Option<bool>,
        message: Option<String>,
        data: Value,
        /// Remaining top-level fields (`error`, `detail`, `cache_info`, ...)
        extra: Map<String, Value>,
    },
    Bare(Value),
}

impl Envelope {
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(mut map) if map.contains_key("data") => {
                let data = map.remove("data").unwrap_or(Value::Null);
                let success = map.remove("success").and_then(|v| v.as_bool());
                let message = map
                    .remove("message")
                    .and_then(|v| v.as_str().map(str::to_string));
                Envelope::Wrapped {
                    success,
                    message,
                    data,
                    extra: map,
                }
            }
            other => Envelope::Bare(other),
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Envelope::Wrapped { .. })
    }

    /// Canonical payload, or `Rejected` when the body reports `success: false`.
    ///
    /// Bare bodies can carry the flag too (book search returns
    /// `{ success, total, books }` with no `data` field).
    pub fn into_payload(self) -> Result<Value, FetchError> {
        match self {
            Envelope::Wrapped {
                success: Some(false),
                message,
                extra,
                ..
            } => Err(FetchError::Rejected(
                failure_text(&extra)
                    .or(message)
                    .unwrap_or_else(|| "request rejected".to_string()),
            )),
            Envelope::Wrapped { data, .. } => Ok(data),
            Envelope::Bare(Value::Object(map))
                if map.get("success").and_then(Value::as_bool) == Some(false) =>
            {
                Err(FetchError::Rejected(
                    failure_text(&map)
                        .or_else(|| {
                            map.get("message")
                                .and_then(Value::as_str)
                                .map(str::to_string)
                        })
                        .unwrap_or_else(|| "request rejected".to_string()),
                ))
            }
            Envelope::Bare(value) => Ok(value),
        }
    }
}

impl From<Value> for Envelope {
    fn from(body: Value) -> Self {
        Envelope::from_body(body)
    }
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Envelope::from_body)
    }
}

fn failure_text(map: &Map<String, Value>) -> Option<String> {
    ["error", "detail"]
        .iter()
        .find_map(|field| map.get(*field).and_then(Value::as_str))
        .map(str::to_string)
}

/// Pure projection: the `data` field of a wrapped body, the body otherwise.
///
/// Does not look at `success`; see [`Envelope::into_payload`] for that.
pub fn normalize(body: Value) -> Value {
    match Envelope::from_body(body) {
        Envelope::Wrapped { data, .. } => data,
        Envelope::Bare(value) => value,
    }
}

/// A canonical payload a card can render.
///
/// `empty()` is what a card shows when the proxy answered but the body held
/// nothing usable, so renderers can always assume the shape.
pub trait Payload: DeserializeOwned + Clone + Send + Sync + 'static {
    fn empty() -> Self;

    /// Number of renderable items (1 for a present single record)
    fn item_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

/// Decode a normalized payload, falling back to `T::empty()` on `null` or a
/// shape mismatch.
pub fn decode_payload<T: Payload>(resource: &str, payload: Value) -> T {
    if payload.is_null() {
        return T::empty();
    }
    match serde_json::from_value(payload) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(resource, error = %e, "payload did not match expected shape, using empty result");
            T::empty()
        }
    }
}

/// Full pipeline from a raw body: probe the envelope, honour `success: false`,
/// decode into `T`.
pub fn unwrap_body<T: Payload>(resource: &str, body: Value) -> Result<T, FetchError> {
    let payload = Envelope::from_body(body).into_payload()?;
    Ok(decode_payload(resource, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
    struct Titles {
        #[serde(default)]
        books: Vec<Title>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
    struct Title {
        title: String,
    }

    impl Payload for Titles {
        fn empty() -> Self {
            Titles::default()
        }

        fn item_count(&self) -> usize {
            self.books.len()
        }
    }

    #[test]
    fn test_wrapped_and_bare_yield_same_payload() {
        let payload = json!({ "books": [{ "title": "1984" }] });
        let wrapped = json!({ "success": true, "data": payload.clone() });

        assert_eq!(normalize(wrapped), payload);
        assert_eq!(normalize(payload.clone()), payload);
    }

    #[test]
    fn test_probe_is_structural() {
        assert!(Envelope::from_body(json!({ "data": null })).is_wrapped());
        assert!(!Envelope::from_body(json!({ "books": [] })).is_wrapped());
        assert!(!Envelope::from_body(json!([1, 2, 3])).is_wrapped());
        assert!(!Envelope::from_body(json!("data")).is_wrapped());
    }

    #[test]
    fn test_envelope_deserializes_from_text() {
        let env: Envelope =
            serde_json::from_str(r#"{"success":true,"message":"ok","data":{"n":1}}"#).unwrap();
        match env {
            Envelope::Wrapped {
                success, message, data, ..
            } => {
                assert_eq!(success, Some(true));
                assert_eq!(message.as_deref(), Some("ok"));
                assert_eq!(data, json!({ "n": 1 }));
            }
            other => panic!("expected wrapped, got {:?}", other),
        }
    }

    #[test]
    fn test_success_false_is_rejected() {
        let err = Envelope::from_body(json!({
            "success": false,
            "message": "CEP inválido",
            "error": "CEP deve conter 8 dígitos",
            "data": { "cep": "123" }
        }))
        .into_payload()
        .unwrap_err();
        assert_eq!(err, FetchError::Rejected("CEP deve conter 8 dígitos".into()));

        let bare = Envelope::from_body(json!({ "success": false, "error": "boom" }))
            .into_payload()
            .unwrap_err();
        assert_eq!(bare, FetchError::Rejected("boom".into()));

        let silent = Envelope::from_body(json!({ "success": false, "data": null }))
            .into_payload()
            .unwrap_err();
        assert_eq!(silent, FetchError::Rejected("request rejected".into()));
    }

    #[test]
    fn test_bare_success_true_passes_through() {
        let body = json!({ "success": true, "total": 1, "books": [{ "title": "Dune" }] });
        let titles: Titles = unwrap_body("books", body).unwrap();
        assert_eq!(titles.books.len(), 1);
    }

    #[test]
    fn test_unusable_payload_is_empty_default() {
        let from_null: Titles = unwrap_body("books", json!({ "data": null })).unwrap();
        assert!(from_null.is_empty());

        let from_wrong_shape: Titles = unwrap_body("books", json!({ "data": [1, 2] })).unwrap();
        assert_eq!(from_wrong_shape, Titles::default());
    }

    #[test]
    fn test_empty_list_is_not_an_error() {
        let titles: Titles = unwrap_body("books", json!({ "data": { "books": [] } })).unwrap();
        assert!(titles.is_empty());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn leaf() -> impl Strategy<Value = Value> {
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(|n| json!(n)),
                "[a-z]{0,8}".prop_map(Value::String),
            ]
        }

        /// Payloads whose own top level has no `data` field
        fn payload() -> impl Strategy<Value = Value> {
            let nested = leaf().prop_recursive(3, 16, 4, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                    prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                        .prop_map(|m| Value::Object(m.into_iter().collect())),
                ]
            });
            nested.prop_map(|v| match v {
                Value::Object(mut map) => {
                    map.remove("data");
                    Value::Object(map)
                }
                other => other,
            })
        }

        proptest! {
            #[test]
            fn normalize_strips_exactly_one_envelope(x in payload()) {
                let wrapped = json!({ "success": true, "data": x.clone() });
                prop_assert_eq!(normalize(wrapped), x.clone());
                prop_assert_eq!(normalize(x.clone()), x.clone());
                prop_assert_eq!(normalize(normalize(x.clone())), x);
            }
        }
    }
}
