// The request contract every concrete NSK request type implements

use crate::error::ValidationError;
use serde_json::{Map, Value};
use std::fmt;

// Serialized field-name -> value mapping sent upstream
pub type Payload = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Verb and path a request is sent to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }
}

/// A typed request to the NSK reservation API.
///
/// `to_payload` is total and never fails; it omits unset optional fields.
/// `validate` checks required fields, then formats, then cross-field rules,
/// then nested items, and returns the first violation it meets.
pub trait ApiRequest {
    // Short type name used in log events
    fn name(&self) -> &'static str;

    fn endpoint(&self) -> Endpoint;

    fn to_payload(&self) -> Payload;

    fn validate(&self) -> Result<(), ValidationError>;

    fn validated_payload(&self) -> Result<Payload, ValidationError> {
        if let Err(e) = self.validate() {
            tracing::debug!(
                request = self.name(),
                field = e.field().unwrap_or("-"),
                "request failed validation"
            );
            return Err(e);
        }
        Ok(self.to_payload())
    }
}

// Small insertion helpers so payload builders read as a list of fields
pub(crate) trait PayloadExt {
    fn put(&mut self, key: &str, value: impl Into<Value>);
    fn put_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>);
    fn put_if_true(&mut self, key: &str, flag: bool);
    fn put_non_empty<V: Clone + Into<Value>>(&mut self, key: &str, values: &[V]);
}

impl PayloadExt for Payload {
    fn put(&mut self, key: &str, value: impl Into<Value>) {
        self.insert(key.to_string(), value.into());
    }

    fn put_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.put(key, value);
        }
    }

    fn put_if_true(&mut self, key: &str, flag: bool) {
        if flag {
            self.put(key, true);
        }
    }

    fn put_non_empty<V: Clone + Into<Value>>(&mut self, key: &str, values: &[V]) {
        if !values.is_empty() {
            self.put(key, values.to_vec());
        }
    }
}

// Payload built from a list of nested values, used for arrays of objects
pub(crate) fn object_list<T, F>(items: &[T], to_object: F) -> Value
where
    F: Fn(&T) -> Payload,
{
    Value::Array(items.iter().map(|item| Value::Object(to_object(item))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Ping {
        target: String,
    }

    impl ApiRequest for Ping {
        fn name(&self) -> &'static str {
            "Ping"
        }

        fn endpoint(&self) -> Endpoint {
            Endpoint::get("/ping")
        }

        fn to_payload(&self) -> Payload {
            let mut payload = Payload::new();
            payload.put("target", self.target.as_str());
            payload
        }

        fn validate(&self) -> Result<(), ValidationError> {
            crate::structural::require_fields(&self.to_payload(), &["target"])
        }
    }

    #[test]
    fn test_validated_payload_short_circuits() {
        let ok = Ping {
            target: "JFK".to_string(),
        };
        assert_eq!(ok.validated_payload().unwrap()["target"], json!("JFK"));

        let bad = Ping {
            target: String::new(),
        };
        assert_eq!(bad.validated_payload().unwrap_err().field(), Some("target"));
    }

    #[test]
    fn test_payload_helpers() {
        let mut payload = Payload::new();
        payload.put_opt::<&str>("absent", None);
        payload.put_opt("present", Some(3));
        payload.put_if_true("flagOff", false);
        payload.put_if_true("flagOn", true);
        payload.put_non_empty::<String>("empty", &[]);
        payload.put_non_empty("list", &["a".to_string()]);

        assert_eq!(
            Value::Object(payload),
            json!({"present": 3, "flagOn": true, "list": ["a"]})
        );
    }

    #[test]
    fn test_endpoint_constructors() {
        let endpoint = Endpoint::patch("/api/nsk/v1/vouchers/ABC");
        assert_eq!(endpoint.method, HttpMethod::Patch);
        assert_eq!(endpoint.method.to_string(), "PATCH");
    }
}
