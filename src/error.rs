// Error taxonomy shared by the request layer and the transport seam

use serde_json::{Map, Value};
use thiserror::Error;

// Status code carried by every validation failure
pub const VALIDATION_ERROR_CODE: u16 = 400;

// A single field-level violation: dotted field path and the reason it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

// Raised when caller-supplied request data breaks a contract check.
// Validation is fail-fast, so a field-scoped error carries exactly one violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub code: u16,
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    // Error without field context (whole-request rules such as mutual exclusion)
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: VALIDATION_ERROR_CODE,
            violations: Vec::new(),
        }
    }

    // Error scoped to one field; the message always names the field
    pub fn for_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let field = field.into();
        let reason = reason.into();
        Self {
            message: format!("Validation failed for '{}': {}", field, reason),
            code: VALIDATION_ERROR_CODE,
            violations: vec![FieldViolation { field, reason }],
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    // First offending field, if the error is field-scoped
    pub fn field(&self) -> Option<&str> {
        self.violations.first().map(|v| v.field.as_str())
    }

    // Re-root every violation under `prefix`, used when a nested structure
    // is validated on its own and then reported inside its parent
    pub fn nested_under(self, prefix: &str) -> Self {
        match self.violations.first() {
            Some(violation) => Self::for_field(
                format!("{}.{}", prefix, violation.field),
                violation.reason.clone(),
            )
            .with_code(self.code),
            None => self,
        }
    }
}

// Failure communicating with the upstream reservation system
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API error: {code} - {message}")]
    Api {
        message: String,
        code: u16,
        context: Option<Map<String, Value>>,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn api(code: u16, message: impl Into<String>) -> Self {
        ApiError::Api {
            message: message.into(),
            code,
            context: None,
            cause: None,
        }
    }

    pub fn with_context(self, extra: Map<String, Value>) -> Self {
        match self {
            ApiError::Api {
                message,
                code,
                context,
                cause,
            } => {
                let mut merged = context.unwrap_or_default();
                merged.extend(extra);
                ApiError::Api {
                    message,
                    code,
                    context: Some(merged),
                    cause,
                }
            }
            other => other,
        }
    }

    // HTTP-style status for every variant
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Api { code, .. } => *code,
            ApiError::Validation(e) => e.code,
            ApiError::Network(e) => e.status().map_or(502, |s| s.as_u16()),
            ApiError::Timeout(_) => 408,
            ApiError::Config(_) => 500,
            ApiError::Decode(_) => 502,
        }
    }

    pub fn context(&self) -> Option<&Map<String, Value>> {
        match self {
            ApiError::Api { context, .. } => context.as_ref(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_error_names_the_field() {
        let err = ValidationError::for_field("bundleCode", "must be at most 4 characters");
        assert_eq!(err.code, 400);
        assert_eq!(err.field(), Some("bundleCode"));
        assert!(err.to_string().contains("bundleCode"));
    }

    #[test]
    fn test_nested_under_prefixes_path() {
        let err = ValidationError::for_field("email", "invalid").nested_under("contact");
        assert_eq!(err.field(), Some("contact.email"));

        let plain = ValidationError::new("no criteria").nested_under("contact");
        assert_eq!(plain.field(), None);
        assert_eq!(plain.message, "no criteria");
    }

    #[test]
    fn test_api_error_codes() {
        let validation: ApiError = ValidationError::new("bad").into();
        assert_eq!(validation.code(), 400);
        assert!(validation.is_validation());
        assert_eq!(ApiError::Timeout(500).code(), 408);
        assert_eq!(ApiError::Config("x".to_string()).code(), 500);
        assert_eq!(ApiError::api(404, "not found").code(), 404);
    }

    #[test]
    fn test_api_error_context_merges() {
        let mut first = Map::new();
        first.insert("path".to_string(), json!("/api/nsk/v1/token"));
        let mut second = Map::new();
        second.insert("method".to_string(), json!("POST"));

        let err = ApiError::api(500, "boom")
            .with_context(first)
            .with_context(second);
        let context = err.context().unwrap();
        assert_eq!(context.len(), 2);
        assert_eq!(context["method"], json!("POST"));
    }
}
