// Dispatching validated requests to the NSK API

use crate::error::ApiError;
use crate::request::{ApiRequest, HttpMethod, Payload};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// Connection settings for the HTTP transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
    pub bearer_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: format!("nsk_requests/{}", env!("CARGO_PKG_VERSION")),
            bearer_token: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Reads `NSK_BASE_URL`, `NSK_TIMEOUT_MS`, `NSK_USER_AGENT` and
    /// `NSK_TOKEN`, keeping the default for any variable that is unset.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base_url) = lookup("NSK_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(timeout) = lookup("NSK_TIMEOUT_MS") {
            config.timeout_ms = timeout.trim().parse().map_err(|_| {
                ApiError::Config(format!("NSK_TIMEOUT_MS must be an integer, got '{}'", timeout))
            })?;
        }
        if let Some(user_agent) = lookup("NSK_USER_AGENT") {
            config.user_agent = user_agent;
        }
        config.bearer_token = lookup("NSK_TOKEN").filter(|token| !token.is_empty());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ApiError::Config(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ApiError::Config("user_agent must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// Anything that can carry a payload to the API and hand back the JSON reply
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: HttpMethod, path: &str, payload: Payload)
        -> Result<Value, ApiError>;
}

// Flatten a GET payload into query pairs. Lists repeat their key; nested
// objects cannot be expressed and are dropped.
pub fn query_pairs(payload: &Payload) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(payload.len());
    for (key, value) in payload {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            Value::Object(_) => {
                tracing::warn!(field = %key, "nested object cannot be sent as a query parameter");
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }
    pairs
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub struct HttpTransport {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request_builder(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &Payload,
    ) -> reqwest::RequestBuilder {
        let url = self.config.url_for(path);
        let builder = match method {
            HttpMethod::Get => self.http.get(url).query(&query_pairs(payload)),
            HttpMethod::Post => self.http.post(url).json(payload),
            HttpMethod::Put => self.http.put(url).json(payload),
            HttpMethod::Patch => self.http.patch(url).json(payload),
            HttpMethod::Delete => self.http.delete(url).json(payload),
        };
        match &self.config.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

// Error body fields worth keeping on an ApiError
fn error_context(body: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ if body.trim().is_empty() => None,
        _ => {
            let mut map = Map::new();
            map.insert("body".to_string(), Value::String(body.to_string()));
            Some(map)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Payload,
    ) -> Result<Value, ApiError> {
        let response = self
            .request_builder(method, path, &payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.config.timeout_ms)
                } else {
                    ApiError::Network(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%method, path, status = status.as_u16(), "upstream returned an error");
            let message = status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string();
            let mut err = ApiError::api(status.as_u16(), message);
            if let Some(context) = error_context(&body) {
                err = err.with_context(context);
            }
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Validates requests and hands their payloads to a [`Transport`].
///
/// A request that fails validation never reaches the transport; the caller
/// gets `ApiError::Validation` back instead.
pub struct NskClient<T: Transport> {
    transport: T,
}

impl NskClient<HttpTransport> {
    pub fn http(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> NskClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn dispatch<R>(&self, request: &R) -> Result<Value, ApiError>
    where
        R: ApiRequest + Sync,
    {
        let payload = request.validated_payload()?;
        let endpoint = request.endpoint();
        tracing::debug!(
            request = request.name(),
            method = %endpoint.method,
            path = %endpoint.path,
            "dispatching request"
        );
        match self
            .transport
            .send(endpoint.method, &endpoint.path, payload)
            .await
        {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(request = request.name(), code = e.code(), error = %e, "request failed");
                Err(e)
            }
        }
    }
}
