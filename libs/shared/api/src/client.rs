use std::sync::Arc;
use std::time::Duration;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::ClientConfig;
use shared_models::error::ClientError;

/// Where the client reads the bearer credential from.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;

    /// The backend rejected `token`, the credential attached to a call.
    fn token_rejected(&self, _token: &str) {}
}

/// Token source for callers that never authenticate.
pub struct NoToken;

impl TokenSource for NoToken {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    /// Regular call; a 401 means the session token is no longer valid.
    Session,
    /// Login/registration; a 401 means the submitted credentials were wrong.
    Credentials,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenSource>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Session token is not a valid header value, sending without it"),
            }
        }

        headers
    }

    /// Call on behalf of the current session.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        self.send(method, path, query, body, CallKind::Session).await
    }

    /// Call that submits credentials (login, registration).
    pub async fn credential_request<T>(
        &self,
        method: Method,
        path: &str,
        body: Value,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        self.send(method, path, &[], Some(body), CallKind::Credentials).await
    }

    async fn send<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
        kind: CallKind,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let token = self.tokens.bearer_token();
        let headers = self.get_headers(token.as_deref());

        let mut req = self.client.request(method, &url).headers(headers);

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("Transport failure calling {}: {}", url, e);
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = extract_message(&text, status);
            error!("API error ({}): {}", status, message);

            if status == StatusCode::UNAUTHORIZED && kind == CallKind::Session {
                if let Some(token) = token.as_deref() {
                    warn!("Backend rejected the session token");
                    self.tokens.token_rejected(token);
                }
            }

            return Err(ClientError::from_status(status.as_u16(), message));
        }

        serde_json::from_str::<T>(&text).map_err(|e| {
            error!("Failed to decode response from {}: {}", url, e);
            ClientError::Decode(e.to_string())
        })
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pulls the human-readable message out of an error body.
fn extract_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let candidate = value
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| value.get("error").and_then(Value::as_str))
            .or_else(|| value.pointer("/error/message").and_then(Value::as_str));
        if let Some(message) = candidate {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_string()
    } else {
        trimmed.to_string()
    }
}
