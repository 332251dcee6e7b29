//! Resilient API client.
//!
//! Performs one logical backend call with bounded total latency:
//! per-attempt deadline at the transport, classification of every
//! failure into the error taxonomy, and bounded exponential-backoff
//! retry for the retryable kinds. Callers receive either an
//! [`ApiResponse`] to parse or a single [`ApiError`]; raw transport
//! errors never escape.
//!
//! Retried requests are re-sent verbatim with no idempotency
//! deduplication, so a retried POST may execute more than once
//! server-side.

use crate::config::{ClientConfig, ConfigError};
use crate::error::{ApiError, ErrorKind};
use crate::retry::RetryPolicy;
use crate::token::Credential;
use crate::transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Successful response: status plus unparsed body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    body: Vec<u8>,
}

impl ApiResponse {
    /// HTTP status (always 2xx).
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether this is a bodyless 204 success.
    pub fn is_no_content(&self) -> bool {
        self.status == 204
    }

    /// Parse the body as JSON, classifying a malformed body as an
    /// unknown-kind failure.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ApiError::new(ErrorKind::Unknown)
                .with_detail("malformed response body")
                .with_source(e)
        })
    }
}

/// Client for the restaurant backend.
///
/// Cheap to clone; the transport pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client from configuration, using the production
    /// transport.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::with_timeout(config.timeout())
            .map_err(|e| ConfigError::Transport(e.to_string()))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a client over an explicit transport (tests, custom stacks).
    pub fn with_transport(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config.base_url.clone(),
            transport,
            retry: config.retry.to_policy()?,
            timeout: config.timeout(),
        })
    }

    /// The configured backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Perform a request under the client's default retry policy.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: Option<&Credential>,
        body: Option<&B>,
    ) -> Result<ApiResponse, ApiError> {
        let retry = self.retry.clone();
        self.request_with_policy(&retry, method, path, token, body).await
    }

    /// Perform a request under an explicit retry policy.
    pub async fn request_with_policy<B: Serialize + ?Sized>(
        &self,
        policy: &RetryPolicy,
        method: Method,
        path: &str,
        token: Option<&Credential>,
        body: Option<&B>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.join(path)?;
        let body = match body {
            Some(value) => Some(serde_json::to_vec(value).map_err(|e| {
                ApiError::new(ErrorKind::Unknown)
                    .with_detail("failed to serialize request body")
                    .with_source(e)
            })?),
            None => None,
        };
        let bearer = token.map(Credential::bearer);

        let response = policy
            .execute(|| {
                let mut request = HttpRequest::new(method, url.clone())
                    .with_header("Content-Type", "application/json")
                    .with_timeout(self.timeout);
                if let Some(bearer) = &bearer {
                    request = request.with_header("Authorization", bearer.clone());
                }
                if let Some(body) = &body {
                    request = request.with_body(body.clone());
                }
                let transport = Arc::clone(&self.transport);
                async move {
                    let response = transport.send(request).await?;
                    if response.is_success() {
                        Ok(response)
                    } else {
                        Err(classify_response(&response))
                    }
                }
            })
            .await;

        match response {
            Ok(response) => {
                debug!(method = method.as_str(), %url, status = response.status, "request succeeded");
                Ok(ApiResponse { status: response.status, body: response.body })
            }
            Err(e) => {
                warn!(method = method.as_str(), %url, kind = %e.kind(), status = ?e.status(), "request failed");
                Err(e)
            }
        }
    }

    /// GET without a body.
    pub async fn get(
        &self,
        path: &str,
        token: Option<&Credential>,
    ) -> Result<ApiResponse, ApiError> {
        self.request::<serde_json::Value>(Method::Get, path, token, None).await
    }

    /// POST a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&Credential>,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        self.request(Method::Post, path, token, Some(body)).await
    }

    /// PUT a JSON body.
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&Credential>,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        self.request(Method::Put, path, token, Some(body)).await
    }

    /// DELETE without a body.
    pub async fn delete(
        &self,
        path: &str,
        token: Option<&Credential>,
    ) -> Result<ApiResponse, ApiError> {
        self.request::<serde_json::Value>(Method::Delete, path, token, None).await
    }

    fn join(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| {
            ApiError::new(ErrorKind::Unknown)
                .with_detail(format!("invalid request path: {}", path))
                .with_source(e)
        })
    }
}

/// Classify a non-2xx response, keeping any server-provided detail.
fn classify_response(response: &HttpResponse) -> ApiError {
    ApiError::from_status(response.status, extract_detail(&response.body))
}

/// Pull a human-oriented message out of a JSON error body, trying the
/// field names the backend is known to use.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    for key in ["message", "error", "detail"] {
        if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
            return Some(text.to_string());
        }
    }
    None
}
