//! REST client for the shorts generation endpoints.
//!
//! Wraps the two service calls (job creation, job fetch) using
//! [`reqwest`]. Neither call retries; both are bounded by the configured
//! request timeout. The [`Transport`] trait is the seam the controller
//! depends on, so tests can drive it with a scripted implementation.

use async_trait::async_trait;
use shorts_core::{GenerationRequest, ShortJob};

use crate::config::ClientConfig;

/// Fallback shown when no more specific failure message is available.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong while generating the short.";

/// Errors from the shorts REST layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Service error ({status})")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `message` field of the response body, when the body was JSON.
        message: Option<String>,
    },
}

impl TransportError {
    /// Map this failure to the message shown to the user.
    ///
    /// Preference order: the service's own `message` field, then a
    /// status-code sentence, then the underlying error text, then a
    /// generic fallback. An elapsed request timeout maps to the literal
    /// `"timeout"` rather than reqwest's verbose error chain.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            TransportError::Api { status, .. } => {
                format!("Request failed with status {status}.")
            }
            TransportError::Request(e) if e.is_timeout() => "timeout".to_string(),
            TransportError::Request(e) => {
                let text = e.to_string();
                if text.is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    text
                }
            }
        }
    }
}

/// Operations the job controller needs from the HTTP layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Create a new generation job. Returns the initial job snapshot.
    async fn create_short(
        &self,
        request: &GenerationRequest,
    ) -> Result<ShortJob, TransportError>;

    /// Fetch the current snapshot of a job by ID.
    async fn fetch_short(&self, id: i64) -> Result<ShortJob, TransportError>;
}

/// HTTP client for a shorts service instance.
pub struct ShortsApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ShortsApi {
    /// Create an API client from resolved configuration.
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    ///
    /// The caller is responsible for configuring the request timeout on
    /// the supplied client.
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// Parse a response into the expected type, or extract a service
    /// error from a non-2xx body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from));
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl Transport for ShortsApi {
    async fn create_short(
        &self,
        request: &GenerationRequest,
    ) -> Result<ShortJob, TransportError> {
        let url = self.config.generate_url();
        tracing::debug!(%url, duration = request.duration, "Submitting generation request");

        let response = self.client.post(&url).json(request).send().await?;
        Self::parse_response(response).await
    }

    async fn fetch_short(&self, id: i64) -> Result<ShortJob, TransportError> {
        let url = self.config.short_url(id);
        tracing::trace!(%url, id, "Fetching job snapshot");

        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_service_message() {
        let err = TransportError::Api {
            status: 503,
            message: Some("Unable to reach YouTube.".to_string()),
        };
        assert_eq!(err.user_message(), "Unable to reach YouTube.");
    }

    #[test]
    fn user_message_falls_back_to_status_sentence() {
        let err = TransportError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), "Request failed with status 500.");
    }

    #[test]
    fn user_message_uses_request_error_text() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = TransportError::Request(req_err);
        assert!(!err.user_message().is_empty());
        assert_ne!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }
}
