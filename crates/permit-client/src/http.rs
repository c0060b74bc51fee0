//! HttpActionClient
//!
//! POSTs `{action, payload}` to a single endpoint and classifies the answer
//! into success or one of the [`ActionError`] kinds.

use std::sync::Arc;

use async_trait::async_trait;
use permit_types::{ActionRequest, STATUS_ERROR};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::busy::{BusyGuard, BusyIndicator, NoBusyIndicator};
use crate::error::{excerpt, ActionError};
use crate::{ActionClient, Result};

/// Action client talking to the proxy's `/api` endpoint.
///
/// No retries and no timeout: a call resolves when the server answers.
pub struct HttpActionClient {
    http: Client,
    endpoint: Url,
    busy: Arc<dyn BusyIndicator>,
}

impl HttpActionClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            busy: Arc::new(NoBusyIndicator),
        }
    }

    pub fn with_busy_indicator(mut self, busy: Arc<dyn BusyIndicator>) -> Self {
        self.busy = busy;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ActionClient for HttpActionClient {
    async fn call(&self, request: &ActionRequest) -> Result<serde_json::Value> {
        let kind = request.kind();
        let _busy = BusyGuard::acquire(self.busy.as_ref(), kind.busy_label());

        debug!("Dispatching action {}", kind);

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("Request for {} failed before a response: {}", kind, e);
                ActionError::Transport {
                    status: None,
                    message: format!("Could not reach the server: {e}"),
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ActionError::Transport {
            status: Some(status.as_u16()),
            message: format!("Failed to read the server response: {e}"),
        })?;

        interpret_response(status.as_u16(), status.canonical_reason(), &body).map_err(|e| {
            warn!("Action {} failed: {}", kind, e);
            e
        })
    }
}

/// Classify a raw HTTP answer.
///
/// - non-2xx: [`ActionError::Transport`], message from the body's `message`
///   field when it parses, else the status line
/// - 2xx, not JSON: [`ActionError::MalformedResponse`] with a body excerpt
/// - 2xx, `status == "error"`: [`ActionError::Application`]
pub fn interpret_response(
    status: u16,
    reason: Option<&str>,
    body: &str,
) -> Result<serde_json::Value> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| message_of(&v))
            .unwrap_or_else(|| {
                format!("API Error: {} {}", status, reason.unwrap_or(""))
                    .trim_end()
                    .to_string()
            });
        return Err(ActionError::Transport {
            status: Some(status),
            message,
        });
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| ActionError::MalformedResponse {
            excerpt: excerpt(body),
        })?;

    if value.get("status").and_then(|s| s.as_str()) == Some(STATUS_ERROR) {
        return Err(ActionError::Application {
            message: message_of(&value).unwrap_or_else(|| "Server reported an error.".to_string()),
        });
    }

    Ok(value)
}

fn message_of(value: &serde_json::Value) -> Option<String> {
    value
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
