//! `POST /api`
//!
//! Forwards the `{action, payload}` body verbatim to the upstream and relays
//! its JSON answer. The proxy never retries and never rewrites a successful
//! answer.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::ProxyError;
use crate::state::ProxyState;

/// Characters of a non-JSON upstream body echoed back to the caller.
const INVALID_BODY_EXCERPT: usize = 100;

pub async fn forward(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let upstream = state.config.upstream_url().map_err(|e| {
        error!("Upstream URL unusable: {}", e);
        ProxyError::from(e)
    })?;

    let action = action_of(&body).ok_or_else(|| {
        warn!("Rejected /api request without an action");
        ProxyError::MissingAction
    })?;
    info!("Forwarding action \"{}\"", action);

    let response = state
        .http
        .post(upstream)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|e| {
            error!("Upstream unreachable for {}: {}", action, e);
            ProxyError::Unreachable(e.to_string())
        })?;

    // reqwest and axum can sit on different `http` major versions
    let upstream_status = response.status();
    let status =
        StatusCode::from_u16(upstream_status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let reason = upstream_status
        .canonical_reason()
        .unwrap_or_default()
        .to_string();

    let text = response.text().await.map_err(|e| {
        error!("Failed reading upstream body for {}: {}", action, e);
        ProxyError::Unreachable(e.to_string())
    })?;

    if !status.is_success() {
        error!("Upstream answered {} for {}: {}", status, action, text);
        return Err(ProxyError::Upstream {
            status,
            reason,
            details: text,
        });
    }

    let data: Value = serde_json::from_str(&text).map_err(|e| {
        error!("Upstream answer for {} is not JSON ({}): {}", action, e, text);
        ProxyError::InvalidResponse {
            excerpt: text.chars().take(INVALID_BODY_EXCERPT).collect(),
        }
    })?;

    info!(
        "Received response for {}. Status: {}",
        action,
        data.get("status").and_then(serde_json::Value::as_str).unwrap_or("-")
    );
    Ok(Json(data))
}

/// Non-empty string `action` of a JSON body.
fn action_of(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("action")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_of() {
        assert_eq!(
            action_of(br#"{"action":"checkLogin","payload":{}}"#).as_deref(),
            Some("checkLogin")
        );
        assert_eq!(action_of(br#"{"payload":{}}"#), None);
        assert_eq!(action_of(br#"{"action":""}"#), None);
        assert_eq!(action_of(br#"{"action":7}"#), None);
        assert_eq!(action_of(b"action=checkLogin"), None);
        assert_eq!(action_of(b""), None);
    }
}
