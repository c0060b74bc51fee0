//! Proxy errors
//!
//! Every failure becomes the `{status: "error", message}` envelope with the
//! matching HTTP status. The Display text is the envelope message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use permit_types::ErrorEnvelope;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Proxy error: Upstream URL is not configured on the server.")]
    UpstreamNotConfigured(#[from] ConfigError),

    #[error("Proxy error: Request body or action is missing.")]
    MissingAction,

    /// Upstream answered with a non-2xx status
    #[error("GS Error: {reason}")]
    Upstream {
        status: StatusCode,
        reason: String,
        details: String,
    },

    /// Upstream answered 2xx with a body that is not JSON
    #[error("Proxy error: Invalid Response: {excerpt}...")]
    InvalidResponse { excerpt: String },

    #[error("Proxy error: {0}")]
    Unreachable(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamNotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::MissingAction => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::InvalidResponse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Unreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut envelope = ErrorEnvelope::new(self.to_string());
        if let ProxyError::Upstream { details, .. } = self {
            envelope = envelope.with_details(details);
        }
        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses() {
        assert_eq!(
            ProxyError::from(ConfigError::MissingUpstream).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ProxyError::MissingAction.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ProxyError::Unreachable("connection refused".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_upstream_message_uses_reason() {
        let err = ProxyError::Upstream {
            status: StatusCode::NOT_FOUND,
            reason: "Not Found".into(),
            details: "<html>".into(),
        };
        assert_eq!(err.to_string(), "GS Error: Not Found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
