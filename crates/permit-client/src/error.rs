use thiserror::Error;

/// Number of raw-body characters kept for malformed-response diagnostics.
pub const EXCERPT_LEN: usize = 100;

/// Every way an action can fail, tagged so callers can branch on the kind.
///
/// `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Non-2xx from the endpoint, or no response at all (`status: None`).
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// 2xx whose body is not the structured data we expected.
    #[error("Received invalid response from server (not JSON): {excerpt}...")]
    MalformedResponse { excerpt: String },

    /// The backend answered `status: "error"`.
    #[error("{message}")]
    Application { message: String },

    /// A required field was left empty; never leaves the client.
    #[error("{message}")]
    Validation { field: String, message: String },
}

impl ActionError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

/// First [`EXCERPT_LEN`] characters of a raw body.
pub fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let body = "خ".repeat(150);
        assert_eq!(excerpt(&body).chars().count(), EXCERPT_LEN);
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn test_application_message_is_verbatim() {
        let err = ActionError::Application {
            message: "Permit already closed".into(),
        };
        assert_eq!(err.to_string(), "Permit already closed");
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn test_malformed_message_carries_excerpt() {
        let err = ActionError::MalformedResponse {
            excerpt: "<html>".into(),
        };
        assert!(err.to_string().contains("<html>"));
    }
}
