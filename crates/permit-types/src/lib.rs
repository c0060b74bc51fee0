//! Shared Wire Types for Permit Desk
//!
//! This crate is the single source of truth for everything that crosses the
//! `/api` boundary.
//!
//! ```text
//! ┌──────────────┐  {action, payload}  ┌──────────────┐  verbatim  ┌──────────────┐
//! │  permit-ui   │ ──────────────────► │ permit-proxy │ ─────────► │   backend    │
//! │ (client)     │ ◄────────────────── │  (axum)      │ ◄───────── │ (Apps Script)│
//! └──────────────┘   {status, ...}     └──────────────┘            └──────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Requests are one tagged enum: `#[serde(tag = "action", content = "payload")]`
//! 2. Responses accept whatever the backend sends (`#[serde(default)]` everywhere)
//! 3. Identifiers and dates travel as strings, numbers are coerced

pub mod action;
pub mod records;

pub use action::*;
pub use records::*;

/// Value of the `status` field on a successful response.
pub const STATUS_SUCCESS: &str = "success";

/// Value of the `status` field on a failed response.
pub const STATUS_ERROR: &str = "error";

/// Project filter sentinel meaning "every project this user can see".
pub const ALL_ACCESSIBLE: &str = "ALL_ACCESSIBLE";

/// Uniform error envelope returned by the proxy and by the backend.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
