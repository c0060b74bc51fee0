//! Permit Desk proxy
//!
//! Serves the static front end and relays `POST /api` to the Apps Script
//! backend, turning every failure into the `{status: "error", message}`
//! envelope.
//!
//! Reads config from env vars (`.env` honoured):
//!   PERMIT_UPSTREAM_URL - backend endpoint (checked on every request)
//!   PORT                - listen port (default: 3000)
//!   STATIC_DIR          - front-end files (default: public)

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ProxyConfig};
pub use error::ProxyError;
pub use router::build_router;
pub use state::ProxyState;
