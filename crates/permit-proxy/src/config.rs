//! Proxy configuration
//!
//! Read once from the environment (after `.env` is loaded). The upstream URL
//! is kept raw and validated on every request, so a bad value degrades each
//! call to an error response instead of stopping the server.

use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;
use url::Url;

pub const UPSTREAM_URL_VAR: &str = "PERMIT_UPSTREAM_URL";
pub const PORT_VAR: &str = "PORT";
pub const STATIC_DIR_VAR: &str = "STATIC_DIR";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PERMIT_UPSTREAM_URL is not set")]
    MissingUpstream,

    #[error("PERMIT_UPSTREAM_URL is not a valid http(s) URL: {0}")]
    InvalidUpstream(String),
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub upstream: Option<String>,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstream: None,
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get(PORT_VAR) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("{}={:?} is not a port; using {}", PORT_VAR, raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            upstream: get(UPSTREAM_URL_VAR),
            port,
            static_dir: get(STATIC_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        }
    }

    pub fn with_upstream(mut self, upstream: impl Into<String>) -> Self {
        self.upstream = Some(upstream.into());
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// The upstream endpoint, if it is an absolute http(s) URL.
    pub fn upstream_url(&self) -> Result<Url, ConfigError> {
        let raw = self.upstream.as_deref().ok_or(ConfigError::MissingUpstream)?;
        let url =
            Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUpstream(e.to_string()))?;
        match url.scheme() {
            "http" | "https" if url.has_host() => Ok(url),
            scheme => Err(ConfigError::InvalidUpstream(format!(
                "unsupported scheme \"{scheme}\""
            ))),
        }
    }
}
