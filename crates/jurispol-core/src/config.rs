//! Relay configuration resolved from the process environment.

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_STATIC_DIR: &str = "dist";
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3001";

/// Top-level JurisPol configuration.
#[derive(Clone, Serialize)]
pub struct JurisPolConfig {
    /// HTTP server port.
    pub port: u16,
    /// Upstream provider key. Never serialized.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Model identifier sent with every generation call.
    pub model: String,
    /// Base URL of the generative-language REST API.
    pub provider_base_url: String,
    /// Directory holding the prebuilt frontend bundle.
    pub static_dir: PathBuf,
    /// Relay address used by the console client.
    pub relay_url: String,
}

impl JurisPolConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("invalid PORT '{}': {}", raw, e)))?,
            None => DEFAULT_PORT,
        };

        let api_key = get("API_KEY").or_else(|| {
            let key = get("GEMINI_API_KEY");
            if key.is_some() {
                warn!("API_KEY not set, using GEMINI_API_KEY");
            }
            key
        });

        Ok(Self {
            port,
            api_key,
            model: get("JURISPOL_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            provider_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_BASE_URL.into()),
            static_dir: get("JURISPOL_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            relay_url: get("JURISPOL_RELAY_URL").unwrap_or_else(|| DEFAULT_RELAY_URL.into()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Single-page entry point served for unmatched routes.
    pub fn index_file(&self) -> PathBuf {
        self.static_dir.join("index.html")
    }
}

impl std::fmt::Debug for JurisPolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JurisPolConfig")
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("provider_base_url", &self.provider_base_url)
            .field("static_dir", &self.static_dir)
            .field("relay_url", &self.relay_url)
            .finish()
    }
}
