//! Client configuration sourced from `TODOIST_*` environment variables.
//!
//! | variable | required | default |
//! |---|---|---|
//! | `TODOIST_API_TOKEN` | yes | - |
//! | `TODOIST_API_BASE_URL` | no | `https://api.todoist.com/api/v1` |
//! | `TODOIST_SYNC_URL` | no | `<base_url>/sync` |

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// Default REST base URL for the unified Todoist API.
pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/api/v1";

const ENV_PREFIX: &str = "TODOIST";

/// Resolved configuration for [`RestClient`](crate::RestClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_token: SecretString,
    pub base_url: String,
    pub sync_url: String,
}

/// Raw shape read from the environment before defaults are applied.
#[derive(Debug, Deserialize)]
struct RawClientConfig {
    api_token: Option<String>,
    api_base_url: Option<String>,
    sync_url: Option<String>,
}

impl ClientConfig {
    /// Build a config from an explicit token with default endpoints.
    pub fn new(api_token: impl Into<String>) -> Self {
        let base_url = DEFAULT_BASE_URL.to_string();
        Self {
            api_token: SecretString::from(api_token.into()),
            sync_url: format!("{base_url}/sync"),
            base_url,
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> ClientResult<Self> {
        Self::load(None)
    }

    /// Load configuration from an explicit variable map instead of the
    /// process environment. Keys use the same `TODOIST_*` names.
    pub fn from_vars(vars: config::Map<String, String>) -> ClientResult<Self> {
        Self::load(Some(vars))
    }

    fn load(source: Option<config::Map<String, String>>) -> ClientResult<Self> {
        let raw: RawClientConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(source))
            .build()?
            .try_deserialize()?;

        let api_token = raw
            .api_token
            .filter(|token| !token.trim().is_empty())
            .map(SecretString::from)
            .ok_or_else(|| {
                ClientError::config_error("TODOIST_API_TOKEN environment variable is required")
            })?;

        let base_url = raw
            .api_base_url
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let sync_url = raw
            .sync_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| format!("{base_url}/sync"));

        Ok(Self {
            api_token,
            base_url,
            sync_url,
        })
    }

    /// Override the REST base URL (and the derived sync URL).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        self.sync_url = format!("{base_url}/sync");
        self.base_url = base_url;
        self
    }
}
