use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_TOKEN_URL: &str = "https://identity.xero.com/connect/token";

/// Immutable configuration for the credential manager and its callers.
///
/// Resolution order, later sources winning: struct defaults, then an
/// optional `daybook.toml` file (path overridable via `DAYBOOK_CONFIG`),
/// then `DAYBOOK_`-prefixed environment variables (`DAYBOOK_CLIENT_ID`,
/// `DAYBOOK_CLIENT_SECRET`, `DAYBOOK_TENANT_ID`, `DAYBOOK_TOKENS_PATH`,
/// `DAYBOOK_BASELINE_REFRESH_TOKEN`, `DAYBOOK_TOKEN_URL`). There are no
/// alternate key names; a value that resolves nowhere stays `None`.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Organisation identifier sent with resource API calls
    pub tenant_id: Option<String>,

    /// Durable-storage variant: where the token file lives
    #[serde(default = "default_tokens_path")]
    pub tokens_path: PathBuf,

    /// Ephemeral-session variant: refresh token for the first refresh
    pub baseline_refresh_token: Option<String>,
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_tokens_path() -> PathBuf {
    PathBuf::from("xero_tokens.json")
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("DAYBOOK_CONFIG").unwrap_or_else(|_| "daybook.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(Environment::with_prefix("DAYBOOK").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.token_url.is_empty() {
            return Err("token_url is required".to_string());
        }
        if !self.token_url.starts_with("http") {
            return Err("token_url must be a valid HTTP(S) URL".to_string());
        }
        Ok(())
    }
}
