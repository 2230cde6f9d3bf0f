use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("no stored credentials found; expected source: {source}")]
    CredentialsMissing { source: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("identity provider rejected token refresh ({status}): {detail}")]
    UpstreamAuth { status: u16, detail: String },

    #[error("network error during token refresh: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}
