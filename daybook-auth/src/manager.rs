use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::common::TokenPair;
use crate::error::AuthError;
use crate::settings::Settings;
use crate::store::CredentialStore;

/// Refresh when the stored token has less than this much lifetime left
const REFRESH_LOOKAHEAD: Duration = Duration::seconds(30);

/// Safety margin subtracted from the provider-declared lifetime
const EXPIRY_BUFFER_SECS: i64 = 60;

/// Lifetime assumed when the provider omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: i64 = 1800;

/// Timeout for the refresh round trip
const REFRESH_TIMEOUT_SECS: u64 = 30;

/// Upper bound on the response detail carried in upstream errors
const ERROR_DETAIL_MAX_LEN: usize = 500;

/// Owns the lifecycle of one access/refresh token pair.
///
/// `ensure_access_token` hands back the stored token while it is still
/// valid and otherwise refreshes against the identity provider, persisting
/// the new pair to the configured store before returning. The storage
/// backend is an explicit constructor parameter; behavior is identical for
/// both backends.
pub struct CredentialManager {
    settings: Settings,
    store: Box<dyn CredentialStore>,
    http: Client,

    // Serializes load-check-refresh-persist into one logical step per call
    refresh_lock: Mutex<()>,
}

#[derive(Debug, Deserialize)]
struct RefreshGrantResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

impl CredentialManager {
    pub fn new(settings: Settings, store: Box<dyn CredentialStore>) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(REFRESH_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            settings,
            store,
            http,
            refresh_lock: Mutex::new(()),
        })
    }

    /// Get a currently valid access token, refreshing and persisting first
    /// if the stored one is expired or about to expire.
    pub async fn ensure_access_token(&self) -> Result<String, AuthError> {
        let _guard = self.refresh_lock.lock().await;

        let pair = match self.store.load()? {
            Some(pair) => pair,
            None => match &self.settings.baseline_refresh_token {
                Some(seed) => TokenPair::seed(seed.clone()),
                None => {
                    return Err(AuthError::CredentialsMissing {
                        source: self.store.source(),
                    });
                }
            },
        };

        if pair.is_valid_for(REFRESH_LOOKAHEAD) {
            return Ok(pair.access_token);
        }

        let refreshed = self.refresh(&pair.refresh_token).await?;
        self.store.save(&refreshed)?;

        Ok(refreshed.access_token)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let client_id = self.settings.client_id.as_deref().ok_or_else(|| {
            AuthError::Configuration("client_id is not configured (DAYBOOK_CLIENT_ID)".to_string())
        })?;
        let client_secret = self.settings.client_secret.as_deref().ok_or_else(|| {
            AuthError::Configuration(
                "client_secret is not configured (DAYBOOK_CLIENT_SECRET)".to_string(),
            )
        })?;

        tracing::debug!("Refreshing access token");

        let form_body = format!(
            "grant_type=refresh_token&refresh_token={}",
            urlencoded(refresh_token)
        );

        let response = self
            .http
            .post(&self.settings.token_url)
            .basic_auth(client_id, Some(client_secret))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(form_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("Token refresh rejected: {} - {}", status, body);
            return Err(AuthError::UpstreamAuth {
                status: status.as_u16(),
                detail: truncate_detail(&body),
            });
        }

        // A success body the grant structure cannot be read from is an
        // upstream failure, not a local serialization one
        let grant: RefreshGrantResponse =
            serde_json::from_str(&body).map_err(|_| AuthError::UpstreamAuth {
                status: status.as_u16(),
                detail: truncate_detail(&body),
            })?;

        if grant.access_token.is_empty() {
            return Err(AuthError::UpstreamAuth {
                status: status.as_u16(),
                detail: "response does not contain an access_token".to_string(),
            });
        }

        let now = Utc::now();
        let expires_in = grant.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let expires_at =
            DateTime::from_timestamp(now.timestamp() + expires_in - EXPIRY_BUFFER_SECS, 0)
                .expect("expiry timestamp in range");

        // The provider may not issue a new refresh token; keep the old one
        let refresh_token = grant
            .refresh_token
            .filter(|token| !token.is_empty())
            .unwrap_or_else(|| refresh_token.to_string());

        tracing::info!("Token refreshed, expires at {}", expires_at.to_rfc3339());

        Ok(TokenPair {
            access_token: grant.access_token,
            refresh_token,
            expires_at,
        })
    }
}

fn truncate_detail(body: &str) -> String {
    body.chars().take(ERROR_DETAIL_MAX_LEN).collect()
}

/// Minimal URL-encode for form values (percent-encode non-unreserved chars)
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{b:02X}"));
            }
        }
    }
    out
}
