pub mod endpoints;
mod error;
mod macros;

pub use crate::error::XeroApiError;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;

const BASE_URL: &str = "https://api.xero.com/api.xro/2.0";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// A GET request against the accounting API
pub trait Request {
    type Response: DeserializeOwned;

    fn endpoint(&self) -> Cow<'_, str>;

    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

pub struct Client {
    http: reqwest::Client,
    base_url: String,
    tenant_id: String,
}

impl Client {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self::with_base_url(BASE_URL, tenant_id)
    }

    /// Point the client at a different base URL (used by tests)
    pub fn with_base_url(base_url: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            tenant_id: tenant_id.into(),
        }
    }

    /// Send a request with a bearer token obtained by the caller.
    ///
    /// The token is a per-call argument rather than client state because
    /// the credential manager may rotate it between calls.
    pub async fn send<R>(&self, access_token: &str, request: &R) -> Result<R::Response, XeroApiError>
    where
        R: Request,
    {
        let url = format!("{}{}", self.base_url, request.endpoint());

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header("xero-tenant-id", &self.tenant_id)
            .header("Accept", "application/json")
            .query(&request.query())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(XeroApiError::Xero(status, detail));
        }

        response
            .json::<R::Response>()
            .await
            .map_err(XeroApiError::Internal)
    }
}
