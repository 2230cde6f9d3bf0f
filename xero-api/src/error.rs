use reqwest::StatusCode;

#[derive(Debug)]
pub enum XeroApiError {
    /// The API rejected the request
    Xero(StatusCode, String),
    /// Transport-level failure
    Internal(reqwest::Error),
}

impl From<reqwest::Error> for XeroApiError {
    fn from(value: reqwest::Error) -> Self {
        XeroApiError::Internal(value)
    }
}

impl std::fmt::Display for XeroApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XeroApiError::Internal(e) => write!(f, "Internal error: {}", e),
            XeroApiError::Xero(status, detail) => write!(f, "({}) {}", status, detail),
        }
    }
}

impl std::error::Error for XeroApiError {}
