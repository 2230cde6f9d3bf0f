use chrono::{serde::ts_seconds, DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The current access/refresh token pair for one external API.
///
/// `expires_at` is persisted as integer epoch seconds and already carries
/// the refresh-time safety buffer; it is never the raw provider lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(with = "ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl TokenPair {
    /// Seed pair built from a baseline refresh token supplied out-of-band.
    /// The epoch expiry forces the first use through the refresh path.
    pub fn seed(refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: String::new(),
            refresh_token: refresh_token.into(),
            expires_at: DateTime::UNIX_EPOCH,
        }
    }

    /// Whether the access token is still usable `lookahead` from now.
    pub fn is_valid_for(&self, lookahead: Duration) -> bool {
        self.expires_at > Utc::now() + lookahead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_pair_is_never_valid() {
        let pair = TokenPair::seed("baseline-token");
        assert!(!pair.is_valid_for(Duration::seconds(30)));
        assert!(pair.access_token.is_empty());
        assert_eq!(pair.refresh_token, "baseline-token");
    }

    #[test]
    fn validity_respects_lookahead() {
        let pair = TokenPair {
            access_token: "A1".to_string(),
            refresh_token: "R1".to_string(),
            expires_at: Utc::now() + Duration::seconds(60),
        };

        // 60 seconds of life left: fine with a 30s lookahead, not with 120s
        assert!(pair.is_valid_for(Duration::seconds(30)));
        assert!(!pair.is_valid_for(Duration::seconds(120)));
    }

    #[test]
    fn expires_at_serializes_as_epoch_seconds() {
        let pair = TokenPair {
            access_token: "A1".to_string(),
            refresh_token: "R1".to_string(),
            expires_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["expires_at"], 1_700_000_000_i64);
    }
}
