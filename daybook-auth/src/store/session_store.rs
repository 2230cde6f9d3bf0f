use dashmap::DashMap;
use std::sync::Arc;

use crate::common::TokenPair;
use crate::error::AuthError;
use crate::store::CredentialStore;

/// Ephemeral-session backend for execution environments with no durable
/// local filesystem.
///
/// The pair lives in memory under a key scoped to the calling session and
/// dies with the process; the first refresh is seeded from the configured
/// baseline refresh token.
pub struct SessionStore {
    sessions: Arc<DashMap<String, TokenPair>>,
    session_key: String,
}

impl SessionStore {
    pub fn new(session_key: impl Into<String>) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            session_key: session_key.into(),
        }
    }

    /// Build a store over a shared map, so several sessions can coexist
    /// in one process without seeing each other's tokens.
    pub fn with_shared_map(
        sessions: Arc<DashMap<String, TokenPair>>,
        session_key: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            session_key: session_key.into(),
        }
    }

    /// Number of sessions holding a token pair (for monitoring)
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl CredentialStore for SessionStore {
    fn load(&self) -> Result<Option<TokenPair>, AuthError> {
        Ok(self.sessions.get(&self.session_key).map(|pair| pair.clone()))
    }

    fn save(&self, pair: &TokenPair) -> Result<(), AuthError> {
        self.sessions.insert(self.session_key.clone(), pair.clone());
        Ok(())
    }

    fn source(&self) -> String {
        format!(
            "session '{}' (seed a first refresh via the baseline_refresh_token configuration key)",
            self.session_key
        )
    }
}
