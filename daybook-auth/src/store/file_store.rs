use std::fs;
use std::path::{Path, PathBuf};

use crate::common::TokenPair;
use crate::error::AuthError;
use crate::store::CredentialStore;

/// Durable-storage backend: the token pair lives in a local JSON file.
pub struct FileStore {
    tokens_path: PathBuf,
}

impl FileStore {
    pub fn new(tokens_path: impl Into<PathBuf>) -> Self {
        Self {
            tokens_path: tokens_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.tokens_path
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Option<TokenPair>, AuthError> {
        if !self.tokens_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.tokens_path)?;
        let pair: TokenPair = serde_json::from_str(&json)?;
        Ok(Some(pair))
    }

    fn save(&self, pair: &TokenPair) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(pair)?;

        // Write to a sibling temp file, then rename over the target: a
        // crash or concurrent reader sees either the old complete file or
        // the new one, never a torn write.
        let tmp_path = self.tokens_path.with_extension("tmp");
        fs::write(&tmp_path, json)?;

        // Set permissions to 0600 (read/write for owner only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&tmp_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp_path, perms)?;
        }

        fs::rename(&tmp_path, &self.tokens_path)?;
        Ok(())
    }

    fn source(&self) -> String {
        self.tokens_path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn pair(access: &str, refresh: &str, expires_at: i64) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            expires_at: DateTime::from_timestamp(expires_at, 0).unwrap(),
        }
    }

    fn temp_store(name: &str) -> FileStore {
        let path = std::env::temp_dir().join(format!(
            "daybook-auth-{}-{}.json",
            name,
            uuid::Uuid::new_v4()
        ));
        FileStore::new(path)
    }

    #[test]
    fn load_without_file_returns_none() {
        let store = temp_store("missing");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn round_trip_preserves_fields() {
        let store = temp_store("round-trip");
        let original = pair("A1", "R1", 1_700_000_000);

        store.save(&original).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded, original);
        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn save_replaces_previous_pair() {
        let store = temp_store("replace");
        store.save(&pair("A1", "R1", 1_700_000_000)).unwrap();
        store.save(&pair("A2", "R2", 1_700_001_740)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "A2");
        assert_eq!(loaded.refresh_token, "R2");
        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn interrupted_write_leaves_previous_file_intact() {
        let store = temp_store("interrupted");
        let original = pair("A1", "R1", 1_700_000_000);
        store.save(&original).unwrap();

        // Simulate a crash between the temp write and the rename: a stray
        // temp file with half a JSON object next to the real one.
        let tmp_path = store.path().with_extension("tmp");
        fs::write(&tmp_path, "{\"access_token\": \"A2").unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, original);

        fs::remove_file(&tmp_path).unwrap();
        fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn persisted_layout_has_exactly_three_keys() {
        let store = temp_store("layout");
        store.save(&pair("A1", "R1", 1_700_000_000)).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(object["access_token"], "A1");
        assert_eq!(object["refresh_token"], "R1");
        assert_eq!(object["expires_at"], 1_700_000_000_i64);
        fs::remove_file(store.path()).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let store = temp_store("perms");
        store.save(&pair("A1", "R1", 1_700_000_000)).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        fs::remove_file(store.path()).unwrap();
    }
}
