mod file_store;
mod session_store;

pub use file_store::FileStore;
pub use session_store::SessionStore;

use crate::common::TokenPair;
use crate::error::AuthError;

/// Storage backend for the current token pair.
///
/// Exactly one pair is current per backend; `save` replaces it wholesale.
/// The backend is chosen once at manager construction, never detected from
/// the ambient environment.
pub trait CredentialStore: Send + Sync {
    /// Load the current pair, or `None` if the backend holds nothing yet.
    fn load(&self) -> Result<Option<TokenPair>, AuthError>;

    /// Replace the current pair.
    fn save(&self, pair: &TokenPair) -> Result<(), AuthError>;

    /// Where credentials are expected to come from, for error messages.
    fn source(&self) -> String;
}
