//! Explicit authentication context.
//!
//! The bearer token lives in a `Session` handed to whoever needs it instead
//! of process-wide storage. Cloning a session shares the same token.

use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token.filter(|t| !t.trim().is_empty()))),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Store a refreshed token
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    /// Forget the token after the backend refused to refresh it
    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_token() {
        let session = Session::new(Some("abc".to_string()));
        let shared = session.clone();

        shared.set_token("def");
        assert_eq!(session.token().as_deref(), Some("def"));

        session.clear();
        assert!(!shared.is_authenticated());
    }

    #[test]
    fn test_blank_token_is_anonymous() {
        assert!(!Session::new(Some("  ".to_string())).is_authenticated());
        assert!(!Session::anonymous().is_authenticated());
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::new(Some("very-secret".to_string()));
        assert!(!format!("{session:?}").contains("very-secret"));
    }
}
