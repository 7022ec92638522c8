//! Authorization session persistence.
//!
//! Sessions survive the authorization redirect round-trip in a
//! string-keyed store with browser `sessionStorage` semantics: values are
//! stored serialized (by value, never by reference) and keyed either by
//! the generated `state` GUID or by the fixed token key.
//!
//! Two token layouts exist, chosen at construction time:
//!
//! - [`TokenKeyLayout::Flat`] - the completed token lives under a single
//!   `tokenResponse` key, independent of state.
//! - [`TokenKeyLayout::PerState`] - the completed token is stored inside
//!   the owning session's entry, so reading it requires the state value
//!   from the callback URL.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{SmartError, SmartResult};
use crate::types::{AuthorizationSession, TokenResponse};

/// Key for the flat token layout.
const TOKEN_RESPONSE_KEY: &str = "tokenResponse";

/// Storage for authorization sessions and completed token responses.
///
/// Implementations must store values by serialized copy; a session read
/// back must not alias the one written.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persists a session under its state key.
    async fn put_session(&self, session: &AuthorizationSession) -> SmartResult<()>;

    /// Loads the session stored under a state key.
    async fn get_session(&self, state: &str) -> SmartResult<Option<AuthorizationSession>>;

    /// Persists a completed token response for the given state.
    async fn put_token(&self, state: &str, token: &TokenResponse) -> SmartResult<()>;

    /// Loads the persisted token response.
    ///
    /// `state` is the callback's state value; the flat layout ignores it,
    /// the per-state layout requires it (and yields `None` without it).
    async fn get_token(&self, state: Option<&str>) -> SmartResult<Option<TokenResponse>>;

    /// Clears the persisted token (flat layout). Per-state entries are
    /// abandoned instead: a new launch generates a fresh state key.
    async fn clear_token(&self) -> SmartResult<()>;
}

/// Token persistence layout for [`MemorySessionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKeyLayout {
    /// One `tokenResponse` key shared by all sessions.
    Flat,
    /// Token stored inside the owning session's state entry.
    PerState,
}

/// In-memory session store with `sessionStorage` semantics.
///
/// Serves as the default store for non-browser hosts and as the test
/// double for the launch flow.
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
    layout: TokenKeyLayout,
}

impl MemorySessionStore {
    /// Creates a store with the given token layout.
    #[must_use]
    pub fn new(layout: TokenKeyLayout) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            layout,
        }
    }

    /// The configured token layout.
    #[must_use]
    pub fn layout(&self) -> TokenKeyLayout {
        self.layout
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(TokenKeyLayout::Flat)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put_session(&self, session: &AuthorizationSession) -> SmartResult<()> {
        let serialized = serde_json::to_string(session)?;
        self.entries
            .write()
            .await
            .insert(session.state.clone(), serialized);
        Ok(())
    }

    async fn get_session(&self, state: &str) -> SmartResult<Option<AuthorizationSession>> {
        let entries = self.entries.read().await;
        match entries.get(state) {
            Some(serialized) => Ok(Some(serde_json::from_str(serialized)?)),
            None => Ok(None),
        }
    }

    async fn put_token(&self, state: &str, token: &TokenResponse) -> SmartResult<()> {
        match self.layout {
            TokenKeyLayout::Flat => {
                let serialized = serde_json::to_string(token)?;
                self.entries
                    .write()
                    .await
                    .insert(TOKEN_RESPONSE_KEY.to_string(), serialized);
                Ok(())
            }
            TokenKeyLayout::PerState => {
                let mut session = self
                    .get_session(state)
                    .await?
                    .ok_or_else(|| SmartError::session_not_found(state))?;
                session.token_response = Some(token.clone());
                self.put_session(&session).await
            }
        }
    }

    async fn get_token(&self, state: Option<&str>) -> SmartResult<Option<TokenResponse>> {
        match self.layout {
            TokenKeyLayout::Flat => {
                let entries = self.entries.read().await;
                match entries.get(TOKEN_RESPONSE_KEY) {
                    Some(serialized) => Ok(Some(serde_json::from_str(serialized)?)),
                    None => Ok(None),
                }
            }
            TokenKeyLayout::PerState => match state {
                Some(state) => Ok(self
                    .get_session(state)
                    .await?
                    .and_then(|session| session.token_response)),
                None => Ok(None),
            },
        }
    }

    async fn clear_token(&self) -> SmartResult<()> {
        if self.layout == TokenKeyLayout::Flat {
            self.entries.write().await.remove(TOKEN_RESPONSE_KEY);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClientRegistration, Provider};

    fn session(state: &str) -> AuthorizationSession {
        AuthorizationSession {
            client: ClientRegistration::new("abc", "patient/*.read"),
            provider: Provider::open("http://x"),
            response_type: "code".to_string(),
            state: state.to_string(),
            fake_token_response: None,
            token_response: None,
        }
    }

    fn token(state: &str) -> TokenResponse {
        TokenResponse {
            access_token: Some("T".to_string()),
            state: Some(state.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let store = MemorySessionStore::default();
        store.put_session(&session("S1")).await.unwrap();
        let loaded = store.get_session("S1").await.unwrap().unwrap();
        assert_eq!(loaded.state, "S1");
        assert!(store.get_session("S2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flat_layout_token() {
        let store = MemorySessionStore::new(TokenKeyLayout::Flat);
        store.put_session(&session("S1")).await.unwrap();
        store.put_token("S1", &token("S1")).await.unwrap();

        // Flat layout finds the token with or without a state hint.
        assert!(store.get_token(None).await.unwrap().is_some());
        assert!(store.get_token(Some("S1")).await.unwrap().is_some());

        store.clear_token().await.unwrap();
        assert!(store.get_token(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_per_state_layout_token() {
        let store = MemorySessionStore::new(TokenKeyLayout::PerState);
        store.put_session(&session("S1")).await.unwrap();
        store.put_token("S1", &token("S1")).await.unwrap();

        assert!(store.get_token(None).await.unwrap().is_none());
        let loaded = store.get_token(Some("S1")).await.unwrap().unwrap();
        assert_eq!(loaded.access_token, Some("T".to_string()));
    }

    #[tokio::test]
    async fn test_per_state_token_without_session_fails() {
        let store = MemorySessionStore::new(TokenKeyLayout::PerState);
        let err = store.put_token("S9", &token("S9")).await.unwrap_err();
        assert!(matches!(err, SmartError::SessionNotFound { ref state } if state == "S9"));
    }

    #[tokio::test]
    async fn test_values_stored_by_copy() {
        let store = MemorySessionStore::default();
        let mut original = session("S1");
        store.put_session(&original).await.unwrap();
        original.response_type = "token".to_string();

        let loaded = store.get_session("S1").await.unwrap().unwrap();
        assert_eq!(loaded.response_type, "code");
    }
}
