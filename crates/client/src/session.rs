//! Signed-in customer session.

use std::sync::Arc;

use crate::error::ClientResult;
use crate::models::LoginSession;
use crate::storage::KeyValueStore;

pub const USER_ID_KEY: &str = "user_id";
pub const USER_TOKEN_KEY: &str = "user_token";

/// Persists the customer id and bearer token across app restarts.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Store the id and token. A failed token write removes the id again so
    /// a half-written session is never left behind.
    pub async fn save(&self, session: &LoginSession) -> ClientResult<()> {
        self.store.set(USER_ID_KEY, &session.user_id).await?;
        if let Err(e) = self.store.set(USER_TOKEN_KEY, &session.token).await {
            if let Err(cleanup) = self.store.remove(USER_ID_KEY).await {
                tracing::warn!(error = %cleanup, "Failed to roll back session user id");
            }
            return Err(e);
        }
        tracing::debug!(user_id = %session.user_id, "Session saved");
        Ok(())
    }

    pub async fn user_id(&self) -> ClientResult<Option<String>> {
        self.store.get(USER_ID_KEY).await
    }

    pub async fn token(&self) -> ClientResult<Option<String>> {
        self.store.get(USER_TOKEN_KEY).await
    }

    pub async fn clear(&self) -> ClientResult<()> {
        self.store.remove(USER_ID_KEY).await?;
        self.store.remove(USER_TOKEN_KEY).await?;
        tracing::debug!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::storage::MemoryStore;

    fn session() -> LoginSession {
        LoginSession {
            token: "tok".into(),
            user_id: "CUST-00-0007".into(),
            cust_name: "Ana Cruz".into(),
            expires_in: 7200,
        }
    }

    #[tokio::test]
    async fn save_then_clear() {
        let sessions = SessionStore::new(Arc::new(MemoryStore::new()));
        sessions.save(&session()).await.unwrap();

        assert_eq!(sessions.user_id().await.unwrap().as_deref(), Some("CUST-00-0007"));
        assert_eq!(sessions.token().await.unwrap().as_deref(), Some("tok"));

        sessions.clear().await.unwrap();
        assert_eq!(sessions.user_id().await.unwrap(), None);
        assert_eq!(sessions.token().await.unwrap(), None);
    }

    /// Rejects writes of the token key.
    struct TokenWriteFails(MemoryStore);

    #[async_trait::async_trait]
    impl KeyValueStore for TokenWriteFails {
        async fn get(&self, key: &str) -> ClientResult<Option<String>> {
            self.0.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> ClientResult<()> {
            if key == USER_TOKEN_KEY {
                return Err(ClientError::Storage(std::io::Error::other("disk full")));
            }
            self.0.set(key, value).await
        }

        async fn remove(&self, key: &str) -> ClientResult<()> {
            self.0.remove(key).await
        }
    }

    #[tokio::test]
    async fn failed_token_write_discards_user_id() {
        let sessions = SessionStore::new(Arc::new(TokenWriteFails(MemoryStore::new())));

        let result = sessions.save(&session()).await;
        assert!(matches!(result, Err(ClientError::Storage(_))));
        assert_eq!(sessions.user_id().await.unwrap(), None);
        assert_eq!(sessions.token().await.unwrap(), None);
    }
}
