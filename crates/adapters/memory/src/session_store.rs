//! 内存会话存储

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chat_common::{Clock, SessionId, SystemClock, UserId};
use chat_ports::{Session, SessionStore, StoreError, StoreResult};
use tokio::sync::RwLock;

#[derive(Default)]
struct SessionTable {
    next_id: i64,
    by_token: HashMap<String, Session>,
}

/// 内存会话存储
///
/// 每次 `create` 时清除已过期的会话。
pub struct InMemorySessionStore {
    table: RwLock<SessionTable>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RwLock::new(SessionTable::default()),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.by_token.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(
        &self,
        user_id: UserId,
        refresh_token: &str,
        ttl: Duration,
    ) -> StoreResult<Session> {
        let ttl = chrono::Duration::from_std(ttl).map_err(StoreError::backend)?;
        let created_at = self.clock.now();
        let expires_at = created_at
            .checked_add_signed(ttl)
            .ok_or_else(|| StoreError::backend("session expiry out of range"))?;

        let mut table = self.table.write().await;
        let before = table.by_token.len();
        table.by_token.retain(|_, s| !s.is_expired_at(created_at));
        let pruned = before - table.by_token.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Expired sessions pruned");
        }

        if table.by_token.contains_key(refresh_token) {
            return Err(StoreError::backend("refresh token already in use"));
        }

        table.next_id += 1;
        let session = Session {
            id: SessionId::new(table.next_id),
            user_id,
            refresh_token: refresh_token.to_string(),
            expires_at,
            created_at,
        };
        table
            .by_token
            .insert(refresh_token.to_string(), session.clone());

        tracing::debug!(session_id = %session.id, user_id = %user_id, "Session inserted");
        Ok(session)
    }

    async fn get_by_token(&self, token: &str) -> StoreResult<Session> {
        self.table
            .read()
            .await
            .by_token
            .get(token)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, token: &str) -> StoreResult<()> {
        self.table.write().await.by_token.remove(token);
        Ok(())
    }
}
