//! PostgreSQL 会话存储

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chat_common::{Clock, SessionId, SystemClock, UserId};
use chat_ports::{Session, SessionStore, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: i64,
    user_id: i64,
    refresh_token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            id: SessionId::new(row.id),
            user_id: UserId::new(row.user_id),
            refresh_token: row.refresh_token,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        other => StoreError::backend(other),
    }
}

/// PostgreSQL 会话存储
///
/// 过期时间由进程时钟计算，而不是数据库的 `NOW()`。
pub struct PgSessionStore {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
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

        sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (user_id, refresh_token, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, refresh_token, expires_at, created_at
            "#,
        )
        .bind(user_id.as_i64())
        .bind(refresh_token)
        .bind(expires_at)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map(Session::from)
        .map_err(map_sqlx_error)
    }

    async fn get_by_token(&self, token: &str) -> StoreResult<Session> {
        sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, refresh_token, expires_at, created_at
            FROM sessions
            WHERE refresh_token = $1
            "#,
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map(Session::from)
        .map_err(map_sqlx_error)
    }

    async fn delete(&self, token: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM sessions WHERE refresh_token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}
