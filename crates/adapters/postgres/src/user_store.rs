//! PostgreSQL 用户存储

use async_trait::async_trait;
use chat_common::{PasswordDigest, UserId};
use chat_ports::{StoreError, StoreResult, User, UserStore};
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    pass_hash: Vec<u8>,
    name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            password_hash: PasswordDigest::from_bytes(row.pass_hash),
            name: row.name,
        }
    }
}

fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateEmail,
        other => StoreError::backend(other),
    }
}

/// PostgreSQL 用户存储
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(
        &self,
        email: &str,
        password_hash: &PasswordDigest,
        name: &str,
    ) -> StoreResult<UserId> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO users (email, pass_hash, name) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(email)
        .bind(password_hash.as_bytes())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(UserId::new(id))
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<User> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, email, pass_hash, name FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map(User::from)
        .map_err(map_sqlx_error)
    }

    async fn get_by_id(&self, id: UserId) -> StoreResult<User> {
        sqlx::query_as::<_, UserRow>("SELECT id, email, pass_hash, name FROM users WHERE id = $1")
            .bind(id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map(User::from)
            .map_err(map_sqlx_error)
    }
}
