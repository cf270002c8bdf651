//! 内存用户存储

use std::collections::HashMap;

use async_trait::async_trait;
use chat_common::{PasswordDigest, UserId};
use chat_ports::{StoreError, StoreResult, User, UserStore};
use tokio::sync::RwLock;

#[derive(Default)]
struct UserTable {
    next_id: i64,
    by_id: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
}

/// 内存用户存储
///
/// 邮箱唯一性检查与插入在同一把写锁内完成。
#[derive(Default)]
pub struct InMemoryUserStore {
    table: RwLock<UserTable>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前用户数
    pub async fn len(&self) -> usize {
        self.table.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(
        &self,
        email: &str,
        password_hash: &PasswordDigest,
        name: &str,
    ) -> StoreResult<UserId> {
        let mut table = self.table.write().await;

        if table.by_email.contains_key(email) {
            return Err(StoreError::DuplicateEmail);
        }

        table.next_id += 1;
        let id = UserId::new(table.next_id);

        table.by_email.insert(email.to_string(), id);
        table.by_id.insert(
            id,
            User {
                id,
                email: email.to_string(),
                password_hash: password_hash.clone(),
                name: name.to_string(),
            },
        );

        tracing::debug!(user_id = %id, "User inserted");
        Ok(id)
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<User> {
        let table = self.table.read().await;
        table
            .by_email
            .get(email)
            .and_then(|id| table.by_id.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_id(&self, id: UserId) -> StoreResult<User> {
        self.table
            .read()
            .await
            .by_id
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn digest() -> PasswordDigest {
        PasswordDigest::from_bytes(b"$argon2id$v=19$stub".to_vec())
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryUserStore::new();

        let id = store.create("a@b.com", &digest(), "A").await.unwrap();

        let by_email = store.get_by_email("a@b.com").await.unwrap();
        let by_id = store.get_by_id(id).await.unwrap();
        assert_eq!(by_email, by_id);
        assert_eq!(by_email.name, "A");
        assert_eq!(by_email.password_hash, digest());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryUserStore::new();
        store.create("a@b.com", &digest(), "A").await.unwrap();

        let result = store.create("a@b.com", &digest(), "B").await;

        assert!(matches!(result, Err(StoreError::DuplicateEmail)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_email_is_case_sensitive() {
        let store = InMemoryUserStore::new();
        store.create("a@b.com", &digest(), "A").await.unwrap();

        assert!(store.create("A@B.com", &digest(), "A").await.is_ok());
        assert!(store.get_by_email("A@b.com").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_user_not_found() {
        let store = InMemoryUserStore::new();

        assert!(store.get_by_id(UserId::new(42)).await.unwrap_err().is_not_found());
        assert!(store.get_by_email("x@y.com").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registration() {
        let store = Arc::new(InMemoryUserStore::new());

        let tasks = (0..16).map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .create("same@b.com", &digest(), &format!("user-{}", i))
                    .await
            })
        });
        let results = futures::future::join_all(tasks).await;

        let created = results
            .into_iter()
            .map(|r| r.unwrap())
            .filter(|r| r.is_ok())
            .count();
        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }
}
