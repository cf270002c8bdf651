//! 用户存储 trait

use async_trait::async_trait;
use chat_common::{PasswordDigest, UserId};

use crate::{StoreResult, User};

/// 用户存储
///
/// 实现必须保证 `create` 成功后，任何调用方随后的 `get_by_email`/`get_by_id` 都能读到。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 创建用户；邮箱重复返回 [`StoreError::DuplicateEmail`](crate::StoreError::DuplicateEmail)
    async fn create(
        &self,
        email: &str,
        password_hash: &PasswordDigest,
        name: &str,
    ) -> StoreResult<UserId>;

    /// 根据邮箱查找用户
    async fn get_by_email(&self, email: &str) -> StoreResult<User>;

    /// 根据 ID 查找用户
    async fn get_by_id(&self, id: UserId) -> StoreResult<User>;
}
