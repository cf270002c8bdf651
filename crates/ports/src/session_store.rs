//! 会话存储 trait

use std::time::Duration;

use async_trait::async_trait;
use chat_common::UserId;

use crate::{Session, StoreResult};

/// 会话存储
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 创建会话，`expires_at = now + ttl`
    async fn create(&self, user_id: UserId, refresh_token: &str, ttl: Duration)
    -> StoreResult<Session>;

    /// 根据刷新令牌查找会话
    async fn get_by_token(&self, token: &str) -> StoreResult<Session>;

    /// 删除会话；令牌不存在时同样成功
    async fn delete(&self, token: &str) -> StoreResult<()>;
}
