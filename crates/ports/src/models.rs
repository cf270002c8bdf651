//! 领域模型

use chat_common::{PasswordDigest, SessionId, UserId};
use chrono::{DateTime, Utc};

/// 用户
///
/// 由注册创建，之后在认证核心内不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// 唯一，按存储原样区分大小写
    pub email: String,
    pub password_hash: PasswordDigest,
    pub name: String,
}

/// 会话
///
/// 以刷新令牌为查找键。`now <= expires_at` 时有效。
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_session(expires_at: DateTime<Utc>) -> Session {
        Session {
            id: SessionId::new(1),
            user_id: UserId::new(1),
            refresh_token: "opaque-refresh-token".to_string(),
            expires_at,
            created_at: expires_at - Duration::hours(720),
        }
    }

    #[test]
    fn test_session_valid_until_expiry_inclusive() {
        let expires_at = Utc::now();
        let session = create_test_session(expires_at);

        assert!(!session.is_expired_at(expires_at - Duration::seconds(1)));
        assert!(!session.is_expired_at(expires_at));
        assert!(session.is_expired_at(expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_session_debug_hides_token() {
        let session = create_test_session(Utc::now());
        let debug_output = format!("{:?}", session);

        assert!(!debug_output.contains("opaque-refresh-token"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_user_debug_hides_password_hash() {
        let user = User {
            id: UserId::new(1),
            email: "a@b.com".to_string(),
            password_hash: PasswordDigest::from_bytes(b"$argon2id$hash".to_vec()),
            name: "A".to_string(),
        };

        assert!(!format!("{:?}", user).contains("argon2id"));
    }
}
