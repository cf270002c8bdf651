//! 通用类型定义

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 用户 ID（由存储层分配的自增主键）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[display("{_0}")]
pub struct UserId(pub i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// 会话 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[display("{_0}")]
pub struct SessionId(pub i64);

impl SessionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// 密码摘要
///
/// 自描述的单向摘要（内含盐与代价参数），按不透明字节保存。`Debug` 不输出内容。
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(Vec<u8>);

impl PasswordDigest {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordDigest([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(UserId::new(42).to_string(), "42");
        assert_eq!(SessionId::from(7).to_string(), "7");
    }

    #[test]
    fn test_password_digest_debug_is_redacted() {
        let digest = PasswordDigest::from_bytes(b"$argon2id$v=19$secret".to_vec());
        let debug_output = format!("{:?}", digest);

        assert!(!debug_output.contains("argon2"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_id_ordering() {
        assert!(UserId::new(1) < UserId::new(2));
        assert_eq!(SessionId::new(3).as_i64(), 3);
    }
}
