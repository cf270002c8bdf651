//! 认证事件
//!
//! 认证流程每次操作结束时发出一条结构化事件。事件中不包含密码、摘要、令牌或签名密钥。

use async_trait::async_trait;
use chat_common::{SessionId, UserId};
use chat_errors::ErrorKind;
use chrono::{DateTime, Utc};

pub const OP_REGISTER: &str = "auth.register";
pub const OP_LOGIN: &str = "auth.login";
pub const OP_REFRESH: &str = "auth.refresh_access_token";
pub const OP_LOGOUT: &str = "auth.logout";

/// 认证事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    UserRegistered {
        user_id: UserId,
        email: String,
        timestamp: DateTime<Utc>,
    },
    LoggedIn {
        user_id: UserId,
        session_id: SessionId,
        email: String,
        timestamp: DateTime<Utc>,
    },
    AccessTokenRefreshed {
        user_id: UserId,
        session_id: SessionId,
        timestamp: DateTime<Utc>,
    },
    LoggedOut {
        timestamp: DateTime<Utc>,
    },
    OperationFailed {
        op: &'static str,
        kind: ErrorKind,
        /// 登录/注册时的邮箱
        email: Option<String>,
        /// 内部错误的诊断信息（含操作名与底层原因）
        detail: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl AuthEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "UserRegistered",
            Self::LoggedIn { .. } => "LoggedIn",
            Self::AccessTokenRefreshed { .. } => "AccessTokenRefreshed",
            Self::LoggedOut { .. } => "LoggedOut",
            Self::OperationFailed { .. } => "OperationFailed",
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => OP_REGISTER,
            Self::LoggedIn { .. } => OP_LOGIN,
            Self::AccessTokenRefreshed { .. } => OP_REFRESH,
            Self::LoggedOut { .. } => OP_LOGOUT,
            Self::OperationFailed { op, .. } => op,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::OperationFailed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error_kind().is_some()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::UserRegistered { timestamp, .. }
            | Self::LoggedIn { timestamp, .. }
            | Self::AccessTokenRefreshed { timestamp, .. }
            | Self::LoggedOut { timestamp }
            | Self::OperationFailed { timestamp, .. } => *timestamp,
        }
    }
}

/// 事件接收端 trait
#[async_trait]
pub trait AuthEventSink: Send + Sync {
    async fn publish(&self, event: AuthEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_event_metadata() {
        let event = AuthEvent::OperationFailed {
            op: OP_LOGIN,
            kind: ErrorKind::InvalidCredentials,
            email: Some("a@b.com".to_string()),
            detail: None,
            timestamp: Utc::now(),
        };

        assert_eq!(event.op(), "auth.login");
        assert_eq!(event.event_type(), "OperationFailed");
        assert!(event.is_failure());
        assert_eq!(event.error_kind(), Some(ErrorKind::InvalidCredentials));
    }

    #[test]
    fn test_success_event_metadata() {
        let now = Utc::now();
        let event = AuthEvent::AccessTokenRefreshed {
            user_id: UserId::new(1),
            session_id: SessionId::new(2),
            timestamp: now,
        };

        assert_eq!(event.op(), OP_REFRESH);
        assert!(!event.is_failure());
        assert_eq!(event.timestamp(), now);
    }
}
