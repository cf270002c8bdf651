//! 认证事件接收端

use std::sync::Arc;

use async_trait::async_trait;
use chat_ports::{AuthEvent, AuthEventSink};
use metrics::counter;
use tokio::sync::RwLock;

/// 记录日志并累加 `auth_operations_total{op,outcome}` 计数
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

#[async_trait]
impl AuthEventSink for TracingEventSink {
    async fn publish(&self, event: AuthEvent) {
        let outcome = event.error_kind().map_or("success", |kind| kind.as_str());
        counter!("auth_operations_total", "op" => event.op(), "outcome" => outcome).increment(1);

        match &event {
            AuthEvent::UserRegistered { user_id, email, .. } => {
                tracing::info!(op = event.op(), user_id = %user_id, email = %email, "User registered");
            }
            AuthEvent::LoggedIn {
                user_id,
                session_id,
                email,
                ..
            } => {
                tracing::info!(
                    op = event.op(),
                    user_id = %user_id,
                    session_id = %session_id,
                    email = %email,
                    "User logged in"
                );
            }
            AuthEvent::AccessTokenRefreshed {
                user_id,
                session_id,
                ..
            } => {
                tracing::info!(
                    op = event.op(),
                    user_id = %user_id,
                    session_id = %session_id,
                    "Access token refreshed"
                );
            }
            AuthEvent::LoggedOut { .. } => {
                tracing::info!(op = event.op(), "Session logged out");
            }
            AuthEvent::OperationFailed {
                op,
                kind,
                email,
                detail,
                ..
            } => {
                if kind.is_internal() {
                    tracing::error!(
                        op = *op,
                        kind = %kind,
                        email = email.as_deref(),
                        detail = detail.as_deref(),
                        "Auth operation failed"
                    );
                } else {
                    tracing::warn!(
                        op = *op,
                        kind = %kind,
                        email = email.as_deref(),
                        "Auth operation rejected"
                    );
                }
            }
        }
    }
}

/// 内存事件接收端（用于测试）
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventSink {
    events: Arc<RwLock<Vec<AuthEvent>>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<AuthEvent> {
        self.events.read().await.clone()
    }

    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

#[async_trait]
impl AuthEventSink for InMemoryEventSink {
    async fn publish(&self, event: AuthEvent) {
        self.events.write().await.push(event);
    }
}

/// 丢弃所有事件
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEventSink;

#[async_trait]
impl AuthEventSink for NoOpEventSink {
    async fn publish(&self, _event: AuthEvent) {}
}
