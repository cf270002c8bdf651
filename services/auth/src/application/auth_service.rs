//! 认证流程编排
//!
//! 组合用户存储、会话存储、密码哈希与令牌签发，实现注册、登录、刷新访问令牌和登出。
//! 编排器本身无状态，可被并发调用；共享状态全部在存储中。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chat_auth_core::{PasswordHasher, TokenIssuer};
use chat_common::{Clock, PasswordDigest, SessionId, SystemClock, UserId};
use chat_config::{AuthConfig, JwtConfig};
use chat_errors::{AuthError, AuthResult};
use chat_ports::{
    AuthEvent, AuthEventSink, OP_LOGIN, OP_LOGOUT, OP_REFRESH, OP_REGISTER, SessionStore,
    StoreError, StoreResult, UserStore,
};
use chrono::{DateTime, Utc};

use crate::infrastructure::events::NoOpEventSink;

/// 编排器设置，构造后不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSettings {
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// 单次存储调用的超时时间
    pub store_timeout: Duration,
}

impl AuthSettings {
    pub fn from_config(jwt: &JwtConfig, auth: &AuthConfig) -> Self {
        Self {
            access_token_ttl: jwt.access_token_ttl(),
            refresh_token_ttl: jwt.refresh_token_ttl(),
            store_timeout: auth.store_timeout(),
        }
    }
}

/// 登录结果
#[derive(Clone)]
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for LoginTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish()
    }
}

/// 刷新结果
#[derive(Clone)]
pub struct AccessGrant {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGrant")
            .field("access_token", &"[REDACTED]")
            .field("access_expires_at", &self.access_expires_at)
            .finish()
    }
}

struct LoginOutcome {
    tokens: LoginTokens,
    user_id: UserId,
    session_id: SessionId,
}

struct RefreshOutcome {
    grant: AccessGrant,
    user_id: UserId,
    session_id: SessionId,
}

/// 认证编排器
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: Arc<PasswordHasher>,
    tokens: TokenIssuer,
    events: Arc<dyn AuthEventSink>,
    clock: Arc<dyn Clock>,
    access_token_ttl: chrono::Duration,
    refresh_token_ttl: Duration,
    store_timeout: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        hasher: Arc<PasswordHasher>,
        tokens: TokenIssuer,
        settings: AuthSettings,
    ) -> AuthResult<Self> {
        let access_token_ttl = chrono::Duration::from_std(settings.access_token_ttl)
            .map_err(|_| AuthError::validation("access token ttl out of range"))?;

        Ok(Self {
            users,
            sessions,
            hasher,
            tokens,
            events: Arc::new(NoOpEventSink),
            clock: Arc::new(SystemClock),
            access_token_ttl,
            refresh_token_ttl: settings.refresh_token_ttl,
            store_timeout: settings.store_timeout,
        })
    }

    pub fn with_event_sink(mut self, events: Arc<dyn AuthEventSink>) -> Self {
        self.events = events;
        self
    }

    /// 时钟需与会话存储使用的时钟一致
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 注册新用户，不签发任何令牌
    pub async fn register(&self, email: &str, password: &str, name: &str) -> AuthResult<UserId> {
        let result = self.do_register(email, password, name).await;

        let event = match &result {
            Ok(user_id) => AuthEvent::UserRegistered {
                user_id: *user_id,
                email: email.to_string(),
                timestamp: self.clock.now(),
            },
            Err(e) => self.failure_event(OP_REGISTER, e, Some(email)),
        };
        self.events.publish(event).await;

        result
    }

    /// 登录并创建新会话
    ///
    /// 邮箱不存在与密码错误都返回 [`AuthError::InvalidCredentials`]。
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<LoginTokens> {
        let result = self.do_login(email, password).await;

        let event = match &result {
            Ok(outcome) => AuthEvent::LoggedIn {
                user_id: outcome.user_id,
                session_id: outcome.session_id,
                email: email.to_string(),
                timestamp: self.clock.now(),
            },
            Err(e) => self.failure_event(OP_LOGIN, e, Some(email)),
        };
        self.events.publish(event).await;

        result.map(|outcome| outcome.tokens)
    }

    /// 用刷新令牌换取新的访问令牌
    ///
    /// 刷新令牌不轮换，会话不做任何修改。
    pub async fn refresh_access_token(&self, refresh_token: &str) -> AuthResult<AccessGrant> {
        let result = self.do_refresh(refresh_token).await;

        let event = match &result {
            Ok(outcome) => AuthEvent::AccessTokenRefreshed {
                user_id: outcome.user_id,
                session_id: outcome.session_id,
                timestamp: self.clock.now(),
            },
            Err(e) => self.failure_event(OP_REFRESH, e, None),
        };
        self.events.publish(event).await;

        result.map(|outcome| outcome.grant)
    }

    /// 删除刷新令牌对应的会话；令牌不存在时同样成功
    pub async fn logout(&self, refresh_token: &str) -> AuthResult<()> {
        let result = self.do_logout(refresh_token).await;

        let event = match &result {
            Ok(()) => AuthEvent::LoggedOut {
                timestamp: self.clock.now(),
            },
            Err(e) => self.failure_event(OP_LOGOUT, e, None),
        };
        self.events.publish(event).await;

        result
    }

    async fn do_register(&self, email: &str, password: &str, name: &str) -> AuthResult<UserId> {
        require(email, "email")?;
        require(password, "password")?;
        require(name, "name")?;

        let digest = self.hash_password(password).await?;

        self.with_deadline(self.users.create(email, &digest, name))
            .await
            .map_err(|e| match e {
                StoreError::DuplicateEmail => AuthError::UserAlreadyExists,
                other => AuthError::storage(OP_REGISTER, other),
            })
    }

    async fn do_login(&self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        require(email, "email")?;
        require(password, "password")?;

        let user = match self.with_deadline(self.users.get_by_email(email)).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                self.verify_dummy(password).await?;
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(AuthError::storage(OP_LOGIN, e)),
        };

        if !self.verify_password(user.password_hash, password).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let now = self.clock.now();
        let access = self
            .tokens
            .issue_access_token(user.id, &user.email, self.access_token_ttl, now)?;
        let refresh_token = self.tokens.issue_refresh_token()?;

        let session = self
            .with_deadline(
                self.sessions
                    .create(user.id, &refresh_token, self.refresh_token_ttl),
            )
            .await
            .map_err(|e| AuthError::storage(OP_LOGIN, e))?;

        Ok(LoginOutcome {
            tokens: LoginTokens {
                access_token: access.token,
                refresh_token,
                access_expires_at: access.expires_at,
                refresh_expires_at: session.expires_at,
            },
            user_id: user.id,
            session_id: session.id,
        })
    }

    async fn do_refresh(&self, refresh_token: &str) -> AuthResult<RefreshOutcome> {
        require(refresh_token, "refresh token")?;

        let session = self
            .with_deadline(self.sessions.get_by_token(refresh_token))
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AuthError::InvalidRefreshToken,
                other => AuthError::storage(OP_REFRESH, other),
            })?;

        let now = self.clock.now();
        if session.is_expired_at(now) {
            return Err(AuthError::RefreshTokenExpired);
        }

        // 会话存在但用户不存在属于数据不一致
        let user = self
            .with_deadline(self.users.get_by_id(session.user_id))
            .await
            .map_err(|e| AuthError::storage(OP_REFRESH, e))?;

        let access = self
            .tokens
            .issue_access_token(user.id, &user.email, self.access_token_ttl, now)?;

        Ok(RefreshOutcome {
            grant: AccessGrant {
                access_token: access.token,
                access_expires_at: access.expires_at,
            },
            user_id: user.id,
            session_id: session.id,
        })
    }

    async fn do_logout(&self, refresh_token: &str) -> AuthResult<()> {
        require(refresh_token, "refresh token")?;

        self.with_deadline(self.sessions.delete(refresh_token))
            .await
            .map_err(|e| AuthError::storage(OP_LOGOUT, e))
    }

    async fn with_deadline<T>(&self, call: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .unwrap_or(Err(StoreError::Timeout(self.store_timeout)))
    }

    async fn hash_password(&self, password: &str) -> AuthResult<PasswordDigest> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::hashing(OP_REGISTER, e))?
    }

    async fn verify_password(&self, digest: PasswordDigest, password: &str) -> AuthResult<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&digest, &password))
            .await
            .map_err(|e| AuthError::hashing(OP_LOGIN, e))?
    }

    async fn verify_dummy(&self, password: &str) -> AuthResult<()> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify_dummy(&password))
            .await
            .map_err(|e| AuthError::hashing(OP_LOGIN, e))
    }

    fn failure_event(&self, op: &'static str, err: &AuthError, email: Option<&str>) -> AuthEvent {
        AuthEvent::OperationFailed {
            op,
            kind: err.kind(),
            email: email.map(str::to_string),
            detail: err.is_internal().then(|| err.to_string()),
            timestamp: self.clock.now(),
        }
    }
}

fn require(value: &str, field: &str) -> AuthResult<()> {
    if value.is_empty() {
        return Err(AuthError::validation(format!("{} is required", field)));
    }
    Ok(())
}
