//! chat-errors - 统一错误处理
//!
//! 认证核心的封闭错误分类。调用方只能依据 [`AuthError::kind`] 分支，不要匹配错误字符串。

use std::error::Error as StdError;

use thiserror::Error;

/// 底层错误（存储驱动、运行时等）
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// 错误种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    InvalidCredentials,
    UserAlreadyExists,
    InvalidRefreshToken,
    RefreshTokenExpired,
    InvalidAccessToken,
    StorageFailure,
    SigningFailure,
    EntropyFailure,
    HashingFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::InvalidCredentials => "invalid_credentials",
            Self::UserAlreadyExists => "user_already_exists",
            Self::InvalidRefreshToken => "invalid_refresh_token",
            Self::RefreshTokenExpired => "refresh_token_expired",
            Self::InvalidAccessToken => "invalid_access_token",
            Self::StorageFailure => "storage_failure",
            Self::SigningFailure => "signing_failure",
            Self::EntropyFailure => "entropy_failure",
            Self::HashingFailure => "hashing_failure",
        }
    }

    /// 内部错误对终端用户不透明
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::StorageFailure | Self::SigningFailure | Self::EntropyFailure | Self::HashingFailure
        )
    }

    /// 转换为 gRPC 状态码
    pub fn grpc_code(&self) -> tonic::Code {
        match self {
            Self::Validation => tonic::Code::InvalidArgument,
            Self::InvalidCredentials
            | Self::InvalidRefreshToken
            | Self::RefreshTokenExpired
            | Self::InvalidAccessToken => tonic::Code::Unauthenticated,
            Self::UserAlreadyExists => tonic::Code::AlreadyExists,
            Self::StorageFailure
            | Self::SigningFailure
            | Self::EntropyFailure
            | Self::HashingFailure => tonic::Code::Internal,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Invalid access token: {0}")]
    InvalidAccessToken(String),

    #[error("{op}: storage failure: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{op}: signing failure: {message}")]
    Signing { op: &'static str, message: String },

    #[error("{op}: entropy source failure: {message}")]
    Entropy { op: &'static str, message: String },

    #[error("{op}: password hashing failure: {message}")]
    Hashing { op: &'static str, message: String },
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_access_token(msg: impl Into<String>) -> Self {
        Self::InvalidAccessToken(msg.into())
    }

    pub fn storage(op: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Storage {
            op,
            source: source.into(),
        }
    }

    pub fn signing(op: &'static str, msg: impl std::fmt::Display) -> Self {
        Self::Signing {
            op,
            message: msg.to_string(),
        }
    }

    pub fn entropy(op: &'static str, msg: impl std::fmt::Display) -> Self {
        Self::Entropy {
            op,
            message: msg.to_string(),
        }
    }

    pub fn hashing(op: &'static str, msg: impl std::fmt::Display) -> Self {
        Self::Hashing {
            op,
            message: msg.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::UserAlreadyExists => ErrorKind::UserAlreadyExists,
            Self::InvalidRefreshToken => ErrorKind::InvalidRefreshToken,
            Self::RefreshTokenExpired => ErrorKind::RefreshTokenExpired,
            Self::InvalidAccessToken(_) => ErrorKind::InvalidAccessToken,
            Self::Storage { .. } => ErrorKind::StorageFailure,
            Self::Signing { .. } => ErrorKind::SigningFailure,
            Self::Entropy { .. } => ErrorKind::EntropyFailure,
            Self::Hashing { .. } => ErrorKind::HashingFailure,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    pub fn is_internal(&self) -> bool {
        self.kind().is_internal()
    }

    /// 产生错误的操作名（仅内部错误携带）
    pub fn op(&self) -> Option<&'static str> {
        match self {
            Self::Storage { op, .. }
            | Self::Signing { op, .. }
            | Self::Entropy { op, .. }
            | Self::Hashing { op, .. } => Some(op),
            _ => None,
        }
    }

    /// 转换为 gRPC 状态码
    pub fn grpc_code(&self) -> tonic::Code {
        self.kind().grpc_code()
    }

    /// 面向调用方的消息，内部错误不暴露细节
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            "internal error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<AuthError> for tonic::Status {
    fn from(err: AuthError) -> Self {
        tonic::Status::new(err.grpc_code(), err.public_message())
    }
}

/// Result 类型别名
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_equality() {
        assert!(AuthError::InvalidCredentials.is(ErrorKind::InvalidCredentials));
        assert_eq!(
            AuthError::validation("email is required").kind(),
            ErrorKind::Validation
        );
        assert_ne!(
            AuthError::InvalidRefreshToken.kind(),
            AuthError::RefreshTokenExpired.kind()
        );
    }

    #[test]
    fn test_internal_kinds() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "connection reset");
        assert!(AuthError::storage("auth.login", io).is_internal());
        assert!(AuthError::signing("token.issue_access", "bad key").is_internal());
        assert!(AuthError::entropy("token.issue_refresh", "no rng").is_internal());
        assert!(AuthError::hashing("password.hash", "oom").is_internal());

        assert!(!AuthError::InvalidCredentials.is_internal());
        assert!(!AuthError::UserAlreadyExists.is_internal());
        assert!(!AuthError::validation("x").is_internal());
    }

    #[test]
    fn test_storage_error_keeps_op_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "pool closed");
        let err = AuthError::storage("auth.register", io);

        assert_eq!(err.op(), Some("auth.register"));
        assert_eq!(err.to_string(), "auth.register: storage failure: pool closed");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_grpc_codes() {
        assert_eq!(
            AuthError::validation("name is required").grpc_code(),
            tonic::Code::InvalidArgument
        );
        assert_eq!(
            AuthError::InvalidCredentials.grpc_code(),
            tonic::Code::Unauthenticated
        );
        assert_eq!(
            AuthError::UserAlreadyExists.grpc_code(),
            tonic::Code::AlreadyExists
        );
        assert_eq!(
            AuthError::RefreshTokenExpired.grpc_code(),
            tonic::Code::Unauthenticated
        );
        assert_eq!(
            AuthError::signing("token.issue_access", "boom").grpc_code(),
            tonic::Code::Internal
        );
    }

    #[test]
    fn test_status_hides_internal_details() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "password=hunter2 host=db");
        let status: tonic::Status = AuthError::storage("auth.login", io).into();

        assert_eq!(status.code(), tonic::Code::Internal);
        assert_eq!(status.message(), "internal error");
    }

    #[test]
    fn test_status_keeps_user_facing_message() {
        let status: tonic::Status = AuthError::UserAlreadyExists.into();

        assert_eq!(status.code(), tonic::Code::AlreadyExists);
        assert_eq!(status.message(), "User already exists");
    }
}
