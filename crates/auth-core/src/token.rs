//! Token 服务

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chat_common::UserId;
use chat_errors::{AuthError, AuthResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::{RngCore, rngs::OsRng};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// 刷新令牌随机字节数，URL-safe base64 编码后正好 512 个字符
pub const REFRESH_TOKEN_BYTES: usize = 384;
pub const REFRESH_TOKEN_LEN: usize = 512;

/// 访问令牌 Claims
///
/// 只包含 `id`、`email`、`exp` 三个字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub id: i64,
    pub email: String,
    pub exp: i64,
}

impl AccessClaims {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.id)
    }
}

/// 已签发的访问令牌
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token 签发器
///
/// 签名密钥只在构造时读取一次，之后只以 `EncodingKey`/`DecodingKey` 形式存在。
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &Secret<String>) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// 签发访问令牌，`exp = issued_at + ttl`（不做时钟偏移修正）
    pub fn issue_access_token(
        &self,
        user_id: UserId,
        email: &str,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<AccessToken> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::signing("token.issue_access", "expiry out of range"))?;

        let claims = AccessClaims {
            id: user_id.as_i64(),
            email: email.to_string(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::signing("token.issue_access", e))?;

        Ok(AccessToken { token, expires_at })
    }

    /// 生成刷新令牌
    pub fn issue_refresh_token(&self) -> AuthResult<String> {
        generate_refresh_token(&mut OsRng)
    }

    /// 校验访问令牌（签名 + 过期时间，零容差）
    ///
    /// 供下游服务使用，认证流程本身不调用。
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::invalid_access_token(e.to_string()))
    }
}

/// 从给定随机源生成刷新令牌
///
/// 令牌不携带任何元数据，归属与过期时间都保存在会话记录中。
pub fn generate_refresh_token<R: RngCore>(rng: &mut R) -> AuthResult<String> {
    let mut bytes = vec![0u8; REFRESH_TOKEN_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::entropy("token.issue_refresh", e))?;

    Ok(URL_SAFE_NO_PAD.encode(&bytes))
}
