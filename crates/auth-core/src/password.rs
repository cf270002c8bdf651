//! 密码哈希服务

use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
};
use chat_common::PasswordDigest;
use chat_errors::{AuthError, AuthResult};
use rand::{RngCore, rngs::OsRng};

const SALT_LEN: usize = 16;

/// 仅用于在用户不存在时执行一次等价的校验
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

/// 密码哈希器
///
/// 使用 Argon2id 默认参数（m=19456 KiB, t=2, p=1）。摘要为 PHC 字符串，内含盐和参数，
/// 校验时无需其它信息。
#[derive(Clone)]
pub struct PasswordHasher {
    dummy_digest: PasswordDigest,
}

impl PasswordHasher {
    /// 创建哈希器，并预先计算一次用于时序对齐的摘要
    pub fn new() -> AuthResult<Self> {
        let dummy_digest = hash_with(&mut OsRng, DUMMY_PASSWORD)?;
        Ok(Self { dummy_digest })
    }

    /// 哈希密码
    pub fn hash(&self, plaintext: &str) -> AuthResult<PasswordDigest> {
        hash_with(&mut OsRng, plaintext)
    }

    /// 验证密码
    ///
    /// 不匹配返回 `Ok(false)`；摘要格式损坏返回 `HashingFailure`。
    pub fn verify(&self, digest: &PasswordDigest, plaintext: &str) -> AuthResult<bool> {
        let encoded = std::str::from_utf8(digest.as_bytes())
            .map_err(|e| AuthError::hashing("password.verify", format!("malformed digest: {}", e)))?;

        let parsed = PasswordHash::new(encoded)
            .map_err(|e| AuthError::hashing("password.verify", format!("malformed digest: {}", e)))?;

        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::hashing("password.verify", e)),
        }
    }

    /// 对预计算摘要做一次完整校验，结果丢弃
    ///
    /// 用户不存在时调用，使"用户不存在"与"密码错误"两条路径耗时一致。
    pub fn verify_dummy(&self, plaintext: &str) {
        let _ = self.verify(&self.dummy_digest, plaintext);
    }
}

fn hash_with<R: RngCore>(rng: &mut R, plaintext: &str) -> AuthResult<PasswordDigest> {
    let mut salt_bytes = [0u8; SALT_LEN];
    rng.try_fill_bytes(&mut salt_bytes)
        .map_err(|e| AuthError::hashing("password.hash", format!("entropy source unavailable: {}", e)))?;

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AuthError::hashing("password.hash", e))?;

    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AuthError::hashing("password.hash", e))?;

    Ok(PasswordDigest::from_bytes(hash.to_string()))
}
