//! chat-auth-core - 认证核心库
//!
//! 密码哈希（Argon2id）、访问令牌签发/校验（HS256 JWT）、不透明刷新令牌生成

mod password;
mod token;

pub use password::*;
pub use token::*;
