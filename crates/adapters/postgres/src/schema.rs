//! 认证相关表结构

use crate::Migration;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    pass_hash BYTEA NOT NULL,
    name TEXT NOT NULL
);
"#;

const CREATE_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    refresh_token TEXT NOT NULL,
    expires_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions (user_id);
CREATE INDEX IF NOT EXISTS idx_sessions_refresh_token ON sessions (refresh_token);
"#;

/// 用户与会话表的迁移列表
pub fn auth_migrations() -> Vec<Migration> {
    vec![
        Migration::new(1, "create_users", CREATE_USERS),
        Migration::new(2, "create_sessions", CREATE_SESSIONS),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_ordered_and_unique() {
        let migrations = auth_migrations();
        let versions: Vec<i64> = migrations.iter().map(|m| m.version).collect();

        assert_eq!(versions, vec![1, 2]);
    }

    #[test]
    fn test_email_is_unique() {
        assert!(CREATE_USERS.contains("email TEXT NOT NULL UNIQUE"));
    }

    #[test]
    fn test_refresh_token_is_indexed_without_unique_constraint() {
        assert!(CREATE_SESSIONS.contains("refresh_token TEXT NOT NULL,"));
        assert!(!CREATE_SESSIONS.contains("refresh_token TEXT NOT NULL UNIQUE"));
        assert!(CREATE_SESSIONS.contains("ON sessions (refresh_token)"));
    }
}
