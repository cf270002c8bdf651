//! PostgreSQL 迁移管理

use std::collections::HashSet;

use chat_ports::{StoreError, StoreResult};
use sqlx::PgPool;
use tracing::{info, warn};

/// 迁移定义
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    /// 升级 SQL，可包含多条语句
    pub up_sql: &'static str,
}

impl Migration {
    pub const fn new(version: i64, name: &'static str, up_sql: &'static str) -> Self {
        Self {
            version,
            name,
            up_sql,
        }
    }
}

/// 迁移管理器
pub struct MigrationManager {
    pool: PgPool,
    table_name: String,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table_name: "_migrations".to_string(),
        }
    }

    /// 设置迁移表名
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    /// 初始化迁移表
    pub async fn init(&self) -> StoreResult<()> {
        let create_sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                version BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table_name
        );

        sqlx::query(&create_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend(format!("failed to create migration table: {}", e)))?;

        Ok(())
    }

    /// 已应用的迁移版本
    pub async fn applied_versions(&self) -> StoreResult<HashSet<i64>> {
        let sql = format!("SELECT version FROM {}", self.table_name);

        let rows: Vec<(i64,)> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend(format!("failed to read migrations: {}", e)))?;

        Ok(rows.into_iter().map(|(v,)| v).collect())
    }

    /// 在单个事务内应用迁移并记录版本
    pub async fn apply(&self, migration: &Migration) -> StoreResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::backend(format!("failed to begin transaction: {}", e)))?;

        sqlx::raw_sql(migration.up_sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                StoreError::backend(format!(
                    "failed to apply migration {}: {}",
                    migration.version, e
                ))
            })?;

        let insert_sql = format!(
            "INSERT INTO {} (version, name) VALUES ($1, $2)",
            self.table_name
        );
        sqlx::query(&insert_sql)
            .bind(migration.version)
            .bind(migration.name)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::backend(format!("failed to record migration: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::backend(format!("failed to commit migration: {}", e)))?;

        info!(
            version = migration.version,
            name = migration.name,
            "Migration applied"
        );
        Ok(())
    }

    /// 按版本顺序应用所有未应用的迁移，遇到失败即停止
    pub async fn migrate(&self, migrations: &[Migration]) -> StoreResult<MigrationReport> {
        self.init().await?;
        let applied_versions = self.applied_versions().await?;

        let mut sorted: Vec<_> = migrations.iter().collect();
        sorted.sort_by_key(|m| m.version);

        let mut report = MigrationReport::default();
        for migration in sorted {
            if applied_versions.contains(&migration.version) {
                report.skipped.push(migration.version);
                continue;
            }

            if let Err(e) = self.apply(migration).await {
                warn!(version = migration.version, error = %e, "Migration failed");
                return Err(e);
            }
            report.applied.push(migration.version);
        }

        Ok(report)
    }
}

/// 迁移结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<i64>,
    pub skipped: Vec<i64>,
}

impl MigrationReport {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creation() {
        let migration = Migration::new(1, "create_users", "CREATE TABLE users (id BIGSERIAL)");

        assert_eq!(migration.version, 1);
        assert_eq!(migration.name, "create_users");
    }

    #[test]
    fn test_report_counts() {
        let report = MigrationReport {
            applied: vec![1, 2],
            skipped: vec![],
        };

        assert_eq!(report.applied_count(), 2);
    }
}
