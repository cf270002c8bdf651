//! 基础设施资源

use chat_adapter_postgres::{
    MigrationManager, PostgresConfig, auth_migrations, check_connection, create_pool,
};
use chat_auth_core::TokenIssuer;
use chat_config::AppConfig;
use chat_ports::StoreResult;
use sqlx::PgPool;
use tracing::info;

use crate::retry::{RetryConfig, with_retry};

/// 基础设施资源容器
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
    token_issuer: TokenIssuer,
}

impl Infrastructure {
    /// 连接数据库（带重试）、执行迁移并构造令牌签发器
    pub async fn from_config(config: AppConfig) -> StoreResult<Self> {
        let pg_config = PostgresConfig::from(&config.database);
        let postgres_pool = with_retry(&RetryConfig::default(), "PostgreSQL connection", || {
            let cfg = pg_config.clone();
            async move { create_pool(&cfg).await }
        })
        .await?;
        check_connection(&postgres_pool).await?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        let report = MigrationManager::new(postgres_pool.clone())
            .migrate(&auth_migrations())
            .await?;
        info!(applied = report.applied_count(), "Database schema up to date");

        let token_issuer = TokenIssuer::new(&config.jwt.secret);

        Ok(Self {
            config,
            postgres_pool,
            token_issuer,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn token_issuer(&self) -> TokenIssuer {
        self.token_issuer.clone()
    }
}
