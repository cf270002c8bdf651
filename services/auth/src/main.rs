//! Auth Service

use std::sync::Arc;

use auth_service::api::grpc::{AuthGrpcService, AuthServer};
use auth_service::application::{AuthService, AuthSettings};
use auth_service::infrastructure::events::TracingEventSink;
use chat_adapter_postgres::{PgSessionStore, PgUserStore};
use chat_auth_core::PasswordHasher;
use chat_common::SystemClock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    chat_bootstrap::run("config", |infra| async move {
        let config = infra.config();
        let settings = AuthSettings::from_config(&config.jwt, &config.auth);
        let clock = Arc::new(SystemClock);
        let pool = infra.postgres_pool();

        let service = AuthService::new(
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgSessionStore::with_clock(pool, clock.clone())),
            Arc::new(PasswordHasher::new()?),
            infra.token_issuer(),
            settings,
        )?
        .with_clock(clock)
        .with_event_sink(Arc::new(TracingEventSink));

        let grpc = AuthGrpcService::new(Arc::new(service));
        Ok::<_, Box<dyn std::error::Error>>(AuthServer::new(grpc))
    })
    .await
}
