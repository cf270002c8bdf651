//! 服务启动器

use std::future::Future;
use std::net::SocketAddr;

use chat_config::AppConfig;
use tonic::codegen::http;
use tonic::transport::Server;
use tracing::info;

use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 gRPC 服务
///
/// 加载配置、初始化日志与指标、创建基础设施，然后交给 `service_builder` 构建服务，
/// 最后启动服务器直到收到关闭信号。
///
/// ```ignore
/// chat_bootstrap::run("config", |infra| async move {
///     Ok(AuthServer::new(build_service(infra)))
/// })
/// .await
/// ```
pub async fn run<F, Fut, S>(
    config_dir: &str,
    service_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = Result<S, Box<dyn std::error::Error>>>,
    S: tonic::codegen::Service<
            http::Request<tonic::body::Body>,
            Response = http::Response<tonic::body::Body>,
            Error = std::convert::Infallible,
        > + tonic::server::NamedService
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let config = AppConfig::load(config_dir)?;

    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let request_timeout = config.server.request_timeout();

    let infra = Infrastructure::from_config(config).await?;
    let service = service_builder(infra).await?;

    info!(%addr, "gRPC server starting");

    Server::builder()
        .timeout(request_timeout)
        .add_service(service)
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    info!("Service stopped");

    Ok(())
}
