//! 服务运行时

use std::net::SocketAddr;

use chat_config::AppConfig;
use chat_telemetry::{init_metrics, init_tracing, init_tracing_json};
use tracing::{error, info, warn};

/// 初始化服务运行时（日志 + 可选的 Prometheus 端点）
///
/// 必须在 tokio 运行时内调用。
pub fn init_runtime(config: &AppConfig) {
    if config.is_production() {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }

    if let Some(port) = config.telemetry.metrics_port {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        match init_metrics(addr) {
            Ok(()) => info!(%addr, "Metrics exporter listening"),
            Err(e) => warn!(error = %e, "Failed to install metrics exporter"),
        }
    }

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        "Runtime initialized"
    );
}

/// 等待关闭信号
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
