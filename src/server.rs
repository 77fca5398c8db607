use axum::Router;
use std::{future::Future, io, sync::Arc};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::{handlers, interceptor::Interceptor};

/// Installs the interceptor as the handler for every method and path.
pub fn router(interceptor: Arc<Interceptor>) -> Router {
    Router::new()
        .fallback(handlers::intercept_request)
        .with_state(interceptor)
}

/// Serves on `listener` until `shutdown` resolves, then drains in-flight requests.
pub async fn serve<F>(listener: TcpListener, interceptor: Arc<Interceptor>, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Request tap listening on {}", addr);
    }

    axum::serve(listener, router(interceptor))
        .with_graceful_shutdown(shutdown)
        .await
}

pub async fn shutdown_signal() {
    info!("Registering shutdown signal handler");
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for CTRL+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            debug!("CTRL+C signal received");
        },
        _ = terminate => {
            debug!("Terminate signal received");
        },
    }
    info!("Shutdown signal received, starting graceful shutdown");
}
