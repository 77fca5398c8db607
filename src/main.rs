use std::sync::Arc;
use tracing::{debug, error, info};

use fetch_tap::{
    config::AppConfig,
    error::AppError,
    interceptor::Interceptor,
    server::{serve, shutdown_signal},
    telemetry::{init_tracing, LogFormat},
};

fn main() {
    dotenv::dotenv().ok();
    init_tracing(LogFormat::from_env());

    if let Err(e) = run() {
        error!("Request tap failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    info!("Loading application configuration");
    let config = AppConfig::new()?;
    debug!(
        "Configuration loaded: port={}, host={}, worker_threads={}, upstream={:?}, sinks={:?}",
        config.port, config.host, config.worker_threads, config.upstream, config.sinks
    );

    info!(
        "Configuring tokio runtime with {} worker threads",
        config.worker_threads
    );
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_stack_size(2 * 1024 * 1024)
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let interceptor = Arc::new(Interceptor::from_config(&config));
        match interceptor.upstream() {
            Some(upstream) => info!("Origin-form requests go to {}", upstream),
            None => info!("No upstream configured, accepting proxy-style requests only"),
        }

        let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
        serve(listener, interceptor, shutdown_signal()).await?;
        info!("Request tap stopped");
        Ok(())
    })
}
