#![forbid(unsafe_code)]

use atelier_adapter::config::{init_logging, AdapterConfig};
use atelier_adapter::http::{router, HttpState};
use atelier_adapter::StudioRuntime;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AdapterConfig::from_env();
    init_logging(config.log_format);

    let runtime = StudioRuntime::from_config(&config)?;
    let app = router(HttpState::new(runtime, &config.principal_header));

    let addr = config.http_bind;
    tracing::info!(
        %addr,
        store_path = %config.store_path.display(),
        principal_header = %config.principal_header,
        "atelier_adapter_http listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("atelier_adapter_http stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
