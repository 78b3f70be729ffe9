use anyhow::Context;

use clubhouse_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    clubhouse_observability::init();

    // No insecure fallback: a missing signing key stops the process here.
    let config = AppConfig::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "refusing to start"))
        .context("invalid configuration")?;

    let app = clubhouse_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
