use anyhow::Context;

use conrod_infra::LedgerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    conrod_observability::init();

    let config = LedgerConfig::from_env();
    let app = conrod_api::app::build_app(&config)
        .await
        .context("failed to wire ledger services")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
