use rawhttp::config::Config;
use rawhttp::server::{listener, routes::DemoHandler};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let server = listener::run(&cfg, DemoHandler).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    server.close();

    Ok(())
}
