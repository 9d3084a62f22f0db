use anyhow::Context;
use server::config::ServerConfig;
use server::state::AppState;
use sitemap_service_cli::{logging, SitemapFetcher, SitemapGenerator, SitemapStore};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let config = ServerConfig::from_env()?;
    let generator = SitemapGenerator::new(
        SitemapFetcher::new()?,
        SitemapStore::new(&config.sitemap_dir),
        config.grouping,
    );
    let app = server::app(AppState::new(generator), &config)?;

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(
        addr = %config.bind_addr,
        sitemap_dir = %config.sitemap_dir.display(),
        grouping = %config.grouping,
        "sitemap server listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
