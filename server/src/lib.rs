pub mod config;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod views;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::ServerConfig;
use routes::sitemap::sitemap_routes;
use state::AppState;

/// Builds the full router: sitemap routes, request tracing, and CORS when
/// `CLIENT_URL` is configured.
pub fn app(state: AppState, config: &ServerConfig) -> Result<Router> {
    let router = sitemap_routes(state).layer(TraceLayer::new_for_http());

    let Some(client_url) = &config.client_url else {
        return Ok(router);
    };
    let origin = client_url
        .parse::<HeaderValue>()
        .context("CLIENT_URL is not a valid origin")?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(router.layer(cors))
}
