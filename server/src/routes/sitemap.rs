use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::handlers::sitemap_handlers::{get_sitemap, index, submit_form, submit_json};
use crate::state::AppState;

pub fn sitemap_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(submit_form))
        .route("/api/sitemaps", post(submit_json))
        .route("/sitemap/{id}", get(get_sitemap))
        .layer(Extension(state))
}
