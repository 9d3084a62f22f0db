use std::sync::Arc;

use sitemap_service_cli::SitemapGenerator;

/// Shared by every handler. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<SitemapGenerator>,
}

impl AppState {
    pub fn new(generator: SitemapGenerator) -> Self {
        AppState {
            generator: Arc::new(generator),
        }
    }
}
