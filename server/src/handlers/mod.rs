pub mod sitemap_handlers;
