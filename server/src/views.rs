const INDEX_TEMPLATE: &str = include_str!("../static/index.html");
const ERROR_SLOT: &str = "<!-- error -->";

/// The submission form, optionally showing the generic failure message.
pub fn index_page(failed: bool) -> String {
    if failed {
        let message = format!(
            r#"<p class="error">{}</p>"#,
            crate::handlers::sitemap_handlers::FAILURE_MESSAGE
        );
        INDEX_TEMPLATE.replace(ERROR_SLOT, &message)
    } else {
        INDEX_TEMPLATE.to_string()
    }
}
