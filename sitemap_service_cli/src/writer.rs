use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::errors::{Result, SitemapError};
use crate::SitemapEntry;

/// Namespace declared on every generated `<urlset>`.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// The XML 1.0 `Char` production. Anything else cannot appear in a
/// well-formed document, escaped or not.
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn serialize_error(err: impl std::fmt::Display) -> SitemapError {
    SitemapError::Serialize(err.to_string())
}

/// Renders `urls` as a sitemaps.org `<urlset>` document, one `<url><loc>` per entry.
pub fn render_sitemap(urls: &[SitemapEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(serialize_error)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)]),
        ))
        .map_err(serialize_error)?;

    for url in urls {
        if let Some(bad) = url.chars().find(|c| !is_xml_char(*c)) {
            return Err(SitemapError::Serialize(format!(
                "{:?} contains U+{:04X}, which XML cannot represent",
                url, bad as u32
            )));
        }
        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(serialize_error)?;
        writer
            .write_event(Event::Start(BytesStart::new("loc")))
            .map_err(serialize_error)?;
        // BytesText::new escapes markup characters
        writer
            .write_event(Event::Text(BytesText::new(url)))
            .map_err(serialize_error)?;
        writer
            .write_event(Event::End(BytesEnd::new("loc")))
            .map_err(serialize_error)?;
        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(serialize_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(serialize_error)?;

    String::from_utf8(writer.into_inner()).map_err(serialize_error)
}
