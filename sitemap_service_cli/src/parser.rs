//! Extracts the `<loc>` values from a `<urlset>` sitemap document.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::{Result, SitemapError};
use crate::writer::is_xml_char;
use crate::SitemapEntry;

const URLSET: &[u8] = b"urlset";
const URL: &[u8] = b"url";
const LOC: &[u8] = b"loc";

/// Collects the text of one `<url>` element while it is open.
#[derive(Default)]
struct PendingEntry {
    loc: Option<String>,
    text: String,
}

/// Tracks where the reader is inside `urlset > url > loc`.
#[derive(Default)]
struct UrlsetVisitor {
    depth: usize,
    root_seen: bool,
    url_elements: usize,
    pending: Option<PendingEntry>,
    in_loc: bool,
    entries: Vec<SitemapEntry>,
}

impl UrlsetVisitor {
    fn open(&mut self, name: &[u8]) -> Result<()> {
        match self.depth {
            0 => {
                if self.root_seen {
                    return Err(SitemapError::InvalidFormat(
                        "document has more than one root element".into(),
                    ));
                }
                if name != URLSET {
                    return Err(SitemapError::InvalidFormat(format!(
                        "expected <urlset> root, found <{}>",
                        String::from_utf8_lossy(name)
                    )));
                }
                self.root_seen = true;
            }
            1 if name == URL => {
                self.url_elements += 1;
                self.pending = Some(PendingEntry::default());
            }
            2 if name == LOC => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.loc.get_or_insert_with(String::new);
                    self.in_loc = true;
                }
            }
            _ => {}
        }
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        match self.depth {
            2 => self.in_loc = false,
            1 => {
                if let Some(pending) = self.pending.take() {
                    let entry = Self::finish(pending, self.url_elements)?;
                    self.entries.push(entry);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if self.in_loc {
            if let Some(loc) = pending.loc.as_mut() {
                loc.push_str(text);
            }
        } else if self.depth == 2 {
            pending.text.push_str(text);
        }
    }

    fn finish(pending: PendingEntry, position: usize) -> Result<SitemapEntry> {
        let candidate = match pending.loc {
            Some(loc) => loc,
            None => pending.text,
        };
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(SitemapError::InvalidUrlFormat(format!(
                "url entry #{} has no location",
                position
            )));
        }
        if !candidate.chars().all(is_xml_char) {
            return Err(SitemapError::InvalidUrlFormat(format!(
                "url entry #{} contains a character not allowed in XML",
                position
            )));
        }
        Ok(candidate.to_string())
    }

    fn into_entries(self) -> Result<Vec<SitemapEntry>> {
        if self.depth != 0 {
            return Err(SitemapError::InvalidFormat(
                "unexpected end of document inside an open element".into(),
            ));
        }
        if !self.root_seen {
            return Err(SitemapError::InvalidFormat(
                "document has no <urlset> element".into(),
            ));
        }
        if self.url_elements == 0 {
            return Err(SitemapError::InvalidFormat(
                "<urlset> contains no <url> entries".into(),
            ));
        }
        Ok(self.entries)
    }
}

fn malformed(err: impl std::fmt::Display) -> SitemapError {
    SitemapError::InvalidFormat(format!("malformed XML: {}", err))
}

/// Parses sitemap XML into its URLs, in document order.
///
/// A `<url>` contributes its `<loc>` text, or its own text when it has no
/// `<loc>` child. Element names are matched without namespace prefixes, and
/// every other element is ignored.
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut visitor = UrlsetVisitor::default();
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => visitor.open(e.local_name().as_ref())?,
            Event::Empty(e) => {
                visitor.open(e.local_name().as_ref())?;
                visitor.close()?;
            }
            Event::End(_) => visitor.close()?,
            Event::Text(e) => {
                let text = e.unescape().map_err(malformed)?;
                visitor.text(&text);
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(&e).map_err(malformed)?;
                visitor.text(text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let entries = visitor.into_entries()?;
    tracing::debug!(urls = entries.len(), "parsed sitemap");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_loc_values_in_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/a/1</loc>
    <lastmod>2024-01-01</lastmod>
    <priority>0.8</priority>
  </url>
  <url><loc>https://example.com/a/2</loc></url>
  <url><loc> https://example.com/b/1 </loc><changefreq>daily</changefreq></url>
</urlset>"#;
        assert_eq!(
            parse_sitemap(xml).unwrap(),
            vec![
                "https://example.com/a/1",
                "https://example.com/a/2",
                "https://example.com/b/1",
            ]
        );
    }

    #[test]
    fn single_url_is_a_one_element_list() {
        let xml = "<urlset><url><loc>https://example.com/only</loc></url></urlset>";
        assert_eq!(parse_sitemap(xml).unwrap(), vec!["https://example.com/only"]);
    }

    #[test]
    fn bare_text_url_entries_are_accepted() {
        let xml = "<urlset><url>https://example.com/x</url><url><loc>https://example.com/y</loc></url></urlset>";
        assert_eq!(
            parse_sitemap(xml).unwrap(),
            vec!["https://example.com/x", "https://example.com/y"]
        );
    }

    #[test]
    fn unescapes_entities_and_cdata() {
        let xml = "<urlset>\
            <url><loc>https://example.com/search?a=1&amp;b=2</loc></url>\
            <url><loc><![CDATA[https://example.com/q?x=1&y=2]]></loc></url>\
            </urlset>";
        assert_eq!(
            parse_sitemap(xml).unwrap(),
            vec![
                "https://example.com/search?a=1&b=2",
                "https://example.com/q?x=1&y=2",
            ]
        );
    }

    #[test]
    fn namespace_prefixes_are_ignored() {
        let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
            <sm:url><sm:loc>https://example.com/p</sm:loc></sm:url>
        </sm:urlset>"#;
        assert_eq!(parse_sitemap(xml).unwrap(), vec!["https://example.com/p"]);
    }

    #[test]
    fn nested_loc_elements_do_not_leak() {
        let xml = "<urlset><url><loc>https://example.com/page</loc>\
            <image:image xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\">\
            <image:loc>https://example.com/img.png</image:loc></image:image>\
            </url></urlset>";
        assert_eq!(parse_sitemap(xml).unwrap(), vec!["https://example.com/page"]);
    }

    #[test]
    fn urlset_without_url_is_invalid_format() {
        for xml in ["<urlset></urlset>", "<urlset/>", "<urlset><other/></urlset>"] {
            let err = parse_sitemap(xml).unwrap_err();
            assert!(matches!(err, SitemapError::InvalidFormat(_)), "{}", xml);
        }
    }

    #[test]
    fn wrong_root_is_invalid_format() {
        let xml = "<sitemapindex><sitemap><loc>https://example.com/s.xml</loc></sitemap></sitemapindex>";
        assert!(matches!(
            parse_sitemap(xml).unwrap_err(),
            SitemapError::InvalidFormat(_)
        ));
        assert!(matches!(
            parse_sitemap("").unwrap_err(),
            SitemapError::InvalidFormat(_)
        ));
    }

    #[test]
    fn malformed_xml_is_invalid_format() {
        for xml in [
            "<urlset><url><loc>https://example.com</url></urlset>",
            "<urlset><url><loc>https://x.com/a</loc></url>",
            "<urlset><url><loc>https://x.com/a</loc></url><url><loc>https://x.com/b",
            "<urlset><url>",
        ] {
            let err = parse_sitemap(xml).unwrap_err();
            assert!(matches!(err, SitemapError::InvalidFormat(_)), "{}", xml);
        }
    }

    #[test]
    fn characters_forbidden_in_xml_are_invalid_url_format() {
        for xml in [
            "<urlset><url><loc>https://x.com/a&#1;</loc></url></urlset>",
            "<urlset><url>https://x.com/b&#x1F;</url></urlset>",
        ] {
            let err = parse_sitemap(xml).unwrap_err();
            assert!(matches!(err, SitemapError::InvalidUrlFormat(_)), "{}", xml);
        }
    }

    #[test]
    fn url_without_location_is_invalid_url_format() {
        for xml in [
            "<urlset><url/></urlset>",
            "<urlset><url><lastmod>2024-01-01</lastmod></url></urlset>",
            "<urlset><url><loc></loc></url></urlset>",
            "<urlset><url><loc>  </loc></url></urlset>",
        ] {
            let err = parse_sitemap(xml).unwrap_err();
            assert!(matches!(err, SitemapError::InvalidUrlFormat(_)), "{}", xml);
        }
    }
}
