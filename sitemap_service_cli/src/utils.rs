use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::errors::{Result, SitemapError};

pub fn save_json<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| SitemapError::Serialize(e.to_string()))?;
    save_text(&json, path)
}

pub fn save_text(content: &str, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    tracing::info!(path = %path.display(), "wrote file");
    Ok(())
}
