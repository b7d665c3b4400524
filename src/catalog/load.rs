use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

use super::model::Catalog;

impl Catalog {
    /// Load a catalog document from `path`.
    ///
    /// Relative track locators are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let catalog = Self::from_toml_str(&text, base_dir)?;
        debug!(
            path = %path.display(),
            albums = catalog.albums.len(),
            news = catalog.news.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a TOML catalog document and normalize it.
    pub fn from_toml_str(text: &str, base_dir: &Path) -> Result<Self> {
        let mut catalog: Catalog = toml::from_str(text)?;
        for album in &mut catalog.albums {
            for track in &mut album.tracks {
                if let Some(resolved) = resolve_relative(&track.url, base_dir) {
                    track.url = resolved;
                }
            }
        }
        catalog.normalize()?;
        Ok(catalog)
    }

    /// Sort tracks by `order` and news newest-first, rejecting duplicate
    /// album ids, duplicate track orders within an album, and news dates
    /// that are not `YYYY-MM-DD`.
    pub fn normalize(&mut self) -> Result<()> {
        let mut ids: HashSet<&str> = HashSet::new();
        for album in &self.albums {
            if !ids.insert(album.id.as_str()) {
                return Err(Error::DuplicateAlbum(album.id.clone()));
            }
        }

        for album in &mut self.albums {
            album.tracks.sort_by_key(|t| t.order);
            if let Some(pair) = album.tracks.windows(2).find(|w| w[0].order == w[1].order) {
                return Err(Error::DuplicateTrackOrder {
                    album: album.id.clone(),
                    order: pair[0].order,
                });
            }
        }

        if let Some(item) = self.news.iter().find(|n| !is_iso_date(&n.date)) {
            return Err(Error::InvalidNewsDate {
                title: item.title.clone(),
                date: item.date.clone(),
            });
        }
        // Zero-padded ISO dates sort lexicographically.
        self.news.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(())
    }
}

/// `YYYY-MM-DD` with every field zero-padded.
fn is_iso_date(date: &str) -> bool {
    let b = date.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}

/// Join a scheme-less relative locator onto `base_dir`.
fn resolve_relative(url: &str, base_dir: &Path) -> Option<String> {
    if url.contains("://") {
        return None;
    }
    let path = Path::new(url);
    if path.is_absolute() {
        return None;
    }
    Some(base_dir.join(path).display().to_string())
}
