use serde::Deserialize;

/// Opaque album identity, unique within a catalog.
pub type AlbumId = String;

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    /// Display label such as `"3:41"`. Real timing comes from the player.
    #[serde(default)]
    pub duration: String,
    /// Playable resource locator (`file://` URL or path).
    pub url: String,
    pub order: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsItem {
    pub title: String,
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub date: String,
    #[serde(default)]
    pub summary: String,
}

/// Everything the page needs, already materialized.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub news: Vec<NewsItem>,
}
