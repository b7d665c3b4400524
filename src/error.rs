//! Crate-wide error type.
//!
//! Catalog and startup failures propagate through `Result`; per-track widget
//! failures are logged by the widget thread and never reach the caller.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Settings could not be read or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// The catalog document is not valid TOML or has the wrong shape.
    #[error("catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),

    /// Two albums share the same id.
    #[error("duplicate album id {0:?}")]
    DuplicateAlbum(String),

    /// Two tracks of one album share the same `order` value.
    #[error("album {album:?} has more than one track with order {order}")]
    DuplicateTrackOrder { album: String, order: i64 },

    /// A news date is not a zero-padded `YYYY-MM-DD` date.
    #[error("news item {title:?} has date {date:?}, expected YYYY-MM-DD")]
    InvalidNewsDate { title: String, date: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No usable audio output device.
    #[error("audio output error: {0}")]
    AudioOutput(String),

    /// A track locator uses a scheme the widgets cannot play.
    #[error("unsupported resource locator {0:?}")]
    UnsupportedResource(String),

    #[error("resource not found: {0}")]
    ResourceNotFound(PathBuf),

    #[error("decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
