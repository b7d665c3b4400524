//! Helpers for turning a track locator into a paused `rodio` sink.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};

use crate::error::{Error, Result};

/// Map a `file://` URL or plain path to an existing local file.
pub(crate) fn resolve_resource(url: &str) -> Result<PathBuf> {
    let path = if let Some(rest) = url.strip_prefix("file://") {
        PathBuf::from(rest)
    } else if url.contains("://") {
        return Err(Error::UnsupportedResource(url.to_string()));
    } else {
        PathBuf::from(url)
    };

    if !path.is_file() {
        return Err(Error::ResourceNotFound(path));
    }
    Ok(path)
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path)?;
    Decoder::new(BufReader::new(file)).map_err(|e| Error::Decode(format!("{}: {e}", path.display())))
}

/// Track length from tags, falling back to the decoder's own estimate.
pub(super) fn probe_duration(path: &Path) -> Result<Duration> {
    if let Ok(tagged) = lofty::read_from_path(path) {
        let d = tagged.properties().duration();
        if !d.is_zero() {
            return Ok(d);
        }
    }
    let decoder = open_decoder(path)?;
    Ok(decoder.total_duration().unwrap_or(Duration::ZERO))
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(mixer: &Mixer, path: &Path, start_at: Duration, volume: f32) -> Result<Sink> {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = open_decoder(path)?.skip_duration(start_at);

    let sink = Sink::connect_new(mixer);
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
