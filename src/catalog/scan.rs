use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::playback::format_mmss;

use super::model::{Album, Catalog, Track};

struct ScannedFile {
    path: PathBuf,
    title: String,
    album: Option<String>,
    track_number: Option<u32>,
    duration_ms: Option<u64>,
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Tags that report a zero length mean "unknown", not "00:00".
fn known_duration_ms(d: Duration) -> Option<u64> {
    (!d.is_zero()).then(|| d.as_millis() as u64)
}

fn read_file(path: &Path) -> ScannedFile {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut album: Option<String> = None;
    let mut track_number: Option<u32> = None;
    let mut duration_ms: Option<u64> = None;

    if let Ok(tagged) = lofty::read_from_path(path) {
        duration_ms = known_duration_ms(tagged.properties().duration());

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.get_string(ItemKey::TrackTitle) {
                if !v.trim().is_empty() {
                    title = v.trim().to_string();
                }
            }
            if let Some(v) = tag.get_string(ItemKey::AlbumTitle) {
                let v = v.trim();
                if !v.is_empty() {
                    album = Some(v.to_string());
                }
            }
            // "3" and "3/12" are both common.
            track_number = tag
                .get_string(ItemKey::TrackNumber)
                .and_then(|v| v.split('/').next())
                .and_then(|v| v.trim().parse().ok());
        }
    }

    ScannedFile {
        path: path.to_path_buf(),
        title,
        album,
        track_number,
        duration_ms,
    }
}

/// Build a catalog from a music directory: one album per directory that
/// directly contains audio files.
pub fn scan_albums(dir: &Path, settings: &LibrarySettings) -> Catalog {
    let mut by_dir: BTreeMap<PathBuf, Vec<ScannedFile>> = BTreeMap::new();

    for entry in WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() && is_audio_file(path, settings) {
            let parent = path.parent().unwrap_or(dir).to_path_buf();
            by_dir.entry(parent).or_default().push(read_file(path));
        }
    }

    let mut albums = Vec::with_capacity(by_dir.len());
    for (album_dir, mut files) in by_dir {
        files.sort_by(|a, b| {
            let ka = a.track_number.unwrap_or(u32::MAX);
            let kb = b.track_number.unwrap_or(u32::MAX);
            ka.cmp(&kb).then_with(|| a.path.cmp(&b.path))
        });

        let dir_name = album_dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown album")
            .to_string();
        let title = files
            .iter()
            .find_map(|f| f.album.clone())
            .unwrap_or_else(|| dir_name.clone());
        let id = match album_dir.strip_prefix(dir) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
            _ => dir_name,
        };

        let tracks = files
            .into_iter()
            .enumerate()
            .map(|(i, f)| Track {
                id: format!("{id}#{i}"),
                title: f.title,
                duration: f.duration_ms.map(format_mmss).unwrap_or_default(),
                url: format!("file://{}", f.path.display()),
                order: i as i64,
            })
            .collect::<Vec<_>>();

        debug!(album = %id, tracks = tracks.len(), "scanned album");
        albums.push(Album {
            id,
            title,
            year: None,
            tracks,
        });
    }

    Catalog {
        artist: None,
        albums,
        news: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_groups_files_by_directory_in_file_name_order() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("first");
        let b = dir.path().join("second");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(a.join("02 b.mp3"), b"not a real mp3").unwrap();
        fs::write(a.join("01 a.mp3"), b"not a real mp3").unwrap();
        fs::write(a.join("cover.jpg"), b"ignore me").unwrap();
        fs::write(b.join("x.ogg"), b"not a real ogg").unwrap();

        let catalog = scan_albums(dir.path(), &LibrarySettings::default());
        assert_eq!(catalog.albums.len(), 2);

        let first = &catalog.albums[0];
        assert_eq!(first.id, "first");
        assert_eq!(first.title, "first");
        let titles: Vec<&str> = first.tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["01 a", "02 b"]);
        assert_eq!(first.tracks[0].order, 0);
        assert_eq!(first.tracks[1].order, 1);
        assert!(first.tracks[0].url.starts_with("file://"));

        assert_eq!(catalog.albums[1].tracks.len(), 1);
    }

    #[test]
    fn zero_length_tags_leave_the_duration_unknown() {
        assert_eq!(known_duration_ms(Duration::ZERO), None);
        assert_eq!(known_duration_ms(Duration::from_millis(221_400)), Some(221_400));
    }

    #[test]
    fn scan_skips_hidden_directories_by_default() {
        let dir = tempdir().unwrap();
        let hidden = dir.path().join(".trash");
        fs::create_dir_all(&hidden).unwrap();
        fs::write(hidden.join("gone.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("kept.mp3"), b"not real").unwrap();

        let catalog = scan_albums(dir.path(), &LibrarySettings::default());
        assert_eq!(catalog.albums.len(), 1);
        assert_eq!(catalog.albums[0].tracks[0].title, "kept");

        let settings = LibrarySettings {
            include_hidden: true,
            ..LibrarySettings::default()
        };
        assert_eq!(scan_albums(dir.path(), &settings).albums.len(), 2);
    }
}
