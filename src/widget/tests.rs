use std::sync::mpsc;

use super::sink::resolve_resource;
use super::*;
use crate::error::Error;
use crate::playback::TrackKey;

#[test]
fn resolve_resource_accepts_file_urls_and_plain_paths() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("song.mp3");
    std::fs::write(&file, b"bytes").unwrap();

    let url = format!("file://{}", file.display());
    assert_eq!(resolve_resource(&url).unwrap(), file);
    assert_eq!(resolve_resource(file.to_str().unwrap()).unwrap(), file);
}

#[test]
fn resolve_resource_rejects_remote_and_missing() {
    assert!(matches!(
        resolve_resource("https://soundcloud.com/artist/track"),
        Err(Error::UnsupportedResource(_))
    ));
    assert!(matches!(
        resolve_resource("/no/such/file.mp3"),
        Err(Error::ResourceNotFound(_))
    ));
}

#[test]
fn channel_listener_tags_events_with_key_and_mount() {
    let (tx, rx) = mpsc::channel();
    let key = TrackKey::new("a1", 2);
    let listener = ChannelListener::new(key.clone(), 7, tx);

    listener.on_ready(90_000);
    listener.on_progress(1_000, 90_000);
    listener.on_finish();

    let got: Vec<WidgetMessage> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            WidgetMessage {
                key: key.clone(),
                mount_id: 7,
                event: WidgetEvent::Ready { duration_ms: 90_000 },
            },
            WidgetMessage {
                key: key.clone(),
                mount_id: 7,
                event: WidgetEvent::Progress {
                    position_ms: 1_000,
                    duration_ms: 90_000,
                },
            },
            WidgetMessage {
                key,
                mount_id: 7,
                event: WidgetEvent::Finish,
            },
        ]
    );
}

#[test]
fn inert_factory_widgets_accept_commands_silently() {
    let (tx, rx) = mpsc::channel();
    let listener = ChannelListener::new(TrackKey::new("a", 0), 1, tx);
    let mut w = InertWidgetFactory.create("https://example.invalid/x", Box::new(listener));
    w.play();
    w.seek(10);
    w.set_volume(50);
    w.pause();
    w.teardown();
    assert!(rx.try_recv().is_err());
}
