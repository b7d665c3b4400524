use std::sync::mpsc::Sender;

use crate::playback::TrackKey;

use super::types::{WidgetEvent, WidgetListener, WidgetMessage};

/// Forwards widget events to the UI event loop.
///
/// Every widget runs on its own thread; funnelling their events through one
/// channel keeps all coordinator transitions on the UI thread.
pub struct ChannelListener {
    key: TrackKey,
    mount_id: u64,
    tx: Sender<WidgetMessage>,
}

impl ChannelListener {
    pub fn new(key: TrackKey, mount_id: u64, tx: Sender<WidgetMessage>) -> Self {
        Self { key, mount_id, tx }
    }

    fn send(&self, event: WidgetEvent) {
        // The receiver only goes away on shutdown.
        let _ = self.tx.send(WidgetMessage {
            key: self.key.clone(),
            mount_id: self.mount_id,
            event,
        });
    }
}

impl WidgetListener for ChannelListener {
    fn on_ready(&self, duration_ms: u64) {
        self.send(WidgetEvent::Ready { duration_ms });
    }

    fn on_progress(&self, position_ms: u64, duration_ms: u64) {
        self.send(WidgetEvent::Progress {
            position_ms,
            duration_ms,
        });
    }

    fn on_finish(&self) {
        self.send(WidgetEvent::Finish);
    }
}
