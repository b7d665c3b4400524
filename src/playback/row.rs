use tracing::trace;

use crate::catalog::Track;
use crate::widget::{TrackWidget, WidgetFactory, WidgetListener};

use super::types::{RowSignal, RowState, TrackKey};

/// Format milliseconds as `MM:SS`.
pub fn format_mmss(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Transport state for one mounted track, bound 1:1 to a widget.
///
/// The row tells "the coordinator demoted me" (`should_stop` rising) apart
/// from "the user paused me" (`toggle_play`): only the former discards the
/// resume position.
pub struct TrackRow {
    key: TrackKey,
    mount_id: u64,
    duration_label: String,
    is_last_in_album: bool,
    widget: Box<dyn TrackWidget>,

    ready: bool,
    // Play once the widget reports ready.
    pending_play: bool,
    playing: bool,
    volume: u8,

    resume_ms: u64,
    duration_ms: u64,
    progress_pct: f64,
    time_label: String,

    last_state: RowState,
}

impl TrackRow {
    /// Mount a row for `track` and create its widget.
    pub fn mount(
        key: TrackKey,
        track: &Track,
        is_last_in_album: bool,
        mount_id: u64,
        factory: &dyn WidgetFactory,
        listener: Box<dyn WidgetListener>,
    ) -> Self {
        let widget = factory.create(&track.url, listener);
        trace!(%key, mount_id, url = %track.url, "row mounted");
        Self {
            key,
            mount_id,
            duration_label: track.duration.clone(),
            is_last_in_album,
            widget,
            ready: false,
            pending_play: false,
            playing: false,
            volume: 100,
            resume_ms: 0,
            duration_ms: 0,
            progress_pct: 0.0,
            time_label: track.duration.clone(),
            last_state: RowState::default(),
        }
    }

    pub fn mount_id(&self) -> u64 {
        self.mount_id
    }

    pub fn is_last_in_album(&self) -> bool {
        self.is_last_in_album
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Remaining time, or the catalog's duration label before any playback.
    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    /// Displayed progress in percent (0-100).
    pub fn progress_pct(&self) -> f64 {
        self.progress_pct
    }

    pub fn resume_ms(&self) -> u64 {
        self.resume_ms
    }

    /// User pressed play/pause on this row.
    pub fn toggle_play(&mut self) -> Option<RowSignal> {
        if self.playing {
            self.widget.pause();
            self.playing = false;
            self.pending_play = false;
            return None;
        }

        // The player already holds the position: a user pause keeps it, and
        // a reset or finish rewinds it to zero. A widget that is not ready
        // ignores the call; the ready gate picks it up when the coordinator
        // activates this row.
        self.widget.play();
        self.playing = self.ready;
        Some(RowSignal::PlayRequested)
    }

    /// React to a new derived state. Only rising edges trigger work.
    pub fn apply_state(&mut self, state: RowState) {
        let prev = self.last_state;
        self.last_state = state;

        if state.is_active && !prev.is_active {
            self.start();
        }
        if state.should_stop && !prev.should_stop {
            self.stop_and_reset();
        }
    }

    fn start(&mut self) {
        if self.ready {
            self.widget.play();
            self.playing = true;
        } else {
            self.pending_play = true;
        }
    }

    fn stop_and_reset(&mut self) {
        self.widget.pause();
        // Rewind the player too, so a later activation starts from the top.
        self.widget.seek(0);
        self.playing = false;
        self.pending_play = false;
        self.resume_ms = 0;
        self.progress_pct = 0.0;
        self.time_label = self.full_duration_label();
    }

    fn full_duration_label(&self) -> String {
        if self.duration_ms > 0 {
            format_mmss(self.duration_ms)
        } else {
            self.duration_label.clone()
        }
    }

    pub fn on_ready(&mut self, duration_ms: u64) {
        self.ready = true;
        self.duration_ms = duration_ms;
        if self.resume_ms == 0 {
            self.time_label = self.full_duration_label();
        }
        self.widget.set_volume(self.volume);
        if self.pending_play {
            self.pending_play = false;
            self.widget.play();
            self.playing = true;
        }
    }

    pub fn on_progress(&mut self, position_ms: u64, duration_ms: u64) {
        // Late ticks from before a pause or stop must not resurrect a reset position.
        if !self.playing {
            return;
        }
        self.duration_ms = duration_ms;
        self.resume_ms = position_ms;
        self.time_label = format_mmss(duration_ms.saturating_sub(position_ms));
        self.progress_pct = if duration_ms > 0 {
            (position_ms as f64 / duration_ms as f64 * 100.0).min(100.0)
        } else {
            0.0
        };
    }

    /// The track ended. The view forwards the signal to the coordinator,
    /// which advances or clears depending on whether a next track exists.
    pub fn on_finish(&mut self) -> RowSignal {
        self.playing = false;
        self.pending_play = false;
        self.resume_ms = 0;
        self.progress_pct = 0.0;
        self.time_label = self.full_duration_label();
        RowSignal::Finished
    }

    /// Seek to `percent` of the track and show it immediately.
    pub fn scrub(&mut self, percent: f64) {
        if self.duration_ms == 0 {
            return;
        }
        let percent = percent.clamp(0.0, 100.0);
        let position_ms = (self.duration_ms as f64 * percent / 100.0) as u64;
        self.widget.seek(position_ms);
        self.resume_ms = position_ms;
        self.progress_pct = percent;
        self.time_label = format_mmss(self.duration_ms.saturating_sub(position_ms));
    }

    pub fn set_volume(&mut self, percent: u8) {
        self.volume = percent.min(100);
        if self.ready {
            self.widget.set_volume(self.volume);
        }
    }
}

impl Drop for TrackRow {
    fn drop(&mut self) {
        self.widget.teardown();
        trace!(key = %self.key, mount_id = self.mount_id, "row unmounted");
    }
}
