//! Album list view: which rows exist, how they are wired to the coordinator,
//! and where the cursor is.
//!
//! Every collapsed album mounts only its first `collapsed_track_count` rows.
//! Mounting is what creates a widget, so unmounted tracks cost nothing and
//! cannot play until their album is expanded.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc::Sender;

use tracing::{debug, info, trace};

use crate::catalog::{Album, AlbumId, Catalog, NewsItem, Track};
use crate::config::Settings;
use crate::playback::{PlaybackCoordinator, RowSignal, TrackKey, TrackRow};
use crate::widget::{ChannelListener, WidgetEvent, WidgetFactory, WidgetMessage};

/// One selectable line of the album list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListLine {
    Album(usize),
    Track(TrackKey),
    /// Collapsed album footer with the number of hidden tracks.
    More { album: usize, hidden: usize },
}

/// The main application model.
pub struct App {
    pub artist: Option<String>,
    pub albums: Vec<Album>,
    pub news: Vec<NewsItem>,
    pub selected: usize,
    pub show_news: bool,
    pub volume: u8,

    coordinator: PlaybackCoordinator,
    expanded: HashSet<AlbumId>,
    rows: HashMap<TrackKey, TrackRow>,
    factory: Box<dyn WidgetFactory>,
    events_tx: Sender<WidgetMessage>,
    next_mount_id: u64,

    collapsed_track_count: usize,
    expand_on_advance: bool,
}

impl App {
    /// Create the view for `catalog` and mount the initially visible rows.
    pub fn new(
        catalog: Catalog,
        factory: Box<dyn WidgetFactory>,
        events_tx: Sender<WidgetMessage>,
        settings: &Settings,
    ) -> Self {
        let coordinator = PlaybackCoordinator::new(&catalog.albums);
        let mut app = Self {
            artist: catalog.artist,
            albums: catalog.albums,
            news: catalog.news,
            selected: 0,
            show_news: settings.ui.show_news,
            volume: settings.audio.volume.min(100),
            coordinator,
            expanded: HashSet::new(),
            rows: HashMap::new(),
            factory,
            events_tx,
            next_mount_id: 0,
            collapsed_track_count: settings.ui.collapsed_track_count,
            expand_on_advance: settings.ui.expand_on_advance,
        };
        app.sync_mounts();
        info!(
            albums = app.albums.len(),
            mounted = app.rows.len(),
            "album view ready"
        );
        app
    }

    pub fn coordinator(&self) -> &PlaybackCoordinator {
        &self.coordinator
    }

    pub fn row(&self, key: &TrackKey) -> Option<&TrackRow> {
        self.rows.get(key)
    }

    pub fn mounted_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_expanded(&self, album_id: &str) -> bool {
        self.expanded.contains(album_id)
    }

    pub fn has_been_played(&self, key: &TrackKey) -> bool {
        self.coordinator.has_been_played(key)
    }

    /// Whether the row for `(album_id, index)` should exist.
    pub fn should_mount_track(&self, album_id: &str, index: usize) -> bool {
        self.expanded.contains(album_id) || index < self.collapsed_track_count
    }

    /// Show or hide the tail of an album. Playback is left alone.
    pub fn toggle_expanded(&mut self, album_id: &str) {
        if !self.expanded.remove(album_id) {
            self.expanded.insert(album_id.to_string());
        }
        debug!(album = album_id, expanded = self.is_expanded(album_id), "album toggled");
        self.sync_mounts();
    }

    fn track(&self, key: &TrackKey) -> Option<(&Album, &Track)> {
        let album = self.albums.iter().find(|a| a.id == key.album_id)?;
        let track = album.tracks.get(key.index)?;
        Some((album, track))
    }

    /// Mount every row that should exist and drop the rest.
    ///
    /// The active row stays mounted even when its album collapses, so
    /// collapsing never cuts off playback.
    fn sync_mounts(&mut self) {
        let active = self.coordinator.active().cloned();
        let wanted: HashSet<TrackKey> = self
            .albums
            .iter()
            .flat_map(|a| (0..a.tracks.len()).map(move |i| TrackKey::new(a.id.clone(), i)))
            .filter(|k| self.should_mount_track(&k.album_id, k.index) || active.as_ref() == Some(k))
            .collect();

        // Dropping a row tears down its widget.
        self.rows.retain(|k, _| wanted.contains(k));

        let mut missing: Vec<TrackKey> = wanted
            .into_iter()
            .filter(|k| !self.rows.contains_key(k))
            .collect();
        missing.sort();
        for key in missing {
            self.mount(key);
        }

        self.propagate();
    }

    fn mount(&mut self, key: TrackKey) {
        let Some((album, track)) = self.track(&key) else {
            return;
        };
        let is_last = key.index + 1 == album.tracks.len();
        let track = track.clone();

        self.next_mount_id += 1;
        let mount_id = self.next_mount_id;
        let listener = ChannelListener::new(key.clone(), mount_id, self.events_tx.clone());
        let mut row = TrackRow::mount(
            key.clone(),
            &track,
            is_last,
            mount_id,
            self.factory.as_ref(),
            Box::new(listener),
        );
        row.set_volume(self.volume);
        self.rows.insert(key, row);
    }

    /// Push the coordinator's derived state into every mounted row.
    fn propagate(&mut self) {
        for (key, row) in self.rows.iter_mut() {
            row.apply_state(self.coordinator.row_state(key));
        }
    }

    /// Run after the active slot changed.
    fn after_transition(&mut self) {
        if let Some(active) = self.coordinator.active().cloned() {
            if !self.rows.contains_key(&active) && self.expand_on_advance {
                debug!(album = %active.album_id, "expanding album to follow playback");
                self.expanded.insert(active.album_id.clone());
            }
        }
        self.sync_mounts();
    }

    /// User pressed play/pause on a row.
    pub fn play_toggle(&mut self, key: &TrackKey) {
        let Some(row) = self.rows.get_mut(key) else {
            return;
        };
        if row.toggle_play() == Some(RowSignal::PlayRequested)
            && self.coordinator.request_play(key.clone())
        {
            self.after_transition();
        }
    }

    /// Route one widget event to its row.
    pub fn handle_widget_message(&mut self, msg: WidgetMessage) {
        let Some(row) = self.rows.get_mut(&msg.key) else {
            trace!(key = %msg.key, "event for unmounted row dropped");
            return;
        };
        if row.mount_id() != msg.mount_id {
            trace!(key = %msg.key, mount_id = msg.mount_id, "event from replaced widget dropped");
            return;
        }

        match msg.event {
            WidgetEvent::Ready { duration_ms } => row.on_ready(duration_ms),
            WidgetEvent::Progress {
                position_ms,
                duration_ms,
            } => row.on_progress(position_ms, duration_ms),
            WidgetEvent::Finish => {
                row.on_finish();
                if self.coordinator.report_finished(&msg.key) {
                    self.after_transition();
                }
            }
        }
    }

    /// Scrub the active track (or the selected one) by `delta` percent.
    pub fn scrub_by(&mut self, delta: f64) {
        let Some(key) = self
            .coordinator
            .active()
            .cloned()
            .or_else(|| self.selected_track())
        else {
            return;
        };
        if let Some(row) = self.rows.get_mut(&key) {
            let target = row.progress_pct() + delta;
            row.scrub(target);
        }
    }

    pub fn change_volume(&mut self, delta: i16) {
        self.volume = (i16::from(self.volume) + delta).clamp(0, 100) as u8;
        for row in self.rows.values_mut() {
            row.set_volume(self.volume);
        }
    }

    pub fn toggle_news(&mut self) {
        self.show_news = !self.show_news;
    }

    /// The active track with its album and row, if any.
    pub fn now_playing(&self) -> Option<(&Album, &Track, Option<&TrackRow>)> {
        let key = self.coordinator.active()?;
        let (album, track) = self.track(key)?;
        Some((album, track, self.rows.get(key)))
    }

    /// Lines of the album list in display order.
    pub fn visible_lines(&self) -> Vec<ListLine> {
        let mut lines = Vec::new();
        for (ai, album) in self.albums.iter().enumerate() {
            lines.push(ListLine::Album(ai));
            let expanded = self.is_expanded(&album.id);
            for ti in 0..album.tracks.len() {
                if expanded || ti < self.collapsed_track_count {
                    lines.push(ListLine::Track(TrackKey::new(album.id.clone(), ti)));
                }
            }
            let hidden = album.tracks.len().saturating_sub(self.collapsed_track_count);
            if !expanded && hidden > 0 {
                lines.push(ListLine::More { album: ai, hidden });
            }
        }
        lines
    }

    pub fn selected_line(&self) -> Option<ListLine> {
        self.visible_lines().into_iter().nth(self.selected)
    }

    fn selected_track(&self) -> Option<TrackKey> {
        match self.selected_line()? {
            ListLine::Track(k) => Some(k),
            _ => None,
        }
    }

    /// Enter/space on the selected line.
    pub fn activate_selected(&mut self) {
        let Some(line) = self.selected_line() else {
            return;
        };
        match line {
            ListLine::Track(key) => self.play_toggle(&key),
            ListLine::Album(ai) | ListLine::More { album: ai, .. } => {
                let id = self.albums[ai].id.clone();
                self.toggle_expanded(&id);
            }
        }
        self.clamp_selection();
    }

    /// Toggle expansion of the album the cursor is in.
    pub fn toggle_selected_album(&mut self) {
        let ai = match self.selected_line() {
            Some(ListLine::Album(ai)) | Some(ListLine::More { album: ai, .. }) => ai,
            Some(ListLine::Track(key)) => {
                match self.albums.iter().position(|a| a.id == key.album_id) {
                    Some(ai) => ai,
                    None => return,
                }
            }
            None => return,
        };
        let id = self.albums[ai].id.clone();
        self.toggle_expanded(&id);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_lines().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Move selection to the next line, wrapping around.
    pub fn next(&mut self) {
        let len = self.visible_lines().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous line, wrapping around.
    pub fn prev(&mut self) {
        let len = self.visible_lines().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible_lines().len().saturating_sub(1);
    }

    /// Move the cursor onto the active track, if it is visible.
    pub fn select_now_playing(&mut self) {
        let Some(active) = self.coordinator.active().cloned() else {
            return;
        };
        if let Some(pos) = self
            .visible_lines()
            .iter()
            .position(|l| *l == ListLine::Track(active.clone()))
        {
            self.selected = pos;
        }
    }

    /// Unmount every row, tearing down all widgets.
    pub fn shutdown(&mut self) {
        info!(mounted = self.rows.len(), "shutting down track widgets");
        self.rows.clear();
    }
}
