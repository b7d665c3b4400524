//! The single source of truth for "which track is playing".
//!
//! At most one `TrackKey` is active at any time, across every album on the
//! page. Rows never talk to each other; they read their `RowState` from here.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::catalog::{Album, AlbumId};

use super::types::{RowState, TrackKey};

/// Pure derivation of a row's state from the active slot.
///
/// When nothing is active no row is told to stop, so a user-paused track
/// keeps its resume position.
pub fn derive_row_state(active: Option<&TrackKey>, key: &TrackKey) -> RowState {
    let is_active = active == Some(key);
    RowState {
        is_active,
        should_stop: active.is_some() && !is_active,
    }
}

#[derive(Debug, Default)]
pub struct PlaybackCoordinator {
    active: Option<TrackKey>,
    played: HashSet<TrackKey>,
    album_lengths: HashMap<AlbumId, usize>,
}

impl PlaybackCoordinator {
    pub fn new(albums: &[Album]) -> Self {
        Self {
            active: None,
            played: HashSet::new(),
            album_lengths: albums
                .iter()
                .map(|a| (a.id.clone(), a.tracks.len()))
                .collect(),
        }
    }

    pub fn active(&self) -> Option<&TrackKey> {
        self.active.as_ref()
    }

    fn exists(&self, key: &TrackKey) -> bool {
        self.album_lengths
            .get(&key.album_id)
            .is_some_and(|&len| key.index < len)
    }

    /// Make `key` the active track. Returns whether the active slot changed.
    pub fn request_play(&mut self, key: TrackKey) -> bool {
        if !self.exists(&key) {
            warn!(%key, "play requested for unknown track");
            return false;
        }
        if self.active.as_ref() == Some(&key) {
            return false;
        }
        debug!(%key, previous = ?self.active, "active track set");
        self.played.insert(key.clone());
        self.active = Some(key);
        true
    }

    /// Advance past a finished track: the next track of the same album
    /// becomes active, or nothing does at the end of the album.
    ///
    /// Reports from a track that is not the active one are stale and ignored.
    /// Returns whether the active slot changed.
    pub fn report_finished(&mut self, key: &TrackKey) -> bool {
        if self.active.as_ref() != Some(key) {
            debug!(%key, active = ?self.active, "ignoring finish from inactive track");
            return false;
        }

        let next = key.next();
        if self.exists(&next) {
            debug!(from = %key, to = %next, "advancing within album");
            self.played.insert(next.clone());
            self.active = Some(next);
        } else {
            debug!(%key, "album finished");
            self.active = None;
        }
        true
    }

    pub fn row_state(&self, key: &TrackKey) -> RowState {
        derive_row_state(self.active.as_ref(), key)
    }

    /// Whether `key` was started at least once this session.
    pub fn has_been_played(&self, key: &TrackKey) -> bool {
        self.played.contains(key)
    }
}
