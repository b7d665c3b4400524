use std::fmt;

use crate::catalog::AlbumId;

/// Identity of one track slot on the page: album plus position in the
/// album's ordered track list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackKey {
    pub album_id: AlbumId,
    pub index: usize,
}

impl TrackKey {
    pub fn new(album_id: impl Into<AlbumId>, index: usize) -> Self {
        Self {
            album_id: album_id.into(),
            index,
        }
    }

    /// The following slot in the same album (which may not exist).
    pub fn next(&self) -> Self {
        Self {
            album_id: self.album_id.clone(),
            index: self.index + 1,
        }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.album_id, self.index)
    }
}

/// What a row should be doing, derived from the coordinator's active slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowState {
    pub is_active: bool,
    /// Another track is active; this row must stop and forget its position.
    pub should_stop: bool,
}

/// Notifications a row sends up to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSignal {
    /// The user pressed play on this row.
    PlayRequested,
    /// The row's track played to the end.
    Finished,
}
