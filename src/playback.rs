//! Sequential playback: the coordinator state machine and the per-track row.

mod coordinator;
mod row;
mod types;

pub use coordinator::{PlaybackCoordinator, derive_row_state};
pub use row::{TrackRow, format_mmss};
pub use types::*;
