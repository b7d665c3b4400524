//! Application module: the album list view used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and owns the playback coordinator,
//! the mounted track rows, album expansion and the cursor.

mod model;

pub use model::*;
