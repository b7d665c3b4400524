//! Album, track and news content handed to the page.
//!
//! A catalog comes either from a TOML document or from scanning a music
//! directory; both paths produce tracks sorted by their `order` field.

mod load;
mod model;
mod scan;

pub use model::*;
pub use scan::scan_albums;
