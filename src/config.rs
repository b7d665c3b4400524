//! Configuration loader and schema types.
//!
//! Settings drive the album view (mount limits, expansion), controls,
//! catalog location, and logging.

mod load;
mod schema;

pub use load::default_log_path;
pub use schema::*;

#[cfg(test)]
mod tests;
