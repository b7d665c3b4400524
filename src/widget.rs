//! Track widgets: one embedded player per track.
//!
//! `types` defines the capability traits, `player`/`thread`/`sink` implement
//! them on top of `rodio`, and `listener` bridges widget events back to the
//! UI thread.

mod inert;
mod listener;
mod player;
mod sink;
mod thread;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use inert::InertWidgetFactory;
pub use listener::ChannelListener;
pub use player::RodioWidgetFactory;
pub use types::*;

#[cfg(test)]
mod tests;
