//! Traits and messages shared by every track widget implementation.
//!
//! A widget wraps one embedded player bound to one track locator. Commands
//! flow in through `TrackWidget`; events flow out through the single
//! `WidgetListener` handed over at construction.

use crate::playback::TrackKey;

/// Receives the events of exactly one widget.
pub trait WidgetListener: Send {
    /// The player finished loading and accepts commands.
    fn on_ready(&self, duration_ms: u64);
    /// Periodic position update while playing, and after seeks.
    fn on_progress(&self, position_ms: u64, duration_ms: u64);
    /// Playback reached the end of the track.
    fn on_finish(&self);
}

/// Imperative control surface of one player.
///
/// Commands issued before the widget is ready are ignored. `play` and
/// `pause` are idempotent.
pub trait TrackWidget {
    fn play(&mut self);
    fn pause(&mut self);
    /// Absolute seek, clamped to `[0, duration]` by the player.
    fn seek(&mut self, position_ms: u64);
    /// `percent` is clamped to `0..=100`.
    fn set_volume(&mut self, percent: u8);
    /// Stop playback and release the player. The listener receives nothing afterwards.
    fn teardown(&mut self);
}

/// Builds widgets. Injected into the album view so tests can swap in fakes.
pub trait WidgetFactory {
    fn create(&self, resource_url: &str, listener: Box<dyn WidgetListener>) -> Box<dyn TrackWidget>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    Ready { duration_ms: u64 },
    Progress { position_ms: u64, duration_ms: u64 },
    Finish,
}

/// A widget event tagged with the row it belongs to.
///
/// `mount_id` distinguishes a remounted row from the one that was torn down,
/// so late events from a dead widget can be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetMessage {
    pub key: TrackKey,
    pub mount_id: u64,
    pub event: WidgetEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WidgetCmd {
    Play,
    Pause,
    Seek(u64),
    SetVolume(u8),
    Teardown,
}
