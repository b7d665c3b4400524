use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::Sink;
use rodio::mixer::Mixer;
use tracing::{debug, warn};

use super::sink::{create_sink_at, probe_duration, resolve_resource};
use super::types::{WidgetCmd, WidgetListener};

const TICK: Duration = Duration::from_millis(200);

/// Per-widget playback state owned by the widget thread.
struct Player<'a> {
    mixer: &'a Mixer,
    path: &'a Path,
    duration: Duration,
    sink: Option<Sink>,
    paused: bool,
    volume: f32,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Player<'_> {
    fn position(&self) -> Duration {
        let pos = self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        if self.duration.is_zero() {
            pos
        } else {
            pos.min(self.duration)
        }
    }

    fn play(&mut self) {
        if !self.paused {
            return;
        }
        if self.sink.is_none() {
            // Finished earlier; rebuild from the remembered offset.
            match create_sink_at(self.mixer, self.path, self.accumulated, self.volume) {
                Ok(s) => self.sink = Some(s),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "failed to reopen track");
                    return;
                }
            }
        }
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        self.paused = false;
        self.started_at = Some(Instant::now());
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
    }

    fn seek(&mut self, position: Duration) {
        let position = if self.duration.is_zero() {
            position
        } else {
            position.min(self.duration)
        };

        // Scrubbing: rebuild the sink and skip into the file.
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        match create_sink_at(self.mixer, self.path, position, self.volume) {
            Ok(s) => {
                if !self.paused {
                    s.play();
                }
                self.sink = Some(s);
            }
            Err(e) => warn!(path = %self.path.display(), error = %e, "seek failed"),
        }
        self.accumulated = position;
        self.started_at = if self.paused { None } else { Some(Instant::now()) };
    }

    fn set_volume(&mut self, percent: u8) {
        self.volume = f32::from(percent.min(100)) / 100.0;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.volume);
        }
    }

    fn finish(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }
}

pub(super) fn spawn_widget_thread(
    resource_url: String,
    mixer: Mixer,
    rx: Receiver<WidgetCmd>,
    listener: Box<dyn WidgetListener>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // Any failure while loading leaves the widget inert: it never reports
        // ready and every command is dropped.
        let path = match resolve_resource(&resource_url) {
            Ok(p) => p,
            Err(e) => {
                warn!(url = %resource_url, error = %e, "track widget stays inert");
                return;
            }
        };
        let duration = match probe_duration(&path) {
            Ok(d) => d,
            Err(e) => {
                warn!(url = %resource_url, error = %e, "track widget stays inert");
                return;
            }
        };
        let sink = match create_sink_at(&mixer, &path, Duration::ZERO, 1.0) {
            Ok(s) => s,
            Err(e) => {
                warn!(url = %resource_url, error = %e, "track widget stays inert");
                return;
            }
        };

        let mut player = Player {
            mixer: &mixer,
            path: &path,
            duration,
            sink: Some(sink),
            paused: true,
            volume: 1.0,
            started_at: None,
            accumulated: Duration::ZERO,
        };

        // Commands sent while loading are ignored; the owner re-issues play
        // once it sees the ready event.
        while let Ok(cmd) = rx.try_recv() {
            if cmd == WidgetCmd::Teardown {
                player.stop();
                return;
            }
        }

        let duration_ms = duration.as_millis() as u64;
        debug!(url = %resource_url, duration_ms, "track widget ready");
        listener.on_ready(duration_ms);

        loop {
            match rx.recv_timeout(TICK) {
                Ok(cmd) => match cmd {
                    WidgetCmd::Play => player.play(),
                    WidgetCmd::Pause => player.pause(),
                    WidgetCmd::Seek(ms) => {
                        player.seek(Duration::from_millis(ms));
                        listener.on_progress(player.position().as_millis() as u64, duration_ms);
                    }
                    WidgetCmd::SetVolume(p) => player.set_volume(p),
                    WidgetCmd::Teardown => {
                        player.stop();
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    if player.paused {
                        continue;
                    }
                    let drained = player.sink.as_ref().map_or(true, Sink::empty);
                    if drained {
                        player.finish();
                        listener.on_finish();
                    } else {
                        listener.on_progress(player.position().as_millis() as u64, duration_ms);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    player.stop();
                    break;
                }
            }
        }
        debug!(url = %resource_url, "track widget torn down");
    })
}
