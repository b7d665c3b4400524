use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::config;
use crate::ui;
use crate::widget::WidgetMessage;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    pending_zz: bool,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Main terminal event loop: delivers widget events, draws, handles input.
/// Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    events_rx: &mpsc::Receiver<WidgetMessage>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Widget threads only talk to us through this channel.
        while let Ok(msg) = events_rx.try_recv() {
            app.handle_widget_message(msg);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the user asked to quit.
pub fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    state: &mut EventLoopState,
) -> bool {
    if key.code != KeyCode::Char('z') {
        state.pending_zz = false;
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            debug!("quit requested");
            return true;
        }
        KeyCode::Char('z') => {
            state.pending_gg = false;
            if state.pending_zz {
                state.pending_zz = false;
                app.select_now_playing();
            } else {
                state.pending_zz = true;
            }
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.select_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.prev();
        }
        KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            app.activate_selected();
        }
        KeyCode::Char('e') => {
            state.pending_gg = false;
            app.toggle_selected_album();
        }
        KeyCode::Char('L') => {
            state.pending_gg = false;
            app.scrub_by(f64::from(settings.controls.scrub_percent));
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            app.scrub_by(-f64::from(settings.controls.scrub_percent));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.pending_gg = false;
            app.change_volume(i16::from(settings.controls.volume_step));
        }
        KeyCode::Char('-') => {
            state.pending_gg = false;
            app.change_volume(-i16::from(settings.controls.volume_step));
        }
        KeyCode::Char('n') => {
            state.pending_gg = false;
            app.toggle_news();
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    false
}
