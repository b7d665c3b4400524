use std::env;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::catalog::{Catalog, scan_albums};
use crate::config::Settings;
use crate::widget::{InertWidgetFactory, RodioWidgetFactory, WidgetFactory, WidgetMessage};

mod event_loop;
mod logging;
mod settings;

/// Pick the catalog source: CLI argument, then `catalog.path`, then the
/// current directory.
fn catalog_source(arg: Option<String>, settings: &Settings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| settings.catalog.path.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// A `.toml` file is a catalog document; anything else is scanned as a music folder.
fn load_catalog(source: &Path, settings: &Settings) -> crate::error::Result<Catalog> {
    let is_document = source.is_file()
        && source
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
    if is_document {
        Catalog::load(source)
    } else {
        Ok(scan_albums(source, &settings.library))
    }
}

fn widget_factory() -> Box<dyn WidgetFactory> {
    match RodioWidgetFactory::new() {
        Ok(f) => Box::new(f),
        Err(e) => {
            warn!(error = %e, "no audio output, tracks will not play");
            Box::new(InertWidgetFactory)
        }
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_problem) = settings::load_settings();
    let log_file = logging::init(&settings.logging);
    if let Some(msg) = settings_problem {
        warn!("{msg}");
    }
    info!(log_file = ?log_file, "encore starting");

    let source = catalog_source(env::args().nth(1), &settings);
    let catalog = load_catalog(&source, &settings)?;
    info!(source = %source.display(), albums = catalog.albums.len(), "catalog ready");

    let (events_tx, events_rx) = mpsc::channel::<WidgetMessage>();
    let mut app = App::new(catalog, widget_factory(), events_tx, &settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new();
        event_loop::run(&mut terminal, &settings, &mut app, &events_rx, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown();
    info!("encore stopped");
    run_result
}
