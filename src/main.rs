mod app;
mod catalog;
mod config;
mod error;
mod playback;
mod runtime;
mod ui;
mod widget;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
