use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use rodio::{OutputStream, OutputStreamBuilder};
use tracing::info;

use crate::error::{Error, Result};

use super::thread::spawn_widget_thread;
use super::types::{TrackWidget, WidgetCmd, WidgetFactory, WidgetListener};

/// Creates one rodio-backed player thread per track, all mixed into the
/// default output device.
pub struct RodioWidgetFactory {
    stream: OutputStream,
}

impl RodioWidgetFactory {
    pub fn new() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| Error::AudioOutput(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        info!("audio output opened");
        Ok(Self { stream })
    }
}

impl WidgetFactory for RodioWidgetFactory {
    fn create(&self, resource_url: &str, listener: Box<dyn WidgetListener>) -> Box<dyn TrackWidget> {
        let (tx, rx) = mpsc::channel::<WidgetCmd>();
        let join = spawn_widget_thread(
            resource_url.to_string(),
            self.stream.mixer().clone(),
            rx,
            listener,
        );
        Box::new(RodioWidget {
            tx,
            join: Some(join),
        })
    }
}

pub struct RodioWidget {
    tx: Sender<WidgetCmd>,
    join: Option<JoinHandle<()>>,
}

impl RodioWidget {
    fn send(&self, cmd: WidgetCmd) {
        // An inert widget's thread has already exited; dropping the command is the contract.
        let _ = self.tx.send(cmd);
    }
}

impl TrackWidget for RodioWidget {
    fn play(&mut self) {
        self.send(WidgetCmd::Play);
    }

    fn pause(&mut self) {
        self.send(WidgetCmd::Pause);
    }

    fn seek(&mut self, position_ms: u64) {
        self.send(WidgetCmd::Seek(position_ms));
    }

    fn set_volume(&mut self, percent: u8) {
        self.send(WidgetCmd::SetVolume(percent.min(100)));
    }

    fn teardown(&mut self) {
        self.send(WidgetCmd::Teardown);
        // Detach: the thread exits on its own and may still be probing the file.
        self.join.take();
    }
}
