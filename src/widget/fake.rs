//! Recording widget factory for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::types::{TrackWidget, WidgetFactory, WidgetListener};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Play,
    Pause,
    Seek(u64),
    SetVolume(u8),
    Teardown,
}

#[derive(Default)]
struct Shared {
    calls: Vec<(String, Call)>,
    created: Vec<String>,
    listeners: HashMap<String, Box<dyn WidgetListener>>,
}

/// Cloneable handle: keep one clone in the test, give the other to the view.
#[derive(Clone, Default)]
pub struct FakeWidgetFactory {
    shared: Rc<RefCell<Shared>>,
}

impl FakeWidgetFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded for widgets bound to `url`, oldest first.
    pub fn calls(&self, url: &str) -> Vec<Call> {
        self.shared
            .borrow()
            .calls
            .iter()
            .filter(|(u, _)| u == url)
            .map(|(_, c)| *c)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.shared.borrow_mut().calls.clear();
    }

    /// Locators of every widget created so far, in creation order.
    pub fn created(&self) -> Vec<String> {
        self.shared.borrow().created.clone()
    }

    pub fn fire_ready(&self, url: &str, duration_ms: u64) {
        self.with_listener(url, |l| l.on_ready(duration_ms));
    }

    pub fn fire_progress(&self, url: &str, position_ms: u64, duration_ms: u64) {
        self.with_listener(url, |l| l.on_progress(position_ms, duration_ms));
    }

    pub fn fire_finish(&self, url: &str) {
        self.with_listener(url, |l| l.on_finish());
    }

    fn with_listener(&self, url: &str, f: impl FnOnce(&dyn WidgetListener)) {
        let shared = self.shared.borrow();
        let listener = shared
            .listeners
            .get(url)
            .unwrap_or_else(|| panic!("no widget created for {url}"));
        f(listener.as_ref());
    }
}

impl WidgetFactory for FakeWidgetFactory {
    fn create(&self, resource_url: &str, listener: Box<dyn WidgetListener>) -> Box<dyn TrackWidget> {
        let mut shared = self.shared.borrow_mut();
        shared.created.push(resource_url.to_string());
        // Latest mount wins, like a real page replacing its embed.
        shared.listeners.insert(resource_url.to_string(), listener);
        Box::new(FakeWidget {
            url: resource_url.to_string(),
            shared: self.shared.clone(),
        })
    }
}

struct FakeWidget {
    url: String,
    shared: Rc<RefCell<Shared>>,
}

impl FakeWidget {
    fn record(&self, call: Call) {
        self.shared.borrow_mut().calls.push((self.url.clone(), call));
    }
}

impl TrackWidget for FakeWidget {
    fn play(&mut self) {
        self.record(Call::Play);
    }

    fn pause(&mut self) {
        self.record(Call::Pause);
    }

    fn seek(&mut self, position_ms: u64) {
        self.record(Call::Seek(position_ms));
    }

    fn set_volume(&mut self, percent: u8) {
        self.record(Call::SetVolume(percent));
    }

    fn teardown(&mut self) {
        self.record(Call::Teardown);
    }
}
