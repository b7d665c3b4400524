use super::types::{TrackWidget, WidgetFactory, WidgetListener};

/// Used when no audio output is available: every widget ignores commands and
/// never becomes ready, so play buttons do nothing audible.
pub struct InertWidgetFactory;

struct InertWidget;

impl WidgetFactory for InertWidgetFactory {
    fn create(&self, _resource_url: &str, _listener: Box<dyn WidgetListener>) -> Box<dyn TrackWidget> {
        Box::new(InertWidget)
    }
}

impl TrackWidget for InertWidget {
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn seek(&mut self, _position_ms: u64) {}
    fn set_volume(&mut self, _percent: u8) {}
    fn teardown(&mut self) {}
}
