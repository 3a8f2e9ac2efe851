use foundation::time::Time;

/// Minimal event type for traceability.
///
/// Events are structured text stamped with the time they were emitted.
/// The web shell drains them to the browser console; tests assert on them
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: Time,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, time: Time, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            time,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use foundation::time::Time;

    #[test]
    fn records_events_with_time() {
        let mut bus = EventBus::new();
        bus.emit(Time(2.5), "test", "hello");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].time, Time(2.5));
        assert_eq!(bus.events()[0].kind, "test");
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Time::ZERO, "k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
