/// Dispatch trace entry.
///
/// Each entry records which action a reducer handled and a short summary, in
/// dispatch order. The log is bounded; the oldest entries are dropped first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

pub const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug)]
pub struct EventBus {
    events: Vec<Event>,
    next_seq: u64,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            next_seq: 0,
            capacity: capacity.max(1),
        }
    }

    /// Records an event and returns its sequence number.
    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.events.len() == self.capacity {
            self.events.remove(0);
        }
        self.events.push(Event {
            seq,
            kind,
            message: message.into(),
        });
        seq
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count_kind(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Takes the recorded events; sequence numbers keep counting.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
