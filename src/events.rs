//! Client event bus for decoupled communication.
//!
//! The renderer pushes events, the application shell drains them at the end
//! of the frame (to show messages, log teardown, etc.).

/// Events emitted by client subsystems
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The renderer released its resources
    Dispose,
    /// A non-fatal error the user should see; `key` is a bundle lookup key
    ShowError { key: String },
    /// Bloom was switched on or off
    BloomToggled { enabled: bool },
}

/// Simple event queue - events are pushed during update, processed at end of frame
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<ClientEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event to be processed later
    pub fn push(&mut self, event: ClientEvent) {
        self.events.push(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = ClientEvent> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Pending events, oldest first
    pub fn pending(&self) -> &[ClientEvent] {
        &self.events
    }
}
