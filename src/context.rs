//! Shared client state handed to the renderer at construction.

use crate::events::EventQueue;
use crate::settings::{Settings, SettingsStore};

/// Settings and event bus owned by the renderer for its lifetime.
#[derive(Debug, Default)]
pub struct ClientContext {
    pub settings: SettingsStore,
    pub events: EventQueue,
}

impl ClientContext {
    pub fn new(settings: SettingsStore) -> Self {
        Self {
            settings,
            events: EventQueue::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        self.settings.get()
    }

    /// Base unit for camera scale (the UI scale factor).
    pub fn scl(&self, value: f32) -> f32 {
        value * self.settings().ui_scale
    }
}
