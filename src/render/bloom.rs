//! Bloom resource lifecycle.
//!
//! The bloom post-processor is optional and owned here. It is rebuilt on
//! resize, created lazily when toggled on, and disposed explicitly whenever
//! it is dropped from the slot. Creation failure never escapes: the setting
//! is switched off and persisted, and the user gets a non-fatal message.

use crate::context::ClientContext;
use crate::draw::{Color, Viewport};
use crate::error::RenderError;
use crate::events::ClientEvent;

/// Two-pass screen-space glow: `capture` before bright draws, `render` after.
pub trait PostProcessor {
    fn set_clear_color(&mut self, color: Color);
    /// Redirect subsequent draws into the capture target.
    fn capture(&mut self);
    /// Composite the captured bright regions back onto the frame.
    fn render(&mut self);
    /// Restore GPU state after the application regains its context.
    fn resume(&mut self);
    /// Release GPU resources. Must be idempotent.
    fn dispose(&mut self);
}

/// Builds post-processors sized for the current window.
pub trait PostProcessorFactory {
    fn create(&mut self, width: u32, height: u32) -> Result<Box<dyn PostProcessor>, RenderError>;
}

/// Lookup key of the message shown when bloom cannot be created.
pub const BLOOM_ERROR_KEY: &str = "error.bloom";

pub struct BloomSlot {
    factory: Box<dyn PostProcessorFactory>,
    bloom: Option<Box<dyn PostProcessor>>,
}

impl BloomSlot {
    pub fn new(factory: Box<dyn PostProcessorFactory>) -> Self {
        Self { factory, bloom: None }
    }

    pub fn is_active(&self) -> bool {
        self.bloom.is_some()
    }

    pub fn get_mut(&mut self) -> Option<&mut (dyn PostProcessor + 'static)> {
        self.bloom.as_deref_mut()
    }

    /// Dispose any existing bloom and build a fresh one.
    pub fn setup(&mut self, ctx: &mut ClientContext, viewport: Viewport) {
        self.dispose();

        match self.factory.create(viewport.width, viewport.height) {
            Ok(mut bloom) => {
                bloom.set_clear_color(Color::CLEAR);
                self.bloom = Some(bloom);
                tracing::info!(width = viewport.width, height = viewport.height, "bloom initialized");
            }
            Err(e) => {
                tracing::error!(error = %e, "bloom setup failed, disabling bloom");
                ctx.settings.get_mut().bloom = false;
                if let Err(e) = ctx.settings.save() {
                    tracing::warn!(error = %e, "could not persist bloom setting");
                }
                ctx.events.push(ClientEvent::ShowError {
                    key: BLOOM_ERROR_KEY.to_string(),
                });
            }
        }
    }

    /// Create bloom if enabling and absent; dispose it if disabling and present.
    pub fn toggle(&mut self, enabled: bool, ctx: &mut ClientContext, viewport: Viewport) {
        if enabled {
            if self.bloom.is_none() {
                self.setup(ctx, viewport);
                if self.is_active() {
                    ctx.events.push(ClientEvent::BloomToggled { enabled: true });
                }
            }
        } else if self.bloom.is_some() {
            self.dispose();
            ctx.events.push(ClientEvent::BloomToggled { enabled: false });
        }
    }

    pub fn resume(&mut self) {
        if let Some(bloom) = self.bloom.as_mut() {
            bloom.resume();
        }
    }

    pub fn dispose(&mut self) {
        if let Some(mut bloom) = self.bloom.take() {
            bloom.dispose();
            tracing::debug!("bloom disposed");
        }
    }
}
