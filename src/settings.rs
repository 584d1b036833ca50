//! Persisted client settings.
//!
//! Settings are stored as a flat JSON object. Unknown keys are ignored and
//! missing keys fall back to their defaults, so older files keep loading.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_screenshake() -> i32 {
    4
}

fn default_ui_scale() -> f32 {
    1.0
}

/// User-facing graphics settings consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub bloom: bool,
    #[serde(default, rename = "animatedwater")]
    pub animated_water: bool,
    #[serde(default, rename = "animatedshields")]
    pub animated_shields: bool,
    /// Shake strength; 4 is the neutral multiplier
    #[serde(default = "default_screenshake", rename = "screenshake")]
    pub screen_shake: i32,
    /// UI scale factor (the base unit for camera scale bounds)
    #[serde(default = "default_ui_scale", rename = "uiscale")]
    pub ui_scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bloom: false,
            animated_water: false,
            animated_shields: false,
            screen_shake: default_screenshake(),
            ui_scale: default_ui_scale(),
        }
    }
}

/// Settings plus the file they persist to.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    settings: Settings,
}

impl SettingsStore {
    /// In-memory store; `save` is a no-op.
    pub fn in_memory(settings: Settings) -> Self {
        Self { path: None, settings }
    }

    /// Load settings from `path`, using defaults when the file does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let settings = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            settings,
        })
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the current settings back to disk.
    pub fn save(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"bloom": true}"#).unwrap();
        assert!(settings.bloom);
        assert!(!settings.animated_water);
        assert_eq!(settings.screen_shake, 4);
        assert_eq!(settings.ui_scale, 1.0);
    }

    #[test]
    fn test_keys_use_persisted_names() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert!(json.get("animatedwater").is_some());
        assert!(json.get("animatedshields").is_some());
        assert!(json.get("screenshake").is_some());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get(), &Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = SettingsStore::load(&path).unwrap();
        store.get_mut().bloom = true;
        store.get_mut().screen_shake = 8;
        store.save().unwrap();

        let reloaded = SettingsStore::load(&path).unwrap();
        assert!(reloaded.get().bloom);
        assert_eq!(reloaded.get().screen_shake, 8);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(SettingsStore::load(&path), Err(SettingsError::Json(_))));
    }

    #[test]
    fn test_in_memory_save_is_noop() {
        let store = SettingsStore::in_memory(Settings::default());
        assert!(store.save().is_ok());
        assert!(store.path().is_none());
    }
}
