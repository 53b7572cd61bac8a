//! Persisted filter settings and presets
//!
//! A settings document holds the active rule set and a table of named presets.
//! See [`document`] for the exact JSON shape.

pub mod document;
mod presets;

use std::fs;
use std::path::Path;

use crate::error::SettingsError;
use crate::filter::FilterConfig;
use crate::output::to_pretty_json;

pub use document::{RulesDocument, SettingsDocument, SizeLimit};
pub use presets::PresetStore;

/// The active filter configuration plus saved presets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub filter: FilterConfig,
    pub presets: PresetStore,
}

impl Settings {
    pub fn from_document(doc: SettingsDocument) -> Self {
        Self {
            filter: FilterConfig::from(doc.rules),
            presets: PresetStore::from_document(doc.filter_presets),
        }
    }

    pub fn to_document(&self) -> SettingsDocument {
        SettingsDocument {
            rules: RulesDocument::from(&self.filter),
            filter_presets: self.presets.to_document(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<SettingsDocument>(text).map(Self::from_document)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        to_pretty_json(&self.to_document())
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a settings document, falling back to the built-in rules when the
    /// file is missing or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::debug!("no settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = self.to_json().map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Snapshot the active rules under `name`.
    pub fn save_preset(&mut self, name: &str) -> bool {
        self.presets.save(name, &self.filter)
    }

    /// Replace the active rules with a saved preset.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), SettingsError> {
        let config = self
            .presets
            .load(name)
            .ok_or_else(|| SettingsError::UnknownPreset(name.to_string()))?;
        self.filter = config;
        Ok(())
    }
}
