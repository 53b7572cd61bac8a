//! Named filter presets

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::SettingsError;
use crate::filter::FilterConfig;
use crate::output::to_pretty_json;

use super::document::RulesDocument;

/// Saved snapshots of filter configurations, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetStore {
    presets: BTreeMap<String, FilterConfig>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot of `config` under `name`, replacing any previous one.
    /// Returns true if a preset with that name already existed.
    pub fn save(&mut self, name: &str, config: &FilterConfig) -> bool {
        self.presets.insert(name.to_string(), config.clone()).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&FilterConfig> {
        self.presets.get(name)
    }

    /// A fresh copy of the preset, ready to replace the active configuration.
    pub fn load(&self, name: &str) -> Option<FilterConfig> {
        self.presets.get(name).cloned()
    }

    pub fn delete(&mut self, name: &str) -> bool {
        self.presets.remove(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.presets.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub(crate) fn to_document(&self) -> BTreeMap<String, RulesDocument> {
        self.presets
            .iter()
            .map(|(name, config)| (name.clone(), RulesDocument::from(config)))
            .collect()
    }

    pub(crate) fn from_document(doc: BTreeMap<String, RulesDocument>) -> Self {
        Self {
            presets: doc
                .into_iter()
                .map(|(name, rules)| (name, FilterConfig::from(rules)))
                .collect(),
        }
    }

    /// Read a standalone presets file (a JSON object of name to rule set).
    pub fn load_file(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: BTreeMap<String, RulesDocument> =
            serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_document(doc))
    }

    /// Like [`PresetStore::load_file`], but an unreadable or malformed file
    /// yields an empty store.
    pub fn load_file_or_empty(path: &Path) -> Self {
        Self::load_file(path).unwrap_or_else(|e| {
            tracing::warn!("{}; starting with no presets", e);
            Self::new()
        })
    }

    pub fn save_file(&self, path: &Path) -> Result<(), SettingsError> {
        let json = to_pretty_json(&self.to_document()).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
