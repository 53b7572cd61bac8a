//! On-disk shape of the settings document
//!
//! Key names and value encodings are fixed: sizes are plain numbers with the
//! literal string `"inf"` standing for an open upper bound, and dates are epoch
//! seconds or `null`. Every key is optional when reading.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::filter::FilterConfig;

/// One rule set as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesDocument {
    pub excluded_dirs: Vec<String>,
    pub excluded_dirs_regex: Vec<String>,
    pub excluded_files: Vec<String>,
    pub excluded_files_regex: Vec<String>,
    pub included_file_extensions: Vec<String>,
    pub included_file_regex: Vec<String>,
    #[serde(deserialize_with = "deserialize_byte_count")]
    pub min_file_size: u64,
    pub max_file_size: SizeLimit,
    pub min_creation_date: Option<f64>,
    pub max_creation_date: Option<f64>,
    pub min_modification_date: Option<f64>,
    pub max_modification_date: Option<f64>,
}

/// The whole settings document: the active rules plus named presets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsDocument {
    #[serde(flatten)]
    pub rules: RulesDocument,
    pub filter_presets: BTreeMap<String, RulesDocument>,
}

/// Upper size bound, written as a number or `"inf"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeLimit {
    Bytes(u64),
    #[default]
    Unbounded,
}

impl From<Option<u64>> for SizeLimit {
    fn from(value: Option<u64>) -> Self {
        value.map_or(SizeLimit::Unbounded, SizeLimit::Bytes)
    }
}

impl From<SizeLimit> for Option<u64> {
    fn from(value: SizeLimit) -> Self {
        match value {
            SizeLimit::Bytes(n) => Some(n),
            SizeLimit::Unbounded => None,
        }
    }
}

impl Serialize for SizeLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SizeLimit::Bytes(n) => serializer.serialize_u64(*n),
            SizeLimit::Unbounded => serializer.serialize_str("inf"),
        }
    }
}

impl<'de> Deserialize<'de> for SizeLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<RawSize>::deserialize(deserializer)? {
            None => Ok(SizeLimit::Unbounded),
            Some(raw) => raw.into_limit().map_err(de::Error::custom),
        }
    }
}

/// Sizes as they appear in documents written by different tools.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSize {
    Int(u64),
    Float(f64),
    Text(String),
}

impl RawSize {
    fn into_limit(self) -> Result<SizeLimit, String> {
        match self {
            RawSize::Int(n) => Ok(SizeLimit::Bytes(n)),
            RawSize::Float(f) => Ok(float_to_limit(f)),
            RawSize::Text(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("infinity") {
                    Ok(SizeLimit::Unbounded)
                } else {
                    s.parse::<f64>()
                        .map(float_to_limit)
                        .map_err(|_| format!("invalid size '{}'", s))
                }
            }
        }
    }
}

fn float_to_limit(f: f64) -> SizeLimit {
    if f.is_nan() || f.is_infinite() || f >= u64::MAX as f64 {
        SizeLimit::Unbounded
    } else if f <= 0.0 {
        SizeLimit::Bytes(0)
    } else {
        SizeLimit::Bytes(f as u64)
    }
}

fn deserialize_byte_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match Option::<RawSize>::deserialize(deserializer)? {
        None => Ok(0),
        Some(raw) => match raw.into_limit().map_err(de::Error::custom)? {
            SizeLimit::Bytes(n) => Ok(n),
            SizeLimit::Unbounded => Ok(u64::MAX),
        },
    }
}

pub(crate) fn epoch_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

pub(crate) fn datetime_to_epoch(dt: DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9
}

impl From<&FilterConfig> for RulesDocument {
    fn from(config: &FilterConfig) -> Self {
        Self {
            excluded_dirs: config.excluded_dir_names.iter().cloned().collect(),
            excluded_dirs_regex: config.excluded_dir_patterns.iter().map(String::from).collect(),
            excluded_files: config.excluded_file_names.iter().cloned().collect(),
            excluded_files_regex: config
                .excluded_file_patterns
                .iter()
                .map(String::from)
                .collect(),
            included_file_extensions: config.included_extensions.iter().cloned().collect(),
            included_file_regex: config
                .included_file_patterns
                .iter()
                .map(String::from)
                .collect(),
            min_file_size: config.min_size,
            max_file_size: config.max_size.into(),
            min_creation_date: config.min_created.map(datetime_to_epoch),
            max_creation_date: config.max_created.map(datetime_to_epoch),
            min_modification_date: config.min_modified.map(datetime_to_epoch),
            max_modification_date: config.max_modified.map(datetime_to_epoch),
        }
    }
}

impl From<RulesDocument> for FilterConfig {
    /// Missing keys become empty rule sets, not the built-in defaults.
    fn from(doc: RulesDocument) -> Self {
        let mut config = FilterConfig::empty();
        for name in &doc.excluded_dirs {
            config.add_excluded_dir(name);
        }
        for name in &doc.excluded_files {
            config.add_excluded_file(name);
        }
        for ext in &doc.included_file_extensions {
            config.add_included_extension(ext);
        }
        for pattern in doc.excluded_dirs_regex {
            config.excluded_dir_patterns.insert_lenient(pattern);
        }
        for pattern in doc.excluded_files_regex {
            config.excluded_file_patterns.insert_lenient(pattern);
        }
        for pattern in doc.included_file_regex {
            config.included_file_patterns.insert_lenient(pattern);
        }
        config.min_size = doc.min_file_size;
        config.max_size = doc.max_file_size.into();
        config.min_created = doc.min_creation_date.and_then(epoch_to_datetime);
        config.max_created = doc.max_creation_date.and_then(epoch_to_datetime);
        config.min_modified = doc.min_modification_date.and_then(epoch_to_datetime);
        config.max_modified = doc.max_modification_date.and_then(epoch_to_datetime);
        config
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_inf_max_size_is_unbounded() {
        let doc: RulesDocument = serde_json::from_str(r#"{"max_file_size": "inf"}"#).unwrap();
        assert_eq!(doc.max_file_size, SizeLimit::Unbounded);
        let config = FilterConfig::from(doc);
        assert_eq!(config.size_bounds(), (0, None));
    }

    #[test]
    fn test_numeric_sizes_accept_floats() {
        let doc: RulesDocument =
            serde_json::from_str(r#"{"min_file_size": 100.0, "max_file_size": 2048}"#).unwrap();
        assert_eq!(doc.min_file_size, 100);
        assert_eq!(doc.max_file_size, SizeLimit::Bytes(2048));
    }

    #[test]
    fn test_null_max_size_is_unbounded() {
        let doc: RulesDocument = serde_json::from_str(r#"{"max_file_size": null}"#).unwrap();
        assert_eq!(doc.max_file_size, SizeLimit::Unbounded);
    }

    #[test]
    fn test_garbage_size_is_an_error() {
        let result: Result<RulesDocument, _> =
            serde_json::from_str(r#"{"max_file_size": "lots"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_keys_mean_empty_rules() {
        let doc: RulesDocument = serde_json::from_str("{}").unwrap();
        let config = FilterConfig::from(doc);
        assert_eq!(config, FilterConfig::empty());
    }

    #[test]
    fn test_unbounded_serializes_as_inf() {
        let doc = RulesDocument::from(&FilterConfig::default());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["max_file_size"], "inf");
        assert_eq!(json["min_creation_date"], serde_json::Value::Null);
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = FilterConfig::default();
        config.add_excluded_dir_pattern(r"^tmp").unwrap();
        config.add_excluded_file("Thumbs.db");
        config.add_included_file_pattern(r"^Makefile$").unwrap();
        config.set_size_filters(10, Some(4096)).unwrap();
        config
            .set_modified_filters(Some(Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap()), None)
            .unwrap();

        let json = serde_json::to_string(&RulesDocument::from(&config)).unwrap();
        let back: RulesDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(FilterConfig::from(back), config);
    }

    #[test]
    fn test_invalid_stored_pattern_is_kept_but_inert() {
        let doc: RulesDocument =
            serde_json::from_str(r#"{"excluded_dirs_regex": ["(", "^build$"]}"#).unwrap();
        let config = FilterConfig::from(doc);
        assert_eq!(config.excluded_dir_patterns().len(), 2);
        assert!(config.is_excluded_dir("build"));
        assert!(!config.is_excluded_dir("("));
    }

    #[test]
    fn test_document_with_presets() {
        let json = r#"{
            "excluded_dirs": [".git"],
            "max_file_size": "inf",
            "filter_presets": {
                "web": {"included_file_extensions": [".html", ".css"], "max_file_size": 1000}
            }
        }"#;
        let doc: SettingsDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.rules.excluded_dirs, vec![".git".to_string()]);
        let web = &doc.filter_presets["web"];
        assert_eq!(web.max_file_size, SizeLimit::Bytes(1000));
        assert_eq!(web.included_file_extensions.len(), 2);
    }

    #[test]
    fn test_epoch_conversion() {
        let dt = epoch_to_datetime(1_700_000_000.5).unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
        assert_eq!(dt.timestamp_subsec_millis(), 500);
        assert_eq!(datetime_to_epoch(dt), 1_700_000_000.5);
        assert!(epoch_to_datetime(f64::NAN).is_none());
    }
}
