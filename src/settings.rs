//! # Settings Module
//!
//! ## Purpose
//! Central configuration of ChemCalc: where PubChem lives, how long to wait for it, where atomic
//! weights come from and how much to log. Stored as JSON next to the executable's working directory.
//!
//! ## Architecture
//! - **AppConfig**: Serializable configuration structure, every field has a default
//! - **ElementSourceKind**: built-in table, PubChem periodic table or a user JSON file
//! - **ConfigManager**: load, validate, update and persist the configuration file
//!
//! ## Configuration Format
//! ```json
//! {
//!   "pubchem_base_url": "https://pubchem.ncbi.nlm.nih.gov/rest/pug",
//!   "image_size": 400,
//!   "max_synonyms": 5,
//!   "timeout_secs": 10,
//!   "element_source": "builtin",
//!   "log_level": "warn",
//!   "log_file": null
//! }
//! ```
//! `element_source` is `"builtin"`, `"pubchem"` or `{ "file": "my_elements.json" }`.
//!
//! A missing file means defaults; a file that exists but cannot be parsed is an error,
//! so the tool refuses to start with a broken configuration.

use crate::DBhandlers::pubchem_api::PUBCHEM_REST_URL;
use log::{LevelFilter, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "chemcalc_config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("unknown setting '{0}'")]
    UnknownKey(String),
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementSourceKind {
    Builtin,
    Pubchem,
    File(String),
}

impl ElementSourceKind {
    pub fn describe(&self) -> String {
        match self {
            ElementSourceKind::Builtin => "builtin".to_string(),
            ElementSourceKind::Pubchem => "pubchem".to_string(),
            ElementSourceKind::File(path) => format!("file:{}", path),
        }
    }
}

impl FromStr for ElementSourceKind {
    type Err = ConfigError;
    /// "builtin", "pubchem" or "file:<path>"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "builtin" => Ok(ElementSourceKind::Builtin),
            "pubchem" => Ok(ElementSourceKind::Pubchem),
            _ => match s.strip_prefix("file:") {
                Some(path) if !path.trim().is_empty() => {
                    Ok(ElementSourceKind::File(path.trim().to_string()))
                }
                _ => Err(invalid(
                    "element_source",
                    "expected 'builtin', 'pubchem' or 'file:<path>'",
                )),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pubchem_base_url: String,
    /// width and height of the structure image, px
    pub image_size: u32,
    pub max_synonyms: usize,
    pub timeout_secs: u64,
    pub element_source: ElementSourceKind,
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pubchem_base_url: PUBCHEM_REST_URL.to_string(),
            image_size: 400,
            max_synonyms: 5,
            timeout_secs: 10,
            element_source: ElementSourceKind::Builtin,
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| invalid("log_level", "expected off, error, warn, info, debug or trace"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.pubchem_base_url.starts_with("http://")
            && !self.pubchem_base_url.starts_with("https://")
        {
            return Err(invalid("pubchem_base_url", "must be an http(s) URL"));
        }
        if self.image_size == 0 {
            return Err(invalid("image_size", "must be positive"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be positive"));
        }
        self.level_filter()?;
        Ok(())
    }

    /// (key, value) pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pubchem_base_url", self.pubchem_base_url.clone()),
            ("image_size", self.image_size.to_string()),
            ("max_synonyms", self.max_synonyms.to_string()),
            ("timeout_secs", self.timeout_secs.to_string()),
            ("element_source", self.element_source.describe()),
            ("log_level", self.log_level.clone()),
            (
                "log_file",
                self.log_file.clone().unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }
}

/// Loads, updates and saves the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    config_file: String,
}

impl ConfigManager {
    /// configuration from "chemcalc_config.json" in the current directory
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Result<Self, ConfigError> {
        let config = Self::load_config(config_file)?;
        config.validate()?;
        Ok(Self {
            config,
            config_file: config_file.to_string(),
        })
    }

    fn load_config(config_file: &str) -> Result<AppConfig, ConfigError> {
        if !Path::new(config_file).exists() {
            info!("No config file '{}', using defaults", config_file);
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(config_file).map_err(|source| ConfigError::Io {
            path: config_file.to_string(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;
        info!("Configuration loaded from '{}'", config_file);
        Ok(config)
    }

    pub fn save_config(&self) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_file, content).map_err(|source| ConfigError::Io {
            path: self.config_file.clone(),
            source,
        })?;
        info!("Configuration saved to '{}'", self.config_file);
        Ok(())
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Updates one setting from its text form; the configuration is left unchanged on error.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let mut updated = self.config.clone();
        match key.trim() {
            "pubchem_base_url" => updated.pubchem_base_url = value.trim_end_matches('/').to_string(),
            "image_size" => {
                updated.image_size = value
                    .parse()
                    .map_err(|_| invalid(key, "expected a positive integer"))?
            }
            "max_synonyms" => {
                updated.max_synonyms = value
                    .parse()
                    .map_err(|_| invalid(key, "expected a non-negative integer"))?
            }
            "timeout_secs" => {
                updated.timeout_secs = value
                    .parse()
                    .map_err(|_| invalid(key, "expected a positive integer"))?
            }
            "element_source" => updated.element_source = value.parse()?,
            "log_level" => updated.log_level = value.to_lowercase(),
            "log_file" => {
                updated.log_file = match value {
                    "" | "-" => None,
                    path => Some(path.to_string()),
                }
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        updated.validate()?;
        self.config = updated;
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = AppConfig::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let manager = ConfigManager::with_config_file("no_such_chemcalc_config.json").unwrap();
        assert_eq!(manager.get_config(), &AppConfig::default());
        assert_eq!(
            manager.get_config().pubchem_base_url,
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug"
        );
        assert_eq!(manager.get_config().level_filter().unwrap(), LevelFilter::Warn);
    }

    #[test]
    fn test_partial_config_file() {
        let mut temp_config = NamedTempFile::new().unwrap();
        writeln!(
            temp_config,
            r#"{{ "max_synonyms": 3, "element_source": {{ "file": "elements.json" }} }}"#
        )
        .unwrap();
        let manager = ConfigManager::with_config_file(temp_config.path().to_str().unwrap()).unwrap();
        let config = manager.get_config();
        assert_eq!(config.max_synonyms, 3);
        assert_eq!(
            config.element_source,
            ElementSourceKind::File("elements.json".to_string())
        );
        assert_eq!(config.image_size, 400);
    }

    #[test]
    fn test_broken_config_is_an_error() {
        let mut temp_config = NamedTempFile::new().unwrap();
        writeln!(temp_config, "{{ \"image_size\": \"big\" ").unwrap();
        let result = ConfigManager::with_config_file(temp_config.path().to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let mut temp_config = NamedTempFile::new().unwrap();
        writeln!(temp_config, r#"{{ "log_level": "loud" }}"#).unwrap();
        let result = ConfigManager::with_config_file(temp_config.path().to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_set_value_and_save() {
        let temp_config = NamedTempFile::new().unwrap();
        let path = temp_config.path().to_str().unwrap().to_string();
        // an empty file is not valid JSON, start from defaults and overwrite it
        let mut manager = ConfigManager {
            config: AppConfig::default(),
            config_file: path.clone(),
        };
        manager.set_value("image_size", "300").unwrap();
        manager.set_value("element_source", "pubchem").unwrap();
        manager.set_value("log_level", "DEBUG").unwrap();
        manager.set_value("pubchem_base_url", "http://localhost:8080/pug/").unwrap();
        manager.save_config().unwrap();

        let reloaded = ConfigManager::with_config_file(&path).unwrap();
        let config = reloaded.get_config();
        assert_eq!(config.image_size, 300);
        assert_eq!(config.element_source, ElementSourceKind::Pubchem);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.pubchem_base_url, "http://localhost:8080/pug");
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut manager = ConfigManager::with_config_file("no_such_chemcalc_config.json").unwrap();
        assert!(matches!(
            manager.set_value("colour", "red"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(manager.set_value("image_size", "0").is_err());
        assert!(manager.set_value("timeout_secs", "soon").is_err());
        assert!(manager.set_value("element_source", "file:").is_err());
        assert!(manager.set_value("pubchem_base_url", "ftp://example.org").is_err());
        // nothing changed
        assert_eq!(manager.get_config(), &AppConfig::default());

        manager.set_value("log_file", "chemcalc.log").unwrap();
        assert_eq!(manager.get_config().log_file.as_deref(), Some("chemcalc.log"));
        manager.set_value("log_file", "-").unwrap();
        assert_eq!(manager.get_config().log_file, None);
        manager.set_value("max_synonyms", "2").unwrap();
        manager.reset_to_defaults();
        assert_eq!(manager.get_config(), &AppConfig::default());
    }

    #[test]
    fn test_element_source_kind_from_str() {
        assert_eq!(
            "builtin".parse::<ElementSourceKind>().unwrap(),
            ElementSourceKind::Builtin
        );
        assert_eq!(
            " file:my.json ".parse::<ElementSourceKind>().unwrap(),
            ElementSourceKind::File("my.json".to_string())
        );
        assert!("nist".parse::<ElementSourceKind>().is_err());
        assert_eq!(
            ElementSourceKind::File("a.json".to_string()).describe(),
            "file:a.json"
        );
    }
}
