//! Configuration management for the icon registry
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (icons.toml)
//! - Environment variables (ICONS__*)
//!
//! ## Example config file (icons.toml):
//! ```toml
//! class = "icon"
//!
//! [cache]
//! mode = "by_name"
//!
//! [sets.default]
//! path = "resources/svg"
//! prefix = "icon"
//!
//! [sets.heroicons]
//! path = "vendor/heroicons/svg"
//! prefix = "heroicon"
//! class = "hero"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::resolver::CacheMode;
use crate::set::SetOptions;

/// Main configuration for the icon registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IconsConfig {
    /// Default class prepended to every icon class
    #[serde(default)]
    pub class: String,

    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Icon sets to register, in order
    #[serde(default)]
    pub sets: IndexMap<String, SetOptions>,
}

/// Cache configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub mode: CacheMode,
}

impl IconsConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the default locations.
    ///
    /// `sets` are read straight from the TOML files, merged in the same order
    /// as the other keys, so set order and the case of pass-through option keys
    /// survive. Environment variables only override `sets` when no file
    /// defines any.
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        let mut files = Vec::new();

        let config_locations = ["icons.toml", ".icons.toml", "config/icons.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
            files.extend(toml_file(location));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "icons") {
            let xdg_config = config_dir.config_dir().join("icons.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config.clone()).required(false));
                files.push(xdg_config);
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
            files.extend(toml_file(path));
        }

        // ICONS__CLASS, ICONS__CACHE__MODE, ...
        builder = builder.add_source(
            Environment::with_prefix("ICONS")
                .prefix_separator("__")
                .separator("__"),
        );

        let config = builder.build()?;
        let mut icons: Self = config.try_deserialize()?;

        if let Some(sets) = raw_sets(&files)? {
            icons.sets = sets;
        }

        Ok(icons)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

/// Path `File::with_name` would pick for `name`, if it is a TOML file on disk
fn toml_file(name: &str) -> Option<PathBuf> {
    let path = Path::new(name);
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    let with_ext = PathBuf::from(format!("{}.toml", name));
    with_ext.is_file().then_some(with_ext)
}

/// `[sets]` tables from `files`, later files overriding earlier ones key by key
fn raw_sets(files: &[PathBuf]) -> Result<Option<IndexMap<String, SetOptions>>, ConfigError> {
    let mut merged = toml::Table::new();

    for path in files {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Message(format!("{}: {}", path.display(), e)))?;
        let mut table: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| ConfigError::Message(format!("{}: {}", path.display(), e)))?;

        if let Some(sets) = table.remove("sets") {
            merge(&mut merged, sets);
        }
    }

    if merged.is_empty() {
        return Ok(None);
    }

    toml::Value::Table(merged)
        .try_into()
        .map(Some)
        .map_err(|e: toml::de::Error| ConfigError::Message(e.to_string()))
}

fn merge(base: &mut toml::Table, overlay: toml::Value) {
    let toml::Value::Table(overlay) = overlay else {
        return;
    };
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(table)) => {
                merge(existing, toml::Value::Table(table));
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
