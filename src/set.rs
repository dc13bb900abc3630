//! Icon set definitions and the set table

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{component_name, ComponentRegistrar, SVG_COMPONENT};
use crate::error::{CannotRegisterIconSet, Result};
use crate::filesystem::Filesystem;

/// Options passed when registering a set.
///
/// Only `path` and `prefix` are interpreted; every other key is kept verbatim
/// in [`IconSet::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SetOptions {
    /// Options with both required fields set
    pub fn new(path: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            prefix: Some(prefix.into()),
            extra: serde_json::Map::new(),
        }
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Attach an opaque pass-through option
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A registered icon set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconSet {
    pub name: String,
    pub path: PathBuf,
    pub prefix: String,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Table of registered sets, keyed by set name in registration order
#[derive(Debug, Clone, Default)]
pub struct SetRegistry {
    sets: IndexMap<String, IconSet>,
}

impl SetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a set, then announce each of its files as a component.
    ///
    /// Checks run in order: path defined, prefix defined, prefix unused, path
    /// exists. On any failure the table is left untouched. Adding an existing
    /// name replaces that set in place.
    pub fn add(
        &mut self,
        name: &str,
        options: SetOptions,
        fs: &dyn Filesystem,
        components: &dyn ComponentRegistrar,
    ) -> Result<&IconSet> {
        let SetOptions {
            path,
            prefix,
            extra,
        } = options;

        let path = path.ok_or_else(|| CannotRegisterIconSet::PathNotDefined {
            set: name.to_string(),
        })?;

        let prefix = prefix.ok_or_else(|| CannotRegisterIconSet::PrefixNotDefined {
            set: name.to_string(),
        })?;

        if let Some(colliding) = self.get_by_prefix(&prefix) {
            return Err(CannotRegisterIconSet::PrefixNotUnique {
                set: name.to_string(),
                colliding: colliding.to_string(),
            }
            .into());
        }

        if !fs.exists(&path) {
            return Err(CannotRegisterIconSet::NonExistingPath {
                set: name.to_string(),
                path: path.display().to_string(),
            }
            .into());
        }

        let files = fs.all_files(&path)?;

        for file in &files {
            components.register(SVG_COMPONENT, &component_name(file), &prefix);
        }

        debug!(
            set = name,
            prefix = %prefix,
            path = %path.display(),
            components = files.len(),
            "Registered icon set"
        );

        let set = IconSet {
            name: name.to_string(),
            path,
            prefix,
            extra,
        };
        let (index, _) = self.sets.insert_full(name.to_string(), set);

        Ok(&self.sets[index])
    }

    /// All sets in registration order
    pub fn all(&self) -> &IndexMap<String, IconSet> {
        &self.sets
    }

    /// Look up a set by name
    pub fn get(&self, name: &str) -> Option<&IconSet> {
        self.sets.get(name)
    }

    /// Name of the first set using `prefix`
    pub fn get_by_prefix(&self, prefix: &str) -> Option<&str> {
        self.sets
            .values()
            .find(|set| set.prefix == prefix)
            .map(|set| set.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
