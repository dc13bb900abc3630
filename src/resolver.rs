//! Icon name resolution and the content cache

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{IconError, Result};
use crate::filesystem::Filesystem;
use crate::set::SetRegistry;

/// Set used when a name's prefix doesn't match any registered set
pub const DEFAULT_SET: &str = "default";

/// How cached contents are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Keyed by icon name alone. Two sets holding the same icon name share
    /// one cache entry, and whichever resolves first wins.
    #[default]
    ByName,
    /// Keyed by set and icon name
    BySetAndName,
}

/// Resolves icon names to file contents, memoizing every successful read
#[derive(Debug, Clone, Default)]
pub struct ContentResolver {
    mode: CacheMode,
    cache: HashMap<(String, String), String>,
}

impl ContentResolver {
    pub fn new(mode: CacheMode) -> Self {
        Self {
            mode,
            cache: HashMap::new(),
        }
    }

    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Split `brand-github` into the owning set name and `github`.
    ///
    /// The prefix is everything before the first `-`. A name without a `-`
    /// (or with nothing after it) is taken whole with an empty prefix. Unknown
    /// prefixes fall back to [`DEFAULT_SET`].
    pub fn split_set_and_name(sets: &SetRegistry, reference: &str) -> (String, String) {
        let (prefix, name) = match reference.split_once('-') {
            Some((prefix, name)) if !name.is_empty() => (prefix, name),
            _ => ("", reference),
        };

        let set = sets.get_by_prefix(prefix).unwrap_or(DEFAULT_SET);

        (set.to_string(), name.to_string())
    }

    /// Contents of icon `name` from `set`, served from cache when possible
    pub fn contents(
        &mut self,
        sets: &SetRegistry,
        fs: &dyn Filesystem,
        set: &str,
        name: &str,
    ) -> Result<String> {
        let key = self.key(set, name);

        if let Some(contents) = self.cache.get(&key) {
            trace!(set, name, "Icon cache hit");
            return Ok(contents.clone());
        }

        let Some(icon_set) = sets.get(set) else {
            warn!(set, name, "Icon requested from unregistered set");
            return Err(IconError::svg_not_found(set, name));
        };

        trace!(set, name, "Icon cache miss");

        match fs.get(&Self::svg_path(&icon_set.path, name)) {
            Ok(raw) => {
                let contents = raw.trim().to_string();
                self.cache.insert(key, contents.clone());
                Ok(contents)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(IconError::svg_not_found(set, name))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Split `reference` and return `(name, contents)`
    pub fn resolve(
        &mut self,
        sets: &SetRegistry,
        fs: &dyn Filesystem,
        reference: &str,
    ) -> Result<(String, String)> {
        let (set, name) = Self::split_set_and_name(sets, reference);
        let contents = self.contents(sets, fs, &set, &name)?;
        Ok((name, contents))
    }

    /// File holding icon `name` below `root`; dots in the name become directories
    pub fn svg_path(root: &Path, name: &str) -> PathBuf {
        let root = match root.to_str() {
            Some(s) => PathBuf::from(s.trim_end()),
            None => root.to_path_buf(),
        };
        root.join(format!("{}.svg", name.replace('.', "/")))
    }

    /// Drop every cached entry
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn key(&self, set: &str, name: &str) -> (String, String) {
        match self.mode {
            CacheMode::ByName => (String::new(), name.to_string()),
            CacheMode::BySetAndName => (set.to_string(), name.to_string()),
        }
    }
}
