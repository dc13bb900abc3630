//! Component registration side channel
//!
//! When a set is added, every file below its path is announced to the host's
//! templating layer as a renderable component. The host decides what to do with
//! it; the registry only emits `(component, alias, prefix)` triples.

use parking_lot::Mutex;

use crate::filesystem::IconFile;

/// Identifier of the generic renderer every icon alias is bound to
pub const SVG_COMPONENT: &str = "svg";

/// Receiver for component registrations.
///
/// Registration is fire-and-forget: implementations cannot fail the set
/// registration that triggered them.
pub trait ComponentRegistrar: Send + Sync {
    fn register(&self, component: &str, alias: &str, prefix: &str);
}

/// Dotted alias for a file: directory segments followed by the stem
/// (`solid/user.svg` becomes `solid.user`).
pub fn component_name(file: &IconFile) -> String {
    file.relative_dir
        .iter()
        .map(|segment| segment.to_string_lossy())
        .filter(|segment| !segment.is_empty())
        .chain(std::iter::once(file.stem.as_str().into()))
        .collect::<Vec<_>>()
        .join(".")
}

/// Registrar for hosts without a component system
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRegistrar;

impl ComponentRegistrar for NoopRegistrar {
    fn register(&self, _component: &str, _alias: &str, _prefix: &str) {}
}

/// A single recorded registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub component: String,
    pub alias: String,
    pub prefix: String,
}

impl Registration {
    /// Tag name the templating layer would expose, e.g. `heroicon-solid.user`
    pub fn tag(&self) -> String {
        format!("{}-{}", self.prefix, self.alias)
    }
}

/// Registrar that records every registration for later inspection
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    registrations: Mutex<Vec<Registration>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all registrations, in the order they were made
    pub fn registrations(&self) -> Vec<Registration> {
        self.registrations.lock().clone()
    }

    /// Tag names of every registered component
    pub fn tags(&self) -> Vec<String> {
        self.registrations.lock().iter().map(Registration::tag).collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.lock().is_empty()
    }
}

impl ComponentRegistrar for ComponentRegistry {
    fn register(&self, component: &str, alias: &str, prefix: &str) {
        self.registrations.lock().push(Registration {
            component: component.to_string(),
            alias: alias.to_string(),
            prefix: prefix.to_string(),
        });
    }
}
