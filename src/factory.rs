//! The icon factory
//!
//! Ties the set table, the content resolver and attribute merging together
//! behind `add` / `svg` / `all`.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::attributes::{AttributeBuilder, Attributes, ClassOrAttributes};
use crate::components::ComponentRegistrar;
use crate::config::IconsConfig;
use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::icon::Svg;
use crate::resolver::{CacheMode, ContentResolver};
use crate::set::{IconSet, SetOptions, SetRegistry};

struct State {
    sets: SetRegistry,
    resolver: ContentResolver,
}

/// Registry of icon sets and resolver of icon names.
///
/// The set table and content cache share one lock, so `add` and `svg` may be
/// called from several threads. Component registrations are delivered while
/// that lock is held; a registrar must not call back into the factory.
pub struct IconFactory {
    filesystem: Arc<dyn Filesystem>,
    components: Arc<dyn ComponentRegistrar>,
    attributes: AttributeBuilder,
    state: Mutex<State>,
}

impl IconFactory {
    /// Create an empty factory with no default class
    pub fn new(filesystem: Arc<dyn Filesystem>, components: Arc<dyn ComponentRegistrar>) -> Self {
        Self {
            filesystem,
            components,
            attributes: AttributeBuilder::default(),
            state: Mutex::new(State {
                sets: SetRegistry::new(),
                resolver: ContentResolver::default(),
            }),
        }
    }

    /// Build a factory and register every configured set, in order
    pub fn from_config(
        config: &IconsConfig,
        filesystem: Arc<dyn Filesystem>,
        components: Arc<dyn ComponentRegistrar>,
    ) -> Result<Self> {
        let factory = Self::new(filesystem, components)
            .with_default_class(config.class.clone())
            .with_cache_mode(config.cache.mode);

        for (name, options) in &config.sets {
            factory.add(name, options.clone())?;
        }

        Ok(factory)
    }

    /// Class prepended to every class passed to [`IconFactory::svg`]
    pub fn with_default_class(mut self, class: impl Into<String>) -> Self {
        self.attributes = AttributeBuilder::new(class);
        self
    }

    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.state.get_mut().resolver = ContentResolver::new(mode);
        self
    }

    pub fn default_class(&self) -> &str {
        self.attributes.default_class()
    }

    /// Register an icon set. Any successful registration empties the content cache.
    pub fn add(&self, name: &str, options: SetOptions) -> Result<&Self> {
        let mut state = self.state.lock();
        state
            .sets
            .add(name, options, self.filesystem.as_ref(), self.components.as_ref())?;
        state.resolver.clear();
        Ok(self)
    }

    /// Resolve `name` (e.g. `heroicon-o-camera`) to an icon.
    ///
    /// A class string is merged with the default class into `attributes`; an
    /// attribute map in the class position replaces `attributes` entirely.
    pub fn svg(
        &self,
        name: &str,
        class: impl Into<ClassOrAttributes>,
        attributes: Attributes,
    ) -> Result<Svg> {
        let (name, contents) = {
            let mut guard = self.state.lock();
            let State { sets, resolver } = &mut *guard;
            resolver.resolve(sets, self.filesystem.as_ref(), name)?
        };

        let attributes = self.attributes.build(class.into(), attributes);

        Ok(Svg::new(name, contents, attributes))
    }

    /// Resolve `name` with no class and no attributes
    pub fn icon(&self, name: &str) -> Result<Svg> {
        self.svg(name, ClassOrAttributes::None, Attributes::new())
    }

    /// Snapshot of every registered set, in registration order
    pub fn all(&self) -> IndexMap<String, IconSet> {
        self.state.lock().sets.all().clone()
    }
}

impl std::fmt::Debug for IconFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut d = f.debug_struct("IconFactory");
        d.field("default_class", &self.attributes.default_class());
        if let Some(state) = self.state.try_lock() {
            let sets: Vec<&String> = state.sets.all().keys().collect();
            d.field("sets", &sets);
            d.field("cached", &state.resolver.cached_len());
        } else {
            d.field("state", &format_args!("<locked>"));
        }
        d.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ComponentRegistry, NoopRegistrar};
    use crate::error::IconError;
    use crate::filesystem::MemoryFilesystem;

    fn factory(fs: &Arc<MemoryFilesystem>) -> IconFactory {
        IconFactory::new(fs.clone(), Arc::new(NoopRegistrar))
    }

    #[test]
    fn test_add_is_chainable() {
        let fs = Arc::new(
            MemoryFilesystem::new()
                .with_file("a/x.svg", "<svg/>")
                .with_file("b/y.svg", "<svg/>"),
        );
        let factory = factory(&fs);
        factory
            .add("a", SetOptions::new("a", "a"))
            .unwrap()
            .add("b", SetOptions::new("b", "b"))
            .unwrap();

        assert_eq!(factory.all().len(), 2);
    }

    #[test]
    fn test_add_clears_cache() {
        let fs = Arc::new(
            MemoryFilesystem::new()
                .with_file("a/x.svg", "<svg/>")
                .with_file("b/y.svg", "<svg/>"),
        );
        let factory = factory(&fs);
        factory.add("a", SetOptions::new("a", "a")).unwrap();

        factory.icon("a-x").unwrap();
        factory.icon("a-x").unwrap();
        assert_eq!(fs.reads(), 1);

        factory.add("b", SetOptions::new("b", "b")).unwrap();
        factory.icon("a-x").unwrap();
        assert_eq!(fs.reads(), 2);
    }

    #[test]
    fn test_failed_add_keeps_cache() {
        let fs = Arc::new(MemoryFilesystem::new().with_file("a/x.svg", "<svg/>"));
        let factory = factory(&fs);
        factory.add("a", SetOptions::new("a", "a")).unwrap();
        factory.icon("a-x").unwrap();

        assert!(factory.add("b", SetOptions::new("missing", "b")).is_err());
        factory.icon("a-x").unwrap();
        assert_eq!(fs.reads(), 1);
    }

    #[test]
    fn test_registers_components() {
        let fs = Arc::new(MemoryFilesystem::new().with_file("a/solid/x.svg", "<svg/>"));
        let components = Arc::new(ComponentRegistry::new());
        let factory = IconFactory::new(fs, components.clone());
        factory.add("a", SetOptions::new("a", "ic")).unwrap();

        assert_eq!(components.tags(), vec!["ic-solid.x"]);
    }

    #[test]
    fn test_svg_with_class() {
        let fs = Arc::new(MemoryFilesystem::new().with_file("a/x.svg", "<svg/>"));
        let factory = factory(&fs).with_default_class("icon");
        factory.add("a", SetOptions::new("a", "a")).unwrap();

        let svg = factory.svg("a-x", "w-4", Attributes::new()).unwrap();
        assert_eq!(svg.name(), "x");
        assert_eq!(svg.attributes()["class"], "icon w-4");
    }

    #[test]
    fn test_unknown_icon() {
        let fs = Arc::new(MemoryFilesystem::new().with_file("a/x.svg", "<svg/>"));
        let factory = factory(&fs);
        factory.add("a", SetOptions::new("a", "a")).unwrap();

        let err = factory.icon("a-y").unwrap_err();
        assert!(matches!(err, IconError::SvgNotFound { ref set, ref name } if set == "a" && name == "y"));
    }

    #[test]
    fn test_removed_file_served_from_cache_until_add() {
        let fs = Arc::new(
            MemoryFilesystem::new()
                .with_file("a/x.svg", "<svg>X</svg>")
                .with_file("b/y.svg", "<svg/>"),
        );
        let factory = factory(&fs);
        factory.add("a", SetOptions::new("a", "a")).unwrap();
        factory.icon("a-x").unwrap();

        assert_eq!(fs.remove("a/x.svg").as_deref(), Some("<svg>X</svg>"));
        assert_eq!(factory.icon("a-x").unwrap().contents(), "<svg>X</svg>");

        factory.add("b", SetOptions::new("b", "b")).unwrap();
        assert!(matches!(factory.icon("a-x"), Err(IconError::SvgNotFound { .. })));
    }

    #[test]
    fn test_debug_does_not_block_on_held_lock() {
        let fs = Arc::new(MemoryFilesystem::new().with_file("a/x.svg", "<svg/>"));
        let factory = factory(&fs);
        factory.add("a", SetOptions::new("a", "a")).unwrap();

        let unlocked = format!("{:?}", factory);
        assert!(unlocked.contains("\"a\""));
        assert!(unlocked.contains("cached: 0"));

        let _guard = factory.state.lock();
        assert!(format!("{:?}", factory).contains("<locked>"));
    }
}
