//! Familiar Icon Registry
//!
//! Resolves icon names such as `heroicon-o-camera` into raw SVG markup for the
//! Familiar templating layer.
//!
//! ## Features
//!
//! - **Icon Sets**: Named collections of SVG files rooted at a path, each with a unique prefix
//! - **Component Registration**: Every file in a set is announced to the host as a component
//! - **Content Cache**: Resolved markup is memoized until the next set is added
//! - **Pluggable Storage**: Local disk, in-memory, or icons embedded at compile time
//!
//! ## Layout
//!
//! ```text
//! resources/svg/              set "default", prefix "icon"
//! ├── camera.svg              icon-camera
//! └── solid/
//!     └── user.svg            icon-solid.user
//! ```
//!
//! SVG contents are treated as opaque text; nothing is parsed or validated.

pub mod attributes;
pub mod components;
pub mod config;
pub mod error;
pub mod factory;
pub mod filesystem;
pub mod icon;
pub mod resolver;
pub mod set;

pub use attributes::{AttributeBuilder, Attributes, ClassOrAttributes};
pub use components::{ComponentRegistrar, ComponentRegistry, NoopRegistrar, Registration, SVG_COMPONENT};
pub use config::{CacheConfig, IconsConfig};
pub use error::{CannotRegisterIconSet, IconError, Result};
pub use factory::IconFactory;
pub use filesystem::{EmbeddedFilesystem, Filesystem, IconFile, LocalFilesystem, MemoryFilesystem};
pub use icon::Svg;
pub use resolver::{CacheMode, ContentResolver, DEFAULT_SET};
pub use set::{IconSet, SetOptions, SetRegistry};
