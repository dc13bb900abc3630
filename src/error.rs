//! Error types for the icon registry

use thiserror::Error;

/// Result type for icon operations
pub type Result<T> = std::result::Result<T, IconError>;

/// Reasons an icon set can be rejected by [`crate::SetRegistry::add`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CannotRegisterIconSet {
    #[error("Icon set \"{set}\" doesn't have a path defined.")]
    PathNotDefined { set: String },

    #[error("Icon set \"{set}\" doesn't have a prefix defined.")]
    PrefixNotDefined { set: String },

    #[error("Prefix for icon set \"{set}\" is already used by the \"{colliding}\" set.")]
    PrefixNotUnique { set: String, colliding: String },

    #[error("Icon set \"{set}\" has a non-existing path \"{path}\".")]
    NonExistingPath { set: String, path: String },
}

/// Icon registry errors
#[derive(Error, Debug)]
pub enum IconError {
    #[error(transparent)]
    CannotRegister(#[from] CannotRegisterIconSet),

    #[error("Svg by name \"{name}\" from set \"{set}\" not found.")]
    SvgNotFound { set: String, name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl IconError {
    pub(crate) fn svg_not_found(set: impl Into<String>, name: impl Into<String>) -> Self {
        Self::SvgNotFound {
            set: set.into(),
            name: name.into(),
        }
    }
}
