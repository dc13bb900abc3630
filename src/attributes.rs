//! Attribute merging for resolved icons

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Attribute map attached to a resolved icon, in insertion order
pub type Attributes = IndexMap<String, serde_json::Value>;

/// Second argument of [`crate::IconFactory::svg`]: either a CSS class or a
/// complete attribute map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassOrAttributes {
    #[default]
    None,
    Class(String),
    Attributes(Attributes),
}

impl From<&str> for ClassOrAttributes {
    fn from(class: &str) -> Self {
        Self::Class(class.to_string())
    }
}

impl From<String> for ClassOrAttributes {
    fn from(class: String) -> Self {
        Self::Class(class)
    }
}

impl From<Attributes> for ClassOrAttributes {
    fn from(attributes: Attributes) -> Self {
        Self::Attributes(attributes)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for ClassOrAttributes {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::Attributes(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                .collect(),
        )
    }
}

/// Merges a class argument and an attribute map into final icon attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeBuilder {
    default_class: String,
}

impl AttributeBuilder {
    pub fn new(default_class: impl Into<String>) -> Self {
        Self {
            default_class: default_class.into(),
        }
    }

    pub fn default_class(&self) -> &str {
        &self.default_class
    }

    /// Build the attribute map.
    ///
    /// A non-empty class overrides `attributes["class"]` with the default class
    /// followed by the given one. An attribute map in the class slot replaces
    /// `attributes` wholesale.
    pub fn build(&self, class: ClassOrAttributes, mut attributes: Attributes) -> Attributes {
        match class {
            ClassOrAttributes::Class(class) if !class.is_empty() => {
                attributes.insert(
                    "class".to_string(),
                    serde_json::Value::String(self.class(&class)),
                );
                attributes
            }
            ClassOrAttributes::Attributes(replacement) => replacement,
            _ => attributes,
        }
    }

    fn class(&self, class: &str) -> String {
        format!("{} {}", self.default_class, class).trim().to_string()
    }
}
