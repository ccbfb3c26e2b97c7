//! Core template type definitions.

use indexmap::IndexMap;
use thiserror::Error;

/// The wildcard marker, both as a whole template and as a map key.
pub const WILDCARD: &str = "*";

/// An ordered map from field name to template node.
///
/// Iteration order is the order in which fields appear in a view object.
pub type TemplateMap = IndexMap<String, Template>;

/// A node in a projection template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Template {
    /// Include the field and project it with its class defaults (`true`).
    ///
    /// Non-empty strings other than `"*"` are truthy and parse to this
    /// variant too.
    #[default]
    Include,

    /// Exclude the field (`false`, `null` or `""`).
    Exclude,

    /// Include the field and, if it is an entity, every field it can
    /// resolve (`"*"`).
    Wildcard,

    /// Include the field and project it with this sub-template.
    Fields(TemplateMap),
}

impl Template {
    /// Build a map template from `(key, node)` pairs.
    pub fn fields<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Template)>,
    {
        Template::Fields(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether a field with this node is resolved at all.
    ///
    /// Only [`Template::Exclude`] is falsy; an empty map still includes.
    pub fn is_included(&self) -> bool {
        !matches!(self, Template::Exclude)
    }

    /// Check if this is the `"*"` wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Template::Wildcard)
    }

    /// Get the nested map if this is a map template.
    pub fn as_fields(&self) -> Option<&TemplateMap> {
        match self {
            Template::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get the nested map mutably if this is a map template.
    pub fn as_fields_mut(&mut self) -> Option<&mut TemplateMap> {
        match self {
            Template::Fields(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<bool> for Template {
    fn from(include: bool) -> Self {
        if include {
            Template::Include
        } else {
            Template::Exclude
        }
    }
}

impl From<TemplateMap> for Template {
    fn from(fields: TemplateMap) -> Self {
        Template::Fields(fields)
    }
}

/// Errors raised while reading a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A node is not one of the accepted shapes.
    #[error("Invalid template node at {}: {reason}", display_path(path))]
    InvalidShape {
        /// Keys leading to the offending node (empty for the root)
        path: Vec<String>,
        /// What was wrong with the node
        reason: String,
    },
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(".")
    }
}
