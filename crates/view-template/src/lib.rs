//! Projection templates for view objects.
//!
//! A template is a tree keyed by field name that decides which fields of an
//! entity end up in its view object, and with which sub-template each nested
//! value is projected in turn.
//!
//! # Key Features
//!
//! - **Typed nodes**: `true`, `false`, the `"*"` wildcard and nested maps are
//!   explicit [`Template`] variants
//! - **Ordered**: [`TemplateMap`] keeps insertion order, which is the key order
//!   of the assembled view object
//! - **Copying merges**: [`merge_template`] and [`extend_template`] always
//!   return a fresh tree and never touch the stored defaults
//!
//! # Wildcards
//!
//! The wildcard has two meanings depending on where it appears:
//!
//! - As a whole template (`"*"`), it includes every field the entity can
//!   resolve, and propagates `"*"` to each of them.
//! - As a key inside a map (`{"*": sub}`), its value is applied as the
//!   sub-template of every sibling field that is not explicitly excluded.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use view_template::{Template, TemplateMap, merge_template};
//!
//! let mut defaults = TemplateMap::new();
//! defaults.insert("name".to_string(), Template::Include);
//!
//! let request = Template::from_json(&json!({ "age": true })).unwrap();
//! let effective = merge_template(&request, &defaults, ["name", "age"]);
//!
//! assert_eq!(effective.keys().collect::<Vec<_>>(), vec!["name", "age"]);
//! ```

mod convert;
mod merge;
mod types;

pub use types::{Template, TemplateError, TemplateMap, WILDCARD};

pub use merge::{extend_template, merge_template};
