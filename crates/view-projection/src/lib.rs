/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Template-driven projection of domain entities into view objects.
 */

//! Template-driven projection of domain entities into view objects.
//!
//! Each entity type registers a [`ViewClass`]: a default template saying
//! which fields appear in its view object, and an [`Operation`] per field
//! saying how to resolve it. Projection merges a per-request template into
//! those defaults, resolves every included field concurrently, and projects
//! each resolved value recursively:
//!
//! - nested entities project themselves with the field's sub-template
//! - lists are projected element by element, keeping their order
//! - plain data passes through unchanged
//!
//! A call either returns the complete view object or exactly one
//! [`ViewError`]; no partial view is ever produced.
//!
//! # Architecture
//!
//! - [`view_template`]: template model and merge rules (re-exported here)
//! - [`class`]: per-class default templates and operation tables
//! - [`operation`]: path, sync and async field accessors
//! - [`dispatch`]: concurrent field resolution and view assembly
//! - [`project`]: recursive value projection and depth limiting
//! - [`entity`]: the [`Projectable`] capability and the [`Entity`] trait

pub mod class;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod operation;
pub mod project;
pub mod value;

pub use class::{OperationMap, ViewClass};
pub use entity::{Entity, Projectable, View};
pub use error::{BoxError, ViewError};
pub use operation::{AccessorResult, AsyncAccessor, FieldPath, Operation, SyncAccessor};
pub use project::{ProjectionContext, ProjectionOptions, project_value};
pub use value::FieldValue;

pub use view_template::{Template, TemplateError, TemplateMap, WILDCARD};
