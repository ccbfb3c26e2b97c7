/*
 * project.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Recursive projection of resolved values.
 */

//! Value projection.
//!
//! Once a field is resolved, its value is projected with the field's
//! sub-template:
//!
//! - entities project themselves (one level deeper)
//! - lists are projected element by element, concurrently, in order
//! - plain data passes through unchanged
//!
//! # Depth Limiting
//!
//! Entity graphs may contain cycles. Every nested entity projection runs one
//! level deeper than its parent, and projection fails with
//! [`ViewError::NestingTooDeep`] beyond [`ProjectionOptions::max_depth`].

use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use serde_json::Value;
use view_template::Template;

use crate::error::ViewError;
use crate::value::FieldValue;

/// Options for projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Maximum entity nesting depth (default: 64).
    pub max_depth: usize,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Per-call projection state, passed down through nested entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionContext {
    options: ProjectionOptions,
    depth: usize,
}

impl ProjectionContext {
    /// Create a root context.
    pub fn new(options: ProjectionOptions) -> Self {
        Self { options, depth: 0 }
    }

    /// Options in effect for this call.
    pub fn options(&self) -> &ProjectionOptions {
        &self.options
    }

    /// Entity nesting depth (0 for the entity the caller projected).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Context for an entity nested one level below this one.
    pub fn nested(&self) -> Self {
        Self {
            options: self.options,
            depth: self.depth + 1,
        }
    }

    /// Fail if this context is deeper than allowed.
    pub(crate) fn check_depth(&self, class: &str) -> Result<(), ViewError> {
        if self.depth > self.options.max_depth {
            return Err(ViewError::NestingTooDeep {
                max_depth: self.options.max_depth,
                class: class.to_string(),
            });
        }
        Ok(())
    }
}

/// Project a resolved value with its sub-template.
///
/// `label` names the value in errors: the field name, with `[index]`
/// appended for list elements.
pub fn project_value<'a>(
    value: FieldValue,
    template: &'a Template,
    ctx: &'a ProjectionContext,
    label: String,
) -> BoxFuture<'a, Result<Value, ViewError>> {
    async move {
        match value {
            FieldValue::Data(data) => Ok(data),
            FieldValue::Entity(entity) => {
                let nested = ctx.nested();
                entity
                    .project(template, &nested)
                    .await
                    .map(Value::Object)
                    .map_err(|err| ViewError::nested(label, err))
            }
            FieldValue::List(items) => {
                let projections = items.into_iter().enumerate().map(|(index, item)| {
                    project_value(item, template, ctx, format!("{}[{}]", label, index))
                });
                try_join_all(projections).await.map(Value::Array)
            }
        }
    }
    .boxed()
}
