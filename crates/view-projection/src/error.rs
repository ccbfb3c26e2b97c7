/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Projection error types.
 */

//! Error types for view projection.
//!
//! A projection either returns a complete view object or exactly one
//! [`ViewError`]. Errors raised inside nested entities are wrapped once per
//! level in [`ViewError::NestedProjection`], so the chain of `source()`s reads
//! like a path through the entity graph.

use thiserror::Error;
use view_template::TemplateError;

/// Error type produced by field accessors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while defining classes or projecting entities.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The request template is not one of the accepted shapes.
    #[error("Invalid request template: {0}")]
    InvalidTemplate(#[from] TemplateError),

    /// An operation descriptor cannot be dispatched.
    #[error("Invalid operation for {class}.{field}: {reason}")]
    InvalidOperationSignature {
        /// Class the operation was registered on
        class: String,
        /// Field the operation resolves
        field: String,
        /// What is wrong with the descriptor
        reason: String,
    },

    /// A field accessor failed.
    #[error("Failed to resolve {class}.{field}: {source}")]
    FieldResolution {
        /// Class whose accessor failed
        class: String,
        /// Field being resolved
        field: String,
        /// Error returned by the accessor
        #[source]
        source: BoxError,
    },

    /// Projecting a nested entity or a sequence element failed.
    #[error("Failed to project nested value '{field}': {source}")]
    NestedProjection {
        /// Field (with `[index]` suffixes for sequence elements)
        field: String,
        /// Error raised by the nested projection
        #[source]
        source: Box<ViewError>,
    },

    /// Entities are nested deeper than the configured limit.
    #[error("View nesting too deep (max depth: {max_depth}) while projecting {class}")]
    NestingTooDeep {
        /// Maximum allowed depth
        max_depth: usize,
        /// Class that would have exceeded the limit
        class: String,
    },
}

impl ViewError {
    /// Create a FieldResolution error.
    pub fn field_resolution(
        class: impl Into<String>,
        field: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::FieldResolution {
            class: class.into(),
            field: field.into(),
            source: source.into(),
        }
    }

    /// Wrap an error raised by a nested projection.
    pub fn nested(field: impl Into<String>, source: ViewError) -> Self {
        Self::NestedProjection {
            field: field.into(),
            source: Box::new(source),
        }
    }

    /// Follow `NestedProjection` wrappers down to the original error.
    pub fn root_cause(&self) -> &ViewError {
        match self {
            ViewError::NestedProjection { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
