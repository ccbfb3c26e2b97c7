/*
 * operation.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Field operation descriptors.
 */

//! Operation descriptors.
//!
//! Each resolvable field of a class has one [`Operation`] describing how to
//! obtain its value from an entity:
//!
//! - [`Operation::Path`]: a dotted lookup into the entity's attributes
//! - [`Operation::Sync`]: a computation run inline
//! - [`Operation::Async`]: a computation that completes later
//!
//! Accessors always receive the entity explicitly, so the same accessor can
//! be shared between classes (see [`Operation::lift`]).

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::BoxError;
use crate::value::FieldValue;

/// Result of a field accessor; `Ok(None)` means "not found".
pub type AccessorResult = Result<Option<FieldValue>, BoxError>;

/// A synchronous accessor.
pub type SyncAccessor<E> = Arc<dyn Fn(&E) -> AccessorResult + Send + Sync>;

/// An asynchronous accessor.
///
/// The returned future is `'static`: accessors copy what they need out of
/// the entity before suspending.
pub type AsyncAccessor<E> = Arc<dyn Fn(&E) -> BoxFuture<'static, AccessorResult> + Send + Sync>;

/// How a field is resolved on an entity of type `E`.
pub enum Operation<E> {
    /// Dotted attribute path, e.g. `profile.name`.
    Path(FieldPath),
    /// Computed inline.
    Sync(SyncAccessor<E>),
    /// Computed asynchronously.
    Async(AsyncAccessor<E>),
}

impl<E: 'static> Operation<E> {
    /// Resolve through a dotted attribute path.
    pub fn path(path: impl Into<String>) -> Self {
        Operation::Path(FieldPath::new(path))
    }

    /// Compute a value that is always present.
    pub fn compute<F, V>(f: F) -> Self
    where
        F: Fn(&E) -> V + Send + Sync + 'static,
        V: Into<FieldValue>,
    {
        Operation::Sync(Arc::new(move |entity: &E| -> AccessorResult {
            Ok(Some(f(entity).into()))
        }))
    }

    /// Compute a value that may be absent or fail.
    pub fn try_compute<F>(f: F) -> Self
    where
        F: Fn(&E) -> AccessorResult + Send + Sync + 'static,
    {
        Operation::Sync(Arc::new(f))
    }

    /// Compute a value asynchronously.
    pub fn compute_async<F, Fut>(f: F) -> Self
    where
        F: Fn(&E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AccessorResult> + Send + 'static,
    {
        Operation::Async(Arc::new(
            move |entity: &E| -> BoxFuture<'static, AccessorResult> { f(entity).boxed() },
        ))
    }

    /// Reuse this operation on a type that borrows an `E` out of itself.
    ///
    /// Path operations are carried over as-is and resolve against the new
    /// type's own attributes.
    pub fn lift<C>(self) -> Operation<C>
    where
        C: AsRef<E> + 'static,
    {
        match self {
            Operation::Path(path) => Operation::Path(path),
            Operation::Sync(f) => Operation::Sync(Arc::new(move |child: &C| f(child.as_ref()))),
            Operation::Async(f) => Operation::Async(Arc::new(move |child: &C| f(child.as_ref()))),
        }
    }
}

impl<E> Clone for Operation<E> {
    fn clone(&self) -> Self {
        match self {
            Operation::Path(path) => Operation::Path(path.clone()),
            Operation::Sync(f) => Operation::Sync(Arc::clone(f)),
            Operation::Async(f) => Operation::Async(Arc::clone(f)),
        }
    }
}

impl<E> fmt::Debug for Operation<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Path(path) => f.debug_tuple("Path").field(&path.as_str()).finish(),
            Operation::Sync(_) => f.write_str("Sync(..)"),
            Operation::Async(_) => f.write_str("Async(..)"),
        }
    }
}

/// A dotted attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
}

impl FieldPath {
    /// Create a path without validating it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Path segments, split on `.`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.')
    }

    /// Check that the path has no empty segments.
    pub fn validate(&self) -> Result<(), String> {
        if self.raw.is_empty() {
            return Err("attribute path is empty".to_string());
        }
        if self.segments().any(str::is_empty) {
            return Err(format!("attribute path '{}' has an empty segment", self.raw));
        }
        Ok(())
    }

    /// Walk this path starting from the first segment's attribute.
    ///
    /// A missing intermediate value ends the walk with `None`.
    pub fn resolve(&self, root: impl FnOnce(&str) -> Option<FieldValue>) -> Option<FieldValue> {
        let mut segments = self.segments();
        let first = segments.next()?;
        segments.try_fold(root(first)?, |value, segment| value.lookup(segment))
    }
}
