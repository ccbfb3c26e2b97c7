/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Resolved field values and path lookup.
 */

//! Values produced by field accessors.
//!
//! A resolved field is either plain data, another projectable entity, or a
//! sequence mixing both. "Not found" is represented by `Option::None` at the
//! call sites, never by a variant here.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::entity::Projectable;

/// A resolved field value.
#[derive(Clone)]
pub enum FieldValue {
    /// Plain data, passed through unchanged by projection.
    Data(Value),

    /// An entity that projects itself with the field's sub-template.
    Entity(Arc<dyn Projectable>),

    /// A sequence whose elements are each projected with the same
    /// sub-template.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Wrap plain data.
    pub fn data(value: impl Into<Value>) -> Self {
        FieldValue::Data(value.into())
    }

    /// Wrap an entity.
    pub fn entity<P: Projectable + 'static>(entity: P) -> Self {
        FieldValue::Entity(Arc::new(entity))
    }

    /// Build a sequence from anything convertible to field values.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FieldValue>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Step one path segment into this value.
    ///
    /// Objects are indexed by key, arrays and lists by numeric index, and
    /// entities through their own attributes. Anything else yields `None`.
    pub fn lookup(&self, segment: &str) -> Option<FieldValue> {
        match self {
            FieldValue::Data(Value::Object(map)) => map.get(segment).cloned().map(FieldValue::Data),
            FieldValue::Data(Value::Array(items)) => {
                let index = segment.parse::<usize>().ok()?;
                items.get(index).cloned().map(FieldValue::Data)
            }
            FieldValue::Data(_) => None,
            FieldValue::Entity(entity) => entity.attribute_value(segment),
            FieldValue::List(items) => {
                let index = segment.parse::<usize>().ok()?;
                items.get(index).cloned()
            }
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Data(value)
    }
}

impl From<Arc<dyn Projectable>> for FieldValue {
    fn from(entity: Arc<dyn Projectable>) -> Self {
        FieldValue::Entity(entity)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::List(items)
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Data(value) => f.debug_tuple("Data").field(value).finish(),
            FieldValue::Entity(entity) => f.debug_tuple("Entity").field(&entity.class_name()).finish(),
            FieldValue::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}
