/*
 * entity.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Projectable capability and entity definitions.
 */

//! The projection capability.
//!
//! [`Projectable`] is the object-safe interface the value projector checks
//! for: anything implementing it is recursed into instead of being passed
//! through as data. Domain types normally implement [`Entity`] instead,
//! which supplies attributes and a class table and gets `Projectable` for
//! free.
//!
//! # Example
//!
//! ```ignore
//! use once_cell::sync::Lazy;
//! use serde_json::json;
//! use view_projection::{Entity, FieldValue, Operation, Template, ViewClass};
//!
//! struct User {
//!     profile: serde_json::Value,
//! }
//!
//! static USER: Lazy<ViewClass<User>> = Lazy::new(|| {
//!     ViewClass::new("User")
//!         .with_template(Template::fields([("name", Template::Include)]))
//!         .and_then(|class| {
//!             class.with_operations([
//!                 ("name", Operation::path("profile.name")),
//!                 ("age", Operation::compute(|_: &User| json!(42))),
//!             ])
//!         })
//!         .expect("valid User operations")
//! });
//!
//! impl Entity for User {
//!     fn attribute(&self, name: &str) -> Option<FieldValue> {
//!         (name == "profile").then(|| FieldValue::data(self.profile.clone()))
//!     }
//!
//!     fn view_class() -> &'static ViewClass<Self> {
//!         &USER
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde_json::Value;
use view_template::Template;

use crate::class::ViewClass;
use crate::dispatch::dispatch_fields;
use crate::error::ViewError;
use crate::project::ProjectionContext;
use crate::value::FieldValue;

/// A projected view object.
pub type View = serde_json::Map<String, Value>;

/// Something that can project itself into a view object.
#[async_trait]
pub trait Projectable: Send + Sync {
    /// Class name, for errors and logging.
    fn class_name(&self) -> &str;

    /// Look up a named attribute for path operations.
    fn attribute_value(&self, name: &str) -> Option<FieldValue>;

    /// Project with an explicit context.
    ///
    /// Nested projections are issued through this method with a context one
    /// level deeper than the caller's.
    async fn project(&self, template: &Template, ctx: &ProjectionContext)
    -> Result<View, ViewError>;

    /// Project with default options.
    async fn to_view(&self, template: &Template) -> Result<View, ViewError> {
        self.project(template, &ProjectionContext::default()).await
    }

    /// Read `request` as a template and project with default options.
    ///
    /// Fails with [`ViewError::InvalidTemplate`] before resolving any field if
    /// `request` is not an accepted template shape.
    async fn to_view_json(&self, request: &Value) -> Result<View, ViewError> {
        let template = Template::from_json(request)?;
        self.to_view(&template).await
    }
}

/// A domain type with a registered view class.
pub trait Entity: Send + Sync + Sized + 'static {
    /// Look up a named attribute for path operations.
    fn attribute(&self, name: &str) -> Option<FieldValue>;

    /// The class table describing this type's defaults.
    fn view_class() -> &'static ViewClass<Self>;
}

#[async_trait]
impl<E: Entity> Projectable for E {
    fn class_name(&self) -> &str {
        E::view_class().name()
    }

    fn attribute_value(&self, name: &str) -> Option<FieldValue> {
        Entity::attribute(self, name)
    }

    async fn project(
        &self,
        template: &Template,
        ctx: &ProjectionContext,
    ) -> Result<View, ViewError> {
        dispatch_fields(self, E::view_class(), template, ctx).await
    }
}
