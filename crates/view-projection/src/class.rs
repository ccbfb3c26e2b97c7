/*
 * class.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-class default templates and operation tables.
 */

//! Class tables.
//!
//! A [`ViewClass`] holds everything projection needs to know about one entity
//! type: its default template and the operations that resolve its fields.
//! Tables are built once at startup (typically inside a `Lazy` static) and
//! are read-only afterwards.
//!
//! # Inheritance
//!
//! [`ViewClass::inherit`] copies a parent's current defaults into the
//! subclass as its base. Each call to [`ViewClass::define_template`] or
//! [`ViewClass::define_operations`] recomputes the class's defaults as the
//! union of that base and the given partial, with the partial winning on
//! conflicts. Calling either again replaces the previous partial rather than
//! layering on top of it.
//!
//! A parent that changes after its subclass was created is picked up with
//! [`ViewClass::rebase`], which re-reads the parent's current tables and
//! re-merges the subclass's own partials against them.

use std::fmt;

use indexmap::IndexMap;
use view_template::{Template, TemplateError, TemplateMap, extend_template, merge_template};

use crate::error::ViewError;
use crate::operation::Operation;

/// Operation table keyed by field name.
pub type OperationMap<E> = IndexMap<String, Operation<E>>;

/// Default template and operations for entity type `E`.
pub struct ViewClass<E> {
    name: String,
    base_template: TemplateMap,
    base_operations: OperationMap<E>,
    own_template: TemplateMap,
    own_operations: OperationMap<E>,
    template: TemplateMap,
    operations: OperationMap<E>,
}

impl<E> Clone for ViewClass<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            base_template: self.base_template.clone(),
            base_operations: self.base_operations.clone(),
            own_template: self.own_template.clone(),
            own_operations: self.own_operations.clone(),
            template: self.template.clone(),
            operations: self.operations.clone(),
        }
    }
}

impl<E> fmt::Debug for ViewClass<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewClass")
            .field("name", &self.name)
            .field("template", &self.template)
            .field("operations", &self.operations)
            .finish()
    }
}

impl<E: 'static> ViewClass<E> {
    /// Create a root class with empty defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_template: TemplateMap::new(),
            base_operations: OperationMap::new(),
            own_template: TemplateMap::new(),
            own_operations: OperationMap::new(),
            template: TemplateMap::new(),
            operations: OperationMap::new(),
        }
    }

    /// Create a subclass starting from `parent`'s current defaults.
    ///
    /// The parent's operations are lifted through `AsRef`; path operations
    /// resolve against the subclass's own attributes.
    pub fn inherit<P: 'static>(name: impl Into<String>, parent: &ViewClass<P>) -> Self
    where
        E: AsRef<P>,
    {
        let mut class = Self::new(name);
        class.rebase(parent);
        class
    }

    /// Re-read `parent`'s current defaults and re-merge this class's own
    /// partials against them.
    pub fn rebase<P: 'static>(&mut self, parent: &ViewClass<P>) -> &mut Self
    where
        E: AsRef<P>,
    {
        self.base_template = parent.template.clone();
        self.base_operations = parent
            .operations
            .iter()
            .map(|(key, op)| (key.clone(), op.clone().lift::<E>()))
            .collect();
        self.remerge_template();
        self.remerge_operations();
        tracing::trace!(class = %self.name, parent = %parent.name, "Rebased view class");
        self
    }

    /// Set this class's own template entries on top of the inherited ones.
    ///
    /// Fails with [`ViewError::InvalidTemplate`] unless `partial` is a map
    /// template; the class is left unchanged in that case.
    pub fn define_template(&mut self, partial: Template) -> Result<&mut Self, ViewError> {
        let Template::Fields(partial) = partial else {
            return Err(TemplateError::InvalidShape {
                path: Vec::new(),
                reason: format!("class template for {} must be a map of fields", self.name),
            }
            .into());
        };
        self.own_template = partial;
        self.remerge_template();
        tracing::trace!(class = %self.name, keys = self.template.len(), "Defined view template");
        Ok(self)
    }

    /// Set this class's own operations on top of the inherited ones.
    ///
    /// Fails with [`ViewError::InvalidOperationSignature`] if a path
    /// operation is malformed; the class is left unchanged in that case.
    pub fn define_operations<K, I>(&mut self, partial: I) -> Result<&mut Self, ViewError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Operation<E>)>,
    {
        let mut own = OperationMap::new();
        for (key, op) in partial {
            let key = key.into();
            if let Operation::Path(path) = &op {
                path.validate()
                    .map_err(|reason| ViewError::InvalidOperationSignature {
                        class: self.name.clone(),
                        field: key.clone(),
                        reason,
                    })?;
            }
            own.insert(key, op);
        }
        self.own_operations = own;
        self.remerge_operations();
        tracing::trace!(class = %self.name, keys = self.operations.len(), "Defined view operations");
        Ok(self)
    }

    fn remerge_template(&mut self) {
        self.template = extend_template(&self.base_template, &self.own_template);
    }

    fn remerge_operations(&mut self) {
        let mut operations = self.base_operations.clone();
        for (key, op) in &self.own_operations {
            operations.insert(key.clone(), op.clone());
        }
        self.operations = operations;
    }

    /// Builder form of [`ViewClass::define_template`].
    pub fn with_template(mut self, partial: Template) -> Result<Self, ViewError> {
        self.define_template(partial)?;
        Ok(self)
    }

    /// Builder form of [`ViewClass::define_operations`].
    pub fn with_operations<K, I>(mut self, partial: I) -> Result<Self, ViewError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Operation<E>)>,
    {
        self.define_operations(partial)?;
        Ok(self)
    }

    /// Class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default template.
    pub fn template(&self) -> &TemplateMap {
        &self.template
    }

    /// Operation table.
    pub fn operations(&self) -> &OperationMap<E> {
        &self.operations
    }

    /// Operation for a field, if one is registered.
    pub fn operation(&self, key: &str) -> Option<&Operation<E>> {
        self.operations.get(key)
    }

    /// Names of every field this class can resolve.
    pub fn op_keys(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Merge a request template into this class's defaults.
    pub fn effective_template(&self, request: &Template) -> TemplateMap {
        merge_template(request, &self.template, self.op_keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Parent;

    struct Child {
        parent: Parent,
    }

    impl AsRef<Parent> for Child {
        fn as_ref(&self) -> &Parent {
            &self.parent
        }
    }

    fn path_of<E>(class: &ViewClass<E>, key: &str) -> Option<String> {
        match class.operations.get(key)? {
            Operation::Path(path) => Some(path.as_str().to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_child_operations_override_parent() {
        let parent = ViewClass::<Parent>::new("Parent")
            .with_operations([
                ("x", Operation::path("p.x")),
                ("shared", Operation::path("p.shared")),
            ])
            .unwrap();

        let child = ViewClass::<Child>::inherit("Child", &parent)
            .with_operations([
                ("y", Operation::path("c.y")),
                ("shared", Operation::path("c.shared")),
            ])
            .unwrap();

        assert_eq!(path_of(&child, "x").as_deref(), Some("p.x"));
        assert_eq!(path_of(&child, "y").as_deref(), Some("c.y"));
        assert_eq!(path_of(&child, "shared").as_deref(), Some("c.shared"));
        assert_eq!(child.operations().len(), 3);

        // The parent is not affected by the child's definitions.
        assert_eq!(path_of(&parent, "shared").as_deref(), Some("p.shared"));
        assert!(parent.operation("y").is_none());
    }

    #[test]
    fn test_child_template_extends_parent() {
        let parent = ViewClass::<Parent>::new("Parent")
            .with_template(Template::fields([
                ("id", Template::Include),
                ("secret", Template::Include),
            ]))
            .unwrap();

        let child = ViewClass::<Child>::inherit("Child", &parent)
            .with_template(Template::fields([
                ("secret", Template::Exclude),
                ("title", Template::Include),
            ]))
            .unwrap();

        let keys: Vec<_> = child.template().keys().cloned().collect();
        assert_eq!(keys, vec!["id", "secret", "title"]);
        assert_eq!(child.template().get("secret"), Some(&Template::Exclude));
        assert_eq!(parent.template().get("secret"), Some(&Template::Include));
    }

    #[test]
    fn test_redefining_replaces_previous_partial() {
        let parent = ViewClass::<Parent>::new("Parent")
            .with_template(Template::fields([("id", Template::Include)]))
            .unwrap();

        let mut child = ViewClass::<Child>::inherit("Child", &parent);
        child.define_template(Template::fields([("first", Template::Include)])).unwrap();
        child.define_template(Template::fields([("second", Template::Include)])).unwrap();

        let keys: Vec<_> = child.template().keys().cloned().collect();
        assert_eq!(keys, vec!["id", "second"]);
    }

    #[test]
    fn test_redefining_merges_against_current_parent() {
        let mut parent = ViewClass::<Parent>::new("Parent")
            .with_template(Template::fields([("a", Template::Include)]))
            .unwrap();
        let mut child = ViewClass::<Child>::inherit("Child", &parent);

        parent
            .define_template(Template::fields([("b", Template::Include)]))
            .unwrap();
        child
            .rebase(&parent)
            .define_template(Template::fields([("c", Template::Include)]))
            .unwrap();

        let keys: Vec<_> = child.template().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_rebase_keeps_own_partials() {
        let mut parent = ViewClass::<Parent>::new("Parent")
            .with_operations([("x", Operation::path("p.x"))])
            .unwrap();
        let mut child = ViewClass::<Child>::inherit("Child", &parent)
            .with_template(Template::fields([("y", Template::Include)]))
            .and_then(|class| class.with_operations([("y", Operation::path("c.y"))]))
            .unwrap();

        parent
            .define_operations([("z", Operation::path("p.z"))])
            .unwrap();
        child.rebase(&parent);

        let keys: Vec<_> = child.op_keys().collect();
        assert_eq!(keys, vec!["z", "y"]);
        assert_eq!(path_of(&child, "y").as_deref(), Some("c.y"));
        assert_eq!(child.template().get("y"), Some(&Template::Include));
    }

    #[test]
    fn test_non_map_template_is_rejected() {
        let mut class = ViewClass::<Parent>::new("Parent")
            .with_template(Template::fields([("a", Template::Include)]))
            .unwrap();

        for partial in [Template::Wildcard, Template::Include, Template::Exclude] {
            let err = class.define_template(partial).unwrap_err();
            assert!(matches!(err, ViewError::InvalidTemplate(_)));
        }

        let keys: Vec<_> = class.template().keys().cloned().collect();
        assert_eq!(keys, vec!["a"]);
    }

    #[test]
    fn test_invalid_path_is_rejected() {
        let mut class = ViewClass::<Parent>::new("Parent");
        class
            .define_operations([("ok", Operation::path("a"))])
            .unwrap();

        let err = class
            .define_operations([("broken", Operation::path("a..b"))])
            .unwrap_err();

        assert!(matches!(
            &err,
            ViewError::InvalidOperationSignature { class, field, .. }
                if class == "Parent" && field == "broken"
        ));
        // Still holds the previous definition.
        assert!(class.operation("ok").is_some());
    }

    #[test]
    fn test_effective_template_uses_op_keys() {
        let class = ViewClass::<Parent>::new("Parent")
            .with_template(Template::fields([("a", Template::Include)]))
            .and_then(|class| class.with_operations([
                ("a", Operation::path("a")),
                ("b", Operation::compute(|_: &Parent| json!(1))),
            ]))
            .unwrap();

        let effective = class.effective_template(&Template::Wildcard);
        assert_eq!(effective.get("a"), Some(&Template::Wildcard));
        assert_eq!(effective.get("b"), Some(&Template::Wildcard));
    }

    #[test]
    fn test_effective_template_does_not_touch_defaults() {
        let class = ViewClass::<Parent>::new("Parent")
            .with_template(Template::fields([(
                "nested",
                Template::fields([("id", Template::Exclude)]),
            )]))
            .and_then(|class| class.with_operations([("nested", Operation::path("nested"))]))
            .unwrap();

        let _ = class.effective_template(&Template::Wildcard);

        let nested = class.template().get("nested").and_then(Template::as_fields).unwrap();
        assert!(!nested.contains_key("*"));
    }
}
