/*
 * dispatch.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Field resolution and view assembly.
 */

//! Field resolution.
//!
//! For one entity and one request template, the dispatcher:
//!
//! 1. merges the request into the class defaults,
//! 2. starts one resolution per included field that has an operation,
//! 3. waits for all of them (the first failure aborts the call),
//! 4. assembles the view object in effective-template key order, dropping
//!    fields that resolved to "not found".
//!
//! Resolutions run concurrently within the caller's task; nothing is spawned.

use futures::future::try_join_all;
use serde_json::Value;
use view_template::Template;

use crate::class::ViewClass;
use crate::entity::{Entity, View};
use crate::error::{BoxError, ViewError};
use crate::operation::Operation;
use crate::project::{ProjectionContext, project_value};
use crate::value::FieldValue;

/// Project `entity` using its class table and a request template.
pub async fn dispatch_fields<E: Entity>(
    entity: &E,
    class: &ViewClass<E>,
    request: &Template,
    ctx: &ProjectionContext,
) -> Result<View, ViewError> {
    ctx.check_depth(class.name())?;

    let template = class.effective_template(request);
    tracing::debug!(
        class = class.name(),
        fields = template.len(),
        depth = ctx.depth(),
        "Projecting entity"
    );

    let resolutions: Vec<_> = template
        .iter()
        .filter(|(_, sub)| sub.is_included())
        .filter_map(|(key, sub)| {
            let op = class.operation(key)?;
            Some(resolve_field(entity, class.name(), key, op, sub, ctx))
        })
        .collect();

    let results = try_join_all(resolutions).await?;

    let mut view = View::new();
    for (key, value) in results.into_iter().flatten() {
        view.insert(key, value);
    }
    Ok(view)
}

async fn resolve_field<E: Entity>(
    entity: &E,
    class_name: &str,
    key: &str,
    op: &Operation<E>,
    sub: &Template,
    ctx: &ProjectionContext,
) -> Result<Option<(String, Value)>, ViewError> {
    tracing::trace!(class = class_name, field = key, op = ?op, "Resolving field");

    let resolved = match resolve_operation(entity, op).await {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::debug!(class = class_name, field = key, error = %err, "Field accessor failed");
            return Err(ViewError::field_resolution(class_name, key, err));
        }
    };

    match resolved {
        Some(value) => {
            let projected = project_value(value, sub, ctx, key.to_string()).await?;
            Ok(Some((key.to_string(), projected)))
        }
        None => Ok(None),
    }
}

/// Run one operation against an entity.
pub async fn resolve_operation<E: Entity>(
    entity: &E,
    op: &Operation<E>,
) -> Result<Option<FieldValue>, BoxError> {
    match op {
        Operation::Path(path) => Ok(path.resolve(|name| entity.attribute(name))),
        Operation::Sync(accessor) => accessor(entity),
        Operation::Async(accessor) => accessor(entity).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use serde_json::json;

    struct Item {
        specials: Value,
    }

    static ITEM: Lazy<ViewClass<Item>> = Lazy::new(|| ViewClass::new("Item"));

    impl Entity for Item {
        fn attribute(&self, name: &str) -> Option<FieldValue> {
            (name == "specialObj").then(|| FieldValue::data(self.specials.clone()))
        }

        fn view_class() -> &'static ViewClass<Self> {
            &ITEM
        }
    }

    fn item() -> Item {
        Item {
            specials: json!({ "forMapping": "values" }),
        }
    }

    fn data(resolved: Option<FieldValue>) -> Option<Value> {
        match resolved? {
            FieldValue::Data(value) => Some(value),
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_path_operation() {
        let op = Operation::path("specialObj.forMapping");
        let resolved = resolve_operation(&item(), &op).await.unwrap();
        assert_eq!(data(resolved), Some(json!("values")));
    }

    #[tokio::test]
    async fn test_path_operation_missing() {
        let op = Operation::path("specialObj.nope.deeper");
        assert!(resolve_operation(&item(), &op).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sync_operation() {
        let op = Operation::compute(|i: &Item| i.specials["forMapping"].clone());
        let resolved = resolve_operation(&item(), &op).await.unwrap();
        assert_eq!(data(resolved), Some(json!("values")));
    }

    #[tokio::test]
    async fn test_async_operation() {
        let op = Operation::compute_async(|_: &Item| async { Ok::<_, BoxError>(Some(FieldValue::data(3))) });
        let resolved = resolve_operation(&item(), &op).await.unwrap();
        assert_eq!(data(resolved), Some(json!(3)));
    }

    #[tokio::test]
    async fn test_sync_error_is_wrapped() {
        let class = ViewClass::<Item>::new("Item")
            .with_template(Template::fields([("broken", Template::Include)]))
            .and_then(|class| class.with_operations([(
                "broken",
                Operation::try_compute(|_: &Item| Err("no such thing".into())),
            )]))
            .unwrap();

        let err = dispatch_fields(&item(), &class, &Template::Include, &ProjectionContext::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to resolve Item.broken: no such thing");
    }

    #[tokio::test]
    async fn test_empty_class_projects_to_empty_view() {
        let view = dispatch_fields(&item(), Lazy::force(&ITEM), &Template::Wildcard, &ProjectionContext::default())
            .await
            .unwrap();
        assert!(view.is_empty());
    }
}
