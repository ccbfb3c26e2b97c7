//! Merging request templates into class defaults.
//!
//! # Rules
//!
//! Given a request template, a class's default template and the keys the
//! class can resolve:
//!
//! 1. **Map with a `"*"` key**: the defaults are extended with the request's
//!    other keys, then every resolvable key receives the `"*"` value as its
//!    sub-template. Map nodes get it injected as their own `"*"` key, other
//!    nodes are replaced by `{"*": sub}`. Keys explicitly excluded stay
//!    excluded.
//! 2. **Map without a `"*"` key**: the defaults shallow-extended with the
//!    request (request keys win).
//! 3. **`"*"`**: every resolvable key is included. Map nodes get `"*": true`,
//!    everything else becomes `"*"`.
//! 4. **Anything else** (`true`, `false`, `null`): a copy of the defaults.
//!
//! Every function here returns a freshly built [`TemplateMap`]; the defaults
//! are only ever borrowed.

use crate::types::{Template, TemplateMap, WILDCARD};

/// Produce the effective template for one projection call.
pub fn merge_template<I>(request: &Template, defaults: &TemplateMap, op_keys: I) -> TemplateMap
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    match request {
        Template::Fields(fields) => match fields.get(WILDCARD) {
            Some(sub) if sub.is_included() => apply_to_siblings(fields, sub, defaults, op_keys),
            _ => without_wildcard(extend_template(defaults, fields)),
        },
        Template::Wildcard => include_everything(defaults, op_keys),
        Template::Include | Template::Exclude => defaults.clone(),
    }
}

/// Shallow union of `base` and `partial`; `partial` wins on conflicts.
///
/// Keys already in `base` keep their position, new keys are appended.
pub fn extend_template(base: &TemplateMap, partial: &TemplateMap) -> TemplateMap {
    let mut merged = base.clone();
    for (key, node) in partial {
        merged.insert(key.clone(), node.clone());
    }
    merged
}

fn without_wildcard(mut template: TemplateMap) -> TemplateMap {
    template.shift_remove(WILDCARD);
    template
}

fn apply_to_siblings<I>(
    request: &TemplateMap,
    sub: &Template,
    defaults: &TemplateMap,
    op_keys: I,
) -> TemplateMap
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut merged = without_wildcard(extend_template(defaults, request));

    for key in op_keys {
        let key = key.as_ref();
        match merged.get_mut(key) {
            Some(Template::Fields(nested)) => {
                nested.insert(WILDCARD.to_string(), sub.clone());
            }
            Some(Template::Exclude) => {}
            Some(node) => *node = wildcard_map(sub),
            None => {
                merged.insert(key.to_string(), wildcard_map(sub));
            }
        }
    }

    merged
}

fn include_everything<I>(defaults: &TemplateMap, op_keys: I) -> TemplateMap
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut merged = defaults.clone();

    for key in op_keys {
        let key = key.as_ref();
        match merged.get_mut(key) {
            Some(Template::Fields(nested)) => {
                nested.insert(WILDCARD.to_string(), Template::Include);
            }
            Some(node) => *node = Template::Wildcard,
            None => {
                merged.insert(key.to_string(), Template::Wildcard);
            }
        }
    }

    merged
}

fn wildcard_map(sub: &Template) -> Template {
    Template::fields([(WILDCARD, sub.clone())])
}
