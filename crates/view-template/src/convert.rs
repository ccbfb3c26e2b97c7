//! Conversion between templates and JSON-shaped data.
//!
//! Templates usually arrive as JSON (a request body, a config file). This
//! module maps the accepted shapes onto [`Template`] and rejects the rest:
//!
//! | JSON              | Template              |
//! |-------------------|-----------------------|
//! | `true`            | `Include`             |
//! | `false`, `null`   | `Exclude`             |
//! | `""`              | `Exclude`             |
//! | `"*"`             | `Wildcard`            |
//! | any other string  | `Include`             |
//! | object            | `Fields` (recursive)  |
//! | number, array     | error                 |

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::types::{Template, TemplateError, TemplateMap, WILDCARD};

impl Template {
    /// Read a template from a JSON value.
    pub fn from_json(value: &Value) -> Result<Template, TemplateError> {
        let mut path = Vec::new();
        convert_node(value, &mut path)
    }

    /// Render this template as JSON.
    ///
    /// Truthy strings other than `"*"` come back as `true`.
    pub fn to_json(&self) -> Value {
        match self {
            Template::Include => Value::Bool(true),
            Template::Exclude => Value::Bool(false),
            Template::Wildcard => Value::String(WILDCARD.to_string()),
            Template::Fields(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, node)| (key.clone(), node.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

fn convert_node(value: &Value, path: &mut Vec<String>) -> Result<Template, TemplateError> {
    match value {
        Value::Null | Value::Bool(false) => Ok(Template::Exclude),
        Value::Bool(true) => Ok(Template::Include),
        Value::String(s) if s.is_empty() => Ok(Template::Exclude),
        Value::String(s) if s == WILDCARD => Ok(Template::Wildcard),
        Value::String(_) => Ok(Template::Include),
        Value::Object(map) => {
            let mut fields = TemplateMap::with_capacity(map.len());
            for (key, child) in map {
                path.push(key.clone());
                let node = convert_node(child, path)?;
                path.pop();
                fields.insert(key.clone(), node);
            }
            Ok(Template::Fields(fields))
        }
        Value::Number(n) => Err(TemplateError::InvalidShape {
            path: path.clone(),
            reason: format!("number {} is not a template node", n),
        }),
        Value::Array(_) => Err(TemplateError::InvalidShape {
            path: path.clone(),
            reason: "a sequence is not a template node".to_string(),
        }),
    }
}

impl TryFrom<&Value> for Template {
    type Error = TemplateError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Template::from_json(value)
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Template::Include => serializer.serialize_bool(true),
            Template::Exclude => serializer.serialize_bool(false),
            Template::Wildcard => serializer.serialize_str(WILDCARD),
            Template::Fields(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, node) in fields {
                    map.serialize_entry(key, node)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Template::from_json(&value).map_err(D::Error::custom)
    }
}
