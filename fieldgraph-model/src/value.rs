use serde_json::{Map, Value};

use crate::FieldShape;

/// The untyped payload a content engine renders for one field instance.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValueBag {
    /// A singular field: arbitrary keys mapping to scalars or scalar lists.
    Single(Map<String, Value>),
    /// A repeatable field: the raw scalar list and, when the engine
    /// provides it, one value map per item.
    Repeatable {
        raw: Vec<Value>,
        repeatable: Option<Vec<Map<String, Value>>>,
    },
}

impl RawValueBag {
    /// Interprets a rendered JSON payload.
    ///
    /// `repeatable` tells which bag format the engine used. A singular
    /// payload must be an object; a repeatable one must be an object with a
    /// `raw` list and, optionally, a `repeatable` list of objects.
    pub fn from_json(value: Value, repeatable: bool) -> Result<Self, String> {
        let mut map = match value {
            Value::Object(map) => map,
            other => return Err(format!("expected an object, got {}", kind_of(&other))),
        };

        if !repeatable {
            return Ok(Self::Single(map));
        }

        let raw = match map.remove(FieldShape::RAW) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(format!(
                    "repeatable `raw` must be a list, got {}",
                    kind_of(&other)
                ));
            }
            None => return Err("repeatable value has no `raw` list".to_string()),
        };

        let repeatable = match map.remove(FieldShape::REPEATABLE) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(m) => Ok(m),
                        other => Err(format!(
                            "repeatable item must be an object, got {}",
                            kind_of(&other)
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(other) => {
                return Err(format!(
                    "`repeatable` must be a list, got {}",
                    kind_of(&other)
                ));
            }
        };

        Ok(Self::Repeatable { raw, repeatable })
    }

    pub fn is_repeatable(&self) -> bool {
        matches!(self, Self::Repeatable { .. })
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
