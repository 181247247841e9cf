//! Reshaping raw field values into their declared output shape.

use std::sync::Arc;

use fieldgraph_model::{FieldShape, RawValueBag};
use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};

/// Projects raw value bags onto the *singular* shape of one field type.
///
/// Whether the singular or the repeatable layout is produced depends on
/// the bag, not on the schema type the field was declared with.
/// Translation is pure, so one translator can serve concurrent resolvers.
#[derive(Debug, Clone)]
pub struct ValueTranslator {
    shape: Arc<FieldShape>,
}

impl ValueTranslator {
    pub fn new(singular_shape: Arc<FieldShape>) -> Self {
        Self {
            shape: singular_shape,
        }
    }

    pub fn translate(&self, bag: &RawValueBag) -> Result<Value> {
        translate(&self.shape, bag)
    }
}

/// Translates `bag` against `singular_shape`.
///
/// A singular bag yields exactly the attributes declared by the shape. A
/// repeatable bag yields `{ raw, repeatable }` where `raw` is passed through
/// and `repeatable` holds one singular projection per item. When the bag
/// has no per-item breakdown, one item is synthesized per raw value so both
/// lists keep the same length; attributes other than `raw` are null on
/// synthesized items. A breakdown whose length differs from `raw` is
/// rejected as malformed.
pub fn translate(singular_shape: &FieldShape, bag: &RawValueBag) -> Result<Value> {
    match bag {
        RawValueBag::Single(values) => project(singular_shape, values).map(Value::Object),
        RawValueBag::Repeatable { raw, repeatable } => {
            let items = match repeatable {
                Some(items) if items.len() != raw.len() => {
                    return Err(SchemaError::MalformedRawValue(format!(
                        "{} raw values but {} repeatable items",
                        raw.len(),
                        items.len()
                    )));
                }
                Some(items) => items
                    .iter()
                    .map(|item| project(singular_shape, item).map(Value::Object))
                    .collect::<Result<Vec<_>>>()?,
                None => raw
                    .iter()
                    .map(|value| Value::Object(synthesize_item(singular_shape, value)))
                    .collect(),
            };

            let mut out = Map::new();
            out.insert(FieldShape::RAW.to_string(), Value::Array(raw.clone()));
            out.insert(FieldShape::REPEATABLE.to_string(), Value::Array(items));
            Ok(Value::Object(out))
        }
    }
}

/// Copies every declared attribute out of `values`. Fails on the first
/// attribute the content engine did not provide.
fn project(shape: &FieldShape, values: &Map<String, Value>) -> Result<Map<String, Value>> {
    shape
        .names()
        .map(|name| {
            values
                .get(name)
                .map(|value| (name.to_string(), value.clone()))
                .ok_or_else(|| SchemaError::MissingRawAttribute {
                    attribute: name.to_string(),
                })
        })
        .collect()
}

fn synthesize_item(shape: &FieldShape, raw: &Value) -> Map<String, Value> {
    shape
        .names()
        .map(|name| {
            let value = if name == FieldShape::RAW {
                raw.clone()
            } else {
                Value::Null
            };
            (name.to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FieldShapeCatalog;
    use fieldgraph_model::FieldTypeCategory;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn shape(slug: &str) -> Arc<FieldShape> {
        Arc::new(FieldShapeCatalog::builtin_shape(&FieldTypeCategory::new(
            slug, slug,
        )))
    }

    fn bag(value: Value, repeatable: bool) -> RawValueBag {
        RawValueBag::from_json(value, repeatable).unwrap()
    }

    // ── Singular ─────────────────────────────────────────────────

    #[test]
    fn singular_value_passes_through() {
        let translator = ValueTranslator::new(shape("image"));
        let out = translator
            .translate(&bag(json!({"raw": "x", "attachment_id": 5}), false))
            .unwrap();
        assert_eq!(out, json!({"raw": "x", "attachment_id": 5}));
    }

    #[test]
    fn undeclared_keys_are_dropped() {
        let translator = ValueTranslator::new(shape("textfield"));
        let out = translator
            .translate(&bag(json!({"raw": "x", "rendered": "<p>x</p>"}), false))
            .unwrap();
        assert_eq!(out, json!({"raw": "x"}));
    }

    #[test]
    fn output_follows_shape_order() {
        let translator = ValueTranslator::new(shape("checkboxes"));
        let out = translator
            .translate(&bag(json!({"checked": ["a"], "raw": "a"}), false))
            .unwrap();
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["raw", "checked"]);
    }

    #[test]
    fn missing_declared_attribute_fails() {
        let translator = ValueTranslator::new(shape("checkboxes"));
        let err = translator
            .translate(&bag(json!({"raw": "a"}), false))
            .unwrap_err();
        match err {
            SchemaError::MissingRawAttribute { attribute } => assert_eq!(attribute, "checked"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn null_values_are_not_missing() {
        let translator = ValueTranslator::new(shape("date"));
        let out = translator
            .translate(&bag(json!({"raw": null, "formatted": null}), false))
            .unwrap();
        assert_eq!(out, json!({"raw": null, "formatted": null}));
    }

    // ── Repeatable ───────────────────────────────────────────────

    #[test]
    fn repeatable_breakdown_is_projected_per_item() {
        let translator = ValueTranslator::new(shape("date"));
        let out = translator
            .translate(&bag(
                json!({
                    "raw": ["1700000000", "1800000000"],
                    "repeatable": [
                        {"raw": "1700000000", "formatted": "November 14, 2023", "extra": 1},
                        {"raw": "1800000000", "formatted": "January 15, 2027"},
                    ],
                }),
                true,
            ))
            .unwrap();
        assert_eq!(
            out,
            json!({
                "raw": ["1700000000", "1800000000"],
                "repeatable": [
                    {"raw": "1700000000", "formatted": "November 14, 2023"},
                    {"raw": "1800000000", "formatted": "January 15, 2027"},
                ],
            })
        );
    }

    #[test]
    fn breakdown_length_must_match_raw() {
        let translator = ValueTranslator::new(shape("image"));
        let err = translator
            .translate(&bag(
                json!({
                    "raw": ["a.png", "b.png"],
                    "repeatable": [{"raw": "a.png", "attachment_id": 1}],
                }),
                true,
            ))
            .unwrap_err();
        assert!(matches!(err, SchemaError::MalformedRawValue(_)));
    }

    #[test]
    fn repeatable_without_breakdown_is_synthesized() {
        let translator = ValueTranslator::new(shape("textfield"));
        let out = translator
            .translate(&bag(json!({"raw": ["a", "b"]}), true))
            .unwrap();
        assert_eq!(
            out,
            json!({"raw": ["a", "b"], "repeatable": [{"raw": "a"}, {"raw": "b"}]})
        );
    }

    #[test]
    fn synthesized_items_keep_the_singular_shape() {
        let translator = ValueTranslator::new(shape("image"));
        let out = translator
            .translate(&bag(json!({"raw": ["a.png"]}), true))
            .unwrap();
        assert_eq!(
            out,
            json!({"raw": ["a.png"], "repeatable": [{"raw": "a.png", "attachment_id": null}]})
        );
    }

    #[test]
    fn repeatable_item_missing_attribute_fails() {
        let translator = ValueTranslator::new(shape("image"));
        let err = translator
            .translate(&bag(
                json!({"raw": ["a.png"], "repeatable": [{"raw": "a.png"}]}),
                true,
            ))
            .unwrap_err();
        assert!(matches!(err, SchemaError::MissingRawAttribute { .. }));
    }

    #[test]
    fn empty_repeatable_value() {
        let translator = ValueTranslator::new(shape("textfield"));
        let out = translator.translate(&bag(json!({"raw": []}), true)).unwrap();
        assert_eq!(out, json!({"raw": [], "repeatable": []}));
    }
}
