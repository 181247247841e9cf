//! Extension hooks and validation of their results.
//!
//! Hooks return untyped JSON so that externally supplied overrides can be
//! plugged in without sharing Rust types. Every result is checked by
//! the caller; a value of the wrong kind is an
//! [`SchemaError::InvalidOverrideResult`], never coerced.

use fieldgraph_model::{FieldShape, NameContext};
use serde_json::Value;

use crate::config::OverridesConfig;
use crate::error::{Result, SchemaError};

/// Optional overrides invoked during schema construction.
///
/// Each method is called exactly once per call site. The defaults
/// return their input unchanged.
pub trait ExtensionHooks: Send + Sync {
    /// Overrides a synthesized name. Must return a string.
    fn override_name(&self, candidate: &str, original: &str, context: NameContext) -> Value {
        let _ = (original, context);
        Value::String(candidate.to_string())
    }

    /// Overrides whether a post type or taxonomy is exposed. Must return a bool.
    fn override_exposure(&self, default: bool, slug: &str, context: NameContext) -> Value {
        let _ = (slug, context);
        Value::Bool(default)
    }

    /// Overrides the singular shape of a field type. Must return an object
    /// describing a shape that still contains `raw`.
    fn override_shape(&self, shape: Value, category_slug: &str) -> Value {
        let _ = category_slug;
        shape
    }
}

/// Identity hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ExtensionHooks for NoHooks {}

/// Hooks backed by the static `[overrides]` tables of the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredHooks {
    overrides: OverridesConfig,
}

impl ConfiguredHooks {
    pub fn new(overrides: OverridesConfig) -> Self {
        Self { overrides }
    }
}

impl ExtensionHooks for ConfiguredHooks {
    fn override_name(&self, candidate: &str, original: &str, context: NameContext) -> Value {
        let name = self
            .overrides
            .names
            .get(context.as_str())
            .and_then(|names| names.get(original))
            .map_or(candidate, String::as_str);
        Value::String(name.to_string())
    }

    fn override_exposure(&self, default: bool, slug: &str, context: NameContext) -> Value {
        let exposed = self
            .overrides
            .exposure
            .get(context.as_str())
            .and_then(|slugs| slugs.get(slug))
            .copied()
            .unwrap_or(default);
        Value::Bool(exposed)
    }
}

pub(crate) fn expect_string(hook: &'static str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(invalid(hook, "a string", &other)),
    }
}

pub(crate) fn expect_bool(hook: &'static str, value: Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(invalid(hook, "a boolean", &other)),
    }
}

pub(crate) fn expect_shape(hook: &'static str, value: Value) -> Result<FieldShape> {
    if !value.is_object() {
        return Err(invalid(hook, "a field shape object", &value));
    }
    let shape: FieldShape =
        serde_json::from_value(value).map_err(|e| SchemaError::InvalidOverrideResult {
            hook,
            expected: "a field shape object",
            actual: e.to_string(),
        })?;
    if !shape.has_raw() {
        return Err(SchemaError::InvalidOverrideResult {
            hook,
            expected: "a field shape with a 'raw' attribute",
            actual: "a shape without 'raw'".to_string(),
        });
    }
    Ok(shape)
}

fn invalid(hook: &'static str, expected: &'static str, actual: &Value) -> SchemaError {
    SchemaError::InvalidOverrideResult {
        hook,
        expected,
        actual: describe(actual).to_string(),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn no_hooks_is_identity() {
        let hooks = NoHooks;
        assert_eq!(
            hooks.override_name("fooBar", "Foo Bar", NameContext::CustomField),
            json!("fooBar")
        );
        assert_eq!(
            hooks.override_exposure(true, "book", NameContext::PostType),
            json!(true)
        );
        assert_eq!(hooks.override_shape(json!({"a": 1}), "date"), json!({"a": 1}));
    }

    #[test]
    fn configured_name_override_is_per_context() {
        let mut names = BTreeMap::new();
        names.insert(
            "custom_field".to_string(),
            BTreeMap::from([("Legacy Price".to_string(), "price".to_string())]),
        );
        let hooks = ConfiguredHooks::new(OverridesConfig {
            names,
            ..Default::default()
        });

        assert_eq!(
            hooks.override_name("legacyPrice", "Legacy Price", NameContext::CustomField),
            json!("price")
        );
        assert_eq!(
            hooks.override_name("legacyPrice", "Legacy Price", NameContext::PostType),
            json!("legacyPrice")
        );
    }

    #[test]
    fn configured_exposure_override() {
        let mut exposure = BTreeMap::new();
        exposure.insert(
            "post_type".to_string(),
            BTreeMap::from([("page".to_string(), false)]),
        );
        let hooks = ConfiguredHooks::new(OverridesConfig {
            exposure,
            ..Default::default()
        });

        assert_eq!(
            hooks.override_exposure(true, "page", NameContext::PostType),
            json!(false)
        );
        assert_eq!(
            hooks.override_exposure(true, "post", NameContext::PostType),
            json!(true)
        );
        assert_eq!(
            hooks.override_exposure(false, "page", NameContext::Taxonomy),
            json!(false)
        );
    }

    #[test]
    fn expect_string_rejects_other_kinds() {
        assert_eq!(expect_string("name", json!("ok")).unwrap(), "ok");
        let err = expect_string("name", json!(42)).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidOverrideResult { hook: "name", ref actual, .. } if actual == "a number"
        ));
        assert!(expect_string("name", Value::Null).is_err());
    }

    #[test]
    fn expect_bool_rejects_truthy_strings() {
        assert!(expect_bool("exposure", json!(true)).unwrap());
        assert!(expect_bool("exposure", json!("true")).is_err());
        assert!(expect_bool("exposure", json!(1)).is_err());
    }

    #[test]
    fn expect_shape_requires_raw() {
        let ok = json!({"raw": {"type": "string", "description": "Raw field value."}});
        assert!(expect_shape("shape", ok).unwrap().has_raw());

        let no_raw = json!({"formatted": {"type": "string", "description": "x"}});
        assert!(expect_shape("shape", no_raw).is_err());

        assert!(expect_shape("shape", json!(["raw"])).is_err());
        assert!(expect_shape("shape", json!({"raw": 3})).is_err());
    }
}
