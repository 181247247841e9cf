//! Memoized construction of composite field types.

use std::sync::Arc;

use fieldgraph_model::{FieldShape, FieldTypeCategory, NameContext, OutputType, ShapeAttribute};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::catalog::FieldShapeCatalog;
use crate::config::NamingConfig;
use crate::error::{Result, SchemaError};
use crate::graphql::{ObjectTypeDef, SchemaRegistry};
use crate::naming::NameSynthesizer;

/// Composite types declared for field type categories.
///
/// Each `(category, repeatable)` pair maps to one type named
/// `<prefix><synthesized display name>[<suffix>]`, e.g. `FieldsingleLine`
/// and `FieldsingleLineRepeatable`. The synthesized part is appended
/// verbatim. The first request builds and registers the type; later
/// requests return the memoized name. Entries are never replaced or
/// removed.
pub struct TypeRegistry {
    naming: NameSynthesizer,
    catalog: FieldShapeCatalog,
    config: NamingConfig,
    type_description: String,
    types: IndexMap<String, Arc<FieldShape>>,
}

impl TypeRegistry {
    pub fn new(
        naming: NameSynthesizer,
        catalog: FieldShapeCatalog,
        config: NamingConfig,
        type_description: impl Into<String>,
    ) -> Self {
        Self {
            naming,
            catalog,
            config,
            type_description: type_description.into(),
            types: IndexMap::new(),
        }
    }

    /// The composite type name for a category, without registering anything.
    pub fn type_name_for(&self, category: &FieldTypeCategory, is_repeatable: bool) -> Result<String> {
        let base = self
            .naming
            .synthesize(&category.display_name, NameContext::CustomFieldType)?;
        let suffix = if is_repeatable {
            self.config.repeatable_suffix.as_str()
        } else {
            ""
        };
        Ok(format!("{}{}{}", self.config.type_prefix, base, suffix))
    }

    /// Returns the composite type for a category, building and registering
    /// it on first use.
    ///
    /// A repeatable type wraps the singular one, which is obtained first.
    pub fn obtain_type(
        &mut self,
        category: &FieldTypeCategory,
        is_repeatable: bool,
        registry: &mut dyn SchemaRegistry,
    ) -> Result<String> {
        let type_name = self.type_name_for(category, is_repeatable)?;
        if self.types.contains_key(&type_name) {
            debug!(type_name = %type_name, "Composite type already defined");
            return Ok(type_name);
        }

        let shape = if is_repeatable {
            let single_type_name = self.obtain_type(category, false, registry)?;
            Self::repeatable_shape(single_type_name)
        } else {
            self.catalog.shape_for(category)?
        };
        let shape = Arc::new(shape);

        registry
            .register_object_type(ObjectTypeDef {
                name: type_name.clone(),
                description: format!("{}: {}", self.type_description, category.slug),
                shape: Arc::clone(&shape),
            })
            .map_err(|source| SchemaError::TypeRegistrationFailed {
                type_name: type_name.clone(),
                source,
            })?;

        info!(type_name = %type_name, category = %category.slug, is_repeatable, "Registered composite type");
        self.types.insert(type_name.clone(), shape);
        Ok(type_name)
    }

    /// The shape a type was registered with.
    pub fn shape_of(&self, type_name: &str) -> Option<Arc<FieldShape>> {
        self.types.get(type_name).cloned()
    }

    /// Registered type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn repeatable_shape(single_type_name: String) -> FieldShape {
        FieldShape::empty()
            .with(
                FieldShape::RAW,
                ShapeAttribute::list(OutputType::String, "Raw field data."),
            )
            .with(
                FieldShape::REPEATABLE,
                ShapeAttribute::list(
                    OutputType::Object(single_type_name),
                    "An array of single field values.",
                ),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::graphql::{FieldRegistration, InMemorySchemaRegistry};
    use crate::hooks::{ExtensionHooks, NoHooks};
    use fieldgraph_model::{ExposedContentType, Multiplicity};
    use pretty_assertions::assert_eq;

    fn type_registry(hooks: Arc<dyn ExtensionHooks>) -> TypeRegistry {
        TypeRegistry::new(
            NameSynthesizer::new(Arc::clone(&hooks)),
            FieldShapeCatalog::new(hooks),
            NamingConfig::default(),
            "Custom field type",
        )
    }

    fn image() -> FieldTypeCategory {
        FieldTypeCategory::new("image", "Image")
    }

    #[test]
    fn singular_type_name() {
        let types = type_registry(Arc::new(NoHooks));
        let multi_word = FieldTypeCategory::new("textfield", "Single line");
        assert_eq!(types.type_name_for(&image(), false).unwrap(), "Fieldimage");
        assert_eq!(
            types.type_name_for(&multi_word, false).unwrap(),
            "FieldsingleLine"
        );
        assert_eq!(
            types.type_name_for(&multi_word, true).unwrap(),
            "FieldsingleLineRepeatable"
        );
    }

    #[test]
    fn obtain_is_memoized() {
        let mut types = type_registry(Arc::new(NoHooks));
        let mut registry = InMemorySchemaRegistry::new();

        let first = types.obtain_type(&image(), false, &mut registry).unwrap();
        let first_shape = types.shape_of(&first).unwrap();
        let second = types.obtain_type(&image(), false, &mut registry).unwrap();
        let second_shape = types.shape_of(&second).unwrap();

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first_shape, &second_shape));
        assert_eq!(types.len(), 1);
        assert_eq!(registry.object_types().count(), 1);
    }

    #[test]
    fn shape_of_returns_what_was_registered() {
        let mut types = type_registry(Arc::new(NoHooks));
        let mut registry = InMemorySchemaRegistry::new();

        let name = types.obtain_type(&image(), false, &mut registry).unwrap();
        let registered = &registry.object_type(&name).unwrap().shape;
        assert!(Arc::ptr_eq(registered, &types.shape_of(&name).unwrap()));
        assert!(types.shape_of("FieldUnknown").is_none());
    }

    #[test]
    fn repeatable_wraps_singular() {
        let mut types = type_registry(Arc::new(NoHooks));
        let mut registry = InMemorySchemaRegistry::new();

        let name = types.obtain_type(&image(), true, &mut registry).unwrap();
        assert_eq!(name, "FieldimageRepeatable");

        let singular = types.obtain_type(&image(), false, &mut registry).unwrap();
        let shape = types.shape_of(&name).unwrap();
        let names: Vec<&str> = shape.names().collect();
        assert_eq!(names, vec!["raw", "repeatable"]);

        let raw = shape.get("raw").unwrap();
        assert_eq!(raw.multiplicity, Multiplicity::List);
        assert_eq!(raw.output_type, OutputType::String);

        let repeatable = shape.get("repeatable").unwrap();
        assert_eq!(repeatable.multiplicity, Multiplicity::List);
        assert_eq!(repeatable.output_type, OutputType::Object(singular));

        // Singular first, wrapper second, nothing registered twice.
        let registered: Vec<&str> = types.type_names().collect();
        assert_eq!(registered, vec!["Fieldimage", "FieldimageRepeatable"]);
        assert_eq!(registry.object_types().count(), 2);
    }

    /// Accepts content types but fails every object type registration.
    struct RejectingRegistry;

    impl SchemaRegistry for RejectingRegistry {
        fn expose_content_type(&mut self, _: &ExposedContentType) -> Result<(), RegistryError> {
            Ok(())
        }

        fn register_object_type(&mut self, def: ObjectTypeDef) -> Result<(), RegistryError> {
            Err(RegistryError::Rejected(def.name))
        }

        fn register_field(&mut self, _: &str, _: FieldRegistration) -> Result<(), RegistryError> {
            Ok(())
        }
    }

    #[test]
    fn registration_failure_is_propagated() {
        let mut types = type_registry(Arc::new(NoHooks));
        let err = types
            .obtain_type(&image(), false, &mut RejectingRegistry)
            .unwrap_err();
        match err {
            SchemaError::TypeRegistrationFailed { type_name, .. } => {
                assert_eq!(type_name, "Fieldimage")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(types.is_empty());
    }
}
