//! Schema construction: exposes content types and binds custom fields.
//!
//! Construction is a single-threaded, one-shot pass. [`SchemaBinder::bind`]
//! consumes the binder and hands back a [`BoundSchema`] whose registries are
//! frozen behind `Arc`s; only the registered resolvers run afterwards, and
//! those are safe to call concurrently.

use std::sync::Arc;

use fieldgraph_model::{
    ContentItem, ContentModelProvider, ContentTypeDefinition, ContentTypeProvider,
    ExposedContentType, FieldDefinition, FieldGroup, FieldGroupQuery, NameContext, RenderPurpose,
};
use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, info, warn};

use crate::catalog::FieldShapeCatalog;
use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError};
use crate::graphql::{FieldRegistration, Resolver, SchemaRegistry};
use crate::hooks::{ConfiguredHooks, ExtensionHooks, expect_bool};
use crate::naming::{NameRecord, NameSynthesizer};
use crate::registry::TypeRegistry;
use crate::translate::ValueTranslator;

/// Drives name synthesis and type construction for a whole content model.
pub struct SchemaBinder {
    config: SchemaConfig,
    hooks: Arc<dyn ExtensionHooks>,
    naming: NameSynthesizer,
    types: TypeRegistry,
    names: NameRecord,
    exposed: Vec<ExposedContentType>,
    field_count: usize,
}

impl SchemaBinder {
    pub fn new(config: SchemaConfig, hooks: Arc<dyn ExtensionHooks>) -> Self {
        let naming = NameSynthesizer::new(Arc::clone(&hooks));
        let types = TypeRegistry::new(
            naming.clone(),
            FieldShapeCatalog::new(Arc::clone(&hooks)),
            config.naming.clone(),
            config.binding.type_description.clone(),
        );
        Self {
            config,
            hooks,
            naming,
            types,
            names: NameRecord::new(),
            exposed: Vec::new(),
            field_count: 0,
        }
    }

    /// A binder whose hooks are the static overrides of `config`.
    pub fn with_config(config: SchemaConfig) -> Self {
        let hooks = Arc::new(ConfiguredHooks::new(config.overrides.clone()));
        Self::new(config, hooks)
    }

    pub fn names(&self) -> &NameRecord {
        &self.names
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Runs the whole pass: content types first, then custom fields.
    pub fn bind(
        mut self,
        content_types: &dyn ContentTypeProvider,
        content: &dyn ContentModelProvider,
        registry: &mut dyn SchemaRegistry,
    ) -> Result<BoundSchema> {
        self.expose_content_types(content_types, registry)?;
        self.bind_custom_fields(content, registry)?;

        info!(
            exposed = self.exposed.len(),
            types = self.types.len(),
            fields = self.field_count,
            "Schema construction finished"
        );

        Ok(BoundSchema {
            types: Arc::new(self.types),
            names: Arc::new(self.names),
            exposed: self.exposed,
            field_count: self.field_count,
        })
    }

    /// Exposes every eligible post type and taxonomy.
    pub fn expose_content_types(
        &mut self,
        provider: &dyn ContentTypeProvider,
        registry: &mut dyn SchemaRegistry,
    ) -> Result<()> {
        for definition in provider.post_types() {
            self.expose_content_type(&definition, NameContext::PostType, registry)?;
        }
        for definition in provider.taxonomies() {
            self.expose_content_type(&definition, NameContext::Taxonomy, registry)?;
        }
        Ok(())
    }

    /// Whether a content type is exposed: seeded by its REST visibility,
    /// then decided by the exposure hook.
    pub fn is_exposed(&self, definition: &ContentTypeDefinition, context: NameContext) -> Result<bool> {
        expect_bool(
            "exposure",
            self.hooks
                .override_exposure(definition.show_in_rest, &definition.slug, context),
        )
    }

    /// Names and registers one content type if it is exposed.
    pub fn expose_content_type(
        &mut self,
        definition: &ContentTypeDefinition,
        context: NameContext,
        registry: &mut dyn SchemaRegistry,
    ) -> Result<Option<ExposedContentType>> {
        if !self.is_exposed(definition, context)? {
            debug!(slug = %definition.slug, %context, "Content type not exposed");
            return Ok(None);
        }

        let single_label = definition
            .singular_label
            .as_deref()
            .unwrap_or(&definition.slug);
        let plural_label = definition
            .plural_label
            .as_deref()
            .unwrap_or(&definition.slug);

        let single_name = self.naming.synthesize(single_label, context)?;
        self.names
            .record(context, definition.slug.clone(), single_name.clone());
        let plural_name = self.naming.synthesize(plural_label, context)?;

        let exposed = ExposedContentType {
            slug: definition.slug.clone(),
            context,
            single_name,
            plural_name,
        };
        registry
            .expose_content_type(&exposed)
            .map_err(|source| SchemaError::ContentTypeRegistrationFailed {
                name: exposed.single_name.clone(),
                source,
            })?;

        info!(
            slug = %exposed.slug,
            %context,
            single_name = %exposed.single_name,
            plural_name = %exposed.plural_name,
            "Exposed content type"
        );
        self.exposed.push(exposed.clone());
        Ok(Some(exposed))
    }

    /// Registers custom fields on every exposed post type. Returns the
    /// number of fields registered.
    ///
    /// Does nothing when no post type was exposed.
    pub fn bind_custom_fields(
        &mut self,
        content: &dyn ContentModelProvider,
        registry: &mut dyn SchemaRegistry,
    ) -> Result<usize> {
        if !self.names.has_context(NameContext::PostType) {
            debug!("No exposed post types, skipping custom fields");
            return Ok(0);
        }

        let post_types: Vec<ExposedContentType> = self
            .exposed
            .iter()
            .filter(|exposed| exposed.context == NameContext::PostType)
            .cloned()
            .collect();

        let mut registered = 0;
        for post_type in &post_types {
            registered += self.bind_post_type_fields(post_type, content, registry)?;
        }
        Ok(registered)
    }

    /// Registers one schema field per distinct custom field assigned to
    /// `post_type`.
    pub fn bind_post_type_fields(
        &mut self,
        post_type: &ExposedContentType,
        content: &dyn ContentModelProvider,
        registry: &mut dyn SchemaRegistry,
    ) -> Result<usize> {
        let query = FieldGroupQuery {
            domain: self.config.binding.domain.clone(),
            active_only: self.config.binding.active_only,
            assigned_to_post_type: post_type.slug.clone(),
        };
        let groups = content.field_groups(&query);
        let definitions = collect_field_definitions(&groups);

        for definition in definitions.values() {
            self.bind_field(post_type, Arc::clone(definition), registry)?;
        }
        Ok(definitions.len())
    }

    fn bind_field(
        &mut self,
        post_type: &ExposedContentType,
        definition: Arc<dyn FieldDefinition>,
        registry: &mut dyn SchemaRegistry,
    ) -> Result<()> {
        let field_name = self
            .naming
            .synthesize(definition.name(), NameContext::CustomField)?;
        self.names.record(
            NameContext::CustomField,
            definition.slug(),
            field_name.clone(),
        );

        let category = definition.field_type();
        let type_name = self
            .types
            .obtain_type(category, definition.is_repeatable(), registry)?;
        let single_type_name = self.types.obtain_type(category, false, registry)?;
        let single_shape = self
            .types
            .shape_of(&single_type_name)
            .ok_or_else(|| SchemaError::UnknownType(single_type_name.clone()))?;

        let description = format!(
            "{}: {}",
            self.config.binding.field_description,
            definition.slug()
        );
        let resolver = field_resolver(Arc::clone(&definition), ValueTranslator::new(single_shape));

        registry
            .register_field(
                &post_type.single_name,
                FieldRegistration {
                    name: field_name.clone(),
                    type_name: type_name.clone(),
                    description,
                    resolver,
                },
            )
            .map_err(|source| SchemaError::FieldRegistrationFailed {
                owner: post_type.single_name.clone(),
                field: field_name.clone(),
                source,
            })?;

        debug!(
            owner = %post_type.single_name,
            field = %field_name,
            type_name = %type_name,
            "Registered custom field"
        );
        self.field_count += 1;
        Ok(())
    }
}

/// Merges the field definitions of `groups` by slug.
///
/// A slug declared by several groups keeps the definition of the group
/// processed last, at the position it was first seen.
pub fn collect_field_definitions(
    groups: &[Arc<dyn FieldGroup>],
) -> IndexMap<String, Arc<dyn FieldDefinition>> {
    let mut definitions: IndexMap<String, Arc<dyn FieldDefinition>> = IndexMap::new();
    for group in groups {
        for definition in group.field_definitions() {
            match definitions.entry(definition.slug().to_string()) {
                Entry::Occupied(mut slot) => {
                    warn!(
                        slug = %slot.key(),
                        group = %group.slug(),
                        "Field slug declared by several groups, later group wins"
                    );
                    slot.insert(definition);
                }
                Entry::Vacant(slot) => {
                    slot.insert(definition);
                }
            }
        }
    }
    definitions
}

/// Instantiates the field on the item, renders it and translates the bag.
fn field_resolver(definition: Arc<dyn FieldDefinition>, translator: ValueTranslator) -> Resolver {
    Arc::new(move |item: &ContentItem| {
        let instance = definition.instantiate(item.id);
        let bag = instance.render(RenderPurpose::Rest);
        translator.translate(&bag)
    })
}

/// The result of a finished construction pass. Read-only.
#[derive(Clone)]
pub struct BoundSchema {
    types: Arc<TypeRegistry>,
    names: Arc<NameRecord>,
    exposed: Vec<ExposedContentType>,
    field_count: usize,
}

impl BoundSchema {
    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    pub fn names(&self) -> &Arc<NameRecord> {
        &self.names
    }

    pub fn exposed(&self) -> &[ExposedContentType] {
        &self.exposed
    }

    /// The exposed post type with the given slug.
    pub fn post_type(&self, slug: &str) -> Option<&ExposedContentType> {
        self.exposed
            .iter()
            .find(|exposed| exposed.context == NameContext::PostType && exposed.slug == slug)
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }
}
