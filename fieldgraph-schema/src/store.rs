//! A content model loaded from a JSON document.
//!
//! Holds post types, taxonomies, field groups and already-rendered field
//! values in memory. Stands in for a real content store in the CLI and in
//! tests.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use fieldgraph_model::{
    ContentModelProvider, ContentTypeDefinition, ContentTypeProvider, FieldDefinition, FieldGroup,
    FieldGroupQuery, FieldInstance, FieldTypeCategory, ItemId, Multiplicity, RawValueBag,
    RenderPurpose,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::catalog::FieldShapeCatalog;
use crate::error::{Result, SchemaError};

/// An in-memory content store.
#[derive(Debug, Clone, Default)]
pub struct StaticContentModel {
    post_types: Vec<ContentTypeDefinition>,
    taxonomies: Vec<ContentTypeDefinition>,
    field_groups: Vec<Arc<StaticFieldGroup>>,
}

impl StaticContentModel {
    /// Parses a content model document.
    ///
    /// Stored values are checked against each field's repeatability here,
    /// so rendering never fails later.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let document: ModelDocument = serde_json::from_str(contents)?;
        document.into_model()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

impl ContentTypeProvider for StaticContentModel {
    fn post_types(&self) -> Vec<ContentTypeDefinition> {
        self.post_types.clone()
    }

    fn taxonomies(&self) -> Vec<ContentTypeDefinition> {
        self.taxonomies.clone()
    }
}

impl ContentModelProvider for StaticContentModel {
    fn field_groups(&self, query: &FieldGroupQuery) -> Vec<Arc<dyn FieldGroup>> {
        self.field_groups
            .iter()
            .filter(|group| group.domain == query.domain)
            .filter(|group| !query.active_only || group.active)
            .filter(|group| {
                group
                    .assigned_to
                    .iter()
                    .any(|slug| *slug == query.assigned_to_post_type)
            })
            .map(|group| Arc::clone(group) as Arc<dyn FieldGroup>)
            .collect()
    }
}

#[derive(Debug)]
pub struct StaticFieldGroup {
    slug: String,
    domain: String,
    active: bool,
    assigned_to: Vec<String>,
    fields: Vec<Arc<StaticField>>,
}

impl FieldGroup for StaticFieldGroup {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn field_definitions(&self) -> Vec<Arc<dyn FieldDefinition>> {
        self.fields
            .iter()
            .map(|field| Arc::clone(field) as Arc<dyn FieldDefinition>)
            .collect()
    }
}

#[derive(Debug)]
pub struct StaticField {
    slug: String,
    name: String,
    field_type: FieldTypeCategory,
    repeatable: bool,
    values: BTreeMap<ItemId, RawValueBag>,
}

impl FieldDefinition for StaticField {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn field_type(&self) -> &FieldTypeCategory {
        &self.field_type
    }

    fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    fn instantiate(&self, item_id: ItemId) -> Box<dyn FieldInstance + '_> {
        Box::new(StaticFieldInstance {
            field: self,
            item_id,
        })
    }
}

struct StaticFieldInstance<'a> {
    field: &'a StaticField,
    item_id: ItemId,
}

impl FieldInstance for StaticFieldInstance<'_> {
    /// Renders the stored bag. An item without a stored value renders as an
    /// empty value carrying every attribute of the field type's built-in
    /// shape: `null`, or `[]` for list attributes. A repeatable field
    /// renders no items.
    fn render(&self, _purpose: RenderPurpose) -> RawValueBag {
        if let Some(bag) = self.field.values.get(&self.item_id) {
            return bag.clone();
        }
        if self.field.repeatable {
            return RawValueBag::Repeatable {
                raw: Vec::new(),
                repeatable: None,
            };
        }
        let empty = FieldShapeCatalog::builtin_shape(&self.field.field_type)
            .attributes()
            .map(|(name, attribute)| {
                let value = match attribute.multiplicity {
                    Multiplicity::Single => Value::Null,
                    Multiplicity::List => Value::Array(Vec::new()),
                };
                (name.to_string(), value)
            })
            .collect::<Map<String, Value>>();
        RawValueBag::Single(empty)
    }
}

// ── JSON document ────────────────────────────────────────────────

#[derive(Deserialize)]
struct ModelDocument {
    #[serde(default)]
    post_types: Vec<ContentTypeDefinition>,
    #[serde(default)]
    taxonomies: Vec<ContentTypeDefinition>,
    #[serde(default)]
    field_groups: Vec<GroupDocument>,
}

#[derive(Deserialize)]
struct GroupDocument {
    slug: String,
    #[serde(default = "default_domain")]
    domain: String,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    assigned_to: Vec<String>,
    #[serde(default)]
    fields: Vec<FieldDocument>,
}

#[derive(Deserialize)]
struct FieldDocument {
    slug: String,
    name: String,
    #[serde(rename = "type")]
    field_type: FieldTypeCategory,
    #[serde(default)]
    repeatable: bool,
    /// item id -> rendered value
    #[serde(default)]
    values: BTreeMap<ItemId, Value>,
}

fn default_domain() -> String {
    "posts".to_string()
}

fn default_active() -> bool {
    true
}

impl ModelDocument {
    fn into_model(self) -> Result<StaticContentModel> {
        let field_groups = self
            .field_groups
            .into_iter()
            .map(|group| {
                let fields = group
                    .fields
                    .into_iter()
                    .map(FieldDocument::into_field)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Arc::new(StaticFieldGroup {
                    slug: group.slug,
                    domain: group.domain,
                    active: group.active,
                    assigned_to: group.assigned_to,
                    fields,
                }))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(StaticContentModel {
            post_types: self.post_types,
            taxonomies: self.taxonomies,
            field_groups,
        })
    }
}

impl FieldDocument {
    fn into_field(self) -> Result<Arc<StaticField>> {
        let repeatable = self.repeatable;
        let values = self
            .values
            .into_iter()
            .map(|(item_id, value)| {
                RawValueBag::from_json(value, repeatable)
                    .map(|bag| (item_id, bag))
                    .map_err(|e| {
                        SchemaError::MalformedRawValue(format!(
                            "field '{}', item {}: {}",
                            self.slug, item_id, e
                        ))
                    })
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Arc::new(StaticField {
            slug: self.slug,
            name: self.name,
            field_type: self.field_type,
            repeatable,
            values,
        }))
    }
}
