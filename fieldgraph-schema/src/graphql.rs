//! The GraphQL schema registry contract and an in-memory implementation.
//!
//! The engine only ever *declares* types and fields. [`InMemorySchemaRegistry`]
//! keeps every declaration in registration order and can invoke resolvers
//! directly; [`DynamicSchemaRegistry`](crate::DynamicSchemaRegistry) builds
//! an executable schema on top of it.

use std::fmt;
use std::sync::Arc;

use fieldgraph_model::{ContentItem, ExposedContentType, FieldShape};
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{RegistryError, Result};

/// Resolves one registered field for a content item.
pub type Resolver = Arc<dyn Fn(&ContentItem) -> Result<Value> + Send + Sync>;

/// A composite object type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTypeDef {
    pub name: String,
    pub description: String,
    pub shape: Arc<FieldShape>,
}

/// A field declared on an exposed content type.
#[derive(Clone)]
pub struct FieldRegistration {
    pub name: String,
    pub type_name: String,
    pub description: String,
    pub resolver: Resolver,
}

impl fmt::Debug for FieldRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistration")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Accepts type and field declarations from the schema binder.
pub trait SchemaRegistry {
    /// Attaches the schema names of a post type or taxonomy.
    fn expose_content_type(&mut self, exposed: &ExposedContentType) -> Result<(), RegistryError>;

    fn register_object_type(&mut self, def: ObjectTypeDef) -> Result<(), RegistryError>;

    /// Declares a field on an exposed content type, addressed by its
    /// singular schema name.
    fn register_field(&mut self, owner: &str, field: FieldRegistration)
    -> Result<(), RegistryError>;
}

/// Keeps all declarations in memory, in registration order.
#[derive(Debug, Default)]
pub struct InMemorySchemaRegistry {
    content_types: IndexMap<String, ExposedContentType>,
    object_types: IndexMap<String, ObjectTypeDef>,
    fields: IndexMap<String, IndexMap<String, FieldRegistration>>,
}

impl InMemorySchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type(&self, single_name: &str) -> Option<&ExposedContentType> {
        self.content_types.get(single_name)
    }

    pub fn content_types(&self) -> impl Iterator<Item = &ExposedContentType> {
        self.content_types.values()
    }

    pub fn object_type(&self, name: &str) -> Option<&ObjectTypeDef> {
        self.object_types.get(name)
    }

    pub fn object_types(&self) -> impl Iterator<Item = &ObjectTypeDef> {
        self.object_types.values()
    }

    pub fn field(&self, owner: &str, name: &str) -> Option<&FieldRegistration> {
        self.fields.get(owner).and_then(|fields| fields.get(name))
    }

    /// Fields of one owner in registration order.
    pub fn fields_of(&self, owner: &str) -> impl Iterator<Item = &FieldRegistration> {
        self.fields
            .get(owner)
            .into_iter()
            .flat_map(|fields| fields.values())
    }

    /// Invokes the resolver of `owner.field` for `item`.
    pub fn resolve(&self, owner: &str, field: &str, item: &ContentItem) -> Result<Value> {
        let registration =
            self.field(owner, field)
                .ok_or_else(|| RegistryError::UnknownField {
                    owner: owner.to_string(),
                    field: field.to_string(),
                })?;
        (registration.resolver)(item)
    }

    fn is_type_name_taken(&self, name: &str) -> bool {
        self.content_types.contains_key(name) || self.object_types.contains_key(name)
    }
}

impl SchemaRegistry for InMemorySchemaRegistry {
    fn expose_content_type(&mut self, exposed: &ExposedContentType) -> Result<(), RegistryError> {
        if exposed.single_name.is_empty() {
            return Err(RegistryError::Rejected(format!(
                "content type '{}' has an empty schema name",
                exposed.slug
            )));
        }
        if self.is_type_name_taken(&exposed.single_name) {
            return Err(RegistryError::DuplicateType(exposed.single_name.clone()));
        }
        self.content_types
            .insert(exposed.single_name.clone(), exposed.clone());
        Ok(())
    }

    fn register_object_type(&mut self, def: ObjectTypeDef) -> Result<(), RegistryError> {
        if self.is_type_name_taken(&def.name) {
            return Err(RegistryError::DuplicateType(def.name));
        }
        self.object_types.insert(def.name.clone(), def);
        Ok(())
    }

    fn register_field(
        &mut self,
        owner: &str,
        field: FieldRegistration,
    ) -> Result<(), RegistryError> {
        if !self.content_types.contains_key(owner) {
            return Err(RegistryError::UnknownOwner(owner.to_string()));
        }
        if field.name.is_empty() {
            return Err(RegistryError::Rejected(format!(
                "empty field name on '{}'",
                owner
            )));
        }
        let fields = self.fields.entry(owner.to_string()).or_default();
        if fields.contains_key(&field.name) {
            return Err(RegistryError::DuplicateField {
                owner: owner.to_string(),
                field: field.name,
            });
        }
        fields.insert(field.name.clone(), field);
        Ok(())
    }
}
