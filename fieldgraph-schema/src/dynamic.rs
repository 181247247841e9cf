//! A [`SchemaRegistry`] that assembles an executable `async-graphql` schema.
//!
//! Declarations are collected first and turned into a
//! [`dynamic::Schema`](Schema) by [`DynamicSchemaRegistry::finish`]:
//! - every exposed content type becomes an object with an `id` field plus
//!   the custom fields registered on it
//! - every composite type becomes an object whose fields read the
//!   translated field value
//! - every exposed post type gets a `Query` field looking an item up by id

use std::sync::Arc;

use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputValue, Object, ResolverContext, Schema, TypeRef,
};
use async_graphql::{Error as GqlError, Value as GqlValue};
use fieldgraph_model::{
    ContentItem, ExposedContentType, Multiplicity, NameContext, OutputType, ShapeAttribute,
};
use serde_json::Value as JsonValue;
use tracing::info;

use crate::error::{RegistryError, Result, SchemaError};
use crate::graphql::{
    FieldRegistration, InMemorySchemaRegistry, ObjectTypeDef, Resolver, SchemaRegistry,
};

/// Name of the root query object.
pub const QUERY_TYPE: &str = "Query";

/// Field every content type object carries, and the argument of the
/// item lookup.
pub const ID_FIELD: &str = "id";

/// Checks declarations against GraphQL naming rules and builds a
/// [`Schema`] from them.
#[derive(Debug, Default)]
pub struct DynamicSchemaRegistry {
    declarations: InMemorySchemaRegistry,
}

impl DynamicSchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything declared so far.
    pub fn declarations(&self) -> &InMemorySchemaRegistry {
        &self.declarations
    }

    /// Builds the executable schema.
    ///
    /// Fails when no post type was exposed, since the query root would
    /// have no fields, or when `async-graphql` rejects the result.
    pub fn finish(&self) -> Result<Schema> {
        let mut query = Object::new(QUERY_TYPE);
        let mut lookups = 0;
        let mut objects = Vec::new();

        for exposed in self.declarations.content_types() {
            objects.push(self.content_type_object(exposed));
            if exposed.context == NameContext::PostType {
                query = query.field(item_lookup(exposed));
                lookups += 1;
            }
        }
        if lookups == 0 {
            return Err(SchemaError::SchemaBuild(
                "no post type is exposed, the query root would be empty".to_string(),
            ));
        }

        for def in self.declarations.object_types() {
            objects.push(composite_object(def));
        }

        let mut builder = Schema::build(QUERY_TYPE, None, None).register(query);
        for object in objects {
            builder = builder.register(object);
        }
        let schema = builder
            .finish()
            .map_err(|e| SchemaError::SchemaBuild(e.to_string()))?;

        info!(
            content_types = self.declarations.content_types().count(),
            composite_types = self.declarations.object_types().count(),
            "GraphQL schema assembled"
        );
        Ok(schema)
    }

    fn content_type_object(&self, exposed: &ExposedContentType) -> Object {
        let mut object = Object::new(exposed.single_name.as_str())
            .description(format!("{}: {}", exposed.context, exposed.slug))
            .field(Field::new(
                ID_FIELD,
                TypeRef::named_nn(TypeRef::ID),
                resolve_item_id,
            ));
        for field in self.declarations.fields_of(&exposed.single_name) {
            object = object.field(
                Field::new(
                    field.name.as_str(),
                    TypeRef::named(field.type_name.as_str()),
                    custom_field_resolver(Arc::clone(&field.resolver)),
                )
                .description(field.description.as_str()),
            );
        }
        object
    }
}

impl SchemaRegistry for DynamicSchemaRegistry {
    fn expose_content_type(&mut self, exposed: &ExposedContentType) -> Result<(), RegistryError> {
        check_name(&exposed.single_name)?;
        if exposed.single_name == QUERY_TYPE {
            return Err(RegistryError::DuplicateType(exposed.single_name.clone()));
        }
        self.declarations.expose_content_type(exposed)
    }

    fn register_object_type(&mut self, def: ObjectTypeDef) -> Result<(), RegistryError> {
        check_name(&def.name)?;
        if def.name == QUERY_TYPE {
            return Err(RegistryError::DuplicateType(def.name));
        }
        for name in def.shape.names() {
            check_name(name)?;
        }
        self.declarations.register_object_type(def)
    }

    fn register_field(
        &mut self,
        owner: &str,
        field: FieldRegistration,
    ) -> Result<(), RegistryError> {
        check_name(&field.name)?;
        if field.name == ID_FIELD {
            return Err(RegistryError::DuplicateField {
                owner: owner.to_string(),
                field: field.name,
            });
        }
        if self.declarations.object_type(&field.type_name).is_none() {
            return Err(RegistryError::Rejected(format!(
                "field '{}' refers to unregistered type '{}'",
                field.name, field.type_name
            )));
        }
        self.declarations.register_field(owner, field)
    }
}

/// GraphQL names match `[_A-Za-z][_0-9A-Za-z]*` and must not start with
/// `__`, which is reserved for introspection.
fn check_name(name: &str) -> Result<(), RegistryError> {
    let mut chars = name.chars();
    let well_formed = match chars.next() {
        Some(first) => {
            (first == '_' || first.is_ascii_alphabetic())
                && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        None => false,
    };
    if well_formed && !name.starts_with("__") {
        Ok(())
    } else {
        Err(RegistryError::Rejected(format!(
            "'{}' is not a valid GraphQL name",
            name
        )))
    }
}

fn type_ref(attribute: &ShapeAttribute) -> TypeRef {
    let element = match &attribute.output_type {
        OutputType::String => TypeRef::named(TypeRef::STRING),
        OutputType::Int => TypeRef::named(TypeRef::INT),
        OutputType::Object(name) => TypeRef::named(name.as_str()),
    };
    match attribute.multiplicity {
        Multiplicity::Single => element,
        Multiplicity::List => TypeRef::List(Box::new(element)),
    }
}

fn composite_object(def: &ObjectTypeDef) -> Object {
    let mut object = Object::new(def.name.as_str()).description(def.description.as_str());
    for (name, attribute) in def.shape.attributes() {
        let nested = matches!(attribute.output_type, OutputType::Object(_));
        object = object.field(
            Field::new(name, type_ref(attribute), attribute_resolver(name, nested))
                .description(attribute.description.as_str()),
        );
    }
    object
}

fn item_lookup(exposed: &ExposedContentType) -> Field {
    let post_type = exposed.slug.clone();
    Field::new(
        exposed.single_name.as_str(),
        TypeRef::named(exposed.single_name.as_str()),
        move |ctx: ResolverContext| {
            let post_type = post_type.clone();
            FieldFuture::new(async move {
                let id = match ctx.args.as_index_map().get(ID_FIELD) {
                    Some(GqlValue::Number(n)) => n.as_u64(),
                    _ => None,
                }
                .ok_or_else(|| GqlError::new("id must be a non-negative integer"))?;
                Ok(Some(FieldValue::owned_any(ContentItem { id, post_type })))
            })
        },
    )
    .argument(InputValue::new(ID_FIELD, TypeRef::named_nn(TypeRef::INT)))
    .description(format!("Looks up one {} by id.", exposed.slug))
}

fn resolve_item_id(ctx: ResolverContext<'_>) -> FieldFuture<'_> {
    FieldFuture::new(async move {
        let item = ctx
            .parent_value
            .downcast_ref::<ContentItem>()
            .ok_or_else(|| GqlError::new("parent is not a content item"))?;
        Ok(Some(FieldValue::value(GqlValue::from(item.id.to_string()))))
    })
}

/// Runs the registered resolver for the parent content item. The
/// translated value becomes the parent of the composite type's fields.
fn custom_field_resolver(
    resolver: Resolver,
) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static {
    move |ctx: ResolverContext| {
        let resolver = Arc::clone(&resolver);
        FieldFuture::new(async move {
            let item = ctx
                .parent_value
                .downcast_ref::<ContentItem>()
                .ok_or_else(|| GqlError::new("parent is not a content item"))?;
            let value = (*resolver)(item).map_err(|e| GqlError::new(e.to_string()))?;
            Ok(Some(FieldValue::owned_any(value)))
        })
    }
}

fn attribute_resolver(
    name: &str,
    nested: bool,
) -> impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static {
    let name = name.to_string();
    move |ctx: ResolverContext| {
        let name = name.clone();
        FieldFuture::new(async move {
            let parent = ctx
                .parent_value
                .downcast_ref::<JsonValue>()
                .ok_or_else(|| GqlError::new("parent is not a field value"))?;
            match parent.get(name.as_str()) {
                None | Some(JsonValue::Null) => Ok(None),
                Some(value) => to_field_value(value.clone(), nested).map(Some),
            }
        })
    }
}

/// Scalars become GraphQL values; objects stay JSON so nested composite
/// fields can read them.
fn to_field_value<'a>(value: JsonValue, nested: bool) -> async_graphql::Result<FieldValue<'a>> {
    match value {
        JsonValue::Null => Ok(FieldValue::NULL),
        JsonValue::Array(items) => {
            let items = items
                .into_iter()
                .map(|item| to_field_value(item, nested))
                .collect::<async_graphql::Result<Vec<_>>>()?;
            Ok(FieldValue::list(items))
        }
        value if nested => Ok(FieldValue::owned_any(value)),
        value => GqlValue::from_json(value)
            .map(FieldValue::value)
            .map_err(|e| GqlError::new(e.to_string())),
    }
}
