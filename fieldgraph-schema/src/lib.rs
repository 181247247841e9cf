//! Type-synthesis and naming engine mapping a custom-field content model
//! onto a GraphQL schema.
//!
//! Construction runs once at startup:
//! - [`NameSynthesizer`] turns human labels into camel-case identifiers
//! - [`FieldShapeCatalog`] decides which attributes each field type carries
//! - [`TypeRegistry`] builds and memoizes `Field<Type>[Repeatable]` composite types
//! - [`SchemaBinder`] walks post types, taxonomies and field groups and
//!   declares everything to a [`SchemaRegistry`]
//! - [`DynamicSchemaRegistry`] turns those declarations into an executable
//!   `async-graphql` schema
//!
//! At query time, the registered resolvers render field values through the
//! content store and reshape them with [`ValueTranslator`].

mod binder;
mod catalog;
mod config;
mod dynamic;
mod error;
mod graphql;
mod hooks;
mod naming;
mod registry;
mod store;
mod translate;

pub use binder::{BoundSchema, SchemaBinder, collect_field_definitions};
pub use catalog::FieldShapeCatalog;
pub use config::{BindingConfig, NamingConfig, OverridesConfig, SchemaConfig};
pub use dynamic::{DynamicSchemaRegistry, ID_FIELD, QUERY_TYPE};
pub use error::{RegistryError, Result, SchemaError};
pub use graphql::{
    FieldRegistration, InMemorySchemaRegistry, ObjectTypeDef, Resolver, SchemaRegistry,
};
pub use hooks::{ConfiguredHooks, ExtensionHooks, NoHooks};
pub use naming::{NameRecord, NameSynthesizer, camel_case_candidate};
pub use registry::TypeRegistry;
pub use store::{StaticContentModel, StaticField, StaticFieldGroup};
pub use translate::{ValueTranslator, translate};
