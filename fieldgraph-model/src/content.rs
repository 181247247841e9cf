//! Collaborator contracts of the content store.
//!
//! The schema engine never reads storage directly. A content store exposes
//! its post types, taxonomies and field groups through these traits, and
//! renders field values on demand as [`RawValueBag`]s.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{FieldTypeCategory, RawValueBag};

/// Identifier of a content item (a post).
pub type ItemId = u64;

/// The naming context a synthesized name belongs to.
///
/// Names are only deduplicated and recorded within one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameContext {
    PostType,
    Taxonomy,
    CustomField,
    CustomFieldType,
}

impl NameContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostType => "post_type",
            Self::Taxonomy => "taxonomy",
            Self::CustomField => "custom_field",
            Self::CustomFieldType => "custom_field_type",
        }
    }
}

impl fmt::Display for NameContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post type or taxonomy as registered by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeDefinition {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singular_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural_label: Option<String>,
    /// Seeds whether the type is exposed to the schema.
    #[serde(default)]
    pub show_in_rest: bool,
}

/// A content type that passed the exposure check, with its schema names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposedContentType {
    pub slug: String,
    pub context: NameContext,
    pub single_name: String,
    pub plural_name: String,
}

/// A content item a field resolver is invoked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ItemId,
    pub post_type: String,
}

/// The output purpose a field instance is rendered for.
///
/// Only the REST rendering is consumed: its bag layout (`raw` plus
/// type-specific keys, `repeatable` breakdown for repeatable fields) is
/// what value translation expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum RenderPurpose {
    Rest,
}

/// One field of one content item.
pub trait FieldInstance {
    /// Renders the stored value for the given purpose.
    fn render(&self, purpose: RenderPurpose) -> RawValueBag;
}

/// A custom field definition inside a field group.
pub trait FieldDefinition: Send + Sync {
    fn slug(&self) -> &str;

    /// Human-readable name; the schema field name is synthesized from it.
    fn name(&self) -> &str;

    fn field_type(&self) -> &FieldTypeCategory;

    fn is_repeatable(&self) -> bool;

    /// Binds the definition to a content item.
    fn instantiate(&self, item_id: ItemId) -> Box<dyn FieldInstance + '_>;
}

/// A group of field definitions assigned to some post types.
pub trait FieldGroup: Send + Sync {
    fn slug(&self) -> &str;

    fn field_definitions(&self) -> Vec<Arc<dyn FieldDefinition>>;
}

/// Filter passed to [`ContentModelProvider::field_groups`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroupQuery {
    pub domain: String,
    pub active_only: bool,
    pub assigned_to_post_type: String,
}

/// Source of field groups.
pub trait ContentModelProvider {
    /// Field groups matching the query, in the store's processing order.
    fn field_groups(&self, query: &FieldGroupQuery) -> Vec<Arc<dyn FieldGroup>>;
}

/// Source of post types and taxonomies.
pub trait ContentTypeProvider {
    fn post_types(&self) -> Vec<ContentTypeDefinition>;

    fn taxonomies(&self) -> Vec<ContentTypeDefinition>;
}
