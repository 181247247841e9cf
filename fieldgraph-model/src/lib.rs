//! Content model for fieldgraph.
//!
//! Defines the types shared between the schema engine and the content
//! store it reads from:
//! - [`FieldTypeCategory`]: the kind of a custom field (image, date, ...)
//! - [`FieldShape`]: the declared output attributes of a composite type
//! - [`RawValueBag`]: the untyped payload a content engine renders for one field
//! - [`ContentModelProvider`] / [`ContentTypeProvider`]: the collaborator
//!   traits a content store implements so its field groups, post types and
//!   taxonomies can be exposed
//!
//! Nothing in this crate performs I/O or holds global state.

mod category;
mod content;
mod shape;
mod value;

pub use category::{CategoryKind, FieldTypeCategory};
pub use content::{
    ContentItem, ContentModelProvider, ContentTypeDefinition, ContentTypeProvider,
    ExposedContentType, FieldDefinition, FieldGroup, FieldGroupQuery, FieldInstance, ItemId,
    NameContext, RenderPurpose,
};
pub use shape::{FieldShape, Multiplicity, OutputType, ShapeAttribute};
pub use value::RawValueBag;
