//! Per-category output shapes of singular fields.

use std::sync::Arc;

use fieldgraph_model::{CategoryKind, FieldShape, FieldTypeCategory, OutputType, ShapeAttribute};

use crate::error::Result;
use crate::hooks::{ExtensionHooks, expect_shape};

/// Maps a field type category to the attributes its singular composite
/// type carries.
///
/// Every shape starts from `raw`; the fixed table adds at most one
/// category-specific attribute. The shape override hook sees the result
/// and may replace it.
#[derive(Clone)]
pub struct FieldShapeCatalog {
    hooks: Arc<dyn ExtensionHooks>,
}

impl FieldShapeCatalog {
    pub fn new(hooks: Arc<dyn ExtensionHooks>) -> Self {
        Self { hooks }
    }

    /// The shape every singular field carries.
    pub fn base_shape() -> FieldShape {
        FieldShape::empty().with(
            FieldShape::RAW,
            ShapeAttribute::single(OutputType::String, "Raw field value."),
        )
    }

    /// The shape from the fixed table, before the override hook runs.
    pub fn builtin_shape(category: &FieldTypeCategory) -> FieldShape {
        let shape = Self::base_shape();
        match category.kind() {
            CategoryKind::Attachment => shape.with(
                "attachment_id",
                ShapeAttribute::single(OutputType::Int, "ID of the attachment if one exists."),
            ),
            CategoryKind::Checkboxes => shape.with(
                "checked",
                ShapeAttribute::list(OutputType::String, "Values of checked options."),
            ),
            CategoryKind::Date => shape.with(
                "formatted",
                ShapeAttribute::single(
                    OutputType::String,
                    "Formatted date (and time) according to site settings.",
                ),
            ),
            CategoryKind::Skype => shape.with(
                "skypename",
                ShapeAttribute::single(
                    OutputType::String,
                    "Skype name even if the raw field value contains a more complex legacy data structure.",
                ),
            ),
            CategoryKind::Generic => shape,
        }
    }

    /// The singular shape for `category`, after the shape override hook.
    pub fn shape_for(&self, category: &FieldTypeCategory) -> Result<FieldShape> {
        let builtin = serde_json::to_value(Self::builtin_shape(category))?;
        expect_shape("shape", self.hooks.override_shape(builtin, &category.slug))
    }
}
