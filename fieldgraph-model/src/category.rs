use serde::{Deserialize, Serialize};

/// A custom field type as declared by the content model.
///
/// The `slug` drives which extra output attributes apply; the
/// `display_name` is what composite GraphQL type names are derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldTypeCategory {
    pub slug: String,
    pub display_name: String,
}

impl FieldTypeCategory {
    pub const AUDIO: &'static str = "audio";
    pub const IMAGE: &'static str = "image";
    pub const VIDEO: &'static str = "video";
    pub const FILE: &'static str = "file";
    pub const CHECKBOXES: &'static str = "checkboxes";
    pub const DATE: &'static str = "date";
    pub const SKYPE: &'static str = "skype";

    pub fn new(slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            display_name: display_name.into(),
        }
    }

    /// The shape family this category belongs to.
    pub fn kind(&self) -> CategoryKind {
        CategoryKind::from_slug(&self.slug)
    }
}

/// Closed set of shape families, keyed by category slug.
///
/// Anything outside the fixed catalog falls back to [`CategoryKind::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// audio, image, video and file fields
    Attachment,
    Checkboxes,
    Date,
    Skype,
    Generic,
}

impl CategoryKind {
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            FieldTypeCategory::AUDIO
            | FieldTypeCategory::IMAGE
            | FieldTypeCategory::VIDEO
            | FieldTypeCategory::FILE => Self::Attachment,
            FieldTypeCategory::CHECKBOXES => Self::Checkboxes,
            FieldTypeCategory::DATE => Self::Date,
            FieldTypeCategory::SKYPE => Self::Skype,
            _ => Self::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_slugs_share_a_kind() {
        for slug in ["audio", "image", "video", "file"] {
            assert_eq!(CategoryKind::from_slug(slug), CategoryKind::Attachment);
        }
    }

    #[test]
    fn unknown_slug_is_generic() {
        assert_eq!(CategoryKind::from_slug("textfield"), CategoryKind::Generic);
        assert_eq!(CategoryKind::from_slug(""), CategoryKind::Generic);
        // Lookup is on the exact slug, not a prefix or case-folded match.
        assert_eq!(CategoryKind::from_slug("Image"), CategoryKind::Generic);
    }

    #[test]
    fn category_kind_follows_slug() {
        let cat = FieldTypeCategory::new("checkboxes", "Checkboxes");
        assert_eq!(cat.kind(), CategoryKind::Checkboxes);
    }
}
