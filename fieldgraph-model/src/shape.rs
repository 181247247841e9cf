use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Whether an attribute holds one value or a list of values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    #[default]
    Single,
    List,
}

/// The element type of a shape attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    String,
    Int,
    /// A composite type registered under the given name.
    Object(String),
}

/// One output attribute of a composite type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeAttribute {
    #[serde(rename = "type")]
    pub output_type: OutputType,
    pub description: String,
    #[serde(default)]
    pub multiplicity: Multiplicity,
}

impl ShapeAttribute {
    /// A single-valued attribute.
    pub fn single(output_type: OutputType, description: impl Into<String>) -> Self {
        Self {
            output_type,
            description: description.into(),
            multiplicity: Multiplicity::Single,
        }
    }

    /// A list-valued attribute.
    pub fn list(output_type: OutputType, description: impl Into<String>) -> Self {
        Self {
            output_type,
            description: description.into(),
            multiplicity: Multiplicity::List,
        }
    }
}

/// Ordered set of output attributes declared by a composite type.
///
/// Attribute names are unique; insertion order is the order attributes are
/// declared to the schema. A well-formed shape always carries [`FieldShape::RAW`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldShape(IndexMap<String, ShapeAttribute>);

impl FieldShape {
    pub const RAW: &'static str = "raw";
    pub const REPEATABLE: &'static str = "repeatable";

    /// An empty shape. Callers are expected to add `raw` before using it.
    pub fn empty() -> Self {
        Self(IndexMap::new())
    }

    /// Builder-style insert. A repeated name replaces the earlier attribute
    /// in place.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, attribute: ShapeAttribute) -> Self {
        self.insert(name, attribute);
        self
    }

    /// Inserts an attribute, returning the one it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        attribute: ShapeAttribute,
    ) -> Option<ShapeAttribute> {
        self.0.insert(name.into(), attribute)
    }

    pub fn get(&self, name: &str) -> Option<&ShapeAttribute> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn has_raw(&self) -> bool {
        self.contains(Self::RAW)
    }

    /// True for the list-wrapper shape of a repeatable field.
    pub fn is_repeatable(&self) -> bool {
        self.contains(Self::REPEATABLE)
    }

    /// Attribute names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &ShapeAttribute)> {
        self.0.iter().map(|(name, attr)| (name.as_str(), attr))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
