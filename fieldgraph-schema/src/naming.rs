//! Schema identifier synthesis.
//!
//! GraphQL names must be camel-case ASCII without punctuation or spaces.
//! [`NameSynthesizer`] turns arbitrary human labels into such names, and
//! [`NameRecord`] keeps track of which original slug received which name.

use std::collections::BTreeMap;
use std::sync::Arc;

use fieldgraph_model::NameContext;
use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;
use crate::hooks::{ExtensionHooks, expect_string};

/// Converts human-readable text into schema identifiers.
///
/// Holds no state apart from the hooks; equal input and equal hook
/// behaviour always produce the same name.
#[derive(Clone)]
pub struct NameSynthesizer {
    hooks: Arc<dyn ExtensionHooks>,
}

impl NameSynthesizer {
    pub fn new(hooks: Arc<dyn ExtensionHooks>) -> Self {
        Self { hooks }
    }

    /// Synthesizes a lower camel case name for `text`, then passes it
    /// through the name override hook.
    pub fn synthesize(&self, text: &str, context: NameContext) -> Result<String> {
        let candidate = camel_case_candidate(text);
        let name = expect_string(
            "name",
            self.hooks.override_name(&candidate, text, context),
        )?;
        debug!(%context, original = text, name = %name, "Synthesized name");
        Ok(name)
    }
}

/// The name synthesized for `text` before any override is applied.
///
/// Accents are transliterated away, everything that is not an ASCII letter
/// or whitespace becomes a word break, and the remaining words are joined
/// in lower camel case. Text without letters yields an empty string.
pub fn camel_case_candidate(text: &str) -> String {
    let ascii = deunicode::deunicode(text);

    let letters: String = ascii
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() || c.is_whitespace() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    let mut words = letters.split_whitespace();
    let mut name = String::with_capacity(letters.len());
    if let Some(first) = words.next() {
        name.push_str(first);
    }
    for word in words {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            name.push(head.to_ascii_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

/// Which original slug received which synthesized name, per context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameRecord {
    names: BTreeMap<NameContext, IndexMap<String, String>>,
}

impl NameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` for `slug`, returning the name it replaced.
    pub fn record(
        &mut self,
        context: NameContext,
        slug: impl Into<String>,
        name: impl Into<String>,
    ) -> Option<String> {
        self.names
            .entry(context)
            .or_default()
            .insert(slug.into(), name.into())
    }

    pub fn name_for(&self, context: NameContext, slug: &str) -> Option<&str> {
        self.names
            .get(&context)
            .and_then(|names| names.get(slug))
            .map(String::as_str)
    }

    /// True once at least one name was recorded in `context`.
    pub fn has_context(&self, context: NameContext) -> bool {
        self.names.get(&context).is_some_and(|names| !names.is_empty())
    }

    pub fn len(&self) -> usize {
        self.names.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
