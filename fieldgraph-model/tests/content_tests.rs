use fieldgraph_model::{ContentTypeDefinition, NameContext};

// ── NameContext ──────────────────────────────────────────────────

#[test]
fn name_context_strings() {
    assert_eq!(NameContext::PostType.as_str(), "post_type");
    assert_eq!(NameContext::Taxonomy.as_str(), "taxonomy");
    assert_eq!(NameContext::CustomField.as_str(), "custom_field");
    assert_eq!(NameContext::CustomFieldType.as_str(), "custom_field_type");
}

#[test]
fn name_context_display_matches_serde() {
    for ctx in [
        NameContext::PostType,
        NameContext::Taxonomy,
        NameContext::CustomField,
        NameContext::CustomFieldType,
    ] {
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(json, format!("\"{}\"", ctx));
    }
}

// ── ContentTypeDefinition ────────────────────────────────────────

#[test]
fn content_type_defaults() {
    let def: ContentTypeDefinition = serde_json::from_str(r#"{"slug": "book"}"#).unwrap();
    assert_eq!(def.slug, "book");
    assert!(def.singular_label.is_none());
    assert!(def.plural_label.is_none());
    assert!(!def.show_in_rest);
}
