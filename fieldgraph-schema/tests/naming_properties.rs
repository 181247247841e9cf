//! Property-based tests for name synthesis.
//!
//! With identity hooks, every synthesized name must be:
//! - ASCII letters only
//! - lower camel case (first character lower-case)
//! - non-empty whenever the input contains a letter
//! - deterministic for equal input

use std::sync::Arc;

use fieldgraph_model::NameContext;
use fieldgraph_schema::{NameSynthesizer, NoHooks, camel_case_candidate};
use proptest::prelude::*;

fn synthesizer() -> NameSynthesizer {
    NameSynthesizer::new(Arc::new(NoHooks))
}

fn context_strategy() -> impl Strategy<Value = NameContext> {
    prop_oneof![
        Just(NameContext::PostType),
        Just(NameContext::Taxonomy),
        Just(NameContext::CustomField),
        Just(NameContext::CustomFieldType),
    ]
}

fn label_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 _\\-!?.,()éüñçøß]{0,40}").unwrap()
}

proptest! {
    #[test]
    fn output_is_ascii_letters_only(text in any::<String>(), ctx in context_strategy()) {
        let name = synthesizer().synthesize(&text, ctx).unwrap();
        prop_assert!(name.chars().all(|c| c.is_ascii_alphabetic()), "{name:?}");
    }

    #[test]
    fn output_starts_lower_case(text in label_strategy(), ctx in context_strategy()) {
        let name = synthesizer().synthesize(&text, ctx).unwrap();
        if let Some(first) = name.chars().next() {
            prop_assert!(first.is_ascii_lowercase(), "{name:?}");
        }
    }

    #[test]
    fn text_with_a_letter_yields_a_name(
        prefix in "[0-9 .-]{0,5}",
        word in "[a-zA-Z]{1,10}",
        suffix in "[0-9 .-]{0,5}",
    ) {
        let text = format!("{prefix}{word}{suffix}");
        let name = synthesizer().synthesize(&text, NameContext::CustomField).unwrap();
        prop_assert_eq!(name, word.to_ascii_lowercase());
    }

    #[test]
    fn words_are_camel_cased(words in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let name = camel_case_candidate(&words.join(" "));
        let mut expected = words[0].clone();
        for word in &words[1..] {
            expected.push_str(&word[..1].to_ascii_uppercase());
            expected.push_str(&word[1..]);
        }
        prop_assert_eq!(name, expected);
    }

    #[test]
    fn synthesis_is_deterministic(text in label_strategy(), ctx in context_strategy()) {
        let a = synthesizer().synthesize(&text, ctx).unwrap();
        let b = synthesizer().synthesize(&text, ctx).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn context_does_not_change_the_candidate(text in label_strategy()) {
        let field = synthesizer().synthesize(&text, NameContext::CustomField).unwrap();
        let post_type = synthesizer().synthesize(&text, NameContext::PostType).unwrap();
        prop_assert_eq!(field, post_type);
    }
}
