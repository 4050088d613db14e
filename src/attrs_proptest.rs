//! Property-based tests for attribute-list parsing.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::attrs::{parse, tokenize, PairMode, IMPLICIT_KEY};
    use proptest::prelude::*;

    // ============================================================================
    // tokenize property tests
    // ============================================================================

    proptest! {
        /// Property: plain words separated by whitespace tokenize to themselves
        #[test]
        fn tokenize_plain_words(words in prop::collection::vec("[a-zA-Z0-9_.:=-]+", 0..8)) {
            let input = words.join(" ");
            let tokens = tokenize(&input).unwrap();
            prop_assert_eq!(tokens, words);
        }

        /// Property: double-quoted values survive with inner whitespace intact
        #[test]
        fn tokenize_quoted_value_preserved(value in "[a-zA-Z0-9 ]{0,20}") {
            let input = format!("key=\"{}\"", value);
            let tokens = tokenize(&input).unwrap();
            prop_assert_eq!(tokens, vec![format!("key={}", value)]);
        }

        /// Property: newlines behave exactly like spaces
        #[test]
        fn tokenize_newlines_equal_spaces(words in prop::collection::vec("[a-z]+=[a-z0-9]+", 1..6)) {
            let spaced = tokenize(&words.join(" ")).unwrap();
            let lined = tokenize(&words.join("\n")).unwrap();
            prop_assert_eq!(spaced, lined);
        }
    }

    // ============================================================================
    // parse property tests
    // ============================================================================

    proptest! {
        /// Property: every generated key=value pair is found in the map
        #[test]
        fn parse_strict_contains_every_pair(
            pairs in prop::collection::btree_map("[a-z][a-z0-9-]{0,10}", "[a-zA-Z0-9./]{0,10}", 0..8)
        ) {
            let input = pairs
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ");
            let map = parse(&input, PairMode::Strict).unwrap();
            prop_assert_eq!(map, pairs);
        }

        /// Property: parsing is independent of token order when keys are unique
        #[test]
        fn parse_order_irrelevant(
            pairs in prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{1,6}", 1..6)
        ) {
            let forward: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            let mut backward = forward.clone();
            backward.reverse();
            let a = parse(&forward.join(" "), PairMode::Strict).unwrap();
            let b = parse(&backward.join(" "), PairMode::Strict).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: a bare word is rejected in strict mode and named in implicit mode
        #[test]
        fn parse_bare_word_modes(word in "[a-z][a-z0-9_-]{0,10}") {
            prop_assert!(parse(&word, PairMode::Strict).is_err());
            let map = parse(&word, PairMode::ImplicitName).unwrap();
            prop_assert_eq!(map.get(IMPLICIT_KEY), Some(&word));
        }
    }
}
