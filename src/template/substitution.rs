//! Token substitution engine for slide text

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::mapping::Mapping;

lazy_static! {
    /// `{{name}}`, also accepting spaces inside the braces: `{{ name }}`
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").unwrap();
}

/// Result of substituting one block of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution<'a> {
    pub text: Cow<'a, str>,
    pub replaced: usize,
}

impl Substitution<'_> {
    pub fn changed(&self) -> bool {
        matches!(self.text, Cow::Owned(_))
    }
}

/// Replace every `{{name}}` whose name maps to a scalar.
///
/// Unknown names and non-scalar values leave the token as written.
pub fn substitute_string<'a>(template: &'a str, mapping: &Mapping) -> Substitution<'a> {
    let mut replaced = 0;
    let text = TOKEN_PATTERN.replace_all(template, |caps: &Captures| {
        match mapping.scalar(&caps[1]) {
            Some(value) => {
                replaced += 1;
                value
            }
            None => caps[0].to_string(),
        }
    });

    if replaced == 0 {
        return Substitution {
            text: Cow::Borrowed(template),
            replaced,
        };
    }
    Substitution { text, replaced }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(value: serde_json::Value) -> Mapping {
        Mapping::from_value(value).unwrap()
    }

    #[test]
    fn test_substitute_simple() {
        let result = substitute_string("Hello, {{name}}!", &mapping(json!({"name": "World"})));
        assert_eq!(result.text, "Hello, World!");
        assert_eq!(result.replaced, 1);
        assert!(result.changed());
    }

    #[test]
    fn test_substitute_multiple_occurrences() {
        let result = substitute_string(
            "Order {{order_id}} for {{ customer }}: {{order_id}}",
            &mapping(json!({"order_id": "ORD-123", "customer": "Acme"})),
        );
        assert_eq!(result.text, "Order ORD-123 for Acme: ORD-123");
        assert_eq!(result.replaced, 3);
    }

    #[test]
    fn test_unknown_token_left_in_place() {
        let result = substitute_string("{{known}} and {{unknown}}", &mapping(json!({"known": 1})));
        assert_eq!(result.text, "1 and {{unknown}}");
        assert_eq!(result.replaced, 1);
    }

    #[test]
    fn test_null_and_non_scalar_values() {
        let result = substitute_string(
            "[{{gone}}] [{{table}}] [{{list}}]",
            &mapping(json!({"gone": null, "table": {"rows": []}, "list": [1]})),
        );
        assert_eq!(result.text, "[] [{{table}}] [{{list}}]");
    }

    #[test]
    fn test_no_tokens_borrows() {
        let result = substitute_string("plain text {single}", &mapping(json!({"single": "x"})));
        assert_eq!(result.replaced, 0);
        assert!(!result.changed());
    }

    #[test]
    fn test_value_with_braces_is_not_rescanned() {
        let result = substitute_string("{{a}}", &mapping(json!({"a": "{{b}}", "b": "no"})));
        assert_eq!(result.text, "{{b}}");
    }
}
