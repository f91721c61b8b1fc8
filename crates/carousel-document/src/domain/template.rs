//! `{{variable}}` template substitution over JSON trees.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::warn;

/// Variables available to a template, keyed by identifier.
pub type Variables = BTreeMap<String, String>;

/// Replaces every `{{identifier}}` placeholder in string leaves.
///
/// Unknown identifiers stay literal. Object keys, numbers, booleans and nulls
/// pass through unchanged. Containers nested deeper than `max_depth` are
/// copied without substitution.
#[must_use]
pub fn substitute(value: &Value, variables: &Variables, max_depth: usize) -> Value {
    if variables.is_empty() {
        return value.clone();
    }
    walk(value, variables, 0, max_depth)
}

fn walk(value: &Value, variables: &Variables, depth: usize, max_depth: usize) -> Value {
    match value {
        Value::String(text) => Value::String(substitute_str(text, variables)),
        Value::Array(_) | Value::Object(_) if depth >= max_depth => {
            warn!(max_depth, "template nesting exceeds depth limit; subtree left as is");
            value.clone()
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| walk(item, variables, depth + 1, max_depth))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, item)| (key.clone(), walk(item, variables, depth + 1, max_depth)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

/// Single left-to-right pass over one string. Substituted values are not
/// re-scanned.
#[must_use]
pub fn substitute_str(input: &str, variables: &Variables) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        if let Some(end) = after_open.find("}}") {
            let name = &after_open[..end];
            if is_identifier(name) {
                match variables.get(name) {
                    Some(value) => output.push_str(value),
                    None => output.push_str(&rest[start..start + end + 4]),
                }
                rest = &after_open[end + 2..];
                continue;
            }
        }
        // Not a placeholder at this brace; retry from the next one.
        output.push('{');
        rest = &rest[start + 1..];
    }

    output.push_str(rest);
    output
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let result = substitute_str("{{name}}, {{name}}!", &vars(&[("name", "Ada")]));

        assert_eq!(result, "Ada, Ada!");
    }

    #[test]
    fn test_unknown_placeholder_stays_literal() {
        let result = substitute_str("Hi {{name}} from {{city}}", &vars(&[("name", "Ada")]));

        assert_eq!(result, "Hi Ada from {{city}}");
    }

    #[test]
    fn test_spaced_placeholder_is_not_an_identifier() {
        let result = substitute_str("{{ name }}", &vars(&[("name", "Ada")]));

        assert_eq!(result, "{{ name }}");
    }

    #[test]
    fn test_triple_braces_keep_outer_brace() {
        let result = substitute_str("{{{name}}}", &vars(&[("name", "Ada")]));

        assert_eq!(result, "{Ada}");
    }

    #[test]
    fn test_unclosed_placeholder_is_copied() {
        let result = substitute_str("{{name", &vars(&[("name", "Ada")]));

        assert_eq!(result, "{{name");
    }

    #[test]
    fn test_substituted_value_is_not_rescanned() {
        let result = substitute_str("{{a}}", &vars(&[("a", "{{b}}"), ("b", "deep")]));

        assert_eq!(result, "{{b}}");
    }

    #[test]
    fn test_walks_nested_tree_and_leaves_keys_and_numbers() {
        // Arrange
        let document = json!({
            "contents": [{
                "body": { "contents": [{ "type": "text", "text": "Dear {{name}}" }] },
                "cooldownMs": 1000,
                "{{name}}": true
            }]
        });

        // Act
        let result = substitute(&document, &vars(&[("name", "Ada")]), 64);

        // Assert
        assert_eq!(
            result,
            json!({
                "contents": [{
                    "body": { "contents": [{ "type": "text", "text": "Dear Ada" }] },
                    "cooldownMs": 1000,
                    "{{name}}": true
                }]
            })
        );
    }

    #[test]
    fn test_depth_limit_leaves_deep_subtree_untouched() {
        let document = json!({ "a": { "b": { "c": "{{name}}" } }, "top": "{{name}}" });

        let result = substitute(&document, &vars(&[("name", "Ada")]), 2);

        assert_eq!(result["top"], "Ada");
        assert_eq!(result["a"]["b"]["c"], "{{name}}");
    }

    #[test]
    fn test_substitution_is_idempotent_under_empty_variables() {
        let document = json!({ "contents": [{ "body": { "content": "Hi {{name}} {{missing}}" } }] });
        let variables = vars(&[("name", "Ada")]);

        let once = substitute(&document, &variables, 64);
        let twice = substitute(&once, &Variables::new(), 64);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_matching_keys_leaves_document_unchanged() {
        let document = json!({ "text": "{{name}}", "n": [1, 2, { "k": "{{x}}" }] });

        let result = substitute(&document, &vars(&[("other", "v")]), 64);

        assert_eq!(result, document);
    }
}
