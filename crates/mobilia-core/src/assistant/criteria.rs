//! Structured-output parsing.
//!
//! The criteria prompt asks for bare JSON, but models wrap their answers in
//! prose or code fences often enough that we scan for the first balanced
//! object instead of parsing the whole response.

use mobilia_types::search::{CriteriaParse, SearchCriteria};

/// Parse the model's full response into search criteria.
///
/// Any failure, no JSON object, unbalanced braces, or a shape serde rejects,
/// degrades to `Unparsable` carrying the raw text so the caller can fall
/// back to treating the response as a general reply.
pub fn parse_criteria(response: &str) -> CriteriaParse {
    let Some(json) = extract_first_json_object(response) else {
        return CriteriaParse::Unparsable(response.trim().to_string());
    };
    match serde_json::from_str::<SearchCriteria>(json) {
        Ok(criteria) => CriteriaParse::Parsed(criteria),
        Err(_) => CriteriaParse::Unparsable(response.trim().to_string()),
    }
}

/// The first balanced `{...}` in `text`, tracking JSON string literals so
/// braces inside strings do not skew the depth count.
fn extract_first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_parses() {
        let parse = parse_criteria(r#"{"product_search": true, "type": "sofa"}"#);
        let CriteriaParse::Parsed(c) = parse else { panic!("expected parsed") };
        assert!(c.product_search);
        assert_eq!(c.product_type.unwrap().values(), vec!["sofa"]);
    }

    #[test]
    fn json_embedded_in_prose_parses() {
        let parse = parse_criteria(
            "Sure! Here is the JSON you asked for:\n```json\n{\"product_search\": true, \"color\": [\"red\", \"blue\"]}\n```\nHope that helps.",
        );
        let CriteriaParse::Parsed(c) = parse else { panic!("expected parsed") };
        assert_eq!(c.color.unwrap().values(), vec!["red", "blue"]);
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_extraction() {
        let parse = parse_criteria(r#"{"product_search": true, "message": "look for {modern} pieces"}"#);
        let CriteriaParse::Parsed(c) = parse else { panic!("expected parsed") };
        assert_eq!(c.message.as_deref(), Some("look for {modern} pieces"));
    }

    #[test]
    fn escaped_quotes_inside_strings_are_handled() {
        let parse = parse_criteria(r#"{"product_search": false, "message": "a \"quoted\" word"}"#);
        assert!(matches!(parse, CriteriaParse::Parsed(_)));
    }

    #[test]
    fn plain_prose_is_unparsable() {
        let parse = parse_criteria("I am sorry, I could not determine what you are looking for.");
        let CriteriaParse::Unparsable(raw) = parse else { panic!("expected unparsable") };
        assert!(raw.starts_with("I am sorry"));
    }

    #[test]
    fn malformed_json_is_unparsable() {
        let parse = parse_criteria(r#"{"product_search": "not-a-bool-or-object",,,}"#);
        assert!(matches!(parse, CriteriaParse::Unparsable(_)));
    }

    #[test]
    fn unbalanced_braces_are_unparsable() {
        let parse = parse_criteria(r#"{"product_search": true"#);
        assert!(matches!(parse, CriteriaParse::Unparsable(_)));
    }
}
