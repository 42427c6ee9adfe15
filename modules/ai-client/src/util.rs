use serde::de::DeserializeOwned;

/// Strip markdown code blocks from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parse model output expected to contain a JSON object.
///
/// Two-phase recovery: parse the fence-stripped text directly, then fall
/// back to the span from the first `{` to the last `}`. Returns `None` when
/// both attempts fail; callers map that to their own parse error.
pub fn extract_json_object<T: DeserializeOwned>(text: &str) -> Option<T> {
    extract_json(text, '{', '}')
}

/// Parse model output expected to contain a JSON array.
pub fn extract_json_array<T: DeserializeOwned>(text: &str) -> Option<T> {
    extract_json(text, '[', ']')
}

fn extract_json<T: DeserializeOwned>(text: &str, open: char, close: char) -> Option<T> {
    let cleaned = strip_code_blocks(text);
    if let Ok(value) = serde_json::from_str(cleaned) {
        return Some(value);
    }
    let start = cleaned.find(open)?;
    let end = cleaned.rfind(close)?;
    if end < start {
        return None;
    }
    serde_json::from_str(&cleaned[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        name: String,
    }

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("{}"), "{}");
    }

    #[test]
    fn parses_bare_json() {
        let parsed: Option<Probe> = extract_json_object(r#"{"name": "a"}"#);
        assert_eq!(parsed, Some(Probe { name: "a".into() }));
    }

    #[test]
    fn parses_fenced_json() {
        let parsed: Option<Probe> = extract_json_object("```json\n{\"name\": \"a\"}\n```");
        assert_eq!(parsed, Some(Probe { name: "a".into() }));
    }

    #[test]
    fn recovers_object_embedded_in_prose() {
        let text = "Here is the analysis you asked for:\n{\"name\": \"a\"}\nHope it helps!";
        let parsed: Option<Probe> = extract_json_object(text);
        assert_eq!(parsed, Some(Probe { name: "a".into() }));
    }

    #[test]
    fn recovers_array_embedded_in_prose() {
        let text = "Sure! [1, 2, 3] is what you asked for.";
        let parsed: Option<Vec<i32>> = extract_json_array(text);
        assert_eq!(parsed, Some(vec![1, 2, 3]));
    }

    #[test]
    fn rejects_non_json() {
        let parsed: Option<Probe> = extract_json_object("This is not JSON at all");
        assert_eq!(parsed, None);
        let parsed: Option<Vec<i32>> = extract_json_array("nothing here either");
        assert_eq!(parsed, None);
    }
}
