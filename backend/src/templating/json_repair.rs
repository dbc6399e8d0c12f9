//! Best-effort repair of AI collaborator responses.
//!
//! The generation contract asks for a JSON object keyed by slot ID, but
//! model output arrives wrapped in markdown fences, with raw newlines inside
//! string values, or truncated mid-object. This module runs a parse ladder
//! (as-is, sanitized, repaired) and maps whatever survives onto the known
//! slots; callers fall back to manual editing when even that fails.

use common::model::slot::TemplateSlot;
use serde_json::Value;
use std::collections::HashMap;

/// Drop a surrounding ```json ... ``` (or bare ```) fence.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest.strip_suffix("```").unwrap_or(rest)
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest.strip_suffix("```").unwrap_or(rest)
    } else {
        trimmed
    };
    inner.trim().to_string()
}

fn push_escaped_control(out: &mut String, c: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\u{8}' => out.push_str("\\b"),
        '\u{c}' => out.push_str("\\f"),
        _ => out.push_str(&format!("\\u{:04x}", c as u32)),
    }
}

fn is_control(c: char) -> bool {
    (c as u32) < 0x20 || c as u32 == 0x7f
}

/// Escape raw control characters found inside string values, leaving the
/// JSON structure and existing escape sequences alone.
pub fn sanitize_json(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escape_next = false;

    for c in input.chars() {
        if escape_next {
            out.push(c);
            escape_next = false;
            continue;
        }
        match c {
            '\\' => {
                out.push(c);
                escape_next = true;
            }
            '"' => {
                in_string = !in_string;
                out.push(c);
            }
            c if in_string && is_control(c) => push_escaped_control(&mut out, c),
            c => out.push(c),
        }
    }
    out
}

/// Repair common damage in malformed JSON: content outside the object,
/// unescaped control characters, unterminated strings, and missing closing
/// brackets/braces from a truncated response.
pub fn repair_json(input: &str) -> String {
    let trimmed = input.trim();
    let Some(start) = trimmed.find('{') else {
        return format!("{{{}}}", trimmed);
    };
    let end = match trimmed.rfind('}') {
        Some(i) if i >= start => i + 1,
        _ => trimmed.len(),
    };

    let mut out = String::with_capacity(end - start);
    let mut in_string = false;
    let mut escape_next = false;
    let mut brace_depth = 0i32;
    let mut bracket_depth = 0i32;

    for c in trimmed[start..end].chars() {
        if escape_next {
            out.push(c);
            escape_next = false;
            continue;
        }
        match c {
            '\\' => {
                out.push(c);
                escape_next = true;
            }
            '"' => {
                in_string = !in_string;
                out.push(c);
            }
            c if in_string && is_control(c) => push_escaped_control(&mut out, c),
            '{' if !in_string => {
                brace_depth += 1;
                out.push(c);
            }
            '}' if !in_string => {
                brace_depth -= 1;
                out.push(c);
            }
            '[' if !in_string => {
                bracket_depth += 1;
                out.push(c);
            }
            ']' if !in_string => {
                bracket_depth -= 1;
                out.push(c);
            }
            c => out.push(c),
        }
    }

    if in_string {
        out.push('"');
    }
    while out.ends_with(&[',', ' ', '\n', '\r', '\t'][..]) {
        out.pop();
    }
    for _ in 0..bracket_depth.max(0) {
        out.push(']');
    }
    for _ in 0..brace_depth.max(0) {
        out.push('}');
    }
    out
}

/// Parse an AI response into a slot-data map for the given slots.
///
/// Values must be plain strings; arrays are joined with newlines (the
/// canonical list-content representation) and scalars are stringified. Keys
/// that match no known slot ID are dropped.
pub fn parse_slot_content(
    raw: &str,
    slots: &[TemplateSlot],
) -> Result<HashMap<String, String>, String> {
    let stripped = strip_code_fences(raw);
    let sanitized = sanitize_json(&stripped);
    let repaired = repair_json(&sanitized);

    for candidate in [&stripped, &sanitized, &repaired] {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) {
            return Ok(collect_known_slots(map, slots));
        }
    }
    Err("AI response is not valid JSON even after repair; fill the slots manually".to_string())
}

fn collect_known_slots(
    map: serde_json::Map<String, Value>,
    slots: &[TemplateSlot],
) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for (key, value) in map {
        if !slots.iter().any(|s| s.id == key) {
            continue;
        }
        let content = match value {
            Value::String(s) => s,
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        out.insert(key, content);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::slot::SlotType;

    fn slots(ids: &[&str]) -> Vec<TemplateSlot> {
        ids.iter()
            .map(|id| TemplateSlot {
                id: id.to_string(),
                slot_type: SlotType::Paragraph,
                label: id.to_string(),
                tag_name: "p".to_string(),
                original_content: String::new(),
                attributes: None,
                max_length: None,
                word_count: None,
                width: None,
                height: None,
                list_template: None,
            })
            .collect()
    }

    #[test]
    fn parses_clean_json() {
        let parsed =
            parse_slot_content(r#"{"intro": "Hello there"}"#, &slots(&["intro"])).unwrap();
        assert_eq!(parsed["intro"], "Hello there");
    }

    #[test]
    fn strips_markdown_fences() {
        let raw = "```json\n{\"intro\": \"Hi\"}\n```";
        let parsed = parse_slot_content(raw, &slots(&["intro"])).unwrap();
        assert_eq!(parsed["intro"], "Hi");
    }

    #[test]
    fn escapes_raw_newlines_inside_strings() {
        let raw = "{\"intro\": \"line one\nline two\"}";
        let parsed = parse_slot_content(raw, &slots(&["intro"])).unwrap();
        assert_eq!(parsed["intro"], "line one\nline two");
    }

    #[test]
    fn repairs_truncated_object() {
        let raw = r#"{"intro": "Hello", "benefits": ["One", "Two"#;
        let parsed = parse_slot_content(raw, &slots(&["intro", "benefits"])).unwrap();
        assert_eq!(parsed["intro"], "Hello");
        assert!(parsed["benefits"].starts_with("One"));
    }

    #[test]
    fn arrays_become_newline_joined_lists() {
        let raw = r#"{"benefits": ["One", "Two", "Three"]}"#;
        let parsed = parse_slot_content(raw, &slots(&["benefits"])).unwrap();
        assert_eq!(parsed["benefits"], "One\nTwo\nThree");
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let raw = r#"{"intro": "Hi", "mystery": "ignored"}"#;
        let parsed = parse_slot_content(raw, &slots(&["intro"])).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(!parsed.contains_key("mystery"));
    }

    #[test]
    fn hopeless_input_is_an_error() {
        assert!(parse_slot_content("not json at all", &slots(&["intro"])).is_err());
    }

    #[test]
    fn leading_prose_before_the_object_is_discarded() {
        let raw = "Here is your content:\n{\"intro\": \"Hi\"}";
        let parsed = parse_slot_content(raw, &slots(&["intro"])).unwrap();
        assert_eq!(parsed["intro"], "Hi");
    }
}
