//! Inbound payloads, validated and normalised into domain write payloads.

pub mod categories;
pub mod orders;
pub mod products;
pub mod settings;

/// Collapse runs of whitespace and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitise each line, trim blank edges and keep at most one blank line in a row.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    for line in input.lines().map(sanitize_inline_text) {
        let blank = line.is_empty();
        if blank && result.last().is_none_or(|previous: &String| previous.is_empty()) {
            continue;
        }
        result.push(line);
    }
    while result.last().is_some_and(|line| line.is_empty()) {
        result.pop();
    }
    result.join("\n")
}

/// Trimmed value, or `None` when nothing but whitespace was sent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| sanitize_inline_text(&raw))
        .filter(|value| !value.is_empty())
}
