//! Placeholder substitution for command templates
//!
//! Templates use `{{name}}` markers. A marker whose name is bound in the
//! argument map is replaced by the value's wire text; any other marker is
//! copied through untouched so nothing is ever silently dropped.

use super::value::{ArgValue, Args};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Collapse whitespace runs to a single space and trim both ends
pub fn normalize_whitespace(template: &str) -> String {
    template.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize `template` and resolve its placeholders against `values`
pub fn substitute(template: &str, values: &Args) -> String {
    replace_placeholders(&normalize_whitespace(template), values)
}

/// Resolve placeholders without touching whitespace
pub fn replace_placeholders(template: &str, values: &Args) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find(OPEN) {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];

        let Some(close) = candidate.find(CLOSE) else {
            // unterminated marker: copy the remainder and stop
            out.push_str(candidate);
            return out;
        };

        let name = &candidate[OPEN.len()..close];
        let marker = &candidate[..close + CLOSE.len()];

        match values.get(name).and_then(render_value) {
            Some(text) => out.push_str(&text),
            None => out.push_str(marker),
        }
        rest = &candidate[close + CLOSE.len()..];
    }

    out.push_str(rest);
    out
}

/// Wire text of a value, or `None` for shapes that have no wire form
/// (a list nested inside a list).
pub fn render_value(value: &ArgValue) -> Option<String> {
    match value {
        ArgValue::List(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                if item.is_list() {
                    return None;
                }
                parts.push(render_scalar(item));
            }
            Some(parts.join(" "))
        }
        scalar => Some(render_scalar(scalar)),
    }
}

fn render_scalar(value: &ArgValue) -> String {
    match value {
        ArgValue::Str(s) => s.clone(),
        ArgValue::Int(n) => n.to_string(),
        // Display for floats is the shortest text that parses back exactly
        ArgValue::Float(f) => f.to_string(),
        ArgValue::Float32(f) => f.to_string(),
        ArgValue::Bool(b) => b.to_string(),
        ArgValue::List(_) => String::new(),
    }
}
