//! Utility functions and helpers.

pub mod http;

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove the first occurrence of `label` and trim what remains.
pub fn strip_label(text: &str, label: &str) -> String {
    if label.is_empty() {
        return text.trim().to_string();
    }
    text.replacen(label, "", 1).trim().to_string()
}
