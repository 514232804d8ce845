/// Presence check for required text input: absent and empty values count as
/// missing. The value itself is kept as supplied.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Optional text input is stored as NULL rather than an empty string.
pub fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
