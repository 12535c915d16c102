//! Raw input coercions shared by validators and patch builders.
//!
//! A value is interpreted here exactly once so that "valid" and "submitted" agree.

/// Parse a whole, non-negative number typed by the user (surrounding spaces allowed)
#[must_use]
pub fn parse_whole(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Length in characters, not bytes
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Text as submitted
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.trim().to_string()
}

/// Optional text as submitted (blank becomes `None`)
#[must_use]
pub fn normalize_optional(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
