//! Bounded single-chunk fallback for documents without usable structure.

/// Keeps fallback chunks within typical embedding input limits.
pub const DEFAULT_FALLBACK_MAX_CHARS: usize = 2000;

/// First `max_chars` characters of `text`. If that prefix is blank, the
/// prefix of the start-trimmed text is used instead. `None` only for
/// whitespace-only input.
pub fn fallback_chunk(text: &str, max_chars: usize) -> Option<String> {
    let max_chars = max_chars.max(1);

    let prefix = take_chars(text, max_chars);
    if !prefix.trim().is_empty() {
        return Some(prefix.to_string());
    }

    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    Some(take_chars(trimmed, max_chars).to_string())
}

/// Char-boundary safe prefix.
fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
