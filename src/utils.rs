//! Text cleanup helpers shared by source parsers.

/// Strip leading/trailing whitespace per line, drop blank lines, and rejoin.
///
/// This is the canonical cleanup applied to the text segment that trails a
/// question ID in a dump file.
pub fn clean_block<T: AsRef<str>>(text: T) -> String {
    text.as_ref()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Bound a string to `limit` chars (not bytes; content is mostly CJK text).
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    text.chars().take(limit).collect()
}
