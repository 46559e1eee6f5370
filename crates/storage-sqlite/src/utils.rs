//! Query helpers shared by the repositories.

/// Escape character used with [`contains_pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// Builds a `LIKE` pattern that matches `text` anywhere in a column.
/// `%` and `_` in `text` match literally; pair the pattern with
/// `.escape(LIKE_ESCAPE)`.
pub fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
