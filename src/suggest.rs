//! Tab-completion of the word being typed.
//!
//! The top-ranked item's name supplies the completion: the first of its
//! lower-cased, space-separated tokens that starts with the word under the
//! cursor.

/// Byte range of the word ending at `cursor`: from just after the last space
/// before the cursor up to the cursor.
fn word_before(text: &str, cursor: usize) -> Option<(usize, usize)> {
    if cursor > text.len() || !text.is_char_boundary(cursor) {
        return None;
    }
    let start = text[..cursor].rfind(' ').map_or(0, |i| i + 1);
    Some((start, cursor))
}

/// Completion for the word ending at `cursor`, taken from `top_name`.
///
/// Returns `None` when the cursor is not preceded by a word or no token of
/// `top_name` extends it.
///
/// # Example
///
/// ```rust
/// use treeseek::suggest;
///
/// assert_eq!(suggest("win lay", 7, "Layouts Default").as_deref(), Some("layouts"));
/// assert_eq!(suggest("win ", 4, "Layouts"), None);
/// ```
pub fn suggest(query: &str, cursor: usize, top_name: &str) -> Option<String> {
    let (start, end) = word_before(query, cursor)?;
    let word = query[start..end].to_lowercase();
    if word.is_empty() {
        return None;
    }

    top_name
        .to_lowercase()
        .split(' ')
        .find(|token| token.starts_with(&word))
        .map(str::to_owned)
}

/// Text of the completion hint shown behind the query.
///
/// A hint is only shown while the cursor sits at the end of a non-empty
/// word that ends the query; the word is then replaced by `suggestion`.
pub fn completion_hint(text: &str, cursor: usize, suggestion: &str) -> Option<String> {
    let (start, _) = word_before(text, cursor)?;
    let end = text[cursor..].find(' ').map_or(text.len(), |i| cursor + i);

    if start == end || end < text.len() || suggestion.is_empty() {
        return None;
    }

    let mut hint = String::with_capacity(start + suggestion.len());
    hint.push_str(&text[..start]);
    hint.push_str(suggestion);
    Some(hint)
}

/// Replace the last word of `query` with `suggestion`.
pub fn apply_suggestion(query: &str, suggestion: &str) -> String {
    let start = query.rfind(' ').map_or(0, |i| i + 1);
    format!("{}{}", &query[..start], suggestion)
}
