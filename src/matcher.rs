//! Path matching and scoring.
//!
//! A query matches a path when every query part is, in order, an
//! ASCII-case-insensitive prefix of some path part. Path parts that do not
//! line up with the current query part are skipped and penalised.

/// Space and tab are the only separators; everything else belongs to a part.
pub fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Trim leading and trailing separators.
pub fn trim_query(query: &str) -> &str {
    query.trim_matches(is_separator)
}

/// Non-empty, separator-free parts of `s`. Runs of separators count as one.
pub fn parts(s: &str) -> impl Iterator<Item = &str> {
    s.split(is_separator).filter(|p| !p.is_empty())
}

/// `true` if `s` starts with `prefix`, folding only ASCII letters.
pub fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Length of a part in characters.
fn part_len(part: &str) -> f32 {
    part.chars().count() as f32
}

/// Score `path` against `query`.
///
/// Returns `None` when the query does not match. An empty (or separator-only)
/// query matches everything with a score of `0.0`.
///
/// Each matched part contributes `query_part_len / path_part_len`. Once the
/// last query part matches, the sum is scaled by
/// `query_part_count / path_part_count` and by `1 / (1 + skipped)`.
///
/// # Example
///
/// ```rust
/// use treeseek::match_path;
///
/// assert!(match_path("win lay", "Window Layouts Default").is_some());
/// assert!(match_path("win lay", "Edit Preferences").is_none());
/// assert_eq!(match_path("edit", "Edit"), Some(1.0));
/// ```
pub fn match_path(query: &str, path: &str) -> Option<f32> {
    let query = trim_query(query);
    let mut query_parts = parts(query);
    let Some(mut current) = query_parts.next() else {
        return Some(0.0);
    };

    let mut path_parts = parts(path);
    let mut path_seen = 0usize;
    let mut skipped = 0usize;
    let mut score = 0.0f32;

    loop {
        // Path exhausted with query parts left.
        let path_part = path_parts.next()?;
        path_seen += 1;

        if !starts_with_ignore_ascii_case(path_part, current) {
            skipped += 1;
            continue;
        }

        score += part_len(current) / part_len(path_part).max(1.0);

        match query_parts.next() {
            Some(next) => current = next,
            None => {
                let path_count = path_seen + path_parts.count();
                let query_count = parts(query).count();
                score *= query_count as f32 / path_count as f32;
                score *= 1.0 / (1.0 + skipped as f32);
                return Some(score);
            }
        }
    }
}
