//! Highlighting of query parts inside a display label.

use regex::RegexBuilder;

use crate::error::SearcherError;
use crate::matcher::parts;

/// A run of label text, highlighted or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text:        &'a str,
    pub highlighted: bool,
}

/// Split `label` into segments, highlighting every case-insensitive
/// occurrence of any query part. Overlapping or adjacent occurrences merge
/// into one highlighted segment. An empty query yields the label as a
/// single plain segment.
///
/// # Example
///
/// ```rust
/// use treeseek::highlight;
///
/// let segments = highlight("Middle Eastern", "middle e").unwrap();
/// let marked: Vec<_> = segments.iter().filter(|s| s.highlighted).map(|s| s.text).collect();
/// assert_eq!(marked, vec!["Middle", "E", "e"]);
/// ```
///
/// # Errors
///
/// [`SearcherError::InvalidPattern`] if the query is too large to compile.
pub fn highlight<'a>(label: &'a str, query: &str) -> Result<Vec<Segment<'a>>, SearcherError> {
    let alternatives: Vec<String> = parts(query).map(regex::escape).collect();
    if alternatives.is_empty() || label.is_empty() {
        return Ok(plain(label));
    }

    let pattern = alternatives
        .iter()
        .map(|p| format!("({})", p))
        .collect::<Vec<_>>()
        .join("|");
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| SearcherError::InvalidPattern(e.to_string()))?;

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for m in re.find_iter(label) {
        match ranges.last_mut() {
            Some(last) if m.start() <= last.1 => last.1 = last.1.max(m.end()),
            _ => ranges.push((m.start(), m.end())),
        }
    }

    let mut segments = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;
    for (start, end) in ranges {
        if start > cursor {
            segments.push(Segment {
                text:        &label[cursor..start],
                highlighted: false,
            });
        }
        segments.push(Segment {
            text:        &label[start..end],
            highlighted: true,
        });
        cursor = end;
    }
    if cursor < label.len() {
        segments.push(Segment {
            text:        &label[cursor..],
            highlighted: false,
        });
    }
    Ok(segments)
}

fn plain(label: &str) -> Vec<Segment<'_>> {
    if label.is_empty() {
        return Vec::new();
    }
    vec![Segment {
        text:        label,
        highlighted: false,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(segments: &[Segment<'_>]) -> String {
        segments
            .iter()
            .map(|s| {
                if s.highlighted {
                    format!("{{{}}}", s.text)
                } else {
                    s.text.to_owned()
                }
            })
            .collect()
    }

    #[test]
    fn marks_each_part() {
        let segments = highlight("Window Layouts Default", "win lay").unwrap();
        assert_eq!(render(&segments), "{Win}dow {Lay}outs Default");
    }

    #[test]
    fn nested_parts_do_not_split_segments() {
        let segments = highlight("Middle Eastern", "middle e").unwrap();
        assert_eq!(render(&segments), "{Middle} {E}ast{e}rn");
    }

    #[test]
    fn adjacent_matches_merge() {
        let segments = highlight("aaaa", "a").unwrap();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].highlighted);
    }

    #[test]
    fn regex_characters_are_literal() {
        let segments = highlight("C++ (Legacy)", "c++ (leg").unwrap();
        assert_eq!(render(&segments), "{C++} {(Leg}acy)");
    }

    #[test]
    fn empty_query_is_plain() {
        let segments = highlight("Window", "  ").unwrap();
        assert_eq!(segments, vec![Segment { text: "Window", highlighted: false }]);
        assert!(highlight("", "x").unwrap().is_empty());
    }
}
