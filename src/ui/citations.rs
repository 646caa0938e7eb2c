use std::sync::OnceLock;

use regex::Regex;

/// A piece of rendered message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// An interactive `[n]` marker. `index` is the zero-based position in
    /// the source list, `None` for `[0]` or numbers too large to address.
    Citation { label: &'a str, index: Option<usize> },
}

static MARKER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn marker_pattern() -> &'static Regex {
    MARKER_PATTERN.get_or_init(|| Regex::new(r"\[([0-9]+)\]").expect("citation marker pattern"))
}

/// Splits `text` at every `[digits]` marker, left to right. Concatenating
/// the segments (markers re-bracketed) gives back the input.
pub fn tokenize_citations(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in marker_pattern().captures_iter(text) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Text(&text[last..whole.start()]));
        }
        let label = digits.as_str();
        segments.push(Segment::Citation {
            label,
            index: citation_index(label),
        });
        last = whole.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(&text[last..]));
    }
    segments
}

fn citation_index(label: &str) -> Option<usize> {
    label.parse::<usize>().ok()?.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_markers_and_keeps_text_in_order() {
        let segments = tokenize_citations("Vitamin C helps [1] and also [2].");

        assert_eq!(
            segments,
            vec![
                Segment::Text("Vitamin C helps "),
                Segment::Citation { label: "1", index: Some(0) },
                Segment::Text(" and also "),
                Segment::Citation { label: "2", index: Some(1) },
                Segment::Text("."),
            ]
        );
    }

    #[test]
    fn text_without_markers_is_one_segment() {
        assert_eq!(tokenize_citations("plain"), vec![Segment::Text("plain")]);
        assert!(tokenize_citations("").is_empty());
    }

    #[test]
    fn adjacent_and_edge_markers() {
        assert_eq!(
            tokenize_citations("[3][10]"),
            vec![
                Segment::Citation { label: "3", index: Some(2) },
                Segment::Citation { label: "10", index: Some(9) },
            ]
        );
    }

    #[test]
    fn non_numeric_brackets_stay_text() {
        assert_eq!(
            tokenize_citations("see [a] or [ 1] or [1a]"),
            vec![Segment::Text("see [a] or [ 1] or [1a]")]
        );
    }

    #[test]
    fn zero_and_oversized_numbers_have_no_index() {
        let segments = tokenize_citations("[0] [99999999999999999999999]");

        assert_eq!(segments[0], Segment::Citation { label: "0", index: None });
        assert!(matches!(segments[2], Segment::Citation { index: None, .. }));
    }

    #[test]
    fn citation_index_is_one_based() {
        assert_eq!(citation_index("1"), Some(0));
        assert_eq!(citation_index("12"), Some(11));
        assert_eq!(citation_index("0"), None);
        assert_eq!(citation_index("x"), None);
    }

    #[test]
    fn tokenizing_is_repeatable() {
        let text = "A [1] B [2]";
        assert_eq!(tokenize_citations(text), tokenize_citations(text));
    }
}
