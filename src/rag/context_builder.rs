//! Context block assembly.
//!
//! Each retrieved chunk becomes `[n] (Page p) content`, where `n` is its
//! 1-based position in the retrieval order. Blocks are separated by a blank
//! line and never re-sorted, so the markers line up with the `sources` list
//! returned to the client.

use super::source::Source;

const BLOCK_SEPARATOR: &str = "\n\n";

pub fn build_context(sources: &[Source]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| format_block(i + 1, source))
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

fn format_block(marker: usize, source: &Source) -> String {
    format!("[{}] (Page {}) {}", marker, source.page, source.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::source::PageRef;
    use serde_json::json;

    fn make_source(id: i64, page: PageRef, content: &str) -> Source {
        Source {
            id,
            content: content.to_string(),
            page,
            similarity: 0.5,
            chunk_index: Some(0),
        }
    }

    #[test]
    fn formats_markers_pages_and_blank_line_separators() {
        let sources = vec![
            make_source(1, PageRef::from_metadata(&json!({ "page": 12 })), "A"),
            make_source(2, PageRef::from_metadata(&json!({ "page": null })), "B"),
        ];

        assert_eq!(build_context(&sources), "[1] (Page 12) A\n\n[2] (Page ?) B");
    }

    #[test]
    fn keeps_retrieval_order_instead_of_id_order() {
        let sources = vec![
            make_source(9, PageRef::Text("iv".to_string()), "first"),
            make_source(1, PageRef::Number(3.into()), "second"),
        ];

        let context = build_context(&sources);

        assert!(context.starts_with("[1] (Page iv) first"));
        assert!(context.ends_with("[2] (Page 3) second"));
    }

    #[test]
    fn empty_input_builds_empty_context() {
        assert_eq!(build_context(&[]), "");
    }
}
