use serde::{Deserialize, Serialize};

use super::citations::{tokenize_citations, Segment};
use crate::rag::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

impl Role {
    pub fn alignment(self) -> Alignment {
        match self {
            Role::User => Alignment::Right,
            Role::Assistant => Alignment::Left,
        }
    }
}

/// One conversation turn. `sources` is only ever set on assistant turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: None,
        }
    }

    pub fn assistant(content: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources: Some(sources),
        }
    }

    pub fn sources(&self) -> &[Source] {
        self.sources.as_deref().unwrap_or_default()
    }
}

/// Assistant turns carrying a source list get interactive markers; any
/// other turn is one literal text segment.
pub fn render_message(message: &Message) -> Vec<Segment<'_>> {
    match (message.role, &message.sources) {
        (Role::Assistant, Some(_)) => tokenize_citations(&message.content),
        _ if message.content.is_empty() => Vec::new(),
        _ => vec![Segment::Text(&message.content)],
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceDetail {
    pub title: String,
    pub similarity: String,
    pub content: String,
}

impl SourceDetail {
    pub fn new(source: &Source) -> Self {
        Self {
            title: format!("Source Citation - Page {}", source.page),
            similarity: format!("{:.3}", source.similarity),
            content: source.content.clone(),
        }
    }
}

/// The modal detail view for a clicked citation.
#[derive(Debug, Default)]
pub struct SourceDialog {
    current: Option<SourceDetail>,
}

impl SourceDialog {
    /// Opens the detail for the source a citation points at. Returns false,
    /// leaving the dialog as it was, when the marker has no matching source.
    pub fn open_citation(&mut self, sources: &[Source], segment: &Segment<'_>) -> bool {
        let Segment::Citation {
            index: Some(index), ..
        } = segment
        else {
            return false;
        };
        match sources.get(*index) {
            Some(source) => {
                self.current = Some(SourceDetail::new(source));
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&SourceDetail> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::PageRef;

    fn source(id: i64, page: PageRef, similarity: f64) -> Source {
        Source {
            id,
            content: format!("chunk {id}"),
            page,
            similarity,
            chunk_index: Some(id),
        }
    }

    fn two_sources() -> Vec<Source> {
        vec![
            source(1, PageRef::Number(12.into()), 0.87654),
            source(2, PageRef::Unknown, 0.5),
        ]
    }

    #[test]
    fn assistant_turn_with_sources_gets_citation_controls() {
        let message = Message::assistant("Vitamin C helps [1] and also [2].", two_sources());

        let labels: Vec<&str> = render_message(&message)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Citation { label, .. } => Some(label),
                Segment::Text(_) => None,
            })
            .collect();

        assert_eq!(labels, vec!["1", "2"]);
    }

    #[test]
    fn user_turns_render_literally() {
        let message = Message::user("what does [1] mean?");

        assert_eq!(
            render_message(&message),
            vec![Segment::Text("what does [1] mean?")]
        );
        assert_eq!(message.role.alignment(), Alignment::Right);
        assert_eq!(Role::Assistant.alignment(), Alignment::Left);
    }

    #[test]
    fn assistant_turn_with_empty_sources_is_still_tokenized() {
        let message = Message::assistant("nothing [1]", Vec::new());
        assert!(matches!(
            render_message(&message)[1],
            Segment::Citation { label: "1", .. }
        ));

        // A turn without a source list at all stays literal.
        let mut bare = message.clone();
        bare.sources = None;
        assert_eq!(render_message(&bare), vec![Segment::Text("nothing [1]")]);
    }

    #[test]
    fn opening_citation_shows_page_similarity_and_content() {
        let message = Message::assistant("A [1] B [2]", two_sources());
        let segments = render_message(&message);
        let mut dialog = SourceDialog::default();

        assert!(dialog.open_citation(message.sources(), &segments[1]));
        assert_eq!(
            dialog.current(),
            Some(&SourceDetail {
                title: "Source Citation - Page 12".to_string(),
                similarity: "0.877".to_string(),
                content: "chunk 1".to_string(),
            })
        );

        assert!(dialog.open_citation(message.sources(), &segments[3]));
        let detail = dialog.current().unwrap();
        assert_eq!(detail.title, "Source Citation - Page ?");
        assert_eq!(detail.similarity, "0.500");

        dialog.close();
        assert!(dialog.current().is_none());
    }

    #[test]
    fn out_of_range_citation_is_a_no_op() {
        let message = Message::assistant("see [3] and [0]", two_sources());
        let segments = render_message(&message);
        let mut dialog = SourceDialog::default();

        assert!(!dialog.open_citation(message.sources(), &segments[1]));
        assert!(!dialog.open_citation(message.sources(), &segments[3]));
        assert!(!dialog.open_citation(message.sources(), &segments[0]));
        assert!(dialog.current().is_none());
    }
}
