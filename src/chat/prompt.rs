use crate::llm::ChatMessage;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a strict RAG assistant answering questions about human nutrition. \
Answer ONLY using the provided CONTEXT. \
Always cite your sources using brackets like [1], [2] and include page numbers when available. \
Be concise and accurate.";

/// System instruction plus the user turn carrying the question and context.
///
/// The instruction also names the valid marker range `[1]..=[source_count]`.
pub fn build_messages(
    system_prompt: Option<&str>,
    question: &str,
    context: &str,
    source_count: usize,
) -> Vec<ChatMessage> {
    let base = system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let system = format!(
        "{} Only cite source numbers between [1] and [{}].",
        base, source_count
    );
    let user = format!("QUESTION: {}\n\nCONTEXT:\n{}", question, context);

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}
