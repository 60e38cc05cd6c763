//! Prompt construction for retrieval-grounded chat

use serde::Serialize;

use crate::retrieval::ScoredChunk;
use crate::types::{ChatMessage, Role};

/// A role-tagged message ready for a chat-completion API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    pub role: &'static str,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant",
            content: content.into(),
        }
    }
}

const SYSTEM_FRAME: &str = "You are an assistant answering questions about the user's uploaded \
documents. Ground your answers in the excerpts below when they are relevant. If the excerpts do \
not cover the question, say so before answering from general knowledge.";

/// Prompt builder for document chat
pub struct PromptBuilder;

impl PromptBuilder {
    /// Number the retrieved chunks into a context block
    pub fn build_context(results: &[ScoredChunk]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!("[{}]\n{}\n\n", i + 1, result.chunk.content));
        }

        context
    }

    /// Assemble the full message sequence: system frame with context, prior
    /// history, then the new question. Zero retrieved chunks still produce a
    /// valid prompt; the model is told the excerpts came up empty.
    pub fn build_messages(
        history: &[ChatMessage],
        results: &[ScoredChunk],
        question: &str,
    ) -> Vec<PromptMessage> {
        let context = Self::build_context(results);
        let system = if context.is_empty() {
            format!("{SYSTEM_FRAME}\n\nNo document excerpts matched this question.")
        } else {
            format!("{SYSTEM_FRAME}\n\nDOCUMENT EXCERPTS:\n{context}")
        };

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(PromptMessage::system(system));
        for turn in history {
            messages.push(PromptMessage {
                role: turn.role.as_api_str(),
                content: turn.content.clone(),
            });
        }
        messages.push(PromptMessage::user(question));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn scored(seq: u32, content: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk::new(seq, content),
            similarity: 0.9,
        }
    }

    #[test]
    fn context_numbers_chunks_in_order() {
        let results = vec![scored(0, "first"), scored(1, "second")];
        let context = PromptBuilder::build_context(&results);

        assert!(context.contains("[1]\nfirst"));
        assert!(context.contains("[2]\nsecond"));
        assert!(context.find("[1]").unwrap() < context.find("[2]").unwrap());
    }

    #[test]
    fn messages_wrap_history_between_system_and_question() {
        let history = vec![
            ChatMessage::human("earlier question"),
            ChatMessage::assistant("earlier answer"),
        ];
        let results = vec![scored(0, "excerpt")];

        let messages = PromptBuilder::build_messages(&history, &results, "new question");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("excerpt"));
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "earlier question");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[3].role, "user");
        assert_eq!(messages[3].content, "new question");
    }

    #[test]
    fn empty_retrieval_still_builds_a_prompt() {
        let messages = PromptBuilder::build_messages(&[], &[], "anything?");

        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("No document excerpts"));
        assert_eq!(messages[1].content, "anything?");
    }
}
