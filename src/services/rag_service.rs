//! RAG (Retrieval-Augmented Generation) service
//!
//! Answers questions from the stored documents: embed the question, fetch the
//! top-k segments, build a context prompt and make a single model call.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::basic_chat_service::require_text;
use super::embedding_service::EmbeddingService;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::RagAnswer;
use crate::domain::ports::ChatModel;

/// Answer given by [`RagService::answer`] when nothing relevant is stored.
pub const NO_CONTEXT_ANSWER: &str =
    "I don't have enough information to answer this question. Please add relevant documents first.";

/// Answer given by [`RagService::answer_with_sources`] when nothing relevant is stored.
pub const NO_CONTEXT_ANSWER_WITH_SOURCES: &str =
    "I don't have enough information to answer this question.";

const CONTEXT_SEPARATOR: &str = "\n\n";

/// RAG service for question answering over stored documents
///
/// The prompt asks the model to stay within the context, but the answer is
/// returned verbatim; grounding is not verified.
pub struct RagService {
    chat_model: Arc<dyn ChatModel>,
    retriever: Arc<EmbeddingService>,
}

impl RagService {
    /// Create a new RAG service
    ///
    /// # Arguments
    /// * `chat_model` - Model that writes the final answer
    /// * `retriever` - Ingestion/search service over the shared store
    pub fn new(chat_model: Arc<dyn ChatModel>, retriever: Arc<EmbeddingService>) -> Self {
        Self {
            chat_model,
            retriever,
        }
    }

    /// Answer a question from the `k` most relevant segments
    ///
    /// # Returns
    /// * `Ok(String)` - The model's answer, or [`NO_CONTEXT_ANSWER`] without
    ///   calling the model when nothing was retrieved
    /// * `Err(_)` - If `k` is 0, the question is empty, or a provider fails
    #[instrument(skip(self, question))]
    pub async fn answer(&self, question: &str, k: usize) -> DomainResult<String> {
        let sources = self.retrieve(question, k).await?;
        if sources.is_empty() {
            warn!("No relevant context found for question");
            return Ok(NO_CONTEXT_ANSWER.to_string());
        }

        let prompt = answer_prompt(&sources.join(CONTEXT_SEPARATOR), question);
        let answer = self.chat_model.generate_text(&prompt).await?;
        info!(segments = sources.len(), "RAG answer generated");
        Ok(answer)
    }

    /// Answer a question and return the segment texts used as context
    ///
    /// # Returns
    /// * `Ok(RagAnswer)` - Answer plus sources in relevance order; the fallback
    ///   answer with no sources when nothing was retrieved
    #[instrument(skip(self, question))]
    pub async fn answer_with_sources(&self, question: &str, k: usize) -> DomainResult<RagAnswer> {
        let sources = self.retrieve(question, k).await?;
        if sources.is_empty() {
            return Ok(RagAnswer::new(NO_CONTEXT_ANSWER_WITH_SOURCES, Vec::new()));
        }

        let prompt = sources_prompt(&sources.join(CONTEXT_SEPARATOR), question);
        let answer = self.chat_model.generate_text(&prompt).await?;
        info!(segments = sources.len(), "RAG answer with sources generated");
        Ok(RagAnswer::new(answer, sources))
    }

    async fn retrieve(&self, question: &str, k: usize) -> DomainResult<Vec<String>> {
        require_text(question, "question")?;
        if k == 0 {
            return Err(DomainError::ValidationFailed(
                "maxResults must be at least 1".to_string(),
            ));
        }

        let matches = self.retriever.find_matches(question, k).await?;
        let sources: Vec<String> = matches
            .into_iter()
            .map(|m| m.segment.text().to_string())
            .collect();
        if let Some(first) = sources.first() {
            debug!(context_preview = %first.chars().take(200).collect::<String>(), "retrieved context");
        }
        Ok(sources)
    }
}

fn answer_prompt(context: &str, question: &str) -> String {
    format!(
        "Based on the following context, answer the question.\n\
         If the answer is not in the context, say \"I don't know based on the provided information.\"\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question: {question}\n\
         \n\
         Answer:\n"
    )
}

fn sources_prompt(context: &str, question: &str) -> String {
    format!(
        "Based on the following context, answer the question.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question: {question}\n\
         \n\
         Answer:\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_prompt_layout() {
        let prompt = answer_prompt("A\n\nB", "What?");
        assert_eq!(
            prompt,
            "Based on the following context, answer the question.\n\
             If the answer is not in the context, say \"I don't know based on the provided information.\"\n\
             \nContext:\nA\n\nB\n\nQuestion: What?\n\nAnswer:\n"
        );
    }

    #[test]
    fn test_sources_prompt_has_no_refusal_line() {
        let prompt = sources_prompt("ctx", "q");
        assert!(prompt.starts_with("Based on the following context, answer the question.\n\nContext:\nctx"));
        assert!(!prompt.contains("I don't know"));
        assert!(prompt.ends_with("Question: q\n\nAnswer:\n"));
    }
}
