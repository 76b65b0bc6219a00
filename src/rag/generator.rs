//! Answer generation over assembled context.

use crate::llm::LLMClient;
use crate::types::Result;
use std::sync::Arc;
use tracing::debug;

/// User-prompt template. `{context}` and `{question}` are filled per query.
const PROMPT_TEMPLATE: &str = "Based on the following essay excerpts, answer the question.\n\
\n\
Context from the essays:\n\
{context}\n\
\n\
Question: {question}\n\
\n\
Answer based on the context above. If the context does not contain enough \
information to answer, say so explicitly.";

/// Produces answers by prompting an [`LLMClient`] with retrieved context.
pub struct AnswerGenerator {
    client: Arc<dyn LLMClient>,
    system_prompt: String,
}

impl AnswerGenerator {
    pub fn new(client: Arc<dyn LLMClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            client,
            system_prompt: system_prompt.into(),
        }
    }

    /// Generate an answer to `question` grounded in `context`.
    ///
    /// An empty context is passed through unchanged; the system prompt
    /// instructs the model to admit when the excerpts do not cover the
    /// question rather than invent an answer.
    pub async fn generate(&self, question: &str, context: &str) -> Result<String> {
        let prompt = PROMPT_TEMPLATE
            .replace("{context}", context)
            .replace("{question}", question);

        debug!(
            model = self.client.model_name(),
            prompt_chars = prompt.len(),
            "Generating answer"
        );
        self.client
            .generate_with_system(&self.system_prompt, &prompt)
            .await
    }

    /// The model the underlying client invokes.
    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }
}
