//! Query orchestration.
//!
//! [`QueryEngine`] drives a question through the four pipeline stages:
//! retrieving, assembling, generating, scoring. Stages run strictly in
//! order and any failure is wrapped with the stage that raised it, so a
//! caller can tell an embedding outage apart from a generation outage.

use crate::config::SageConfig;
use crate::llm::{GeminiClient, LLMClient, ModelTier};
use crate::rag::confidence;
use crate::rag::context::ContextAssembler;
use crate::rag::embeddings::{Embedder, GeminiEmbedder};
use crate::rag::generator::AnswerGenerator;
use crate::rag::retriever::Retriever;
use crate::rag::sources;
use crate::types::{AppError, Chunk, PipelineStage, QueryResult, Result};
use arc_swap::ArcSwapOption;
use sage_vector::VectorIndex;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// The assembled query pipeline.
///
/// Holds the index behind an [`ArcSwapOption`] slot shared with ingestion:
/// publishing a rebuilt index is a single atomic store, and queries already
/// in flight finish against the snapshot they loaded.
pub struct QueryEngine {
    config: SageConfig,
    index_slot: Arc<ArcSwapOption<VectorIndex<Chunk>>>,
    retriever: Retriever,
    assembler: ContextAssembler,
    generator: AnswerGenerator,
}

impl QueryEngine {
    /// Wire an engine from explicit components. Used directly by tests;
    /// production callers go through [`QueryEngine::from_config`].
    pub fn new(
        config: SageConfig,
        embedder: Arc<dyn Embedder>,
        client: Arc<dyn LLMClient>,
    ) -> Self {
        let index_slot: Arc<ArcSwapOption<VectorIndex<Chunk>>> =
            Arc::new(ArcSwapOption::from(None));
        let retriever = Retriever::new(
            embedder,
            index_slot.clone(),
            config.retrieval.top_k,
            config.retrieval.similarity_threshold,
        );
        let generator = AnswerGenerator::new(client, config.prompt.system_prompt.clone());
        Self {
            config,
            index_slot,
            retriever,
            assembler: ContextAssembler::new(),
            generator,
        }
    }

    /// Build the production engine: Gemini embedder plus the generation
    /// model selected by `tier`, with the API key resolved from the
    /// configured environment variable.
    pub fn from_config(config: SageConfig, tier: ModelTier) -> Result<Self> {
        let api_key = config.api.api_key()?;
        let embedder = Arc::new(GeminiEmbedder::new(
            config.api.api_base.clone(),
            api_key.clone(),
            config.models.embedding_model.clone(),
        ));
        let client = Arc::new(GeminiClient::for_tier(&config, api_key, tier));
        Ok(Self::new(config, embedder, client))
    }

    pub fn config(&self) -> &SageConfig {
        &self.config
    }

    /// Load a persisted index from `path` and publish it to the slot.
    pub fn load_index<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let index = VectorIndex::load(path.as_ref())?;
        info!(
            chunks = index.len(),
            dimensions = index.dimensions(),
            "Loaded vector index"
        );
        self.install_index(index);
        Ok(())
    }

    /// Atomically replace the live index. Queries that already loaded the
    /// previous snapshot complete against it.
    pub fn install_index(&self, index: VectorIndex<Chunk>) {
        self.index_slot.store(Some(Arc::new(index)));
    }

    /// Chunk count and embedding dimensions of the live index, if loaded.
    pub fn index_stats(&self) -> Option<(usize, usize)> {
        self.index_slot
            .load_full()
            .map(|index| (index.len(), index.dimensions()))
    }

    /// Answer `question` end to end.
    ///
    /// A retrieval that the similarity threshold empties is not an error:
    /// the pipeline continues with empty context and the result carries
    /// zero confidence and no sources. Real failures abort the remaining
    /// stages and surface as [`AppError::Pipeline`].
    #[instrument(skip(self))]
    pub async fn query(&self, question: &str) -> Result<QueryResult> {
        let mut reasoning_steps = Vec::new();

        let scored = self
            .retriever
            .retrieve(question)
            .await
            .map_err(|e| AppError::in_stage(PipelineStage::Retrieving, e))?;
        let chunks: Vec<Chunk> = scored.into_iter().map(|s| s.chunk).collect();
        reasoning_steps.push(format!(
            "Retrieved {} relevant chunks (top-{}, threshold {})",
            chunks.len(),
            self.config.retrieval.top_k,
            self.config.retrieval.similarity_threshold
        ));

        let context = self.assembler.assemble(&chunks);
        reasoning_steps.push(format!(
            "Assembled {}-character context from {} chunks",
            context.len(),
            chunks.len()
        ));

        let answer = self
            .generator
            .generate(question, &context)
            .await
            .map_err(|e| AppError::in_stage(PipelineStage::Generating, e))?;
        reasoning_steps.push(format!(
            "Generated answer with {}",
            self.generator.model_name()
        ));

        let confidence = confidence::score(&chunks, self.config.retrieval.top_k);
        let cited = sources::attribute(&chunks);
        reasoning_steps.push(format!(
            "Scored confidence {} from {} sources",
            confidence,
            cited.len()
        ));

        info!(
            chunks = chunks.len(),
            sources = cited.len(),
            confidence,
            "Query complete"
        );
        Ok(QueryResult {
            answer,
            sources: cited,
            confidence,
            reasoning_steps,
        })
    }
}
