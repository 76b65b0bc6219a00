//! Query-time retrieval policy over the vector index.

use crate::rag::embeddings::Embedder;
use crate::types::{AppError, Chunk, Result, ScoredChunk};
use arc_swap::ArcSwapOption;
use sage_vector::VectorIndex;
use std::sync::Arc;
use tracing::debug;

/// Embeds a question and ranks corpus chunks against it.
///
/// Holds the shared index slot rather than an index directly: re-ingestion
/// publishes a fresh index through the same [`ArcSwapOption`], so in-flight
/// retrievals keep the snapshot they loaded while new ones see the
/// replacement atomically.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<ArcSwapOption<VectorIndex<Chunk>>>,
    top_k: usize,
    similarity_threshold: f32,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<ArcSwapOption<VectorIndex<Chunk>>>,
        top_k: usize,
        similarity_threshold: f32,
    ) -> Self {
        Self {
            embedder,
            index,
            top_k,
            similarity_threshold,
        }
    }

    /// Retrieve the most relevant chunks for `query`.
    ///
    /// Results are ranked by descending similarity, filtered by the
    /// configured threshold, and truncated to top-K. An empty result is
    /// valid; the pipeline degrades rather than aborts. An unloaded
    /// index fails with [`AppError::IndexNotFound`].
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>> {
        let index = self.index.load_full().ok_or_else(|| {
            AppError::IndexNotFound("no index loaded; run ingestion first".to_string())
        })?;

        let query_vector = self.embedder.embed(query).await?;
        let hits = index.search(&query_vector, self.top_k)?;

        let retrieved: Vec<ScoredChunk> = hits
            .into_iter()
            .filter(|(_, score)| *score >= self.similarity_threshold)
            .map(|(chunk, score)| ScoredChunk {
                chunk: chunk.clone(),
                score,
            })
            .collect();

        debug!(
            requested = self.top_k,
            kept = retrieved.len(),
            threshold = self.similarity_threshold,
            "Retrieved chunks"
        );
        Ok(retrieved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Embedder that returns canned unit vectors keyed by exact text.
    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(match text {
                "about growth" => vec![1.0, 0.0],
                _ => vec![0.0, 1.0],
            })
        }

        async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }
    }

    fn chunk(title: &str, text: &str) -> Chunk {
        Chunk {
            document_id: Uuid::new_v4(),
            title: title.to_string(),
            url: format!("https://example.com/{}", title),
            source_label: "Essays".to_string(),
            text: text.to_string(),
            sequence_index: 0,
        }
    }

    fn index_slot(entries: Vec<(Vec<f32>, Chunk)>) -> Arc<ArcSwapOption<VectorIndex<Chunk>>> {
        let index = VectorIndex::build(entries).unwrap();
        Arc::new(ArcSwapOption::from(Some(Arc::new(index))))
    }

    #[tokio::test]
    async fn test_retrieve_ranks_and_truncates() {
        let slot = index_slot(vec![
            (vec![1.0, 0.0], chunk("Growth", "growth text")),
            (vec![0.0, 1.0], chunk("Ideas", "ideas text")),
            (vec![0.9, 0.1], chunk("Scaling", "scaling text")),
        ]);
        let retriever = Retriever::new(Arc::new(StubEmbedder), slot, 2, 0.0);

        let results = retriever.retrieve("about growth").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.title, "Growth");
        assert_eq!(results[1].chunk.title, "Scaling");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_threshold_can_empty_results_without_error() {
        let slot = index_slot(vec![(vec![0.0, 1.0], chunk("Ideas", "ideas text"))]);
        let retriever = Retriever::new(Arc::new(StubEmbedder), slot, 4, 0.95);

        let results = retriever.retrieve("about growth").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unloaded_index_fails_with_index_not_found() {
        let slot: Arc<ArcSwapOption<VectorIndex<Chunk>>> =
            Arc::new(ArcSwapOption::from(None));
        let retriever = Retriever::new(Arc::new(StubEmbedder), slot, 4, 0.0);

        let result = retriever.retrieve("anything").await;
        assert!(matches!(result, Err(AppError::IndexNotFound(_))));
    }

    #[tokio::test]
    async fn test_swapped_index_is_visible_to_new_retrievals() {
        let slot = index_slot(vec![(vec![1.0, 0.0], chunk("Old", "old text"))]);
        let retriever = Retriever::new(Arc::new(StubEmbedder), slot.clone(), 4, 0.0);

        let fresh = VectorIndex::build(vec![(vec![1.0, 0.0], chunk("New", "new text"))]).unwrap();
        slot.store(Some(Arc::new(fresh)));

        let results = retriever.retrieve("about growth").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.title, "New");
    }
}
