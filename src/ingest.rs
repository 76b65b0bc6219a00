//! Corpus ingestion: essays in, persisted vector index out.

use crate::config::SageConfig;
use crate::rag::chunker::TextChunker;
use crate::rag::embeddings::Embedder;
use crate::types::{AppError, Chunk, Document, EssayRecord, Result};
use sage_vector::VectorIndex;
use std::path::Path;
use tracing::{info, instrument};

/// What one ingestion run produced.
#[derive(Debug, Clone, Copy)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    pub dimensions: usize,
}

/// Parse the essay corpus from a JSON array of records.
pub fn load_essays<P: AsRef<Path>>(path: P) -> Result<Vec<EssayRecord>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::Ingestion(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let records: Vec<EssayRecord> = serde_json::from_str(&raw).map_err(|e| {
        AppError::Ingestion(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    if records.is_empty() {
        return Err(AppError::EmptyCorpus);
    }
    Ok(records)
}

/// Run the full ingestion pipeline: load, chunk, embed, build, persist.
///
/// The index is written to the configured path atomically and also
/// returned so the caller can publish it to a live engine without a
/// reload from disk.
#[instrument(skip_all)]
pub async fn run(config: &SageConfig, embedder: &dyn Embedder) -> Result<(IngestReport, VectorIndex<Chunk>)> {
    let records = load_essays(&config.paths.essays)?;
    let documents: Vec<Document> = records.into_iter().map(Document::from_record).collect();
    info!(documents = documents.len(), "Loaded essay corpus");

    let chunker = TextChunker::from_config(&config.chunking)?;
    let chunks: Vec<Chunk> = documents.iter().flat_map(|doc| chunker.split(doc)).collect();
    if chunks.is_empty() {
        return Err(AppError::EmptyCorpus);
    }
    info!(chunks = chunks.len(), "Chunked corpus");

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embedder.embed_many(&texts).await?;
    if vectors.len() != chunks.len() {
        return Err(AppError::Embedding(format!(
            "Expected {} embeddings, got {}",
            chunks.len(),
            vectors.len()
        )));
    }

    let entries: Vec<(Vec<f32>, Chunk)> = vectors.into_iter().zip(chunks).collect();
    let index = VectorIndex::build(entries)?;
    index.save(&config.paths.index)?;
    info!(
        path = %config.paths.index.display(),
        chunks = index.len(),
        dimensions = index.dimensions(),
        "Persisted vector index"
    );

    let report = IngestReport {
        documents: documents.len(),
        chunks: index.len(),
        dimensions: index.dimensions(),
    };
    Ok((report, index))
}
