use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============= Corpus Types =============

/// One row of the ingestion input: a JSON array of these is the whole corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssayRecord {
    pub title: String,
    pub url: String,
    pub content: String,
    pub source: String,
}

/// An ingested essay. Created once per record and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub source_label: String,
    pub full_text: String,
    pub ingested_at: DateTime<Utc>,
}

impl Document {
    /// Create a document from an ingestion record, assigning a fresh id.
    pub fn from_record(record: EssayRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: record.title,
            url: record.url,
            source_label: record.source,
            full_text: record.content,
            ingested_at: Utc::now(),
        }
    }
}

/// A bounded text segment derived from a document for indexing.
///
/// Document identity fields are denormalized onto each chunk so a
/// retrieval hit carries its citation metadata without a side lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub document_id: Uuid,
    pub title: String,
    pub url: String,
    pub source_label: String,
    pub text: String,
    /// Position of this chunk within its document, starting at 0.
    pub sequence_index: usize,
}

/// A retrieved chunk with its similarity score. Scores are consumed
/// internally (threshold filtering, confidence); callers of the query
/// API only see the composed [`QueryResult`].
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

// ============= Query Types =============

/// A cited source, unique by title within one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub source_label: String,
}

/// The composed answer for one question. Created per query; not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    /// Cited sources in first-retrieved order, deduplicated by title.
    pub sources: Vec<Source>,
    /// Groundedness estimate in [0, 100] derived from retrieval statistics.
    pub confidence: f32,
    /// One entry per completed pipeline stage, reflecting real execution.
    pub reasoning_steps: Vec<String>,
}

/// The stages a query passes through, in order. Used for stage-completion
/// events and for attributing a failure to the stage that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Retrieving,
    Assembling,
    Generating,
    Scoring,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Retrieving => "retrieving",
            Self::Assembling => "assembling",
            Self::Generating => "generating",
            Self::Scoring => "scoring",
        };
        write!(f, "{}", name)
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Embedding service error: {0}")]
    Embedding(String),

    #[error("Generation service error: {0}")]
    Generation(String),

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Index corrupt: {0}")]
    IndexCorrupt(String),

    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    #[error("Index error: {0}")]
    Index(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Query failed during the {stage} stage: {source}")]
    Pipeline {
        stage: PipelineStage,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Wrap an error with the pipeline stage it occurred in.
    pub fn in_stage(stage: PipelineStage, source: AppError) -> Self {
        AppError::Pipeline {
            stage,
            source: Box::new(source),
        }
    }
}

impl From<sage_vector::Error> for AppError {
    fn from(e: sage_vector::Error) -> Self {
        match e {
            sage_vector::Error::EmptyCorpus => AppError::EmptyCorpus,
            sage_vector::Error::IndexNotFound(path) => AppError::IndexNotFound(path),
            sage_vector::Error::IndexCorrupt(msg) => AppError::IndexCorrupt(msg),
            other => AppError::Index(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
