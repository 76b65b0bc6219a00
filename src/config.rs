//! TOML-based configuration for Sage.
//!
//! All tunable constants live in `sage.toml`: chunking geometry, retrieval
//! policy, model identifiers, and file locations. Missing fields fall back
//! to the defaults the corpus was originally tuned with. Changing a value
//! requires re-running the affected path (e.g. re-ingesting after a chunk
//! size change); nothing hot-reloads.

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from sage.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SageConfig {
    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub prompt: PromptConfig,
}

// ============= Chunking =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between adjacent chunks. Must stay below chunk_size.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    500
}

fn default_chunk_overlap() -> usize {
    50
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

// ============= Retrieval =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum number of chunks considered per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum cosine similarity for a chunk to count as relevant.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

fn default_top_k() -> usize {
    4
}

fn default_similarity_threshold() -> f32 {
    0.7
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

// ============= Models =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Embedding model identifier.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Full-quality generation model.
    #[serde(default = "default_quality_model")]
    pub quality_model: String,

    /// Cheaper, faster generation model.
    #[serde(default = "default_fast_model")]
    pub fast_model: String,

    /// Sampling temperature passed to the generation model.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_quality_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_fast_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            embedding_model: default_embedding_model(),
            quality_model: default_quality_model(),
            fast_model: default_fast_model(),
            temperature: default_temperature(),
        }
    }
}

// ============= API =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Generative Language API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl ApiConfig {
    /// Resolve the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env).map_err(|_| {
            AppError::Configuration(format!(
                "Environment variable '{}' is not set",
                self.api_key_env
            ))
        })
    }
}

// ============= Paths =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// JSON array of essay records to ingest.
    #[serde(default = "default_essays_path")]
    pub essays: PathBuf,

    /// Location of the persisted vector index.
    #[serde(default = "default_index_path")]
    pub index: PathBuf,
}

fn default_essays_path() -> PathBuf {
    PathBuf::from("data/raw/essays.json")
}

fn default_index_path() -> PathBuf {
    PathBuf::from("data/processed/index.json")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            essays: default_essays_path(),
            index: default_index_path(),
        }
    }
}

// ============= Prompt =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// System prompt sent with every generation request.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_system_prompt() -> String {
    "You are an expert startup advisor trained on a corpus of essays about \
     building companies.\n\
     \n\
     Your role:\n\
     - Provide actionable, specific advice based on the essays\n\
     - Always cite which essays informed your answer\n\
     - Be honest when the provided context does not cover the question\n\
     - Think step-by-step before answering\n\
     - Focus on practical, founder-friendly guidance"
        .to_string()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
        }
    }
}

// ============= Loading & validation =============

impl SageConfig {
    /// Load configuration from a TOML file. A missing file yields the
    /// defaults; a present-but-invalid file is a hard error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                AppError::Configuration(format!("Failed to read {}: {}", path.display(), e))
            })?;
            toml::from_str(&raw).map_err(|e| {
                AppError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(AppError::Configuration(
                "chunk_size must be positive".to_string(),
            ));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(AppError::Configuration(format!(
                "chunk_overlap ({}) must be strictly less than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(AppError::Configuration("top_k must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.retrieval.similarity_threshold) {
            return Err(AppError::Configuration(format!(
                "similarity_threshold ({}) must be within [0, 1]",
                self.retrieval.similarity_threshold
            )));
        }
        Ok(())
    }
}
