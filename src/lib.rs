//! # sage - grounded startup advice
//!
//! A retrieval augmented generation (RAG) pipeline over a fixed corpus of
//! startup essays. Essays are chunked, embedded remotely, and stored in a
//! local exact-search vector index; questions are answered by retrieving
//! the most relevant chunks, prompting an LLM with them, and attaching
//! cited sources plus a deterministic confidence score.
//!
//! ## Overview
//!
//! sage can be used two ways:
//!
//! 1. **As a CLI** - Run the `sage` binary (`ingest`, `query`, `info`)
//! 2. **As a library** - Drive [`QueryEngine`] from your own code
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use sage::{ModelTier, QueryEngine, SageConfig};
//!
//! #[tokio::main]
//! async fn main() -> sage::Result<()> {
//!     let config = SageConfig::load("sage.toml")?;
//!     let engine = QueryEngine::from_config(config, ModelTier::Quality)?;
//!     engine.load_index(&engine.config().paths.index.clone())?;
//!
//!     let result = engine.query("How do I find startup ideas?").await?;
//!     println!("{}", result.answer);
//!     println!("confidence: {}", result.confidence);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - TOML configuration with tuned defaults
//! - [`engine`] - Staged query orchestration
//! - [`ingest`] - Corpus loading, chunking, embedding, index build
//! - [`llm`] - Generation client abstractions and the Gemini client
//! - [`rag`] - Chunking, embedding, retrieval, context, scoring
//! - [`types`] - Core types and error handling

/// Command-line interface (argument parsing, colored output).
pub mod cli;
/// TOML-based configuration.
pub mod config;
/// Query pipeline orchestration.
pub mod engine;
/// Corpus ingestion and index construction.
pub mod ingest;
/// LLM client implementations.
pub mod llm;
/// Retrieval Augmented Generation (RAG) components.
pub mod rag;
/// Core types (corpus, query results, errors).
pub mod types;

// Re-export commonly used types
pub use config::SageConfig;
pub use engine::QueryEngine;
pub use ingest::IngestReport;
pub use llm::{GeminiClient, LLMClient, ModelTier};
pub use rag::embeddings::{Embedder, GeminiEmbedder};
pub use types::{AppError, QueryResult, Result, Source};
