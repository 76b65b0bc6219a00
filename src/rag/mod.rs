//! Retrieval Augmented Generation (RAG) pipeline components.
//!
//! # Module Structure
//!
//! - [`chunker`] - Splits documents into overlapping fixed-size chunks
//! - [`embeddings`] - Maps text to vectors via the remote embedding API
//! - [`retriever`] - Query-time ranking policy over the vector index
//! - [`context`] - Assembles retrieved chunks into a bounded prompt context
//! - [`generator`] - Fills the prompt template and invokes the LLM
//! - [`confidence`] - Derives a 0-100 confidence estimate from retrieval stats
//! - [`sources`] - Deduplicates and formats cited sources
//!
//! # Pipeline
//!
//! Ingestion: documents are chunked, embedded, and stored in the vector
//! index (see [`crate::ingest`]). Query time: the retriever ranks chunks
//! against the question, the assembler concatenates them into context,
//! the generator produces the answer, and the scorer/attributor derive
//! confidence and citations. [`crate::engine::QueryEngine`] orchestrates
//! the whole flow.

pub mod chunker;
pub mod confidence;
pub mod context;
pub mod embeddings;
pub mod generator;
pub mod retriever;
pub mod sources;
