//! LLM client abstractions and the Gemini provider.
//!
//! The pipeline talks to generation models through the [`LLMClient`]
//! trait; [`GeminiClient`] is the production implementation. The fast vs
//! quality model variant is picked once, at construction, by the caller
//! (see [`ModelTier`]), never by a global flag at request time.

pub mod client;
pub mod gemini;

pub use client::{LLMClient, ModelTier};
pub use gemini::GeminiClient;
