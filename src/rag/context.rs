//! Prompt context assembly.

use crate::types::Chunk;

/// Separator placed between chunk texts in the assembled context.
const SEPARATOR: &str = "\n\n";

/// Concatenates retrieved chunks into the context window for generation.
#[derive(Debug, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Join chunk texts in retrieval-rank order. No deduplication is
    /// applied; overlapping chunk windows repeat text by design. Empty
    /// input yields an empty string, which the generator handles.
    pub fn assemble(&self, chunks: &[Chunk]) -> String {
        chunks
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }
}
