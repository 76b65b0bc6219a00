//! Document chunking.
//!
//! Splits essay text into overlapping character windows for embedding.
//! Windows snap backward to whitespace where possible so chunks rarely cut
//! words in half, but the split is purely length-driven, deterministic,
//! and reconstructible: each chunk starts exactly `chunk_overlap`
//! characters before the previous chunk's end, so concatenating the
//! non-overlapping regions yields the original text.

use crate::config::ChunkingConfig;
use crate::types::{AppError, Chunk, Document, Result};

pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a chunker.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] unless
    /// `0 <= chunk_overlap < chunk_size` and `chunk_size > 0`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(AppError::Configuration(
                "chunk_size must be positive".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(AppError::Configuration(format!(
                "chunk_overlap ({}) must be strictly less than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Create a chunker from the loaded configuration.
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split a document into ordered chunks carrying its citation metadata.
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        self.split_text(&document.full_text)
            .into_iter()
            .enumerate()
            .map(|(sequence_index, text)| Chunk {
                document_id: document.id,
                title: document.title.clone(),
                url: document.url.clone(),
                source_label: document.source_label.clone(),
                text,
                sequence_index,
            })
            .collect()
    }

    /// Split raw text into overlapping windows of at most `chunk_size`
    /// characters. Empty text yields no chunks.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        // Byte offset of every char boundary, plus the end of the text.
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total_chars = bounds.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < total_chars {
            let mut end = (start + self.chunk_size).min(total_chars);

            // Snap backward to a whitespace boundary, but never so far that
            // the next window would fail to advance past `start`.
            if end < total_chars {
                let floor = start + self.chunk_overlap + 1;
                if let Some(snapped) = (floor..=end)
                    .rev()
                    .find(|&pos| char_at(text, &bounds, pos - 1).is_whitespace())
                {
                    end = snapped;
                }
            }

            chunks.push(text[bounds[start]..bounds[end]].to_string());

            if end >= total_chars {
                break;
            }
            start = end - self.chunk_overlap;
        }

        chunks
    }
}

fn char_at(text: &str, bounds: &[usize], pos: usize) -> char {
    text[bounds[pos]..].chars().next().unwrap_or('\0')
}
