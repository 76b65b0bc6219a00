//! Source attribution for answers.

use crate::types::{Chunk, Source};
use std::collections::HashSet;

/// Collect the distinct essays the retrieved chunks came from.
///
/// Deduplicates by title, keeping the first-retrieved occurrence of each,
/// so the cited list mirrors retrieval rank. Two chunks from the same
/// essay yield one source.
pub fn attribute(chunks: &[Chunk]) -> Vec<Source> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut sources = Vec::new();
    for chunk in chunks {
        if seen.insert(chunk.title.as_str()) {
            sources.push(Source {
                title: chunk.title.clone(),
                url: chunk.url.clone(),
                source_label: chunk.source_label.clone(),
            });
        }
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn chunk(title: &str, url: &str) -> Chunk {
        Chunk {
            document_id: Uuid::new_v4(),
            title: title.to_string(),
            url: url.to_string(),
            source_label: "Essays".to_string(),
            text: "text".to_string(),
            sequence_index: 0,
        }
    }

    #[test]
    fn test_dedup_keeps_first_retrieved_order() {
        let chunks = vec![
            chunk("A", "https://example.com/a"),
            chunk("B", "https://example.com/b"),
            chunk("A", "https://example.com/a"),
            chunk("C", "https://example.com/c"),
        ];
        let sources = attribute(&chunks);
        let titles: Vec<&str> = sources.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_chunks_yield_no_sources() {
        assert!(attribute(&[]).is_empty());
    }

    #[test]
    fn test_source_carries_citation_metadata() {
        let sources = attribute(&[chunk("Growth", "https://example.com/growth")]);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].url, "https://example.com/growth");
        assert_eq!(sources[0].source_label, "Essays");
    }
}
