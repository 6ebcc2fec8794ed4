//! Text chunking
//!
//! Splits page text into bounded, overlapping chunks for embedding. The
//! splitter works down a separator priority list (paragraph break, line
//! break, sentence terminator, space, raw character) so chunk boundaries
//! land on the most natural break available, and consecutive chunks from
//! the same page carry a fixed amount of trailing context forward.
//!
//! Lengths are measured in characters, never bytes, so multibyte text is
//! never cut inside a code point.

use crate::config::ChunkConfig;
use crate::load::Document;
use blake3::Hasher;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Separator priority, most natural first. The empty separator splits on
/// raw character boundaries and always matches.
const SEPARATORS: &[&str] = &["\n\n", "\n", ".", " ", ""];

/// Source attribution carried by every chunk and index entry.
///
/// Fixed fields, validated at the ingestion boundary; retrieval relies on
/// exactly these two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Basename of the originating document
    pub source_file: String,

    /// 1-based page number within the document
    pub page: u32,
}

/// A bounded text fragment, the unit of retrieval
#[derive(Debug, Clone)]
pub struct Chunk {
    /// The chunk text
    pub text: String,

    /// Attribution inherited unmodified from the source page
    pub metadata: ChunkMetadata,
}

/// Chunk every page of a document lazily, in page order.
///
/// Each chunk inherits its page's metadata unmodified. Restartable: call
/// again to get an identical sequence.
pub fn chunk_document<'a>(
    doc: &'a Document,
    config: &'a ChunkConfig,
) -> impl Iterator<Item = Chunk> + 'a {
    doc.pages.iter().flat_map(move |page| {
        chunk_page(&page.text, config).into_iter().map(move |text| Chunk {
            text,
            metadata: ChunkMetadata {
                source_file: doc.file_name.clone(),
                page: page.number,
            },
        })
    })
}

/// Split one page of text into chunks of at most `chunk_size` characters.
///
/// A page that already fits yields exactly one chunk with no overlap
/// applied. Whitespace-only input yields nothing.
pub fn chunk_page(text: &str, config: &ChunkConfig) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    if text.chars().count() <= config.chunk_size {
        return vec![text.trim().to_string()];
    }

    let fragments = split_fragments(text, SEPARATORS, config.chunk_size);
    merge_fragments(fragments, config)
}

/// Recursively split `text` into fragments no longer than `max_chars`,
/// preferring the earliest separator in the priority list. Separators stay
/// attached to the preceding fragment so concatenating fragments
/// reconstructs the original text exactly.
fn split_fragments(text: &str, separators: &[&str], max_chars: usize) -> Vec<String> {
    let Some((sep, rest)) = separators.split_first() else {
        // Indivisible unit longer than the budget
        return vec![text.to_string()];
    };

    let parts: Vec<String> = if sep.is_empty() {
        text.chars().map(|c| c.to_string()).collect()
    } else {
        text.split_inclusive(sep).map(|s| s.to_string()).collect()
    };

    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        if part.chars().count() <= max_chars {
            out.push(part);
        } else {
            out.extend(split_fragments(&part, rest, max_chars));
        }
    }
    out
}

/// Merge fragments into chunks of at most `chunk_size` characters, sliding
/// a window so each chunk starts with the previous chunk's last
/// `chunk_overlap` characters of fragments.
fn merge_fragments(fragments: Vec<String>, config: &ChunkConfig) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: VecDeque<(String, usize)> = VecDeque::new();
    let mut total = 0usize;

    for frag in fragments {
        let len = frag.chars().count();

        if total + len > config.chunk_size && !window.is_empty() {
            push_chunk(&mut chunks, &window);

            // Retreat to the overlap budget, and far enough that the
            // incoming fragment fits
            while total > config.chunk_overlap
                || (total + len > config.chunk_size && total > 0)
            {
                if let Some((_, flen)) = window.pop_front() {
                    total -= flen;
                } else {
                    break;
                }
            }
        }

        total += len;
        window.push_back((frag, len));
    }

    if !window.is_empty() {
        push_chunk(&mut chunks, &window);
    }

    chunks
}

fn push_chunk(chunks: &mut Vec<String>, window: &VecDeque<(String, usize)>) {
    let text: String = window.iter().map(|(s, _)| s.as_str()).collect();
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Compute a stable hash for raw content
pub fn compute_content_hash(content: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(content);
    hasher.finalize().to_hex().to_string()
}

/// Compute a stable hash for a string
pub fn compute_text_hash(text: &str) -> String {
    compute_content_hash(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::Page;

    fn config(chunk_size: usize, chunk_overlap: usize) -> ChunkConfig {
        ChunkConfig {
            chunk_size,
            chunk_overlap,
        }
    }

    #[test]
    fn test_short_page_yields_single_chunk() {
        let chunks = chunk_page("A short page.", &config(1000, 200));
        assert_eq!(chunks, vec!["A short page.".to_string()]);
    }

    #[test]
    fn test_whitespace_page_yields_nothing() {
        assert!(chunk_page("  \n\n  ", &config(1000, 200)).is_empty());
    }

    #[test]
    fn test_chunks_respect_size_bound() {
        let text = "The camera streams video over the network. ".repeat(60);
        let cfg = config(200, 40);

        let chunks = chunk_page(&text, &cfg);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(
                chunk.chars().count() <= cfg.chunk_size,
                "chunk of {} chars exceeds {}",
                chunk.chars().count(),
                cfg.chunk_size
            );
        }
    }

    #[test]
    fn test_raw_character_overlap_is_exact() {
        // No separators at all, so splitting falls through to raw
        // characters and the window arithmetic is exact.
        let text: String = ('a'..='z').cycle().take(26).collect();
        let cfg = config(10, 3);

        let chunks = chunk_page(&text, &cfg);
        assert!(chunks.len() > 1);

        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].chars().collect();
            let tail: String = prev[prev.len() - 3..].iter().collect();
            let head: String = pair[1].chars().take(3).collect();
            assert_eq!(tail, head, "consecutive chunks must share 3 characters");
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let text = format!("{}\n\n{}", "alpha ".repeat(20).trim(), "beta ".repeat(20).trim());
        let cfg = config(130, 10);

        let chunks = chunk_page(&text, &cfg);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with("alpha"));
        assert!(chunks[1].starts_with("beta"));
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text = "Sensor wiring requires a 12V supply. Check polarity first. ".repeat(30);
        let cfg = config(180, 30);

        let a = chunk_page(&text, &cfg);
        let b = chunk_page(&text, &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn test_multibyte_text_never_splits_inside_a_char() {
        let text = "señal de vídeo interrumpida, revisión de conexión ".repeat(20);
        let cfg = config(64, 16);

        for chunk in chunk_page(&text, &cfg) {
            // Would have panicked on a byte-slicing bug; also check bound
            assert!(chunk.chars().count() <= 64);
        }
    }

    #[test]
    fn test_chunks_inherit_page_metadata() {
        let doc = Document {
            file_name: "dvr-manual.pdf".to_string(),
            pages: vec![
                Page {
                    number: 1,
                    text: "page one text".to_string(),
                },
                Page {
                    number: 2,
                    text: "page two text".to_string(),
                },
            ],
        };

        let chunks: Vec<Chunk> = chunk_document(&doc, &config(1000, 200)).collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata.source_file, "dvr-manual.pdf");
        assert_eq!(chunks[0].metadata.page, 1);
        assert_eq!(chunks[1].metadata.page, 2);
    }

    #[test]
    fn test_content_hash_stability() {
        let hash1 = compute_text_hash("hello world");
        let hash2 = compute_text_hash("hello world");
        let hash3 = compute_text_hash("different content");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
    }
}
