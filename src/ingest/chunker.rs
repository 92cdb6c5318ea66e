use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// Splits text into overlapping chunks, preferring sentence boundaries
/// near the end of each chunk.
pub fn split_into_chunks(text: &str, config: &ChunkerConfig) -> Vec<String> {
    let chunk_size = config.chunk_size.max(1);
    let overlap = config.chunk_overlap;

    let chars: Vec<char> = text.chars().collect();
    let total_chars = chars.len();

    let mut chunks = Vec::new();
    if total_chars == 0 {
        return chunks;
    }

    let mut start = 0;

    while start < total_chars {
        let end = (start + chunk_size).min(total_chars);
        let window: String = chars[start..end].iter().collect();

        let chunk_text = if end < total_chars {
            cut_at_sentence_boundary(&window)
        } else {
            window
        };
        let consumed = chunk_text.chars().count();

        let trimmed = chunk_text.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        if end == total_chars {
            break;
        }
        // Advance relative to where this chunk actually ended, so a
        // boundary cut never skips the text between the cut and the
        // nominal chunk end.
        start += consumed.saturating_sub(overlap).max(1);
    }

    chunks
}

/// Looks for a sentence ending in the last fifth of the chunk and cuts
/// there; returns the chunk unchanged when none is found.
fn cut_at_sentence_boundary(text: &str) -> String {
    let sentence_endings = [". ", "! ", "? ", ".\n", "!\n", "?\n"];

    let search_start = text
        .char_indices()
        .nth(text.chars().count() * 80 / 100)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let search_text = &text[search_start..];

    for ending in sentence_endings.iter() {
        if let Some(pos) = search_text.rfind(ending) {
            let cut_pos = search_start + pos + ending.len();
            return text[..cut_pos].to_string();
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_long_text_with_overlap() {
        let config = ChunkerConfig {
            chunk_size: 100,
            chunk_overlap: 20,
        };
        let text = "This is a test sentence. ".repeat(20);

        let chunks = split_into_chunks(&text, &config);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn short_text_yields_one_chunk() {
        let chunks = split_into_chunks("Just a short note.", &ChunkerConfig::default());
        assert_eq!(chunks, vec!["Just a short note."]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_into_chunks("", &ChunkerConfig::default()).is_empty());
        assert!(split_into_chunks("   \n  ", &ChunkerConfig::default()).is_empty());
    }

    #[test]
    fn prefers_sentence_boundary_near_chunk_end() {
        let config = ChunkerConfig {
            chunk_size: 60,
            chunk_overlap: 0,
        };
        let text = "A first sentence that fills most of the chunk nicely. Next one continues here.";

        let chunks = split_into_chunks(&text, &config);
        assert!(chunks[0].ends_with("nicely."));
    }

    #[test]
    fn boundary_cut_keeps_the_text_after_the_cut() {
        let config = ChunkerConfig {
            chunk_size: 100,
            chunk_overlap: 10,
        };
        // A sentence ending lands just inside the last fifth of the first
        // chunk, so that chunk is cut short of the nominal 100 chars.
        let text = format!(
            "{}. quarterly report due Friday {}",
            "x".repeat(81),
            "y".repeat(100)
        );

        let chunks = split_into_chunks(&text, &config);
        assert!(
            chunks.iter().any(|c| c.contains("quarterly report due Friday")),
            "text after the boundary cut was dropped: {chunks:?}"
        );
    }

    #[test]
    fn every_word_survives_chunking() {
        let config = ChunkerConfig {
            chunk_size: 80,
            chunk_overlap: 16,
        };
        let text = "Sentence one ends here. Sentence two follows closely. \
                    Sentence three keeps going. Sentence four wraps up the paragraph. \
                    Sentence five is the last one.";

        let chunks = split_into_chunks(text, &config);
        let joined = chunks.join(" ");
        for word in text.split_whitespace() {
            assert!(joined.contains(word), "missing word: {word}");
        }
    }

    #[test]
    fn multibyte_text_does_not_panic() {
        let config = ChunkerConfig {
            chunk_size: 10,
            chunk_overlap: 2,
        };
        let text = "héllo wörld. ünïcode tèxt hère. ".repeat(5);
        let chunks = split_into_chunks(&text, &config);
        assert!(!chunks.is_empty());
    }
}
