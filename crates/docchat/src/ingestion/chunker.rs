//! Fixed-window text chunking with separator-aware boundaries

use crate::config::ChunkingConfig;
use crate::types::Chunk;

/// Splits text into overlapping character windows.
///
/// The cut for each chunk moves back to the last separator inside the window
/// when one exists, otherwise it falls at the exact nominal offset. The next
/// chunk starts `overlap` characters before the cut, so consecutive chunks
/// share that much text. Deterministic for a given input and parameters;
/// empty input yields zero chunks.
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
    separator: char,
}

impl TextChunker {
    /// Create a chunker with explicit parameters
    pub fn new(chunk_size: usize, overlap: usize, separator: char) -> Self {
        Self {
            chunk_size,
            overlap,
            separator,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap, config.separator)
    }

    /// Chunk `text` into its deterministic overlapping sequence
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every char boundary plus the end of the text, so
        // windows can be addressed in characters without re-walking UTF-8.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = boundaries.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0usize;
        let mut seq = 0u32;

        loop {
            let window_end = (start + self.chunk_size).min(char_count);
            let mut cut = window_end;

            // A window that reaches the end of the text is taken whole; the
            // separator only adjusts interior boundaries.
            if window_end < char_count {
                let window = &text[boundaries[start]..boundaries[window_end]];
                if let Some(sep_byte) = window.rfind(self.separator) {
                    let sep_char = start + window[..sep_byte].chars().count();
                    if sep_char > start {
                        // Keep the separator with the chunk it terminates.
                        cut = sep_char + 1;
                    }
                }
            }

            chunks.push(Chunk::new(seq, &text[boundaries[start]..boundaries[cut]]));
            seq += 1;

            if cut >= char_count {
                break;
            }

            // Overlap with the previous chunk, but always move forward.
            start = cut.saturating_sub(self.overlap).max(start + 1);
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> TextChunker {
        TextChunker::new(size, overlap, '\n')
    }

    #[test]
    fn short_input_is_a_single_identical_chunk() {
        let text = "Alpha Beta Gamma";
        let chunks = chunker(1000, 200).chunk(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
        assert_eq!(chunks[0].seq, 0);
    }

    #[test]
    fn empty_input_yields_zero_chunks() {
        assert!(chunker(1000, 200).chunk("").is_empty());
    }

    #[test]
    fn consecutive_chunks_overlap_exactly_without_separators() {
        let text: String = std::iter::repeat("abcdefghij").take(30).collect(); // 300 chars
        let chunks = chunker(100, 20).chunk(&text);

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let prev = &pair[0].content;
            let next = &pair[1].content;
            assert_eq!(&prev[prev.len() - 20..], &next[..20]);
        }
    }

    #[test]
    fn overlap_stripped_reconcatenation_reconstructs_input() {
        let text: String = std::iter::repeat("0123456789").take(50).collect(); // 500 chars
        let chunks = chunker(120, 30).chunk(&text);

        let mut rebuilt = chunks[0].content.clone();
        for chunk in &chunks[1..] {
            rebuilt.push_str(&chunk.content[30..]);
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn cuts_prefer_the_last_newline_in_the_window() {
        // Window of 20 over "aaaa...\nbbbb..." puts the newline at offset 9;
        // the first chunk must end right after it.
        let text = format!("{}\n{}", "a".repeat(9), "b".repeat(40));
        let chunks = chunker(20, 5).chunk(&text);

        assert_eq!(chunks[0].content, format!("{}\n", "a".repeat(9)));
        assert!(chunks[1].content.starts_with('b') || chunks[1].content.contains('\n'));
    }

    #[test]
    fn nominal_cut_applies_when_no_separator_in_window() {
        let text = "x".repeat(250);
        let chunks = chunker(100, 10).chunk(&text);
        assert_eq!(chunks[0].content.len(), 100);
        assert_eq!(chunks[1].content.len(), 100);
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = format!("line one\nline two\n{}", "body ".repeat(100));
        let a = chunker(80, 16).chunk(&text);
        let b = chunker(80, 16).chunk(&text);
        assert_eq!(a, b);
    }

    #[test]
    fn multibyte_text_cuts_on_char_boundaries() {
        let text = "é".repeat(150);
        let chunks = chunker(100, 20).chunk(&text);
        assert_eq!(chunks[0].char_len(), 100);
        for chunk in &chunks {
            assert!(chunk.content.chars().all(|c| c == 'é'));
        }
    }

    #[test]
    fn no_chunk_is_empty() {
        let text = format!("\n\n{}\n\n", "words ".repeat(200));
        for chunk in chunker(50, 10).chunk(&text) {
            assert!(!chunk.content.is_empty());
        }
    }
}
