//! Sentence-aware text chunking.
//!
//! Splits raw video text into overlapping segments that prefer to end at
//! sentence boundaries, so retrieval works on coherent passages.

use crate::error::{Result, VidraError};

/// Sentence-terminal patterns, tried in priority order when pulling a window
/// edge back to a sentence boundary.
const SENTENCE_BREAKS: [&str; 5] = [". ", ".\n", "! ", "?\n", "? "];

/// Split text into overlapping, sentence-aware chunks.
///
/// Windows are measured in characters, not bytes, so multi-byte text never
/// splits inside a code point. Each window that does not reach end-of-text is
/// trimmed back to the last sentence break found in it; the next window starts
/// `chunk_overlap` characters before the cut. Returned chunks are
/// whitespace-trimmed and never empty.
///
/// Returns an empty vector for empty or whitespace-only input. Rejects
/// `chunk_size == 0` and `chunk_overlap >= chunk_size`.
pub fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Vec<String>> {
    if chunk_size == 0 {
        return Err(VidraError::InvalidInput(
            "chunk_size must be greater than zero".to_string(),
        ));
    }
    if chunk_overlap >= chunk_size {
        return Err(VidraError::InvalidInput(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            chunk_overlap, chunk_size
        )));
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    // Byte offset of every character plus an end sentinel, so character
    // positions can be mapped to slice boundaries in both directions.
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total_chars = offsets.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < total_chars {
        let window_end = (start + chunk_size).min(total_chars);
        let mut cut = window_end;

        if window_end < total_chars {
            let window = &text[offsets[start]..offsets[window_end]];
            for brk in SENTENCE_BREAKS {
                if let Some(pos) = window.rfind(brk) {
                    // Cut just past the terminal punctuation. Break patterns are
                    // ASCII, so the byte offset stays on a char boundary.
                    let cut_byte = offsets[start] + pos + 1;
                    cut = offsets
                        .binary_search(&cut_byte)
                        .unwrap_or_else(|insert_at| insert_at);
                    break;
                }
            }
        }

        let piece = text[offsets[start]..offsets[cut]].trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }

        if cut >= total_chars {
            break;
        }
        // Step back by the overlap, but always advance at least one character
        // past the previous start; a large overlap must not loop forever.
        start = cut.saturating_sub(chunk_overlap).max(start + 1);
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(chunk_text("", 500, 50).unwrap().is_empty());
        assert!(chunk_text("   \n\t  ", 500, 50).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(chunk_text("some text", 0, 0).is_err());
        assert!(chunk_text("some text", 100, 100).is_err());
        assert!(chunk_text("some text", 100, 150).is_err());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("Just one short sentence.", 500, 50).unwrap();
        assert_eq!(chunks, vec!["Just one short sentence.".to_string()]);
    }

    #[test]
    fn test_cuts_at_sentence_boundary() {
        let text = "First sentence. Second sentence.";
        let chunks = chunk_text(text, 20, 0).unwrap();
        assert_eq!(chunks[0], "First sentence.");
        assert_eq!(chunks[1], "Second sentence.");
    }

    #[test]
    fn test_break_patterns_tried_in_priority_order() {
        // ". " appears earlier in the window than "! ", but it is the first
        // pattern tried, so the cut lands after the period.
        let text = "A. B! C is a much longer tail that overflows the window";
        let chunks = chunk_text(text, 20, 0).unwrap();
        assert_eq!(chunks[0], "A.");
    }

    #[test]
    fn test_no_boundary_cuts_at_window_edge() {
        let text = "x".repeat(1200);
        let chunks = chunk_text(&text, 500, 50).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 500);
        assert_eq!(chunks[1].chars().count(), 500);
        assert_eq!(chunks[2].chars().count(), 300);
    }

    #[test]
    fn test_1200_chars_with_sentences() {
        // 1200 characters of 40-char sentences, chunked 500/50: three chunks,
        // each within the window, the second overlapping the first's tail.
        let sentence = "The quick brown fox jumps over the dog"; // 38 chars + ". "
        let text = format!("{}. ", sentence).repeat(30);
        let text = text.trim_end().to_string();
        assert_eq!(text.chars().count(), 1199);

        let chunks = chunk_text(&text, 500, 50).unwrap();
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 500);
            assert!(!chunk.trim().is_empty());
        }
    }

    #[test]
    fn test_overlap_repeats_tail_content() {
        // Distinct cycling characters, no sentence breaks: cuts land at the raw
        // window edges 500 and 950, so chunk 2 must open with chunk 1's tail.
        let text: String = (0..1200u32)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect();
        let chunks = chunk_text(&text, 500, 50).unwrap();

        assert_eq!(chunks.len(), 3);
        let tail: String = chunks[0].chars().skip(450).collect();
        assert_eq!(tail.chars().count(), 50);
        assert!(chunks[1].starts_with(&tail));
    }

    #[test]
    fn test_zero_overlap_partitions_text() {
        let sentence = "Sentences of medium length fill this text nicely";
        let text = format!("{}. ", sentence).repeat(20);
        let chunks = chunk_text(&text, 120, 0).unwrap();

        assert!(chunks.len() > 1);
        let rejoined: String = strip_whitespace(&chunks.concat());
        assert_eq!(rejoined, strip_whitespace(&text));
    }

    #[test]
    fn test_no_empty_chunks() {
        let text = ". . . . . . . . . . . . . . . . . . . .";
        let chunks = chunk_text(text, 5, 1).unwrap();
        for chunk in &chunks {
            assert!(!chunk.is_empty());
            assert!(!chunk.trim().is_empty());
        }
    }

    #[test]
    fn test_large_overlap_terminates() {
        // Overlap nearly as large as the window; progress must still be made.
        let text = "abcdefghij";
        let chunks = chunk_text(text, 8, 7).unwrap();
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.chars().count() <= 8));
    }

    #[test]
    fn test_multibyte_text() {
        let text = "Ærlig talt, søvn er viktig. Søvn gjør deg skarpere. ".repeat(20);
        let chunks = chunk_text(&text, 100, 10).unwrap();
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn test_all_content_present_with_overlap() {
        let sentence = "Every sentence should survive chunking intact";
        let text = format!("{}. ", sentence).repeat(25);
        let chunks = chunk_text(&text, 200, 30).unwrap();

        // With overlap, every original character appears in at least one chunk.
        let joined = chunks.concat();
        assert!(joined.matches(sentence).count() >= 25);
    }
}
