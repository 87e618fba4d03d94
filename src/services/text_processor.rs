// Text Processing Service
// Tokenization shared by the feature extractors, the neural scorer and the converter

use regex::Regex;
use std::sync::OnceLock;

/// Maximum characters per perplexity chunk
pub const DEFAULT_CHUNK_CHARS: usize = 256;

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+").expect("word regex"))
}

fn sentence_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence regex"))
}

/// Lowercased word tokens (maximal runs of word characters)
pub fn tokenize_words(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    let lowered = text.to_lowercase();
    word_re()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Sentences split on runs of terminal punctuation, trimmed, empties dropped
pub fn tokenize_sentences(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    sentence_split_re()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Paragraphs separated by a blank line. Parts are returned untrimmed, including
/// blank ones, so callers can decide how to treat empty paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n").collect()
}

/// Number of whitespace-separated tokens
pub fn whitespace_word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Greedily pack whitespace words into chunks no longer than `max_chars`
/// (measured on the space-joined chunk). A word that alone exceeds the limit
/// becomes its own chunk.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let joined_len = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };

        if joined_len > max_chars && !current.is_empty() {
            chunks.push(current.join(" "));
            current = vec![word];
            current_len = word_len;
        } else {
            current.push(word);
            current_len = joined_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    if chunks.is_empty() {
        chunks.push(text.to_string());
    }

    chunks
}

/// Collapse whitespace runs to single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_words_lowercases() {
        let words = tokenize_words("Hello, World! It's 2024.");
        assert_eq!(words, vec!["hello", "world", "it", "s", "2024"]);
    }

    #[test]
    fn test_tokenize_words_empty() {
        assert!(tokenize_words("").is_empty());
        assert!(tokenize_words("   \n\t ").is_empty());
    }

    #[test]
    fn test_tokenize_sentences() {
        let sentences = tokenize_sentences("First one. Second one!! Third?  ...");
        assert_eq!(sentences, vec!["First one", "Second one", "Third"]);
    }

    #[test]
    fn test_tokenize_sentences_without_terminal_punctuation() {
        let sentences = tokenize_sentences("no punctuation at all");
        assert_eq!(sentences.len(), 1);
        assert!(tokenize_sentences("  ").is_empty());
    }

    #[test]
    fn test_split_paragraphs_keeps_blank_parts() {
        let paras = split_paragraphs("one\n\ntwo\n\n\n\nthree");
        assert_eq!(paras.len(), 4);
        assert!(paras[2].trim().is_empty());
    }

    #[test]
    fn test_split_into_chunks_respects_limit() {
        let text = "alpha beta gamma delta epsilon";
        let chunks = split_into_chunks(text, 11);
        assert_eq!(chunks, vec!["alpha beta", "gamma delta", "epsilon"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 11));
    }

    #[test]
    fn test_split_into_chunks_long_word_is_own_chunk() {
        let chunks = split_into_chunks("a supercalifragilistic b", 5);
        assert_eq!(chunks, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_split_into_chunks_empty_input() {
        assert_eq!(split_into_chunks("", DEFAULT_CHUNK_CHARS), vec![""]);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\n b\tc  "), "a b c");
    }
}
