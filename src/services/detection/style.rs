// Writing Style Analysis
// Composite of starter diversity, punctuation variety, paragraph uniformity and word sophistication.

use crate::models::NEUTRAL_SCORE;
use crate::services::text_processor::{
    split_paragraphs, tokenize_sentences, tokenize_words, whitespace_word_count,
};
use std::collections::HashSet;
use tracing::debug;

use super::statistical::coefficient_of_variation;
use super::tables::{PUNCTUATION_SET, SOPHISTICATION_STEPS};

const MIN_SENTENCES_FOR_STYLE: usize = 3;
const MIN_WORDS_FOR_SOPHISTICATION: usize = 20;
const LONG_WORD_CHARS: usize = 7;

const STARTER_WEIGHT: f64 = 25.0;
const PUNCTUATION_WEIGHT: f64 = 0.20;
const PARAGRAPH_WEIGHT: f64 = 0.30;
const SOPHISTICATION_WEIGHT: f64 = 0.25;

/// Style score in [0, 100]; neutral for fewer than three sentences
pub fn analyze_writing_style(text: &str) -> f64 {
    let sentences = tokenize_sentences(text);
    if sentences.len() < MIN_SENTENCES_FOR_STYLE {
        return NEUTRAL_SCORE;
    }

    let diversity = starter_diversity(&sentences);
    let punctuation = punctuation_variety_score(text);
    let paragraph = paragraph_uniformity_score(text);
    let sophistication = word_sophistication_score(text);

    debug!(
        starters = diversity,
        punct = punctuation,
        para = paragraph,
        soph = sophistication,
        "[STYLE] components"
    );

    let score = (1.0 - diversity) * STARTER_WEIGHT
        + punctuation * PUNCTUATION_WEIGHT
        + paragraph * PARAGRAPH_WEIGHT
        + sophistication * SOPHISTICATION_WEIGHT;

    score.clamp(0.0, 100.0)
}

/// Unique first words over sentences
pub fn starter_diversity(sentences: &[String]) -> f64 {
    let starters: Vec<String> = sentences
        .iter()
        .filter_map(|s| s.split_whitespace().next())
        .map(str::to_lowercase)
        .collect();

    if starters.is_empty() {
        return 0.5;
    }

    let unique: HashSet<&String> = starters.iter().collect();
    unique.len() as f64 / starters.len() as f64
}

/// Limited punctuation variety scores higher
pub fn punctuation_variety_score(text: &str) -> f64 {
    let used = PUNCTUATION_SET.iter().filter(|p| text.contains(**p)).count();
    let ratio = used as f64 / PUNCTUATION_SET.len() as f64;
    ((0.7 - ratio) * 100.0).max(0.0)
}

/// Uniform paragraph lengths score higher
pub fn paragraph_uniformity_score(text: &str) -> f64 {
    let paragraphs = split_paragraphs(text);
    if paragraphs.len() < 2 {
        return NEUTRAL_SCORE;
    }

    let lengths: Vec<f64> = paragraphs
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| whitespace_word_count(p) as f64)
        .collect();

    match coefficient_of_variation(&lengths) {
        Some(cv) => ((0.5 - cv) * 200.0).clamp(0.0, 100.0),
        None => NEUTRAL_SCORE,
    }
}

pub fn word_sophistication_score(text: &str) -> f64 {
    let words = tokenize_words(text);
    if words.len() < MIN_WORDS_FOR_SOPHISTICATION {
        return NEUTRAL_SCORE;
    }

    let long_words = words
        .iter()
        .filter(|w| w.chars().count() >= LONG_WORD_CHARS)
        .count();
    let ratio = long_words as f64 / words.len() as f64;

    SOPHISTICATION_STEPS.above(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_sentences_is_neutral() {
        assert_eq!(analyze_writing_style("One sentence. Two sentences."), NEUTRAL_SCORE);
    }

    #[test]
    fn test_starter_diversity() {
        let sentences: Vec<String> = ["The cat sat", "the dog ran", "A bird flew", "Then rain"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!((starter_diversity(&sentences) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_punctuation_variety() {
        // only '.' present → (0.7 - 1/11) * 100
        let expected = (0.7 - 1.0 / 11.0) * 100.0;
        assert!((punctuation_variety_score("plain text.") - expected).abs() < 1e-9);
        // eight or more symbols → floor at zero
        assert_eq!(punctuation_variety_score(r#"a. b, c! d? e; f: g- (h) "i""#), 0.0);
    }

    #[test]
    fn test_paragraph_uniformity() {
        assert_eq!(paragraph_uniformity_score("single paragraph only"), NEUTRAL_SCORE);
        assert_eq!(paragraph_uniformity_score("one two\n\nthree four"), 100.0);
        // lengths 1 and 9: cv = 4 / 5 = 0.8 → clamped to 0
        assert_eq!(
            paragraph_uniformity_score("one\n\na b c d e f g h i"),
            0.0
        );
    }

    #[test]
    fn test_word_sophistication() {
        assert_eq!(word_sophistication_score("too short"), NEUTRAL_SCORE);
        let plain = "the cat sat on the mat and the dog ran to the log by the big red box in the sun";
        assert_eq!(word_sophistication_score(plain), 25.0);
        let fancy = "sophisticated considerable methodology characteristic ".repeat(5);
        assert_eq!(word_sophistication_score(&fancy), 85.0);
    }

    #[test]
    fn test_repetitive_style_scores_higher_than_varied() {
        let repetitive = "Furthermore, the results indicate significant findings. ".repeat(6);
        let varied = "I went out. Rain came down hard; we ran! Did anyone bring a coat? \
                      \"No,\" said Sam (laughing).\n\nLater - much later - we dried off.";
        assert!(analyze_writing_style(&repetitive) > analyze_writing_style(varied));
    }

    #[test]
    fn test_style_score_bounds() {
        let text = "Short one. Another one. A third one here.";
        let score = analyze_writing_style(text);
        assert!((0.0..=100.0).contains(&score));
    }
}
