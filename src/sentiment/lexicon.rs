use crate::models::chat::SentimentLabel;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use super::SentimentResult;

pub const MATCH_INCREMENT: f32 = 0.25;
pub const LABEL_THRESHOLD: f32 = 0.2;
const CONFIDENCE_SATURATION: f32 = 5.0;

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "excelente",
        "bueno",
        "buena",
        "genial",
        "perfecto",
        "perfecta",
        "gracias",
        "increíble",
        "increible",
        "fantástico",
        "fantastico",
        "encanta",
        "maravilloso",
        "feliz",
        "útil",
        "util",
        "satisfecho",
        "recomiendo",
        "good",
        "great",
        "excellent",
        "amazing",
        "awesome",
        "love",
        "thanks",
        "perfect",
        "happy",
        "helpful",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "malo",
        "mala",
        "terrible",
        "horrible",
        "pésimo",
        "pesimo",
        "problema",
        "error",
        "odio",
        "lento",
        "caro",
        "decepcionado",
        "frustrado",
        "molesto",
        "fallo",
        "bad",
        "awful",
        "hate",
        "problem",
        "worst",
        "slow",
        "broken",
        "angry",
        "disappointed",
    ]
    .into_iter()
    .collect()
});

/// Keyword sentiment over whole tokens. Each positive token adds
/// `MATCH_INCREMENT`, each negative one subtracts it; the sum is clamped to
/// [-1, 1]. Confidence grows with the number of matched tokens.
pub fn score(text: &str) -> SentimentResult {
    let folded = text.to_lowercase();
    let mut net = 0.0f32;
    let mut matched = 0usize;

    for token in folded.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
        if POSITIVE_WORDS.contains(token) {
            net += MATCH_INCREMENT;
            matched += 1;
        } else if NEGATIVE_WORDS.contains(token) {
            net -= MATCH_INCREMENT;
            matched += 1;
        }
    }

    let net = net.clamp(-1.0, 1.0);
    let label = if net > LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if net < -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    SentimentResult {
        label,
        score: net.abs(),
        confidence: ((matched as f32) / CONFIDENCE_SATURATION).min(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_positive_word_is_positive() {
        let result = score("excelente excelente excelente");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.score > 0.0);
        assert!((result.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn no_lexicon_words_is_neutral_zero() {
        let result = score("Quiero saber el horario de atención");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn empty_text_is_neutral_zero() {
        let result = score("");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn negative_words_are_case_folded() {
        let result = score("Servicio PÉSIMO, todo fue un PROBLEMA");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!((result.score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mixed_text_cancels_out() {
        let result = score("bueno pero lento");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
        assert!((result.confidence - 0.4).abs() < 1e-6);
    }

    #[test]
    fn net_is_clamped_and_confidence_saturates() {
        let result = score("genial genial genial genial genial genial genial");
        assert_eq!(result.score, 1.0);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn inflected_forms_do_not_match_partial_tokens() {
        let result = score("tengo errores");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.0);
    }
}
