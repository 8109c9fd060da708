//! Lexicon-based polarity scoring and three-way sentiment labels.
//!
//! Polarity follows the pattern-style averaging used by common English
//! sentiment lexicons: every known word contributes its weight, an
//! intensifier directly before it scales the weight, and a negator before
//! that flips and halves it. The text's polarity is the mean of all
//! contributions, clamped to `[-1.0, 1.0]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Polarity above this is positive.
pub const POSITIVE_THRESHOLD: f32 = 0.2;
/// Polarity below this is negative.
pub const NEGATIVE_THRESHOLD: f32 = -0.2;

/// Word polarities. Keys are lowercase single words.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("positive", 0.2),
    ("happy", 0.8),
    ("success", 0.3),
    ("successful", 0.75),
    ("win", 0.8),
    ("wins", 0.8),
    ("won", 0.8),
    ("victory", 0.7),
    ("record", 0.2),
    ("growth", 0.3),
    ("gain", 0.4),
    ("gains", 0.4),
    ("rise", 0.2),
    ("boost", 0.4),
    ("strong", 0.4),
    ("safe", 0.5),
    ("peace", 0.5),
    ("hope", 0.4),
    ("celebrate", 0.6),
    ("celebrates", 0.6),
    ("praise", 0.6),
    ("praised", 0.6),
    ("historic", 0.4),
    ("innovative", 0.5),
    ("improve", 0.4),
    ("improved", 0.4),
    ("benefit", 0.4),
    ("relief", 0.4),
    ("love", 0.5),
    ("beautiful", 0.85),
    ("wonderful", 1.0),
    ("amazing", 0.6),
    ("brilliant", 0.9),
    ("support", 0.2),
    ("welcome", 0.8),
    ("easy", 0.43),
    ("fair", 0.7),
    ("interesting", 0.5),
    ("important", 0.4),
    // Negative
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("negative", -0.3),
    ("sad", -0.5),
    ("terrible", -1.0),
    ("horrible", -1.0),
    ("awful", -1.0),
    ("poor", -0.4),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failure", -0.5),
    ("loss", -0.4),
    ("losses", -0.4),
    ("lost", -0.4),
    ("fall", -0.2),
    ("crash", -0.6),
    ("crisis", -0.6),
    ("attack", -0.6),
    ("attacks", -0.6),
    ("killed", -0.8),
    ("dead", -0.6),
    ("death", -0.6),
    ("deaths", -0.6),
    ("violence", -0.7),
    ("war", -0.6),
    ("fear", -0.5),
    ("fears", -0.5),
    ("angry", -0.5),
    ("protest", -0.3),
    ("arrested", -0.4),
    ("fraud", -0.7),
    ("scam", -0.7),
    ("corruption", -0.7),
    ("disaster", -0.8),
    ("flood", -0.4),
    ("floods", -0.4),
    ("injured", -0.5),
    ("accident", -0.5),
    ("dangerous", -0.6),
    ("threat", -0.5),
    ("weak", -0.4),
    ("decline", -0.3),
    ("slump", -0.5),
    ("hard", -0.3),
    ("difficult", -0.5),
    ("wrong", -0.5),
];

/// Multipliers applied to the next lexicon word.
const INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("most", 1.3),
    ("so", 1.3),
    ("too", 1.2),
    ("slightly", 0.7),
    ("somewhat", 0.7),
];

const NEGATORS: &[&str] = &["not", "no", "never", "nor", "without", "hardly"];

/// Coarse three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Map a polarity score to a label.
    pub fn from_polarity(polarity: f32) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Sentiment::Positive => "😊",
            Sentiment::Negative => "😠",
            Sentiment::Neutral => "😐",
        }
    }

    /// Display label, e.g. `"😊 Positive"`.
    pub fn label(self) -> String {
        format!("{} {self}", self.emoji())
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        };
        f.write_str(name)
    }
}

fn lookup<T: Copy>(table: &[(&str, T)], word: &str) -> Option<T> {
    table.iter().find(|(w, _)| *w == word).map(|&(_, v)| v)
}

fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}

/// Polarity of `text` in `[-1.0, 1.0]`. `0.0` when no lexicon word occurs.
#[must_use]
pub fn polarity(text: &str) -> f32 {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    let mut total = 0.0_f32;
    let mut matched = 0usize;
    for (i, word) in words.iter().enumerate() {
        let Some(mut weight) = lookup(LEXICON, word) else {
            continue;
        };
        let mut j = i;
        if j > 0 {
            if let Some(factor) = lookup(INTENSIFIERS, &words[j - 1]) {
                weight = (weight * factor).clamp(-1.0, 1.0);
                j -= 1;
            }
        }
        if j > 0 && is_negator(&words[j - 1]) {
            weight *= -0.5;
        }
        total += weight;
        matched += 1;
    }

    if matched == 0 {
        return 0.0;
    }
    (total / matched as f32).clamp(-1.0, 1.0)
}

/// Label `text` as positive, negative or neutral.
#[must_use]
pub fn classify_sentiment(text: &str) -> Sentiment {
    Sentiment::from_polarity(polarity(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_map_to_labels() {
        assert_eq!(Sentiment::from_polarity(0.5), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(-0.5), Sentiment::Negative);
        assert_eq!(Sentiment::from_polarity(0.0), Sentiment::Neutral);
    }

    #[test]
    fn threshold_boundaries_are_neutral() {
        assert_eq!(Sentiment::from_polarity(0.2), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(-0.2), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(0.21), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(-0.21), Sentiment::Negative);
    }

    #[test]
    fn empty_and_unknown_text_is_zero() {
        assert_eq!(polarity(""), 0.0);
        assert_eq!(polarity("   "), 0.0);
        assert_eq!(polarity("the committee met on tuesday"), 0.0);
    }

    #[test]
    fn positive_text_scores_positive() {
        assert_eq!(
            classify_sentiment("India wins a historic victory in the final!"),
            Sentiment::Positive
        );
    }

    #[test]
    fn negative_text_scores_negative() {
        assert_eq!(
            classify_sentiment("Floods leave dozens dead as the crisis deepens."),
            Sentiment::Negative
        );
    }

    #[test]
    fn score_is_mean_of_matched_words() {
        // good (0.7) + bad (-0.7) averages to zero.
        assert!(polarity("good and bad").abs() < f32::EPSILON);
    }

    #[test]
    fn negation_flips_and_halves() {
        let p = polarity("not good");
        assert!((p - (-0.35)).abs() < 1e-6, "got {p}");
        let p = polarity("the plan isn't bad");
        assert!((p - 0.35).abs() < 1e-6, "got {p}");
    }

    #[test]
    fn intensifier_scales_weight() {
        let plain = polarity("good");
        let strong = polarity("very good");
        assert!(strong > plain);
        assert!(strong <= 1.0);
    }

    #[test]
    fn result_stays_in_range() {
        let p = polarity("extremely excellent wonderful best");
        assert!((-1.0..=1.0).contains(&p));
        let p = polarity("extremely terrible awful worst");
        assert!((-1.0..=1.0).contains(&p));
    }

    #[test]
    fn labels_include_emoji() {
        assert_eq!(Sentiment::Positive.label(), "😊 Positive");
        assert_eq!(Sentiment::Negative.label(), "😠 Negative");
        assert_eq!(Sentiment::Neutral.label(), "😐 Neutral");
    }
}
