//! # Sentiment axis
//! Canonical 3-way sentiment space and label normalization across model
//! vocabularies. Pure functions only; the async pipeline lives elsewhere.

use serde::{Deserialize, Serialize};

/// The fixed categorical axis every classifier output is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

/// Ordered (negative, neutral, positive) confidence triple.
///
/// Components are non-negative reals; the triple is not required to sum to 1
/// until it has gone through [`crate::scoring::aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentVector {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl SentimentVector {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Strict neutrality; the fallback distribution for degenerate input.
    pub const NEUTRAL: Self = Self::new(0.0, 1.0, 0.0);

    pub const fn new(negative: f64, neutral: f64, positive: f64) -> Self {
        Self {
            negative,
            neutral,
            positive,
        }
    }

    /// Confidence placed in exactly one slot, zeros elsewhere.
    pub fn single(slot: Sentiment, confidence: f64) -> Self {
        let c = confidence.clamp(0.0, 1.0);
        match slot {
            Sentiment::Negative => Self::new(c, 0.0, 0.0),
            Sentiment::Neutral => Self::new(0.0, c, 0.0),
            Sentiment::Positive => Self::new(0.0, 0.0, c),
        }
    }

    pub fn sum(&self) -> f64 {
        self.negative + self.neutral + self.positive
    }
}

/// Raw (label, confidence) pair from a black-box classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub label: String,
    #[serde(alias = "score")]
    pub confidence: f64,
}

/// Map a model label onto the canonical axis.
///
/// Recognizes the human-readable vocabulary ("negative"/"neutral"/"positive",
/// any casing) and the positional `LABEL_0/1/2` convention (index order
/// negative/neutral/positive). Anything else lands on Neutral: an unexpected
/// vocabulary must not corrupt the negative/positive axes.
pub fn normalize_label(label: &str) -> Sentiment {
    match label.trim().to_ascii_lowercase().as_str() {
        "negative" | "label_0" => Sentiment::Negative,
        "neutral" | "label_1" => Sentiment::Neutral,
        "positive" | "label_2" => Sentiment::Positive,
        _ => Sentiment::Neutral,
    }
}

/// Normalize a classifier output into a one-hot-scaled vector.
/// Confidence is clamped into [0,1] before any arithmetic.
pub fn output_to_vector(out: &ClassifierOutput) -> SentimentVector {
    SentimentVector::single(normalize_label(&out.label), out.confidence)
}
