//! # Aggregation & decay calibration
//! Pure, testable logic that maps per-headline sentiment vectors to one
//! calibrated scalar in [0,1]. No I/O; the constants come in via
//! [`AnalyzerConfig`].
//!
//! Policy: the aggregate is a renormalized mean over headline vectors, the
//! raw score reads `positive + 0.5 * neutral`, and a decay factor shrinks the
//! score toward 0.5 when evidence is sparse.

use crate::config::AnalyzerConfig;
use crate::sentiment::SentimentVector;

/// Combine per-headline vectors into one distribution.
///
/// Empty input resolves to strict neutrality. Otherwise: element-wise mean,
/// clamp each component to be non-negative, renormalize by the component sum.
/// The clamp happens before the renormalization so floating-point artifacts
/// can never leak a negative mass into the result, and an all-zero mean
/// resolves to (0, 1, 0) rather than a division by zero.
pub fn aggregate(vectors: &[SentimentVector]) -> SentimentVector {
    if vectors.is_empty() {
        return SentimentVector::NEUTRAL;
    }

    let n = vectors.len() as f64;
    let mut mean = SentimentVector::ZERO;
    for v in vectors {
        mean.negative += v.negative;
        mean.neutral += v.neutral;
        mean.positive += v.positive;
    }
    mean.negative = (mean.negative / n).max(0.0);
    mean.neutral = (mean.neutral / n).max(0.0);
    mean.positive = (mean.positive / n).max(0.0);

    let total = mean.sum();
    if total > 0.0 {
        SentimentVector::new(mean.negative / total, mean.neutral / total, mean.positive / total)
    } else {
        SentimentVector::NEUTRAL
    }
}

/// Scalar read of a distribution: positive mass plus half the neutral mass.
/// Neutral counts as non-negative evidence; negative mass carries weight 0.
pub fn raw_score(vec: &SentimentVector) -> f64 {
    (vec.positive + 0.5 * vec.neutral).clamp(0.0, 1.0)
}

/// Evidence-volume shrinkage factor in `[min_decay, max_decay]`.
/// More corroborating headlines let the score approach its raw extreme.
pub fn decay_factor(headline_count: usize, cfg: &AnalyzerConfig) -> f64 {
    let ratio = (headline_count as f64 / cfg.max_headlines as f64).min(1.0);
    cfg.min_decay + ratio * (cfg.max_decay - cfg.min_decay)
}

/// Calibrated score: shrink the raw score toward 0.5 by the decay factor,
/// rounded to two decimals.
pub fn calibrate(vec: &SentimentVector, headline_count: usize, cfg: &AnalyzerConfig) -> f64 {
    let raw = raw_score(vec);
    let adjusted = 0.5 + decay_factor(headline_count, cfg) * (raw - 0.5);
    round2(adjusted)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
