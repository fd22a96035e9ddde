//! Dual-model ensemble: one headline, two independent classifiers, one mean
//! vector. Both models see the same text; their (label, confidence) outputs
//! are normalized onto the canonical axis before averaging so incompatible
//! vocabularies cannot skew the blend.

use anyhow::{Context, Result};

use crate::classify::DynClassifier;
use crate::sentiment::{output_to_vector, SentimentVector};

pub struct EnsembleScorer {
    model_a: DynClassifier,
    model_b: DynClassifier,
}

impl EnsembleScorer {
    pub fn new(model_a: DynClassifier, model_b: DynClassifier) -> Self {
        Self { model_a, model_b }
    }

    /// Score one headline. Classifier order is immaterial (the mean is
    /// commutative) but both calls must succeed; either failure fails the
    /// headline, and with it the ticker computation in progress.
    pub async fn score(&self, headline: &str) -> Result<SentimentVector> {
        let a = self
            .model_a
            .classify(headline)
            .await
            .with_context(|| format!("classifier {} failed", self.model_a.name()))?;
        let b = self
            .model_b
            .classify(headline)
            .await
            .with_context(|| format!("classifier {} failed", self.model_b.name()))?;

        let va = output_to_vector(&a);
        let vb = output_to_vector(&b);
        Ok(SentimentVector::new(
            (va.negative + vb.negative) / 2.0,
            (va.neutral + vb.neutral) / 2.0,
            (va.positive + vb.positive) / 2.0,
        ))
    }
}
