//! # Ticker analyzer
//! The read-through pipeline: headlines → per-headline ensemble vectors →
//! aggregate → decay calibration → cached score. One computation per ticker
//! per cache window; everything upstream of the cache is stateless.

use serde::{Serialize, Serializer};

use crate::cache::TtlCache;
use crate::config::AnalyzerConfig;
use crate::ensemble::EnsembleScorer;
use crate::headlines::HeadlineFetcher;
use crate::scoring::{aggregate, calibrate};

/// Sentinel emitted when a ticker has too little news to score.
pub const NO_DATA: &str = "NO_DATA";

/// Final per-ticker outcome. Immutable once produced; cached for the TTL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickerScore {
    /// Calibrated sentiment in [0,1], rounded to two decimals.
    Score(f64),
    /// Fewer than the minimum qualifying headlines. A first-class outcome,
    /// not an error, and cached like any numeric score.
    NoData,
}

impl Serialize for TickerScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Score(v) => serializer.serialize_f64(*v),
            Self::NoData => serializer.serialize_str(NO_DATA),
        }
    }
}

pub struct TickerAnalyzer {
    fetcher: HeadlineFetcher,
    scorer: EnsembleScorer,
    cache: TtlCache<TickerScore>,
    config: AnalyzerConfig,
}

impl TickerAnalyzer {
    pub fn new(fetcher: HeadlineFetcher, scorer: EnsembleScorer, config: AnalyzerConfig) -> Self {
        let cache = TtlCache::new(config.cache_ttl(), config.cache_capacity);
        Self {
            fetcher,
            scorer,
            cache,
            config,
        }
    }

    /// Score one ticker, read-through on the cache. The raw ticker string is
    /// the cache key and the upstream query; casing is preserved.
    ///
    /// Errors (a classifier failing mid-computation) are surfaced and not
    /// cached; provider trouble never reaches here (the fetcher degrades to
    /// an empty list).
    pub async fn analyze(&self, ticker: &str) -> anyhow::Result<TickerScore> {
        self.cache
            .get_or_compute(ticker, || self.compute(ticker))
            .await
    }

    /// Batch-handler convenience: degrade a failed computation to `NoData`
    /// (logged, uncached) so one bad ticker never sinks the response.
    pub async fn analyze_or_no_data(&self, ticker: &str) -> TickerScore {
        match self.analyze(ticker).await {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!(error = ?e, ticker, "ticker computation failed; reporting NO_DATA");
                TickerScore::NoData
            }
        }
    }

    async fn compute(&self, ticker: &str) -> anyhow::Result<TickerScore> {
        let headlines = self
            .fetcher
            .fetch_qualifying(ticker, self.config.max_headlines)
            .await;

        if headlines.len() < self.config.min_headlines {
            tracing::debug!(ticker, count = headlines.len(), "insufficient headlines");
            return Ok(TickerScore::NoData);
        }

        let mut vectors = Vec::with_capacity(headlines.len());
        for h in &headlines {
            vectors.push(self.scorer.score(h).await?);
        }

        let agg = aggregate(&vectors);
        let score = calibrate(&agg, headlines.len(), &self.config);
        tracing::debug!(ticker, score, headlines = headlines.len(), "ticker scored");
        Ok(TickerScore::Score(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_serializes_as_number() {
        let json = serde_json::to_string(&TickerScore::Score(0.73)).unwrap();
        assert_eq!(json, "0.73");
    }

    #[test]
    fn no_data_serializes_as_sentinel_string() {
        let json = serde_json::to_string(&TickerScore::NoData).unwrap();
        assert_eq!(json, "\"NO_DATA\"");
    }
}
