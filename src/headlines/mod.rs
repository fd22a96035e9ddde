// src/headlines/mod.rs
pub mod providers;

use anyhow::Result;
use async_trait::async_trait;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

/// Minimum length (after trimming) for a headline to count as evidence.
/// Shorter strings are noise: bare tickers, section titles, truncated feeds.
const MIN_HEADLINE_CHARS: usize = 10;

#[async_trait]
pub trait HeadlineProvider: Send + Sync {
    /// Fetch up to `limit` recent headlines for `query`, newest first.
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<String>>;
    fn name(&self) -> &'static str;
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "headline_provider_errors_total",
            "Provider fetch/parse errors recovered at the fallback point."
        );
        describe_counter!(
            "headline_fallback_total",
            "Fetches that fell through to the secondary provider."
        );
        describe_counter!(
            "headlines_kept_total",
            "Headlines admitted into scoring after normalization + length check."
        );
    });
}

/// Normalize a raw headline: HTML entity decode, whitespace collapse, trim.
pub fn normalize_headline(s: &str) -> String {
    let out = html_escape::decode_html_entities(s).to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Admission check: does this string carry enough text to classify?
pub fn qualifies(headline: &str) -> bool {
    headline.trim().chars().count() > MIN_HEADLINE_CHARS
}

/// Primary/secondary fetch with error containment.
///
/// Transport and parse failures are recovered here: logged, counted, and
/// treated as "no results." Callers always get a (possibly empty) list and
/// never an error.
pub struct HeadlineFetcher {
    primary: Box<dyn HeadlineProvider>,
    fallback: Box<dyn HeadlineProvider>,
}

impl HeadlineFetcher {
    pub fn new(primary: Box<dyn HeadlineProvider>, fallback: Box<dyn HeadlineProvider>) -> Self {
        Self { primary, fallback }
    }

    /// Fetch, normalize, and filter headlines for a ticker. Falls back to the
    /// secondary provider when the primary errors or comes back empty.
    pub async fn fetch_qualifying(&self, ticker: &str, limit: usize) -> Vec<String> {
        ensure_metrics_described();

        let mut raw = self.try_provider(self.primary.as_ref(), ticker, limit).await;
        if raw.is_empty() {
            counter!("headline_fallback_total").increment(1);
            raw = self.try_provider(self.fallback.as_ref(), ticker, limit).await;
        }

        let kept: Vec<String> = raw
            .into_iter()
            .map(|h| normalize_headline(&h))
            .filter(|h| qualifies(h))
            .take(limit)
            .collect();
        counter!("headlines_kept_total").increment(kept.len() as u64);
        kept
    }

    async fn try_provider(
        &self,
        provider: &dyn HeadlineProvider,
        ticker: &str,
        limit: usize,
    ) -> Vec<String> {
        match provider.fetch(ticker, limit).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = ?e, provider = provider.name(), ticker, "provider error");
                counter!("headline_provider_errors_total").increment(1);
                Vec::new()
            }
        }
    }
}
