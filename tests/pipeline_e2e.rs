//! End-to-end pipeline tests with scripted providers and classifiers.
//!
//! Covered:
//! - the worked scoring example (5 headlines, aggregate (0.1,0.2,0.7) -> 0.73)
//! - all-neutral headlines pin the score at 0.5 regardless of decay
//! - fewer than 2 qualifying headlines -> NO_DATA (and cached as such)
//! - classifier failure degrades to NO_DATA without panicking the batch

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use ticker_sentiment_analyzer::classify::SentimentClassifier;
use ticker_sentiment_analyzer::ensemble::EnsembleScorer;
use ticker_sentiment_analyzer::headlines::{HeadlineFetcher, HeadlineProvider};
use ticker_sentiment_analyzer::sentiment::ClassifierOutput;
use ticker_sentiment_analyzer::{AnalyzerConfig, TickerAnalyzer, TickerScore};

// --- Scripted collaborators -------------------------------------------------

struct ScriptedProvider {
    titles: Vec<String>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    fn new(titles: &[&str]) -> Self {
        Self {
            titles: titles.iter().map(|s| s.to_string()).collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl HeadlineProvider for ScriptedProvider {
    async fn fetch(&self, _query: &str, limit: usize) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.titles.iter().take(limit).cloned().collect())
    }
    fn name(&self) -> &'static str {
        "scripted"
    }
}

struct EmptyProvider;

#[async_trait]
impl HeadlineProvider for EmptyProvider {
    async fn fetch(&self, _query: &str, _limit: usize) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
    fn name(&self) -> &'static str {
        "empty"
    }
}

/// Deterministic classifier: per-headline (label, confidence) lookup with a
/// neutral zero-confidence default for unscripted text.
struct ScriptedClassifier {
    script: HashMap<String, (&'static str, f64)>,
}

impl ScriptedClassifier {
    fn new(entries: &[(&str, &'static str, f64)]) -> Self {
        let script = entries
            .iter()
            .map(|(text, label, conf)| (text.to_string(), (*label, *conf)))
            .collect();
        Self { script }
    }
}

#[async_trait]
impl SentimentClassifier for ScriptedClassifier {
    async fn classify(&self, text: &str) -> Result<ClassifierOutput> {
        let (label, confidence) = self.script.get(text).copied().unwrap_or(("neutral", 0.0));
        Ok(ClassifierOutput {
            label: label.to_string(),
            confidence,
        })
    }
    fn name(&self) -> &str {
        "scripted"
    }
}

struct FailingClassifier;

#[async_trait]
impl SentimentClassifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassifierOutput> {
        Err(anyhow!("inference backend down"))
    }
    fn name(&self) -> &str {
        "failing"
    }
}

fn analyzer_with(
    provider: ScriptedProvider,
    model_a: Arc<dyn SentimentClassifier>,
    model_b: Arc<dyn SentimentClassifier>,
) -> TickerAnalyzer {
    let fetcher = HeadlineFetcher::new(Box::new(provider), Box::new(EmptyProvider));
    let scorer = EnsembleScorer::new(model_a, model_b);
    TickerAnalyzer::new(fetcher, scorer, AnalyzerConfig::default())
}

// --- Tests ------------------------------------------------------------------

#[tokio::test]
async fn worked_example_scores_073() {
    // Five qualifying headlines whose ensemble vectors total (0.2, 0.4, 1.4):
    //   h1: A negative@0.4 + B neutral@0.8  -> (0.2, 0.4, 0.0)
    //   h2: both positive@1.0               -> (0.0, 0.0, 1.0)
    //   h3: both positive@0.4               -> (0.0, 0.0, 0.4)
    //   h4, h5: zero-confidence             -> (0.0, 0.0, 0.0)
    // Aggregate normalizes to (0.1, 0.2, 0.7); raw 0.8; 5/10 headlines give
    // decay 0.775; adjusted 0.7325 rounds to 0.73.
    let headlines = [
        "Regulator opens inquiry into accounting",
        "Record revenue smashes all expectations",
        "Product launch lands modestly ahead of plan",
        "Quarterly filing published this morning",
        "Annual shareholder meeting date confirmed",
    ];

    let model_a = ScriptedClassifier::new(&[
        (headlines[0], "negative", 0.4),
        (headlines[1], "positive", 1.0),
        (headlines[2], "positive", 0.4),
        (headlines[3], "neutral", 0.0),
        (headlines[4], "neutral", 0.0),
    ]);
    let model_b = ScriptedClassifier::new(&[
        (headlines[0], "LABEL_1", 0.8),
        (headlines[1], "LABEL_2", 1.0),
        (headlines[2], "LABEL_2", 0.4),
        (headlines[3], "LABEL_1", 0.0),
        (headlines[4], "LABEL_1", 0.0),
    ]);

    let analyzer = analyzer_with(
        ScriptedProvider::new(&headlines),
        Arc::new(model_a),
        Arc::new(model_b),
    );

    let score = analyzer.analyze("XYZ").await.unwrap();
    assert_eq!(score, TickerScore::Score(0.73));
}

#[tokio::test]
async fn all_neutral_headlines_score_exactly_half() {
    let headlines = [
        "Company schedules routine earnings call",
        "Board meeting minutes released on time",
        "Ticker added to watchlist publication",
    ];
    let script: Vec<(&str, &'static str, f64)> =
        headlines.iter().map(|h| (*h, "neutral", 1.0)).collect();

    let analyzer = analyzer_with(
        ScriptedProvider::new(&headlines),
        Arc::new(ScriptedClassifier::new(&script)),
        Arc::new(ScriptedClassifier::new(&script)),
    );

    let score = analyzer.analyze("FLAT").await.unwrap();
    assert_eq!(score, TickerScore::Score(0.5));
}

#[tokio::test]
async fn below_minimum_headlines_yields_no_data() {
    let analyzer = analyzer_with(
        ScriptedProvider::new(&["Only one qualifying headline here"]),
        Arc::new(ScriptedClassifier::new(&[])),
        Arc::new(ScriptedClassifier::new(&[])),
    );
    assert_eq!(analyzer.analyze("THIN").await.unwrap(), TickerScore::NoData);

    let analyzer = analyzer_with(
        ScriptedProvider::new(&[]),
        Arc::new(ScriptedClassifier::new(&[])),
        Arc::new(ScriptedClassifier::new(&[])),
    );
    assert_eq!(analyzer.analyze("NONE").await.unwrap(), TickerScore::NoData);
}

#[tokio::test]
async fn no_data_outcome_is_cached_for_the_window() {
    let provider = ScriptedProvider::new(&["Too short"]);
    let calls = provider.calls.clone();

    let analyzer = analyzer_with(
        provider,
        Arc::new(ScriptedClassifier::new(&[])),
        Arc::new(ScriptedClassifier::new(&[])),
    );

    for _ in 0..3 {
        assert_eq!(analyzer.analyze("QUIET").await.unwrap(), TickerScore::NoData);
    }
    // Repeated requests are served from the cache; the provider must have
    // been hit exactly once.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn classifier_failure_degrades_to_no_data_without_caching() {
    let analyzer = analyzer_with(
        ScriptedProvider::new(&[
            "Shares rally on unexpected guidance raise",
            "Analysts lift their price targets broadly",
        ]),
        Arc::new(FailingClassifier),
        Arc::new(ScriptedClassifier::new(&[])),
    );

    assert!(analyzer.analyze("ERR").await.is_err());
    assert_eq!(analyzer.analyze_or_no_data("ERR").await, TickerScore::NoData);
}
