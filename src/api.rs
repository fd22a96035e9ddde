use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::analyzer::{TickerAnalyzer, TickerScore};
use crate::classify::InferenceApiClassifier;
use crate::config::AnalyzerConfig;
use crate::ensemble::EnsembleScorer;
use crate::headlines::providers::{NewsApiProvider, YahooFinanceProvider};
use crate::headlines::HeadlineFetcher;

#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<TickerAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: Arc<TickerAnalyzer>) -> Self {
        Self { analyzer }
    }
}

/// Production wiring: NewsAPI primary, Yahoo Finance fallback, two hosted
/// inference classifiers from the configured model ids.
pub fn build_state(config: AnalyzerConfig) -> AppState {
    let fetcher = HeadlineFetcher::new(
        Box::new(NewsApiProvider::new(config.fetch_timeout())),
        Box::new(YahooFinanceProvider::new(config.fetch_timeout())),
    );
    let scorer = EnsembleScorer::new(
        Arc::new(InferenceApiClassifier::new(&config.model_a)),
        Arc::new(InferenceApiClassifier::new(&config.model_b)),
    );
    AppState::new(Arc::new(TickerAnalyzer::new(fetcher, scorer, config)))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "ticker sentiment API is running! Use POST /analyze"
    }))
}

#[derive(serde::Deserialize)]
struct AnalyzeReq {
    tickers: Vec<String>,
}

/// One entry per requested ticker. Tickers are independent: a failure on one
/// degrades that entry to "NO_DATA" and leaves the rest untouched.
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeReq>,
) -> Json<HashMap<String, TickerScore>> {
    let mut results = HashMap::with_capacity(req.tickers.len());
    for ticker in req.tickers {
        let score = state.analyzer.analyze_or_no_data(&ticker).await;
        results.insert(ticker, score);
    }
    Json(results)
}
