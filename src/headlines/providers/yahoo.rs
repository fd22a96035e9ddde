// src/headlines/providers/yahoo.rs
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::headlines::HeadlineProvider;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    title: Option<String>,
}

/// Yahoo Finance news search. Keyless; used as the fallback source when the
/// primary yields nothing.
pub struct YahooFinanceProvider {
    http: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(timeout, "https://query1.finance.yahoo.com/v1/finance/search")
    }

    pub fn with_base_url(timeout: Duration, base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("ticker-sentiment-analyzer/0.1")
            .timeout(timeout)
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl HeadlineProvider for YahooFinanceProvider {
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("newsCount", &limit.to_string()),
                ("quotesCount", "0"),
            ])
            .send()
            .await
            .context("calling yahoo finance search")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("yahoo finance returned {}", status));
        }

        let body: SearchResponse = resp
            .json()
            .await
            .context("decoding yahoo finance response")?;
        Ok(body
            .news
            .into_iter()
            .filter_map(|n| n.title)
            .filter(|t| !t.is_empty())
            .take(limit)
            .collect())
    }

    fn name(&self) -> &'static str {
        "yahoo-finance"
    }
}
