// src/headlines/providers/newsapi.rs
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::headlines::HeadlineProvider;

const ENV_API_KEY: &str = "NEWSAPI_KEY";

#[derive(Debug, Deserialize)]
struct Everything {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
}

/// NewsAPI `everything` search, newest first. Without an API key this
/// provider reports no results instead of making a doomed request, which
/// sends the fetcher straight to the fallback.
pub struct NewsApiProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl NewsApiProvider {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(timeout, "https://newsapi.org/v2/everything")
    }

    pub fn with_base_url(timeout: Duration, base_url: &str) -> Self {
        let api_key = std::env::var(ENV_API_KEY).unwrap_or_default();
        let http = reqwest::Client::builder()
            .user_agent("ticker-sentiment-analyzer/0.1")
            .timeout(timeout)
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl HeadlineProvider for NewsApiProvider {
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        if self.api_key.is_empty() {
            return Ok(Vec::new());
        }

        let resp = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("language", "en"),
                ("pageSize", &limit.to_string()),
                ("sortBy", "publishedAt"),
                ("apiKey", &self.api_key),
            ])
            .send()
            .await
            .context("calling newsapi")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("newsapi returned {}", status));
        }

        let body: Everything = resp.json().await.context("decoding newsapi response")?;
        Ok(body
            .articles
            .into_iter()
            .filter_map(|a| a.title)
            .filter(|t| !t.is_empty())
            .take(limit)
            .collect())
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}
