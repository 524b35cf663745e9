use crate::core::normalize::normalize_listing;
use crate::core::retry::{parse_retry_after, RetryPolicy};
use crate::domain::model::{ListingRequest, ListingResult, RawListing};
use crate::domain::ports::ExerciseSource;
use crate::utils::error::{Result, SpmError};
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;

pub const DEFAULT_EXERCISE_ENDPOINT: &str = "https://wger.de/api/v2/exerciseinfo/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// 只在日誌中列出前幾筆
const LOGGED_RECORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXERCISE_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// 對 wger 列表端點發出 GET，重試暫時性錯誤並正規化結果
///
/// 內部的 `reqwest::Client` 在多次呼叫間共用連線池。
pub struct ExerciseFetcher {
    client: Client,
    config: FetcherConfig,
}

impl ExerciseFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub async fn fetch(&self, request: &ListingRequest) -> Result<ListingResult> {
        tracing::debug!(
            "📡 Requesting {} (language={}, limit={})",
            self.config.base_url,
            request.language(),
            request.limit()
        );

        let raw = self
            .config
            .retry
            .execute(&Method::GET, move |attempt| self.get_listing(request, attempt))
            .await?;

        let listing = normalize_listing(raw, request.language());

        tracing::info!("✅ Received {} exercises from the API", listing.results.len());
        for record in listing.results.iter().take(LOGGED_RECORDS) {
            match record.id {
                Some(id) => tracing::info!("- {} (ID: {})", record.name, id),
                None => tracing::info!("- {} (ID: none)", record.name),
            }
        }

        Ok(listing)
    }

    async fn get_listing(&self, request: &ListingRequest, attempt: u32) -> Result<RawListing> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 Attempt {} answered with {}", attempt, status);

        if !status.is_success() {
            return Err(SpmError::StatusError {
                status: status.as_u16(),
                url: response.url().to_string(),
                retry_after: parse_retry_after(response.headers()),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ExerciseSource for ExerciseFetcher {
    async fn list_exercises(&self, request: &ListingRequest) -> Result<ListingResult> {
        self.fetch(request).await
    }
}
