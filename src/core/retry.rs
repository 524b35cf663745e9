use crate::utils::error::{Result, SpmError};
use reqwest::Method;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 3] = [502, 503, 504];

/// 有上限的指數退避重試策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: Duration,
    max_backoff: Duration,
    retryable_status_codes: Vec<u16>,
    methods: Vec<Method>,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_base: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
            max_backoff,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.to_vec(),
            methods: vec![Method::GET],
        }
    }

    /// 不等待的策略，測試用
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    pub fn with_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.retryable_status_codes = codes.into_iter().collect();
        self
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    pub fn retryable_status_codes(&self) -> &[u16] {
        &self.retryable_status_codes
    }

    /// 第 `retry` 次重試前的等待時間（從 1 起算）
    ///
    /// 第一次重試立即進行，之後為 `backoff_base * 2^(retry-2)`；伺服器的
    /// `Retry-After` 較長時以它為準，兩者都不超過 `max_backoff`。
    pub fn delay_for_retry(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        let calculated = if retry <= 1 {
            Duration::ZERO
        } else {
            let shift = (retry - 2).min(20);
            self.backoff_base.saturating_mul(1_u32 << shift)
        };
        calculated
            .max(retry_after.unwrap_or(Duration::ZERO))
            .min(self.max_backoff)
    }

    pub fn should_retry(&self, method: &Method, status: u16) -> bool {
        self.methods.contains(method) && self.retryable_status_codes.contains(&status)
    }

    /// 執行 `operation` 直到成功、遇到不可重試的錯誤或用完次數
    ///
    /// 只有 [`SpmError::StatusError`] 會觸發重試，連線錯誤與逾時直接回傳。
    pub async fn execute<T, F, Fut>(&self, method: &Method, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            let err = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let Some((status, retry_after, url)) = status_details(&err) else {
                return Err(err);
            };
            if !self.should_retry(method, status) {
                return Err(err);
            }
            if attempt >= self.max_attempts {
                tracing::error!(
                    "🛑 Giving up on {} after {} attempts (last status {})",
                    url,
                    attempt,
                    status
                );
                return Err(SpmError::RetriesExhausted {
                    attempts: attempt,
                    status,
                    url,
                });
            }

            let delay = self.delay_for_retry(attempt, retry_after);
            tracing::warn!(
                "🔁 {} returned {}, retry {}/{} in {:?}",
                url,
                status,
                attempt,
                self.max_attempts - 1,
                delay
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_secs(1),
            Duration::from_secs(120),
        )
    }
}

fn status_details(err: &SpmError) -> Option<(u16, Option<Duration>, String)> {
    match err {
        SpmError::StatusError {
            status,
            url,
            retry_after,
        } => Some((*status, *retry_after, url.clone())),
        _ => None,
    }
}

/// 解析秒數形式的 `Retry-After` 標頭
pub fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
