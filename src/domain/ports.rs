use crate::domain::model::{FetchOutcome, ListingRequest, ListingResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 可分頁的運動資料來源
#[async_trait]
pub trait ExerciseSource: Send + Sync {
    async fn list_exercises(&self, request: &ListingRequest) -> Result<ListingResult>;

    /// 與 `list_exercises` 相同，但失敗時回傳 `{"error": ...}` 投影而非錯誤
    async fn fetch_outcome(&self, request: &ListingRequest) -> FetchOutcome {
        let result = self.list_exercises(request).await;
        if let Err(e) = &result {
            tracing::error!("❌ Failed to fetch exercises: {}", e);
        }
        FetchOutcome::from(result)
    }
}
