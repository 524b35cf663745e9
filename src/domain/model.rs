use crate::utils::error::{Result, SpmError};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 沒有任何翻譯時使用的名稱
pub const UNNAMED_EXERCISE: &str = "Ejercicio sin nombre";

/// 語言識別碼：wger 使用數字 id，也接受字串代碼
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LanguageCode {
    Id(u64),
    Code(String),
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageCode::Id(id) => write!(f, "{}", id),
            LanguageCode::Code(code) => f.write_str(code),
        }
    }
}

impl From<u64> for LanguageCode {
    fn from(id: u64) -> Self {
        LanguageCode::Id(id)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        code.parse::<u64>()
            .map(LanguageCode::Id)
            .unwrap_or_else(|_| LanguageCode::Code(code.to_string()))
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(LanguageCode::from(s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    limit: u32,
    language: LanguageCode,
}

impl ListingRequest {
    pub fn new(limit: u32, language: impl Into<LanguageCode>) -> Result<Self> {
        if limit == 0 {
            return Err(SpmError::ValidationError {
                message: "limit must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            limit,
            language: language.into(),
        })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn language(&self) -> &LanguageCode {
        &self.language
    }

    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("language", self.language.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

// 欄位型別不符時視為缺值，避免單筆壞資料讓整批失敗
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

// 逐筆容錯：丟掉解析失敗的元素，保留其餘
fn lenient_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTranslation {
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<LanguageCode>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCategory {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMuscle {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<RawCategory>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub translations: Vec<RawTranslation>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub muscles: Vec<RawMuscle>,
}

impl RawRecord {
    /// 第一個語言完全相符的翻譯
    pub fn translation_for(&self, language: &LanguageCode) -> Option<&RawTranslation> {
        self.translations
            .iter()
            .find(|t| t.language.as_ref() == Some(language))
    }

    pub fn first_translation(&self) -> Option<&RawTranslation> {
        self.translations.first()
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.name.as_deref())
    }

    pub fn muscle_names(&self) -> impl Iterator<Item = &str> {
        self.muscles.iter().filter_map(|m| m.name.as_deref())
    }
}

/// 列表端點的原始回應
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawListing {
    #[serde(default, deserialize_with = "lenient")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub next: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub previous: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub results: Vec<RawRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub name: String,
    pub id: Option<u64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub muscles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingResult {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NormalizedRecord>,
}

/// 呼叫端看到的最終結果：成功列表或 `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchOutcome {
    Listing(ListingResult),
    Failed { error: String },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Listing(_))
    }

    /// 失敗的投影轉成 [`SpmError::FetchFailed`]，成功時為 `Ok(())`
    pub fn ensure_success(&self) -> Result<()> {
        match self {
            FetchOutcome::Listing(_) => Ok(()),
            FetchOutcome::Failed { error } => Err(SpmError::FetchFailed {
                message: error.clone(),
            }),
        }
    }
}

impl From<Result<ListingResult>> for FetchOutcome {
    fn from(result: Result<ListingResult>) -> Self {
        match result {
            Ok(listing) => FetchOutcome::Listing(listing),
            Err(e) => FetchOutcome::Failed {
                error: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_request_rejects_zero_limit() {
        assert!(ListingRequest::new(0, 2u64).is_err());
        let request = ListingRequest::new(5, 2u64).unwrap();
        assert_eq!(request.limit(), 5);
        assert_eq!(request.language(), &LanguageCode::Id(2));
    }

    #[test]
    fn test_query_pairs_order() {
        let request = ListingRequest::new(3, "en").unwrap();
        assert_eq!(
            request.query_pairs(),
            [("language", "en".to_string()), ("limit", "3".to_string())]
        );
    }

    #[test]
    fn test_language_code_from_str() {
        assert_eq!(LanguageCode::from("2"), LanguageCode::Id(2));
        assert_eq!(LanguageCode::from("es"), LanguageCode::Code("es".to_string()));
    }

    #[test]
    fn test_raw_record_tolerates_wrong_field_types() {
        let record: RawRecord = serde_json::from_value(json!({
            "id": "not-a-number",
            "category": 10,
            "translations": [{"language": 2, "name": null}],
            "muscles": "none"
        }))
        .unwrap();

        assert_eq!(record.id, None);
        assert_eq!(record.category, None);
        assert_eq!(record.translations.len(), 1);
        assert_eq!(record.translations[0].name, None);
        assert!(record.muscles.is_empty());
    }

    #[test]
    fn test_malformed_list_entries_are_dropped_individually() {
        let record: RawRecord = serde_json::from_value(json!({
            "id": 1,
            "translations": [{"language": 2, "name": "Uno"}, 7],
            "muscles": [{"name": "Biceps"}, null]
        }))
        .unwrap();

        assert_eq!(record.translations.len(), 1);
        assert_eq!(record.translations[0].name.as_deref(), Some("Uno"));
        assert_eq!(record.muscle_names().collect::<Vec<_>>(), vec!["Biceps"]);
    }

    #[test]
    fn test_garbage_result_does_not_drop_valid_records() {
        let listing: RawListing = serde_json::from_value(json!({
            "count": 2,
            "results": [
                {"id": 1, "translations": [{"language": 2, "name": "Uno"}]},
                "garbage"
            ]
        }))
        .unwrap();

        assert_eq!(listing.count, 2);
        assert_eq!(listing.results.len(), 1);
        assert_eq!(listing.results[0].id, Some(1));
    }

    #[test]
    fn test_raw_listing_defaults() {
        let listing: RawListing = serde_json::from_value(json!({"results": []})).unwrap();
        assert_eq!(listing.count, 0);
        assert_eq!(listing.next, None);
        assert!(listing.results.is_empty());
    }

    #[test]
    fn test_error_projection_serializes_as_error_object() {
        let outcome = FetchOutcome::Failed {
            error: "HTTP 404 from http://x".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": "HTTP 404 from http://x"})
        );
    }

    #[test]
    fn test_failed_projection_becomes_fetch_error() {
        let failed = FetchOutcome::Failed {
            error: "HTTP 503 from http://x".to_string(),
        };
        assert!(!failed.is_success());
        assert!(matches!(
            failed.ensure_success(),
            Err(SpmError::FetchFailed { message }) if message == "HTTP 503 from http://x"
        ));

        let listing = FetchOutcome::Listing(ListingResult {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        });
        assert!(listing.is_success());
        assert!(listing.ensure_success().is_ok());
    }

    #[test]
    fn test_listing_projection_serializes_flat() {
        let outcome = FetchOutcome::Listing(ListingResult {
            count: 1,
            next: None,
            previous: None,
            results: vec![NormalizedRecord {
                name: "Curl".to_string(),
                id: Some(7),
                description: None,
                category: Some("Arms".to_string()),
                muscles: vec!["Biceps".to_string()],
            }],
        });
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["results"][0]["name"], "Curl");
        assert!(value["next"].is_null());
    }
}
