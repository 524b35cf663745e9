use crate::core::backend::DEFAULT_BACKEND_URL;
use crate::core::fetcher::{FetcherConfig, DEFAULT_EXERCISE_ENDPOINT};
use crate::core::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRYABLE_STATUS_CODES};
use crate::domain::model::LanguageCode;
use crate::utils::error::{Result, SpmError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub wger: WgerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WgerConfig {
    #[serde(default = "default_wger_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub max_attempts: Option<u32>,
    pub backoff_base_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
    pub retryable_status_codes: Option<Vec<u16>>,
    pub default_language: Option<LanguageCode>,
    pub default_limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

fn default_wger_url() -> String {
    DEFAULT_EXERCISE_ENDPOINT.to_string()
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

impl Default for WgerConfig {
    fn default() -> Self {
        Self {
            base_url: default_wger_url(),
            timeout_seconds: None,
            max_attempts: None,
            backoff_base_ms: None,
            max_backoff_ms: None,
            retryable_status_codes: None,
            default_language: None,
            default_limit: None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_seconds: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SpmError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SpmError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WGER_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            SpmError::ConfigValidationError {
                field: "env_substitution".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 組出擷取器設定，未填的欄位使用預設值
    pub fn fetcher_config(&self) -> FetcherConfig {
        let wger = &self.wger;
        let defaults = RetryPolicy::default();

        let retry = RetryPolicy::new(
            wger.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            wger.backoff_base_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.backoff_base()),
            wger.max_backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.max_backoff()),
        )
        .with_status_codes(
            wger.retryable_status_codes
                .clone()
                .unwrap_or_else(|| DEFAULT_RETRYABLE_STATUS_CODES.to_vec()),
        );

        FetcherConfig {
            base_url: wger.base_url.clone(),
            timeout: wger
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(crate::core::fetcher::DEFAULT_TIMEOUT),
            retry,
        }
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_seconds.unwrap_or(10))
    }

    pub fn default_language(&self) -> LanguageCode {
        self.wger
            .default_language
            .clone()
            .unwrap_or(LanguageCode::Id(2))
    }

    pub fn default_limit(&self) -> u32 {
        self.wger.default_limit.unwrap_or(10)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("wger.base_url", &self.wger.base_url)?;
        validation::validate_url("backend.base_url", &self.backend.base_url)?;

        if let Some(attempts) = self.wger.max_attempts {
            validation::validate_positive_number("wger.max_attempts", attempts, 1)?;
        }
        if let Some(timeout) = self.wger.timeout_seconds {
            validation::validate_positive_number("wger.timeout_seconds", timeout, 1)?;
        }
        if let Some(timeout) = self.backend.timeout_seconds {
            validation::validate_positive_number("backend.timeout_seconds", timeout, 1)?;
        }
        if let Some(limit) = self.wger.default_limit {
            validation::validate_positive_number("wger.default_limit", limit, 1)?;
        }
        if let Some(codes) = &self.wger.retryable_status_codes {
            for code in codes {
                validation::validate_range("wger.retryable_status_codes", *code, 100, 599)?;
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
