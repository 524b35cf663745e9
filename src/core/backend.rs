use crate::utils::error::{Result, SpmError};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

/// 運動管理後端的 REST 客戶端，每個呼叫直接對應一個端點
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("🌐 {} {}", method, url);
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("🌐 {} answered with {}", response.url(), status);
            return Err(SpmError::StatusError {
                status: status.as_u16(),
                url: response.url().to_string(),
                retry_after: None,
            });
        }
        Ok(response)
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.send_json(self.request(Method::GET, path)).await
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Value> {
        self.send_json(self.request(Method::POST, path).json(payload))
            .await
    }

    async fn put(&self, path: &str, payload: &Value) -> Result<Value> {
        self.send_json(self.request(Method::PUT, path).json(payload))
            .await
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        let response = self.send(self.request(Method::DELETE, path)).await?;
        Ok(response.status() == StatusCode::NO_CONTENT)
    }

    // ========== 認證 ==========

    pub async fn login(&self, email: &str, password: &str) -> Result<Value> {
        let request = self
            .request(Method::POST, "/auth/login")
            .json(&LoginPayload { email, password });
        self.send_json(request).await
    }

    /// 註冊運動員或教練（依 payload 內容而定）
    pub async fn register_user(&self, payload: &Value) -> Result<Value> {
        self.post("/registro/", payload).await
    }

    // ========== 運動員 ==========

    pub async fn create_athlete(&self, payload: &Value) -> Result<Value> {
        self.post("/atletas/", payload).await
    }

    pub async fn list_athletes(&self) -> Result<Value> {
        self.get("/atletas/").await
    }

    pub async fn get_athlete(&self, athlete_id: i64) -> Result<Value> {
        self.get(&format!("/atletas/{}", athlete_id)).await
    }

    pub async fn update_athlete(&self, athlete_id: i64, payload: &Value) -> Result<Value> {
        self.put(&format!("/atletas/{}", athlete_id), payload).await
    }

    pub async fn delete_athlete(&self, athlete_id: i64) -> Result<bool> {
        self.delete(&format!("/atletas/{}", athlete_id)).await
    }

    pub async fn athlete_dashboard(&self, user_id: i64) -> Result<Value> {
        self.get(&format!("/atletas/{}", user_id)).await
    }

    pub async fn athlete_basic(&self, athlete_id: i64) -> Result<Value> {
        self.get(&format!("/atletas/basico/{}", athlete_id)).await
    }

    pub async fn athlete_by_user(&self, user_id: i64) -> Result<Value> {
        self.get(&format!("/atletas/usuario/{}", user_id)).await
    }

    pub async fn edit_athlete(&self, athlete_id: i64, payload: &Value) -> Result<Value> {
        self.put(&format!("/atletas/editar/{}", athlete_id), payload)
            .await
    }

    // ========== 教練 ==========

    pub async fn create_coach(&self, payload: &Value) -> Result<Value> {
        self.post("/entrenadores/", payload).await
    }

    pub async fn list_coaches(&self) -> Result<Value> {
        self.get("/entrenadores/").await
    }

    pub async fn get_coach(&self, coach_id: i64) -> Result<Value> {
        self.get(&format!("/entrenadores/{}", coach_id)).await
    }

    pub async fn update_coach(&self, coach_id: i64, payload: &Value) -> Result<Value> {
        self.put(&format!("/entrenadores/{}", coach_id), payload)
            .await
    }

    pub async fn delete_coach(&self, coach_id: i64) -> Result<bool> {
        self.delete(&format!("/entrenadores/{}", coach_id)).await
    }

    pub async fn coach_dashboard(&self, user_id: i64) -> Result<Value> {
        self.get(&format!("/coaches/{}", user_id)).await
    }
}
