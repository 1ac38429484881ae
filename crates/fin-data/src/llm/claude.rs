//! Anthropic Claude 클라이언트 (Messages API).

use async_trait::async_trait;
use fin_core::{FinError, FinResult, LlmConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{http_status_error, transport_error, ChatRequest, LlmProvider};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const API_VERSION: &str = "2023-06-01";
const CONSOLE_URL: &str = "https://console.anthropic.com/";

/// Claude API 클라이언트.
#[derive(Clone)]
pub struct ClaudeClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
}

impl ClaudeClient {
    pub fn new(api_key: Option<SecretString>) -> FinResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| FinError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn from_config(config: &LlmConfig) -> FinResult<Self> {
        let client = Self::new(config.claude_api_key.clone())?;
        info!(model = %client.model, available = client.is_available(), "Claude 클라이언트 초기화");
        Ok(client)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl LlmProvider for ClaudeClient {
    fn name(&self) -> &str {
        "claude"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &ChatRequest) -> FinResult<String> {
        #[derive(Deserialize)]
        struct ContentBlock {
            text: Option<String>,
        }
        #[derive(Deserialize)]
        struct MessagesResponse {
            #[serde(default)]
            content: Vec<ContentBlock>,
        }

        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| FinError::Llm("Claude API 키가 설정되지 않았습니다.".to_string()))?;

        let mut payload = serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [{"role": "user", "content": request.prompt}],
        });
        if let Some(system) = &request.system {
            payload["system"] = serde_json::Value::String(system.clone());
        }

        debug!(model = %self.model, prompt_len = request.prompt.chars().count(), "Claude 요청");

        let mut builder = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&payload);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Claude HTTP 오류");
            if body.contains("credit") || body.contains("quota") {
                return Err(FinError::Llm(
                    "API 크레딧이 부족합니다. 크레딧을 충전해주세요.".to_string(),
                ));
            }
            return Err(http_status_error(status, CONSOLE_URL));
        }

        let data: MessagesResponse = response.json().await.map_err(transport_error)?;
        let text = data
            .content
            .into_iter()
            .find_map(|block| block.text)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| FinError::Llm("Claude API로부터 응답을 받지 못했습니다.".to_string()))?;

        info!(length = text.chars().count(), "Claude 응답 수신");
        Ok(text)
    }
}
