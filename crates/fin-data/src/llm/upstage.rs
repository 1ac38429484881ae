//! Upstage Solar 클라이언트.
//!
//! OpenAI 호환 채팅 API와 Document Parse(멀티파트 업로드) API를 사용합니다.

use async_trait::async_trait;
use fin_core::{FinError, FinResult, LlmConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{http_status_error, transport_error, ChatRequest, DocumentParser, LlmProvider};
use crate::document::ParsedDocument;

const DEFAULT_CHAT_URL: &str = "https://api.upstage.ai/v1/solar";
const DEFAULT_PARSE_URL: &str = "https://api.upstage.ai/v1/document-ai/document-parse";
const DEFAULT_MODEL: &str = "solar-pro2";
const CONSOLE_URL: &str = "https://console.upstage.ai/";

/// Upstage API 클라이언트.
#[derive(Clone)]
pub struct UpstageClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    chat_url: String,
    parse_url: String,
    model: String,
    parse_timeout: Duration,
}

impl UpstageClient {
    pub fn new(api_key: Option<SecretString>) -> FinResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| FinError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            chat_url: DEFAULT_CHAT_URL.to_string(),
            parse_url: DEFAULT_PARSE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            parse_timeout: Duration::from_secs(120),
        })
    }

    pub fn from_config(config: &LlmConfig) -> FinResult<Self> {
        let client = Self::new(config.upstage_api_key.clone())?;
        info!(model = %client.model, available = client.is_available(), "Upstage 클라이언트 초기화");
        Ok(client)
    }

    /// 엔드포인트를 바꿉니다 (테스트용 목 서버 등).
    pub fn with_endpoints(mut self, chat_url: impl Into<String>, parse_url: impl Into<String>) -> Self {
        self.chat_url = chat_url.into().trim_end_matches('/').to_string();
        self.parse_url = parse_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> FinResult<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret())
            .ok_or_else(|| FinError::Llm("Upstage API 키가 설정되지 않았습니다.".to_string()))
    }
}

#[async_trait]
impl LlmProvider for UpstageClient {
    fn name(&self) -> &str {
        "upstage"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &ChatRequest) -> FinResult<String> {
        #[derive(Deserialize)]
        struct Message {
            content: Option<String>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct ChatResponse {
            #[serde(default)]
            choices: Vec<Choice>,
        }

        let api_key = self.api_key()?;

        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": request.prompt}));

        let payload = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        debug!(model = %self.model, prompt_len = request.prompt.chars().count(), "Upstage 요청");

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.chat_url))
            .bearer_auth(api_key)
            .json(&payload);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Upstage HTTP 오류");
            return Err(http_status_error(status, CONSOLE_URL));
        }

        let data: ChatResponse = response.json().await.map_err(transport_error)?;
        let text = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .ok_or_else(|| FinError::Llm("Upstage API로부터 응답을 받지 못했습니다.".to_string()))?;

        info!(length = text.chars().count(), "Upstage 응답 수신");
        Ok(text)
    }
}

#[async_trait]
impl DocumentParser for UpstageClient {
    async fn parse_document(&self, file_path: &Path) -> FinResult<ParsedDocument> {
        let api_key = self.api_key()?;

        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|e| FinError::Llm(format!("문서 파싱 실패: {}", e)))?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        info!(path = %file_path.display(), size = bytes.len(), "문서 파싱 요청");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("document", part);

        let response = self
            .client
            .post(&self.parse_url)
            .bearer_auth(api_key)
            .multipart(form)
            .timeout(self.parse_timeout)
            .send()
            .await
            .map_err(|e| FinError::Llm(format!("문서 파싱 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "문서 파싱 HTTP 오류");
            return Err(FinError::Llm(format!("문서 파싱 실패: HTTP {}", status.as_u16())));
        }

        let parsed: ParsedDocument = response
            .json()
            .await
            .map_err(|e| FinError::Llm(format!("문서 파싱 실패: {}", e)))?;

        info!(elements = parsed.elements.len(), "문서 파싱 완료");
        Ok(parsed)
    }
}
