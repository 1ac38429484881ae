//! LLM Provider 및 텍스트 추출.
//!
//! 모든 Provider는 같은 `LlmProvider` 인터페이스로 호출되며, 실패는
//! `FinError::Llm`으로 사용자에게 보여줄 메시지와 함께 반환됩니다.
//!
//! - `UpstageClient`: Solar 채팅 + Document Parse (PDF → 요소 목록)
//! - `ClaudeClient`: Anthropic Messages API
//! - `LlmFinancialExtractor`: 재무제표 텍스트 → 6개 표준 계정 JSON

pub mod claude;
pub mod extractor;
pub mod json;
pub mod upstage;

use async_trait::async_trait;
use fin_core::{FinError, FinResult};
use std::path::Path;
use std::time::Duration;

use crate::document::ParsedDocument;

pub use claude::ClaudeClient;
pub use extractor::{
    report_year, ExtractedFinancials, ExtractedItem, FinancialTextExtractor, LlmFinancialExtractor,
};
pub use json::extract_json_object;
pub use upstage::UpstageClient;

/// 채팅 요청.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// 시스템 프롬프트
    pub system: Option<String>,
    /// 사용자 프롬프트
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// 요청별 타임아웃 (없으면 클라이언트 기본값)
    pub timeout: Option<Duration>,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 4000,
            timeout: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// 텍스트 생성 Provider.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider 이름 (레지스트리 키).
    fn name(&self) -> &str;

    /// API 키가 설정되어 호출 가능한지.
    fn is_available(&self) -> bool;

    /// 응답 텍스트 (앞뒤 공백 제거).
    async fn complete(&self, request: &ChatRequest) -> FinResult<String>;
}

/// 문서 파서 (PDF → 요소 목록).
#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse_document(&self, file_path: &Path) -> FinResult<ParsedDocument>;
}

/// HTTP 상태 코드를 사용자용 LLM 오류로 변환합니다.
pub(crate) fn http_status_error(status: reqwest::StatusCode, console_url: &str) -> FinError {
    match status.as_u16() {
        429 => FinError::Llm("API 사용량 한도 초과. 잠시 후 다시 시도하세요.".to_string()),
        401 | 403 => FinError::Llm(format!("유효하지 않은 API 키입니다.\n발급: {}", console_url)),
        code => FinError::Llm(format!("HTTP {}", code)),
    }
}

/// 전송 단계 오류 (연결 실패, 타임아웃).
pub(crate) fn transport_error(err: reqwest::Error) -> FinError {
    if err.is_timeout() {
        FinError::Llm(format!("요청 시간 초과: {}", err))
    } else {
        FinError::Llm(err.to_string())
    }
}

/// 테스트와 로컬 실행을 위한 고정 응답 Provider.
#[derive(Debug, Clone)]
pub struct StaticLlm {
    name: String,
    response: String,
}

impl StaticLlm {
    pub fn new(name: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: response.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for StaticLlm {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, _request: &ChatRequest) -> FinResult<String> {
        Ok(self.response.trim().to_string())
    }
}
