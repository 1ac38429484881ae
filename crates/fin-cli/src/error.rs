//! 에러 타입 정의.

use fin_core::FinError;
use thiserror::Error;

/// CLI 에러 타입
#[derive(Debug, Error)]
pub enum CliError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// 서비스 에러 (DART, KRX, LLM 등)
    #[error(transparent)]
    Service(#[from] FinError),

    /// 결과 출력 실패
    #[error("Output error: {0}")]
    Output(String),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Output(err.to_string())
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CliError>;
