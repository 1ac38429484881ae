//! 데이터 모듈 오류 타입.

use fin_core::FinError;
use thiserror::Error;

/// 외부 협력자(DART, KRX, LLM, 파일) 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 네트워크 오류
    #[error("Network error: {0}")]
    Network(String),

    /// 타임아웃 오류
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// 외부 API가 실패 상태를 반환함
    #[error("API error [{status}]: {message}")]
    Api { status: String, message: String },

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    Parse(String),

    /// 캐시 오류
    #[error("Cache error: {0}")]
    Cache(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),

    /// 파일 입출력 오류
    #[error("IO error: {0}")]
    Io(String),

    /// 압축 해제 오류
    #[error("Zip error: {0}")]
    Zip(String),

    /// XML 오류
    #[error("XML error: {0}")]
    Xml(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl DataError {
    pub fn api(status: impl Into<String>, message: impl Into<String>) -> Self {
        DataError::Api {
            status: status.into(),
            message: message.into(),
        }
    }

    /// 원인 메시지에 작업 설명을 덧붙입니다.
    pub fn context(self, what: &str) -> Self {
        match self {
            DataError::Network(m) => DataError::Network(format!("{}: {}", what, m)),
            DataError::Timeout(m) => DataError::Timeout(format!("{}: {}", what, m)),
            DataError::Api { status, message } => DataError::Api {
                status,
                message: format!("{}: {}", what, message),
            },
            DataError::NotFound(m) => DataError::NotFound(format!("{}: {}", what, m)),
            DataError::Serialization(m) => DataError::Serialization(format!("{}: {}", what, m)),
            DataError::Parse(m) => DataError::Parse(format!("{}: {}", what, m)),
            DataError::Cache(m) => DataError::Cache(format!("{}: {}", what, m)),
            DataError::Config(m) => DataError::Config(format!("{}: {}", what, m)),
            DataError::Io(m) => DataError::Io(format!("{}: {}", what, m)),
            DataError::Zip(m) => DataError::Zip(format!("{}: {}", what, m)),
            DataError::Xml(m) => DataError::Xml(format!("{}: {}", what, m)),
            DataError::InvalidData(m) => DataError::InvalidData(format!("{}: {}", what, m)),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataError::Timeout(err.to_string())
        } else if err.is_decode() {
            DataError::Serialization(err.to_string())
        } else {
            DataError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::Io(err.to_string())
    }
}

impl From<zip::result::ZipError> for DataError {
    fn from(err: zip::result::ZipError) -> Self {
        DataError::Zip(err.to_string())
    }
}

impl From<quick_xml::Error> for DataError {
    fn from(err: quick_xml::Error) -> Self {
        DataError::Xml(err.to_string())
    }
}

impl From<DataError> for FinError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Network(m) | DataError::Timeout(m) => FinError::Network(m),
            DataError::Api { status, message } => {
                FinError::DartApi(format!("{} (status {})", message, status))
            }
            DataError::NotFound(m) => FinError::FinancialDataNotFound(m),
            DataError::Serialization(m) | DataError::Parse(m) => FinError::Serialization(m),
            DataError::Config(m) => FinError::Config(m),
            DataError::Io(m) => FinError::Io(m),
            other => FinError::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_preserves_message() {
        let err = DataError::Network("connection refused".to_string()).context("회사 코드 다운로드 실패");
        assert_eq!(
            err.to_string(),
            "Network error: 회사 코드 다운로드 실패: connection refused"
        );
    }

    #[test]
    fn test_into_fin_error() {
        let err: FinError = DataError::api("013", "조회된 데이터가 없습니다").into();
        assert_eq!(
            err.to_string(),
            "DART API 에러: 조회된 데이터가 없습니다 (status 013)"
        );

        let err: FinError = DataError::Timeout("document.xml".to_string()).into();
        assert!(err.is_retryable());
    }
}
