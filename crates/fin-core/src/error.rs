//! 재무 분석 시스템의 에러 타입.
//!
//! 공시(DART), 시세(KRX), 텍스트 추출(LLM) 등 외부 협력자에서 발생한 실패를
//! 도메인 에러로 감싸 호출자에게 원본 메시지를 보존한 채 전달합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum FinError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// DART 공시 API 에러
    #[error("DART API 에러: {0}")]
    DartApi(String),

    /// KRX 데이터 에러
    #[error("KRX 데이터 에러: {0}")]
    KrxData(String),

    /// 주가 정보 조회 에러
    #[error("주가 정보 에러: {0}")]
    StockInfo(String),

    /// LLM 호출 에러
    #[error("LLM 에러: {0}")]
    Llm(String),

    /// 회사를 찾을 수 없음
    #[error("회사를 찾을 수 없습니다: {0}")]
    CompanyNotFound(String),

    /// 재무 데이터 없음
    #[error("재무 데이터를 찾을 수 없습니다: {0}")]
    FinancialDataNotFound(String),

    /// 외부 추출 결과 파싱 실패
    #[error("{0}")]
    Extraction(String),

    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 파일 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 도메인 작업을 위한 Result 타입.
pub type FinResult<T> = Result<T, FinError>;

impl FinError {
    /// 재시도 가능한 에러인지 확인합니다.
    ///
    /// 추출 결과 파싱 실패는 재시도하지 않습니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FinError::Network(_))
    }

    /// 데이터 부재(에러가 아닌 빈 결과로 다뤄야 하는 경우)인지 확인합니다.
    pub fn is_data_absence(&self) -> bool {
        matches!(
            self,
            FinError::CompanyNotFound(_) | FinError::FinancialDataNotFound(_)
        )
    }
}

impl From<serde_json::Error> for FinError {
    fn from(err: serde_json::Error) -> Self {
        FinError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for FinError {
    fn from(err: std::io::Error) -> Self {
        FinError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let network_err = FinError::Network("timeout".to_string());
        assert!(network_err.is_retryable());

        let parse_err = FinError::Extraction("재무정보 추출 결과를 파싱할 수 없습니다.".to_string());
        assert!(!parse_err.is_retryable());
    }

    #[test]
    fn test_error_data_absence() {
        assert!(FinError::CompanyNotFound("00126380".to_string()).is_data_absence());
        assert!(!FinError::DartApi("status 013".to_string()).is_data_absence());
    }

    #[test]
    fn test_error_message_preserved() {
        let err = FinError::DartApi("회사 코드 다운로드 실패: 401".to_string());
        assert_eq!(err.to_string(), "DART API 에러: 회사 코드 다운로드 실패: 401");

        let err = FinError::Extraction("재무정보 추출 결과를 파싱할 수 없습니다.".to_string());
        assert_eq!(err.to_string(), "재무정보 추출 결과를 파싱할 수 없습니다.");
    }
}
