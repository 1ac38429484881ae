//! 추출 파이프라인 오류 타입.

use fin_core::FinError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 비상장/문서 추출 파이프라인 단계 오류.
///
/// 공개 진입점 밖으로 전파되지 않고 `success: false` 결과의 메시지가 됩니다.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 대상 연도에 사업보고서/감사보고서가 없음
    #[error("사업보고서 또는 감사보고서를 찾을 수 없습니다.")]
    NoReport,

    /// 문서에 재무제표 테이블이 없음
    #[error("문서에서 재무제표를 찾을 수 없습니다.")]
    NoTables,

    /// 문서 파서(Upstage)가 설정되지 않음
    #[error("Upstage API 키가 설정되지 않았습니다. PDF 파싱을 위해 Upstage API 키가 필요합니다.")]
    ParserUnavailable,

    /// 잘못된 사업연도
    #[error("잘못된 사업연도: {0}")]
    InvalidYear(String),

    /// 공시 검색/다운로드 실패
    #[error("{0}")]
    Download(FinError),

    /// 문서 파싱 또는 LLM 추출 실패
    #[error("{0}")]
    Extraction(FinError),

    /// 임시 파일 생성/읽기 실패
    #[error("임시 파일 오류: {0}")]
    TempFile(String),
}

impl PipelineError {
    pub fn failure(&self) -> ExtractionFailure {
        match self {
            PipelineError::NoReport => ExtractionFailure::NoReport,
            PipelineError::NoTables => ExtractionFailure::NoTables,
            PipelineError::ParserUnavailable => ExtractionFailure::ParserUnavailable,
            PipelineError::Download(_) => ExtractionFailure::Download,
            PipelineError::Extraction(_) => ExtractionFailure::Extraction,
            PipelineError::InvalidYear(_) | PipelineError::TempFile(_) => ExtractionFailure::Internal,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::TempFile(err.to_string())
    }
}

/// 실패 단계 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionFailure {
    NoReport,
    NoTables,
    ParserUnavailable,
    Download,
    Extraction,
    Internal,
}
