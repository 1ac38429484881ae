//! 회사 단위 재무정보 조회 결과.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::account::NormalizedFinancialItem;
use super::ratio::RatioSet;
use crate::error::FinError;

/// 재무제표 구분 (연결/별도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FsDiv {
    /// 연결재무제표
    #[default]
    #[serde(rename = "CFS")]
    Consolidated,
    /// 별도(개별)재무제표
    #[serde(rename = "OFS")]
    Separate,
}

impl FsDiv {
    pub fn code(self) -> &'static str {
        match self {
            FsDiv::Consolidated => "CFS",
            FsDiv::Separate => "OFS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FsDiv::Consolidated => "연결",
            FsDiv::Separate => "별도",
        }
    }
}

impl fmt::Display for FsDiv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FsDiv {
    type Err = FinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CFS" => Ok(FsDiv::Consolidated),
            "OFS" => Ok(FsDiv::Separate),
            other => Err(FinError::InvalidInput(format!(
                "재무제표 구분은 CFS 또는 OFS여야 합니다: {}",
                other
            ))),
        }
    }
}

/// 조회 결과 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// 데이터 있음
    Success,
    /// 데이터 없음 (에러 아님)
    Empty,
    /// 실패 (설명 포함)
    Failed,
}

/// 회사 한 곳, 한 사업연도의 재무정보.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatementResult {
    pub corp_code: String,
    pub corp_name: String,
    pub stock_code: String,
    pub bsns_year: String,
    /// "CFS", "OFS" 또는 비상장의 경우 "N/A"
    pub fs_div: String,
    pub items: Vec<NormalizedFinancialItem>,
    pub ratios: RatioSet,
    pub is_listed: bool,
    /// 데이터 출처 설명 (AI 파싱 등)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// 실패 사유
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FinancialStatementResult {
    pub fn status(&self) -> ResultStatus {
        if self.error.is_some() {
            ResultStatus::Failed
        } else if self.items.is_empty() {
            ResultStatus::Empty
        } else {
            ResultStatus::Success
        }
    }

    /// 사용자에게 보여줄 메시지. 실패 사유가 우선이며 데이터가 없으면 안내 문구입니다.
    pub fn message(&self) -> Option<String> {
        match self.status() {
            ResultStatus::Failed => self.error.clone(),
            ResultStatus::Empty => Some("조회된 재무 데이터가 없습니다.".to_string()),
            ResultStatus::Success => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_result() -> FinancialStatementResult {
        FinancialStatementResult {
            corp_code: "00126380".to_string(),
            corp_name: "삼성전자".to_string(),
            stock_code: "005930".to_string(),
            bsns_year: "2023".to_string(),
            fs_div: "CFS".to_string(),
            items: Vec::new(),
            ratios: RatioSet::new(),
            is_listed: true,
            source: None,
            error: None,
        }
    }

    #[test]
    fn test_fs_div_parse() {
        assert_eq!("cfs".parse::<FsDiv>().unwrap(), FsDiv::Consolidated);
        assert_eq!("OFS".parse::<FsDiv>().unwrap(), FsDiv::Separate);
        assert!("XYZ".parse::<FsDiv>().is_err());
        assert_eq!(serde_json::to_string(&FsDiv::Separate).unwrap(), "\"OFS\"");
    }

    #[test]
    fn test_result_status() {
        let mut result = empty_result();
        assert_eq!(result.status(), ResultStatus::Empty);
        assert!(result.message().is_some());

        result.error = Some("비상장 기업 재무정보 조회 실패: timeout".to_string());
        assert_eq!(result.status(), ResultStatus::Failed);
        assert_eq!(
            result.message().as_deref(),
            Some("비상장 기업 재무정보 조회 실패: timeout")
        );
    }
}
