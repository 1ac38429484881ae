//! 공시 목록 항목과 보고서 분류.

use serde::{Deserialize, Serialize};

/// 재무정보가 포함된 공시 문서 키워드.
pub const FINANCIAL_DOCUMENT_KEYWORDS: [&str; 5] =
    ["사업보고서", "반기보고서", "분기보고서", "감사보고서", "검토보고서"];

/// 재무 문서 목록에서 제외하는 보고서명 키워드.
pub const EXCLUDED_DOCUMENT_KEYWORDS: [&str; 5] = ["정정", "취소", "철회", "연장", "첨부정정"];

/// 비상장 재무정보 추출에 쓰는 연간 보고서 키워드.
pub const ANNUAL_REPORT_KEYWORDS: [&str; 2] = ["사업보고서", "감사보고서"];

/// DART `list.json` 공시 항목.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Disclosure {
    /// 고유번호
    pub corp_code: String,
    /// 회사명
    pub corp_name: String,
    /// 종목코드
    pub stock_code: String,
    /// 법인구분 (Y: 유가, K: 코스닥, N: 코넥스, E: 기타)
    pub corp_cls: String,
    /// 보고서명
    pub report_nm: String,
    /// 접수번호
    pub rcept_no: String,
    /// 공시 제출인명
    pub flr_nm: String,
    /// 접수일자 (YYYYMMDD)
    pub rcept_dt: String,
    /// 비고
    pub rm: String,
}

/// 보고서 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// 사업보고서
    Business,
    /// 감사보고서
    Audit,
    /// 반기보고서
    HalfYear,
    /// 분기보고서
    Quarterly,
    /// 검토보고서
    Review,
}

impl ReportKind {
    /// 보고서명에서 종류를 판별합니다. 감사보고서가 사업보고서보다 먼저 검사됩니다.
    pub fn from_report_name(report_nm: &str) -> Option<Self> {
        if report_nm.contains("감사보고서") {
            Some(ReportKind::Audit)
        } else if report_nm.contains("사업보고서") {
            Some(ReportKind::Business)
        } else if report_nm.contains("반기보고서") {
            Some(ReportKind::HalfYear)
        } else if report_nm.contains("분기보고서") {
            Some(ReportKind::Quarterly)
        } else if report_nm.contains("검토보고서") {
            Some(ReportKind::Review)
        } else {
            None
        }
    }
}

impl Disclosure {
    pub fn report_kind(&self) -> Option<ReportKind> {
        ReportKind::from_report_name(&self.report_nm)
    }

    /// 정정/취소/철회/연장 공시인지.
    pub fn is_excluded(&self) -> bool {
        EXCLUDED_DOCUMENT_KEYWORDS
            .iter()
            .any(|kw| self.report_nm.contains(kw))
    }

    /// 사업보고서/감사보고서이면서 제외 키워드가 없는지.
    pub fn is_annual_report(&self) -> bool {
        ANNUAL_REPORT_KEYWORDS
            .iter()
            .any(|kw| self.report_nm.contains(kw))
            && !self.is_excluded()
    }

    /// 재무정보를 담은 문서이면서 제외 키워드가 없는지.
    pub fn is_financial_document(&self) -> bool {
        FINANCIAL_DOCUMENT_KEYWORDS
            .iter()
            .any(|kw| self.report_nm.contains(kw))
            && !self.is_excluded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disclosure(report_nm: &str) -> Disclosure {
        Disclosure {
            report_nm: report_nm.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_annual_report_filter() {
        assert!(disclosure("감사보고서 (2023.12)").is_annual_report());
        assert!(disclosure("사업보고서 (2023.12)").is_annual_report());
        assert!(!disclosure("[기재정정]사업보고서 (2023.12)").is_annual_report());
        assert!(!disclosure("[철회]감사보고서 (2023.12)").is_annual_report());
        assert!(!disclosure("[취소]사업보고서 (2023.12)").is_annual_report());
        assert!(!disclosure("감사보고서제출기한연장신고서").is_annual_report());
        assert!(!disclosure("반기보고서 (2023.06)").is_annual_report());
    }

    #[test]
    fn test_financial_document_filter() {
        assert!(disclosure("분기보고서 (2024.03)").is_financial_document());
        assert!(disclosure("연결감사보고서").is_financial_document());
        assert!(!disclosure("[첨부정정]감사보고서").is_financial_document());
        assert!(!disclosure("감사보고서제출기한연장신고서").is_financial_document());
        assert!(!disclosure("주요사항보고서").is_financial_document());
    }

    #[test]
    fn test_report_kind() {
        assert_eq!(
            ReportKind::from_report_name("연결감사보고서"),
            Some(ReportKind::Audit)
        );
        assert_eq!(
            ReportKind::from_report_name("사업보고서 (2023.12)"),
            Some(ReportKind::Business)
        );
        assert_eq!(ReportKind::from_report_name("주요사항보고서"), None);
    }
}
