//! 재무제표 계정과 정규화 카테고리.
//!
//! 회사마다 다른 계정 ID 체계(ifrs-full_*, dart_*)를 6개의 표준 카테고리로
//! 모으기 위한 타입을 정의합니다.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::period::{Period, PeriodValues};

/// 표준 계정 카테고리.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccountCategory {
    /// 자산총계
    TotalAssets,
    /// 부채총계
    TotalLiabilities,
    /// 자본총계
    TotalEquity,
    /// 매출액
    Revenue,
    /// 영업이익
    OperatingIncome,
    /// 당기순이익
    NetIncome,
}

impl AccountCategory {
    /// 모든 카테고리 (재무상태표 → 손익계산서 순).
    pub const ALL: [AccountCategory; 6] = [
        AccountCategory::TotalAssets,
        AccountCategory::TotalLiabilities,
        AccountCategory::TotalEquity,
        AccountCategory::Revenue,
        AccountCategory::OperatingIncome,
        AccountCategory::NetIncome,
    ];

    /// 브리핑 요약에 쓰는 순서 (손익 → 재무상태).
    pub const SUMMARY_ORDER: [AccountCategory; 6] = [
        AccountCategory::Revenue,
        AccountCategory::OperatingIncome,
        AccountCategory::NetIncome,
        AccountCategory::TotalAssets,
        AccountCategory::TotalLiabilities,
        AccountCategory::TotalEquity,
    ];

    /// 한글 표시명.
    pub fn label(self) -> &'static str {
        match self {
            AccountCategory::TotalAssets => "자산총계",
            AccountCategory::TotalLiabilities => "부채총계",
            AccountCategory::TotalEquity => "자본총계",
            AccountCategory::Revenue => "매출액",
            AccountCategory::OperatingIncome => "영업이익",
            AccountCategory::NetIncome => "당기순이익",
        }
    }

    /// 한글 표시명에서 카테고리를 찾습니다.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// 알려진 계정 ID를 카테고리로 매핑합니다.
    pub fn from_account_id(account_id: &str) -> Option<Self> {
        match account_id {
            "ifrs-full_Assets" => Some(AccountCategory::TotalAssets),
            "ifrs-full_Liabilities" => Some(AccountCategory::TotalLiabilities),
            "ifrs-full_Equity" => Some(AccountCategory::TotalEquity),
            "ifrs-full_Revenue" => Some(AccountCategory::Revenue),
            "dart_OperatingIncomeLoss" => Some(AccountCategory::OperatingIncome),
            "ifrs-full_ProfitLoss"
            | "dart_ProfitLossAttributableToOwnersOfParent"
            | "ifrs-full_ProfitLossAttributableToOwnersOfParent" => {
                Some(AccountCategory::NetIncome)
            }
            _ => None,
        }
    }

    /// 추출 결과를 원본 레코드로 되돌릴 때 쓰는 대표 계정 ID.
    pub fn canonical_account_id(self) -> &'static str {
        match self {
            AccountCategory::TotalAssets => "ifrs-full_Assets",
            AccountCategory::TotalLiabilities => "ifrs-full_Liabilities",
            AccountCategory::TotalEquity => "ifrs-full_Equity",
            AccountCategory::Revenue => "ifrs-full_Revenue",
            AccountCategory::OperatingIncome => "dart_OperatingIncomeLoss",
            AccountCategory::NetIncome => "ifrs-full_ProfitLoss",
        }
    }

    /// 이 계정이 속하는 재무제표.
    pub fn statement_kind(self) -> StatementKind {
        match self {
            AccountCategory::TotalAssets
            | AccountCategory::TotalLiabilities
            | AccountCategory::TotalEquity => StatementKind::BalanceSheet,
            _ => StatementKind::IncomeStatement,
        }
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for AccountCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// 정규화된 기본 표시명: 표준 카테고리이거나 원본 계정명 그대로.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseDisplayName {
    Category(AccountCategory),
    Other(String),
}

impl BaseDisplayName {
    /// 문자열에서 생성합니다. 카테고리 표시명이면 카테고리로 인식합니다.
    pub fn from_name(name: &str) -> Self {
        match AccountCategory::from_label(name) {
            Some(category) => BaseDisplayName::Category(category),
            None => BaseDisplayName::Other(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BaseDisplayName::Category(c) => c.label(),
            BaseDisplayName::Other(name) => name,
        }
    }

    pub fn category(&self) -> Option<AccountCategory> {
        match self {
            BaseDisplayName::Category(c) => Some(*c),
            BaseDisplayName::Other(_) => None,
        }
    }
}

impl fmt::Display for BaseDisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BaseDisplayName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BaseDisplayName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(BaseDisplayName::from_name(&name))
    }
}

/// 재무제표 구분 (sj_div).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// 재무상태표 (BS)
    BalanceSheet,
    /// 손익계산서 (IS)
    IncomeStatement,
    /// 포괄손익계산서 (CIS)
    ComprehensiveIncome,
    /// 현금흐름표 (CF)
    CashFlow,
    /// 자본변동표 (SCE)
    EquityChanges,
}

impl StatementKind {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "BS" => Some(StatementKind::BalanceSheet),
            "IS" => Some(StatementKind::IncomeStatement),
            "CIS" => Some(StatementKind::ComprehensiveIncome),
            "CF" => Some(StatementKind::CashFlow),
            "SCE" => Some(StatementKind::EquityChanges),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "BS",
            StatementKind::IncomeStatement => "IS",
            StatementKind::ComprehensiveIncome => "CIS",
            StatementKind::CashFlow => "CF",
            StatementKind::EquityChanges => "SCE",
        }
    }

    /// 한글 재무제표명.
    pub fn label(self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "재무상태표",
            StatementKind::IncomeStatement => "손익계산서",
            StatementKind::ComprehensiveIncome => "포괄손익계산서",
            StatementKind::CashFlow => "현금흐름표",
            StatementKind::EquityChanges => "자본변동표",
        }
    }
}

/// 공시 원본 재무 레코드 (계정 1개 × 보고 컨텍스트 1개).
///
/// DART `fnlttMultiAcnt.json` 응답의 필드명을 그대로 사용합니다.
/// 비상장 추출 경로도 같은 형태로 변환됩니다.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFinancialRecord {
    /// 접수번호
    pub rcept_no: String,
    /// 보고서 코드 (11011: 사업보고서)
    pub reprt_code: String,
    /// 사업연도
    pub bsns_year: String,
    /// 고유번호
    pub corp_code: String,
    /// 종목코드
    pub stock_code: String,
    /// 개별/연결 구분 (CFS, OFS)
    pub fs_div: String,
    /// 개별/연결명
    pub fs_nm: String,
    /// 재무제표 구분 (BS, IS ...)
    pub sj_div: String,
    /// 재무제표명
    pub sj_nm: String,
    /// 계정 ID (비어 있거나 모호할 수 있음)
    pub account_id: String,
    /// 계정명
    pub account_nm: String,
    /// 계정 상세
    pub account_detail: String,
    /// 당기명
    pub thstrm_nm: String,
    /// 당기일자 (YYYYMMDD 또는 기간 표기)
    pub thstrm_dt: String,
    /// 당기금액
    pub thstrm_amount: Option<String>,
    /// 전기명
    pub frmtrm_nm: String,
    /// 전기일자
    pub frmtrm_dt: String,
    /// 전기금액
    pub frmtrm_amount: Option<String>,
    /// 전전기명
    pub bfefrmtrm_nm: String,
    /// 전전기일자
    pub bfefrmtrm_dt: String,
    /// 전전기금액
    pub bfefrmtrm_amount: Option<String>,
    /// 계정 정렬 순서
    pub ord: Option<String>,
    /// 통화 단위
    pub currency: String,
}

impl RawFinancialRecord {
    /// 기간별 금액 문자열.
    pub fn amount(&self, period: Period) -> Option<&str> {
        match period {
            Period::Current => self.thstrm_amount.as_deref(),
            Period::Prior => self.frmtrm_amount.as_deref(),
            Period::BeforePrior => self.bfefrmtrm_amount.as_deref(),
        }
    }

    /// 기간별 일자 문자열.
    pub fn date(&self, period: Period) -> &str {
        match period {
            Period::Current => &self.thstrm_dt,
            Period::Prior => &self.frmtrm_dt,
            Period::BeforePrior => &self.bfefrmtrm_dt,
        }
    }

    /// 기간 일자의 앞 4자리 연도. 4자 미만이면 `None`.
    pub fn year_of(&self, period: Period) -> Option<&str> {
        self.date(period).get(..4)
    }

    /// 당기 일자 기준 회계연도.
    pub fn fiscal_year(&self) -> Option<&str> {
        self.year_of(Period::Current)
    }

    /// 세 기간의 금액을 안전 변환한 값.
    pub fn amounts(&self) -> PeriodValues<f64> {
        PeriodValues::from_fn(|p| parse_amount(self.amount(p)))
    }
}

/// 정규화된 재무 항목.
///
/// 원본 레코드에 `base_display_name`과 `display_name`을 더한 형태입니다.
/// 한 레코드 집합 안에서 `display_name`은 항상 유일합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFinancialItem {
    #[serde(flatten)]
    pub record: RawFinancialRecord,
    /// 표준 카테고리 또는 원본 계정명
    pub base_display_name: BaseDisplayName,
    /// 중복 시 계정 ID가 붙은 표시명
    pub display_name: String,
}

impl NormalizedFinancialItem {
    pub fn category(&self) -> Option<AccountCategory> {
        self.base_display_name.category()
    }
}

/// 금액 문자열을 안전하게 f64로 변환합니다.
///
/// 천 단위 구분자(,)를 제거하며 없음/빈 값/숫자가 아닌 값/유한하지 않은 값은 0.0입니다.
///
/// # Examples
///
/// ```
/// use fin_core::parse_amount;
///
/// assert_eq!(parse_amount(Some("1,000,000")), 1_000_000.0);
/// assert_eq!(parse_amount(Some("-")), 0.0);
/// assert_eq!(parse_amount(None), 0.0);
/// ```
pub fn parse_amount(value: Option<&str>) -> f64 {
    let Some(raw) = value else {
        return 0.0;
    };
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_account_id() {
        assert_eq!(
            AccountCategory::from_account_id("ifrs-full_Revenue"),
            Some(AccountCategory::Revenue)
        );
        assert_eq!(
            AccountCategory::from_account_id("dart_ProfitLossAttributableToOwnersOfParent"),
            Some(AccountCategory::NetIncome)
        );
        assert_eq!(AccountCategory::from_account_id("ifrs-full_CurrentAssets"), None);
        assert_eq!(AccountCategory::from_account_id(""), None);
    }

    #[test]
    fn test_canonical_account_id_round_trip() {
        for category in AccountCategory::ALL {
            assert_eq!(
                AccountCategory::from_account_id(category.canonical_account_id()),
                Some(category)
            );
            assert_eq!(AccountCategory::from_label(category.label()), Some(category));
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(Some("1,234,567")), 1_234_567.0);
        assert_eq!(parse_amount(Some(" -42 ")), -42.0);
        assert_eq!(parse_amount(Some("")), 0.0);
        assert_eq!(parse_amount(Some("N/A")), 0.0);
        assert_eq!(parse_amount(Some("NaN")), 0.0);
        assert_eq!(parse_amount(Some("inf")), 0.0);
    }

    #[test]
    fn test_record_deserialize_with_missing_fields() {
        let json = r#"{
            "rcept_no": "20240312000736",
            "bsns_year": "2023",
            "account_nm": "매출액",
            "fs_div": "CFS",
            "sj_div": "IS",
            "thstrm_dt": "2023.01.01 ~ 2023.12.31",
            "thstrm_amount": "258,935,494,000,000",
            "ord": "19"
        }"#;
        let record: RawFinancialRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.account_id, "");
        assert_eq!(record.fiscal_year(), Some("2023"));
        assert_eq!(record.amounts().thstrm, 258_935_494_000_000.0);
        assert_eq!(record.amount(Period::Prior), None);
    }

    #[test]
    fn test_base_display_name_serde() {
        let name = BaseDisplayName::from_name("당기순이익");
        assert_eq!(name.category(), Some(AccountCategory::NetIncome));
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"당기순이익\"");

        let other: BaseDisplayName = serde_json::from_str("\"유동자산\"").unwrap();
        assert_eq!(other, BaseDisplayName::Other("유동자산".to_string()));
    }
}
