//! 시장 데이터 (주가, 상장주식수, 가치지표).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 시장 데이터 조회 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketDataStatus {
    /// 주가와 주식수 모두 조회됨
    Success,
    /// 주가만 조회됨 (주식수 없음)
    Partial,
    /// 비상장이거나 데이터 없음
    NoData,
    /// 제공자 오류
    Error,
}

impl MarketDataStatus {
    /// 주가를 사용할 수 있는 상태인지.
    pub fn has_price(self) -> bool {
        matches!(self, MarketDataStatus::Success | MarketDataStatus::Partial)
    }
}

/// 연말 기준 가치지표.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YearEndFundamental {
    pub per: Option<Decimal>,
    pub pbr: Option<Decimal>,
    pub eps: Option<Decimal>,
    pub bps: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
    /// 실제 데이터가 조회된 연도
    pub data_year: Option<i32>,
    /// 실제 데이터 일자 (YYYYMMDD)
    pub data_date: Option<String>,
}

impl YearEndFundamental {
    pub fn is_found(&self) -> bool {
        self.data_year.is_some()
    }
}

/// 종목 시세 스냅샷.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub status: MarketDataStatus,
    /// 조회한 종목코드
    pub stock_code: Option<String>,
    /// 현재가 (최근 영업일 종가)
    pub price: Option<Decimal>,
    /// 전일대비
    pub change: Option<Decimal>,
    /// 등락률 (%)
    pub change_rate: Option<Decimal>,
    pub open_price: Option<Decimal>,
    pub high_price: Option<Decimal>,
    pub low_price: Option<Decimal>,
    /// 전일 종가
    pub prev_close: Option<Decimal>,
    /// 거래량
    pub volume: Option<i64>,
    /// 시가총액
    pub market_cap: Option<Decimal>,
    pub high_52week: Option<Decimal>,
    pub low_52week: Option<Decimal>,
    /// 상장주식수
    pub shares: Option<i64>,
    pub per: Option<Decimal>,
    pub pbr: Option<Decimal>,
    pub eps: Option<Decimal>,
    pub bps: Option<Decimal>,
    /// 배당수익률 (%)
    pub dividend_yield: Option<Decimal>,
    /// 데이터 기준일 (YYYYMMDD)
    pub data_date: Option<String>,
    /// 상태 설명
    pub message: Option<String>,
    /// 연말 가치지표
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_end: Option<YearEndFundamental>,
}

impl MarketSnapshot {
    fn empty(status: MarketDataStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            stock_code: None,
            price: None,
            change: None,
            change_rate: None,
            open_price: None,
            high_price: None,
            low_price: None,
            prev_close: None,
            volume: None,
            market_cap: None,
            high_52week: None,
            low_52week: None,
            shares: None,
            per: None,
            pbr: None,
            eps: None,
            bps: None,
            dividend_yield: None,
            data_date: None,
            message: Some(message.into()),
            year_end: None,
        }
    }

    /// 데이터 없음 (비상장 등).
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::empty(MarketDataStatus::NoData, message)
    }

    /// 제공자 오류. 메시지는 그대로 보존됩니다.
    pub fn error(message: impl Into<String>) -> Self {
        Self::empty(MarketDataStatus::Error, message)
    }
}

/// 0 이하 지표를 없음으로 처리합니다.
pub fn positive_or_none(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| v.is_sign_positive() && !v.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_serialize() {
        assert_eq!(
            serde_json::to_string(&MarketDataStatus::NoData).unwrap(),
            "\"no_data\""
        );
        assert!(MarketDataStatus::Partial.has_price());
        assert!(!MarketDataStatus::Error.has_price());
    }

    #[test]
    fn test_positive_or_none() {
        assert_eq!(positive_or_none(Some(dec!(12.5))), Some(dec!(12.5)));
        assert_eq!(positive_or_none(Some(dec!(0))), None);
        assert_eq!(positive_or_none(Some(dec!(-3.1))), None);
        assert_eq!(positive_or_none(None), None);
    }

    #[test]
    fn test_error_snapshot_keeps_message() {
        let snapshot = MarketSnapshot::error("KRX API 오류 [stk_bydd_trd]: 500");
        assert_eq!(snapshot.status, MarketDataStatus::Error);
        assert_eq!(
            snapshot.message.as_deref(),
            Some("KRX API 오류 [stk_bydd_trd]: 500")
        );
        assert!(snapshot.price.is_none());
    }
}
