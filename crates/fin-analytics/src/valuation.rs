//! PER/PBR 계산.
//!
//! - EPS = 당기순이익 / 상장주식수
//! - BPS = 자본총계 / 상장주식수
//! - PER = 주가 / EPS, PBR = 주가 / BPS
//!
//! EPS(BPS)가 0 이하인 기간은 그 기간만 "N/A"입니다.
//! 계산 중 문제는 에러로 전파하지 않고 "오류" 표기와 사유로 돌려줍니다.

use fin_core::{
    AccountCategory, MarketDataStatus, MarketSnapshot, NormalizedFinancialItem, PeriodValues,
    ValuationCell, ValuationResult,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ratios::AccountAmounts;

pub const NOTE_UNLISTED: &str = "비상장 회사";
pub const NOTE_SHARES_UNKNOWN: &str = "발행주식수 정보 없음 (데이터 제공자 한계)";
pub const NOTE_NO_PRICE_OR_SHARES: &str = "주가 또는 주식수 정보 없음";

/// 주가와 주식수로 PER/PBR을 계산합니다.
///
/// 주가나 주식수가 0 이하이면 모든 기간이 "N/A"입니다.
pub fn calculate_valuation(
    items: &[NormalizedFinancialItem],
    price: f64,
    shares: f64,
) -> ValuationResult {
    if !price.is_finite() || !shares.is_finite() {
        return ValuationResult::error(format!(
            "계산 오류: 유효하지 않은 입력 (주가 {}, 주식수 {})",
            price, shares
        ));
    }
    if price <= 0.0 || shares <= 0.0 {
        return ValuationResult::unavailable(NOTE_NO_PRICE_OR_SHARES);
    }

    let accounts = AccountAmounts::from_items(items);

    let per = PeriodValues::from_fn(|period| {
        let eps = accounts.value(AccountCategory::NetIncome, period) / shares;
        ValuationCell::ratio(price, eps)
    });
    let pbr = PeriodValues::from_fn(|period| {
        let bps = accounts.value(AccountCategory::TotalEquity, period) / shares;
        ValuationCell::ratio(price, bps)
    });

    ValuationResult {
        per,
        pbr,
        note: None,
    }
}

/// 시세 조회 상태에 따라 PER/PBR을 계산합니다.
///
/// - `no_data` → 모두 "N/A", 사유 "비상장 회사"
/// - `error` → 모두 "오류", 사유는 조회 에러 메시지
/// - 주식수 없음 → 모두 "N/A", 데이터 제공자 한계
pub fn valuation_from_snapshot(
    items: &[NormalizedFinancialItem],
    snapshot: &MarketSnapshot,
) -> ValuationResult {
    match snapshot.status {
        MarketDataStatus::NoData => return ValuationResult::unavailable(NOTE_UNLISTED),
        MarketDataStatus::Error => {
            return ValuationResult::error(snapshot.message.clone().unwrap_or_default())
        }
        MarketDataStatus::Success | MarketDataStatus::Partial => {}
    }

    let Some(shares) = snapshot.shares else {
        return ValuationResult::unavailable(NOTE_SHARES_UNKNOWN);
    };
    let Some(price) = snapshot.price else {
        return ValuationResult::unavailable(NOTE_NO_PRICE_OR_SHARES);
    };

    match decimal_to_f64(price) {
        Some(price) => calculate_valuation(items, price, shares as f64),
        None => ValuationResult::error(format!("계산 오류: 주가 변환 실패 ({})", price)),
    }
}

fn decimal_to_f64(value: Decimal) -> Option<f64> {
    value.to_f64().filter(|v| v.is_finite())
}
