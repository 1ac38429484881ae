//! 재무비율 계산.
//!
//! 정규화된 항목에서 6개 고정 비율을 기간별로 계산합니다.
//! 모든 값은 백분율이며 소수점 둘째 자리에서 반올림합니다.
//!
//! 분모가 0이거나 분모 계정이 없으면 해당 기간 값은 0.0입니다.

use fin_core::{
    AccountCategory, BaseDisplayName, NormalizedFinancialItem, Period, PeriodValues,
    RatioKind, RatioSet,
};
use std::collections::HashMap;

/// 기본 표시명 → 기간별 금액.
///
/// 같은 기본 표시명이 여러 번 나오면 마지막 항목이 남습니다.
#[derive(Debug, Clone, Default)]
pub struct AccountAmounts {
    amounts: HashMap<BaseDisplayName, PeriodValues<f64>>,
}

impl AccountAmounts {
    pub fn from_items(items: &[NormalizedFinancialItem]) -> Self {
        let amounts = items
            .iter()
            .map(|item| (item.base_display_name.clone(), item.record.amounts()))
            .collect();
        Self { amounts }
    }

    /// 카테고리의 기간별 금액. 없으면 `None`.
    pub fn category(&self, category: AccountCategory) -> Option<&PeriodValues<f64>> {
        self.amounts.get(&BaseDisplayName::Category(category))
    }

    /// 카테고리의 특정 기간 금액. 없으면 0.0.
    pub fn value(&self, category: AccountCategory, period: Period) -> f64 {
        self.category(category)
            .map(|values| *values.get(period))
            .unwrap_or(0.0)
    }
}

/// 소수점 둘째 자리 반올림.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 백분율 비율. 분모가 0이거나 결과가 유한하지 않으면 0.0.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = round2(numerator / denominator * 100.0);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 6개 비율을 계산합니다.
pub fn calculate_ratios(items: &[NormalizedFinancialItem]) -> RatioSet {
    let accounts = AccountAmounts::from_items(items);
    let mut ratios = RatioSet::new();

    for kind in RatioKind::ALL {
        let values = PeriodValues::from_fn(|period| {
            percentage(
                accounts.value(kind.numerator(), period),
                accounts.value(kind.denominator(), period),
            )
        });
        ratios.insert(kind, values);
    }

    ratios
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize_accounts;
    use fin_core::RawFinancialRecord;

    fn record(account_id: &str, amounts: [&str; 3]) -> RawFinancialRecord {
        RawFinancialRecord {
            account_id: account_id.to_string(),
            thstrm_amount: Some(amounts[0].to_string()),
            frmtrm_amount: Some(amounts[1].to_string()),
            bfefrmtrm_amount: Some(amounts[2].to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_operating_margin() {
        let items = normalize_accounts(vec![
            record("ifrs-full_Revenue", ["1,000,000", "800,000", "600,000"]),
            record("dart_OperatingIncomeLoss", ["100,000", "60,000", "-30,000"]),
        ]);

        let ratios = calculate_ratios(&items);
        let margin = ratios.get(RatioKind::OperatingMargin).unwrap();
        assert_eq!(margin.thstrm, 10.0);
        assert_eq!(margin.frmtrm, 7.5);
        assert_eq!(margin.bfefrmtrm, -5.0);
    }

    #[test]
    fn test_all_six_ratios_present() {
        let ratios = calculate_ratios(&[]);
        assert_eq!(ratios.len(), 6);
        for kind in RatioKind::ALL {
            assert_eq!(*ratios.get(kind).unwrap(), PeriodValues::splat(0.0));
        }
    }

    #[test]
    fn test_zero_denominator_per_period() {
        let items = normalize_accounts(vec![
            record("ifrs-full_Equity", ["0", "500", "-"]),
            record("ifrs-full_Liabilities", ["300", "250", "100"]),
        ]);

        let debt = calculate_ratios(&items)
            .get(RatioKind::DebtToEquity)
            .copied()
            .unwrap();
        assert_eq!(debt.thstrm, 0.0);
        assert_eq!(debt.frmtrm, 50.0);
        assert_eq!(debt.bfefrmtrm, 0.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(percentage(1.0, 3.0), 33.33);
        assert_eq!(percentage(2.0, 3.0), 66.67);
        assert_eq!(percentage(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let items = normalize_accounts(vec![
            record("ifrs-full_Revenue", ["1000", "1000", "1000"]),
            record("ifrs-full_ProfitLoss", ["100", "100", "100"]),
            record("dart_ProfitLossAttributableToOwnersOfParent", ["50", "50", "50"]),
        ]);
        let ratios = calculate_ratios(&items);
        assert_eq!(ratios.value(RatioKind::NetMargin, Period::Current), 5.0);
    }
}
