//! 정규화/비율/밸류에이션 불변식 속성 테스트.

use fin_analytics::{calculate_ratios, calculate_valuation, normalize_accounts, renormalize};
use fin_core::{Period, RatioKind, RawFinancialRecord, ValuationCell};
use proptest::prelude::*;
use std::collections::HashSet;

const ACCOUNTS: [(&str, &str); 8] = [
    ("ifrs-full_Revenue", "매출액"),
    ("dart_OperatingIncomeLoss", "영업이익"),
    ("ifrs-full_ProfitLoss", "당기순이익(손실)"),
    ("ifrs-full_Assets", "자산총계"),
    ("ifrs-full_Liabilities", "부채총계"),
    ("ifrs-full_Equity", "자본총계"),
    ("", "연결당기순이익"),
    ("-표준계정코드 미사용-", "기타영업수익"),
];

fn arb_record() -> impl Strategy<Value = RawFinancialRecord> {
    (0..ACCOUNTS.len(), -1_000_000i64..1_000_000, 0u8..4).prop_map(|(idx, amount, suffix)| {
        let (account_id, account_nm) = ACCOUNTS[idx];
        RawFinancialRecord {
            account_id: if account_id.is_empty() {
                String::new()
            } else {
                format!("{}{}", account_id, "_x".repeat(usize::from(suffix) % 2))
            },
            account_nm: account_nm.to_string(),
            thstrm_dt: "2024.12.31 현재".to_string(),
            thstrm_amount: Some(amount.to_string()),
            frmtrm_amount: Some("-".to_string()),
            ..Default::default()
        }
    })
}

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(records in prop::collection::vec(arb_record(), 0..12)) {
        let once = normalize_accounts(records);
        let twice = renormalize(once.clone());
        prop_assert_eq!(once, twice);
    }

    // 식별자가 같은 레코드(병합된 연도, 빈 식별자)는 같은 표시명을 가짐
    #[test]
    fn prop_display_names_unique_when_account_ids_distinct(
        records in prop::collection::vec(arb_record(), 0..12)
    ) {
        let ids: HashSet<String> = records.iter().map(|r| r.account_id.clone()).collect();
        let distinct_ids = ids.len() == records.len() && !ids.contains("");

        let items = normalize_accounts(records);
        let names: HashSet<&str> = items.iter().map(|i| i.display_name.as_str()).collect();
        if distinct_ids {
            prop_assert_eq!(names.len(), items.len());
        }
    }

    #[test]
    fn prop_ratios_finite(records in prop::collection::vec(arb_record(), 0..12)) {
        let ratios = calculate_ratios(&normalize_accounts(records));
        prop_assert_eq!(ratios.len(), RatioKind::ALL.len());
        for (_, values) in ratios.iter() {
            for (_, value) in values.iter() {
                prop_assert!(value.is_finite());
            }
        }
    }

    #[test]
    fn prop_non_positive_eps_is_not_available(
        net_income in -1_000_000i64..=0,
        price in 1.0f64..1_000_000.0,
        shares in 1.0f64..1_000_000.0,
    ) {
        let items = normalize_accounts(vec![RawFinancialRecord {
            account_id: "ifrs-full_ProfitLoss".to_string(),
            account_nm: "당기순이익".to_string(),
            thstrm_amount: Some(net_income.to_string()),
            ..Default::default()
        }]);

        let result = calculate_valuation(&items, price, shares);
        prop_assert_eq!(*result.per.get(Period::Current), ValuationCell::NotAvailable);
        prop_assert_eq!(result.per.get(Period::Current).to_string(), "N/A");
    }
}

#[test]
fn test_zero_denominator_yields_zero_ratio() {
    let items = normalize_accounts(vec![
        RawFinancialRecord {
            account_id: "ifrs-full_Revenue".to_string(),
            account_nm: "매출액".to_string(),
            thstrm_amount: Some("0".to_string()),
            ..Default::default()
        },
        RawFinancialRecord {
            account_id: "dart_OperatingIncomeLoss".to_string(),
            account_nm: "영업이익".to_string(),
            thstrm_amount: Some("5,000".to_string()),
            ..Default::default()
        },
    ]);

    let ratios = calculate_ratios(&items);
    assert_eq!(ratios.value(RatioKind::OperatingMargin, Period::Current), 0.0);
    assert_eq!(ratios.value(RatioKind::DebtToEquity, Period::Current), 0.0);
}
