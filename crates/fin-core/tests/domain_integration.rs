//! 도메인 타입 통합 테스트
//!
//! DART 응답 형태의 JSON이 원본 레코드와 정규화 항목으로 그대로 오가는지 확인합니다.

use fin_core::{
    parse_amount, AccountCategory, BaseDisplayName, NormalizedFinancialItem, Period,
    RawFinancialRecord,
};
use proptest::prelude::*;

const DART_ROW: &str = r#"{
    "rcept_no": "20240312000736",
    "reprt_code": "11011",
    "bsns_year": "2023",
    "corp_code": "00126380",
    "stock_code": "005930",
    "fs_div": "CFS",
    "fs_nm": "연결재무제표",
    "sj_div": "BS",
    "sj_nm": "재무상태표",
    "account_nm": "자산총계",
    "thstrm_nm": "제 55 기",
    "thstrm_dt": "2023.12.31 현재",
    "thstrm_amount": "455,905,980,000,000",
    "frmtrm_nm": "제 54 기",
    "frmtrm_dt": "2022.12.31 현재",
    "frmtrm_amount": "448,424,507,000,000",
    "bfefrmtrm_nm": "제 53 기",
    "bfefrmtrm_dt": "2021.12.31 현재",
    "bfefrmtrm_amount": "426,621,158,000,000",
    "ord": "11",
    "currency": "KRW"
}"#;

#[test]
fn test_dart_row_to_normalized_item_json() {
    let record: RawFinancialRecord = serde_json::from_str(DART_ROW).unwrap();
    assert_eq!(record.fiscal_year(), Some("2023"));
    assert_eq!(record.year_of(Period::BeforePrior), Some("2021"));
    assert_eq!(record.amounts().frmtrm, 448_424_507_000_000.0);

    let item = NormalizedFinancialItem {
        record,
        base_display_name: BaseDisplayName::Category(AccountCategory::TotalAssets),
        display_name: "자산총계".to_string(),
    };

    let json = serde_json::to_value(&item).unwrap();
    // 원본 필드와 표시명이 같은 레벨에 있어야 합니다
    assert_eq!(json["account_nm"], "자산총계");
    assert_eq!(json["base_display_name"], "자산총계");
    assert_eq!(json["display_name"], "자산총계");
    assert_eq!(json["thstrm_amount"], "455,905,980,000,000");

    let back: NormalizedFinancialItem = serde_json::from_value(json).unwrap();
    assert_eq!(back.category(), Some(AccountCategory::TotalAssets));
    assert_eq!(back.record.rcept_no, "20240312000736");
}

proptest! {
    #[test]
    fn prop_parse_amount_is_always_finite(s in "\\PC*") {
        let value = parse_amount(Some(&s));
        prop_assert!(value.is_finite());
    }

    #[test]
    fn prop_parse_amount_ignores_thousands_separators(n in -1_000_000_000_000i64..1_000_000_000_000i64) {
        let plain = n.to_string();
        let negative = n < 0;
        let digits = plain.trim_start_matches('-');
        let mut grouped = String::new();
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if negative {
            grouped.insert(0, '-');
        }
        prop_assert_eq!(parse_amount(Some(&grouped)), n as f64);
    }
}
