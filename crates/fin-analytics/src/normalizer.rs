//! 계정 정규화.
//!
//! 회사마다 다른 계정 ID를 6개 표준 카테고리로 모으고, 같은 카테고리에
//! 여러 레코드가 모이면 표시명에 계정 ID를 붙여 구분합니다.
//!
//! # 매핑 규칙
//!
//! 1. 알려진 계정 ID → 표준 카테고리
//! 2. 계정명에 "당기순이익" 포함 → 당기순이익
//! 3. 그 외 → 원본 계정명 그대로
//!
//! # 예시
//!
//! ```rust
//! use fin_analytics::normalize_accounts;
//! use fin_core::RawFinancialRecord;
//!
//! let records = vec![RawFinancialRecord {
//!     account_id: "ifrs-full_Revenue".to_string(),
//!     account_nm: "영업수익".to_string(),
//!     ..Default::default()
//! }];
//!
//! let items = normalize_accounts(records);
//! assert_eq!(items[0].display_name, "매출액");
//! ```

use fin_core::{AccountCategory, BaseDisplayName, NormalizedFinancialItem, RawFinancialRecord};
use std::collections::HashMap;

const NET_INCOME_KEYWORD: &str = "당기순이익";

/// 레코드 하나의 기본 표시명을 결정합니다.
pub fn classify_account(record: &RawFinancialRecord) -> BaseDisplayName {
    if let Some(category) = AccountCategory::from_account_id(&record.account_id) {
        return BaseDisplayName::Category(category);
    }
    if record.account_nm.contains(NET_INCOME_KEYWORD) {
        return BaseDisplayName::Category(AccountCategory::NetIncome);
    }
    BaseDisplayName::from_name(&record.account_nm)
}

/// 레코드 목록을 정규화합니다. 입력 순서는 유지됩니다.
///
/// 같은 기본 표시명을 가진 레코드가 둘 이상이면 모두
/// `"{기본 표시명} ({account_id})"` 형태의 표시명을 받습니다.
/// 계정 ID가 비어 있어도 접미사 ` ()`는 그대로 붙습니다.
pub fn normalize_accounts(records: Vec<RawFinancialRecord>) -> Vec<NormalizedFinancialItem> {
    let bases: Vec<BaseDisplayName> = records.iter().map(classify_account).collect();

    let mut counts: HashMap<&BaseDisplayName, usize> = HashMap::new();
    for base in &bases {
        *counts.entry(base).or_insert(0) += 1;
    }
    let duplicated: Vec<bool> = bases.iter().map(|b| counts[b] > 1).collect();

    records
        .into_iter()
        .zip(bases)
        .zip(duplicated)
        .map(|((record, base), is_duplicate)| {
            let display_name = if is_duplicate {
                format!("{} ({})", base, record.account_id)
            } else {
                base.to_string()
            };
            NormalizedFinancialItem {
                record,
                base_display_name: base,
                display_name,
            }
        })
        .collect()
}

/// 이미 정규화된 항목을 원본 레코드 기준으로 다시 정규화합니다.
pub fn renormalize(items: Vec<NormalizedFinancialItem>) -> Vec<NormalizedFinancialItem> {
    normalize_accounts(items.into_iter().map(|item| item.record).collect())
}
