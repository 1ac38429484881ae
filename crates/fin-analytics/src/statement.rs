//! 재무제표별 그룹화.
//!
//! 정규화된 항목을 재무상태표/손익계산서/현금흐름표로 나누고 표시명마다
//! 연도 → 금액 문자열을 모읍니다. 엑셀/PDF 같은 내보내기 경로가 공통으로 씁니다.

use fin_core::{NormalizedFinancialItem, Period, RatioSet, StatementKind};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// 표시명 → 연도별 금액 (입력 순서 유지, 같은 표시명은 나중 값으로 교체).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementTable {
    rows: Vec<(String, BTreeMap<String, String>)>,
}

impl StatementTable {
    pub fn insert(&mut self, account: String, values: BTreeMap<String, String>) {
        match self.rows.iter_mut().find(|(name, _)| *name == account) {
            Some(row) => row.1 = values,
            None => self.rows.push((account, values)),
        }
    }

    pub fn get(&self, account: &str) -> Option<&BTreeMap<String, String>> {
        self.rows
            .iter()
            .find(|(name, _)| name == account)
            .map(|(_, values)| values)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for StatementTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (name, values) in &self.rows {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// 회사 하나의 그룹화된 재무제표.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FinancialStatements {
    pub balance_sheet: StatementTable,
    pub income_statement: StatementTable,
    pub cash_flow: StatementTable,
    pub ratios: RatioSet,
}

/// 내보내기용 회사 단위 묶음.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyStatements {
    pub company_name: String,
    pub stock_code: String,
    pub financial_statements: FinancialStatements,
}

/// 항목 하나의 연도 → 금액 문자열. 금액이 없으면 "0".
pub fn year_amounts(item: &NormalizedFinancialItem) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    for period in Period::ALL {
        if let Some(year) = item.record.year_of(period) {
            let amount = item.record.amount(period).unwrap_or("0");
            values.insert(year.to_string(), amount.to_string());
        }
    }
    values
}

/// 항목을 재무제표별로 그룹화합니다. BS/IS/CF 이외의 구분은 건너뜁니다.
pub fn group_statements(items: &[NormalizedFinancialItem], ratios: RatioSet) -> FinancialStatements {
    let mut statements = FinancialStatements {
        ratios,
        ..Default::default()
    };

    for item in items {
        let table = match StatementKind::from_code(&item.record.sj_div) {
            Some(StatementKind::BalanceSheet) => &mut statements.balance_sheet,
            Some(StatementKind::IncomeStatement) => &mut statements.income_statement,
            Some(StatementKind::CashFlow) => &mut statements.cash_flow,
            _ => continue,
        };
        table.insert(item.display_name.clone(), year_amounts(item));
    }

    statements
}
