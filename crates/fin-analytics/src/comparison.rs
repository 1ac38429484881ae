//! 다중 회사 비교 데이터 구성.
//!
//! 회사별로 정규화와 비율 계산을 독립적으로 수행한 뒤, 모든 회사에서
//! 발견된 회계연도(당기 일자 앞 4자리)를 내림차순으로 나열하고
//! 연도마다 입력 순서대로 회사 항목을 배치합니다.
//!
//! 연도 그룹은 표시 순서만 결정합니다. 각 회사 항목에는 연도로 거르지 않은
//! 전체 항목과 전체 비율이 들어갑니다.

use fin_core::{
    parse_amount, CompanyInfo, NormalizedFinancialItem, Period, RatioSet, RawFinancialRecord,
    UNLISTED_STOCK_CODE,
};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::normalizer::normalize_accounts;
use crate::ratios::calculate_ratios;

/// 정규화와 비율 계산을 마친 회사 데이터.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedCompany {
    pub corp_code: String,
    pub prepared_data: Vec<NormalizedFinancialItem>,
    pub ratios: RatioSet,
}

impl PreparedCompany {
    pub fn prepare(corp_code: impl Into<String>, records: Vec<RawFinancialRecord>) -> Self {
        let prepared_data = normalize_accounts(records);
        let ratios = calculate_ratios(&prepared_data);
        Self {
            corp_code: corp_code.into(),
            prepared_data,
            ratios,
        }
    }

    /// 당기 일자에서 읽은 회계연도 집합.
    pub fn fiscal_years(&self) -> BTreeSet<String> {
        self.prepared_data
            .iter()
            .filter_map(|item| item.record.fiscal_year())
            .map(str::to_string)
            .collect()
    }
}

/// 비교 결과의 회사 항목.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub corp_code: String,
    pub corp_name: String,
    pub stock_code: String,
    pub financial_data: Vec<NormalizedFinancialItem>,
    pub ratios: RatioSet,
}

/// 한 회계연도의 비교 항목들 (입력 회사 순서).
#[derive(Debug, Clone, PartialEq)]
pub struct YearComparison {
    pub year: String,
    pub companies: Vec<ComparisonEntry>,
}

/// 연도별 비교 결과 (연도 내림차순).
///
/// JSON으로는 `{"2024": [...], "2023": [...]}` 형태이며 키 순서가 유지됩니다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonByYear {
    pub years: Vec<YearComparison>,
}

impl ComparisonByYear {
    pub fn year_keys(&self) -> Vec<&str> {
        self.years.iter().map(|y| y.year.as_str()).collect()
    }

    pub fn get(&self, year: &str) -> Option<&[ComparisonEntry]> {
        self.years
            .iter()
            .find(|y| y.year == year)
            .map(|y| y.companies.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

impl Serialize for ComparisonByYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.years.len()))?;
        for year in &self.years {
            map.serialize_entry(&year.year, &year.companies)?;
        }
        map.end()
    }
}

/// 회사별 원본 레코드를 정규화하고 비율을 계산합니다. 입력 순서를 유지합니다.
pub fn prepare_comparison_data(
    companies: Vec<(String, Vec<RawFinancialRecord>)>,
) -> Vec<PreparedCompany> {
    companies
        .into_iter()
        .map(|(corp_code, records)| PreparedCompany::prepare(corp_code, records))
        .collect()
}

/// 준비된 회사 데이터를 연도별로 배치합니다.
///
/// 메타데이터가 없는 회사는 회사명에 고유번호, 종목코드에 "N/A"를 씁니다.
pub fn format_comparison_by_year(
    prepared: &[PreparedCompany],
    company_info: &HashMap<String, CompanyInfo>,
) -> ComparisonByYear {
    let all_years: BTreeSet<String> = prepared
        .iter()
        .flat_map(PreparedCompany::fiscal_years)
        .collect();

    let years = all_years
        .into_iter()
        .rev()
        .map(|year| {
            let companies = prepared
                .iter()
                .map(|company| {
                    let info = company_info.get(&company.corp_code);
                    ComparisonEntry {
                        corp_code: company.corp_code.clone(),
                        corp_name: info
                            .map(|i| i.corp_name.clone())
                            .unwrap_or_else(|| company.corp_code.clone()),
                        stock_code: info
                            .map(|i| i.stock_code.clone())
                            .unwrap_or_else(|| UNLISTED_STOCK_CODE.to_string()),
                        financial_data: company.prepared_data.clone(),
                        ratios: company.ratios.clone(),
                    }
                })
                .collect();
            YearComparison { year, companies }
        })
        .collect();

    ComparisonByYear { years }
}

/// 준비와 배치를 한 번에 수행합니다.
pub fn assemble_comparison(
    companies: Vec<(String, Vec<RawFinancialRecord>)>,
    company_info: &HashMap<String, CompanyInfo>,
) -> ComparisonByYear {
    let prepared = prepare_comparison_data(companies);
    format_comparison_by_year(&prepared, company_info)
}

/// 특정 계정의 연도별 금액.
///
/// 세 기간의 일자에서 연도를 읽으며, 같은 연도가 다시 나오면 나중 값이 남습니다.
pub fn account_values_by_year(
    items: &[NormalizedFinancialItem],
    account_name: &str,
) -> BTreeMap<String, f64> {
    let mut result = BTreeMap::new();
    for item in items.iter().filter(|i| i.display_name == account_name) {
        for period in Period::ALL {
            if let Some(year) = item.record.year_of(period) {
                result.insert(year.to_string(), parse_amount(item.record.amount(period)));
            }
        }
    }
    result
}
