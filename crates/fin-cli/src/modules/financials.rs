//! 재무정보, 비교, 밸류에이션, 시세.

use crate::error::Result;
use fin_analytics::FinancialService;
use fin_core::{FsDiv, ResultStatus};
use serde_json::{json, Value};

/// 사업연도 재무정보. `grouped`면 재무제표별로 묶은 형태입니다.
pub async fn financials(
    service: &FinancialService,
    corp_code: &str,
    year: i32,
    fs_div: FsDiv,
    grouped: bool,
) -> Result<Value> {
    let bsns_year = year.to_string();

    if grouped {
        let statements = service.get_statements(corp_code, &bsns_year, fs_div).await?;
        return Ok(serde_json::to_value(statements)?);
    }

    let result = service.get_financial_data(corp_code, &bsns_year, fs_div).await?;
    match result.status() {
        ResultStatus::Failed => {
            tracing::warn!(corp_code, error = ?result.message(), "재무정보 조회 실패")
        }
        ResultStatus::Empty => tracing::info!(corp_code, year, "재무 데이터 없음"),
        ResultStatus::Success => {}
    }

    let mut value = serde_json::to_value(&result)?;
    if let (Some(message), Some(object)) = (result.message(), value.as_object_mut()) {
        object.insert("message".to_string(), Value::String(message));
    }
    Ok(value)
}

/// 다중 회사 비교 (year, year-1, year-2)
pub async fn compare(
    service: &FinancialService,
    corp_codes: &[String],
    year: i32,
    fs_div: FsDiv,
) -> Result<Value> {
    let comparison = service.compare_companies(corp_codes, year, fs_div).await?;
    Ok(json!({
        "bsns_year": year,
        "fs_div": fs_div,
        "years": comparison.year_keys(),
        "comparison": comparison,
    }))
}

/// PER/PBR
pub async fn valuation(
    service: &FinancialService,
    corp_code: &str,
    year: i32,
    fs_div: FsDiv,
) -> Result<Value> {
    let report = service
        .get_valuation(corp_code, &year.to_string(), fs_div)
        .await?;
    Ok(serde_json::to_value(report)?)
}

/// 종목 시세
pub async fn stock(
    service: &FinancialService,
    stock_code: &str,
    corp_name: Option<&str>,
    year: Option<i32>,
) -> Result<Value> {
    let info = service.get_stock_info(stock_code, corp_name, year).await;
    Ok(serde_json::to_value(info)?)
}
