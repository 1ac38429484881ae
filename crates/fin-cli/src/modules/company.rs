//! 회사 검색/목록 갱신.

use crate::error::Result;
use fin_analytics::FinancialService;
use serde_json::{json, Value};

/// 회사 검색
pub async fn search_companies(service: &FinancialService, keyword: &str) -> Result<Value> {
    let companies = service.search_companies(keyword).await?;
    tracing::info!(keyword, count = companies.len(), "회사 검색 완료");

    Ok(json!({
        "keyword": keyword,
        "count": companies.len(),
        "companies": companies,
    }))
}

/// DART 회사 목록 다시 받기
pub async fn refresh_companies(service: &FinancialService) -> Result<Value> {
    let count = service.refresh_companies().await?;
    Ok(json!({ "count": count }))
}
