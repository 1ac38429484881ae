//! 공시 목록과 공시 문서 추출.

use crate::error::Result;
use fin_analytics::FinancialService;
use serde_json::Value;

pub async fn list_disclosures(service: &FinancialService, corp_code: &str, year: i32) -> Result<Value> {
    let list = service.get_disclosures(corp_code, &year.to_string()).await?;
    tracing::info!(corp_code, count = list.disclosures.len(), "공시 목록 조회 완료");
    Ok(serde_json::to_value(list)?)
}

pub async fn list_financial_documents(
    service: &FinancialService,
    corp_code: &str,
    start_year: Option<i32>,
    end_year: Option<i32>,
) -> Result<Value> {
    let list = service
        .get_financial_documents(corp_code, start_year, end_year)
        .await?;
    Ok(serde_json::to_value(list)?)
}

/// 공시 PDF 재무정보 추출. 실패도 `success: false` 결과로 출력됩니다.
pub async fn extract_document(
    service: &FinancialService,
    corp_code: &str,
    rcept_no: &str,
    report_nm: &str,
) -> Result<Value> {
    let extraction = service.extract_document(corp_code, rcept_no, report_nm).await?;
    if let Some(error) = &extraction.error {
        tracing::warn!(rcept_no, error = %error, "공시 문서 추출 실패");
    }
    Ok(serde_json::to_value(extraction)?)
}
