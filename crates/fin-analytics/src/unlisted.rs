//! 비상장 회사 재무정보 추출 파이프라인.
//!
//! DART 주요계정 API에 데이터가 없는 비상장 회사는 공시 원문에서 재무제표를
//! 직접 뽑아야 합니다.
//!
//! # 단계
//!
//! 1. 대상 연도 사업보고서/감사보고서 검색 (정정 공시 제외)
//! 2. 감사보고서 우선 선택, 없으면 사업보고서
//! 3. 원문 HTML을 임시 파일로 다운로드
//! 4. 재무제표 키워드가 있는 테이블만 텍스트로 변환 (최대 10개)
//! 5. LLM으로 6개 표준 계정 × 3개 기간 추출
//! 6. 상장사와 같은 원본 레코드 형태로 변환 후 정규화/비율 계산
//! 7. 임시 파일 삭제 (성공/실패 무관)

use fin_core::{
    AccountCategory, Disclosure, NormalizedFinancialItem, RatioSet, RawFinancialRecord,
    ReportKind,
};
use fin_data::document::{decode_document, extract_financial_tables};
use fin_data::{DisclosureProvider, ExtractedFinancials, FinancialTextExtractor};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempPath;
use tracing::{info, warn, Instrument};

use crate::error::{ExtractionFailure, PipelineError};
use crate::normalizer::normalize_accounts;
use crate::ratios::calculate_ratios;

/// 비상장 추출 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnlistedExtraction {
    pub success: bool,
    pub items: Vec<NormalizedFinancialItem>,
    pub ratios: RatioSet,
    /// 추출에 사용한 보고서
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Disclosure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ExtractionFailure>,
}

impl UnlistedExtraction {
    fn succeeded(items: Vec<NormalizedFinancialItem>, ratios: RatioSet, report: Disclosure) -> Self {
        Self {
            success: true,
            items,
            ratios,
            report: Some(report),
            error: None,
            failure: None,
        }
    }

    fn failed(err: &PipelineError, report: Option<Disclosure>) -> Self {
        Self {
            success: false,
            items: Vec::new(),
            ratios: RatioSet::new(),
            report,
            error: Some(err.to_string()),
            failure: Some(err.failure()),
        }
    }
}

/// 비상장 회사 추출 파이프라인.
pub struct UnlistedFinancialPipeline {
    disclosures: Arc<dyn DisclosureProvider>,
    extractor: Arc<dyn FinancialTextExtractor>,
    work_dir: PathBuf,
}

impl UnlistedFinancialPipeline {
    pub fn new(
        disclosures: Arc<dyn DisclosureProvider>,
        extractor: Arc<dyn FinancialTextExtractor>,
    ) -> Self {
        Self {
            disclosures,
            extractor,
            work_dir: std::env::temp_dir(),
        }
    }

    /// 임시 문서를 저장할 디렉토리.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// 재무정보를 추출합니다. 실패해도 에러를 반환하지 않고 `success: false` 결과를 돌려줍니다.
    pub async fn extract(
        &self,
        corp_code: &str,
        corp_name: &str,
        bsns_year: &str,
    ) -> UnlistedExtraction {
        let span = fin_core::company_span!("unlisted_extraction", corp_code, bsns_year);
        async {
            info!(corp_name, "비상장 재무정보 추출 시작");

            let report = match self.select_report(corp_code, bsns_year).await {
                Ok(report) => report,
                Err(e) => {
                    warn!(error = %e, "추출 대상 보고서 없음");
                    return UnlistedExtraction::failed(&e, None);
                }
            };

            match self.extract_from_report(&report, corp_code, corp_name, bsns_year).await {
                Ok(items) => {
                    let ratios = calculate_ratios(&items);
                    info!(items = items.len(), "비상장 재무정보 추출 완료");
                    UnlistedExtraction::succeeded(items, ratios, report)
                }
                Err(e) => {
                    warn!(error = %e, rcept_no = %report.rcept_no, "비상장 재무정보 추출 실패");
                    UnlistedExtraction::failed(&e, Some(report))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn select_report(&self, corp_code: &str, bsns_year: &str) -> Result<Disclosure, PipelineError> {
        let reports = self
            .disclosures
            .search_report_documents(corp_code, bsns_year)
            .await
            .map_err(|e| PipelineError::Download(e.into()))?;

        let report = select_report(&reports).cloned().ok_or(PipelineError::NoReport)?;
        info!(report_nm = %report.report_nm, rcept_no = %report.rcept_no, "보고서 선택");
        Ok(report)
    }

    async fn extract_from_report(
        &self,
        report: &Disclosure,
        corp_code: &str,
        corp_name: &str,
        bsns_year: &str,
    ) -> Result<Vec<NormalizedFinancialItem>, PipelineError> {
        let year = parse_year(bsns_year)?;
        let path = scratch_path(
            &self.work_dir,
            &format!("{}_{}_{}_", corp_code, bsns_year, report.rcept_no),
            ".html",
        )?;

        self.disclosures
            .download_document(&report.rcept_no, &path)
            .await
            .map_err(|e| PipelineError::Download(e.into()))?;

        let bytes = tokio::fs::read(&path).await?;
        let html = decode_document(&bytes);
        let tables = extract_financial_tables(&html).map_err(|e| PipelineError::Extraction(e.into()))?;
        if tables.is_empty() {
            return Err(PipelineError::NoTables);
        }

        let extracted = self
            .extractor
            .extract_from_tables(&tables, corp_name, bsns_year)
            .await
            .map_err(PipelineError::Extraction)?;

        let records = to_standard_records(&extracted, year, "", "");
        Ok(normalize_accounts(records))
    }
}

/// 감사보고서를 우선하고, 없으면 사업보고서. 같은 종류는 목록 순서상 첫 번째.
pub fn select_report(reports: &[Disclosure]) -> Option<&Disclosure> {
    reports
        .iter()
        .find(|r| r.report_kind() == Some(ReportKind::Audit))
        .or_else(|| {
            reports
                .iter()
                .find(|r| r.report_kind() == Some(ReportKind::Business))
        })
}

/// LLM 추출 결과를 DART 주요계정 레코드 형태로 변환합니다.
///
/// 기간 일자는 사업연도 기준 12월 31일로 채웁니다.
pub fn to_standard_records(
    extracted: &ExtractedFinancials,
    bsns_year: i32,
    rcept_no: &str,
    corp_code: &str,
) -> Vec<RawFinancialRecord> {
    extracted
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let category = AccountCategory::from_label(&item.account_nm);
            let statement = category
                .map(AccountCategory::statement_kind)
                .unwrap_or(fin_core::StatementKind::IncomeStatement);

            RawFinancialRecord {
                rcept_no: rcept_no.to_string(),
                reprt_code: "11011".to_string(),
                bsns_year: bsns_year.to_string(),
                corp_code: corp_code.to_string(),
                sj_div: statement.code().to_string(),
                sj_nm: statement.label().to_string(),
                account_id: category
                    .map(|c| c.canonical_account_id().to_string())
                    .unwrap_or_default(),
                account_nm: item.account_nm.clone(),
                account_detail: "-".to_string(),
                thstrm_nm: format!("{}년", bsns_year),
                thstrm_dt: format!("{}1231", bsns_year),
                thstrm_amount: Some(item.thstrm_amount.clone()),
                frmtrm_nm: format!("{}년", bsns_year - 1),
                frmtrm_dt: format!("{}1231", bsns_year - 1),
                frmtrm_amount: Some(item.frmtrm_amount.clone()),
                bfefrmtrm_nm: format!("{}년", bsns_year - 2),
                bfefrmtrm_dt: format!("{}1231", bsns_year - 2),
                bfefrmtrm_amount: Some(item.bfefrmtrm_amount.clone()),
                ord: Some((idx + 1).to_string()),
                currency: "KRW".to_string(),
                ..Default::default()
            }
        })
        .collect()
}

pub(crate) fn parse_year(bsns_year: &str) -> Result<i32, PipelineError> {
    bsns_year
        .trim()
        .parse::<i32>()
        .map_err(|_| PipelineError::InvalidYear(bsns_year.to_string()))
}

/// drop 시 삭제되는 임시 파일 경로.
pub(crate) fn scratch_path(dir: &Path, prefix: &str, suffix: &str) -> Result<TempPath, PipelineError> {
    std::fs::create_dir_all(dir)?;
    let file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .tempfile_in(dir)?;
    Ok(file.into_temp_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fin_data::ExtractedItem;

    fn disclosure(report_nm: &str, rcept_no: &str) -> Disclosure {
        Disclosure {
            report_nm: report_nm.to_string(),
            rcept_no: rcept_no.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_select_report_prefers_audit() {
        let reports = vec![
            disclosure("사업보고서 (2023.12)", "1"),
            disclosure("감사보고서 (2023.12)", "2"),
            disclosure("감사보고서 (2023.12)", "3"),
        ];
        assert_eq!(select_report(&reports).unwrap().rcept_no, "2");

        let business_only = vec![disclosure("사업보고서 (2023.12)", "1")];
        assert_eq!(select_report(&business_only).unwrap().rcept_no, "1");

        assert!(select_report(&[disclosure("반기보고서", "9")]).is_none());
    }

    #[test]
    fn test_standard_records() {
        let extracted = ExtractedFinancials {
            items: vec![
                ExtractedItem {
                    account_nm: "자본총계".to_string(),
                    thstrm_amount: "500".to_string(),
                    frmtrm_amount: "400".to_string(),
                    bfefrmtrm_amount: "0".to_string(),
                },
                ExtractedItem {
                    account_nm: "영업이익".to_string(),
                    thstrm_amount: "50".to_string(),
                    frmtrm_amount: "40".to_string(),
                    bfefrmtrm_amount: "30".to_string(),
                },
            ],
        };

        let records = to_standard_records(&extracted, 2023, "", "");

        assert_eq!(records[0].sj_div, "BS");
        assert_eq!(records[0].sj_nm, "재무상태표");
        assert_eq!(records[0].account_id, "ifrs-full_Equity");
        assert_eq!(records[0].thstrm_dt, "20231231");
        assert_eq!(records[0].bfefrmtrm_nm, "2021년");
        assert_eq!(records[1].sj_div, "IS");
        assert_eq!(records[1].account_id, "dart_OperatingIncomeLoss");
        assert_eq!(records[1].ord.as_deref(), Some("2"));
        assert_eq!(records[1].currency, "KRW");
    }

    #[test]
    fn test_scratch_path_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_path(dir.path(), "00000001_2023_", ".html").unwrap();
        let kept: PathBuf = path.to_path_buf();
        assert!(kept.exists());
        drop(path);
        assert!(!kept.exists());
    }
}
