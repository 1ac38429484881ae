//! 데이터 Provider 모듈.
//!
//! 외부 소스에서 데이터를 가져오는 Provider들을 정의합니다.
//!
//! ## DART OpenAPI
//! - `DartClient`: 회사 목록, 주요계정 재무제표, 공시 목록, 공시 원문/PDF
//!
//! ## KRX Open API
//! - `KrxApiClient`: KRX Open API 클라이언트 (인증키 필요)
//! - `KrxMarketData`: 종목 시세 스냅샷, 연말 가치지표, 회사명 → 종목코드 검색

pub mod dart;
pub mod krx_api;

use async_trait::async_trait;
use fin_core::{CompanyInfo, Disclosure, FsDiv, MarketSnapshot, RawFinancialRecord, YearEndFundamental};
use std::path::Path;

use crate::error::Result;

pub use dart::DartClient;
pub use krx_api::{KrxApiClient, KrxDailyTrade, KrxMarketData, KrxStockInfo, KrxValuation};

/// 회사 고유번호 목록 소스.
#[async_trait]
pub trait CorpCodeSource: Send + Sync {
    /// 전체 회사 목록을 내려받습니다.
    async fn download_corp_codes(&self) -> Result<Vec<CompanyInfo>>;
}

/// 공시 Provider.
///
/// 데이터가 없는 경우는 에러가 아니라 빈 목록입니다.
#[async_trait]
pub trait DisclosureProvider: Send + Sync {
    /// 사업보고서 주요계정 (요청한 연결/별도 구분만).
    async fn fetch_financial_statements(
        &self,
        corp_code: &str,
        bsns_year: &str,
        fs_div: FsDiv,
    ) -> Result<Vec<RawFinancialRecord>>;

    /// 해당 연도 공시 목록.
    async fn list_disclosures(&self, corp_code: &str, bsns_year: &str) -> Result<Vec<Disclosure>>;

    /// 사업보고서/감사보고서 (정정/취소/철회/연장 공시 제외).
    async fn search_report_documents(
        &self,
        corp_code: &str,
        bsns_year: &str,
    ) -> Result<Vec<Disclosure>> {
        let disclosures = self.list_disclosures(corp_code, bsns_year).await?;
        Ok(disclosures
            .into_iter()
            .filter(Disclosure::is_annual_report)
            .collect())
    }

    /// 재무정보가 포함된 공시 문서 목록 (접수일자 내림차순).
    async fn list_financial_documents(
        &self,
        corp_code: &str,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> Result<Vec<Disclosure>>;

    /// 공시 원문(HTML/XML)을 파일로 저장합니다.
    async fn download_document(&self, rcept_no: &str, save_path: &Path) -> Result<()>;

    /// 공시 PDF를 파일로 저장합니다.
    async fn download_document_pdf(&self, rcept_no: &str, save_path: &Path) -> Result<()>;
}

/// 시장 데이터 Provider.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 종목 시세 스냅샷. 실패는 `MarketDataStatus::Error` 상태로 표현됩니다.
    async fn snapshot(&self, stock_code: &str) -> MarketSnapshot;

    /// 연말 가치지표 (요청 연도부터 최대 2년 전까지).
    async fn year_end_fundamental(&self, stock_code: &str, year: i32) -> YearEndFundamental;

    /// 회사명으로 종목코드를 찾습니다.
    async fn find_stock_code_by_name(&self, corp_name: &str) -> Result<Option<String>>;
}
