//! 재무정보 조회 서비스.
//!
//! 회사 목록, 공시 Provider, 시세 Provider, 비상장/문서 추출 파이프라인을 묶어
//! 호출자(CLI 등)가 쓰는 조회 작업을 제공합니다.
//!
//! 데이터가 없는 경우는 에러가 아니라 빈 결과이며, 외부 협력자 실패는
//! 원본 메시지를 보존한 `FinError`로 전달됩니다.

use fin_core::{
    AppConfig, CompanyInfo, Disclosure, FinError, FinResult, FinancialStatementResult, FsDiv,
    MarketSnapshot, RatioSet, RawFinancialRecord, ResultStatus, ValuationResult,
    UNLISTED_STOCK_CODE,
};
use fin_data::{
    CompanyDirectory, DartClient, DisclosureProvider, DocumentParser, FinancialTextExtractor,
    KrxMarketData, LlmFinancialExtractor, MarketDataProvider, UpstageClient,
};
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn, Instrument};

use crate::briefing::{BriefingSubject, CompanyBriefingData};
use crate::comparison::{assemble_comparison, ComparisonByYear};
use crate::document_pipeline::{DocumentExtraction, DocumentFinancialPipeline, DocumentRequest};
use crate::error::{ExtractionFailure, PipelineError};
use crate::normalizer::normalize_accounts;
use crate::ratios::calculate_ratios;
use crate::statement::{group_statements, CompanyStatements};
use crate::stats::FetchStats;
use crate::stock_display::{format_stock_display, StockDisplay};
use crate::unlisted::UnlistedFinancialPipeline;
use crate::valuation::valuation_from_snapshot;

/// 비상장 추출 결과의 출처 표기.
pub const UNLISTED_SOURCE: &str = "사업보고서/감사보고서 (AI 파싱)";
const UNLISTED_FS_DIV: &str = "N/A";
const UNLISTED_PIPELINE_MISSING: &str =
    "Upstage API 키가 설정되지 않았습니다. 비상장 기업 재무정보를 조회할 수 없습니다.";
const MARKET_DATA_MISSING: &str = "KRX API 키가 설정되지 않았습니다.";

/// 시세 조회 결과 (원본 + 표시용).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockInfo {
    #[serde(flatten)]
    pub snapshot: MarketSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<StockDisplay>,
}

/// PER/PBR 조회 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationReport {
    pub corp_code: String,
    pub corp_name: String,
    pub stock_code: String,
    pub bsns_year: String,
    pub valuation: ValuationResult,
    pub stock: StockInfo,
}

/// 회사 공시 목록.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisclosureList {
    pub corp_code: String,
    pub corp_name: String,
    pub stock_code: String,
    pub disclosures: Vec<Disclosure>,
}

/// 재무 조회 서비스.
pub struct FinancialService {
    directory: Arc<CompanyDirectory>,
    disclosures: Arc<dyn DisclosureProvider>,
    market: Option<Arc<dyn MarketDataProvider>>,
    unlisted: Option<UnlistedFinancialPipeline>,
    documents: Option<DocumentFinancialPipeline>,
}

impl FinancialService {
    pub fn new(directory: Arc<CompanyDirectory>, disclosures: Arc<dyn DisclosureProvider>) -> Self {
        Self {
            directory,
            disclosures,
            market: None,
            unlisted: None,
            documents: None,
        }
    }

    pub fn with_market_data(mut self, market: Arc<dyn MarketDataProvider>) -> Self {
        self.market = Some(market);
        self
    }

    pub fn with_unlisted_pipeline(mut self, pipeline: UnlistedFinancialPipeline) -> Self {
        self.unlisted = Some(pipeline);
        self
    }

    pub fn with_document_pipeline(mut self, pipeline: DocumentFinancialPipeline) -> Self {
        self.documents = Some(pipeline);
        self
    }

    /// 설정에서 서비스를 구성합니다.
    ///
    /// DART 키는 필수입니다. KRX 키가 없으면 시세 조회가, Upstage 키가 없으면
    /// 비상장/문서 추출이 비활성화됩니다.
    pub fn from_config(config: &AppConfig) -> FinResult<Self> {
        let dart = Arc::new(DartClient::from_config(&config.dart)?);

        let mut directory = CompanyDirectory::new(dart.clone());
        if let Some(path) = &config.cache.company_cache_path {
            directory = directory.with_cache_path(path.clone());
        }

        let mut service = Self::new(Arc::new(directory), dart.clone());

        if config.krx.api_key.is_some() {
            service = service.with_market_data(Arc::new(KrxMarketData::from_config(&config.krx)?));
        } else {
            warn!("KRX API 키 없음: 시세 조회 비활성화");
        }

        if config.llm.upstage_api_key.is_some() {
            let upstage = UpstageClient::from_config(&config.llm)?;
            let extractor: Arc<dyn FinancialTextExtractor> = Arc::new(LlmFinancialExtractor::new(
                upstage.clone(),
                config.llm.extraction_timeout(),
            ));
            let parser: Arc<dyn DocumentParser> = Arc::new(upstage);

            service = service
                .with_unlisted_pipeline(UnlistedFinancialPipeline::new(
                    dart.clone(),
                    extractor.clone(),
                ))
                .with_document_pipeline(DocumentFinancialPipeline::new(
                    dart,
                    Some(parser),
                    extractor,
                ));
        } else {
            warn!("Upstage API 키 없음: 비상장/문서 추출 비활성화");
        }

        Ok(service)
    }

    pub fn directory(&self) -> &CompanyDirectory {
        &self.directory
    }

    // ==================== 회사 ====================

    pub async fn search_companies(&self, keyword: &str) -> FinResult<Vec<CompanyInfo>> {
        self.directory.search(keyword).await
    }

    pub async fn get_company(&self, corp_code: &str) -> FinResult<CompanyInfo> {
        self.directory.get_by_code(corp_code).await
    }

    /// 회사 목록을 다시 내려받고 회사 수를 반환합니다.
    pub async fn refresh_companies(&self) -> FinResult<usize> {
        Ok(self.directory.refresh().await?.len())
    }

    // ==================== 재무정보 ====================

    /// 회사 한 곳의 사업연도 재무정보.
    ///
    /// 상장사는 DART 주요계정, 비상장사는 공시 원문 추출 결과를 정규화합니다.
    pub async fn get_financial_data(
        &self,
        corp_code: &str,
        bsns_year: &str,
        fs_div: FsDiv,
    ) -> FinResult<FinancialStatementResult> {
        let company = self.directory.get_by_code(corp_code).await?;
        let span = fin_core::company_span!("financial_data", corp_code, bsns_year);

        async {
            if company.is_listed() {
                self.listed_financial_data(company, bsns_year, fs_div).await
            } else {
                Ok(self.unlisted_financial_data(company, bsns_year).await)
            }
        }
        .instrument(span)
        .await
    }

    async fn listed_financial_data(
        &self,
        company: CompanyInfo,
        bsns_year: &str,
        fs_div: FsDiv,
    ) -> FinResult<FinancialStatementResult> {
        let records = self
            .disclosures
            .fetch_financial_statements(&company.corp_code, bsns_year, fs_div)
            .await?;

        if records.is_empty() {
            info!(fs_div = %fs_div, "재무 데이터 없음");
        }

        let items = normalize_accounts(records);
        let ratios = calculate_ratios(&items);
        info!(items = items.len(), "상장사 재무정보 조회 완료");

        Ok(FinancialStatementResult {
            corp_code: company.corp_code,
            corp_name: company.corp_name,
            stock_code: company.stock_code,
            bsns_year: bsns_year.to_string(),
            fs_div: fs_div.code().to_string(),
            items,
            ratios,
            is_listed: true,
            source: None,
            error: None,
        })
    }

    async fn unlisted_financial_data(
        &self,
        company: CompanyInfo,
        bsns_year: &str,
    ) -> FinancialStatementResult {
        let mut result = FinancialStatementResult {
            corp_code: company.corp_code.clone(),
            corp_name: company.corp_name.clone(),
            stock_code: company.stock_code.clone(),
            bsns_year: bsns_year.to_string(),
            fs_div: UNLISTED_FS_DIV.to_string(),
            items: Vec::new(),
            ratios: RatioSet::new(),
            is_listed: false,
            source: None,
            error: None,
        };

        let Some(pipeline) = &self.unlisted else {
            warn!("비상장 추출 파이프라인 없음");
            result.error = Some(UNLISTED_PIPELINE_MISSING.to_string());
            return result;
        };

        let extraction = pipeline
            .extract(&company.corp_code, &company.corp_name, bsns_year)
            .await;

        if extraction.success {
            result.items = extraction.items;
            result.ratios = extraction.ratios;
            result.source = Some(UNLISTED_SOURCE.to_string());
        } else if extraction.failure == Some(ExtractionFailure::NoReport) {
            result.error = Some(PipelineError::NoReport.to_string());
        } else {
            result.error = Some(format!(
                "비상장 기업 재무정보 조회 실패: {}",
                extraction.error.unwrap_or_default()
            ));
        }
        result
    }

    /// 그룹화된 재무제표 (내보내기용).
    pub async fn get_statements(
        &self,
        corp_code: &str,
        bsns_year: &str,
        fs_div: FsDiv,
    ) -> FinResult<CompanyStatements> {
        let result = self.get_financial_data(corp_code, bsns_year, fs_div).await?;
        Ok(CompanyStatements {
            financial_statements: group_statements(&result.items, result.ratios),
            company_name: result.corp_name,
            stock_code: result.stock_code,
        })
    }

    // ==================== 비교 ====================

    /// 여러 회사의 3개 연도(y, y-1, y-2) 재무정보를 연도별로 비교합니다.
    ///
    /// 회사/연도 단위 실패는 경고 로그만 남기고 나머지는 계속 진행합니다.
    pub async fn compare_companies(
        &self,
        corp_codes: &[String],
        bsns_year: i32,
        fs_div: FsDiv,
    ) -> FinResult<ComparisonByYear> {
        if corp_codes.len() < 2 {
            return Err(FinError::InvalidInput(
                "비교하려면 최소 2개 회사가 필요합니다.".to_string(),
            ));
        }

        let started = Instant::now();
        info!(companies = corp_codes.len(), bsns_year, "다중 회사 비교 시작");

        let fetched = join_all(
            corp_codes
                .iter()
                .map(|corp_code| self.fetch_company_years(corp_code, bsns_year, fs_div)),
        )
        .await;

        let mut stats = FetchStats::new();
        let mut company_info = HashMap::new();
        let mut companies = Vec::with_capacity(fetched.len());
        for (corp_code, (info, records, company_stats)) in corp_codes.iter().zip(fetched) {
            stats.merge(&company_stats);
            if let Some(info) = info {
                company_info.insert(corp_code.clone(), info);
            }
            companies.push((corp_code.clone(), records));
        }

        let comparison = assemble_comparison(companies, &company_info);

        stats.elapsed = started.elapsed();
        stats.log_summary("compare_companies");
        Ok(comparison)
    }

    async fn fetch_company_years(
        &self,
        corp_code: &str,
        bsns_year: i32,
        fs_div: FsDiv,
    ) -> (Option<CompanyInfo>, Vec<RawFinancialRecord>, FetchStats) {
        let mut stats = FetchStats::new();
        let mut records = Vec::new();

        let info = match self.directory.get_by_code(corp_code).await {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(corp_code, error = %e, "비교 대상 회사 조회 실패");
                stats.total += 1;
                stats.errors += 1;
                return (None, records, stats);
            }
        };

        for year in [bsns_year, bsns_year - 1, bsns_year - 2] {
            stats.total += 1;
            match self
                .get_financial_data(corp_code, &year.to_string(), fs_div)
                .await
            {
                Ok(result) => match result.status() {
                    ResultStatus::Failed => {
                        warn!(corp_code, year, error = ?result.error, "연도별 재무정보 조회 실패");
                        stats.errors += 1;
                    }
                    ResultStatus::Empty => stats.empty += 1,
                    ResultStatus::Success => {
                        stats.success += 1;
                        stats.total_items += result.items.len();
                        records.extend(result.items.into_iter().map(|item| item.record));
                    }
                },
                Err(e) => {
                    warn!(
                        corp_code,
                        year,
                        error = %e,
                        retryable = e.is_retryable(),
                        "연도별 재무정보 조회 실패"
                    );
                    stats.errors += 1;
                }
            }
        }

        info!(corp_code, items = records.len(), "회사 재무정보 수집 완료");
        (info, records, stats)
    }

    // ==================== 시세 / 밸류에이션 ====================

    /// 종목 시세. 종목코드가 없으면 회사명으로 KRX에서 찾습니다.
    pub async fn get_stock_info(
        &self,
        stock_code: &str,
        corp_name: Option<&str>,
        bsns_year: Option<i32>,
    ) -> StockInfo {
        let Some(market) = &self.market else {
            return StockInfo {
                snapshot: MarketSnapshot::error(MARKET_DATA_MISSING),
                formatted: None,
            };
        };

        let stock_code = stock_code.trim();
        let resolved = if stock_code.is_empty() || stock_code == UNLISTED_STOCK_CODE {
            let Some(name) = corp_name.filter(|n| !n.trim().is_empty()) else {
                return StockInfo {
                    snapshot: MarketSnapshot::no_data("비상장 회사"),
                    formatted: None,
                };
            };
            match market.find_stock_code_by_name(name).await {
                Ok(Some(code)) => code,
                Ok(None) => {
                    info!(corp_name = name, "KRX에서 회사명을 찾지 못함");
                    return StockInfo {
                        snapshot: MarketSnapshot::no_data("비상장 회사 (KRX에서 찾을 수 없음)"),
                        formatted: None,
                    };
                }
                Err(e) => {
                    warn!(corp_name = name, error = %e, "회사명으로 종목코드 검색 실패");
                    return StockInfo {
                        snapshot: MarketSnapshot::no_data("비상장 회사 (KRX에서 찾을 수 없음)"),
                        formatted: None,
                    };
                }
            }
        } else {
            stock_code.to_string()
        };

        let mut snapshot = market.snapshot(&resolved).await;
        if !snapshot.status.has_price() {
            return StockInfo {
                snapshot,
                formatted: None,
            };
        }

        if let Some(year) = bsns_year {
            snapshot.year_end = Some(market.year_end_fundamental(&resolved, year).await);
        }
        let formatted = Some(format_stock_display(&snapshot));
        StockInfo {
            snapshot,
            formatted,
        }
    }

    /// 재무정보와 시세로 PER/PBR을 계산합니다.
    pub async fn get_valuation(
        &self,
        corp_code: &str,
        bsns_year: &str,
        fs_div: FsDiv,
    ) -> FinResult<ValuationReport> {
        let financial = self.get_financial_data(corp_code, bsns_year, fs_div).await?;
        let year = bsns_year.trim().parse::<i32>().ok();
        let stock = self
            .get_stock_info(&financial.stock_code, Some(&financial.corp_name), year)
            .await;

        let valuation = valuation_from_snapshot(&financial.items, &stock.snapshot);
        Ok(ValuationReport {
            corp_code: financial.corp_code,
            corp_name: financial.corp_name,
            stock_code: financial.stock_code,
            bsns_year: financial.bsns_year,
            valuation,
            stock,
        })
    }

    // ==================== 공시 ====================

    /// 사업연도 공시 목록.
    pub async fn get_disclosures(&self, corp_code: &str, bsns_year: &str) -> FinResult<DisclosureList> {
        let company = self.directory.get_by_code(corp_code).await?;
        let disclosures = self.disclosures.list_disclosures(corp_code, bsns_year).await?;
        Ok(DisclosureList {
            corp_code: company.corp_code,
            corp_name: company.corp_name,
            stock_code: company.stock_code,
            disclosures,
        })
    }

    /// 재무정보가 포함된 공시 문서 목록.
    pub async fn get_financial_documents(
        &self,
        corp_code: &str,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> FinResult<DisclosureList> {
        let company = self.directory.get_by_code(corp_code).await?;
        let disclosures = self
            .disclosures
            .list_financial_documents(corp_code, start_year, end_year)
            .await?;
        info!(corp_code, count = disclosures.len(), "재무 공시 문서 조회");
        Ok(DisclosureList {
            corp_code: company.corp_code,
            corp_name: company.corp_name,
            stock_code: company.stock_code,
            disclosures,
        })
    }

    /// 특정 공시 문서(PDF)에서 재무정보를 추출합니다.
    pub async fn extract_document(
        &self,
        corp_code: &str,
        rcept_no: &str,
        report_nm: &str,
    ) -> FinResult<DocumentExtraction> {
        let company = self.directory.get_by_code(corp_code).await?;
        let request = DocumentRequest {
            rcept_no: rcept_no.to_string(),
            corp_code: company.corp_code.clone(),
            corp_name: company.corp_name.clone(),
            report_nm: report_nm.to_string(),
            is_listed: company.is_listed(),
        };

        Ok(match &self.documents {
            Some(pipeline) => pipeline.extract(&request).await,
            None => DocumentExtraction::failed(&request, PipelineError::ParserUnavailable.to_string()),
        })
    }

    // ==================== 브리핑 ====================

    /// 브리핑 대상 데이터를 모읍니다. 회사가 하나면 단일, 둘 이상이면 비교입니다.
    pub async fn briefing_subject(
        &self,
        corp_codes: &[String],
        bsns_year: &str,
        fs_div: FsDiv,
    ) -> FinResult<BriefingSubject> {
        let mut companies = Vec::with_capacity(corp_codes.len());
        for corp_code in corp_codes {
            let result = self.get_financial_data(corp_code, bsns_year, fs_div).await?;
            if let Some(error) = result.error {
                return Err(FinError::FinancialDataNotFound(format!(
                    "{}: {}",
                    result.corp_name, error
                )));
            }
            companies.push(CompanyBriefingData {
                corp_name: result.corp_name,
                items: result.items,
                ratios: result.ratios,
            });
        }

        match companies.len() {
            0 => Err(FinError::InvalidInput("브리핑할 회사가 없습니다.".to_string())),
            1 => {
                let company = companies.remove(0);
                Ok(BriefingSubject::Single {
                    corp_name: company.corp_name,
                    items: company.items,
                })
            }
            _ => Ok(BriefingSubject::Comparison(companies)),
        }
    }
}
