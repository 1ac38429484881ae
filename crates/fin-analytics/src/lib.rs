//! 재무정보 정규화 및 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 계정 정규화 (표준 표시명, 중복 계정 구분)
//! - 재무비율 계산
//! - PER/PBR 밸류에이션
//! - 다중 회사 연도별 비교
//! - 비상장 회사/공시 PDF 재무정보 추출 파이프라인
//! - 재무제표 그룹화, 시세 표시 포맷, AI 브리핑
//! - 위 기능을 묶은 [`FinancialService`]
//!
//! # Re-exports
//!
//! - [`normalizer`]: 계정 정규화 (`normalize_accounts`)
//! - [`ratios`]: 재무비율 (`calculate_ratios`)
//! - [`valuation`]: PER/PBR (`calculate_valuation`)
//! - [`comparison`]: 연도별 비교 (`assemble_comparison`)

pub mod briefing;
pub mod comparison;
pub mod document_pipeline;
pub mod error;
pub mod normalizer;
pub mod ratios;
pub mod service;
pub mod statement;
pub mod stats;
pub mod stock_display;
pub mod unlisted;
pub mod valuation;

// 정규화/비율/밸류에이션 re-exports
pub use normalizer::{classify_account, normalize_accounts, renormalize};
pub use ratios::{calculate_ratios, AccountAmounts};
pub use valuation::{calculate_valuation, valuation_from_snapshot};

// 비교 re-exports
pub use comparison::{
    account_values_by_year, assemble_comparison, format_comparison_by_year,
    prepare_comparison_data, ComparisonByYear, ComparisonEntry, PreparedCompany, YearComparison,
};

// 파이프라인 re-exports
pub use document_pipeline::{
    DocumentExtraction, DocumentFinancialPipeline, DocumentRequest, FsStructure,
};
pub use error::{ExtractionFailure, PipelineError};
pub use unlisted::{UnlistedExtraction, UnlistedFinancialPipeline};

// 서비스 re-exports
pub use briefing::{BriefingService, BriefingStyle, BriefingSubject, CompanyBriefingData};
pub use service::{DisclosureList, FinancialService, StockInfo, ValuationReport};
pub use statement::{group_statements, CompanyStatements, FinancialStatements};
pub use stats::FetchStats;
pub use stock_display::{format_stock_display, StockDisplay};
