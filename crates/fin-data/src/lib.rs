//! 외부 데이터 협력자.
//!
//! 이 crate는 다음을 제공합니다:
//! - DART OpenAPI 클라이언트 (회사 목록, 주요계정, 공시 목록, 공시 원문/PDF)
//! - KRX Open API 시세/가치지표 Provider
//! - 회사 목록 캐시 (메모리 + 선택적 디스크 JSON)
//! - 공시 원문 재무제표 테이블 추출
//! - LLM Provider (Upstage, Claude)와 재무정보 추출기

pub mod cache;
pub mod document;
pub mod error;
pub mod llm;
pub mod provider;

pub use error::{DataError, Result};

// 캐시 재내보내기
pub use cache::CompanyDirectory;

// 문서 처리 재내보내기
pub use document::{extract_financial_tables, ParsedDocument};

// LLM 재내보내기
pub use llm::{
    ChatRequest, ClaudeClient, DocumentParser, ExtractedFinancials, ExtractedItem,
    FinancialTextExtractor, LlmFinancialExtractor, LlmProvider, StaticLlm, UpstageClient,
};

// Provider 재내보내기
pub use provider::{
    CorpCodeSource, DartClient, DisclosureProvider, KrxApiClient, KrxMarketData,
    MarketDataProvider,
};
