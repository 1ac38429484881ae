//! 캐싱 레이어.
//!
//! - 회사 목록 캐시: DART 고유번호 목록 (메모리 + 선택적 디스크 JSON)

pub mod company_directory;

pub use company_directory::{search_companies, CompanyDirectory};
