//! 공시 문서 처리.
//!
//! - `html_tables`: 공시 원문(HTML)에서 재무제표 테이블 텍스트 추출
//! - `elements`: 문서 파싱 결과(요소 목록)에서 재무제표 텍스트 추출

pub mod elements;
pub mod html_tables;

pub use elements::{DocumentElement, ParsedDocument};
pub use html_tables::{decode_document, extract_financial_tables};
