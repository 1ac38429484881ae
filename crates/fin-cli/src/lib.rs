//! finbrief 명령줄 도구.
//!
//! 이 crate는 재무정보 서비스를 구동하는 바이너리를 제공합니다:
//! - 회사 검색, 회사 목록 갱신
//! - 재무정보 조회 (상장: DART 주요계정, 비상장: 공시 원문 AI 파싱)
//! - 다중 회사 비교, PER/PBR, 종목 시세
//! - 공시 목록, 공시 PDF 재무정보 추출
//! - AI 재무 브리핑

pub mod cli;
pub mod config;
pub mod error;
pub mod modules;

pub use cli::{Cli, Commands};
pub use config::CliConfig;
pub use error::{CliError, Result};
