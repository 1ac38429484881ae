//! # Fin Core
//!
//! 공시 재무정보 분석의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 표준 계정 카테고리와 원본/정규화 재무 레코드
//! - 당기/전기/전전기 기간 값
//! - 재무비율 및 PER/PBR 결과
//! - 회사, 공시, 시세 구조체
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
