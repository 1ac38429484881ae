//! 환경변수 기반 설정 모듈.

use crate::error::{CliError, Result};
use chrono::Datelike;
use fin_core::AppConfig;
use std::path::Path;

/// CLI 전체 설정
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// 외부 협력자 설정 (DART, KRX, LLM, 캐시, 로깅)
    pub app: AppConfig,
    /// 출력 설정
    pub output: OutputConfig,
    /// 브리핑 설정
    pub briefing: BriefingConfig,
    /// 사업연도를 생략했을 때 사용할 연도
    pub default_year: i32,
}

/// 출력 설정
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// 들여쓰기 JSON 출력
    pub pretty: bool,
}

/// 브리핑 설정
#[derive(Debug, Clone)]
pub struct BriefingConfig {
    /// 기본 브리핑 스타일 (default, executive, detailed)
    pub style: String,
}

impl CliConfig {
    /// 환경변수에서 설정 로드
    ///
    /// 설정 파일 경로가 주어지면 파일과 `FIN__` 환경변수에서,
    /// 없으면 `.env`와 `DART_API_KEY` 같은 평범한 환경변수에서 읽습니다.
    pub fn from_env(config_path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let app = match config_path {
            Some(path) => AppConfig::load(path)
                .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?,
            None => AppConfig::from_env(),
        };

        if app.dart.api_key.is_none() {
            return Err(CliError::Config(
                "DART_API_KEY 환경변수가 설정되지 않았습니다".to_string(),
            ));
        }

        Ok(Self {
            app,
            output: OutputConfig {
                pretty: env_var_bool("FINBRIEF_PRETTY", true),
            },
            briefing: BriefingConfig {
                style: std::env::var("FINBRIEF_BRIEFING_STYLE")
                    .unwrap_or_else(|_| "default".to_string()),
            },
            default_year: env_var_parse("FINBRIEF_DEFAULT_YEAR", last_closed_year()),
        })
    }
}

/// 사업보고서가 나와 있을 가장 최근 사업연도 (작년)
fn last_closed_year() -> i32 {
    chrono::Local::now().year() - 1
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 환경변수에서 bool 값 파싱
fn env_var_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_helpers_fall_back_to_default() {
        assert_eq!(env_var_parse("FINBRIEF_TEST_UNSET_NUMBER", 42), 42);
        assert!(env_var_bool("FINBRIEF_TEST_UNSET_FLAG", true));
        assert!(!env_var_bool("FINBRIEF_TEST_UNSET_FLAG", false));
    }

    #[test]
    fn test_last_closed_year_is_in_the_past() {
        assert!(last_closed_year() < chrono::Local::now().year());
    }
}
