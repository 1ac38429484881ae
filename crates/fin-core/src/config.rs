//! 설정 관리.
//!
//! 외부 협력자(DART, KRX, LLM)의 인증키·엔드포인트·타임아웃과
//! 회사 목록 캐시 경로, 로깅 설정을 정의합니다.

use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// DART OpenAPI 설정
    #[serde(default)]
    pub dart: DartConfig,
    /// KRX Open API 설정
    #[serde(default)]
    pub krx: KrxConfig,
    /// LLM 설정
    #[serde(default)]
    pub llm: LlmConfig,
    /// 캐시 설정
    #[serde(default)]
    pub cache: CacheConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// DART OpenAPI 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct DartConfig {
    /// 인증키 (crtfc_key)
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// API Base URL
    #[serde(default = "default_dart_base_url")]
    pub base_url: String,
    /// 공시문서 PDF 다운로드 URL
    #[serde(default = "default_dart_pdf_url")]
    pub pdf_url: String,
    /// 목록/재무 조회 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 공시문서(HTML) 다운로드 타임아웃 (초)
    #[serde(default = "default_document_timeout_secs")]
    pub document_timeout_secs: u64,
    /// 공시문서(PDF) 다운로드 타임아웃 (초)
    #[serde(default = "default_pdf_timeout_secs")]
    pub pdf_timeout_secs: u64,
}

impl Default for DartConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_dart_base_url(),
            pdf_url: default_dart_pdf_url(),
            timeout_secs: default_timeout_secs(),
            document_timeout_secs: default_document_timeout_secs(),
            pdf_timeout_secs: default_pdf_timeout_secs(),
        }
    }
}

impl DartConfig {
    /// 목록/재무 조회 타임아웃.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// HTML 공시문서 다운로드 타임아웃.
    pub fn document_timeout(&self) -> Duration {
        Duration::from_secs(self.document_timeout_secs)
    }

    /// PDF 공시문서 다운로드 타임아웃.
    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }
}

/// KRX Open API 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct KrxConfig {
    /// 인증키 (AUTH_KEY 헤더)
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// API Base URL
    #[serde(default = "default_krx_base_url")]
    pub base_url: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 최근 영업일 탐색 시 거슬러 올라갈 최대 일수
    #[serde(default = "default_business_day_lookback")]
    pub business_day_lookback: u32,
}

impl Default for KrxConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_krx_base_url(),
            timeout_secs: default_timeout_secs(),
            business_day_lookback: default_business_day_lookback(),
        }
    }
}

impl KrxConfig {
    /// 요청 타임아웃.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// LLM 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Upstage API 키 (재무정보 추출, 문서 파싱, 브리핑)
    #[serde(default)]
    pub upstage_api_key: Option<SecretString>,
    /// Claude API 키 (브리핑)
    #[serde(default)]
    pub claude_api_key: Option<SecretString>,
    /// 기본 브리핑 프로바이더 이름
    #[serde(default = "default_llm_provider")]
    pub default_provider: String,
    /// 재무정보 추출 타임아웃 (초)
    #[serde(default = "default_extraction_timeout_secs")]
    pub extraction_timeout_secs: u64,
    /// 브리핑 생성 타임아웃 (초)
    #[serde(default = "default_briefing_timeout_secs")]
    pub briefing_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            upstage_api_key: None,
            claude_api_key: None,
            default_provider: default_llm_provider(),
            extraction_timeout_secs: default_extraction_timeout_secs(),
            briefing_timeout_secs: default_briefing_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// 재무정보 추출 타임아웃.
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// 브리핑 생성 타임아웃.
    pub fn briefing_timeout(&self) -> Duration {
        Duration::from_secs(self.briefing_timeout_secs)
    }
}

/// 캐시 설정.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// 회사 목록 디스크 캐시 파일 (JSON). 없으면 메모리에만 보관합니다.
    #[serde(default)]
    pub company_cache_path: Option<PathBuf>,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_dart_base_url() -> String {
    "https://opendart.fss.or.kr/api".to_string()
}

fn default_dart_pdf_url() -> String {
    "https://dart.fss.or.kr/pdf/download/main.do".to_string()
}

fn default_krx_base_url() -> String {
    "https://data-dbg.krx.co.kr".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_document_timeout_secs() -> u64 {
    60
}

fn default_pdf_timeout_secs() -> u64 {
    120
}

fn default_business_day_lookback() -> u32 {
    10
}

fn default_llm_provider() -> String {
    "upstage".to_string()
}

fn default_extraction_timeout_secs() -> u64 {
    90
}

fn default_briefing_timeout_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `FIN__DART__BASE_URL`처럼 `FIN` 접두사와 `__` 구분자를 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("FIN")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// `.env` 파일과 평범한 환경 변수(`DART_API_KEY` 등)에서 설정을 만듭니다.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정을 만듭니다. 빈 값은 없는 것으로 취급합니다.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secret = |key: &str| get(key).map(|v| SecretString::from(v.trim().to_string()));

        let mut config = Self::default();

        config.dart.api_key = secret("DART_API_KEY");
        if let Some(url) = get("DART_BASE_URL") {
            config.dart.base_url = url;
        }

        config.krx.api_key = secret("KRX_API_KEY");
        if let Some(url) = get("KRX_BASE_URL") {
            config.krx.base_url = url;
        }

        config.llm.upstage_api_key = secret("UPSTAGE_API_KEY");
        config.llm.claude_api_key = secret("CLAUDE_API_KEY");
        if let Some(provider) = get("LLM_PROVIDER") {
            config.llm.default_provider = provider;
        }

        config.cache.company_cache_path = get("COMPANY_CACHE_PATH").map(PathBuf::from);

        if let Some(level) = get("RUST_LOG") {
            config.logging.level = level;
        }
        if let Some(format) = get("LOG_FORMAT") {
            config.logging.format = format;
        }

        config
    }
}
