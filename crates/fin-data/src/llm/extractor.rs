//! LLM 기반 재무정보 추출.
//!
//! 재무제표 테이블 텍스트(또는 문서 파싱 요소)를 LLM에 넘겨 6개 표준 계정의
//! 당기/전기/전전기 금액을 JSON으로 받습니다. 응답이 JSON이 아니면 재시도하지 않고
//! 고정 메시지의 `FinError::Extraction`을 반환합니다.

use async_trait::async_trait;
use fin_core::{FinError, FinResult};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{info, warn};

use super::{extract_json_object, ChatRequest, LlmProvider};
use crate::document::ParsedDocument;

/// 추출 결과 파싱 실패 메시지.
pub const EXTRACTION_PARSE_ERROR: &str = "재무정보 추출 결과를 파싱할 수 없습니다.";

/// 프롬프트에 넣을 테이블 텍스트 최대 길이 (문자 수).
pub const MAX_TABLE_TEXT_CHARS: usize = 15_000;

/// 보고서명에 연도가 없을 때 사용할 연도.
pub const DEFAULT_REPORT_YEAR: &str = "2023";

const SYSTEM_PROMPT_TABLES: &str =
    "당신은 재무제표 분석 전문가입니다. 주어진 재무제표 테이블에서 정확한 숫자를 추출하여 JSON 형식으로 반환합니다.";
const SYSTEM_PROMPT_DOCUMENT: &str =
    "당신은 재무제표 분석 전문가입니다. 주어진 재무제표에서 정확한 숫자를 추출하여 JSON 형식으로 반환합니다.";

static YEAR_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\d{4}").ok());

/// LLM이 추출한 계정 한 줄.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub account_nm: String,
    #[serde(default = "zero_amount", deserialize_with = "amount_string")]
    pub thstrm_amount: String,
    #[serde(default = "zero_amount", deserialize_with = "amount_string")]
    pub frmtrm_amount: String,
    #[serde(default = "zero_amount", deserialize_with = "amount_string")]
    pub bfefrmtrm_amount: String,
}

/// LLM 추출 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFinancials {
    pub items: Vec<ExtractedItem>,
}

impl ExtractedFinancials {
    /// LLM 응답 텍스트에서 첫 JSON 객체를 찾아 파싱합니다.
    pub fn from_response(text: &str) -> FinResult<Self> {
        let json = extract_json_object(text).ok_or_else(|| {
            warn!("LLM 응답에서 JSON을 찾지 못함");
            FinError::Extraction(EXTRACTION_PARSE_ERROR.to_string())
        })?;

        serde_json::from_str(json).map_err(|e| {
            warn!(error = %e, "LLM 추출 결과 역직렬화 실패");
            FinError::Extraction(EXTRACTION_PARSE_ERROR.to_string())
        })
    }
}

fn zero_amount() -> String {
    "0".to_string()
}

/// 금액은 문자열이나 숫자로 올 수 있습니다. null은 "0"입니다.
fn amount_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => zero_amount(),
        other => other.to_string(),
    })
}

/// 보고서명에서 사업연도(첫 4자리 숫자)를 찾습니다.
pub fn report_year(report_nm: &str) -> String {
    YEAR_PATTERN
        .as_ref()
        .and_then(|re| re.find(report_nm))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_REPORT_YEAR.to_string())
}

/// 재무제표 텍스트 → 구조화 데이터 추출기.
#[async_trait]
pub trait FinancialTextExtractor: Send + Sync {
    /// 공시 원문 HTML에서 뽑은 테이블 텍스트로부터 추출합니다.
    async fn extract_from_tables(
        &self,
        tables_text: &str,
        corp_name: &str,
        bsns_year: &str,
    ) -> FinResult<ExtractedFinancials>;

    /// 문서 파싱 결과(요소 목록)로부터 추출합니다.
    async fn extract_from_elements(
        &self,
        document: &ParsedDocument,
        corp_name: &str,
        report_nm: &str,
    ) -> FinResult<ExtractedFinancials>;
}

/// `LlmProvider`를 사용하는 추출기.
pub struct LlmFinancialExtractor<P> {
    provider: P,
    timeout: Duration,
}

impl<P: LlmProvider> LlmFinancialExtractor<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn run(&self, system: &str, prompt: String) -> FinResult<ExtractedFinancials> {
        let request = ChatRequest::new(prompt)
            .with_system(system)
            .with_temperature(0.1)
            .with_max_tokens(2000)
            .with_timeout(self.timeout);

        let text = self.provider.complete(&request).await.map_err(|e| match e {
            FinError::Llm(msg) => FinError::Llm(format!("재무정보 추출 실패: {}", msg)),
            other => other,
        })?;

        let preview: String = text.chars().take(200).collect();
        info!(provider = self.provider.name(), preview = %preview, "재무정보 추출 응답");

        let financials = ExtractedFinancials::from_response(&text)?;
        info!(items = financials.items.len(), "재무 항목 추출 완료");
        Ok(financials)
    }
}

#[async_trait]
impl<P: LlmProvider> FinancialTextExtractor for LlmFinancialExtractor<P> {
    async fn extract_from_tables(
        &self,
        tables_text: &str,
        corp_name: &str,
        bsns_year: &str,
    ) -> FinResult<ExtractedFinancials> {
        if tables_text.is_empty() {
            return Err(FinError::Llm("재무제표 테이블이 비어있습니다.".to_string()));
        }

        info!(corp_name = corp_name, bsns_year = bsns_year, "테이블에서 재무정보 추출");
        let truncated: String = tables_text.chars().take(MAX_TABLE_TEXT_CHARS).collect();
        self.run(SYSTEM_PROMPT_TABLES, tables_prompt(corp_name, bsns_year, &truncated))
            .await
    }

    async fn extract_from_elements(
        &self,
        document: &ParsedDocument,
        corp_name: &str,
        report_nm: &str,
    ) -> FinResult<ExtractedFinancials> {
        let bsns_year = report_year(report_nm);
        info!(corp_name = corp_name, bsns_year = %bsns_year, "문서 요소에서 재무정보 추출");

        let combined = document
            .financial_text()
            .ok_or_else(|| FinError::Llm("문서에서 재무제표를 찾을 수 없습니다.".to_string()))?;

        self.run(SYSTEM_PROMPT_DOCUMENT, document_prompt(corp_name, &bsns_year, &combined))
            .await
    }
}

fn tables_prompt(corp_name: &str, bsns_year: &str, tables_text: &str) -> String {
    format!(
        r#"
다음은 {corp_name}의 {bsns_year}년 사업보고서/감사보고서에서 추출한 재무제표 테이블입니다.

{tables_text}

위 테이블에서 다음 재무 항목을 추출하여 JSON 형식으로 반환해주세요:

1. 자산총계 (당기, 전기, 전전기)
2. 부채총계 (당기, 전기, 전전기)
3. 자본총계 (당기, 전기, 전전기)
4. 매출액 (당기, 전기, 전전기)
5. 영업이익 (당기, 전기, 전전기)
6. 당기순이익 (당기, 전기, 전전기)

응답 형식:
{{
  "items": [
    {{
      "account_nm": "자산총계",
      "thstrm_amount": "당기금액(숫자만)",
      "frmtrm_amount": "전기금액(숫자만)",
      "bfefrmtrm_amount": "전전기금액(숫자만)"
    }},
    {{
      "account_nm": "부채총계",
      "thstrm_amount": "당기금액(숫자만)",
      "frmtrm_amount": "전기금액(숫자만)",
      "bfefrmtrm_amount": "전전기금액(숫자만)"
    }},
    ...
  ]
}}

중요:
- 금액은 원 단위 숫자로만 반환하고, 콤마나 단위(원, 천원, 백만원 등)는 제거해주세요.
- 단위가 "천원" 또는 "백만원"이면 해당 단위만큼 곱해서 원 단위로 변환해주세요.
  예: 1,000 (단위: 백만원) -> 1000000000
- 데이터가 없는 경우 "0"으로 표시해주세요.
- JSON 외의 다른 텍스트는 포함하지 마세요.
- 반드시 위 6개 항목을 모두 포함해주세요.
"#
    )
}

fn document_prompt(corp_name: &str, bsns_year: &str, combined_text: &str) -> String {
    format!(
        r#"
다음은 {corp_name}의 {bsns_year}년 사업보고서/감사보고서에서 추출한 재무제표 데이터입니다.

{combined_text}

위 데이터에서 다음 재무 항목을 추출하여 JSON 형식으로 반환해주세요:

1. 자산총계 (당기, 전기, 전전기)
2. 부채총계 (당기, 전기, 전전기)
3. 자본총계 (당기, 전기, 전전기)
4. 매출액 (당기, 전기, 전전기)
5. 영업이익 (당기, 전기, 전전기)
6. 당기순이익 (당기, 전기, 전전기)

응답 형식:
{{
  "items": [
    {{
      "account_nm": "자산총계",
      "thstrm_amount": "당기금액(숫자만)",
      "frmtrm_amount": "전기금액(숫자만)",
      "bfefrmtrm_amount": "전전기금액(숫자만)"
    }},
    ...
  ]
}}

금액은 원 단위 숫자로만 반환하고, 콤마나 단위는 제거해주세요.
데이터가 없는 경우 "0"으로 표시해주세요.
JSON 외의 다른 텍스트는 포함하지 마세요.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::StaticLlm;

    const RESPONSE: &str = r#"추출 결과입니다.
{"items": [
  {"account_nm": "자산총계", "thstrm_amount": "1000000", "frmtrm_amount": 900000, "bfefrmtrm_amount": null},
  {"account_nm": "매출액", "thstrm_amount": "500000"}
]}"#;

    #[test]
    fn test_from_response_tolerates_number_and_null() {
        let parsed = ExtractedFinancials::from_response(RESPONSE).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].frmtrm_amount, "900000");
        assert_eq!(parsed.items[0].bfefrmtrm_amount, "0");
        assert_eq!(parsed.items[1].frmtrm_amount, "0");
    }

    #[test]
    fn test_from_response_parse_failure() {
        let err = ExtractedFinancials::from_response("죄송합니다. 표를 읽을 수 없습니다.").unwrap_err();
        assert_eq!(err.to_string(), EXTRACTION_PARSE_ERROR);

        // items 누락
        let err = ExtractedFinancials::from_response(r#"{"result": []}"#).unwrap_err();
        assert!(matches!(err, FinError::Extraction(_)));
    }

    #[test]
    fn test_report_year() {
        assert_eq!(report_year("감사보고서 (2024.12)"), "2024");
        assert_eq!(report_year("[기재정정]사업보고서"), DEFAULT_REPORT_YEAR);
    }

    #[test]
    fn test_prompt_contains_schema() {
        let prompt = tables_prompt("테스트", "2024", "자산총계 | 100");
        assert!(prompt.contains("테스트의 2024년"));
        assert!(prompt.contains("\"account_nm\": \"자산총계\""));
        assert!(prompt.contains("자산총계 | 100"));
    }

    #[tokio::test]
    async fn test_extract_from_tables() {
        let extractor = LlmFinancialExtractor::new(StaticLlm::new("static", RESPONSE), Duration::from_secs(5));
        let parsed = extractor
            .extract_from_tables("자산총계 | 1,000,000", "테스트", "2024")
            .await
            .unwrap();
        assert_eq!(parsed.items[0].account_nm, "자산총계");

        let err = extractor.extract_from_tables("", "테스트", "2024").await.unwrap_err();
        assert!(matches!(err, FinError::Llm(_)));
    }

    #[tokio::test]
    async fn test_extract_from_elements_without_tables() {
        let extractor = LlmFinancialExtractor::new(StaticLlm::new("static", RESPONSE), Duration::from_secs(5));
        let err = extractor
            .extract_from_elements(&ParsedDocument::default(), "테스트", "감사보고서 (2024.12)")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("문서에서 재무제표를 찾을 수 없습니다."));
    }
}
