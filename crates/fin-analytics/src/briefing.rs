//! LLM 재무 브리핑.
//!
//! 정규화된 재무 데이터로 프롬프트를 만들고 등록된 LLM Provider에 보내
//! 한글 브리핑을 받습니다.
//!
//! # 스타일
//!
//! - `default`: 트렌드/수익성/건전성 중심 일반 브리핑
//! - `executive`: 경영진 보고서 형식
//! - `detailed`: 전문가급 심층 분석
//!
//! 알 수 없는 스타일은 `default`로 처리합니다.

use fin_core::{AccountCategory, FinError, FinResult, NormalizedFinancialItem, Period, RatioSet};
use fin_data::{ChatRequest, LlmProvider};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::stock_display::group_thousands;

/// 브리핑 시스템 프롬프트.
pub const BRIEFING_SYSTEM_PROMPT: &str = "당신은 재무 분석 전문가입니다. 반드시 한글로만 답변하세요.";

/// 이보다 짧은 응답은 실패로 간주합니다 (문자 수).
pub const MIN_BRIEFING_CHARS: usize = 100;

/// 브리핑 스타일.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BriefingStyle {
    #[default]
    Default,
    Executive,
    Detailed,
}

impl BriefingStyle {
    /// 이름으로 스타일을 찾습니다. 알 수 없으면 `Default`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "executive" => BriefingStyle::Executive,
            "detailed" => BriefingStyle::Detailed,
            _ => BriefingStyle::Default,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BriefingStyle::Default => "default",
            BriefingStyle::Executive => "executive",
            BriefingStyle::Detailed => "detailed",
        }
    }
}

impl fmt::Display for BriefingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 비교 브리핑의 회사 한 곳.
#[derive(Debug, Clone)]
pub struct CompanyBriefingData {
    pub corp_name: String,
    pub items: Vec<NormalizedFinancialItem>,
    pub ratios: RatioSet,
}

/// 브리핑 대상.
#[derive(Debug, Clone)]
pub enum BriefingSubject {
    Single {
        corp_name: String,
        items: Vec<NormalizedFinancialItem>,
    },
    Comparison(Vec<CompanyBriefingData>),
}

impl BriefingSubject {
    /// 로그용 이름.
    pub fn label(&self) -> String {
        match self {
            BriefingSubject::Single { corp_name, .. } => corp_name.clone(),
            BriefingSubject::Comparison(companies) => companies
                .iter()
                .map(|c| c.corp_name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// 금액 문자열을 천 단위 구분 정수로 변환합니다. 변환할 수 없으면 "N/A".
pub fn format_amount(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return "N/A".to_string();
    };
    match raw.replace(',', "").trim().parse::<f64>() {
        Ok(v) if v.is_finite() => group_thousands(v.trunc() as i64),
        _ => "N/A".to_string(),
    }
}

fn find_summary_item(
    items: &[NormalizedFinancialItem],
    category: AccountCategory,
) -> Option<&NormalizedFinancialItem> {
    items.iter().find(|item| item.category() == Some(category))
}

fn single_data_text(items: &[NormalizedFinancialItem]) -> String {
    let mut text = String::from("=== 재무 데이터 ===\n\n【주요 계정】\n");
    for category in AccountCategory::SUMMARY_ORDER {
        if let Some(item) = find_summary_item(items, category) {
            text.push_str(&format!(
                "{}: 당기 {} / 전기 {} / 전전기 {}\n",
                category,
                format_amount(item.record.amount(Period::Current)),
                format_amount(item.record.amount(Period::Prior)),
                format_amount(item.record.amount(Period::BeforePrior)),
            ));
        }
    }
    text
}

fn comparison_data_text(companies: &[CompanyBriefingData]) -> String {
    let mut text = String::from("=== 회사별 재무 데이터 ===\n\n");
    for company in companies {
        text.push_str(&format!("\n【{}】\n", company.corp_name));
        for category in AccountCategory::SUMMARY_ORDER {
            if let Some(item) = find_summary_item(&company.items, category) {
                text.push_str(&format!(
                    "  {}: {}\n",
                    category,
                    format_amount(item.record.amount(Period::Current))
                ));
            }
        }
        if !company.ratios.is_empty() {
            text.push_str("  \n  [주요 비율]\n");
            for (kind, values) in company.ratios.iter() {
                text.push_str(&format!("  {}: {:.2}%\n", kind, values.thstrm));
            }
        }
    }
    text
}

fn single_prompt(corp_name: &str, data_text: &str, style: BriefingStyle) -> String {
    match style {
        BriefingStyle::Default => format!(
            "당신은 재무 분석 전문가입니다. 반드시 한글로만 답변하세요.

{corp_name}의 3년 재무 데이터를 분석하여 상세한 브리핑을 작성해주세요.

{data_text}

요구사항:
1. 최소 600단어 이상 작성
2. 한글로만 작성
3. 다음 구조로 상세하게 작성:
   - **1. 3년 매출/수익 트렌드 분석**
   - **2. 수익성 분석**
   - **3. 재무 건전성 평가**
   - **4. 주의할 점**
   - **5. 핵심 포인트**
   - **6. 종합 평가**

각 섹션마다 구체적인 수치와 상세한 설명을 포함하여 작성해주세요."
        ),
        BriefingStyle::Executive => format!(
            "당신은 투자 컨설턴트입니다. 반드시 한글로만 답변하세요.

{corp_name}의 3년 재무 데이터를 심층 분석하고 경영진 보고서 형식의 브리핑을 작성해주세요.

{data_text}

요구사항:
1. 최소 500단어 이상 작성
2. 한글로만 작성
3. 다음 구조로 상세하게 작성:
   - **주요 재무 지표 분석**
   - **수익성 변화 분석**
   - **재무 건전성 평가**
   - **긍정적 신호**
   - **리스크 요소**
   - **투자 의견**

각 항목마다 구체적인 수치와 설명을 포함하여 상세하게 작성해주세요."
        ),
        BriefingStyle::Detailed => format!(
            "당신은 재무 분석 전문가입니다. 반드시 한글로만 답변하세요.

{corp_name}의 3년 재무 데이터를 심층적으로 분석하여 전문가급 브리핑을 작성해주세요.

{data_text}

요구사항:
1. 최소 800단어 이상 작성
2. 한글로만 작성
3. 다음 구조로 매우 상세하게 작성:
   - **1. 매출액 분석**
   - **2. 수익성 분석**
   - **3. 재무 구조 분석**
   - **4. 효율성 지표**
   - **5. 리스크 평가**
   - **6. 종합 평가 (SWOT)**
   - **7. 투자 결론**

각 항목마다 구체적인 수치를 제시하고 심층적으로 분석해주세요."
        ),
    }
}

fn comparison_prompt(company_names: &str, data_text: &str, style: BriefingStyle) -> String {
    match style {
        BriefingStyle::Default => format!(
            "당신은 재무 분석 전문가입니다. 반드시 한글로만 답변하세요.

{company_names} 회사들의 재무 데이터를 비교 분석하여 상세한 브리핑을 작성해주세요.

{data_text}

요구사항:
1. 최소 700단어 이상 작성
2. 한글로만 작성
3. 다음 구조로 상세하게 작성:
   - **1. 회사 개요 및 규모 비교**
   - **2. 매출 및 수익성 비교**
   - **3. 수익률 분석 (영업이익률, 순이익률, ROE)**
   - **4. 재무 건전성 비교 (부채비율, 자기자본비율)**
   - **5. 각 회사의 강점과 약점**
   - **6. 투자 관점에서의 비교 평가**

각 섹션마다 구체적인 수치를 비교하고, 각 회사를 A/B 같은 기호가 아닌 실제 회사명으로 언급하며 상세하게 분석해주세요.
"
        ),
        BriefingStyle::Executive => format!(
            "당신은 투자 컨설턴트입니다. 반드시 한글로만 답변하세요.

{company_names} 회사들의 재무 데이터를 비교 분석하고 경영진 보고서 형식의 브리핑을 작성해주세요.

{data_text}

요구사항:
1. 최소 600단어 이상 작성
2. 한글로만 작성
3. 다음 구조로 상세하게 작성:
   - **주요 재무 지표 비교**
   - **수익성 분석**
   - **재무 안정성 평가**
   - **각 회사의 경쟁력**
   - **리스크 요인 비교**
   - **투자 권고사항**

각 회사를 실제 회사명으로 명확히 언급하고, 구체적인 수치를 바탕으로 비교하며 상세하게 설명해주세요.
"
        ),
        BriefingStyle::Detailed => format!(
            "당신은 재무 분석 전문가입니다. 반드시 한글로만 답변하세요.

{company_names} 회사들의 재무 데이터를 심층적으로 비교 분석하여 전문가급 브리핑을 작성해주세요.

{data_text}

요구사항:
1. 최소 900단어 이상 작성
2. 한글로만 작성
3. 다음 구조로 매우 상세하게 작성:
   - **1. 기업 규모 및 산업 내 위치 비교**
   - **2. 매출 및 수익 구조 상세 분석**
   - **3. 수익성 지표 심층 비교 (영업이익률, 순이익률, ROE, ROA)**
   - **4. 재무 구조 분석 (자산, 부채, 자본 구조)**
   - **5. 재무 건전성 및 리스크 평가**
   - **6. 각 회사의 SWOT 분석**
   - **7. 종합 평가 및 투자 결론**

각 회사의 이름을 명확히 사용하고, 모든 주요 지표를 구체적으로 비교하며 심층적으로 분석해주세요."
        ),
    }
}

/// 브리핑 프롬프트를 만듭니다.
pub fn build_prompt(subject: &BriefingSubject, style: BriefingStyle) -> String {
    match subject {
        BriefingSubject::Single { corp_name, items } => {
            single_prompt(corp_name, &single_data_text(items), style)
        }
        BriefingSubject::Comparison(companies) => {
            let names = companies
                .iter()
                .map(|c| c.corp_name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            comparison_prompt(&names, &comparison_data_text(companies), style)
        }
    }
}

/// 이름별 LLM Provider 레지스트리.
pub struct BriefingService {
    providers: BTreeMap<String, Arc<dyn LlmProvider>>,
    timeout: Duration,
}

impl BriefingService {
    pub fn new(timeout: Duration) -> Self {
        Self {
            providers: BTreeMap::new(),
            timeout,
        }
    }

    /// Provider를 이름으로 등록합니다. 같은 이름은 교체됩니다.
    pub fn register(&mut self, provider: Arc<dyn LlmProvider>) {
        info!(provider = provider.name(), "브리핑 Provider 등록");
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.register(provider);
        self
    }

    /// 호출 가능한 Provider 이름.
    pub fn available_providers(&self) -> Vec<String> {
        self.providers
            .iter()
            .filter(|(_, p)| p.is_available())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// 브리핑을 생성합니다.
    pub async fn generate(
        &self,
        provider_name: &str,
        subject: &BriefingSubject,
        style: BriefingStyle,
    ) -> FinResult<String> {
        let provider = self.providers.get(provider_name).ok_or_else(|| {
            FinError::Llm(format!(
                "알 수 없는 프로바이더: {}\n사용 가능: {}",
                provider_name,
                self.available_providers().join(", ")
            ))
        })?;

        if !provider.is_available() {
            return Err(FinError::Llm(format!(
                "{} API 키가 설정되지 않았습니다.",
                provider_name
            )));
        }

        let prompt = build_prompt(subject, style);
        info!(
            provider = provider_name,
            subject = %subject.label(),
            style = %style,
            prompt_len = prompt.chars().count(),
            "브리핑 생성 요청"
        );

        let request = ChatRequest::new(prompt)
            .with_system(BRIEFING_SYSTEM_PROMPT)
            .with_temperature(0.7)
            .with_max_tokens(4000)
            .with_timeout(self.timeout);

        let text = provider.complete(&request).await?;
        let length = text.chars().count();
        if length < MIN_BRIEFING_CHARS {
            warn!(provider = provider_name, length, "브리핑이 너무 짧음");
            return Err(FinError::Llm(
                "생성된 브리핑이 너무 짧습니다. 다시 시도해주세요.".to_string(),
            ));
        }

        info!(provider = provider_name, length, "브리핑 생성 완료");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize_accounts;
    use crate::ratios::calculate_ratios;
    use fin_core::RawFinancialRecord;
    use fin_data::StaticLlm;

    fn items() -> Vec<NormalizedFinancialItem> {
        normalize_accounts(vec![
            RawFinancialRecord {
                account_id: "ifrs-full_Assets".to_string(),
                thstrm_amount: Some("2,000,000".to_string()),
                frmtrm_amount: Some("1,500,000.7".to_string()),
                bfefrmtrm_amount: None,
                ..Default::default()
            },
            RawFinancialRecord {
                account_id: "ifrs-full_Revenue".to_string(),
                thstrm_amount: Some("1000000".to_string()),
                frmtrm_amount: Some("-".to_string()),
                bfefrmtrm_amount: Some("800000".to_string()),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Some("1234567")), "1,234,567");
        assert_eq!(format_amount(Some("-1,500.9")), "-1,500");
        assert_eq!(format_amount(Some("")), "N/A");
        assert_eq!(format_amount(None), "N/A");
    }

    #[test]
    fn test_single_prompt_summary_order() {
        let subject = BriefingSubject::Single {
            corp_name: "테스트전자".to_string(),
            items: items(),
        };
        let prompt = build_prompt(&subject, BriefingStyle::Default);

        assert!(prompt.contains("테스트전자의 3년 재무 데이터를 분석하여"));
        assert!(prompt.contains("매출액: 당기 1,000,000 / 전기 N/A / 전전기 800,000\n"));
        assert!(prompt.contains("자산총계: 당기 2,000,000 / 전기 1,500,000 / 전전기 N/A\n"));
        let revenue = prompt.find("매출액:").unwrap();
        let assets = prompt.find("자산총계:").unwrap();
        assert!(revenue < assets);
        assert!(!prompt.contains("영업이익:"));
    }

    #[test]
    fn test_comparison_prompt_includes_ratios() {
        let items = items();
        let ratios = calculate_ratios(&items);
        let subject = BriefingSubject::Comparison(vec![
            CompanyBriefingData {
                corp_name: "가".to_string(),
                items: items.clone(),
                ratios,
            },
            CompanyBriefingData {
                corp_name: "나".to_string(),
                items: Vec::new(),
                ratios: RatioSet::new(),
            },
        ]);

        let prompt = build_prompt(&subject, BriefingStyle::Detailed);
        assert!(prompt.contains("가, 나 회사들의 재무 데이터를 심층적으로 비교 분석하여"));
        assert!(prompt.contains("\n【가】\n  매출액: 1,000,000\n"));
        assert!(prompt.contains("  영업이익률: 0.00%\n"));
        assert!(prompt.contains("\n【나】\n"));
    }

    #[test]
    fn test_style_from_name() {
        assert_eq!(BriefingStyle::from_name("EXECUTIVE"), BriefingStyle::Executive);
        assert_eq!(BriefingStyle::from_name("unknown"), BriefingStyle::Default);
    }

    #[tokio::test]
    async fn test_generate_validates_provider_and_length() {
        let long_text = "분석 ".repeat(60);
        let service = BriefingService::new(Duration::from_secs(5))
            .with_provider(Arc::new(StaticLlm::new("upstage", long_text.trim())))
            .with_provider(Arc::new(StaticLlm::new("short", "짧음")));

        let subject = BriefingSubject::Single {
            corp_name: "테스트".to_string(),
            items: items(),
        };

        let text = service
            .generate("upstage", &subject, BriefingStyle::Default)
            .await
            .unwrap();
        assert!(text.chars().count() >= MIN_BRIEFING_CHARS);

        let err = service
            .generate("gemini", &subject, BriefingStyle::Default)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("알 수 없는 프로바이더: gemini"));

        let err = service
            .generate("short", &subject, BriefingStyle::Default)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("너무 짧습니다"));
    }
}
