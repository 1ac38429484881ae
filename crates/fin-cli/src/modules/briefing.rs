//! AI 재무 브리핑.

use crate::config::CliConfig;
use crate::error::Result;
use fin_analytics::{BriefingService, BriefingStyle, FinancialService};
use fin_core::FsDiv;
use fin_data::{ClaudeClient, UpstageClient};
use serde_json::{json, Value};
use std::sync::Arc;

/// 설정된 LLM 프로바이더를 등록한 브리핑 서비스.
///
/// 키가 없는 프로바이더도 등록되며, 호출 시점에 키 없음 에러가 납니다.
pub fn briefing_service(config: &CliConfig) -> Result<BriefingService> {
    let llm = &config.app.llm;
    let service = BriefingService::new(llm.briefing_timeout())
        .with_provider(Arc::new(UpstageClient::from_config(llm)?))
        .with_provider(Arc::new(ClaudeClient::from_config(llm)?));

    tracing::debug!(providers = ?service.available_providers(), "브리핑 프로바이더 등록");
    Ok(service)
}

/// 재무 데이터를 모아 브리핑을 생성합니다.
pub async fn generate_briefing(
    service: &FinancialService,
    briefing: &BriefingService,
    corp_codes: &[String],
    year: i32,
    fs_div: FsDiv,
    provider: &str,
    style: BriefingStyle,
) -> Result<Value> {
    let subject = service
        .briefing_subject(corp_codes, &year.to_string(), fs_div)
        .await?;

    tracing::info!(provider, style = %style, subject = %subject.label(), "브리핑 생성 시작");
    let text = briefing.generate(provider, &subject, style).await?;

    Ok(json!({
        "subject": subject.label(),
        "bsns_year": year,
        "provider": provider,
        "style": style.name(),
        "briefing": text,
    }))
}
