//! finbrief CLI.

use anyhow::Context;
use clap::Parser;
use fin_analytics::{BriefingStyle, FinancialService};
use fin_cli::{modules, Cli, CliConfig, CliError, Commands};
use fin_core::logging::{init_logging, LogConfig};
use serde_json::{json, Value};

/// 회사/재무 데이터가 없을 때의 종료 코드
const EXIT_DATA_ABSENT: i32 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 설정 로드
    let config = CliConfig::from_env(cli.config.as_deref())?;

    // 로깅 초기화 (stderr)
    let mut log_config = LogConfig::from(&config.app.logging);
    if let Some(level) = cli.log_level.clone() {
        log_config = log_config.with_level(level);
    }
    init_logging(log_config).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    tracing::debug!(default_year = config.default_year, "설정 로드 완료");

    let service =
        FinancialService::from_config(&config.app).context("재무정보 서비스 초기화 실패")?;
    let pretty = config.output.pretty && !cli.compact;

    match run(cli.command, &service, &config).await {
        Ok(output) => modules::write_json(&output, pretty)?,
        Err(CliError::Service(e)) if e.is_data_absence() => {
            tracing::warn!(error = %e, "조회 대상 없음");
            modules::write_json(&json!({ "error": e.to_string() }), pretty)?;
            std::process::exit(EXIT_DATA_ABSENT);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn run(command: Commands, service: &FinancialService, config: &CliConfig) -> fin_cli::Result<Value> {
    let year_or_default = |year: Option<i32>| year.unwrap_or(config.default_year);

    // 명령 실행
    match command {
        Commands::Search { keyword } => modules::search_companies(service, &keyword).await,
        Commands::RefreshCompanies => modules::refresh_companies(service).await,
        Commands::Financials {
            corp_code,
            year,
            fs_div,
            grouped,
        } => modules::financials(service, &corp_code, year_or_default(year), fs_div, grouped).await,
        Commands::Compare {
            corp_codes,
            year,
            fs_div,
        } => modules::compare(service, &corp_codes, year_or_default(year), fs_div).await,
        Commands::Valuation {
            corp_code,
            year,
            fs_div,
        } => modules::valuation(service, &corp_code, year_or_default(year), fs_div).await,
        Commands::Stock {
            stock_code,
            corp_name,
            year,
        } => modules::stock(service, &stock_code, corp_name.as_deref(), year).await,
        Commands::Disclosures { corp_code, year } => {
            modules::list_disclosures(service, &corp_code, year_or_default(year)).await
        }
        Commands::Documents {
            corp_code,
            start_year,
            end_year,
        } => modules::list_financial_documents(service, &corp_code, start_year, end_year).await,
        Commands::ExtractDocument {
            corp_code,
            rcept_no,
            report_nm,
        } => modules::extract_document(service, &corp_code, &rcept_no, &report_nm).await,
        Commands::Briefing {
            corp_codes,
            year,
            fs_div,
            provider,
            style,
        } => {
            let briefing = modules::briefing_service(config)?;
            let provider = provider.unwrap_or_else(|| config.app.llm.default_provider.clone());
            let style =
                BriefingStyle::from_name(style.as_deref().unwrap_or(&config.briefing.style));
            modules::generate_briefing(
                service,
                &briefing,
                &corp_codes,
                year_or_default(year),
                fs_div,
                &provider,
                style,
            )
            .await
        }
    }
}
