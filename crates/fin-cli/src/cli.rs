//! 명령줄 인자 정의.

use clap::{Parser, Subcommand};
use fin_core::FsDiv;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "finbrief")]
#[command(about = "DART/KRX 재무정보 조회 및 AI 브리핑", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 설정 파일 경로 (TOML). 없으면 환경변수만 사용
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// 한 줄 JSON 출력
    #[arg(long, global = true)]
    pub compact: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 회사 검색 (회사명, 고유번호, 종목코드)
    Search {
        keyword: String,
    },

    /// 사업연도 재무정보 (정규화 계정 + 재무비율)
    Financials {
        /// 고유번호 (8자리)
        corp_code: String,
        /// 사업연도 (예: 2023)
        #[arg(long)]
        year: Option<i32>,
        /// 연결(CFS) / 별도(OFS)
        #[arg(long, default_value = "CFS")]
        fs_div: FsDiv,
        /// 재무상태표/손익계산서/현금흐름표로 묶어서 출력
        #[arg(long)]
        grouped: bool,
    },

    /// 여러 회사의 3개 연도 재무정보 비교
    Compare {
        /// 고유번호 목록 (2개 이상)
        #[arg(required = true, num_args = 2..)]
        corp_codes: Vec<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, default_value = "CFS")]
        fs_div: FsDiv,
    },

    /// PER/PBR 계산
    Valuation {
        corp_code: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, default_value = "CFS")]
        fs_div: FsDiv,
    },

    /// 종목 시세 (KRX)
    Stock {
        /// 종목코드 (비상장이면 N/A)
        stock_code: String,
        /// 종목코드가 없을 때 검색할 회사명
        #[arg(long)]
        corp_name: Option<String>,
        /// 연말 가치지표 연도
        #[arg(long)]
        year: Option<i32>,
    },

    /// 사업연도 공시 목록
    Disclosures {
        corp_code: String,
        #[arg(long)]
        year: Option<i32>,
    },

    /// 재무정보가 포함된 공시 문서 목록
    Documents {
        corp_code: String,
        #[arg(long)]
        start_year: Option<i32>,
        #[arg(long)]
        end_year: Option<i32>,
    },

    /// 공시 PDF에서 재무정보 추출 (Upstage 필요)
    ExtractDocument {
        corp_code: String,
        /// 접수번호
        rcept_no: String,
        /// 보고서명 (연도와 연결/별도 판별에 사용)
        #[arg(long)]
        report_nm: String,
    },

    /// AI 재무 브리핑 (회사 1개: 단일, 2개 이상: 비교)
    Briefing {
        #[arg(required = true)]
        corp_codes: Vec<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, default_value = "CFS")]
        fs_div: FsDiv,
        /// LLM 프로바이더 (upstage, claude)
        #[arg(long)]
        provider: Option<String>,
        /// 브리핑 스타일 (default, executive, detailed)
        #[arg(long)]
        style: Option<String>,
    },

    /// 회사 목록 다시 받기
    RefreshCompanies,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_financials() {
        let cli = Cli::try_parse_from([
            "finbrief", "financials", "00126380", "--year", "2023", "--fs-div", "ofs",
        ])
        .unwrap();

        match cli.command {
            Commands::Financials {
                corp_code,
                year,
                fs_div,
                grouped,
            } => {
                assert_eq!(corp_code, "00126380");
                assert_eq!(year, Some(2023));
                assert_eq!(fs_div, FsDiv::Separate);
                assert!(!grouped);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_compare_requires_two_companies() {
        assert!(Cli::try_parse_from(["finbrief", "compare", "00126380"]).is_err());
        assert!(Cli::try_parse_from(["finbrief", "compare", "00126380", "00164779"]).is_ok());
    }

    #[test]
    fn test_invalid_fs_div_rejected() {
        assert!(
            Cli::try_parse_from(["finbrief", "valuation", "00126380", "--fs-div", "XYZ"]).is_err()
        );
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["finbrief", "refresh-companies", "--compact", "--log-level", "debug"])
                .unwrap();
        assert!(cli.compact);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::RefreshCompanies));
    }
}
