//! 공시 PDF 기반 재무정보 추출.
//!
//! 상장/비상장 구분 없이 특정 공시 문서(접수번호)에서 재무정보를 뽑습니다.
//! PDF를 내려받아 문서 파서로 요소 목록을 만든 뒤 LLM으로 6개 계정을 추출합니다.

use fin_core::{NormalizedFinancialItem, RatioSet};
use fin_data::llm::report_year;
use fin_data::{DisclosureProvider, DocumentParser, FinancialTextExtractor};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Instrument};

use crate::error::PipelineError;
use crate::normalizer::normalize_accounts;
use crate::ratios::calculate_ratios;
use crate::unlisted::{parse_year, scratch_path, to_standard_records};

/// 보고서명으로 추정한 연결/별도 구성.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FsStructure {
    pub has_consolidated: bool,
    pub has_separate: bool,
    /// CFS, OFS 또는 N/A
    pub default_type: String,
}

impl FsStructure {
    pub fn from_report_name(report_nm: &str) -> Self {
        let has_consolidated = report_nm.contains("연결");
        let has_separate = report_nm.contains("별도");
        let default_type = if has_consolidated {
            "CFS"
        } else if has_separate {
            "OFS"
        } else {
            "N/A"
        };
        Self {
            has_consolidated,
            has_separate,
            default_type: default_type.to_string(),
        }
    }
}

/// 문서 추출 요청.
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    pub rcept_no: String,
    pub corp_code: String,
    pub corp_name: String,
    pub report_nm: String,
    pub is_listed: bool,
}

/// 문서 추출 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentExtraction {
    pub success: bool,
    pub rcept_no: String,
    pub corp_code: String,
    pub corp_name: String,
    pub report_nm: String,
    pub is_listed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fs_structure: Option<FsStructure>,
    pub items: Vec<NormalizedFinancialItem>,
    pub ratios: RatioSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentExtraction {
    fn base(request: &DocumentRequest) -> Self {
        Self {
            success: false,
            rcept_no: request.rcept_no.clone(),
            corp_code: request.corp_code.clone(),
            corp_name: request.corp_name.clone(),
            report_nm: request.report_nm.clone(),
            is_listed: request.is_listed,
            fs_structure: None,
            items: Vec::new(),
            ratios: RatioSet::new(),
            error: None,
        }
    }

    /// 실패 결과.
    pub fn failed(request: &DocumentRequest, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::base(request)
        }
    }
}

/// PDF 문서 추출 파이프라인.
pub struct DocumentFinancialPipeline {
    disclosures: Arc<dyn DisclosureProvider>,
    parser: Option<Arc<dyn DocumentParser>>,
    extractor: Arc<dyn FinancialTextExtractor>,
    work_dir: PathBuf,
}

impl DocumentFinancialPipeline {
    pub fn new(
        disclosures: Arc<dyn DisclosureProvider>,
        parser: Option<Arc<dyn DocumentParser>>,
        extractor: Arc<dyn FinancialTextExtractor>,
    ) -> Self {
        Self {
            disclosures,
            parser,
            extractor,
            work_dir: std::env::temp_dir(),
        }
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// 문서에서 재무정보를 추출합니다. 실패는 `success: false`와 메시지로 표현됩니다.
    pub async fn extract(&self, request: &DocumentRequest) -> DocumentExtraction {
        let span = fin_core::company_span!("document_extraction", request.corp_code);
        async {
            info!(rcept_no = %request.rcept_no, report_nm = %request.report_nm, "공시문서 재무정보 추출 시작");

            let mut result = DocumentExtraction::base(request);
            match self.run(request).await {
                Ok((items, fs_structure)) => {
                    info!(items = items.len(), "공시문서 재무정보 추출 완료");
                    result.ratios = calculate_ratios(&items);
                    result.items = items;
                    result.fs_structure = Some(fs_structure);
                    result.success = true;
                }
                Err(e) => {
                    error!(error = %e, rcept_no = %request.rcept_no, "공시문서 재무정보 추출 실패");
                    result.error = Some(match e {
                        PipelineError::TempFile(_) | PipelineError::InvalidYear(_) => {
                            format!("재무정보 추출 실패: {}", e)
                        }
                        other => other.to_string(),
                    });
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        request: &DocumentRequest,
    ) -> Result<(Vec<NormalizedFinancialItem>, FsStructure), PipelineError> {
        let path = scratch_path(
            &self.work_dir,
            &format!("{}_{}_", request.corp_code, request.rcept_no),
            ".pdf",
        )?;

        self.disclosures
            .download_document_pdf(&request.rcept_no, &path)
            .await
            .map_err(|e| PipelineError::Download(e.into()))?;

        let parser = self.parser.as_ref().ok_or(PipelineError::ParserUnavailable)?;
        let parsed = parser
            .parse_document(&path)
            .await
            .map_err(PipelineError::Extraction)?;

        let extracted = self
            .extractor
            .extract_from_elements(&parsed, &request.corp_name, &request.report_nm)
            .await
            .map_err(PipelineError::Extraction)?;

        let fs_structure = FsStructure::from_report_name(&request.report_nm);
        let year = parse_year(&report_year(&request.report_nm))?;
        let records = to_standard_records(&extracted, year, &request.rcept_no, &request.corp_code);

        Ok((normalize_accounts(records), fs_structure))
    }
}
