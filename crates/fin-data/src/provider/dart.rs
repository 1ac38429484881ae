//! DART OpenAPI 클라이언트.
//!
//! 금융감독원 전자공시시스템(DART) OpenAPI를 통해 회사 목록, 재무제표,
//! 공시 목록, 공시 원문을 조회합니다.
//!
//! # 지원 데이터
//!
//! - 회사 고유번호 목록 (`corpCode.xml`, zip 압축 XML)
//! - 다중회사 주요계정 (`fnlttMultiAcnt.json`)
//! - 공시 검색 (`list.json`)
//! - 공시서류 원본 (`document.xml`) 및 PDF
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use fin_data::provider::DartClient;
//! use fin_core::FsDiv;
//!
//! let client = DartClient::new("YOUR_CRTFC_KEY")?;
//! let records = client
//!     .fetch_financial_statements("00126380", "2023", FsDiv::Consolidated)
//!     .await?;
//! ```

use async_trait::async_trait;
use chrono::{Datelike, Local};
use fin_core::{CompanyInfo, DartConfig, Disclosure, FsDiv, RawFinancialRecord};
use quick_xml::events::Event;
use quick_xml::Reader;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::io::{Cursor, Read};
use std::path::Path;
use std::time::Duration;

use super::{CorpCodeSource, DisclosureProvider};
use crate::error::{DataError, Result};

/// 정상 응답 상태 코드
const STATUS_OK: &str = "000";
/// 조회된 데이터 없음
const STATUS_NO_DATA: &str = "013";
/// 사업보고서 보고서 코드
pub const ANNUAL_REPORT_CODE: &str = "11011";

/// DART OpenAPI 클라이언트.
#[derive(Clone)]
pub struct DartClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    pdf_url: String,
    document_timeout: Duration,
    pdf_timeout: Duration,
}

/// DART 목록형 응답 래퍼.
#[derive(Debug, Deserialize)]
struct DartListResponse<T> {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default = "Vec::new")]
    list: Vec<T>,
}

impl DartClient {
    /// 기본 설정으로 클라이언트를 생성합니다.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let config = DartConfig {
            api_key: Some(SecretString::from(api_key.into())),
            ..DartConfig::default()
        };
        Self::from_config(&config)
    }

    /// 설정에서 클라이언트를 생성합니다. 인증키가 없으면 설정 오류입니다.
    pub fn from_config(config: &DartConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| DataError::Config("DART API 키가 설정되지 않았습니다.".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DataError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pdf_url: config.pdf_url.clone(),
            document_timeout: config.document_timeout(),
            pdf_timeout: config.pdf_timeout(),
        })
    }

    /// Base URL을 바꿉니다 (테스트용 목 서버 등).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// PDF 다운로드 URL을 바꿉니다.
    pub fn with_pdf_url(mut self, pdf_url: impl Into<String>) -> Self {
        self.pdf_url = pdf_url.into();
        self
    }

    fn crtfc_key(&self) -> &str {
        self.api_key.expose_secret().trim()
    }

    /// 목록형 JSON API 요청.
    ///
    /// 상태 코드가 "000"이 아니면 빈 목록을 반환합니다.
    async fn request_list<T: for<'de> Deserialize<'de>>(
        &self,
        api: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, api);

        tracing::debug!(api = api, url = %url, "DART API 요청");

        let response = self
            .client
            .get(&url)
            .query(&[("crtfc_key", self.crtfc_key())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::api(
                status.as_str(),
                format!("DART API 오류 [{}]: {}", api, body),
            ));
        }

        let data: DartListResponse<T> = response.json().await?;

        if data.status != STATUS_OK {
            if data.status == STATUS_NO_DATA {
                tracing::debug!(api = api, "DART 조회 결과 없음");
            } else {
                tracing::warn!(
                    api = api,
                    status = %data.status,
                    message = %data.message,
                    "DART API 비정상 상태"
                );
            }
            return Ok(Vec::new());
        }

        Ok(data.list)
    }

    /// 회사 고유번호 목록을 내려받습니다.
    pub async fn download_corp_codes(&self) -> Result<Vec<CompanyInfo>> {
        let url = format!("{}/corpCode.xml", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("crtfc_key", self.crtfc_key())])
            .send()
            .await
            .map_err(|e| DataError::from(e).context("회사 코드 다운로드 실패"))?;

        if !response.status().is_success() {
            return Err(DataError::api(
                response.status().as_str(),
                "회사 코드 다운로드 실패",
            ));
        }

        let bytes = response.bytes().await?;
        let xml = read_zip_entry(&bytes, "CORPCODE.xml")
            .map_err(|e| e.context("회사 코드 다운로드 실패"))?;
        let companies = parse_corp_codes(&xml)?;

        tracing::info!(count = companies.len(), "회사 코드 다운로드 완료");
        Ok(companies)
    }

    /// 사업보고서 기준 주요계정을 조회합니다.
    ///
    /// 응답 중 요청한 재무제표 구분(fs_div)의 레코드만 반환합니다.
    pub async fn fetch_financial_statements(
        &self,
        corp_code: &str,
        bsns_year: &str,
        fs_div: FsDiv,
    ) -> Result<Vec<RawFinancialRecord>> {
        let params = [
            ("corp_code", corp_code),
            ("bsns_year", bsns_year),
            ("reprt_code", ANNUAL_REPORT_CODE),
        ];

        let records: Vec<RawFinancialRecord> = self
            .request_list("fnlttMultiAcnt.json", &params)
            .await
            .map_err(|e| e.context("재무정보 조회 실패"))?;

        let filtered: Vec<RawFinancialRecord> = records
            .into_iter()
            .filter(|r| r.fs_div == fs_div.code())
            .collect();

        tracing::info!(
            corp_code = corp_code,
            bsns_year = bsns_year,
            fs_div = %fs_div,
            count = filtered.len(),
            "재무정보 조회 완료"
        );
        Ok(filtered)
    }

    /// 해당 연도의 공시 목록을 조회합니다.
    pub async fn list_disclosures(&self, corp_code: &str, bsns_year: &str) -> Result<Vec<Disclosure>> {
        let bgn_de = format!("{}0101", bsns_year);
        let end_de = format!("{}1231", bsns_year);
        let params = [
            ("corp_code", corp_code),
            ("bgn_de", bgn_de.as_str()),
            ("end_de", end_de.as_str()),
            ("page_count", "100"),
        ];

        let disclosures: Vec<Disclosure> = self
            .request_list("list.json", &params)
            .await
            .map_err(|e| e.context("공시 조회 실패"))?;

        tracing::debug!(
            corp_code = corp_code,
            bsns_year = bsns_year,
            count = disclosures.len(),
            "공시 목록 조회 완료"
        );
        Ok(disclosures)
    }

    /// 재무정보가 포함된 공시 문서 목록을 조회합니다.
    ///
    /// 기본 기간은 올해부터 3년 전까지이며 접수일자 내림차순으로 정렬됩니다.
    pub async fn list_financial_documents(
        &self,
        corp_code: &str,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> Result<Vec<Disclosure>> {
        let end_year = end_year.unwrap_or_else(|| Local::now().year());
        let start_year = start_year.unwrap_or(end_year - 3);

        let bgn_de = format!("{}0101", start_year);
        let end_de = format!("{}1231", end_year);
        let params = [
            ("corp_code", corp_code),
            ("bgn_de", bgn_de.as_str()),
            ("end_de", end_de.as_str()),
            ("page_count", "100"),
        ];

        let disclosures: Vec<Disclosure> = self
            .request_list("list.json", &params)
            .await
            .map_err(|e| e.context("재무문서 목록 조회 실패"))?;

        let mut documents: Vec<Disclosure> = disclosures
            .into_iter()
            .filter(Disclosure::is_financial_document)
            .collect();
        documents.sort_by(|a, b| b.rcept_dt.cmp(&a.rcept_dt));

        tracing::info!(
            corp_code = corp_code,
            start_year = start_year,
            end_year = end_year,
            count = documents.len(),
            "재무문서 목록 조회 완료"
        );
        Ok(documents)
    }

    /// 공시서류 원본(HTML/XML)을 내려받아 저장합니다.
    ///
    /// 응답이 zip 압축이면 첫 번째 XML/HTML 항목을 풀어서 저장합니다.
    pub async fn download_document(&self, rcept_no: &str, save_path: &Path) -> Result<()> {
        let url = format!("{}/document.xml", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("crtfc_key", self.crtfc_key()), ("rcept_no", rcept_no)])
            .timeout(self.document_timeout)
            .send()
            .await
            .map_err(|e| DataError::from(e).context("문서 다운로드 실패"))?;

        if !response.status().is_success() {
            return Err(DataError::api(
                response.status().as_str(),
                "문서 다운로드 실패",
            ));
        }

        let bytes = response.bytes().await?;
        let content = if is_zip(&bytes) {
            extract_document_entry(&bytes).map_err(|e| e.context("문서 다운로드 실패"))?
        } else {
            bytes.to_vec()
        };

        write_file(save_path, &content).await?;

        tracing::info!(
            rcept_no = rcept_no,
            path = %save_path.display(),
            size = content.len(),
            "공시문서 다운로드 완료"
        );
        Ok(())
    }

    /// 공시서류 PDF를 내려받아 저장합니다.
    pub async fn download_document_pdf(&self, rcept_no: &str, save_path: &Path) -> Result<()> {
        let response = self
            .client
            .get(&self.pdf_url)
            .query(&[("rcp_no", rcept_no)])
            .timeout(self.pdf_timeout)
            .send()
            .await
            .map_err(|e| DataError::from(e).context("PDF 다운로드 실패"))?;

        if !response.status().is_success() {
            return Err(DataError::api(
                response.status().as_str(),
                "PDF 다운로드 실패",
            ));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let path_is_pdf = save_path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        if !content_type.to_lowercase().contains("pdf") && !path_is_pdf {
            return Err(DataError::InvalidData(format!(
                "PDF 다운로드 실패: 응답이 PDF가 아닙니다 (Content-Type: {})",
                content_type
            )));
        }

        let bytes = response.bytes().await?;
        write_file(save_path, &bytes).await?;

        tracing::info!(
            rcept_no = rcept_no,
            path = %save_path.display(),
            size = bytes.len(),
            "공시문서 PDF 다운로드 완료"
        );
        Ok(())
    }
}

#[async_trait]
impl CorpCodeSource for DartClient {
    async fn download_corp_codes(&self) -> Result<Vec<CompanyInfo>> {
        DartClient::download_corp_codes(self).await
    }
}

#[async_trait]
impl DisclosureProvider for DartClient {
    async fn fetch_financial_statements(
        &self,
        corp_code: &str,
        bsns_year: &str,
        fs_div: FsDiv,
    ) -> Result<Vec<RawFinancialRecord>> {
        DartClient::fetch_financial_statements(self, corp_code, bsns_year, fs_div).await
    }

    async fn list_disclosures(&self, corp_code: &str, bsns_year: &str) -> Result<Vec<Disclosure>> {
        DartClient::list_disclosures(self, corp_code, bsns_year).await
    }

    async fn list_financial_documents(
        &self,
        corp_code: &str,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> Result<Vec<Disclosure>> {
        DartClient::list_financial_documents(self, corp_code, start_year, end_year).await
    }

    async fn download_document(&self, rcept_no: &str, save_path: &Path) -> Result<()> {
        DartClient::download_document(self, rcept_no, save_path).await
    }

    async fn download_document_pdf(&self, rcept_no: &str, save_path: &Path) -> Result<()> {
        DartClient::download_document_pdf(self, rcept_no, save_path).await
    }
}

// ==================== 파일/압축 헬퍼 ====================

/// zip 로컬 파일 헤더 시그니처로 압축 여부를 판별합니다.
fn is_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04")
}

/// zip 아카이브에서 이름으로 항목을 읽어 문자열로 반환합니다.
fn read_zip_entry(bytes: &[u8], name: &str) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut entry = archive.by_name(name)?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// 공시서류 zip에서 본문 항목(.xml/.html/.htm, 없으면 첫 항목)을 꺼냅니다.
fn extract_document_entry(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    if archive.is_empty() {
        return Err(DataError::InvalidData("빈 압축 파일입니다".to_string()));
    }

    let index = archive
        .file_names()
        .position(|name| {
            let lower = name.to_lowercase();
            lower.ends_with(".xml") || lower.ends_with(".html") || lower.ends_with(".htm")
        })
        .unwrap_or(0);

    let mut entry = archive.by_index(index)?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, content).await?;
    Ok(())
}

/// CORPCODE.xml의 `<list>` 항목을 파싱합니다.
///
/// 고유번호나 회사명이 없는 항목은 건너뛰고, 빈 종목코드는 "N/A"가 됩니다.
pub fn parse_corp_codes(xml: &str) -> Result<Vec<CompanyInfo>> {
    #[derive(Default)]
    struct Entry {
        corp_code: String,
        corp_name: String,
        stock_code: String,
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut companies = Vec::new();
    let mut current: Option<Entry> = None;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "list" {
                    current = Some(Entry::default());
                } else {
                    field = Some(name);
                }
            }
            Event::Text(t) => {
                if let (Some(entry), Some(field)) = (current.as_mut(), field.as_deref()) {
                    let text = t.unescape()?;
                    match field {
                        "corp_code" => entry.corp_code.push_str(&text),
                        "corp_name" => entry.corp_name.push_str(&text),
                        "stock_code" => entry.stock_code.push_str(&text),
                        _ => {}
                    }
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"list" {
                    if let Some(entry) = current.take() {
                        let corp_code = entry.corp_code.trim();
                        let corp_name = entry.corp_name.trim();
                        if !corp_code.is_empty() && !corp_name.is_empty() {
                            companies.push(CompanyInfo::new(corp_code, corp_name, &entry.stock_code));
                        }
                    }
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(companies)
}
