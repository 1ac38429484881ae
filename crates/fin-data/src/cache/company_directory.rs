//! 회사 목록 캐시.
//!
//! DART 고유번호 목록은 처음 조회할 때 한 번 내려받아 프로세스가 끝날 때까지 보관합니다.
//! 시간 기반 만료는 없고 `refresh()`로만 다시 내려받습니다.
//! 디스크 캐시 경로가 주어지면 JSON 파일로도 저장해 다음 실행에서 재사용합니다.

use fin_core::{CompanyInfo, FinError, FinResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};
use crate::provider::CorpCodeSource;

/// 회사 목록 디렉터리.
pub struct CompanyDirectory {
    source: Arc<dyn CorpCodeSource>,
    cache_path: Option<PathBuf>,
    companies: RwLock<Option<Arc<Vec<CompanyInfo>>>>,
}

impl CompanyDirectory {
    pub fn new(source: Arc<dyn CorpCodeSource>) -> Self {
        Self {
            source,
            cache_path: None,
            companies: RwLock::new(None),
        }
    }

    /// 디스크 캐시 파일을 지정합니다.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// 전체 회사 목록 (최초 호출 시 적재).
    pub async fn companies(&self) -> FinResult<Arc<Vec<CompanyInfo>>> {
        if let Some(companies) = self.companies.read().await.as_ref() {
            return Ok(Arc::clone(companies));
        }

        let mut guard = self.companies.write().await;
        // 쓰기 잠금을 기다리는 사이 다른 작업이 채웠을 수 있음
        if let Some(companies) = guard.as_ref() {
            return Ok(Arc::clone(companies));
        }

        let companies = match self.read_disk_cache().await {
            Some(cached) => cached,
            None => self.download().await?,
        };
        let companies = Arc::new(companies);
        *guard = Some(Arc::clone(&companies));
        Ok(companies)
    }

    /// 회사 목록을 다시 내려받습니다.
    pub async fn refresh(&self) -> FinResult<Arc<Vec<CompanyInfo>>> {
        let companies = Arc::new(self.download().await?);
        *self.companies.write().await = Some(Arc::clone(&companies));
        info!(count = companies.len(), "회사 목록 갱신 완료");
        Ok(companies)
    }

    /// 회사 검색.
    ///
    /// 회사명 부분 일치(대소문자 무시), 고유번호 일치, 종목코드 일치(상장사만)를 찾습니다.
    /// 상장사가 먼저 오고 같은 그룹 안에서는 이름순입니다.
    pub async fn search(&self, keyword: &str) -> FinResult<Vec<CompanyInfo>> {
        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        let companies = self.companies().await?;
        let results = search_companies(&companies, keyword);
        debug!(keyword = keyword, count = results.len(), "회사 검색");
        Ok(results)
    }

    /// 고유번호로 회사를 찾습니다.
    pub async fn get_by_code(&self, corp_code: &str) -> FinResult<CompanyInfo> {
        let companies = self.companies().await?;
        companies
            .iter()
            .find(|c| c.corp_code == corp_code)
            .cloned()
            .ok_or_else(|| FinError::CompanyNotFound(corp_code.to_string()))
    }

    async fn download(&self) -> FinResult<Vec<CompanyInfo>> {
        let companies = self
            .source
            .download_corp_codes()
            .await
            .map_err(|e| FinError::DartApi(format!("회사 코드 다운로드 실패: {}", e)))?;

        if let Some(path) = &self.cache_path {
            if let Err(e) = write_cache_file(path, &companies).await {
                warn!(path = %path.display(), error = %e, "회사 목록 캐시 저장 실패");
            }
        }

        info!(count = companies.len(), "회사 목록 다운로드 완료");
        Ok(companies)
    }

    async fn read_disk_cache(&self) -> Option<Vec<CompanyInfo>> {
        let path = self.cache_path.as_ref()?;
        match read_cache_file(path).await {
            Ok(companies) if !companies.is_empty() => {
                info!(path = %path.display(), count = companies.len(), "회사 목록 캐시 로드");
                Some(companies)
            }
            Ok(_) => None,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "회사 목록 캐시 없음");
                None
            }
        }
    }
}

/// 목록에서 키워드로 회사를 찾고 정렬합니다.
pub fn search_companies(companies: &[CompanyInfo], keyword: &str) -> Vec<CompanyInfo> {
    if keyword.is_empty() {
        return Vec::new();
    }
    let lowered = keyword.to_lowercase();

    let mut results: Vec<CompanyInfo> = companies
        .iter()
        .filter(|c| {
            c.corp_name.to_lowercase().contains(&lowered)
                || c.corp_code == keyword
                || (c.is_listed() && c.stock_code == keyword)
        })
        .cloned()
        .collect();

    results.sort_by(|a, b| {
        b.is_listed()
            .cmp(&a.is_listed())
            .then_with(|| a.corp_name.cmp(&b.corp_name))
    });
    results
}

async fn read_cache_file(path: &Path) -> Result<Vec<CompanyInfo>> {
    let bytes = tokio::fs::read(path).await?;
    let companies = serde_json::from_slice(&bytes)?;
    Ok(companies)
}

async fn write_cache_file(path: &Path, companies: &[CompanyInfo]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let json = serde_json::to_vec(companies)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| DataError::Cache(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        companies: Vec<CompanyInfo>,
    }

    #[async_trait]
    impl CorpCodeSource for CountingSource {
        async fn download_corp_codes(&self) -> Result<Vec<CompanyInfo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.companies.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl CorpCodeSource for FailingSource {
        async fn download_corp_codes(&self) -> Result<Vec<CompanyInfo>> {
            Err(DataError::Network("connection refused".to_string()))
        }
    }

    fn sample() -> Vec<CompanyInfo> {
        vec![
            CompanyInfo::new("00999999", "삼성테스트비상장", ""),
            CompanyInfo::new("00126380", "삼성전자", "005930"),
            CompanyInfo::new("00164779", "SK하이닉스", "000660"),
            CompanyInfo::new("00149655", "삼성물산", "028260"),
        ]
    }

    fn counting() -> Arc<CountingSource> {
        Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            companies: sample(),
        })
    }

    #[tokio::test]
    async fn test_populate_once_and_refresh() {
        let source = counting();
        let directory = CompanyDirectory::new(source.clone());

        directory.companies().await.unwrap();
        directory.search("삼성").await.unwrap();
        directory.get_by_code("00126380").await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        directory.refresh().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_search_orders_listed_first() {
        let directory = CompanyDirectory::new(counting());

        let results = directory.search("삼성").await.unwrap();
        let names: Vec<&str> = results.iter().map(|c| c.corp_name.as_str()).collect();
        assert_eq!(names, vec!["삼성물산", "삼성전자", "삼성테스트비상장"]);

        assert!(directory.search("").await.unwrap().is_empty());
        assert_eq!(directory.search("sk").await.unwrap()[0].corp_code, "00164779");
        assert_eq!(directory.search("005930").await.unwrap().len(), 1);
        // 비상장사의 "N/A"는 종목코드 검색 대상이 아님
        assert!(directory.search("N/A").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_code_not_found() {
        let directory = CompanyDirectory::new(counting());
        let err = directory.get_by_code("00000000").await.unwrap_err();
        assert!(matches!(err, FinError::CompanyNotFound(_)));
        assert!(err.is_data_absence());
    }

    #[tokio::test]
    async fn test_download_failure_preserves_message() {
        let directory = CompanyDirectory::new(Arc::new(FailingSource));
        let err = directory.companies().await.unwrap_err();
        assert!(matches!(err, FinError::DartApi(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_disk_cache_reused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("corp_codes.json");

        let source = counting();
        let first = CompanyDirectory::new(source.clone()).with_cache_path(&path);
        first.companies().await.unwrap();
        assert!(path.exists());

        let second = CompanyDirectory::new(source.clone()).with_cache_path(&path);
        let companies = second.companies().await.unwrap();
        assert_eq!(companies.len(), 4);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
