//! 회사 식별 정보.

use serde::{Deserialize, Serialize};

/// 비상장 회사의 종목코드 표기.
pub const UNLISTED_STOCK_CODE: &str = "N/A";

/// DART 회사 목록의 한 항목.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// DART 고유번호 (8자리)
    pub corp_code: String,
    /// 회사명
    pub corp_name: String,
    /// 종목코드 (6자리) 또는 "N/A"
    pub stock_code: String,
}

impl CompanyInfo {
    pub fn new(
        corp_code: impl Into<String>,
        corp_name: impl Into<String>,
        stock_code: impl AsRef<str>,
    ) -> Self {
        Self {
            corp_code: corp_code.into(),
            corp_name: corp_name.into(),
            stock_code: normalize_stock_code(stock_code.as_ref()),
        }
    }

    /// 상장 여부. 종목코드가 "N/A"면 비상장입니다.
    pub fn is_listed(&self) -> bool {
        is_listed_stock_code(&self.stock_code)
    }
}

/// 공백 종목코드를 "N/A"로 바꿉니다.
pub fn normalize_stock_code(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNLISTED_STOCK_CODE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 종목코드가 상장 종목을 가리키는지 확인합니다.
pub fn is_listed_stock_code(stock_code: &str) -> bool {
    let trimmed = stock_code.trim();
    !trimmed.is_empty() && trimmed != UNLISTED_STOCK_CODE
}
