//! 하위 명령 실행 모듈.
//!
//! 각 함수는 서비스를 호출하고 출력할 JSON 값을 돌려줍니다.

pub mod briefing;
pub mod company;
pub mod documents;
pub mod financials;

pub use briefing::{briefing_service, generate_briefing};
pub use company::{refresh_companies, search_companies};
pub use documents::{extract_document, list_disclosures, list_financial_documents};
pub use financials::{compare, financials, stock, valuation};

use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// 결과를 stdout에 JSON으로 씁니다. 로그는 stderr로 나가므로 섞이지 않습니다.
pub fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}
