//! 공시 원문(HTML)에서 재무제표 테이블 추출.
//!
//! 재무제표 키워드가 들어 있는 `<table>`만 골라 행 구조를 유지한 텍스트로 바꿉니다.
//! 각 행은 셀을 ` | `로, 행은 줄바꿈으로 잇습니다.

use encoding_rs::EUC_KR;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};

/// 재무제표 테이블 식별 키워드.
pub const FINANCIAL_TABLE_KEYWORDS: [&str; 10] = [
    "재무상태표",
    "재무 상태표",
    "대차대조표",
    "손익계산서",
    "손익 계산서",
    "포괄손익계산서",
    "자산총계",
    "부채총계",
    "자본총계",
    "매출액",
];

/// 사용할 최대 테이블 수.
pub const MAX_FINANCIAL_TABLES: usize = 10;

/// 테이블 구분자.
pub const TABLE_SEPARATOR: &str = "\n\n---테이블 구분---\n\n";

/// HTML 문서에서 재무제표 테이블 텍스트를 추출합니다.
///
/// 해당 테이블이 없으면 빈 문자열입니다.
pub fn extract_financial_tables(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td, th")?;

    let mut total_tables = 0usize;
    let mut financial_tables = Vec::new();

    for (idx, table) in document.select(&table_selector).enumerate() {
        total_tables += 1;
        let table_text = joined_text(table, " ");

        if FINANCIAL_TABLE_KEYWORDS
            .iter()
            .any(|keyword| table_text.contains(keyword))
        {
            debug!(table_index = idx, "재무제표 테이블 식별");
            financial_tables.push(table_to_text(table, &row_selector, &cell_selector));
        }
    }

    if financial_tables.is_empty() {
        warn!(total_tables = total_tables, "키워드에 맞는 재무제표 테이블 없음");
        return Ok(String::new());
    }

    let used = financial_tables.len().min(MAX_FINANCIAL_TABLES);
    let combined = financial_tables[..used].join(TABLE_SEPARATOR);

    info!(
        total_tables = total_tables,
        financial_tables = financial_tables.len(),
        used = used,
        length = combined.chars().count(),
        "재무제표 테이블 추출 완료"
    );
    Ok(combined)
}

/// 테이블 한 개를 텍스트로 변환. 셀이 없는 행은 건너뜁니다.
fn table_to_text(table: ElementRef<'_>, row_selector: &Selector, cell_selector: &Selector) -> String {
    table
        .select(row_selector)
        .filter_map(|tr| {
            let cells: Vec<String> = tr.select(cell_selector).map(|td| joined_text(td, "")).collect();
            if cells.is_empty() {
                None
            } else {
                Some(cells.join(" | "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 텍스트 노드를 각각 trim한 뒤 빈 조각을 버리고 구분자로 잇습니다.
fn joined_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DataError::Parse(format!("CSS 선택자 오류 ({}): {}", css, e)))
}

/// 공시 원문 바이트를 문자열로 디코딩합니다.
///
/// UTF-8을 먼저 시도하고, 실패하면 구형 DART 문서의 EUC-KR로 디코딩합니다.
/// EUC-KR로도 맞지 않는 바이트는 대체 문자가 됩니다.
pub fn decode_document(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, had_errors) = EUC_KR.decode_without_bom_handling(bytes);
            if had_errors {
                warn!(bytes = bytes.len(), "EUC-KR 디코딩 중 잘못된 바이트 대체");
            } else {
                debug!("UTF-8 디코딩 실패, EUC-KR로 디코딩");
            }
            text.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <html><body>
          <table><tr><td>목차</td><td>1</td></tr></table>
          <table>
            <tr><th>과 목</th><th>제 10 기</th><th>제 9 기</th></tr>
            <tr><td> 자산총계 </td><td>1,000</td><td>900</td></tr>
            <tr></tr>
            <tr><td>부채총계</td><td><span>400</span></td><td>350</td></tr>
          </table>
          <table><tr><td>재무 상태표</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn test_extracts_only_financial_tables() {
        let text = extract_financial_tables(SAMPLE).unwrap();
        let tables: Vec<&str> = text.split(TABLE_SEPARATOR).collect();

        assert_eq!(tables.len(), 2);
        assert_eq!(
            tables[0],
            "과 목 | 제 10 기 | 제 9 기\n자산총계 | 1,000 | 900\n부채총계 | 400 | 350"
        );
        assert_eq!(tables[1], "재무 상태표");
        assert!(!text.contains("목차"));
    }

    #[test]
    fn test_caps_table_count() {
        let html: String = (0..15)
            .map(|i| format!("<table><tr><td>매출액</td><td>{}</td></tr></table>", i))
            .collect();

        let text = extract_financial_tables(&html).unwrap();
        assert_eq!(text.split(TABLE_SEPARATOR).count(), MAX_FINANCIAL_TABLES);
        assert!(text.contains("매출액 | 9"));
        assert!(!text.contains("매출액 | 10"));
    }

    #[test]
    fn test_no_financial_tables() {
        let text = extract_financial_tables("<table><tr><td>주주총회</td></tr></table>").unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_decode_document_utf8_and_euc_kr() {
        assert_eq!(decode_document("자산".as_bytes()), "자산");
        // "자산a" (EUC-KR)
        assert_eq!(decode_document(&[0xC0, 0xDA, 0xBB, 0xEA, b'a']), "자산a");
    }

    #[test]
    fn test_euc_kr_document_tables() {
        let html = "<html><body><table>\
            <tr><th>과목</th><th>제 10 기</th></tr>\
            <tr><td>자산총계</td><td>1,000</td></tr>\
            <tr><td>부채총계</td><td>400</td></tr>\
            </table></body></html>";
        let (bytes, _, had_errors) = EUC_KR.encode(html);
        assert!(!had_errors);
        assert!(std::str::from_utf8(&bytes).is_err());

        let text = extract_financial_tables(&decode_document(&bytes)).unwrap();
        assert_eq!(text, "과목 | 제 10 기\n자산총계 | 1,000\n부채총계 | 400");
    }

    #[test]
    fn test_decode_document_invalid_bytes() {
        let decoded = decode_document(&[0xFF, 0xFF, b'a']);
        assert!(decoded.ends_with('a'));
        assert!(decoded.contains('\u{FFFD}'));
    }
}
