//! 문서 파싱 결과(요소 목록)에서 재무제표 텍스트 추출.

use serde::{Deserialize, Serialize};
use tracing::info;

/// 재무제표 관련 문단 키워드.
pub const FINANCIAL_PARAGRAPH_KEYWORDS: [&str; 6] = [
    "재무상태표",
    "손익계산서",
    "포괄손익계산서",
    "자산총계",
    "부채총계",
    "매출액",
];

/// 사용할 최대 요소 수.
pub const MAX_DOCUMENT_ELEMENTS: usize = 50;

/// 문서 파싱 결과.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    #[serde(default)]
    pub elements: Vec<DocumentElement>,
}

/// 문서 요소 (테이블, 문단 등).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentElement {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub text: String,
}

impl DocumentElement {
    /// 재무 추출에 사용할 텍스트. 테이블은 HTML, 키워드가 있는 문단은 텍스트입니다.
    fn financial_text(&self) -> Option<&str> {
        match self.category.as_str() {
            "table" => Some(self.html.as_str()),
            "paragraph"
                if FINANCIAL_PARAGRAPH_KEYWORDS
                    .iter()
                    .any(|keyword| self.text.contains(keyword)) =>
            {
                Some(self.text.as_str())
            }
            _ => None,
        }
    }
}

impl ParsedDocument {
    /// 재무제표 관련 요소만 모아 빈 줄로 잇습니다 (최대 50개).
    ///
    /// 해당 요소가 없으면 `None`입니다.
    pub fn financial_text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .elements
            .iter()
            .filter_map(DocumentElement::financial_text)
            .collect();

        if texts.is_empty() {
            return None;
        }

        let used = texts.len().min(MAX_DOCUMENT_ELEMENTS);
        info!(
            elements = self.elements.len(),
            financial = texts.len(),
            used = used,
            "문서 요소에서 재무제표 텍스트 추출"
        );
        Some(texts[..used].join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(category: &str, html: &str, text: &str) -> DocumentElement {
        DocumentElement {
            category: category.to_string(),
            html: html.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_financial_text_filters_elements() {
        let doc = ParsedDocument {
            elements: vec![
                element("heading1", "<h1>감사보고서</h1>", "감사보고서"),
                element("table", "<table><tr><td>자산총계</td></tr></table>", "자산총계"),
                element("paragraph", "", "회사의 개요"),
                element("paragraph", "", "별첨 재무상태표는 다음과 같습니다"),
            ],
        };

        let text = doc.financial_text().unwrap();
        assert_eq!(
            text,
            "<table><tr><td>자산총계</td></tr></table>\n\n별첨 재무상태표는 다음과 같습니다"
        );
    }

    #[test]
    fn test_financial_text_caps_and_empty() {
        let doc = ParsedDocument {
            elements: (0..60).map(|i| element("table", &format!("<t{}>", i), "")).collect(),
        };
        let text = doc.financial_text().unwrap();
        assert_eq!(text.split("\n\n").count(), MAX_DOCUMENT_ELEMENTS);

        assert!(ParsedDocument::default().financial_text().is_none());
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let doc: ParsedDocument =
            serde_json::from_str(r#"{"elements":[{"category":"table","html":"<table/>"}],"api":"2.0"}"#)
                .unwrap();
        assert_eq!(doc.elements[0].text, "");
    }
}
