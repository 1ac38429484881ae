//! LLM 응답에서 JSON 객체 추출.

/// 텍스트에서 처음으로 균형이 맞는 `{...}` 구간을 찾습니다.
///
/// 문자열 리터럴 안의 중괄호와 이스케이프 문자는 무시합니다.
/// 앞뒤의 설명 문장이나 코드 블록 표시는 잘려 나갑니다.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(end) = matching_brace(bytes, start) {
            return Some(&text[start..=end]);
        }
        search_from = start + 1;
    }
    None
}

/// `start` 위치의 `{`와 짝이 맞는 `}`의 인덱스.
fn matching_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
