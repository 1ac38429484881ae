//! PER/PBR 밸류에이션 결과.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::period::PeriodValues;

/// "N/A" 표기
pub const NOT_AVAILABLE: &str = "N/A";
/// 계산 오류 표기
pub const ERROR_MARKER: &str = "오류";

/// 기간별 밸류에이션 값.
///
/// 직렬화 시 값은 소수점 둘째 자리 문자열, 나머지는 "N/A" 또는 "오류"입니다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValuationCell {
    Value(f64),
    NotAvailable,
    Error,
}

impl ValuationCell {
    /// 분모가 양수일 때만 값을 계산합니다.
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator > 0.0 {
            let value = numerator / denominator;
            if value.is_finite() {
                return ValuationCell::Value(value);
            }
        }
        ValuationCell::NotAvailable
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ValuationCell::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ValuationCell::Value(_))
    }
}

impl fmt::Display for ValuationCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValuationCell::Value(v) => write!(f, "{:.2}", v),
            ValuationCell::NotAvailable => f.write_str(NOT_AVAILABLE),
            ValuationCell::Error => f.write_str(ERROR_MARKER),
        }
    }
}

impl Serialize for ValuationCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ValuationCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            NOT_AVAILABLE => ValuationCell::NotAvailable,
            ERROR_MARKER => ValuationCell::Error,
            other => other
                .parse::<f64>()
                .map(ValuationCell::Value)
                .unwrap_or(ValuationCell::NotAvailable),
        })
    }
}

/// PER/PBR 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    #[serde(rename = "PER")]
    pub per: PeriodValues<ValuationCell>,
    #[serde(rename = "PBR")]
    pub pbr: PeriodValues<ValuationCell>,
    /// 값이 없거나 오류인 이유
    pub note: Option<String>,
}

impl ValuationResult {
    /// 모든 기간이 "N/A"인 결과.
    pub fn unavailable(note: impl Into<String>) -> Self {
        Self {
            per: PeriodValues::splat(ValuationCell::NotAvailable),
            pbr: PeriodValues::splat(ValuationCell::NotAvailable),
            note: Some(note.into()),
        }
    }

    /// 모든 기간이 "오류"인 결과.
    pub fn error(note: impl Into<String>) -> Self {
        Self {
            per: PeriodValues::splat(ValuationCell::Error),
            pbr: PeriodValues::splat(ValuationCell::Error),
            note: Some(note.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_ratio() {
        assert_eq!(ValuationCell::ratio(70000.0, 0.0), ValuationCell::NotAvailable);
        assert_eq!(ValuationCell::ratio(70000.0, -10.0), ValuationCell::NotAvailable);
        assert_eq!(ValuationCell::ratio(70000.0, 7000.0), ValuationCell::Value(10.0));
    }

    #[test]
    fn test_cell_serialize() {
        let result = ValuationResult {
            per: PeriodValues {
                thstrm: ValuationCell::Value(12.346),
                frmtrm: ValuationCell::NotAvailable,
                bfefrmtrm: ValuationCell::Value(8.0),
            },
            pbr: PeriodValues::splat(ValuationCell::Error),
            note: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["PER"]["thstrm"], "12.35");
        assert_eq!(json["PER"]["frmtrm"], "N/A");
        assert_eq!(json["PER"]["bfefrmtrm"], "8.00");
        assert_eq!(json["PBR"]["thstrm"], "오류");
        assert!(json["note"].is_null());
    }

    #[test]
    fn test_unavailable() {
        let result = ValuationResult::unavailable("비상장 회사");
        assert_eq!(result.note.as_deref(), Some("비상장 회사"));
        assert!(result.per.iter().all(|(_, c)| !c.is_available()));
    }
}
