//! 공시 보고서의 3개 비교 기간.
//!
//! 표준 사업보고서는 당기(thstrm), 전기(frmtrm), 전전기(bfefrmtrm) 세 개의
//! 비교 컬럼을 가집니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 비교 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    /// 당기
    #[serde(rename = "thstrm")]
    Current,
    /// 전기
    #[serde(rename = "frmtrm")]
    Prior,
    /// 전전기
    #[serde(rename = "bfefrmtrm")]
    BeforePrior,
}

impl Period {
    /// 보고서 컬럼 순서대로 모든 기간.
    pub const ALL: [Period; 3] = [Period::Current, Period::Prior, Period::BeforePrior];

    /// DART 필드 접두사 (thstrm, frmtrm, bfefrmtrm).
    pub fn key(self) -> &'static str {
        match self {
            Period::Current => "thstrm",
            Period::Prior => "frmtrm",
            Period::BeforePrior => "bfefrmtrm",
        }
    }

    /// 한글 표기.
    pub fn label(self) -> &'static str {
        match self {
            Period::Current => "당기",
            Period::Prior => "전기",
            Period::BeforePrior => "전전기",
        }
    }

    /// 사업연도 기준 이 기간의 연도 차이 (당기 0, 전기 1, 전전기 2).
    pub fn years_back(self) -> i32 {
        match self {
            Period::Current => 0,
            Period::Prior => 1,
            Period::BeforePrior => 2,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 기간별 값 (당기/전기/전전기).
///
/// JSON으로는 `{"thstrm": .., "frmtrm": .., "bfefrmtrm": ..}` 형태입니다.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodValues<T> {
    pub thstrm: T,
    pub frmtrm: T,
    pub bfefrmtrm: T,
}

impl<T> PeriodValues<T> {
    /// 기간마다 함수를 적용하여 생성합니다.
    pub fn from_fn(mut f: impl FnMut(Period) -> T) -> Self {
        Self {
            thstrm: f(Period::Current),
            frmtrm: f(Period::Prior),
            bfefrmtrm: f(Period::BeforePrior),
        }
    }

    /// 세 기간 모두 같은 값.
    pub fn splat(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            thstrm: value.clone(),
            frmtrm: value.clone(),
            bfefrmtrm: value,
        }
    }

    pub fn get(&self, period: Period) -> &T {
        match period {
            Period::Current => &self.thstrm,
            Period::Prior => &self.frmtrm,
            Period::BeforePrior => &self.bfefrmtrm,
        }
    }

    /// 컬럼 순서대로 (기간, 값) 순회.
    pub fn iter(&self) -> impl Iterator<Item = (Period, &T)> {
        Period::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PeriodValues<U> {
        PeriodValues::from_fn(|p| f(self.get(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_keys() {
        let keys: Vec<&str> = Period::ALL.iter().map(|p| p.key()).collect();
        assert_eq!(keys, vec!["thstrm", "frmtrm", "bfefrmtrm"]);
        assert_eq!(Period::BeforePrior.years_back(), 2);
    }

    #[test]
    fn test_period_values_serialize() {
        let values = PeriodValues::from_fn(|p| p.years_back() as f64 * 1.5);
        let json = serde_json::to_value(values).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"thstrm": 0.0, "frmtrm": 1.5, "bfefrmtrm": 3.0})
        );
        assert_eq!(*values.get(Period::Prior), 1.5);
    }
}
