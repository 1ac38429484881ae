//! 재무비율 타입.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::account::AccountCategory;
use super::period::{Period, PeriodValues};

/// 고정된 6개 재무비율.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatioKind {
    /// 영업이익률 = 영업이익 / 매출액
    #[serde(rename = "영업이익률")]
    OperatingMargin,
    /// 순이익률 = 당기순이익 / 매출액
    #[serde(rename = "순이익률")]
    NetMargin,
    /// ROE = 당기순이익 / 자본총계
    #[serde(rename = "ROE")]
    Roe,
    /// ROA = 당기순이익 / 자산총계
    #[serde(rename = "ROA")]
    Roa,
    /// 부채비율 = 부채총계 / 자본총계
    #[serde(rename = "부채비율")]
    DebtToEquity,
    /// 자기자본비율 = 자본총계 / 자산총계
    #[serde(rename = "자기자본비율")]
    EquityRatio,
}

impl RatioKind {
    pub const ALL: [RatioKind; 6] = [
        RatioKind::OperatingMargin,
        RatioKind::NetMargin,
        RatioKind::Roe,
        RatioKind::Roa,
        RatioKind::DebtToEquity,
        RatioKind::EquityRatio,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RatioKind::OperatingMargin => "영업이익률",
            RatioKind::NetMargin => "순이익률",
            RatioKind::Roe => "ROE",
            RatioKind::Roa => "ROA",
            RatioKind::DebtToEquity => "부채비율",
            RatioKind::EquityRatio => "자기자본비율",
        }
    }

    /// 분자 계정.
    pub fn numerator(self) -> AccountCategory {
        match self {
            RatioKind::OperatingMargin => AccountCategory::OperatingIncome,
            RatioKind::NetMargin | RatioKind::Roe | RatioKind::Roa => AccountCategory::NetIncome,
            RatioKind::DebtToEquity => AccountCategory::TotalLiabilities,
            RatioKind::EquityRatio => AccountCategory::TotalEquity,
        }
    }

    /// 분모 계정.
    pub fn denominator(self) -> AccountCategory {
        match self {
            RatioKind::OperatingMargin | RatioKind::NetMargin => AccountCategory::Revenue,
            RatioKind::Roe | RatioKind::DebtToEquity => AccountCategory::TotalEquity,
            RatioKind::Roa | RatioKind::EquityRatio => AccountCategory::TotalAssets,
        }
    }
}

impl fmt::Display for RatioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 비율별 기간 값 (백분율, 소수점 둘째 자리 반올림).
///
/// JSON으로는 `{"영업이익률": {"thstrm": 10.0, ...}, ...}` 형태입니다.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioSet(pub BTreeMap<RatioKind, PeriodValues<f64>>);

impl RatioSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: RatioKind, values: PeriodValues<f64>) {
        self.0.insert(kind, values);
    }

    pub fn get(&self, kind: RatioKind) -> Option<&PeriodValues<f64>> {
        self.0.get(&kind)
    }

    /// 특정 비율/기간 값. 없으면 0.0.
    pub fn value(&self, kind: RatioKind, period: Period) -> f64 {
        self.get(kind).map(|v| *v.get(period)).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RatioKind, &PeriodValues<f64>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_definitions() {
        assert_eq!(RatioKind::Roe.numerator(), AccountCategory::NetIncome);
        assert_eq!(RatioKind::Roe.denominator(), AccountCategory::TotalEquity);
        assert_eq!(
            RatioKind::EquityRatio.numerator(),
            AccountCategory::TotalEquity
        );
        assert_eq!(
            RatioKind::DebtToEquity.numerator(),
            AccountCategory::TotalLiabilities
        );
    }

    #[test]
    fn test_ratio_set_serialize_keys() {
        let mut set = RatioSet::new();
        set.insert(RatioKind::OperatingMargin, PeriodValues::splat(10.0));
        set.insert(RatioKind::Roe, PeriodValues::splat(5.5));

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["영업이익률"]["thstrm"], 10.0);
        assert_eq!(json["ROE"]["bfefrmtrm"], 5.5);

        let back: RatioSet = serde_json::from_value(json).unwrap();
        assert_eq!(back.value(RatioKind::Roe, Period::Prior), 5.5);
        assert_eq!(back.value(RatioKind::Roa, Period::Prior), 0.0);
    }
}
