//! 다중 회사 조회 통계.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 비교 조회 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchStats {
    /// 총 조회 횟수 (회사 × 연도)
    pub total: usize,
    /// 성공 횟수
    pub success: usize,
    /// 에러 횟수
    pub errors: usize,
    /// 빈 데이터 (조회 성공, 데이터 없음)
    pub empty: usize,
    /// 수집된 총 항목 수
    pub total_items: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl FetchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 다른 통계를 합칩니다 (소요 시간 제외).
    pub fn merge(&mut self, other: &FetchStats) {
        self.total += other.total;
        self.success += other.success;
        self.errors += other.errors;
        self.empty += other.empty;
        self.total_items += other.total_items;
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            empty = self.empty,
            total_items = self.total_items,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "조회 완료"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_and_merge() {
        let mut stats = FetchStats::new();
        assert_eq!(stats.success_rate(), 0.0);

        stats.merge(&FetchStats {
            total: 3,
            success: 2,
            errors: 1,
            total_items: 12,
            ..Default::default()
        });
        stats.merge(&FetchStats {
            total: 1,
            empty: 1,
            ..Default::default()
        });

        assert_eq!(stats.total, 4);
        assert_eq!(stats.success_rate(), 50.0);
        assert_eq!(stats.total_items, 12);
    }
}
