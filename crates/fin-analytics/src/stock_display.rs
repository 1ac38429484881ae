//! 시세 스냅샷 표시용 포맷팅.
//!
//! 금액은 천 단위 구분자와 "원", 비율은 소수점 둘째 자리와 "배"/"%"를 붙입니다.
//! 값이 없거나 0이면 "-"입니다.

use fin_core::{MarketSnapshot, YearEndFundamental};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

const EMPTY: &str = "-";
const TRILLION: f64 = 1_000_000_000_000.0;
const HUNDRED_MILLION: f64 = 100_000_000.0;

/// 표시용 시세 문자열.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockDisplay {
    pub current_price: String,
    pub change: String,
    pub volume: String,
    pub market_cap: String,
    pub week52_range: String,
    pub open_price: String,
    pub high_price: String,
    pub low_price: String,
    pub prev_close: String,
    pub shares: String,
    pub per: String,
    pub pbr: String,
    pub eps: String,
    pub bps: String,
    pub div_yield: String,
    pub data_date: String,
    pub data_date_label: String,
    pub year_end_label: String,
    pub year_end_per: String,
    pub year_end_pbr: String,
    pub year_end_eps: String,
    pub year_end_bps: String,
    pub year_end_div_yield: String,
    pub year_end_date: String,
}

/// 정수 부분에 천 단위 구분자를 넣습니다.
///
/// ```
/// use fin_analytics::stock_display::group_thousands;
///
/// assert_eq!(group_thousands(1234567), "1,234,567");
/// assert_eq!(group_thousands(-1000), "-1,000");
/// ```
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

fn non_zero(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

fn won(value: Option<Decimal>) -> String {
    non_zero(value)
        .and_then(|v| v.trunc().to_i64())
        .map(|v| format!("{}원", group_thousands(v)))
        .unwrap_or_else(|| EMPTY.to_string())
}

fn times(value: Option<Decimal>) -> String {
    non_zero(value)
        .map(|v| format!("{:.2}배", v.round_dp(2)))
        .unwrap_or_else(|| EMPTY.to_string())
}

fn percent(value: Option<Decimal>) -> String {
    non_zero(value)
        .map(|v| format!("{:.2}%", v.round_dp(2)))
        .unwrap_or_else(|| EMPTY.to_string())
}

fn market_cap(value: Option<Decimal>) -> String {
    let Some(cap) = non_zero(value).and_then(|v| v.to_f64()) else {
        return EMPTY.to_string();
    };
    if cap >= TRILLION {
        format!("{:.1}조원", cap / TRILLION)
    } else if cap >= HUNDRED_MILLION {
        format!("{}억원", group_thousands((cap / HUNDRED_MILLION).round() as i64))
    } else {
        format!("{}원", group_thousands(cap as i64))
    }
}

fn dashed_date(date: &str) -> Option<String> {
    if date.len() == 8 && date.is_ascii() {
        Some(format!("{}-{}-{}", &date[..4], &date[4..6], &date[6..8]))
    } else {
        None
    }
}

fn date_label(date: &str) -> Option<String> {
    if date.len() != 8 || !date.is_ascii() {
        return None;
    }
    let month: u32 = date[4..6].parse().ok()?;
    let day: u32 = date[6..8].parse().ok()?;
    Some(format!("{}년 {}월 {}일 값", &date[..4], month, day))
}

fn change(snapshot: &MarketSnapshot) -> String {
    match (snapshot.change, snapshot.change_rate) {
        (Some(change), Some(rate)) => {
            let sign = if change.is_sign_negative() && !change.is_zero() {
                ""
            } else {
                "+"
            };
            let amount = change.trunc().to_i64().unwrap_or_default();
            format!(
                "{}{}원 ({}{:.2}%)",
                sign,
                group_thousands(amount),
                sign,
                rate.round_dp(2)
            )
        }
        _ => EMPTY.to_string(),
    }
}

/// 스냅샷을 표시용 문자열로 변환합니다.
pub fn format_stock_display(snapshot: &MarketSnapshot) -> StockDisplay {
    let week52_range = match (non_zero(snapshot.high_52week), non_zero(snapshot.low_52week)) {
        (Some(high), Some(low)) => format!("{} ~ {}", won(Some(low)), won(Some(high))),
        _ => EMPTY.to_string(),
    };
    let data_date = snapshot.data_date.as_deref().unwrap_or_default();
    let year_end = snapshot.year_end.clone().unwrap_or_default();
    let year_end_found = year_end.is_found();

    let YearEndFundamental {
        per,
        pbr,
        eps,
        bps,
        dividend_yield,
        data_year,
        data_date: year_end_date,
    } = year_end;

    StockDisplay {
        current_price: won(snapshot.price),
        change: change(snapshot),
        volume: snapshot
            .volume
            .filter(|v| *v != 0)
            .map(|v| format!("{}주", group_thousands(v)))
            .unwrap_or_else(|| EMPTY.to_string()),
        market_cap: market_cap(snapshot.market_cap),
        week52_range,
        open_price: won(snapshot.open_price),
        high_price: won(snapshot.high_price),
        low_price: won(snapshot.low_price),
        prev_close: won(snapshot.prev_close),
        shares: snapshot
            .shares
            .filter(|v| *v != 0)
            .map(|v| format!("{}주", group_thousands(v)))
            .unwrap_or_else(|| EMPTY.to_string()),
        per: times(snapshot.per),
        pbr: times(snapshot.pbr),
        eps: won(snapshot.eps),
        bps: won(snapshot.bps),
        div_yield: percent(snapshot.dividend_yield),
        data_date: dashed_date(data_date).unwrap_or_else(|| EMPTY.to_string()),
        data_date_label: date_label(data_date).unwrap_or_else(|| "값".to_string()),
        year_end_label: match data_year.filter(|_| year_end_found) {
            Some(year) => format!("{} 년말 지표", year),
            None => "년말 지표".to_string(),
        },
        year_end_per: times(per),
        year_end_pbr: times(pbr),
        year_end_eps: won(eps),
        year_end_bps: won(bps),
        year_end_div_yield: percent(dividend_yield),
        year_end_date: year_end_date
            .as_deref()
            .and_then(dashed_date)
            .unwrap_or_else(|| EMPTY.to_string()),
    }
}
