//! KRX Open API 클라이언트.
//!
//! 한국거래소(KRX) Open API를 통해 국내 상장 종목의 시세와 가치지표를 수집합니다.
//!
//! # 지원 데이터
//!
//! - 종목 기본 정보 (종목명, 상장주식수)
//! - 전종목 일별 매매정보 (종가, 전일대비, 시가총액)
//! - 가격 지표 (PER, PBR, EPS, BPS, 배당수익률)
//! - 개별 종목 일별 시세 (52주 최고/최저 계산용)
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use fin_data::provider::{KrxApiClient, KrxMarketData, MarketDataProvider};
//!
//! let client = KrxApiClient::new("YOUR_AUTH_KEY")?;
//! let market = KrxMarketData::new(client, 10);
//! let snapshot = market.snapshot("005930").await;
//! ```

use async_trait::async_trait;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use fin_core::{
    is_listed_stock_code, positive_or_none, KrxConfig, MarketDataStatus, MarketSnapshot,
    YearEndFundamental,
};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::MarketDataProvider;
use crate::error::{DataError, Result};

/// KRX Open API 클라이언트.
#[derive(Clone)]
pub struct KrxApiClient {
    client: reqwest::Client,
    auth_key: SecretString,
    base_url: String,
}

/// KRX 종목 기본 정보.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KrxStockInfo {
    /// 단축코드 (6자리)
    pub ticker: String,
    /// 종목명 (한글 약명)
    pub name: String,
    /// 시장 (STK: KOSPI, KSQ: KOSDAQ)
    pub market: KrxMarket,
    /// 상장주식수
    pub shares_outstanding: Option<i64>,
}

/// KRX 가격 지표.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KrxValuation {
    /// 티커
    pub ticker: String,
    /// PER (주가수익비율)
    pub per: Option<Decimal>,
    /// PBR (주가순자산비율)
    pub pbr: Option<Decimal>,
    /// 배당수익률 (%)
    pub dividend_yield: Option<Decimal>,
    /// EPS (주당순이익)
    pub eps: Option<Decimal>,
    /// BPS (주당순자산)
    pub bps: Option<Decimal>,
}

/// KRX OHLCV 데이터.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KrxOhlcv {
    /// 일자
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// 거래량
    pub volume: i64,
}

/// KRX 일별 매매정보 (전종목).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KrxDailyTrade {
    /// 기준일자
    pub date: NaiveDate,
    /// 종목코드
    pub code: String,
    /// 종목명
    pub name: String,
    /// 종가
    pub close: Decimal,
    /// 전일대비
    pub change: Option<Decimal>,
    /// 등락률 (%)
    pub change_rate: Option<Decimal>,
    /// 시가
    pub open: Option<Decimal>,
    /// 고가
    pub high: Option<Decimal>,
    /// 저가
    pub low: Option<Decimal>,
    /// 거래량
    pub volume: i64,
    /// 시가총액
    pub market_cap: Option<Decimal>,
    /// 상장주식수
    pub shares_outstanding: Option<i64>,
}

/// API 응답 래퍼.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(rename = "OutBlock_1")]
    out_block: Option<Vec<T>>,
}

/// 주식 시장 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KrxMarket {
    /// 유가증권시장 (KOSPI)
    #[serde(rename = "STK")]
    Kospi,
    /// 코스닥시장 (KOSDAQ)
    #[serde(rename = "KSQ")]
    Kosdaq,
}

impl KrxMarket {
    pub const ALL: [KrxMarket; 2] = [KrxMarket::Kospi, KrxMarket::Kosdaq];

    /// API ID 접두사.
    fn prefix(self) -> &'static str {
        match self {
            KrxMarket::Kospi => "stk",
            KrxMarket::Kosdaq => "ksq",
        }
    }

    fn api_id(self, suffix: &str) -> String {
        format!("{}_{}", self.prefix(), suffix)
    }
}

impl KrxApiClient {
    /// 기본 설정으로 클라이언트를 생성합니다.
    pub fn new(auth_key: impl Into<String>) -> Result<Self> {
        let config = KrxConfig {
            api_key: Some(SecretString::from(auth_key.into())),
            ..KrxConfig::default()
        };
        Self::from_config(&config)
    }

    /// 설정에서 클라이언트를 생성합니다. 인증키가 없으면 설정 오류입니다.
    pub fn from_config(config: &KrxConfig) -> Result<Self> {
        let auth_key = config
            .api_key
            .clone()
            .ok_or_else(|| DataError::Config("KRX API 키가 설정되지 않았습니다.".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DataError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            auth_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL을 바꿉니다 (테스트용 목 서버 등).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// API 요청 실행.
    ///
    /// AUTH_KEY는 HTTP 헤더로 전달합니다.
    async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        api_id: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/svc/sample/apis/stk/{}", self.base_url, api_id);

        tracing::debug!(api_id = api_id, url = %url, "KRX API 요청");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header("AUTH_KEY", self.auth_key.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::api(
                status.as_str(),
                format!("KRX API 오류 [{}]: {}", api_id, body),
            ));
        }

        let data: ApiResponse<T> = response.json().await?;

        Ok(data.out_block.unwrap_or_default())
    }

    /// 시장별 종목 기본 정보 조회.
    ///
    /// # Arguments
    /// * `base_date` - 기준일 (YYYYMMDD 형식)
    pub async fn fetch_stocks(&self, market: KrxMarket, base_date: &str) -> Result<Vec<KrxStockInfo>> {
        #[derive(Deserialize)]
        struct RawStock {
            #[serde(rename = "ISU_SRT_CD")]
            ticker: String,
            #[serde(rename = "ISU_ABBRV")]
            name: String,
            #[serde(rename = "LIST_SHRS", default)]
            shares: Option<String>,
        }

        let api_id = market.api_id("isu_base_info");
        let raw_stocks: Vec<RawStock> = self.request(&api_id, &[("basDd", base_date)]).await?;

        let stocks: Vec<KrxStockInfo> = raw_stocks
            .into_iter()
            .map(|s| KrxStockInfo {
                ticker: s.ticker,
                name: s.name,
                market,
                shares_outstanding: parse_i64_opt(&s.shares),
            })
            .collect();

        tracing::info!(market = ?market, count = stocks.len(), "종목 기본 정보 조회 완료");
        Ok(stocks)
    }

    /// 전종목 일별 매매정보 조회.
    pub async fn fetch_daily_trades(
        &self,
        market: KrxMarket,
        base_date: &str,
    ) -> Result<Vec<KrxDailyTrade>> {
        #[derive(Deserialize)]
        struct RawDailyTrade {
            #[serde(rename = "BAS_DD")]
            date: String,
            #[serde(rename = "ISU_CD")]
            code: String,
            #[serde(rename = "ISU_NM")]
            name: String,
            #[serde(rename = "TDD_CLSPRC")]
            close: String,
            #[serde(rename = "CMPPREVDD_PRC", default)]
            change: Option<String>,
            #[serde(rename = "FLUC_RT", default)]
            change_rate: Option<String>,
            #[serde(rename = "TDD_OPNPRC", default)]
            open: Option<String>,
            #[serde(rename = "TDD_HGPRC", default)]
            high: Option<String>,
            #[serde(rename = "TDD_LWPRC", default)]
            low: Option<String>,
            #[serde(rename = "ACC_TRDVOL")]
            volume: String,
            #[serde(rename = "MKTCAP", default)]
            market_cap: Option<String>,
            #[serde(rename = "LIST_SHRS", default)]
            shares: Option<String>,
        }

        let api_id = market.api_id("bydd_trd");
        let raw_trades: Vec<RawDailyTrade> = self.request(&api_id, &[("basDd", base_date)]).await?;

        let trades: Vec<KrxDailyTrade> = raw_trades
            .into_iter()
            .filter_map(|t| {
                let date = parse_date_yyyymmdd(&t.date)?;
                let close = t.close.replace(',', "").parse().ok()?;
                let volume = t.volume.replace(',', "").parse().ok()?;
                Some(KrxDailyTrade {
                    date,
                    code: t.code,
                    name: t.name,
                    close,
                    change: parse_decimal_opt(&t.change),
                    change_rate: parse_decimal_opt(&t.change_rate),
                    open: parse_decimal_opt(&t.open),
                    high: parse_decimal_opt(&t.high),
                    low: parse_decimal_opt(&t.low),
                    volume,
                    market_cap: parse_decimal_opt(&t.market_cap),
                    shares_outstanding: parse_i64_opt(&t.shares),
                })
            })
            .collect();

        tracing::debug!(
            api_id = %api_id,
            base_date = base_date,
            count = trades.len(),
            "일별 매매정보 조회 완료"
        );
        Ok(trades)
    }

    /// 종목별 PER/PBR 조회.
    pub async fn fetch_valuation(&self, market: KrxMarket, base_date: &str) -> Result<Vec<KrxValuation>> {
        #[derive(Deserialize)]
        struct RawValuation {
            #[serde(rename = "ISU_SRT_CD", alias = "ISU_CD")]
            ticker: String,
            #[serde(rename = "PER", default)]
            per: Option<String>,
            #[serde(rename = "PBR", default)]
            pbr: Option<String>,
            #[serde(rename = "DVD_YLD", default)]
            dividend_yield: Option<String>,
            #[serde(rename = "EPS", default)]
            eps: Option<String>,
            #[serde(rename = "BPS", default)]
            bps: Option<String>,
        }

        let api_id = market.api_id("isu_per_pbr");
        let raw_valuations: Vec<RawValuation> = self.request(&api_id, &[("basDd", base_date)]).await?;

        let valuations: Vec<KrxValuation> = raw_valuations
            .into_iter()
            .map(|v| KrxValuation {
                ticker: v.ticker,
                per: parse_decimal_opt(&v.per),
                pbr: parse_decimal_opt(&v.pbr),
                dividend_yield: parse_decimal_opt(&v.dividend_yield),
                eps: parse_decimal_opt(&v.eps),
                bps: parse_decimal_opt(&v.bps),
            })
            .collect();

        tracing::debug!(
            market = ?market,
            base_date = base_date,
            count = valuations.len(),
            "가치지표 조회 완료"
        );
        Ok(valuations)
    }

    /// 일별 시세 조회 (개별 종목).
    ///
    /// # Arguments
    /// * `ticker` - 종목코드
    /// * `start_date` - 시작일 (YYYYMMDD)
    /// * `end_date` - 종료일 (YYYYMMDD)
    pub async fn fetch_daily_ohlcv(
        &self,
        ticker: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<KrxOhlcv>> {
        #[derive(Deserialize)]
        struct RawOhlcv {
            #[serde(rename = "TRD_DD")]
            date: String,
            #[serde(rename = "TDD_OPNPRC", default)]
            open: Option<String>,
            #[serde(rename = "TDD_HGPRC", default)]
            high: Option<String>,
            #[serde(rename = "TDD_LWPRC", default)]
            low: Option<String>,
            #[serde(rename = "TDD_CLSPRC", default)]
            close: Option<String>,
            #[serde(rename = "ACC_TRDVOL", default)]
            volume: Option<String>,
        }

        let params = [("isuCd", ticker), ("strtDd", start_date), ("endDd", end_date)];
        let raw_ohlcvs: Vec<RawOhlcv> = self.request("stk_isu_ohlcv", &params).await?;

        let ohlcvs: Vec<KrxOhlcv> = raw_ohlcvs
            .into_iter()
            .filter_map(|o| {
                let date = parse_date_yyyymmdd(&o.date)?;
                Some(KrxOhlcv {
                    date,
                    open: parse_decimal_opt(&o.open).unwrap_or_default(),
                    high: parse_decimal_opt(&o.high).unwrap_or_default(),
                    low: parse_decimal_opt(&o.low).unwrap_or_default(),
                    close: parse_decimal_opt(&o.close).unwrap_or_default(),
                    volume: parse_i64_opt(&o.volume).unwrap_or(0),
                })
            })
            .collect();

        tracing::debug!(ticker = ticker, count = ohlcvs.len(), "일별 시세 조회 완료");
        Ok(ohlcvs)
    }

    /// 모든 종목 기본 정보 조회 (KOSPI + KOSDAQ).
    pub async fn fetch_all_stocks(&self, base_date: &str) -> Result<Vec<KrxStockInfo>> {
        let (kospi_result, kosdaq_result) = tokio::join!(
            self.fetch_stocks(KrxMarket::Kospi, base_date),
            self.fetch_stocks(KrxMarket::Kosdaq, base_date),
        );

        let mut all = kospi_result?;
        all.extend(kosdaq_result?);

        tracing::info!(total = all.len(), "전종목 기본 정보 조회 완료");
        Ok(all)
    }
}

// ==================== Market Data Provider ====================

/// KRX 기반 시장 데이터 Provider.
///
/// 회사명 검색용 종목 목록은 한 번 내려받은 뒤 메모리에 보관합니다.
pub struct KrxMarketData {
    client: KrxApiClient,
    /// 최근 영업일 탐색 시 거슬러 올라갈 최대 일수
    lookback_days: u32,
    listing: Arc<RwLock<Option<Vec<KrxStockInfo>>>>,
}

/// 한 종목의 하루치 조회 결과.
struct TradeHit {
    market: KrxMarket,
    date: NaiveDate,
    trade: KrxDailyTrade,
}

impl KrxMarketData {
    pub fn new(client: KrxApiClient, lookback_days: u32) -> Self {
        Self {
            client,
            lookback_days,
            listing: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_config(config: &KrxConfig) -> Result<Self> {
        Ok(Self::new(
            KrxApiClient::from_config(config)?,
            config.business_day_lookback,
        ))
    }

    /// 기준일로부터 가장 최근 거래일의 매매정보를 찾습니다.
    ///
    /// 두 시장 모두 행이 없는 날(휴장일)은 하루씩 거슬러 올라갑니다.
    /// 거래일인데 종목이 없으면 `None`입니다.
    async fn find_trade(&self, ticker: &str, today: NaiveDate) -> Result<Option<TradeHit>> {
        let mut date = latest_business_date(today);

        for _ in 0..=self.lookback_days {
            let base_date = format_yyyymmdd(date);
            let mut any_rows = false;

            for market in KrxMarket::ALL {
                let trades = self.client.fetch_daily_trades(market, &base_date).await?;
                any_rows |= !trades.is_empty();
                if let Some(trade) = trades.into_iter().find(|t| t.code == ticker) {
                    return Ok(Some(TradeHit { market, date, trade }));
                }
            }

            if any_rows {
                return Ok(None);
            }
            tracing::debug!(base_date = %base_date, "휴장일, 이전 영업일 조회");
            date = previous_business_date(date);
        }

        Ok(None)
    }

    /// 기준일 스냅샷 (테스트에서 기준일을 고정할 수 있도록 분리).
    pub async fn snapshot_at(&self, stock_code: &str, today: NaiveDate) -> MarketSnapshot {
        if !is_listed_stock_code(stock_code) {
            return MarketSnapshot::no_data("비상장 회사");
        }

        let hit = match self.find_trade(stock_code, today).await {
            Ok(Some(hit)) => hit,
            Ok(None) => {
                tracing::info!(stock_code = stock_code, "KRX 시세 없음");
                return MarketSnapshot::no_data("KRX에서 시세를 찾을 수 없습니다");
            }
            Err(e) => {
                tracing::warn!(stock_code = stock_code, error = %e, "KRX 시세 조회 실패");
                return MarketSnapshot::error(format!("조회 실패: {}", e));
            }
        };

        let base_date = format_yyyymmdd(hit.date);
        let trade = hit.trade;

        let valuation = match self.client.fetch_valuation(hit.market, &base_date).await {
            Ok(rows) => rows.into_iter().find(|v| v.ticker == stock_code),
            Err(e) => {
                tracing::warn!(stock_code = stock_code, error = %e, "가치지표 조회 실패");
                None
            }
        };

        let start_52w = format_yyyymmdd(hit.date - Duration::weeks(52));
        let (high_52week, low_52week) =
            match self.client.fetch_daily_ohlcv(stock_code, &start_52w, &base_date).await {
                Ok(rows) if !rows.is_empty() => (
                    rows.iter().map(|o| o.high).max(),
                    rows.iter().map(|o| o.low).filter(|l| !l.is_zero()).min(),
                ),
                Ok(_) => (None, None),
                Err(e) => {
                    tracing::warn!(stock_code = stock_code, error = %e, "52주 시세 조회 실패");
                    (None, None)
                }
            };

        let prev_close = trade.change.map(|c| trade.close - c);
        let shares = trade.shares_outstanding.filter(|s| *s > 0);
        let status = if shares.is_some() {
            MarketDataStatus::Success
        } else {
            MarketDataStatus::Partial
        };
        let valuation = valuation.unwrap_or_default();

        tracing::info!(
            stock_code = stock_code,
            base_date = %base_date,
            price = %trade.close,
            status = ?status,
            "KRX 시세 조회 완료"
        );

        MarketSnapshot {
            status,
            stock_code: Some(stock_code.to_string()),
            price: Some(trade.close),
            change: trade.change,
            change_rate: trade.change_rate,
            open_price: trade.open,
            high_price: trade.high,
            low_price: trade.low,
            prev_close,
            volume: Some(trade.volume),
            market_cap: trade.market_cap,
            high_52week,
            low_52week,
            shares,
            per: positive_or_none(valuation.per),
            pbr: positive_or_none(valuation.pbr),
            eps: positive_or_none(valuation.eps),
            bps: positive_or_none(valuation.bps),
            dividend_yield: positive_or_none(valuation.dividend_yield),
            data_date: Some(base_date),
            message: if shares.is_none() {
                Some("상장주식수 정보 없음".to_string())
            } else {
                None
            },
            year_end: None,
        }
    }

    /// 종목 목록 (최초 1회 내려받아 보관).
    async fn listing(&self, today: NaiveDate) -> Result<Vec<KrxStockInfo>> {
        if let Some(listing) = self.listing.read().await.as_ref() {
            return Ok(listing.clone());
        }

        let mut date = latest_business_date(today);
        let mut stocks = Vec::new();
        for _ in 0..=self.lookback_days {
            stocks = self.client.fetch_all_stocks(&format_yyyymmdd(date)).await?;
            if !stocks.is_empty() {
                break;
            }
            date = previous_business_date(date);
        }

        *self.listing.write().await = Some(stocks.clone());
        Ok(stocks)
    }

    /// 기준일을 지정한 회사명 검색.
    pub async fn find_stock_code_by_name_at(
        &self,
        corp_name: &str,
        today: NaiveDate,
    ) -> Result<Option<String>> {
        let listing = self.listing(today).await?;
        let found = match_stock_by_name(&listing, corp_name).map(|s| s.ticker.clone());

        tracing::debug!(corp_name = corp_name, found = ?found, "회사명 종목코드 검색");
        Ok(found)
    }
}

#[async_trait]
impl MarketDataProvider for KrxMarketData {
    fn name(&self) -> &str {
        "krx"
    }

    async fn snapshot(&self, stock_code: &str) -> MarketSnapshot {
        self.snapshot_at(stock_code, Local::now().date_naive()).await
    }

    async fn year_end_fundamental(&self, stock_code: &str, year: i32) -> YearEndFundamental {
        if !is_listed_stock_code(stock_code) {
            return YearEndFundamental::default();
        }

        for fallback_year in (year - 2..=year).rev() {
            for day in (20..=31).rev() {
                let Some(date) = NaiveDate::from_ymd_opt(fallback_year, 12, day) else {
                    continue;
                };
                if is_weekend(date) {
                    continue;
                }
                let base_date = format_yyyymmdd(date);

                match self.valuation_on(stock_code, &base_date).await {
                    Ok(Some(v)) => {
                        tracing::info!(
                            stock_code = stock_code,
                            data_date = %base_date,
                            "연말 가치지표 조회 완료"
                        );
                        return YearEndFundamental {
                            per: positive_or_none(v.per),
                            pbr: positive_or_none(v.pbr),
                            eps: positive_or_none(v.eps),
                            bps: positive_or_none(v.bps),
                            dividend_yield: positive_or_none(v.dividend_yield),
                            data_year: Some(fallback_year),
                            data_date: Some(base_date),
                        };
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(
                            stock_code = stock_code,
                            base_date = %base_date,
                            error = %e,
                            "연말 가치지표 조회 실패"
                        );
                    }
                }
            }
            tracing::debug!(stock_code = stock_code, year = fallback_year, "연말 데이터 없음, 이전 연도 시도");
        }

        tracing::info!(stock_code = stock_code, year = year, "연말 가치지표를 찾을 수 없음");
        YearEndFundamental::default()
    }

    async fn find_stock_code_by_name(&self, corp_name: &str) -> Result<Option<String>> {
        self.find_stock_code_by_name_at(corp_name, Local::now().date_naive())
            .await
    }
}

impl KrxMarketData {
    /// 하루치 가치지표에서 종목을 찾습니다. KOSPI에 행이 없으면 휴장일로 보고 건너뜁니다.
    async fn valuation_on(&self, stock_code: &str, base_date: &str) -> Result<Option<KrxValuation>> {
        let kospi = self.client.fetch_valuation(KrxMarket::Kospi, base_date).await?;
        if kospi.is_empty() {
            return Ok(None);
        }
        if let Some(v) = kospi.into_iter().find(|v| v.ticker == stock_code) {
            return Ok(Some(v));
        }
        let kosdaq = self.client.fetch_valuation(KrxMarket::Kosdaq, base_date).await?;
        Ok(kosdaq.into_iter().find(|v| v.ticker == stock_code))
    }
}

// ==================== 헬퍼 ====================

/// 회사명으로 종목을 찾습니다: 정확히 일치, 부분 일치, 공백 무시 일치 순.
pub fn match_stock_by_name<'a>(listing: &'a [KrxStockInfo], corp_name: &str) -> Option<&'a KrxStockInfo> {
    let name = corp_name.trim();
    if name.is_empty() {
        return None;
    }

    if let Some(stock) = listing.iter().find(|s| s.name == name) {
        return Some(stock);
    }
    if let Some(stock) = listing.iter().find(|s| s.name.contains(name)) {
        return Some(stock);
    }

    let compact: String = name.split_whitespace().collect();
    listing.iter().find(|s| {
        let candidate: String = s.name.split_whitespace().collect();
        candidate == compact
    })
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 최근 영업일 (토요일 → 금요일, 일요일 → 금요일).
pub fn latest_business_date(today: NaiveDate) -> NaiveDate {
    match today.weekday() {
        Weekday::Sat => today - Duration::days(1),
        Weekday::Sun => today - Duration::days(2),
        _ => today,
    }
}

/// 직전 영업일 (주말 건너뜀).
pub fn previous_business_date(date: NaiveDate) -> NaiveDate {
    latest_business_date(date - Duration::days(1))
}

fn format_yyyymmdd(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// 문자열을 Decimal로 파싱 (쉼표 제거).
fn parse_decimal_opt(s: &Option<String>) -> Option<Decimal> {
    s.as_ref().and_then(|v| {
        let cleaned = v.replace(',', "").replace('%', "");
        cleaned.trim().parse().ok()
    })
}

fn parse_i64_opt(s: &Option<String>) -> Option<i64> {
    s.as_ref().and_then(|v| v.replace(',', "").trim().parse().ok())
}

/// YYYYMMDD 형식의 날짜 문자열을 NaiveDate로 파싱.
fn parse_date_yyyymmdd(s: &str) -> Option<NaiveDate> {
    if s.contains('/') {
        NaiveDate::parse_from_str(s, "%Y/%m/%d").ok()
    } else {
        NaiveDate::parse_from_str(s, "%Y%m%d").ok()
    }
}
