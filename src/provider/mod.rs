// 시세 데이터 제공자 모듈
// 코어는 이 경계 뒤에서 어떤 데이터 소스가 쓰이는지 알지 못합니다.

pub mod yahoo;

use crate::error::{AnalysisError, AnalysisResult};
use crate::model::PriceSeries;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// 시세 조회 기간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookbackPeriod {
    /// 6개월
    #[serde(rename = "6mo")]
    SixMonths,
    /// 1년
    #[serde(rename = "1y")]
    OneYear,
    /// 2년
    #[serde(rename = "2y")]
    TwoYears,
    /// 5년
    #[serde(rename = "5y")]
    FiveYears,
}

impl LookbackPeriod {
    /// 제공자 쿼리 문자열 반환
    pub fn as_str(&self) -> &'static str {
        match self {
            LookbackPeriod::SixMonths => "6mo",
            LookbackPeriod::OneYear => "1y",
            LookbackPeriod::TwoYears => "2y",
            LookbackPeriod::FiveYears => "5y",
        }
    }
}

impl Display for LookbackPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 캔들 간격
///
/// 이 시스템은 일봉만 분석합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    /// 1일
    #[serde(rename = "1d")]
    Daily,
}

impl Interval {
    /// 제공자 쿼리 문자열 반환
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 시세 데이터 제공자 트레이트
///
/// 심볼 하나의 일봉 시계열을 조회합니다. 데이터가 없으면
/// `DataUnavailable`, 통신 실패는 `Fetch`로 실패합니다.
pub trait SeriesProvider {
    /// 시계열 조회
    ///
    /// # Arguments
    /// * `symbol` - 심볼
    /// * `lookback` - 조회 기간
    /// * `interval` - 캔들 간격
    ///
    /// # Returns
    /// * `AnalysisResult<PriceSeries>` - 시계열 또는 오류
    fn fetch_series(
        &self,
        symbol: &str,
        lookback: LookbackPeriod,
        interval: Interval,
    ) -> AnalysisResult<PriceSeries>;
}

/// 메모리 기반 제공자
///
/// 테스트와 오프라인 실행에 사용합니다. 조회 기간과 간격은 무시하고
/// 등록된 시계열을 그대로 반환합니다.
#[derive(Debug, Default)]
pub struct StaticProvider {
    series: HashMap<String, PriceSeries>,
}

impl StaticProvider {
    /// 빈 제공자 생성
    pub fn new() -> Self {
        StaticProvider {
            series: HashMap::new(),
        }
    }

    /// 시계열 등록
    ///
    /// # Arguments
    /// * `series` - 등록할 시계열 (심볼은 시계열에서 가져옴)
    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.symbol().to_string(), series);
    }
}

impl SeriesProvider for StaticProvider {
    fn fetch_series(
        &self,
        symbol: &str,
        _lookback: LookbackPeriod,
        _interval: Interval,
    ) -> AnalysisResult<PriceSeries> {
        self.series
            .get(symbol)
            .cloned()
            .ok_or(AnalysisError::DataUnavailable {
                symbol: symbol.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bar;
    use chrono::NaiveDate;

    #[test]
    fn test_lookback_strings() {
        assert_eq!(LookbackPeriod::OneYear.as_str(), "1y");
        assert_eq!(LookbackPeriod::TwoYears.as_str(), "2y");
        assert_eq!(Interval::Daily.as_str(), "1d");
    }

    #[test]
    fn test_static_provider_lookup() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let series = PriceSeries::new("AAPL", vec![Bar::new(date, 180.0)]).unwrap();

        let mut provider = StaticProvider::new();
        provider.insert(series);

        let fetched = provider
            .fetch_series("AAPL", LookbackPeriod::OneYear, Interval::Daily)
            .unwrap();
        assert_eq!(fetched.symbol(), "AAPL");

        let missing = provider.fetch_series("MSFT", LookbackPeriod::OneYear, Interval::Daily);
        assert_eq!(
            missing.unwrap_err(),
            AnalysisError::DataUnavailable {
                symbol: "MSFT".to_string()
            }
        );
    }
}
