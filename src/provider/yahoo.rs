use crate::error::{AnalysisError, AnalysisResult};
use crate::model::{Bar, PriceSeries};
use crate::provider::{Interval, LookbackPeriod, SeriesProvider};
use chrono::DateTime;
use log::{debug, warn};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// 공유 HTTP 클라이언트
///
/// 연결 재사용을 위해 프로세스 전체에서 하나만 생성합니다.
/// 요청 타임아웃은 이 경계에서만 적용되며, 코어 계산 경로에는
/// 블로킹 연산이 없습니다.
static HTTP: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("Mozilla/5.0 (X11; Linux x86_64) trend-screener/0.2")
        .timeout(Duration::from_secs(10))
        .build()
        .expect("HTTP 클라이언트 생성 실패")
});

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;

// 차트 API 응답 디코딩용 구조체

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    close: Vec<Option<f64>>,
}

/// 야후 파이낸스 차트 API 제공자
///
/// `GET {base}/{symbol}?range={lookback}&interval={interval}` 형태로
/// 일봉을 조회합니다. 통신 실패는 제한된 횟수만큼 재시도하고,
/// 심볼에 데이터가 없는 경우는 재시도 없이 `DataUnavailable`로
/// 반환합니다.
#[derive(Debug)]
pub struct YahooChartProvider {
    base_url: String,
}

impl Default for YahooChartProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooChartProvider {
    /// 기본 엔드포인트로 제공자 생성
    pub fn new() -> Self {
        YahooChartProvider {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// 지정된 엔드포인트로 제공자 생성 (테스트용)
    ///
    /// # Arguments
    /// * `base_url` - 차트 API 베이스 URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        YahooChartProvider {
            base_url: base_url.into(),
        }
    }

    /// 조회 URL 구성
    fn request_url(&self, symbol: &str, lookback: LookbackPeriod, interval: Interval) -> String {
        format!(
            "{}/{}?range={}&interval={}",
            self.base_url, symbol, lookback, interval
        )
    }

    /// 단일 조회 시도
    fn fetch_once(
        &self,
        symbol: &str,
        lookback: LookbackPeriod,
        interval: Interval,
    ) -> AnalysisResult<PriceSeries> {
        let url = self.request_url(symbol, lookback, interval);
        debug!("시세 조회 요청: {}", url);

        let response = HTTP
            .get(&url)
            .send()
            .map_err(|e| AnalysisError::Fetch(format!("{}: {}", symbol, e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // 존재하지 않는 심볼은 통신 오류가 아님
            return Err(AnalysisError::DataUnavailable {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(AnalysisError::Fetch(format!(
                "{}: HTTP 상태 {}",
                symbol, status
            )));
        }

        let decoded: ChartResponse = response
            .json()
            .map_err(|e| AnalysisError::Fetch(format!("{}: 응답 디코딩 실패: {}", symbol, e)))?;

        convert_response(symbol, decoded)
    }
}

/// 차트 API 응답을 가격 시계열로 변환
///
/// 종가가 비어 있는 캔들(거래 정지 등)은 건너뛰고, 같은 날짜가
/// 반복되면 첫 캔들만 유지합니다.
fn convert_response(symbol: &str, response: ChartResponse) -> AnalysisResult<PriceSeries> {
    if let Some(error) = response.chart.error {
        warn!("차트 API 오류: {} - {}: {}", symbol, error.code, error.description);
        return Err(AnalysisError::DataUnavailable {
            symbol: symbol.to_string(),
        });
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
        .ok_or(AnalysisError::DataUnavailable {
            symbol: symbol.to_string(),
        })?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.close)
        .unwrap_or_default();

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    for (&ts, close) in timestamps.iter().zip(closes) {
        let Some(close) = close else {
            continue;
        };
        let Some(datetime) = DateTime::from_timestamp(ts, 0) else {
            continue;
        };
        let date = datetime.date_naive();

        if bars.last().is_some_and(|last| last.date >= date) {
            continue;
        }
        bars.push(Bar::new(date, close));
    }

    PriceSeries::new(symbol, bars)
}

impl SeriesProvider for YahooChartProvider {
    fn fetch_series(
        &self,
        symbol: &str,
        lookback: LookbackPeriod,
        interval: Interval,
    ) -> AnalysisResult<PriceSeries> {
        let mut last_error = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.fetch_once(symbol, lookback, interval) {
                Ok(series) => return Ok(series),
                // 통신 실패만 재시도 대상
                Err(AnalysisError::Fetch(msg)) => {
                    warn!("시세 조회 실패 ({}/{}): {}", attempt, MAX_ATTEMPTS, msg);
                    last_error = Some(AnalysisError::Fetch(msg));
                    if attempt < MAX_ATTEMPTS {
                        std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                    }
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_error.unwrap_or_else(|| AnalysisError::Fetch(format!("{}: 조회 실패", symbol))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response(timestamps: &[i64], closes: &[Option<f64>]) -> ChartResponse {
        ChartResponse {
            chart: ChartBody {
                result: Some(vec![ChartResult {
                    timestamp: Some(timestamps.to_vec()),
                    indicators: ChartIndicators {
                        quote: vec![ChartQuote {
                            close: closes.to_vec(),
                        }],
                    },
                }]),
                error: None,
            },
        }
    }

    #[test]
    fn test_request_url() {
        let provider = YahooChartProvider::new();
        let url = provider.request_url("AAPL", LookbackPeriod::OneYear, Interval::Daily);
        assert_eq!(
            url,
            "https://query1.finance.yahoo.com/v8/finance/chart/AAPL?range=1y&interval=1d"
        );
    }

    #[test]
    fn test_convert_response() {
        // 하루 간격의 유닉스 타임스탬프
        let day = 86_400;
        let response = sample_response(
            &[1_700_000_000, 1_700_000_000 + day, 1_700_000_000 + 2 * day],
            &[Some(100.0), Some(101.0), Some(102.5)],
        );

        let series = convert_response("TEST", response).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.latest().close, 102.5);
    }

    #[test]
    fn test_convert_skips_null_closes() {
        let day = 86_400;
        let response = sample_response(
            &[1_700_000_000, 1_700_000_000 + day, 1_700_000_000 + 2 * day],
            &[Some(100.0), None, Some(102.5)],
        );

        let series = convert_response("TEST", response).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_convert_empty_result_is_unavailable() {
        let response = ChartResponse {
            chart: ChartBody {
                result: Some(vec![]),
                error: None,
            },
        };
        assert!(matches!(
            convert_response("NONE", response),
            Err(AnalysisError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_convert_api_error_is_unavailable() {
        let response = ChartResponse {
            chart: ChartBody {
                result: None,
                error: Some(ChartError {
                    code: "Not Found".to_string(),
                    description: "No data found".to_string(),
                }),
            },
        };
        assert!(matches!(
            convert_response("BAD", response),
            Err(AnalysisError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_decode_chart_json() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "TEST"},
                    "timestamp": [1700000000, 1700086400],
                    "indicators": {"quote": [{"close": [10.0, 11.0]}]}
                }],
                "error": null
            }
        }"#;

        let decoded: ChartResponse = serde_json::from_str(payload).unwrap();
        let series = convert_response("TEST", decoded).unwrap();
        assert_eq!(series.len(), 2);
    }
}
