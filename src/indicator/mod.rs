// 기술적 지표 계산 모듈
// 종가 시계열에서 파생 시계열(SMA, EMA, MACD, RSI)을 생성합니다.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use crate::config::ScreenerConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::model::PriceSeries;
use macd::MacdSeries;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// 지표 종류
///
/// 설정의 `indicators_enabled` 목록에서 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    /// 단순이동평균
    Sma,
    /// 지수이동평균
    Ema,
    /// MACD와 시그널 라인
    Macd,
    /// 상대강도지수
    Rsi,
}

impl Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndicatorKind::Sma => write!(f, "SMA"),
            IndicatorKind::Ema => write!(f, "EMA"),
            IndicatorKind::Macd => write!(f, "MACD"),
            IndicatorKind::Rsi => write!(f, "RSI"),
        }
    }
}

/// 한 시계열에서 파생된 지표 시계열 집합
///
/// 모든 시계열은 원본 종가와 같은 길이로 인덱스가 정렬됩니다.
/// 공개 접근자는 항상 스칼라 값 또는 명시적 오류를 반환하며,
/// 컨테이너를 그대로 노출해 호출자가 풀어 쓰게 하지 않습니다.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    closes: Vec<f64>,
    smas: HashMap<usize, Vec<Option<f64>>>,
    emas: HashMap<usize, Vec<f64>>,
    macd: Option<MacdSeries>,
    rsi: Option<Vec<Option<f64>>>,
}

impl IndicatorSet {
    /// 종가 시계열 참조 반환
    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    /// 가장 최근 종가 반환
    pub fn latest_close(&self) -> f64 {
        *self.closes.last().expect("시계열은 비어 있을 수 없습니다")
    }

    /// 지정된 기간의 SMA 시계열 참조 반환
    ///
    /// # Arguments
    /// * `window` - 이동평균 기간
    ///
    /// # Returns
    /// * `AnalysisResult<&[Option<f64>]>` - SMA 시계열 또는 비활성화 오류
    pub fn sma(&self, window: usize) -> AnalysisResult<&[Option<f64>]> {
        self.smas
            .get(&window)
            .map(|series| series.as_slice())
            .ok_or(AnalysisError::IndicatorUnavailable {
                indicator: format!("SMA{}", window),
            })
    }

    /// 지정된 기간의 최신 SMA 값 반환
    ///
    /// 캔들 수가 기간보다 적어 최신 값이 정의되지 않으면
    /// `InsufficientData`로 실패합니다. 이는 "정의는 되지만 불안정한"
    /// EMA 워밍업 구간과 구별되는 상태입니다.
    ///
    /// # Arguments
    /// * `window` - 이동평균 기간
    ///
    /// # Returns
    /// * `AnalysisResult<f64>` - 최신 SMA 값 또는 오류
    pub fn latest_sma(&self, window: usize) -> AnalysisResult<f64> {
        let series = self.sma(window)?;
        series
            .last()
            .copied()
            .flatten()
            .ok_or(AnalysisError::InsufficientData {
                indicator: format!("SMA{}", window),
                required: window,
                actual: self.closes.len(),
            })
    }

    /// 지정된 기간의 EMA 시계열 참조 반환
    pub fn ema(&self, span: usize) -> AnalysisResult<&[f64]> {
        self.emas
            .get(&span)
            .map(|series| series.as_slice())
            .ok_or(AnalysisError::IndicatorUnavailable {
                indicator: format!("EMA{}", span),
            })
    }

    /// 지정된 기간의 최신 EMA 값 반환
    ///
    /// EMA는 첫 캔들부터 정의되므로 시계열이 존재하는 한 실패하지 않습니다.
    pub fn latest_ema(&self, span: usize) -> AnalysisResult<f64> {
        let series = self.ema(span)?;
        Ok(*series.last().expect("시계열은 비어 있을 수 없습니다"))
    }

    /// MACD 시계열 참조 반환
    pub fn macd(&self) -> AnalysisResult<&MacdSeries> {
        self.macd
            .as_ref()
            .ok_or(AnalysisError::IndicatorUnavailable {
                indicator: "MACD".to_string(),
            })
    }

    /// 최신 MACD 라인 값 반환
    pub fn latest_macd(&self) -> AnalysisResult<f64> {
        let series = self.macd()?;
        Ok(*series.macd.last().expect("시계열은 비어 있을 수 없습니다"))
    }

    /// 최신 시그널 라인 값 반환
    pub fn latest_signal(&self) -> AnalysisResult<f64> {
        let series = self.macd()?;
        Ok(*series
            .signal
            .last()
            .expect("시계열은 비어 있을 수 없습니다"))
    }

    /// RSI 시계열 참조 반환
    pub fn rsi(&self) -> AnalysisResult<&[Option<f64>]> {
        self.rsi
            .as_deref()
            .ok_or(AnalysisError::IndicatorUnavailable {
                indicator: "RSI".to_string(),
            })
    }

    /// 최신 RSI 값 반환
    ///
    /// 변화량이 하나도 없는 단일 캔들 시계열에서는 `InsufficientData`로
    /// 실패합니다 (최소 2개 캔들 필요).
    pub fn latest_rsi(&self) -> AnalysisResult<f64> {
        let series = self.rsi()?;
        series
            .last()
            .copied()
            .flatten()
            .ok_or(AnalysisError::InsufficientData {
                indicator: "RSI".to_string(),
                required: 2,
                actual: self.closes.len(),
            })
    }
}

/// 지표 계산 엔진
///
/// 설정에서 활성화된 지표만 계산합니다. 계산 자체는 실패하지 않으며,
/// 데이터 부족은 `IndicatorSet`의 최신 값 조회 시점에 오류로 드러납니다.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    config: ScreenerConfig,
}

impl IndicatorEngine {
    /// 새 엔진 생성
    ///
    /// # Arguments
    /// * `config` - 스크리너 설정
    ///
    /// # Returns
    /// * `IndicatorEngine` - 새 엔진 인스턴스
    pub fn new(config: &ScreenerConfig) -> Self {
        IndicatorEngine {
            config: config.clone(),
        }
    }

    /// 시계열에서 지표 집합 계산
    ///
    /// # Arguments
    /// * `series` - 가격 시계열
    ///
    /// # Returns
    /// * `IndicatorSet` - 계산된 지표 집합
    pub fn compute(&self, series: &PriceSeries) -> IndicatorSet {
        let closes = series.closes();

        let mut smas = HashMap::new();
        if self.config.indicator_enabled(IndicatorKind::Sma) {
            smas.insert(
                self.config.fast_window,
                sma::sma_series(&closes, self.config.fast_window),
            );
            smas.insert(
                self.config.slow_window,
                sma::sma_series(&closes, self.config.slow_window),
            );
        }

        let mut emas = HashMap::new();
        if self.config.indicator_enabled(IndicatorKind::Ema) {
            emas.insert(
                self.config.fast_window,
                ema::ema_series(&closes, self.config.fast_window),
            );
            emas.insert(
                self.config.slow_window,
                ema::ema_series(&closes, self.config.slow_window),
            );
        }

        let macd = self
            .config
            .indicator_enabled(IndicatorKind::Macd)
            .then(|| {
                macd::macd_series(
                    &closes,
                    self.config.macd_fast,
                    self.config.macd_slow,
                    self.config.macd_signal,
                )
            });

        let rsi = self
            .config
            .indicator_enabled(IndicatorKind::Rsi)
            .then(|| rsi::rsi_series(&closes, self.config.rsi_period));

        IndicatorSet {
            closes,
            smas,
            emas,
            macd,
            rsi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bar;
    use chrono::NaiveDate;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar::new(start + chrono::Days::new(i as u64), close))
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn test_engine_computes_enabled_indicators() {
        let config = ScreenerConfig::default();
        let engine = IndicatorEngine::new(&config);
        let series = series_from_closes(&(1..=250).map(|i| i as f64).collect::<Vec<_>>());
        let set = engine.compute(&series);

        assert!(set.latest_sma(50).is_ok());
        assert!(set.latest_sma(200).is_ok());
        assert!(set.latest_ema(50).is_ok());
        assert!(set.latest_macd().is_ok());
        assert!(set.latest_signal().is_ok());
        assert!(set.latest_rsi().is_ok());
    }

    #[test]
    fn test_disabled_indicator_is_unavailable() {
        let config = ScreenerConfig {
            indicators_enabled: vec![IndicatorKind::Sma],
            ..ScreenerConfig::default()
        };
        let engine = IndicatorEngine::new(&config);
        let set = engine.compute(&series_from_closes(&[1.0, 2.0, 3.0]));

        assert!(matches!(
            set.latest_macd(),
            Err(AnalysisError::IndicatorUnavailable { .. })
        ));
        assert!(matches!(
            set.latest_rsi(),
            Err(AnalysisError::IndicatorUnavailable { .. })
        ));
    }

    #[test]
    fn test_latest_sma_insufficient_data() {
        let config = ScreenerConfig::default();
        let engine = IndicatorEngine::new(&config);
        let closes: Vec<f64> = (1..=120).map(|i| i as f64).collect();
        let set = engine.compute(&series_from_closes(&closes));

        // 120개 캔들로 SMA50은 가능하지만 SMA200은 불가능
        assert!(set.latest_sma(50).is_ok());
        assert_eq!(
            set.latest_sma(200),
            Err(AnalysisError::InsufficientData {
                indicator: "SMA200".to_string(),
                required: 200,
                actual: 120,
            })
        );
    }

    #[test]
    fn test_unknown_sma_window_is_unavailable() {
        let config = ScreenerConfig::default();
        let engine = IndicatorEngine::new(&config);
        let set = engine.compute(&series_from_closes(&[1.0, 2.0]));

        assert!(matches!(
            set.latest_sma(77),
            Err(AnalysisError::IndicatorUnavailable { .. })
        ));
    }

    #[test]
    fn test_latest_close() {
        let config = ScreenerConfig::default();
        let engine = IndicatorEngine::new(&config);
        let set = engine.compute(&series_from_closes(&[5.0, 6.0, 7.5]));
        assert_eq!(set.latest_close(), 7.5);
    }
}
