use crate::analyzer::classifier::{self, Trend, TrendFlags};
use crate::analyzer::crossover::{self, CrossDirection, CrossPair, CrossoverEvent};
use crate::config::ScreenerConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::indicator::{IndicatorEngine, IndicatorKind, IndicatorSet};
use crate::provider::{Interval, SeriesProvider};
use crate::report::{AnalysisReport, ClassificationRecord, SymbolOutcome};
use log::{debug, info, warn};

/// 심볼 배치 분석기
///
/// 입력 목록의 각 심볼에 대해 시세 조회 -> 지표 계산 -> 크로스오버 탐지
/// -> 분류를 순서대로 수행하고 결과를 집계합니다. 심볼 간에 공유하는
/// 가변 상태가 없으므로 처리 순서는 결과에 영향을 주지 않습니다.
pub struct BatchAnalyzer<P: SeriesProvider> {
    config: ScreenerConfig,
    engine: IndicatorEngine,
    provider: P,
}

impl<P: SeriesProvider> BatchAnalyzer<P> {
    /// 새 배치 분석기 생성
    ///
    /// # Arguments
    /// * `config` - 스크리너 설정
    /// * `provider` - 시세 데이터 제공자
    ///
    /// # Returns
    /// * `BatchAnalyzer` - 새 분석기 인스턴스
    pub fn new(config: ScreenerConfig, provider: P) -> Self {
        let engine = IndicatorEngine::new(&config);
        BatchAnalyzer {
            config,
            engine,
            provider,
        }
    }

    /// 설정 참조 반환
    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// 심볼 목록 전체 분석
    ///
    /// 실패한 심볼은 이유와 함께 건너뛴 것으로 기록되며 배치는
    /// 계속 진행됩니다. 입력 순서가 결과에 그대로 유지됩니다.
    ///
    /// # Arguments
    /// * `symbols` - 심볼 목록
    ///
    /// # Returns
    /// * `AnalysisReport` - 집계 결과
    pub fn run(&self, symbols: &[String]) -> AnalysisReport {
        let mut outcomes = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            info!("심볼 분석 시작: {}", symbol);
            match self.analyze_symbol(symbol) {
                Ok(record) => {
                    debug!("심볼 분석 완료: {}", symbol);
                    outcomes.push(SymbolOutcome::Analyzed(record));
                }
                Err(err) => {
                    warn!("심볼 건너뜀: {} - {}", symbol, err);
                    outcomes.push(SymbolOutcome::Skipped {
                        symbol: symbol.clone(),
                        reason: err.into(),
                    });
                }
            }
        }

        AnalysisReport { outcomes }
    }

    /// 심볼 하나 분석
    ///
    /// 활성화된 지표 중 하나라도 최신 값을 계산할 수 없으면 심볼 전체를
    /// 건너뜁니다 (부분 레코드를 만들지 않음). 단, 크로스오버 윈도우
    /// 부족은 레코드의 크로스오버 섹션만 "미계산"으로 강등시킵니다.
    ///
    /// # Arguments
    /// * `symbol` - 심볼
    ///
    /// # Returns
    /// * `AnalysisResult<ClassificationRecord>` - 분류 레코드 또는 오류
    pub fn analyze_symbol(&self, symbol: &str) -> AnalysisResult<ClassificationRecord> {
        let series =
            self.provider
                .fetch_series(symbol, self.config.lookback, Interval::Daily)?;
        debug!("{}: 캔들 {}개 수신", symbol, series.len());

        let set = self.engine.compute(&series);
        let latest_price = set.latest_close();

        let (latest_fast_sma, latest_slow_sma, trend, flags) =
            if self.config.indicator_enabled(IndicatorKind::Sma) {
                let fast = set.latest_sma(self.config.fast_window)?;
                let slow = set.latest_sma(self.config.slow_window)?;
                let trend: Trend = classifier::sma_trend(fast, slow);
                let flags: TrendFlags = classifier::classify_position(latest_price, fast, slow);
                (Some(fast), Some(slow), Some(trend), Some(flags))
            } else {
                (None, None, None, None)
            };

        let (latest_fast_ema, latest_slow_ema) =
            if self.config.indicator_enabled(IndicatorKind::Ema) {
                (
                    Some(set.latest_ema(self.config.fast_window)?),
                    Some(set.latest_ema(self.config.slow_window)?),
                )
            } else {
                (None, None)
            };

        let (latest_macd, latest_signal, macd_trend) =
            if self.config.indicator_enabled(IndicatorKind::Macd) {
                let macd = set.latest_macd()?;
                let signal = set.latest_signal()?;
                (Some(macd), Some(signal), Some(classifier::macd_trend(macd, signal)))
            } else {
                (None, None, None)
            };

        let latest_rsi = if self.config.indicator_enabled(IndicatorKind::Rsi) {
            Some(set.latest_rsi()?)
        } else {
            None
        };

        let crossovers = if self.config.indicator_enabled(IndicatorKind::Sma) {
            self.detect_crossovers(symbol, &set)?
        } else {
            None
        };

        Ok(ClassificationRecord {
            symbol: symbol.to_string(),
            latest_price,
            latest_fast_sma,
            latest_slow_sma,
            latest_fast_ema,
            latest_slow_ema,
            latest_macd,
            latest_signal,
            latest_rsi,
            trend,
            macd_trend,
            flags,
            crossovers,
        })
    }

    /// 크로스오버 이벤트 탐지
    ///
    /// 종가/단기 SMA, 종가/장기 SMA 각각의 상하향 돌파와
    /// 단기/장기 SMA 골든 크로스를 검사합니다. 윈도우보다 캔들이
    /// 적으면 실패 대신 `None`(미계산)을 반환합니다.
    fn detect_crossovers(
        &self,
        symbol: &str,
        set: &IndicatorSet,
    ) -> AnalysisResult<Option<Vec<CrossoverEvent>>> {
        let window = self.config.crossover_window;
        let closes = set.closes();
        let fast = set.sma(self.config.fast_window)?;
        let slow = set.sma(self.config.slow_window)?;

        let scan = || -> AnalysisResult<Vec<CrossoverEvent>> {
            let mut events = Vec::new();

            for direction in [CrossDirection::Upward, CrossDirection::Downward] {
                if let Some(sessions_ago) =
                    crossover::latest_crossover(closes, fast, window, direction)?
                {
                    events.push(CrossoverEvent {
                        pair: CrossPair::CloseFastSma,
                        direction,
                        sessions_ago,
                    });
                }
                if let Some(sessions_ago) =
                    crossover::latest_crossover(closes, slow, window, direction)?
                {
                    events.push(CrossoverEvent {
                        pair: CrossPair::CloseSlowSma,
                        direction,
                        sessions_ago,
                    });
                }
            }

            if let Some(sessions_ago) = crossover::first_golden_cross(fast, slow, window)? {
                events.push(CrossoverEvent {
                    pair: CrossPair::FastSlowSma,
                    direction: CrossDirection::Upward,
                    sessions_ago,
                });
            }

            Ok(events)
        };

        match scan() {
            Ok(events) => Ok(Some(events)),
            Err(AnalysisError::InsufficientWindow { required, actual }) => {
                debug!(
                    "{}: 크로스오버 미계산 (필요 {}개, 실제 {}개)",
                    symbol, required, actual
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
