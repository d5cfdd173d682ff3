use crate::analyzer::classifier::{Trend, TrendFlags};
use crate::analyzer::crossover::{CrossDirection, CrossPair, CrossoverEvent};
use crate::error::AnalysisError;
use serde::Serialize;
use std::fmt::Display;

/// 심볼 하나의 분류 결과
///
/// 배치 분석 한 번의 수명 동안만 유효한 불변 스냅샷이며,
/// 출력 어댑터에 그대로 전달됩니다. 비활성화된 지표의 값은 `None`이고,
/// `crossovers`의 `None`은 "미계산"(윈도우 부족)을 의미합니다.
/// 빈 목록("계산했으나 이벤트 없음")과 구별됩니다.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationRecord {
    /// 심볼
    pub symbol: String,
    /// 최신 종가
    pub latest_price: f64,
    /// 최신 단기 SMA
    pub latest_fast_sma: Option<f64>,
    /// 최신 장기 SMA
    pub latest_slow_sma: Option<f64>,
    /// 최신 단기 EMA
    pub latest_fast_ema: Option<f64>,
    /// 최신 장기 EMA
    pub latest_slow_ema: Option<f64>,
    /// 최신 MACD 라인
    pub latest_macd: Option<f64>,
    /// 최신 시그널 라인
    pub latest_signal: Option<f64>,
    /// 최신 RSI
    pub latest_rsi: Option<f64>,
    /// 이동평균 추세 (단기 vs 장기)
    pub trend: Option<Trend>,
    /// MACD 추세 (MACD vs 시그널)
    pub macd_trend: Option<Trend>,
    /// 가격 위치 플래그
    pub flags: Option<TrendFlags>,
    /// 탐지된 크로스오버 이벤트 목록
    pub crossovers: Option<Vec<CrossoverEvent>>,
}

impl ClassificationRecord {
    /// 특정 지표 쌍/방향의 크로스오버 이벤트 조회
    ///
    /// # Arguments
    /// * `pair` - 지표 쌍
    /// * `direction` - 방향
    ///
    /// # Returns
    /// * `Option<&CrossoverEvent>` - 이벤트 또는 None
    pub fn crossover(&self, pair: CrossPair, direction: CrossDirection) -> Option<&CrossoverEvent> {
        self.crossovers
            .as_ref()?
            .iter()
            .find(|event| event.pair == pair && event.direction == direction)
    }

    /// 특정 지표 쌍/방향의 크로스오버 발생 시점 조회
    ///
    /// # Arguments
    /// * `pair` - 지표 쌍
    /// * `direction` - 방향
    ///
    /// # Returns
    /// * `Option<usize>` - 발생 시점 (sessions_ago) 또는 None
    pub fn sessions_ago(&self, pair: CrossPair, direction: CrossDirection) -> Option<usize> {
        self.crossover(pair, direction)
            .map(|event| event.sessions_ago)
    }
}

/// 심볼을 건너뛴 이유
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SkipReason {
    /// 제공자가 데이터를 반환하지 않음
    DataUnavailable,
    /// 지표 계산에 필요한 캔들 수 미달
    InsufficientData {
        /// 지표 이름
        indicator: String,
        /// 필요한 최소 캔들 수
        required: usize,
        /// 실제 캔들 수
        actual: usize,
    },
    /// 그 외 심볼 단위 실패
    Other(String),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::DataUnavailable => write!(f, "시세 데이터 없음"),
            SkipReason::InsufficientData {
                indicator,
                required,
                actual,
            } => write!(
                f,
                "{} 데이터 부족 (필요 {}개, 실제 {}개)",
                indicator, required, actual
            ),
            SkipReason::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<AnalysisError> for SkipReason {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::DataUnavailable { .. } => SkipReason::DataUnavailable,
            AnalysisError::InsufficientData {
                indicator,
                required,
                actual,
            } => SkipReason::InsufficientData {
                indicator,
                required,
                actual,
            },
            other => SkipReason::Other(other.to_string()),
        }
    }
}

/// 심볼 하나의 처리 결과
///
/// "처리됐지만 신호 없음"과 "건너뜀"은 서로 다른 상태입니다.
#[derive(Debug, Clone, Serialize)]
pub enum SymbolOutcome {
    /// 분석 완료
    Analyzed(ClassificationRecord),
    /// 건너뜀 (이유 기록)
    Skipped {
        /// 심볼
        symbol: String,
        /// 건너뛴 이유
        reason: SkipReason,
    },
}

impl SymbolOutcome {
    /// 처리 결과의 심볼 반환
    pub fn symbol(&self) -> &str {
        match self {
            SymbolOutcome::Analyzed(record) => &record.symbol,
            SymbolOutcome::Skipped { symbol, .. } => symbol,
        }
    }
}

/// 배치 분석 집계 결과
///
/// 입력 심볼 순서를 그대로 유지합니다. 카테고리 목록(50일선 위 종목
/// 목록 등)은 스캔 중에 누적하지 않고, 완성된 레코드를 사후 필터링하는
/// 파생 뷰로 제공합니다. 따라서 카테고리는 처리 순서와 무관합니다.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    /// 심볼별 처리 결과 (입력 순서 유지)
    pub outcomes: Vec<SymbolOutcome>,
}

impl AnalysisReport {
    /// 분석 완료된 레코드 순회
    pub fn records(&self) -> impl Iterator<Item = &ClassificationRecord> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            SymbolOutcome::Analyzed(record) => Some(record),
            SymbolOutcome::Skipped { .. } => None,
        })
    }

    /// 건너뛴 심볼과 이유 순회
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            SymbolOutcome::Skipped { symbol, reason } => Some((symbol.as_str(), reason)),
            SymbolOutcome::Analyzed(_) => None,
        })
    }

    /// 플래그 기준으로 심볼 필터링
    fn symbols_by_flag(&self, select: impl Fn(&TrendFlags) -> bool) -> Vec<&str> {
        self.records()
            .filter(|record| record.flags.as_ref().is_some_and(&select))
            .map(|record| record.symbol.as_str())
            .collect()
    }

    /// 단기 이동평균 위에 있는 심볼 목록
    pub fn above_fast_dma(&self) -> Vec<&str> {
        self.symbols_by_flag(|flags| flags.above_fast_dma)
    }

    /// 장기 이동평균 위에 있는 심볼 목록
    pub fn above_slow_dma(&self) -> Vec<&str> {
        self.symbols_by_flag(|flags| flags.above_slow_dma)
    }

    /// 두 이동평균 사이에 있는 심볼 목록
    pub fn between_fast_slow(&self) -> Vec<&str> {
        self.symbols_by_flag(|flags| flags.between_fast_slow)
    }

    /// 단기 이동평균 아래에 있는 심볼 목록
    pub fn below_fast_dma(&self) -> Vec<&str> {
        self.symbols_by_flag(|flags| flags.below_fast_dma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, flags: TrendFlags) -> ClassificationRecord {
        ClassificationRecord {
            symbol: symbol.to_string(),
            latest_price: 100.0,
            latest_fast_sma: Some(95.0),
            latest_slow_sma: Some(90.0),
            latest_fast_ema: Some(96.0),
            latest_slow_ema: Some(91.0),
            latest_macd: Some(1.0),
            latest_signal: Some(0.5),
            latest_rsi: Some(60.0),
            trend: Some(Trend::Up),
            macd_trend: Some(Trend::Up),
            flags: Some(flags),
            crossovers: Some(vec![]),
        }
    }

    #[test]
    fn test_category_views() {
        let report = AnalysisReport {
            outcomes: vec![
                SymbolOutcome::Analyzed(record(
                    "UP",
                    TrendFlags {
                        above_fast_dma: true,
                        above_slow_dma: true,
                        between_fast_slow: false,
                        below_fast_dma: false,
                    },
                )),
                SymbolOutcome::Skipped {
                    symbol: "SHORT".to_string(),
                    reason: SkipReason::DataUnavailable,
                },
                SymbolOutcome::Analyzed(record(
                    "DOWN",
                    TrendFlags {
                        above_fast_dma: false,
                        above_slow_dma: false,
                        between_fast_slow: false,
                        below_fast_dma: true,
                    },
                )),
            ],
        };

        assert_eq!(report.above_fast_dma(), vec!["UP"]);
        assert_eq!(report.below_fast_dma(), vec!["DOWN"]);
        assert!(report.between_fast_slow().is_empty());
        assert_eq!(report.records().count(), 2);
        assert_eq!(report.skipped().count(), 1);
    }

    #[test]
    fn test_skip_reason_from_error() {
        let reason: SkipReason = AnalysisError::DataUnavailable {
            symbol: "X".to_string(),
        }
        .into();
        assert_eq!(reason, SkipReason::DataUnavailable);

        let reason: SkipReason = AnalysisError::InsufficientData {
            indicator: "SMA200".to_string(),
            required: 200,
            actual: 10,
        }
        .into();
        assert!(matches!(reason, SkipReason::InsufficientData { .. }));

        let reason: SkipReason = AnalysisError::Fetch("timeout".to_string()).into();
        assert!(matches!(reason, SkipReason::Other(_)));
    }

    #[test]
    fn test_crossover_lookup() {
        let mut rec = record(
            "X",
            TrendFlags {
                above_fast_dma: true,
                above_slow_dma: false,
                between_fast_slow: false,
                below_fast_dma: false,
            },
        );
        rec.crossovers = Some(vec![CrossoverEvent {
            pair: CrossPair::CloseFastSma,
            direction: CrossDirection::Upward,
            sessions_ago: 3,
        }]);

        assert_eq!(
            rec.sessions_ago(CrossPair::CloseFastSma, CrossDirection::Upward),
            Some(3)
        );
        assert_eq!(
            rec.sessions_ago(CrossPair::CloseFastSma, CrossDirection::Downward),
            None
        );

        // 미계산 상태에서는 조회가 항상 None
        rec.crossovers = None;
        assert_eq!(
            rec.sessions_ago(CrossPair::CloseFastSma, CrossDirection::Upward),
            None
        );
    }
}
