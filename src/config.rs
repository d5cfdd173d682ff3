use crate::config_loader::{ConfigError, ConfigResult, ConfigValidation};
use crate::indicator::IndicatorKind;
use crate::provider::LookbackPeriod;
use serde::{Deserialize, Serialize};

/// 스크리너 설정
///
/// 이동평균 기간, 크로스오버 윈도우, 계산할 지표 등 실행 단위 선택지를
/// 하나의 설정으로 관리합니다. 모든 필드는 생략 가능하며 기본값은
/// 50/200일 이동평균, 15세션 크로스오버 윈도우, MACD(12,26,9),
/// RSI(14), 1년 조회입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    /// 단기 이동평균 기간 (기본값 50)
    pub fast_window: usize,
    /// 장기 이동평균 기간 (기본값 200)
    pub slow_window: usize,
    /// 크로스오버 탐지 윈도우 (세션 수, 기본값 15)
    pub crossover_window: usize,
    /// MACD 빠른 EMA 기간 (기본값 12)
    pub macd_fast: usize,
    /// MACD 느린 EMA 기간 (기본값 26)
    pub macd_slow: usize,
    /// MACD 시그널 EMA 기간 (기본값 9)
    pub macd_signal: usize,
    /// RSI 기간 (기본값 14)
    pub rsi_period: usize,
    /// 계산할 지표 목록 (기본값: 전체)
    pub indicators_enabled: Vec<IndicatorKind>,
    /// 시세 조회 기간 (기본값 1년)
    pub lookback: LookbackPeriod,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        ScreenerConfig {
            fast_window: 50,
            slow_window: 200,
            crossover_window: 15,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
            indicators_enabled: vec![
                IndicatorKind::Sma,
                IndicatorKind::Ema,
                IndicatorKind::Macd,
                IndicatorKind::Rsi,
            ],
            lookback: LookbackPeriod::OneYear,
        }
    }
}

impl ScreenerConfig {
    /// 지표 활성화 여부 확인
    ///
    /// # Arguments
    /// * `kind` - 확인할 지표 종류
    ///
    /// # Returns
    /// * `bool` - 활성화 여부
    pub fn indicator_enabled(&self, kind: IndicatorKind) -> bool {
        self.indicators_enabled.contains(&kind)
    }
}

impl ConfigValidation for ScreenerConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.fast_window == 0
            || self.slow_window == 0
            || self.macd_fast == 0
            || self.macd_slow == 0
            || self.macd_signal == 0
            || self.rsi_period == 0
        {
            return Err(ConfigError::ValidationError(
                "지표 기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if self.fast_window >= self.slow_window {
            return Err(ConfigError::ValidationError(format!(
                "단기 기간({})은 장기 기간({})보다 작아야 합니다",
                self.fast_window, self.slow_window
            )));
        }

        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::ValidationError(format!(
                "MACD 빠른 기간({})은 느린 기간({})보다 작아야 합니다",
                self.macd_fast, self.macd_slow
            )));
        }

        if self.crossover_window == 0 {
            return Err(ConfigError::ValidationError(
                "크로스오버 윈도우는 0보다 커야 합니다".to_string(),
            ));
        }

        if self.indicators_enabled.is_empty() {
            return Err(ConfigError::ValidationError(
                "활성화된 지표가 하나 이상 필요합니다".to_string(),
            ));
        }

        Ok(())
    }
}
