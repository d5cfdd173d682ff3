use crate::error::{AnalysisError, AnalysisResult};
use serde::Serialize;
use std::fmt::Display;

/// 크로스오버 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrossDirection {
    /// 상향 돌파
    Upward,
    /// 하향 돌파
    Downward,
}

impl Display for CrossDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrossDirection::Upward => write!(f, "Upward"),
            CrossDirection::Downward => write!(f, "Downward"),
        }
    }
}

/// 크로스오버 대상 지표 쌍
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrossPair {
    /// 종가와 단기 SMA
    CloseFastSma,
    /// 종가와 장기 SMA
    CloseSlowSma,
    /// 단기 SMA와 장기 SMA (골든/데드 크로스)
    FastSlowSma,
}

impl Display for CrossPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrossPair::CloseFastSma => write!(f, "Close/FastSMA"),
            CrossPair::CloseSlowSma => write!(f, "Close/SlowSMA"),
            CrossPair::FastSlowSma => write!(f, "FastSMA/SlowSMA"),
        }
    }
}

/// 탐지된 크로스오버 이벤트
///
/// 분석 실행마다 새로 계산되며 저장되지 않습니다.
/// `sessions_ago`는 이벤트와 가장 최근 캔들 사이의 거래 세션 수입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrossoverEvent {
    /// 지표 쌍
    pub pair: CrossPair,
    /// 방향
    pub direction: CrossDirection,
    /// 몇 세션 전에 발생했는지
    pub sessions_ago: usize,
}

impl Display for CrossoverEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}, {}세션 전)",
            self.pair, self.direction, self.sessions_ago
        )
    }
}

/// 정렬된 지표 시계열의 값 접근 트레이트
///
/// 항상 정의되는 시계열(`f64`)과 앞부분이 정의되지 않는 시계열
/// (`Option<f64>`)을 같은 탐지 코드로 스캔하기 위한 공통 인터페이스입니다.
pub trait SeriesValue {
    /// 해당 인덱스의 값, 정의되지 않았으면 `None`
    fn value(&self) -> Option<f64>;
}

impl SeriesValue for f64 {
    fn value(&self) -> Option<f64> {
        Some(*self)
    }
}

impl SeriesValue for Option<f64> {
    fn value(&self) -> Option<f64> {
        *self
    }
}

/// 윈도우 길이 검사 후 스캔 시작 인덱스 반환
fn window_base<A: SeriesValue, B: SeriesValue>(
    first: &[A],
    second: &[B],
    window: usize,
) -> AnalysisResult<usize> {
    assert_eq!(
        first.len(),
        second.len(),
        "지표 시계열의 길이가 일치해야 합니다"
    );

    let required = window + 1;
    if first.len() < required {
        return Err(AnalysisError::InsufficientWindow {
            required,
            actual: first.len(),
        });
    }

    Ok(first.len() - required)
}

/// 전환 인덱스 i에서 크로스오버 발생 여부 확인
///
/// 양변 모두 엄격한 부등호를 사용하므로 같은 값은 절대 돌파로
/// 분류되지 않습니다. 전환에 참여하는 값 중 하나라도 정의되지
/// 않으면 해당 전환은 일치하지 않는 것으로 취급합니다.
fn crossed_at<A: SeriesValue, B: SeriesValue>(
    first: &[A],
    second: &[B],
    index: usize,
    direction: CrossDirection,
) -> bool {
    let (Some(prev_a), Some(prev_b), Some(curr_a), Some(curr_b)) = (
        first[index - 1].value(),
        second[index - 1].value(),
        first[index].value(),
        second[index].value(),
    ) else {
        return false;
    };

    match direction {
        CrossDirection::Upward => prev_a < prev_b && curr_a > curr_b,
        CrossDirection::Downward => prev_a > prev_b && curr_a < curr_b,
    }
}

/// 최근 윈도우에서 가장 최근의 크로스오버 탐지
///
/// 마지막 `window + 1`개 캔들의 전환 i = 1..=window 를 오래된 것부터
/// 차례로 검사하며, 일치할 때마다 기록을 덮어씁니다. 따라서 윈도우 안에
/// 여러 번 발생했다면 가장 최근 발생(가장 작은 sessions_ago)이 보고됩니다.
///
/// # Arguments
/// * `first` - 돌파하는 쪽 시계열 (예: 종가)
/// * `second` - 돌파당하는 쪽 시계열 (예: SMA50)
/// * `window` - 검사할 세션 수
/// * `direction` - 탐지할 방향
///
/// # Returns
/// * `AnalysisResult<Option<usize>>` - 발생 시점(sessions_ago) 또는 None
pub fn latest_crossover<A: SeriesValue, B: SeriesValue>(
    first: &[A],
    second: &[B],
    window: usize,
    direction: CrossDirection,
) -> AnalysisResult<Option<usize>> {
    let base = window_base(first, second, window)?;

    let mut sessions_ago = None;
    for i in 1..=window {
        if crossed_at(first, second, base + i, direction) {
            sessions_ago = Some(window - i);
        }
    }

    Ok(sessions_ago)
}

/// 최근 윈도우에서 첫 번째 골든 크로스 탐지
///
/// 단기 SMA가 장기 SMA를 상향 돌파한 시점을 찾습니다. 일반 크로스오버와
/// 달리 이전 조건은 비엄격(`<=`), 현재 조건은 엄격(`>`)이며, 오래된
/// 전환부터 검사해 첫 일치에서 멈춥니다. 윈도우 안에 여러 번 발생했다면
/// 가장 오래된 발생(가장 큰 sessions_ago)이 보고됩니다. 이 비대칭은
/// 의도된 동작으로, 일반 탐지와 통합하지 않습니다.
///
/// # Arguments
/// * `fast` - 단기 SMA 시계열
/// * `slow` - 장기 SMA 시계열
/// * `window` - 검사할 세션 수
///
/// # Returns
/// * `AnalysisResult<Option<usize>>` - 발생 시점(sessions_ago) 또는 None
pub fn first_golden_cross<A: SeriesValue, B: SeriesValue>(
    fast: &[A],
    slow: &[B],
    window: usize,
) -> AnalysisResult<Option<usize>> {
    let base = window_base(fast, slow, window)?;

    for i in 1..=window {
        let (Some(prev_fast), Some(prev_slow), Some(curr_fast), Some(curr_slow)) = (
            fast[base + i - 1].value(),
            slow[base + i - 1].value(),
            fast[base + i].value(),
            slow[base + i].value(),
        ) else {
            continue;
        };

        if prev_fast <= prev_slow && curr_fast > curr_slow {
            return Ok(Some(window - i));
        }
    }

    Ok(None)
}
