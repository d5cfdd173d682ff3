use crate::error::{AnalysisError, AnalysisResult};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Display;

/// 일봉 하나를 나타내는 구조체
///
/// 날짜와 종가만 보관합니다. 종가는 항상 양수입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    /// 거래일
    pub date: NaiveDate,
    /// 종가
    pub close: f64,
}

impl Bar {
    /// 새 일봉 생성
    ///
    /// # Arguments
    /// * `date` - 거래일
    /// * `close` - 종가
    ///
    /// # Returns
    /// * `Bar` - 새 일봉 인스턴스
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Bar { date, close }
    }
}

impl Display for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bar({}: {:.2})", self.date, self.close)
    }
}

/// 한 심볼의 일봉 시계열
///
/// 날짜 오름차순으로 정렬된 일봉을 보관합니다.
/// 불변식: 길이 1 이상, 날짜 순증가, 중복 날짜 없음, 종가 양수.
/// 데이터가 없거나 부족한 심볼은 생성 단계에서 오류로 구분되며,
/// 절대로 0 값으로 대체되지 않습니다.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// 유효성 검사를 거쳐 새 시계열 생성
    ///
    /// # Arguments
    /// * `symbol` - 심볼
    /// * `bars` - 날짜 오름차순 일봉 목록
    ///
    /// # Returns
    /// * `AnalysisResult<PriceSeries>` - 생성된 시계열 또는 오류
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> AnalysisResult<Self> {
        let symbol = symbol.into();

        if bars.is_empty() {
            return Err(AnalysisError::DataUnavailable { symbol });
        }

        for bar in &bars {
            if !(bar.close > 0.0) || !bar.close.is_finite() {
                return Err(AnalysisError::InvalidSeries(format!(
                    "{}: {} 종가가 양수가 아닙니다: {}",
                    symbol, bar.date, bar.close
                )));
            }
        }

        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(AnalysisError::InvalidSeries(format!(
                    "{}: 날짜가 순증가하지 않습니다: {} -> {}",
                    symbol, pair[0].date, pair[1].date
                )));
            }
        }

        Ok(PriceSeries { symbol, bars })
    }

    /// 심볼 반환
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// 일봉 목록 참조 반환
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// 일봉 수 반환
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// 시계열이 비어 있는지 확인 (불변식상 항상 false)
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 가장 최근 일봉 반환
    pub fn latest(&self) -> &Bar {
        // 생성자 불변식으로 길이 1 이상이 보장됨
        self.bars.last().expect("시계열은 비어 있을 수 없습니다")
    }

    /// 종가 배열 반환
    ///
    /// # Returns
    /// * `Vec<f64>` - 날짜 오름차순 종가
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }
}

impl Display for PriceSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PriceSeries({}: {}개, 최근 {})",
            self.symbol,
            self.bars.len(),
            self.latest()
        )
    }
}
