use std::fmt;

/// 분석 파이프라인 오류
///
/// 심볼 단위 분석에서 발생할 수 있는 오류를 정의합니다.
/// 모든 오류는 해당 심볼의 처리에만 영향을 주며, 배치 전체를 중단시키지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// 데이터 제공자가 해당 심볼의 시세를 반환하지 않음
    DataUnavailable {
        /// 심볼
        symbol: String,
    },
    /// 지표 계산에 필요한 최소 캔들 수 미달
    InsufficientData {
        /// 지표 이름 (예: "SMA200")
        indicator: String,
        /// 필요한 최소 캔들 수
        required: usize,
        /// 실제 캔들 수
        actual: usize,
    },
    /// 크로스오버 탐지 윈도우보다 캔들 수가 적음
    InsufficientWindow {
        /// 필요한 최소 캔들 수 (윈도우 + 1)
        required: usize,
        /// 실제 캔들 수
        actual: usize,
    },
    /// 설정에서 비활성화되어 계산되지 않은 지표에 접근
    IndicatorUnavailable {
        /// 지표 이름
        indicator: String,
    },
    /// 가격 시계열 유효성 검사 실패
    InvalidSeries(String),
    /// 데이터 제공자 통신 실패
    Fetch(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::DataUnavailable { symbol } => {
                write!(f, "시세 데이터 없음: {}", symbol)
            }
            AnalysisError::InsufficientData {
                indicator,
                required,
                actual,
            } => write!(
                f,
                "{} 계산에 필요한 데이터 부족: 필요 {}개, 실제 {}개",
                indicator, required, actual
            ),
            AnalysisError::InsufficientWindow { required, actual } => write!(
                f,
                "크로스오버 윈도우에 필요한 데이터 부족: 필요 {}개, 실제 {}개",
                required, actual
            ),
            AnalysisError::IndicatorUnavailable { indicator } => {
                write!(f, "비활성화된 지표: {}", indicator)
            }
            AnalysisError::InvalidSeries(msg) => write!(f, "유효하지 않은 시계열: {}", msg),
            AnalysisError::Fetch(msg) => write!(f, "시세 조회 실패: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// 분석 결과 타입
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_insufficient_data() {
        let err = AnalysisError::InsufficientData {
            indicator: "SMA200".to_string(),
            required: 200,
            actual: 120,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("SMA200"));
        assert!(msg.contains("200"));
        assert!(msg.contains("120"));
    }

    #[test]
    fn test_display_data_unavailable() {
        let err = AnalysisError::DataUnavailable {
            symbol: "AAPL".to_string(),
        };
        assert!(format!("{}", err).contains("AAPL"));
    }
}
