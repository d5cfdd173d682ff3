use chrono::NaiveDate;
use trend_screener::model::{Bar, PriceSeries};

/// 종가 배열에서 연속된 날짜의 가격 시계열 생성
pub fn series_from_closes(symbol: &str, closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar::new(start + chrono::Days::new(i as u64), close))
        .collect();
    PriceSeries::new(symbol, bars).expect("테스트 시계열 생성 실패")
}

/// 단조 상승 시계열 생성 (세션마다 1.0씩 상승)
pub fn monotonic_rise(symbol: &str, sessions: usize, start_price: f64) -> PriceSeries {
    let closes: Vec<f64> = (0..sessions)
        .map(|i| start_price + i as f64)
        .collect();
    series_from_closes(symbol, &closes)
}
