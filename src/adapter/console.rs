use crate::config::ScreenerConfig;
use crate::report::AnalysisReport;

/// 카테고리 섹션 하나 출력
fn print_category(title: &str, symbols: &[&str]) {
    if symbols.is_empty() {
        println!("\nNo stocks {}.", title);
        return;
    }

    println!("\nStocks {}:", title);
    for symbol in symbols {
        println!("{}", symbol);
    }
}

/// 분석 결과를 콘솔에 요약 출력
///
/// 네 개의 카테고리 섹션(단기선 위/장기선 위/두 선 사이/단기선 아래)을
/// 출력한 뒤, 건너뛴 심볼과 이유를 덧붙입니다. 카테고리는 스캔 중에
/// 누적된 목록이 아니라 집계 결과에서 파생된 뷰입니다.
///
/// # Arguments
/// * `report` - 집계 결과
/// * `config` - 스크리너 설정 (이동평균 기간 표시용)
pub fn print_summary(report: &AnalysisReport, config: &ScreenerConfig) {
    print_category(
        &format!("above the {}-day moving average", config.fast_window),
        &report.above_fast_dma(),
    );
    print_category(
        &format!("above the {}-day moving average", config.slow_window),
        &report.above_slow_dma(),
    );
    print_category(
        &format!(
            "between the {}DMA and {}DMA",
            config.fast_window, config.slow_window
        ),
        &report.between_fast_slow(),
    );
    print_category(
        &format!("below the {}-day moving average", config.fast_window),
        &report.below_fast_dma(),
    );

    let skipped: Vec<_> = report.skipped().collect();
    if !skipped.is_empty() {
        println!("\nSkipped symbols:");
        for (symbol, reason) in skipped {
            println!("{}: {}", symbol, reason);
        }
    }
}
