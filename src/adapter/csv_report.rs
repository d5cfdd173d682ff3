use crate::analyzer::crossover::{CrossDirection, CrossPair};
use crate::config::ScreenerConfig;
use crate::report::{AnalysisReport, ClassificationRecord};
use log::info;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// 크로스오버 발생 시점 칼럼 값
///
/// 발생했으면 세션 수, 아니면 "No"입니다. 미계산 상태도 "No"로
/// 표기됩니다.
fn sessions_cell(record: &ClassificationRecord, pair: CrossPair, direction: CrossDirection) -> String {
    match record.sessions_ago(pair, direction) {
        Some(sessions_ago) => sessions_ago.to_string(),
        None => "No".to_string(),
    }
}

/// 실수 칼럼 값 (비활성화된 지표는 빈 칸)
fn value_cell(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.4}", value),
        None => String::new(),
    }
}

/// Yes/No 플래그 칼럼 값
fn flag_cell(flag: Option<bool>) -> String {
    match flag {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => String::new(),
    }
}

/// 심볼별 요약 CSV 작성
///
/// 심볼 한 줄에 최신 가격, 이동평균, 추세, 크로스오버 발생 시점,
/// MACD, RSI를 기록합니다. 헤더의 이동평균 기간과 윈도우 길이는
/// 설정에서 가져옵니다. 건너뛴 심볼은 요약에 포함되지 않습니다
/// (콘솔 출력에서 보고됨).
///
/// # Arguments
/// * `report` - 집계 결과
/// * `config` - 스크리너 설정
/// * `path` - 출력 파일 경로
///
/// # Returns
/// * `io::Result<()>` - 성공 또는 파일 오류
pub fn write_summary(
    report: &AnalysisReport,
    config: &ScreenerConfig,
    path: &Path,
) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);

    let fast = config.fast_window;
    let slow = config.slow_window;
    let window = config.crossover_window;

    writeln!(
        writer,
        "Symbol,Current Price,{fast}EMA,{slow}EMA,{fast}DMA,{slow}DMA,\
         Trend ({fast}DMA vs {slow}DMA),Golden Cross Sessions Ago,\
         Above {fast}DMA Flag,Above {slow}DMA Flag,\
         Above {fast}DMA Last {window} Sessions,Above {slow}DMA Last {window} Sessions,\
         Below {fast}DMA Last {window} Sessions,Below {slow}DMA Last {window} Sessions,\
         MACD,Signal,MACD Trend,RSI"
    )?;

    for record in report.records() {
        let trend = record
            .trend
            .map(|trend| trend.to_string())
            .unwrap_or_default();
        let macd_trend = record
            .macd_trend
            .map(|trend| trend.to_string())
            .unwrap_or_default();

        writeln!(
            writer,
            "{},{:.4},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            record.symbol,
            record.latest_price,
            value_cell(record.latest_fast_ema),
            value_cell(record.latest_slow_ema),
            value_cell(record.latest_fast_sma),
            value_cell(record.latest_slow_sma),
            trend,
            sessions_cell(record, CrossPair::FastSlowSma, CrossDirection::Upward),
            flag_cell(record.flags.map(|flags| flags.above_fast_dma)),
            flag_cell(record.flags.map(|flags| flags.above_slow_dma)),
            sessions_cell(record, CrossPair::CloseFastSma, CrossDirection::Upward),
            sessions_cell(record, CrossPair::CloseSlowSma, CrossDirection::Upward),
            sessions_cell(record, CrossPair::CloseFastSma, CrossDirection::Downward),
            sessions_cell(record, CrossPair::CloseSlowSma, CrossDirection::Downward),
            value_cell(record.latest_macd),
            value_cell(record.latest_signal),
            macd_trend,
            value_cell(record.latest_rsi),
        )?;
    }

    writer.flush()?;
    info!("CSV 요약 저장 완료: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::classifier::{Trend, TrendFlags};
    use crate::analyzer::crossover::CrossoverEvent;
    use crate::report::SymbolOutcome;
    use tempfile::TempDir;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            outcomes: vec![SymbolOutcome::Analyzed(ClassificationRecord {
                symbol: "AAPL".to_string(),
                latest_price: 190.5,
                latest_fast_sma: Some(185.0),
                latest_slow_sma: Some(170.0),
                latest_fast_ema: Some(186.0),
                latest_slow_ema: Some(172.0),
                latest_macd: Some(2.5),
                latest_signal: Some(1.5),
                latest_rsi: Some(65.0),
                trend: Some(Trend::Up),
                macd_trend: Some(Trend::Up),
                flags: Some(TrendFlags {
                    above_fast_dma: true,
                    above_slow_dma: true,
                    between_fast_slow: false,
                    below_fast_dma: false,
                }),
                crossovers: Some(vec![CrossoverEvent {
                    pair: CrossPair::CloseFastSma,
                    direction: CrossDirection::Upward,
                    sessions_ago: 4,
                }]),
            })],
        }
    }

    #[test]
    fn test_write_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stocks_summary.csv");

        write_summary(&sample_report(), &ScreenerConfig::default(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("Symbol,Current Price,50EMA,200EMA,50DMA,200DMA"));
        assert!(header.contains("Golden Cross Sessions Ago"));
        assert!(header.contains("Above 50DMA Last 15 Sessions"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("AAPL,190.5000"));
        assert!(row.contains(",Up,"));
        assert!(row.contains(",Yes,Yes,4,No,No,No,"));
    }

    #[test]
    fn test_header_follows_config_windows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.csv");
        let config = ScreenerConfig {
            fast_window: 20,
            slow_window: 60,
            crossover_window: 10,
            ..ScreenerConfig::default()
        };

        write_summary(&AnalysisReport::default(), &config, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("20EMA,60EMA,20DMA,60DMA"));
        assert!(content.contains("Above 20DMA Last 10 Sessions"));
    }
}
