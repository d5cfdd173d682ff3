use log::{debug, error, info, warn};
use std::env;
use std::path::{Path, PathBuf};
use trend_screener::adapter::{console, csv_report, ticker_file};
use trend_screener::analyzer::batch::BatchAnalyzer;
use trend_screener::config::ScreenerConfig;
use trend_screener::config_loader::{ConfigFormat, ConfigLoader};
use trend_screener::provider::yahoo::YahooChartProvider;

const OUTPUT_CSV: &str = "stocks_summary.csv";

fn main() {
    // 로그 초기화
    env_logger::init();

    info!("트렌드 스크리너 시작");

    // 커맨드 라인 인수 파싱
    let args: Vec<String> = env::args().collect();
    debug!("커맨드 라인 인수: {:?}", args);

    if args.len() < 2 {
        error!("인수가 충분하지 않습니다. 티커 목록 파일이 필요합니다.");
        println!("사용법: {} <티커_목록_파일> [설정_파일_경로]", args[0]);
        println!("티커 목록은 한 줄에 심볼 하나씩 적습니다 (예: stocks.txt)");
        return;
    }

    let tickers_path = PathBuf::from(&args[1]);
    if !tickers_path.exists() {
        error!("티커 목록 파일이 존재하지 않습니다: {}", tickers_path.display());
        println!(
            "오류: 티커 목록 파일이 존재하지 않습니다: {}",
            tickers_path.display()
        );
        return;
    }

    // 설정 로드 (지정되지 않은 경우 기본값 사용)
    let config = if args.len() >= 3 {
        let config_path = PathBuf::from(&args[2]);
        debug!("사용자 지정 설정 파일 사용: {}", config_path.display());
        match ConfigLoader::load_from_file::<ScreenerConfig>(&config_path, ConfigFormat::Auto) {
            Ok(config) => config,
            Err(err) => {
                error!("설정 로드 실패: {}", err);
                println!("설정 로드 실패: {}", err);
                println!("해결 방법: 설정 파일 형식과 값 범위를 확인하세요.");
                return;
            }
        }
    } else {
        debug!("기본 설정 사용");
        ScreenerConfig::default()
    };

    info!(
        "설정: SMA {}/{}, 크로스오버 윈도우 {}세션, 조회 기간 {}",
        config.fast_window, config.slow_window, config.crossover_window, config.lookback
    );

    // 티커 목록 읽기
    let symbols = match ticker_file::load_tickers(&tickers_path) {
        Ok(symbols) => symbols,
        Err(err) => {
            error!("티커 목록 읽기 실패: {}", err);
            println!("티커 목록 읽기 실패: {}", err);
            return;
        }
    };

    if symbols.is_empty() {
        warn!("티커 목록이 비어 있습니다: {}", tickers_path.display());
        println!("티커 목록이 비어 있습니다.");
        return;
    }

    // 배치 분석 실행
    let provider = YahooChartProvider::new();
    let analyzer = BatchAnalyzer::new(config, provider);

    info!("심볼 {}개 분석 시작", symbols.len());
    let report = analyzer.run(&symbols);
    info!(
        "분석 완료: 처리 {}개, 건너뜀 {}개",
        report.records().count(),
        report.skipped().count()
    );

    // 콘솔 요약 출력
    console::print_summary(&report, analyzer.config());

    // CSV 요약 저장
    match csv_report::write_summary(&report, analyzer.config(), Path::new(OUTPUT_CSV)) {
        Ok(()) => println!("\nCSV file saved as {}", OUTPUT_CSV),
        Err(err) => {
            error!("CSV 저장 실패: {}", err);
            println!("CSV 저장 실패: {}", err);
        }
    }

    info!("트렌드 스크리너 종료");
}
