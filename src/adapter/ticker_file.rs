use log::info;
use std::io;
use std::path::Path;

/// 티커 목록 파일 읽기
///
/// 한 줄에 심볼 하나씩 적힌 텍스트 파일을 읽습니다.
/// 빈 줄과 `#`로 시작하는 줄은 무시합니다.
///
/// # Arguments
/// * `path` - 티커 목록 파일 경로
///
/// # Returns
/// * `io::Result<Vec<String>>` - 심볼 목록 또는 파일 오류
pub fn load_tickers(path: &Path) -> io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let tickers = parse_tickers(&content);
    info!("티커 {}개 로드: {}", tickers.len(), path.display());
    Ok(tickers)
}

/// 티커 목록 문자열 파싱
///
/// # Arguments
/// * `content` - 파일 내용
///
/// # Returns
/// * `Vec<String>` - 입력 순서가 유지된 심볼 목록
pub fn parse_tickers(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
