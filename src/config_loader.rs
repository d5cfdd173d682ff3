use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use std::path::Path;

/// 설정 로드 오류
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 오류
    FileError(String),
    /// 파싱 오류
    ParseError(String),
    /// 유효성 검사 오류
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileError(msg) => write!(f, "설정 파일 오류: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "설정 파싱 오류: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "설정 유효성 검사 오류: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// 설정 로드 결과
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 설정 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON 형식
    Json,
    /// TOML 형식
    Toml,
    /// 자동 감지 (파일 확장자로부터)
    Auto,
}

/// 설정 유효성 검사 트레이트
pub trait ConfigValidation {
    /// 설정 유효성 검사
    fn validate(&self) -> ConfigResult<()>;
}

/// 설정 파일 로더
#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// 파일에서 설정 로드
    ///
    /// # Arguments
    /// * `path` - 설정 파일 경로
    /// * `format` - 설정 파일 형식 (기본값: Auto)
    ///
    /// # Returns
    /// * `ConfigResult<T>` - 설정 객체 또는 오류
    pub fn load_from_file<T>(path: &Path, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        debug!("설정 파일 로드 시작: {}", path.display());

        let format = if format == ConfigFormat::Auto {
            Self::detect_format(path)?
        } else {
            format
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            error!("설정 파일 읽기 실패: {} - {}", path.display(), e);
            ConfigError::FileError(format!("파일 읽기 실패: {}", e))
        })?;

        let config = Self::load_from_string::<T>(&content, format).inspect_err(|e| {
            error!("설정 파일 로드 실패: {} - {}", path.display(), e);
        })?;

        info!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 문자열에서 설정 로드
    ///
    /// # Arguments
    /// * `content` - 설정 문자열
    /// * `format` - 설정 형식
    ///
    /// # Returns
    /// * `ConfigResult<T>` - 설정 객체 또는 오류
    pub fn load_from_string<T>(content: &str, format: ConfigFormat) -> ConfigResult<T>
    where
        T: DeserializeOwned + ConfigValidation,
    {
        let config: T = match format {
            ConfigFormat::Json => Self::parse_json(content)?,
            ConfigFormat::Toml => Self::parse_toml(content)?,
            ConfigFormat::Auto => {
                // JSON으로 먼저 시도 후 실패하면 TOML 시도
                match Self::parse_json::<T>(content) {
                    Ok(config) => config,
                    Err(_) => Self::parse_toml(content)?,
                }
            }
        };

        // 유효성 검사
        config.validate()?;

        Ok(config)
    }

    // 내부 헬퍼 메서드

    /// JSON 파싱
    fn parse_json<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        serde_json::from_str(content).map_err(|e| {
            warn!("JSON 파싱 실패: {}", e);
            ConfigError::ParseError(format!("JSON 파싱 실패: {}", e))
        })
    }

    /// TOML 파싱
    fn parse_toml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
        toml::from_str(content).map_err(|e| {
            warn!("TOML 파싱 실패: {}", e);
            ConfigError::ParseError(format!("TOML 파싱 실패: {}", e))
        })
    }

    /// 파일 형식 감지
    fn detect_format(path: &Path) -> ConfigResult<ConfigFormat> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => {
                warn!("지원되지 않는 파일 형식: {}", path.display());
                Err(ConfigError::FileError(format!(
                    "파일 형식을 감지할 수 없음: {}",
                    path.display()
                )))
            }
        }
    }
}
