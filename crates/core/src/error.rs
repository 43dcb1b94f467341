//! 에러 타입 — 도메인별 에러 정의

/// Hostwatch 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum HostwatchError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 이벤트 파이프라인 에러
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// 전송 에러
    #[error("delivery error: {0}")]
    Delivery(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
///
/// 시작 시점에만 발생하며, 발생 시 프로세스는 기동을 거부합니다.
/// 틱 내부의 에러(전송 실패, 소스 미존재 등)는 이 타입을 사용하지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
