//! 파이프라인 에러 타입
//!
//! 분류 불가 라인은 에러가 아닙니다 — 매칭되지 않은 라인은 조용히
//! 건너뜁니다. 여기 정의된 에러는 I/O 실패와 잘못된 구성에 한정됩니다.

use hostwatch_core::HostwatchError;

/// 파이프라인 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 로그 파일 I/O 실패
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 유효하지 않은 파이프라인 설정
    #[error("invalid pipeline config for '{field}': {reason}")]
    Config { field: String, reason: String },

    /// 분류 패턴 컴파일 실패
    #[error("invalid classifier pattern: {reason}")]
    Pattern { reason: String },
}

impl From<PipelineError> for HostwatchError {
    fn from(err: PipelineError) -> Self {
        HostwatchError::Pipeline(err.to_string())
    }
}
