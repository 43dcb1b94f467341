//! 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 설정 섹션을 기반으로 파이프라인 전용
//! 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use hostwatch_core::HostwatchConfig;
//! use hostwatch_pipeline::config::PipelineConfig;
//!
//! let core_config = HostwatchConfig::default();
//! let config = PipelineConfig::from_core(&core_config);
//! ```

use std::path::Path;

use crate::error::PipelineError;

/// 파이프라인 설정
///
/// core의 `[tailer]`와 `[buffer]` 섹션에서 파생되며, 파이프라인
/// 내부에서 사용하는 추가 필드를 포함합니다.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 기본 인증 로그 경로
    pub auth_log_path: String,
    /// 보조 경로 — 기본 경로를 열 수 없을 때 시도
    pub fallback_path: String,
    /// 이벤트 버퍼 최대 용량
    pub buffer_capacity: usize,

    // --- 확장 설정 (core에 없는 추가 필드) ---
    /// 최대 라인 길이 (바이트) — 초과 라인은 분류하지 않음
    pub max_line_length: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            auth_log_path: "/var/log/auth.log".to_owned(),
            fallback_path: "/var/log/secure".to_owned(),
            buffer_capacity: 5000,
            max_line_length: 64 * 1024, // 64KB
        }
    }
}

impl PipelineConfig {
    /// core 설정에서 파이프라인 설정을 생성합니다.
    ///
    /// core 설정에 없는 확장 필드는 기본값이 적용됩니다.
    pub fn from_core(core: &hostwatch_core::HostwatchConfig) -> Self {
        Self {
            auth_log_path: core.tailer.auth_log_path.clone(),
            fallback_path: core.tailer.fallback_path.clone(),
            buffer_capacity: core.buffer.capacity,
            ..Self::default()
        }
    }

    /// 로그 경로가 유효한지 검증합니다.
    ///
    /// 비어있지 않은 절대 경로만 허용합니다.
    fn validate_log_path(field: &str, path_str: &str) -> Result<(), PipelineError> {
        if path_str.is_empty() {
            return Err(PipelineError::Config {
                field: field.to_owned(),
                reason: "log path must not be empty".to_owned(),
            });
        }

        if !Path::new(path_str).is_absolute() {
            return Err(PipelineError::Config {
                field: field.to_owned(),
                reason: format!("log path '{path_str}' must be an absolute path"),
            });
        }

        Ok(())
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), PipelineError> {
        const MAX_BUFFER_CAPACITY: usize = 1_000_000;
        const MAX_LINE_LENGTH: usize = 1024 * 1024; // 1MB

        Self::validate_log_path("auth_log_path", &self.auth_log_path)?;
        Self::validate_log_path("fallback_path", &self.fallback_path)?;

        if self.buffer_capacity == 0 || self.buffer_capacity > MAX_BUFFER_CAPACITY {
            return Err(PipelineError::Config {
                field: "buffer_capacity".to_owned(),
                reason: format!("must be 1-{MAX_BUFFER_CAPACITY}"),
            });
        }

        if self.max_line_length == 0 || self.max_line_length > MAX_LINE_LENGTH {
            return Err(PipelineError::Config {
                field: "max_line_length".to_owned(),
                reason: format!("must be 1-{MAX_LINE_LENGTH}"),
            });
        }

        Ok(())
    }
}

/// 파이프라인 설정 빌더
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 인증 로그 경로를 설정합니다.
    pub fn auth_log_path(mut self, path: impl Into<String>) -> Self {
        self.config.auth_log_path = path.into();
        self
    }

    /// 보조 로그 경로를 설정합니다.
    pub fn fallback_path(mut self, path: impl Into<String>) -> Self {
        self.config.fallback_path = path.into();
        self
    }

    /// 버퍼 용량을 설정합니다.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    /// 최대 라인 길이를 설정합니다.
    pub fn max_line_length(mut self, length: usize) -> Self {
        self.config.max_line_length = length;
        self
    }

    /// 설정을 검증하고 `PipelineConfig`를 생성합니다.
    pub fn build(self) -> Result<PipelineConfig, PipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_core_preserves_values() {
        let mut core = hostwatch_core::HostwatchConfig::default();
        core.tailer.auth_log_path = "/var/log/custom.log".to_owned();
        core.buffer.capacity = 1000;
        let config = PipelineConfig::from_core(&core);
        assert_eq!(config.auth_log_path, "/var/log/custom.log");
        assert_eq!(config.buffer_capacity, 1000);
        // 확장 필드는 기본값
        assert_eq!(config.max_line_length, 64 * 1024);
    }

    #[test]
    fn validate_rejects_relative_path() {
        let config = PipelineConfig {
            auth_log_path: "logs/auth.log".to_owned(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        let config = PipelineConfig {
            buffer_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_creates_valid_config() {
        let config = PipelineConfigBuilder::new()
            .auth_log_path("/tmp/auth.log")
            .buffer_capacity(100)
            .build()
            .unwrap();
        assert_eq!(config.auth_log_path, "/tmp/auth.log");
        assert_eq!(config.buffer_capacity, 100);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let result = PipelineConfigBuilder::new().buffer_capacity(0).build();
        assert!(result.is_err());
    }
}
