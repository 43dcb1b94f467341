//! 설정 관리 — hostwatch.toml 파싱 및 런타임 설정
//!
//! [`HostwatchConfig`]는 에이전트 전체의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`HOSTWATCH_API_ENDPOINT=...` 형식)
//! 3. 설정 파일 (`hostwatch.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! 설정 검증 실패는 시작 시점의 치명적 에러입니다. 전송 경로 없이
//! 조용히 동작하는 대신 기동을 거부합니다.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, HostwatchError};

/// Hostwatch 통합 설정
///
/// `hostwatch.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostwatchConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 원격 수집기 API 설정
    #[serde(default)]
    pub api: ApiConfig,
    /// 인증 로그 테일러 설정
    #[serde(default)]
    pub tailer: TailerConfig,
    /// 이벤트 버퍼 설정
    #[serde(default)]
    pub buffer: BufferConfig,
    /// 스케줄러 설정
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// 메트릭 수집기 설정
    #[serde(default)]
    pub collector: CollectorConfig,
    /// 방화벽 액션 설정
    #[serde(default)]
    pub actions: ActionsConfig,
}

impl HostwatchConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, HostwatchError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, HostwatchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HostwatchError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                HostwatchError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, HostwatchError> {
        toml::from_str(toml_str).map_err(|e| {
            HostwatchError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `HOSTWATCH_{SECTION}_{FIELD}`
    /// 예: `HOSTWATCH_API_ENDPOINT=https://collector:8000/...`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "HOSTWATCH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "HOSTWATCH_GENERAL_LOG_FORMAT");

        // API
        override_string(&mut self.api.endpoint, "HOSTWATCH_API_ENDPOINT");
        override_string(&mut self.api.token, "HOSTWATCH_API_TOKEN");
        override_u64(&mut self.api.timeout_secs, "HOSTWATCH_API_TIMEOUT_SECS");
        override_string(&mut self.api.client_cert, "HOSTWATCH_API_CLIENT_CERT");
        override_string(&mut self.api.client_key, "HOSTWATCH_API_CLIENT_KEY");
        override_string(&mut self.api.ca_cert, "HOSTWATCH_API_CA_CERT");

        // Tailer
        override_string(&mut self.tailer.auth_log_path, "HOSTWATCH_TAILER_AUTH_LOG_PATH");
        override_string(&mut self.tailer.fallback_path, "HOSTWATCH_TAILER_FALLBACK_PATH");

        // Buffer
        override_usize(&mut self.buffer.capacity, "HOSTWATCH_BUFFER_CAPACITY");

        // Scheduler
        override_u64(
            &mut self.scheduler.heartbeat_interval_secs,
            "HOSTWATCH_SCHEDULER_HEARTBEAT_INTERVAL_SECS",
        );

        // Collector
        override_string(&mut self.collector.disk_path, "HOSTWATCH_COLLECTOR_DISK_PATH");
        override_u64(&mut self.collector.cpu_sample_ms, "HOSTWATCH_COLLECTOR_CPU_SAMPLE_MS");

        // Actions
        override_bool(&mut self.actions.auto_ban, "HOSTWATCH_ACTIONS_AUTO_BAN");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), HostwatchError> {
        const MAX_BUFFER_CAPACITY: usize = 1_000_000;
        const MAX_INTERVAL_SECS: u64 = 3600; // 1 hour

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.api.endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.endpoint".to_owned(),
                reason: "endpoint URL must not be empty".to_owned(),
            }
            .into());
        }

        if self.api.timeout_secs == 0 || self.api.timeout_secs > 120 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".to_owned(),
                reason: "must be 1-120".to_owned(),
            }
            .into());
        }

        // 클라이언트 인증서는 cert/key 쌍으로만 유효
        if self.api.client_cert.is_empty() != self.api.client_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.client_cert".to_owned(),
                reason: "client_cert and client_key must be set together".to_owned(),
            }
            .into());
        }

        if self.buffer.capacity == 0 || self.buffer.capacity > MAX_BUFFER_CAPACITY {
            return Err(ConfigError::InvalidValue {
                field: "buffer.capacity".to_owned(),
                reason: format!("must be 1-{MAX_BUFFER_CAPACITY}"),
            }
            .into());
        }

        if self.scheduler.heartbeat_interval_secs == 0
            || self.scheduler.heartbeat_interval_secs > MAX_INTERVAL_SECS
        {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.heartbeat_interval_secs".to_owned(),
                reason: format!("must be 1-{MAX_INTERVAL_SECS}"),
            }
            .into());
        }

        if self.tailer.auth_log_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tailer.auth_log_path".to_owned(),
                reason: "auth log path must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 원격 수집기 API 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// 하트비트 수신 엔드포인트 URL
    pub endpoint: String,
    /// 에이전트 인증 토큰 (빈 값이면 Authorization 헤더 생략)
    pub token: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// TLS 클라이언트 인증서 PEM 경로 (빈 값이면 미사용)
    pub client_cert: String,
    /// TLS 클라이언트 키 PEM 경로
    pub client_key: String,
    /// 추가 신뢰 CA PEM 경로 (빈 값이면 시스템 기본)
    pub ca_cert: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://localhost:8000/api/v1/agents/heartbeat".to_owned(),
            token: String::new(),
            timeout_secs: 10,
            client_cert: String::new(),
            client_key: String::new(),
            ca_cert: String::new(),
        }
    }
}

/// 인증 로그 테일러 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TailerConfig {
    /// 기본 인증 로그 경로 (Debian 계열)
    pub auth_log_path: String,
    /// 보조 경로 (RHEL 계열) — 기본 경로를 열 수 없을 때 시도
    pub fallback_path: String,
}

impl Default for TailerConfig {
    fn default() -> Self {
        Self {
            auth_log_path: "/var/log/auth.log".to_owned(),
            fallback_path: "/var/log/secure".to_owned(),
        }
    }
}

/// 이벤트 버퍼 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// 인메모리 버퍼 최대 용량 (초과 시 가장 오래된 이벤트부터 드롭)
    pub capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self { capacity: 5000 }
    }
}

/// 스케줄러 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// 하트비트 주기 (초)
    pub heartbeat_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: 30,
        }
    }
}

/// 메트릭 수집기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// 디스크 사용률 측정 대상 마운트 경로
    pub disk_path: String,
    /// CPU 사용률 샘플 간격 (밀리초)
    pub cpu_sample_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            disk_path: "/".to_owned(),
            cpu_sample_ms: 250,
        }
    }
}

/// 방화벽 액션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Critical 침입 이벤트의 출처 IP를 자동 차단할지 여부
    pub auto_ban: bool,
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
